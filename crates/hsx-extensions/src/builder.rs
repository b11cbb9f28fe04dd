//! Working copy of a deployment's extension configuration
//!
//! [`ExtensionConfigurationBuilder`] holds the ids active for all roles and
//! for each named role. It is seeded from the deployment's current
//! [`ExtensionConfiguration`], mutated in memory, and serialized back with
//! [`ExtensionConfigurationBuilder::to_configuration`].
//!
//! Role lists passed to the role-based operations fall back to the default
//! scope when empty.
//!
//! Kind-based operations resolve ids through an [`ExtensionStore`]; ids with
//! no registered record never match a kind.

use crate::channel::ManagementChannel;
use crate::store::ExtensionStore;
use hsx_core::types::{
    ExtensionConfiguration, ExtensionKind, ExtensionReference, ExtensionRoleScope, RoleExtensions,
};
use hsx_core::Result;
use std::collections::{BTreeMap, BTreeSet, HashMap};

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ExtensionConfigurationBuilder {
    all_roles: BTreeSet<String>,
    named_roles: BTreeMap<String, BTreeSet<String>>,
}

fn scopes_for<S: AsRef<str>>(roles: &[S]) -> Vec<ExtensionRoleScope> {
    if roles.is_empty() {
        vec![ExtensionRoleScope::Default]
    } else {
        roles
            .iter()
            .map(|r| ExtensionRoleScope::named(r.as_ref()))
            .collect()
    }
}

impl ExtensionConfigurationBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Seed a builder from an existing configuration
    pub fn from_configuration(config: &ExtensionConfiguration) -> Self {
        let mut builder = Self::new();
        builder.add_configuration(config);
        builder
    }

    /// Import every id of an already-serialized configuration
    pub fn add_configuration(&mut self, config: &ExtensionConfiguration) -> &mut Self {
        for reference in &config.all_roles {
            self.add_default(&reference.id);
        }
        for role in &config.named_roles {
            for reference in &role.extensions {
                self.add(&ExtensionRoleScope::named(&role.role_name), &reference.id);
            }
        }
        self
    }

    // ------------------------------------------------------------------
    // Existence by id
    // ------------------------------------------------------------------

    pub fn exist_default(&self, id: &str) -> bool {
        self.all_roles.contains(id)
    }

    pub fn exist(&self, scope: &ExtensionRoleScope, id: &str) -> bool {
        match scope {
            ExtensionRoleScope::Default => self.exist_default(id),
            ExtensionRoleScope::Named(role) => self
                .named_roles
                .get(role)
                .map(|ids| ids.contains(id))
                .unwrap_or(false),
        }
    }

    /// True if any of the given roles (or the default scope, when no roles
    /// are given) references the id
    pub fn exist_in_roles<S: AsRef<str>>(&self, roles: &[S], id: &str) -> bool {
        scopes_for(roles).iter().any(|scope| self.exist(scope, id))
    }

    /// True if the id is referenced by the default scope or any named role
    pub fn exist_any(&self, id: &str) -> bool {
        self.exist_default(id) || self.named_roles.values().any(|ids| ids.contains(id))
    }

    /// True if the id is referenced by any scope other than `scope`
    pub fn exist_outside(&self, scope: &ExtensionRoleScope, id: &str) -> bool {
        let in_default = !scope.is_default() && self.exist_default(id);
        in_default
            || self.named_roles.iter().any(|(role, ids)| {
                ids.contains(id) && !matches!(scope, ExtensionRoleScope::Named(r) if r == role)
            })
    }

    // ------------------------------------------------------------------
    // Existence by kind
    // ------------------------------------------------------------------

    pub fn exist_default_kind<C: ManagementChannel + ?Sized>(
        &self,
        store: &ExtensionStore<'_, C>,
        kind: &ExtensionKind,
    ) -> Result<bool> {
        self.exist_kind_in_scopes(store, &[ExtensionRoleScope::Default], kind)
    }

    /// True if the default scope or any named role holds an extension of `kind`
    pub fn exist_any_kind<C: ManagementChannel + ?Sized>(
        &self,
        store: &ExtensionStore<'_, C>,
        kind: &ExtensionKind,
    ) -> Result<bool> {
        let kinds = store.kinds()?;
        Ok(self
            .all_roles
            .iter()
            .chain(self.named_roles.values().flatten())
            .any(|id| kinds.get(id) == Some(kind)))
    }

    pub fn exist_kind<C: ManagementChannel + ?Sized, S: AsRef<str>>(
        &self,
        store: &ExtensionStore<'_, C>,
        roles: &[S],
        kind: &ExtensionKind,
    ) -> Result<bool> {
        self.exist_kind_in_scopes(store, &scopes_for(roles), kind)
    }

    fn exist_kind_in_scopes<C: ManagementChannel + ?Sized>(
        &self,
        store: &ExtensionStore<'_, C>,
        scopes: &[ExtensionRoleScope],
        kind: &ExtensionKind,
    ) -> Result<bool> {
        let kinds = store.kinds()?;
        Ok(scopes
            .iter()
            .any(|scope| !self.matching(scope, &kinds, kind).is_empty()))
    }

    /// Ids in `scope` that resolve to `kind`
    pub fn ids_of_kind<C: ManagementChannel + ?Sized>(
        &self,
        store: &ExtensionStore<'_, C>,
        scope: &ExtensionRoleScope,
        kind: &ExtensionKind,
    ) -> Result<Vec<String>> {
        let kinds = store.kinds()?;
        Ok(self.matching(scope, &kinds, kind))
    }

    fn matching(
        &self,
        scope: &ExtensionRoleScope,
        kinds: &HashMap<String, ExtensionKind>,
        kind: &ExtensionKind,
    ) -> Vec<String> {
        self.scope_ids(scope)
            .filter(|id| kinds.get(*id) == Some(kind))
            .map(str::to_string)
            .collect()
    }

    // ------------------------------------------------------------------
    // Add
    // ------------------------------------------------------------------

    pub fn add_default(&mut self, id: &str) -> &mut Self {
        self.all_roles.insert(id.to_string());
        self
    }

    /// Add the id to each given role, or to the default scope when no roles are given
    pub fn add_roles<S: AsRef<str>>(&mut self, roles: &[S], id: &str) -> &mut Self {
        for scope in scopes_for(roles) {
            self.add(&scope, id);
        }
        self
    }

    pub fn add(&mut self, scope: &ExtensionRoleScope, id: &str) -> &mut Self {
        match scope {
            ExtensionRoleScope::Default => {
                self.add_default(id);
            }
            ExtensionRoleScope::Named(role) => {
                self.named_roles
                    .entry(role.clone())
                    .or_default()
                    .insert(id.to_string());
            }
        }
        self
    }

    // ------------------------------------------------------------------
    // Remove by id
    // ------------------------------------------------------------------

    pub fn remove_default(&mut self, id: &str) -> &mut Self {
        self.all_roles.remove(id);
        self
    }

    pub fn remove_roles<S: AsRef<str>>(&mut self, roles: &[S], id: &str) -> &mut Self {
        for scope in scopes_for(roles) {
            self.remove(&scope, id);
        }
        self
    }

    pub fn remove(&mut self, scope: &ExtensionRoleScope, id: &str) -> &mut Self {
        match scope {
            ExtensionRoleScope::Default => {
                self.remove_default(id);
            }
            ExtensionRoleScope::Named(role) => {
                if let Some(ids) = self.named_roles.get_mut(role) {
                    ids.remove(id);
                    if ids.is_empty() {
                        self.named_roles.remove(role);
                    }
                }
            }
        }
        self
    }

    // ------------------------------------------------------------------
    // Remove by kind
    // ------------------------------------------------------------------

    /// Remove every default-scope id of `kind`; returns the removed ids
    pub fn remove_default_kind<C: ManagementChannel + ?Sized>(
        &mut self,
        store: &ExtensionStore<'_, C>,
        kind: &ExtensionKind,
    ) -> Result<Vec<String>> {
        self.remove_kind_in_scopes(store, &[ExtensionRoleScope::Default], kind)
    }

    /// Remove ids of `kind` from the default scope and every named role
    pub fn remove_any_kind<C: ManagementChannel + ?Sized>(
        &mut self,
        store: &ExtensionStore<'_, C>,
        kind: &ExtensionKind,
    ) -> Result<Vec<String>> {
        let scopes: Vec<_> = std::iter::once(ExtensionRoleScope::Default)
            .chain(self.named_roles.keys().map(|r| ExtensionRoleScope::named(r)))
            .collect();
        self.remove_kind_in_scopes(store, &scopes, kind)
    }

    pub fn remove_kind<C: ManagementChannel + ?Sized, S: AsRef<str>>(
        &mut self,
        store: &ExtensionStore<'_, C>,
        roles: &[S],
        kind: &ExtensionKind,
    ) -> Result<Vec<String>> {
        self.remove_kind_in_scopes(store, &scopes_for(roles), kind)
    }

    pub fn remove_scope_kind<C: ManagementChannel + ?Sized>(
        &mut self,
        store: &ExtensionStore<'_, C>,
        scope: &ExtensionRoleScope,
        kind: &ExtensionKind,
    ) -> Result<Vec<String>> {
        self.remove_kind_in_scopes(store, std::slice::from_ref(scope), kind)
    }

    fn remove_kind_in_scopes<C: ManagementChannel + ?Sized>(
        &mut self,
        store: &ExtensionStore<'_, C>,
        scopes: &[ExtensionRoleScope],
        kind: &ExtensionKind,
    ) -> Result<Vec<String>> {
        let kinds = store.kinds()?;
        let mut removed = Vec::new();
        for scope in scopes {
            for id in self.matching(scope, &kinds, kind) {
                self.remove(scope, &id);
                if !removed.contains(&id) {
                    removed.push(id);
                }
            }
        }
        Ok(removed)
    }

    // ------------------------------------------------------------------
    // Inspection and output
    // ------------------------------------------------------------------

    /// Ids referenced by one scope
    pub fn scope_ids<'s>(
        &'s self,
        scope: &ExtensionRoleScope,
    ) -> Box<dyn Iterator<Item = &'s str> + 's> {
        match scope {
            ExtensionRoleScope::Default => Box::new(self.all_roles.iter().map(String::as_str)),
            ExtensionRoleScope::Named(role) => match self.named_roles.get(role) {
                Some(ids) => Box::new(ids.iter().map(String::as_str)),
                None => Box::new(std::iter::empty()),
            },
        }
    }

    /// The default scope followed by every named role with at least one id
    pub fn scopes(&self) -> Vec<ExtensionRoleScope> {
        std::iter::once(ExtensionRoleScope::Default)
            .chain(
                self.named_roles
                    .iter()
                    .filter(|(_, ids)| !ids.is_empty())
                    .map(|(role, _)| ExtensionRoleScope::named(role)),
            )
            .collect()
    }

    pub fn is_empty(&self) -> bool {
        self.all_roles.is_empty() && self.named_roles.values().all(BTreeSet::is_empty)
    }

    /// Serialize the working set. Named roles left without ids are omitted.
    pub fn to_configuration(&self) -> ExtensionConfiguration {
        ExtensionConfiguration {
            all_roles: self
                .all_roles
                .iter()
                .map(|id| ExtensionReference::new(id.as_str()))
                .collect(),
            named_roles: self
                .named_roles
                .iter()
                .filter(|(_, ids)| !ids.is_empty())
                .map(|(role, ids)| RoleExtensions {
                    role_name: role.clone(),
                    extensions: ids
                        .iter()
                        .map(|id| ExtensionReference::new(id.as_str()))
                        .collect(),
                })
                .collect(),
        }
    }
}
