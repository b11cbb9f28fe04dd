//! Type definitions for hsx

mod configuration_types;
mod deployment_types;
mod extension_types;

pub use configuration_types::*;
pub use deployment_types::*;
pub use extension_types::*;
