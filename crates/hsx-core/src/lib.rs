//! # hsx-core
//!
//! Core library for the hsx CLI providing:
//! - Hosted service extension types (records, kinds, role scopes)
//! - The extension configuration wire shape
//! - Deployment snapshot/update types exchanged with a management channel
//! - Settings loading (hsx.yaml) and the extension id template

pub mod config;
pub mod error;
pub mod types;

pub use config::{ExtensionSettings, IdTemplate};
pub use error::{Error, Result};
