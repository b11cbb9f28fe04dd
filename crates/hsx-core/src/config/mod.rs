//! Settings loading and extension id templates

mod id_template;
mod loader;

pub use id_template::IdTemplate;
pub use loader::{ExtensionSettings, CONFIG_FILE_NAMES};
