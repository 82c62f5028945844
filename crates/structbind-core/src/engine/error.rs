use thiserror::Error;

use super::config::ConfigError;
use super::registry::RegistryError;

#[derive(Debug, Error)]
pub enum EngineError {
    #[error("Mapping registry failure: {source}")]
    Registry {
        #[from]
        source: RegistryError,
    },

    #[error("Invalid configuration: {source}")]
    Config {
        #[from]
        source: ConfigError,
    },

    #[error("Structure file '{file}' did not finish loading before the deadline")]
    StructuresNotLoaded { file: String },

    #[error("No bound structure has a sequence present in the alignment")]
    NoReferenceStructure,

    #[error("Only {found} superposable column(s) found, at least {required} required")]
    InsufficientColumns { found: usize, required: usize },

    #[error("Operation was cancelled")]
    Cancelled,
}
