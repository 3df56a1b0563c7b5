//! ---
//! tdg_section: "11-simulation"
//! tdg_subsection: "module"
//! tdg_type: "source"
//! tdg_scope: "code"
//! tdg_description: "Error taxonomy for dataset generation."
//! tdg_version: "v0.1.0"
//! tdg_owner: "tbd"
//! ---
use thiserror::Error;

pub type Result<T> = std::result::Result<T, GenerationError>;

#[derive(Debug, Error, Clone, PartialEq)]
pub enum GenerationError {
    /// A caller-supplied value is outside its domain. Nothing is generated.
    #[error("invalid argument `{name}`: {reason}")]
    InvalidArgument { name: &'static str, reason: String },
    /// A site references a key missing from the generation profile. Indicates an
    /// inconsistent profile rather than bad user input.
    #[error("no {table} entry for `{key}`")]
    Lookup { table: &'static str, key: String },
    #[error("random source unavailable: {0}")]
    RandomSource(String),
}

impl GenerationError {
    pub(crate) fn invalid(name: &'static str, reason: impl Into<String>) -> Self {
        GenerationError::InvalidArgument {
            name,
            reason: reason.into(),
        }
    }
}
