use std::io;

#[derive(Debug, thiserror::Error, PartialEq, Eq)]
#[error("invalid country code '{0}': expected two ASCII letters")]
pub struct InvalidCountryCode(pub String);

/// Raised at the boundary when entity input is malformed.
#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum EntityError {
    #[error("entity id is required")]
    MissingId,
    #[error("country is required for entity: {id}")]
    MissingCountry { id: String },
    #[error("invalid country code '{code}' for entity: {id}")]
    InvalidCountryCode { id: String, code: String },
}

/// Raised while loading or validating a registry configuration.
#[derive(Debug, thiserror::Error)]
pub enum RegistryError {
    #[error("failed to read registry: {0}")]
    Io(#[from] io::Error),
    #[error("failed to parse registry: {0}")]
    Json(#[from] serde_json::Error),
    #[error("duplicate country in registry: {0}")]
    DuplicateCountry(String),
    #[error("invalid identifier pattern for {country}/{kind}: {message}")]
    InvalidPattern {
        country: String,
        kind: String,
        message: String,
    },
    #[error("invalid due date rule for {country}/{obligation}: {message}")]
    InvalidDueDateRule {
        country: String,
        obligation: String,
        message: String,
    },
}
