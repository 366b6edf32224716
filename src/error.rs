// Typed errors with thiserror. Only wiring and configuration mistakes are errors;
// transient DOM unavailability and dropped requests are reported as outcomes.

use thiserror::Error;

/// Navigation error types.
#[derive(Error, Debug, PartialEq, Eq)]
pub enum NavError {
    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    #[error("Navigation store read before it was provided")]
    StoreNotProvided,

    #[error("No navigator registered on the navigation store")]
    NavigatorNotRegistered,

    #[error("Serialization error: {0}")]
    Serialization(String),
}

impl From<serde_json::Error> for NavError {
    fn from(err: serde_json::Error) -> Self {
        NavError::Serialization(err.to_string())
    }
}
