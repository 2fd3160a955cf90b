use serde::Serialize;
use thiserror::Error;

use crate::core::models::attempt::AttemptStatus;

#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct FieldError {
    pub field: String,
    pub title: String,
    pub description: String,
}

#[derive(Error, Debug, Clone, Serialize, PartialEq)]
pub enum WalletError {
    #[error("Group {0} not found")]
    GroupNotFound(String),
    #[error("User {0} is not a group member")]
    NotGroupMember(String),
    #[error("User {0} has not confirmed group membership")]
    MemberNotConfirmed(String),
    #[error("Service {0} not found")]
    ServiceNotFound(String),
    #[error("Service {0} already paid")]
    ServiceAlreadyPaid(String),
    #[error("Nothing left to pay")]
    NothingToPay,
    #[error("Session {0} not found")]
    SessionNotFound(String),
    #[error("Invalid attempt state: expected {expected}, got {actual}")]
    InvalidAttemptState { expected: String, actual: AttemptStatus },
    #[error("Invalid input for field `{0}`: {1:?}")]
    InvalidInput(String, FieldError),
    #[error("Gateway error: {0}")]
    GatewayError(String),
    #[error("Storage error: {0}")]
    StorageError(String),
    #[error("Logging error: {0}")]
    LoggingError(String),
    #[error("Internal server error: {0}")]
    InternalServerError(String),
}

impl WalletError {
    pub fn invalid_input(field: &str, title: &str, description: impl Into<String>) -> Self {
        WalletError::InvalidInput(
            field.to_string(),
            FieldError {
                field: field.to_string(),
                title: title.to_string(),
                description: description.into(),
            },
        )
    }

    pub fn invalid_state(expected: &str, actual: AttemptStatus) -> Self {
        WalletError::InvalidAttemptState {
            expected: expected.to_string(),
            actual,
        }
    }
}
