use axum::{Json, http::StatusCode, response::IntoResponse};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::core::errors::WalletError;

#[derive(Deserialize, ToSchema)]
pub struct OpenSessionRequest {
    pub group_id: String,
    pub user_id: String,
    pub initial_balance: f64,
}

#[derive(Serialize, Deserialize, ToSchema)]
pub struct OpenSessionResponse {
    pub session_id: String,
}

#[derive(Deserialize, ToSchema, Default)]
pub struct RequestPaymentRequest {
    /// Omit to pay everything outstanding.
    #[serde(default)]
    pub service_id: Option<String>,
}

#[derive(Serialize, Deserialize, ToSchema)]
pub struct ErrorResponse {
    pub error: String,
}

// Newtype wrapper for WalletError to implement IntoResponse
pub struct ApiError(pub WalletError);

impl From<WalletError> for ApiError {
    fn from(err: WalletError) -> Self {
        ApiError(err)
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> axum::response::Response {
        let status = match &self.0 {
            WalletError::GroupNotFound(_) | WalletError::ServiceNotFound(_) | WalletError::SessionNotFound(_) => {
                StatusCode::NOT_FOUND
            }
            WalletError::NotGroupMember(_) | WalletError::MemberNotConfirmed(_) => StatusCode::FORBIDDEN,
            WalletError::ServiceAlreadyPaid(_) | WalletError::NothingToPay | WalletError::InvalidAttemptState { .. } => {
                StatusCode::CONFLICT
            }
            WalletError::InvalidInput(..) => StatusCode::BAD_REQUEST,
            WalletError::GatewayError(_) => StatusCode::BAD_GATEWAY,
            WalletError::StorageError(_) | WalletError::LoggingError(_) | WalletError::InternalServerError(_) => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
        };
        (status, Json(ErrorResponse { error: self.0.to_string() })).into_response()
    }
}
