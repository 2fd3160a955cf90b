use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

#[derive(Clone, Copy, Debug, Serialize, Deserialize, ToSchema, PartialEq, Eq)]
#[serde(rename_all = "UPPERCASE")]
pub enum AttemptStatus {
    Idle,
    Confirming,
    Processing,
    Succeeded,
    Failed,
}

impl std::fmt::Display for AttemptStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let s = match self {
            AttemptStatus::Idle => "IDLE",
            AttemptStatus::Confirming => "CONFIRMING",
            AttemptStatus::Processing => "PROCESSING",
            AttemptStatus::Succeeded => "SUCCEEDED",
            AttemptStatus::Failed => "FAILED",
        };
        write!(f, "{}", s)
    }
}

#[derive(Clone, Debug, Serialize, Deserialize, ToSchema, PartialEq)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum PaymentFailure {
    /// The balance does not cover the amount due. Surfaced as a deposit prompt.
    InsufficientBalance,
    /// The gateway could not complete the transfer. Retryable.
    GatewayError(String),
}

impl PaymentFailure {
    pub fn message(&self) -> String {
        match self {
            PaymentFailure::InsufficientBalance => "Insufficient balance".to_string(),
            PaymentFailure::GatewayError(_) => "Error processing the payment. Try again.".to_string(),
        }
    }
}

/// A single user-initiated payment, from selection to success or failure.
///
/// `target == None` means "pay everything outstanding".
#[derive(Clone, Debug, Serialize, Deserialize, ToSchema, PartialEq)]
pub struct PaymentAttempt {
    pub id: Option<String>,
    pub target: Option<String>,
    pub amount_due: f64,
    pub status: AttemptStatus,
    pub failure: Option<PaymentFailure>,
}

impl PaymentAttempt {
    pub fn idle() -> Self {
        PaymentAttempt {
            id: None,
            target: None,
            amount_due: 0.0,
            status: AttemptStatus::Idle,
            failure: None,
        }
    }

    pub fn is_pay_all(&self) -> bool {
        self.target.is_none()
    }
}

impl Default for PaymentAttempt {
    fn default() -> Self {
        PaymentAttempt::idle()
    }
}
