use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use super::{Debt, MemberDebt, PaymentAttempt, PendingMember};

/// Snapshot of a settlement session handed to the presentation layer.
#[derive(Clone, Debug, Serialize, Deserialize, ToSchema, PartialEq)]
pub struct SessionView {
    pub group_id: String,
    pub current_user_id: String,
    pub balance: f64,
    pub debts: Vec<Debt>,
    pub total_outstanding: f64,
    pub attempt: PaymentAttempt,
    /// `balance - amount_due` while an attempt is open. Advisory only.
    pub projected_balance: Option<f64>,
    /// Set when the projected balance is negative or the last attempt failed
    /// for lack of funds.
    pub deposit_url: Option<String>,
    pub members: Vec<MemberDebt>,
    pub pending_members: Vec<PendingMember>,
}
