use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

/// One service's share owed by a single confirmed member.
#[derive(Clone, Debug, Serialize, Deserialize, ToSchema, PartialEq)]
pub struct Debt {
    pub service_id: String,
    pub name: String,
    pub amount_per_person: f64,
    pub is_paid: bool,
}

#[derive(Clone, Debug, Serialize, Deserialize, ToSchema, PartialEq)]
pub struct MemberDebt {
    pub member_id: String,
    pub name: String,
    pub avatar: Option<String>,
    pub owed: f64,
    pub has_paid: bool,
}

#[derive(Clone, Debug, Serialize, Deserialize, ToSchema, PartialEq)]
pub struct PendingMember {
    pub member_id: String,
    pub email: String,
}
