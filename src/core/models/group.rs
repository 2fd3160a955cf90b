use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

#[derive(Clone, Copy, Debug, Serialize, Deserialize, ToSchema, PartialEq, Eq)]
#[serde(rename_all = "UPPERCASE")]
pub enum MemberStatus {
    Confirmed,
    Pending,
}

impl std::fmt::Display for MemberStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let s = match self {
            MemberStatus::Confirmed => "CONFIRMED",
            MemberStatus::Pending => "PENDING",
        };
        write!(f, "{}", s)
    }
}

/// A recurring bill attached to a group. Paid state is tracked by the
/// settlement session, never on the service itself.
#[derive(Clone, Debug, Serialize, Deserialize, ToSchema, PartialEq)]
pub struct Service {
    pub id: String,
    pub name: String,
    /// Payee address.
    pub wallet: String,
    pub total: f64,
    #[serde(default)]
    #[schema(value_type = Option<String>, example = "2025-07-01")]
    pub due_date: Option<NaiveDate>,
}

#[derive(Clone, Debug, Serialize, Deserialize, ToSchema, PartialEq)]
pub struct Member {
    pub id: String,
    pub name: String,
    pub email: String,
    #[serde(default)]
    pub avatar: Option<String>,
    pub status: MemberStatus,
    #[serde(default)]
    pub has_paid: bool,
    #[serde(default)]
    pub wallet: Option<String>,
}

impl Member {
    pub fn is_confirmed(&self) -> bool {
        self.status == MemberStatus::Confirmed
    }

    pub fn is_pending(&self) -> bool {
        self.status == MemberStatus::Pending
    }

    /// Name shown to other members, falling back to the email address.
    pub fn display_name(&self) -> &str {
        if self.name.trim().is_empty() {
            &self.email
        } else {
            &self.name
        }
    }
}

#[derive(Clone, Debug, Serialize, Deserialize, ToSchema, PartialEq)]
pub struct Group {
    pub id: String,
    pub name: String,
    pub emoji: String,
    pub creator_wallet: String,
    #[serde(default)]
    pub services: Vec<Service>,
    #[serde(default)]
    pub members: Vec<Member>,
}

impl Group {
    pub fn member(&self, user_id: &str) -> Option<&Member> {
        self.members.iter().find(|m| m.id == user_id)
    }

    pub fn service(&self, service_id: &str) -> Option<&Service> {
        self.services.iter().find(|s| s.id == service_id)
    }

    /// Returns a copy of the group with `has_paid` raised for one member.
    pub fn with_member_paid(&self, user_id: &str) -> Group {
        let mut updated = self.clone();
        for member in updated.members.iter_mut().filter(|m| m.id == user_id) {
            member.has_paid = true;
        }
        updated
    }
}
