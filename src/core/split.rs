//! Share computation for a group snapshot.
//!
//! Everything here is a pure function of its inputs: nothing is cached and
//! nothing is mutated, so callers recompute on every read.

use std::collections::HashSet;

use crate::core::models::{Debt, Member, MemberDebt, PendingMember, Service};

/// Splits every service evenly among the confirmed members.
///
/// Pending members are not counted. With no confirmed member at all every
/// share is zero rather than an error. Output order follows `services`.
pub fn compute_debts(services: &[Service], members: &[Member]) -> Vec<Debt> {
    let confirmed = members.iter().filter(|m| m.is_confirmed()).count();

    services
        .iter()
        .map(|service| Debt {
            service_id: service.id.clone(),
            name: service.name.clone(),
            amount_per_person: if confirmed == 0 {
                0.0
            } else {
                service.total / confirmed as f64
            },
            is_paid: false,
        })
        .collect()
}

/// Sum of the shares whose service id is not in `paid`.
pub fn total_outstanding(debts: &[Debt], paid: &HashSet<String>) -> f64 {
    debts
        .iter()
        .filter(|d| !paid.contains(&d.service_id))
        .map(|d| d.amount_per_person)
        .sum()
}

/// What one confirmed member owes across all services, paid or not.
pub fn per_person_total(debts: &[Debt]) -> f64 {
    debts.iter().map(|d| d.amount_per_person).sum()
}

/// Per-member view of the group debt.
///
/// The current user's figures come from the session ledger; other members'
/// come from their `has_paid` flag as supplied by the caller.
pub fn member_debts(
    members: &[Member],
    debts: &[Debt],
    current_user_id: &str,
    paid: &HashSet<String>,
) -> Vec<MemberDebt> {
    let share = per_person_total(debts);
    let outstanding = total_outstanding(debts, paid);

    members
        .iter()
        .filter(|m| m.is_confirmed())
        .map(|member| {
            let (owed, has_paid) = if member.id == current_user_id {
                let settled = !debts.is_empty() && debts.iter().all(|d| paid.contains(&d.service_id));
                (outstanding, member.has_paid || settled)
            } else if member.has_paid {
                (0.0, true)
            } else {
                (share, false)
            };
            MemberDebt {
                member_id: member.id.clone(),
                name: member.display_name().to_string(),
                avatar: member.avatar.clone(),
                owed,
                has_paid,
            }
        })
        .collect()
}

pub fn pending_members(members: &[Member]) -> Vec<PendingMember> {
    members
        .iter()
        .filter(|m| m.is_pending())
        .map(|m| PendingMember {
            member_id: m.id.clone(),
            email: m.email.clone(),
        })
        .collect()
}
