pub mod attempt;
pub mod audit;
pub mod debt;
pub mod group;
pub mod view;

pub use attempt::{AttemptStatus, PaymentAttempt, PaymentFailure};
pub use audit::AppLog;
pub use debt::{Debt, MemberDebt, PendingMember};
pub use group::{Group, Member, MemberStatus, Service};
pub use view::SessionView;
