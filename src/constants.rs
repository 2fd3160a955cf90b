// Action names recorded in the application log.
pub const GROUP_REGISTERED: &str = "GROUP_REGISTERED";
pub const GROUP_SETTLED: &str = "GROUP_SETTLED";
pub const SESSION_OPENED: &str = "SESSION_OPENED";
pub const SESSION_CLOSED: &str = "SESSION_CLOSED";
pub const PAYMENT_REQUESTED: &str = "PAYMENT_REQUESTED";
pub const PAYMENT_PROCESSING: &str = "PAYMENT_PROCESSING";
pub const PAYMENT_SUCCEEDED: &str = "PAYMENT_SUCCEEDED";
pub const PAYMENT_FAILED: &str = "PAYMENT_FAILED";
pub const PAYMENT_CANCELLED: &str = "PAYMENT_CANCELLED";

/// Tolerance used when comparing money amounts (balance against amount due).
pub const MONEY_EPSILON: f64 = 1e-9;

/// Tolerance for share sums against service totals.
pub const SPLIT_TOLERANCE: f64 = 0.01;

pub const MAX_SERVICES_PER_GROUP: usize = 10;
pub const MAX_NAME_LENGTH: usize = 100;
pub const MAX_SERVICE_TOTAL: f64 = 1_000_000.0;
