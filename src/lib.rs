pub mod api;
pub mod config;
pub mod constants;
pub mod core;
pub mod infrastructure;

pub use crate::core::errors::WalletError;
pub use crate::core::services::WalletService;
pub use crate::core::session::{SessionSettings, SettlementSession};
pub use crate::infrastructure::gateway::simulated::SimulatedGateway;
pub use crate::infrastructure::logging::in_memory::InMemoryLogging;
pub use crate::infrastructure::storage::in_memory::InMemoryStorage;

#[cfg(test)]
mod tests;
