mod service_tests;

use crate::core::models::{Group, Member, MemberStatus, Service};
use crate::core::services::WalletService;
use crate::core::session::{SessionSettings, SettlementSession};
use crate::infrastructure::gateway::simulated::SimulatedGateway;
use crate::infrastructure::logging::in_memory::InMemoryLogging;
use crate::infrastructure::storage::Storage;
use crate::infrastructure::storage::in_memory::InMemoryStorage;
use std::sync::Arc;
use std::time::Duration;

pub type TestSession = SettlementSession<SimulatedGateway, InMemoryLogging, InMemoryStorage>;

pub const DEPOSIT_URL: &str = "https://wallet.example.test/deposit";

pub fn member(id: &str, status: MemberStatus) -> Member {
    Member {
        id: id.to_string(),
        name: format!("User {}", id),
        email: format!("{}@example.com", id),
        avatar: None,
        status,
        has_paid: false,
        wallet: Some(format!("wallet-{}", id)),
    }
}

pub fn service(id: &str, total: f64) -> Service {
    Service {
        id: id.to_string(),
        name: format!("Service {}", id),
        wallet: format!("payee-{}", id),
        total,
        due_date: None,
    }
}

pub fn group(services: Vec<Service>, members: Vec<Member>) -> Group {
    Group {
        id: "g1".to_string(),
        name: "Flat".to_string(),
        emoji: "🏠".to_string(),
        creator_wallet: "wallet-u1".to_string(),
        services,
        members,
    }
}

pub fn assert_money(actual: f64, expected: f64) {
    assert!(
        (actual - expected).abs() < 1e-9,
        "expected {:.2}, got {}",
        expected,
        actual
    );
}

/// Settings with no auto-reset, so tests can inspect a succeeded attempt.
pub fn manual_settings() -> SessionSettings {
    SessionSettings {
        success_display_delay: None,
        deposit_url: Some(DEPOSIT_URL.to_string()),
        idle_timeout: None,
    }
}

pub struct Harness {
    pub session: Arc<TestSession>,
    pub gateway: SimulatedGateway,
    pub logging: InMemoryLogging,
    pub storage: InMemoryStorage,
}

impl Harness {
    pub async fn new(group: Group, balance: f64, gateway: SimulatedGateway, settings: SessionSettings) -> Self {
        let logging = InMemoryLogging::new();
        let storage = InMemoryStorage::new();
        storage.save_group(group.clone()).await.unwrap();
        let session = SettlementSession::new(
            group,
            "u1",
            balance,
            Arc::new(gateway.clone()),
            Arc::new(logging.clone()),
            Arc::new(storage.clone()),
            settings,
        )
        .unwrap();
        Harness {
            session: Arc::new(session),
            gateway,
            logging,
            storage,
        }
    }

    pub async fn stored_group(&self) -> Group {
        self.storage.get_group("g1").await.unwrap().unwrap()
    }
}

pub fn create_test_service() -> WalletService<InMemoryLogging, InMemoryStorage, SimulatedGateway> {
    WalletService::new(
        InMemoryStorage::new(),
        InMemoryLogging::new(),
        SimulatedGateway::new(Duration::ZERO),
        manual_settings(),
    )
}
