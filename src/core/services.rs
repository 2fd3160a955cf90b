use crate::constants::{
    GROUP_REGISTERED, MAX_NAME_LENGTH, MAX_SERVICE_TOTAL, MAX_SERVICES_PER_GROUP, SESSION_CLOSED, SESSION_OPENED,
};
use crate::core::errors::WalletError;
use crate::core::models::{AppLog, Group, PaymentAttempt, SessionView};
use crate::core::session::{SessionSettings, SettlementSession};
use crate::infrastructure::gateway::PaymentGateway;
use crate::infrastructure::logging::LoggingService;
use crate::infrastructure::storage::{GroupObserver, Storage};
use serde_json::json;
use std::collections::{HashMap, HashSet};
use std::sync::Arc;
use tokio::sync::RwLock;
use tokio::time::Instant;
use tracing::info;
use uuid::Uuid;

type Session<L, S, G> = SettlementSession<G, L, S>;

struct SessionEntry<L: LoggingService, S: Storage + GroupObserver, G: PaymentGateway> {
    session: Arc<Session<L, S, G>>,
    last_seen: Instant,
}

/// Application facade: group intake plus the registry of open settlement
/// sessions. Storage doubles as the observer that receives settled groups.
///
/// Sessions not looked up for `SessionSettings::idle_timeout` are dropped
/// the next time a session is opened.
pub struct WalletService<L: LoggingService, S: Storage + GroupObserver, G: PaymentGateway> {
    storage: Arc<S>,
    logging: Arc<L>,
    gateway: Arc<G>,
    settings: SessionSettings,
    sessions: RwLock<HashMap<String, SessionEntry<L, S, G>>>,
}

impl<L, S, G> WalletService<L, S, G>
where
    L: LoggingService + 'static,
    S: Storage + GroupObserver + 'static,
    G: PaymentGateway + 'static,
{
    pub fn new(storage: S, logging: L, gateway: G, settings: SessionSettings) -> Self {
        info!("Initializing WalletService");
        WalletService {
            storage: Arc::new(storage),
            logging: Arc::new(logging),
            gateway: Arc::new(gateway),
            settings,
            sessions: RwLock::new(HashMap::new()),
        }
    }

    fn validate_string_input(&self, field: &str, value: &str, max_length: usize) -> Result<(), WalletError> {
        if value.trim().is_empty() {
            return Err(WalletError::invalid_input(
                field,
                &format!("Invalid {}", field),
                format!("{} cannot be empty", field),
            ));
        }
        if value.chars().count() > max_length {
            return Err(WalletError::invalid_input(
                field,
                &format!("{} Too Long", field),
                format!("{} cannot exceed {} characters", field, max_length),
            ));
        }
        if value.chars().any(|c| c.is_control()) {
            return Err(WalletError::invalid_input(
                field,
                &format!("Invalid {}", field),
                format!("{} contains invalid characters", field),
            ));
        }
        Ok(())
    }

    fn validate_amount_input(&self, field: &str, amount: f64) -> Result<(), WalletError> {
        if !amount.is_finite() {
            return Err(WalletError::invalid_input(
                field,
                "Invalid Amount",
                "Amount must be a finite number",
            ));
        }
        if amount <= 0.0 {
            return Err(WalletError::invalid_input(
                field,
                "Invalid Amount",
                "Amount must be greater than 0",
            ));
        }
        if amount > MAX_SERVICE_TOTAL {
            return Err(WalletError::invalid_input(
                field,
                "Amount Too Large",
                "Amount cannot exceed 1,000,000",
            ));
        }
        if ((amount * 100.0).round() - amount * 100.0).abs() > 1e-6 {
            return Err(WalletError::invalid_input(
                field,
                "Invalid Amount",
                "Amount cannot have more than 2 decimal places",
            ));
        }
        Ok(())
    }

    fn validate_email(&self, email: &str) -> Result<(), WalletError> {
        let valid = match email.split_once('@') {
            Some((local, domain)) => {
                !local.is_empty()
                    && !email.chars().any(char::is_whitespace)
                    && domain
                        .split_once('.')
                        .is_some_and(|(host, tld)| !host.is_empty() && !tld.is_empty())
            }
            None => false,
        };
        if valid {
            Ok(())
        } else {
            Err(WalletError::invalid_input(
                "email",
                "Invalid email",
                format!("{} is not a valid email address", email),
            ))
        }
    }

    fn validate_group(&self, group: &Group) -> Result<(), WalletError> {
        self.validate_string_input("id", &group.id, MAX_NAME_LENGTH)?;
        self.validate_string_input("name", &group.name, MAX_NAME_LENGTH)?;

        if group.services.len() > MAX_SERVICES_PER_GROUP {
            return Err(WalletError::invalid_input(
                "services",
                "Too Many Services",
                format!("A group cannot have more than {} services", MAX_SERVICES_PER_GROUP),
            ));
        }
        let mut service_ids = HashSet::new();
        for service in &group.services {
            self.validate_string_input("service.name", &service.name, MAX_NAME_LENGTH)?;
            self.validate_string_input("service.wallet", &service.wallet, 255)?;
            self.validate_amount_input("service.total", service.total)?;
            if !service_ids.insert(service.id.as_str()) {
                return Err(WalletError::invalid_input(
                    "services",
                    "Duplicate Service",
                    format!("Service {} appears more than once", service.id),
                ));
            }
        }

        let mut member_ids = HashSet::new();
        for member in &group.members {
            self.validate_email(&member.email)?;
            if !member_ids.insert(member.id.as_str()) {
                return Err(WalletError::invalid_input(
                    "members",
                    "Duplicate Member",
                    format!("Member {} appears more than once", member.id),
                ));
            }
        }
        Ok(())
    }

    /// Stores a group snapshot produced by the group editor.
    pub async fn register_group(&self, group: Group) -> Result<Group, WalletError> {
        self.validate_group(&group)?;
        self.storage.save_group(group.clone()).await?;

        self.logging
            .log_action(
                GROUP_REGISTERED,
                json!({
                    "group_id": group.id,
                    "name": group.name,
                    "service_ids": group.services.iter().map(|s| s.id.clone()).collect::<Vec<_>>(),
                    "member_ids": group.members.iter().map(|m| m.id.clone()).collect::<Vec<_>>()
                }),
                None,
            )
            .await?;
        Ok(group)
    }

    pub async fn get_group(&self, group_id: &str) -> Result<Option<Group>, WalletError> {
        self.storage.get_group(group_id).await
    }

    pub async fn list_groups(&self) -> Result<Vec<Group>, WalletError> {
        self.storage.list_groups().await
    }

    /// Starts a settlement session for `user_id` over the stored group.
    pub async fn open_session(
        &self,
        group_id: &str,
        user_id: &str,
        initial_balance: f64,
    ) -> Result<String, WalletError> {
        let group = self
            .storage
            .get_group(group_id)
            .await?
            .ok_or_else(|| WalletError::GroupNotFound(group_id.to_string()))?;

        let session = SettlementSession::new(
            group,
            user_id,
            initial_balance,
            Arc::clone(&self.gateway),
            Arc::clone(&self.logging),
            Arc::clone(&self.storage),
            self.settings.clone(),
        )?;

        let session_id = Uuid::new_v4().to_string();
        {
            let mut sessions = self.sessions.write().await;
            self.sweep_idle(&mut sessions);
            sessions.insert(
                session_id.clone(),
                SessionEntry {
                    session: Arc::new(session),
                    last_seen: Instant::now(),
                },
            );
        }

        self.logging
            .log_action(
                SESSION_OPENED,
                json!({ "session_id": session_id, "group_id": group_id, "initial_balance": initial_balance }),
                Some(user_id),
            )
            .await?;
        Ok(session_id)
    }

    fn sweep_idle(&self, sessions: &mut HashMap<String, SessionEntry<L, S, G>>) {
        let Some(idle_timeout) = self.settings.idle_timeout else {
            return;
        };
        let now = Instant::now();
        sessions.retain(|session_id, entry| {
            let keep = now.duration_since(entry.last_seen) < idle_timeout;
            if !keep {
                info!(%session_id, user_id = entry.session.current_user_id(), "dropping idle session");
            }
            keep
        });
    }

    async fn session(&self, session_id: &str) -> Result<Arc<Session<L, S, G>>, WalletError> {
        let mut sessions = self.sessions.write().await;
        let entry = sessions
            .get_mut(session_id)
            .ok_or_else(|| WalletError::SessionNotFound(session_id.to_string()))?;
        entry.last_seen = Instant::now();
        Ok(Arc::clone(&entry.session))
    }

    pub async fn session_view(&self, session_id: &str) -> Result<SessionView, WalletError> {
        Ok(self.session(session_id).await?.view().await)
    }

    pub async fn request_payment(
        &self,
        session_id: &str,
        service_id: Option<&str>,
    ) -> Result<PaymentAttempt, WalletError> {
        self.session(session_id).await?.request_payment(service_id).await
    }

    pub async fn confirm_payment(&self, session_id: &str) -> Result<PaymentAttempt, WalletError> {
        // The registry lock is released before the gateway call.
        let session = self.session(session_id).await?;
        session.confirm_payment().await
    }

    pub async fn cancel_payment(&self, session_id: &str) -> Result<PaymentAttempt, WalletError> {
        self.session(session_id).await?.cancel_payment().await
    }

    /// Drops a session. An in-flight payment still runs to completion since
    /// the confirming caller holds its own handle.
    pub async fn close_session(&self, session_id: &str) -> Result<(), WalletError> {
        let session = self
            .sessions
            .write()
            .await
            .remove(session_id)
            .map(|entry| entry.session)
            .ok_or_else(|| WalletError::SessionNotFound(session_id.to_string()))?;

        self.logging
            .log_action(
                SESSION_CLOSED,
                json!({ "session_id": session_id, "balance": session.balance().await }),
                Some(session.current_user_id()),
            )
            .await?;
        Ok(())
    }

    pub async fn get_app_logs(&self) -> Result<Vec<AppLog>, WalletError> {
        self.logging.get_logs().await
    }
}
