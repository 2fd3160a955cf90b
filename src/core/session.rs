use crate::constants::{
    GROUP_SETTLED, MONEY_EPSILON, PAYMENT_CANCELLED, PAYMENT_FAILED, PAYMENT_PROCESSING, PAYMENT_REQUESTED,
    PAYMENT_SUCCEEDED,
};
use crate::core::errors::WalletError;
use crate::core::models::{AttemptStatus, Debt, Group, PaymentAttempt, PaymentFailure, SessionView};
use crate::core::split;
use crate::infrastructure::gateway::{GatewayOutcome, PaymentGateway, PaymentRequest, ServiceRef};
use crate::infrastructure::logging::LoggingService;
use crate::infrastructure::storage::GroupObserver;
use serde_json::json;
use std::collections::HashSet;
use std::sync::{Arc, Weak};
use std::time::Duration;
use tokio::sync::Mutex;
use tracing::{debug, error, info, warn};
use uuid::Uuid;

#[derive(Clone, Debug)]
pub struct SessionSettings {
    /// How long a successful attempt stays visible before resetting to idle.
    /// `None` keeps it until the caller cancels.
    pub success_display_delay: Option<Duration>,
    /// Where to send the user when funds are short.
    pub deposit_url: Option<String>,
    /// Sessions left untouched this long are dropped from the registry.
    pub idle_timeout: Option<Duration>,
}

impl Default for SessionSettings {
    fn default() -> Self {
        SessionSettings {
            success_display_delay: Some(Duration::from_millis(2000)),
            deposit_url: None,
            idle_timeout: Some(Duration::from_secs(30 * 60)),
        }
    }
}

struct SessionState {
    group: Group,
    balance: f64,
    paid_service_ids: HashSet<String>,
    attempt: PaymentAttempt,
}

impl SessionState {
    fn debts(&self) -> Vec<Debt> {
        split::compute_debts(&self.group.services, &self.group.members)
            .into_iter()
            .map(|mut debt| {
                debt.is_paid = self.paid_service_ids.contains(&debt.service_id);
                debt
            })
            .collect()
    }

    fn all_paid(&self) -> bool {
        self.group
            .services
            .iter()
            .all(|s| self.paid_service_ids.contains(&s.id))
    }
}

struct SessionCore<G, L, O> {
    current_user_id: String,
    state: Mutex<SessionState>,
    gateway: Arc<G>,
    logging: Arc<L>,
    observer: Arc<O>,
    settings: SessionSettings,
}

/// Settlement controller for one user viewing one group.
///
/// Holds the balance, the set of paid services and the current payment
/// attempt. Every mutation of balance and ledger happens in the commit step
/// of [`SettlementSession::confirm_payment`], under the state lock; the
/// gateway call itself runs without the lock and the `Processing` status
/// turns away any other mutating call while it is outstanding.
pub struct SettlementSession<G: PaymentGateway, L: LoggingService, O: GroupObserver> {
    core: Arc<SessionCore<G, L, O>>,
}

impl<G, L, O> SettlementSession<G, L, O>
where
    G: PaymentGateway + 'static,
    L: LoggingService + 'static,
    O: GroupObserver + 'static,
{
    pub fn new(
        group: Group,
        current_user_id: &str,
        initial_balance: f64,
        gateway: Arc<G>,
        logging: Arc<L>,
        observer: Arc<O>,
        settings: SessionSettings,
    ) -> Result<Self, WalletError> {
        if !initial_balance.is_finite() || initial_balance < 0.0 {
            return Err(WalletError::invalid_input(
                "initial_balance",
                "Invalid Balance",
                "Balance must be a finite, non-negative amount",
            ));
        }
        let member = group
            .member(current_user_id)
            .ok_or_else(|| WalletError::NotGroupMember(current_user_id.to_string()))?;
        if !member.is_confirmed() {
            return Err(WalletError::MemberNotConfirmed(current_user_id.to_string()));
        }

        debug!(group_id = %group.id, user_id = current_user_id, initial_balance, "opening settlement session");

        Ok(SettlementSession {
            core: Arc::new(SessionCore {
                current_user_id: current_user_id.to_string(),
                state: Mutex::new(SessionState {
                    group,
                    balance: initial_balance,
                    paid_service_ids: HashSet::new(),
                    attempt: PaymentAttempt::idle(),
                }),
                gateway,
                logging,
                observer,
                settings,
            }),
        })
    }

    pub fn current_user_id(&self) -> &str {
        &self.core.current_user_id
    }

    pub async fn balance(&self) -> f64 {
        self.core.state.lock().await.balance
    }

    pub async fn attempt(&self) -> PaymentAttempt {
        self.core.state.lock().await.attempt.clone()
    }

    pub async fn paid_service_ids(&self) -> HashSet<String> {
        self.core.state.lock().await.paid_service_ids.clone()
    }

    /// The group as last seen by this session, including any `has_paid`
    /// update it produced.
    pub async fn group(&self) -> Group {
        self.core.state.lock().await.group.clone()
    }

    pub async fn debts(&self) -> Vec<Debt> {
        self.core.state.lock().await.debts()
    }

    pub async fn total_outstanding(&self) -> f64 {
        let state = self.core.state.lock().await;
        split::total_outstanding(&state.debts(), &state.paid_service_ids)
    }

    pub async fn view(&self) -> SessionView {
        let state = self.core.state.lock().await;
        let debts = state.debts();
        let total_outstanding = split::total_outstanding(&debts, &state.paid_service_ids);
        let attempt = state.attempt.clone();

        let projected_balance = match attempt.status {
            AttemptStatus::Confirming | AttemptStatus::Processing | AttemptStatus::Failed => {
                Some(state.balance - attempt.amount_due)
            }
            AttemptStatus::Idle | AttemptStatus::Succeeded => None,
        };
        let short_of_funds = projected_balance.is_some_and(|p| p < -MONEY_EPSILON)
            || attempt.failure == Some(PaymentFailure::InsufficientBalance);

        SessionView {
            group_id: state.group.id.clone(),
            current_user_id: self.core.current_user_id.clone(),
            balance: state.balance,
            members: split::member_debts(
                &state.group.members,
                &debts,
                &self.core.current_user_id,
                &state.paid_service_ids,
            ),
            pending_members: split::pending_members(&state.group.members),
            debts,
            total_outstanding,
            attempt,
            projected_balance,
            deposit_url: if short_of_funds {
                self.core.settings.deposit_url.clone()
            } else {
                None
            },
        }
    }

    /// Opens a confirmation for one service, or for everything outstanding
    /// when `target` is `None`. Replaces any attempt that is not processing.
    pub async fn request_payment(&self, target: Option<&str>) -> Result<PaymentAttempt, WalletError> {
        let attempt = {
            let mut state = self.core.state.lock().await;
            if state.attempt.status == AttemptStatus::Processing {
                return Err(WalletError::invalid_state(
                    "IDLE, CONFIRMING, SUCCEEDED or FAILED",
                    AttemptStatus::Processing,
                ));
            }

            let debts = state.debts();
            let amount_due = match target {
                Some(service_id) => {
                    let debt = debts
                        .iter()
                        .find(|d| d.service_id == service_id)
                        .ok_or_else(|| WalletError::ServiceNotFound(service_id.to_string()))?;
                    if debt.is_paid {
                        return Err(WalletError::ServiceAlreadyPaid(service_id.to_string()));
                    }
                    debt.amount_per_person
                }
                None => {
                    if debts.iter().all(|d| d.is_paid) {
                        return Err(WalletError::NothingToPay);
                    }
                    split::total_outstanding(&debts, &state.paid_service_ids)
                }
            };

            state.attempt = PaymentAttempt {
                id: Some(Uuid::new_v4().to_string()),
                target: target.map(String::from),
                amount_due,
                status: AttemptStatus::Confirming,
                failure: None,
            };
            state.attempt.clone()
        };

        info!(
            user_id = %self.core.current_user_id,
            service = ?attempt.target,
            amount_due = attempt.amount_due,
            "payment requested"
        );
        self.core
            .record(
                PAYMENT_REQUESTED,
                json!({ "attempt_id": attempt.id, "target": attempt.target, "amount_due": attempt.amount_due }),
            )
            .await;
        Ok(attempt)
    }

    /// Runs the confirmed attempt through the gateway and commits the result.
    ///
    /// Valid from `Confirming`, or from `Failed` as a retry of the same
    /// attempt. Payment failures are reported on the returned attempt, not
    /// as `Err`.
    ///
    /// The gateway call and the commit run on their own task, so the attempt
    /// always leaves `Processing` even when the caller stops waiting.
    pub async fn confirm_payment(&self) -> Result<PaymentAttempt, WalletError> {
        let request = {
            let mut state = self.core.state.lock().await;
            match state.attempt.status {
                AttemptStatus::Confirming | AttemptStatus::Failed => {}
                actual => return Err(WalletError::invalid_state("CONFIRMING or FAILED", actual)),
            }
            let request = self.core.payment_request(&state)?;
            state.attempt.status = AttemptStatus::Processing;
            state.attempt.failure = None;
            request
        };

        let attempt_id = request.attempt_id.clone();
        let core = Arc::clone(&self.core);
        let resolution = tokio::spawn(async move { core.process(request).await });

        match resolution.await {
            Ok(attempt) => Ok(attempt),
            Err(e) => {
                error!(%attempt_id, error = %e, "payment task aborted");
                Ok(self.core.abandon(&attempt_id, e.to_string()).await)
            }
        }
    }

    /// Dismisses the current attempt. A no-op when already idle; refused
    /// while the gateway call is in flight.
    pub async fn cancel_payment(&self) -> Result<PaymentAttempt, WalletError> {
        let discarded = {
            let mut state = self.core.state.lock().await;
            match state.attempt.status {
                AttemptStatus::Idle => return Ok(state.attempt.clone()),
                AttemptStatus::Processing => {
                    return Err(WalletError::invalid_state(
                        "CONFIRMING, SUCCEEDED or FAILED",
                        AttemptStatus::Processing,
                    ));
                }
                AttemptStatus::Confirming | AttemptStatus::Succeeded | AttemptStatus::Failed => {}
            }
            std::mem::replace(&mut state.attempt, PaymentAttempt::idle())
        };

        debug!(attempt_id = ?discarded.id, status = %discarded.status, "payment attempt dismissed");
        self.core
            .record(
                PAYMENT_CANCELLED,
                json!({ "attempt_id": discarded.id, "status": discarded.status }),
            )
            .await;
        Ok(PaymentAttempt::idle())
    }
}

impl<G, L, O> SessionCore<G, L, O>
where
    G: PaymentGateway + 'static,
    L: LoggingService + 'static,
    O: GroupObserver + 'static,
{
    async fn process(self: Arc<Self>, request: PaymentRequest) -> PaymentAttempt {
        info!(attempt_id = %request.attempt_id, amount = request.amount, "processing payment");
        self.record(
            PAYMENT_PROCESSING,
            json!({ "attempt_id": request.attempt_id, "amount": request.amount }),
        )
        .await;

        let outcome = self.gateway.pay(&request).await;

        let (attempt, settled_group) = {
            let mut state = self.state.lock().await;
            let amount_due = state.attempt.amount_due;

            let failure = if amount_due - state.balance > MONEY_EPSILON {
                Some(PaymentFailure::InsufficientBalance)
            } else {
                match outcome {
                    Ok(GatewayOutcome::Success) => None,
                    Ok(GatewayOutcome::InsufficientFunds) => Some(PaymentFailure::InsufficientBalance),
                    Ok(GatewayOutcome::TransientError(reason)) => Some(PaymentFailure::GatewayError(reason)),
                    Err(e) => Some(PaymentFailure::GatewayError(e.to_string())),
                }
            };

            let mut settled_group = None;
            match failure {
                Some(failure) => {
                    state.attempt.status = AttemptStatus::Failed;
                    state.attempt.failure = Some(failure);
                }
                None => {
                    let remaining = state.balance - amount_due;
                    state.balance = if remaining.abs() < MONEY_EPSILON { 0.0 } else { remaining };

                    let covered: Vec<String> = match &state.attempt.target {
                        Some(service_id) => vec![service_id.clone()],
                        None => state
                            .group
                            .services
                            .iter()
                            .map(|s| s.id.clone())
                            .filter(|id| !state.paid_service_ids.contains(id))
                            .collect(),
                    };
                    state.paid_service_ids.extend(covered);
                    state.attempt.status = AttemptStatus::Succeeded;

                    let already_flagged = state
                        .group
                        .member(&self.current_user_id)
                        .is_some_and(|m| m.has_paid);
                    if !already_flagged && state.all_paid() {
                        let updated = state.group.with_member_paid(&self.current_user_id);
                        state.group = updated.clone();
                        settled_group = Some(updated);
                    }
                }
            }
            (state.attempt.clone(), settled_group)
        };

        match &attempt.failure {
            None => {
                info!(attempt_id = ?attempt.id, amount = attempt.amount_due, "payment succeeded");
                self.record(
                    PAYMENT_SUCCEEDED,
                    json!({ "attempt_id": attempt.id, "target": attempt.target, "amount": attempt.amount_due }),
                )
                .await;
                self.schedule_reset(&attempt);
            }
            Some(failure) => {
                warn!(attempt_id = ?attempt.id, ?failure, "payment failed");
                self.record(
                    PAYMENT_FAILED,
                    json!({ "attempt_id": attempt.id, "reason": failure.message() }),
                )
                .await;
            }
        }

        if let Some(group) = settled_group {
            info!(group_id = %group.id, user_id = %self.current_user_id, "all debts settled");
            self.record(GROUP_SETTLED, json!({ "group_id": group.id })).await;
            if let Err(e) = self.observer.on_group_updated(group).await {
                error!(error = %e, "failed to propagate settled group");
            }
        }

        attempt
    }

    /// Fails an attempt whose processing task died before committing.
    async fn abandon(&self, attempt_id: &str, reason: String) -> PaymentAttempt {
        let mut state = self.state.lock().await;
        if state.attempt.status == AttemptStatus::Processing && state.attempt.id.as_deref() == Some(attempt_id) {
            state.attempt.status = AttemptStatus::Failed;
            state.attempt.failure = Some(PaymentFailure::GatewayError(reason));
        }
        state.attempt.clone()
    }

    fn payment_request(&self, state: &SessionState) -> Result<PaymentRequest, WalletError> {
        let attempt_id = state
            .attempt
            .id
            .clone()
            .ok_or_else(|| WalletError::InternalServerError("attempt without id".to_string()))?;
        let target = match &state.attempt.target {
            Some(service_id) => {
                let service = state
                    .group
                    .service(service_id)
                    .ok_or_else(|| WalletError::ServiceNotFound(service_id.clone()))?;
                Some(ServiceRef {
                    service_id: service.id.clone(),
                    payee_wallet: service.wallet.clone(),
                })
            }
            None => None,
        };
        Ok(PaymentRequest {
            attempt_id,
            group_id: state.group.id.clone(),
            payer_id: self.current_user_id.clone(),
            payer_wallet: state
                .group
                .member(&self.current_user_id)
                .and_then(|m| m.wallet.clone()),
            amount: state.attempt.amount_due,
            target,
            group_wallet: state.group.creator_wallet.clone(),
        })
    }

    fn schedule_reset(self: &Arc<Self>, attempt: &PaymentAttempt) {
        let Some(delay) = self.settings.success_display_delay else {
            return;
        };
        let core: Weak<Self> = Arc::downgrade(self);
        let attempt_id = attempt.id.clone();
        tokio::spawn(async move {
            tokio::time::sleep(delay).await;
            let Some(core) = core.upgrade() else {
                return;
            };
            let mut state = core.state.lock().await;
            if state.attempt.status == AttemptStatus::Succeeded && state.attempt.id == attempt_id {
                debug!(?attempt_id, "resetting succeeded attempt");
                state.attempt = PaymentAttempt::idle();
            }
        });
    }

    async fn record(&self, action: &str, details: serde_json::Value) {
        if let Err(e) = self
            .logging
            .log_action(action, details, Some(&self.current_user_id))
            .await
        {
            warn!(action, error = %e, "failed to record action");
        }
    }
}
