use crate::constants::{
    GROUP_REGISTERED, GROUP_SETTLED, PAYMENT_PROCESSING, PAYMENT_REQUESTED, PAYMENT_SUCCEEDED, SESSION_CLOSED,
    SESSION_OPENED,
};
use crate::core::errors::WalletError;
use crate::core::models::AttemptStatus;
use crate::core::models::MemberStatus::{Confirmed, Pending};
use crate::core::services::WalletService;
use crate::core::session::SessionSettings;
use crate::infrastructure::gateway::simulated::SimulatedGateway;
use crate::infrastructure::logging::in_memory::InMemoryLogging;
use crate::infrastructure::storage::in_memory::InMemoryStorage;
use crate::tests::{assert_money, create_test_service, group, manual_settings, member, service};
use std::time::Duration;

#[tokio::test]
async fn test_register_group_stores_valid_group() {
    let wallet = create_test_service();
    let g = group(
        vec![service("s1", 150.0), service("s2", 80.0)],
        vec![member("u1", Confirmed), member("u2", Pending)],
    );

    let registered = wallet.register_group(g.clone()).await.unwrap();
    assert_eq!(registered, g);
    assert_eq!(wallet.get_group("g1").await.unwrap(), Some(g));
    assert!(wallet.get_group("missing").await.unwrap().is_none());

    let logs = wallet.get_app_logs().await.unwrap();
    assert_eq!(logs.len(), 1);
    assert_eq!(logs[0].action, GROUP_REGISTERED);
    assert_eq!(logs[0].user_id, None);
}

#[tokio::test]
async fn test_register_group_rejects_too_many_services() {
    let wallet = create_test_service();
    let services = (0..11).map(|i| service(&format!("s{}", i), 10.0)).collect();
    let result = wallet.register_group(group(services, vec![member("u1", Confirmed)])).await;

    assert!(matches!(result, Err(WalletError::InvalidInput(field, _)) if field == "services"));
    assert!(wallet.get_group("g1").await.unwrap().is_none());
}

#[tokio::test]
async fn test_register_group_rejects_invalid_fields() {
    let wallet = create_test_service();

    let mut bad_email = member("u2", Confirmed);
    bad_email.email = "not-an-email".to_string();
    let result = wallet
        .register_group(group(vec![service("s1", 10.0)], vec![member("u1", Confirmed), bad_email]))
        .await;
    assert!(matches!(result, Err(WalletError::InvalidInput(field, _)) if field == "email"));

    let result = wallet
        .register_group(group(vec![service("s1", 10.005)], vec![member("u1", Confirmed)]))
        .await;
    assert!(matches!(result, Err(WalletError::InvalidInput(field, _)) if field == "service.total"));

    let result = wallet
        .register_group(group(vec![service("s1", 0.0)], vec![member("u1", Confirmed)]))
        .await;
    assert!(matches!(result, Err(WalletError::InvalidInput(field, _)) if field == "service.total"));

    let result = wallet
        .register_group(group(
            vec![service("s1", 10.0), service("s1", 20.0)],
            vec![member("u1", Confirmed)],
        ))
        .await;
    assert!(matches!(result, Err(WalletError::InvalidInput(field, _)) if field == "services"));

    let mut unnamed = group(vec![service("s1", 10.0)], vec![member("u1", Confirmed)]);
    unnamed.name = "   ".to_string();
    let result = wallet.register_group(unnamed).await;
    assert!(matches!(result, Err(WalletError::InvalidInput(field, _)) if field == "name"));

    assert!(wallet.get_app_logs().await.unwrap().is_empty());
}

#[tokio::test]
async fn test_open_session_errors() {
    let wallet = create_test_service();
    assert!(matches!(
        wallet.open_session("g1", "u1", 100.0).await,
        Err(WalletError::GroupNotFound(id)) if id == "g1"
    ));

    wallet
        .register_group(group(
            vec![service("s1", 10.0)],
            vec![member("u1", Confirmed), member("u2", Pending)],
        ))
        .await
        .unwrap();

    assert!(matches!(
        wallet.open_session("g1", "u2", 100.0).await,
        Err(WalletError::MemberNotConfirmed(_))
    ));
    assert!(matches!(
        wallet.open_session("g1", "u9", 100.0).await,
        Err(WalletError::NotGroupMember(_))
    ));
    assert!(matches!(
        wallet.open_session("g1", "u1", f64::NAN).await,
        Err(WalletError::InvalidInput(_, _))
    ));
}

#[tokio::test]
async fn test_closed_session_is_gone() {
    let wallet = create_test_service();
    wallet
        .register_group(group(vec![service("s1", 10.0)], vec![member("u1", Confirmed)]))
        .await
        .unwrap();
    let session_id = wallet.open_session("g1", "u1", 100.0).await.unwrap();

    wallet.close_session(&session_id).await.unwrap();

    assert!(matches!(
        wallet.session_view(&session_id).await,
        Err(WalletError::SessionNotFound(id)) if id == session_id
    ));
    assert!(matches!(
        wallet.confirm_payment(&session_id).await,
        Err(WalletError::SessionNotFound(_))
    ));
    assert!(matches!(
        wallet.close_session(&session_id).await,
        Err(WalletError::SessionNotFound(_))
    ));
}

#[tokio::test]
async fn test_sessions_are_independent() {
    let wallet = create_test_service();
    wallet
        .register_group(group(
            vec![service("s1", 100.0)],
            vec![member("u1", Confirmed), member("u2", Confirmed)],
        ))
        .await
        .unwrap();
    let first = wallet.open_session("g1", "u1", 100.0).await.unwrap();
    let second = wallet.open_session("g1", "u2", 30.0).await.unwrap();
    assert_ne!(first, second);

    wallet.request_payment(&first, Some("s1")).await.unwrap();
    wallet.confirm_payment(&first).await.unwrap();

    let other = wallet.session_view(&second).await.unwrap();
    assert_money(other.balance, 30.0);
    assert_money(other.total_outstanding, 50.0);
    assert_eq!(other.attempt.status, AttemptStatus::Idle);
}

#[tokio::test]
async fn test_full_settlement_flow() {
    let wallet = create_test_service();
    wallet
        .register_group(group(
            vec![service("s1", 150.0), service("s2", 80.0), service("s3", 15.0)],
            vec![member("u1", Confirmed), member("u2", Pending)],
        ))
        .await
        .unwrap();
    let session_id = wallet.open_session("g1", "u1", 300.0).await.unwrap();

    let view = wallet.session_view(&session_id).await.unwrap();
    assert_eq!(view.group_id, "g1");
    assert_eq!(view.current_user_id, "u1");
    assert_money(view.total_outstanding, 245.0);
    assert_eq!(view.pending_members.len(), 1);
    assert_eq!(view.pending_members[0].member_id, "u2");

    let attempt = wallet.request_payment(&session_id, None).await.unwrap();
    assert_money(attempt.amount_due, 245.0);
    let view = wallet.session_view(&session_id).await.unwrap();
    assert_money(view.projected_balance.unwrap(), 55.0);

    let attempt = wallet.confirm_payment(&session_id).await.unwrap();
    assert_eq!(attempt.status, AttemptStatus::Succeeded);

    let view = wallet.session_view(&session_id).await.unwrap();
    assert_money(view.balance, 55.0);
    assert_eq!(view.total_outstanding, 0.0);
    assert!(view.debts.iter().all(|d| d.is_paid));
    assert_eq!(view.projected_balance, None);

    let stored = wallet.get_group("g1").await.unwrap().unwrap();
    assert!(stored.member("u1").unwrap().has_paid);

    wallet.close_session(&session_id).await.unwrap();

    let actions: Vec<String> = wallet
        .get_app_logs()
        .await
        .unwrap()
        .into_iter()
        .map(|l| l.action)
        .collect();
    assert_eq!(
        actions,
        vec![
            GROUP_REGISTERED,
            SESSION_OPENED,
            PAYMENT_REQUESTED,
            PAYMENT_PROCESSING,
            PAYMENT_SUCCEEDED,
            GROUP_SETTLED,
            SESSION_CLOSED,
        ]
    );
}

#[tokio::test]
async fn test_list_groups_returns_registered_groups() {
    let wallet = create_test_service();
    assert!(wallet.list_groups().await.unwrap().is_empty());

    let mut second = group(vec![service("s1", 10.0)], vec![member("u1", Confirmed)]);
    second.id = "g2".to_string();
    wallet.register_group(second).await.unwrap();
    wallet
        .register_group(group(vec![service("s1", 20.0)], vec![member("u1", Confirmed)]))
        .await
        .unwrap();

    let ids: Vec<String> = wallet.list_groups().await.unwrap().into_iter().map(|g| g.id).collect();
    assert_eq!(ids, vec!["g1", "g2"]);
}

#[tokio::test(start_paused = true)]
async fn test_idle_sessions_are_dropped() {
    let wallet = WalletService::new(
        InMemoryStorage::new(),
        InMemoryLogging::new(),
        SimulatedGateway::new(Duration::ZERO),
        SessionSettings {
            idle_timeout: Some(Duration::from_secs(60)),
            ..manual_settings()
        },
    );
    wallet
        .register_group(group(vec![service("s1", 10.0)], vec![member("u1", Confirmed)]))
        .await
        .unwrap();

    let stale = wallet.open_session("g1", "u1", 100.0).await.unwrap();
    let active = wallet.open_session("g1", "u1", 100.0).await.unwrap();

    tokio::time::sleep(Duration::from_secs(40)).await;
    wallet.session_view(&active).await.unwrap();
    tokio::time::sleep(Duration::from_secs(40)).await;

    let fresh = wallet.open_session("g1", "u1", 100.0).await.unwrap();

    assert!(matches!(
        wallet.session_view(&stale).await,
        Err(WalletError::SessionNotFound(_))
    ));
    assert!(wallet.session_view(&active).await.is_ok());
    assert!(wallet.session_view(&fresh).await.is_ok());
}
