use crate::{
    api::models::*,
    core::{
        errors::WalletError,
        models::{AppLog, Group, PaymentAttempt, SessionView},
        services::WalletService,
    },
    infrastructure::{
        gateway::simulated::SimulatedGateway, logging::in_memory::InMemoryLogging,
        storage::in_memory::InMemoryStorage,
    },
};
use axum::{
    Json, Router,
    extract::{Path, State},
    http::StatusCode,
    routing::{get, post},
};
use std::sync::Arc;

pub type AppService = WalletService<InMemoryLogging, InMemoryStorage, SimulatedGateway>;

// Define API routes
pub fn api_routes(service: Arc<AppService>) -> Router {
    Router::new()
        .route("/groups", post(register_group).get(list_groups))
        .route("/groups/{group_id}", get(get_group))
        .route("/sessions", post(open_session))
        .route("/sessions/{session_id}", get(get_session).delete(close_session))
        .route("/sessions/{session_id}/payment", post(request_payment))
        .route("/sessions/{session_id}/payment/confirm", post(confirm_payment))
        .route("/sessions/{session_id}/payment/cancel", post(cancel_payment))
        .route("/logs", get(get_app_logs))
        .with_state(service)
}

#[utoipa::path(
    post,
    path = "/api/groups",
    request_body = Group,
    responses(
        (status = 201, description = "Group registered", body = Group),
        (status = 400, description = "Invalid group", body = ErrorResponse),
        (status = 500, description = "Internal server error", body = ErrorResponse)
    )
)]
pub(crate) async fn register_group(
    State(service): State<Arc<AppService>>,
    Json(group): Json<Group>,
) -> Result<(StatusCode, Json<Group>), ApiError> {
    let group = service.register_group(group).await?;
    Ok((StatusCode::CREATED, Json(group)))
}

#[utoipa::path(
    get,
    path = "/api/groups",
    responses(
        (status = 200, description = "Registered groups, ordered by id", body = Vec<Group>)
    )
)]
pub(crate) async fn list_groups(State(service): State<Arc<AppService>>) -> Result<Json<Vec<Group>>, ApiError> {
    Ok(Json(service.list_groups().await?))
}

#[utoipa::path(
    get,
    path = "/api/groups/{group_id}",
    params(
        ("group_id" = String, Path, description = "ID of the group to retrieve")
    ),
    responses(
        (status = 200, description = "Group retrieved", body = Group),
        (status = 404, description = "Group not found", body = ErrorResponse)
    )
)]
pub(crate) async fn get_group(
    State(service): State<Arc<AppService>>,
    Path(group_id): Path<String>,
) -> Result<Json<Group>, ApiError> {
    let group = service
        .get_group(&group_id)
        .await?
        .ok_or_else(|| WalletError::GroupNotFound(group_id))?;
    Ok(Json(group))
}

#[utoipa::path(
    post,
    path = "/api/sessions",
    request_body = OpenSessionRequest,
    responses(
        (status = 201, description = "Session opened", body = OpenSessionResponse),
        (status = 400, description = "Invalid balance", body = ErrorResponse),
        (status = 403, description = "User is not a confirmed member", body = ErrorResponse),
        (status = 404, description = "Group not found", body = ErrorResponse)
    )
)]
pub(crate) async fn open_session(
    State(service): State<Arc<AppService>>,
    Json(req): Json<OpenSessionRequest>,
) -> Result<(StatusCode, Json<OpenSessionResponse>), ApiError> {
    let session_id = service
        .open_session(&req.group_id, &req.user_id, req.initial_balance)
        .await?;
    Ok((StatusCode::CREATED, Json(OpenSessionResponse { session_id })))
}

#[utoipa::path(
    get,
    path = "/api/sessions/{session_id}",
    params(("session_id" = String, Path, description = "Settlement session ID")),
    responses(
        (status = 200, description = "Current session state", body = SessionView),
        (status = 404, description = "Session not found", body = ErrorResponse)
    )
)]
pub(crate) async fn get_session(
    State(service): State<Arc<AppService>>,
    Path(session_id): Path<String>,
) -> Result<Json<SessionView>, ApiError> {
    Ok(Json(service.session_view(&session_id).await?))
}

#[utoipa::path(
    delete,
    path = "/api/sessions/{session_id}",
    params(("session_id" = String, Path, description = "Settlement session ID")),
    responses(
        (status = 204, description = "Session closed"),
        (status = 404, description = "Session not found", body = ErrorResponse)
    )
)]
pub(crate) async fn close_session(
    State(service): State<Arc<AppService>>,
    Path(session_id): Path<String>,
) -> Result<StatusCode, ApiError> {
    service.close_session(&session_id).await?;
    Ok(StatusCode::NO_CONTENT)
}

#[utoipa::path(
    post,
    path = "/api/sessions/{session_id}/payment",
    params(("session_id" = String, Path, description = "Settlement session ID")),
    request_body = RequestPaymentRequest,
    responses(
        (status = 200, description = "Attempt awaiting confirmation", body = PaymentAttempt),
        (status = 404, description = "Session or service not found", body = ErrorResponse),
        (status = 409, description = "Already paid, nothing to pay, or a payment is processing", body = ErrorResponse)
    )
)]
pub(crate) async fn request_payment(
    State(service): State<Arc<AppService>>,
    Path(session_id): Path<String>,
    Json(req): Json<RequestPaymentRequest>,
) -> Result<Json<PaymentAttempt>, ApiError> {
    let attempt = service
        .request_payment(&session_id, req.service_id.as_deref())
        .await?;
    Ok(Json(attempt))
}

#[utoipa::path(
    post,
    path = "/api/sessions/{session_id}/payment/confirm",
    params(("session_id" = String, Path, description = "Settlement session ID")),
    responses(
        (status = 200, description = "Attempt resolved (succeeded or failed)", body = PaymentAttempt),
        (status = 404, description = "Session not found", body = ErrorResponse),
        (status = 409, description = "No attempt awaiting confirmation", body = ErrorResponse)
    )
)]
pub(crate) async fn confirm_payment(
    State(service): State<Arc<AppService>>,
    Path(session_id): Path<String>,
) -> Result<Json<PaymentAttempt>, ApiError> {
    Ok(Json(service.confirm_payment(&session_id).await?))
}

#[utoipa::path(
    post,
    path = "/api/sessions/{session_id}/payment/cancel",
    params(("session_id" = String, Path, description = "Settlement session ID")),
    responses(
        (status = 200, description = "Attempt dismissed", body = PaymentAttempt),
        (status = 404, description = "Session not found", body = ErrorResponse),
        (status = 409, description = "Payment is processing", body = ErrorResponse)
    )
)]
pub(crate) async fn cancel_payment(
    State(service): State<Arc<AppService>>,
    Path(session_id): Path<String>,
) -> Result<Json<PaymentAttempt>, ApiError> {
    Ok(Json(service.cancel_payment(&session_id).await?))
}

#[utoipa::path(
    get,
    path = "/api/logs",
    responses(
        (status = 200, description = "Recorded actions", body = Vec<AppLog>)
    )
)]
pub(crate) async fn get_app_logs(State(service): State<Arc<AppService>>) -> Result<Json<Vec<AppLog>>, ApiError> {
    Ok(Json(service.get_app_logs().await?))
}
