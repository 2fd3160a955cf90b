use utoipa::OpenApi;

use crate::{
    api::models::{ErrorResponse, OpenSessionRequest, OpenSessionResponse, RequestPaymentRequest},
    core::models::{
        AppLog, AttemptStatus, Debt, Group, Member, MemberDebt, MemberStatus, PaymentAttempt, PaymentFailure,
        PendingMember, Service, SessionView,
    },
};

#[derive(OpenApi)]
#[openapi(
    paths(
        super::handlers::register_group,
        super::handlers::list_groups,
        super::handlers::get_group,
        super::handlers::open_session,
        super::handlers::get_session,
        super::handlers::close_session,
        super::handlers::request_payment,
        super::handlers::confirm_payment,
        super::handlers::cancel_payment,
        super::handlers::get_app_logs
    ),
    components(schemas(
        OpenSessionRequest,
        OpenSessionResponse,
        RequestPaymentRequest,
        ErrorResponse,
        Group,
        Service,
        Member,
        MemberStatus,
        Debt,
        MemberDebt,
        PendingMember,
        PaymentAttempt,
        AttemptStatus,
        PaymentFailure,
        SessionView,
        AppLog
    )),
    info(
        title = "Group Wallet API",
        description = "Split recurring group services and settle shares against a wallet balance",
        version = "0.1.0"
    )
)]
pub struct ApiDoc;
