// irms-backend/src/api/handlers/audit_log_handler.rs

use crate::api::dto::audit_log_dto::{AuditLogFilterDto, AuditLogResponse};
use crate::api::dto::common::{PaginatedResponse, PaginationQuery};
use crate::api::AppState;
use crate::error::{AppError, AppResult};
use crate::middleware::auth::AuthenticatedUser;
use crate::utils::permission::PermissionChecker;
use axum::{
    extract::{Json, Query, State},
    response::IntoResponse,
    routing::get,
    Router,
};

pub fn router() -> Router<AppState> {
    Router::new().route("/audit-logs", get(list_audit_logs_handler))
}

pub async fn list_audit_logs_handler(
    State(app_state): State<AppState>,
    user: AuthenticatedUser,
    Query(pagination): Query<PaginationQuery>,
    Query(filter): Query<AuditLogFilterDto>,
) -> AppResult<impl IntoResponse> {
    if !PermissionChecker::can_read_audit_logs(user.user()) {
        return Err(AppError::Forbidden(
            "Only administrators can read audit logs".to_string(),
        ));
    }

    let (page, limit) = pagination.get_pagination();
    let (logs, total) = app_state
        .audit_log_service
        .list(&filter, page, limit)
        .await?;

    let responses: Vec<AuditLogResponse> = logs.iter().map(AuditLogResponse::from_model).collect();
    Ok(Json(PaginatedResponse::new(responses, page, limit, total)))
}
