// irms-backend/src/api/handlers/risk_handler.rs

use super::UuidPath;
use crate::api::dto::common::{MessageResponse, PaginationQuery};
use crate::api::dto::risk_dto::{CreateRiskDto, RiskFilterDto, UpdateRiskDto};
use crate::api::AppState;
use crate::error::AppResult;
use crate::middleware::auth::AuthenticatedUser;
use axum::{
    extract::{Json, Query, State},
    http::StatusCode,
    response::IntoResponse,
    routing::get,
    Router,
};
use validator::Validate;

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/risks", get(list_risks_handler).post(create_risk_handler))
        .route(
            "/risks/{id}",
            get(get_risk_handler)
                .patch(update_risk_handler)
                .delete(delete_risk_handler),
        )
}

pub async fn list_risks_handler(
    State(app_state): State<AppState>,
    user: AuthenticatedUser,
    Query(pagination): Query<PaginationQuery>,
    Query(filter): Query<RiskFilterDto>,
) -> AppResult<impl IntoResponse> {
    let (page, limit) = pagination.get_pagination();
    let risks = app_state
        .risk_service
        .list_risks(user.user(), &filter, page, limit)
        .await?;
    Ok(Json(risks))
}

pub async fn get_risk_handler(
    State(app_state): State<AppState>,
    user: AuthenticatedUser,
    UuidPath(id): UuidPath,
) -> AppResult<impl IntoResponse> {
    let risk = app_state.risk_service.get_risk(user.user(), id).await?;
    Ok(Json(risk))
}

pub async fn create_risk_handler(
    State(app_state): State<AppState>,
    user: AuthenticatedUser,
    Json(payload): Json<CreateRiskDto>,
) -> AppResult<impl IntoResponse> {
    payload.validate()?;
    let risk = app_state
        .risk_service
        .create_risk(user.user(), payload)
        .await?;
    Ok((StatusCode::CREATED, Json(risk)))
}

pub async fn update_risk_handler(
    State(app_state): State<AppState>,
    user: AuthenticatedUser,
    UuidPath(id): UuidPath,
    Json(payload): Json<UpdateRiskDto>,
) -> AppResult<impl IntoResponse> {
    payload.validate()?;
    let risk = app_state
        .risk_service
        .update_risk(user.user(), id, payload)
        .await?;
    Ok(Json(risk))
}

pub async fn delete_risk_handler(
    State(app_state): State<AppState>,
    user: AuthenticatedUser,
    UuidPath(id): UuidPath,
) -> AppResult<impl IntoResponse> {
    app_state.risk_service.delete_risk(user.user(), id).await?;
    Ok(Json(MessageResponse::new("Risk deleted successfully")))
}
