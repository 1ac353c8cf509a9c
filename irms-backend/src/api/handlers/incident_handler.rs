// irms-backend/src/api/handlers/incident_handler.rs

use super::UuidPath;
use crate::api::dto::common::{MessageResponse, PaginationQuery};
use crate::api::dto::incident_dto::{CreateIncidentDto, IncidentFilterDto, UpdateIncidentDto};
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
use tracing::info;
use validator::Validate;

pub fn router() -> Router<AppState> {
    Router::new()
        .route(
            "/incidents",
            get(list_incidents_handler).post(create_incident_handler),
        )
        .route(
            "/incidents/{id}",
            get(get_incident_handler)
                .patch(update_incident_handler)
                .delete(delete_incident_handler),
        )
}

pub async fn list_incidents_handler(
    State(app_state): State<AppState>,
    user: AuthenticatedUser,
    Query(pagination): Query<PaginationQuery>,
    Query(filter): Query<IncidentFilterDto>,
) -> AppResult<impl IntoResponse> {
    let (page, limit) = pagination.get_pagination();
    let incidents = app_state
        .incident_service
        .list_incidents(user.user(), &filter, page, limit)
        .await?;
    Ok(Json(incidents))
}

pub async fn get_incident_handler(
    State(app_state): State<AppState>,
    user: AuthenticatedUser,
    UuidPath(id): UuidPath,
) -> AppResult<impl IntoResponse> {
    let incident = app_state
        .incident_service
        .get_incident(user.user(), id)
        .await?;
    Ok(Json(incident))
}

pub async fn create_incident_handler(
    State(app_state): State<AppState>,
    user: AuthenticatedUser,
    Json(payload): Json<CreateIncidentDto>,
) -> AppResult<impl IntoResponse> {
    payload.validate()?;

    info!(
        user_id = %user.user().user_id,
        title = %payload.title,
        "Creating incident"
    );

    let incident = app_state
        .incident_service
        .create_incident(user.user(), payload)
        .await?;
    Ok((StatusCode::CREATED, Json(incident)))
}

pub async fn update_incident_handler(
    State(app_state): State<AppState>,
    user: AuthenticatedUser,
    UuidPath(id): UuidPath,
    Json(payload): Json<UpdateIncidentDto>,
) -> AppResult<impl IntoResponse> {
    payload.validate()?;
    let incident = app_state
        .incident_service
        .update_incident(user.user(), id, payload)
        .await?;
    Ok(Json(incident))
}

pub async fn delete_incident_handler(
    State(app_state): State<AppState>,
    user: AuthenticatedUser,
    UuidPath(id): UuidPath,
) -> AppResult<impl IntoResponse> {
    app_state
        .incident_service
        .delete_incident(user.user(), id)
        .await?;
    Ok(Json(MessageResponse::new("Incident deleted successfully")))
}
