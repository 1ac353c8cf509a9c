// irms-backend/src/api/handlers/department_handler.rs

use super::UuidPath;
use crate::api::dto::common::{MessageResponse, PaginationQuery};
use crate::api::dto::department_dto::{CreateDepartmentDto, UpdateDepartmentDto};
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
        .route(
            "/departments",
            get(list_departments_handler).post(create_department_handler),
        )
        .route(
            "/departments/{id}",
            get(get_department_handler)
                .patch(update_department_handler)
                .delete(delete_department_handler),
        )
}

pub async fn list_departments_handler(
    State(app_state): State<AppState>,
    _user: AuthenticatedUser,
    Query(pagination): Query<PaginationQuery>,
) -> AppResult<impl IntoResponse> {
    let (page, limit) = pagination.get_pagination();
    let departments = app_state
        .department_service
        .list_departments(page, limit)
        .await?;
    Ok(Json(departments))
}

pub async fn get_department_handler(
    State(app_state): State<AppState>,
    _user: AuthenticatedUser,
    UuidPath(id): UuidPath,
) -> AppResult<impl IntoResponse> {
    let department = app_state.department_service.get_department(id).await?;
    Ok(Json(department))
}

pub async fn create_department_handler(
    State(app_state): State<AppState>,
    user: AuthenticatedUser,
    Json(payload): Json<CreateDepartmentDto>,
) -> AppResult<impl IntoResponse> {
    payload.validate()?;
    let department = app_state
        .department_service
        .create_department(user.user(), payload)
        .await?;
    Ok((StatusCode::CREATED, Json(department)))
}

pub async fn update_department_handler(
    State(app_state): State<AppState>,
    user: AuthenticatedUser,
    UuidPath(id): UuidPath,
    Json(payload): Json<UpdateDepartmentDto>,
) -> AppResult<impl IntoResponse> {
    payload.validate()?;
    let department = app_state
        .department_service
        .update_department(user.user(), id, payload)
        .await?;
    Ok(Json(department))
}

pub async fn delete_department_handler(
    State(app_state): State<AppState>,
    user: AuthenticatedUser,
    UuidPath(id): UuidPath,
) -> AppResult<impl IntoResponse> {
    app_state
        .department_service
        .delete_department(user.user(), id)
        .await?;
    Ok(Json(MessageResponse::new("Department deleted successfully")))
}
