// irms-backend/src/api/handlers/task_handler.rs

use super::UuidPath;
use crate::api::dto::common::{MessageResponse, PaginationQuery};
use crate::api::dto::task_dto::{CreateTaskDto, TaskFilterDto, UpdateTaskDto};
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
        .route("/tasks", get(list_tasks_handler).post(create_task_handler))
        .route(
            "/tasks/{id}",
            get(get_task_handler)
                .patch(update_task_handler)
                .delete(delete_task_handler),
        )
}

pub async fn list_tasks_handler(
    State(app_state): State<AppState>,
    user: AuthenticatedUser,
    Query(pagination): Query<PaginationQuery>,
    Query(filter): Query<TaskFilterDto>,
) -> AppResult<impl IntoResponse> {
    let (page, limit) = pagination.get_pagination();
    let tasks = app_state
        .task_service
        .list_tasks(user.user(), &filter, page, limit)
        .await?;
    Ok(Json(tasks))
}

pub async fn get_task_handler(
    State(app_state): State<AppState>,
    user: AuthenticatedUser,
    UuidPath(id): UuidPath,
) -> AppResult<impl IntoResponse> {
    let task = app_state.task_service.get_task(user.user(), id).await?;
    Ok(Json(task))
}

pub async fn create_task_handler(
    State(app_state): State<AppState>,
    user: AuthenticatedUser,
    Json(payload): Json<CreateTaskDto>,
) -> AppResult<impl IntoResponse> {
    payload.validate()?;
    let task = app_state
        .task_service
        .create_task(user.user(), payload)
        .await?;
    Ok((StatusCode::CREATED, Json(task)))
}

pub async fn update_task_handler(
    State(app_state): State<AppState>,
    user: AuthenticatedUser,
    UuidPath(id): UuidPath,
    Json(payload): Json<UpdateTaskDto>,
) -> AppResult<impl IntoResponse> {
    payload.validate()?;
    let task = app_state
        .task_service
        .update_task(user.user(), id, payload)
        .await?;
    Ok(Json(task))
}

pub async fn delete_task_handler(
    State(app_state): State<AppState>,
    user: AuthenticatedUser,
    UuidPath(id): UuidPath,
) -> AppResult<impl IntoResponse> {
    app_state.task_service.delete_task(user.user(), id).await?;
    Ok(Json(MessageResponse::new("Task deleted successfully")))
}
