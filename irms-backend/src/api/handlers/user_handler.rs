// irms-backend/src/api/handlers/user_handler.rs

use super::UuidPath;
use crate::api::dto::common::{MessageResponse, PaginationQuery};
use crate::api::dto::user_dto::{CreateUserDto, UpdateUserDto, UserFilterDto};
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
        .route("/users", get(list_users_handler).post(create_user_handler))
        .route(
            "/users/{id}",
            get(get_user_handler)
                .patch(update_user_handler)
                .delete(delete_user_handler),
        )
}

pub async fn list_users_handler(
    State(app_state): State<AppState>,
    user: AuthenticatedUser,
    Query(pagination): Query<PaginationQuery>,
    Query(filter): Query<UserFilterDto>,
) -> AppResult<impl IntoResponse> {
    let (page, limit) = pagination.get_pagination();
    let users = app_state
        .user_service
        .list_users(user.user(), &filter, page, limit)
        .await?;
    Ok(Json(users))
}

pub async fn get_user_handler(
    State(app_state): State<AppState>,
    user: AuthenticatedUser,
    UuidPath(id): UuidPath,
) -> AppResult<impl IntoResponse> {
    let response = app_state.user_service.get_user(user.user(), id).await?;
    Ok(Json(response))
}

pub async fn create_user_handler(
    State(app_state): State<AppState>,
    user: AuthenticatedUser,
    Json(payload): Json<CreateUserDto>,
) -> AppResult<impl IntoResponse> {
    payload.validate()?;
    let response = app_state
        .user_service
        .create_user(user.user(), payload)
        .await?;
    Ok((StatusCode::CREATED, Json(response)))
}

pub async fn update_user_handler(
    State(app_state): State<AppState>,
    user: AuthenticatedUser,
    UuidPath(id): UuidPath,
    Json(payload): Json<UpdateUserDto>,
) -> AppResult<impl IntoResponse> {
    payload.validate()?;
    let response = app_state
        .user_service
        .update_user(user.user(), id, payload)
        .await?;
    Ok(Json(response))
}

pub async fn delete_user_handler(
    State(app_state): State<AppState>,
    user: AuthenticatedUser,
    UuidPath(id): UuidPath,
) -> AppResult<impl IntoResponse> {
    app_state.user_service.delete_user(user.user(), id).await?;
    Ok(Json(MessageResponse::new("User deleted successfully")))
}
