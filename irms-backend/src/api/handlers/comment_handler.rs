// irms-backend/src/api/handlers/comment_handler.rs

use crate::api::dto::comment_dto::{CommentListQuery, CreateCommentDto};
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
    Router::new().route(
        "/comments",
        get(list_comments_handler).post(create_comment_handler),
    )
}

pub async fn list_comments_handler(
    State(app_state): State<AppState>,
    user: AuthenticatedUser,
    Query(query): Query<CommentListQuery>,
) -> AppResult<impl IntoResponse> {
    let comments = app_state
        .comment_service
        .list_comments(user.user(), &query)
        .await?;
    Ok(Json(comments))
}

pub async fn create_comment_handler(
    State(app_state): State<AppState>,
    user: AuthenticatedUser,
    Json(payload): Json<CreateCommentDto>,
) -> AppResult<impl IntoResponse> {
    payload.validate()?;
    let comment = app_state
        .comment_service
        .create_comment(user.user(), payload)
        .await?;
    Ok((StatusCode::CREATED, Json(comment)))
}
