// irms-backend/src/api/handlers/category_handler.rs

use super::UuidPath;
use crate::api::dto::category_dto::{CreateCategoryDto, UpdateCategoryDto};
use crate::api::dto::common::{MessageResponse, PaginationQuery};
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
            "/categories",
            get(list_categories_handler).post(create_category_handler),
        )
        .route(
            "/categories/{id}",
            get(get_category_handler)
                .patch(update_category_handler)
                .delete(delete_category_handler),
        )
}

pub async fn list_categories_handler(
    State(app_state): State<AppState>,
    _user: AuthenticatedUser,
    Query(pagination): Query<PaginationQuery>,
) -> AppResult<impl IntoResponse> {
    let (page, limit) = pagination.get_pagination();
    let categories = app_state
        .category_service
        .list_categories(page, limit)
        .await?;
    Ok(Json(categories))
}

pub async fn get_category_handler(
    State(app_state): State<AppState>,
    _user: AuthenticatedUser,
    UuidPath(id): UuidPath,
) -> AppResult<impl IntoResponse> {
    let category = app_state.category_service.get_category(id).await?;
    Ok(Json(category))
}

pub async fn create_category_handler(
    State(app_state): State<AppState>,
    user: AuthenticatedUser,
    Json(payload): Json<CreateCategoryDto>,
) -> AppResult<impl IntoResponse> {
    payload.validate()?;
    let category = app_state
        .category_service
        .create_category(user.user(), payload)
        .await?;
    Ok((StatusCode::CREATED, Json(category)))
}

pub async fn update_category_handler(
    State(app_state): State<AppState>,
    user: AuthenticatedUser,
    UuidPath(id): UuidPath,
    Json(payload): Json<UpdateCategoryDto>,
) -> AppResult<impl IntoResponse> {
    payload.validate()?;
    let category = app_state
        .category_service
        .update_category(user.user(), id, payload)
        .await?;
    Ok(Json(category))
}

pub async fn delete_category_handler(
    State(app_state): State<AppState>,
    user: AuthenticatedUser,
    UuidPath(id): UuidPath,
) -> AppResult<impl IntoResponse> {
    app_state
        .category_service
        .delete_category(user.user(), id)
        .await?;
    Ok(Json(MessageResponse::new("Category deleted successfully")))
}
