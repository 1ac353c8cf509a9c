// irms-backend/src/api/handlers/dashboard_handler.rs

use crate::api::AppState;
use crate::error::AppResult;
use crate::middleware::auth::AuthenticatedUser;
use axum::{
    extract::{Json, State},
    response::IntoResponse,
    routing::get,
    Router,
};

pub fn router() -> Router<AppState> {
    Router::new().route("/dashboard/overview", get(dashboard_overview_handler))
}

pub async fn dashboard_overview_handler(
    State(app_state): State<AppState>,
    user: AuthenticatedUser,
) -> AppResult<impl IntoResponse> {
    let overview = app_state.dashboard_service.overview(user.user()).await?;
    Ok(Json(overview))
}
