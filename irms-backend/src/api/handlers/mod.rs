// irms-backend/src/api/handlers/mod.rs

pub mod ai_handler;
pub mod audit_log_handler;
pub mod auth_handler;
pub mod category_handler;
pub mod comment_handler;
pub mod dashboard_handler;
pub mod department_handler;
pub mod incident_handler;
pub mod risk_handler;
pub mod system_handler;
pub mod task_handler;
pub mod user_handler;

use crate::api::AppState;
use crate::error::AppError;
use crate::logging;
use axum::{
    extract::{FromRequestParts, Path},
    http::request::Parts,
    middleware, Router,
};
use tower_http::cors::{AllowOrigin, CorsLayer};
use tower_http::timeout::TimeoutLayer;
use uuid::Uuid;

// カスタムUUID抽出器。不正なIDは500ではなくバリデーションエラーで返す
pub struct UuidPath(pub Uuid);

impl<S> FromRequestParts<S> for UuidPath
where
    S: Send + Sync,
{
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let Path(path_str) = Path::<String>::from_request_parts(parts, state)
            .await
            .map_err(|_| AppError::ValidationError("Invalid path parameter".to_string()))?;

        let uuid = Uuid::parse_str(&path_str).map_err(|_| {
            AppError::ValidationError(format!("Invalid UUID format: '{}'", path_str))
        })?;

        Ok(UuidPath(uuid))
    }
}

/// 全エンドポイントを束ねたルーターを構築する
pub fn app_router(state: AppState, cors_allowed_origins: &[String]) -> Router {
    let origins: Vec<axum::http::HeaderValue> = cors_allowed_origins
        .iter()
        .filter_map(|origin| origin.parse().ok())
        .collect();

    let cors = CorsLayer::new()
        .allow_origin(AllowOrigin::list(origins))
        .allow_methods(tower_http::cors::Any)
        .allow_headers(vec![
            axum::http::header::CONTENT_TYPE,
            axum::http::header::AUTHORIZATION,
        ]);

    Router::new()
        .merge(auth_handler::router())
        .merge(user_handler::router())
        .merge(department_handler::router())
        .merge(category_handler::router())
        .merge(incident_handler::router())
        .merge(risk_handler::router())
        .merge(task_handler::router())
        .merge(comment_handler::router())
        .merge(audit_log_handler::router())
        .merge(dashboard_handler::router())
        .merge(ai_handler::router())
        .merge(system_handler::router())
        .layer(middleware::from_fn(logging::logging_middleware))
        .layer(middleware::from_fn(logging::inject_request_context))
        .layer(cors)
        .layer(TimeoutLayer::new(std::time::Duration::from_secs(30)))
        .with_state(state)
}
