// irms-backend/src/api/handlers/ai_handler.rs

use crate::api::dto::ai_dto::{AnalyzeIncidentRequest, SuggestRiskMitigationRequest};
use crate::api::AppState;
use crate::error::AppResult;
use crate::middleware::auth::AuthenticatedUser;
use axum::{
    extract::{Json, State},
    response::IntoResponse,
    routing::post,
    Router,
};
use validator::Validate;

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/ai/incidents/analyze", post(analyze_incident_handler))
        .route("/ai/risks/mitigation", post(suggest_mitigation_handler))
}

/// 助言APIは失敗してもフォールバックを200で返す。
/// エラーになり得るのはバリデーションと認証のみ
pub async fn analyze_incident_handler(
    State(app_state): State<AppState>,
    user: AuthenticatedUser,
    Json(payload): Json<AnalyzeIncidentRequest>,
) -> AppResult<impl IntoResponse> {
    payload.validate()?;
    let analysis = app_state
        .ai_service
        .analyze_incident(user.user(), payload)
        .await;
    Ok(Json(analysis))
}

pub async fn suggest_mitigation_handler(
    State(app_state): State<AppState>,
    user: AuthenticatedUser,
    Json(payload): Json<SuggestRiskMitigationRequest>,
) -> AppResult<impl IntoResponse> {
    payload.validate()?;
    let suggestions = app_state
        .ai_service
        .suggest_risk_mitigation(user.user(), payload)
        .await;
    Ok(Json(suggestions))
}
