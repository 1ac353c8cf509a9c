// irms-backend/src/api/dto/ai_dto.rs

use crate::domain::incident_status::Severity;
use crate::domain::risk_status::{Impact, Likelihood};
use serde::{Deserialize, Serialize};
use validator::Validate;

/// インシデント分析のリクエスト
#[derive(Debug, Clone, Deserialize, Validate)]
pub struct AnalyzeIncidentRequest {
    #[validate(length(min = 5, max = 200, message = "Title must be 5 to 200 characters"))]
    pub title: String,

    #[validate(length(
        min = 20,
        max = 5000,
        message = "Description must be 20 to 5000 characters"
    ))]
    pub description: String,

    pub category: Option<String>,

    pub department: Option<String>,
}

/// インシデント分析の結果。
/// AI呼び出しが失敗した場合も決定的なフォールバックでこの形を満たす
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct IncidentAnalysisResponse {
    pub suggested_severity: Severity,
    pub summary: String,
    pub recommended_actions: Vec<String>,
}

/// リスク低減策提案のリクエスト
#[derive(Debug, Clone, Deserialize, Validate)]
pub struct SuggestRiskMitigationRequest {
    #[validate(length(min = 5, max = 200, message = "Title must be 5 to 200 characters"))]
    pub title: String,

    #[validate(length(
        min = 20,
        max = 5000,
        message = "Description must be 20 to 5000 characters"
    ))]
    pub description: String,

    #[validate(length(min = 2, max = 100, message = "Category must be 2 to 100 characters"))]
    pub category: String,

    pub likelihood: Likelihood,

    pub impact: Impact,
}

/// リスク低減策提案の結果
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RiskMitigationResponse {
    pub mitigation_suggestions: Vec<String>,
}
