// irms-backend/src/api/dto/risk_dto.rs

use super::comment_dto::CommentResponse;
use super::common::{NamedRef, UserRef};
use super::task_dto::TaskResponse;
use crate::domain::risk_model::Model as RiskModel;
use crate::domain::risk_status::{Impact, Likelihood, RiskStatus};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;
use validator::Validate;

#[derive(Debug, Clone, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct CreateRiskDto {
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

    #[serde(default)]
    pub likelihood: Likelihood,

    #[serde(default)]
    pub impact: Impact,

    pub department_id: Uuid,

    #[validate(length(max = 5000, message = "Mitigation plan must be 5000 characters or less"))]
    pub mitigation_plan: Option<String>,
}

#[derive(Debug, Clone, Default, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct UpdateRiskDto {
    #[validate(length(min = 5, max = 200, message = "Title must be 5 to 200 characters"))]
    pub title: Option<String>,

    #[validate(length(
        min = 20,
        max = 5000,
        message = "Description must be 20 to 5000 characters"
    ))]
    pub description: Option<String>,

    #[validate(length(min = 2, max = 100, message = "Category must be 2 to 100 characters"))]
    pub category: Option<String>,

    pub likelihood: Option<Likelihood>,

    pub impact: Option<Impact>,

    pub status: Option<RiskStatus>,

    #[serde(default, deserialize_with = "super::double_option")]
    pub mitigation_plan: Option<Option<String>>,

    #[serde(default, deserialize_with = "super::double_option")]
    pub ai_mitigation_suggestions: Option<Option<String>>,
}

impl UpdateRiskDto {
    /// 更新対象フィールド名の一覧（監査メタデータ用）
    pub fn changed_fields(&self) -> Vec<&'static str> {
        let mut fields = Vec::new();
        if self.title.is_some() {
            fields.push("title");
        }
        if self.description.is_some() {
            fields.push("description");
        }
        if self.category.is_some() {
            fields.push("category");
        }
        if self.likelihood.is_some() {
            fields.push("likelihood");
        }
        if self.impact.is_some() {
            fields.push("impact");
        }
        if self.status.is_some() {
            fields.push("status");
        }
        if self.mitigation_plan.is_some() {
            fields.push("mitigationPlan");
        }
        if self.ai_mitigation_suggestions.is_some() {
            fields.push("aiMitigationSuggestions");
        }
        fields
    }
}

/// 一覧取得のフィルタ
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RiskFilterDto {
    pub status: Option<RiskStatus>,
    pub likelihood: Option<Likelihood>,
    pub impact: Option<Impact>,
    pub department_id: Option<Uuid>,
    pub owner_id: Option<Uuid>,
    pub search: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RiskResponse {
    pub id: Uuid,
    pub title: String,
    pub description: String,
    pub category: String,
    pub likelihood: Likelihood,
    pub impact: Impact,
    pub status: RiskStatus,
    pub department_id: Uuid,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub department: Option<NamedRef>,
    pub owner_id: Uuid,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub owner: Option<UserRef>,
    pub mitigation_plan: Option<String>,
    pub resolved_at: Option<DateTime<Utc>>,
    pub ai_mitigation_suggestions: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl RiskResponse {
    pub fn from_model(
        model: &RiskModel,
        status: RiskStatus,
        likelihood: Likelihood,
        impact: Impact,
    ) -> Self {
        Self {
            id: model.id,
            title: model.title.clone(),
            description: model.description.clone(),
            category: model.category.clone(),
            likelihood,
            impact,
            status,
            department_id: model.department_id,
            department: None,
            owner_id: model.owner_id,
            owner: None,
            mitigation_plan: model.mitigation_plan.clone(),
            resolved_at: model.resolved_at,
            ai_mitigation_suggestions: model.ai_mitigation_suggestions.clone(),
            created_at: model.created_at,
            updated_at: model.updated_at,
        }
    }
}

/// 詳細取得用。関連タスクとコメントを含む
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RiskDetailResponse {
    #[serde(flatten)]
    pub risk: RiskResponse,
    pub tasks: Vec<TaskResponse>,
    pub comments: Vec<CommentResponse>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_create_defaults() {
        let dto: CreateRiskDto = serde_json::from_value(json!({
            "title": "Vendor lock-in risk",
            "description": "A single cloud provider hosts all production workloads today.",
            "category": "Operational",
            "departmentId": Uuid::new_v4()
        }))
        .unwrap();
        assert!(dto.validate().is_ok());
        assert_eq!(dto.likelihood, Likelihood::Medium);
        assert_eq!(dto.impact, Impact::Medium);
    }

    #[test]
    fn test_update_changed_fields() {
        let dto: UpdateRiskDto = serde_json::from_value(json!({
            "status": "MITIGATED",
            "mitigationPlan": null
        }))
        .unwrap();
        let fields = dto.changed_fields();
        assert!(fields.contains(&"status"));
        assert!(fields.contains(&"mitigationPlan"));
        assert_eq!(dto.mitigation_plan, Some(None));
    }
}
