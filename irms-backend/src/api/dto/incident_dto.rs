// irms-backend/src/api/dto/incident_dto.rs

use super::comment_dto::CommentResponse;
use super::common::{NamedRef, UserRef};
use super::task_dto::TaskResponse;
use crate::domain::incident_model::Model as IncidentModel;
use crate::domain::incident_status::{IncidentStatus, Severity};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;
use validator::Validate;

#[derive(Debug, Clone, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct CreateIncidentDto {
    #[validate(length(min = 5, max = 200, message = "Title must be 5 to 200 characters"))]
    pub title: String,

    #[validate(length(
        min = 20,
        max = 5000,
        message = "Description must be 20 to 5000 characters"
    ))]
    pub description: String,

    #[serde(default)]
    pub severity: Severity,

    pub category_id: Option<Uuid>,

    pub department_id: Uuid,

    #[serde(default = "Utc::now")]
    pub occurred_at: DateTime<Utc>,
}

/// 部分更新。status/assignedToIdはロールによってはサイレントに破棄される
#[derive(Debug, Clone, Default, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct UpdateIncidentDto {
    #[validate(length(min = 5, max = 200, message = "Title must be 5 to 200 characters"))]
    pub title: Option<String>,

    #[validate(length(
        min = 20,
        max = 5000,
        message = "Description must be 20 to 5000 characters"
    ))]
    pub description: Option<String>,

    pub status: Option<IncidentStatus>,

    pub severity: Option<Severity>,

    #[serde(default, deserialize_with = "super::double_option")]
    pub category_id: Option<Option<Uuid>>,

    #[serde(default, deserialize_with = "super::double_option")]
    pub assigned_to_id: Option<Option<Uuid>>,

    #[serde(default, deserialize_with = "super::double_option")]
    pub ai_summary: Option<Option<String>>,

    pub ai_severity_suggestion: Option<Severity>,

    #[serde(default, deserialize_with = "super::double_option")]
    pub ai_recommended_actions: Option<Option<String>>,
}

impl UpdateIncidentDto {
    /// ステータスと担当者割り当てを落とした複製を返す。
    /// マネージャー権限のない更新者のペイロードはこれを通してから適用される
    /// （エラーにはしない）
    pub fn without_assignment_fields(self) -> Self {
        Self {
            status: None,
            assigned_to_id: None,
            ..self
        }
    }

    /// 更新対象フィールド名の一覧（監査メタデータ用）
    pub fn changed_fields(&self) -> Vec<&'static str> {
        let mut fields = Vec::new();
        if self.title.is_some() {
            fields.push("title");
        }
        if self.description.is_some() {
            fields.push("description");
        }
        if self.status.is_some() {
            fields.push("status");
        }
        if self.severity.is_some() {
            fields.push("severity");
        }
        if self.category_id.is_some() {
            fields.push("categoryId");
        }
        if self.assigned_to_id.is_some() {
            fields.push("assignedToId");
        }
        if self.ai_summary.is_some() {
            fields.push("aiSummary");
        }
        if self.ai_severity_suggestion.is_some() {
            fields.push("aiSeveritySuggestion");
        }
        if self.ai_recommended_actions.is_some() {
            fields.push("aiRecommendedActions");
        }
        fields
    }
}

/// 一覧取得のフィルタ
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct IncidentFilterDto {
    pub status: Option<IncidentStatus>,
    pub severity: Option<Severity>,
    pub department_id: Option<Uuid>,
    pub category_id: Option<Uuid>,
    pub reported_by_id: Option<Uuid>,
    pub assigned_to_id: Option<Uuid>,
    pub search: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct IncidentResponse {
    pub id: Uuid,
    pub title: String,
    pub description: String,
    pub status: IncidentStatus,
    pub severity: Severity,
    pub category_id: Option<Uuid>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub category: Option<NamedRef>,
    pub department_id: Uuid,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub department: Option<NamedRef>,
    pub reported_by_id: Uuid,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub reported_by: Option<UserRef>,
    pub assigned_to_id: Option<Uuid>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub assigned_to: Option<UserRef>,
    pub occurred_at: DateTime<Utc>,
    pub resolved_at: Option<DateTime<Utc>>,
    pub ai_summary: Option<String>,
    pub ai_severity_suggestion: Option<String>,
    pub ai_recommended_actions: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl IncidentResponse {
    pub fn from_model(
        model: &IncidentModel,
        status: IncidentStatus,
        severity: Severity,
    ) -> Self {
        Self {
            id: model.id,
            title: model.title.clone(),
            description: model.description.clone(),
            status,
            severity,
            category_id: model.category_id,
            category: None,
            department_id: model.department_id,
            department: None,
            reported_by_id: model.reported_by_id,
            reported_by: None,
            assigned_to_id: model.assigned_to_id,
            assigned_to: None,
            occurred_at: model.occurred_at,
            resolved_at: model.resolved_at,
            ai_summary: model.ai_summary.clone(),
            ai_severity_suggestion: model.ai_severity_suggestion.clone(),
            ai_recommended_actions: model.ai_recommended_actions.clone(),
            created_at: model.created_at,
            updated_at: model.updated_at,
        }
    }
}

/// 詳細取得用。関連タスクとコメントを含む
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct IncidentDetailResponse {
    #[serde(flatten)]
    pub incident: IncidentResponse,
    pub tasks: Vec<TaskResponse>,
    pub comments: Vec<CommentResponse>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_create_defaults() {
        let dto: CreateIncidentDto = serde_json::from_value(json!({
            "title": "Production outage",
            "description": "The primary database cluster went down during peak hours.",
            "departmentId": Uuid::new_v4()
        }))
        .unwrap();
        assert!(dto.validate().is_ok());
        assert_eq!(dto.severity, Severity::Medium);
    }

    #[test]
    fn test_create_length_bounds() {
        let dto: CreateIncidentDto = serde_json::from_value(json!({
            "title": "x",
            "description": "too short",
            "departmentId": Uuid::new_v4()
        }))
        .unwrap();
        let errors = dto.validate().unwrap_err();
        assert!(errors.field_errors().contains_key("title"));
        assert!(errors.field_errors().contains_key("description"));
    }

    #[test]
    fn test_update_changed_fields() {
        let dto: UpdateIncidentDto = serde_json::from_value(json!({
            "status": "RESOLVED",
            "assignedToId": Uuid::new_v4()
        }))
        .unwrap();
        let fields = dto.changed_fields();
        assert!(fields.contains(&"status"));
        assert!(fields.contains(&"assignedToId"));
        assert!(!fields.contains(&"title"));
    }

    /// statusとassignedToIdの両方を含むペイロードも、剥ぎ取り後は
    /// 許可されたフィールドだけが残る
    #[test]
    fn test_without_assignment_fields_strips_only_restricted() {
        let dto: UpdateIncidentDto = serde_json::from_value(json!({
            "title": "Updated title from employee",
            "status": "CLOSED",
            "assignedToId": Uuid::new_v4(),
            "severity": "HIGH"
        }))
        .unwrap();

        let stripped = dto.without_assignment_fields();
        assert!(stripped.status.is_none());
        assert!(stripped.assigned_to_id.is_none());
        assert_eq!(stripped.title.as_deref(), Some("Updated title from employee"));
        assert_eq!(stripped.severity, Some(Severity::High));
    }

    #[test]
    fn test_invalid_status_rejected() {
        let result = serde_json::from_value::<UpdateIncidentDto>(json!({
            "status": "EXPLODED"
        }));
        assert!(result.is_err());
    }
}
