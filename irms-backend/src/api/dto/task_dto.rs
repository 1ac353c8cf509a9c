// irms-backend/src/api/dto/task_dto.rs

use super::common::{NamedRef, UserRef};
use crate::domain::task_model::Model as TaskModel;
use crate::domain::task_status::TaskStatus;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;
use validator::{Validate, ValidationError};

/// インシデントとリスクの両方に紐づくタスクは拒否する
fn validate_single_relation(dto: &CreateTaskDto) -> Result<(), ValidationError> {
    if dto.related_incident_id.is_some() && dto.related_risk_id.is_some() {
        let mut error = ValidationError::new("single_relation");
        error.message =
            Some("A task may reference at most one of relatedIncidentId/relatedRiskId".into());
        return Err(error);
    }
    Ok(())
}

#[derive(Debug, Clone, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
#[validate(schema(function = "validate_single_relation"))]
pub struct CreateTaskDto {
    #[validate(length(min = 3, max = 200, message = "Title must be 3 to 200 characters"))]
    pub title: String,

    #[validate(length(max = 2000, message = "Description must be 2000 characters or less"))]
    pub description: Option<String>,

    pub related_incident_id: Option<Uuid>,

    pub related_risk_id: Option<Uuid>,

    pub assigned_to_id: Uuid,

    pub due_date: Option<DateTime<Utc>>,
}

/// 部分更新。従業員はstatus以外のフィールドをサイレントに破棄される
#[derive(Debug, Clone, Default, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct UpdateTaskDto {
    #[validate(length(min = 3, max = 200, message = "Title must be 3 to 200 characters"))]
    pub title: Option<String>,

    #[validate(length(max = 2000, message = "Description must be 2000 characters or less"))]
    pub description: Option<String>,

    pub status: Option<TaskStatus>,

    pub assigned_to_id: Option<Uuid>,

    #[serde(default, deserialize_with = "super::double_option")]
    pub due_date: Option<Option<DateTime<Utc>>>,
}

impl UpdateTaskDto {
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
        if self.assigned_to_id.is_some() {
            fields.push("assignedToId");
        }
        if self.due_date.is_some() {
            fields.push("dueDate");
        }
        fields
    }

    /// ステータス以外のフィールドを落とした複製を返す
    pub fn status_only(&self) -> Self {
        Self {
            status: self.status,
            ..Default::default()
        }
    }
}

/// 一覧取得のフィルタ
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TaskFilterDto {
    pub status: Option<TaskStatus>,
    pub assigned_to_id: Option<Uuid>,
    pub related_incident_id: Option<Uuid>,
    pub related_risk_id: Option<Uuid>,
    #[serde(default)]
    pub my_tasks: bool,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TaskResponse {
    pub id: Uuid,
    pub title: String,
    pub description: Option<String>,
    pub status: TaskStatus,
    pub assigned_to_id: Uuid,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub assigned_to: Option<UserRef>,
    pub related_incident_id: Option<Uuid>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub related_incident: Option<NamedRef>,
    pub related_risk_id: Option<Uuid>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub related_risk: Option<NamedRef>,
    pub due_date: Option<DateTime<Utc>>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl TaskResponse {
    pub fn from_model(model: &TaskModel, status: TaskStatus) -> Self {
        Self {
            id: model.id,
            title: model.title.clone(),
            description: model.description.clone(),
            status,
            assigned_to_id: model.assigned_to_id,
            assigned_to: None,
            related_incident_id: model.related_incident_id,
            related_incident: None,
            related_risk_id: model.related_risk_id,
            related_risk: None,
            due_date: model.due_date,
            created_at: model.created_at,
            updated_at: model.updated_at,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_task_with_both_relations_rejected() {
        let dto: CreateTaskDto = serde_json::from_value(json!({
            "title": "Investigate root cause",
            "assignedToId": Uuid::new_v4(),
            "relatedIncidentId": Uuid::new_v4(),
            "relatedRiskId": Uuid::new_v4()
        }))
        .unwrap();
        assert!(dto.validate().is_err());
    }

    #[test]
    fn test_task_with_single_relation_accepted() {
        let dto: CreateTaskDto = serde_json::from_value(json!({
            "title": "Investigate root cause",
            "assignedToId": Uuid::new_v4(),
            "relatedIncidentId": Uuid::new_v4()
        }))
        .unwrap();
        assert!(dto.validate().is_ok());
    }

    #[test]
    fn test_task_with_no_relation_accepted() {
        let dto: CreateTaskDto = serde_json::from_value(json!({
            "title": "Quarterly review",
            "assignedToId": Uuid::new_v4()
        }))
        .unwrap();
        assert!(dto.validate().is_ok());
    }

    #[test]
    fn test_status_only_strips_other_fields() {
        let dto: UpdateTaskDto = serde_json::from_value(json!({
            "title": "Hijacked title",
            "status": "DONE",
            "assignedToId": Uuid::new_v4()
        }))
        .unwrap();

        let stripped = dto.status_only();
        assert_eq!(stripped.status, Some(TaskStatus::Done));
        assert!(stripped.title.is_none());
        assert!(stripped.assigned_to_id.is_none());
        assert!(stripped.due_date.is_none());
    }
}
