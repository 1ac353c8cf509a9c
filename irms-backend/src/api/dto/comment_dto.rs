// irms-backend/src/api/dto/comment_dto.rs

use super::common::UserRef;
use crate::domain::comment_model::Model as CommentModel;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;
use validator::{Validate, ValidationError};

/// コメントはインシデントかリスクのちょうど一方に紐づく
fn validate_exactly_one_target(dto: &CreateCommentDto) -> Result<(), ValidationError> {
    match (dto.incident_id, dto.risk_id) {
        (Some(_), Some(_)) => {
            let mut error = ValidationError::new("comment_target");
            error.message = Some("A comment may reference only one of incidentId/riskId".into());
            Err(error)
        }
        (None, None) => {
            let mut error = ValidationError::new("comment_target");
            error.message = Some("Either incidentId or riskId must be provided".into());
            Err(error)
        }
        _ => Ok(()),
    }
}

#[derive(Debug, Clone, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
#[validate(schema(function = "validate_exactly_one_target"))]
pub struct CreateCommentDto {
    #[validate(length(min = 1, max = 2000, message = "Comment must be 1 to 2000 characters"))]
    pub body: String,

    pub incident_id: Option<Uuid>,

    pub risk_id: Option<Uuid>,
}

/// コメント取得のクエリ。incidentIdかriskIdのどちらか一方が必須
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CommentListQuery {
    pub incident_id: Option<Uuid>,
    pub risk_id: Option<Uuid>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CommentResponse {
    pub id: Uuid,
    pub body: String,
    pub author_id: Uuid,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub author: Option<UserRef>,
    pub incident_id: Option<Uuid>,
    pub risk_id: Option<Uuid>,
    pub created_at: DateTime<Utc>,
}

impl CommentResponse {
    pub fn from_model(model: &CommentModel) -> Self {
        Self {
            id: model.id,
            body: model.body.clone(),
            author_id: model.author_id,
            author: None,
            incident_id: model.incident_id,
            risk_id: model.risk_id,
            created_at: model.created_at,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_comment_requires_exactly_one_target() {
        let both: CreateCommentDto = serde_json::from_value(json!({
            "body": "Looks bad",
            "incidentId": Uuid::new_v4(),
            "riskId": Uuid::new_v4()
        }))
        .unwrap();
        assert!(both.validate().is_err());

        let neither: CreateCommentDto =
            serde_json::from_value(json!({"body": "Orphan comment"})).unwrap();
        assert!(neither.validate().is_err());

        let incident_only: CreateCommentDto = serde_json::from_value(json!({
            "body": "Root cause identified",
            "incidentId": Uuid::new_v4()
        }))
        .unwrap();
        assert!(incident_only.validate().is_ok());
    }

    #[test]
    fn test_empty_body_rejected() {
        let dto: CreateCommentDto = serde_json::from_value(json!({
            "body": "",
            "incidentId": Uuid::new_v4()
        }))
        .unwrap();
        assert!(dto.validate().is_err());
    }
}
