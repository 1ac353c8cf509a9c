// irms-backend/src/api/dto/department_dto.rs

use crate::domain::department_model::Model as DepartmentModel;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;
use validator::Validate;

#[derive(Debug, Clone, Deserialize, Validate)]
pub struct CreateDepartmentDto {
    #[validate(length(min = 2, max = 100, message = "Name must be 2 to 100 characters"))]
    pub name: String,

    #[validate(length(max = 500, message = "Description must be 500 characters or less"))]
    pub description: Option<String>,
}

#[derive(Debug, Clone, Default, Deserialize, Validate)]
pub struct UpdateDepartmentDto {
    #[validate(length(min = 2, max = 100, message = "Name must be 2 to 100 characters"))]
    pub name: Option<String>,

    // フィールド欠落(None)とnull(Some(None))を区別する
    #[serde(default, deserialize_with = "super::double_option")]
    pub description: Option<Option<String>>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DepartmentResponse {
    pub id: Uuid,
    pub name: String,
    pub description: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl From<DepartmentModel> for DepartmentResponse {
    fn from(model: DepartmentModel) -> Self {
        Self {
            id: model.id,
            name: model.name,
            description: model.description,
            created_at: model.created_at,
            updated_at: model.updated_at,
        }
    }
}

/// 詳細取得用。依存レコード数を含む
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DepartmentDetailResponse {
    #[serde(flatten)]
    pub department: DepartmentResponse,
    pub counts: DepartmentCounts,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DepartmentCounts {
    pub users: u64,
    pub incidents: u64,
    pub risks: u64,
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_create_validation() {
        let valid = CreateDepartmentDto {
            name: "Engineering".to_string(),
            description: Some("Software development and IT operations".to_string()),
        };
        assert!(valid.validate().is_ok());

        let too_short = CreateDepartmentDto {
            name: "E".to_string(),
            description: None,
        };
        assert!(too_short.validate().is_err());
    }

    #[test]
    fn test_update_description_null_vs_absent() {
        let absent: UpdateDepartmentDto =
            serde_json::from_value(json!({"name": "Ops"})).unwrap();
        assert_eq!(absent.description, None);

        let cleared: UpdateDepartmentDto =
            serde_json::from_value(json!({"description": null})).unwrap();
        assert_eq!(cleared.description, Some(None));
    }
}
