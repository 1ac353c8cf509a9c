// irms-backend/src/api/dto/user_dto.rs

use super::common::NamedRef;
use crate::domain::role::Role;
use crate::domain::user_model::Model as UserModel;
use crate::utils::password::PasswordPolicy;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;
use validator::{Validate, ValidationError};

/// パスワード強度のカスタムバリデーション
pub fn validate_password_complexity(password: &str) -> Result<(), ValidationError> {
    PasswordPolicy::default().check(password).map_err(|e| {
        let mut error = ValidationError::new("password_complexity");
        error.message = Some(e.to_string().into());
        error
    })
}

#[derive(Debug, Clone, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct CreateUserDto {
    #[validate(length(min = 2, max = 100, message = "Name must be 2 to 100 characters"))]
    pub name: String,

    #[validate(email(message = "Invalid email address"))]
    pub email: String,

    #[validate(custom(function = "validate_password_complexity"))]
    pub password: String,

    #[serde(default)]
    pub role: Role,

    pub department_id: Option<Uuid>,
}

#[derive(Debug, Clone, Default, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct UpdateUserDto {
    #[validate(length(min = 2, max = 100, message = "Name must be 2 to 100 characters"))]
    pub name: Option<String>,

    #[validate(email(message = "Invalid email address"))]
    pub email: Option<String>,

    #[validate(custom(function = "validate_password_complexity"))]
    pub password: Option<String>,

    pub role: Option<Role>,

    // フィールド欠落(None)とnull(Some(None))を区別する
    #[serde(default, deserialize_with = "super::double_option")]
    pub department_id: Option<Option<Uuid>>,
}

/// 一覧取得のフィルタ
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UserFilterDto {
    pub role: Option<Role>,
    pub department_id: Option<Uuid>,
    pub search: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UserResponse {
    pub id: Uuid,
    pub name: String,
    pub email: String,
    pub role: Role,
    pub department_id: Option<Uuid>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub department: Option<NamedRef>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl UserResponse {
    /// パスワードハッシュを除いたレスポンスを構築する
    pub fn from_model(model: &UserModel, role: Role, department: Option<NamedRef>) -> Self {
        Self {
            id: model.id,
            name: model.name.clone(),
            email: model.email.clone(),
            role,
            department_id: model.department_id,
            department,
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
    fn test_create_user_validation() {
        let valid: CreateUserDto = serde_json::from_value(json!({
            "name": "Mike Operations Lead",
            "email": "manager.operations@irms.com",
            "password": "GoodPass123",
            "role": "MANAGER"
        }))
        .unwrap();
        assert!(valid.validate().is_ok());
        assert_eq!(valid.role, Role::Manager);

        let weak: CreateUserDto = serde_json::from_value(json!({
            "name": "Weak",
            "email": "weak@irms.com",
            "password": "alllowercase"
        }))
        .unwrap();
        assert!(weak.validate().is_err());
    }

    #[test]
    fn test_create_user_role_defaults_to_employee() {
        let dto: CreateUserDto = serde_json::from_value(json!({
            "name": "Plain User",
            "email": "user@irms.com",
            "password": "GoodPass123"
        }))
        .unwrap();
        assert_eq!(dto.role, Role::Employee);
    }

    #[test]
    fn test_unknown_role_rejected_at_deserialization() {
        let result = serde_json::from_value::<CreateUserDto>(json!({
            "name": "Sneaky",
            "email": "sneaky@irms.com",
            "password": "GoodPass123",
            "role": "SUPERUSER"
        }));
        assert!(result.is_err());
    }

    #[test]
    fn test_update_user_department_null_vs_absent() {
        let absent: UpdateUserDto = serde_json::from_value(json!({"name": "Renamed"})).unwrap();
        assert_eq!(absent.department_id, None);

        let cleared: UpdateUserDto =
            serde_json::from_value(json!({"departmentId": null})).unwrap();
        assert_eq!(cleared.department_id, Some(None));

        let id = Uuid::new_v4();
        let set: UpdateUserDto =
            serde_json::from_value(json!({ "departmentId": id })).unwrap();
        assert_eq!(set.department_id, Some(Some(id)));
    }
}
