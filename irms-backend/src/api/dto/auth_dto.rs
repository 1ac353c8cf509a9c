// irms-backend/src/api/dto/auth_dto.rs

use crate::domain::role::Role;
use crate::domain::user_model::SessionUser;
use serde::{Deserialize, Serialize};
use uuid::Uuid;
use validator::Validate;

/// ログインリクエスト
#[derive(Debug, Clone, Deserialize, Validate)]
pub struct LoginRequest {
    #[validate(email(message = "Invalid email address"))]
    pub email: String,

    #[validate(length(min = 6, message = "Password must be at least 6 characters"))]
    pub password: String,
}

/// 認証済みプリンシパルのレスポンス
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CurrentUserResponse {
    pub id: Uuid,
    pub name: String,
    pub email: String,
    pub role: Role,
    pub department_id: Option<Uuid>,
}

impl From<&SessionUser> for CurrentUserResponse {
    fn from(user: &SessionUser) -> Self {
        Self {
            id: user.user_id,
            name: user.name.clone(),
            email: user.email.clone(),
            role: user.role,
            department_id: user.department_id,
        }
    }
}

/// ログインレスポンス
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoginResponse {
    pub user: CurrentUserResponse,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_login_request_validation() {
        let valid = LoginRequest {
            email: "admin@irms.com".to_string(),
            password: "password123".to_string(),
        };
        assert!(valid.validate().is_ok());

        let bad_email = LoginRequest {
            email: "not-an-email".to_string(),
            password: "password123".to_string(),
        };
        assert!(bad_email.validate().is_err());

        let short_password = LoginRequest {
            email: "admin@irms.com".to_string(),
            password: "short".to_string(),
        };
        assert!(short_password.validate().is_err());
    }

    #[test]
    fn test_current_user_wire_format() {
        let user = SessionUser {
            user_id: Uuid::new_v4(),
            name: "John Admin".to_string(),
            email: "admin@irms.com".to_string(),
            role: Role::Admin,
            department_id: None,
        };
        let json = serde_json::to_value(CurrentUserResponse::from(&user)).unwrap();
        assert_eq!(json["role"], "ADMIN");
        assert!(json.get("departmentId").is_some());
    }
}
