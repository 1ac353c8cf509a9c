// irms-backend/src/service/auth_service.rs

use crate::domain::audit_log_model::{AuditAction, EntityType};
use crate::domain::user_model::SessionUser;
use crate::error::{AppError, AppResult};
use crate::repository::user_repository::UserRepository;
use crate::service::audit_log_service::{AuditLogService, RecordParams};
use crate::utils::jwt::JwtManager;
use crate::utils::password::PasswordManager;
use std::sync::Arc;
use tracing::{info, warn};

pub struct AuthService {
    user_repo: Arc<UserRepository>,
    password_manager: Arc<PasswordManager>,
    jwt_manager: Arc<JwtManager>,
    audit_log_service: Arc<AuditLogService>,
}

impl AuthService {
    pub fn new(
        user_repo: Arc<UserRepository>,
        password_manager: Arc<PasswordManager>,
        jwt_manager: Arc<JwtManager>,
        audit_log_service: Arc<AuditLogService>,
    ) -> Self {
        Self {
            user_repo,
            password_manager,
            jwt_manager,
            audit_log_service,
        }
    }

    /// 資格情報を検証してセッショントークンを発行する。
    /// 未知のメールアドレスとパスワード不一致は呼び出し元から区別できない
    /// （アカウント列挙を防ぐため同一メッセージを返す）
    pub async fn authenticate(
        &self,
        email: &str,
        password: &str,
    ) -> AppResult<(SessionUser, String)> {
        let normalized_email = email.trim().to_lowercase();

        let user = self
            .user_repo
            .find_by_email(&normalized_email)
            .await?
            .ok_or_else(|| {
                warn!(email = %normalized_email, "Login attempt for unknown email");
                AppError::Unauthorized("Invalid email or password".to_string())
            })?;

        self.password_manager
            .verify_password(password, &user.password_hash)
            .map_err(|_| {
                warn!(user_id = %user.id, "Login attempt with wrong password");
                AppError::Unauthorized("Invalid email or password".to_string())
            })?;

        let session_user = SessionUser::from_model(&user)
            .map_err(AppError::InternalServerError)?;

        let token = self
            .jwt_manager
            .generate_session_token(session_user.clone())
            .map_err(|e| AppError::InternalServerError(e.to_string()))?;

        info!(user_id = %session_user.user_id, "User signed in");

        self.audit_log_service
            .record(RecordParams {
                entity_type: EntityType::User,
                entity_id: Some(session_user.user_id),
                action: AuditAction::Login,
                actor_id: session_user.user_id,
                metadata: None,
            })
            .await;

        Ok((session_user, token))
    }

    /// ログアウトを監査ログに記録する（Cookieの破棄はハンドラー側）
    pub async fn logout(&self, actor: &SessionUser) {
        info!(user_id = %actor.user_id, "User signed out");

        self.audit_log_service
            .record(RecordParams {
                entity_type: EntityType::User,
                entity_id: Some(actor.user_id),
                action: AuditAction::Logout,
                actor_id: actor.user_id,
                metadata: None,
            })
            .await;
    }
}
