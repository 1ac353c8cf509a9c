// irms-backend/src/api/mod.rs

use crate::config::AppConfig;
use crate::service::ai_service::AiService;
use crate::service::audit_log_service::AuditLogService;
use crate::service::auth_service::AuthService;
use crate::service::comment_service::CommentService;
use crate::service::dashboard_service::DashboardService;
use crate::service::department_service::DepartmentService;
use crate::service::incident_category_service::IncidentCategoryService;
use crate::service::incident_service::IncidentService;
use crate::service::risk_service::RiskService;
use crate::service::task_service::TaskService;
use crate::service::user_service::UserService;
use crate::utils::jwt::JwtManager;
use std::sync::Arc;

pub mod dto;
pub mod handlers;

/// 統一されたアプリケーション状態。
/// ストアハンドルとサービスは起動時に明示的に構築して注入する
#[derive(Clone)]
pub struct AppState {
    pub auth_service: Arc<AuthService>,
    pub user_service: Arc<UserService>,
    pub department_service: Arc<DepartmentService>,
    pub category_service: Arc<IncidentCategoryService>,
    pub incident_service: Arc<IncidentService>,
    pub risk_service: Arc<RiskService>,
    pub task_service: Arc<TaskService>,
    pub comment_service: Arc<CommentService>,
    pub dashboard_service: Arc<DashboardService>,
    pub audit_log_service: Arc<AuditLogService>,
    pub ai_service: Arc<AiService>,
    pub jwt_manager: Arc<JwtManager>,
    pub cookie_config: CookieConfig,
}

/// Cookie設定
#[derive(Clone, Debug)]
pub struct CookieConfig {
    pub session_cookie_name: String,
    pub secure: bool,
    pub http_only: bool,
    pub path: String,
}

impl Default for CookieConfig {
    fn default() -> Self {
        Self {
            session_cookie_name: "session_token".to_string(),
            secure: false,
            http_only: true,
            path: "/".to_string(),
        }
    }
}

impl CookieConfig {
    pub fn from_app_config(app_config: &AppConfig) -> Self {
        Self {
            session_cookie_name: "session_token".to_string(),
            secure: app_config.security.cookie_secure,
            http_only: true,
            path: "/".to_string(),
        }
    }
}
