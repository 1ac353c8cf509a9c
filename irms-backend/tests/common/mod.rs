// tests/common/mod.rs

use axum::Router;
use irms_backend::api::handlers::app_router;
use irms_backend::api::{AppState, CookieConfig};
use irms_backend::config::AppConfig;
use irms_backend::domain::role::Role;
use irms_backend::domain::user_model::SessionUser;
use irms_backend::repository::audit_log_repository::AuditLogRepository;
use irms_backend::repository::comment_repository::CommentRepository;
use irms_backend::repository::department_repository::DepartmentRepository;
use irms_backend::repository::incident_category_repository::IncidentCategoryRepository;
use irms_backend::repository::incident_repository::IncidentRepository;
use irms_backend::repository::risk_repository::RiskRepository;
use irms_backend::repository::task_repository::TaskRepository;
use irms_backend::repository::user_repository::UserRepository;
use irms_backend::service::ai_service::{AiAdvisoryClient, AiService};
use irms_backend::service::audit_log_service::AuditLogService;
use irms_backend::service::auth_service::AuthService;
use irms_backend::service::comment_service::CommentService;
use irms_backend::service::dashboard_service::DashboardService;
use irms_backend::service::department_service::DepartmentService;
use irms_backend::service::incident_category_service::IncidentCategoryService;
use irms_backend::service::incident_service::IncidentService;
use irms_backend::service::risk_service::RiskService;
use irms_backend::service::task_service::TaskService;
use irms_backend::service::user_service::UserService;
use irms_backend::utils::jwt::{JwtConfig, JwtManager};
use irms_backend::utils::password::PasswordManager;
use sea_orm::DatabaseConnection;
use std::sync::Arc;
use uuid::Uuid;

pub const TEST_JWT_SECRET: &str = "integration-test-secret-key-of-sufficient-length";

/// 認証・認可の層を検証するためのアプリを組み立てる。
/// ストアには未接続ハンドルを使う（ここを通るテストはDBへ到達しない）
pub fn test_app() -> (Router, Arc<JwtManager>) {
    let db_pool = DatabaseConnection::Disconnected;

    let user_repo = Arc::new(UserRepository::new(db_pool.clone()));
    let department_repo = Arc::new(DepartmentRepository::new(db_pool.clone()));
    let category_repo = Arc::new(IncidentCategoryRepository::new(db_pool.clone()));
    let incident_repo = Arc::new(IncidentRepository::new(db_pool.clone()));
    let risk_repo = Arc::new(RiskRepository::new(db_pool.clone()));
    let task_repo = Arc::new(TaskRepository::new(db_pool.clone()));
    let comment_repo = Arc::new(CommentRepository::new(db_pool.clone()));
    let audit_log_repo = Arc::new(AuditLogRepository::new(db_pool.clone()));

    let jwt_manager = Arc::new(
        JwtManager::new(JwtConfig::with_secret(TEST_JWT_SECRET.to_string())).unwrap(),
    );
    let password_manager = Arc::new(PasswordManager::new());
    let audit_log_service = Arc::new(AuditLogService::new(audit_log_repo));

    let app_state = AppState {
        auth_service: Arc::new(AuthService::new(
            user_repo.clone(),
            password_manager.clone(),
            jwt_manager.clone(),
            audit_log_service.clone(),
        )),
        user_service: Arc::new(UserService::new(
            user_repo.clone(),
            department_repo.clone(),
            password_manager,
            audit_log_service.clone(),
        )),
        department_service: Arc::new(DepartmentService::new(
            department_repo.clone(),
            audit_log_service.clone(),
        )),
        category_service: Arc::new(IncidentCategoryService::new(
            category_repo.clone(),
            audit_log_service.clone(),
        )),
        incident_service: Arc::new(IncidentService::new(
            incident_repo.clone(),
            department_repo.clone(),
            category_repo.clone(),
            user_repo.clone(),
            task_repo.clone(),
            comment_repo.clone(),
            audit_log_service.clone(),
        )),
        risk_service: Arc::new(RiskService::new(
            risk_repo.clone(),
            department_repo.clone(),
            user_repo.clone(),
            task_repo.clone(),
            comment_repo.clone(),
            audit_log_service.clone(),
        )),
        task_service: Arc::new(TaskService::new(
            task_repo.clone(),
            user_repo.clone(),
            incident_repo.clone(),
            risk_repo.clone(),
            audit_log_service.clone(),
        )),
        comment_service: Arc::new(CommentService::new(
            comment_repo,
            incident_repo.clone(),
            risk_repo.clone(),
            user_repo.clone(),
            audit_log_service.clone(),
        )),
        dashboard_service: Arc::new(DashboardService::new(
            incident_repo,
            risk_repo,
            task_repo,
            department_repo,
            user_repo,
        )),
        audit_log_service: audit_log_service.clone(),
        ai_service: Arc::new(AiService::new(
            AiAdvisoryClient::new(AppConfig::for_testing().ai),
            audit_log_service,
        )),
        jwt_manager: jwt_manager.clone(),
        cookie_config: CookieConfig::default(),
    };

    let router = app_router(app_state, &["http://localhost:3001".to_string()]);
    (router, jwt_manager)
}

pub fn session_user(role: Role, department_id: Option<Uuid>) -> SessionUser {
    SessionUser {
        user_id: Uuid::new_v4(),
        name: "Test User".to_string(),
        email: "test.user@irms.com".to_string(),
        role,
        department_id,
    }
}

pub fn bearer_token(jwt_manager: &JwtManager, user: SessionUser) -> String {
    jwt_manager.generate_session_token(user).unwrap()
}
