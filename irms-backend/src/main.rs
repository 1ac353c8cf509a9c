// irms-backend/src/main.rs

use std::sync::Arc;
use tokio::net::TcpListener;
use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use irms_backend::api::handlers::app_router;
use irms_backend::api::{AppState, CookieConfig};
use irms_backend::config::AppConfig;
use irms_backend::db::{close_db_pool, create_db_pool};
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
use migration::{Migrator, MigratorTrait};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // トレーシングの設定
    tracing_subscriber::registry()
        .with(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "irms_backend=info,tower_http=info".into()),
        )
        .with(fmt::layer())
        .init();

    tracing::info!("Starting IRMS backend server...");

    // 設定を読み込む
    let app_config = AppConfig::from_env().expect("Failed to load configuration");
    tracing::info!(environment = %app_config.environment, "Configuration loaded");

    // データベース接続プールを作成（プロセス起動時に開き、終了時に閉じる）
    let db_pool = create_db_pool(&app_config)
        .await
        .expect("Failed to create database pool");
    tracing::info!("Database pool created successfully.");

    // AUTO_MIGRATE=true なら起動時にマイグレーションを適用する
    if std::env::var("AUTO_MIGRATE").map(|v| v == "true").unwrap_or(false) {
        tracing::info!("Running pending migrations");
        Migrator::up(&db_pool, None)
            .await
            .expect("Failed to run migrations");
    }

    // リポジトリの作成
    let user_repo = Arc::new(UserRepository::new(db_pool.clone()));
    let department_repo = Arc::new(DepartmentRepository::new(db_pool.clone()));
    let category_repo = Arc::new(IncidentCategoryRepository::new(db_pool.clone()));
    let incident_repo = Arc::new(IncidentRepository::new(db_pool.clone()));
    let risk_repo = Arc::new(RiskRepository::new(db_pool.clone()));
    let task_repo = Arc::new(TaskRepository::new(db_pool.clone()));
    let comment_repo = Arc::new(CommentRepository::new(db_pool.clone()));
    let audit_log_repo = Arc::new(AuditLogRepository::new(db_pool.clone()));

    // 共有コンポーネント
    let jwt_manager = Arc::new(
        JwtManager::new(JwtConfig::with_secret(app_config.jwt_secret.clone()))
            .expect("Failed to initialize JWT manager"),
    );
    let password_manager = Arc::new(PasswordManager::new());
    let audit_log_service = Arc::new(AuditLogService::new(audit_log_repo));

    // サービスの作成
    let auth_service = Arc::new(AuthService::new(
        user_repo.clone(),
        password_manager.clone(),
        jwt_manager.clone(),
        audit_log_service.clone(),
    ));
    let user_service = Arc::new(UserService::new(
        user_repo.clone(),
        department_repo.clone(),
        password_manager.clone(),
        audit_log_service.clone(),
    ));
    let department_service = Arc::new(DepartmentService::new(
        department_repo.clone(),
        audit_log_service.clone(),
    ));
    let category_service = Arc::new(IncidentCategoryService::new(
        category_repo.clone(),
        audit_log_service.clone(),
    ));
    let incident_service = Arc::new(IncidentService::new(
        incident_repo.clone(),
        department_repo.clone(),
        category_repo.clone(),
        user_repo.clone(),
        task_repo.clone(),
        comment_repo.clone(),
        audit_log_service.clone(),
    ));
    let risk_service = Arc::new(RiskService::new(
        risk_repo.clone(),
        department_repo.clone(),
        user_repo.clone(),
        task_repo.clone(),
        comment_repo.clone(),
        audit_log_service.clone(),
    ));
    let task_service = Arc::new(TaskService::new(
        task_repo.clone(),
        user_repo.clone(),
        incident_repo.clone(),
        risk_repo.clone(),
        audit_log_service.clone(),
    ));
    let comment_service = Arc::new(CommentService::new(
        comment_repo.clone(),
        incident_repo.clone(),
        risk_repo.clone(),
        user_repo.clone(),
        audit_log_service.clone(),
    ));
    let dashboard_service = Arc::new(DashboardService::new(
        incident_repo.clone(),
        risk_repo.clone(),
        task_repo.clone(),
        department_repo.clone(),
        user_repo.clone(),
    ));
    let ai_service = Arc::new(AiService::new(
        AiAdvisoryClient::new(app_config.ai.clone()),
        audit_log_service.clone(),
    ));

    let app_state = AppState {
        auth_service,
        user_service,
        department_service,
        category_service,
        incident_service,
        risk_service,
        task_service,
        comment_service,
        dashboard_service,
        audit_log_service,
        ai_service,
        jwt_manager,
        cookie_config: CookieConfig::from_app_config(&app_config),
    };

    // ルーターの設定
    let app_router = app_router(app_state, &app_config.cors_allowed_origins);

    // サーバーの起動
    let server_addr = app_config.server_addr();
    tracing::info!("Router configured. Server listening on {}", server_addr);

    let listener = TcpListener::bind(&server_addr).await?;
    axum::serve(listener, app_router.into_make_service())
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    // 接続プールを明示的に閉じる
    tracing::info!("Shutting down, closing database pool");
    close_db_pool(db_pool).await?;

    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!(error = %e, "Failed to install shutdown signal handler");
    }
}
