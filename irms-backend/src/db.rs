// irms-backend/src/db.rs

use crate::config::AppConfig;
use sea_orm::{ConnectOptions, Database, DatabaseConnection, DbErr};
use std::time::Duration;

pub type DbPool = DatabaseConnection;

/// 接続プールを作成する。
/// プールはプロセス起動時にここで明示的に開かれ、終了時にclose_db_poolで閉じる
pub async fn create_db_pool(config: &AppConfig) -> Result<DbPool, DbErr> {
    let mut opt = ConnectOptions::new(config.database_url.clone());

    opt.max_connections(100)
        .min_connections(5)
        .connect_timeout(Duration::from_secs(8))
        .acquire_timeout(Duration::from_secs(8))
        .idle_timeout(Duration::from_secs(8))
        .max_lifetime(Duration::from_secs(8 * 60))
        .sqlx_logging(config.is_development());

    Database::connect(opt).await
}

/// 接続プールを閉じる
pub async fn close_db_pool(pool: DbPool) -> Result<(), DbErr> {
    pool.close().await
}
