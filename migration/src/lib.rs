// migration/src/lib.rs
pub use sea_orm_migration::prelude::*;

// マイグレーションモジュール
mod m20250801_000001_create_departments_table;
mod m20250801_000002_create_incident_categories_table;
mod m20250801_000003_create_users_table;
mod m20250801_000004_create_incidents_table;
mod m20250801_000005_create_risks_table;
mod m20250801_000006_create_tasks_table;
mod m20250801_000007_create_comments_table;
mod m20250801_000008_create_audit_logs_table;
mod m20250801_000009_add_query_indexes;

pub struct Migrator;

#[async_trait::async_trait]
impl MigratorTrait for Migrator {
    fn migrations() -> Vec<Box<dyn MigrationTrait>> {
        vec![
            Box::new(m20250801_000001_create_departments_table::Migration),
            Box::new(m20250801_000002_create_incident_categories_table::Migration),
            Box::new(m20250801_000003_create_users_table::Migration),
            Box::new(m20250801_000004_create_incidents_table::Migration),
            Box::new(m20250801_000005_create_risks_table::Migration),
            Box::new(m20250801_000006_create_tasks_table::Migration),
            Box::new(m20250801_000007_create_comments_table::Migration),
            Box::new(m20250801_000008_create_audit_logs_table::Migration),
            Box::new(m20250801_000009_add_query_indexes::Migration),
        ]
    }
}
