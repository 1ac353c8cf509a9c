use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

// 一覧取得とスコープフィルタで多用されるカラムにインデックスを張る
#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_index(
                Index::create()
                    .name("idx_incidents_department_id")
                    .table(Alias::new("incidents"))
                    .col(Alias::new("department_id"))
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx_incidents_reported_by_id")
                    .table(Alias::new("incidents"))
                    .col(Alias::new("reported_by_id"))
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx_incidents_assigned_to_id")
                    .table(Alias::new("incidents"))
                    .col(Alias::new("assigned_to_id"))
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx_incidents_status")
                    .table(Alias::new("incidents"))
                    .col(Alias::new("status"))
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx_risks_department_id")
                    .table(Alias::new("risks"))
                    .col(Alias::new("department_id"))
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx_risks_owner_id")
                    .table(Alias::new("risks"))
                    .col(Alias::new("owner_id"))
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx_tasks_assigned_to_id")
                    .table(Alias::new("tasks"))
                    .col(Alias::new("assigned_to_id"))
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx_tasks_due_date")
                    .table(Alias::new("tasks"))
                    .col(Alias::new("due_date"))
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx_comments_incident_id")
                    .table(Alias::new("comments"))
                    .col(Alias::new("incident_id"))
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx_comments_risk_id")
                    .table(Alias::new("comments"))
                    .col(Alias::new("risk_id"))
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx_audit_logs_entity")
                    .table(Alias::new("audit_logs"))
                    .col(Alias::new("entity_type"))
                    .col(Alias::new("entity_id"))
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx_audit_logs_changed_at")
                    .table(Alias::new("audit_logs"))
                    .col(Alias::new("changed_at"))
                    .to_owned(),
            )
            .await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        for name in [
            "idx_incidents_department_id",
            "idx_incidents_reported_by_id",
            "idx_incidents_assigned_to_id",
            "idx_incidents_status",
            "idx_risks_department_id",
            "idx_risks_owner_id",
            "idx_tasks_assigned_to_id",
            "idx_tasks_due_date",
            "idx_comments_incident_id",
            "idx_comments_risk_id",
            "idx_audit_logs_entity",
            "idx_audit_logs_changed_at",
        ] {
            manager
                .drop_index(Index::drop().name(name).to_owned())
                .await?;
        }
        Ok(())
    }
}
