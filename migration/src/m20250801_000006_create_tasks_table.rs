use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(Alias::new("tasks"))
                    .if_not_exists()
                    .col(ColumnDef::new(Task::Id).uuid().not_null().primary_key())
                    .col(ColumnDef::new(Task::Title).string().not_null())
                    .col(ColumnDef::new(Task::Description).text())
                    .col(
                        ColumnDef::new(Task::Status)
                            .string()
                            .not_null()
                            .default("TODO"),
                    )
                    .col(ColumnDef::new(Task::AssignedToId).uuid().not_null())
                    .col(ColumnDef::new(Task::RelatedIncidentId).uuid())
                    .col(ColumnDef::new(Task::RelatedRiskId).uuid())
                    .col(ColumnDef::new(Task::DueDate).timestamp_with_time_zone())
                    .col(
                        ColumnDef::new(Task::CreatedAt)
                            .timestamp_with_time_zone()
                            .not_null()
                            .default(Expr::current_timestamp()),
                    )
                    .col(
                        ColumnDef::new(Task::UpdatedAt)
                            .timestamp_with_time_zone()
                            .not_null()
                            .default(Expr::current_timestamp()),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_tasks_assigned_to_id")
                            .from(Alias::new("tasks"), Task::AssignedToId)
                            .to(Alias::new("users"), Alias::new("id"))
                            .on_delete(ForeignKeyAction::Restrict),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_tasks_related_incident_id")
                            .from(Alias::new("tasks"), Task::RelatedIncidentId)
                            .to(Alias::new("incidents"), Alias::new("id"))
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_tasks_related_risk_id")
                            .from(Alias::new("tasks"), Task::RelatedRiskId)
                            .to(Alias::new("risks"), Alias::new("id"))
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(Alias::new("tasks")).to_owned())
            .await
    }
}

#[derive(DeriveIden)]
enum Task {
    Id,
    Title,
    Description,
    Status,
    AssignedToId,
    RelatedIncidentId,
    RelatedRiskId,
    DueDate,
    CreatedAt,
    UpdatedAt,
}
