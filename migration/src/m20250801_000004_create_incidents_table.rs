use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(Alias::new("incidents"))
                    .if_not_exists()
                    .col(
                        ColumnDef::new(Incident::Id)
                            .uuid()
                            .not_null()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(Incident::Title).string().not_null())
                    .col(ColumnDef::new(Incident::Description).text().not_null())
                    .col(
                        ColumnDef::new(Incident::Status)
                            .string()
                            .not_null()
                            .default("NEW"),
                    )
                    .col(
                        ColumnDef::new(Incident::Severity)
                            .string()
                            .not_null()
                            .default("MEDIUM"),
                    )
                    .col(ColumnDef::new(Incident::CategoryId).uuid())
                    .col(ColumnDef::new(Incident::DepartmentId).uuid().not_null())
                    .col(ColumnDef::new(Incident::ReportedById).uuid().not_null())
                    .col(ColumnDef::new(Incident::AssignedToId).uuid())
                    .col(
                        ColumnDef::new(Incident::OccurredAt)
                            .timestamp_with_time_zone()
                            .not_null(),
                    )
                    .col(ColumnDef::new(Incident::ResolvedAt).timestamp_with_time_zone())
                    .col(ColumnDef::new(Incident::AiSummary).text())
                    .col(ColumnDef::new(Incident::AiSeveritySuggestion).string())
                    .col(ColumnDef::new(Incident::AiRecommendedActions).text())
                    .col(
                        ColumnDef::new(Incident::CreatedAt)
                            .timestamp_with_time_zone()
                            .not_null()
                            .default(Expr::current_timestamp()),
                    )
                    .col(
                        ColumnDef::new(Incident::UpdatedAt)
                            .timestamp_with_time_zone()
                            .not_null()
                            .default(Expr::current_timestamp()),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_incidents_category_id")
                            .from(Alias::new("incidents"), Incident::CategoryId)
                            .to(Alias::new("incident_categories"), Alias::new("id"))
                            .on_delete(ForeignKeyAction::SetNull),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_incidents_department_id")
                            .from(Alias::new("incidents"), Incident::DepartmentId)
                            .to(Alias::new("departments"), Alias::new("id"))
                            .on_delete(ForeignKeyAction::Restrict),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_incidents_reported_by_id")
                            .from(Alias::new("incidents"), Incident::ReportedById)
                            .to(Alias::new("users"), Alias::new("id"))
                            .on_delete(ForeignKeyAction::Restrict),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_incidents_assigned_to_id")
                            .from(Alias::new("incidents"), Incident::AssignedToId)
                            .to(Alias::new("users"), Alias::new("id"))
                            .on_delete(ForeignKeyAction::SetNull),
                    )
                    .to_owned(),
            )
            .await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(Alias::new("incidents")).to_owned())
            .await
    }
}

#[derive(DeriveIden)]
enum Incident {
    Id,
    Title,
    Description,
    Status,
    Severity,
    CategoryId,
    DepartmentId,
    ReportedById,
    AssignedToId,
    OccurredAt,
    ResolvedAt,
    AiSummary,
    AiSeveritySuggestion,
    AiRecommendedActions,
    CreatedAt,
    UpdatedAt,
}
