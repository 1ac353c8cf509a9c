use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(Alias::new("risks"))
                    .if_not_exists()
                    .col(ColumnDef::new(Risk::Id).uuid().not_null().primary_key())
                    .col(ColumnDef::new(Risk::Title).string().not_null())
                    .col(ColumnDef::new(Risk::Description).text().not_null())
                    .col(ColumnDef::new(Risk::Category).string().not_null())
                    .col(
                        ColumnDef::new(Risk::Likelihood)
                            .string()
                            .not_null()
                            .default("MEDIUM"),
                    )
                    .col(
                        ColumnDef::new(Risk::Impact)
                            .string()
                            .not_null()
                            .default("MEDIUM"),
                    )
                    .col(
                        ColumnDef::new(Risk::Status)
                            .string()
                            .not_null()
                            .default("OPEN"),
                    )
                    .col(ColumnDef::new(Risk::DepartmentId).uuid().not_null())
                    .col(ColumnDef::new(Risk::OwnerId).uuid().not_null())
                    .col(ColumnDef::new(Risk::MitigationPlan).text())
                    .col(ColumnDef::new(Risk::ResolvedAt).timestamp_with_time_zone())
                    .col(ColumnDef::new(Risk::AiMitigationSuggestions).text())
                    .col(
                        ColumnDef::new(Risk::CreatedAt)
                            .timestamp_with_time_zone()
                            .not_null()
                            .default(Expr::current_timestamp()),
                    )
                    .col(
                        ColumnDef::new(Risk::UpdatedAt)
                            .timestamp_with_time_zone()
                            .not_null()
                            .default(Expr::current_timestamp()),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_risks_department_id")
                            .from(Alias::new("risks"), Risk::DepartmentId)
                            .to(Alias::new("departments"), Alias::new("id"))
                            .on_delete(ForeignKeyAction::Restrict),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_risks_owner_id")
                            .from(Alias::new("risks"), Risk::OwnerId)
                            .to(Alias::new("users"), Alias::new("id"))
                            .on_delete(ForeignKeyAction::Restrict),
                    )
                    .to_owned(),
            )
            .await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(Alias::new("risks")).to_owned())
            .await
    }
}

#[derive(DeriveIden)]
enum Risk {
    Id,
    Title,
    Description,
    Category,
    Likelihood,
    Impact,
    Status,
    DepartmentId,
    OwnerId,
    MitigationPlan,
    ResolvedAt,
    AiMitigationSuggestions,
    CreatedAt,
    UpdatedAt,
}
