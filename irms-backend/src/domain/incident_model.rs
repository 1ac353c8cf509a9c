// irms-backend/src/domain/incident_model.rs

use super::incident_status::{IncidentStatus, Severity};
use chrono::{DateTime, Utc};
use sea_orm::entity::prelude::*;
use sea_orm::{ConnectionTrait, DbErr, Set};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "incidents")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,

    pub title: String,

    #[sea_orm(column_type = "Text")]
    pub description: String,

    pub status: String,

    pub severity: String,

    #[sea_orm(nullable)]
    pub category_id: Option<Uuid>,

    pub department_id: Uuid,

    pub reported_by_id: Uuid,

    #[sea_orm(nullable)]
    pub assigned_to_id: Option<Uuid>,

    pub occurred_at: DateTime<Utc>,

    #[sea_orm(nullable)]
    pub resolved_at: Option<DateTime<Utc>>,

    #[sea_orm(column_type = "Text", nullable)]
    pub ai_summary: Option<String>,

    #[sea_orm(nullable)]
    pub ai_severity_suggestion: Option<String>,

    #[sea_orm(column_type = "Text", nullable)]
    pub ai_recommended_actions: Option<String>,

    pub created_at: DateTime<Utc>,

    pub updated_at: DateTime<Utc>,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::incident_category_model::Entity",
        from = "Column::CategoryId",
        to = "super::incident_category_model::Column::Id"
    )]
    Category,

    #[sea_orm(
        belongs_to = "super::department_model::Entity",
        from = "Column::DepartmentId",
        to = "super::department_model::Column::Id"
    )]
    Department,

    #[sea_orm(
        belongs_to = "super::user_model::Entity",
        from = "Column::ReportedById",
        to = "super::user_model::Column::Id"
    )]
    ReportedBy,

    #[sea_orm(
        belongs_to = "super::user_model::Entity",
        from = "Column::AssignedToId",
        to = "super::user_model::Column::Id"
    )]
    AssignedTo,

    #[sea_orm(has_many = "super::task_model::Entity")]
    Tasks,

    #[sea_orm(has_many = "super::comment_model::Entity")]
    Comments,
}

impl Related<super::incident_category_model::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Category.def()
    }
}

impl Related<super::department_model::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Department.def()
    }
}

impl Related<super::user_model::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::ReportedBy.def()
    }
}

impl Related<super::task_model::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Tasks.def()
    }
}

impl Related<super::comment_model::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Comments.def()
    }
}

#[async_trait::async_trait]
impl ActiveModelBehavior for ActiveModel {
    fn new() -> Self {
        Self {
            id: Set(Uuid::new_v4()),
            created_at: Set(Utc::now()),
            updated_at: Set(Utc::now()),
            ..ActiveModelTrait::default()
        }
    }

    async fn before_save<C>(mut self, _db: &C, insert: bool) -> Result<Self, DbErr>
    where
        C: ConnectionTrait,
    {
        if !insert {
            self.updated_at = Set(Utc::now());
        }
        Ok(self)
    }
}

impl Model {
    pub fn status(&self) -> Result<IncidentStatus, String> {
        IncidentStatus::from_str(&self.status)
            .ok_or_else(|| format!("Invalid incident status in database: {}", self.status))
    }

    pub fn severity(&self) -> Result<Severity, String> {
        Severity::from_str(&self.severity)
            .ok_or_else(|| format!("Invalid severity in database: {}", self.severity))
    }
}
