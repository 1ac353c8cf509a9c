// irms-backend/src/domain/task_model.rs

use super::task_status::TaskStatus;
use chrono::{DateTime, Utc};
use sea_orm::entity::prelude::*;
use sea_orm::{ConnectionTrait, DbErr, Set};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "tasks")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,

    pub title: String,

    #[sea_orm(column_type = "Text", nullable)]
    pub description: Option<String>,

    pub status: String,

    pub assigned_to_id: Uuid,

    // インシデントかリスクのどちらか一方にのみ紐づく（両方はバリデーションで拒否）
    #[sea_orm(nullable)]
    pub related_incident_id: Option<Uuid>,

    #[sea_orm(nullable)]
    pub related_risk_id: Option<Uuid>,

    #[sea_orm(nullable)]
    pub due_date: Option<DateTime<Utc>>,

    pub created_at: DateTime<Utc>,

    pub updated_at: DateTime<Utc>,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::user_model::Entity",
        from = "Column::AssignedToId",
        to = "super::user_model::Column::Id"
    )]
    AssignedTo,

    #[sea_orm(
        belongs_to = "super::incident_model::Entity",
        from = "Column::RelatedIncidentId",
        to = "super::incident_model::Column::Id"
    )]
    RelatedIncident,

    #[sea_orm(
        belongs_to = "super::risk_model::Entity",
        from = "Column::RelatedRiskId",
        to = "super::risk_model::Column::Id"
    )]
    RelatedRisk,
}

impl Related<super::user_model::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::AssignedTo.def()
    }
}

impl Related<super::incident_model::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::RelatedIncident.def()
    }
}

impl Related<super::risk_model::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::RelatedRisk.def()
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
    pub fn status(&self) -> Result<TaskStatus, String> {
        TaskStatus::from_str(&self.status)
            .ok_or_else(|| format!("Invalid task status in database: {}", self.status))
    }
}
