// irms-backend/src/domain/risk_model.rs

use super::risk_status::{Impact, Likelihood, RiskStatus};
use chrono::{DateTime, Utc};
use sea_orm::entity::prelude::*;
use sea_orm::{ConnectionTrait, DbErr, Set};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "risks")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,

    pub title: String,

    #[sea_orm(column_type = "Text")]
    pub description: String,

    // リスク分類は自由記述（インシデントと違いマスタを持たない）
    pub category: String,

    pub likelihood: String,

    pub impact: String,

    pub status: String,

    pub department_id: Uuid,

    pub owner_id: Uuid,

    #[sea_orm(column_type = "Text", nullable)]
    pub mitigation_plan: Option<String>,

    #[sea_orm(nullable)]
    pub resolved_at: Option<DateTime<Utc>>,

    #[sea_orm(column_type = "Text", nullable)]
    pub ai_mitigation_suggestions: Option<String>,

    pub created_at: DateTime<Utc>,

    pub updated_at: DateTime<Utc>,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::department_model::Entity",
        from = "Column::DepartmentId",
        to = "super::department_model::Column::Id"
    )]
    Department,

    #[sea_orm(
        belongs_to = "super::user_model::Entity",
        from = "Column::OwnerId",
        to = "super::user_model::Column::Id"
    )]
    Owner,

    #[sea_orm(has_many = "super::task_model::Entity")]
    Tasks,

    #[sea_orm(has_many = "super::comment_model::Entity")]
    Comments,
}

impl Related<super::department_model::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Department.def()
    }
}

impl Related<super::user_model::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Owner.def()
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
    pub fn status(&self) -> Result<RiskStatus, String> {
        RiskStatus::from_str(&self.status)
            .ok_or_else(|| format!("Invalid risk status in database: {}", self.status))
    }

    pub fn likelihood(&self) -> Result<Likelihood, String> {
        Likelihood::from_str(&self.likelihood)
            .ok_or_else(|| format!("Invalid likelihood in database: {}", self.likelihood))
    }

    pub fn impact(&self) -> Result<Impact, String> {
        Impact::from_str(&self.impact)
            .ok_or_else(|| format!("Invalid impact in database: {}", self.impact))
    }
}
