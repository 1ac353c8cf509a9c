// irms-backend/src/repository/comment_repository.rs

use crate::domain::comment_model::{
    self, ActiveModel as CommentActiveModel, Entity as CommentEntity, Model as CommentModel,
};
use sea_orm::{entity::*, query::*, DbConn, DbErr};
use uuid::Uuid;

pub struct CommentRepository {
    db: DbConn,
}

impl CommentRepository {
    pub fn new(db: DbConn) -> Self {
        Self { db }
    }

    pub async fn find_by_incident(&self, incident_id: Uuid) -> Result<Vec<CommentModel>, DbErr> {
        CommentEntity::find()
            .filter(comment_model::Column::IncidentId.eq(incident_id))
            .order_by_desc(comment_model::Column::CreatedAt)
            .all(&self.db)
            .await
    }

    pub async fn find_by_risk(&self, risk_id: Uuid) -> Result<Vec<CommentModel>, DbErr> {
        CommentEntity::find()
            .filter(comment_model::Column::RiskId.eq(risk_id))
            .order_by_desc(comment_model::Column::CreatedAt)
            .all(&self.db)
            .await
    }

    pub async fn insert(&self, active: CommentActiveModel) -> Result<CommentModel, DbErr> {
        active.insert(&self.db).await
    }
}

impl Clone for CommentRepository {
    fn clone(&self) -> Self {
        Self {
            db: self.db.clone(),
        }
    }
}
