// irms-backend/src/repository/audit_log_repository.rs

use crate::domain::audit_log_model::{
    self, ActiveModel as AuditLogActiveModel, Entity as AuditLogEntity, Model as AuditLogModel,
};
use sea_orm::{entity::*, query::*, DbConn, DbErr};
use uuid::Uuid;

pub struct AuditLogRepository {
    db: DbConn,
}

impl AuditLogRepository {
    pub fn new(db: DbConn) -> Self {
        Self { db }
    }

    // 監査ログの作成。書き込み専用で更新・削除のメソッドは存在しない
    pub async fn create(&self, audit_log: AuditLogActiveModel) -> Result<AuditLogModel, DbErr> {
        audit_log.insert(&self.db).await
    }

    // エンティティ種別・IDで絞り込んで取得（ページネーション付き）
    pub async fn find_with_filter(
        &self,
        entity_type: Option<&str>,
        entity_id: Option<Uuid>,
        page: u64,
        limit: u64,
    ) -> Result<(Vec<AuditLogModel>, u64), DbErr> {
        let mut conditions = Condition::all();

        if let Some(entity_type) = entity_type {
            conditions = conditions.add(audit_log_model::Column::EntityType.eq(entity_type));
        }
        if let Some(entity_id) = entity_id {
            conditions = conditions.add(audit_log_model::Column::EntityId.eq(entity_id));
        }

        let total = AuditLogEntity::find()
            .filter(conditions.clone())
            .count(&self.db)
            .await?;
        let logs = AuditLogEntity::find()
            .filter(conditions)
            .order_by_desc(audit_log_model::Column::ChangedAt)
            .limit(limit)
            .offset((page - 1) * limit)
            .all(&self.db)
            .await?;

        Ok((logs, total))
    }
}

impl Clone for AuditLogRepository {
    fn clone(&self) -> Self {
        Self {
            db: self.db.clone(),
        }
    }
}
