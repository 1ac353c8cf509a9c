// irms-backend/src/repository/task_repository.rs

use crate::api::dto::task_dto::TaskFilterDto;
use crate::domain::task_model::{
    self, ActiveModel as TaskActiveModel, Entity as TaskEntity, Model as TaskModel,
};
use crate::domain::task_status::TaskStatus;
use sea_orm::sea_query::NullOrdering;
use sea_orm::{entity::*, query::*, DbConn, DbErr, Order};
use uuid::Uuid;

pub struct TaskRepository {
    db: DbConn,
}

impl TaskRepository {
    pub fn new(db: DbConn) -> Self {
        Self { db }
    }

    pub async fn find_by_id(&self, id: Uuid) -> Result<Option<TaskModel>, DbErr> {
        TaskEntity::find_by_id(id).one(&self.db).await
    }

    /// 一覧取得。assigned_toが指定された場合は担当者で絞り込む
    /// （従業員スコープとmyTasksフィルタの両方がここを通る）
    pub async fn find_with_filter(
        &self,
        assigned_to: Option<Uuid>,
        filter: &TaskFilterDto,
        page: u64,
        limit: u64,
    ) -> Result<(Vec<TaskModel>, u64), DbErr> {
        let mut conditions = Condition::all();

        if let Some(user_id) = assigned_to {
            conditions = conditions.add(task_model::Column::AssignedToId.eq(user_id));
        }
        if let Some(status) = &filter.status {
            conditions = conditions.add(task_model::Column::Status.eq(status.as_str()));
        }
        if let Some(assigned_to_id) = filter.assigned_to_id {
            conditions = conditions.add(task_model::Column::AssignedToId.eq(assigned_to_id));
        }
        if let Some(related_incident_id) = filter.related_incident_id {
            conditions =
                conditions.add(task_model::Column::RelatedIncidentId.eq(related_incident_id));
        }
        if let Some(related_risk_id) = filter.related_risk_id {
            conditions = conditions.add(task_model::Column::RelatedRiskId.eq(related_risk_id));
        }

        let total = TaskEntity::find()
            .filter(conditions.clone())
            .count(&self.db)
            .await?;
        let tasks = TaskEntity::find()
            .filter(conditions)
            .order_by_with_nulls(task_model::Column::DueDate, Order::Asc, NullOrdering::Last)
            .order_by_desc(task_model::Column::CreatedAt)
            .limit(limit)
            .offset((page - 1) * limit)
            .all(&self.db)
            .await?;

        Ok((tasks, total))
    }

    pub async fn find_by_incident(&self, incident_id: Uuid) -> Result<Vec<TaskModel>, DbErr> {
        TaskEntity::find()
            .filter(task_model::Column::RelatedIncidentId.eq(incident_id))
            .order_by_desc(task_model::Column::CreatedAt)
            .all(&self.db)
            .await
    }

    pub async fn find_by_risk(&self, risk_id: Uuid) -> Result<Vec<TaskModel>, DbErr> {
        TaskEntity::find()
            .filter(task_model::Column::RelatedRiskId.eq(risk_id))
            .order_by_desc(task_model::Column::CreatedAt)
            .all(&self.db)
            .await
    }

    pub async fn insert(&self, active: TaskActiveModel) -> Result<TaskModel, DbErr> {
        active.insert(&self.db).await
    }

    pub async fn update(&self, active: TaskActiveModel) -> Result<TaskModel, DbErr> {
        active.update(&self.db).await
    }

    pub async fn delete_by_id(&self, id: Uuid) -> Result<u64, DbErr> {
        let result = TaskEntity::delete_by_id(id).exec(&self.db).await?;
        Ok(result.rows_affected)
    }

    // --- ダッシュボード用の集計 ---

    pub async fn count_for(&self, assigned_to: Option<Uuid>) -> Result<u64, DbErr> {
        let mut query = TaskEntity::find();
        if let Some(user_id) = assigned_to {
            query = query.filter(task_model::Column::AssignedToId.eq(user_id));
        }
        query.count(&self.db).await
    }

    pub async fn count_grouped_by_status(
        &self,
        assigned_to: Option<Uuid>,
    ) -> Result<Vec<(String, i64)>, DbErr> {
        let mut query = TaskEntity::find()
            .select_only()
            .column(task_model::Column::Status)
            .column_as(task_model::Column::Id.count(), "count");
        if let Some(user_id) = assigned_to {
            query = query.filter(task_model::Column::AssignedToId.eq(user_id));
        }
        query
            .group_by(task_model::Column::Status)
            .into_tuple()
            .all(&self.db)
            .await
    }

    /// 期日が設定された未完了タスクを期日の近い順に取得
    pub async fn find_upcoming(
        &self,
        assigned_to: Option<Uuid>,
        limit: u64,
    ) -> Result<Vec<TaskModel>, DbErr> {
        let mut conditions = Condition::all()
            .add(task_model::Column::Status.ne(TaskStatus::Done.as_str()))
            .add(task_model::Column::DueDate.is_not_null());
        if let Some(user_id) = assigned_to {
            conditions = conditions.add(task_model::Column::AssignedToId.eq(user_id));
        }

        TaskEntity::find()
            .filter(conditions)
            .order_by_asc(task_model::Column::DueDate)
            .limit(limit)
            .all(&self.db)
            .await
    }
}

impl Clone for TaskRepository {
    fn clone(&self) -> Self {
        Self {
            db: self.db.clone(),
        }
    }
}
