// irms-backend/src/repository/incident_repository.rs

use crate::api::dto::incident_dto::IncidentFilterDto;
use crate::domain::incident_model::{
    self, ActiveModel as IncidentActiveModel, Entity as IncidentEntity, Model as IncidentModel,
};
use crate::utils::permission::AccessScope;
use sea_orm::{entity::*, query::*, DbConn, DbErr};
use uuid::Uuid;

pub struct IncidentRepository {
    db: DbConn,
}

impl IncidentRepository {
    pub fn new(db: DbConn) -> Self {
        Self { db }
    }

    /// スコープをSQL条件に変換する。取得後のフィルタリングは行わない
    fn scope_condition(scope: &AccessScope) -> Condition {
        match scope {
            AccessScope::All => Condition::all(),
            AccessScope::Department(department_id) => Condition::all()
                .add(incident_model::Column::DepartmentId.eq(*department_id)),
            AccessScope::Own(user_id) => Condition::any()
                .add(incident_model::Column::ReportedById.eq(*user_id))
                .add(incident_model::Column::AssignedToId.eq(*user_id)),
        }
    }

    pub async fn find_by_id(&self, id: Uuid) -> Result<Option<IncidentModel>, DbErr> {
        IncidentEntity::find_by_id(id).one(&self.db).await
    }

    pub async fn find_by_ids(&self, ids: &[Uuid]) -> Result<Vec<IncidentModel>, DbErr> {
        if ids.is_empty() {
            return Ok(Vec::new());
        }
        IncidentEntity::find()
            .filter(incident_model::Column::Id.is_in(ids.iter().copied()))
            .all(&self.db)
            .await
    }

    pub async fn find_with_filter(
        &self,
        scope: &AccessScope,
        filter: &IncidentFilterDto,
        page: u64,
        limit: u64,
    ) -> Result<(Vec<IncidentModel>, u64), DbErr> {
        let mut conditions = Condition::all().add(Self::scope_condition(scope));

        if let Some(status) = &filter.status {
            conditions = conditions.add(incident_model::Column::Status.eq(status.as_str()));
        }
        if let Some(severity) = &filter.severity {
            conditions = conditions.add(incident_model::Column::Severity.eq(severity.as_str()));
        }
        if let Some(department_id) = filter.department_id {
            conditions = conditions.add(incident_model::Column::DepartmentId.eq(department_id));
        }
        if let Some(category_id) = filter.category_id {
            conditions = conditions.add(incident_model::Column::CategoryId.eq(category_id));
        }
        if let Some(reported_by_id) = filter.reported_by_id {
            conditions = conditions.add(incident_model::Column::ReportedById.eq(reported_by_id));
        }
        if let Some(assigned_to_id) = filter.assigned_to_id {
            conditions = conditions.add(incident_model::Column::AssignedToId.eq(assigned_to_id));
        }
        if let Some(search) = &filter.search {
            conditions = conditions.add(
                Condition::any()
                    .add(incident_model::Column::Title.contains(search))
                    .add(incident_model::Column::Description.contains(search)),
            );
        }

        let total = IncidentEntity::find()
            .filter(conditions.clone())
            .count(&self.db)
            .await?;
        let incidents = IncidentEntity::find()
            .filter(conditions)
            .order_by_desc(incident_model::Column::CreatedAt)
            .limit(limit)
            .offset((page - 1) * limit)
            .all(&self.db)
            .await?;

        Ok((incidents, total))
    }

    pub async fn insert(&self, active: IncidentActiveModel) -> Result<IncidentModel, DbErr> {
        active.insert(&self.db).await
    }

    pub async fn update(&self, active: IncidentActiveModel) -> Result<IncidentModel, DbErr> {
        active.update(&self.db).await
    }

    pub async fn delete_by_id(&self, id: Uuid) -> Result<u64, DbErr> {
        let result = IncidentEntity::delete_by_id(id).exec(&self.db).await?;
        Ok(result.rows_affected)
    }

    // --- ダッシュボード用の集計 ---

    pub async fn count_in_scope(&self, scope: &AccessScope) -> Result<u64, DbErr> {
        IncidentEntity::find()
            .filter(Self::scope_condition(scope))
            .count(&self.db)
            .await
    }

    pub async fn count_grouped_by_status(
        &self,
        scope: &AccessScope,
    ) -> Result<Vec<(String, i64)>, DbErr> {
        IncidentEntity::find()
            .select_only()
            .column(incident_model::Column::Status)
            .column_as(incident_model::Column::Id.count(), "count")
            .filter(Self::scope_condition(scope))
            .group_by(incident_model::Column::Status)
            .into_tuple()
            .all(&self.db)
            .await
    }

    pub async fn count_grouped_by_severity(
        &self,
        scope: &AccessScope,
    ) -> Result<Vec<(String, i64)>, DbErr> {
        IncidentEntity::find()
            .select_only()
            .column(incident_model::Column::Severity)
            .column_as(incident_model::Column::Id.count(), "count")
            .filter(Self::scope_condition(scope))
            .group_by(incident_model::Column::Severity)
            .into_tuple()
            .all(&self.db)
            .await
    }

    pub async fn count_grouped_by_department(&self) -> Result<Vec<(Uuid, i64)>, DbErr> {
        IncidentEntity::find()
            .select_only()
            .column(incident_model::Column::DepartmentId)
            .column_as(incident_model::Column::Id.count(), "count")
            .group_by(incident_model::Column::DepartmentId)
            .into_tuple()
            .all(&self.db)
            .await
    }

    pub async fn find_recent(
        &self,
        scope: &AccessScope,
        limit: u64,
    ) -> Result<Vec<IncidentModel>, DbErr> {
        IncidentEntity::find()
            .filter(Self::scope_condition(scope))
            .order_by_desc(incident_model::Column::CreatedAt)
            .limit(limit)
            .all(&self.db)
            .await
    }
}

impl Clone for IncidentRepository {
    fn clone(&self) -> Self {
        Self {
            db: self.db.clone(),
        }
    }
}
