// irms-backend/src/repository/risk_repository.rs

use crate::api::dto::risk_dto::RiskFilterDto;
use crate::domain::risk_model::{
    self, ActiveModel as RiskActiveModel, Entity as RiskEntity, Model as RiskModel,
};
use crate::utils::permission::AccessScope;
use sea_orm::{entity::*, query::*, DbConn, DbErr};
use uuid::Uuid;

pub struct RiskRepository {
    db: DbConn,
}

impl RiskRepository {
    pub fn new(db: DbConn) -> Self {
        Self { db }
    }

    /// スコープをSQL条件に変換する。リスクの本人スコープは所有者のみ
    fn scope_condition(scope: &AccessScope) -> Condition {
        match scope {
            AccessScope::All => Condition::all(),
            AccessScope::Department(department_id) => {
                Condition::all().add(risk_model::Column::DepartmentId.eq(*department_id))
            }
            AccessScope::Own(user_id) => {
                Condition::all().add(risk_model::Column::OwnerId.eq(*user_id))
            }
        }
    }

    pub async fn find_by_id(&self, id: Uuid) -> Result<Option<RiskModel>, DbErr> {
        RiskEntity::find_by_id(id).one(&self.db).await
    }

    pub async fn find_by_ids(&self, ids: &[Uuid]) -> Result<Vec<RiskModel>, DbErr> {
        if ids.is_empty() {
            return Ok(Vec::new());
        }
        RiskEntity::find()
            .filter(risk_model::Column::Id.is_in(ids.iter().copied()))
            .all(&self.db)
            .await
    }

    pub async fn find_with_filter(
        &self,
        scope: &AccessScope,
        filter: &RiskFilterDto,
        page: u64,
        limit: u64,
    ) -> Result<(Vec<RiskModel>, u64), DbErr> {
        let mut conditions = Condition::all().add(Self::scope_condition(scope));

        if let Some(status) = &filter.status {
            conditions = conditions.add(risk_model::Column::Status.eq(status.as_str()));
        }
        if let Some(likelihood) = &filter.likelihood {
            conditions = conditions.add(risk_model::Column::Likelihood.eq(likelihood.as_str()));
        }
        if let Some(impact) = &filter.impact {
            conditions = conditions.add(risk_model::Column::Impact.eq(impact.as_str()));
        }
        if let Some(department_id) = filter.department_id {
            conditions = conditions.add(risk_model::Column::DepartmentId.eq(department_id));
        }
        if let Some(owner_id) = filter.owner_id {
            conditions = conditions.add(risk_model::Column::OwnerId.eq(owner_id));
        }
        if let Some(search) = &filter.search {
            conditions = conditions.add(
                Condition::any()
                    .add(risk_model::Column::Title.contains(search))
                    .add(risk_model::Column::Description.contains(search)),
            );
        }

        let total = RiskEntity::find()
            .filter(conditions.clone())
            .count(&self.db)
            .await?;
        let risks = RiskEntity::find()
            .filter(conditions)
            .order_by_desc(risk_model::Column::CreatedAt)
            .limit(limit)
            .offset((page - 1) * limit)
            .all(&self.db)
            .await?;

        Ok((risks, total))
    }

    pub async fn insert(&self, active: RiskActiveModel) -> Result<RiskModel, DbErr> {
        active.insert(&self.db).await
    }

    pub async fn update(&self, active: RiskActiveModel) -> Result<RiskModel, DbErr> {
        active.update(&self.db).await
    }

    pub async fn delete_by_id(&self, id: Uuid) -> Result<u64, DbErr> {
        let result = RiskEntity::delete_by_id(id).exec(&self.db).await?;
        Ok(result.rows_affected)
    }

    // --- ダッシュボード用の集計 ---

    pub async fn count_in_scope(&self, scope: &AccessScope) -> Result<u64, DbErr> {
        RiskEntity::find()
            .filter(Self::scope_condition(scope))
            .count(&self.db)
            .await
    }

    pub async fn count_grouped_by_status(
        &self,
        scope: &AccessScope,
    ) -> Result<Vec<(String, i64)>, DbErr> {
        RiskEntity::find()
            .select_only()
            .column(risk_model::Column::Status)
            .column_as(risk_model::Column::Id.count(), "count")
            .filter(Self::scope_condition(scope))
            .group_by(risk_model::Column::Status)
            .into_tuple()
            .all(&self.db)
            .await
    }

    /// 発生可能性×影響度のヒートマップ用集計
    pub async fn count_heatmap(
        &self,
        scope: &AccessScope,
    ) -> Result<Vec<(String, String, i64)>, DbErr> {
        RiskEntity::find()
            .select_only()
            .column(risk_model::Column::Likelihood)
            .column(risk_model::Column::Impact)
            .column_as(risk_model::Column::Id.count(), "count")
            .filter(Self::scope_condition(scope))
            .group_by(risk_model::Column::Likelihood)
            .group_by(risk_model::Column::Impact)
            .into_tuple()
            .all(&self.db)
            .await
    }
}

impl Clone for RiskRepository {
    fn clone(&self) -> Self {
        Self {
            db: self.db.clone(),
        }
    }
}
