// irms-backend/src/repository/department_repository.rs

use super::{CreateOutcome, DeleteOutcome, UpdateOutcome};
use crate::domain::department_model::{
    self, ActiveModel as DepartmentActiveModel, Entity as DepartmentEntity,
    Model as DepartmentModel,
};
use crate::domain::{incident_model, risk_model, user_model};
use sea_orm::{entity::*, query::*, DbConn, DbErr, Set, TransactionTrait};
use uuid::Uuid;

pub struct DepartmentRepository {
    db: DbConn,
}

impl DepartmentRepository {
    pub fn new(db: DbConn) -> Self {
        Self { db }
    }

    pub async fn find_by_id(&self, id: Uuid) -> Result<Option<DepartmentModel>, DbErr> {
        DepartmentEntity::find_by_id(id).one(&self.db).await
    }

    pub async fn find_by_ids(&self, ids: &[Uuid]) -> Result<Vec<DepartmentModel>, DbErr> {
        if ids.is_empty() {
            return Ok(Vec::new());
        }
        DepartmentEntity::find()
            .filter(department_model::Column::Id.is_in(ids.iter().copied()))
            .all(&self.db)
            .await
    }

    pub async fn find_all(
        &self,
        page: u64,
        limit: u64,
    ) -> Result<(Vec<DepartmentModel>, u64), DbErr> {
        let total = DepartmentEntity::find().count(&self.db).await?;
        let departments = DepartmentEntity::find()
            .order_by_asc(department_model::Column::Name)
            .limit(limit)
            .offset((page - 1) * limit)
            .all(&self.db)
            .await?;
        Ok((departments, total))
    }

    /// 依存レコード数を取得する（詳細表示用）
    pub async fn count_dependents(&self, id: Uuid) -> Result<(u64, u64, u64), DbErr> {
        let users = user_model::Entity::find()
            .filter(user_model::Column::DepartmentId.eq(id))
            .count(&self.db)
            .await?;
        let incidents = incident_model::Entity::find()
            .filter(incident_model::Column::DepartmentId.eq(id))
            .count(&self.db)
            .await?;
        let risks = risk_model::Entity::find()
            .filter(risk_model::Column::DepartmentId.eq(id))
            .count(&self.db)
            .await?;
        Ok((users, incidents, risks))
    }

    /// 名前の重複チェックと挿入を同一トランザクションで行う。
    /// 名前の比較は大文字小文字を区別する
    pub async fn create(
        &self,
        name: String,
        description: Option<String>,
    ) -> Result<CreateOutcome<DepartmentModel>, DbErr> {
        let txn = self.db.begin().await?;

        let existing = DepartmentEntity::find()
            .filter(department_model::Column::Name.eq(&name))
            .one(&txn)
            .await?;

        if existing.is_some() {
            txn.rollback().await?;
            return Ok(CreateOutcome::Duplicate);
        }

        let mut active = DepartmentActiveModel::new();
        active.name = Set(name);
        active.description = Set(description);
        let model = active.insert(&txn).await?;

        txn.commit().await?;
        Ok(CreateOutcome::Created(model))
    }

    pub async fn update(
        &self,
        id: Uuid,
        name: Option<String>,
        description: Option<Option<String>>,
    ) -> Result<UpdateOutcome<DepartmentModel>, DbErr> {
        let txn = self.db.begin().await?;

        let Some(existing) = DepartmentEntity::find_by_id(id).one(&txn).await? else {
            txn.rollback().await?;
            return Ok(UpdateOutcome::NotFound);
        };

        if let Some(new_name) = &name {
            let duplicate = DepartmentEntity::find()
                .filter(department_model::Column::Name.eq(new_name))
                .filter(department_model::Column::Id.ne(id))
                .one(&txn)
                .await?;
            if duplicate.is_some() {
                txn.rollback().await?;
                return Ok(UpdateOutcome::Duplicate);
            }
        }

        let mut active: DepartmentActiveModel = existing.into();
        if let Some(new_name) = name {
            active.name = Set(new_name);
        }
        if let Some(new_description) = description {
            active.description = Set(new_description);
        }
        let model = active.update(&txn).await?;

        txn.commit().await?;
        Ok(UpdateOutcome::Updated(model))
    }

    /// 依存レコードの件数チェックと削除を同一トランザクションで行う
    pub async fn delete(&self, id: Uuid) -> Result<DeleteOutcome, DbErr> {
        let txn = self.db.begin().await?;

        let Some(department) = DepartmentEntity::find_by_id(id).one(&txn).await? else {
            txn.rollback().await?;
            return Ok(DeleteOutcome::NotFound);
        };

        let users = user_model::Entity::find()
            .filter(user_model::Column::DepartmentId.eq(id))
            .count(&txn)
            .await?;
        let incidents = incident_model::Entity::find()
            .filter(incident_model::Column::DepartmentId.eq(id))
            .count(&txn)
            .await?;
        let risks = risk_model::Entity::find()
            .filter(risk_model::Column::DepartmentId.eq(id))
            .count(&txn)
            .await?;

        if users + incidents + risks > 0 {
            txn.rollback().await?;
            return Ok(DeleteOutcome::HasDependents(vec![
                ("users", users),
                ("incidents", incidents),
                ("risks", risks),
            ]));
        }

        department.delete(&txn).await?;
        txn.commit().await?;
        Ok(DeleteOutcome::Deleted)
    }
}

impl Clone for DepartmentRepository {
    fn clone(&self) -> Self {
        Self {
            db: self.db.clone(),
        }
    }
}
