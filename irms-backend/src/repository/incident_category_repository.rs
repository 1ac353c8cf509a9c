// irms-backend/src/repository/incident_category_repository.rs

use super::{CreateOutcome, DeleteOutcome, UpdateOutcome};
use crate::domain::incident_category_model::{
    self, ActiveModel as CategoryActiveModel, Entity as CategoryEntity, Model as CategoryModel,
};
use crate::domain::incident_model;
use sea_orm::{entity::*, query::*, DbConn, DbErr, Set, TransactionTrait};
use uuid::Uuid;

pub struct IncidentCategoryRepository {
    db: DbConn,
}

impl IncidentCategoryRepository {
    pub fn new(db: DbConn) -> Self {
        Self { db }
    }

    pub async fn find_by_id(&self, id: Uuid) -> Result<Option<CategoryModel>, DbErr> {
        CategoryEntity::find_by_id(id).one(&self.db).await
    }

    pub async fn find_by_ids(&self, ids: &[Uuid]) -> Result<Vec<CategoryModel>, DbErr> {
        if ids.is_empty() {
            return Ok(Vec::new());
        }
        CategoryEntity::find()
            .filter(incident_category_model::Column::Id.is_in(ids.iter().copied()))
            .all(&self.db)
            .await
    }

    pub async fn find_all(
        &self,
        page: u64,
        limit: u64,
    ) -> Result<(Vec<CategoryModel>, u64), DbErr> {
        let total = CategoryEntity::find().count(&self.db).await?;
        let categories = CategoryEntity::find()
            .order_by_asc(incident_category_model::Column::Name)
            .limit(limit)
            .offset((page - 1) * limit)
            .all(&self.db)
            .await?;
        Ok((categories, total))
    }

    /// 名前の重複チェックと挿入を同一トランザクションで行う
    pub async fn create(
        &self,
        name: String,
        description: Option<String>,
    ) -> Result<CreateOutcome<CategoryModel>, DbErr> {
        let txn = self.db.begin().await?;

        let existing = CategoryEntity::find()
            .filter(incident_category_model::Column::Name.eq(&name))
            .one(&txn)
            .await?;

        if existing.is_some() {
            txn.rollback().await?;
            return Ok(CreateOutcome::Duplicate);
        }

        let mut active = CategoryActiveModel::new();
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
    ) -> Result<UpdateOutcome<CategoryModel>, DbErr> {
        let txn = self.db.begin().await?;

        let Some(existing) = CategoryEntity::find_by_id(id).one(&txn).await? else {
            txn.rollback().await?;
            return Ok(UpdateOutcome::NotFound);
        };

        if let Some(new_name) = &name {
            let duplicate = CategoryEntity::find()
                .filter(incident_category_model::Column::Name.eq(new_name))
                .filter(incident_category_model::Column::Id.ne(id))
                .one(&txn)
                .await?;
            if duplicate.is_some() {
                txn.rollback().await?;
                return Ok(UpdateOutcome::Duplicate);
            }
        }

        let mut active: CategoryActiveModel = existing.into();
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

    /// 依存インシデントの件数チェックと削除を同一トランザクションで行う
    pub async fn delete(&self, id: Uuid) -> Result<DeleteOutcome, DbErr> {
        let txn = self.db.begin().await?;

        let Some(category) = CategoryEntity::find_by_id(id).one(&txn).await? else {
            txn.rollback().await?;
            return Ok(DeleteOutcome::NotFound);
        };

        let incidents = incident_model::Entity::find()
            .filter(incident_model::Column::CategoryId.eq(id))
            .count(&txn)
            .await?;

        if incidents > 0 {
            txn.rollback().await?;
            return Ok(DeleteOutcome::HasDependents(vec![("incidents", incidents)]));
        }

        category.delete(&txn).await?;
        txn.commit().await?;
        Ok(DeleteOutcome::Deleted)
    }
}

impl Clone for IncidentCategoryRepository {
    fn clone(&self) -> Self {
        Self {
            db: self.db.clone(),
        }
    }
}
