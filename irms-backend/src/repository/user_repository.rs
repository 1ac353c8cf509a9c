// irms-backend/src/repository/user_repository.rs

use super::{CreateOutcome, DeleteOutcome, UpdateOutcome};
use crate::api::dto::user_dto::UserFilterDto;
use crate::domain::user_model::{
    self, ActiveModel as UserActiveModel, Entity as UserEntity, Model as UserModel,
};
use crate::domain::{comment_model, incident_model, risk_model, task_model};
use sea_orm::{entity::*, query::*, DbConn, DbErr, Set, TransactionTrait};
use uuid::Uuid;

pub struct UserRepository {
    db: DbConn,
}

pub struct UserChanges {
    pub name: Option<String>,
    pub email: Option<String>,
    pub password_hash: Option<String>,
    pub role: Option<String>,
    pub department_id: Option<Option<Uuid>>,
}

impl UserRepository {
    pub fn new(db: DbConn) -> Self {
        Self { db }
    }

    pub async fn find_by_id(&self, id: Uuid) -> Result<Option<UserModel>, DbErr> {
        UserEntity::find_by_id(id).one(&self.db).await
    }

    pub async fn find_by_email(&self, email: &str) -> Result<Option<UserModel>, DbErr> {
        UserEntity::find()
            .filter(user_model::Column::Email.eq(email))
            .one(&self.db)
            .await
    }

    pub async fn find_by_ids(&self, ids: &[Uuid]) -> Result<Vec<UserModel>, DbErr> {
        if ids.is_empty() {
            return Ok(Vec::new());
        }
        UserEntity::find()
            .filter(user_model::Column::Id.is_in(ids.iter().copied()))
            .all(&self.db)
            .await
    }

    pub async fn find_with_filter(
        &self,
        filter: &UserFilterDto,
        page: u64,
        limit: u64,
    ) -> Result<(Vec<UserModel>, u64), DbErr> {
        let mut conditions = Condition::all();

        if let Some(role) = &filter.role {
            conditions = conditions.add(user_model::Column::Role.eq(role.as_str()));
        }
        if let Some(department_id) = filter.department_id {
            conditions = conditions.add(user_model::Column::DepartmentId.eq(department_id));
        }
        if let Some(search) = &filter.search {
            conditions = conditions.add(
                Condition::any()
                    .add(user_model::Column::Name.contains(search))
                    .add(user_model::Column::Email.contains(search)),
            );
        }

        let total = UserEntity::find()
            .filter(conditions.clone())
            .count(&self.db)
            .await?;
        let users = UserEntity::find()
            .filter(conditions)
            .order_by_desc(user_model::Column::CreatedAt)
            .limit(limit)
            .offset((page - 1) * limit)
            .all(&self.db)
            .await?;

        Ok((users, total))
    }

    /// メールアドレスの重複チェックと挿入を同一トランザクションで行う
    pub async fn create(
        &self,
        name: String,
        email: String,
        password_hash: String,
        role: String,
        department_id: Option<Uuid>,
    ) -> Result<CreateOutcome<UserModel>, DbErr> {
        let txn = self.db.begin().await?;

        let existing = UserEntity::find()
            .filter(user_model::Column::Email.eq(&email))
            .one(&txn)
            .await?;

        if existing.is_some() {
            txn.rollback().await?;
            return Ok(CreateOutcome::Duplicate);
        }

        let mut active = UserActiveModel::new();
        active.name = Set(name);
        active.email = Set(email);
        active.password_hash = Set(password_hash);
        active.role = Set(role);
        active.department_id = Set(department_id);
        let model = active.insert(&txn).await?;

        txn.commit().await?;
        Ok(CreateOutcome::Created(model))
    }

    pub async fn update(
        &self,
        id: Uuid,
        changes: UserChanges,
    ) -> Result<UpdateOutcome<UserModel>, DbErr> {
        let txn = self.db.begin().await?;

        let Some(existing) = UserEntity::find_by_id(id).one(&txn).await? else {
            txn.rollback().await?;
            return Ok(UpdateOutcome::NotFound);
        };

        if let Some(new_email) = &changes.email {
            let duplicate = UserEntity::find()
                .filter(user_model::Column::Email.eq(new_email))
                .filter(user_model::Column::Id.ne(id))
                .one(&txn)
                .await?;
            if duplicate.is_some() {
                txn.rollback().await?;
                return Ok(UpdateOutcome::Duplicate);
            }
        }

        let mut active: UserActiveModel = existing.into();
        if let Some(name) = changes.name {
            active.name = Set(name);
        }
        if let Some(email) = changes.email {
            active.email = Set(email);
        }
        if let Some(password_hash) = changes.password_hash {
            active.password_hash = Set(password_hash);
        }
        if let Some(role) = changes.role {
            active.role = Set(role);
        }
        if let Some(department_id) = changes.department_id {
            active.department_id = Set(department_id);
        }
        let model = active.update(&txn).await?;

        txn.commit().await?;
        Ok(UpdateOutcome::Updated(model))
    }

    /// 参照しているレコードがあれば削除を拒否する
    pub async fn delete(&self, id: Uuid) -> Result<DeleteOutcome, DbErr> {
        let txn = self.db.begin().await?;

        let Some(user) = UserEntity::find_by_id(id).one(&txn).await? else {
            txn.rollback().await?;
            return Ok(DeleteOutcome::NotFound);
        };

        let incidents = incident_model::Entity::find()
            .filter(
                Condition::any()
                    .add(incident_model::Column::ReportedById.eq(id))
                    .add(incident_model::Column::AssignedToId.eq(id)),
            )
            .count(&txn)
            .await?;
        let risks = risk_model::Entity::find()
            .filter(risk_model::Column::OwnerId.eq(id))
            .count(&txn)
            .await?;
        let tasks = task_model::Entity::find()
            .filter(task_model::Column::AssignedToId.eq(id))
            .count(&txn)
            .await?;
        let comments = comment_model::Entity::find()
            .filter(comment_model::Column::AuthorId.eq(id))
            .count(&txn)
            .await?;

        if incidents + risks + tasks + comments > 0 {
            txn.rollback().await?;
            return Ok(DeleteOutcome::HasDependents(vec![
                ("incidents", incidents),
                ("risks", risks),
                ("tasks", tasks),
                ("comments", comments),
            ]));
        }

        user.delete(&txn).await?;
        txn.commit().await?;
        Ok(DeleteOutcome::Deleted)
    }
}

impl Clone for UserRepository {
    fn clone(&self) -> Self {
        Self {
            db: self.db.clone(),
        }
    }
}
