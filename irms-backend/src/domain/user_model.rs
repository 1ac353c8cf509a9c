// irms-backend/src/domain/user_model.rs

use super::role::Role;
use chrono::{DateTime, Utc};
use sea_orm::entity::prelude::*;
use sea_orm::{ConnectionTrait, DbErr, Set};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "users")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,

    pub name: String,

    #[sea_orm(unique)]
    pub email: String,

    #[serde(skip_serializing)] // パスワードハッシュは絶対にシリアライズしない
    pub password_hash: String,

    pub role: String,

    #[sea_orm(nullable)]
    pub department_id: Option<Uuid>,

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
        has_many = "super::incident_model::Entity",
        from = "Column::Id",
        to = "super::incident_model::Column::ReportedById"
    )]
    ReportedIncidents,

    #[sea_orm(
        has_many = "super::risk_model::Entity",
        from = "Column::Id",
        to = "super::risk_model::Column::OwnerId"
    )]
    OwnedRisks,

    #[sea_orm(
        has_many = "super::task_model::Entity",
        from = "Column::Id",
        to = "super::task_model::Column::AssignedToId"
    )]
    AssignedTasks,

    #[sea_orm(
        has_many = "super::comment_model::Entity",
        from = "Column::Id",
        to = "super::comment_model::Column::AuthorId"
    )]
    Comments,
}

impl Related<super::department_model::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Department.def()
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
    /// DB上のロール文字列を閉じたenumに変換する。
    /// 不正な値はデータ破損として扱いエラーにする
    pub fn role(&self) -> Result<Role, String> {
        Role::from_str(&self.role).ok_or_else(|| format!("Invalid role in database: {}", self.role))
    }
}

/// セッショントークンに埋め込むユーザー情報。
/// 以降のリクエストではこれが唯一の認可コンテキストになる
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SessionUser {
    pub user_id: Uuid,
    pub name: String,
    pub email: String,
    pub role: Role,
    pub department_id: Option<Uuid>,
}

impl SessionUser {
    /// Modelから変換。ロール文字列の検証に失敗したらErr
    pub fn from_model(model: &Model) -> Result<Self, String> {
        Ok(Self {
            user_id: model.id,
            name: model.name.clone(),
            email: model.email.clone(),
            role: model.role()?,
            department_id: model.department_id,
        })
    }

    pub fn is_admin(&self) -> bool {
        self.role.is_admin()
    }

    pub fn is_manager_or_admin(&self) -> bool {
        self.role.is_manager_or_admin()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn user_model(role: &str) -> Model {
        Model {
            id: Uuid::new_v4(),
            name: "Test User".to_string(),
            email: "test@example.com".to_string(),
            password_hash: "hash".to_string(),
            role: role.to_string(),
            department_id: None,
            created_at: Utc::now(),
            updated_at: Utc::now(),
        }
    }

    #[test]
    fn test_role_parsing_from_model() {
        assert_eq!(user_model("ADMIN").role(), Ok(Role::Admin));
        assert_eq!(user_model("EMPLOYEE").role(), Ok(Role::Employee));
        assert!(user_model("SUPERUSER").role().is_err());
    }

    #[test]
    fn test_session_user_from_model() {
        let model = user_model("MANAGER");
        let session = SessionUser::from_model(&model).unwrap();
        assert_eq!(session.user_id, model.id);
        assert_eq!(session.role, Role::Manager);
        assert!(session.is_manager_or_admin());
        assert!(!session.is_admin());
    }

    #[test]
    fn test_session_user_rejects_corrupt_role() {
        let model = user_model("root");
        assert!(SessionUser::from_model(&model).is_err());
    }

    #[test]
    fn test_password_hash_not_serialized() {
        let json = serde_json::to_value(user_model("ADMIN")).unwrap();
        assert!(json.get("password_hash").is_none());
    }
}
