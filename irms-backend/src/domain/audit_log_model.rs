// irms-backend/src/domain/audit_log_model.rs

use chrono::{DateTime, Utc};
use sea_orm::entity::prelude::*;
use sea_orm::ActiveValue::Set;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "audit_logs")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,
    pub entity_type: String,
    pub entity_id: Option<Uuid>,
    pub action: String,
    pub changed_by_id: Uuid,
    pub metadata: Option<Json>,
    pub changed_at: DateTime<Utc>,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::user_model::Entity",
        from = "Column::ChangedById",
        to = "super::user_model::Column::Id",
        on_update = "NoAction",
        on_delete = "Cascade"
    )]
    ChangedBy,
}

impl Related<super::user_model::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::ChangedBy.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}

// 監査アクションの定義
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum AuditAction {
    Created,
    Updated,
    Deleted,
    StatusChanged,
    Assigned,
    AiAnalyzed,
    CommentAdded,
    Login,
    Logout,
}

impl AuditAction {
    pub fn as_str(&self) -> &'static str {
        match self {
            AuditAction::Created => "CREATED",
            AuditAction::Updated => "UPDATED",
            AuditAction::Deleted => "DELETED",
            AuditAction::StatusChanged => "STATUS_CHANGED",
            AuditAction::Assigned => "ASSIGNED",
            AuditAction::AiAnalyzed => "AI_ANALYZED",
            AuditAction::CommentAdded => "COMMENT_ADDED",
            AuditAction::Login => "LOGIN",
            AuditAction::Logout => "LOGOUT",
        }
    }
}

// 監査対象エンティティの定義
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum EntityType {
    Incident,
    Risk,
    Task,
    User,
    Department,
    Category,
    Comment,
}

impl EntityType {
    pub fn as_str(&self) -> &'static str {
        match self {
            EntityType::Incident => "INCIDENT",
            EntityType::Risk => "RISK",
            EntityType::Task => "TASK",
            EntityType::User => "USER",
            EntityType::Department => "DEPARTMENT",
            EntityType::Category => "CATEGORY",
            EntityType::Comment => "COMMENT",
        }
    }

    #[allow(clippy::should_implement_trait)]
    pub fn from_str(s: &str) -> Option<Self> {
        match s.to_uppercase().as_str() {
            "INCIDENT" => Some(EntityType::Incident),
            "RISK" => Some(EntityType::Risk),
            "TASK" => Some(EntityType::Task),
            "USER" => Some(EntityType::User),
            "DEPARTMENT" => Some(EntityType::Department),
            "CATEGORY" => Some(EntityType::Category),
            "COMMENT" => Some(EntityType::Comment),
            _ => None,
        }
    }
}

// 監査ログエントリービルダー
pub struct AuditLogBuilder {
    changed_by_id: Uuid,
    action: AuditAction,
    entity_type: EntityType,
    entity_id: Option<Uuid>,
    metadata: Option<serde_json::Value>,
}

impl AuditLogBuilder {
    pub fn new(changed_by_id: Uuid, action: AuditAction, entity_type: EntityType) -> Self {
        Self {
            changed_by_id,
            action,
            entity_type,
            entity_id: None,
            metadata: None,
        }
    }

    pub fn entity_id(mut self, id: Uuid) -> Self {
        self.entity_id = Some(id);
        self
    }

    pub fn metadata(mut self, metadata: serde_json::Value) -> Self {
        self.metadata = Some(metadata);
        self
    }

    pub fn build(self) -> ActiveModel {
        ActiveModel {
            id: Set(Uuid::new_v4()),
            entity_type: Set(self.entity_type.as_str().to_string()),
            entity_id: Set(self.entity_id),
            action: Set(self.action.as_str().to_string()),
            changed_by_id: Set(self.changed_by_id),
            metadata: Set(self.metadata),
            changed_at: Set(Utc::now()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_action_strings() {
        assert_eq!(AuditAction::Created.as_str(), "CREATED");
        assert_eq!(AuditAction::StatusChanged.as_str(), "STATUS_CHANGED");
        assert_eq!(AuditAction::AiAnalyzed.as_str(), "AI_ANALYZED");
    }

    #[test]
    fn test_entity_type_round_trip() {
        for entity_type in [
            EntityType::Incident,
            EntityType::Risk,
            EntityType::Task,
            EntityType::User,
            EntityType::Department,
            EntityType::Category,
            EntityType::Comment,
        ] {
            assert_eq!(EntityType::from_str(entity_type.as_str()), Some(entity_type));
        }
        assert_eq!(EntityType::from_str("WIDGET"), None);
    }

    #[test]
    fn test_builder() {
        let actor = Uuid::new_v4();
        let incident = Uuid::new_v4();
        let entry = AuditLogBuilder::new(actor, AuditAction::StatusChanged, EntityType::Incident)
            .entity_id(incident)
            .metadata(json!({"from": "NEW", "to": "RESOLVED"}))
            .build();

        assert_eq!(entry.entity_type.clone().unwrap(), "INCIDENT");
        assert_eq!(entry.entity_id.clone().unwrap(), Some(incident));
        assert_eq!(entry.action.clone().unwrap(), "STATUS_CHANGED");
        assert_eq!(entry.changed_by_id.clone().unwrap(), actor);
        assert_eq!(
            entry.metadata.clone().unwrap(),
            Some(json!({"from": "NEW", "to": "RESOLVED"}))
        );
    }
}
