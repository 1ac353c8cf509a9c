// irms-backend/src/api/dto/audit_log_dto.rs

use super::common::UserRef;
use crate::domain::audit_log_model::{EntityType, Model as AuditLogModel};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// 監査ログ取得のフィルタ
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AuditLogFilterDto {
    pub entity_type: Option<EntityType>,
    pub entity_id: Option<Uuid>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AuditLogResponse {
    pub id: Uuid,
    pub entity_type: String,
    pub entity_id: Option<Uuid>,
    pub action: String,
    pub changed_by_id: Uuid,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub changed_by: Option<UserRef>,
    pub metadata: Option<serde_json::Value>,
    pub changed_at: DateTime<Utc>,
}

impl AuditLogResponse {
    pub fn from_model(model: &AuditLogModel) -> Self {
        Self {
            id: model.id,
            entity_type: model.entity_type.clone(),
            entity_id: model.entity_id,
            action: model.action.clone(),
            changed_by_id: model.changed_by_id,
            changed_by: None,
            metadata: model.metadata.clone(),
            changed_at: model.changed_at,
        }
    }
}
