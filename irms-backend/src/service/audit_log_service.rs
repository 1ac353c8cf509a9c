// irms-backend/src/service/audit_log_service.rs

use crate::api::dto::audit_log_dto::AuditLogFilterDto;
use crate::domain::audit_log_model::{AuditAction, AuditLogBuilder, EntityType, Model as AuditLogModel};
use crate::error::AppResult;
use crate::log_with_context;
use crate::repository::audit_log_repository::AuditLogRepository;
use std::sync::Arc;
use uuid::Uuid;

// 監査ログ記録のためのパラメータ構造体
pub struct RecordParams {
    pub entity_type: EntityType,
    pub entity_id: Option<Uuid>,
    pub action: AuditAction,
    pub actor_id: Uuid,
    pub metadata: Option<serde_json::Value>,
}

pub struct AuditLogService {
    audit_log_repo: Arc<AuditLogRepository>,
}

impl AuditLogService {
    pub fn new(audit_log_repo: Arc<AuditLogRepository>) -> Self {
        Self { audit_log_repo }
    }

    /// 監査ログを記録する。ベストエフォートであり決して呼び出し元へエラーを返さない。
    /// 主処理の成功後に同期的に呼ばれ、失敗はログに残して握りつぶす
    pub async fn record(&self, params: RecordParams) {
        let mut builder =
            AuditLogBuilder::new(params.actor_id, params.action, params.entity_type);

        if let Some(entity_id) = params.entity_id {
            builder = builder.entity_id(entity_id);
        }
        if let Some(metadata) = params.metadata {
            builder = builder.metadata(metadata);
        }

        if let Err(e) = self.audit_log_repo.create(builder.build()).await {
            log_with_context!(
                tracing::Level::ERROR,
                "Failed to create audit log",
                "actor_id" => params.actor_id,
                "action" => params.action.as_str(),
                "entity_type" => params.entity_type.as_str(),
                "error" => &e.to_string()
            );
        }
    }

    /// ステータス変更は汎用のUPDATEDとは別のアクションとして記録する
    pub async fn record_status_change(
        &self,
        entity_type: EntityType,
        entity_id: Uuid,
        actor_id: Uuid,
        from: &str,
        to: &str,
    ) {
        self.record(RecordParams {
            entity_type,
            entity_id: Some(entity_id),
            action: AuditAction::StatusChanged,
            actor_id,
            metadata: Some(serde_json::json!({ "from": from, "to": to })),
        })
        .await;
    }

    /// 監査ログの一覧取得（閲覧権限チェックはハンドラー側で行う）
    pub async fn list(
        &self,
        filter: &AuditLogFilterDto,
        page: u64,
        limit: u64,
    ) -> AppResult<(Vec<AuditLogModel>, u64)> {
        let entity_type = filter.entity_type.map(|t| t.as_str());
        let (logs, total) = self
            .audit_log_repo
            .find_with_filter(entity_type, filter.entity_id, page, limit)
            .await?;
        Ok((logs, total))
    }
}
