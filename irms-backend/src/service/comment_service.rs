// irms-backend/src/service/comment_service.rs

use crate::api::dto::comment_dto::{CommentListQuery, CommentResponse, CreateCommentDto};
use crate::domain::audit_log_model::{AuditAction, EntityType};
use crate::domain::comment_model::ActiveModel as CommentActiveModel;
use crate::domain::user_model::SessionUser;
use crate::error::{AppError, AppResult};
use crate::repository::comment_repository::CommentRepository;
use crate::repository::incident_repository::IncidentRepository;
use crate::repository::risk_repository::RiskRepository;
use crate::repository::user_repository::UserRepository;
use crate::service::audit_log_service::{AuditLogService, RecordParams};
use crate::service::user_ref_map;
use crate::utils::permission::{Action, PermissionChecker, ResourceRefs};
use sea_orm::{ActiveModelBehavior, Set};
use serde_json::json;
use std::sync::Arc;
use uuid::Uuid;

pub struct CommentService {
    comment_repo: Arc<CommentRepository>,
    incident_repo: Arc<IncidentRepository>,
    risk_repo: Arc<RiskRepository>,
    user_repo: Arc<UserRepository>,
    audit_log_service: Arc<AuditLogService>,
}

impl CommentService {
    pub fn new(
        comment_repo: Arc<CommentRepository>,
        incident_repo: Arc<IncidentRepository>,
        risk_repo: Arc<RiskRepository>,
        user_repo: Arc<UserRepository>,
        audit_log_service: Arc<AuditLogService>,
    ) -> Self {
        Self {
            comment_repo,
            incident_repo,
            risk_repo,
            user_repo,
            audit_log_service,
        }
    }

    /// コメント先のエンティティが存在し、閲覧権限があることを確認する
    async fn check_parent_access(
        &self,
        actor: &SessionUser,
        incident_id: Option<Uuid>,
        risk_id: Option<Uuid>,
    ) -> AppResult<()> {
        if let Some(incident_id) = incident_id {
            let incident = self
                .incident_repo
                .find_by_id(incident_id)
                .await?
                .ok_or_else(|| AppError::NotFound("Incident not found".to_string()))?;
            let refs = ResourceRefs {
                department_id: Some(incident.department_id),
                reported_by_id: Some(incident.reported_by_id),
                assigned_to_id: incident.assigned_to_id,
                ..Default::default()
            };
            if !PermissionChecker::can_access_resource(actor, &refs, Action::Read) {
                return Err(AppError::Forbidden("Cannot access this incident".to_string()));
            }
        } else if let Some(risk_id) = risk_id {
            let risk = self
                .risk_repo
                .find_by_id(risk_id)
                .await?
                .ok_or_else(|| AppError::NotFound("Risk not found".to_string()))?;
            let refs = ResourceRefs {
                department_id: Some(risk.department_id),
                owner_id: Some(risk.owner_id),
                ..Default::default()
            };
            if !PermissionChecker::can_access_resource(actor, &refs, Action::Read) {
                return Err(AppError::Forbidden("Cannot access this risk".to_string()));
            }
        }
        Ok(())
    }

    pub async fn list_comments(
        &self,
        actor: &SessionUser,
        query: &CommentListQuery,
    ) -> AppResult<Vec<CommentResponse>> {
        let comments = match (query.incident_id, query.risk_id) {
            (Some(_), Some(_)) | (None, None) => {
                return Err(AppError::BadRequest(
                    "Either incidentId or riskId is required".to_string(),
                ))
            }
            (Some(incident_id), None) => {
                self.check_parent_access(actor, Some(incident_id), None)
                    .await?;
                self.comment_repo.find_by_incident(incident_id).await?
            }
            (None, Some(risk_id)) => {
                self.check_parent_access(actor, None, Some(risk_id)).await?;
                self.comment_repo.find_by_risk(risk_id).await?
            }
        };

        let author_ids: Vec<Uuid> = comments.iter().map(|c| c.author_id).collect();
        let authors = user_ref_map(self.user_repo.find_by_ids(&author_ids).await?);

        Ok(comments
            .iter()
            .map(|comment| {
                let mut response = CommentResponse::from_model(comment);
                response.author = authors.get(&comment.author_id).cloned();
                response
            })
            .collect())
    }

    pub async fn create_comment(
        &self,
        actor: &SessionUser,
        payload: CreateCommentDto,
    ) -> AppResult<CommentResponse> {
        self.check_parent_access(actor, payload.incident_id, payload.risk_id)
            .await?;

        // 投稿者はサーバー側でセッションから決める
        let mut active = CommentActiveModel::new();
        active.body = Set(payload.body.trim().to_string());
        active.author_id = Set(actor.user_id);
        active.incident_id = Set(payload.incident_id);
        active.risk_id = Set(payload.risk_id);

        let comment = self.comment_repo.insert(active).await?;

        let (parent_type, parent_id) = match (comment.incident_id, comment.risk_id) {
            (Some(incident_id), _) => (EntityType::Incident, incident_id),
            (_, Some(risk_id)) => (EntityType::Risk, risk_id),
            // バリデーション済みのため到達しない
            _ => (EntityType::Comment, comment.id),
        };

        self.audit_log_service
            .record(RecordParams {
                entity_type: parent_type,
                entity_id: Some(parent_id),
                action: AuditAction::CommentAdded,
                actor_id: actor.user_id,
                metadata: Some(json!({ "commentId": comment.id })),
            })
            .await;

        let authors = user_ref_map(self.user_repo.find_by_ids(&[comment.author_id]).await?);
        let mut response = CommentResponse::from_model(&comment);
        response.author = authors.get(&comment.author_id).cloned();
        Ok(response)
    }
}
