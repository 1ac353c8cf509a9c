// irms-backend/src/service/incident_service.rs

use crate::api::dto::comment_dto::CommentResponse;
use crate::api::dto::common::PaginatedResponse;
use crate::api::dto::incident_dto::{
    CreateIncidentDto, IncidentDetailResponse, IncidentFilterDto, IncidentResponse,
    UpdateIncidentDto,
};
use crate::api::dto::task_dto::TaskResponse;
use crate::domain::audit_log_model::{AuditAction, EntityType};
use crate::domain::incident_model::{ActiveModel as IncidentActiveModel, Model as IncidentModel};
use crate::domain::user_model::SessionUser;
use crate::error::{AppError, AppResult};
use crate::repository::department_repository::DepartmentRepository;
use crate::repository::incident_category_repository::IncidentCategoryRepository;
use crate::repository::incident_repository::IncidentRepository;
use crate::repository::task_repository::TaskRepository;
use crate::repository::user_repository::UserRepository;
use crate::repository::comment_repository::CommentRepository;
use crate::service::audit_log_service::{AuditLogService, RecordParams};
use crate::service::{category_ref_map, department_ref_map, user_ref_map};
use crate::utils::permission::{Action, PermissionChecker, ResourceRefs};
use chrono::Utc;
use sea_orm::{ActiveModelBehavior, Set};
use serde_json::json;
use std::sync::Arc;
use tracing::info;
use uuid::Uuid;

pub struct IncidentService {
    incident_repo: Arc<IncidentRepository>,
    department_repo: Arc<DepartmentRepository>,
    category_repo: Arc<IncidentCategoryRepository>,
    user_repo: Arc<UserRepository>,
    task_repo: Arc<TaskRepository>,
    comment_repo: Arc<CommentRepository>,
    audit_log_service: Arc<AuditLogService>,
}

impl IncidentService {
    #[allow(clippy::too_many_arguments)]
    pub fn new(
        incident_repo: Arc<IncidentRepository>,
        department_repo: Arc<DepartmentRepository>,
        category_repo: Arc<IncidentCategoryRepository>,
        user_repo: Arc<UserRepository>,
        task_repo: Arc<TaskRepository>,
        comment_repo: Arc<CommentRepository>,
        audit_log_service: Arc<AuditLogService>,
    ) -> Self {
        Self {
            incident_repo,
            department_repo,
            category_repo,
            user_repo,
            task_repo,
            comment_repo,
            audit_log_service,
        }
    }

    fn resource_refs(incident: &IncidentModel) -> ResourceRefs {
        ResourceRefs {
            department_id: Some(incident.department_id),
            reported_by_id: Some(incident.reported_by_id),
            assigned_to_id: incident.assigned_to_id,
            ..Default::default()
        }
    }

    /// 関連エンティティの参照を埋めたレスポンスをまとめて構築する
    async fn to_responses(&self, incidents: &[IncidentModel]) -> AppResult<Vec<IncidentResponse>> {
        let department_ids: Vec<Uuid> = incidents.iter().map(|i| i.department_id).collect();
        let category_ids: Vec<Uuid> = incidents.iter().filter_map(|i| i.category_id).collect();
        let mut user_ids: Vec<Uuid> = incidents.iter().map(|i| i.reported_by_id).collect();
        user_ids.extend(incidents.iter().filter_map(|i| i.assigned_to_id));

        let departments =
            department_ref_map(self.department_repo.find_by_ids(&department_ids).await?);
        let categories = category_ref_map(self.category_repo.find_by_ids(&category_ids).await?);
        let users = user_ref_map(self.user_repo.find_by_ids(&user_ids).await?);

        let mut responses = Vec::with_capacity(incidents.len());
        for incident in incidents {
            let status = incident.status().map_err(AppError::InternalServerError)?;
            let severity = incident.severity().map_err(AppError::InternalServerError)?;

            let mut response = IncidentResponse::from_model(incident, status, severity);
            response.department = departments.get(&incident.department_id).cloned();
            response.category = incident
                .category_id
                .and_then(|id| categories.get(&id).cloned());
            response.reported_by = users.get(&incident.reported_by_id).cloned();
            response.assigned_to = incident
                .assigned_to_id
                .and_then(|id| users.get(&id).cloned());
            responses.push(response);
        }

        Ok(responses)
    }

    pub async fn list_incidents(
        &self,
        actor: &SessionUser,
        filter: &IncidentFilterDto,
        page: u64,
        limit: u64,
    ) -> AppResult<PaginatedResponse<IncidentResponse>> {
        let scope = PermissionChecker::allowed_scope(actor)?;

        // 部門フィルタは管理者のみ尊重する。他ロールはスコープが部門を決める
        let mut filter = filter.clone();
        if !actor.is_admin() {
            filter.department_id = None;
        }

        let (incidents, total) = self
            .incident_repo
            .find_with_filter(&scope, &filter, page, limit)
            .await?;

        let responses = self.to_responses(&incidents).await?;
        Ok(PaginatedResponse::new(responses, page, limit, total))
    }

    pub async fn get_incident(
        &self,
        actor: &SessionUser,
        id: Uuid,
    ) -> AppResult<IncidentDetailResponse> {
        let incident = self
            .incident_repo
            .find_by_id(id)
            .await?
            .ok_or_else(|| AppError::NotFound("Incident not found".to_string()))?;

        if !PermissionChecker::can_access_resource(
            actor,
            &Self::resource_refs(&incident),
            Action::Read,
        ) {
            return Err(AppError::Forbidden("Cannot access this incident".to_string()));
        }

        let incident_response = self
            .to_responses(std::slice::from_ref(&incident))
            .await?
            .pop()
            .ok_or_else(|| {
                AppError::InternalServerError("Failed to build incident response".to_string())
            })?;

        // 関連タスクとコメント
        let tasks = self.task_repo.find_by_incident(id).await?;
        let comments = self.comment_repo.find_by_incident(id).await?;

        let mut user_ids: Vec<Uuid> = tasks.iter().map(|t| t.assigned_to_id).collect();
        user_ids.extend(comments.iter().map(|c| c.author_id));
        let users = user_ref_map(self.user_repo.find_by_ids(&user_ids).await?);

        let mut task_responses = Vec::with_capacity(tasks.len());
        for task in &tasks {
            let status = task.status().map_err(AppError::InternalServerError)?;
            let mut response = TaskResponse::from_model(task, status);
            response.assigned_to = users.get(&task.assigned_to_id).cloned();
            task_responses.push(response);
        }

        let comment_responses = comments
            .iter()
            .map(|comment| {
                let mut response = CommentResponse::from_model(comment);
                response.author = users.get(&comment.author_id).cloned();
                response
            })
            .collect();

        Ok(IncidentDetailResponse {
            incident: incident_response,
            tasks: task_responses,
            comments: comment_responses,
        })
    }

    pub async fn create_incident(
        &self,
        actor: &SessionUser,
        payload: CreateIncidentDto,
    ) -> AppResult<IncidentResponse> {
        if self
            .department_repo
            .find_by_id(payload.department_id)
            .await?
            .is_none()
        {
            return Err(AppError::BadRequest("Department not found".to_string()));
        }

        if let Some(category_id) = payload.category_id {
            if self.category_repo.find_by_id(category_id).await?.is_none() {
                return Err(AppError::BadRequest("Category not found".to_string()));
            }
        }

        if !PermissionChecker::can_create_incident_in(actor, payload.department_id) {
            return Err(AppError::Forbidden(
                "You can only create incidents for your own department".to_string(),
            ));
        }

        // 報告者はサーバー側でセッションから決める。クライアント指定値は受け付けない
        let mut active = IncidentActiveModel::new();
        active.title = Set(payload.title.trim().to_string());
        active.description = Set(payload.description.trim().to_string());
        active.severity = Set(payload.severity.as_str().to_string());
        active.category_id = Set(payload.category_id);
        active.department_id = Set(payload.department_id);
        active.reported_by_id = Set(actor.user_id);
        active.occurred_at = Set(payload.occurred_at);

        let incident = self.incident_repo.insert(active).await?;

        info!(
            incident_id = %incident.id,
            actor_id = %actor.user_id,
            "Incident created"
        );

        self.audit_log_service
            .record(RecordParams {
                entity_type: EntityType::Incident,
                entity_id: Some(incident.id),
                action: AuditAction::Created,
                actor_id: actor.user_id,
                metadata: Some(json!({
                    "title": incident.title,
                    "severity": incident.severity,
                })),
            })
            .await;

        Ok(self
            .to_responses(std::slice::from_ref(&incident))
            .await?
            .pop()
            .ok_or_else(|| {
                AppError::InternalServerError("Failed to build incident response".to_string())
            })?)
    }

    pub async fn update_incident(
        &self,
        actor: &SessionUser,
        id: Uuid,
        payload: UpdateIncidentDto,
    ) -> AppResult<IncidentResponse> {
        let existing = self
            .incident_repo
            .find_by_id(id)
            .await?
            .ok_or_else(|| AppError::NotFound("Incident not found".to_string()))?;

        if !PermissionChecker::can_access_resource(
            actor,
            &Self::resource_refs(&existing),
            Action::Write,
        ) {
            return Err(AppError::Forbidden("Cannot update this incident".to_string()));
        }

        // ステータス変更と担当者割り当てはマネージャー以上の権限。
        // 権限がない場合はエラーにせずサイレントに破棄する
        let payload = if PermissionChecker::can_manage_incident_assignment(actor) {
            payload
        } else {
            payload.without_assignment_fields()
        };

        if let Some(Some(category_id)) = payload.category_id {
            if self.category_repo.find_by_id(category_id).await?.is_none() {
                return Err(AppError::BadRequest("Category not found".to_string()));
            }
        }
        if let Some(Some(assigned_to_id)) = payload.assigned_to_id {
            if self.user_repo.find_by_id(assigned_to_id).await?.is_none() {
                return Err(AppError::BadRequest("Assignee not found".to_string()));
            }
        }

        let old_status = existing.status().map_err(AppError::InternalServerError)?;
        let changed_fields = payload.changed_fields();

        let resolved_at_was_null = existing.resolved_at.is_none();
        let mut active: IncidentActiveModel = existing.into();

        if let Some(title) = &payload.title {
            active.title = Set(title.trim().to_string());
        }
        if let Some(description) = &payload.description {
            active.description = Set(description.trim().to_string());
        }
        if let Some(severity) = payload.severity {
            active.severity = Set(severity.as_str().to_string());
        }
        if let Some(category_id) = payload.category_id {
            active.category_id = Set(category_id);
        }
        if let Some(assigned_to_id) = payload.assigned_to_id {
            active.assigned_to_id = Set(assigned_to_id);
        }
        if let Some(ai_summary) = payload.ai_summary.clone() {
            active.ai_summary = Set(ai_summary);
        }
        if let Some(suggestion) = payload.ai_severity_suggestion {
            active.ai_severity_suggestion = Set(Some(suggestion.as_str().to_string()));
        }
        if let Some(actions) = payload.ai_recommended_actions.clone() {
            active.ai_recommended_actions = Set(actions);
        }
        if let Some(status) = payload.status {
            active.status = Set(status.as_str().to_string());
            // 終端ステータスへの遷移で一度だけresolved_atを刻印する
            if status.is_terminal() && resolved_at_was_null {
                active.resolved_at = Set(Some(Utc::now()));
            }
        }

        let incident = self.incident_repo.update(active).await?;

        // ステータス変更はUPDATEDとは別アクションで記録する
        if let Some(new_status) = payload.status {
            if new_status != old_status {
                self.audit_log_service
                    .record_status_change(
                        EntityType::Incident,
                        id,
                        actor.user_id,
                        old_status.as_str(),
                        new_status.as_str(),
                    )
                    .await;
            }
        }

        self.audit_log_service
            .record(RecordParams {
                entity_type: EntityType::Incident,
                entity_id: Some(id),
                action: AuditAction::Updated,
                actor_id: actor.user_id,
                metadata: Some(json!({ "changes": changed_fields })),
            })
            .await;

        Ok(self
            .to_responses(std::slice::from_ref(&incident))
            .await?
            .pop()
            .ok_or_else(|| {
                AppError::InternalServerError("Failed to build incident response".to_string())
            })?)
    }

    pub async fn delete_incident(&self, actor: &SessionUser, id: Uuid) -> AppResult<()> {
        if !PermissionChecker::can_delete(actor) {
            return Err(AppError::Forbidden(
                "Only administrators can delete incidents".to_string(),
            ));
        }

        let incident = self
            .incident_repo
            .find_by_id(id)
            .await?
            .ok_or_else(|| AppError::NotFound("Incident not found".to_string()))?;

        self.incident_repo.delete_by_id(id).await?;

        self.audit_log_service
            .record(RecordParams {
                entity_type: EntityType::Incident,
                entity_id: Some(id),
                action: AuditAction::Deleted,
                actor_id: actor.user_id,
                metadata: Some(json!({ "title": incident.title })),
            })
            .await;

        Ok(())
    }
}
