// irms-backend/src/service/risk_service.rs

use crate::api::dto::comment_dto::CommentResponse;
use crate::api::dto::common::PaginatedResponse;
use crate::api::dto::risk_dto::{
    CreateRiskDto, RiskDetailResponse, RiskFilterDto, RiskResponse, UpdateRiskDto,
};
use crate::api::dto::task_dto::TaskResponse;
use crate::domain::audit_log_model::{AuditAction, EntityType};
use crate::domain::risk_model::{ActiveModel as RiskActiveModel, Model as RiskModel};
use crate::domain::user_model::SessionUser;
use crate::error::{AppError, AppResult};
use crate::repository::comment_repository::CommentRepository;
use crate::repository::department_repository::DepartmentRepository;
use crate::repository::risk_repository::RiskRepository;
use crate::repository::task_repository::TaskRepository;
use crate::repository::user_repository::UserRepository;
use crate::service::audit_log_service::{AuditLogService, RecordParams};
use crate::service::{department_ref_map, user_ref_map};
use crate::utils::permission::{Action, PermissionChecker, ResourceRefs};
use chrono::Utc;
use sea_orm::{ActiveModelBehavior, Set};
use serde_json::json;
use std::sync::Arc;
use tracing::info;
use uuid::Uuid;

pub struct RiskService {
    risk_repo: Arc<RiskRepository>,
    department_repo: Arc<DepartmentRepository>,
    user_repo: Arc<UserRepository>,
    task_repo: Arc<TaskRepository>,
    comment_repo: Arc<CommentRepository>,
    audit_log_service: Arc<AuditLogService>,
}

impl RiskService {
    pub fn new(
        risk_repo: Arc<RiskRepository>,
        department_repo: Arc<DepartmentRepository>,
        user_repo: Arc<UserRepository>,
        task_repo: Arc<TaskRepository>,
        comment_repo: Arc<CommentRepository>,
        audit_log_service: Arc<AuditLogService>,
    ) -> Self {
        Self {
            risk_repo,
            department_repo,
            user_repo,
            task_repo,
            comment_repo,
            audit_log_service,
        }
    }

    fn resource_refs(risk: &RiskModel) -> ResourceRefs {
        ResourceRefs {
            department_id: Some(risk.department_id),
            owner_id: Some(risk.owner_id),
            ..Default::default()
        }
    }

    async fn to_responses(&self, risks: &[RiskModel]) -> AppResult<Vec<RiskResponse>> {
        let department_ids: Vec<Uuid> = risks.iter().map(|r| r.department_id).collect();
        let owner_ids: Vec<Uuid> = risks.iter().map(|r| r.owner_id).collect();

        let departments =
            department_ref_map(self.department_repo.find_by_ids(&department_ids).await?);
        let owners = user_ref_map(self.user_repo.find_by_ids(&owner_ids).await?);

        let mut responses = Vec::with_capacity(risks.len());
        for risk in risks {
            let status = risk.status().map_err(AppError::InternalServerError)?;
            let likelihood = risk.likelihood().map_err(AppError::InternalServerError)?;
            let impact = risk.impact().map_err(AppError::InternalServerError)?;

            let mut response = RiskResponse::from_model(risk, status, likelihood, impact);
            response.department = departments.get(&risk.department_id).cloned();
            response.owner = owners.get(&risk.owner_id).cloned();
            responses.push(response);
        }

        Ok(responses)
    }

    pub async fn list_risks(
        &self,
        actor: &SessionUser,
        filter: &RiskFilterDto,
        page: u64,
        limit: u64,
    ) -> AppResult<PaginatedResponse<RiskResponse>> {
        let scope = PermissionChecker::allowed_scope(actor)?;

        let mut filter = filter.clone();
        if !actor.is_admin() {
            filter.department_id = None;
        }

        let (risks, total) = self
            .risk_repo
            .find_with_filter(&scope, &filter, page, limit)
            .await?;

        let responses = self.to_responses(&risks).await?;
        Ok(PaginatedResponse::new(responses, page, limit, total))
    }

    pub async fn get_risk(&self, actor: &SessionUser, id: Uuid) -> AppResult<RiskDetailResponse> {
        let risk = self
            .risk_repo
            .find_by_id(id)
            .await?
            .ok_or_else(|| AppError::NotFound("Risk not found".to_string()))?;

        if !PermissionChecker::can_access_resource(actor, &Self::resource_refs(&risk), Action::Read)
        {
            return Err(AppError::Forbidden("Cannot access this risk".to_string()));
        }

        let risk_response = self
            .to_responses(std::slice::from_ref(&risk))
            .await?
            .pop()
            .ok_or_else(|| {
                AppError::InternalServerError("Failed to build risk response".to_string())
            })?;

        let tasks = self.task_repo.find_by_risk(id).await?;
        let comments = self.comment_repo.find_by_risk(id).await?;

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

        Ok(RiskDetailResponse {
            risk: risk_response,
            tasks: task_responses,
            comments: comment_responses,
        })
    }

    pub async fn create_risk(
        &self,
        actor: &SessionUser,
        payload: CreateRiskDto,
    ) -> AppResult<RiskResponse> {
        if !PermissionChecker::can_create_risk_or_task(actor) {
            return Err(AppError::Forbidden(
                "Only managers and administrators can create risks".to_string(),
            ));
        }

        if self
            .department_repo
            .find_by_id(payload.department_id)
            .await?
            .is_none()
        {
            return Err(AppError::BadRequest("Department not found".to_string()));
        }

        // 所有者はサーバー側でセッションから決める
        let mut active = RiskActiveModel::new();
        active.title = Set(payload.title.trim().to_string());
        active.description = Set(payload.description.trim().to_string());
        active.category = Set(payload.category.trim().to_string());
        active.likelihood = Set(payload.likelihood.as_str().to_string());
        active.impact = Set(payload.impact.as_str().to_string());
        active.department_id = Set(payload.department_id);
        active.owner_id = Set(actor.user_id);
        active.mitigation_plan = Set(payload.mitigation_plan);

        let risk = self.risk_repo.insert(active).await?;

        info!(risk_id = %risk.id, actor_id = %actor.user_id, "Risk created");

        self.audit_log_service
            .record(RecordParams {
                entity_type: EntityType::Risk,
                entity_id: Some(risk.id),
                action: AuditAction::Created,
                actor_id: actor.user_id,
                metadata: Some(json!({
                    "title": risk.title,
                    "likelihood": risk.likelihood,
                    "impact": risk.impact,
                })),
            })
            .await;

        Ok(self
            .to_responses(std::slice::from_ref(&risk))
            .await?
            .pop()
            .ok_or_else(|| {
                AppError::InternalServerError("Failed to build risk response".to_string())
            })?)
    }

    pub async fn update_risk(
        &self,
        actor: &SessionUser,
        id: Uuid,
        payload: UpdateRiskDto,
    ) -> AppResult<RiskResponse> {
        let existing = self
            .risk_repo
            .find_by_id(id)
            .await?
            .ok_or_else(|| AppError::NotFound("Risk not found".to_string()))?;

        if !PermissionChecker::can_access_resource(
            actor,
            &Self::resource_refs(&existing),
            Action::Write,
        ) {
            return Err(AppError::Forbidden("Cannot update this risk".to_string()));
        }

        let old_status = existing.status().map_err(AppError::InternalServerError)?;
        let changed_fields = payload.changed_fields();

        let resolved_at_was_null = existing.resolved_at.is_none();
        let mut active: RiskActiveModel = existing.into();

        if let Some(title) = &payload.title {
            active.title = Set(title.trim().to_string());
        }
        if let Some(description) = &payload.description {
            active.description = Set(description.trim().to_string());
        }
        if let Some(category) = &payload.category {
            active.category = Set(category.trim().to_string());
        }
        if let Some(likelihood) = payload.likelihood {
            active.likelihood = Set(likelihood.as_str().to_string());
        }
        if let Some(impact) = payload.impact {
            active.impact = Set(impact.as_str().to_string());
        }
        if let Some(mitigation_plan) = payload.mitigation_plan.clone() {
            active.mitigation_plan = Set(mitigation_plan);
        }
        if let Some(suggestions) = payload.ai_mitigation_suggestions.clone() {
            active.ai_mitigation_suggestions = Set(suggestions);
        }
        if let Some(status) = payload.status {
            active.status = Set(status.as_str().to_string());
            // 終端ステータスへの遷移で一度だけresolved_atを刻印する
            if status.is_terminal() && resolved_at_was_null {
                active.resolved_at = Set(Some(Utc::now()));
            }
        }

        let risk = self.risk_repo.update(active).await?;

        if let Some(new_status) = payload.status {
            if new_status != old_status {
                self.audit_log_service
                    .record_status_change(
                        EntityType::Risk,
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
                entity_type: EntityType::Risk,
                entity_id: Some(id),
                action: AuditAction::Updated,
                actor_id: actor.user_id,
                metadata: Some(json!({ "changes": changed_fields })),
            })
            .await;

        Ok(self
            .to_responses(std::slice::from_ref(&risk))
            .await?
            .pop()
            .ok_or_else(|| {
                AppError::InternalServerError("Failed to build risk response".to_string())
            })?)
    }

    pub async fn delete_risk(&self, actor: &SessionUser, id: Uuid) -> AppResult<()> {
        if !PermissionChecker::can_delete(actor) {
            return Err(AppError::Forbidden(
                "Only administrators can delete risks".to_string(),
            ));
        }

        let risk = self
            .risk_repo
            .find_by_id(id)
            .await?
            .ok_or_else(|| AppError::NotFound("Risk not found".to_string()))?;

        self.risk_repo.delete_by_id(id).await?;

        self.audit_log_service
            .record(RecordParams {
                entity_type: EntityType::Risk,
                entity_id: Some(id),
                action: AuditAction::Deleted,
                actor_id: actor.user_id,
                metadata: Some(json!({ "title": risk.title })),
            })
            .await;

        Ok(())
    }
}
