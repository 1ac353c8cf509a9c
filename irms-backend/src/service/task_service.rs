// irms-backend/src/service/task_service.rs

use crate::api::dto::common::{NamedRef, PaginatedResponse};
use crate::api::dto::task_dto::{CreateTaskDto, TaskFilterDto, TaskResponse, UpdateTaskDto};
use crate::domain::audit_log_model::{AuditAction, EntityType};
use crate::domain::role::Role;
use crate::domain::task_model::{ActiveModel as TaskActiveModel, Model as TaskModel};
use crate::domain::user_model::SessionUser;
use crate::error::{AppError, AppResult};
use crate::repository::incident_repository::IncidentRepository;
use crate::repository::risk_repository::RiskRepository;
use crate::repository::task_repository::TaskRepository;
use crate::repository::user_repository::UserRepository;
use crate::service::audit_log_service::{AuditLogService, RecordParams};
use crate::service::user_ref_map;
use crate::utils::permission::PermissionChecker;
use sea_orm::{ActiveModelBehavior, Set};
use serde_json::json;
use std::sync::Arc;
use tracing::info;
use uuid::Uuid;

pub struct TaskService {
    task_repo: Arc<TaskRepository>,
    user_repo: Arc<UserRepository>,
    incident_repo: Arc<IncidentRepository>,
    risk_repo: Arc<RiskRepository>,
    audit_log_service: Arc<AuditLogService>,
}

impl TaskService {
    pub fn new(
        task_repo: Arc<TaskRepository>,
        user_repo: Arc<UserRepository>,
        incident_repo: Arc<IncidentRepository>,
        risk_repo: Arc<RiskRepository>,
        audit_log_service: Arc<AuditLogService>,
    ) -> Self {
        Self {
            task_repo,
            user_repo,
            incident_repo,
            risk_repo,
            audit_log_service,
        }
    }

    /// タスクは部門を持たないため、マネージャー以上は全件、
    /// 従業員は自分の担当分のみという規則になる
    fn can_access_task(actor: &SessionUser, task: &TaskModel) -> bool {
        actor.is_manager_or_admin() || task.assigned_to_id == actor.user_id
    }

    async fn to_responses(&self, tasks: &[TaskModel]) -> AppResult<Vec<TaskResponse>> {
        let user_ids: Vec<Uuid> = tasks.iter().map(|t| t.assigned_to_id).collect();
        let incident_ids: Vec<Uuid> = tasks.iter().filter_map(|t| t.related_incident_id).collect();
        let risk_ids: Vec<Uuid> = tasks.iter().filter_map(|t| t.related_risk_id).collect();

        let users = user_ref_map(self.user_repo.find_by_ids(&user_ids).await?);
        let incidents: std::collections::HashMap<Uuid, NamedRef> = self
            .incident_repo
            .find_by_ids(&incident_ids)
            .await?
            .into_iter()
            .map(|i| {
                (
                    i.id,
                    NamedRef {
                        id: i.id,
                        name: i.title,
                    },
                )
            })
            .collect();
        let risks: std::collections::HashMap<Uuid, NamedRef> = self
            .risk_repo
            .find_by_ids(&risk_ids)
            .await?
            .into_iter()
            .map(|r| {
                (
                    r.id,
                    NamedRef {
                        id: r.id,
                        name: r.title,
                    },
                )
            })
            .collect();

        let mut responses = Vec::with_capacity(tasks.len());
        for task in tasks {
            let status = task.status().map_err(AppError::InternalServerError)?;
            let mut response = TaskResponse::from_model(task, status);
            response.assigned_to = users.get(&task.assigned_to_id).cloned();
            response.related_incident = task
                .related_incident_id
                .and_then(|id| incidents.get(&id).cloned());
            response.related_risk = task.related_risk_id.and_then(|id| risks.get(&id).cloned());
            responses.push(response);
        }

        Ok(responses)
    }

    pub async fn list_tasks(
        &self,
        actor: &SessionUser,
        filter: &TaskFilterDto,
        page: u64,
        limit: u64,
    ) -> AppResult<PaginatedResponse<TaskResponse>> {
        // 従業員は常に自分の担当分のみ。マネージャー以上はmyTasksで絞り込める
        let assigned_to = if actor.role == Role::Employee {
            Some(actor.user_id)
        } else if filter.my_tasks {
            Some(actor.user_id)
        } else {
            None
        };

        let (tasks, total) = self
            .task_repo
            .find_with_filter(assigned_to, filter, page, limit)
            .await?;

        let responses = self.to_responses(&tasks).await?;
        Ok(PaginatedResponse::new(responses, page, limit, total))
    }

    pub async fn get_task(&self, actor: &SessionUser, id: Uuid) -> AppResult<TaskResponse> {
        let task = self
            .task_repo
            .find_by_id(id)
            .await?
            .ok_or_else(|| AppError::NotFound("Task not found".to_string()))?;

        if !Self::can_access_task(actor, &task) {
            return Err(AppError::Forbidden("Cannot access this task".to_string()));
        }

        Ok(self
            .to_responses(std::slice::from_ref(&task))
            .await?
            .pop()
            .ok_or_else(|| {
                AppError::InternalServerError("Failed to build task response".to_string())
            })?)
    }

    pub async fn create_task(
        &self,
        actor: &SessionUser,
        payload: CreateTaskDto,
    ) -> AppResult<TaskResponse> {
        if !PermissionChecker::can_create_risk_or_task(actor) {
            return Err(AppError::Forbidden(
                "Only managers and administrators can create tasks".to_string(),
            ));
        }

        if self
            .user_repo
            .find_by_id(payload.assigned_to_id)
            .await?
            .is_none()
        {
            return Err(AppError::BadRequest("Assignee not found".to_string()));
        }
        if let Some(incident_id) = payload.related_incident_id {
            if self.incident_repo.find_by_id(incident_id).await?.is_none() {
                return Err(AppError::BadRequest("Related incident not found".to_string()));
            }
        }
        if let Some(risk_id) = payload.related_risk_id {
            if self.risk_repo.find_by_id(risk_id).await?.is_none() {
                return Err(AppError::BadRequest("Related risk not found".to_string()));
            }
        }

        let mut active = TaskActiveModel::new();
        active.title = Set(payload.title.trim().to_string());
        active.description = Set(payload.description);
        active.assigned_to_id = Set(payload.assigned_to_id);
        active.related_incident_id = Set(payload.related_incident_id);
        active.related_risk_id = Set(payload.related_risk_id);
        active.due_date = Set(payload.due_date);

        let task = self.task_repo.insert(active).await?;

        info!(task_id = %task.id, actor_id = %actor.user_id, "Task created");

        self.audit_log_service
            .record(RecordParams {
                entity_type: EntityType::Task,
                entity_id: Some(task.id),
                action: AuditAction::Created,
                actor_id: actor.user_id,
                metadata: Some(json!({
                    "title": task.title,
                    "assignedToId": task.assigned_to_id,
                })),
            })
            .await;

        Ok(self
            .to_responses(std::slice::from_ref(&task))
            .await?
            .pop()
            .ok_or_else(|| {
                AppError::InternalServerError("Failed to build task response".to_string())
            })?)
    }

    pub async fn update_task(
        &self,
        actor: &SessionUser,
        id: Uuid,
        payload: UpdateTaskDto,
    ) -> AppResult<TaskResponse> {
        let existing = self
            .task_repo
            .find_by_id(id)
            .await?
            .ok_or_else(|| AppError::NotFound("Task not found".to_string()))?;

        if !Self::can_access_task(actor, &existing) {
            return Err(AppError::Forbidden("Cannot update this task".to_string()));
        }

        // 従業員が変更できるのはステータスのみ。他のフィールドはサイレントに破棄する
        let payload = if actor.role == Role::Employee {
            payload.status_only()
        } else {
            payload
        };

        if let Some(assigned_to_id) = payload.assigned_to_id {
            if self.user_repo.find_by_id(assigned_to_id).await?.is_none() {
                return Err(AppError::BadRequest("Assignee not found".to_string()));
            }
        }

        let old_status = existing.status().map_err(AppError::InternalServerError)?;
        let changed_fields = payload.changed_fields();

        let mut active: TaskActiveModel = existing.into();
        if let Some(title) = &payload.title {
            active.title = Set(title.trim().to_string());
        }
        if let Some(description) = &payload.description {
            active.description = Set(Some(description.clone()));
        }
        if let Some(status) = payload.status {
            active.status = Set(status.as_str().to_string());
        }
        if let Some(assigned_to_id) = payload.assigned_to_id {
            active.assigned_to_id = Set(assigned_to_id);
        }
        if let Some(due_date) = payload.due_date {
            active.due_date = Set(due_date);
        }

        let task = self.task_repo.update(active).await?;

        if let Some(new_status) = payload.status {
            if new_status != old_status {
                self.audit_log_service
                    .record_status_change(
                        EntityType::Task,
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
                entity_type: EntityType::Task,
                entity_id: Some(id),
                action: AuditAction::Updated,
                actor_id: actor.user_id,
                metadata: Some(json!({ "changes": changed_fields })),
            })
            .await;

        Ok(self
            .to_responses(std::slice::from_ref(&task))
            .await?
            .pop()
            .ok_or_else(|| {
                AppError::InternalServerError("Failed to build task response".to_string())
            })?)
    }

    pub async fn delete_task(&self, actor: &SessionUser, id: Uuid) -> AppResult<()> {
        if !PermissionChecker::can_delete(actor) {
            return Err(AppError::Forbidden(
                "Only administrators can delete tasks".to_string(),
            ));
        }

        let task = self
            .task_repo
            .find_by_id(id)
            .await?
            .ok_or_else(|| AppError::NotFound("Task not found".to_string()))?;

        self.task_repo.delete_by_id(id).await?;

        self.audit_log_service
            .record(RecordParams {
                entity_type: EntityType::Task,
                entity_id: Some(id),
                action: AuditAction::Deleted,
                actor_id: actor.user_id,
                metadata: Some(json!({ "title": task.title })),
            })
            .await;

        Ok(())
    }
}
