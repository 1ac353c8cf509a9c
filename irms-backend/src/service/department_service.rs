// irms-backend/src/service/department_service.rs

use crate::api::dto::common::PaginatedResponse;
use crate::api::dto::department_dto::{
    CreateDepartmentDto, DepartmentCounts, DepartmentDetailResponse, DepartmentResponse,
    UpdateDepartmentDto,
};
use crate::domain::audit_log_model::{AuditAction, EntityType};
use crate::domain::user_model::SessionUser;
use crate::error::{AppError, AppResult};
use crate::repository::department_repository::DepartmentRepository;
use crate::repository::{CreateOutcome, DeleteOutcome, UpdateOutcome};
use crate::service::audit_log_service::{AuditLogService, RecordParams};
use crate::utils::permission::PermissionChecker;
use serde_json::json;
use std::sync::Arc;
use tracing::info;
use uuid::Uuid;

pub struct DepartmentService {
    department_repo: Arc<DepartmentRepository>,
    audit_log_service: Arc<AuditLogService>,
}

impl DepartmentService {
    pub fn new(
        department_repo: Arc<DepartmentRepository>,
        audit_log_service: Arc<AuditLogService>,
    ) -> Self {
        Self {
            department_repo,
            audit_log_service,
        }
    }

    /// 一覧は認証済みユーザーなら誰でも参照可能（フォーム選択肢に使う）
    pub async fn list_departments(
        &self,
        page: u64,
        limit: u64,
    ) -> AppResult<PaginatedResponse<DepartmentResponse>> {
        let (departments, total) = self.department_repo.find_all(page, limit).await?;
        let responses = departments
            .into_iter()
            .map(DepartmentResponse::from)
            .collect();
        Ok(PaginatedResponse::new(responses, page, limit, total))
    }

    pub async fn get_department(&self, id: Uuid) -> AppResult<DepartmentDetailResponse> {
        let department = self
            .department_repo
            .find_by_id(id)
            .await?
            .ok_or_else(|| AppError::NotFound("Department not found".to_string()))?;

        let (users, incidents, risks) = self.department_repo.count_dependents(id).await?;

        Ok(DepartmentDetailResponse {
            department: DepartmentResponse::from(department),
            counts: DepartmentCounts {
                users,
                incidents,
                risks,
            },
        })
    }

    pub async fn create_department(
        &self,
        actor: &SessionUser,
        payload: CreateDepartmentDto,
    ) -> AppResult<DepartmentResponse> {
        if !PermissionChecker::can_manage_master_data(actor) {
            return Err(AppError::Forbidden(
                "Only administrators can create departments".to_string(),
            ));
        }

        let outcome = self
            .department_repo
            .create(payload.name.trim().to_string(), payload.description)
            .await?;

        let department = match outcome {
            CreateOutcome::Created(department) => department,
            CreateOutcome::Duplicate => {
                return Err(AppError::Conflict(
                    "A department with this name already exists".to_string(),
                ))
            }
        };

        info!(department_id = %department.id, actor_id = %actor.user_id, "Department created");

        self.audit_log_service
            .record(RecordParams {
                entity_type: EntityType::Department,
                entity_id: Some(department.id),
                action: AuditAction::Created,
                actor_id: actor.user_id,
                metadata: Some(json!({ "name": department.name })),
            })
            .await;

        Ok(DepartmentResponse::from(department))
    }

    pub async fn update_department(
        &self,
        actor: &SessionUser,
        id: Uuid,
        payload: UpdateDepartmentDto,
    ) -> AppResult<DepartmentResponse> {
        if !PermissionChecker::can_manage_master_data(actor) {
            return Err(AppError::Forbidden(
                "Only administrators can update departments".to_string(),
            ));
        }

        let mut changed_fields: Vec<&str> = Vec::new();
        if payload.name.is_some() {
            changed_fields.push("name");
        }
        if payload.description.is_some() {
            changed_fields.push("description");
        }

        let outcome = self
            .department_repo
            .update(
                id,
                payload.name.map(|n| n.trim().to_string()),
                payload.description,
            )
            .await?;

        let department = match outcome {
            UpdateOutcome::Updated(department) => department,
            UpdateOutcome::NotFound => {
                return Err(AppError::NotFound("Department not found".to_string()))
            }
            UpdateOutcome::Duplicate => {
                return Err(AppError::Conflict(
                    "A department with this name already exists".to_string(),
                ))
            }
        };

        self.audit_log_service
            .record(RecordParams {
                entity_type: EntityType::Department,
                entity_id: Some(department.id),
                action: AuditAction::Updated,
                actor_id: actor.user_id,
                metadata: Some(json!({ "changes": changed_fields })),
            })
            .await;

        Ok(DepartmentResponse::from(department))
    }

    pub async fn delete_department(&self, actor: &SessionUser, id: Uuid) -> AppResult<()> {
        if !PermissionChecker::can_delete(actor) {
            return Err(AppError::Forbidden(
                "Only administrators can delete departments".to_string(),
            ));
        }

        let name = self
            .department_repo
            .find_by_id(id)
            .await?
            .map(|d| d.name);

        match self.department_repo.delete(id).await? {
            DeleteOutcome::Deleted => {}
            DeleteOutcome::NotFound => {
                return Err(AppError::NotFound("Department not found".to_string()))
            }
            DeleteOutcome::HasDependents(_) => {
                return Err(AppError::BadRequest(
                    "Cannot delete department with associated records. Remove or reassign them first."
                        .to_string(),
                ))
            }
        }

        self.audit_log_service
            .record(RecordParams {
                entity_type: EntityType::Department,
                entity_id: Some(id),
                action: AuditAction::Deleted,
                actor_id: actor.user_id,
                metadata: name.map(|name| json!({ "name": name })),
            })
            .await;

        Ok(())
    }
}
