// irms-backend/src/service/incident_category_service.rs

use crate::api::dto::category_dto::{CategoryResponse, CreateCategoryDto, UpdateCategoryDto};
use crate::api::dto::common::PaginatedResponse;
use crate::domain::audit_log_model::{AuditAction, EntityType};
use crate::domain::user_model::SessionUser;
use crate::error::{AppError, AppResult};
use crate::repository::incident_category_repository::IncidentCategoryRepository;
use crate::repository::{CreateOutcome, DeleteOutcome, UpdateOutcome};
use crate::service::audit_log_service::{AuditLogService, RecordParams};
use crate::utils::permission::PermissionChecker;
use serde_json::json;
use std::sync::Arc;
use uuid::Uuid;

pub struct IncidentCategoryService {
    category_repo: Arc<IncidentCategoryRepository>,
    audit_log_service: Arc<AuditLogService>,
}

impl IncidentCategoryService {
    pub fn new(
        category_repo: Arc<IncidentCategoryRepository>,
        audit_log_service: Arc<AuditLogService>,
    ) -> Self {
        Self {
            category_repo,
            audit_log_service,
        }
    }

    pub async fn list_categories(
        &self,
        page: u64,
        limit: u64,
    ) -> AppResult<PaginatedResponse<CategoryResponse>> {
        let (categories, total) = self.category_repo.find_all(page, limit).await?;
        let responses = categories.into_iter().map(CategoryResponse::from).collect();
        Ok(PaginatedResponse::new(responses, page, limit, total))
    }

    pub async fn get_category(&self, id: Uuid) -> AppResult<CategoryResponse> {
        let category = self
            .category_repo
            .find_by_id(id)
            .await?
            .ok_or_else(|| AppError::NotFound("Category not found".to_string()))?;
        Ok(CategoryResponse::from(category))
    }

    pub async fn create_category(
        &self,
        actor: &SessionUser,
        payload: CreateCategoryDto,
    ) -> AppResult<CategoryResponse> {
        if !PermissionChecker::can_manage_master_data(actor) {
            return Err(AppError::Forbidden(
                "Only administrators can create categories".to_string(),
            ));
        }

        let outcome = self
            .category_repo
            .create(payload.name.trim().to_string(), payload.description)
            .await?;

        let category = match outcome {
            CreateOutcome::Created(category) => category,
            CreateOutcome::Duplicate => {
                return Err(AppError::Conflict(
                    "A category with this name already exists".to_string(),
                ))
            }
        };

        self.audit_log_service
            .record(RecordParams {
                entity_type: EntityType::Category,
                entity_id: Some(category.id),
                action: AuditAction::Created,
                actor_id: actor.user_id,
                metadata: Some(json!({ "name": category.name })),
            })
            .await;

        Ok(CategoryResponse::from(category))
    }

    pub async fn update_category(
        &self,
        actor: &SessionUser,
        id: Uuid,
        payload: UpdateCategoryDto,
    ) -> AppResult<CategoryResponse> {
        if !PermissionChecker::can_manage_master_data(actor) {
            return Err(AppError::Forbidden(
                "Only administrators can update categories".to_string(),
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
            .category_repo
            .update(
                id,
                payload.name.map(|n| n.trim().to_string()),
                payload.description,
            )
            .await?;

        let category = match outcome {
            UpdateOutcome::Updated(category) => category,
            UpdateOutcome::NotFound => {
                return Err(AppError::NotFound("Category not found".to_string()))
            }
            UpdateOutcome::Duplicate => {
                return Err(AppError::Conflict(
                    "A category with this name already exists".to_string(),
                ))
            }
        };

        self.audit_log_service
            .record(RecordParams {
                entity_type: EntityType::Category,
                entity_id: Some(category.id),
                action: AuditAction::Updated,
                actor_id: actor.user_id,
                metadata: Some(json!({ "changes": changed_fields })),
            })
            .await;

        Ok(CategoryResponse::from(category))
    }

    pub async fn delete_category(&self, actor: &SessionUser, id: Uuid) -> AppResult<()> {
        if !PermissionChecker::can_delete(actor) {
            return Err(AppError::Forbidden(
                "Only administrators can delete categories".to_string(),
            ));
        }

        let name = self.category_repo.find_by_id(id).await?.map(|c| c.name);

        match self.category_repo.delete(id).await? {
            DeleteOutcome::Deleted => {}
            DeleteOutcome::NotFound => {
                return Err(AppError::NotFound("Category not found".to_string()))
            }
            DeleteOutcome::HasDependents(_) => {
                return Err(AppError::BadRequest(
                    "Cannot delete category with associated incidents".to_string(),
                ))
            }
        }

        self.audit_log_service
            .record(RecordParams {
                entity_type: EntityType::Category,
                entity_id: Some(id),
                action: AuditAction::Deleted,
                actor_id: actor.user_id,
                metadata: name.map(|name| json!({ "name": name })),
            })
            .await;

        Ok(())
    }
}
