// irms-backend/src/service/user_service.rs

use crate::api::dto::common::{NamedRef, PaginatedResponse};
use crate::api::dto::user_dto::{CreateUserDto, UpdateUserDto, UserFilterDto, UserResponse};
use crate::domain::audit_log_model::{AuditAction, EntityType};
use crate::domain::user_model::{Model as UserModel, SessionUser};
use crate::error::{AppError, AppResult};
use crate::repository::department_repository::DepartmentRepository;
use crate::repository::user_repository::{UserChanges, UserRepository};
use crate::repository::{CreateOutcome, DeleteOutcome, UpdateOutcome};
use crate::service::audit_log_service::{AuditLogService, RecordParams};
use crate::service::department_ref_map;
use crate::utils::password::PasswordManager;
use crate::utils::permission::PermissionChecker;
use serde_json::json;
use std::sync::Arc;
use tracing::info;
use uuid::Uuid;

pub struct UserService {
    user_repo: Arc<UserRepository>,
    department_repo: Arc<DepartmentRepository>,
    password_manager: Arc<PasswordManager>,
    audit_log_service: Arc<AuditLogService>,
}

impl UserService {
    pub fn new(
        user_repo: Arc<UserRepository>,
        department_repo: Arc<DepartmentRepository>,
        password_manager: Arc<PasswordManager>,
        audit_log_service: Arc<AuditLogService>,
    ) -> Self {
        Self {
            user_repo,
            department_repo,
            password_manager,
            audit_log_service,
        }
    }

    async fn to_response(&self, model: &UserModel) -> AppResult<UserResponse> {
        let role = model.role().map_err(AppError::InternalServerError)?;

        let department = match model.department_id {
            Some(department_id) => self
                .department_repo
                .find_by_id(department_id)
                .await?
                .map(|d| NamedRef {
                    id: d.id,
                    name: d.name,
                }),
            None => None,
        };

        Ok(UserResponse::from_model(model, role, department))
    }

    pub async fn list_users(
        &self,
        actor: &SessionUser,
        filter: &UserFilterDto,
        page: u64,
        limit: u64,
    ) -> AppResult<PaginatedResponse<UserResponse>> {
        if !PermissionChecker::can_manage_master_data(actor) {
            return Err(AppError::Forbidden(
                "Only administrators can list users".to_string(),
            ));
        }

        let (users, total) = self.user_repo.find_with_filter(filter, page, limit).await?;

        let department_ids: Vec<Uuid> =
            users.iter().filter_map(|u| u.department_id).collect();
        let departments = department_ref_map(
            self.department_repo.find_by_ids(&department_ids).await?,
        );

        let mut responses = Vec::with_capacity(users.len());
        for user in &users {
            let role = user.role().map_err(AppError::InternalServerError)?;
            let department = user
                .department_id
                .and_then(|id| departments.get(&id).cloned());
            responses.push(UserResponse::from_model(user, role, department));
        }

        Ok(PaginatedResponse::new(responses, page, limit, total))
    }

    pub async fn get_user(&self, actor: &SessionUser, id: Uuid) -> AppResult<UserResponse> {
        if !PermissionChecker::can_access_user(actor, id) {
            return Err(AppError::Forbidden(
                "Cannot access this user".to_string(),
            ));
        }

        let user = self
            .user_repo
            .find_by_id(id)
            .await?
            .ok_or_else(|| AppError::NotFound("User not found".to_string()))?;

        self.to_response(&user).await
    }

    pub async fn create_user(
        &self,
        actor: &SessionUser,
        payload: CreateUserDto,
    ) -> AppResult<UserResponse> {
        if !PermissionChecker::can_manage_master_data(actor) {
            return Err(AppError::Forbidden(
                "Only administrators can create users".to_string(),
            ));
        }

        if let Some(department_id) = payload.department_id {
            if self.department_repo.find_by_id(department_id).await?.is_none() {
                return Err(AppError::BadRequest("Department not found".to_string()));
            }
        }

        let password_hash = self
            .password_manager
            .hash_password(&payload.password)
            .map_err(|e| AppError::ValidationError(e.to_string()))?;

        let email = payload.email.trim().to_lowercase();
        let outcome = self
            .user_repo
            .create(
                payload.name.trim().to_string(),
                email,
                password_hash,
                payload.role.as_str().to_string(),
                payload.department_id,
            )
            .await?;

        let user = match outcome {
            CreateOutcome::Created(user) => user,
            CreateOutcome::Duplicate => {
                return Err(AppError::Conflict(
                    "A user with this email already exists".to_string(),
                ))
            }
        };

        info!(user_id = %user.id, actor_id = %actor.user_id, "User created");

        self.audit_log_service
            .record(RecordParams {
                entity_type: EntityType::User,
                entity_id: Some(user.id),
                action: AuditAction::Created,
                actor_id: actor.user_id,
                metadata: Some(json!({ "email": user.email, "role": user.role })),
            })
            .await;

        self.to_response(&user).await
    }

    pub async fn update_user(
        &self,
        actor: &SessionUser,
        id: Uuid,
        payload: UpdateUserDto,
    ) -> AppResult<UserResponse> {
        if !PermissionChecker::can_manage_master_data(actor) {
            return Err(AppError::Forbidden(
                "Only administrators can update users".to_string(),
            ));
        }

        if let Some(Some(department_id)) = payload.department_id {
            if self.department_repo.find_by_id(department_id).await?.is_none() {
                return Err(AppError::BadRequest("Department not found".to_string()));
            }
        }

        // パスワードは再ハッシュしてから保存する
        let password_hash = match &payload.password {
            Some(password) => Some(
                self.password_manager
                    .hash_password(password)
                    .map_err(|e| AppError::ValidationError(e.to_string()))?,
            ),
            None => None,
        };

        let mut changed_fields: Vec<&str> = Vec::new();
        if payload.name.is_some() {
            changed_fields.push("name");
        }
        if payload.email.is_some() {
            changed_fields.push("email");
        }
        if payload.password.is_some() {
            changed_fields.push("password");
        }
        if payload.role.is_some() {
            changed_fields.push("role");
        }
        if payload.department_id.is_some() {
            changed_fields.push("departmentId");
        }

        let outcome = self
            .user_repo
            .update(
                id,
                UserChanges {
                    name: payload.name.map(|n| n.trim().to_string()),
                    email: payload.email.map(|e| e.trim().to_lowercase()),
                    password_hash,
                    role: payload.role.map(|r| r.as_str().to_string()),
                    department_id: payload.department_id,
                },
            )
            .await?;

        let user = match outcome {
            UpdateOutcome::Updated(user) => user,
            UpdateOutcome::NotFound => {
                return Err(AppError::NotFound("User not found".to_string()))
            }
            UpdateOutcome::Duplicate => {
                return Err(AppError::Conflict(
                    "A user with this email already exists".to_string(),
                ))
            }
        };

        self.audit_log_service
            .record(RecordParams {
                entity_type: EntityType::User,
                entity_id: Some(user.id),
                action: AuditAction::Updated,
                actor_id: actor.user_id,
                metadata: Some(json!({ "changes": changed_fields })),
            })
            .await;

        self.to_response(&user).await
    }

    pub async fn delete_user(&self, actor: &SessionUser, id: Uuid) -> AppResult<()> {
        if !PermissionChecker::can_delete(actor) {
            return Err(AppError::Forbidden(
                "Only administrators can delete users".to_string(),
            ));
        }

        // 削除前にメールアドレスを控えて監査メタデータに残す
        let email = self
            .user_repo
            .find_by_id(id)
            .await?
            .map(|u| u.email);

        match self.user_repo.delete(id).await? {
            DeleteOutcome::Deleted => {}
            DeleteOutcome::NotFound => {
                return Err(AppError::NotFound("User not found".to_string()))
            }
            DeleteOutcome::HasDependents(counts) => {
                let detail = counts
                    .iter()
                    .filter(|(_, count)| *count > 0)
                    .map(|(kind, count)| format!("{} {}", count, kind))
                    .collect::<Vec<_>>()
                    .join(", ");
                return Err(AppError::BadRequest(format!(
                    "Cannot delete user with associated records ({}). Reassign them first.",
                    detail
                )));
            }
        }

        self.audit_log_service
            .record(RecordParams {
                entity_type: EntityType::User,
                entity_id: Some(id),
                action: AuditAction::Deleted,
                actor_id: actor.user_id,
                metadata: email.map(|email| json!({ "email": email })),
            })
            .await;

        Ok(())
    }
}
