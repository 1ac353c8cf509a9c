// irms-backend/src/service/mod.rs

pub mod ai_service;
pub mod audit_log_service;
pub mod auth_service;
pub mod comment_service;
pub mod dashboard_service;
pub mod department_service;
pub mod incident_category_service;
pub mod incident_service;
pub mod risk_service;
pub mod task_service;
pub mod user_service;

use crate::api::dto::common::{NamedRef, UserRef};
use crate::domain::department_model::Model as DepartmentModel;
use crate::domain::incident_category_model::Model as CategoryModel;
use crate::domain::user_model::Model as UserModel;
use std::collections::HashMap;
use uuid::Uuid;

// レスポンス組み立て用の参照マップ。関連エンティティはまとめて取得してから引く

pub(crate) fn user_ref_map(users: Vec<UserModel>) -> HashMap<Uuid, UserRef> {
    users
        .into_iter()
        .map(|user| {
            (
                user.id,
                UserRef {
                    id: user.id,
                    name: user.name,
                    email: user.email,
                },
            )
        })
        .collect()
}

pub(crate) fn department_ref_map(departments: Vec<DepartmentModel>) -> HashMap<Uuid, NamedRef> {
    departments
        .into_iter()
        .map(|department| {
            (
                department.id,
                NamedRef {
                    id: department.id,
                    name: department.name,
                },
            )
        })
        .collect()
}

pub(crate) fn category_ref_map(categories: Vec<CategoryModel>) -> HashMap<Uuid, NamedRef> {
    categories
        .into_iter()
        .map(|category| {
            (
                category.id,
                NamedRef {
                    id: category.id,
                    name: category.name,
                },
            )
        })
        .collect()
}
