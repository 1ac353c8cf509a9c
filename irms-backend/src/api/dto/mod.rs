// irms-backend/src/api/dto/mod.rs

pub mod ai_dto;
pub mod audit_log_dto;
pub mod auth_dto;
pub mod category_dto;
pub mod comment_dto;
pub mod common;
pub mod dashboard_dto;
pub mod department_dto;
pub mod incident_dto;
pub mod risk_dto;
pub mod task_dto;
pub mod user_dto;

use serde::{Deserialize, Deserializer};

/// PATCHのフィールド欠落とnullを区別するためのデシリアライザ。
/// 欠落 -> None、null -> Some(None)、値 -> Some(Some(v))
pub(crate) fn double_option<'de, T, D>(deserializer: D) -> Result<Option<Option<T>>, D::Error>
where
    T: Deserialize<'de>,
    D: Deserializer<'de>,
{
    Deserialize::deserialize(deserializer).map(Some)
}
