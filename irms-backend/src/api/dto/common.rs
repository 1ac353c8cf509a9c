// irms-backend/src/api/dto/common.rs

use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// ページネーションクエリパラメータ
#[derive(Debug, Clone, Default, Deserialize)]
pub struct PaginationQuery {
    pub page: Option<u64>,
    pub limit: Option<u64>,
}

impl PaginationQuery {
    /// デフォルト値を適用してページとlimitを取得
    pub fn get_pagination(&self) -> (u64, u64) {
        let page = self.page.unwrap_or(1).max(1);
        let limit = self.limit.unwrap_or(10).clamp(1, 100);
        (page, limit)
    }
}

/// ページネーション情報
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PaginationMeta {
    pub page: u64,
    pub limit: u64,
    pub total: u64,
    pub total_pages: u64,
}

impl PaginationMeta {
    pub fn new(page: u64, limit: u64, total: u64) -> Self {
        Self {
            page,
            limit,
            total,
            total_pages: total.div_ceil(limit),
        }
    }
}

/// ページネーション付きレスポンス
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PaginatedResponse<T> {
    pub data: Vec<T>,
    pub pagination: PaginationMeta,
}

impl<T> PaginatedResponse<T> {
    pub fn new(data: Vec<T>, page: u64, limit: u64, total: u64) -> Self {
        Self {
            data,
            pagination: PaginationMeta::new(page, limit, total),
        }
    }
}

/// 操作結果メッセージのみのレスポンス
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MessageResponse {
    pub message: String,
}

impl MessageResponse {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }
}

/// 関連エンティティの名前参照（部門・カテゴリなど）
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NamedRef {
    pub id: Uuid,
    pub name: String,
}

/// 関連ユーザーの参照
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UserRef {
    pub id: Uuid,
    pub name: String,
    pub email: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_pagination_defaults() {
        let query = PaginationQuery::default();
        assert_eq!(query.get_pagination(), (1, 10));
    }

    #[test]
    fn test_pagination_clamping() {
        let query = PaginationQuery {
            page: Some(0),
            limit: Some(1000),
        };
        assert_eq!(query.get_pagination(), (1, 100));
    }

    #[test]
    fn test_pagination_meta() {
        let meta = PaginationMeta::new(2, 10, 25);
        assert_eq!(meta.page, 2);
        assert_eq!(meta.limit, 10);
        assert_eq!(meta.total, 25);
        assert_eq!(meta.total_pages, 3);
    }

    #[test]
    fn test_pagination_meta_exact_fit() {
        let meta = PaginationMeta::new(1, 10, 20);
        assert_eq!(meta.total_pages, 2);
    }

    #[test]
    fn test_wire_format_uses_camel_case() {
        let response = PaginatedResponse::new(vec![1, 2, 3], 1, 3, 10);
        let json = serde_json::to_value(&response).unwrap();
        assert!(json["pagination"].get("totalPages").is_some());
        assert_eq!(json["pagination"]["totalPages"], 4);
        assert_eq!(json["data"].as_array().unwrap().len(), 3);
    }
}
