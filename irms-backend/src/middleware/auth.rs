// irms-backend/src/middleware/auth.rs

use crate::api::AppState;
use crate::domain::user_model::SessionUser;
use crate::error::AppError;
use axum::{
    extract::FromRequestParts,
    http::{header, request::Parts},
};
use axum_extra::extract::cookie::Cookie;
use tracing::warn;

/// 認証済みユーザー情報抽出器。
/// セッショントークンのクレームがリクエスト処理の唯一の認可コンテキストになる
pub struct AuthenticatedUser(pub SessionUser);

impl AuthenticatedUser {
    pub fn user(&self) -> &SessionUser {
        &self.0
    }
}

impl FromRequestParts<AppState> for AuthenticatedUser {
    type Rejection = AppError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        // Authorization ヘッダーからトークンを取得
        let auth_header = parts
            .headers
            .get(header::AUTHORIZATION)
            .and_then(|header| header.to_str().ok())
            .and_then(|auth_str| auth_str.strip_prefix("Bearer "))
            .map(|token| token.to_string());

        // Cookieからトークンを取得（フォールバック）
        let cookie_token = parts
            .headers
            .get_all(header::COOKIE)
            .iter()
            .filter_map(|header| header.to_str().ok())
            .flat_map(|cookie_str| cookie_str.split("; "))
            .filter_map(|cookie_str| Cookie::parse(cookie_str.trim()).ok())
            .find(|cookie| cookie.name() == state.cookie_config.session_cookie_name)
            .map(|cookie| cookie.value().to_string());

        let token = auth_header.or(cookie_token).ok_or_else(|| {
            warn!("Authentication attempt without token");
            AppError::Unauthorized("Authentication required".to_string())
        })?;

        // JWT検証。ロールはデシリアライズ時に閉じたenumへ検証される
        let claims = state
            .jwt_manager
            .verify_session_token(&token)
            .map_err(|e| {
                warn!(error = %e, "Invalid session token");
                AppError::Unauthorized("Invalid or expired token".to_string())
            })?;

        Ok(AuthenticatedUser(claims.user))
    }
}
