// irms-backend/src/utils/jwt.rs

use crate::domain::user_model::SessionUser;
use chrono::{Duration, Utc};
use jsonwebtoken::{decode, encode, Algorithm, DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};
use std::env;
use thiserror::Error;
use uuid::Uuid;

/// JWT関連のエラー
#[derive(Error, Debug)]
pub enum JwtError {
    #[error("Failed to encode JWT: {0}")]
    EncodingError(#[from] jsonwebtoken::errors::Error),

    #[error("JWT token has expired")]
    TokenExpired,

    #[error("Invalid JWT token")]
    InvalidToken,

    #[error("Missing JWT secret key")]
    MissingSecretKey,

    #[error("Invalid JWT configuration: {0}")]
    ConfigurationError(String),
}

/// セッショントークンのClaims
///
/// `user` がリクエスト処理における唯一の認可コンテキスト。
/// role はデシリアライズ時に閉じたenumへ検証される
#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct SessionTokenClaims {
    /// Subject (user ID)
    pub sub: String,
    /// Issued at
    pub iat: i64,
    /// Expiration time
    pub exp: i64,
    /// Issuer
    pub iss: String,
    /// Audience
    pub aud: String,
    /// JWT ID
    pub jti: String,
    /// User information
    pub user: SessionUser,
}

/// JWT設定
#[derive(Debug, Clone)]
pub struct JwtConfig {
    /// JWT秘密鍵
    pub secret_key: String,
    /// セッショントークンの有効期限（時間）。固定24時間
    pub session_expiry_hours: i64,
    /// 発行者
    pub issuer: String,
    /// 対象者
    pub audience: String,
}

impl JwtConfig {
    /// 環境変数から設定を読み込み
    pub fn from_env() -> Result<Self, JwtError> {
        let secret_key = env::var("JWT_SECRET")
            .or_else(|_| env::var("JWT_SECRET_KEY"))
            .map_err(|_| JwtError::MissingSecretKey)?;

        Ok(Self::with_secret(secret_key))
    }

    /// 秘密鍵を指定して既定値で設定を作成
    pub fn with_secret(secret_key: String) -> Self {
        Self {
            secret_key,
            session_expiry_hours: 24,
            issuer: "irms-backend".to_string(),
            audience: "irms-backend-users".to_string(),
        }
    }

    /// 秘密鍵の検証
    pub fn validate(&self) -> Result<(), JwtError> {
        if self.secret_key.len() < 32 {
            return Err(JwtError::ConfigurationError(
                "JWT secret key must be at least 32 characters".to_string(),
            ));
        }

        if self.session_expiry_hours <= 0 {
            return Err(JwtError::ConfigurationError(
                "Session expiry must be positive".to_string(),
            ));
        }

        Ok(())
    }
}

/// JWTトークン管理
pub struct JwtManager {
    config: JwtConfig,
    encoding_key: EncodingKey,
    decoding_key: DecodingKey,
    validation: Validation,
}

impl JwtManager {
    /// 新しいJwtManagerを作成
    pub fn new(config: JwtConfig) -> Result<Self, JwtError> {
        config.validate()?;

        let encoding_key = EncodingKey::from_secret(config.secret_key.as_bytes());
        let decoding_key = DecodingKey::from_secret(config.secret_key.as_bytes());

        let mut validation = Validation::new(Algorithm::HS256);
        validation.set_issuer(&[&config.issuer]);
        validation.set_audience(&[&config.audience]);
        validation.validate_exp = true;

        Ok(Self {
            config,
            encoding_key,
            decoding_key,
            validation,
        })
    }

    /// 環境変数から設定を読み込んでJwtManagerを作成
    pub fn from_env() -> Result<Self, JwtError> {
        let config = JwtConfig::from_env()?;
        Self::new(config)
    }

    /// セッショントークンを生成（固定24時間有効）
    pub fn generate_session_token(&self, user: SessionUser) -> Result<String, JwtError> {
        let now = Utc::now();
        let expires_at = now + Duration::hours(self.config.session_expiry_hours);

        let claims = SessionTokenClaims {
            sub: user.user_id.to_string(),
            iat: now.timestamp(),
            exp: expires_at.timestamp(),
            iss: self.config.issuer.clone(),
            aud: self.config.audience.clone(),
            jti: Uuid::new_v4().to_string(),
            user,
        };

        let token = encode(&Header::new(Algorithm::HS256), &claims, &self.encoding_key)?;
        Ok(token)
    }

    /// セッショントークンを検証してClaimsを取得
    pub fn verify_session_token(&self, token: &str) -> Result<SessionTokenClaims, JwtError> {
        let token_data = decode::<SessionTokenClaims>(token, &self.decoding_key, &self.validation)
            .map_err(|e| match e.kind() {
                jsonwebtoken::errors::ErrorKind::ExpiredSignature => JwtError::TokenExpired,
                _ => JwtError::InvalidToken,
            })?;

        Ok(token_data.claims)
    }

    /// セッション有効期限（時間）を取得
    pub fn session_expiry_hours(&self) -> i64 {
        self.config.session_expiry_hours
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::role::Role;

    fn test_manager() -> JwtManager {
        let config = JwtConfig::with_secret(
            "unit-test-secret-key-that-is-long-enough-123456".to_string(),
        );
        JwtManager::new(config).unwrap()
    }

    fn test_user() -> SessionUser {
        SessionUser {
            user_id: Uuid::new_v4(),
            name: "Sarah Manager".to_string(),
            email: "manager.engineering@irms.com".to_string(),
            role: Role::Manager,
            department_id: Some(Uuid::new_v4()),
        }
    }

    #[test]
    fn test_round_trip_preserves_claims() {
        let manager = test_manager();
        let user = test_user();

        let token = manager.generate_session_token(user.clone()).unwrap();
        let claims = manager.verify_session_token(&token).unwrap();

        assert_eq!(claims.sub, user.user_id.to_string());
        assert_eq!(claims.user, user);
        assert_eq!(claims.user.role, Role::Manager);
        assert_eq!(claims.user.department_id, user.department_id);
    }

    #[test]
    fn test_expiry_is_24_hours() {
        let manager = test_manager();
        let token = manager.generate_session_token(test_user()).unwrap();
        let claims = manager.verify_session_token(&token).unwrap();

        let lifetime = claims.exp - claims.iat;
        assert_eq!(lifetime, 24 * 60 * 60);
    }

    #[test]
    fn test_tampered_token_rejected() {
        let manager = test_manager();
        let token = manager.generate_session_token(test_user()).unwrap();

        let mut tampered = token.clone();
        tampered.pop();
        tampered.push('x');

        assert!(matches!(
            manager.verify_session_token(&tampered),
            Err(JwtError::InvalidToken)
        ));
    }

    #[test]
    fn test_token_from_other_secret_rejected() {
        let manager = test_manager();
        let other = JwtManager::new(JwtConfig::with_secret(
            "another-secret-key-that-is-also-long-enough!!".to_string(),
        ))
        .unwrap();

        let token = other.generate_session_token(test_user()).unwrap();
        assert!(manager.verify_session_token(&token).is_err());
    }

    #[test]
    fn test_short_secret_rejected() {
        let config = JwtConfig::with_secret("short".to_string());
        assert!(matches!(
            JwtManager::new(config),
            Err(JwtError::ConfigurationError(_))
        ));
    }
}
