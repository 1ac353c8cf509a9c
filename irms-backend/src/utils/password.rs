// irms-backend/src/utils/password.rs

use argon2::{
    password_hash::{rand_core::OsRng, PasswordHash, PasswordHasher, PasswordVerifier, SaltString},
    Argon2,
};
use once_cell::sync::Lazy;
use regex::Regex;
use thiserror::Error;

static UPPERCASE_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"[A-Z]").unwrap());
static LOWERCASE_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"[a-z]").unwrap());
static DIGIT_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"[0-9]").unwrap());

/// パスワード関連のエラー
#[derive(Error, Debug)]
pub enum PasswordError {
    #[error("Password hashing failed: {0}")]
    HashingError(#[from] argon2::password_hash::Error),

    #[error("Password verification failed")]
    VerificationFailed,

    #[error("Weak password: {0}")]
    WeakPassword(String),
}

/// パスワード強度要件
#[derive(Debug, Clone)]
pub struct PasswordPolicy {
    /// 最小文字数
    pub min_length: usize,
    /// 最大文字数
    pub max_length: usize,
    /// 大文字が必要
    pub require_uppercase: bool,
    /// 小文字が必要
    pub require_lowercase: bool,
    /// 数字が必要
    pub require_digit: bool,
}

impl Default for PasswordPolicy {
    fn default() -> Self {
        Self {
            min_length: 8,
            max_length: 128,
            require_uppercase: true,
            require_lowercase: true,
            require_digit: true,
        }
    }
}

impl PasswordPolicy {
    /// パスワードがポリシーを満たすか検証
    pub fn check(&self, password: &str) -> Result<(), PasswordError> {
        if password.len() < self.min_length {
            return Err(PasswordError::WeakPassword(format!(
                "Password must be at least {} characters",
                self.min_length
            )));
        }

        if password.len() > self.max_length {
            return Err(PasswordError::WeakPassword(format!(
                "Password must be {} characters or less",
                self.max_length
            )));
        }

        if self.require_uppercase && !UPPERCASE_RE.is_match(password) {
            return Err(PasswordError::WeakPassword(
                "Password must contain at least one uppercase letter".to_string(),
            ));
        }

        if self.require_lowercase && !LOWERCASE_RE.is_match(password) {
            return Err(PasswordError::WeakPassword(
                "Password must contain at least one lowercase letter".to_string(),
            ));
        }

        if self.require_digit && !DIGIT_RE.is_match(password) {
            return Err(PasswordError::WeakPassword(
                "Password must contain at least one number".to_string(),
            ));
        }

        Ok(())
    }
}

/// パスワードのハッシュ化と検証
pub struct PasswordManager {
    argon2: Argon2<'static>,
    policy: PasswordPolicy,
}

impl Default for PasswordManager {
    fn default() -> Self {
        Self::new()
    }
}

impl PasswordManager {
    pub fn new() -> Self {
        Self {
            argon2: Argon2::default(),
            policy: PasswordPolicy::default(),
        }
    }

    pub fn with_policy(policy: PasswordPolicy) -> Self {
        Self {
            argon2: Argon2::default(),
            policy,
        }
    }

    pub fn policy(&self) -> &PasswordPolicy {
        &self.policy
    }

    /// ポリシーを検証した上でパスワードをハッシュ化
    pub fn hash_password(&self, password: &str) -> Result<String, PasswordError> {
        self.policy.check(password)?;

        let salt = SaltString::generate(&mut OsRng);
        let hash = self.argon2.hash_password(password.as_bytes(), &salt)?;
        Ok(hash.to_string())
    }

    /// パスワードを検証。不一致はVerificationFailed
    pub fn verify_password(&self, password: &str, hash: &str) -> Result<(), PasswordError> {
        let parsed_hash =
            PasswordHash::new(hash).map_err(|_| PasswordError::VerificationFailed)?;

        self.argon2
            .verify_password(password.as_bytes(), &parsed_hash)
            .map_err(|_| PasswordError::VerificationFailed)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_policy_rejects_weak_passwords() {
        let policy = PasswordPolicy::default();

        assert!(policy.check("Ab1").is_err()); // too short
        assert!(policy.check("alllowercase1").is_err()); // no uppercase
        assert!(policy.check("ALLUPPERCASE1").is_err()); // no lowercase
        assert!(policy.check("NoDigitsHere").is_err()); // no digit
        assert!(policy.check("GoodPass123").is_ok());
    }

    #[test]
    fn test_hash_and_verify() {
        let manager = PasswordManager::new();
        let hash = manager.hash_password("Sup3rSecret").unwrap();

        // ハッシュは平文を含まない
        assert!(!hash.contains("Sup3rSecret"));
        assert!(hash.starts_with("$argon2"));

        assert!(manager.verify_password("Sup3rSecret", &hash).is_ok());
        assert!(matches!(
            manager.verify_password("WrongPass1", &hash),
            Err(PasswordError::VerificationFailed)
        ));
    }

    #[test]
    fn test_same_password_different_salts() {
        let manager = PasswordManager::new();
        let hash1 = manager.hash_password("Sup3rSecret").unwrap();
        let hash2 = manager.hash_password("Sup3rSecret").unwrap();
        assert_ne!(hash1, hash2);
    }

    #[test]
    fn test_garbage_hash_fails_verification() {
        let manager = PasswordManager::new();
        assert!(matches!(
            manager.verify_password("anything", "not-a-phc-hash"),
            Err(PasswordError::VerificationFailed)
        ));
    }
}
