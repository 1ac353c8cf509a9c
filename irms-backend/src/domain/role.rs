// irms-backend/src/domain/role.rs

use serde::{Deserialize, Serialize};
use std::fmt;

/// ユーザーロールを表すenum
///
/// DBには文字列で保存されるが、アプリケーション内では必ずこの閉じた型を
/// 経由する。セッション発行時とトークン検証時の両方で変換に失敗したら拒否する
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Role {
    Admin,
    Manager,
    Employee,
}

impl Role {
    /// ロールを文字列として取得
    pub fn as_str(&self) -> &'static str {
        match self {
            Role::Admin => "ADMIN",
            Role::Manager => "MANAGER",
            Role::Employee => "EMPLOYEE",
        }
    }

    /// 文字列からロールを解析
    #[allow(clippy::should_implement_trait)]
    pub fn from_str(s: &str) -> Option<Self> {
        match s.to_uppercase().as_str() {
            "ADMIN" => Some(Role::Admin),
            "MANAGER" => Some(Role::Manager),
            "EMPLOYEE" => Some(Role::Employee),
            _ => None,
        }
    }

    /// すべての有効なロールを取得
    pub fn all() -> Vec<Self> {
        vec![Role::Admin, Role::Manager, Role::Employee]
    }

    /// 管理者権限があるかチェック
    pub fn is_admin(&self) -> bool {
        matches!(self, Role::Admin)
    }

    /// マネージャー権限があるかチェック
    pub fn is_manager(&self) -> bool {
        matches!(self, Role::Manager)
    }

    /// マネージャー以上の権限があるかチェック
    pub fn is_manager_or_admin(&self) -> bool {
        matches!(self, Role::Admin | Role::Manager)
    }

    /// 権限レベルを数値で取得（高いほど強い権限）
    pub fn permission_level(&self) -> u8 {
        match self {
            Role::Admin => 100,
            Role::Manager => 50,
            Role::Employee => 10,
        }
    }
}

impl Default for Role {
    fn default() -> Self {
        Role::Employee
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl std::str::FromStr for Role {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::from_str(s).ok_or_else(|| format!("Invalid role: {}", s))
    }
}

// データベースとの変換用
impl From<Role> for String {
    fn from(role: Role) -> Self {
        role.as_str().to_string()
    }
}

impl TryFrom<String> for Role {
    type Error = String;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_role_conversion() {
        assert_eq!(Role::Admin.as_str(), "ADMIN");
        assert_eq!(Role::Manager.as_str(), "MANAGER");
        assert_eq!(Role::Employee.as_str(), "EMPLOYEE");

        assert_eq!(Role::from_str("ADMIN"), Some(Role::Admin));
        assert_eq!(Role::from_str("admin"), Some(Role::Admin));
        assert_eq!(Role::from_str("MANAGER"), Some(Role::Manager));
        assert_eq!(Role::from_str("invalid"), None);
    }

    #[test]
    fn test_role_checks() {
        assert!(Role::Admin.is_admin());
        assert!(Role::Admin.is_manager_or_admin());
        assert!(!Role::Admin.is_manager());

        assert!(Role::Manager.is_manager());
        assert!(Role::Manager.is_manager_or_admin());
        assert!(!Role::Manager.is_admin());

        assert!(!Role::Employee.is_manager_or_admin());
    }

    #[test]
    fn test_permission_levels() {
        assert!(Role::Admin.permission_level() > Role::Manager.permission_level());
        assert!(Role::Manager.permission_level() > Role::Employee.permission_level());
    }

    #[test]
    fn test_serde() {
        let serialized = serde_json::to_string(&Role::Manager).unwrap();
        assert_eq!(serialized, r#""MANAGER""#);

        let deserialized: Role = serde_json::from_str(r#""EMPLOYEE""#).unwrap();
        assert_eq!(deserialized, Role::Employee);

        // 未知のロール文字列は閉じたenumへの変換に失敗する
        assert!(serde_json::from_str::<Role>(r#""SUPERUSER""#).is_err());
    }

    #[test]
    fn test_default() {
        assert_eq!(Role::default(), Role::Employee);
    }
}
