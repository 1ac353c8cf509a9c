// irms-backend/src/domain/incident_status.rs

use serde::{Deserialize, Serialize};
use std::fmt;

/// インシデントの状態を表すenum
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum IncidentStatus {
    New,
    InReview,
    InProgress,
    Resolved,
    Closed,
}

impl IncidentStatus {
    /// 文字列からIncidentStatusに変換
    #[allow(clippy::should_implement_trait)]
    pub fn from_str(s: &str) -> Option<Self> {
        match s.to_uppercase().as_str() {
            "NEW" => Some(Self::New),
            "IN_REVIEW" => Some(Self::InReview),
            "IN_PROGRESS" => Some(Self::InProgress),
            "RESOLVED" => Some(Self::Resolved),
            "CLOSED" => Some(Self::Closed),
            _ => None,
        }
    }

    /// IncidentStatusを文字列として取得
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::New => "NEW",
            Self::InReview => "IN_REVIEW",
            Self::InProgress => "IN_PROGRESS",
            Self::Resolved => "RESOLVED",
            Self::Closed => "CLOSED",
        }
    }

    /// すべての有効なステータスを取得
    pub fn all() -> Vec<Self> {
        vec![
            Self::New,
            Self::InReview,
            Self::InProgress,
            Self::Resolved,
            Self::Closed,
        ]
    }

    /// 終端状態かチェック。終端遷移時にresolved_atが刻印される
    pub fn is_terminal(&self) -> bool {
        matches!(self, Self::Resolved | Self::Closed)
    }
}

impl Default for IncidentStatus {
    fn default() -> Self {
        Self::New
    }
}

impl fmt::Display for IncidentStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl std::str::FromStr for IncidentStatus {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::from_str(s).ok_or_else(|| format!("Invalid incident status: {}", s))
    }
}

impl From<IncidentStatus> for String {
    fn from(status: IncidentStatus) -> Self {
        status.as_str().to_string()
    }
}

impl TryFrom<String> for IncidentStatus {
    type Error = String;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

/// インシデントの深刻度を表すenum
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Severity {
    Low,
    Medium,
    High,
    Critical,
}

impl Severity {
    #[allow(clippy::should_implement_trait)]
    pub fn from_str(s: &str) -> Option<Self> {
        match s.to_uppercase().as_str() {
            "LOW" => Some(Self::Low),
            "MEDIUM" => Some(Self::Medium),
            "HIGH" => Some(Self::High),
            "CRITICAL" => Some(Self::Critical),
            _ => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Low => "LOW",
            Self::Medium => "MEDIUM",
            Self::High => "HIGH",
            Self::Critical => "CRITICAL",
        }
    }

    pub fn all() -> Vec<Self> {
        vec![Self::Low, Self::Medium, Self::High, Self::Critical]
    }
}

impl Default for Severity {
    fn default() -> Self {
        Self::Medium
    }
}

impl fmt::Display for Severity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl std::str::FromStr for Severity {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::from_str(s).ok_or_else(|| format!("Invalid severity: {}", s))
    }
}

impl From<Severity> for String {
    fn from(severity: Severity) -> Self {
        severity.as_str().to_string()
    }
}

impl TryFrom<String> for Severity {
    type Error = String;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_from_str() {
        assert_eq!(IncidentStatus::from_str("NEW"), Some(IncidentStatus::New));
        assert_eq!(
            IncidentStatus::from_str("in_review"),
            Some(IncidentStatus::InReview)
        );
        assert_eq!(
            IncidentStatus::from_str("RESOLVED"),
            Some(IncidentStatus::Resolved)
        );
        assert_eq!(IncidentStatus::from_str("bogus"), None);
    }

    #[test]
    fn test_terminal_statuses() {
        assert!(IncidentStatus::Resolved.is_terminal());
        assert!(IncidentStatus::Closed.is_terminal());
        assert!(!IncidentStatus::New.is_terminal());
        assert!(!IncidentStatus::InReview.is_terminal());
        assert!(!IncidentStatus::InProgress.is_terminal());
    }

    #[test]
    fn test_severity_normalization() {
        assert_eq!(Severity::from_str("critical"), Some(Severity::Critical));
        assert_eq!(Severity::from_str("unknown"), None);
        assert_eq!(Severity::default(), Severity::Medium);
    }

    #[test]
    fn test_serde_wire_format() {
        assert_eq!(
            serde_json::to_string(&IncidentStatus::InProgress).unwrap(),
            r#""IN_PROGRESS""#
        );
        assert_eq!(
            serde_json::from_str::<Severity>(r#""HIGH""#).unwrap(),
            Severity::High
        );
    }
}
