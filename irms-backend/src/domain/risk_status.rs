// irms-backend/src/domain/risk_status.rs

use serde::{Deserialize, Serialize};
use std::fmt;

/// リスクの状態を表すenum
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum RiskStatus {
    Open,
    Monitoring,
    Mitigated,
    Closed,
}

impl RiskStatus {
    #[allow(clippy::should_implement_trait)]
    pub fn from_str(s: &str) -> Option<Self> {
        match s.to_uppercase().as_str() {
            "OPEN" => Some(Self::Open),
            "MONITORING" => Some(Self::Monitoring),
            "MITIGATED" => Some(Self::Mitigated),
            "CLOSED" => Some(Self::Closed),
            _ => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Open => "OPEN",
            Self::Monitoring => "MONITORING",
            Self::Mitigated => "MITIGATED",
            Self::Closed => "CLOSED",
        }
    }

    pub fn all() -> Vec<Self> {
        vec![Self::Open, Self::Monitoring, Self::Mitigated, Self::Closed]
    }

    /// 終端状態かチェック。終端遷移時にresolved_atが刻印される
    pub fn is_terminal(&self) -> bool {
        matches!(self, Self::Mitigated | Self::Closed)
    }
}

impl Default for RiskStatus {
    fn default() -> Self {
        Self::Open
    }
}

impl fmt::Display for RiskStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl std::str::FromStr for RiskStatus {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::from_str(s).ok_or_else(|| format!("Invalid risk status: {}", s))
    }
}

impl From<RiskStatus> for String {
    fn from(status: RiskStatus) -> Self {
        status.as_str().to_string()
    }
}

impl TryFrom<String> for RiskStatus {
    type Error = String;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

/// リスクの発生可能性を表すenum
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Likelihood {
    Low,
    Medium,
    High,
}

impl Likelihood {
    #[allow(clippy::should_implement_trait)]
    pub fn from_str(s: &str) -> Option<Self> {
        match s.to_uppercase().as_str() {
            "LOW" => Some(Self::Low),
            "MEDIUM" => Some(Self::Medium),
            "HIGH" => Some(Self::High),
            _ => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Low => "LOW",
            Self::Medium => "MEDIUM",
            Self::High => "HIGH",
        }
    }

    pub fn all() -> Vec<Self> {
        vec![Self::Low, Self::Medium, Self::High]
    }
}

impl Default for Likelihood {
    fn default() -> Self {
        Self::Medium
    }
}

impl fmt::Display for Likelihood {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl From<Likelihood> for String {
    fn from(likelihood: Likelihood) -> Self {
        likelihood.as_str().to_string()
    }
}

/// リスクの影響度を表すenum
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Impact {
    Low,
    Medium,
    High,
}

impl Impact {
    #[allow(clippy::should_implement_trait)]
    pub fn from_str(s: &str) -> Option<Self> {
        match s.to_uppercase().as_str() {
            "LOW" => Some(Self::Low),
            "MEDIUM" => Some(Self::Medium),
            "HIGH" => Some(Self::High),
            _ => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Low => "LOW",
            Self::Medium => "MEDIUM",
            Self::High => "HIGH",
        }
    }

    pub fn all() -> Vec<Self> {
        vec![Self::Low, Self::Medium, Self::High]
    }
}

impl Default for Impact {
    fn default() -> Self {
        Self::Medium
    }
}

impl fmt::Display for Impact {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl From<Impact> for String {
    fn from(impact: Impact) -> Self {
        impact.as_str().to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_risk_status_terminal() {
        assert!(RiskStatus::Mitigated.is_terminal());
        assert!(RiskStatus::Closed.is_terminal());
        assert!(!RiskStatus::Open.is_terminal());
        assert!(!RiskStatus::Monitoring.is_terminal());
    }

    #[test]
    fn test_conversions() {
        assert_eq!(RiskStatus::from_str("monitoring"), Some(RiskStatus::Monitoring));
        assert_eq!(Likelihood::from_str("HIGH"), Some(Likelihood::High));
        assert_eq!(Impact::from_str("nope"), None);
    }

    #[test]
    fn test_defaults() {
        assert_eq!(RiskStatus::default(), RiskStatus::Open);
        assert_eq!(Likelihood::default(), Likelihood::Medium);
        assert_eq!(Impact::default(), Impact::Medium);
    }
}
