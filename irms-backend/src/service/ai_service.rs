// irms-backend/src/service/ai_service.rs

use crate::api::dto::ai_dto::{
    AnalyzeIncidentRequest, IncidentAnalysisResponse, RiskMitigationResponse,
    SuggestRiskMitigationRequest,
};
use crate::config::AiConfig;
use crate::domain::audit_log_model::{AuditAction, EntityType};
use crate::domain::incident_status::Severity;
use crate::domain::user_model::SessionUser;
use crate::service::audit_log_service::{AuditLogService, RecordParams};
use serde::Deserialize;
use serde_json::json;
use std::sync::Arc;
use std::time::Duration;
use thiserror::Error;
use tracing::warn;

const INCIDENT_SYSTEM_PROMPT: &str = "You are an expert incident management analyst. Your role is to analyze workplace and operational incidents and provide:\n1. A severity assessment (LOW, MEDIUM, HIGH, or CRITICAL)\n2. A concise executive summary (2-3 sentences)\n3. 3-5 specific, actionable recommended actions\n\nBase your analysis on:\n- Potential impact on operations, safety, and business continuity\n- Urgency of response required\n- Scope of affected parties or systems\n- Regulatory or compliance implications\n\nRespond in valid JSON format only.";

const MITIGATION_SYSTEM_PROMPT: &str = "You are an expert risk management consultant. Your role is to analyze operational and business risks and suggest effective mitigation strategies.\n\nConsider:\n- Preventive controls\n- Detective controls\n- Corrective actions\n- Risk transfer options\n- Acceptance criteria\n\nProvide practical, implementable suggestions.";

#[derive(Error, Debug)]
pub enum AiError {
    #[error("AI API key is not configured")]
    MissingApiKey,

    #[error("AI request failed: {0}")]
    RequestFailed(#[from] reqwest::Error),

    #[error("AI returned an unexpected response: {0}")]
    MalformedResponse(String),
}

// chat-completions応答のうち必要な部分だけをデシリアライズする
#[derive(Debug, Deserialize)]
struct ChatCompletionResponse {
    choices: Vec<ChatChoice>,
}

#[derive(Debug, Deserialize)]
struct ChatChoice {
    message: ChatMessage,
}

#[derive(Debug, Deserialize)]
struct ChatMessage {
    content: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase", default)]
struct RawIncidentAnalysis {
    suggested_severity: Option<String>,
    summary: Option<String>,
    recommended_actions: Option<Vec<String>>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase", default)]
struct RawRiskMitigation {
    mitigation_suggestions: Option<Vec<String>>,
}

/// モデル出力からJSON文字列を取り出す。
/// response_formatを指定してもマークダウンのフェンスで包んで返すモデルがあるため、
/// フェンス付き・プレーン・テキスト埋め込みの順で試す
fn extract_json_string(text: &str) -> Option<String> {
    if let Some(rest) = text.split("```json").nth(1) {
        return rest.split("```").next().map(|s| s.trim().to_string());
    }

    let trimmed = text.trim();
    if trimmed.starts_with('{') {
        return Some(trimmed.to_string());
    }

    let start = text.find('{')?;
    let end = text.rfind('}')?;
    if start < end {
        Some(text[start..=end].to_string())
    } else {
        None
    }
}

/// OpenAI互換のchat-completionsエンドポイントを呼ぶ助言クライアント。
/// タイムアウトは短く固定し、周囲のトランザクションに波及させない
pub struct AiAdvisoryClient {
    http: reqwest::Client,
    config: AiConfig,
}

impl AiAdvisoryClient {
    pub fn new(config: AiConfig) -> Self {
        let http = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.request_timeout_secs))
            .build()
            .unwrap_or_default();
        Self { http, config }
    }

    async fn chat_json(
        &self,
        system_prompt: &str,
        user_prompt: &str,
    ) -> Result<serde_json::Value, AiError> {
        let api_key = self
            .config
            .api_key
            .as_ref()
            .ok_or(AiError::MissingApiKey)?;

        let body = json!({
            "model": self.config.model,
            "messages": [
                { "role": "system", "content": system_prompt },
                { "role": "user", "content": user_prompt },
            ],
            "temperature": 0.3,
            "max_tokens": self.config.max_tokens,
            "response_format": { "type": "json_object" },
        });

        let response = self
            .http
            .post(format!("{}/chat/completions", self.config.api_base_url))
            .bearer_auth(api_key)
            .json(&body)
            .send()
            .await?
            .error_for_status()?;

        let completion: ChatCompletionResponse = response.json().await?;
        let content = completion
            .choices
            .first()
            .and_then(|choice| choice.message.content.as_deref())
            .ok_or_else(|| AiError::MalformedResponse("no content in response".to_string()))?;

        let json_str = extract_json_string(content)
            .ok_or_else(|| AiError::MalformedResponse("no JSON object in content".to_string()))?;

        serde_json::from_str(&json_str)
            .map_err(|e| AiError::MalformedResponse(format!("invalid JSON: {}", e)))
    }

    /// インシデントを分析して深刻度・要約・推奨アクションを返す。
    /// どんな失敗でも決定的なフォールバックに縮退し、エラーは返さない
    pub async fn analyze_incident(
        &self,
        input: &AnalyzeIncidentRequest,
    ) -> IncidentAnalysisResponse {
        let mut user_prompt = format!(
            "Analyze this incident:\n\nTitle: {}\nDescription: {}\n",
            input.title, input.description
        );
        if let Some(category) = &input.category {
            user_prompt.push_str(&format!("Category: {}\n", category));
        }
        if let Some(department) = &input.department {
            user_prompt.push_str(&format!("Department: {}\n", department));
        }
        user_prompt.push_str(
            "\nProvide your analysis in the following JSON format:\n{\n  \"suggestedSeverity\": \"LOW\" | \"MEDIUM\" | \"HIGH\" | \"CRITICAL\",\n  \"summary\": \"2-3 sentence executive summary\",\n  \"recommendedActions\": [\"action 1\", \"action 2\", \"action 3\", \"action 4\", \"action 5\"]\n}",
        );

        match self.chat_json(INCIDENT_SYSTEM_PROMPT, &user_prompt).await {
            Ok(value) => {
                let raw: RawIncidentAnalysis = serde_json::from_value(value).unwrap_or_default();
                Self::normalize_incident_analysis(raw)
            }
            Err(e) => {
                warn!(error = %e, "AI incident analysis failed, using fallback");
                Self::fallback_incident_analysis()
            }
        }
    }

    /// リスクの低減策を提案する。失敗時は決定的なフォールバック
    pub async fn suggest_risk_mitigation(
        &self,
        input: &SuggestRiskMitigationRequest,
    ) -> RiskMitigationResponse {
        let user_prompt = format!(
            "Analyze this risk and suggest mitigation strategies:\n\nTitle: {}\nDescription: {}\nCategory: {}\nLikelihood: {}\nImpact: {}\n\nProvide 4-6 specific mitigation strategies in JSON format:\n{{\n  \"mitigationSuggestions\": [\"strategy 1\", \"strategy 2\", ...]\n}}",
            input.title,
            input.description,
            input.category,
            input.likelihood.as_str(),
            input.impact.as_str()
        );

        match self.chat_json(MITIGATION_SYSTEM_PROMPT, &user_prompt).await {
            Ok(value) => {
                let raw: RawRiskMitigation = serde_json::from_value(value).unwrap_or_default();
                Self::normalize_risk_mitigation(raw)
            }
            Err(e) => {
                warn!(error = %e, "AI mitigation suggestion failed, using fallback");
                Self::fallback_risk_mitigation()
            }
        }
    }

    /// モデル出力を検証・正規化する。
    /// enum外の深刻度はMEDIUMへ、アクションは最大5件に丸める
    fn normalize_incident_analysis(raw: RawIncidentAnalysis) -> IncidentAnalysisResponse {
        let severity = raw
            .suggested_severity
            .as_deref()
            .and_then(Severity::from_str)
            .unwrap_or(Severity::Medium);

        let summary = raw
            .summary
            .filter(|s| !s.trim().is_empty())
            .unwrap_or_else(|| "Unable to generate summary.".to_string());

        let actions: Vec<String> = raw
            .recommended_actions
            .unwrap_or_default()
            .into_iter()
            .filter(|action| !action.trim().is_empty())
            .take(5)
            .collect();
        let actions = if actions.is_empty() {
            vec!["Review the incident details and assess impact".to_string()]
        } else {
            actions
        };

        IncidentAnalysisResponse {
            suggested_severity: severity,
            summary,
            recommended_actions: actions,
        }
    }

    fn normalize_risk_mitigation(raw: RawRiskMitigation) -> RiskMitigationResponse {
        let suggestions: Vec<String> = raw
            .mitigation_suggestions
            .unwrap_or_default()
            .into_iter()
            .filter(|suggestion| !suggestion.trim().is_empty())
            .take(6)
            .collect();
        let suggestions = if suggestions.is_empty() {
            vec!["Develop and implement appropriate controls".to_string()]
        } else {
            suggestions
        };

        RiskMitigationResponse {
            mitigation_suggestions: suggestions,
        }
    }

    fn fallback_incident_analysis() -> IncidentAnalysisResponse {
        IncidentAnalysisResponse {
            suggested_severity: Severity::Medium,
            summary: "AI analysis is temporarily unavailable. Please manually assess this incident."
                .to_string(),
            recommended_actions: vec![
                "Review incident details thoroughly".to_string(),
                "Assess potential impact on operations".to_string(),
                "Identify affected parties and systems".to_string(),
                "Determine immediate response requirements".to_string(),
                "Document findings and escalate if necessary".to_string(),
            ],
        }
    }

    fn fallback_risk_mitigation() -> RiskMitigationResponse {
        RiskMitigationResponse {
            mitigation_suggestions: vec![
                "Implement preventive controls to reduce likelihood".to_string(),
                "Establish monitoring mechanisms for early detection".to_string(),
                "Develop contingency plans for risk occurrence".to_string(),
                "Consider risk transfer through insurance or contracts".to_string(),
                "Document risk acceptance criteria if mitigation is not feasible".to_string(),
            ],
        }
    }
}

/// 助言APIのサービス層。分析結果の取得と監査記録を行う
pub struct AiService {
    client: AiAdvisoryClient,
    audit_log_service: Arc<AuditLogService>,
}

impl AiService {
    pub fn new(client: AiAdvisoryClient, audit_log_service: Arc<AuditLogService>) -> Self {
        Self {
            client,
            audit_log_service,
        }
    }

    pub async fn analyze_incident(
        &self,
        actor: &SessionUser,
        input: AnalyzeIncidentRequest,
    ) -> IncidentAnalysisResponse {
        let analysis = self.client.analyze_incident(&input).await;

        self.audit_log_service
            .record(RecordParams {
                entity_type: EntityType::Incident,
                entity_id: None,
                action: AuditAction::AiAnalyzed,
                actor_id: actor.user_id,
                metadata: Some(json!({
                    "title": input.title,
                    "suggestedSeverity": analysis.suggested_severity.as_str(),
                })),
            })
            .await;

        analysis
    }

    pub async fn suggest_risk_mitigation(
        &self,
        actor: &SessionUser,
        input: SuggestRiskMitigationRequest,
    ) -> RiskMitigationResponse {
        let suggestions = self.client.suggest_risk_mitigation(&input).await;

        self.audit_log_service
            .record(RecordParams {
                entity_type: EntityType::Risk,
                entity_id: None,
                action: AuditAction::AiAnalyzed,
                actor_id: actor.user_id,
                metadata: Some(json!({ "title": input.title })),
            })
            .await;

        suggestions
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::risk_status::{Impact, Likelihood};

    fn offline_client() -> AiAdvisoryClient {
        AiAdvisoryClient::new(AiConfig {
            api_base_url: "http://localhost:9/v1".to_string(),
            api_key: None,
            model: "gpt-4o-mini".to_string(),
            request_timeout_secs: 1,
            max_tokens: 500,
        })
    }

    #[test]
    fn test_extract_json_from_fenced_block() {
        let text = "Here you go:\n```json\n{\"suggestedSeverity\": \"HIGH\"}\n```";
        assert_eq!(
            extract_json_string(text).unwrap(),
            r#"{"suggestedSeverity": "HIGH"}"#
        );
    }

    #[test]
    fn test_extract_json_plain() {
        let text = r#"{"summary": "ok"}"#;
        assert_eq!(extract_json_string(text).unwrap(), text);
    }

    #[test]
    fn test_extract_json_embedded() {
        let text = r#"Sure! {"summary": "ok"} Anything else?"#;
        assert_eq!(extract_json_string(text).unwrap(), r#"{"summary": "ok"}"#);
    }

    #[test]
    fn test_extract_json_none() {
        assert!(extract_json_string("no json here").is_none());
    }

    #[test]
    fn test_normalize_invalid_severity_defaults_to_medium() {
        let raw = RawIncidentAnalysis {
            suggested_severity: Some("CATASTROPHIC".to_string()),
            summary: Some("Summary".to_string()),
            recommended_actions: Some(vec!["Act".to_string()]),
        };
        let analysis = AiAdvisoryClient::normalize_incident_analysis(raw);
        assert_eq!(analysis.suggested_severity, Severity::Medium);
    }

    #[test]
    fn test_normalize_truncates_actions_to_five() {
        let raw = RawIncidentAnalysis {
            suggested_severity: Some("HIGH".to_string()),
            summary: Some("Summary".to_string()),
            recommended_actions: Some((1..=8).map(|i| format!("action {}", i)).collect()),
        };
        let analysis = AiAdvisoryClient::normalize_incident_analysis(raw);
        assert_eq!(analysis.suggested_severity, Severity::High);
        assert_eq!(analysis.recommended_actions.len(), 5);
    }

    #[test]
    fn test_normalize_empty_actions_get_default() {
        let analysis =
            AiAdvisoryClient::normalize_incident_analysis(RawIncidentAnalysis::default());
        assert!(!analysis.recommended_actions.is_empty());
        assert_eq!(analysis.summary, "Unable to generate summary.");
    }

    /// APIキーが無い（=外部呼び出し不能な）環境では常にフォールバックが返り、
    /// エラーにはならない
    #[tokio::test]
    async fn test_analyze_falls_back_without_api_key() {
        let client = offline_client();
        let analysis = client
            .analyze_incident(&AnalyzeIncidentRequest {
                title: "Server room flooding".to_string(),
                description: "Water is leaking into the primary server room after a storm."
                    .to_string(),
                category: None,
                department: None,
            })
            .await;

        assert_eq!(analysis.suggested_severity, Severity::Medium);
        assert!(!analysis.summary.is_empty());
        assert!(!analysis.recommended_actions.is_empty());
    }

    #[tokio::test]
    async fn test_mitigation_falls_back_without_api_key() {
        let client = offline_client();
        let result = client
            .suggest_risk_mitigation(&SuggestRiskMitigationRequest {
                title: "Key person dependency".to_string(),
                description: "Only one engineer understands the billing pipeline end to end."
                    .to_string(),
                category: "Operational".to_string(),
                likelihood: Likelihood::High,
                impact: Impact::High,
            })
            .await;

        assert!(!result.mitigation_suggestions.is_empty());
    }
}
