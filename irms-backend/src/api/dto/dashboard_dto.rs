// irms-backend/src/api/dto/dashboard_dto.rs

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// ダッシュボード概要のレスポンス
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DashboardOverviewResponse {
    pub summary: DashboardSummary,
    pub charts: DashboardCharts,
    pub recent_activity: RecentActivity,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DashboardSummary {
    pub total_incidents: u64,
    pub open_incidents: i64,
    pub critical_incidents: i64,
    pub total_risks: u64,
    pub open_risks: i64,
    pub total_tasks: u64,
    pub pending_tasks: i64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DashboardCharts {
    pub incidents_by_status: Vec<StatusCount>,
    pub incidents_by_severity: Vec<SeverityCount>,
    pub incidents_by_department: Vec<DepartmentCount>,
    pub risks_by_status: Vec<StatusCount>,
    pub risk_heatmap: Vec<HeatmapCell>,
    pub tasks_by_status: Vec<StatusCount>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StatusCount {
    pub status: String,
    pub count: i64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SeverityCount {
    pub severity: String,
    pub count: i64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DepartmentCount {
    pub department_id: Uuid,
    pub name: String,
    pub count: i64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HeatmapCell {
    pub likelihood: String,
    pub impact: String,
    pub count: i64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RecentActivity {
    pub recent_incidents: Vec<RecentIncident>,
    pub upcoming_tasks: Vec<UpcomingTask>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RecentIncident {
    pub id: Uuid,
    pub title: String,
    pub status: String,
    pub severity: String,
    pub created_at: DateTime<Utc>,
    pub department: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpcomingTask {
    pub id: Uuid,
    pub title: String,
    pub status: String,
    pub due_date: Option<DateTime<Utc>>,
    pub assigned_to: Option<String>,
}
