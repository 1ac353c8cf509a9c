// irms-backend/src/service/dashboard_service.rs

use crate::api::dto::dashboard_dto::{
    DashboardCharts, DashboardOverviewResponse, DashboardSummary, DepartmentCount, HeatmapCell,
    RecentActivity, RecentIncident, SeverityCount, StatusCount, UpcomingTask,
};
use crate::domain::incident_status::{IncidentStatus, Severity};
use crate::domain::risk_status::RiskStatus;
use crate::domain::role::Role;
use crate::domain::task_status::TaskStatus;
use crate::domain::user_model::SessionUser;
use crate::error::AppResult;
use crate::repository::department_repository::DepartmentRepository;
use crate::repository::incident_repository::IncidentRepository;
use crate::repository::risk_repository::RiskRepository;
use crate::repository::task_repository::TaskRepository;
use crate::repository::user_repository::UserRepository;
use crate::utils::permission::PermissionChecker;
use std::collections::HashMap;
use std::sync::Arc;
use uuid::Uuid;

pub struct DashboardService {
    incident_repo: Arc<IncidentRepository>,
    risk_repo: Arc<RiskRepository>,
    task_repo: Arc<TaskRepository>,
    department_repo: Arc<DepartmentRepository>,
    user_repo: Arc<UserRepository>,
}

impl DashboardService {
    pub fn new(
        incident_repo: Arc<IncidentRepository>,
        risk_repo: Arc<RiskRepository>,
        task_repo: Arc<TaskRepository>,
        department_repo: Arc<DepartmentRepository>,
        user_repo: Arc<UserRepository>,
    ) -> Self {
        Self {
            incident_repo,
            risk_repo,
            task_repo,
            department_repo,
            user_repo,
        }
    }

    /// ロールでスコープした概要メトリクスを返す。
    /// 一覧APIと同じスコープ規則を共有する（別経路のフィルタを作らない）
    pub async fn overview(&self, actor: &SessionUser) -> AppResult<DashboardOverviewResponse> {
        let scope = PermissionChecker::allowed_scope(actor)?;
        let task_assignee = if actor.role == Role::Employee {
            Some(actor.user_id)
        } else {
            None
        };

        let total_incidents = self.incident_repo.count_in_scope(&scope).await?;
        let incidents_by_status = self.incident_repo.count_grouped_by_status(&scope).await?;
        let incidents_by_severity = self.incident_repo.count_grouped_by_severity(&scope).await?;

        let total_risks = self.risk_repo.count_in_scope(&scope).await?;
        let risks_by_status = self.risk_repo.count_grouped_by_status(&scope).await?;
        let risk_heatmap = self.risk_repo.count_heatmap(&scope).await?;

        let total_tasks = self.task_repo.count_for(task_assignee).await?;
        let tasks_by_status = self.task_repo.count_grouped_by_status(task_assignee).await?;

        // 部門別チャートは管理者のみ
        let incidents_by_department = if actor.is_admin() {
            let counts = self.incident_repo.count_grouped_by_department().await?;
            let department_ids: Vec<Uuid> = counts.iter().map(|(id, _)| *id).collect();
            let names: HashMap<Uuid, String> = self
                .department_repo
                .find_by_ids(&department_ids)
                .await?
                .into_iter()
                .map(|d| (d.id, d.name))
                .collect();
            counts
                .into_iter()
                .map(|(department_id, count)| DepartmentCount {
                    department_id,
                    name: names
                        .get(&department_id)
                        .cloned()
                        .unwrap_or_else(|| "Unknown".to_string()),
                    count,
                })
                .collect()
        } else {
            Vec::new()
        };

        // 直近のインシデントと期日の近いタスク
        let recent = self.incident_repo.find_recent(&scope, 5).await?;
        let department_ids: Vec<Uuid> = recent.iter().map(|i| i.department_id).collect();
        let department_names: HashMap<Uuid, String> = self
            .department_repo
            .find_by_ids(&department_ids)
            .await?
            .into_iter()
            .map(|d| (d.id, d.name))
            .collect();
        let recent_incidents = recent
            .iter()
            .map(|incident| RecentIncident {
                id: incident.id,
                title: incident.title.clone(),
                status: incident.status.clone(),
                severity: incident.severity.clone(),
                created_at: incident.created_at,
                department: department_names.get(&incident.department_id).cloned(),
            })
            .collect();

        let upcoming = self.task_repo.find_upcoming(task_assignee, 5).await?;
        let assignee_ids: Vec<Uuid> = upcoming.iter().map(|t| t.assigned_to_id).collect();
        let assignee_names: HashMap<Uuid, String> = self
            .user_repo
            .find_by_ids(&assignee_ids)
            .await?
            .into_iter()
            .map(|u| (u.id, u.name))
            .collect();
        let upcoming_tasks = upcoming
            .iter()
            .map(|task| UpcomingTask {
                id: task.id,
                title: task.title.clone(),
                status: task.status.clone(),
                due_date: task.due_date,
                assigned_to: assignee_names.get(&task.assigned_to_id).cloned(),
            })
            .collect();

        // サマリー値の算出
        let open_incidents = incidents_by_status
            .iter()
            .filter(|(status, _)| {
                IncidentStatus::from_str(status).is_some_and(|s| !s.is_terminal())
            })
            .map(|(_, count)| count)
            .sum();
        let critical_incidents = incidents_by_severity
            .iter()
            .find(|(severity, _)| severity == Severity::Critical.as_str())
            .map(|(_, count)| *count)
            .unwrap_or(0);
        let open_risks = risks_by_status
            .iter()
            .filter(|(status, _)| RiskStatus::from_str(status).is_some_and(|s| !s.is_terminal()))
            .map(|(_, count)| count)
            .sum();
        let pending_tasks = tasks_by_status
            .iter()
            .filter(|(status, _)| status != TaskStatus::Done.as_str())
            .map(|(_, count)| count)
            .sum();

        Ok(DashboardOverviewResponse {
            summary: DashboardSummary {
                total_incidents,
                open_incidents,
                critical_incidents,
                total_risks,
                open_risks,
                total_tasks,
                pending_tasks,
            },
            charts: DashboardCharts {
                incidents_by_status: incidents_by_status
                    .into_iter()
                    .map(|(status, count)| StatusCount { status, count })
                    .collect(),
                incidents_by_severity: incidents_by_severity
                    .into_iter()
                    .map(|(severity, count)| SeverityCount { severity, count })
                    .collect(),
                incidents_by_department,
                risks_by_status: risks_by_status
                    .into_iter()
                    .map(|(status, count)| StatusCount { status, count })
                    .collect(),
                risk_heatmap: risk_heatmap
                    .into_iter()
                    .map(|(likelihood, impact, count)| HeatmapCell {
                        likelihood,
                        impact,
                        count,
                    })
                    .collect(),
                tasks_by_status: tasks_by_status
                    .into_iter()
                    .map(|(status, count)| StatusCount { status, count })
                    .collect(),
            },
            recent_activity: RecentActivity {
                recent_incidents,
                upcoming_tasks,
            },
        })
    }
}
