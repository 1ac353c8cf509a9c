// irms-backend/src/utils/permission.rs

use crate::domain::role::Role;
use crate::domain::user_model::SessionUser;
use crate::error::{AppError, AppResult};
use uuid::Uuid;

/// リソースに対する操作の種類
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Action {
    Read,
    Write,
    Delete,
}

/// 権限判定に使うリソースの参照情報。
/// 各エンティティから該当するフィールドだけ埋める
#[derive(Debug, Clone, Copy, Default)]
pub struct ResourceRefs {
    pub department_id: Option<Uuid>,
    pub reported_by_id: Option<Uuid>,
    pub owner_id: Option<Uuid>,
    pub assigned_to_id: Option<Uuid>,
}

impl ResourceRefs {
    pub fn department(department_id: Uuid) -> Self {
        Self {
            department_id: Some(department_id),
            ..Default::default()
        }
    }

    fn is_held_by(&self, user_id: Uuid) -> bool {
        self.reported_by_id == Some(user_id)
            || self.owner_id == Some(user_id)
            || self.assigned_to_id == Some(user_id)
    }
}

/// 一覧クエリに適用するスコープ。
/// リポジトリ層でSQL条件に変換され、取得後のフィルタは行わない
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AccessScope {
    /// 全行（ADMIN）
    All,
    /// 部門一致（MANAGER）
    Department(Uuid),
    /// 本人が報告者・所有者・担当者の行のみ（EMPLOYEE）
    Own(Uuid),
}

/// 統合された権限チェック機能。
/// 一覧のスコープ決定と単一リソースの判定が同じ規則を共有する
pub struct PermissionChecker;

impl PermissionChecker {
    /// 単一リソースへのアクセス可否を判定する。
    /// ルールは順に評価される: ADMIN無条件 → MANAGER部門一致(削除不可)
    /// → EMPLOYEE本人関与(削除不可)
    pub fn can_access_resource(actor: &SessionUser, refs: &ResourceRefs, action: Action) -> bool {
        match actor.role {
            Role::Admin => true,
            Role::Manager => {
                // 部門未設定のマネージャーは部門スコープのリソースに一致しない
                let in_department = actor.department_id.is_some()
                    && refs.department_id == actor.department_id;
                in_department && action != Action::Delete
            }
            Role::Employee => {
                refs.is_held_by(actor.user_id) && matches!(action, Action::Read | Action::Write)
            }
        }
    }

    /// 一覧クエリのスコープを決定する。
    /// 部門未設定のマネージャーは設定エラーとして明示的にForbiddenを返す
    /// （空の結果への黙殺も全行公開もしない）
    pub fn allowed_scope(actor: &SessionUser) -> AppResult<AccessScope> {
        match actor.role {
            Role::Admin => Ok(AccessScope::All),
            Role::Manager => match actor.department_id {
                Some(department_id) => Ok(AccessScope::Department(department_id)),
                None => Err(AppError::Forbidden(
                    "Manager account has no department assigned".to_string(),
                )),
            },
            Role::Employee => Ok(AccessScope::Own(actor.user_id)),
        }
    }

    /// インシデントを指定部門で作成できるかチェック。
    /// 一般従業員は自部門に限られる
    pub fn can_create_incident_in(actor: &SessionUser, department_id: Uuid) -> bool {
        if actor.role.is_manager_or_admin() {
            return true;
        }
        actor.department_id == Some(department_id)
    }

    /// リスク・タスクの作成権限があるかチェック
    pub fn can_create_risk_or_task(actor: &SessionUser) -> bool {
        actor.role.is_manager_or_admin()
    }

    /// インシデントのステータス変更・担当者割り当て権限があるかチェック
    pub fn can_manage_incident_assignment(actor: &SessionUser) -> bool {
        actor.role.is_manager_or_admin()
    }

    /// 削除権限があるかチェック（全エンティティでADMINのみ）
    pub fn can_delete(actor: &SessionUser) -> bool {
        actor.role.is_admin()
    }

    /// ユーザー・部門・カテゴリの管理権限があるかチェック
    pub fn can_manage_master_data(actor: &SessionUser) -> bool {
        actor.role.is_admin()
    }

    /// 監査ログの閲覧権限があるかチェック
    pub fn can_read_audit_logs(actor: &SessionUser) -> bool {
        actor.role.is_admin()
    }

    /// 指定されたユーザーの情報にアクセスできるかチェック。
    /// 自分自身のデータには常にアクセス可能、管理者は全ユーザー
    pub fn can_access_user(actor: &SessionUser, target_user_id: Uuid) -> bool {
        actor.user_id == target_user_id || actor.role.is_admin()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn actor(role: Role, department_id: Option<Uuid>) -> SessionUser {
        SessionUser {
            user_id: Uuid::new_v4(),
            name: "Test".to_string(),
            email: "test@irms.com".to_string(),
            role,
            department_id,
        }
    }

    #[test]
    fn test_admin_unconditional() {
        let admin = actor(Role::Admin, None);
        let refs = ResourceRefs::department(Uuid::new_v4());

        assert!(PermissionChecker::can_access_resource(&admin, &refs, Action::Read));
        assert!(PermissionChecker::can_access_resource(&admin, &refs, Action::Write));
        assert!(PermissionChecker::can_access_resource(&admin, &refs, Action::Delete));
        assert_eq!(
            PermissionChecker::allowed_scope(&admin).unwrap(),
            AccessScope::All
        );
    }

    #[test]
    fn test_manager_department_scope() {
        let department = Uuid::new_v4();
        let manager = actor(Role::Manager, Some(department));

        let own_department = ResourceRefs::department(department);
        let other_department = ResourceRefs::department(Uuid::new_v4());

        assert!(PermissionChecker::can_access_resource(
            &manager,
            &own_department,
            Action::Read
        ));
        assert!(PermissionChecker::can_access_resource(
            &manager,
            &own_department,
            Action::Write
        ));
        // マネージャーは自部門でも削除不可
        assert!(!PermissionChecker::can_access_resource(
            &manager,
            &own_department,
            Action::Delete
        ));
        assert!(!PermissionChecker::can_access_resource(
            &manager,
            &other_department,
            Action::Read
        ));

        assert_eq!(
            PermissionChecker::allowed_scope(&manager).unwrap(),
            AccessScope::Department(department)
        );
    }

    #[test]
    fn test_manager_without_department_is_config_error() {
        let manager = actor(Role::Manager, None);
        let refs = ResourceRefs::department(Uuid::new_v4());

        // 単一リソースには決して一致しない
        assert!(!PermissionChecker::can_access_resource(&manager, &refs, Action::Read));

        // 一覧スコープは明示的なForbidden
        assert!(matches!(
            PermissionChecker::allowed_scope(&manager),
            Err(AppError::Forbidden(_))
        ));
    }

    #[test]
    fn test_employee_ownership() {
        let department = Uuid::new_v4();
        let employee = actor(Role::Employee, Some(department));

        let reported = ResourceRefs {
            department_id: Some(department),
            reported_by_id: Some(employee.user_id),
            ..Default::default()
        };
        let assigned = ResourceRefs {
            assigned_to_id: Some(employee.user_id),
            ..Default::default()
        };
        let owned = ResourceRefs {
            owner_id: Some(employee.user_id),
            ..Default::default()
        };
        let unrelated = ResourceRefs::department(department);

        assert!(PermissionChecker::can_access_resource(&employee, &reported, Action::Read));
        assert!(PermissionChecker::can_access_resource(&employee, &assigned, Action::Write));
        assert!(PermissionChecker::can_access_resource(&employee, &owned, Action::Read));
        // 同じ部門でも本人が関与していなければ不可
        assert!(!PermissionChecker::can_access_resource(
            &employee,
            &unrelated,
            Action::Read
        ));
        // 本人のリソースでも削除は不可
        assert!(!PermissionChecker::can_access_resource(
            &employee,
            &reported,
            Action::Delete
        ));

        assert_eq!(
            PermissionChecker::allowed_scope(&employee).unwrap(),
            AccessScope::Own(employee.user_id)
        );
    }

    /// ADMIN ⊇ MANAGER ⊇ EMPLOYEE の単調性。
    /// 下位ロールが持つ許可は、同じ状況の上位ロールも必ず持つ
    #[test]
    fn test_permission_monotonicity() {
        let department = Uuid::new_v4();
        let user_id = Uuid::new_v4();

        let make = |role: Role| SessionUser {
            user_id,
            name: "Same".to_string(),
            email: "same@irms.com".to_string(),
            role,
            department_id: Some(department),
        };

        let admin = make(Role::Admin);
        let manager = make(Role::Manager);
        let employee = make(Role::Employee);

        let ref_cases = [
            ResourceRefs::department(department),
            ResourceRefs::department(Uuid::new_v4()),
            ResourceRefs {
                department_id: Some(department),
                reported_by_id: Some(user_id),
                ..Default::default()
            },
            ResourceRefs {
                assigned_to_id: Some(user_id),
                ..Default::default()
            },
            ResourceRefs::default(),
        ];

        for refs in &ref_cases {
            for action in [Action::Read, Action::Write, Action::Delete] {
                let employee_allowed =
                    PermissionChecker::can_access_resource(&employee, refs, action);
                let manager_allowed =
                    PermissionChecker::can_access_resource(&manager, refs, action);
                let admin_allowed = PermissionChecker::can_access_resource(&admin, refs, action);

                if employee_allowed {
                    assert!(
                        manager_allowed || refs.department_id != Some(department),
                        "manager must cover employee grants within the department"
                    );
                }
                if manager_allowed {
                    assert!(admin_allowed, "admin must cover manager grants");
                }
                if employee_allowed {
                    assert!(admin_allowed, "admin must cover employee grants");
                }
            }
        }
    }

    #[test]
    fn test_incident_creation_rules() {
        let department = Uuid::new_v4();
        let other = Uuid::new_v4();

        let employee = actor(Role::Employee, Some(department));
        assert!(PermissionChecker::can_create_incident_in(&employee, department));
        assert!(!PermissionChecker::can_create_incident_in(&employee, other));

        let manager = actor(Role::Manager, Some(department));
        assert!(PermissionChecker::can_create_incident_in(&manager, other));

        let homeless_employee = actor(Role::Employee, None);
        assert!(!PermissionChecker::can_create_incident_in(&homeless_employee, department));
    }

    #[test]
    fn test_role_gated_capabilities() {
        let admin = actor(Role::Admin, None);
        let manager = actor(Role::Manager, Some(Uuid::new_v4()));
        let employee = actor(Role::Employee, Some(Uuid::new_v4()));

        assert!(PermissionChecker::can_create_risk_or_task(&admin));
        assert!(PermissionChecker::can_create_risk_or_task(&manager));
        assert!(!PermissionChecker::can_create_risk_or_task(&employee));

        assert!(PermissionChecker::can_manage_incident_assignment(&manager));
        assert!(!PermissionChecker::can_manage_incident_assignment(&employee));

        assert!(PermissionChecker::can_delete(&admin));
        assert!(!PermissionChecker::can_delete(&manager));
        assert!(!PermissionChecker::can_delete(&employee));

        assert!(PermissionChecker::can_read_audit_logs(&admin));
        assert!(!PermissionChecker::can_read_audit_logs(&manager));
    }

    #[test]
    fn test_user_access() {
        let employee = actor(Role::Employee, None);
        let admin = actor(Role::Admin, None);
        let stranger = Uuid::new_v4();

        assert!(PermissionChecker::can_access_user(&employee, employee.user_id));
        assert!(!PermissionChecker::can_access_user(&employee, stranger));
        assert!(PermissionChecker::can_access_user(&admin, stranger));
    }
}
