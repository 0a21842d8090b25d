//! In-view action gating.
//!
//! The same allow-list predicate as the navigation filter, applied to single
//! buttons and to table rows. Everything fails closed: without a resolved role
//! no gated action is visible.

use serde::Serialize;
use thiserror::Error;

use crate::services::auth::{Role, RoleState};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Action {
    ViewEmployees,
    CreateEmployee,
    UpdateEmployee,
    DeleteEmployee,
    CreateAccount,
    ManageTeams,
    ManageDepartments,
    ManageJobTitles,
    RequestLeave,
    ReviewLeave,
    ViewTeamSalary,
    ManageSalary,
    ViewFinancials,
}

impl Action {
    pub fn allowed_roles(&self) -> &'static [Role] {
        use Role::*;
        match self {
            Action::RequestLeave => &[User, Manager, Admin, Owner],
            Action::ViewEmployees | Action::ReviewLeave | Action::ViewTeamSalary => {
                &[Manager, Admin, Owner]
            }
            Action::CreateEmployee
            | Action::UpdateEmployee
            | Action::ManageTeams
            | Action::ManageDepartments
            | Action::ManageJobTitles
            | Action::ManageSalary
            | Action::ViewFinancials => &[Admin, Owner],
            Action::DeleteEmployee | Action::CreateAccount => &[Owner],
        }
    }
}

#[derive(Debug, Error, PartialEq, Eq)]
#[error("action {action:?} is not permitted for this session")]
pub struct GuardDenied {
    pub action: Action,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct EmployeeRowActions {
    pub view_detail: bool,
    pub edit: bool,
    pub delete: bool,
    pub create_account: bool,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct LeaveRowActions {
    pub approve: bool,
    pub reject: bool,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SalaryRowActions {
    pub mark_paid: bool,
}

const PENDING: &str = "PENDING";

/// Visibility decisions for one render pass (one request).
#[derive(Debug, Clone)]
pub struct ViewGuard {
    role: RoleState,
    current_employee_id: Option<String>,
}

impl ViewGuard {
    pub fn new(role: RoleState, current_employee_id: Option<String>) -> Self {
        let current_employee_id = current_employee_id.filter(|id| !id.trim().is_empty());
        Self {
            role,
            current_employee_id,
        }
    }

    pub fn role(&self) -> &RoleState {
        &self.role
    }

    pub fn current_employee_id(&self) -> Option<&str> {
        self.current_employee_id.as_deref()
    }

    pub fn can(&self, action: Action) -> bool {
        let allowed: Vec<&str> = action.allowed_roles().iter().map(Role::as_str).collect();
        self.role.is_any(&allowed)
    }

    pub fn require(&self, action: Action) -> Result<(), GuardDenied> {
        if self.can(action) {
            Ok(())
        } else {
            Err(GuardDenied { action })
        }
    }

    /// The row belongs to the signed-in user.
    pub fn is_self(&self, employee_id: &str) -> bool {
        self.current_employee_id
            .as_deref()
            .is_some_and(|me| me == employee_id)
    }

    pub fn can_view_financials_of(&self, employee_id: &str) -> bool {
        self.can(Action::ViewFinancials) || (self.role.role().is_some() && self.is_self(employee_id))
    }

    pub fn employee_row(&self, employee_id: &str, has_account: bool) -> EmployeeRowActions {
        let is_self = self.is_self(employee_id);
        EmployeeRowActions {
            view_detail: self.can(Action::ViewEmployees) || (self.role.role().is_some() && is_self),
            edit: self.can(Action::UpdateEmployee),
            delete: self.can(Action::DeleteEmployee) && !is_self,
            create_account: self.can(Action::CreateAccount) && !has_account && !is_self,
        }
    }

    pub fn leave_row(&self, status: &str) -> LeaveRowActions {
        let open = self.can(Action::ReviewLeave) && status.trim().eq_ignore_ascii_case(PENDING);
        LeaveRowActions {
            approve: open,
            reject: open,
        }
    }

    pub fn salary_row(&self, status: &str) -> SalaryRowActions {
        SalaryRowActions {
            mark_paid: self.can(Action::ManageSalary)
                && status.trim().eq_ignore_ascii_case(PENDING),
        }
    }
}
