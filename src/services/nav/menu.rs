/*
 * Responsibility
 * - Static navigation menu (label / route / icon / allow-list)
 * - Optional override from a JSON file at startup (read-only afterwards)
 * - Role filter: only entries whose allow-list contains the resolved role
 */
use serde::{Deserialize, Serialize};
use std::path::Path;
use thiserror::Error;

use crate::services::auth::{Role, RoleState};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MenuItem {
    pub label: String,
    pub route: String,
    pub icon: String,
    pub allowed_roles: Vec<String>,
}

impl MenuItem {
    fn new(label: &str, route: &str, icon: &str, allowed: &[Role]) -> Self {
        Self {
            label: label.to_string(),
            route: route.to_string(),
            icon: icon.to_string(),
            allowed_roles: allowed.iter().map(|r| r.as_str().to_string()).collect(),
        }
    }

    pub fn visible_to(&self, role: &RoleState) -> bool {
        role.is_any(&self.allowed_roles)
    }
}

#[derive(Debug, Error)]
pub enum MenuError {
    #[error("failed to read menu file: {0}")]
    Io(#[from] std::io::Error),
    #[error("invalid menu file: {0}")]
    Parse(#[from] serde_json::Error),
    #[error("menu entry '{0}' has an empty allow-list")]
    EmptyAllowList(String),
}

pub fn default_menu() -> Vec<MenuItem> {
    use Role::*;
    const EVERYONE: &[Role] = &[User, Manager, Admin, Owner];
    const MANAGERS: &[Role] = &[Manager, Admin, Owner];
    const ADMINS: &[Role] = &[Admin, Owner];

    vec![
        MenuItem::new("Home", "/home", "home", EVERYONE),
        MenuItem::new("Personal", "/personal", "user", EVERYONE),
        MenuItem::new("Employees", "/employee", "users", MANAGERS),
        MenuItem::new("Attendance", "/attendance", "clipboard-check", EVERYONE),
        MenuItem::new("Leave", "/leave", "calendar", EVERYONE),
        MenuItem::new("Salary", "/salary", "wallet", EVERYONE),
        MenuItem::new("Team Salary", "/team-salary", "banknote", MANAGERS),
        MenuItem::new("Salary Management", "/salary-management", "calculator", ADMINS),
        MenuItem::new("Job Title", "/job-title", "briefcase", ADMINS),
        MenuItem::new("Team", "/team", "user-plus", ADMINS),
        MenuItem::new("Department", "/department", "building", ADMINS),
    ]
}

/// Load a menu definition (JSON array of `MenuItem`).
pub fn load_menu(path: &Path) -> Result<Vec<MenuItem>, MenuError> {
    let raw = std::fs::read_to_string(path)?;
    parse_menu(&raw)
}

pub fn parse_menu(raw: &str) -> Result<Vec<MenuItem>, MenuError> {
    let items: Vec<MenuItem> = serde_json::from_str(raw)?;
    if let Some(item) = items.iter().find(|i| i.allowed_roles.is_empty()) {
        return Err(MenuError::EmptyAllowList(item.label.clone()));
    }
    Ok(items)
}

/// Entries visible to `role`, in menu order. Empty until the role is resolved.
pub fn visible_items<'a>(role: &RoleState, items: &'a [MenuItem]) -> Vec<&'a MenuItem> {
    items.iter().filter(|item| item.visible_to(role)).collect()
}
