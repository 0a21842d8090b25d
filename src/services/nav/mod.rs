pub mod guard;
pub mod menu;

pub use guard::{
    Action, EmployeeRowActions, GuardDenied, LeaveRowActions, SalaryRowActions, ViewGuard,
};
pub use menu::{MenuItem, default_menu, load_menu, visible_items};
