pub mod attendance;
pub mod auth;
pub mod bank_accounts;
pub mod employees;
pub mod leave;
pub mod nav;
pub mod org;
pub mod salary;
pub mod validate;
pub mod view;
