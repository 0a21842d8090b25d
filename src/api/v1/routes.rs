/*
 * Responsibility
 * - v1 の URL 構造を定義
 * - session 終了 (401) の redirect 付与は middleware::session が app.rs で掛ける
 */
use axum::{
    Router,
    routing::{get, post, put},
};

use crate::state::AppState;

use crate::api::v1::handlers::{
    attendance::{check_in, check_out, list_attendance, today},
    auth::{login, logout, me, sign_up},
    bank_accounts::{
        create_bank_account, delete_bank_account, list_bank_accounts, update_bank_account,
    },
    employees::{
        create_account, create_employee, delete_employee, employee_history, employee_profile,
        form_options, get_employee, list_employees, update_employee,
    },
    health::health,
    leave::{create_leave_request, list_leave_requests, update_leave_status},
    nav::nav,
    org::{self, Catalog},
    salary::{all_salary, calculate_salary, mark_paid, my_salary, team_salary},
};

pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/health", get(health))
        .route("/auth/login", post(login))
        .route("/auth/sign-up", post(sign_up))
        .route("/auth/logout", post(logout))
        .route("/me", get(me))
        .route("/nav", get(nav))
        .route("/employees", get(list_employees).post(create_employee))
        .route("/employees/form-options", get(form_options))
        .route(
            "/employees/{employee_id}",
            get(get_employee).put(update_employee).delete(delete_employee),
        )
        .route("/employees/{employee_id}/history", get(employee_history))
        .route("/employees/{employee_id}/profile", get(employee_profile))
        .route("/employees/{employee_id}/account", post(create_account))
        .route(
            "/employees/{employee_id}/bank-accounts",
            get(list_bank_accounts),
        )
        .route("/bank-accounts", post(create_bank_account))
        .route(
            "/bank-accounts/{account_id}",
            put(update_bank_account).delete(delete_bank_account),
        )
        .merge(org::routes(Catalog::Departments))
        .merge(org::routes(Catalog::Teams))
        .merge(org::routes(Catalog::JobTitles))
        .route("/attendance", get(list_attendance))
        .route("/attendance/today", get(today))
        .route("/attendance/check-in", post(check_in))
        .route("/attendance/check-out", post(check_out))
        .route(
            "/leave-requests",
            get(list_leave_requests).post(create_leave_request),
        )
        .route("/leave-requests/{leave_request_id}/status", put(update_leave_status))
        .route("/salary/mine", get(my_salary))
        .route("/salary/team", get(team_salary))
        .route("/salary/all", get(all_salary))
        .route("/salary/calculate", post(calculate_salary))
        .route("/salary/{salary_id}/mark-paid", put(mark_paid))
}
