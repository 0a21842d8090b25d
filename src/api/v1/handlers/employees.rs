/*
 * Responsibility
 * - /employees 系: 一覧 / 詳細 / 作成 / 更新 / 削除 / 履歴 / アバター / アカウント発行
 * - 一覧と詳細には行ごとの action フラグ (詳細 / 編集 / 削除 / アカウント発行) を付ける
 * - 権限の無い操作は upstream を呼ぶ前に 403
 */
use axum::{
    Json,
    extract::{Path, State},
    response::Response,
};
use reqwest::Method;
use serde_json::Value;

use crate::api::v1::dto::employees::{
    CreateAccountPayload, CreateAccountRequest, EmployeeDetailView, EmployeeForm,
    EmployeeListActions, EmployeeListView, FormOptions, has_account,
};
use crate::api::v1::dto::view::{ListView, Record, text};
use crate::api::v1::extractors::{SessionCtx, SessionCtxExtractor};
use crate::api::v1::handlers::{fetch_page, relay, with_actions};
use crate::error::AppError;
use crate::services::nav::{Action, GuardDenied};
use crate::services::session::SessionId;
use crate::services::upstream::{Endpoint, ListData, Page, Payload};
use crate::state::AppState;

pub async fn list_employees(
    State(state): State<AppState>,
    SessionCtxExtractor(ctx): SessionCtxExtractor,
) -> Result<Json<EmployeeListView>, AppError> {
    let id = ctx.require_id()?;
    ctx.guard.require(Action::ViewEmployees)?;

    let page = fetch_page(&state, id, &Endpoint::new(&["employees", ""])).await?;
    let guard = &ctx.guard;
    let page = with_actions(page, |row| match text(row, "employeeId") {
        Some(employee_id) => guard.employee_row(&employee_id, has_account(row)),
        None => Default::default(),
    });

    Ok(Json(ListView::new(
        page,
        EmployeeListActions {
            create: guard.can(Action::CreateEmployee),
        },
    )))
}

pub async fn create_employee(
    State(state): State<AppState>,
    SessionCtxExtractor(ctx): SessionCtxExtractor,
    Json(form): Json<EmployeeForm>,
) -> Result<Response, AppError> {
    let id = ctx.require_id()?;
    ctx.guard.require(Action::CreateEmployee)?;
    form.validate()?;

    let response = state
        .upstream
        .send(
            id,
            Method::POST,
            &Endpoint::new(&["employees", ""]),
            Payload::json(&form)?,
        )
        .await?;
    relay(response)
}

/// Job titles and teams for the employee form, fetched concurrently.
pub async fn form_options(
    State(state): State<AppState>,
    SessionCtxExtractor(ctx): SessionCtxExtractor,
) -> Result<Json<FormOptions>, AppError> {
    let id = ctx.require_id()?;
    if !ctx.guard.can(Action::CreateEmployee) {
        ctx.guard.require(Action::UpdateEmployee)?;
    }

    let job_titles = Endpoint::new(&["job-titles"]);
    let teams = Endpoint::new(&["teams"]);
    let (job_titles, teams) = tokio::join!(
        options(&state, id, &job_titles),
        options(&state, id, &teams)
    );

    Ok(Json(FormOptions {
        job_titles: job_titles?,
        teams: teams?,
    }))
}

async fn options(
    state: &AppState,
    id: &SessionId,
    endpoint: &Endpoint,
) -> Result<Vec<Value>, AppError> {
    let data: ListData<Value> = state.upstream.get(id, endpoint).await?.into_data()?;
    Ok(data.into_page().items)
}

pub async fn get_employee(
    State(state): State<AppState>,
    SessionCtxExtractor(ctx): SessionCtxExtractor,
    Path(employee_id): Path<String>,
) -> Result<Json<EmployeeDetailView>, AppError> {
    let id = ctx.require_id()?;
    require_detail(&ctx, &employee_id)?;

    let employee = fetch_employee(&state, id, &employee_id).await?;
    let actions = ctx
        .guard
        .employee_row(&employee_id, has_account(&employee));

    Ok(Json(EmployeeDetailView {
        actions,
        can_view_financials: ctx.guard.can_view_financials_of(&employee_id),
        employee,
    }))
}

pub async fn update_employee(
    State(state): State<AppState>,
    SessionCtxExtractor(ctx): SessionCtxExtractor,
    Path(employee_id): Path<String>,
    Json(form): Json<EmployeeForm>,
) -> Result<Response, AppError> {
    let id = ctx.require_id()?;
    ctx.guard.require(Action::UpdateEmployee)?;
    form.validate()?;

    let response = state
        .upstream
        .send(
            id,
            Method::PUT,
            &Endpoint::new(&["employees", employee_id.as_str()]),
            Payload::json(&form)?,
        )
        .await?;
    relay(response)
}

pub async fn delete_employee(
    State(state): State<AppState>,
    SessionCtxExtractor(ctx): SessionCtxExtractor,
    Path(employee_id): Path<String>,
) -> Result<Response, AppError> {
    let id = ctx.require_id()?;
    if !ctx.guard.employee_row(&employee_id, false).delete {
        return Err(GuardDenied {
            action: Action::DeleteEmployee,
        }
        .into());
    }

    let response = state
        .upstream
        .send(
            id,
            Method::DELETE,
            &Endpoint::new(&["employees", employee_id.as_str()]),
            Payload::Empty,
        )
        .await?;
    tracing::info!(%employee_id, status = response.status.as_u16(), "employee delete relayed");
    relay(response)
}

pub async fn employee_history(
    State(state): State<AppState>,
    SessionCtxExtractor(ctx): SessionCtxExtractor,
    Path(employee_id): Path<String>,
) -> Result<Json<Page<Record>>, AppError> {
    let id = ctx.require_id()?;
    require_detail(&ctx, &employee_id)?;

    let page = fetch_page(
        &state,
        id,
        &Endpoint::new(&["employee-history", "employee", employee_id.as_str()]),
    )
    .await?;
    Ok(Json(page))
}

/// Avatar (`avatarContentType` + base64 `avatarImage`) as the backend returns it.
pub async fn employee_profile(
    State(state): State<AppState>,
    SessionCtxExtractor(ctx): SessionCtxExtractor,
    Path(employee_id): Path<String>,
) -> Result<Response, AppError> {
    let id = ctx.require_id()?;
    require_detail(&ctx, &employee_id)?;

    let response = state
        .upstream
        .get(
            id,
            &Endpoint::new(&["employees", "profile", employee_id.as_str()]),
        )
        .await?;
    relay(response)
}

/// Provision a login for an employee. Only for rows that have no account yet
/// and are not the signed-in user.
pub async fn create_account(
    State(state): State<AppState>,
    SessionCtxExtractor(ctx): SessionCtxExtractor,
    Path(employee_id): Path<String>,
    Json(req): Json<CreateAccountRequest>,
) -> Result<Response, AppError> {
    let id = ctx.require_id()?;
    let denied = GuardDenied {
        action: Action::CreateAccount,
    };
    ctx.guard.require(Action::CreateAccount)?;
    if ctx.guard.is_self(&employee_id) {
        return Err(denied.into());
    }
    let role = req.validate()?;

    let employee = fetch_employee(&state, id, &employee_id).await?;
    if !ctx
        .guard
        .employee_row(&employee_id, has_account(&employee))
        .create_account
    {
        return Err(denied.into());
    }

    let payload = CreateAccountPayload {
        employee_id: employee_id.clone(),
        account_email: req.account_email.trim().to_string(),
        password: req.password,
        role,
    };
    let response = state
        .upstream
        .send(
            id,
            Method::POST,
            &Endpoint::new(&["auth", "create-employee-account"]),
            Payload::json(&payload)?,
        )
        .await?;
    tracing::info!(%employee_id, %role, status = response.status.as_u16(), "account provisioning relayed");
    relay(response)
}

fn require_detail(ctx: &SessionCtx, employee_id: &str) -> Result<(), AppError> {
    if ctx.guard.employee_row(employee_id, false).view_detail {
        Ok(())
    } else {
        Err(GuardDenied {
            action: Action::ViewEmployees,
        }
        .into())
    }
}

async fn fetch_employee(
    state: &AppState,
    id: &SessionId,
    employee_id: &str,
) -> Result<Record, AppError> {
    let employee = state
        .upstream
        .get(id, &Endpoint::new(&["employees", employee_id]))
        .await?
        .into_data()?;
    Ok(employee)
}
