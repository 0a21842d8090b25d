/*
 * Responsibility
 * - 部署 / チーム / 役職: 同じ形の CRUD を Catalog ごとに提供する
 * - 変更系は ADMIN / OWNER のみ (upstream を呼ぶ前に 403)
 */
use axum::{
    Json, Router,
    extract::{Path, State},
    response::Response,
    routing::{get, put},
};
use reqwest::Method;

use crate::api::v1::dto::org::{OrgListActions, OrgListView, OrgUnitForm};
use crate::api::v1::dto::view::ListView;
use crate::api::v1::extractors::SessionCtxExtractor;
use crate::api::v1::handlers::{fetch_page, relay};
use crate::error::AppError;
use crate::services::nav::Action;
use crate::services::upstream::{Endpoint, Payload};
use crate::state::AppState;

/// Organisation reference data, one upstream collection each.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Catalog {
    Departments,
    Teams,
    JobTitles,
}

impl Catalog {
    pub fn segment(&self) -> &'static str {
        match self {
            Catalog::Departments => "departments",
            Catalog::Teams => "teams",
            Catalog::JobTitles => "job-titles",
        }
    }

    pub fn manage_action(&self) -> Action {
        match self {
            Catalog::Departments => Action::ManageDepartments,
            Catalog::Teams => Action::ManageTeams,
            Catalog::JobTitles => Action::ManageJobTitles,
        }
    }
}

/// `/{segment}` and `/{segment}/{id}` for one catalog.
pub fn routes(catalog: Catalog) -> Router<AppState> {
    let collection = format!("/{}", catalog.segment());
    let item = format!("/{}/{{id}}", catalog.segment());

    Router::new()
        .route(
            &collection,
            get(move |state: State<AppState>, ctx: SessionCtxExtractor| {
                list(catalog, state, ctx)
            })
            .post(
                move |state: State<AppState>,
                      ctx: SessionCtxExtractor,
                      form: Json<OrgUnitForm>| { create(catalog, state, ctx, form) },
            ),
        )
        .route(
            &item,
            put(
                move |state: State<AppState>,
                      ctx: SessionCtxExtractor,
                      path: Path<String>,
                      form: Json<OrgUnitForm>| {
                    update(catalog, state, ctx, path, form)
                },
            )
            .delete(
                move |state: State<AppState>, ctx: SessionCtxExtractor, path: Path<String>| {
                    delete(catalog, state, ctx, path)
                },
            ),
        )
}

async fn list(
    catalog: Catalog,
    State(state): State<AppState>,
    SessionCtxExtractor(ctx): SessionCtxExtractor,
) -> Result<Json<OrgListView>, AppError> {
    let id = ctx.require_id()?;

    // The backend serves these lists under a trailing slash.
    let page = fetch_page(&state, id, &Endpoint::new(&[catalog.segment(), ""])).await?;
    let manage = ctx.guard.can(catalog.manage_action());

    Ok(Json(ListView::new(
        page,
        OrgListActions {
            create: manage,
            edit: manage,
            delete: manage,
        },
    )))
}

async fn create(
    catalog: Catalog,
    State(state): State<AppState>,
    SessionCtxExtractor(ctx): SessionCtxExtractor,
    Json(form): Json<OrgUnitForm>,
) -> Result<Response, AppError> {
    let id = ctx.require_id()?;
    ctx.guard.require(catalog.manage_action())?;
    form.validate()?;

    let response = state
        .upstream
        .send(
            id,
            Method::POST,
            &Endpoint::new(&[catalog.segment()]),
            Payload::json(&form)?,
        )
        .await?;
    relay(response)
}

async fn update(
    catalog: Catalog,
    State(state): State<AppState>,
    SessionCtxExtractor(ctx): SessionCtxExtractor,
    Path(unit_id): Path<String>,
    Json(form): Json<OrgUnitForm>,
) -> Result<Response, AppError> {
    let id = ctx.require_id()?;
    ctx.guard.require(catalog.manage_action())?;
    form.validate()?;

    let response = state
        .upstream
        .send(
            id,
            Method::PUT,
            &Endpoint::new(&[catalog.segment(), unit_id.as_str()]),
            Payload::json(&form)?,
        )
        .await?;
    relay(response)
}

async fn delete(
    catalog: Catalog,
    State(state): State<AppState>,
    SessionCtxExtractor(ctx): SessionCtxExtractor,
    Path(unit_id): Path<String>,
) -> Result<Response, AppError> {
    let id = ctx.require_id()?;
    ctx.guard.require(catalog.manage_action())?;

    let response = state
        .upstream
        .send(
            id,
            Method::DELETE,
            &Endpoint::new(&[catalog.segment(), unit_id.as_str()]),
            Payload::Empty,
        )
        .await?;
    tracing::info!(catalog = catalog.segment(), %unit_id, "delete relayed");
    relay(response)
}
