/*
 * Responsibility
 * - Config読み込み → 依存生成 (session store / upstream client / menu) → Router 組み立て
 * - Middleware の適用 (session 終了処理 / HTTP / security headers / CORS)
 * - axum::serve() で起動
 */
use std::future::Future;
use std::{panic, process, sync::Arc};

use anyhow::{Context, Result};
use axum::Router;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use crate::api;
use crate::config::{Config, SessionBackend};
use crate::middleware;
use crate::services::{
    cache::{CacheClient, MemoryCache, ValkeyClient},
    nav::{default_menu, load_menu},
    session::{SessionCookie, SessionStore},
    upstream::UpstreamClient,
};
use crate::state::AppState;

fn init_tracing() {
    // Prefer RUST_LOG if set; otherwise use a sensible default.
    // Ex:
    // RUST_LOG=info,cetus_dashboard=debug,tower_http=debug cargo run
    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info,tower_http=info"));

    tracing_subscriber::registry()
        .with(filter)
        .with(tracing_subscriber::fmt::layer())
        .init();
}

fn init_panic_hook(abort_on_panic: bool) {
    let default_hook = panic::take_hook();

    panic::set_hook(Box::new(move |info| {
        // stderr can be hidden depending on how the process is launched
        tracing::error!(?info, "panic");

        if abort_on_panic {
            process::abort();
        } else {
            default_hook(info);
        }
    }))
}

pub async fn run() -> Result<()> {
    init_tracing();
    let config = Config::from_env()?;

    init_panic_hook(!config.app_env.is_production());

    tracing::info!(
        app_env = ?config.app_env,
        addr = %config.addr,
        upstream = %config.api_base_url,
        "starting dashboard"
    );

    run_with_shutdown(config, async {
        let _ = tokio::signal::ctrl_c().await;
    })
    .await
}

pub async fn run_with_shutdown<F>(config: Config, shutdown: F) -> Result<()>
where
    F: Future<Output = ()> + Send + 'static,
{
    let state = build_state(&config).await?;
    let app = build_router(state, &config);

    let listener = tokio::net::TcpListener::bind(config.addr)
        .await
        .with_context(|| format!("bind {}", config.addr))?;
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown)
        .await?;

    tracing::info!("dashboard stopped");
    Ok(())
}

pub async fn build_state(config: &Config) -> Result<AppState> {
    let cache: Arc<dyn CacheClient> = match &config.session_backend {
        SessionBackend::Memory => Arc::new(MemoryCache::new()),
        SessionBackend::Valkey { url } => Arc::new(
            ValkeyClient::new(url)
                .await
                .context("connect session store")?,
        ),
    };
    tracing::info!(backend = cache.backend_name(), "session store ready");

    let sessions = SessionStore::new(cache, config.session_ttl);
    let cookie = SessionCookie::new(
        config.session_cookie_name.clone(),
        config.app_env.is_production(),
        config.session_ttl,
    );
    let upstream = UpstreamClient::new(
        config.api_base_url.clone(),
        sessions.clone(),
        config.upstream_timeout,
    )
    .context("build upstream client")?;

    let menu = match &config.nav_menu_path {
        Some(path) => load_menu(path).with_context(|| format!("load menu {}", path.display()))?,
        None => default_menu(),
    };

    Ok(AppState::new(
        sessions,
        cookie,
        upstream,
        menu,
        config.login_path.clone(),
    ))
}

pub fn build_router(state: AppState, config: &Config) -> Router {
    let v1 = middleware::session::apply(api::v1::routes(), state.clone());

    let router = Router::new().nest("/api/v1", v1).with_state(state);

    let router = middleware::http::apply(router);
    let router = middleware::security_headers::apply(router);
    middleware::cors::apply(router, config)
}
