/*
 * Responsibility
 * - Config 読み込み → DB 接続 + migration → 依存生成 → Router 組み立て
 * - 公開 HTTP と内部 RPC (account directory) を同時に起動
 * - 認証は auth service の validate-user RPC (RemoteVerifier) に委譲
 */
use std::future::IntoFuture;
use std::net::SocketAddr;
use std::sync::Arc;

use anyhow::Result;
use axum::{Router, routing::get};
use sqlx::postgres::PgPoolOptions;
use tokio::net::TcpListener;

use identity::config::HttpConfig;
use identity::middleware;
use identity::rpc::{RemoteVerifier, RpcClient};
use identity::telemetry;

use crate::api;
use crate::api::v1::handlers::ping::ping;
use crate::config::Config;
use crate::repos::{PgAccountStore, PgProfileStore};
use crate::rpc;
use crate::state::AppState;

pub async fn run() -> Result<()> {
    telemetry::init_tracing();
    let config = Config::from_env()?;
    telemetry::init_panic_hook();

    tracing::info!(
        "starting people service in {:?} mode on {} (rpc {})",
        config.http.app_env,
        config.addr,
        config.rpc_addr
    );

    let db = PgPoolOptions::new()
        .max_connections(10)
        .connect(&config.database_url)
        .await?;
    sqlx::migrate!("./migrations").run(&db).await?;

    let state = AppState::new(
        Arc::new(PgAccountStore::new(db.clone())),
        Arc::new(PgProfileStore::new(db)),
        Arc::new(RemoteVerifier::new(RpcClient::new(&config.auth_rpc_url))),
        &config.http.credential_name,
    );

    let public = build_router(state.clone(), &config.http);
    let internal = middleware::http::apply(rpc::routes().with_state(state), &config.http);

    let public_listener = TcpListener::bind(config.addr).await?;
    let rpc_listener = TcpListener::bind(config.rpc_addr).await?;

    let public = axum::serve(
        public_listener,
        public.into_make_service_with_connect_info::<SocketAddr>(),
    )
    .with_graceful_shutdown(telemetry::shutdown_signal());
    let internal = axum::serve(
        rpc_listener,
        internal.into_make_service_with_connect_info::<SocketAddr>(),
    )
    .with_graceful_shutdown(telemetry::shutdown_signal());

    tokio::try_join!(public.into_future(), internal.into_future())?;

    tracing::info!("people service stopped");
    Ok(())
}

fn build_router(state: AppState, http: &HttpConfig) -> Router {
    let router = Router::new()
        .route("/api/ping", get(ping))
        .nest("/api/v1", api::v1::routes(&state))
        .with_state(state);

    let router = middleware::cors::apply(router, http);
    middleware::http::apply(router, http)
}
