/*
 * Responsibility
 * - Config 読み込み → 依存生成 (codec / issuer / verifier / people client)
 * - 公開 HTTP と内部 RPC の 2 つの listener を同時に起動し、signal で揃って停止
 */
use std::future::IntoFuture;
use std::net::SocketAddr;
use std::sync::Arc;

use axum::{Router, routing::get};
use tokio::net::TcpListener;

use identity::config::HttpConfig;
use identity::middleware;
use identity::rpc::RpcClient;
use identity::telemetry;

use crate::api;
use crate::api::v1::handlers::health::health;
use crate::clients::PeopleClient;
use crate::config::Config;
use crate::error::AppError;
use crate::rpc;
use crate::services::token::{TokenCodec, TokenIssuer};
use crate::services::verifier::LocalVerifier;
use crate::state::AppState;

pub async fn run() -> Result<(), AppError> {
    telemetry::init_tracing();
    let config = Config::from_env()?;
    telemetry::init_panic_hook();

    tracing::info!(
        "starting auth service in {:?} mode on {} (rpc {})",
        config.http.app_env,
        config.addr,
        config.rpc_addr
    );

    let state = build_state(&config);
    let public = build_router(state.clone(), &config.http);
    let internal = build_rpc_router(state, &config.http);

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

    tracing::info!("auth service stopped");
    Ok(())
}

fn build_state(config: &Config) -> AppState {
    // The signing key is handed to the codec once; nothing else holds it.
    let codec = Arc::new(TokenCodec::new(config.jwt_key.as_bytes()));
    let issuer = Arc::new(TokenIssuer::new(codec.clone(), config.token_expiration_hours));

    let directory = Arc::new(PeopleClient::new(RpcClient::new(&config.people_rpc_url)));
    let verifier = Arc::new(LocalVerifier::new(codec, directory.clone()));

    AppState::new(
        issuer,
        verifier,
        directory,
        &config.http.credential_name,
        config.http.app_env.is_production(),
    )
}

fn build_router(state: AppState, http: &HttpConfig) -> Router {
    let router = Router::new()
        .route("/healthz", get(health))
        .nest("/api/v1", api::v1::routes(&state))
        .with_state(state);

    let router = middleware::cors::apply(router, http);
    middleware::http::apply(router, http)
}

fn build_rpc_router(state: AppState, http: &HttpConfig) -> Router {
    middleware::http::apply(rpc::routes().with_state(state), http)
}

#[cfg(test)]
mod tests {
    use axum::body::Body;
    use axum::http::{Request, StatusCode, header};
    use axum::response::Response;
    use serde_json::{Value, json};
    use tower::ServiceExt;

    use super::*;
    use crate::api::v1::handlers::login::BAD_CREDENTIALS;
    use crate::services::verifier::tests::FakeDirectory;

    fn app() -> Router {
        let codec = Arc::new(TokenCodec::new(b"app-secret"));
        let directory = Arc::new(FakeDirectory::seeded());
        let state = AppState::new(
            Arc::new(TokenIssuer::new(codec.clone(), 24)),
            Arc::new(LocalVerifier::new(codec, directory.clone())),
            directory,
            "session-token",
            false,
        );
        build_router(state, &HttpConfig::default())
    }

    fn login_request(email: &str, password: &str) -> Request<Body> {
        Request::builder()
            .method("POST")
            .uri("/api/v1/auth")
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from(
                json!({ "email": email, "password": password }).to_string(),
            ))
            .unwrap()
    }

    async fn body_json(resp: Response) -> Value {
        let bytes = axum::body::to_bytes(resp.into_body(), usize::MAX)
            .await
            .expect("read body");
        serde_json::from_slice(&bytes).expect("json body")
    }

    #[tokio::test]
    async fn login_sets_cookie_and_session_accepts_it() {
        let app = app();

        let resp = app
            .clone()
            .oneshot(login_request("user42@example.com", "correct horse"))
            .await
            .unwrap();
        assert_eq!(resp.status(), StatusCode::OK);

        let cookie = resp
            .headers()
            .get(header::SET_COOKIE)
            .and_then(|v| v.to_str().ok())
            .unwrap()
            .to_string();
        assert!(cookie.starts_with("session-token="));
        assert!(cookie.contains("HttpOnly"));

        let body = body_json(resp).await;
        assert_eq!(body["status"], 1);
        assert_eq!(body["data"]["account"]["id"], 42);
        let token = body["data"]["token"].as_str().unwrap().to_string();

        let resp = app
            .oneshot(
                Request::builder()
                    .uri("/api/v1/session")
                    .header(header::COOKIE, format!("session-token={token}"))
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();
        assert_eq!(resp.status(), StatusCode::OK);
        let body = body_json(resp).await;
        assert_eq!(body["data"]["email"], "user42@example.com");
    }

    #[tokio::test]
    async fn wrong_password_is_401() {
        let resp = app()
            .oneshot(login_request("user42@example.com", "wrong"))
            .await
            .unwrap();
        assert_eq!(resp.status(), StatusCode::UNAUTHORIZED);
        assert_eq!(body_json(resp).await, json!({ "message": BAD_CREDENTIALS }));
    }

    #[tokio::test]
    async fn blank_email_is_a_validation_error() {
        let resp = app().oneshot(login_request("  ", "pw")).await.unwrap();
        assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
        assert_eq!(body_json(resp).await, json!({ "message": "email is required" }));
    }

    #[tokio::test]
    async fn unreadable_login_body_is_a_validation_error() {
        let req = Request::builder()
            .method("POST")
            .uri("/api/v1/auth")
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from("{\"email\": "))
            .unwrap();
        let resp = app().oneshot(req).await.unwrap();
        assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
        let body = body_json(resp).await;
        assert!(body["message"].as_str().is_some_and(|m| !m.is_empty()));
    }

    #[tokio::test]
    async fn session_without_credential_is_401() {
        let resp = app()
            .oneshot(
                Request::builder()
                    .uri("/api/v1/session")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();
        assert_eq!(resp.status(), StatusCode::UNAUTHORIZED);
    }

    #[tokio::test]
    async fn healthz_is_public() {
        let resp = app()
            .oneshot(Request::builder().uri("/healthz").body(Body::empty()).unwrap())
            .await
            .unwrap();
        assert_eq!(resp.status(), StatusCode::OK);
        assert_eq!(body_json(resp).await["status"], "OK");
    }
}
