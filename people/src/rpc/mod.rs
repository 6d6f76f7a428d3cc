//! Account directory served to the authentication service.

mod handlers;

use axum::{Router, routing::post};

use identity::rpc::wire;

use crate::state::AppState;

pub fn routes() -> Router<AppState> {
    Router::new()
        .route(wire::ACCOUNT_DETAILS, post(handlers::account_details))
        .route(wire::VALIDATE_PROFILE, post(handlers::validate_profile))
        .route(wire::AUTHENTICATE, post(handlers::authenticate))
}

#[cfg(test)]
mod tests {
    use axum::body::Body;
    use axum::http::{Request, StatusCode, header};
    use axum::response::Response;
    use serde_json::{Value, json};
    use tower::ServiceExt;

    use super::*;
    use crate::app::tests::test_state;

    fn rpc(path: &str, body: Value) -> Request<Body> {
        Request::builder()
            .method("POST")
            .uri(path)
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from(body.to_string()))
            .unwrap()
    }

    async fn call(path: &str, body: Value) -> Response {
        routes()
            .with_state(test_state())
            .oneshot(rpc(path, body))
            .await
            .unwrap()
    }

    async fn body_json(resp: Response) -> Value {
        let bytes = axum::body::to_bytes(resp.into_body(), usize::MAX)
            .await
            .expect("read body");
        serde_json::from_slice(&bytes).expect("json body")
    }

    #[tokio::test]
    async fn account_details_for_active_account() {
        let resp = call(wire::ACCOUNT_DETAILS, json!({ "accountId": 42 })).await;
        assert_eq!(resp.status(), StatusCode::OK);
        let body = body_json(resp).await;
        assert_eq!(body["status"], 1);
        assert_eq!(body["data"]["id"], 42);
        assert!(body["data"].get("passwordHash").is_none());
    }

    #[tokio::test]
    async fn account_details_for_inactive_and_unknown() {
        let resp = call(wire::ACCOUNT_DETAILS, json!({ "accountId": 44 })).await;
        assert_eq!(resp.status(), StatusCode::OK);
        assert_eq!(body_json(resp).await["status"], 0);

        let resp = call(wire::ACCOUNT_DETAILS, json!({ "accountId": 999 })).await;
        assert_eq!(resp.status(), StatusCode::NOT_FOUND);
        assert_eq!(body_json(resp).await["code"], "UNKNOWN_ACCOUNT");
    }

    #[tokio::test]
    async fn validate_profile_follows_ownership_and_delegation() {
        for (profile, account, expected) in [(7, 42, 1), (7, 50, 1), (7, 43, 0), (9, 42, 0)] {
            let resp = call(
                wire::VALIDATE_PROFILE,
                json!({ "profileId": profile, "accountId": account }),
            )
            .await;
            assert_eq!(resp.status(), StatusCode::OK);
            assert_eq!(
                body_json(resp).await["status"],
                expected,
                "profile {profile} account {account}"
            );
        }
    }

    #[tokio::test]
    async fn authenticate_checks_password() {
        let ok = call(
            wire::AUTHENTICATE,
            json!({ "email": "user42@example.com", "password": "s3cret" }),
        )
        .await;
        let body = body_json(ok).await;
        assert_eq!(body["status"], 1);
        assert_eq!(body["data"]["email"], "user42@example.com");

        let bad = call(
            wire::AUTHENTICATE,
            json!({ "email": "user42@example.com", "password": "guess" }),
        )
        .await;
        assert_eq!(body_json(bad).await["status"], 0);
    }
}
