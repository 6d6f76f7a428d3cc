//! HTTP-level middleware (cross-cutting concerns).
//!
//! Responsibility:
//! - Request-Id generation + propagation (X-Request-Id)
//! - Body size limits
//! - Per-request context, panic recovery and access log (`request::track`)
//!
//! Notes:
//! - No global timeout: a request that passed verification runs to completion.

use axum::{Router, http::header::HeaderName, middleware};
use tower::ServiceBuilder;
use tower_http::limit::RequestBodyLimitLayer;
use tower_http::request_id::{MakeRequestUuid, PropagateRequestIdLayer, SetRequestIdLayer};

use crate::config::HttpConfig;
use crate::middleware::request::{RequestTracking, track};

pub const REQUEST_ID_HEADER: &str = "x-request-id";

/// Apply HTTP-level middleware to the given Router.
///
/// Order (outer → inner): request id, request tracking, body limit.
/// `track` only accepts `Request<Body>`, so it must sit outside the limit.
pub fn apply(router: Router, config: &HttpConfig) -> Router {
    let request_id_header = HeaderName::from_static(REQUEST_ID_HEADER);
    let tracking = RequestTracking {
        proxy_count: config.proxy_count,
    };

    let layers = ServiceBuilder::new()
        // Generate a request id if missing, then propagate it to the response.
        .layer(SetRequestIdLayer::new(
            request_id_header.clone(),
            MakeRequestUuid,
        ))
        .layer(PropagateRequestIdLayer::new(request_id_header))
        .layer(middleware::from_fn_with_state(tracking, track))
        // Bound memory use before any handler code runs.
        .layer(RequestBodyLimitLayer::new(config.body_limit_bytes()));

    router.layer(layers)
}
