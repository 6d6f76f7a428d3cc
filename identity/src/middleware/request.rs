//! Outermost per-request boundary.
//!
//! Responsibility:
//! - Build `RequestMeta` (remote address, correlation id, request span)
//! - Catch handler panics and turn them into the generic failure envelope
//! - Emit exactly one access log line per request

use std::any::Any;
use std::net::SocketAddr;
use std::panic::AssertUnwindSafe;
use std::time::Instant;

use axum::{
    Json,
    body::HttpBody,
    extract::{ConnectInfo, Request, State},
    http::{HeaderMap, HeaderValue, StatusCode, header},
    middleware::Next,
    response::{IntoResponse, Response},
};
use futures_util::FutureExt;
use tower_http::request_id::RequestId;
use tracing::Instrument;

use crate::context::RequestMeta;
use crate::error::Envelope;
use crate::telemetry;

pub const PANIC_MESSAGE: &str = "server failed to process request";

#[derive(Debug, Clone, Copy, Default)]
pub struct RequestTracking {
    pub proxy_count: usize,
}

pub async fn track(
    State(tracking): State<RequestTracking>,
    mut req: Request,
    next: Next,
) -> Response {
    let started = Instant::now();
    let method = req.method().clone();
    let target = req
        .uri()
        .path_and_query()
        .map(|pq| pq.as_str().to_owned())
        .unwrap_or_else(|| req.uri().path().to_owned());

    let peer = req
        .extensions()
        .get::<ConnectInfo<SocketAddr>>()
        .map(|ConnectInfo(addr)| *addr);
    let remote = remote_address(req.headers(), peer, tracking.proxy_count);

    let request_id = req
        .extensions()
        .get::<RequestId>()
        .and_then(|id| id.header_value().to_str().ok())
        .map(str::to_owned)
        .unwrap_or_else(|| uuid::Uuid::new_v4().to_string());

    let span = tracing::info_span!("request", request_id = %request_id);

    req.extensions_mut().insert(RequestMeta {
        remote_address: remote.clone(),
        request_id,
        span: span.clone(),
    });

    let mut response = match AssertUnwindSafe(next.run(req))
        .catch_unwind()
        .instrument(span.clone())
        .await
    {
        Ok(resp) => resp,
        Err(payload) => span.in_scope(|| {
            let backtrace = telemetry::take_panic_backtrace().unwrap_or_default();
            tracing::error!(
                panic = %panic_message(payload.as_ref()),
                %backtrace,
                "recovered from panic"
            );
            (StatusCode::OK, Json(Envelope::failure(PANIC_MESSAGE))).into_response()
        }),
    };

    // Bodies default to JSON; empty fallbacks (router 404/405) stay untyped.
    if response.body().size_hint().exact() != Some(0) {
        response
            .headers_mut()
            .entry(header::CONTENT_TYPE)
            .or_insert(HeaderValue::from_static("application/json"));
    }

    let status_code = response.status().as_u16();
    span.in_scope(|| {
        tracing::info!(
            duration_ms = started.elapsed().as_millis() as u64,
            status_code,
            remote = %remote,
            "{} {}",
            method,
            target
        );
    });

    response
}

fn panic_message(payload: &(dyn Any + Send)) -> &str {
    if let Some(s) = payload.downcast_ref::<&str>() {
        s
    } else if let Some(s) = payload.downcast_ref::<String>() {
        s.as_str()
    } else {
        "panic"
    }
}

/// Client address, honouring `X-Forwarded-For` when the service sits behind `proxy_count` proxies.
pub fn remote_address(headers: &HeaderMap, peer: Option<SocketAddr>, proxy_count: usize) -> String {
    let mut addr = peer.map(|p| p.ip().to_string()).unwrap_or_default();

    if proxy_count > 0
        && let Some(forwarded) = headers
            .get("x-forwarded-for")
            .and_then(|v| v.to_str().ok())
            .filter(|v| !v.trim().is_empty())
    {
        let clients: Vec<&str> = forwarded.split(',').collect();
        let picked = if proxy_count > clients.len() {
            clients[0]
        } else {
            clients[clients.len() - proxy_count]
        };
        addr = strip_port(picked.trim());
    }

    addr
}

fn strip_port(addr: &str) -> String {
    match addr.parse::<SocketAddr>() {
        Ok(sa) => sa.ip().to_string(),
        Err(_) => addr.to_string(),
    }
}
