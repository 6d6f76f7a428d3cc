/*
 * Responsibility
 * - middleware の公開インターフェース
 * - http: request id / body limit / request tracking
 * - auth: credential 検証 guard (route group 単位)
 * - cors: browser 向け CORS
 */
pub mod auth;
pub mod cors;
pub mod http;
pub mod request;

pub use auth::Access;
