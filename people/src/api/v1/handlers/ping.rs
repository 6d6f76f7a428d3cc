/*
 * Responsibility
 * - GET /api/ping (疎通用, 認証なし)
 */
use axum::Json;

use identity::Envelope;

pub async fn ping() -> Json<Envelope<()>> {
    Json(Envelope::message("pong"))
}
