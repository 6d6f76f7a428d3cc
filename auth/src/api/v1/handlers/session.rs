use axum::Json;

use identity::{AuthContext, Envelope, HandlerError, Subject};

/// GET /api/v1/session: the subject behind the presented credential.
pub async fn session(ctx: AuthContext) -> Result<Json<Envelope<Subject>>, HandlerError> {
    let subject = ctx.require_subject()?.clone();
    Ok(Json(Envelope::ok(subject, "Session is valid.")))
}
