use axum::Json;

use identity::{AuthContext, Envelope, HandlerError, Subject};

/// GET /api/v1/user
pub async fn current_user(ctx: AuthContext) -> Result<Json<Envelope<Subject>>, HandlerError> {
    let subject = ctx.require_subject()?.clone();
    Ok(Json(Envelope::ok(subject, "User fetched.")))
}
