//! Handlers for the authenticated caller.

use axum::extract::State;
use axum::{Extension, Json};
use skymates_core::models::auth::User;

use crate::AppState;
use crate::error::AppResult;
use crate::middleware::auth::AuthenticatedUser;
use crate::models::Envelope;

/// `GET /api/users/me`: profile of the token holder.
pub async fn me_handler(
    State(state): State<AppState>,
    Extension(AuthenticatedUser(claims)): Extension<AuthenticatedUser>,
) -> AppResult<Json<Envelope<User>>> {
    let user = state.accounts.current_user(&claims.username).await?;
    Ok(Json(Envelope::ok(user)))
}
