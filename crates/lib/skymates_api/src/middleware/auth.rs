//! Bearer token middleware.

use axum::{
    extract::{Request, State},
    http::header::AUTHORIZATION,
    middleware::Next,
    response::Response,
};
use skymates_core::models::auth::TokenClaims;
use tracing::debug;

use crate::AppState;
use crate::error::AppError;

/// Claims of the caller, stored in request extensions.
#[derive(Debug, Clone)]
pub struct AuthenticatedUser(pub TokenClaims);

/// Reject requests without a valid `Authorization: Bearer <token>` header.
///
/// Every failure answers 401 with the same body; the cause is only logged.
pub async fn require_auth(
    State(state): State<AppState>,
    mut request: Request,
    next: Next,
) -> Result<Response, AppError> {
    let Some(header) = request
        .headers()
        .get(AUTHORIZATION)
        .and_then(|v| v.to_str().ok())
    else {
        debug!("missing authorization header");
        return Err(AppError::Unauthorized);
    };

    let Some(token) = header.strip_prefix("Bearer ") else {
        debug!("unsupported authorization scheme");
        return Err(AppError::Unauthorized);
    };

    let claims = state.accounts.tokens().validate(token.trim()).map_err(|cause| {
        debug!(?cause, "bearer token rejected");
        AppError::Unauthorized
    })?;

    request.extensions_mut().insert(AuthenticatedUser(claims));
    Ok(next.run(request).await)
}
