//! Registration and login handlers.

use axum::Json;
use axum::extract::State;
use axum::extract::rejection::JsonRejection;
use axum::http::StatusCode;
use skymates_core::models::auth::User;

use crate::AppState;
use crate::error::{AppError, AppResult};
use crate::models::{Envelope, LoginRequest, LoginResponse, RegisterRequest};

/// `POST /api/auth/register`: create an account.
pub async fn register_handler(
    State(state): State<AppState>,
    body: Result<Json<RegisterRequest>, JsonRejection>,
) -> AppResult<(StatusCode, Json<Envelope<User>>)> {
    let Json(body) = body.map_err(|e| AppError::Validation(e.body_text()))?;
    let user = state
        .accounts
        .register(&body.username, &body.email, &body.password)
        .await?;
    Ok((
        StatusCode::CREATED,
        Json(Envelope::with_message("Registered", user)),
    ))
}

/// `POST /api/auth/login`: exchange credentials for a bearer token.
pub async fn login_handler(
    State(state): State<AppState>,
    body: Result<Json<LoginRequest>, JsonRejection>,
) -> AppResult<Json<Envelope<LoginResponse>>> {
    let Json(body) = body.map_err(|e| AppError::Validation(e.body_text()))?;
    let resp = state.accounts.login(&body.account, &body.password).await?;
    Ok(Json(Envelope::ok(resp)))
}
