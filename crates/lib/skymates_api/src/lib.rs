//! # skymates_api
//!
//! HTTP API library for Skymates.

pub mod config;
pub mod error;
pub mod handlers;
pub mod middleware;
pub mod models;
pub mod services;

use std::sync::Arc;

use axum::Router;
use axum::routing::{get, post};
use skymates_core::auth::jwt::AuthTokenService;
use skymates_core::store::{TermStore, UserStore};
use skymates_core::terms::TermService;
use sqlx::PgPool;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;

use crate::config::ApiConfig;
use crate::handlers::{auth, health, terms, users};
use crate::services::auth::AccountService;

/// Shared application state passed to all handlers.
#[derive(Clone)]
pub struct AppState {
    /// Glossary queries.
    pub terms: TermService,
    /// Registration, login and token validation.
    pub accounts: AccountService,
    /// API configuration.
    pub config: ApiConfig,
}

impl AppState {
    /// Wire services over the given stores.
    pub fn new(
        config: ApiConfig,
        term_store: Arc<dyn TermStore>,
        user_store: Arc<dyn UserStore>,
    ) -> Self {
        let tokens = Arc::new(AuthTokenService::new(&config.jwt_secret));
        Self {
            terms: TermService::new(term_store).with_query_timeout(config.query_timeout),
            accounts: AccountService::new(user_store, tokens)
                .with_query_timeout(config.query_timeout),
            config,
        }
    }
}

/// Run embedded database migrations.
///
/// Delegates to `skymates_core::migrate::migrate()` which owns the migration files.
pub async fn migrate(pool: &PgPool) -> Result<(), sqlx::migrate::MigrateError> {
    skymates_core::migrate::migrate(pool).await
}

/// Builds the Axum router with all routes and shared state.
pub fn router(state: AppState) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    // Public routes (no auth required)
    let public = Router::new()
        .route("/api/health", get(health::health_handler))
        .route("/api/auth/register", post(auth::register_handler))
        .route("/api/auth/login", post(auth::login_handler))
        .route("/api/terms", get(terms::list_terms_handler))
        .route("/api/terms/suggestions", get(terms::suggestions_handler))
        .route("/api/terms/{id}", get(terms::term_detail_handler))
        .route(
            "/api/categories/{id}/term-count",
            get(terms::term_count_handler),
        );

    // Protected routes (require auth)
    let protected = Router::new()
        .route("/api/users/me", get(users::me_handler))
        .layer(axum::middleware::from_fn_with_state(
            state.clone(),
            middleware::auth::require_auth,
        ));

    Router::new()
        .merge(public)
        .merge(protected)
        .layer(TraceLayer::new_for_http())
        .layer(cors)
        .with_state(state)
}
