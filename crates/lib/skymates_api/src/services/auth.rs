//! Account flows: registration, login and profile lookup.

use std::sync::Arc;
use std::time::Duration;

use skymates_core::auth::credentials::{login_field, validate_registration};
use skymates_core::auth::jwt::AuthTokenService;
use skymates_core::auth::password::{hash_password, verify_password};
use skymates_core::error::{CoreError, CoreResult};
use skymates_core::models::auth::{NewUser, User, UserField};
use skymates_core::store::{StoreError, UserStore};
use skymates_core::terms::DEFAULT_QUERY_TIMEOUT;
use tracing::{info, warn};

use crate::models::LoginResponse;

const INVALID_CREDENTIALS: &str = "invalid credentials";

/// Registration and login over a [`UserStore`].
#[derive(Clone)]
pub struct AccountService {
    users: Arc<dyn UserStore>,
    tokens: Arc<AuthTokenService>,
    query_timeout: Duration,
}

impl AccountService {
    pub fn new(users: Arc<dyn UserStore>, tokens: Arc<AuthTokenService>) -> Self {
        Self {
            users,
            tokens,
            query_timeout: DEFAULT_QUERY_TIMEOUT,
        }
    }

    pub fn with_query_timeout(mut self, query_timeout: Duration) -> Self {
        self.query_timeout = query_timeout;
        self
    }

    pub fn tokens(&self) -> &AuthTokenService {
        &self.tokens
    }

    /// Create an account. Username and email must both be unused.
    pub async fn register(&self, username: &str, email: &str, password: &str) -> CoreResult<User> {
        let username = username.trim();
        let email = email.trim();
        validate_registration(username, email, password)?;

        if self
            .run("check username", self.users.user_exists(UserField::Username, username))
            .await?
        {
            return Err(CoreError::already_exists("Username already taken"));
        }
        if self
            .run("check email", self.users.user_exists(UserField::Email, email))
            .await?
        {
            return Err(CoreError::already_exists("Email already registered"));
        }

        let new_user = NewUser {
            username: username.to_string(),
            email: email.to_string(),
            password_hash: hash_password(password)?,
        };
        // A concurrent registration can still win the race; the unique
        // constraint reports it as a duplicate.
        let user = match tokio::time::timeout(self.query_timeout, self.users.create_user(&new_user))
            .await
        {
            Ok(Ok(user)) => user,
            Ok(Err(StoreError::Duplicate(constraint))) => {
                return Err(CoreError::already_exists(if constraint.contains("email") {
                    "Email already registered"
                } else {
                    "Username already taken"
                }));
            }
            Ok(Err(e)) => return Err(store_failure("create user", e)),
            Err(elapsed) => return Err(CoreError::internal("create user timed out", elapsed)),
        };

        info!(username = %user.username, "user registered");
        Ok(user)
    }

    /// Check credentials and issue a token.
    ///
    /// Unknown accounts and wrong passwords fail identically.
    pub async fn login(&self, account: &str, password: &str) -> CoreResult<LoginResponse> {
        let account = account.trim();
        if account.is_empty() || password.is_empty() {
            return Err(CoreError::validation("Account and password are required"));
        }

        let field = login_field(account);
        let Some(found) = self
            .run("find user", self.users.find_user(field, account))
            .await?
        else {
            return Err(CoreError::unauthorized(INVALID_CREDENTIALS));
        };

        if !verify_password(password, &found.password_hash)? {
            return Err(CoreError::unauthorized(INVALID_CREDENTIALS));
        }

        let token = self.tokens.issue(&found.user)?;
        info!(username = %found.user.username, "user logged in");
        Ok(LoginResponse {
            token,
            token_type: "Bearer".to_string(),
            expires_in: self.tokens.lifetime().num_seconds(),
            user: found.user,
        })
    }

    /// Profile of the user a token was issued to.
    pub async fn current_user(&self, username: &str) -> CoreResult<User> {
        self.run("find user", self.users.find_user(UserField::Username, username))
            .await?
            .map(|found| found.user)
            .ok_or_else(|| CoreError::not_found("User not found"))
    }

    async fn run<T, F>(&self, context: &str, query: F) -> CoreResult<T>
    where
        F: Future<Output = Result<T, StoreError>>,
    {
        match tokio::time::timeout(self.query_timeout, query).await {
            Ok(result) => result.map_err(|e| store_failure(context, e)),
            Err(elapsed) => {
                warn!(timeout = ?self.query_timeout, "{context} timed out");
                Err(CoreError::internal(format!("{context} timed out"), elapsed))
            }
        }
    }
}

fn store_failure(context: &str, e: StoreError) -> CoreError {
    warn!(error = %e, "{context} failed");
    CoreError::internal(format!("{context} failed"), e)
}

#[cfg(test)]
mod tests {
    use skymates_core::auth::jwt::JwtSecret;
    use skymates_core::error::ErrorKind;
    use skymates_core::store::memory::MemoryStore;

    use super::*;

    fn service() -> (AccountService, Arc<MemoryStore>) {
        let store = Arc::new(MemoryStore::new());
        let secret = JwtSecret::new("test-secret").unwrap();
        let tokens = Arc::new(AuthTokenService::new(&secret));
        (AccountService::new(store.clone(), tokens), store)
    }

    #[tokio::test]
    async fn register_then_login_by_username_and_email() {
        let (svc, _) = service();
        let user = svc
            .register("ada", "ada@example.com", "lovelace")
            .await
            .unwrap();
        assert_eq!(user.username, "ada");

        let by_name = svc.login("ada", "lovelace").await.unwrap();
        assert_eq!(by_name.user.id, user.id);
        assert_eq!(by_name.expires_in, 24 * 60 * 60);
        let claims = svc.tokens().validate(&by_name.token).unwrap();
        assert_eq!(claims.username, "ada");

        let by_email = svc.login("ada@example.com", "lovelace").await.unwrap();
        assert_eq!(by_email.user.id, user.id);
    }

    #[tokio::test]
    async fn wrong_password_and_unknown_account_look_the_same() {
        let (svc, _) = service();
        svc.register("ada", "ada@example.com", "lovelace")
            .await
            .unwrap();

        let wrong = svc.login("ada", "babbage").await.unwrap_err();
        let unknown = svc.login("grace", "lovelace").await.unwrap_err();
        assert_eq!(wrong.kind(), ErrorKind::Unauthorized);
        assert_eq!(unknown.kind(), ErrorKind::Unauthorized);
        assert_eq!(wrong.message(), unknown.message());
    }

    #[tokio::test]
    async fn duplicate_username_or_email_is_rejected() {
        let (svc, _) = service();
        svc.register("ada", "ada@example.com", "lovelace")
            .await
            .unwrap();

        let err = svc
            .register("ada", "other@example.com", "lovelace")
            .await
            .unwrap_err();
        assert_eq!(err.kind(), ErrorKind::AlreadyExists);

        let err = svc
            .register("grace", "ada@example.com", "lovelace")
            .await
            .unwrap_err();
        assert_eq!(err.kind(), ErrorKind::AlreadyExists);
    }

    #[tokio::test]
    async fn invalid_registration_never_reaches_the_store() {
        let (svc, store) = service();
        store.set_unavailable(true);
        let err = svc.register("ad", "ada@example.com", "lovelace").await.unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Validation);
    }

    #[tokio::test]
    async fn store_outage_is_internal() {
        let (svc, store) = service();
        store.set_unavailable(true);
        let err = svc.login("ada", "lovelace").await.unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Internal);
    }

    #[tokio::test]
    async fn current_user_missing_is_not_found() {
        let (svc, _) = service();
        let err = svc.current_user("nobody").await.unwrap_err();
        assert_eq!(err.kind(), ErrorKind::NotFound);
    }
}
