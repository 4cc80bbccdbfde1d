//! Account service
//!
//! Credential issuance and verification: registration and login.

use std::sync::Arc;

use crate::auth::{self, password};
use crate::config::AppConfig;
use crate::data::{Database, User};
use crate::error::AppError;

/// Account service
#[derive(Clone)]
pub struct AccountService {
    db: Arc<Database>,
    config: Arc<AppConfig>,
}

impl AccountService {
    /// Create new account service
    pub fn new(db: Arc<Database>, config: Arc<AppConfig>) -> Self {
        Self { db, config }
    }

    fn issue_token(&self, user_id: &str) -> Result<String, AppError> {
        auth::issue_token(
            user_id,
            &self.config.auth.token_secret,
            self.config.auth.token_ttl_days,
        )
    }

    /// Register a new account
    ///
    /// Hashes the password with a fresh salt, persists the user with
    /// default profile fields, and issues a token bound to the new id.
    ///
    /// The username uniqueness check and the insert are two separate store
    /// calls; two concurrent registrations of the same name can both pass
    /// the check. The original system has the same window.
    ///
    /// # Returns
    /// The username and a fresh bearer token
    pub async fn register(
        &self,
        username: &str,
        password: &str,
    ) -> Result<(String, String), AppError> {
        if username.is_empty() || password.is_empty() {
            return Err(AppError::Validation("All fields are required.".to_string()));
        }

        if self.db.get_user_by_username(username).await?.is_some() {
            return Err(AppError::Conflict("Username is already taken".to_string()));
        }

        let hashed = password::hash_password(password)?;
        let user = User::new(username.to_string(), hashed);
        self.db.insert_user(&user).await?;

        crate::metrics::USERS_TOTAL.inc();
        tracing::info!(username = %user.username, "Account registered");

        let token = self.issue_token(&user.id)?;
        Ok((user.username, token))
    }

    /// Log an existing account in
    ///
    /// Unknown username and wrong password both map to `Credentials`
    /// with the same status code; only the message text differs.
    ///
    /// # Returns
    /// The full user record and a fresh bearer token
    pub async fn login(&self, username: &str, password: &str) -> Result<(User, String), AppError> {
        if username.is_empty() || password.is_empty() {
            return Err(AppError::Validation("All fields are required.".to_string()));
        }

        let user = self
            .db
            .get_user_by_username(username)
            .await?
            .ok_or_else(|| AppError::Credentials("Incorrect username.".to_string()))?;

        if !password::verify_password(password, &user.password)? {
            return Err(AppError::Credentials("Incorrect password.".to_string()));
        }

        tracing::info!(username = %user.username, "Login succeeded");

        let token = self.issue_token(&user.id)?;
        Ok((user, token))
    }
}
