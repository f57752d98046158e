use std::sync::Arc;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::model::User;
use crate::storage::local_store::{LocalStore, StoreError, keys};

#[derive(Debug, Error)]
pub enum AuthError {
    #[error("Session storage error: {0}")]
    Store(#[from] StoreError),
    #[error("Not signed in")]
    NotSignedIn,
    #[error("Token has expired")]
    TokenExpired,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct TokenInfo {
    pub access_token: String,
    pub expires_at: Option<DateTime<Utc>>,
}

impl TokenInfo {
    pub fn new(access_token: String) -> Self {
        Self {
            access_token,
            expires_at: None,
        }
    }

    pub fn expiring_in(mut self, seconds: i64) -> Self {
        self.expires_at = Some(Utc::now() + chrono::Duration::seconds(seconds));
        self
    }

    /// Tokens without an expiry are valid until the server says otherwise.
    pub fn is_valid(&self) -> bool {
        self.expires_at.is_none_or(|at| at > Utc::now())
    }
}

/// Signed-in token and user profile, persisted in the local store.
pub struct Session {
    store: Arc<LocalStore>,
}

impl Session {
    pub fn new(store: Arc<LocalStore>) -> Self {
        Self { store }
    }

    pub fn sign_in(&self, token: &TokenInfo, user: &User) -> Result<(), AuthError> {
        self.store.set(keys::TOKEN, token)?;
        self.store.set(keys::USER, user)?;
        tracing::info!("Signed in as {} ({})", user.email, user.role);
        Ok(())
    }

    pub fn sign_out(&self) -> Result<(), AuthError> {
        self.store.remove(keys::TOKEN)?;
        self.store.remove(keys::USER)?;
        tracing::info!("Signed out");
        Ok(())
    }

    pub fn token(&self) -> Result<Option<TokenInfo>, AuthError> {
        Ok(self.store.get(keys::TOKEN)?)
    }

    pub fn current_user(&self) -> Result<Option<User>, AuthError> {
        Ok(self.store.get(keys::USER)?)
    }

    pub fn valid_token(&self) -> Result<TokenInfo, AuthError> {
        match self.token()? {
            Some(token) if token.is_valid() => Ok(token),
            Some(_) => Err(AuthError::TokenExpired),
            None => Err(AuthError::NotSignedIn),
        }
    }
}
