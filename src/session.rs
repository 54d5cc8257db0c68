//! Authentication state
//!
//! The session owns the bearer token and mirrors it into an injected
//! session-scoped store so a restart restores it without signing in again.

use crate::client::Authenticator;
use crate::error::{AppError, ValidationError};
use crate::storage::{KeyValueStore, TOKEN_KEY};

/// Which screen the current authentication state routes to
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Screen {
    Login,
    Dashboard,
}

/// Reject blank input before any signin request; returns the trimmed identity
pub fn validate_credentials<'a>(identity: &'a str, password: &str) -> Result<&'a str, ValidationError> {
    let identity = identity.trim();
    if identity.is_empty() {
        return Err(ValidationError::MissingField("identity".to_string()));
    }
    if password.is_empty() {
        return Err(ValidationError::MissingField("password".to_string()));
    }
    Ok(identity)
}

pub struct Session<S: KeyValueStore> {
    store: S,
    token: Option<String>,
}

impl<S: KeyValueStore> Session<S> {
    /// Read the initial token from the store
    ///
    /// An unreadable store starts the session signed out instead of failing.
    pub fn restore(store: S) -> Self {
        let token = match store.get(TOKEN_KEY) {
            Ok(token) => token.filter(|t| !t.trim().is_empty()),
            Err(e) => {
                tracing::warn!(error = %e, "Could not read stored session, starting signed out");
                None
            }
        };
        if token.is_some() {
            tracing::info!("Restored session from storage");
        }
        Session { store, token }
    }

    pub fn token(&self) -> Option<&str> {
        self.token.as_deref()
    }

    pub fn is_authenticated(&self) -> bool {
        self.token.is_some()
    }

    pub fn screen(&self) -> Screen {
        if self.is_authenticated() {
            Screen::Dashboard
        } else {
            Screen::Login
        }
    }

    /// Sign in and persist the returned token
    pub async fn login<A>(
        &mut self,
        authenticator: &A,
        identity: &str,
        password: &str,
    ) -> Result<(), AppError>
    where
        A: Authenticator + ?Sized,
    {
        let identity = validate_credentials(identity, password)?;
        let token = authenticator.signin(identity, password).await?;
        self.adopt_token(identity, token)
    }

    /// Persist a token obtained by a signin that ran elsewhere
    pub fn adopt_token(&mut self, identity: &str, token: String) -> Result<(), AppError> {
        self.store.set(TOKEN_KEY, &token)?;
        self.token = Some(token);
        tracing::info!(identity = %identity.trim(), "Signed in");
        Ok(())
    }

    /// Clear the token from memory and storage
    ///
    /// Memory is cleared even when the store cannot be updated.
    pub fn logout(&mut self) -> Result<(), AppError> {
        self.token = None;
        self.store.remove(TOKEN_KEY)?;
        tracing::info!("Signed out");
        Ok(())
    }
}
