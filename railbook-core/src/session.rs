use railbook_shared::Masked;
use std::sync::{PoisonError, RwLock};

use crate::identity::User;

#[derive(Debug, Default)]
struct SessionState {
    token: Option<Masked<String>>,
    user: Option<User>,
}

/// Signed-in user and bearer token for the current process.
///
/// Built once at the composition root and shared (behind an `Arc`) with
/// everything that needs it, such as the HTTP client.
#[derive(Debug, Default)]
pub struct SessionContext {
    state: RwLock<SessionState>,
}

impl SessionContext {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_token(token: impl Into<String>) -> Self {
        let session = Self::new();
        session.set_token(token);
        session
    }

    pub fn sign_in(&self, token: impl Into<String>, user: User) {
        let mut state = self.state.write().unwrap_or_else(PoisonError::into_inner);
        state.token = Some(Masked::new(token.into()));
        state.user = Some(user);
        tracing::debug!(token = ?state.token, "session signed in");
    }

    pub fn set_token(&self, token: impl Into<String>) {
        self.state.write().unwrap_or_else(PoisonError::into_inner).token =
            Some(Masked::new(token.into()));
    }

    pub fn sign_out(&self) {
        let mut state = self.state.write().unwrap_or_else(PoisonError::into_inner);
        state.token = None;
        state.user = None;
    }

    pub fn token(&self) -> Option<String> {
        self.state
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .token
            .as_ref()
            .map(|token| token.expose().clone())
    }

    pub fn user(&self) -> Option<User> {
        self.state.read().unwrap_or_else(PoisonError::into_inner).user.clone()
    }

    pub fn is_authenticated(&self) -> bool {
        self.state.read().unwrap_or_else(PoisonError::into_inner).token.is_some()
    }
}
