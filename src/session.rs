use serde::{Deserialize, Serialize};
use std::rc::Rc;
use std::time::Duration;
use thiserror::Error;
use tracing::{info, warn};

use crate::model::{new_id, Role, User};
use crate::storage::{self, StateStorage};

pub const SESSION_STORAGE_NAME: &str = "auth-storage";

#[derive(Debug, Error, PartialEq, Eq)]
pub enum AuthError {
    #[error("authentication failed: {0}")]
    Rejected(&'static str),
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SessionState {
    pub user: Option<User>,
    pub is_authenticated: bool,
}

/// Credential check behind login/register.
///
/// There is no backend; [`MockAuthenticator`] accepts anything non-empty.
pub trait Authenticator {
    fn verify(&self, email: &str, password: &str) -> Result<(), AuthError>;
}

pub struct MockAuthenticator {
    delay: Duration,
}

impl MockAuthenticator {
    pub fn new(delay: Duration) -> Self {
        Self { delay }
    }
}

impl Authenticator for MockAuthenticator {
    fn verify(&self, email: &str, password: &str) -> Result<(), AuthError> {
        if email.trim().is_empty() {
            return Err(AuthError::Rejected("email must not be empty"));
        }
        if password.trim().is_empty() {
            return Err(AuthError::Rejected("password must not be empty"));
        }
        // Simulated round trip.
        if !self.delay.is_zero() {
            std::thread::sleep(self.delay);
        }
        Ok(())
    }
}

/// Display name derived from an email address: the text before the first `@`.
pub fn name_from_email(email: &str) -> String {
    email.split('@').next().unwrap_or_default().to_string()
}

pub struct SessionStore {
    state: SessionState,
    storage: Rc<dyn StateStorage>,
    auth: Box<dyn Authenticator>,
}

impl SessionStore {
    /// Rehydrate from storage, falling back to an anonymous session.
    pub fn load(storage: Rc<dyn StateStorage>, auth: Box<dyn Authenticator>) -> Self {
        let state = match storage::load_state::<SessionState>(storage.as_ref(), SESSION_STORAGE_NAME) {
            Ok(Some(s)) => s,
            Ok(None) => SessionState::default(),
            Err(e) => {
                warn!(error = %format!("{e:#}"), "ignoring persisted session");
                SessionState::default()
            }
        };
        Self {
            state,
            storage,
            auth,
        }
    }

    pub fn current(&self) -> &SessionState {
        &self.state
    }

    pub fn login(&mut self, email: &str, password: &str, role: Role) -> Result<User, AuthError> {
        self.auth.verify(email, password)?;
        let user = User {
            id: new_id(),
            name: name_from_email(email),
            email: email.to_string(),
            role,
            avatar: None,
        };
        info!(user_id = %user.id, ?role, "login");
        self.replace(Some(user.clone()));
        Ok(user)
    }

    pub fn register(
        &mut self,
        name: &str,
        email: &str,
        password: &str,
        role: Role,
    ) -> Result<User, AuthError> {
        if name.trim().is_empty() {
            return Err(AuthError::Rejected("name must not be empty"));
        }
        self.auth.verify(email, password)?;
        let user = User {
            id: new_id(),
            name: name.to_string(),
            email: email.to_string(),
            role,
            avatar: None,
        };
        info!(user_id = %user.id, ?role, "register");
        self.replace(Some(user.clone()));
        Ok(user)
    }

    pub fn logout(&mut self) {
        info!("logout");
        self.replace(None);
    }

    fn replace(&mut self, user: Option<User>) {
        self.state = SessionState {
            is_authenticated: user.is_some(),
            user,
        };
        if let Err(e) = storage::save_state(self.storage.as_ref(), SESSION_STORAGE_NAME, &self.state) {
            warn!(error = %format!("{e:#}"), "failed to persist session");
        }
    }
}
