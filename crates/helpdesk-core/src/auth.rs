//! User directory and the single active session.
//!
//! The directory lives in durable storage under `helpdesk_all_users`; the
//! signed-in user's password-free view lives in session storage under
//! `helpdesk_user`. Lookups are exact and case-sensitive on email.
//!
//! A session restored at [`SessionManager::initialize`] is trusted as stored:
//! credentials are not re-checked.

use std::sync::Arc;

use crate::clock::Clock;
use crate::error::{HelpdeskError, StorageError};
use serde_json::Value;

use crate::model::{Credential, NewUser, Role, SessionUser, User};
use crate::storage::{Collection, Persistence, SESSION_USER_KEY, Tier, USERS_KEY};

/// Password shared by the seeded demo accounts.
pub const DEMO_PASSWORD: &str = "password";

/// Lifecycle of the session manager within one process.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AuthState {
    Uninitialized,
    Loading,
    Authenticated(SessionUser),
    Anonymous,
}

/// Owns the user directory and the current session.
pub struct SessionManager {
    persistence: Persistence,
    clock: Arc<dyn Clock>,
    seed_demo_accounts: bool,
    state: AuthState,
}

impl std::fmt::Debug for SessionManager {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SessionManager")
            .field("persistence", &self.persistence)
            .field("seed_demo_accounts", &self.seed_demo_accounts)
            .field("state", &self.state)
            .finish_non_exhaustive()
    }
}

fn demo_accounts() -> Vec<User> {
    [
        (1, "Admin User", "admin@example.com", Role::Admin),
        (2, "Employee User", "agent@example.com", Role::Agent),
        (3, "Client User", "client@example.com", Role::Client),
    ]
    .into_iter()
    .map(|(id, name, email, role)| User {
        id,
        name: name.to_string(),
        email: email.to_string(),
        password: Some(Credential::from_plaintext(DEMO_PASSWORD)),
        role,
    })
    .collect()
}

impl SessionManager {
    #[must_use]
    pub fn new(persistence: Persistence, clock: Arc<dyn Clock>) -> Self {
        Self {
            persistence,
            clock,
            seed_demo_accounts: true,
            state: AuthState::Uninitialized,
        }
    }

    #[must_use]
    pub const fn with_demo_seeding(mut self, enabled: bool) -> Self {
        self.seed_demo_accounts = enabled;
        self
    }

    /// Seed demo accounts into an empty directory, then restore any stored
    /// session. Safe to call more than once.
    pub fn initialize(&mut self) -> Result<&AuthState, StorageError> {
        self.state = AuthState::Loading;

        if self.seed_demo_accounts {
            if let Err(err) = self.seed_if_empty() {
                self.state = AuthState::Anonymous;
                return Err(err);
            }
        }

        self.state = match self
            .persistence
            .load_value::<SessionUser>(Tier::Session, SESSION_USER_KEY)
        {
            Ok(Some(user)) => {
                tracing::debug!(user_id = user.id, "restored session");
                AuthState::Authenticated(user)
            }
            Ok(None) => AuthState::Anonymous,
            Err(err) => {
                tracing::warn!(error = %err, "failed to read session store");
                AuthState::Anonymous
            }
        };
        Ok(&self.state)
    }

    /// Returns `true` when accounts were written. Entries that do not decode
    /// still count as existing accounts.
    fn seed_if_empty(&self) -> Result<bool, StorageError> {
        let existing: Collection<User> = self.persistence.load_collection(USERS_KEY)?;
        if !existing.is_empty() {
            return Ok(false);
        }

        let seeded = Collection::new(demo_accounts());
        self.persistence.save_collection(USERS_KEY, &seeded)?;
        tracing::info!(count = seeded.records.len(), "seeded demo accounts");
        Ok(true)
    }

    #[must_use]
    pub const fn state(&self) -> &AuthState {
        &self.state
    }

    #[must_use]
    pub const fn is_loading(&self) -> bool {
        matches!(self.state, AuthState::Uninitialized | AuthState::Loading)
    }

    #[must_use]
    pub const fn current_user(&self) -> Option<&SessionUser> {
        match &self.state {
            AuthState::Authenticated(user) => Some(user),
            _ => None,
        }
    }

    /// The current user, or [`HelpdeskError::NotSignedIn`].
    pub fn require_user(&self) -> Result<&SessionUser, HelpdeskError> {
        self.current_user().ok_or(HelpdeskError::NotSignedIn)
    }

    /// Check credentials and start a session. `None` means no account matched
    /// both email and password; the two cases are not distinguished.
    pub fn sign_in(
        &mut self,
        email: &str,
        password: &str,
    ) -> Result<Option<SessionUser>, StorageError> {
        let users: Collection<User> = self.persistence.load_collection(USERS_KEY)?;
        let Some(found) = users
            .records
            .iter()
            .find(|u| u.email == email && u.verify_password(password))
        else {
            tracing::debug!("sign-in rejected");
            return Ok(None);
        };

        let view = found.to_session();
        self.start_session(view.clone())?;
        tracing::info!(user_id = view.id, role = %view.role, "signed in");
        Ok(Some(view))
    }

    /// Register an account and sign it in. `None` when the email is taken.
    pub fn sign_up(&mut self, new_user: NewUser) -> Result<Option<SessionUser>, StorageError> {
        let mut users: Collection<User> = self.persistence.load_collection(USERS_KEY)?;
        let taken = users.records.iter().any(|u| u.email == new_user.email)
            || users
                .retained_field("email")
                .any(|email| email.as_str() == Some(new_user.email.as_str()));
        if taken {
            tracing::debug!("sign-up rejected: email already registered");
            return Ok(None);
        }

        let id = self.next_user_id(&users);
        let user = User {
            id,
            name: new_user.name,
            email: new_user.email,
            password: Some(Credential::from_plaintext(&new_user.password)),
            role: new_user.role,
        };
        let view = user.to_session();
        users.records.push(user);
        self.persistence.save_collection(USERS_KEY, &users)?;

        self.start_session(view.clone())?;
        tracing::info!(user_id = view.id, role = %view.role, "signed up");
        Ok(Some(view))
    }

    /// End the session. The directory is untouched.
    pub fn sign_out(&mut self) -> Result<(), StorageError> {
        self.persistence.remove(Tier::Session, SESSION_USER_KEY)?;
        if let Some(user) = self.current_user() {
            tracing::info!(user_id = user.id, "signed out");
        }
        self.state = AuthState::Anonymous;
        Ok(())
    }

    /// Password-free views of every account, in registration order.
    pub fn users(&self) -> Result<Vec<SessionUser>, StorageError> {
        let users: Collection<User> = self.persistence.load_collection(USERS_KEY)?;
        Ok(users.records.iter().map(User::to_session).collect())
    }

    fn start_session(&mut self, view: SessionUser) -> Result<(), StorageError> {
        self.persistence
            .save_value(Tier::Session, SESSION_USER_KEY, &view)?;
        self.state = AuthState::Authenticated(view);
        Ok(())
    }

    /// Timestamp-derived id, bumped past any existing id it would collide with.
    fn next_user_id(&self, users: &Collection<User>) -> i64 {
        let now = self.clock.now_millis();
        let max_existing = users
            .records
            .iter()
            .map(|u| u.id)
            .chain(users.retained_field("id").filter_map(Value::as_i64))
            .max()
            .unwrap_or(0);
        if now > max_existing {
            now
        } else {
            max_existing.saturating_add(1)
        }
    }
}
