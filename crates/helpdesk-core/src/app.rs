//! Wiring between the session manager and the ticket store.
//!
//! The session initializes first; every session change reloads the ticket
//! view with the new scope.

use std::path::Path;
use std::sync::Arc;

use anyhow::Context;

use crate::auth::SessionManager;
use crate::clock::{Clock, SystemClock};
use crate::config::{HelpdeskConfig, load_config, open_persistence};
use crate::error::StorageError;
use crate::model::{NewUser, SessionUser};
use crate::storage::Persistence;
use crate::tickets::TicketStore;

#[derive(Debug)]
pub struct Helpdesk {
    config: HelpdeskConfig,
    sessions: SessionManager,
    tickets: TicketStore,
}

impl Helpdesk {
    #[must_use]
    pub fn new(persistence: Persistence, clock: Arc<dyn Clock>, config: HelpdeskConfig) -> Self {
        let sessions = SessionManager::new(persistence.clone(), Arc::clone(&clock))
            .with_demo_seeding(config.directory.seed_demo_accounts);
        let tickets =
            TicketStore::new(persistence, clock).with_id_strategy(config.tickets.id_strategy);
        Self {
            config,
            sessions,
            tickets,
        }
    }

    /// Open the configured stores under `data_dir` and initialize.
    pub fn open(data_dir: &Path) -> anyhow::Result<Self> {
        Self::open_with(load_config(data_dir)?, data_dir)
    }

    /// Like [`Helpdesk::open`] with an already loaded config.
    pub fn open_with(config: HelpdeskConfig, data_dir: &Path) -> anyhow::Result<Self> {
        let persistence = open_persistence(&config, data_dir)?;
        let mut helpdesk = Self::new(persistence, Arc::new(SystemClock), config);
        helpdesk
            .initialize()
            .with_context(|| format!("Failed to initialize {}", data_dir.display()))?;
        Ok(helpdesk)
    }

    /// Initialize the session (seeding if needed) and load the scoped view.
    pub fn initialize(&mut self) -> Result<(), StorageError> {
        self.sessions.initialize()?;
        self.reload_tickets()
    }

    pub fn sign_in(
        &mut self,
        email: &str,
        password: &str,
    ) -> Result<Option<SessionUser>, StorageError> {
        let user = self.sessions.sign_in(email, password)?;
        if user.is_some() {
            self.reload_tickets()?;
        }
        Ok(user)
    }

    pub fn sign_up(&mut self, new_user: NewUser) -> Result<Option<SessionUser>, StorageError> {
        let user = self.sessions.sign_up(new_user)?;
        if user.is_some() {
            self.reload_tickets()?;
        }
        Ok(user)
    }

    pub fn sign_out(&mut self) -> Result<(), StorageError> {
        self.sessions.sign_out()?;
        self.reload_tickets()
    }

    fn reload_tickets(&mut self) -> Result<(), StorageError> {
        self.tickets.load(self.sessions.current_user())?;
        Ok(())
    }

    #[must_use]
    pub const fn config(&self) -> &HelpdeskConfig {
        &self.config
    }

    #[must_use]
    pub const fn sessions(&self) -> &SessionManager {
        &self.sessions
    }

    #[must_use]
    pub const fn tickets(&self) -> &TicketStore {
        &self.tickets
    }

    pub const fn tickets_mut(&mut self) -> &mut TicketStore {
        &mut self.tickets
    }

    #[must_use]
    pub fn current_user(&self) -> Option<&SessionUser> {
        self.sessions.current_user()
    }
}

#[cfg(test)]
mod tests {
    use super::Helpdesk;
    use crate::auth::DEMO_PASSWORD;
    use crate::clock::ManualClock;
    use crate::config::HelpdeskConfig;
    use crate::model::{NewTicket, Priority};
    use crate::storage::Persistence;
    use std::sync::Arc;

    fn helpdesk(persistence: &Persistence) -> Helpdesk {
        let mut hd = Helpdesk::new(
            persistence.clone(),
            Arc::new(ManualClock::default()),
            HelpdeskConfig::default(),
        );
        hd.initialize().unwrap();
        hd
    }

    #[test]
    fn session_changes_rescope_the_ticket_view() {
        let persistence = Persistence::in_memory();
        let mut hd = helpdesk(&persistence);
        assert!(!hd.tickets().is_loading());

        let client = hd
            .sign_in("client@example.com", DEMO_PASSWORD)
            .unwrap()
            .unwrap();
        hd.tickets_mut()
            .create(NewTicket::filed_by(
                &client,
                "Need a monitor",
                "Second screen please",
                "Facilities",
                Priority::Low,
            ))
            .unwrap();

        hd.sign_in("agent@example.com", DEMO_PASSWORD).unwrap();
        assert_eq!(hd.tickets().tickets().len(), 1);

        hd.sign_out().unwrap();
        assert!(hd.tickets().tickets().is_empty());
    }

    #[test]
    fn restored_session_loads_scoped_view_on_initialize() {
        let persistence = Persistence::in_memory();
        {
            let mut hd = helpdesk(&persistence);
            let admin = hd
                .sign_in("admin@example.com", DEMO_PASSWORD)
                .unwrap()
                .unwrap();
            hd.tickets_mut()
                .create(NewTicket::filed_by(
                    &admin,
                    "Rotate keys",
                    "Quarterly",
                    "IT Support",
                    Priority::High,
                ))
                .unwrap();
        }

        let hd = helpdesk(&persistence);
        assert_eq!(hd.current_user().map(|u| u.email.as_str()), Some("admin@example.com"));
        assert_eq!(hd.tickets().tickets().len(), 1);
    }

    #[test]
    fn open_creates_file_stores_under_data_dir() {
        let dir = tempfile::tempdir().unwrap();
        let hd = Helpdesk::open(dir.path()).unwrap();
        assert!(hd.current_user().is_none());
        assert!(dir.path().join("store/helpdesk_all_users.json").exists());
    }
}
