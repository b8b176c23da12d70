//! The ticket collection and its per-session scoped view.
//!
//! Durable storage always holds the full collection, sorted by ascending id.
//! The in-memory view is what the current session may see: a client sees
//! only tickets it requested, agents and admins see everything, and an
//! anonymous session sees nothing.
//!
//! Every mutation re-reads the full durable blob, applies the change, and
//! writes the whole blob back. There is no concurrency control beyond that:
//! the last writer wins. Entries that do not decode as tickets are written
//! back untouched in id order.

use std::sync::Arc;

use serde_json::Value;

use crate::clock::Clock;
use crate::config::IdStrategy;
use crate::error::StorageError;
use crate::model::{Comment, NewTicket, SessionUser, Status, Ticket, TicketPatch};
use crate::storage::{Collection, Persistence, TICKET_HIGH_WATER_KEY, TICKETS_KEY, Tier};

pub struct TicketStore {
    persistence: Persistence,
    clock: Arc<dyn Clock>,
    id_strategy: IdStrategy,
    scope: Option<SessionUser>,
    view: Vec<Ticket>,
    loading: bool,
}

impl std::fmt::Debug for TicketStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TicketStore")
            .field("id_strategy", &self.id_strategy)
            .field("scope", &self.scope.as_ref().map(|u| u.id))
            .field("view_len", &self.view.len())
            .field("loading", &self.loading)
            .finish_non_exhaustive()
    }
}

impl TicketStore {
    /// A store that reports `loading` until the first [`TicketStore::load`].
    #[must_use]
    pub fn new(persistence: Persistence, clock: Arc<dyn Clock>) -> Self {
        Self {
            persistence,
            clock,
            id_strategy: IdStrategy::default(),
            scope: None,
            view: Vec::new(),
            loading: true,
        }
    }

    #[must_use]
    pub const fn with_id_strategy(mut self, strategy: IdStrategy) -> Self {
        self.id_strategy = strategy;
        self
    }

    /// Re-read durable storage and rebuild the view for `user`.
    ///
    /// Call on every session change. A backend error leaves an empty view.
    pub fn load(&mut self, user: Option<&SessionUser>) -> Result<&[Ticket], StorageError> {
        self.loading = true;
        self.scope = user.cloned();
        self.view.clear();

        let all = self.read_all();
        self.loading = false;

        let all = all?;
        self.view = all.records.into_iter().filter(|t| self.in_scope(t)).collect();
        tracing::debug!(
            user_id = self.scope.as_ref().map(|u| u.id),
            visible = self.view.len(),
            "loaded ticket view"
        );
        Ok(&self.view)
    }

    /// Reload with the current scope.
    pub fn reload(&mut self) -> Result<&[Ticket], StorageError> {
        let scope = self.scope.clone();
        self.load(scope.as_ref())
    }

    /// The scoped snapshot.
    #[must_use]
    pub fn tickets(&self) -> &[Ticket] {
        &self.view
    }

    #[must_use]
    pub const fn is_loading(&self) -> bool {
        self.loading
    }

    #[must_use]
    pub const fn scope(&self) -> Option<&SessionUser> {
        self.scope.as_ref()
    }

    /// Look a ticket up in the scoped view only.
    #[must_use]
    pub fn get_ticket_by_id(&self, id: u64) -> Option<&Ticket> {
        self.view.iter().find(|t| t.id == id)
    }

    fn in_scope(&self, ticket: &Ticket) -> bool {
        match &self.scope {
            Some(user) if user.role.sees_all_tickets() => true,
            Some(user) => ticket.requester_id == user.id,
            None => false,
        }
    }

    fn read_all(&self) -> Result<Collection<Ticket>, StorageError> {
        self.persistence.load_collection(TICKETS_KEY)
    }

    fn write_all(&self, all: &Collection<Ticket>) -> Result<(), StorageError> {
        let mut entries = all.to_entries(TICKETS_KEY)?;
        entries.sort_by_key(entry_order);
        self.persistence.save_entries(TICKETS_KEY, entries)
    }

    fn next_id(&self, all: &Collection<Ticket>) -> Result<u64, StorageError> {
        let max_live = all
            .records
            .iter()
            .map(|t| t.id)
            .chain(all.retained_field("id").filter_map(Value::as_u64))
            .max()
            .unwrap_or(0);
        let floor = match self.id_strategy {
            IdStrategy::MaxPlusOne => max_live,
            IdStrategy::Monotonic => {
                let high_water: u64 = self
                    .persistence
                    .load_value(Tier::Durable, TICKET_HIGH_WATER_KEY)?
                    .unwrap_or(0);
                high_water.max(max_live)
            }
        };
        Ok(floor.saturating_add(1))
    }

    /// File a new ticket. Status starts `open` with no comments.
    pub fn create(&mut self, data: NewTicket) -> Result<Ticket, StorageError> {
        let mut all = self.read_all()?;
        let id = self.next_id(&all)?;
        let now = self.clock.now();

        let ticket = Ticket {
            id,
            title: data.title,
            description: data.description,
            department: data.department,
            priority: data.priority,
            status: Status::Open,
            requester_id: data.requester_id,
            requester_name: data.requester_name,
            requester_email: data.requester_email,
            created_at: now,
            updated_at: now,
            comments: Vec::new(),
        };

        if self.id_strategy == IdStrategy::Monotonic {
            self.persistence
                .save_value(Tier::Durable, TICKET_HIGH_WATER_KEY, &id)?;
        }
        all.records.push(ticket.clone());
        self.write_all(&all)?;

        if self.in_scope(&ticket) {
            self.view.push(ticket.clone());
        }
        tracing::info!(
            ticket_id = id,
            requester_id = ticket.requester_id,
            department = %ticket.department,
            "created ticket"
        );
        Ok(ticket)
    }

    /// Merge `patch` into ticket `id`. `None` when no such ticket exists.
    pub fn update(&mut self, id: u64, patch: &TicketPatch) -> Result<Option<Ticket>, StorageError> {
        let mut all = self.read_all()?;
        let Some(ticket) = all.records.iter_mut().find(|t| t.id == id) else {
            tracing::debug!(ticket_id = id, "update skipped: ticket not found");
            return Ok(None);
        };

        patch.apply_to(ticket);
        ticket.updated_at = self.clock.now().max(ticket.updated_at);
        let updated = ticket.clone();

        self.write_all(&all)?;
        self.replace_in_view(&updated);
        tracing::debug!(ticket_id = id, status = %updated.status, "updated ticket");
        Ok(Some(updated))
    }

    /// Hard-delete ticket `id`, including an undecodable entry carrying that
    /// id. Deleting an absent id is a no-op.
    pub fn delete(&mut self, id: u64) -> Result<(), StorageError> {
        let mut all = self.read_all()?;
        let before = all.records.len() + all.retained.len();
        all.records.retain(|t| t.id != id);
        all.retained
            .retain(|entry| entry.get("id").and_then(Value::as_u64) != Some(id));
        self.view.retain(|t| t.id != id);

        if all.records.len() + all.retained.len() == before {
            tracing::debug!(ticket_id = id, "delete skipped: ticket not found");
            return Ok(());
        }

        self.write_all(&all)?;
        tracing::info!(ticket_id = id, "deleted ticket");
        Ok(())
    }

    /// Append a comment to ticket `ticket_id`. `None` when no such ticket exists.
    pub fn add_comment(
        &mut self,
        ticket_id: u64,
        text: &str,
        author: &str,
    ) -> Result<Option<Comment>, StorageError> {
        let mut all = self.read_all()?;
        let Some(ticket) = all.records.iter_mut().find(|t| t.id == ticket_id) else {
            tracing::debug!(ticket_id, "comment skipped: ticket not found");
            return Ok(None);
        };

        let now = self.clock.now();
        let after_last = ticket
            .comments
            .last()
            .map_or(i64::MIN, |c| c.id.saturating_add(1));
        let comment = Comment {
            id: now.timestamp_millis().max(after_last),
            text: text.to_string(),
            author: author.to_string(),
            timestamp: now,
        };

        ticket.comments.push(comment.clone());
        ticket.updated_at = now.max(ticket.updated_at);
        let updated = ticket.clone();

        self.write_all(&all)?;
        self.replace_in_view(&updated);
        tracing::debug!(ticket_id, comment_id = comment.id, "added comment");
        Ok(Some(comment))
    }

    fn replace_in_view(&mut self, updated: &Ticket) {
        if let Some(slot) = self.view.iter_mut().find(|t| t.id == updated.id) {
            slot.clone_from(updated);
        }
    }
}

/// Ascending numeric id; entries without one sort last.
fn entry_order(entry: &Value) -> (bool, u64) {
    entry
        .get("id")
        .and_then(Value::as_u64)
        .map_or((true, 0), |id| (false, id))
}
