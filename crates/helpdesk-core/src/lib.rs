//! helpdesk-core library.
//!
//! Ticket store, user directory, and session manager over an injectable
//! key-value persistence port.
//!
//! # Conventions
//!
//! - **Errors**: `thiserror` enums ([`error::StorageError`], [`error::HelpdeskError`])
//!   inside the library; `anyhow::Result` at config and host boundaries.
//! - **Logging**: Use `tracing` macros (`info!`, `warn!`, `error!`, `debug!`, `trace!`).

pub mod app;
pub mod auth;
pub mod clock;
pub mod config;
pub mod error;
pub mod lock;
pub mod model;
pub mod storage;
pub mod suggest;
pub mod tickets;

pub use app::Helpdesk;
pub use auth::{AuthState, SessionManager};
pub use clock::{Clock, ManualClock, SystemClock};
pub use config::{HelpdeskConfig, IdStrategy};
pub use error::{ErrorCode, HelpdeskError, StorageError};
pub use storage::Persistence;
pub use tickets::TicketStore;
