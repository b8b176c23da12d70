//! Department suggestion port.
//!
//! Suggestions are advisory. A slow or failing suggester never blocks ticket
//! creation: [`suggest_with_timeout`] gives up after the deadline and the
//! caller falls back to manual selection. There is no retry.

use std::sync::{Arc, mpsc};
use std::thread;
use std::time::Duration;

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Suggestion {
    pub department: String,
    pub justification: String,
}

pub trait DepartmentSuggester: Send + Sync {
    fn suggest(&self, description: &str) -> anyhow::Result<Suggestion>;
}

/// Always suggests `IT Support`, whatever the description says.
#[derive(Debug, Clone, Copy, Default)]
pub struct StaticSuggester;

impl DepartmentSuggester for StaticSuggester {
    fn suggest(&self, _description: &str) -> anyhow::Result<Suggestion> {
        Ok(Suggestion {
            department: "IT Support".to_string(),
            justification: "Based on the description, IT Support is the most relevant department."
                .to_string(),
        })
    }
}

/// Run `suggester` on a worker thread and wait at most `timeout`.
///
/// Returns `None` on error or timeout. A timed-out worker is left to finish
/// on its own; its result is discarded.
pub fn suggest_with_timeout(
    suggester: Arc<dyn DepartmentSuggester>,
    description: &str,
    timeout: Duration,
) -> Option<Suggestion> {
    let (tx, rx) = mpsc::channel();
    let description = description.to_string();
    let spawned = thread::Builder::new()
        .name("department-suggest".to_string())
        .spawn(move || {
            let _ = tx.send(suggester.suggest(&description));
        });

    if let Err(err) = spawned {
        tracing::warn!(error = %err, "could not start suggestion worker");
        return None;
    }

    match rx.recv_timeout(timeout) {
        Ok(Ok(suggestion)) => Some(suggestion),
        Ok(Err(err)) => {
            tracing::warn!(error = %err, "department suggestion failed");
            None
        }
        Err(mpsc::RecvTimeoutError::Timeout) => {
            tracing::warn!(?timeout, "department suggestion timed out");
            None
        }
        Err(mpsc::RecvTimeoutError::Disconnected) => {
            tracing::warn!("department suggestion worker exited without a result");
            None
        }
    }
}

#[cfg(test)]
mod tests {
    use super::{DepartmentSuggester, StaticSuggester, Suggestion, suggest_with_timeout};
    use std::sync::Arc;
    use std::time::Duration;

    struct Slow(Duration);

    impl DepartmentSuggester for Slow {
        fn suggest(&self, _description: &str) -> anyhow::Result<Suggestion> {
            std::thread::sleep(self.0);
            StaticSuggester.suggest("")
        }
    }

    struct Failing;

    impl DepartmentSuggester for Failing {
        fn suggest(&self, _description: &str) -> anyhow::Result<Suggestion> {
            anyhow::bail!("model offline")
        }
    }

    struct Panicking;

    impl DepartmentSuggester for Panicking {
        fn suggest(&self, _description: &str) -> anyhow::Result<Suggestion> {
            panic!("suggester blew up")
        }
    }

    #[test]
    fn static_suggester_ignores_input() {
        let a = StaticSuggester.suggest("payroll is wrong").unwrap();
        let b = StaticSuggester.suggest("").unwrap();
        assert_eq!(a, b);
        assert_eq!(a.department, "IT Support");
    }

    #[test]
    fn fast_suggester_returns_within_deadline() {
        let got = suggest_with_timeout(
            Arc::new(StaticSuggester),
            "printer on fire",
            Duration::from_secs(5),
        );
        assert_eq!(got.map(|s| s.department).as_deref(), Some("IT Support"));
    }

    #[test]
    fn slow_suggester_falls_back() {
        let got = suggest_with_timeout(
            Arc::new(Slow(Duration::from_millis(500))),
            "anything",
            Duration::from_millis(20),
        );
        assert!(got.is_none());
    }

    #[test]
    fn failing_suggester_falls_back() {
        assert!(suggest_with_timeout(Arc::new(Failing), "x", Duration::from_secs(1)).is_none());
    }

    #[test]
    fn panicking_suggester_falls_back() {
        assert!(
            suggest_with_timeout(Arc::new(Panicking), "x", Duration::from_secs(1)).is_none()
        );
    }
}
