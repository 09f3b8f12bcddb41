//! In-flight translation registry
//!
//! Guarantees at most one external translation call per key at any time.
//! The first caller for a key becomes the leader and receives a
//! [`LeaderToken`]; concurrent callers for the same key become waiters and
//! receive a broadcast receiver that resolves to the leader's outcome,
//! success or failure alike.

use std::collections::HashMap;
use std::sync::{Arc, Mutex};

use tokio::sync::broadcast;
use tracing::debug;

use crate::domain::translation::{TranslationKey, TranslationResult};
use crate::domain::DomainError;

type Outcome = Result<TranslationResult, DomainError>;

#[derive(Debug, Default)]
pub struct InFlightRegistry {
    pending: Mutex<HashMap<TranslationKey, broadcast::Sender<Outcome>>>,
}

/// Result of joining the registry for a key
#[derive(Debug)]
pub enum JoinOutcome {
    /// This caller must perform the translation and call [`LeaderToken::complete`]
    Leader(LeaderToken),
    /// Another caller is already translating this key; await the receiver
    Waiter(broadcast::Receiver<Outcome>),
}

impl InFlightRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn join(self: &Arc<Self>, key: &TranslationKey) -> JoinOutcome {
        let mut pending = self.pending.lock().unwrap();

        if let Some(sender) = pending.get(key) {
            return JoinOutcome::Waiter(sender.subscribe());
        }

        // Capacity 1: exactly one message is ever sent per entry
        let (sender, _) = broadcast::channel(1);
        pending.insert(key.clone(), sender);

        JoinOutcome::Leader(LeaderToken {
            registry: Arc::clone(self),
            key: key.clone(),
            completed: false,
        })
    }

    pub fn pending_count(&self) -> usize {
        self.pending.lock().unwrap().len()
    }

    /// Removes the entry first, then fans out, so a request arriving after
    /// a failure starts a fresh attempt instead of receiving the stale error
    fn finish(&self, key: &TranslationKey, outcome: Outcome) -> usize {
        let sender = self.pending.lock().unwrap().remove(key);

        sender
            .map(|sender| sender.send(outcome).unwrap_or(0))
            .unwrap_or(0)
    }
}

/// Proof of leadership for one in-flight key.
///
/// Dropping the token without completing it fans an `Internal` error out to
/// any waiters, so an abandoned leader can never strand them.
#[derive(Debug)]
pub struct LeaderToken {
    registry: Arc<InFlightRegistry>,
    key: TranslationKey,
    completed: bool,
}

impl LeaderToken {
    /// Publishes the outcome to all waiters, returning how many there were
    pub fn complete(mut self, outcome: Outcome) -> usize {
        self.completed = true;
        self.registry.finish(&self.key, outcome)
    }
}

impl Drop for LeaderToken {
    fn drop(&mut self) {
        if !self.completed {
            debug!(key = %self.key, "In-flight leader dropped without completing");
            self.registry.finish(
                &self.key,
                Err(DomainError::internal("in-flight translation abandoned")),
            );
        }
    }
}
