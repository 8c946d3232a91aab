// src/registry/mod.rs — In-memory session registry
//
// One coarse mutex guards the whole map. Every operation is a short,
// non-blocking map/vec operation, so no lock is ever held across I/O.

pub mod sweeper;
pub mod types;

use std::collections::HashMap;
use std::sync::{Arc, Mutex, MutexGuard};
use std::time::Duration;

use chrono::{DateTime, TimeDelta, Utc};
use serde_json::{Map, Value};

use crate::infra::errors::RegistryError;
use types::Session;
pub use types::{
    GeoResult, NewSession, SessionSnapshot, SessionSummary, Visit, VisitReceipt, UNKNOWN,
};

struct Entry {
    /// Position of the first registration; kept across overwrites.
    seq: u64,
    session: Session,
}

#[derive(Default)]
struct Inner {
    sessions: HashMap<String, Entry>,
    next_seq: u64,
}

/// Shared handle to the registry. Clones see the same sessions.
#[derive(Clone, Default)]
pub struct SessionRegistry {
    inner: Arc<Mutex<Inner>>,
}

impl SessionRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    fn lock(&self) -> MutexGuard<'_, Inner> {
        // Every mutation completes before anything can panic, so a
        // poisoned map is still consistent.
        self.inner.lock().unwrap_or_else(|e| e.into_inner())
    }

    /// Create or replace the session `session_id`. Replacing resets visits.
    pub fn register(&self, session_id: &str, fields: NewSession) {
        self.register_at(session_id, fields, Utc::now());
    }

    pub(crate) fn register_at(&self, session_id: &str, fields: NewSession, created_at: DateTime<Utc>) {
        let label = fields.label.clone();
        let mut inner = self.lock();
        let session = Session::new(fields, created_at);
        let replaced = match inner.sessions.get_mut(session_id) {
            Some(entry) => {
                entry.session = session;
                true
            }
            None => {
                let seq = inner.next_seq;
                inner.next_seq += 1;
                inner
                    .sessions
                    .insert(session_id.to_string(), Entry { seq, session });
                false
            }
        };
        drop(inner);

        if replaced {
            tracing::info!("Re-registered session {} for {}", session_id, label);
        } else {
            tracing::info!("Registered session {} for {}", session_id, label);
        }
    }

    /// Append a visit and return the new visit count.
    pub fn record_visit(&self, session_id: &str, visit: Visit) -> Result<usize, RegistryError> {
        self.append_visit(session_id, visit).map(|r| r.visit_count)
    }

    /// Append a visit and return the count together with session context.
    pub fn append_visit(
        &self,
        session_id: &str,
        visit: Visit,
    ) -> Result<VisitReceipt, RegistryError> {
        let mut inner = self.lock();
        let entry = inner
            .sessions
            .get_mut(session_id)
            .ok_or_else(|| RegistryError::not_found(session_id))?;
        let session = &mut entry.session;
        let visit_count = session.push_visit(visit);
        tracing::debug!("Recorded visit #{} for session {}", visit_count, session_id);
        Ok(VisitReceipt {
            visit_count,
            label: session.label.clone(),
            notify_target: session.notify_target.clone(),
            message: session.message.clone(),
        })
    }

    /// Attach `extra` to the most recent visit, replacing earlier enrichment.
    pub fn enrich_last_visit(
        &self,
        session_id: &str,
        extra: Map<String, Value>,
    ) -> Result<(), RegistryError> {
        let mut inner = self.lock();
        let entry = inner
            .sessions
            .get_mut(session_id)
            .ok_or_else(|| RegistryError::not_found(session_id))?;
        let last = entry
            .session
            .last_visit_mut()
            .ok_or_else(|| RegistryError::empty(session_id))?;
        last.enrichment = Some(extra);
        Ok(())
    }

    pub fn get(&self, session_id: &str) -> Result<SessionSnapshot, RegistryError> {
        self.lock()
            .sessions
            .get(session_id)
            .map(|entry| entry.session.snapshot(session_id))
            .ok_or_else(|| RegistryError::not_found(session_id))
    }

    pub fn contains(&self, session_id: &str) -> bool {
        self.lock().sessions.contains_key(session_id)
    }

    /// Summaries in first-registration order.
    pub fn list(&self) -> Vec<SessionSummary> {
        let inner = self.lock();
        let mut entries: Vec<(&String, &Entry)> = inner.sessions.iter().collect();
        entries.sort_by_key(|(_, entry)| entry.seq);
        entries
            .into_iter()
            .map(|(id, entry)| entry.session.summary(id))
            .collect()
    }

    pub fn size(&self) -> usize {
        self.lock().sessions.len()
    }

    /// Remove every session whose age at `now` exceeds `retention`.
    /// Returns the number removed.
    pub fn sweep_expired(&self, now: DateTime<Utc>, retention: Duration) -> usize {
        let retention = TimeDelta::from_std(retention).unwrap_or(TimeDelta::MAX);
        let mut inner = self.lock();
        let before = inner.sessions.len();
        inner
            .sessions
            .retain(|_, entry| now.signed_duration_since(entry.session.created_at) <= retention);
        before - inner.sessions.len()
    }
}
