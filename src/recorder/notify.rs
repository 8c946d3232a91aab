// src/recorder/notify.rs — Outbound notification on recorded visits
//
// Delivery is fire-and-forget: `dispatch` spawns a tokio task and the
// caller never learns whether it succeeded. Failures are logged only.

use std::sync::Arc;

use async_trait::async_trait;
use serde::Serialize;

use crate::registry::{Visit, VisitReceipt};

/// Everything a notifier gets to know about one recorded visit.
#[derive(Debug, Clone, Serialize)]
pub struct VisitNotice {
    pub session_id: String,
    pub label: String,
    pub notify_target: String,
    pub message: String,
    pub visit_number: usize,
    pub visit: Visit,
}

impl VisitNotice {
    pub fn new(session_id: &str, receipt: VisitReceipt, visit: Visit) -> Self {
        Self {
            session_id: session_id.to_string(),
            label: receipt.label,
            notify_target: receipt.notify_target,
            message: receipt.message,
            visit_number: receipt.visit_count,
            visit,
        }
    }

    /// One-line human summary of the notice.
    pub fn summary(&self) -> String {
        let language = self
            .visit
            .accept_language
            .split(',')
            .next()
            .map(str::trim)
            .filter(|l| !l.is_empty())
            .unwrap_or("Unknown");
        format!(
            "Visit #{} on {} ({}) from {} [{}] via {}",
            self.visit_number,
            self.session_id,
            self.label,
            self.visit.geo.display_location(),
            language,
            truncate(&self.visit.referer, 100),
        )
    }
}

#[async_trait]
pub trait Notifier: Send + Sync {
    async fn notify(&self, notice: &VisitNotice) -> anyhow::Result<()>;
}

/// Writes each notice to the log. Never fails.
#[derive(Debug, Default, Clone)]
pub struct LogNotifier;

#[async_trait]
impl Notifier for LogNotifier {
    async fn notify(&self, notice: &VisitNotice) -> anyhow::Result<()> {
        tracing::info!("{}", notice.summary());
        Ok(())
    }
}

/// Deliver `notice` in the background.
pub fn dispatch(notifier: Arc<dyn Notifier>, notice: VisitNotice) {
    tokio::spawn(async move {
        match notifier.notify(&notice).await {
            Ok(()) => tracing::debug!(
                "Delivered notice for visit #{} on session {}",
                notice.visit_number,
                notice.session_id
            ),
            Err(e) => tracing::warn!(
                "Notification for session {} failed: {}",
                notice.session_id,
                e
            ),
        }
    });
}

/// Truncate a string on a char boundary.
fn truncate(s: &str, max_chars: usize) -> &str {
    match s.char_indices().nth(max_chars) {
        Some((idx, _)) => &s[..idx],
        None => s,
    }
}
