// src/registry/sweeper.rs — Periodic removal of expired sessions

use std::time::Duration;

use tokio::task::JoinHandle;

use crate::infra::config::RetentionConfig;
use crate::registry::SessionRegistry;

/// How long sessions live and how often they are swept.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SweepPolicy {
    pub retention: Duration,
    pub interval: Duration,
}

impl Default for SweepPolicy {
    fn default() -> Self {
        Self::from(&RetentionConfig::default())
    }
}

impl From<&RetentionConfig> for SweepPolicy {
    fn from(config: &RetentionConfig) -> Self {
        Self {
            retention: config.max_age(),
            interval: config.sweep_interval(),
        }
    }
}

/// Run one sweep against the wall clock.
pub fn sweep_once(registry: &SessionRegistry, policy: &SweepPolicy) -> usize {
    let removed = registry.sweep_expired(chrono::Utc::now(), policy.retention);
    if removed > 0 {
        tracing::info!("Cleaned up {} old sessions", removed);
    }
    removed
}

/// Spawn the background sweeper. Abort the handle to stop it.
pub fn spawn_sweeper(registry: SessionRegistry, policy: SweepPolicy) -> JoinHandle<()> {
    tokio::spawn(async move {
        let mut interval = tokio::time::interval(policy.interval);
        // Consume the immediate first tick
        interval.tick().await;

        tracing::debug!(
            "Sweeper running every {}s (retention {}s)",
            policy.interval.as_secs(),
            policy.retention.as_secs()
        );

        loop {
            interval.tick().await;
            sweep_once(&registry, &policy);
        }
    })
}
