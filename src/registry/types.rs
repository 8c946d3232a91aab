// src/registry/types.rs

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// Placeholder for every geo field that could not be resolved.
pub const UNKNOWN: &str = "Unknown";

/// Result of resolving an IP address to a rough location.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GeoResult {
    pub city: String,
    pub region: String,
    pub country: String,
    pub latitude: Option<f64>,
    pub longitude: Option<f64>,
    pub organization: String,
    pub timezone: String,
}

impl GeoResult {
    /// The sentinel used whenever resolution fails.
    pub fn unknown() -> Self {
        Self {
            city: UNKNOWN.into(),
            region: UNKNOWN.into(),
            country: UNKNOWN.into(),
            latitude: None,
            longitude: None,
            organization: UNKNOWN.into(),
            timezone: UNKNOWN.into(),
        }
    }

    pub fn is_unknown(&self) -> bool {
        *self == Self::unknown()
    }

    /// "City, Region, Country", or "Unknown" for the sentinel.
    pub fn display_location(&self) -> String {
        if self.is_unknown() {
            UNKNOWN.to_string()
        } else {
            format!("{}, {}, {}", self.city, self.region, self.country)
        }
    }
}

impl Default for GeoResult {
    fn default() -> Self {
        Self::unknown()
    }
}

/// One recorded visit. Immutable apart from a single late enrichment.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Visit {
    pub ip: String,
    pub user_agent: String,
    pub referer: String,
    pub accept_language: String,
    pub geo: GeoResult,
    pub timestamp: DateTime<Utc>,
    /// Client-supplied extra metadata, attached after the fact.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub enrichment: Option<Map<String, Value>>,
}

impl Visit {
    pub fn new(
        ip: impl Into<String>,
        user_agent: impl Into<String>,
        referer: impl Into<String>,
        accept_language: impl Into<String>,
        geo: GeoResult,
    ) -> Self {
        Self {
            ip: ip.into(),
            user_agent: user_agent.into(),
            referer: referer.into(),
            accept_language: accept_language.into(),
            geo,
            timestamp: Utc::now(),
            enrichment: None,
        }
    }
}

/// Caller-supplied fields for a registration. Missing fields default to empty.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct NewSession {
    pub label: String,
    pub notify_target: String,
    pub message: String,
    pub metadata: Map<String, Value>,
}

/// Registry-owned session state.
#[derive(Debug, Clone)]
pub(crate) struct Session {
    pub label: String,
    pub notify_target: String,
    pub message: String,
    pub metadata: Map<String, Value>,
    pub created_at: DateTime<Utc>,
    visits: Vec<Visit>,
}

impl Session {
    pub fn new(fields: NewSession, created_at: DateTime<Utc>) -> Self {
        Self {
            label: fields.label,
            notify_target: fields.notify_target,
            message: fields.message,
            metadata: fields.metadata,
            created_at,
            visits: Vec::new(),
        }
    }

    /// The counter is the sequence length, so the two cannot drift apart.
    pub fn visit_count(&self) -> usize {
        self.visits.len()
    }

    pub fn push_visit(&mut self, visit: Visit) -> usize {
        self.visits.push(visit);
        self.visits.len()
    }

    pub fn last_visit_mut(&mut self) -> Option<&mut Visit> {
        self.visits.last_mut()
    }

    pub fn snapshot(&self, session_id: &str) -> SessionSnapshot {
        SessionSnapshot {
            session_id: session_id.to_string(),
            label: self.label.clone(),
            notify_target: self.notify_target.clone(),
            message: self.message.clone(),
            metadata: self.metadata.clone(),
            created_at: self.created_at,
            visit_count: self.visit_count(),
            visits: self.visits.clone(),
        }
    }

    pub fn summary(&self, session_id: &str) -> SessionSummary {
        SessionSummary {
            session_id: session_id.to_string(),
            label: self.label.clone(),
            visit_count: self.visit_count(),
            created_at: self.created_at,
            message: self.message.clone(),
        }
    }
}

/// Point-in-time copy of a session, detached from the registry.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SessionSnapshot {
    pub session_id: String,
    pub label: String,
    pub notify_target: String,
    pub message: String,
    pub metadata: Map<String, Value>,
    pub created_at: DateTime<Utc>,
    pub visit_count: usize,
    pub visits: Vec<Visit>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SessionSummary {
    pub session_id: String,
    pub label: String,
    pub visit_count: usize,
    pub created_at: DateTime<Utc>,
    pub message: String,
}

/// What an append hands back: the new visit number plus enough session
/// context to describe the visit without a second lookup.
#[derive(Debug, Clone)]
pub struct VisitReceipt {
    pub visit_count: usize,
    pub label: String,
    pub notify_target: String,
    pub message: String,
}
