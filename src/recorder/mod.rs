// src/recorder/mod.rs — Visit recording pipeline
//
// resolve geo (no lock held) -> append to registry -> dispatch notice.
// Geo and notifier failures never change the recorded outcome.

pub mod geo;
pub mod notify;

use std::sync::Arc;

use serde::Deserialize;
use serde_json::{Map, Value};

use crate::infra::errors::RegistryError;
use crate::registry::{SessionRegistry, Visit};
use geo::GeoResolver;
use notify::{Notifier, VisitNotice};

/// Raw request fields for one visit, before geo resolution.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct VisitRequest {
    pub ip: String,
    #[serde(default)]
    pub user_agent: String,
    #[serde(default = "default_referer")]
    pub referer: String,
    #[serde(default)]
    pub accept_language: String,
}

fn default_referer() -> String {
    "Direct".into()
}

#[derive(Clone)]
pub struct VisitRecorder {
    registry: SessionRegistry,
    geo: Arc<dyn GeoResolver>,
    notifier: Arc<dyn Notifier>,
}

impl VisitRecorder {
    pub fn new(
        registry: SessionRegistry,
        geo: Arc<dyn GeoResolver>,
        notifier: Arc<dyn Notifier>,
    ) -> Self {
        Self {
            registry,
            geo,
            notifier,
        }
    }

    pub fn registry(&self) -> &SessionRegistry {
        &self.registry
    }

    /// Record a visit and return its number within the session.
    pub async fn record(
        &self,
        session_id: &str,
        request: VisitRequest,
    ) -> Result<usize, RegistryError> {
        // Skip the geo lookup for unknown ids; the append stays authoritative.
        if !self.registry.contains(session_id) {
            return Err(RegistryError::not_found(session_id));
        }

        let geo = self.geo.resolve(&request.ip).await;
        let visit = Visit::new(
            request.ip,
            request.user_agent,
            request.referer,
            request.accept_language,
            geo,
        );

        let receipt = self.registry.append_visit(session_id, visit.clone())?;
        let visit_count = receipt.visit_count;
        notify::dispatch(
            self.notifier.clone(),
            VisitNotice::new(session_id, receipt, visit),
        );
        Ok(visit_count)
    }

    pub fn enrich(&self, session_id: &str, extra: Map<String, Value>) -> Result<(), RegistryError> {
        self.registry.enrich_last_visit(session_id, extra)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::registry::{GeoResult, NewSession};
    use async_trait::async_trait;
    use geo::{StaticGeoResolver, UnknownGeoResolver};
    use tokio::sync::mpsc;

    struct ChannelNotifier(mpsc::UnboundedSender<VisitNotice>);

    #[async_trait]
    impl Notifier for ChannelNotifier {
        async fn notify(&self, notice: &VisitNotice) -> anyhow::Result<()> {
            self.0.send(notice.clone())?;
            Ok(())
        }
    }

    struct FailingNotifier;

    #[async_trait]
    impl Notifier for FailingNotifier {
        async fn notify(&self, _notice: &VisitNotice) -> anyhow::Result<()> {
            anyhow::bail!("endpoint unreachable")
        }
    }

    fn request(ip: &str) -> VisitRequest {
        VisitRequest {
            ip: ip.into(),
            user_agent: "Mozilla/5.0".into(),
            referer: "Direct".into(),
            accept_language: "en-US,en;q=0.9".into(),
        }
    }

    #[tokio::test]
    async fn test_record_resolves_geo_and_notifies() {
        let registry = SessionRegistry::new();
        registry.register(
            "abc",
            NewSession {
                label: "Laptop-1".into(),
                ..Default::default()
            },
        );
        let tokyo = GeoResult {
            city: "Tokyo".into(),
            region: "Tokyo".into(),
            country: "Japan".into(),
            latitude: Some(35.68),
            longitude: Some(139.69),
            organization: "Example KK".into(),
            timezone: "Asia/Tokyo".into(),
        };
        let (tx, mut rx) = mpsc::unbounded_channel();
        let recorder = VisitRecorder::new(
            registry.clone(),
            Arc::new(StaticGeoResolver::new().with_entry("192.0.2.10", tokyo.clone())),
            Arc::new(ChannelNotifier(tx)),
        );

        assert_eq!(recorder.record("abc", request("192.0.2.10")).await.unwrap(), 1);

        let notice = rx.recv().await.unwrap();
        assert_eq!(notice.visit_number, 1);
        assert_eq!(notice.label, "Laptop-1");
        assert_eq!(notice.visit.geo, tokyo);
        assert_eq!(registry.get("abc").unwrap().visits[0].geo, tokyo);
    }

    #[tokio::test]
    async fn test_record_unknown_session_does_not_notify() {
        let (tx, mut rx) = mpsc::unbounded_channel();
        let recorder = VisitRecorder::new(
            SessionRegistry::new(),
            Arc::new(UnknownGeoResolver),
            Arc::new(ChannelNotifier(tx)),
        );

        let err = recorder.record("nope", request("192.0.2.1")).await.unwrap_err();
        assert_eq!(err, RegistryError::not_found("nope"));
        drop(recorder);
        assert!(rx.recv().await.is_none());
    }

    #[tokio::test]
    async fn test_notifier_failure_does_not_affect_outcome() {
        let registry = SessionRegistry::new();
        registry.register("abc", NewSession::default());
        let recorder = VisitRecorder::new(
            registry.clone(),
            Arc::new(UnknownGeoResolver),
            Arc::new(FailingNotifier),
        );

        assert_eq!(recorder.record("abc", request("192.0.2.1")).await.unwrap(), 1);
        assert_eq!(recorder.record("abc", request("192.0.2.2")).await.unwrap(), 2);
        assert_eq!(registry.get("abc").unwrap().visit_count, 2);
    }

    #[tokio::test]
    async fn test_enrich_via_recorder() {
        let registry = SessionRegistry::new();
        registry.register("abc", NewSession::default());
        let recorder = VisitRecorder::new(
            registry.clone(),
            Arc::new(UnknownGeoResolver),
            Arc::new(notify::LogNotifier),
        );

        assert_eq!(
            recorder.enrich("abc", Map::new()).unwrap_err(),
            RegistryError::empty("abc")
        );
        recorder.record("abc", request("192.0.2.1")).await.unwrap();
        let mut extra = Map::new();
        extra.insert("plugins".into(), Value::from(3));
        recorder.enrich("abc", extra).unwrap();
        assert_eq!(registry.get("abc").unwrap().visit_count, 1);
    }

    #[test]
    fn test_visit_request_defaults() {
        let req: VisitRequest = serde_json::from_str(r#"{"ip": "192.0.2.1"}"#).unwrap();
        assert_eq!(req.referer, "Direct");
        assert!(req.user_agent.is_empty());
    }
}
