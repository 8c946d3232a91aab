// tests/registry_test.rs — Integration test: registry semantics through the public API

use std::sync::{Arc, Barrier};
use std::thread;
use std::time::Duration;

use pretty_assertions::assert_eq;
use serde_json::{Map, Value};

use visitlog::infra::errors::RegistryError;
use visitlog::recorder::geo::UnknownGeoResolver;
use visitlog::recorder::notify::LogNotifier;
use visitlog::recorder::{VisitRecorder, VisitRequest};
use visitlog::registry::{GeoResult, NewSession, SessionRegistry, Visit};

fn laptop(label: &str) -> NewSession {
    let mut metadata = Map::new();
    metadata.insert("os".into(), Value::from("Windows 11"));
    NewSession {
        label: label.into(),
        notify_target: "https://hooks.example.com/visits".into(),
        message: "scan me".into(),
        metadata,
    }
}

fn visit(ip: &str) -> Visit {
    Visit::new(ip, "Mozilla/5.0", "Direct", "en-US", GeoResult::unknown())
}

#[test]
fn test_three_visits_end_to_end() {
    let registry = SessionRegistry::new();
    registry.register("abc", laptop("Laptop-1"));

    let counts: Vec<usize> = ["203.0.113.1", "203.0.113.2", "203.0.113.3"]
        .iter()
        .map(|ip| registry.record_visit("abc", visit(ip)).unwrap())
        .collect();
    assert_eq!(counts, vec![1, 2, 3]);

    let snap = registry.get("abc").unwrap();
    assert_eq!(snap.label, "Laptop-1");
    assert_eq!(snap.visit_count, 3);
    let ips: Vec<&str> = snap.visits.iter().map(|v| v.ip.as_str()).collect();
    assert_eq!(ips, vec!["203.0.113.1", "203.0.113.2", "203.0.113.3"]);
    assert_eq!(snap.metadata["os"], "Windows 11");
}

#[test]
fn test_enrich_does_not_change_count() {
    let registry = SessionRegistry::new();
    registry.register("abc", laptop("Laptop-1"));
    assert_eq!(
        registry.enrich_last_visit("abc", Map::new()),
        Err(RegistryError::empty("abc"))
    );

    registry.record_visit("abc", visit("203.0.113.1")).unwrap();
    let mut extra = Map::new();
    extra.insert("timezone".into(), Value::from("UTC"));
    registry.enrich_last_visit("abc", extra).unwrap();

    let snap = registry.get("abc").unwrap();
    assert_eq!(snap.visit_count, 1);
    assert_eq!(
        snap.visits[0].enrichment.as_ref().unwrap()["timezone"],
        "UTC"
    );
}

#[test]
fn test_concurrent_record_has_no_lost_updates() {
    let registry = SessionRegistry::new();
    registry.register("abc", laptop("Laptop-1"));

    let threads = 8;
    let per_thread = 250;
    let handles: Vec<_> = (0..threads)
        .map(|t| {
            let registry = registry.clone();
            thread::spawn(move || {
                let mut seen = Vec::with_capacity(per_thread);
                for i in 0..per_thread {
                    let ip = format!("10.{t}.{}.{}", i / 256, i % 256);
                    seen.push(registry.record_visit("abc", visit(&ip)).unwrap());
                }
                seen
            })
        })
        .collect();

    let mut all: Vec<usize> = handles
        .into_iter()
        .flat_map(|h| h.join().unwrap())
        .collect();
    all.sort_unstable();

    let total = threads * per_thread;
    assert_eq!(all, (1..=total).collect::<Vec<_>>());
    let snap = registry.get("abc").unwrap();
    assert_eq!(snap.visit_count, total);
    assert_eq!(snap.visits.len(), total);
}

#[test]
fn test_sweep_racing_record_never_resurrects() {
    let registry = SessionRegistry::new();
    for i in 0..50 {
        registry.register(&format!("s{i}"), laptop("host"));
    }

    let start = Arc::new(Barrier::new(2));
    let writer = {
        let registry = registry.clone();
        let start = start.clone();
        thread::spawn(move || {
            let mut gone = [false; 50];
            start.wait();
            let mut round = 0usize;
            // Keep writing until the sweep has taken every session.
            while !gone.iter().all(|g| *g) {
                round += 1;
                for (i, gone) in gone.iter_mut().enumerate() {
                    let result = registry.record_visit(&format!("s{i}"), visit(&format!("10.0.0.{}", round % 256)));
                    match result {
                        Ok(_) => assert!(!*gone, "s{i} accepted a visit after being swept"),
                        Err(e) => {
                            assert_eq!(e, RegistryError::not_found(&format!("s{i}")));
                            *gone = true;
                        }
                    }
                }
            }
            gone
        })
    };

    // Zero retention with a clock far in the future: every session is stale.
    let far_future = chrono::Utc::now() + chrono::TimeDelta::days(365);
    start.wait();
    let removed = registry.sweep_expired(far_future, Duration::from_secs(0));
    let gone = writer.join().unwrap();

    assert_eq!(removed, 50);
    assert!(gone.iter().all(|g| *g));
    assert_eq!(registry.size(), 0);
    assert_eq!(registry.list().len(), registry.size());
}

#[test]
fn test_list_length_equals_size() {
    let registry = SessionRegistry::new();
    for i in 0..10 {
        registry.register(&format!("s{i}"), laptop("host"));
        assert_eq!(registry.list().len(), registry.size());
    }
    registry.register("s3", laptop("again"));
    assert_eq!(registry.size(), 10);
    assert_eq!(registry.list().len(), 10);
    assert_eq!(registry.list()[3].label, "again");
}

#[tokio::test]
async fn test_concurrent_recorder_tasks() {
    let registry = SessionRegistry::new();
    registry.register("abc", laptop("Laptop-1"));
    let recorder = VisitRecorder::new(
        registry.clone(),
        Arc::new(UnknownGeoResolver),
        Arc::new(LogNotifier),
    );

    let mut tasks = Vec::new();
    for i in 0..64 {
        let recorder = recorder.clone();
        tasks.push(tokio::spawn(async move {
            recorder
                .record(
                    "abc",
                    VisitRequest {
                        ip: format!("192.0.2.{i}"),
                        ..Default::default()
                    },
                )
                .await
                .unwrap()
        }));
    }

    let mut counts = Vec::new();
    for t in tasks {
        counts.push(t.await.unwrap());
    }
    counts.sort_unstable();
    assert_eq!(counts, (1..=64).collect::<Vec<_>>());
    assert_eq!(registry.get("abc").unwrap().visit_count, 64);
}
