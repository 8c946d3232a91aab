// src/recorder/geo.rs — IP to location resolution seam
//
// Resolution never fails from the caller's point of view: anything that
// goes wrong comes back as `GeoResult::unknown()`.

use std::collections::HashMap;

use async_trait::async_trait;

use crate::registry::GeoResult;

#[async_trait]
pub trait GeoResolver: Send + Sync {
    async fn resolve(&self, ip: &str) -> GeoResult;
}

/// Resolver that knows nothing. Every lookup yields the sentinel.
#[derive(Debug, Default, Clone)]
pub struct UnknownGeoResolver;

#[async_trait]
impl GeoResolver for UnknownGeoResolver {
    async fn resolve(&self, _ip: &str) -> GeoResult {
        GeoResult::unknown()
    }
}

/// Fixed lookup table, for offline deployments and tests.
#[derive(Debug, Default, Clone)]
pub struct StaticGeoResolver {
    entries: HashMap<String, GeoResult>,
}

impl StaticGeoResolver {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_entry(mut self, ip: impl Into<String>, geo: GeoResult) -> Self {
        self.entries.insert(ip.into(), geo);
        self
    }
}

#[async_trait]
impl GeoResolver for StaticGeoResolver {
    async fn resolve(&self, ip: &str) -> GeoResult {
        self.entries
            .get(ip.trim())
            .cloned()
            .unwrap_or_else(GeoResult::unknown)
    }
}
