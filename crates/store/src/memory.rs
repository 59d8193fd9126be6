use crate::error::StoreError;
use crate::sources::{EnvironmentalStore, TrackSource, VesselProfileSource};
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use core_types::{EnvKey, FlowRecord, TrackPoint, VesselProfile, WaveRecord, WindRecord};
use std::collections::HashMap;

/// An in-memory environmental store. Deterministic and synchronous under
/// the hood; used by integration tests and local experiments.
#[derive(Debug, Clone, Default)]
pub struct MemoryEnvironmentalStore {
    wave: HashMap<EnvKey, WaveRecord>,
    wind: HashMap<EnvKey, WindRecord>,
    flow: HashMap<EnvKey, FlowRecord>,
}

impl MemoryEnvironmentalStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert_wave(&mut self, key: EnvKey, record: WaveRecord) {
        self.wave.insert(key, record);
    }

    pub fn insert_wind(&mut self, key: EnvKey, record: WindRecord) {
        self.wind.insert(key, record);
    }

    pub fn insert_flow(&mut self, key: EnvKey, record: FlowRecord) {
        self.flow.insert(key, record);
    }
}

fn lookup<R: Clone>(table: &HashMap<EnvKey, R>, keys: &[EnvKey]) -> Vec<(EnvKey, R)> {
    keys.iter()
        .filter_map(|key| table.get(key).map(|record| (*key, record.clone())))
        .collect()
}

#[async_trait]
impl EnvironmentalStore for MemoryEnvironmentalStore {
    async fn fetch_wave(&self, keys: &[EnvKey]) -> Result<Vec<(EnvKey, WaveRecord)>, StoreError> {
        Ok(lookup(&self.wave, keys))
    }

    async fn fetch_wind(&self, keys: &[EnvKey]) -> Result<Vec<(EnvKey, WindRecord)>, StoreError> {
        Ok(lookup(&self.wind, keys))
    }

    async fn fetch_flow(&self, keys: &[EnvKey]) -> Result<Vec<(EnvKey, FlowRecord)>, StoreError> {
        Ok(lookup(&self.flow, keys))
    }
}

/// An in-memory track source serving a fixed set of points, filtered by
/// the requested window.
#[derive(Debug, Clone, Default)]
pub struct MemoryTrackSource {
    points: Vec<TrackPoint>,
}

impl MemoryTrackSource {
    pub fn new(points: Vec<TrackPoint>) -> Self {
        Self { points }
    }
}

#[async_trait]
impl TrackSource for MemoryTrackSource {
    async fn fetch_track(
        &self,
        _mmsi: &str,
        start: DateTime<Utc>,
        end: DateTime<Utc>,
    ) -> Result<Vec<TrackPoint>, StoreError> {
        Ok(self
            .points
            .iter()
            .filter(|p| p.postime >= start && p.postime <= end)
            .cloned()
            .collect())
    }
}

/// An in-memory vessel profile source serving one profile for any mmsi.
#[derive(Debug, Clone)]
pub struct MemoryVesselProfileSource {
    profile: VesselProfile,
}

impl MemoryVesselProfileSource {
    pub fn new(profile: VesselProfile) -> Self {
        Self { profile }
    }
}

#[async_trait]
impl VesselProfileSource for MemoryVesselProfileSource {
    async fn fetch_vessel_profile(&self, _mmsi: &str) -> Result<VesselProfile, StoreError> {
        Ok(self.profile)
    }
}
