use crate::error::StoreError;
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use core_types::{EnvKey, FlowRecord, TrackPoint, VesselProfile, WaveRecord, WindRecord};

/// The raw position-report source: given a vessel identifier and a time
/// window, returns the track ordered or unordered — the resampler sorts.
#[async_trait]
pub trait TrackSource: Send + Sync {
    async fn fetch_track(
        &self,
        mmsi: &str,
        start: DateTime<Utc>,
        end: DateTime<Utc>,
    ) -> Result<Vec<TrackPoint>, StoreError>;
}

/// The static vessel attribute source; design draft and design speed are
/// the classification thresholds for the aggregator.
#[async_trait]
pub trait VesselProfileSource: Send + Sync {
    async fn fetch_vessel_profile(&self, mmsi: &str) -> Result<VesselProfile, StoreError>;
}

/// The gridded environmental store: three read-only tables keyed by
/// `(lat_index, lon_index, history_date)`, queried with equality-set
/// predicates over a batch of keys.
///
/// Implementations return one `(key, record)` pair per matched row; keys
/// with no row simply produce no pair. A failed query fails the whole
/// batch.
#[async_trait]
pub trait EnvironmentalStore: Send + Sync {
    async fn fetch_wave(&self, keys: &[EnvKey]) -> Result<Vec<(EnvKey, WaveRecord)>, StoreError>;

    async fn fetch_wind(&self, keys: &[EnvKey]) -> Result<Vec<(EnvKey, WindRecord)>, StoreError>;

    async fn fetch_flow(&self, keys: &[EnvKey]) -> Result<Vec<(EnvKey, FlowRecord)>, StoreError>;
}
