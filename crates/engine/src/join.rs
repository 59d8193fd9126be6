use core_types::{
    EnrichedTrackPoint, EnvKey, FlowRecord, ResampledTrackPoint, WaveRecord, WindRecord,
};
use futures::stream::{self, StreamExt};
use grid::GridConvention;
use std::collections::{HashMap, HashSet};
use std::future::Future;
use store::{EnvironmentalStore, StoreError};
use tracing::debug;

/// Upper bound on keys per equality-set query, to keep the store's
/// predicate size bounded.
pub const MAX_KEYS_PER_BATCH: usize = 500;

/// Worker bound for concurrently issued batch queries within one join.
pub const MAX_CONCURRENT_BATCHES: usize = 4;

/// The grid convention each dataset is published on.
pub const WAVE_CONVENTION: GridConvention = GridConvention::Mfwam;
pub const WIND_CONVENTION: GridConvention = GridConvention::Era5Wind;
pub const FLOW_CONVENTION: GridConvention = GridConvention::Smoc;

/// Computes the per-dataset grid cell for every resampled point and wraps
/// it into an (as yet unjoined) `EnrichedTrackPoint`.
pub fn attach_grid_cells(points: Vec<ResampledTrackPoint>) -> Vec<EnrichedTrackPoint> {
    points
        .into_iter()
        .map(|point| {
            let cell = |convention: GridConvention| {
                let (lat_index, lon_index) = convention.index(point.lat, point.lon);
                EnvKey { lat_index, lon_index, time: point.bucket_time }
            };
            let (wave_cell, wind_cell, flow_cell) =
                (cell(WAVE_CONVENTION), cell(WIND_CONVENTION), cell(FLOW_CONVENTION));
            EnrichedTrackPoint {
                wave_cell,
                wind_cell,
                flow_cell,
                wave: None,
                wind: None,
                flow: None,
                wind_motion: None,
                flow_motion: None,
                track: point,
            }
        })
        .collect()
}

/// Deduplicates join keys while preserving first-seen order, so batch
/// contents stay deterministic run to run.
pub fn dedup_keys(keys: impl IntoIterator<Item = EnvKey>) -> Vec<EnvKey> {
    let mut seen = HashSet::new();
    keys.into_iter().filter(|key| seen.insert(*key)).collect()
}

/// Copies matched store rows onto the points. Each dataset only fills its
/// own still-empty slot (first-writer-wins), so applying the three maps in
/// any order yields the same result.
pub fn merge_records(
    points: &mut [EnrichedTrackPoint],
    wave: &HashMap<EnvKey, WaveRecord>,
    wind: &HashMap<EnvKey, WindRecord>,
    flow: &HashMap<EnvKey, FlowRecord>,
) {
    for point in points.iter_mut() {
        if point.wave.is_none() {
            point.wave = wave.get(&point.wave_cell).cloned();
        }
        if point.wind.is_none() {
            point.wind = wind.get(&point.wind_cell).cloned();
        }
        if point.flow.is_none() {
            point.flow = flow.get(&point.flow_cell).cloned();
        }
    }
}

/// Issues bounded-size equality-set queries against one environmental
/// dataset and collects the matches into a key-indexed map.
///
/// A failed batch fails the whole join; there is no partial per-point
/// success. Points with genuinely no match simply never appear in the map.
pub struct EnvironmentalJoinEngine<'a> {
    store: &'a dyn EnvironmentalStore,
}

impl<'a> EnvironmentalJoinEngine<'a> {
    pub fn new(store: &'a dyn EnvironmentalStore) -> Self {
        Self { store }
    }

    async fn fetch_batched<R, F, Fut>(
        &self,
        dataset: &'static str,
        keys: &[EnvKey],
        fetch: F,
    ) -> Result<HashMap<EnvKey, R>, StoreError>
    where
        F: Fn(Vec<EnvKey>) -> Fut,
        Fut: Future<Output = Result<Vec<(EnvKey, R)>, StoreError>>,
    {
        let batches: Vec<Vec<EnvKey>> = keys
            .chunks(MAX_KEYS_PER_BATCH)
            .map(<[EnvKey]>::to_vec)
            .collect();
        debug!(dataset, keys = keys.len(), batches = batches.len(), "joining dataset");

        let mut results = stream::iter(batches)
            .map(fetch)
            .buffer_unordered(MAX_CONCURRENT_BATCHES);

        let mut map = HashMap::with_capacity(keys.len());
        while let Some(batch) = results.next().await {
            for (key, record) in batch? {
                map.insert(key, record);
            }
        }
        Ok(map)
    }

    pub async fn fetch_wave_map(
        &self,
        keys: &[EnvKey],
    ) -> Result<HashMap<EnvKey, WaveRecord>, StoreError> {
        let store = self.store;
        self.fetch_batched("wave", keys, |batch| async move {
            store.fetch_wave(&batch).await
        })
        .await
    }

    pub async fn fetch_wind_map(
        &self,
        keys: &[EnvKey],
    ) -> Result<HashMap<EnvKey, WindRecord>, StoreError> {
        let store = self.store;
        self.fetch_batched("wind", keys, |batch| async move {
            store.fetch_wind(&batch).await
        })
        .await
    }

    pub async fn fetch_flow_map(
        &self,
        keys: &[EnvKey],
    ) -> Result<HashMap<EnvKey, FlowRecord>, StoreError> {
        let store = self.store;
        self.fetch_batched("flow", keys, |batch| async move {
            store.fetch_flow(&batch).await
        })
        .await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{TimeZone, Utc};

    fn key(lat_index: i64, lon_index: i64) -> EnvKey {
        EnvKey {
            lat_index,
            lon_index,
            time: Utc.with_ymd_and_hms(2024, 6, 1, 0, 0, 0).unwrap(),
        }
    }

    #[test]
    fn dedup_keys_preserves_first_seen_order() {
        let keys = dedup_keys(vec![key(2, 2), key(1, 1), key(2, 2), key(3, 3)]);
        assert_eq!(keys, vec![key(2, 2), key(1, 1), key(3, 3)]);
    }

    #[test]
    fn attach_grid_cells_uses_one_convention_per_dataset() {
        let point = ResampledTrackPoint {
            lon: 122.5,
            lat: 31.25,
            sog: Some(10.0),
            cog: None,
            hdg: 0.0,
            draught: Some(8.0),
            bucket_time: Utc.with_ymd_and_hms(2024, 6, 1, 0, 0, 0).unwrap(),
        };
        let enriched = attach_grid_cells(vec![point.clone()]);
        let cells = &enriched[0];

        let (wave_lat, wave_lon) = WAVE_CONVENTION.index(point.lat, point.lon);
        assert_eq!((cells.wave_cell.lat_index, cells.wave_cell.lon_index), (wave_lat, wave_lon));

        let (wind_lat, wind_lon) = WIND_CONVENTION.index(point.lat, point.lon);
        assert_eq!((cells.wind_cell.lat_index, cells.wind_cell.lon_index), (wind_lat, wind_lon));

        // Wave and flow share 1/12° geometry, wind does not.
        assert_eq!(cells.wave_cell, cells.flow_cell);
        assert_ne!(cells.wave_cell, cells.wind_cell);
        assert_eq!(cells.wave_cell.time, point.bucket_time);
    }

    #[test]
    fn merge_records_never_overwrites_a_filled_slot() {
        let point = ResampledTrackPoint {
            lon: 0.0,
            lat: 0.0,
            sog: None,
            cog: None,
            hdg: 0.0,
            draught: None,
            bucket_time: Utc.with_ymd_and_hms(2024, 6, 1, 0, 0, 0).unwrap(),
        };
        let mut points = attach_grid_cells(vec![point]);
        let first = WaveRecord { wave_height: Some(1.0), ..Default::default() };
        let second = WaveRecord { wave_height: Some(9.0), ..Default::default() };

        let mut wave_map = HashMap::new();
        wave_map.insert(points[0].wave_cell, first.clone());
        merge_records(&mut points, &wave_map, &HashMap::new(), &HashMap::new());

        wave_map.insert(points[0].wave_cell, second);
        merge_records(&mut points, &wave_map, &HashMap::new(), &HashMap::new());

        assert_eq!(points[0].wave, Some(first));
        assert_eq!(points[0].wind, None);
    }
}
