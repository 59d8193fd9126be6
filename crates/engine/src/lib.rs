//! # Seaperf Engine
//!
//! Layer 4: the pipeline orchestrator. One call runs one vessel / one time
//! window end to end:
//!
//! track source → resampler → grid indexing → environmental joins →
//! vector kinematics → performance aggregation → `PerformanceProfile`.
//!
//! Each run operates on its own value set, so any number of pipelines can
//! run concurrently without locking. Within a run, the three dataset joins
//! fan out concurrently and are merged deterministically; batched
//! sub-queries inside one join fan out under a fixed worker bound.

pub mod error;
pub mod join;

pub use error::PipelineError;
pub use join::{EnvironmentalJoinEngine, MAX_CONCURRENT_BATCHES, MAX_KEYS_PER_BATCH};

use analytics::{PerformanceAggregator, PerformanceProfile};
use chrono::{DateTime, Utc};
use join::{attach_grid_cells, dedup_keys, merge_records};
use store::{EnvironmentalStore, TrackSource, VesselProfileSource};
use tracing::info;

/// Runs the whole performance pipeline for one vessel and time window.
///
/// Returns either a complete [`PerformanceProfile`] or one error naming
/// the collaborator that failed. Points excluded along the way (unmatched
/// cells, incomplete observations) are logged, never silently defaulted
/// into the averages.
pub async fn run_performance_pipeline(
    mmsi: &str,
    start: DateTime<Utc>,
    end: DateTime<Utc>,
    tracks: &dyn TrackSource,
    vessels: &dyn VesselProfileSource,
    environment: &dyn EnvironmentalStore,
) -> Result<PerformanceProfile, PipelineError> {
    let (track_result, vessel_result) = tokio::join!(
        tracks.fetch_track(mmsi, start, end),
        vessels.fetch_vessel_profile(mmsi),
    );
    let raw_track = track_result.map_err(PipelineError::TrackSource)?;
    let vessel = vessel_result.map_err(PipelineError::VesselProfile)?;
    info!(mmsi, points = raw_track.len(), "fetched raw track");

    let resampled = track::resample(raw_track);
    let mut points = attach_grid_cells(resampled);

    let wave_keys = dedup_keys(points.iter().map(|p| p.wave_cell));
    let wind_keys = dedup_keys(points.iter().map(|p| p.wind_cell));
    let flow_keys = dedup_keys(points.iter().map(|p| p.flow_cell));

    // The three joins are independent; issue them concurrently and merge
    // afterwards in a fixed order.
    let joiner = EnvironmentalJoinEngine::new(environment);
    let (wave, wind, flow) = tokio::join!(
        joiner.fetch_wave_map(&wave_keys),
        joiner.fetch_wind_map(&wind_keys),
        joiner.fetch_flow_map(&flow_keys),
    );
    let wave = wave.map_err(|source| PipelineError::Environmental { dataset: "wave", source })?;
    let wind = wind.map_err(|source| PipelineError::Environmental { dataset: "wind", source })?;
    let flow = flow.map_err(|source| PipelineError::Environmental { dataset: "flow", source })?;
    info!(
        mmsi,
        resampled = points.len(),
        wave_rows = wave.len(),
        wind_rows = wind.len(),
        flow_rows = flow.len(),
        "environmental joins complete"
    );

    merge_records(&mut points, &wave, &wind, &flow);
    let enriched: Vec<_> = points.into_iter().map(kinematics::enrich).collect();

    let profile = PerformanceAggregator::new().aggregate(&enriched, &vessel);
    info!(mmsi, ?profile, "performance profile computed");
    Ok(profile)
}
