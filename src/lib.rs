//! # Seaperf
//!
//! Vessel performance analytics: converts a raw AIS track into a denoised,
//! weather-conditioned performance profile by joining the track against
//! gridded wind, wave and current datasets.
//!
//! This root crate is a thin facade. The actual work is done by the layered
//! member crates; callers that want the whole pipeline only need
//! [`run_performance_pipeline`] plus the collaborator traits from [`store`].

pub use analytics::{PerformanceAggregator, PerformanceProfile};
pub use core_types::{
    EnrichedTrackPoint, EnvKey, FlowRecord, ResampledTrackPoint, TrackPoint, VesselProfile,
    WaveRecord, WindRecord,
};
pub use engine::{run_performance_pipeline, PipelineError};
pub use grid::GridConvention;
pub use kinematics::{beaufort_level, compass_point, is_downstream};
pub use store::{EnvironmentalStore, StoreError, TrackSource, VesselProfileSource};
pub use track::{parse_postime, postime_to_utc, resample, utc_to_postime};

use tracing_subscriber::EnvFilter;

/// Installs a global tracing subscriber driven by `RUST_LOG`.
///
/// Call once at process startup. Falls back to `info` when `RUST_LOG`
/// is unset. Safe to call from tests; a second call is a no-op.
pub fn init_tracing() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    let _ = tracing_subscriber::fmt().with_env_filter(filter).try_init();
}
