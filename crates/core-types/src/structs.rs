use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// A raw AIS/GPS position report as delivered by the track source.
///
/// `postime` is already normalized to UTC by the source adapter; the wire
/// format ("YYYY-MM-DD HH:MM:SS", UTC+8) is parsed at the seam, not here.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TrackPoint {
    pub lon: f64,
    pub lat: f64,
    /// Speed over ground, knots.
    pub sog: Option<f64>,
    /// Course over ground, degrees.
    pub cog: Option<f64>,
    /// Heading, degrees. Often absent on class-B transponders.
    pub hdg: Option<f64>,
    /// Current draught, metres.
    pub draught: Option<f64>,
    pub postime: DateTime<Utc>,
}

/// A track point that survived resampling: one per 3-hour UTC bucket,
/// hourly-deduped, with the heading backfilled from `cog` (or `0`).
///
/// `bucket_time` is the aligned bucket key and is what the environmental
/// join matches against store timestamps.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ResampledTrackPoint {
    pub lon: f64,
    pub lat: f64,
    pub sog: Option<f64>,
    pub cog: Option<f64>,
    pub hdg: f64,
    pub draught: Option<f64>,
    pub bucket_time: DateTime<Utc>,
}

/// The `(lat_index, lon_index, timestamp)` tuple that keys every
/// environmental table. Indices are signed so that out-of-domain
/// coordinates produce an out-of-range key (a failed join) rather
/// than a panic.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct EnvKey {
    pub lat_index: i64,
    pub lon_index: i64,
    pub time: DateTime<Utc>,
}

/// One row of the wave table. All measurements are metres / degrees /
/// seconds; any column can be NULL in the store.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct WaveRecord {
    pub wave_height: Option<f64>,
    pub wave_direction: Option<f64>,
    pub wave_period: Option<f64>,
    pub swell_wave_height: Option<f64>,
    pub swell_wave_direction: Option<f64>,
    pub swell_wave_period: Option<f64>,
    pub wind_wave_height: Option<f64>,
    pub wind_wave_direction: Option<f64>,
    pub wind_wave_period: Option<f64>,
}

/// One row of the wind table. `u_wind`/`v_wind` are the eastward/northward
/// vector components in m/s.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct WindRecord {
    pub pressure: Option<f64>,
    pub temperature: Option<f64>,
    pub u_wind: Option<f64>,
    pub v_wind: Option<f64>,
}

/// One row of the current (flow) table: eastward/northward components, m/s.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct FlowRecord {
    pub u_flow: Option<f64>,
    pub v_flow: Option<f64>,
}

/// Wind kinematics derived from `u_wind`/`v_wind`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WindMotion {
    /// Scalar wind speed, m/s.
    pub speed: f64,
    /// Compass bearing the wind blows from, degrees.
    pub angle: f64,
    /// Beaufort level, 0..=12.
    pub level: u8,
    /// 16-point compass label for `angle`.
    pub direction: String,
    pub speed_kts: f64,
}

/// Current kinematics derived from `u_flow`/`v_flow`, plus the
/// downstream/upstream classification against the ship's heading.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FlowMotion {
    /// Scalar current speed, m/s.
    pub speed: f64,
    /// Direction the current sets toward, degrees in [0, 360).
    pub angle: f64,
    pub direction: String,
    pub speed_kts: f64,
    /// True when the ship's heading is within 45° of the current direction.
    pub downstream: bool,
}

/// A resampled point carrying its grid cell per environmental convention,
/// the store rows matched onto it, and the derived kinematics.
///
/// Built incrementally: the join engine fills the record slots
/// (first-writer-wins, a populated slot is never overwritten) and the
/// kinematics enricher fills the motion slots. Unmatched datasets stay
/// `None` and knock the point out at aggregation time.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EnrichedTrackPoint {
    pub track: ResampledTrackPoint,
    pub wave_cell: EnvKey,
    pub wind_cell: EnvKey,
    pub flow_cell: EnvKey,
    pub wave: Option<WaveRecord>,
    pub wind: Option<WindRecord>,
    pub flow: Option<FlowRecord>,
    pub wind_motion: Option<WindMotion>,
    pub flow_motion: Option<FlowMotion>,
}

/// Static vessel attributes used as classification thresholds.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct VesselProfile {
    /// Design draft, metres.
    pub design_draft: f64,
    /// Design speed, knots.
    pub design_speed: f64,
}
