use serde::{Deserialize, Serialize};

/// The weather-filtered performance profile of one vessel over one time
/// window. This is the pipeline's only output.
///
/// The bucket means are optional, not zero-filled: an empty bucket is
/// represented by omitting the field entirely. `avg_good_weather_speed`
/// averages the *classified* points only — the draught band between the
/// ballast and laden thresholds contributes to neither it nor the buckets.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PerformanceProfile {
    /// Mean SOG over all ballast + laden points that passed the weather
    /// and speed filters, knots, rounded to 2 dp. `0.0` when no point
    /// classified.
    pub avg_good_weather_speed: f64,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub avg_ballast_speed: Option<f64>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub avg_laden_speed: Option<f64>,
}
