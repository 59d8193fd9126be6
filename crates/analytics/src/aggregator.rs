use crate::report::PerformanceProfile;
use core_types::{EnrichedTrackPoint, VesselProfile};
use tracing::debug;

/// Weather filter: maximum Beaufort level still counted as good weather.
const MAX_GOOD_WIND_LEVEL: u8 = 4;

/// Weather filter: maximum significant wave height (m) still counted as
/// good weather.
const MAX_GOOD_WAVE_HEIGHT: f64 = 1.25;

/// Speed filter: a point must be moving at at least this fraction of the
/// design speed to count as a sailing observation.
const MIN_SPEED_FRACTION: f64 = 0.5;

/// Ballast iff draught is below this fraction of the design draft.
const BALLAST_DRAFT_FRACTION: f64 = 0.7;

/// Laden iff draught is above this fraction of the design draft.
const LADEN_DRAFT_FRACTION: f64 = 0.8;

/// A stateless calculator reducing enriched track points to a
/// [`PerformanceProfile`].
///
/// The thresholds are fixed policy, not per-call knobs; they are what
/// makes profiles comparable across vessels and time windows.
#[derive(Debug, Default)]
pub struct PerformanceAggregator {}

impl PerformanceAggregator {
    pub fn new() -> Self {
        Self::default()
    }

    /// Filters, classifies and averages in one pass.
    ///
    /// A point missing any of wind level, wave height, SOG or draught is
    /// not a valid observation and is excluded before the thresholds are
    /// applied. Draughts between the ballast and laden bounds fall into
    /// neither bucket and are excluded from the overall mean as well.
    /// Empty buckets are omitted from the profile; no division by zero
    /// can occur.
    pub fn aggregate(
        &self,
        points: &[EnrichedTrackPoint],
        vessel: &VesselProfile,
    ) -> PerformanceProfile {
        let empty_load_bound = BALLAST_DRAFT_FRACTION * vessel.design_draft;
        let full_load_bound = LADEN_DRAFT_FRACTION * vessel.design_draft;
        let min_sog = MIN_SPEED_FRACTION * vessel.design_speed;

        let mut ballast_sum = 0.0;
        let mut ballast_count = 0u64;
        let mut laden_sum = 0.0;
        let mut laden_count = 0u64;
        let mut excluded = 0u64;

        for point in points {
            let observation = point
                .wind_motion
                .as_ref()
                .map(|w| w.level)
                .zip(point.wave.as_ref().and_then(|w| w.wave_height))
                .zip(point.track.sog.zip(point.track.draught));
            let Some(((wind_level, wave_height), (sog, draught))) = observation else {
                excluded += 1;
                continue;
            };

            let good_weather =
                wind_level <= MAX_GOOD_WIND_LEVEL && wave_height <= MAX_GOOD_WAVE_HEIGHT;
            if !good_weather || sog < min_sog {
                continue;
            }

            if draught < empty_load_bound {
                ballast_sum += sog;
                ballast_count += 1;
            } else if draught > full_load_bound {
                laden_sum += sog;
                laden_count += 1;
            }
            // Draughts inside [empty_load_bound, full_load_bound] are
            // neither ballast nor laden and drop out here.
        }

        debug!(
            total = points.len(),
            excluded, ballast_count, laden_count, "aggregated performance profile"
        );

        let classified = ballast_count + laden_count;
        let avg_good_weather_speed = if classified > 0 {
            round2((ballast_sum + laden_sum) / classified as f64)
        } else {
            0.0
        };

        PerformanceProfile {
            avg_good_weather_speed,
            avg_ballast_speed: (ballast_count > 0)
                .then(|| round2(ballast_sum / ballast_count as f64)),
            avg_laden_speed: (laden_count > 0).then(|| round2(laden_sum / laden_count as f64)),
        }
    }
}

fn round2(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{TimeZone, Utc};
    use core_types::{EnvKey, ResampledTrackPoint, WaveRecord, WindMotion};

    fn observation(sog: f64, draught: f64, wind_level: u8, wave_height: f64) -> EnrichedTrackPoint {
        let time = Utc.with_ymd_and_hms(2024, 6, 1, 0, 0, 0).unwrap();
        let key = EnvKey { lat_index: 100, lon_index: 200, time };
        EnrichedTrackPoint {
            track: ResampledTrackPoint {
                lon: 122.5,
                lat: 31.2,
                sog: Some(sog),
                cog: Some(90.0),
                hdg: 90.0,
                draught: Some(draught),
                bucket_time: time,
            },
            wave_cell: key,
            wind_cell: key,
            flow_cell: key,
            wave: Some(WaveRecord { wave_height: Some(wave_height), ..Default::default() }),
            wind: None,
            flow: None,
            wind_motion: Some(WindMotion {
                speed: 5.0,
                angle: 180.0,
                level: wind_level,
                direction: "S".to_string(),
                speed_kts: 9.72,
            }),
            flow_motion: None,
        }
    }

    const VESSEL: VesselProfile = VesselProfile { design_draft: 12.0, design_speed: 14.0 };

    #[test]
    fn splits_by_loading_condition_and_skips_the_middle_band() {
        // Ballast bound 8.4, laden bound 9.6.
        let points = vec![
            observation(10.0, 7.0, 3, 1.0),
            observation(12.0, 7.0, 3, 1.0),
            observation(14.0, 11.0, 3, 1.0),
            observation(13.0, 9.0, 3, 1.0), // neither bucket
        ];
        let profile = PerformanceAggregator::new().aggregate(&points, &VESSEL);
        assert_eq!(profile.avg_ballast_speed, Some(11.0));
        assert_eq!(profile.avg_laden_speed, Some(14.0));
        // Over the 3 classified points, not all 4.
        assert_eq!(profile.avg_good_weather_speed, 12.0);
    }

    #[test]
    fn weather_and_speed_thresholds_filter_points() {
        let points = vec![
            observation(10.0, 7.0, 5, 1.0),  // wind too strong
            observation(10.0, 7.0, 4, 1.26), // waves too high
            observation(6.9, 7.0, 4, 1.25),  // below half design speed
            observation(7.0, 7.0, 4, 1.25),  // boundary point, kept
        ];
        let profile = PerformanceAggregator::new().aggregate(&points, &VESSEL);
        assert_eq!(profile.avg_ballast_speed, Some(7.0));
        assert_eq!(profile.avg_good_weather_speed, 7.0);
    }

    #[test]
    fn incomplete_observations_are_excluded_not_defaulted() {
        let mut no_wave = observation(10.0, 7.0, 3, 1.0);
        no_wave.wave = None;
        let mut no_wind = observation(10.0, 7.0, 3, 1.0);
        no_wind.wind_motion = None;
        let mut no_sog = observation(10.0, 7.0, 3, 1.0);
        no_sog.track.sog = None;
        let mut no_draught = observation(10.0, 7.0, 3, 1.0);
        no_draught.track.draught = None;

        let profile = PerformanceAggregator::new()
            .aggregate(&[no_wave, no_wind, no_sog, no_draught], &VESSEL);
        assert_eq!(profile.avg_good_weather_speed, 0.0);
        assert_eq!(profile.avg_ballast_speed, None);
        assert_eq!(profile.avg_laden_speed, None);
    }

    #[test]
    fn empty_buckets_are_omitted_from_json() {
        let points = vec![observation(10.0, 7.0, 3, 1.0)];
        let profile = PerformanceAggregator::new().aggregate(&points, &VESSEL);
        let json = serde_json::to_value(&profile).unwrap();
        assert_eq!(json["avg_good_weather_speed"], 10.0);
        assert_eq!(json["avg_ballast_speed"], 10.0);
        assert!(json.get("avg_laden_speed").is_none());
    }

    #[test]
    fn averages_round_to_two_decimals() {
        let points = vec![
            observation(10.0, 7.0, 3, 1.0),
            observation(10.1, 7.0, 3, 1.0),
            observation(10.1, 7.0, 3, 1.0),
        ];
        let profile = PerformanceAggregator::new().aggregate(&points, &VESSEL);
        assert_eq!(profile.avg_ballast_speed, Some(10.07));
    }
}
