//! # Seaperf Track Resampling
//!
//! Layer 1, pure logic: turns a raw, unordered AIS track into a clean
//! 3-hour-cadence sequence that can be joined against the environmental
//! tables (which are published on a 3-hourly grid).
//!
//! Resampling is two-stage: an hourly dedup pass that thins burst
//! reporting, then alignment into 3-hour UTC buckets where the earliest
//! observation in each bucket wins. Both passes keep points rather than
//! interpolating; nothing here invents positions.

pub mod error;

pub use error::TrackError;

use chrono::{DateTime, Duration, NaiveDateTime, NaiveTime, TimeZone, Timelike, Utc};
use core_types::{ResampledTrackPoint, TrackPoint};
use std::collections::BTreeMap;
use tracing::debug;

/// Minimum spacing kept by the dedup pass.
const DEDUP_INTERVAL_SECS: i64 = 3600;

/// Bucket width of the environmental tables.
const BUCKET_HOURS: i64 = 3;

/// The track source wire format for timestamps.
const POSTIME_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

/// Normalizes a naive track-source timestamp, which carries no zone marker
/// and is understood to be UTC+8, into a UTC instant. Every track-source
/// adapter must route `postime` through this before building a
/// [`TrackPoint`].
pub fn postime_to_utc(local: NaiveDateTime) -> DateTime<Utc> {
    Utc.from_utc_datetime(&(local - Duration::hours(8)))
}

/// The inverse of [`postime_to_utc`]: renders a UTC instant in the track
/// source's naive UTC+8 representation. Window bounds pushed down to the
/// store must go through this, or the filter selects the wrong 8 hours.
pub fn utc_to_postime(t: DateTime<Utc>) -> NaiveDateTime {
    (t + Duration::hours(8)).naive_utc()
}

/// Parses a track-source timestamp string into a UTC instant.
pub fn parse_postime(s: &str) -> Result<DateTime<Utc>, TrackError> {
    let local = NaiveDateTime::parse_from_str(s, POSTIME_FORMAT)?;
    Ok(postime_to_utc(local))
}

/// Rounds a timestamp's hour to the nearest multiple of 3 and zeroes the
/// minutes and seconds. Hour 23 rounds to 24, which rolls into the next
/// day's 00 bucket.
fn align_to_bucket(t: DateTime<Utc>) -> DateTime<Utc> {
    let rounded_hour = ((t.hour() as f64) / BUCKET_HOURS as f64).round() as i64 * BUCKET_HOURS;
    let midnight = Utc.from_utc_datetime(&t.date_naive().and_time(NaiveTime::MIN));
    midnight + Duration::hours(rounded_hour)
}

/// Deduplicates and time-aligns a raw track to the 3-hour cadence.
///
/// 1. Stable sort by `postime`.
/// 2. Hourly dedup: keep the first point, then only points at least
///    3600 s after the last kept point.
/// 3. 3-hour UTC bucket alignment, first point wins per bucket. Later
///    points mapping to an occupied bucket are discarded, which biases
///    toward the earliest observation in each window.
/// 4. Output ordered by bucket key, heading backfilled from `cog` else `0`.
///
/// An empty track yields an empty result. Resampling its own output is a
/// no-op.
pub fn resample(mut points: Vec<TrackPoint>) -> Vec<ResampledTrackPoint> {
    let raw_count = points.len();
    points.sort_by_key(|p| p.postime);

    let mut last_kept: Option<DateTime<Utc>> = None;
    let mut buckets: BTreeMap<DateTime<Utc>, ResampledTrackPoint> = BTreeMap::new();

    for point in points {
        let due = last_kept
            .is_none_or(|t| (point.postime - t).num_seconds() >= DEDUP_INTERVAL_SECS);
        if !due {
            continue;
        }
        last_kept = Some(point.postime);

        let bucket_time = align_to_bucket(point.postime);
        buckets.entry(bucket_time).or_insert_with(|| ResampledTrackPoint {
            lon: point.lon,
            lat: point.lat,
            sog: point.sog,
            cog: point.cog,
            hdg: point.hdg.or(point.cog).unwrap_or(0.0),
            draught: point.draught,
            bucket_time,
        });
    }

    debug!(raw = raw_count, resampled = buckets.len(), "resampled track");
    buckets.into_values().collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn point(postime: &str, sog: f64) -> TrackPoint {
        TrackPoint {
            lon: 122.5,
            lat: 31.2,
            sog: Some(sog),
            cog: Some(90.0),
            hdg: Some(88.0),
            draught: Some(8.0),
            postime: format!("{postime}+00:00").parse().unwrap(),
        }
    }

    #[test]
    fn parse_postime_applies_utc8_offset() {
        let t = parse_postime("2024-06-01 08:00:00").unwrap();
        assert_eq!(t, "2024-06-01T00:00:00+00:00".parse::<DateTime<Utc>>().unwrap());
    }

    #[test]
    fn postime_conversion_round_trips() {
        let t: DateTime<Utc> = "2024-06-01T00:00:00+00:00".parse().unwrap();
        assert_eq!(utc_to_postime(t).to_string(), "2024-06-01 08:00:00");
        assert_eq!(postime_to_utc(utc_to_postime(t)), t);
    }

    #[test]
    fn wire_timestamps_land_in_utc_buckets() {
        // A source row stamped 08:00 local is midnight UTC; without the
        // offset it would land in the 09:00 bucket and miss every
        // environmental row.
        let mut p = point("2024-06-01 00:00:00", 10.0);
        p.postime = parse_postime("2024-06-01 08:00:00").unwrap();
        let out = resample(vec![p]);
        assert_eq!(
            out[0].bucket_time,
            "2024-06-01T00:00:00+00:00".parse::<DateTime<Utc>>().unwrap()
        );
    }

    #[test]
    fn parse_postime_rejects_garbage() {
        assert!(parse_postime("not a time").is_err());
    }

    #[test]
    fn empty_track_yields_empty_result() {
        assert!(resample(Vec::new()).is_empty());
    }

    #[test]
    fn sorts_before_deduping() {
        let out = resample(vec![
            point("2024-06-01 06:10:00", 12.0),
            point("2024-06-01 00:10:00", 10.0),
            point("2024-06-01 03:10:00", 11.0),
        ]);
        let sogs: Vec<_> = out.iter().map(|p| p.sog.unwrap()).collect();
        assert_eq!(sogs, vec![10.0, 11.0, 12.0]);
    }

    #[test]
    fn hourly_dedup_keeps_first_and_spaced_points() {
        // Two points 30 minutes apart: the second is dropped before
        // bucketing even gets to see it.
        let out = resample(vec![
            point("2024-06-01 00:00:00", 10.0),
            point("2024-06-01 00:30:00", 99.0),
            point("2024-06-01 01:00:00", 11.0),
        ]);
        // 00:00 and 01:00 survive dedup but land in buckets 00 and 00/03.
        // 01:00 rounds to bucket 00, already taken, so one point remains.
        assert_eq!(out.len(), 1);
        assert_eq!(out[0].sog, Some(10.0));
    }

    #[test]
    fn first_point_wins_per_bucket() {
        let out = resample(vec![
            point("2024-06-01 02:00:00", 10.0),
            point("2024-06-01 03:30:00", 20.0),
        ]);
        // Both round to the 03:00 bucket; the earlier observation wins.
        assert_eq!(out.len(), 1);
        assert_eq!(out[0].sog, Some(10.0));
        assert_eq!(
            out[0].bucket_time,
            "2024-06-01T03:00:00+00:00".parse::<DateTime<Utc>>().unwrap()
        );
    }

    #[test]
    fn hour_23_rolls_into_next_day() {
        let out = resample(vec![point("2024-06-01 23:10:00", 10.0)]);
        assert_eq!(
            out[0].bucket_time,
            "2024-06-02T00:00:00+00:00".parse::<DateTime<Utc>>().unwrap()
        );
    }

    #[test]
    fn heading_backfills_from_cog_then_zero() {
        let mut a = point("2024-06-01 00:00:00", 10.0);
        a.hdg = None;
        let mut b = point("2024-06-01 06:00:00", 10.0);
        b.hdg = None;
        b.cog = None;
        let out = resample(vec![a, b]);
        assert_eq!(out[0].hdg, 90.0);
        assert_eq!(out[1].hdg, 0.0);
    }

    #[test]
    fn resampling_is_idempotent() {
        let first = resample(vec![
            point("2024-06-01 00:20:00", 10.0),
            point("2024-06-01 01:10:00", 11.0),
            point("2024-06-01 05:40:00", 12.0),
            point("2024-06-01 11:55:00", 13.0),
        ]);
        let again = resample(
            first
                .iter()
                .map(|p| TrackPoint {
                    lon: p.lon,
                    lat: p.lat,
                    sog: p.sog,
                    cog: p.cog,
                    hdg: Some(p.hdg),
                    draught: p.draught,
                    postime: p.bucket_time,
                })
                .collect(),
        );
        assert_eq!(first, again);
    }
}
