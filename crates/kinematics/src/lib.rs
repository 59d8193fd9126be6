//! # Seaperf Vector Kinematics
//!
//! Layer 1, pure logic: turns the raw U/V vector components carried by the
//! wind and current records into scalar speed, direction, Beaufort level
//! and the downstream/upstream classification.
//!
//! The wind and current angle formulas deliberately differ. Wind uses the
//! meteorological "blows from" convention, rotated into a compass bearing
//! by a ±180° fold; currents use the oceanographic "sets toward"
//! convention with no fold. Both formulas are contracts with the upstream
//! datasets and must not be unified.

use core_types::{EnrichedTrackPoint, FlowMotion, WindMotion};

/// Upper bounds (m/s, inclusive) of Beaufort levels 0..=11; anything above
/// the last bound is level 12.
pub const BEAUFORT_BOUNDS: [f64; 12] = [
    0.2, 1.5, 3.3, 5.4, 7.9, 10.7, 13.8, 17.1, 20.7, 24.4, 28.4, 32.6,
];

/// The 16-point compass rose, 22.5° per sector, N centred on 0°.
pub const COMPASS_POINTS: [&str; 16] = [
    "N", "NNE", "NE", "ENE", "E", "ESE", "SE", "SSE", "S", "SSW", "SW", "WSW", "W", "WNW", "NW",
    "NNW",
];

/// m/s to knots.
pub const MS_TO_KNOTS: f64 = 1.94384449;

/// Headings within this many degrees of the current direction count as
/// downstream sailing (inclusive).
pub const DOWNSTREAM_MAX_DIFF: f64 = 45.0;

/// Beaufort level for a wind speed in m/s, 0..=12. Band upper bounds are
/// inclusive: 0.2 m/s is still level 0, 32.6 m/s is still level 11.
pub fn beaufort_level(speed: f64) -> u8 {
    BEAUFORT_BOUNDS
        .iter()
        .position(|bound| speed <= *bound)
        .unwrap_or(12) as u8
}

/// 16-point compass label for an angle in degrees. Negative angles are
/// folded into [0, 360) first.
pub fn compass_point(angle: f64) -> &'static str {
    let folded = angle.rem_euclid(360.0);
    // Ties round to even to match the sector table the datasets were
    // labelled with (0° is N, not NNE).
    let index = ((folded + 11.25) / 22.5).round_ties_even() as usize % 16;
    COMPASS_POINTS[index]
}

/// Wind kinematics from U/V components in m/s.
///
/// The raw `atan2(u, v)` angle points where the wind blows *to*; the ±180°
/// fold turns it into the bearing it blows *from*. Missing or non-finite
/// components yield a calm record (speed and angle `0.0`), never a panic.
pub fn wind_motion(u: Option<f64>, v: Option<f64>) -> WindMotion {
    let Some((u, v)) = finite_components(u, v) else {
        return WindMotion {
            speed: 0.0,
            angle: 0.0,
            level: 0,
            direction: compass_point(0.0).to_string(),
            speed_kts: 0.0,
        };
    };
    let speed = (u * u + v * v).sqrt();
    let raw = u.atan2(v).to_degrees();
    let angle = if raw > 0.0 { raw - 180.0 } else { raw + 180.0 };
    WindMotion {
        speed,
        angle,
        level: beaufort_level(speed),
        direction: compass_point(angle).to_string(),
        speed_kts: speed * MS_TO_KNOTS,
    }
}

/// Current kinematics from U/V components in m/s, classified against the
/// ship's heading.
///
/// No ±180° fold here: the oceanographic angle already points where the
/// water sets toward. A negative angle is folded into [0, 360) only when
/// the current actually moves; a zero-speed current gets angle `0.0`.
pub fn flow_motion(u: Option<f64>, v: Option<f64>, heading: f64) -> FlowMotion {
    let Some((u, v)) = finite_components(u, v) else {
        return FlowMotion {
            speed: 0.0,
            angle: 0.0,
            direction: compass_point(0.0).to_string(),
            speed_kts: 0.0,
            downstream: false,
        };
    };
    let speed = (u * u + v * v).sqrt();
    let mut angle = u.atan2(v).to_degrees();
    if speed > 0.0 {
        if angle < 0.0 {
            angle += 360.0;
        }
    } else {
        angle = 0.0;
    }
    FlowMotion {
        speed,
        angle,
        direction: compass_point(angle).to_string(),
        speed_kts: speed * MS_TO_KNOTS,
        downstream: is_downstream(heading, u, v),
    }
}

/// Both components present and finite, or nothing.
fn finite_components(u: Option<f64>, v: Option<f64>) -> Option<(f64, f64)> {
    match (u, v) {
        (Some(u), Some(v)) if u.is_finite() && v.is_finite() => Some((u, v)),
        _ => None,
    }
}

/// True when the ship's heading lies within 45° (inclusive) of the
/// direction the current sets toward.
pub fn is_downstream(heading: f64, u: f64, v: f64) -> bool {
    let current_angle = u.atan2(v).to_degrees().rem_euclid(360.0);
    let diff = (heading - current_angle).abs();
    let min_diff = diff.min(360.0 - diff);
    min_diff <= DOWNSTREAM_MAX_DIFF
}

/// Fills the motion slots of a joined point from whatever records it
/// carries. A point without a wind (or flow) record keeps that slot `None`
/// and is excluded at aggregation time.
pub fn enrich(mut point: EnrichedTrackPoint) -> EnrichedTrackPoint {
    if let Some(wind) = &point.wind {
        point.wind_motion = Some(wind_motion(wind.u_wind, wind.v_wind));
    }
    if let Some(flow) = &point.flow {
        point.flow_motion = Some(flow_motion(flow.u_flow, flow.v_flow, point.track.hdg));
    }
    point
}
