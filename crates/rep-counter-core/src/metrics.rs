//! Pure conversions from raw detector samples to physical quantities.
//!
//! Nothing here keeps state or performs I/O; detectors call these once per
//! completed repetition.

use serde::{Deserialize, Serialize};

use crate::Point;

/// Lower bound for the flight time used as a divisor (seconds).
pub const MIN_FLIGHT_TIME: f64 = 1e-6;

/// Distances below this bound are scored in steps of 10 units, above in steps of 50.
pub const FINE_SCORE_LIMIT: f64 = 100.0;

/// Rounding applied to the throw score bucket.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ScoreRounding {
    /// Banker's rounding: `9.5 -> 10`, `8.5 -> 8`.
    #[default]
    HalfToEven,
    /// Schoolbook rounding: `8.5 -> 9`.
    HalfAwayFromZero,
}

impl ScoreRounding {
    #[inline]
    pub fn round(self, v: f64) -> f64 {
        match self {
            ScoreRounding::HalfToEven => v.round_ties_even(),
            ScoreRounding::HalfAwayFromZero => v.round(),
        }
    }
}

/// One end of a throw trajectory.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct TrajectoryPoint {
    pub frame: u64,
    pub position: Point,
}

/// Payload of a completed throw.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct ThrowMetrics {
    /// Seconds between release and landing.
    pub flight_time: f64,
    /// Horizontal distance in physical units.
    pub range: f64,
    pub vx: f64,
    pub vy: f64,
    pub v: f64,
    /// Release angle, `atan2(vy, vx)` in degrees.
    pub angle_deg: f64,
    pub score: f64,
}

/// `|to - from| / pixels_per_unit`.
#[inline]
pub fn linear_distance(from_px: f64, to_px: f64, pixels_per_unit: f64) -> f64 {
    (to_px - from_px).abs() / pixels_per_unit
}

/// Score bucket for a throw distance.
///
/// Rounds to the nearest 10 units below [`FINE_SCORE_LIMIT`], otherwise to the
/// nearest 50 units.
pub fn score_bucket(distance: f64, rounding: ScoreRounding) -> f64 {
    let step = if distance < FINE_SCORE_LIMIT { 10.0 } else { 50.0 };
    rounding.round(distance / step) * step
}

/// Projectile metrics from the release and landing samples.
///
/// Velocities are in units per second; the flight time used as a divisor is
/// floored at [`MIN_FLIGHT_TIME`] so a same-frame landing stays finite.
pub fn throw_metrics(
    release: &TrajectoryPoint,
    landing: &TrajectoryPoint,
    pixels_per_unit: f64,
    fps: f64,
    rounding: ScoreRounding,
) -> ThrowMetrics {
    let frames = landing.frame.saturating_sub(release.frame) as f64;
    let flight_time = frames / fps;
    let range = linear_distance(release.position.x, landing.position.x, pixels_per_unit);

    let dt = flight_time.max(MIN_FLIGHT_TIME);
    let delta = landing.position - release.position;
    let vx = delta.x / pixels_per_unit / dt;
    let vy = delta.y / pixels_per_unit / dt;

    ThrowMetrics {
        flight_time,
        range,
        vx,
        vy,
        v: vx.hypot(vy),
        angle_deg: vy.atan2(vx).to_degrees(),
        score: score_bucket(range, rounding),
    }
}
