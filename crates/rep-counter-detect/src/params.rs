use rep_counter_core::{Axis, Exercise, Landmark, ScoreRounding};
use serde::{Deserialize, Serialize};

use crate::tracking::{Direction, SmoothingParams, TrackedPoint};
use crate::DetectError;

/// How a displacement cycle decides that the movement is over.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Finish {
    /// The tracked coordinate falls back inside the exit margin (hand comes
    /// down after a jump, arms pulled back after a reach).
    ReturnInside,
    /// The tracked coordinate stops advancing away from the reference (feet
    /// stop moving forward after a broad jump).
    StopAdvancing,
}

/// Displacement detector: a single coordinate leaves the reference by more
/// than a margin, its extreme value is recorded, and the cycle ends according
/// to [`Finish`].
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct DisplacementParams {
    pub tracked: TrackedPoint,
    pub axis: Axis,
    pub direction: Direction,
    /// Distance past the reference, in pixels, that starts a cycle.
    pub entry_margin_px: f64,
    /// Distance past the reference below which a [`Finish::ReturnInside`]
    /// cycle ends. Defaults to `entry_margin_px`; a smaller value adds
    /// hysteresis.
    #[serde(default)]
    pub exit_margin_px: Option<f64>,
    pub finish: Finish,
    #[serde(default)]
    pub smoothing: Option<SmoothingParams>,
}

impl DisplacementParams {
    #[inline]
    pub fn exit_margin(&self) -> f64 {
        self.exit_margin_px.unwrap_or(self.entry_margin_px)
    }
}

/// Two-line crossing detector: release when the tracked coordinate passes
/// `release_fraction` of the frame extent, landing when it then passes
/// `landing_fraction` on the opposite side.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct CrossingParams {
    pub tracked: TrackedPoint,
    pub axis: Axis,
    /// Frame size along `axis`, in pixels.
    pub frame_extent_px: f64,
    pub release_fraction: f64,
    pub landing_fraction: f64,
    /// Camera frame rate used to turn frame counts into seconds.
    pub fps: f64,
    #[serde(default)]
    pub rounding: ScoreRounding,
    #[serde(default)]
    pub smoothing: Option<SmoothingParams>,
}

impl CrossingParams {
    #[inline]
    pub fn release_line(&self) -> f64 {
        self.release_fraction * self.frame_extent_px
    }

    #[inline]
    pub fn landing_line(&self) -> f64 {
        self.landing_fraction * self.frame_extent_px
    }

    /// Direction of travel from release towards landing.
    pub fn travel(&self) -> Direction {
        if self.landing_fraction < self.release_fraction {
            Direction::Decreasing
        } else {
            Direction::Increasing
        }
    }
}

/// Position condition paired with the joint angle in an angle cycle.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct PositionGate {
    pub landmark: Landmark,
    /// When set, the gate reads `landmark - anchor` instead of the absolute
    /// coordinate, which keeps it independent of where the athlete lies.
    #[serde(default)]
    pub anchor: Option<Landmark>,
    pub axis: Axis,
    /// The gate is "up" while the coordinate is below this value and "down"
    /// at or above it.
    pub up_below_px: f64,
}

/// Angle detector: a DOWN/UP cycle on the angle at the middle landmark of
/// `joint`, confirmed by a [`PositionGate`].
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct AngleParams {
    /// `[a, vertex, c]`; the angle is measured at `vertex`.
    pub joint: [Landmark; 3],
    /// `angle < lower` (with the gate up) is required to enter UP.
    pub lower_angle_deg: f64,
    /// `angle > upper` (with the gate down) is required to return to DOWN.
    pub upper_angle_deg: f64,
    pub gate: PositionGate,
    #[serde(default)]
    pub smoothing: Option<SmoothingParams>,
}

/// Parameters for one of the detector families.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(tag = "family", rename_all = "snake_case")]
pub enum DetectorParams {
    Displacement(DisplacementParams),
    Crossing(CrossingParams),
    Angle(AngleParams),
}

pub(crate) const DEFAULT_ENTRY_MARGIN_PX: f64 = 30.0;

impl DetectorParams {
    /// Stock configuration for an exercise.
    pub fn for_exercise(exercise: Exercise) -> Self {
        match exercise {
            Exercise::VerticalJump => DetectorParams::Displacement(DisplacementParams {
                tracked: TrackedPoint::single(Landmark::RightWrist),
                axis: Axis::Y,
                direction: Direction::Decreasing,
                entry_margin_px: DEFAULT_ENTRY_MARGIN_PX,
                exit_margin_px: None,
                finish: Finish::ReturnInside,
                smoothing: None,
            }),
            Exercise::BroadJump => DetectorParams::Displacement(DisplacementParams {
                tracked: TrackedPoint::Min {
                    landmarks: vec![Landmark::LeftAnkle, Landmark::RightAnkle],
                    axis: Axis::X,
                },
                axis: Axis::X,
                direction: Direction::Increasing,
                entry_margin_px: DEFAULT_ENTRY_MARGIN_PX,
                exit_margin_px: None,
                finish: Finish::StopAdvancing,
                smoothing: None,
            }),
            Exercise::SitAndReach => DetectorParams::Displacement(DisplacementParams {
                tracked: TrackedPoint::single(Landmark::RightWrist),
                axis: Axis::X,
                direction: Direction::Increasing,
                entry_margin_px: DEFAULT_ENTRY_MARGIN_PX,
                exit_margin_px: None,
                finish: Finish::ReturnInside,
                smoothing: None,
            }),
            Exercise::MedicineBallThrow => DetectorParams::Crossing(CrossingParams {
                tracked: TrackedPoint::single(Landmark::RightWrist),
                axis: Axis::X,
                frame_extent_px: 1280.0,
                release_fraction: 0.7,
                landing_fraction: 0.3,
                fps: 30.0,
                rounding: ScoreRounding::HalfToEven,
                smoothing: None,
            }),
            Exercise::SitUps => DetectorParams::Angle(AngleParams {
                joint: [Landmark::LeftShoulder, Landmark::LeftHip, Landmark::LeftKnee],
                lower_angle_deg: 70.0,
                upper_angle_deg: 120.0,
                gate: PositionGate {
                    landmark: Landmark::LeftShoulder,
                    anchor: Some(Landmark::LeftHip),
                    axis: Axis::Y,
                    up_below_px: -100.0,
                },
                smoothing: None,
            }),
        }
    }

    pub fn family(&self) -> &'static str {
        match self {
            DetectorParams::Displacement(_) => "displacement",
            DetectorParams::Crossing(_) => "crossing",
            DetectorParams::Angle(_) => "angle",
        }
    }

    /// Check that the family fits the exercise and every constant is usable.
    pub fn validate(&self, exercise: Exercise) -> Result<(), DetectError> {
        let fits = matches!(
            (exercise, self),
            (
                Exercise::VerticalJump | Exercise::BroadJump | Exercise::SitAndReach,
                DetectorParams::Displacement(_)
            ) | (Exercise::MedicineBallThrow, DetectorParams::Crossing(_))
                | (Exercise::SitUps, DetectorParams::Angle(_))
        );
        if !fits {
            return Err(DetectError::FamilyMismatch {
                exercise,
                family: self.family(),
            });
        }

        match self {
            DetectorParams::Displacement(p) => {
                non_empty("tracked", &p.tracked)?;
                selection_on_axis(&p.tracked, p.axis)?;
                non_negative("entry_margin_px", p.entry_margin_px)?;
                non_negative("exit_margin_px", p.exit_margin())?;
                if p.exit_margin() > p.entry_margin_px {
                    return Err(invalid(
                        "exit_margin_px",
                        format!(
                            "must not exceed entry_margin_px ({} > {})",
                            p.exit_margin(),
                            p.entry_margin_px
                        ),
                    ));
                }
                smoothing(p.smoothing)
            }
            DetectorParams::Crossing(p) => {
                non_empty("tracked", &p.tracked)?;
                selection_on_axis(&p.tracked, p.axis)?;
                positive("frame_extent_px", p.frame_extent_px)?;
                positive("fps", p.fps)?;
                fraction("release_fraction", p.release_fraction)?;
                fraction("landing_fraction", p.landing_fraction)?;
                if p.release_fraction == p.landing_fraction {
                    return Err(invalid(
                        "landing_fraction",
                        "must differ from release_fraction".to_string(),
                    ));
                }
                smoothing(p.smoothing)
            }
            DetectorParams::Angle(p) => {
                for (name, v) in [
                    ("lower_angle_deg", p.lower_angle_deg),
                    ("upper_angle_deg", p.upper_angle_deg),
                ] {
                    if !v.is_finite() || !(0.0..=180.0).contains(&v) {
                        return Err(invalid(name, format!("must lie in [0, 180] (got {v})")));
                    }
                }
                if p.lower_angle_deg >= p.upper_angle_deg {
                    return Err(invalid(
                        "lower_angle_deg",
                        format!(
                            "must be below upper_angle_deg ({} >= {})",
                            p.lower_angle_deg, p.upper_angle_deg
                        ),
                    ));
                }
                if !p.gate.up_below_px.is_finite() {
                    return Err(invalid("gate.up_below_px", "must be finite".to_string()));
                }
                smoothing(p.smoothing)
            }
        }
    }
}

fn invalid(name: &'static str, reason: String) -> DetectError {
    DetectError::InvalidParams { name, reason }
}

fn non_empty(name: &'static str, tracked: &TrackedPoint) -> Result<(), DetectError> {
    if tracked.is_empty() {
        return Err(invalid(name, "needs at least one landmark".to_string()));
    }
    Ok(())
}

/// A `Min`/`Max` selection must compare on the axis the detector projects.
fn selection_on_axis(tracked: &TrackedPoint, axis: Axis) -> Result<(), DetectError> {
    match tracked.selection_axis() {
        Some(selected) if selected != axis => Err(invalid(
            "tracked.axis",
            format!("selects on {selected:?} but the detector projects on {axis:?}"),
        )),
        _ => Ok(()),
    }
}

fn non_negative(name: &'static str, v: f64) -> Result<(), DetectError> {
    if !v.is_finite() || v < 0.0 {
        return Err(invalid(name, format!("must be finite and >= 0 (got {v})")));
    }
    Ok(())
}

fn positive(name: &'static str, v: f64) -> Result<(), DetectError> {
    if !v.is_finite() || v <= 0.0 {
        return Err(invalid(name, format!("must be finite and > 0 (got {v})")));
    }
    Ok(())
}

fn fraction(name: &'static str, v: f64) -> Result<(), DetectError> {
    if !v.is_finite() || !(0.0..=1.0).contains(&v) {
        return Err(invalid(name, format!("must lie in [0, 1] (got {v})")));
    }
    Ok(())
}

fn smoothing(params: Option<SmoothingParams>) -> Result<(), DetectError> {
    match params {
        Some(SmoothingParams { alpha }) if !(alpha > 0.0 && alpha <= 1.0) => Err(invalid(
            "smoothing.alpha",
            format!("must lie in (0, 1] (got {alpha})"),
        )),
        _ => Ok(()),
    }
}
