use std::fmt;

use serde::{Deserialize, Serialize};

use crate::metrics::ThrowMetrics;

/// Supported exercise kinds.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Exercise {
    VerticalJump,
    BroadJump,
    SitAndReach,
    MedicineBallThrow,
    SitUps,
}

impl Exercise {
    pub const ALL: [Exercise; 5] = [
        Exercise::VerticalJump,
        Exercise::BroadJump,
        Exercise::SitAndReach,
        Exercise::MedicineBallThrow,
        Exercise::SitUps,
    ];

    pub fn name(self) -> &'static str {
        match self {
            Exercise::VerticalJump => "vertical_jump",
            Exercise::BroadJump => "broad_jump",
            Exercise::SitAndReach => "sit_and_reach",
            Exercise::MedicineBallThrow => "medicine_ball_throw",
            Exercise::SitUps => "sit_ups",
        }
    }
}

impl fmt::Display for Exercise {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Exercise-specific payload of one repetition.
///
/// Serializes as a flat `field -> number` object, e.g. `{"jump_height": 5.0}`.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Metrics {
    Throw(ThrowMetrics),
    JumpHeight { jump_height: f64 },
    JumpDistance { jump_distance: f64 },
    Reach { reach: f64 },
    /// Count-only exercises carry no payload beyond the increment.
    Empty {},
}

impl Metrics {
    /// Value a running "best" is tracked on, if the exercise has one.
    pub fn primary_value(&self) -> Option<f64> {
        match *self {
            Metrics::Throw(ref t) => Some(t.range),
            Metrics::JumpHeight { jump_height } => Some(jump_height),
            Metrics::JumpDistance { jump_distance } => Some(jump_distance),
            Metrics::Reach { reach } => Some(reach),
            Metrics::Empty {} => None,
        }
    }

    /// Flat list of `(field, value)` pairs in payload order.
    pub fn fields(&self) -> Vec<(&'static str, f64)> {
        match *self {
            Metrics::Throw(ref t) => vec![
                ("flight_time", t.flight_time),
                ("range", t.range),
                ("vx", t.vx),
                ("vy", t.vy),
                ("v", t.v),
                ("angle_deg", t.angle_deg),
                ("score", t.score),
            ],
            Metrics::JumpHeight { jump_height } => vec![("jump_height", jump_height)],
            Metrics::JumpDistance { jump_distance } => vec![("jump_distance", jump_distance)],
            Metrics::Reach { reach } => vec![("reach", reach)],
            Metrics::Empty {} => Vec::new(),
        }
    }
}

/// One completed repetition.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct RepetitionEvent {
    pub exercise: Exercise,
    /// Frame on which the cycle completed.
    pub frame: u64,
    /// Always 1; sinks add it to their running count.
    pub increment: u32,
    pub metrics: Metrics,
}

impl RepetitionEvent {
    pub fn new(exercise: Exercise, frame: u64, metrics: Metrics) -> Self {
        Self {
            exercise,
            frame,
            increment: 1,
            metrics,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn payloads_serialize_flat() {
        let ev = RepetitionEvent::new(
            Exercise::VerticalJump,
            42,
            Metrics::JumpHeight { jump_height: 5.0 },
        );
        let json = serde_json::to_value(ev).expect("json");
        assert_eq!(
            json,
            serde_json::json!({
                "exercise": "vertical_jump",
                "frame": 42,
                "increment": 1,
                "metrics": {"jump_height": 5.0}
            })
        );

        let empty = serde_json::to_value(Metrics::Empty {}).expect("json");
        assert_eq!(empty, serde_json::json!({}));
    }

    #[test]
    fn primary_value_follows_exercise_payload() {
        assert_eq!(Metrics::Reach { reach: 12.5 }.primary_value(), Some(12.5));
        assert_eq!(Metrics::Empty {}.primary_value(), None);
        assert_eq!(
            Metrics::JumpDistance { jump_distance: 2.0 }.fields(),
            vec![("jump_distance", 2.0)]
        );
    }
}
