//! Landmark selection and per-frame scalar filtering shared by all detectors.

use rep_counter_core::{Axis, Landmark, LandmarkSample, Point};
use serde::{Deserialize, Serialize};

/// Which image position a detector follows.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(tag = "select", rename_all = "snake_case")]
pub enum TrackedPoint {
    Single { landmark: Landmark },
    /// Of several landmarks, the one with the smallest coordinate on `axis`
    /// (e.g. the rear-most ankle for a forward jump).
    Min { landmarks: Vec<Landmark>, axis: Axis },
    /// Of several landmarks, the one with the largest coordinate on `axis`.
    Max { landmarks: Vec<Landmark>, axis: Axis },
    Midpoint { landmarks: Vec<Landmark> },
}

impl TrackedPoint {
    pub fn single(landmark: Landmark) -> Self {
        TrackedPoint::Single { landmark }
    }

    /// Landmarks this selection reads.
    pub fn landmarks(&self) -> &[Landmark] {
        match self {
            TrackedPoint::Single { landmark } => std::slice::from_ref(landmark),
            TrackedPoint::Min { landmarks, .. }
            | TrackedPoint::Max { landmarks, .. }
            | TrackedPoint::Midpoint { landmarks } => landmarks,
        }
    }

    /// Resolve the tracked position in `sample`.
    ///
    /// All listed landmarks must be present; a partial observation counts as
    /// no observation.
    pub fn resolve(&self, sample: &LandmarkSample) -> Option<Point> {
        let mut points = Vec::with_capacity(self.landmarks().len());
        for &lm in self.landmarks() {
            points.push(sample.get(lm)?);
        }
        match self {
            TrackedPoint::Single { .. } => points.first().copied(),
            TrackedPoint::Min { axis, .. } => points
                .into_iter()
                .min_by(|a, b| axis.project(a).total_cmp(&axis.project(b))),
            TrackedPoint::Max { axis, .. } => points
                .into_iter()
                .max_by(|a, b| axis.project(a).total_cmp(&axis.project(b))),
            TrackedPoint::Midpoint { .. } => {
                if points.is_empty() {
                    return None;
                }
                let n = points.len() as f64;
                let (sx, sy) = points
                    .iter()
                    .fold((0.0, 0.0), |(sx, sy), p| (sx + p.x, sy + p.y));
                Some(Point::new(sx / n, sy / n))
            }
        }
    }

    pub(crate) fn is_empty(&self) -> bool {
        self.landmarks().is_empty()
    }

    /// Axis a `Min`/`Max` selection compares landmarks on.
    pub fn selection_axis(&self) -> Option<Axis> {
        match self {
            TrackedPoint::Min { axis, .. } | TrackedPoint::Max { axis, .. } => Some(*axis),
            TrackedPoint::Single { .. } | TrackedPoint::Midpoint { .. } => None,
        }
    }
}

/// Direction along an axis in which a movement counts as "away" from rest.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Direction {
    Increasing,
    /// Towards smaller coordinates, e.g. upwards in image space.
    Decreasing,
}

impl Direction {
    /// Signed distance of `value` beyond `origin` in this direction.
    #[inline]
    pub fn beyond(self, origin: f64, value: f64) -> f64 {
        match self {
            Direction::Increasing => value - origin,
            Direction::Decreasing => origin - value,
        }
    }
}

/// Exponential smoothing of the tracked scalar.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct SmoothingParams {
    /// Weight of the newest observation, in `(0, 1]`. `1.0` disables smoothing.
    pub alpha: f64,
}

#[derive(Clone, Debug)]
pub(crate) struct Smoother {
    alpha: f64,
    state: Option<f64>,
}

impl Smoother {
    pub(crate) fn new(params: Option<SmoothingParams>) -> Self {
        Self {
            alpha: params.map_or(1.0, |p| p.alpha),
            state: None,
        }
    }

    pub(crate) fn filter(&mut self, x: f64) -> f64 {
        let y = match self.state {
            Some(prev) => self.alpha * x + (1.0 - self.alpha) * prev,
            None => x,
        };
        self.state = Some(y);
        y
    }

    pub(crate) fn reset(&mut self) {
        self.state = None;
    }
}
