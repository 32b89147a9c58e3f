//! Per-exercise repetition state machines.
//!
//! Each family keeps its phase as a private tagged enum and advances it in a
//! single `update` step per frame. [`Detector`] dispatches over the three
//! families and is what sessions hold.

mod angle;
mod crossing;
mod displacement;

use std::fmt;

use log::debug;
use rep_counter_core::{Calibration, Exercise, LandmarkSample, Point, RepetitionEvent};
use serde::{Deserialize, Serialize};

use crate::{DetectError, DetectorParams};

pub use angle::AngleDetector;
pub use crossing::CrossingDetector;
pub use displacement::DisplacementDetector;

/// Externally visible phase of a detector.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Phase {
    /// Waiting for the reference point to be set.
    AwaitingCalibration,
    Idle,
    InFlight,
    /// A displacement cycle completed away from the reference.
    Landed,
    /// A throw was released and has not landed yet.
    Released,
    Down,
    Up,
}

impl Phase {
    pub fn name(self) -> &'static str {
        match self {
            Phase::AwaitingCalibration => "awaiting_calibration",
            Phase::Idle => "idle",
            Phase::InFlight => "in_flight",
            Phase::Landed => "landed",
            Phase::Released => "released",
            Phase::Down => "down",
            Phase::Up => "up",
        }
    }
}

impl fmt::Display for Phase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Repetition detector for one exercise.
#[derive(Clone, Debug)]
pub enum Detector {
    Displacement(DisplacementDetector),
    Crossing(CrossingDetector),
    Angle(AngleDetector),
}

impl Detector {
    /// Build a detector, validating `params` against `exercise`.
    pub fn new(exercise: Exercise, params: DetectorParams) -> Result<Self, DetectError> {
        params.validate(exercise)?;
        Ok(match params {
            DetectorParams::Displacement(p) => {
                Detector::Displacement(DisplacementDetector::new(exercise, p))
            }
            DetectorParams::Crossing(p) => Detector::Crossing(CrossingDetector::new(exercise, p)),
            DetectorParams::Angle(p) => Detector::Angle(AngleDetector::new(exercise, p)),
        })
    }

    /// Detector with the stock parameters for `exercise`.
    pub fn for_exercise(exercise: Exercise) -> Result<Self, DetectError> {
        Self::new(exercise, DetectorParams::for_exercise(exercise))
    }

    pub fn exercise(&self) -> Exercise {
        match self {
            Detector::Displacement(d) => d.exercise(),
            Detector::Crossing(d) => d.exercise(),
            Detector::Angle(d) => d.exercise(),
        }
    }

    pub fn phase(&self) -> Phase {
        match self {
            Detector::Displacement(d) => d.phase(),
            Detector::Crossing(d) => d.phase(),
            Detector::Angle(d) => d.phase(),
        }
    }

    pub fn params(&self) -> DetectorParams {
        match self {
            Detector::Displacement(d) => DetectorParams::Displacement(d.params().clone()),
            Detector::Crossing(d) => DetectorParams::Crossing(d.params().clone()),
            Detector::Angle(d) => DetectorParams::Angle(d.params().clone()),
        }
    }

    /// Whether cycles are gated on a calibration reference point.
    pub fn requires_reference(&self) -> bool {
        matches!(self, Detector::Displacement(_))
    }

    /// Position a calibrate action captures from `sample`.
    pub fn reference_point(&self, sample: &LandmarkSample) -> Option<Point> {
        match self {
            Detector::Displacement(d) => d.reference_point(sample),
            Detector::Crossing(d) => d.reference_point(sample),
            Detector::Angle(d) => d.reference_point(sample),
        }
    }

    /// Advance by one frame.
    ///
    /// `sample = None` means no landmarks were found this frame; the phase is
    /// held and no event is produced. At most one event is returned per call.
    pub fn update(
        &mut self,
        sample: Option<&LandmarkSample>,
        calibration: &Calibration,
    ) -> Option<RepetitionEvent> {
        let before = self.phase();
        let event = match self {
            Detector::Displacement(d) => d.update(sample, calibration),
            Detector::Crossing(d) => d.update(sample, calibration),
            Detector::Angle(d) => d.update(sample),
        };
        let after = self.phase();
        if before != after {
            debug!(
                "{} {} -> {} at frame {}",
                self.exercise(),
                before,
                after,
                sample.map_or_else(|| "-".to_string(), |s| s.frame.to_string())
            );
        }
        event
    }

    /// Drop any open cycle and smoothing history. Calibration is untouched.
    ///
    /// A displacement detector does not start a new cycle until the tracked
    /// point has been seen back inside the entry margin, so an athlete who is
    /// still standing past the line is not counted again.
    pub fn reset(&mut self) {
        match self {
            Detector::Displacement(d) => d.reset(),
            Detector::Crossing(d) => d.reset(),
            Detector::Angle(d) => d.reset(),
        }
    }

    /// Drop any open cycle after `calibration` gained a reference captured at
    /// the athlete's current position. The detector is armed right away.
    pub fn restart(&mut self, calibration: &Calibration) {
        let before = self.phase();
        match self {
            Detector::Displacement(d) => d.restart(calibration),
            Detector::Crossing(d) => d.reset(),
            Detector::Angle(d) => d.reset(),
        }
        if before != self.phase() {
            debug!("{} {} -> {} on restart", self.exercise(), before, self.phase());
        }
    }
}
