use log::{debug, info, warn};
use rep_counter_core::{Calibration, Exercise, LandmarkSample, Point, RepetitionEvent};

#[cfg(feature = "tracing")]
use tracing::instrument;

use crate::{DetectError, Detector, Phase};

/// One athlete counting one exercise: a detector plus its calibration.
///
/// The session is the only place calibration changes, and only through
/// [`Session::calibrate`]. Detectors read it on every frame but never write it.
#[derive(Clone, Debug)]
pub struct Session {
    detector: Detector,
    calibration: Calibration,
}

impl Session {
    pub fn new(detector: Detector, calibration: Calibration) -> Self {
        Self {
            detector,
            calibration,
        }
    }

    #[inline]
    pub fn exercise(&self) -> Exercise {
        self.detector.exercise()
    }

    #[inline]
    pub fn phase(&self) -> Phase {
        self.detector.phase()
    }

    #[inline]
    pub fn detector(&self) -> &Detector {
        &self.detector
    }

    #[inline]
    pub fn calibration(&self) -> &Calibration {
        &self.calibration
    }

    /// Feed one frame. Returns the completed repetition, if any.
    #[cfg_attr(
        feature = "tracing",
        instrument(level = "trace", skip_all, fields(frame = ?sample.map(|s| s.frame)))
    )]
    pub fn process(&mut self, sample: Option<&LandmarkSample>) -> Option<RepetitionEvent> {
        let event = self.detector.update(sample, &self.calibration)?;
        info!(
            "{} repetition at frame {}: {:?}",
            event.exercise,
            event.frame,
            event.metrics.fields()
        );
        Some(event)
    }

    /// Capture the tracked position in `sample` as the new reference point.
    ///
    /// Repeating the action overwrites the previous reference. Any open cycle
    /// is dropped since it was measured against the old reference. Nothing
    /// changes when the tracked landmarks are not visible.
    ///
    /// Crossing and angle detectors never read a reference, so for them this
    /// is a no-op returning `Ok(None)`: an open throw or sit-up is kept and
    /// missing landmarks are not an error.
    pub fn calibrate(
        &mut self,
        sample: Option<&LandmarkSample>,
    ) -> Result<Option<Point>, DetectError> {
        if !self.detector.requires_reference() {
            debug!("{}: calibrate ignored, no reference used", self.exercise());
            return Ok(None);
        }
        let reference = sample
            .and_then(|s| self.detector.reference_point(s))
            .ok_or_else(|| {
                warn!("{}: calibrate ignored, landmarks not visible", self.exercise());
                DetectError::ReferenceUnavailable
            })?;
        let previous = self.calibration.set_reference(reference);
        self.detector.restart(&self.calibration);
        info!(
            "{}: reference set at ({:.1}, {:.1}) px{}",
            self.exercise(),
            reference.x,
            reference.y,
            if previous.is_some() { " (replaced)" } else { "" }
        );
        Ok(Some(reference))
    }

    /// Abandon any open cycle. Calibration is kept.
    ///
    /// A displacement detector then waits for the athlete to come back to
    /// the reference before it counts again.
    pub fn reset(&mut self) {
        self.detector.reset();
        info!("{}: reset", self.exercise());
    }
}
