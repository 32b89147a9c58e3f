use rep_counter_core::{
    metrics, Calibration, Exercise, LandmarkSample, Metrics, Point, RepetitionEvent,
    TrajectoryPoint,
};

use super::Phase;
use crate::params::CrossingParams;
use crate::tracking::Smoother;

#[derive(Clone, Copy, Debug, PartialEq)]
enum State {
    Idle,
    Released { release: TrajectoryPoint },
}

/// Medicine-ball throw detector.
#[derive(Clone, Debug)]
pub struct CrossingDetector {
    exercise: Exercise,
    params: CrossingParams,
    state: State,
    smoother: Smoother,
}

impl CrossingDetector {
    pub(crate) fn new(exercise: Exercise, params: CrossingParams) -> Self {
        let smoother = Smoother::new(params.smoothing);
        Self {
            exercise,
            params,
            state: State::Idle,
            smoother,
        }
    }

    #[inline]
    pub fn exercise(&self) -> Exercise {
        self.exercise
    }

    #[inline]
    pub fn params(&self) -> &CrossingParams {
        &self.params
    }

    pub fn phase(&self) -> Phase {
        match self.state {
            State::Idle => Phase::Idle,
            State::Released { .. } => Phase::Released,
        }
    }

    /// Release sample of the open throw, if any.
    pub fn release(&self) -> Option<TrajectoryPoint> {
        match self.state {
            State::Released { release } => Some(release),
            State::Idle => None,
        }
    }

    pub(crate) fn reference_point(&self, sample: &LandmarkSample) -> Option<Point> {
        self.params.tracked.resolve(sample)
    }

    pub(crate) fn reset(&mut self) {
        self.state = State::Idle;
        self.smoother.reset();
    }

    pub(crate) fn update(
        &mut self,
        sample: Option<&LandmarkSample>,
        calibration: &Calibration,
    ) -> Option<RepetitionEvent> {
        let sample = sample?;
        let position = self.params.tracked.resolve(sample)?;
        let value = self.smoother.filter(self.params.axis.project(&position));
        let travel = self.params.travel();
        let here = TrajectoryPoint {
            frame: sample.frame,
            position,
        };

        match self.state {
            State::Idle => {
                // Released once the wrist is behind the release line, i.e. on
                // the side opposite to the direction of travel.
                if travel.beyond(self.params.release_line(), value) < 0.0 {
                    self.state = State::Released { release: here };
                }
                None
            }
            State::Released { release } => {
                if travel.beyond(self.params.landing_line(), value) <= 0.0 {
                    return None;
                }
                self.state = State::Idle;
                let throw = metrics::throw_metrics(
                    &release,
                    &here,
                    calibration.pixels_per_unit(),
                    self.params.fps,
                    self.params.rounding,
                );
                Some(RepetitionEvent::new(
                    self.exercise,
                    sample.frame,
                    Metrics::Throw(throw),
                ))
            }
        }
    }
}
