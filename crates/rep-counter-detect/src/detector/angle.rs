use rep_counter_core::{joint_angle, Exercise, LandmarkSample, Metrics, Point, RepetitionEvent};

use super::Phase;
use crate::params::AngleParams;
use crate::tracking::Smoother;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum State {
    Down,
    Up,
}

/// Sit-up detector.
#[derive(Clone, Debug)]
pub struct AngleDetector {
    exercise: Exercise,
    params: AngleParams,
    state: State,
    smoother: Smoother,
    last_angle: Option<f64>,
}

impl AngleDetector {
    pub(crate) fn new(exercise: Exercise, params: AngleParams) -> Self {
        let smoother = Smoother::new(params.smoothing);
        Self {
            exercise,
            params,
            state: State::Down,
            smoother,
            last_angle: None,
        }
    }

    #[inline]
    pub fn exercise(&self) -> Exercise {
        self.exercise
    }

    #[inline]
    pub fn params(&self) -> &AngleParams {
        &self.params
    }

    pub fn phase(&self) -> Phase {
        match self.state {
            State::Down => Phase::Down,
            State::Up => Phase::Up,
        }
    }

    /// Joint angle seen on the last observed frame, after smoothing.
    pub fn last_angle(&self) -> Option<f64> {
        self.last_angle
    }

    pub(crate) fn reference_point(&self, sample: &LandmarkSample) -> Option<Point> {
        sample.get(self.params.gate.landmark)
    }

    pub(crate) fn reset(&mut self) {
        self.state = State::Down;
        self.smoother.reset();
        self.last_angle = None;
    }

    fn gate_value(&self, sample: &LandmarkSample) -> Option<f64> {
        let gate = &self.params.gate;
        let value = gate.axis.project(&sample.get(gate.landmark)?);
        match gate.anchor {
            Some(anchor) => Some(value - gate.axis.project(&sample.get(anchor)?)),
            None => Some(value),
        }
    }

    pub(crate) fn update(&mut self, sample: Option<&LandmarkSample>) -> Option<RepetitionEvent> {
        let sample = sample?;
        let gate_up = self.gate_value(sample)? < self.params.gate.up_below_px;
        let [a, vertex, c] = self.params.joint;
        let raw = joint_angle(&sample.get(a)?, &sample.get(vertex)?, &sample.get(c)?)?;
        let angle = self.smoother.filter(raw);
        self.last_angle = Some(angle);

        match self.state {
            State::Down if angle < self.params.lower_angle_deg && gate_up => {
                self.state = State::Up;
                None
            }
            State::Up if angle > self.params.upper_angle_deg && !gate_up => {
                self.state = State::Down;
                Some(RepetitionEvent::new(
                    self.exercise,
                    sample.frame,
                    Metrics::Empty {},
                ))
            }
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::Detector;
    use rep_counter_core::{Calibration, Landmark};

    /// Hip at (400, 600), knee at (500, 500); only the shoulder moves.
    fn body(frame: u64, shoulder_x: f64, shoulder_y: f64) -> LandmarkSample {
        LandmarkSample::new(frame)
            .with(Landmark::LeftShoulder, shoulder_x, shoulder_y)
            .with(Landmark::LeftHip, 400.0, 600.0)
            .with(Landmark::LeftKnee, 500.0, 500.0)
    }

    fn lying(frame: u64) -> LandmarkSample {
        body(frame, 200.0, 600.0)
    }

    fn sitting(frame: u64) -> LandmarkSample {
        body(frame, 450.0, 400.0)
    }

    fn sit_ups() -> Detector {
        Detector::for_exercise(Exercise::SitUps).expect("detector")
    }

    #[test]
    fn full_cycle_counts_one_repetition() {
        let mut det = sit_ups();
        let cal = Calibration::default();
        assert_eq!(det.phase(), Phase::Down);

        assert!(det.update(Some(&lying(0)), &cal).is_none());
        assert!(det.update(Some(&sitting(1)), &cal).is_none());
        assert_eq!(det.phase(), Phase::Up);

        let ev = det.update(Some(&lying(2)), &cal).expect("repetition");
        assert_eq!(ev.increment, 1);
        assert_eq!(ev.metrics, Metrics::Empty {});
        assert_eq!(det.phase(), Phase::Down);

        assert!(det.update(Some(&lying(3)), &cal).is_none());
    }

    #[test]
    fn angle_without_position_gate_does_not_count() {
        let mut det = sit_ups();
        let cal = Calibration::default();
        // Shoulder folds towards the knee but stays at hip height.
        let folded = body(1, 450.0, 560.0);
        for frame in 0..3 {
            det.update(Some(&lying(frame * 2)), &cal);
            assert!(det.update(Some(&folded), &cal).is_none());
            assert_eq!(det.phase(), Phase::Down);
        }
    }

    #[test]
    fn up_phase_needs_wide_angle_to_return() {
        let mut det = sit_ups();
        let cal = Calibration::default();
        det.update(Some(&sitting(0)), &cal);
        assert_eq!(det.phase(), Phase::Up);

        // ~98 degrees at the hip: not open enough yet.
        assert!(det.update(Some(&body(1, 200.0, 450.0)), &cal).is_none());
        assert_eq!(det.phase(), Phase::Up);
        assert!(det.update(Some(&lying(2)), &cal).is_some());
    }

    #[test]
    fn degenerate_limb_holds_phase() {
        let mut det = sit_ups();
        let cal = Calibration::default();
        det.update(Some(&sitting(0)), &cal);
        let collapsed = LandmarkSample::new(1)
            .with(Landmark::LeftShoulder, 200.0, 600.0)
            .with(Landmark::LeftHip, 400.0, 600.0)
            .with(Landmark::LeftKnee, 400.0, 600.0);
        assert!(det.update(Some(&collapsed), &cal).is_none());
        assert_eq!(det.phase(), Phase::Up);
    }

    #[test]
    fn reset_returns_to_down() {
        let mut det = sit_ups();
        let cal = Calibration::default();
        det.update(Some(&sitting(0)), &cal);
        det.reset();
        assert_eq!(det.phase(), Phase::Down);
        assert!(det.update(Some(&lying(1)), &cal).is_none());
    }
}
