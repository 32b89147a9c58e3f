use rep_counter_core::{
    metrics, Calibration, Exercise, LandmarkSample, Metrics, Point, RepetitionEvent,
};

use super::Phase;
use crate::params::{DisplacementParams, Finish};
use crate::tracking::Smoother;

#[derive(Clone, Copy, Debug, PartialEq)]
enum State {
    AwaitingCalibration,
    Idle,
    /// `extremal` is the furthest coordinate seen since the cycle started.
    InFlight { extremal: f64 },
    /// Cycle reported but the athlete is still beyond the entry margin; a new
    /// cycle can only start after they come back to the reference.
    Landed,
}

/// Vertical jump, broad jump and sit-and-reach detector.
#[derive(Clone, Debug)]
pub struct DisplacementDetector {
    exercise: Exercise,
    params: DisplacementParams,
    state: State,
    /// Cleared by `reset`; a new cycle can only start once the athlete has
    /// been seen inside the entry margin again.
    armed: bool,
    smoother: Smoother,
}

impl DisplacementDetector {
    pub(crate) fn new(exercise: Exercise, params: DisplacementParams) -> Self {
        let smoother = Smoother::new(params.smoothing);
        Self {
            exercise,
            params,
            state: State::AwaitingCalibration,
            armed: true,
            smoother,
        }
    }

    #[inline]
    pub fn exercise(&self) -> Exercise {
        self.exercise
    }

    #[inline]
    pub fn params(&self) -> &DisplacementParams {
        &self.params
    }

    pub fn phase(&self) -> Phase {
        match self.state {
            State::AwaitingCalibration => Phase::AwaitingCalibration,
            State::Idle => Phase::Idle,
            State::InFlight { .. } => Phase::InFlight,
            State::Landed => Phase::Landed,
        }
    }

    pub(crate) fn reference_point(&self, sample: &LandmarkSample) -> Option<Point> {
        self.params.tracked.resolve(sample)
    }

    /// Drop the open cycle. Where the athlete stands is unknown, so the
    /// detector stays disarmed until they are back at the reference.
    pub(crate) fn reset(&mut self) {
        if self.state != State::AwaitingCalibration {
            self.state = State::Idle;
        }
        self.armed = false;
        self.smoother.reset();
    }

    /// Drop the open cycle after a new reference was captured at the
    /// athlete's current position.
    pub(crate) fn restart(&mut self, calibration: &Calibration) {
        self.state = match calibration.reference() {
            Some(_) => State::Idle,
            None => State::AwaitingCalibration,
        };
        self.armed = true;
        self.smoother.reset();
    }

    pub(crate) fn update(
        &mut self,
        sample: Option<&LandmarkSample>,
        calibration: &Calibration,
    ) -> Option<RepetitionEvent> {
        let Some(reference) = calibration.reference() else {
            self.state = State::AwaitingCalibration;
            return None;
        };
        if self.state == State::AwaitingCalibration {
            self.state = State::Idle;
        }

        let sample = sample?;
        let point = self.params.tracked.resolve(sample)?;
        let value = self.smoother.filter(self.params.axis.project(&point));
        let origin = self.params.axis.project(&reference);
        let direction = self.params.direction;
        let beyond = direction.beyond(origin, value);
        let entry = self.params.entry_margin_px;

        let (next, event) = match self.state {
            State::AwaitingCalibration | State::Idle if !self.armed => {
                self.armed = beyond <= entry;
                (State::Idle, None)
            }
            State::AwaitingCalibration | State::Idle => {
                if beyond > entry {
                    (State::InFlight { extremal: value }, None)
                } else {
                    (State::Idle, None)
                }
            }
            State::InFlight { extremal } => {
                let advance = direction.beyond(extremal, value);
                let finished = match self.params.finish {
                    Finish::ReturnInside => beyond <= self.params.exit_margin(),
                    Finish::StopAdvancing => advance <= 0.0,
                };
                if finished {
                    let distance =
                        metrics::linear_distance(origin, extremal, calibration.pixels_per_unit());
                    let next = if beyond > entry {
                        State::Landed
                    } else {
                        State::Idle
                    };
                    let event = RepetitionEvent::new(
                        self.exercise,
                        sample.frame,
                        self.payload(distance),
                    );
                    (next, Some(event))
                } else if advance > 0.0 {
                    (State::InFlight { extremal: value }, None)
                } else {
                    (State::InFlight { extremal }, None)
                }
            }
            State::Landed => {
                if beyond > entry {
                    (State::Landed, None)
                } else {
                    (State::Idle, None)
                }
            }
        };

        self.state = next;
        event
    }

    fn payload(&self, distance: f64) -> Metrics {
        match self.exercise {
            Exercise::BroadJump => Metrics::JumpDistance {
                jump_distance: distance,
            },
            Exercise::SitAndReach => Metrics::Reach { reach: distance },
            _ => Metrics::JumpHeight {
                jump_height: distance,
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{Detector, DetectorParams, SmoothingParams};
    use approx::assert_relative_eq;
    use rep_counter_core::Landmark;

    fn wrist(frame: u64, y: f64) -> LandmarkSample {
        LandmarkSample::new(frame).with(Landmark::RightWrist, 600.0, y)
    }

    fn ankles(frame: u64, left_x: f64, right_x: f64) -> LandmarkSample {
        LandmarkSample::new(frame)
            .with(Landmark::LeftAnkle, left_x, 650.0)
            .with(Landmark::RightAnkle, right_x, 655.0)
    }

    fn calibrated(reference: Point) -> Calibration {
        Calibration::new(44.0)
            .expect("scale")
            .with_reference(reference)
    }

    fn run(
        detector: &mut Detector,
        calibration: &Calibration,
        samples: &[LandmarkSample],
    ) -> Vec<RepetitionEvent> {
        samples
            .iter()
            .filter_map(|s| detector.update(Some(s), calibration))
            .collect()
    }

    fn vertical_jump() -> Detector {
        Detector::for_exercise(Exercise::VerticalJump).expect("detector")
    }

    #[test]
    fn stays_gated_until_reference_is_set() {
        let mut det = vertical_jump();
        let uncalibrated = Calibration::new(44.0).expect("scale");
        for (i, y) in [500.0, 300.0, 100.0, 500.0].into_iter().enumerate() {
            assert!(det.update(Some(&wrist(i as u64, y)), &uncalibrated).is_none());
            assert_eq!(det.phase(), Phase::AwaitingCalibration);
        }

        let cal = calibrated(Point::new(600.0, 500.0));
        assert!(det.update(Some(&wrist(4, 500.0)), &cal).is_none());
        assert_eq!(det.phase(), Phase::Idle);
    }

    #[test]
    fn vertical_jump_reports_peak_height() {
        let mut det = vertical_jump();
        let cal = calibrated(Point::new(600.0, 500.0));
        let ys = [500.0, 495.0, 460.0, 350.0, 280.0, 300.0, 480.0, 500.0];
        let samples: Vec<_> = ys
            .iter()
            .enumerate()
            .map(|(i, &y)| wrist(i as u64, y))
            .collect();

        let events = run(&mut det, &cal, &samples);
        assert_eq!(events.len(), 1);
        let ev = events[0];
        assert_eq!(ev.frame, 6);
        assert_eq!(ev.increment, 1);
        match ev.metrics {
            Metrics::JumpHeight { jump_height } => {
                assert_relative_eq!(jump_height, 5.0, epsilon = 1e-6)
            }
            other => panic!("unexpected payload {other:?}"),
        }
        assert_eq!(det.phase(), Phase::Idle);
    }

    #[test]
    fn movement_inside_margin_never_emits() {
        let mut det = vertical_jump();
        let cal = calibrated(Point::new(600.0, 500.0));
        let samples: Vec<_> = (0..200)
            .map(|i| wrist(i, 500.0 + 29.0 * ((i as f64) * 0.3).sin()))
            .collect();
        assert!(run(&mut det, &cal, &samples).is_empty());
        assert_eq!(det.phase(), Phase::Idle);
    }

    #[test]
    fn missing_landmarks_hold_the_open_cycle() {
        let mut det = vertical_jump();
        let cal = calibrated(Point::new(600.0, 500.0));
        assert!(det.update(Some(&wrist(0, 400.0)), &cal).is_none());
        assert_eq!(det.phase(), Phase::InFlight);

        assert!(det.update(None, &cal).is_none());
        let no_wrist = LandmarkSample::new(2).with(Landmark::LeftWrist, 10.0, 10.0);
        assert!(det.update(Some(&no_wrist), &cal).is_none());
        assert_eq!(det.phase(), Phase::InFlight);

        let ev = det.update(Some(&wrist(3, 500.0)), &cal).expect("landed");
        assert_relative_eq!(
            ev.metrics.primary_value().expect("height"),
            100.0 / 44.0,
            epsilon = 1e-9
        );
    }

    #[test]
    fn exit_margin_adds_hysteresis() {
        let mut params = DetectorParams::for_exercise(Exercise::VerticalJump);
        if let DetectorParams::Displacement(p) = &mut params {
            p.exit_margin_px = Some(10.0);
        }
        let mut det = Detector::new(Exercise::VerticalJump, params).expect("detector");
        let cal = calibrated(Point::new(600.0, 500.0));

        assert!(det.update(Some(&wrist(0, 460.0)), &cal).is_none());
        // 25 px above the reference: inside the entry margin but outside the exit margin.
        assert!(det.update(Some(&wrist(1, 475.0)), &cal).is_none());
        assert_eq!(det.phase(), Phase::InFlight);
        assert!(det.update(Some(&wrist(2, 495.0)), &cal).is_some());
    }

    #[test]
    fn smoothing_suppresses_single_frame_spike() {
        let mut params = DetectorParams::for_exercise(Exercise::VerticalJump);
        if let DetectorParams::Displacement(p) = &mut params {
            p.smoothing = Some(SmoothingParams { alpha: 0.5 });
        }
        let mut det = Detector::new(Exercise::VerticalJump, params).expect("detector");
        let cal = calibrated(Point::new(600.0, 500.0));

        let samples = [wrist(0, 500.0), wrist(1, 440.0), wrist(2, 500.0)];
        assert!(run(&mut det, &cal, &samples).is_empty());
        assert_eq!(det.phase(), Phase::Idle);

        let mut raw = vertical_jump();
        assert!(raw.update(Some(&wrist(1, 440.0)), &cal).is_none());
        assert_eq!(raw.phase(), Phase::InFlight);
    }

    #[test]
    fn reset_mid_cycle_drops_open_jump() {
        let mut det = vertical_jump();
        let cal = calibrated(Point::new(600.0, 500.0));
        det.update(Some(&wrist(0, 300.0)), &cal);
        assert_eq!(det.phase(), Phase::InFlight);

        det.reset();
        assert_eq!(det.phase(), Phase::Idle);
        assert!(det.update(Some(&wrist(1, 500.0)), &cal).is_none());
        assert_eq!(cal.reference(), Some(Point::new(600.0, 500.0)));
    }

    #[test]
    fn broad_jump_counts_once_until_athlete_returns() {
        let mut det = Detector::for_exercise(Exercise::BroadJump).expect("detector");
        let cal = calibrated(Point::new(400.0, 650.0));
        let samples = [
            ankles(0, 400.0, 410.0),
            ankles(1, 450.0, 470.0),
            ankles(2, 520.0, 540.0),
            ankles(3, 600.0, 610.0),
            ankles(4, 598.0, 605.0),
            ankles(5, 600.0, 610.0),
            ankles(6, 601.0, 603.0),
        ];
        let events = run(&mut det, &cal, &samples);
        assert_eq!(events.len(), 1);
        match events[0].metrics {
            Metrics::JumpDistance { jump_distance } => {
                assert_relative_eq!(jump_distance, 200.0 / 44.0, epsilon = 1e-9)
            }
            other => panic!("unexpected payload {other:?}"),
        }
        assert_eq!(det.phase(), Phase::Landed);

        det.update(Some(&ankles(7, 405.0, 410.0)), &cal);
        assert_eq!(det.phase(), Phase::Idle);
    }

    #[test]
    fn reset_after_landing_waits_for_return_to_line() {
        let mut det = Detector::for_exercise(Exercise::BroadJump).expect("detector");
        let cal = calibrated(Point::new(400.0, 650.0));
        let jump = [ankles(0, 500.0, 510.0), ankles(1, 600.0, 610.0), ankles(2, 599.0, 610.0)];
        assert_eq!(run(&mut det, &cal, &jump).len(), 1);
        assert_eq!(det.phase(), Phase::Landed);

        det.reset();
        assert_eq!(det.phase(), Phase::Idle);
        let standing: Vec<_> = (3..8).map(|f| ankles(f, 600.0, 610.0)).collect();
        assert!(run(&mut det, &cal, &standing).is_empty());
        assert_eq!(det.phase(), Phase::Idle);

        let again = [
            ankles(8, 405.0, 415.0),
            ankles(9, 520.0, 530.0),
            ankles(10, 640.0, 650.0),
            ankles(11, 638.0, 650.0),
        ];
        let events = run(&mut det, &cal, &again);
        assert_eq!(events.len(), 1);
        assert_eq!(events[0].frame, 11);
        assert_relative_eq!(
            events[0].metrics.primary_value().expect("distance"),
            240.0 / 44.0,
            epsilon = 1e-9
        );
    }

    #[test]
    fn restart_after_recalibration_is_armed() {
        let mut det = vertical_jump();
        let cal = calibrated(Point::new(600.0, 500.0));
        det.update(Some(&wrist(0, 300.0)), &cal);
        det.reset();
        det.restart(&cal);
        assert!(det.update(Some(&wrist(1, 400.0)), &cal).is_none());
        assert_eq!(det.phase(), Phase::InFlight);
    }

    #[test]
    fn sit_and_reach_reports_reach() {
        let mut det = Detector::for_exercise(Exercise::SitAndReach).expect("detector");
        let cal = calibrated(Point::new(300.0, 400.0));
        let reach = |frame, x| LandmarkSample::new(frame).with(Landmark::RightWrist, x, 400.0);
        let samples = [reach(0, 300.0), reach(1, 350.0), reach(2, 432.0), reach(3, 310.0)];
        let events = run(&mut det, &cal, &samples);
        assert_eq!(events.len(), 1);
        assert_eq!(events[0].exercise, Exercise::SitAndReach);
        assert_eq!(events[0].metrics, Metrics::Reach { reach: 3.0 });
    }
}
