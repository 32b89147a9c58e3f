//! Repetition detectors built on top of `rep-counter-core`.
//!
//! ## Quickstart
//!
//! ```
//! use rep_counter_core::{Calibration, Exercise, Landmark, LandmarkSample};
//! use rep_counter_detect::{Detector, Session};
//!
//! let detector = Detector::for_exercise(Exercise::VerticalJump).unwrap();
//! let mut session = Session::new(detector, Calibration::default());
//!
//! let standing = LandmarkSample::new(0).with(Landmark::RightWrist, 600.0, 500.0);
//! session.calibrate(Some(&standing)).unwrap();
//!
//! let mut count = 0;
//! for (frame, y) in [(1, 400.0), (2, 280.0), (3, 500.0)] {
//!     let sample = LandmarkSample::new(frame).with(Landmark::RightWrist, 600.0, y);
//!     if session.process(Some(&sample)).is_some() {
//!         count += 1;
//!     }
//! }
//! assert_eq!(count, 1);
//! ```
//!
//! Three detector families cover the supported exercises:
//! 1. Displacement (vertical jump, broad jump, sit-and-reach): one tracked
//!    coordinate leaves the calibrated reference by more than a margin, its
//!    extremum is kept, and the cycle ends on return or when it stops advancing.
//! 2. Crossing (medicine-ball throw): the tracked coordinate passes a release
//!    line, then a landing line; projectile metrics come from the two samples.
//! 3. Angle (sit-ups): a joint angle plus a position gate drive a down/up cycle;
//!    every up to down transition is one repetition.

mod detector;
mod error;
mod params;
mod session;
mod tracking;

pub use detector::{AngleDetector, CrossingDetector, Detector, DisplacementDetector, Phase};
pub use error::DetectError;
pub use params::{
    AngleParams, CrossingParams, DetectorParams, DisplacementParams, Finish, PositionGate,
};
pub use session::Session;
pub use tracking::{Direction, SmoothingParams, TrackedPoint};
