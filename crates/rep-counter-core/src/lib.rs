//! Core types for pose-based exercise counting.
//!
//! This crate is intentionally small and purely geometric. It does *not*
//! depend on any camera, pose estimator or transport; it only knows about
//! named landmark positions in pixel space, the calibration that turns pixels
//! into physical units, and the metrics computed for one repetition.

mod calibration;
mod event;
mod geometry;
mod landmark;
mod logger;
pub mod metrics;

pub use calibration::{Calibration, CalibrationError, DEFAULT_PIXELS_PER_UNIT};
pub use event::{Exercise, Metrics, RepetitionEvent};
pub use geometry::joint_angle;
pub use landmark::{Axis, Landmark, LandmarkSample, Point};
pub use metrics::{ScoreRounding, ThrowMetrics, TrajectoryPoint};

#[cfg(feature = "tracing")]
pub use logger::init_tracing;

pub use logger::init_with_level;
