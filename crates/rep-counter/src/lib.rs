//! High-level facade crate for the `rep-counter-*` workspace.
//!
//! This crate provides:
//! - stable re-exports of the core types, detectors and sinks
//! - JSON session configuration ([`SessionConfig`])
//! - a [`Pipeline`] that drives one session and fans events out to sinks
//! - offline [`replay`](replay::replay) of recorded landmark streams, also
//!   exposed through the `rep-counter` binary (feature `cli`)
//!
//! ## Quickstart
//!
//! ```
//! use rep_counter::{Exercise, Landmark, LandmarkSample, Pipeline, SessionConfig};
//!
//! # fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let config = SessionConfig::preset(Exercise::VerticalJump);
//! let mut pipeline = Pipeline::from_config(&config)?;
//!
//! let wrist = |frame, y| LandmarkSample::new(frame).with(Landmark::RightWrist, 600.0, y);
//! pipeline.calibrate(Some(&wrist(0, 500.0)))?;
//! for (frame, y) in [(1, 420.0), (2, 280.0), (3, 500.0)] {
//!     if let Some(event) = pipeline.step(Some(&wrist(frame, y))).event {
//!         println!("{} at frame {}", event.exercise, event.frame);
//!     }
//! }
//! assert_eq!(pipeline.status().count, 1);
//! # Ok(())
//! # }
//! ```
//!
//! ## API map
//! - `rep_counter::core`: landmarks, calibration, events and metric formulas.
//! - `rep_counter::detect`: per-exercise detectors and the calibrated session.
//! - `rep_counter::sink`: counter board and JSON-lines event log.

pub use rep_counter_core as core;
pub use rep_counter_detect as detect;
pub use rep_counter_sink as sink;

pub use rep_counter_core::{
    Calibration, Exercise, Landmark, LandmarkSample, Metrics, Point, RepetitionEvent,
    ThrowMetrics,
};
pub use rep_counter_detect::{Detector, DetectorParams, Phase, Session};
pub use rep_counter_sink::{CounterBoard, CounterStatus, JsonLinesSink, ResultSink};

mod config;
mod pipeline;
pub mod replay;

pub use config::{ConfigError, SessionConfig};
pub use pipeline::{Pipeline, PipelineError, SinkFailure, StepOutcome};
