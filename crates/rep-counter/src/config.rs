//! JSON session configuration.

use std::{fs, path::Path};

use log::debug;
use rep_counter_core::{
    Axis, Calibration, CalibrationError, Exercise, Point, DEFAULT_PIXELS_PER_UNIT,
};
use rep_counter_detect::{DetectError, Detector, DetectorParams, Session};
use serde::{Deserialize, Serialize};

#[derive(thiserror::Error, Debug)]
pub enum ConfigError {
    #[error(transparent)]
    Io(#[from] std::io::Error),
    #[error(transparent)]
    Json(#[from] serde_json::Error),
    #[error(transparent)]
    Calibration(#[from] CalibrationError),
    #[error(transparent)]
    Detector(#[from] DetectError),
    #[error("normalized frame size must be positive, got {width}x{height}")]
    InvalidFrameSize { width: f64, height: f64 },
}

fn default_pixels_per_unit() -> f64 {
    DEFAULT_PIXELS_PER_UNIT
}

/// Everything needed to start counting one exercise.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SessionConfig {
    pub exercise: Exercise,
    #[serde(default = "default_pixels_per_unit")]
    pub pixels_per_unit: f64,
    /// Reference point from an earlier calibration, `[x, y]` in pixels.
    #[serde(default)]
    pub reference: Option<Point>,
    /// Detector overrides. The exercise preset is used when absent.
    #[serde(default)]
    pub detector: Option<DetectorParams>,
    /// `[width, height]` of the camera frame when replay landmarks are
    /// normalized to `[0, 1]`. Landmarks are taken as pixels when absent.
    /// When set, it also fixes the frame extent of a crossing detector.
    #[serde(default)]
    pub normalized_frame: Option<[f64; 2]>,
}

impl SessionConfig {
    /// Preset configuration with every detector parameter spelled out.
    pub fn preset(exercise: Exercise) -> Self {
        Self {
            exercise,
            pixels_per_unit: DEFAULT_PIXELS_PER_UNIT,
            reference: None,
            detector: Some(DetectorParams::for_exercise(exercise)),
            normalized_frame: None,
        }
    }

    /// Load a JSON config from disk.
    pub fn load_json(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let raw = fs::read_to_string(path)?;
        Ok(serde_json::from_str(&raw)?)
    }

    /// Write this config to disk as pretty JSON.
    pub fn write_json(&self, path: impl AsRef<Path>) -> Result<(), ConfigError> {
        fs::write(path, self.to_json()?)?;
        Ok(())
    }

    pub fn to_json(&self) -> Result<String, ConfigError> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    /// Detector parameters: the override or the preset, with a crossing
    /// detector's frame extent taken from `normalized_frame` when present.
    pub fn build_params(&self) -> Result<DetectorParams, ConfigError> {
        let mut params = self
            .detector
            .clone()
            .unwrap_or_else(|| DetectorParams::for_exercise(self.exercise));
        if let (DetectorParams::Crossing(p), Some((width, height))) =
            (&mut params, self.frame_scale()?)
        {
            let extent = match p.axis {
                Axis::X => width,
                Axis::Y => height,
            };
            if p.frame_extent_px != extent {
                debug!(
                    "{}: frame extent {} px -> {} px from normalized_frame",
                    self.exercise, p.frame_extent_px, extent
                );
                p.frame_extent_px = extent;
            }
        }
        Ok(params)
    }

    pub fn build_calibration(&self) -> Result<Calibration, ConfigError> {
        let calibration = Calibration::new(self.pixels_per_unit)?;
        Ok(match self.reference {
            Some(reference) => calibration.with_reference(reference),
            None => calibration,
        })
    }

    /// Validated `(width, height)` used to scale normalized landmarks.
    pub fn frame_scale(&self) -> Result<Option<(f64, f64)>, ConfigError> {
        match self.normalized_frame {
            None => Ok(None),
            Some([width, height]) if width > 0.0 && height > 0.0 => Ok(Some((width, height))),
            Some([width, height]) => Err(ConfigError::InvalidFrameSize { width, height }),
        }
    }

    /// Build a session with a validated detector and calibration.
    pub fn build_session(&self) -> Result<Session, ConfigError> {
        let detector = Detector::new(self.exercise, self.build_params()?)?;
        Ok(Session::new(detector, self.build_calibration()?))
    }
}
