use serde::Serialize;

use crate::Point;

/// Default calibration factor used by the stock exercise presets.
pub const DEFAULT_PIXELS_PER_UNIT: f64 = 44.0;

#[derive(thiserror::Error, Debug, Clone, PartialEq)]
pub enum CalibrationError {
    #[error("pixels per unit must be positive and finite (got {0})")]
    InvalidScale(f64),
}

/// Mapping from pixel distances to physical units for one session.
///
/// The scale is fixed at construction. The reference point is captured by an
/// explicit user action (e.g. "set take-off line") and only ever replaced by
/// another such action.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct Calibration {
    pixels_per_unit: f64,
    reference: Option<Point>,
}

impl Calibration {
    pub fn new(pixels_per_unit: f64) -> Result<Self, CalibrationError> {
        if !pixels_per_unit.is_finite() || pixels_per_unit <= 0.0 {
            return Err(CalibrationError::InvalidScale(pixels_per_unit));
        }
        Ok(Self {
            pixels_per_unit,
            reference: None,
        })
    }

    pub fn with_reference(mut self, reference: Point) -> Self {
        self.reference = Some(reference);
        self
    }

    #[inline]
    pub fn pixels_per_unit(&self) -> f64 {
        self.pixels_per_unit
    }

    #[inline]
    pub fn reference(&self) -> Option<Point> {
        self.reference
    }

    /// Replace the reference point. Returns the previous one, if any.
    pub fn set_reference(&mut self, reference: Point) -> Option<Point> {
        self.reference.replace(reference)
    }

    /// Convert a pixel length to physical units.
    #[inline]
    pub fn to_units(&self, pixels: f64) -> f64 {
        pixels / self.pixels_per_unit
    }
}

impl Default for Calibration {
    fn default() -> Self {
        Self {
            pixels_per_unit: DEFAULT_PIXELS_PER_UNIT,
            reference: None,
        }
    }
}
