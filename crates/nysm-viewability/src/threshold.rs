use serde::{Deserialize, Serialize};

use crate::ViewabilityError;

/// Minimum viewable percentage, within `(0, 100]`.
#[derive(Debug, Clone, Copy, PartialEq, PartialOrd, Serialize, Deserialize)]
#[serde(try_from = "f64", into = "f64")]
pub struct Threshold(f64);

impl Threshold {
    pub const DEFAULT: Threshold = Threshold(50.0);

    pub fn new(percentage: f64) -> Result<Self, ViewabilityError> {
        if percentage > 0.0 && percentage <= 100.0 {
            Ok(Self(percentage))
        } else {
            Err(ViewabilityError::InvalidThreshold(percentage))
        }
    }

    pub fn value(self) -> f64 {
        self.0
    }
}

impl Default for Threshold {
    fn default() -> Self {
        Self::DEFAULT
    }
}

impl TryFrom<f64> for Threshold {
    type Error = ViewabilityError;

    fn try_from(percentage: f64) -> Result<Self, Self::Error> {
        Self::new(percentage)
    }
}

impl From<Threshold> for f64 {
    fn from(threshold: Threshold) -> Self {
        threshold.0
    }
}
