use std::{convert::TryFrom, fmt};

use thiserror::Error;

use crate::neighbors::Tiling;

/// The lowest source alpha that counts as already opaque. Always in 1..=255.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct AlphaThreshold(u8);

impl AlphaThreshold {
    /// Any pixel that isn't totally transparent is opaque.
    pub const MIN: AlphaThreshold = AlphaThreshold(1);

    /// Only totally opaque pixels are opaque.
    pub const MAX: AlphaThreshold = AlphaThreshold(u8::MAX);

    pub fn new(value: u8) -> Result<Self, ThresholdError> {
        if value == 0 {
            Err(ThresholdError { value: value.into() })
        } else {
            Ok(AlphaThreshold(value))
        }
    }

    #[inline]
    pub fn get(self) -> u8 {
        self.0
    }

    #[inline]
    pub fn is_opaque(self, alpha: u8) -> bool {
        alpha >= self.0
    }
}

impl Default for AlphaThreshold {
    fn default() -> Self {
        Self::MIN
    }
}

impl TryFrom<u32> for AlphaThreshold {
    type Error = ThresholdError;

    fn try_from(value: u32) -> Result<Self, Self::Error> {
        match u8::try_from(value) {
            Ok(value) => AlphaThreshold::new(value),
            Err(_) => Err(ThresholdError { value }),
        }
    }
}

impl fmt::Display for AlphaThreshold {
    fn fmt(&self, formatter: &mut fmt::Formatter) -> fmt::Result {
        write!(formatter, "{}", self.0)
    }
}

#[derive(Debug, Error, PartialEq, Eq)]
#[error("alpha threshold must be between 1 and 255, got {value}")]
pub struct ThresholdError {
    value: u32,
}

/// Everything that controls how a margin is grown.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct MarginSettings {
    pub alpha_threshold: AlphaThreshold,
    pub tiling: Tiling,

    /// Stops expanding after this many iterations even if transparent pixels
    /// remain. Useful for inspecting how the margin grows.
    pub max_iterations: Option<u32>,
}

impl MarginSettings {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn alpha_threshold(self, alpha_threshold: AlphaThreshold) -> Self {
        Self {
            alpha_threshold,
            ..self
        }
    }

    pub fn tiling(self, tiling: Tiling) -> Self {
        Self { tiling, ..self }
    }

    pub fn max_iterations(self, max_iterations: Option<u32>) -> Self {
        Self {
            max_iterations,
            ..self
        }
    }
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn zero_is_rejected() {
        assert_eq!(
            AlphaThreshold::new(0),
            Err(ThresholdError { value: 0 })
        );
        assert_eq!(
            AlphaThreshold::try_from(256u32),
            Err(ThresholdError { value: 256 })
        );
    }

    #[test]
    fn opaque_at_threshold() {
        let threshold = AlphaThreshold::new(128).unwrap();

        assert!(!threshold.is_opaque(127));
        assert!(threshold.is_opaque(128));
        assert!(threshold.is_opaque(255));
        assert!(AlphaThreshold::MIN.is_opaque(1));
        assert!(!AlphaThreshold::MIN.is_opaque(0));
    }

    #[test]
    fn builder() {
        let settings = MarginSettings::new()
            .alpha_threshold(AlphaThreshold::MAX)
            .tiling(Tiling::new(true, false))
            .max_iterations(Some(3));

        assert_eq!(settings.alpha_threshold.get(), 255);
        assert_eq!(settings.tiling, Tiling::new(true, false));
        assert_eq!(settings.max_iterations, Some(3));
        assert_eq!(MarginSettings::default().alpha_threshold.get(), 1);
    }
}
