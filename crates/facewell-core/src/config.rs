//! Health-index weight configuration.
//!
//! Weights are loaded from a `[weights]` TOML table and validated on
//! construction: each weight must lie in [0, 1] and together they must sum
//! to 1.0, so the overall score stays a convex combination of sub-scores.

use crate::index::Dimension;
use serde::{Deserialize, Serialize};
use thiserror::Error;

const DEFAULT_SYMMETRY_WEIGHT: f64 = 0.25;
const DEFAULT_FATIGUE_WEIGHT: f64 = 0.25;
const DEFAULT_SKIN_WEIGHT: f64 = 0.30;
const DEFAULT_EMOTION_WEIGHT: f64 = 0.20;

const WEIGHT_SUM_TOLERANCE: f64 = 1e-6;

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("weight for {dimension} must be a finite value in [0, 1], got {value}")]
    InvalidWeight { dimension: Dimension, value: f64 },
    #[error("weights must sum to 1.0, got {0}")]
    WeightSum(f64),
    #[error("toml: {0}")]
    Toml(#[from] toml::de::Error),
}

/// Per-dimension weights of the health index.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "RawWeights")]
pub struct Weights {
    symmetry: f64,
    fatigue: f64,
    skin: f64,
    emotion: f64,
}

#[derive(Deserialize)]
struct RawWeights {
    symmetry: f64,
    fatigue: f64,
    skin: f64,
    emotion: f64,
}

impl TryFrom<RawWeights> for Weights {
    type Error = ConfigError;

    fn try_from(raw: RawWeights) -> Result<Self, Self::Error> {
        Weights::new(raw.symmetry, raw.fatigue, raw.skin, raw.emotion)
    }
}

#[derive(Deserialize)]
struct WeightsFile {
    weights: Weights,
}

impl Weights {
    pub fn new(symmetry: f64, fatigue: f64, skin: f64, emotion: f64) -> Result<Self, ConfigError> {
        let weights = Self {
            symmetry,
            fatigue,
            skin,
            emotion,
        };

        for dimension in Dimension::ALL {
            let value = weights.weight(dimension);
            if !value.is_finite() || !(0.0..=1.0).contains(&value) {
                return Err(ConfigError::InvalidWeight { dimension, value });
            }
        }

        let sum = weights.sum();
        if (sum - 1.0).abs() > WEIGHT_SUM_TOLERANCE {
            return Err(ConfigError::WeightSum(sum));
        }

        Ok(weights)
    }

    /// Parse a document containing a `[weights]` table.
    pub fn from_toml_str(src: &str) -> Result<Self, ConfigError> {
        let file: WeightsFile = toml::from_str(src)?;
        tracing::debug!(weights = ?file.weights, "loaded health-index weights");
        Ok(file.weights)
    }

    pub fn weight(&self, dimension: Dimension) -> f64 {
        match dimension {
            Dimension::Symmetry => self.symmetry,
            Dimension::Fatigue => self.fatigue,
            Dimension::Skin => self.skin,
            Dimension::Emotion => self.emotion,
        }
    }

    pub fn sum(&self) -> f64 {
        Dimension::ALL.iter().map(|&d| self.weight(d)).sum()
    }
}

impl Default for Weights {
    fn default() -> Self {
        Self {
            symmetry: DEFAULT_SYMMETRY_WEIGHT,
            fatigue: DEFAULT_FATIGUE_WEIGHT,
            skin: DEFAULT_SKIN_WEIGHT,
            emotion: DEFAULT_EMOTION_WEIGHT,
        }
    }
}
