//! Weighted health index.

use crate::config::Weights;
use crate::score::{self, MAX_SCORE};
use crate::types::AnalysisResult;
use serde::{Deserialize, Serialize};
use std::fmt;

/// A scored dimension of the health index.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Dimension {
    Symmetry,
    Fatigue,
    Skin,
    Emotion,
}

impl Dimension {
    pub const ALL: [Dimension; 4] = [
        Dimension::Symmetry,
        Dimension::Fatigue,
        Dimension::Skin,
        Dimension::Emotion,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Symmetry => "symmetry",
            Self::Fatigue => "fatigue",
            Self::Skin => "skin",
            Self::Emotion => "emotion",
        }
    }
}

impl fmt::Display for Dimension {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.pad(self.as_str())
    }
}

/// Qualitative band of the overall score.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Rating {
    Excellent,
    Good,
    Fair,
    Poor,
    NeedsAttention,
}

impl Rating {
    /// Inclusive lower bounds, evaluated from the top.
    pub fn from_score(score: f64) -> Self {
        if score >= 90.0 {
            Self::Excellent
        } else if score >= 75.0 {
            Self::Good
        } else if score >= 60.0 {
            Self::Fair
        } else if score >= 45.0 {
            Self::Poor
        } else {
            Self::NeedsAttention
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            Self::Excellent => "Excellent",
            Self::Good => "Good",
            Self::Fair => "Fair",
            Self::Poor => "Poor",
            Self::NeedsAttention => "Needs Attention",
        }
    }
}

impl fmt::Display for Rating {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Sub-score of every dimension, each in [0, 100].
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ComponentScores {
    pub symmetry: f64,
    pub fatigue: f64,
    pub skin: f64,
    pub emotion: f64,
}

impl ComponentScores {
    pub fn get(&self, dimension: Dimension) -> f64 {
        match dimension {
            Dimension::Symmetry => self.symmetry,
            Dimension::Fatigue => self.fatigue,
            Dimension::Skin => self.skin,
            Dimension::Emotion => self.emotion,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HealthIndex {
    /// Weighted score in [0, 100], rounded to two decimals.
    pub overall_score: f64,
    pub rating: Rating,
    pub component_scores: ComponentScores,
    pub max_score: f64,
}

fn round2(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}

/// Combines the four sub-scores into the health index.
#[derive(Debug, Clone, Default)]
pub struct HealthIndexCalculator {
    weights: Weights,
}

impl HealthIndexCalculator {
    pub fn new(weights: Weights) -> Self {
        Self { weights }
    }

    pub fn weights(&self) -> &Weights {
        &self.weights
    }

    /// Score every dimension of `result`. Age and gender do not contribute.
    pub fn component_scores(&self, result: &AnalysisResult) -> ComponentScores {
        ComponentScores {
            symmetry: score::symmetry_score(result.symmetry.as_ref()),
            fatigue: score::fatigue_score(&result.fatigue),
            skin: score::skin_score(&result.skin),
            emotion: score::emotion_score(&result.emotion),
        }
    }

    /// Weighted sum of the component scores, rounded to two decimals.
    pub fn combine(&self, scores: &ComponentScores) -> f64 {
        let overall: f64 = Dimension::ALL
            .iter()
            .map(|&d| self.weights.weight(d) * scores.get(d))
            .sum();
        round2(overall).clamp(0.0, MAX_SCORE)
    }

    pub fn calculate(&self, result: &AnalysisResult) -> HealthIndex {
        let component_scores = self.component_scores(result);
        let overall_score = self.combine(&component_scores);
        let rating = Rating::from_score(overall_score);

        tracing::debug!(
            overall_score,
            %rating,
            symmetry = component_scores.symmetry,
            fatigue = component_scores.fatigue,
            skin = component_scores.skin,
            emotion = component_scores.emotion,
            "health index calculated"
        );

        HealthIndex {
            overall_score,
            rating,
            component_scores,
            max_score: MAX_SCORE,
        }
    }
}
