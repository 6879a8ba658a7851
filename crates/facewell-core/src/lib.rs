//! facewell-core — Face health signal scoring.
//!
//! Maps per-signal predictor outputs (fatigue, symmetry, emotion, skin) to
//! 0–100 sub-scores, combines them into a weighted health index and derives
//! rule-based recommendations. Everything here is pure and synchronous.

pub mod config;
pub mod index;
pub mod recommend;
pub mod report;
pub mod score;
pub mod symmetry;
pub mod types;

pub use config::{ConfigError, Weights};
pub use index::{ComponentScores, Dimension, HealthIndex, HealthIndexCalculator, Rating};
pub use recommend::RecommendationEngine;
pub use report::HealthReport;
pub use symmetry::MeshPoint;
pub use types::{
    AgeGender, AnalysisResult, Emotion, EmotionLabel, Fatigue, FatigueStatus, Gender,
    SignalResult, SkinCondition, Symmetry,
};
