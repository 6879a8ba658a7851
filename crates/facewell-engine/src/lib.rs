//! facewell-engine — Analysis orchestration.
//!
//! Decodes the uploaded photos, runs the injected predictors concurrently
//! with a per-predictor timeout, and hands the assembled signals to the
//! scoring core. A predictor that fails, times out or is missing is replaced
//! by its neutral result; only unusable images fail a request.

pub mod config;
pub mod engine;
pub mod predictors;
pub mod report;

pub use config::EngineConfig;
pub use engine::{AnalysisOrchestrator, EngineError, ImageKind};
pub use predictors::{
    AgeGenderPredictor, EmotionPredictor, FatiguePredictor, LandmarkExtractor, ModelStatus,
    PredictorError, Predictors, SkinClassifier,
};
pub use report::AnalysisReport;
