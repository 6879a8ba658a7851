//! Predictor collaborators.
//!
//! The engine does not run any model itself. Each dimension is produced by an
//! injected implementation of one of these traits; a dimension without an
//! implementation reports its neutral result.

use facewell_core::{AgeGender, Emotion, Fatigue, MeshPoint, SkinCondition};
use image::RgbImage;
use serde::Serialize;
use std::collections::BTreeMap;
use std::sync::Arc;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum PredictorError {
    #[error("model unavailable: {0}")]
    ModelUnavailable(String),
    #[error("no face detected")]
    NoFaceDetected,
    #[error("inference failed: {0}")]
    InferenceFailed(String),
    #[error("timed out after {0} ms")]
    TimedOut(u128),
    #[error("predictor task failed: {0}")]
    Panicked(String),
}

pub trait AgeGenderPredictor: Send + Sync {
    fn predict(&self, face: &RgbImage) -> Result<AgeGender, PredictorError>;
}

pub trait FatiguePredictor: Send + Sync {
    fn predict(&self, face: &RgbImage) -> Result<Fatigue, PredictorError>;
}

pub trait EmotionPredictor: Send + Sync {
    fn predict(&self, face: &RgbImage) -> Result<Emotion, PredictorError>;
}

/// Face-mesh landmark extraction. `Ok(None)` means no face was found.
pub trait LandmarkExtractor: Send + Sync {
    fn extract(&self, face: &RgbImage) -> Result<Option<Vec<MeshPoint>>, PredictorError>;
}

pub trait SkinClassifier: Send + Sync {
    fn classify(&self, skin: &RgbImage) -> Result<SkinCondition, PredictorError>;
}

/// The set of installed predictors.
#[derive(Clone, Default)]
pub struct Predictors {
    pub age_gender: Option<Arc<dyn AgeGenderPredictor>>,
    pub fatigue: Option<Arc<dyn FatiguePredictor>>,
    pub emotion: Option<Arc<dyn EmotionPredictor>>,
    pub landmarks: Option<Arc<dyn LandmarkExtractor>>,
    pub skin: Option<Arc<dyn SkinClassifier>>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ModelStatus {
    Loaded,
    NotLoaded,
}

impl ModelStatus {
    fn of(installed: bool) -> Self {
        if installed {
            Self::Loaded
        } else {
            Self::NotLoaded
        }
    }
}

impl Predictors {
    /// Which predictors are installed, keyed by predictor name.
    pub fn status(&self) -> BTreeMap<&'static str, ModelStatus> {
        BTreeMap::from([
            ("age_gender", ModelStatus::of(self.age_gender.is_some())),
            ("fatigue", ModelStatus::of(self.fatigue.is_some())),
            ("emotion", ModelStatus::of(self.emotion.is_some())),
            ("landmarks", ModelStatus::of(self.landmarks.is_some())),
            ("skin", ModelStatus::of(self.skin.is_some())),
        ])
    }
}
