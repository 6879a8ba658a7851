use crate::config::EngineConfig;
use crate::predictors::{ModelStatus, PredictorError, Predictors};
use crate::report::AnalysisReport;
use facewell_core::{
    score, symmetry, AgeGender, AnalysisResult, ConfigError, Emotion, Fatigue, HealthIndexCalculator,
    HealthReport, RecommendationEngine, SignalResult, SkinCondition, Symmetry,
};
use image::RgbImage;
use std::collections::BTreeMap;
use std::fmt;
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;
use thiserror::Error;
use tokio::sync::Semaphore;
use tracing::Instrument;
use uuid::Uuid;

/// Which uploaded photo an image error refers to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ImageKind {
    Face,
    Skin,
}

impl fmt::Display for ImageKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Face => f.write_str("face"),
            Self::Skin => f.write_str("skin"),
        }
    }
}

#[derive(Error, Debug)]
pub enum EngineError {
    #[error("{kind} image is empty")]
    EmptyImage { kind: ImageKind },
    #[error("{kind} image is {size} bytes, limit is {limit}")]
    ImageTooLarge {
        kind: ImageKind,
        size: usize,
        limit: usize,
    },
    #[error("failed to decode {kind} image: {source}")]
    ImageDecode {
        kind: ImageKind,
        #[source]
        source: image::ImageError,
    },
    #[error("{kind} image decoder panicked: {reason}")]
    DecodePanicked { kind: ImageKind, reason: String },
    #[error("config: {0}")]
    Config(#[from] ConfigError),
    #[error("failed to read weights file {}: {source}", .path.display())]
    WeightsFile {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

/// Runs the installed predictors over one request and scores the result.
pub struct AnalysisOrchestrator {
    predictors: Predictors,
    calculator: HealthIndexCalculator,
    recommender: RecommendationEngine,
    predictor_timeout: Duration,
    max_image_bytes: usize,
    /// Held by each blocking predictor call until it returns, including calls
    /// whose result was already abandoned on timeout.
    predictor_permits: Arc<Semaphore>,
}

impl AnalysisOrchestrator {
    pub fn new(predictors: Predictors, config: &EngineConfig) -> Result<Self, EngineError> {
        let calculator = HealthIndexCalculator::new(config.load_weights()?);
        let max_inflight = config.max_inflight_predictors.max(1);

        tracing::info!(
            models = ?predictors.status(),
            weights = ?calculator.weights(),
            timeout_ms = config.predictor_timeout.as_millis() as u64,
            max_image_bytes = config.max_image_bytes,
            max_inflight,
            "analysis orchestrator ready"
        );

        Ok(Self {
            predictors,
            calculator,
            recommender: RecommendationEngine,
            predictor_timeout: config.predictor_timeout,
            max_image_bytes: config.max_image_bytes,
            predictor_permits: Arc::new(Semaphore::new(max_inflight)),
        })
    }

    pub fn model_status(&self) -> BTreeMap<&'static str, ModelStatus> {
        self.predictors.status()
    }

    /// Score signals that were gathered elsewhere.
    pub fn assess(&self, result: &AnalysisResult) -> HealthReport {
        HealthReport::assess(&self.calculator, &self.recommender, result)
    }

    /// Analyze a face photo and an optional skin close-up (encoded image bytes).
    pub async fn analyze(
        &self,
        face_image: &[u8],
        skin_image: Option<&[u8]>,
    ) -> Result<AnalysisReport, EngineError> {
        let request_id = Uuid::new_v4();
        let span = tracing::info_span!("analyze", %request_id);
        self.run_analysis(request_id, face_image, skin_image)
            .instrument(span)
            .await
    }

    async fn run_analysis(
        &self,
        request_id: Uuid,
        face_image: &[u8],
        skin_image: Option<&[u8]>,
    ) -> Result<AnalysisReport, EngineError> {
        let face = Arc::new(self.decode(ImageKind::Face, face_image).await?);
        let skin = match skin_image {
            Some(bytes) => Some(Arc::new(self.decode(ImageKind::Skin, bytes).await?)),
            None => None,
        };

        let (age_gender, fatigue, emotion, symmetry, skin) = tokio::join!(
            self.predict_age_gender(&face),
            self.predict_fatigue(&face),
            self.predict_emotion(&face),
            self.measure_symmetry(&face),
            self.classify_skin(skin),
        );

        let signals = [
            Some(SignalResult::AgeGender(age_gender)),
            Some(SignalResult::Fatigue(fatigue)),
            Some(SignalResult::Emotion(emotion)),
            symmetry.map(SignalResult::Symmetry),
            Some(SignalResult::Skin(skin)),
        ];
        for signal in signals.iter().flatten() {
            if let Some((dimension, score)) = score::score_signal(signal) {
                tracing::debug!(%dimension, score, "signal scored");
            }
        }
        let result = AnalysisResult::from_signals(signals.into_iter().flatten());
        let health = self.assess(&result);

        tracing::info!(
            overall_score = health.index.overall_score,
            rating = %health.index.rating,
            recommendations = health.recommendations.len(),
            "analysis complete"
        );

        Ok(AnalysisReport::new(request_id.to_string(), &result, health))
    }

    /// Size checks run inline; decoding runs on the blocking pool.
    async fn decode(&self, kind: ImageKind, bytes: &[u8]) -> Result<RgbImage, EngineError> {
        if bytes.is_empty() {
            return Err(EngineError::EmptyImage { kind });
        }
        if bytes.len() > self.max_image_bytes {
            return Err(EngineError::ImageTooLarge {
                kind,
                size: bytes.len(),
                limit: self.max_image_bytes,
            });
        }

        let encoded = bytes.to_vec();
        let image = tokio::task::spawn_blocking(move || {
            image::load_from_memory(&encoded).map(|decoded| decoded.to_rgb8())
        })
        .await
        .map_err(|err| EngineError::DecodePanicked {
            kind,
            reason: err.to_string(),
        })?
        .map_err(|source| EngineError::ImageDecode { kind, source })?;
        tracing::debug!(%kind, width = image.width(), height = image.height(), "image decoded");
        Ok(image)
    }

    /// Run a blocking predictor call under the configured timeout.
    ///
    /// The timeout covers waiting for a permit. On timeout the blocking task is
    /// left to finish and its output is dropped, but it keeps its permit until
    /// it returns, so at most `max_inflight_predictors` blocking threads are
    /// ever tied up by hung predictors.
    async fn run_predictor<T, F>(&self, f: F) -> Result<T, PredictorError>
    where
        T: Send + 'static,
        F: FnOnce() -> Result<T, PredictorError> + Send + 'static,
    {
        let run = run_with_permit(Arc::clone(&self.predictor_permits), f);
        match tokio::time::timeout(self.predictor_timeout, run).await {
            Ok(outcome) => outcome,
            Err(_) => Err(PredictorError::TimedOut(self.predictor_timeout.as_millis())),
        }
    }

    async fn predict_age_gender(&self, face: &Arc<RgbImage>) -> AgeGender {
        let Some(predictor) = self.predictors.age_gender.clone() else {
            tracing::debug!("age/gender predictor not loaded");
            return AgeGender::unknown();
        };
        let face = Arc::clone(face);
        let outcome = self.run_predictor(move || predictor.predict(&face)).await;
        or_neutral("age_gender", outcome, AgeGender::unknown)
    }

    async fn predict_fatigue(&self, face: &Arc<RgbImage>) -> Fatigue {
        let Some(predictor) = self.predictors.fatigue.clone() else {
            tracing::debug!("fatigue predictor not loaded");
            return Fatigue::unknown();
        };
        let face = Arc::clone(face);
        let outcome = self.run_predictor(move || predictor.predict(&face)).await;
        or_neutral("fatigue", outcome, Fatigue::unknown)
    }

    async fn predict_emotion(&self, face: &Arc<RgbImage>) -> Emotion {
        let Some(predictor) = self.predictors.emotion.clone() else {
            tracing::debug!("emotion predictor not loaded");
            return Emotion::neutral();
        };
        let face = Arc::clone(face);
        let outcome = self.run_predictor(move || predictor.predict(&face)).await;
        or_neutral("emotion", outcome, Emotion::neutral)
    }

    /// `None` when no landmark extractor is installed; the symmetry dimension
    /// is then absent rather than failed.
    async fn measure_symmetry(&self, face: &Arc<RgbImage>) -> Option<Symmetry> {
        let extractor = self.predictors.landmarks.clone()?;
        let (width, height) = face.dimensions();
        let image = Arc::clone(face);
        let outcome = self.run_predictor(move || extractor.extract(&image)).await;

        let measured = match outcome {
            Ok(Some(points)) => symmetry::measure(&points, width, height),
            Ok(None) | Err(PredictorError::NoFaceDetected) => Symmetry::no_face(),
            Err(err) => {
                tracing::warn!(predictor = "landmarks", error = %err, "landmark extraction failed");
                Symmetry::Failed {
                    error: err.to_string(),
                }
            }
        };
        Some(measured)
    }

    async fn classify_skin(&self, skin: Option<Arc<RgbImage>>) -> SkinCondition {
        let Some(image) = skin else {
            return SkinCondition::not_analyzed();
        };
        let Some(classifier) = self.predictors.skin.clone() else {
            tracing::debug!("skin classifier not loaded; skin image ignored");
            return SkinCondition::not_analyzed();
        };
        let outcome = self.run_predictor(move || classifier.classify(&image)).await;
        or_neutral("skin", outcome, SkinCondition::not_analyzed)
    }
}

async fn run_with_permit<T, F>(permits: Arc<Semaphore>, f: F) -> Result<T, PredictorError>
where
    T: Send + 'static,
    F: FnOnce() -> Result<T, PredictorError> + Send + 'static,
{
    let permit = permits
        .acquire_owned()
        .await
        .map_err(|err| PredictorError::InferenceFailed(err.to_string()))?;
    tokio::task::spawn_blocking(move || {
        let _permit = permit;
        f()
    })
    .await
    .map_err(|err| PredictorError::Panicked(err.to_string()))?
}

fn or_neutral<T>(
    predictor: &'static str,
    outcome: Result<T, PredictorError>,
    neutral: impl FnOnce() -> T,
) -> T {
    outcome.unwrap_or_else(|err| {
        tracing::warn!(predictor, error = %err, "predictor failed; using neutral result");
        neutral()
    })
}
