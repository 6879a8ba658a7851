use crate::engine::EngineError;
use facewell_core::Weights;
use std::path::PathBuf;
use std::time::Duration;

const DEFAULT_PREDICTOR_TIMEOUT_MS: u64 = 5_000;
const DEFAULT_MAX_IMAGE_BYTES: usize = 10 * 1024 * 1024;
const DEFAULT_MAX_INFLIGHT_PREDICTORS: usize = 16;

/// Engine configuration, loaded from environment variables.
#[derive(Debug, Clone)]
pub struct EngineConfig {
    /// How long a single predictor may run before its neutral result is used.
    pub predictor_timeout: Duration,
    /// Upper bound on an uploaded image, in bytes.
    pub max_image_bytes: usize,
    /// Cap on predictor calls occupying blocking threads at once.
    pub max_inflight_predictors: usize,
    /// Optional TOML file with a `[weights]` table.
    pub weights_path: Option<PathBuf>,
}

impl EngineConfig {
    /// Load configuration from `FACEWELL_*` environment variables with defaults.
    pub fn from_env() -> Self {
        Self {
            predictor_timeout: Duration::from_millis(env_u64(
                "FACEWELL_PREDICTOR_TIMEOUT_MS",
                DEFAULT_PREDICTOR_TIMEOUT_MS,
            )),
            max_image_bytes: env_usize("FACEWELL_MAX_IMAGE_BYTES", DEFAULT_MAX_IMAGE_BYTES),
            max_inflight_predictors: env_usize(
                "FACEWELL_MAX_INFLIGHT_PREDICTORS",
                DEFAULT_MAX_INFLIGHT_PREDICTORS,
            ),
            weights_path: std::env::var("FACEWELL_WEIGHTS_PATH").ok().map(PathBuf::from),
        }
    }

    /// Health-index weights: the configured file if any, otherwise the defaults.
    pub fn load_weights(&self) -> Result<Weights, EngineError> {
        let Some(path) = &self.weights_path else {
            return Ok(Weights::default());
        };
        let src = std::fs::read_to_string(path).map_err(|source| EngineError::WeightsFile {
            path: path.clone(),
            source,
        })?;
        let weights = Weights::from_toml_str(&src)?;
        tracing::info!(path = %path.display(), "loaded weights file");
        Ok(weights)
    }
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            predictor_timeout: Duration::from_millis(DEFAULT_PREDICTOR_TIMEOUT_MS),
            max_image_bytes: DEFAULT_MAX_IMAGE_BYTES,
            max_inflight_predictors: DEFAULT_MAX_INFLIGHT_PREDICTORS,
            weights_path: None,
        }
    }
}

fn env_u64(key: &str, default: u64) -> u64 {
    std::env::var(key)
        .ok()
        .and_then(|v| v.parse().ok())
        .unwrap_or(default)
}

fn env_usize(key: &str, default: usize) -> usize {
    std::env::var(key)
        .ok()
        .and_then(|v| v.parse().ok())
        .unwrap_or(default)
}
