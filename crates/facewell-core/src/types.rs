use serde::{Deserialize, Deserializer, Serialize};
use std::collections::BTreeMap;
use std::fmt;

/// Skin classifier output classes, in model output order.
pub const SKIN_CONDITIONS: [&str; 10] = [
    "Acne",
    "Actinic Keratosis",
    "Basal Cell Carcinoma",
    "Dermatofibroma",
    "Melanocytic Nevi",
    "Melanoma",
    "Seborrheic Keratoses",
    "Squamous Cell Carcinoma",
    "Vascular Lesion",
    "Normal",
];

pub const DANGEROUS_SKIN_CONDITIONS: [&str; 3] =
    ["Melanoma", "Basal Cell Carcinoma", "Squamous Cell Carcinoma"];
pub const MODERATE_SKIN_CONDITIONS: [&str; 3] =
    ["Actinic Keratosis", "Acne", "Seborrheic Keratoses"];
pub const MILD_SKIN_CONDITIONS: [&str; 3] =
    ["Melanocytic Nevi", "Dermatofibroma", "Vascular Lesion"];

/// Age reported when no estimate is available.
pub const DEFAULT_AGE: u32 = 30;

/// Sigmoid outputs above this count as the positive class.
const BINARY_DECISION_THRESHOLD: f64 = 0.5;

/// Confidence of a binary sigmoid output: distance from the decision boundary, scaled to [0, 1].
fn binary_confidence(probability: f64) -> f64 {
    ((probability - BINARY_DECISION_THRESHOLD).abs() * 2.0).clamp(0.0, 1.0)
}

/// Confidence fields accept `null` as zero.
fn confidence_or_zero<'de, D>(deserializer: D) -> Result<f64, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(Option::<f64>::deserialize(deserializer)?.unwrap_or(0.0))
}

fn default_age() -> u32 {
    DEFAULT_AGE
}

// --- Age / gender ---

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum Gender {
    Male,
    Female,
    #[default]
    Unknown,
}

impl Gender {
    pub fn from_label(label: &str) -> Self {
        match label.trim() {
            "Male" => Self::Male,
            "Female" => Self::Female,
            _ => Self::Unknown,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Male => "Male",
            Self::Female => "Female",
            Self::Unknown => "Unknown",
        }
    }
}

impl From<String> for Gender {
    fn from(label: String) -> Self {
        Self::from_label(&label)
    }
}

impl From<Gender> for String {
    fn from(gender: Gender) -> Self {
        gender.as_str().to_string()
    }
}

impl fmt::Display for Gender {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Age and gender estimate. Reported alongside the index but never scored into it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AgeGender {
    #[serde(default = "default_age")]
    pub age: u32,
    #[serde(default)]
    pub gender: Gender,
    #[serde(default, deserialize_with = "confidence_or_zero")]
    pub age_confidence: f64,
    #[serde(default, deserialize_with = "confidence_or_zero")]
    pub gender_confidence: f64,
}

impl AgeGender {
    /// Neutral result for a face that could not be estimated.
    pub fn unknown() -> Self {
        Self {
            age: DEFAULT_AGE,
            gender: Gender::Unknown,
            age_confidence: 0.0,
            gender_confidence: 0.0,
        }
    }

    /// Build from an age regression and a sigmoid male-probability output.
    pub fn from_gender_probability(age: u32, age_confidence: f64, male_probability: f64) -> Self {
        let gender = if male_probability > BINARY_DECISION_THRESHOLD {
            Gender::Male
        } else {
            Gender::Female
        };
        Self {
            age,
            gender,
            age_confidence,
            gender_confidence: binary_confidence(male_probability),
        }
    }
}

impl Default for AgeGender {
    fn default() -> Self {
        Self::unknown()
    }
}

// --- Fatigue ---

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum FatigueStatus {
    NotFatigued,
    SlightlyFatigued,
    Fatigued,
    #[default]
    Unknown,
}

impl FatigueStatus {
    /// Parse a predictor label. "Not Fatigued" is checked before the bare
    /// "Fatigued" substring, which it contains.
    pub fn from_label(label: &str) -> Self {
        if label.contains("Not Fatigued") {
            Self::NotFatigued
        } else if label.contains("Slightly Fatigued") {
            Self::SlightlyFatigued
        } else if label.contains("Fatigued") {
            Self::Fatigued
        } else {
            Self::Unknown
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::NotFatigued => "Not Fatigued",
            Self::SlightlyFatigued => "Slightly Fatigued",
            Self::Fatigued => "Fatigued",
            Self::Unknown => "Unknown",
        }
    }
}

impl From<String> for FatigueStatus {
    fn from(label: String) -> Self {
        Self::from_label(&label)
    }
}

impl From<FatigueStatus> for String {
    fn from(status: FatigueStatus) -> Self {
        status.as_str().to_string()
    }
}

impl fmt::Display for FatigueStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Fatigue {
    #[serde(default)]
    pub status: FatigueStatus,
    #[serde(default, deserialize_with = "confidence_or_zero")]
    pub confidence: f64,
}

impl Fatigue {
    pub fn unknown() -> Self {
        Self {
            status: FatigueStatus::Unknown,
            confidence: 0.0,
        }
    }

    /// Build from a sigmoid fatigue-probability output.
    pub fn from_probability(fatigue_probability: f64) -> Self {
        let status = if fatigue_probability > BINARY_DECISION_THRESHOLD {
            FatigueStatus::Fatigued
        } else {
            FatigueStatus::NotFatigued
        };
        Self {
            status,
            confidence: binary_confidence(fatigue_probability),
        }
    }
}

impl Default for Fatigue {
    fn default() -> Self {
        Self::unknown()
    }
}

// --- Emotion ---

/// Expression label. Labels outside the known five are kept verbatim.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum EmotionLabel {
    Happy,
    #[default]
    Neutral,
    Surprised,
    Sad,
    Angry,
    Other(String),
}

impl EmotionLabel {
    pub fn from_label(label: &str) -> Self {
        match label {
            "Happy" => Self::Happy,
            "Neutral" => Self::Neutral,
            "Surprised" => Self::Surprised,
            "Sad" => Self::Sad,
            "Angry" => Self::Angry,
            other => Self::Other(other.to_string()),
        }
    }

    pub fn as_str(&self) -> &str {
        match self {
            Self::Happy => "Happy",
            Self::Neutral => "Neutral",
            Self::Surprised => "Surprised",
            Self::Sad => "Sad",
            Self::Angry => "Angry",
            Self::Other(label) => label,
        }
    }
}

impl From<String> for EmotionLabel {
    fn from(label: String) -> Self {
        Self::from_label(&label)
    }
}

impl From<EmotionLabel> for String {
    fn from(label: EmotionLabel) -> Self {
        match label {
            EmotionLabel::Other(label) => label,
            known => known.as_str().to_string(),
        }
    }
}

impl fmt::Display for EmotionLabel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Emotion {
    #[serde(default)]
    pub label: EmotionLabel,
    #[serde(default, deserialize_with = "confidence_or_zero")]
    pub confidence: f64,
}

impl Emotion {
    pub fn neutral() -> Self {
        Self {
            label: EmotionLabel::Neutral,
            confidence: 0.0,
        }
    }
}

impl Default for Emotion {
    fn default() -> Self {
        Self::neutral()
    }
}

// --- Symmetry ---

/// Facial symmetry measurement, or the reason it could not be taken.
///
/// Wire form is either `{asymmetry_score, predicted_condition, confidence}`
/// or `{error}`. Decoding is lenient: an `error` field wins over measurement
/// fields, an object with neither decodes as a failure, and missing
/// measurement fields take their defaults.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum Symmetry {
    Failed {
        error: String,
    },
    Measured {
        /// Mean normalized mirrored-landmark distance; lower is more symmetric.
        asymmetry_score: f64,
        predicted_condition: String,
        confidence: f64,
    },
}

/// Asymmetry assumed when a measurement omits its score.
pub const DEFAULT_ASYMMETRY_SCORE: f64 = 0.04;

#[derive(Deserialize)]
struct RawSymmetry {
    #[serde(default)]
    error: Option<String>,
    #[serde(default)]
    asymmetry_score: Option<f64>,
    #[serde(default)]
    predicted_condition: Option<String>,
    #[serde(default)]
    confidence: Option<f64>,
}

impl From<RawSymmetry> for Symmetry {
    fn from(raw: RawSymmetry) -> Self {
        if let Some(error) = raw.error {
            return Self::Failed { error };
        }
        if raw.asymmetry_score.is_none() && raw.predicted_condition.is_none() {
            return Self::Failed {
                error: "symmetry not measured".to_string(),
            };
        }
        Self::Measured {
            asymmetry_score: raw.asymmetry_score.unwrap_or(DEFAULT_ASYMMETRY_SCORE),
            predicted_condition: raw.predicted_condition.unwrap_or_default(),
            confidence: raw.confidence.unwrap_or(0.0),
        }
    }
}

impl<'de> Deserialize<'de> for Symmetry {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        RawSymmetry::deserialize(deserializer).map(Self::from)
    }
}

impl Symmetry {
    pub fn no_face() -> Self {
        Self::Failed {
            error: "No face detected".to_string(),
        }
    }

    pub fn error(&self) -> Option<&str> {
        match self {
            Self::Failed { error } => Some(error),
            Self::Measured { .. } => None,
        }
    }

    pub fn predicted_condition(&self) -> Option<&str> {
        match self {
            Self::Measured {
                predicted_condition,
                ..
            } => Some(predicted_condition),
            Self::Failed { .. } => None,
        }
    }
}

// --- Skin ---

/// Skin close-up classification. `label` is `None` when no skin image was analyzed.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SkinCondition {
    #[serde(default)]
    pub label: Option<String>,
    #[serde(default, deserialize_with = "confidence_or_zero")]
    pub confidence: f64,
}

impl SkinCondition {
    pub fn not_analyzed() -> Self {
        Self::default()
    }

    pub fn new(label: impl Into<String>, confidence: f64) -> Self {
        Self {
            label: Some(label.into()),
            confidence,
        }
    }

    /// Pick the most probable class from a classifier output ordered as
    /// [`SKIN_CONDITIONS`]. Empty or oversized vectors yield "not analyzed".
    pub fn from_class_scores(scores: &[f64]) -> Self {
        if scores.is_empty() || scores.len() > SKIN_CONDITIONS.len() {
            return Self::not_analyzed();
        }

        let best = scores
            .iter()
            .enumerate()
            .filter(|(_, s)| s.is_finite())
            .max_by(|(_, a), (_, b)| a.partial_cmp(b).unwrap_or(std::cmp::Ordering::Equal));

        match best {
            Some((idx, &confidence)) => Self::new(SKIN_CONDITIONS[idx], confidence),
            None => Self::not_analyzed(),
        }
    }
}

/// Severity tier of a skin label, by case-sensitive substring match.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SkinSeverity {
    Normal,
    Dangerous,
    Moderate,
    Mild,
    Unrecognized,
}

impl SkinSeverity {
    pub fn classify(label: &str) -> Self {
        let mentions = |set: &[&str]| set.iter().any(|c| label.contains(c));

        if label == "Normal" {
            Self::Normal
        } else if mentions(&DANGEROUS_SKIN_CONDITIONS[..]) {
            Self::Dangerous
        } else if mentions(&MODERATE_SKIN_CONDITIONS[..]) {
            Self::Moderate
        } else if mentions(&MILD_SKIN_CONDITIONS[..]) {
            Self::Mild
        } else {
            Self::Unrecognized
        }
    }
}

// --- Aggregate ---

/// One predictor's output, tagged by dimension.
#[derive(Debug, Clone, PartialEq)]
pub enum SignalResult {
    AgeGender(AgeGender),
    Fatigue(Fatigue),
    Symmetry(Symmetry),
    Emotion(Emotion),
    Skin(SkinCondition),
}

/// Everything the predictors reported for one request.
///
/// Missing dimensions deserialize to their neutral results; `symmetry` stays
/// `None` when it was never computed.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct AnalysisResult {
    #[serde(default)]
    pub age_gender: AgeGender,
    #[serde(default)]
    pub fatigue: Fatigue,
    #[serde(default)]
    pub emotion: Emotion,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub symmetry: Option<Symmetry>,
    #[serde(default)]
    pub skin: SkinCondition,
}

impl AnalysisResult {
    /// Assemble from predictor outputs, starting from neutral results.
    /// A later signal for the same dimension replaces an earlier one.
    pub fn from_signals(signals: impl IntoIterator<Item = SignalResult>) -> Self {
        let mut result = Self::default();
        for signal in signals {
            match signal {
                SignalResult::AgeGender(v) => result.age_gender = v,
                SignalResult::Fatigue(v) => result.fatigue = v,
                SignalResult::Symmetry(v) => result.symmetry = Some(v),
                SignalResult::Emotion(v) => result.emotion = v,
                SignalResult::Skin(v) => result.skin = v,
            }
        }
        result
    }

    /// Raw per-field confidences. Symmetry and skin appear only when measured.
    pub fn confidence_scores(&self) -> BTreeMap<String, f64> {
        let mut scores = BTreeMap::new();
        scores.insert("age".to_string(), self.age_gender.age_confidence);
        scores.insert("gender".to_string(), self.age_gender.gender_confidence);
        scores.insert("fatigue".to_string(), self.fatigue.confidence);
        scores.insert("emotion".to_string(), self.emotion.confidence);
        if let Some(Symmetry::Measured { confidence, .. }) = &self.symmetry {
            scores.insert("symmetry".to_string(), *confidence);
        }
        if self.skin.label.is_some() {
            scores.insert("skin".to_string(), self.skin.confidence);
        }
        scores
    }
}
