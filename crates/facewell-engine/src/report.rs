use facewell_core::{
    AnalysisResult, EmotionLabel, FatigueStatus, Gender, HealthIndex, HealthReport, Symmetry,
};
use serde::Serialize;
use std::collections::BTreeMap;

/// Everything returned for one analyzed photo: the raw signals, their
/// confidences, the health index and the recommendations.
#[derive(Debug, Clone, Serialize)]
pub struct AnalysisReport {
    pub request_id: String,
    pub age: u32,
    pub gender: Gender,
    pub fatigue: FatigueStatus,
    pub emotion: EmotionLabel,
    /// Absent when no landmark extractor is installed.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub symmetry: Option<Symmetry>,
    pub skin_condition: Option<String>,
    pub confidence_scores: BTreeMap<String, f64>,
    pub health_index: HealthIndex,
    pub recommendations: Vec<String>,
}

impl AnalysisReport {
    pub fn new(request_id: String, result: &AnalysisResult, health: HealthReport) -> Self {
        Self {
            request_id,
            age: result.age_gender.age,
            gender: result.age_gender.gender,
            fatigue: result.fatigue.status,
            emotion: result.emotion.label.clone(),
            symmetry: result.symmetry.clone(),
            skin_condition: result.skin.label.clone(),
            confidence_scores: result.confidence_scores(),
            health_index: health.index,
            recommendations: health.recommendations,
        }
    }
}
