//! Health index plus recommendations, as handed to the transport layer.

use crate::index::{HealthIndex, HealthIndexCalculator};
use crate::recommend::RecommendationEngine;
use crate::types::AnalysisResult;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HealthReport {
    #[serde(flatten)]
    pub index: HealthIndex,
    pub recommendations: Vec<String>,
}

impl HealthReport {
    /// Score `result` and derive its recommendations.
    pub fn assess(
        calculator: &HealthIndexCalculator,
        recommender: &RecommendationEngine,
        result: &AnalysisResult,
    ) -> Self {
        Self {
            index: calculator.calculate(result),
            recommendations: recommender.recommend(result),
        }
    }
}
