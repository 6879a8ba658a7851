//! Rule-based recommendations.
//!
//! Rules read the raw signals, not the computed scores. They are evaluated
//! in a fixed order and every triggered rule appends its messages; only the
//! symmetry and skin rules have internal first-match-wins branches.

use crate::types::{AnalysisResult, EmotionLabel, FatigueStatus, SkinSeverity};

pub const REST_ADVICE: &str = "Consider getting more rest and improving sleep quality";
pub const HYDRATION_ADVICE: &str = "Stay hydrated throughout the day";
pub const SYMMETRY_URGENT_ADVICE: &str =
    "Consult a healthcare professional immediately for facial asymmetry evaluation";
pub const SYMMETRY_MONITOR_ADVICE: &str =
    "Monitor facial symmetry changes and consult a doctor if symptoms persist";
pub const SKIN_URGENT_ADVICE: &str =
    "Seek immediate dermatological consultation for skin examination";
pub const SUN_PROTECTION_ADVICE: &str = "Avoid excessive sun exposure and use sunscreen daily";
pub const ACNE_ADVICE: &str =
    "Maintain a consistent skincare routine and consider consulting a dermatologist";
pub const SKIN_CHECKUP_ADVICE: &str =
    "Consider scheduling a dermatology checkup for skin evaluation";
pub const STRESS_ADVICE: &str =
    "Consider stress management techniques or speaking with a mental health professional";
pub const AGE_CHECKUP_ADVICE: &str = "Regular health checkups are recommended for your age group";
pub const LIFESTYLE_ADVICE: &str =
    "Maintain a healthy lifestyle with proper sleep, nutrition, and exercise";
pub const GENERAL_CARE_ADVICE: &str = "Stay hydrated and protect your skin from sun damage";

/// Ages above this trigger the checkup recommendation.
const CHECKUP_AGE_THRESHOLD: u32 = 40;

#[derive(Debug, Clone, Copy, Default)]
pub struct RecommendationEngine;

impl RecommendationEngine {
    /// Recommendations for `result`, in rule order. Never empty.
    pub fn recommend(&self, result: &AnalysisResult) -> Vec<String> {
        let mut out: Vec<&'static str> = Vec::new();

        fatigue_rule(result, &mut out);
        symmetry_rule(result, &mut out);
        skin_rule(result, &mut out);
        emotion_rule(result, &mut out);
        age_rule(result, &mut out);

        if out.is_empty() {
            out.push(LIFESTYLE_ADVICE);
            out.push(GENERAL_CARE_ADVICE);
        }

        tracing::debug!(count = out.len(), "recommendations generated");
        out.into_iter().map(String::from).collect()
    }
}

fn fatigue_rule(result: &AnalysisResult, out: &mut Vec<&'static str>) {
    if matches!(
        result.fatigue.status,
        FatigueStatus::Fatigued | FatigueStatus::SlightlyFatigued
    ) {
        out.push(REST_ADVICE);
        out.push(HYDRATION_ADVICE);
    }
}

fn symmetry_rule(result: &AnalysisResult, out: &mut Vec<&'static str>) {
    let Some(condition) = result.symmetry.as_ref().and_then(|s| s.predicted_condition()) else {
        return;
    };

    if condition.contains("Palsy") || condition.contains("Stroke") {
        out.push(SYMMETRY_URGENT_ADVICE);
    } else if condition.contains("Asymmetry Detected") {
        out.push(SYMMETRY_MONITOR_ADVICE);
    }
}

fn skin_rule(result: &AnalysisResult, out: &mut Vec<&'static str>) {
    let Some(label) = result.skin.label.as_deref().filter(|l| !l.is_empty()) else {
        return;
    };

    if SkinSeverity::classify(label) == SkinSeverity::Dangerous {
        out.push(SKIN_URGENT_ADVICE);
        out.push(SUN_PROTECTION_ADVICE);
    } else if label == "Acne" {
        out.push(ACNE_ADVICE);
    } else if label != "Normal" {
        out.push(SKIN_CHECKUP_ADVICE);
    }
}

fn emotion_rule(result: &AnalysisResult, out: &mut Vec<&'static str>) {
    if matches!(result.emotion.label, EmotionLabel::Sad | EmotionLabel::Angry) {
        out.push(STRESS_ADVICE);
    }
}

fn age_rule(result: &AnalysisResult, out: &mut Vec<&'static str>) {
    if result.age_gender.age > CHECKUP_AGE_THRESHOLD {
        out.push(AGE_CHECKUP_ADVICE);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::{AgeGender, Emotion, Fatigue, SkinCondition, Symmetry};

    fn base() -> AnalysisResult {
        AnalysisResult {
            age_gender: AgeGender {
                age: 25,
                ..AgeGender::unknown()
            },
            fatigue: Fatigue {
                status: FatigueStatus::NotFatigued,
                confidence: 0.7,
            },
            emotion: Emotion {
                label: EmotionLabel::Happy,
                confidence: 0.75,
            },
            symmetry: Some(Symmetry::no_face()),
            skin: SkinCondition::not_analyzed(),
        }
    }

    fn with_condition(condition: &str) -> AnalysisResult {
        AnalysisResult {
            symmetry: Some(Symmetry::Measured {
                asymmetry_score: 0.06,
                predicted_condition: condition.to_string(),
                confidence: 0.4,
            }),
            ..base()
        }
    }

    #[test]
    fn test_no_findings_gives_fallback_only() {
        let recs = RecommendationEngine.recommend(&base());
        assert_eq!(recs, vec![LIFESTYLE_ADVICE, GENERAL_CARE_ADVICE]);
    }

    #[test]
    fn test_dangerous_skin_adds_both_messages() {
        let input = AnalysisResult {
            skin: SkinCondition::new("Melanoma", 0.9),
            ..base()
        };
        let recs = RecommendationEngine.recommend(&input);
        assert_eq!(recs, vec![SKIN_URGENT_ADVICE, SUN_PROTECTION_ADVICE]);
    }

    #[test]
    fn test_fatigue_and_age_both_trigger() {
        let input = AnalysisResult {
            fatigue: Fatigue {
                status: FatigueStatus::Fatigued,
                confidence: 0.8,
            },
            age_gender: AgeGender {
                age: 45,
                ..AgeGender::unknown()
            },
            ..base()
        };
        let recs = RecommendationEngine.recommend(&input);
        assert_eq!(recs, vec![REST_ADVICE, HYDRATION_ADVICE, AGE_CHECKUP_ADVICE]);
    }

    #[test]
    fn test_slightly_fatigued_triggers_rest_advice() {
        let input = AnalysisResult {
            fatigue: Fatigue {
                status: FatigueStatus::SlightlyFatigued,
                confidence: 0.7,
            },
            ..base()
        };
        assert_eq!(
            RecommendationEngine.recommend(&input),
            vec![REST_ADVICE, HYDRATION_ADVICE]
        );
    }

    #[test]
    fn test_unknown_fatigue_is_silent() {
        let input = AnalysisResult {
            fatigue: Fatigue::unknown(),
            ..base()
        };
        assert_eq!(
            RecommendationEngine.recommend(&input),
            vec![LIFESTYLE_ADVICE, GENERAL_CARE_ADVICE]
        );
    }

    #[test]
    fn test_symmetry_rule_first_match_wins() {
        let recs = RecommendationEngine.recommend(&with_condition("Probable Signs of Bell's Palsy"));
        assert_eq!(recs, vec![SYMMETRY_URGENT_ADVICE]);

        let recs = RecommendationEngine.recommend(&with_condition("Probable signs of Stroke"));
        assert_eq!(recs, vec![SYMMETRY_URGENT_ADVICE]);

        let recs = RecommendationEngine.recommend(&with_condition("Facial Asymmetry Detected"));
        assert_eq!(recs, vec![SYMMETRY_MONITOR_ADVICE]);

        let recs = RecommendationEngine.recommend(&with_condition("Very Symmetrical"));
        assert_eq!(recs, vec![LIFESTYLE_ADVICE, GENERAL_CARE_ADVICE]);
    }

    #[test]
    fn test_skin_rule_branches() {
        let recs_for = |label: &str| {
            RecommendationEngine.recommend(&AnalysisResult {
                skin: SkinCondition::new(label, 0.6),
                ..base()
            })
        };
        assert_eq!(recs_for("Acne"), vec![ACNE_ADVICE]);
        assert_eq!(recs_for("Dermatofibroma"), vec![SKIN_CHECKUP_ADVICE]);
        assert_eq!(
            recs_for("Normal"),
            vec![LIFESTYLE_ADVICE, GENERAL_CARE_ADVICE]
        );
    }

    #[test]
    fn test_rule_order_across_categories() {
        let input = AnalysisResult {
            fatigue: Fatigue {
                status: FatigueStatus::Fatigued,
                confidence: 0.9,
            },
            emotion: Emotion {
                label: EmotionLabel::Angry,
                confidence: 0.6,
            },
            skin: SkinCondition::new("Basal Cell Carcinoma", 0.8),
            age_gender: AgeGender {
                age: 62,
                ..AgeGender::unknown()
            },
            ..with_condition("Facial Asymmetry Detected")
        };
        let recs = RecommendationEngine.recommend(&input);
        assert_eq!(
            recs,
            vec![
                REST_ADVICE,
                HYDRATION_ADVICE,
                SYMMETRY_MONITOR_ADVICE,
                SKIN_URGENT_ADVICE,
                SUN_PROTECTION_ADVICE,
                STRESS_ADVICE,
                AGE_CHECKUP_ADVICE,
            ]
        );
    }

    #[test]
    fn test_age_boundary() {
        let at = |age: u32| {
            RecommendationEngine.recommend(&AnalysisResult {
                age_gender: AgeGender {
                    age,
                    ..AgeGender::unknown()
                },
                ..base()
            })
        };
        assert!(!at(40).contains(&AGE_CHECKUP_ADVICE.to_string()));
        assert_eq!(at(41), vec![AGE_CHECKUP_ADVICE]);
    }
}
