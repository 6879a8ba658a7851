//! Sub-score mapping.
//!
//! Each function maps one signal to a score in [0, 100]. They never fail:
//! a missing, erroneous or unrecognized input falls back to the dimension's
//! neutral default.

use crate::index::Dimension;
use crate::types::{
    Emotion, EmotionLabel, Fatigue, FatigueStatus, SignalResult, SkinCondition, SkinSeverity,
    Symmetry,
};

pub const MAX_SCORE: f64 = 100.0;

/// Symmetry score when no measurement is available.
pub const NEUTRAL_SYMMETRY_SCORE: f64 = 50.0;
/// Fatigue score for an unknown status.
pub const NEUTRAL_FATIGUE_SCORE: f64 = 60.0;
/// Skin score when no skin image was analyzed or the label is unrecognized.
pub const NEUTRAL_SKIN_SCORE: f64 = 70.0;
/// Emotion score for an unrecognized label.
pub const NEUTRAL_EMOTION_SCORE: f64 = 70.0;

/// Score points lost per unit of asymmetry when no condition label applies.
const ASYMMETRY_PENALTY: f64 = 1000.0;

/// Symmetry condition, classified from the free-text predictor label.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SymmetryCondition {
    VerySymmetrical,
    SlightAsymmetry,
    PalsyOrStroke,
    AsymmetryDetected,
    Unclassified,
}

impl SymmetryCondition {
    /// Priority-ordered substring match; the first matching rule wins.
    pub fn classify(label: &str) -> Self {
        if label.contains("Very Symmetrical") {
            Self::VerySymmetrical
        } else if label.contains("Slight Asymmetry") || label.to_lowercase().contains("normal") {
            Self::SlightAsymmetry
        } else if label.contains("Palsy") || label.contains("Stroke") {
            Self::PalsyOrStroke
        } else if label.contains("Asymmetry Detected") {
            Self::AsymmetryDetected
        } else {
            Self::Unclassified
        }
    }
}

/// Clamp a confidence into [0, 1]; non-finite values count as zero.
fn unit_interval(value: f64) -> f64 {
    if value.is_finite() {
        value.clamp(0.0, 1.0)
    } else {
        0.0
    }
}

pub fn symmetry_score(symmetry: Option<&Symmetry>) -> f64 {
    let Some(Symmetry::Measured {
        asymmetry_score,
        predicted_condition,
        ..
    }) = symmetry
    else {
        return NEUTRAL_SYMMETRY_SCORE;
    };

    match SymmetryCondition::classify(predicted_condition) {
        SymmetryCondition::VerySymmetrical => 100.0,
        SymmetryCondition::SlightAsymmetry => 85.0,
        SymmetryCondition::PalsyOrStroke => 40.0,
        SymmetryCondition::AsymmetryDetected => 60.0,
        SymmetryCondition::Unclassified => {
            if !asymmetry_score.is_finite() || *asymmetry_score < 0.0 {
                tracing::debug!(
                    asymmetry_score,
                    "malformed asymmetry score; using neutral symmetry score"
                );
                return NEUTRAL_SYMMETRY_SCORE;
            }
            (MAX_SCORE - asymmetry_score * ASYMMETRY_PENALTY).clamp(0.0, MAX_SCORE)
        }
    }
}

pub fn fatigue_score(fatigue: &Fatigue) -> f64 {
    match fatigue.status {
        FatigueStatus::NotFatigued => 100.0,
        FatigueStatus::SlightlyFatigued => 70.0,
        FatigueStatus::Fatigued => 40.0,
        FatigueStatus::Unknown => NEUTRAL_FATIGUE_SCORE,
    }
}

/// Confidence penalizes harmful conditions: a surer diagnosis scores lower,
/// down to each tier's floor.
pub fn skin_score(skin: &SkinCondition) -> f64 {
    let Some(label) = skin.label.as_deref().filter(|l| !l.is_empty()) else {
        return NEUTRAL_SKIN_SCORE;
    };
    let confidence = unit_interval(skin.confidence);

    match SkinSeverity::classify(label) {
        SkinSeverity::Normal => 100.0,
        SkinSeverity::Dangerous => (50.0 - confidence * 20.0).max(30.0),
        SkinSeverity::Moderate => (70.0 - confidence * 10.0).max(50.0),
        SkinSeverity::Mild => (85.0 - confidence * 5.0).max(70.0),
        SkinSeverity::Unrecognized => {
            tracing::debug!(label, "unrecognized skin label; using neutral skin score");
            NEUTRAL_SKIN_SCORE
        }
    }
}

pub fn emotion_score(emotion: &Emotion) -> f64 {
    match &emotion.label {
        EmotionLabel::Happy => 100.0,
        EmotionLabel::Surprised => 80.0,
        EmotionLabel::Neutral => 75.0,
        EmotionLabel::Sad => 50.0,
        EmotionLabel::Angry => 45.0,
        EmotionLabel::Other(_) => NEUTRAL_EMOTION_SCORE,
    }
}

/// Score a single signal. Age/gender is not part of the index and yields `None`.
pub fn score_signal(signal: &SignalResult) -> Option<(Dimension, f64)> {
    match signal {
        SignalResult::AgeGender(_) => None,
        SignalResult::Fatigue(f) => Some((Dimension::Fatigue, fatigue_score(f))),
        SignalResult::Symmetry(s) => Some((Dimension::Symmetry, symmetry_score(Some(s)))),
        SignalResult::Emotion(e) => Some((Dimension::Emotion, emotion_score(e))),
        SignalResult::Skin(s) => Some((Dimension::Skin, skin_score(s))),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::AgeGender;

    fn measured(score: f64, condition: &str) -> Symmetry {
        Symmetry::Measured {
            asymmetry_score: score,
            predicted_condition: condition.to_string(),
            confidence: 0.8,
        }
    }

    #[test]
    fn test_symmetry_missing_or_failed_is_neutral() {
        assert_eq!(symmetry_score(None), 50.0);
        assert_eq!(symmetry_score(Some(&Symmetry::no_face())), 50.0);
    }

    #[test]
    fn test_symmetry_condition_priority() {
        assert_eq!(symmetry_score(Some(&measured(0.01, "Very Symmetrical"))), 100.0);
        assert_eq!(
            symmetry_score(Some(&measured(0.03, "Slight Asymmetry (likely normal)"))),
            85.0
        );
        assert_eq!(symmetry_score(Some(&measured(0.05, "Looks NORMAL"))), 85.0);
        assert_eq!(
            symmetry_score(Some(&measured(0.06, "Probable Signs of Bell's Palsy"))),
            40.0
        );
        assert_eq!(symmetry_score(Some(&measured(0.06, "Probable signs of Stroke"))), 40.0);
        assert_eq!(
            symmetry_score(Some(&measured(0.06, "Facial Asymmetry Detected"))),
            60.0
        );
    }

    #[test]
    fn test_symmetry_linear_penalty() {
        let s = symmetry_score(Some(&measured(0.05, "Possible Congenital Jaw Defect")));
        assert!((s - 50.0).abs() < 1e-9);
        assert_eq!(symmetry_score(Some(&measured(0.5, "Unknown"))), 0.0);
        assert_eq!(symmetry_score(Some(&measured(0.0, "Unknown"))), 100.0);
    }

    #[test]
    fn test_symmetry_malformed_score_is_neutral() {
        assert_eq!(symmetry_score(Some(&measured(f64::NAN, "Unknown"))), 50.0);
        assert_eq!(symmetry_score(Some(&measured(-0.2, "Unknown"))), 50.0);
    }

    #[test]
    fn test_fatigue_scores() {
        let score = |label: &str| {
            fatigue_score(&Fatigue {
                status: FatigueStatus::from_label(label),
                confidence: 0.7,
            })
        };
        assert_eq!(score("Not Fatigued"), 100.0);
        assert_eq!(score("Slightly Fatigued"), 70.0);
        assert_eq!(score("Fatigued"), 40.0);
        assert_eq!(score("Unknown"), 60.0);
    }

    #[test]
    fn test_skin_tiers() {
        assert_eq!(skin_score(&SkinCondition::not_analyzed()), 70.0);
        assert_eq!(skin_score(&SkinCondition::new("", 0.9)), 70.0);
        assert_eq!(skin_score(&SkinCondition::new("Normal", 0.9)), 100.0);
        assert!((skin_score(&SkinCondition::new("Melanoma", 0.9)) - 32.0).abs() < 1e-9);
        assert!((skin_score(&SkinCondition::new("Acne", 0.5)) - 65.0).abs() < 1e-9);
        assert!((skin_score(&SkinCondition::new("Dermatofibroma", 1.0)) - 80.0).abs() < 1e-9);
        assert_eq!(skin_score(&SkinCondition::new("Rosacea", 0.9)), 70.0);
    }

    #[test]
    fn test_dangerous_skin_score_decreases_with_confidence() {
        let mut previous = f64::INFINITY;
        for step in 0..=10 {
            let confidence = step as f64 / 10.0;
            let score = skin_score(&SkinCondition::new("Squamous Cell Carcinoma", confidence));
            assert!(score < previous, "confidence {confidence} gave {score}");
            assert!(score >= 30.0);
            previous = score;
        }
        // Out-of-range confidence holds the floor.
        assert_eq!(skin_score(&SkinCondition::new("Melanoma", 7.0)), 30.0);
    }

    #[test]
    fn test_emotion_table() {
        let score = |label: &str| {
            emotion_score(&Emotion {
                label: EmotionLabel::from_label(label),
                confidence: 0.5,
            })
        };
        assert_eq!(score("Happy"), 100.0);
        assert_eq!(score("Surprised"), 80.0);
        assert_eq!(score("Neutral"), 75.0);
        assert_eq!(score("Sad"), 50.0);
        assert_eq!(score("Angry"), 45.0);
        assert_eq!(score("Bored"), 70.0);
    }

    #[test]
    fn test_score_signal_skips_age_gender() {
        assert_eq!(score_signal(&SignalResult::AgeGender(AgeGender::unknown())), None);
        assert_eq!(
            score_signal(&SignalResult::Symmetry(Symmetry::no_face())),
            Some((Dimension::Symmetry, 50.0))
        );
    }
}
