//! Facial symmetry from face-mesh landmarks.
//!
//! Compares left-side landmarks with their mirrored right-side partners and
//! reports the mean distance as the asymmetry score. Faces above the
//! asymmetry threshold get a condition guess from mouth-corner and brow
//! height differences.

use crate::types::Symmetry;
use serde::{Deserialize, Serialize};

/// Left-side mesh indices: eye corner, upper lid, lower lid, mouth corner, lip points.
const LEFT_POINTS: [usize; 6] = [33, 159, 145, 61, 78, 95];
/// Mirrored partners of [`LEFT_POINTS`].
const RIGHT_POINTS: [usize; 6] = [263, 386, 374, 291, 308, 324];

const LEFT_MOUTH: usize = 61;
const RIGHT_MOUTH: usize = 291;
const LEFT_BROW: usize = 159;
const RIGHT_BROW: usize = 386;

/// Below this the face counts as very symmetrical.
const VERY_SYMMETRICAL_THRESHOLD: f64 = 0.02;
/// Below this the asymmetry is considered normal variation.
const ASYMMETRY_THRESHOLD: f64 = 0.04;

// Vertical differences in pixels.
const MOUTH_DROOP_PX: f64 = 10.0;
const PALSY_BROW_PX: f64 = 8.0;
const STROKE_BROW_PX: f64 = 5.0;
const JAW_BROW_PX: f64 = 12.0;

/// A face-mesh landmark in normalized image coordinates ([0, 1] on each axis).
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct MeshPoint {
    pub x: f64,
    pub y: f64,
}

impl MeshPoint {
    pub fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }
}

/// Number of landmarks [`measure`] needs.
pub fn required_landmarks() -> usize {
    LEFT_POINTS
        .iter()
        .chain(RIGHT_POINTS.iter())
        .copied()
        .max()
        .unwrap_or(0)
        + 1
}

/// Measure symmetry from the landmarks of one face in a `width`×`height` image.
///
/// An empty landmark list means no face was found.
pub fn measure(landmarks: &[MeshPoint], width: u32, height: u32) -> Symmetry {
    if landmarks.is_empty() {
        return Symmetry::no_face();
    }
    let required = required_landmarks();
    if landmarks.len() < required {
        return Symmetry::Failed {
            error: format!(
                "face mesh has {} landmarks, need at least {required}",
                landmarks.len()
            ),
        };
    }
    if width == 0 || height == 0 {
        return Symmetry::Failed {
            error: format!("invalid image dimensions {width}x{height}"),
        };
    }

    let w = width as f64;
    let h = height as f64;
    // Pixel positions are truncated, matching the landmark tooling's integer grid.
    let to_px = |p: MeshPoint| ((p.x * w) as i64, (p.y * h) as i64);

    let total: f64 = LEFT_POINTS
        .iter()
        .zip(RIGHT_POINTS.iter())
        .map(|(&l, &r)| {
            let (lx, ly) = to_px(landmarks[l]);
            let (rx, ry) = to_px(landmarks[r]);
            let mirrored_rx = width as i64 - rx;
            let dx = (lx - mirrored_rx) as f64;
            let dy = (ly - ry) as f64;
            dx.hypot(dy) / w
        })
        .sum();
    let score = total / LEFT_POINTS.len() as f64;

    let predicted_condition = if score < VERY_SYMMETRICAL_THRESHOLD {
        "Very Symmetrical"
    } else if score < ASYMMETRY_THRESHOLD {
        "Slight Asymmetry (likely normal)"
    } else {
        predict_condition(landmarks, h)
    };

    tracing::debug!(score, predicted_condition, "symmetry measured");

    Symmetry::Measured {
        asymmetry_score: (score * 10_000.0).round() / 10_000.0,
        predicted_condition: predicted_condition.to_string(),
        confidence: ((1.0 - (score * 10.0).min(1.0)) * 100.0).round() / 100.0,
    }
}

fn predict_condition(landmarks: &[MeshPoint], h: f64) -> &'static str {
    let mouth_diff = ((landmarks[LEFT_MOUTH].y - landmarks[RIGHT_MOUTH].y) * h).abs();
    let brow_diff = ((landmarks[LEFT_BROW].y - landmarks[RIGHT_BROW].y) * h).abs();

    if mouth_diff > MOUTH_DROOP_PX && brow_diff > PALSY_BROW_PX {
        "Probable Signs of Bell's Palsy"
    } else if mouth_diff > MOUTH_DROOP_PX && brow_diff < STROKE_BROW_PX {
        "Probable signs of Stroke"
    } else if brow_diff > JAW_BROW_PX {
        "Possible Congenital Jaw Defect"
    } else {
        "Facial Asymmetry Detected"
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const SIZE: u32 = 1024;

    /// A mesh where every paired landmark mirrors its partner exactly.
    fn symmetric_mesh() -> Vec<MeshPoint> {
        let mut mesh = vec![MeshPoint::new(0.5, 0.5); 468];
        for (&l, &r) in LEFT_POINTS.iter().zip(RIGHT_POINTS.iter()) {
            mesh[l] = MeshPoint::new(0.25, 0.5);
            mesh[r] = MeshPoint::new(0.75, 0.5);
        }
        mesh
    }

    /// Pull the eye and lip pairs (not mouth corners or brows) 64px off their mirror.
    fn shift_non_feature_pairs(mesh: &mut [MeshPoint]) {
        for r in [263, 374, 308, 324] {
            mesh[r].x = 0.6875;
        }
    }

    fn condition(symmetry: &Symmetry) -> &str {
        symmetry.predicted_condition().expect("measured")
    }

    #[test]
    fn test_required_landmarks() {
        assert_eq!(required_landmarks(), 387);
    }

    #[test]
    fn test_empty_mesh_is_no_face() {
        assert_eq!(measure(&[], SIZE, SIZE), Symmetry::no_face());
    }

    #[test]
    fn test_short_mesh_is_error() {
        let result = measure(&[MeshPoint::default(); 10], SIZE, SIZE);
        assert!(result.error().unwrap().contains("need at least 387"));
    }

    #[test]
    fn test_zero_size_is_error() {
        let result = measure(&symmetric_mesh(), 0, SIZE);
        assert!(result.error().is_some());
    }

    #[test]
    fn test_perfect_mirror_is_very_symmetrical() {
        let result = measure(&symmetric_mesh(), SIZE, SIZE);
        match result {
            Symmetry::Measured {
                asymmetry_score,
                ref predicted_condition,
                confidence,
            } => {
                assert_eq!(asymmetry_score, 0.0);
                assert_eq!(predicted_condition, "Very Symmetrical");
                assert_eq!(confidence, 1.0);
            }
            Symmetry::Failed { .. } => panic!("expected measurement"),
        }
    }

    #[test]
    fn test_slight_asymmetry() {
        let mut mesh = symmetric_mesh();
        // One pair 128px off: mean 0.125 / 6 ≈ 0.0208.
        mesh[263].x = 0.625;
        let result = measure(&mesh, SIZE, SIZE);
        assert_eq!(condition(&result), "Slight Asymmetry (likely normal)");
    }

    #[test]
    fn test_generic_asymmetry() {
        let mut mesh = symmetric_mesh();
        shift_non_feature_pairs(&mut mesh);
        let result = measure(&mesh, SIZE, SIZE);
        assert_eq!(condition(&result), "Facial Asymmetry Detected");
        if let Symmetry::Measured {
            asymmetry_score,
            confidence,
            ..
        } = result
        {
            assert!((asymmetry_score - 0.0417).abs() < 1e-9);
            assert!((confidence - 0.58).abs() < 1e-9);
        }
    }

    #[test]
    fn test_palsy_pattern() {
        let mut mesh = symmetric_mesh();
        shift_non_feature_pairs(&mut mesh);
        mesh[RIGHT_MOUTH].y = 0.515625; // 16px droop
        mesh[RIGHT_BROW].y = 0.509765625; // 10px brow drop
        let result = measure(&mesh, SIZE, SIZE);
        assert_eq!(condition(&result), "Probable Signs of Bell's Palsy");
    }

    #[test]
    fn test_stroke_pattern() {
        let mut mesh = symmetric_mesh();
        shift_non_feature_pairs(&mut mesh);
        mesh[RIGHT_MOUTH].y = 0.515625;
        let result = measure(&mesh, SIZE, SIZE);
        assert_eq!(condition(&result), "Probable signs of Stroke");
    }

    #[test]
    fn test_jaw_pattern() {
        let mut mesh = symmetric_mesh();
        shift_non_feature_pairs(&mut mesh);
        mesh[RIGHT_BROW].y = 0.515625; // 16px brow drop, no mouth droop
        let result = measure(&mesh, SIZE, SIZE);
        assert_eq!(condition(&result), "Possible Congenital Jaw Defect");
    }
}
