//! Geometric features from facial landmarks
//!
//! All landmark indexing lives here. Swapping to a different landmark
//! convention only means adding a [`LandmarkLayout`].

use crate::landmarks::{LandmarkSet, Point};
use crate::DrowsinessError;
use serde::{Deserialize, Serialize};

/// Reference distances at or below this are treated as degenerate
pub const MIN_REFERENCE_DISTANCE: f64 = 1e-6;

/// Per-frame feature triple
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct FeatureTriple {
    /// Eye aspect ratio (lower = more closed)
    pub ear: f64,
    /// Mouth aspect ratio (higher = more open)
    pub mar: f64,
    /// 100 = facing the camera, decreasing with head turn
    pub head_pose_score: f64,
}

impl FeatureTriple {
    pub fn new(ear: f64, mar: f64, head_pose_score: f64) -> Self {
        Self {
            ear,
            mar,
            head_pose_score,
        }
    }

    /// EAR and MAR must be finite and non-negative, the head pose score
    /// must lie in [0, 100]
    pub fn validate(&self) -> Result<(), DrowsinessError> {
        let ranges = [
            ("ear", self.ear, f64::MAX),
            ("mar", self.mar, f64::MAX),
            ("head_pose_score", self.head_pose_score, 100.0),
        ];
        for (feature, value, max) in ranges {
            if !(value.is_finite() && (0.0..=max).contains(&value)) {
                return Err(DrowsinessError::InvalidFeature { feature, value });
            }
        }
        Ok(())
    }
}

/// Landmark indices of one eye
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct EyeIndices {
    /// Horizontal reference (inner/outer corner)
    width: (usize, usize),
    /// Upper/lower lid pairs
    lids: [(usize, usize); 2],
}

/// Which landmark indices feed each measurement
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LandmarkLayout {
    left_eye: EyeIndices,
    right_eye: EyeIndices,
    mouth_width: (usize, usize),
    mouth_opening: [(usize, usize); 3],
    outer_eye_corners: (usize, usize),
    nose_tip: usize,
}

impl LandmarkLayout {
    /// 68-point iBUG convention, MAR from the inner lip contour
    pub const IBUG_68: Self = Self {
        left_eye: EyeIndices {
            width: (36, 39),
            lids: [(37, 41), (38, 40)],
        },
        right_eye: EyeIndices {
            width: (42, 45),
            lids: [(43, 47), (44, 46)],
        },
        mouth_width: (60, 64),
        mouth_opening: [(61, 67), (62, 66), (63, 65)],
        outer_eye_corners: (36, 45),
        nose_tip: 30,
    };

    /// 68-point iBUG convention, MAR from the outer lip contour
    pub const IBUG_68_OUTER_LIPS: Self = Self {
        mouth_width: (48, 54),
        mouth_opening: [(51, 57), (50, 58), (52, 56)],
        ..Self::IBUG_68
    };
}

impl Default for LandmarkLayout {
    fn default() -> Self {
        Self::IBUG_68
    }
}

/// Euclidean distance between two points
pub fn euclidean(a: Point, b: Point) -> f64 {
    (a.x - b.x).hypot(a.y - b.y)
}

/// EAR with the default layout
pub fn eye_aspect_ratio(landmarks: &LandmarkSet) -> Result<f64, DrowsinessError> {
    FeatureExtractor::default().eye_aspect_ratio(landmarks)
}

/// MAR with the default layout
pub fn mouth_aspect_ratio(landmarks: &LandmarkSet) -> Result<f64, DrowsinessError> {
    FeatureExtractor::default().mouth_aspect_ratio(landmarks)
}

/// Head pose score with the default layout
pub fn head_pose_score(landmarks: &LandmarkSet) -> Result<f64, DrowsinessError> {
    FeatureExtractor::default().head_pose_score(landmarks)
}

/// Divide by a reference distance, refusing degenerate denominators
fn checked_ratio(
    measure: &'static str,
    numerator: f64,
    reference: f64,
) -> Result<f64, DrowsinessError> {
    if !(reference.is_finite() && reference > MIN_REFERENCE_DISTANCE) {
        return Err(DrowsinessError::DegenerateGeometry { measure, reference });
    }

    let value = numerator / reference;
    if !value.is_finite() {
        return Err(DrowsinessError::DegenerateGeometry { measure, reference });
    }
    Ok(value)
}

/// Stateless feature extractor
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct FeatureExtractor {
    layout: LandmarkLayout,
}

impl FeatureExtractor {
    pub fn new(layout: LandmarkLayout) -> Self {
        Self { layout }
    }

    /// Compute EAR, MAR and head pose score for one face
    pub fn extract(&self, landmarks: &LandmarkSet) -> Result<FeatureTriple, DrowsinessError> {
        Ok(FeatureTriple {
            ear: self.eye_aspect_ratio(landmarks)?,
            mar: self.mouth_aspect_ratio(landmarks)?,
            head_pose_score: self.head_pose_score(landmarks)?,
        })
    }

    /// Average of both eyes' (v1 + v2) / (2 * width)
    pub fn eye_aspect_ratio(&self, landmarks: &LandmarkSet) -> Result<f64, DrowsinessError> {
        let left = Self::single_eye(landmarks, &self.layout.left_eye)?;
        let right = Self::single_eye(landmarks, &self.layout.right_eye)?;
        Ok((left + right) / 2.0)
    }

    fn single_eye(landmarks: &LandmarkSet, eye: &EyeIndices) -> Result<f64, DrowsinessError> {
        let vertical: f64 = eye
            .lids
            .iter()
            .map(|&(upper, lower)| euclidean(landmarks[upper], landmarks[lower]))
            .sum();
        let width = euclidean(landmarks[eye.width.0], landmarks[eye.width.1]);
        checked_ratio("eye width", vertical, 2.0 * width)
    }

    /// Summed lip openings / (2 * mouth width)
    pub fn mouth_aspect_ratio(&self, landmarks: &LandmarkSet) -> Result<f64, DrowsinessError> {
        let vertical: f64 = self
            .layout
            .mouth_opening
            .iter()
            .map(|&(upper, lower)| euclidean(landmarks[upper], landmarks[lower]))
            .sum();
        let (left, right) = self.layout.mouth_width;
        let width = euclidean(landmarks[left], landmarks[right]);
        checked_ratio("mouth width", vertical, 2.0 * width)
    }

    /// Head turn proxy in [0, 100].
    ///
    /// Uses the horizontal offset of the nose tip from the midpoint of the
    /// outer eye corners, normalised by the corner distance. The vertical
    /// offset is ignored: on a frontal face the nose tip already sits well
    /// below the eye line.
    pub fn head_pose_score(&self, landmarks: &LandmarkSet) -> Result<f64, DrowsinessError> {
        let (left, right) = self.layout.outer_eye_corners;
        let (left, right) = (landmarks[left], landmarks[right]);
        let mid_eye = left.midpoint(right);
        let eye_width = euclidean(left, right);

        let offset = (landmarks[self.layout.nose_tip].x - mid_eye.x).abs();
        let deviation = checked_ratio("outer eye corner distance", offset, eye_width)?;

        Ok((100.0 - deviation * 200.0).clamp(0.0, 100.0))
    }
}
