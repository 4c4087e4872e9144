//! Synthetic 68-point faces for tests and benches

#![allow(dead_code)]

use drowsiness::{LandmarkSet, Point, LANDMARK_COUNT};

/// Eye openness giving EAR 0.3
pub const EYES_OPEN: f64 = 3.0;
/// Eye openness giving EAR 0.1
pub const EYES_CLOSED: f64 = 1.0;
/// Mouth openness giving MAR 0.075
pub const MOUTH_SHUT: f64 = 0.5;
/// Mouth openness giving MAR 0.9
pub const MOUTH_YAWN: f64 = 6.0;

/// Synthetic frontal face.
///
/// `eye` is the half lid gap (EAR = eye / 10), `mouth` the half inner lip
/// gap (MAR = 0.15 * mouth), `nose_dx` the horizontal nose tip offset
/// against an outer eye corner distance of 60 (head pose score =
/// 100 - |nose_dx| * 10 / 3).
pub fn face(eye: f64, mouth: f64, nose_dx: f64) -> LandmarkSet {
    let mut p = [Point::default(); LANDMARK_COUNT];

    // Jaw line and brows, unused by the features
    for (i, pt) in p.iter_mut().enumerate().take(27) {
        *pt = Point::new(20.0 + i as f64 * 3.0, 20.0);
    }

    p[36] = Point::new(30.0, 50.0);
    p[37] = Point::new(36.0, 50.0 - eye);
    p[38] = Point::new(44.0, 50.0 - eye);
    p[39] = Point::new(50.0, 50.0);
    p[40] = Point::new(44.0, 50.0 + eye);
    p[41] = Point::new(36.0, 50.0 + eye);

    p[42] = Point::new(70.0, 50.0);
    p[43] = Point::new(76.0, 50.0 - eye);
    p[44] = Point::new(84.0, 50.0 - eye);
    p[45] = Point::new(90.0, 50.0);
    p[46] = Point::new(84.0, 50.0 + eye);
    p[47] = Point::new(76.0, 50.0 + eye);

    for (k, i) in (27..36).enumerate() {
        p[i] = Point::new(60.0 + nose_dx, 55.0 + k as f64 * 2.5);
    }
    p[30] = Point::new(60.0 + nose_dx, 75.0);

    for (k, i) in (48..60).enumerate() {
        let angle = k as f64 / 12.0 * std::f64::consts::TAU;
        p[i] = Point::new(60.0 - 15.0 * angle.cos(), 100.0 + (3.0 + mouth) * angle.sin());
    }

    p[60] = Point::new(50.0, 100.0);
    p[61] = Point::new(55.0, 100.0 - mouth);
    p[62] = Point::new(60.0, 100.0 - mouth);
    p[63] = Point::new(65.0, 100.0 - mouth);
    p[64] = Point::new(70.0, 100.0);
    p[65] = Point::new(65.0, 100.0 + mouth);
    p[66] = Point::new(60.0, 100.0 + mouth);
    p[67] = Point::new(55.0, 100.0 + mouth);

    LandmarkSet::new(p)
}

pub fn open_eyes() -> LandmarkSet {
    face(EYES_OPEN, MOUTH_SHUT, 0.0)
}

pub fn closed_eyes() -> LandmarkSet {
    face(EYES_CLOSED, MOUTH_SHUT, 0.0)
}

pub fn yawning() -> LandmarkSet {
    face(EYES_OPEN, MOUTH_YAWN, 0.0)
}

/// Eye corners collapsed onto each other
pub fn zero_width_eyes() -> LandmarkSet {
    let mut p = *open_eyes().points();
    p[39] = p[36];
    p[45] = p[42];
    LandmarkSet::new(p)
}

/// Mouth corners collapsed onto each other
pub fn zero_width_mouth() -> LandmarkSet {
    let mut p = *open_eyes().points();
    p[64] = p[60];
    LandmarkSet::new(p)
}
