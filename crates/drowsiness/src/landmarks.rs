//! 68-point facial landmark input

use crate::DrowsinessError;
use serde::{Deserialize, Serialize};
use std::ops::Index;

/// Number of points produced by the landmark model
pub const LANDMARK_COUNT: usize = 68;

/// 2-D image-space point
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Point {
    pub x: f64,
    pub y: f64,
}

impl Point {
    pub const fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }

    pub fn midpoint(self, other: Point) -> Point {
        Point::new((self.x + other.x) / 2.0, (self.y + other.y) / 2.0)
    }
}

impl From<(f64, f64)> for Point {
    fn from((x, y): (f64, f64)) -> Self {
        Self { x, y }
    }
}

impl From<[f64; 2]> for Point {
    fn from([x, y]: [f64; 2]) -> Self {
        Self { x, y }
    }
}

/// Exactly 68 ordered landmarks for one detected face.
///
/// A missing face is [`Frame::NoFace`], never an empty set.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "Vec<Point>", into = "Vec<Point>")]
pub struct LandmarkSet {
    points: [Point; LANDMARK_COUNT],
}

impl LandmarkSet {
    pub fn new(points: [Point; LANDMARK_COUNT]) -> Self {
        Self { points }
    }

    /// Build from a slice, checking the point count
    pub fn from_slice(points: &[Point]) -> Result<Self, DrowsinessError> {
        let points: [Point; LANDMARK_COUNT] = points
            .try_into()
            .map_err(|_| DrowsinessError::InvalidLandmarkCount(points.len()))?;
        Ok(Self { points })
    }

    pub fn points(&self) -> &[Point; LANDMARK_COUNT] {
        &self.points
    }
}

impl Index<usize> for LandmarkSet {
    type Output = Point;

    fn index(&self, index: usize) -> &Point {
        &self.points[index]
    }
}

impl From<[Point; LANDMARK_COUNT]> for LandmarkSet {
    fn from(points: [Point; LANDMARK_COUNT]) -> Self {
        Self::new(points)
    }
}

impl TryFrom<Vec<Point>> for LandmarkSet {
    type Error = DrowsinessError;

    fn try_from(points: Vec<Point>) -> Result<Self, Self::Error> {
        Self::from_slice(&points)
    }
}

impl From<LandmarkSet> for Vec<Point> {
    fn from(set: LandmarkSet) -> Self {
        set.points.to_vec()
    }
}

/// One frame of landmark model output
#[derive(Debug, Clone, PartialEq)]
pub enum Frame {
    /// A face was found
    Detected(LandmarkSet),
    /// No face in this frame
    NoFace,
}

impl Frame {
    pub fn landmarks(&self) -> Option<&LandmarkSet> {
        match self {
            Frame::Detected(set) => Some(set),
            Frame::NoFace => None,
        }
    }
}

impl From<LandmarkSet> for Frame {
    fn from(set: LandmarkSet) -> Self {
        Frame::Detected(set)
    }
}

impl From<Option<LandmarkSet>> for Frame {
    fn from(set: Option<LandmarkSet>) -> Self {
        set.map_or(Frame::NoFace, Frame::Detected)
    }
}

impl From<Option<[Point; LANDMARK_COUNT]>> for Frame {
    fn from(points: Option<[Point; LANDMARK_COUNT]>) -> Self {
        points.map_or(Frame::NoFace, |p| Frame::Detected(LandmarkSet::new(p)))
    }
}
