use std::collections::BTreeMap;

use nalgebra::Point2;
use serde::{Deserialize, Serialize};

/// Image-space position in pixels (x to the right, y downwards).
pub type Point = Point2<f64>;

/// Named anatomical keypoint supplied by the pose estimator.
///
/// The subset matches the MediaPipe Pose topology; [`Landmark::mediapipe_index`]
/// maps each name to its index in the 33-landmark output.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Landmark {
    Nose,
    LeftShoulder,
    RightShoulder,
    LeftElbow,
    RightElbow,
    LeftWrist,
    RightWrist,
    LeftHip,
    RightHip,
    LeftKnee,
    RightKnee,
    LeftAnkle,
    RightAnkle,
}

impl Landmark {
    pub const ALL: [Landmark; 13] = [
        Landmark::Nose,
        Landmark::LeftShoulder,
        Landmark::RightShoulder,
        Landmark::LeftElbow,
        Landmark::RightElbow,
        Landmark::LeftWrist,
        Landmark::RightWrist,
        Landmark::LeftHip,
        Landmark::RightHip,
        Landmark::LeftKnee,
        Landmark::RightKnee,
        Landmark::LeftAnkle,
        Landmark::RightAnkle,
    ];

    /// Index of this landmark in the MediaPipe Pose output.
    pub fn mediapipe_index(self) -> usize {
        match self {
            Landmark::Nose => 0,
            Landmark::LeftShoulder => 11,
            Landmark::RightShoulder => 12,
            Landmark::LeftElbow => 13,
            Landmark::RightElbow => 14,
            Landmark::LeftWrist => 15,
            Landmark::RightWrist => 16,
            Landmark::LeftHip => 23,
            Landmark::RightHip => 24,
            Landmark::LeftKnee => 25,
            Landmark::RightKnee => 26,
            Landmark::LeftAnkle => 27,
            Landmark::RightAnkle => 28,
        }
    }

    pub fn from_mediapipe_index(index: usize) -> Option<Self> {
        Self::ALL
            .into_iter()
            .find(|lm| lm.mediapipe_index() == index)
    }
}

/// Image axis a detector projects positions onto.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Axis {
    X,
    Y,
}

impl Axis {
    #[inline]
    pub fn project(self, p: &Point) -> f64 {
        match self {
            Axis::X => p.x,
            Axis::Y => p.y,
        }
    }
}

/// Landmark positions observed in one processed frame.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct LandmarkSample {
    /// Monotonically increasing frame index.
    pub frame: u64,
    pub landmarks: BTreeMap<Landmark, Point>,
}

impl LandmarkSample {
    pub fn new(frame: u64) -> Self {
        Self {
            frame,
            landmarks: BTreeMap::new(),
        }
    }

    /// Builder-style insert, mostly for tests and synthetic streams.
    pub fn with(mut self, landmark: Landmark, x: f64, y: f64) -> Self {
        self.landmarks.insert(landmark, Point::new(x, y));
        self
    }

    /// Build a sample from normalized `[0, 1]` coordinates as emitted by pose
    /// estimators, scaling them to a `width` x `height` frame.
    pub fn from_normalized<I>(frame: u64, width: f64, height: f64, points: I) -> Self
    where
        I: IntoIterator<Item = (Landmark, [f64; 2])>,
    {
        let landmarks = points
            .into_iter()
            .map(|(lm, [x, y])| (lm, Point::new(x * width, y * height)))
            .collect();
        Self { frame, landmarks }
    }

    #[inline]
    pub fn get(&self, landmark: Landmark) -> Option<Point> {
        self.landmarks.get(&landmark).copied()
    }

    pub fn is_empty(&self) -> bool {
        self.landmarks.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn mediapipe_indices_round_trip() {
        for lm in Landmark::ALL {
            assert_eq!(Landmark::from_mediapipe_index(lm.mediapipe_index()), Some(lm));
        }
        assert_eq!(Landmark::from_mediapipe_index(1), None);
    }

    #[test]
    fn normalized_points_are_scaled_to_pixels() {
        let sample = LandmarkSample::from_normalized(
            7,
            1280.0,
            720.0,
            [(Landmark::RightWrist, [0.5, 0.25])],
        );
        let wrist = sample.get(Landmark::RightWrist).expect("wrist");
        assert_eq!(sample.frame, 7);
        assert_eq!(wrist, Point::new(640.0, 180.0));
        assert!(sample.get(Landmark::LeftWrist).is_none());
    }

    #[test]
    fn sample_parses_from_snake_case_json() {
        let raw = r#"{"frame": 3, "landmarks": {"left_ankle": [100.0, 650.5]}}"#;
        let sample: LandmarkSample = serde_json::from_str(raw).expect("parse");
        assert_eq!(sample.get(Landmark::LeftAnkle), Some(Point::new(100.0, 650.5)));
    }
}
