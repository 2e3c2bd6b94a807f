//! Perception snapshot model
//!
//! Each update from the perception pipeline replaces the previous snapshot
//! wholesale; nothing is merged.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::types::Point3;
use crate::PERCEPTION_FRAME;

/// Tracked expression intensities of a face, each in 0.0-1.0
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct FacialFeatures {
    pub left_brow: f64,
    pub right_brow: f64,
    /// 1.0 = fully open
    pub left_eyelid: f64,
    pub right_eyelid: f64,
    pub mouth_open: f64,
}

/// A perceived face
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Face {
    /// Persistent identity assigned by the tracker (0 is never a valid id)
    pub id: u32,
    /// Face center
    pub position: Point3,
    /// Present only when the tracker measures expressions
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub features: Option<FacialFeatures>,
}

impl Face {
    pub fn new(id: u32, position: Point3) -> Self {
        Self {
            id,
            position,
            features: None,
        }
    }

    pub fn with_features(mut self, features: FacialFeatures) -> Self {
        self.features = Some(features);
        self
    }
}

/// A perceived point of visual interest
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SalientPoint {
    pub position: Point3,
}

/// Full perception snapshot
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PerceptionState {
    #[serde(default)]
    pub faces: Vec<Face>,
    #[serde(default)]
    pub salient_points: Vec<SalientPoint>,
    /// Frame all positions are expressed in
    #[serde(default = "default_perception_frame")]
    pub frame: String,
    /// When the snapshot was taken
    #[serde(default = "Utc::now")]
    pub stamp: DateTime<Utc>,
}

fn default_perception_frame() -> String {
    PERCEPTION_FRAME.to_string()
}

impl Default for PerceptionState {
    fn default() -> Self {
        Self::empty()
    }
}

impl PerceptionState {
    /// Nothing perceived, stamped now
    pub fn empty() -> Self {
        Self {
            faces: Vec::new(),
            salient_points: Vec::new(),
            frame: default_perception_frame(),
            stamp: Utc::now(),
        }
    }

    pub fn with_faces(faces: Vec<Face>) -> Self {
        Self {
            faces,
            ..Self::empty()
        }
    }

    pub fn with_salient_points(points: Vec<Point3>) -> Self {
        Self {
            salient_points: points
                .into_iter()
                .map(|position| SalientPoint { position })
                .collect(),
            ..Self::empty()
        }
    }

    /// Index of the face carrying `id`, if present
    pub fn face_index(&self, id: u32) -> Option<usize> {
        self.faces.iter().position(|f| f.id == id)
    }
}
