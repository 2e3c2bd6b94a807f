//! Points and frames

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// A 3D point in meters
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Point3 {
    pub x: f64,
    pub y: f64,
    pub z: f64,
}

impl Point3 {
    pub const fn new(x: f64, y: f64, z: f64) -> Self {
        Self { x, y, z }
    }

    /// Squared distance from the vertical axis through the origin
    pub fn planar_norm_sq(&self) -> f64 {
        self.x * self.x + self.y * self.y
    }

    /// Translate by the given offsets
    pub fn offset(&self, dx: f64, dy: f64, dz: f64) -> Self {
        Self::new(self.x + dx, self.y + dy, self.z + dz)
    }
}

impl std::fmt::Display for Point3 {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "({:.3}, {:.3}, {:.3})", self.x, self.y, self.z)
    }
}

/// A point tagged with the frame it is expressed in and when it was observed
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StampedPoint {
    pub point: Point3,
    pub frame: String,
    pub stamp: DateTime<Utc>,
}

impl StampedPoint {
    pub fn new(point: Point3, frame: impl Into<String>, stamp: DateTime<Utc>) -> Self {
        Self {
            point,
            frame: frame.into(),
            stamp,
        }
    }
}
