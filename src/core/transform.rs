//! Frame transforms
//!
//! Perception reports positions in its own frame; the actuation backend wants
//! everything in the output frame. The transform service is an external
//! collaborator reached through [`FrameTransformer`].

use std::path::Path;
use std::time::Duration;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::types::{AttentionError, AttentionResult, Point3, StampedPoint};

/// External frame-transform service
///
/// Implementations must answer `can_transform` within `timeout`; the lookup
/// happens while the controller holds its lock.
pub trait FrameTransformer: Send {
    fn can_transform(&self, target: &str, source: &str, stamp: DateTime<Utc>, timeout: Duration) -> bool;

    fn transform(&self, target: &str, point: &StampedPoint) -> AttentionResult<Point3>;
}

/// Rotation about the vertical axis followed by a translation
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct RigidTransform {
    pub translation: Point3,
    /// Radians, counter-clockwise seen from above
    #[serde(default)]
    pub yaw: f64,
}

impl RigidTransform {
    pub fn new(translation: Point3, yaw: f64) -> Self {
        Self { translation, yaw }
    }

    pub fn apply(&self, p: Point3) -> Point3 {
        let (s, c) = self.yaw.sin_cos();
        Point3::new(
            c * p.x - s * p.y + self.translation.x,
            s * p.x + c * p.y + self.translation.y,
            p.z + self.translation.z,
        )
    }

    pub fn inverse(&self) -> Self {
        let (s, c) = self.yaw.sin_cos();
        let t = self.translation;
        Self {
            translation: Point3::new(-(c * t.x + s * t.y), -(-s * t.x + c * t.y), -t.z),
            yaw: -self.yaw,
        }
    }
}

/// One entry of a transform table: maps `source` coordinates into `target`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TransformEntry {
    pub target: String,
    pub source: String,
    pub transform: RigidTransform,
}

/// Time-invariant transform table, e.g. a calibrated camera mount
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct StaticTransforms {
    entries: Vec<TransformEntry>,
}

impl StaticTransforms {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with(mut self, target: &str, source: &str, transform: RigidTransform) -> Self {
        self.insert(target, source, transform);
        self
    }

    pub fn insert(&mut self, target: &str, source: &str, transform: RigidTransform) {
        self.entries.retain(|e| !(e.target == target && e.source == source));
        self.entries.push(TransformEntry {
            target: target.to_string(),
            source: source.to_string(),
            transform,
        });
    }

    /// Load a table from a JSON array of entries
    pub fn from_file(path: impl AsRef<Path>) -> AttentionResult<Self> {
        let path = path.as_ref();
        let io_err = |message: String| AttentionError::ConfigIo {
            path: path.display().to_string(),
            message,
        };
        let content = std::fs::read_to_string(path).map_err(|e| io_err(e.to_string()))?;
        let entries: Vec<TransformEntry> =
            serde_json::from_str(&content).map_err(|e| io_err(e.to_string()))?;
        Ok(Self { entries })
    }

    /// Direct entry, or the inverse of the opposite entry
    fn lookup(&self, target: &str, source: &str) -> Option<RigidTransform> {
        self.entries
            .iter()
            .find(|e| e.target == target && e.source == source)
            .map(|e| e.transform)
            .or_else(|| {
                self.entries
                    .iter()
                    .find(|e| e.target == source && e.source == target)
                    .map(|e| e.transform.inverse())
            })
    }
}

impl FrameTransformer for StaticTransforms {
    fn can_transform(&self, target: &str, source: &str, _stamp: DateTime<Utc>, _timeout: Duration) -> bool {
        self.lookup(target, source).is_some()
    }

    fn transform(&self, target: &str, point: &StampedPoint) -> AttentionResult<Point3> {
        self.lookup(target, &point.frame)
            .map(|t| t.apply(point.point))
            .ok_or_else(|| AttentionError::transform_unavailable(&point.frame, target))
    }
}

/// Converts stamped points into the output frame
pub struct CoordinateTransformer {
    service: Box<dyn FrameTransformer>,
    output_frame: String,
    timeout: Duration,
}

impl std::fmt::Debug for CoordinateTransformer {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CoordinateTransformer")
            .field("output_frame", &self.output_frame)
            .field("timeout", &self.timeout)
            .finish()
    }
}

impl CoordinateTransformer {
    pub fn new(service: Box<dyn FrameTransformer>, output_frame: impl Into<String>, timeout: Duration) -> Self {
        Self {
            service,
            output_frame: output_frame.into(),
            timeout,
        }
    }

    pub fn output_frame(&self) -> &str {
        &self.output_frame
    }

    pub fn set_timeout(&mut self, timeout: Duration) {
        self.timeout = timeout;
    }

    /// Express `point` in the output frame. Points already there are returned
    /// without consulting the service.
    pub fn to_output_frame(&self, point: &StampedPoint) -> AttentionResult<Point3> {
        if point.frame == self.output_frame {
            return Ok(point.point);
        }
        if !self
            .service
            .can_transform(&self.output_frame, &point.frame, point.stamp, self.timeout)
        {
            return Err(AttentionError::transform_unavailable(&point.frame, &self.output_frame));
        }
        let out = self.service.transform(&self.output_frame, point)?;
        debug!("transformed {} [{}] -> {} [{}]", point.point, point.frame, out, self.output_frame);
        Ok(out)
    }
}
