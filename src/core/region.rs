//! Named attention regions
//!
//! A region is a rectangle facing the robot, in the output frame. When a
//! performance has published its own regions they replace the base table
//! entirely; otherwise the base table is used.

use std::collections::HashMap;
use std::path::Path;

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use serde::{Deserialize, Serialize};

use crate::types::{AttentionError, AttentionResult, Point3};

/// External source of region target points
pub trait RegionProvider: Send {
    fn region_point(&mut self, name: &str) -> AttentionResult<Point3>;
}

/// Rectangle in the lateral/vertical plane at a fixed depth
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Region {
    pub center: Point3,
    /// Lateral extent (meters)
    #[serde(default)]
    pub width: f64,
    /// Vertical extent (meters)
    #[serde(default)]
    pub height: f64,
}

impl Region {
    pub fn point(center: Point3) -> Self {
        Self {
            center,
            width: 0.0,
            height: 0.0,
        }
    }

    pub fn contains(&self, p: Point3) -> bool {
        (p.y - self.center.y).abs() <= self.width / 2.0 + 1e-9
            && (p.z - self.center.z).abs() <= self.height / 2.0 + 1e-9
            && (p.x - self.center.x).abs() < 1e-9
    }

    fn sample(&self, rng: &mut StdRng) -> Point3 {
        let dy = if self.width > 0.0 {
            rng.random_range(-self.width / 2.0..=self.width / 2.0)
        } else {
            0.0
        };
        let dz = if self.height > 0.0 {
            rng.random_range(-self.height / 2.0..=self.height / 2.0)
        } else {
            0.0
        };
        self.center.offset(0.0, dy, dz)
    }
}

#[derive(Debug, Default, Deserialize)]
struct RegionFile {
    #[serde(default)]
    regions: HashMap<String, Region>,
    #[serde(default)]
    performance_regions: HashMap<String, Region>,
}

/// Two-layer region table
#[derive(Debug, Clone)]
pub struct RegionTable {
    base: HashMap<String, Region>,
    performance: HashMap<String, Region>,
    rng: StdRng,
}

impl Default for RegionTable {
    fn default() -> Self {
        Self::new()
    }
}

impl RegionTable {
    pub fn new() -> Self {
        Self {
            base: HashMap::new(),
            performance: HashMap::new(),
            rng: StdRng::from_os_rng(),
        }
    }

    /// Deterministic sampling
    pub fn with_seed(mut self, seed: u64) -> Self {
        self.rng = StdRng::seed_from_u64(seed);
        self
    }

    pub fn with_region(mut self, name: &str, region: Region) -> Self {
        self.base.insert(name.to_string(), region);
        self
    }

    pub fn from_file(path: impl AsRef<Path>) -> AttentionResult<Self> {
        let path = path.as_ref();
        let io_err = |message: String| AttentionError::ConfigIo {
            path: path.display().to_string(),
            message,
        };
        let content = std::fs::read_to_string(path).map_err(|e| io_err(e.to_string()))?;
        let file: RegionFile = serde_json::from_str(&content).map_err(|e| io_err(e.to_string()))?;
        Ok(Self {
            base: file.regions,
            performance: file.performance_regions,
            ..Self::new()
        })
    }

    /// Replace the performance layer; an empty map falls back to the base table
    pub fn set_performance_regions(&mut self, regions: HashMap<String, Region>) {
        self.performance = regions;
    }

    fn active(&self) -> &HashMap<String, Region> {
        if self.performance.is_empty() {
            &self.base
        } else {
            &self.performance
        }
    }
}

impl RegionProvider for RegionTable {
    fn region_point(&mut self, name: &str) -> AttentionResult<Point3> {
        let region = *self
            .active()
            .get(name)
            .ok_or_else(|| AttentionError::RegionLookupFailed(name.to_string()))?;
        Ok(region.sample(&mut self.rng))
    }
}
