//! Tunable parameters of the synthesizer
//!
//! A configuration is always applied as a whole snapshot. Fields missing from
//! a JSON document take their defaults.

use std::path::Path;
use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::types::{AttentionError, AttentionRegion, AttentionResult, ModeSnapshot};
use crate::{DEFAULT_SYNTHESIZER_RATE, DEFAULT_TRANSFORM_TIMEOUT_MS, MAX_TICK_PERIOD_SECS, MIN_TICK_PERIOD_MS};

/// Dwell-time range in seconds
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct DwellBounds {
    pub min: f64,
    pub max: f64,
}

impl DwellBounds {
    pub const fn new(min: f64, max: f64) -> Self {
        Self { min, max }
    }

    /// `max` raised to `min` when out of order
    pub fn clamped(self) -> Self {
        if self.max < self.min {
            Self::new(self.min, self.min)
        } else {
            self
        }
    }
}

/// Full configuration snapshot
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AttentionConfig {
    /// Master switch; a disabled synthesizer ticks without acting
    #[serde(alias = "enable_flag")]
    pub enabled: bool,
    /// Ticks per second
    pub synthesizer_rate: f64,
    /// Time on one salient point
    pub saliency_time: DwellBounds,
    /// Time on one face before switching (AllFaces / NearestFace)
    pub faces_time: DwellBounds,
    /// Time on one eye before switching (BothEyes / Triangle)
    pub eyes_time: DwellBounds,
    /// Time before picking a new point in the attention region
    pub region_time: DwellBounds,
    /// Time between interruptions
    pub interrupt_start_time: DwellBounds,
    /// Length of one interruption
    pub interrupt_duration_time: DwellBounds,
    /// Seconds the trailing actuator lags behind the leading one
    pub gaze_delay: f64,
    /// Speed of the trailing command in staggered modes
    pub gaze_speed: f64,
    pub head_speed: f64,
    /// Periodically break off to look at all faces
    pub interrupt_to_all_faces: bool,
    pub attention_region: AttentionRegion,
    /// Modes to switch to when the snapshot is applied
    #[serde(skip_serializing_if = "Option::is_none")]
    pub modes: Option<ModeSnapshot>,
    /// Bound on a single frame-transform lookup
    pub transform_timeout_ms: u64,
}

impl Default for AttentionConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            synthesizer_rate: DEFAULT_SYNTHESIZER_RATE,
            saliency_time: DwellBounds::new(0.1, 3.0),
            faces_time: DwellBounds::new(0.1, 3.0),
            eyes_time: DwellBounds::new(0.1, 3.0),
            region_time: DwellBounds::new(0.1, 3.0),
            interrupt_start_time: DwellBounds::new(4.0, 6.0),
            interrupt_duration_time: DwellBounds::new(2.0, 4.0),
            gaze_delay: 1.0,
            gaze_speed: 0.5,
            head_speed: 1.0,
            interrupt_to_all_faces: false,
            attention_region: AttentionRegion::Audience,
            modes: None,
            transform_timeout_ms: DEFAULT_TRANSFORM_TIMEOUT_MS,
        }
    }
}

impl AttentionConfig {
    /// Load a snapshot from a JSON file
    pub fn from_file(path: impl AsRef<Path>) -> AttentionResult<Self> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path).map_err(|e| AttentionError::ConfigIo {
            path: path.display().to_string(),
            message: e.to_string(),
        })?;
        let config: AttentionConfig =
            serde_json::from_str(&content).map_err(|e| AttentionError::ConfigIo {
                path: path.display().to_string(),
                message: e.to_string(),
            })?;
        config.normalized()
    }

    /// Validate the rate and clamp every out-of-order dwell range
    pub fn normalized(mut self) -> AttentionResult<Self> {
        if !self.synthesizer_rate.is_finite() || self.synthesizer_rate <= 0.0 {
            return Err(AttentionError::InvalidConfig(format!(
                "synthesizer_rate must be positive, got {}",
                self.synthesizer_rate
            )));
        }
        let period = 1.0 / self.synthesizer_rate;
        if period < MIN_TICK_PERIOD_MS as f64 / 1000.0 || period > MAX_TICK_PERIOD_SECS as f64 {
            return Err(AttentionError::InvalidConfig(format!(
                "synthesizer_rate {} gives a tick period outside {} ms..{} s",
                self.synthesizer_rate, MIN_TICK_PERIOD_MS, MAX_TICK_PERIOD_SECS
            )));
        }
        if !self.gaze_delay.is_finite() || self.gaze_delay < 0.0 {
            return Err(AttentionError::InvalidConfig(format!(
                "gaze_delay must be non-negative, got {}",
                self.gaze_delay
            )));
        }
        self.saliency_time = self.saliency_time.clamped();
        self.faces_time = self.faces_time.clamped();
        self.eyes_time = self.eyes_time.clamped();
        self.region_time = self.region_time.clamped();
        self.interrupt_start_time = self.interrupt_start_time.clamped();
        self.interrupt_duration_time = self.interrupt_duration_time.clamped();
        Ok(self)
    }

    /// Wall time between ticks
    ///
    /// Clamped to the accepted range so an unnormalized rate cannot stall the
    /// ticker.
    pub fn tick_period(&self) -> Duration {
        let max = Duration::from_secs(MAX_TICK_PERIOD_SECS);
        Duration::try_from_secs_f64(1.0 / self.synthesizer_rate)
            .unwrap_or(max)
            .clamp(Duration::from_millis(MIN_TICK_PERIOD_MS), max)
    }

    pub fn transform_timeout(&self) -> Duration {
        Duration::from_millis(self.transform_timeout_ms)
    }

    /// Gaze delay quantized to ticks, never below one
    pub fn gaze_delay_ticks(&self) -> i64 {
        ((self.gaze_delay * self.synthesizer_rate).floor() as i64).max(1)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_clamp_raises_max_to_min() {
        let b = DwellBounds::new(2.0, 1.0).clamped();
        assert_eq!(b, DwellBounds::new(2.0, 2.0));
        let ok = DwellBounds::new(1.0, 2.0).clamped();
        assert_eq!(ok, DwellBounds::new(1.0, 2.0));
    }

    #[test]
    fn test_normalized_rejects_bad_rate() {
        let config = AttentionConfig {
            synthesizer_rate: 0.0,
            ..AttentionConfig::default()
        };
        assert!(config.normalized().is_err());
    }

    #[test]
    fn test_normalized_rejects_rate_outside_tick_range() {
        for rate in [1e10, 1001.0, 1e-20, 1.0 / 4000.0, f64::INFINITY] {
            let config = AttentionConfig {
                synthesizer_rate: rate,
                ..AttentionConfig::default()
            };
            assert!(
                matches!(config.normalized(), Err(AttentionError::InvalidConfig(_))),
                "rate {} accepted",
                rate
            );
        }
        let fastest = AttentionConfig {
            synthesizer_rate: 1000.0,
            ..AttentionConfig::default()
        };
        assert!(fastest.normalized().is_ok());
    }

    #[test]
    fn test_tick_period_never_zero() {
        let config = AttentionConfig {
            synthesizer_rate: 1e10,
            ..AttentionConfig::default()
        };
        assert_eq!(config.tick_period(), Duration::from_millis(1));
        let slow = AttentionConfig {
            synthesizer_rate: 1e-20,
            ..AttentionConfig::default()
        };
        assert_eq!(slow.tick_period(), Duration::from_secs(3600));
        assert_eq!(AttentionConfig::default().tick_period(), Duration::from_millis(100));
    }

    #[test]
    fn test_partial_json_uses_defaults() {
        let config: AttentionConfig =
            serde_json::from_str(r#"{"synthesizer_rate": 20.0, "enable_flag": false}"#).unwrap();
        assert_eq!(config.synthesizer_rate, 20.0);
        assert!(!config.enabled);
        assert_eq!(config.gaze_delay, 1.0);
        assert!(config.modes.is_none());
    }

    #[test]
    fn test_gaze_delay_ticks() {
        let config = AttentionConfig::default();
        assert_eq!(config.gaze_delay_ticks(), 10);
        let zero = AttentionConfig {
            gaze_delay: 0.0,
            ..AttentionConfig::default()
        };
        assert_eq!(zero.gaze_delay_ticks(), 1);
    }
}
