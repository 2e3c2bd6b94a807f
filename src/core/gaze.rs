//! Gaze coordination: turns one attended point into gaze and/or head commands
//!
//! In the staggered modes one actuator moves immediately and the other
//! follows the last commanded point after the gaze delay, repeatedly, for as
//! long as the mode stays active.

use crate::core::counter::DwellCounter;
use crate::types::{Actuator, GazeCoordination, StampedPoint};
use crate::GAZE_FAST_SPEED;

/// Pointing request before frame conversion
#[derive(Debug, Clone, PartialEq)]
pub struct TargetRequest {
    pub actuator: Actuator,
    pub target: StampedPoint,
    pub speed: f64,
}

impl TargetRequest {
    fn new(actuator: Actuator, target: &StampedPoint, speed: f64) -> Self {
        Self {
            actuator,
            target: target.clone(),
            speed,
        }
    }
}

#[derive(Debug, Clone, Default)]
pub struct GazeCoordinator {
    mode: GazeCoordination,
    /// Last point handed to `point_at`
    last: Option<StampedPoint>,
    /// Armed only in staggered modes
    delay: Option<DwellCounter>,
    /// Set when the delay is (re)armed; counting starts one tick later
    fresh: bool,
}

impl GazeCoordinator {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn mode(&self) -> GazeCoordination {
        self.mode
    }

    /// Ticks until the trailing command, when armed
    pub fn delay_remaining(&self) -> Option<i64> {
        self.delay.map(|d| d.remaining())
    }

    /// Switch mode. Returns false (and does nothing) when already in `mode`.
    pub fn set_mode(&mut self, mode: GazeCoordination, delay_ticks: i64) -> bool {
        if mode == self.mode {
            return false;
        }
        self.mode = mode;
        if mode.is_staggered() {
            self.arm(delay_ticks);
        } else {
            self.delay = None;
        }
        true
    }

    /// Re-quantize an armed delay, e.g. after a rate change
    pub fn rearm(&mut self, delay_ticks: i64) {
        if self.delay.is_some() {
            self.arm(delay_ticks);
        }
    }

    fn arm(&mut self, delay_ticks: i64) {
        self.delay = Some(DwellCounter::new(delay_ticks.max(1)));
        self.fresh = true;
    }

    /// Immediate commands for `target` under the current mode
    pub fn point_at(&mut self, target: StampedPoint, head_speed: f64) -> Vec<TargetRequest> {
        let requests = match self.mode {
            GazeCoordination::GazeOnly | GazeCoordination::GazeLeadsHead => {
                vec![TargetRequest::new(Actuator::Gaze, &target, GAZE_FAST_SPEED)]
            }
            GazeCoordination::HeadOnly | GazeCoordination::HeadLeadsGaze => {
                vec![TargetRequest::new(Actuator::Head, &target, head_speed)]
            }
            GazeCoordination::GazeAndHead => vec![
                TargetRequest::new(Actuator::Gaze, &target, GAZE_FAST_SPEED),
                TargetRequest::new(Actuator::Head, &target, head_speed),
            ],
        };
        self.last = Some(target);
        requests
    }

    /// Trailing command due this tick, if any
    pub fn follow_up(&mut self, delay_ticks: i64, gaze_speed: f64) -> Option<TargetRequest> {
        let last = self.last.as_ref()?;
        let counter = self.delay.as_mut()?;
        if self.fresh {
            self.fresh = false;
            return None;
        }
        if !counter.tick() {
            return None;
        }
        *counter = DwellCounter::new(delay_ticks.max(1));
        let actuator = match self.mode {
            GazeCoordination::GazeLeadsHead => Actuator::Head,
            GazeCoordination::HeadLeadsGaze => Actuator::Gaze,
            GazeCoordination::GazeOnly | GazeCoordination::HeadOnly | GazeCoordination::GazeAndHead => {
                return None
            }
        };
        Some(TargetRequest::new(actuator, last, gaze_speed))
    }
}
