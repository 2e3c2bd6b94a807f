//! Interruptions: every so often the robot breaks off to look at all faces,
//! then returns to whatever it was doing.
//!
//! States:
//! - NORMAL → INTERRUPTING: enabled AND start counter runs out
//! - INTERRUPTING → NORMAL: duration counter runs out

use tracing::info;

use crate::core::counter::{CounterBank, DwellCounter};
use crate::types::{AttentionConfig, LookAt};

/// Transition the controller must apply to its LookAt mode
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Interruption {
    /// Switch to AllFaces; `saved` is restored later
    Begin { saved: LookAt },
    /// Switch back to `restore`
    End { restore: LookAt },
}

#[derive(Debug, Clone)]
pub struct InterruptionManager {
    interrupting: bool,
    saved: LookAt,
    start: DwellCounter,
    duration: DwellCounter,
}

impl InterruptionManager {
    pub fn new(bank: &mut CounterBank, config: &AttentionConfig) -> Self {
        Self {
            interrupting: false,
            saved: LookAt::Idle,
            start: bank.reseed(config.interrupt_start_time, config.synthesizer_rate),
            duration: bank.reseed(config.interrupt_duration_time, config.synthesizer_rate),
        }
    }

    pub fn is_interrupting(&self) -> bool {
        self.interrupting
    }

    pub fn start_remaining(&self) -> i64 {
        self.start.remaining()
    }

    pub fn duration_remaining(&self) -> i64 {
        self.duration.remaining()
    }

    pub fn reseed_start(&mut self, bank: &mut CounterBank, config: &AttentionConfig) {
        self.start = bank.reseed(config.interrupt_start_time, config.synthesizer_rate);
    }

    pub fn reseed_duration(&mut self, bank: &mut CounterBank, config: &AttentionConfig) {
        self.duration = bank.reseed(config.interrupt_duration_time, config.synthesizer_rate);
    }

    /// Leave any running interruption. Returns the LookAt mode to restore, if
    /// one was running.
    pub fn cancel(&mut self) -> Option<LookAt> {
        if !self.interrupting {
            return None;
        }
        self.interrupting = false;
        Some(self.saved)
    }

    /// Advance one tick
    pub fn evaluate(
        &mut self,
        current: LookAt,
        bank: &mut CounterBank,
        config: &AttentionConfig,
    ) -> Option<Interruption> {
        if !config.interrupt_to_all_faces {
            return None;
        }

        if self.interrupting {
            if !self.duration.tick() {
                return None;
            }
            self.interrupting = false;
            self.reseed_duration(bank, config);
            info!("interruption over, back to {}", self.saved);
            Some(Interruption::End { restore: self.saved })
        } else {
            if !self.start.tick() {
                return None;
            }
            self.interrupting = true;
            self.reseed_start(bank, config);
            self.saved = current;
            info!("interrupting {} to look at all faces", current);
            Some(Interruption::Begin { saved: current })
        }
    }
}
