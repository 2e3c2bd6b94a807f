//! Tick reports and controller status

use chrono::{DateTime, Utc};
use colored::Colorize;
use serde::{Deserialize, Serialize};

use crate::types::{Actuator, Command, ModeSnapshot, ReasonCode};

/// What one tick did
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TickReport {
    pub stamp: DateTime<Utc>,
    /// Tick number since the controller was created
    pub tick: u64,
    pub reason: ReasonCode,
    pub commands: Vec<Command>,
}

impl TickReport {
    pub fn new(tick: u64, stamp: DateTime<Utc>, reason: ReasonCode, commands: Vec<Command>) -> Self {
        Self {
            stamp,
            tick,
            reason,
            commands,
        }
    }

    /// Pointing commands for one actuator
    pub fn targets(&self, actuator: Actuator) -> impl Iterator<Item = &crate::types::TargetCommand> {
        self.commands
            .iter()
            .filter_map(Command::as_target)
            .filter(move |t| t.actuator == actuator)
    }

    /// Format for parseable output (no colors)
    pub fn to_parseable_string(&self) -> String {
        let cmds: Vec<String> = self.commands.iter().map(Command::summary).collect();
        format!(
            "tick={} | reason={} | {}",
            self.tick,
            self.reason.code(),
            cmds.join(" ; ")
        )
    }

    /// Format for terminal display (with colors)
    pub fn to_terminal_string(&self) -> String {
        let reason = if self.reason.is_idle_heading() {
            self.reason.code().yellow()
        } else {
            self.reason.code().green()
        };
        let cmds: Vec<String> = self.commands.iter().map(Command::summary).collect();
        format!("{} {} {}", format!("#{}", self.tick).dimmed(), reason, cmds.join(" ; "))
    }
}

/// Snapshot of controller state for monitoring
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ControllerStatus {
    pub modes: ModeSnapshot,
    pub configured: bool,
    pub enabled: bool,
    pub synthesizer_rate: f64,
    pub face_count: usize,
    pub salient_count: usize,
    pub current_face: Option<usize>,
    pub current_salient: Option<usize>,
    /// Pinned face id, 0 when unset
    pub wanted_face_id: u32,
    pub interrupting: bool,
    pub tick: u64,
}
