//! Commands emitted toward the actuation backend

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::types::{ModeSnapshot, Point3};
use crate::{ANIMATION_MODE_OFF, PARAMETER_DRIVE_MODE};

/// Which actuator a pointing command drives
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Actuator {
    Gaze,
    Head,
}

impl std::fmt::Display for Actuator {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Actuator::Gaze => write!(f, "gaze"),
            Actuator::Head => write!(f, "head"),
        }
    }
}

/// A pointing command, always expressed in the output frame
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TargetCommand {
    pub actuator: Actuator,
    pub point: Point3,
    pub speed: f64,
    pub frame: String,
    pub stamp: DateTime<Utc>,
}

/// Animation-mode toggle bracketing mirroring activity
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AnimationMode {
    /// Renderer takes facial parameters directly
    ParameterDrive,
    Off,
}

impl AnimationMode {
    pub fn code(self) -> u8 {
        match self {
            AnimationMode::ParameterDrive => PARAMETER_DRIVE_MODE,
            AnimationMode::Off => ANIMATION_MODE_OFF,
        }
    }
}

/// Named facial-parameter values
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct FacialParameters {
    pub coefficients: Vec<String>,
    pub values: Vec<f64>,
}

impl FacialParameters {
    pub fn push(&mut self, name: &str, value: f64) {
        self.coefficients.push(name.to_string());
        self.values.push(value);
    }

    pub fn is_empty(&self) -> bool {
        self.coefficients.is_empty()
    }

    pub fn len(&self) -> usize {
        self.coefficients.len()
    }

    /// Value of a named coefficient, if set
    pub fn get(&self, name: &str) -> Option<f64> {
        self.coefficients
            .iter()
            .position(|c| c == name)
            .map(|i| self.values[i])
    }
}

/// Everything the synthesizer sends to its collaborators
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum Command {
    Target(TargetCommand),
    AnimationMode { mode: AnimationMode },
    FacialParameters(FacialParameters),
    StateEcho(ModeSnapshot),
}

impl Command {
    /// The pointing command inside, if this is one
    pub fn as_target(&self) -> Option<&TargetCommand> {
        match self {
            Command::Target(t) => Some(t),
            _ => None,
        }
    }

    /// Short single-line form for logs and the console
    pub fn summary(&self) -> String {
        match self {
            Command::Target(t) => format!(
                "{} -> {} @ {:.2} [{}]",
                t.actuator, t.point, t.speed, t.frame
            ),
            Command::AnimationMode { mode } => format!("animation mode {}", mode.code()),
            Command::FacialParameters(p) => format!("facial parameters ({} channels)", p.len()),
            Command::StateEcho(m) => format!("state {}", m),
        }
    }
}
