//! Core types for the attention synthesizer

mod command;
mod config;
mod error;
mod geometry;
mod modes;
mod output;
mod perception;
mod reason;

pub use command::{Actuator, AnimationMode, Command, FacialParameters, TargetCommand};
pub use config::{AttentionConfig, DwellBounds};
pub use error::{AttentionError, AttentionResult};
pub use geometry::{Point3, StampedPoint};
pub use modes::{AttentionRegion, EyeContact, GazeCoordination, LookAt, Mirroring, ModeSnapshot};
pub use output::{ControllerStatus, TickReport};
pub use perception::{Face, FacialFeatures, PerceptionState, SalientPoint};
pub use reason::ReasonCode;
