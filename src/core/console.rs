//! Interactive console: line commands for driving the synthesizer by hand
//!
//! Faces and salient points typed in are staged in a pending snapshot and
//! only reach the controller on `commit`.

use lazy_static::lazy_static;
use regex::Regex;

use crate::core::service::AttentionService;
use crate::types::{
    AttentionError, AttentionResult, EyeContact, Face, GazeCoordination, LookAt, Mirroring,
    PerceptionState, Point3, SalientPoint, TickReport,
};

/// Most steps a single `tick` command may run
pub const MAX_CONSOLE_TICKS: u32 = 10_000;

lazy_static! {
    static ref RE_MODE: Regex =
        Regex::new(r"(?i)^(eyecontact|lookat|mirroring|gaze)\s+([a-z_0-9]+)(?:\s+(\d+))?$").unwrap();

    static ref RE_FACE: Regex = Regex::new(
        r"(?i)^face\s+(\d+)\s+(-?\d+(?:\.\d+)?)\s+(-?\d+(?:\.\d+)?)\s+(-?\d+(?:\.\d+)?)$"
    )
    .unwrap();

    static ref RE_SALIENT: Regex = Regex::new(
        r"(?i)^salient\s+(-?\d+(?:\.\d+)?)\s+(-?\d+(?:\.\d+)?)\s+(-?\d+(?:\.\d+)?)$"
    )
    .unwrap();

    static ref RE_TICK: Regex = Regex::new(r"(?i)^tick(?:\s+(\d+))?$").unwrap();
}

/// One parsed console line
#[derive(Debug, Clone, PartialEq)]
pub enum ConsoleCommand {
    EyeContact(EyeContact),
    LookAt { mode: LookAt, id: u32 },
    Mirroring(Mirroring),
    Gaze(GazeCoordination),
    Face { id: u32, position: Point3 },
    Salient(Point3),
    Clear,
    Commit,
    Tick(u32),
    Status,
    Quit,
}

fn invalid(line: &str) -> AttentionError {
    AttentionError::InvalidCommand(line.to_string())
}

fn number<T: std::str::FromStr>(text: &str, line: &str) -> AttentionResult<T> {
    text.parse().map_err(|_| invalid(line))
}

impl ConsoleCommand {
    pub fn parse(line: &str) -> AttentionResult<Self> {
        let line = line.trim();
        match line.to_ascii_lowercase().as_str() {
            "clear" => return Ok(Self::Clear),
            "commit" => return Ok(Self::Commit),
            "status" => return Ok(Self::Status),
            "quit" | "exit" => return Ok(Self::Quit),
            _ => {}
        }

        if let Some(caps) = RE_MODE.captures(line) {
            let mode = &caps[2];
            let command = match caps[1].to_ascii_lowercase().as_str() {
                "eyecontact" => Self::EyeContact(mode.parse()?),
                "lookat" => Self::LookAt {
                    mode: mode.parse()?,
                    id: caps.get(3).map_or(Ok(0), |m| number(m.as_str(), line))?,
                },
                "mirroring" => Self::Mirroring(mode.parse()?),
                _ => Self::Gaze(mode.parse()?),
            };
            return Ok(command);
        }

        if let Some(caps) = RE_FACE.captures(line) {
            return Ok(Self::Face {
                id: number(&caps[1], line)?,
                position: Point3::new(number(&caps[2], line)?, number(&caps[3], line)?, number(&caps[4], line)?),
            });
        }

        if let Some(caps) = RE_SALIENT.captures(line) {
            return Ok(Self::Salient(Point3::new(
                number(&caps[1], line)?,
                number(&caps[2], line)?,
                number(&caps[3], line)?,
            )));
        }

        if let Some(caps) = RE_TICK.captures(line) {
            let n: u32 = caps.get(1).map_or(Ok(1), |m| number(m.as_str(), line))?;
            if n > MAX_CONSOLE_TICKS {
                return Err(AttentionError::InvalidCommand(format!(
                    "{} (at most {} ticks at once)",
                    line, MAX_CONSOLE_TICKS
                )));
            }
            return Ok(Self::Tick(n));
        }

        Err(invalid(line))
    }
}

/// What the console should show after a command
#[derive(Debug)]
pub enum ConsoleOutput {
    Message(String),
    Reports(Vec<TickReport>),
    Quit,
}

/// Console session with its staged perception snapshot
#[derive(Debug, Default)]
pub struct Console {
    pending: PerceptionState,
}

impl Console {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn pending(&self) -> &PerceptionState {
        &self.pending
    }

    pub async fn execute(&mut self, service: &AttentionService, command: ConsoleCommand) -> AttentionResult<ConsoleOutput> {
        let output = match command {
            ConsoleCommand::EyeContact(mode) => {
                ConsoleOutput::Message(service.request_eye_contact(mode).await.to_string())
            }
            ConsoleCommand::LookAt { mode, id } => {
                ConsoleOutput::Message(service.request_look_at(mode, id).await?.to_string())
            }
            ConsoleCommand::Mirroring(mode) => {
                ConsoleOutput::Message(service.request_mirroring(mode).await.to_string())
            }
            ConsoleCommand::Gaze(mode) => ConsoleOutput::Message(service.request_gaze(mode).await.to_string()),
            ConsoleCommand::Face { id, position } => {
                self.pending.faces.retain(|f| f.id != id);
                self.pending.faces.push(Face::new(id, position));
                ConsoleOutput::Message(format!("staged face {} at {}", id, position))
            }
            ConsoleCommand::Salient(position) => {
                self.pending.salient_points.push(SalientPoint { position });
                ConsoleOutput::Message(format!("staged salient point at {}", position))
            }
            ConsoleCommand::Clear => {
                self.pending = PerceptionState::empty();
                ConsoleOutput::Message("pending snapshot cleared".to_string())
            }
            ConsoleCommand::Commit => {
                let mut snapshot = self.pending.clone();
                snapshot.stamp = chrono::Utc::now();
                let message = format!(
                    "committed {} faces, {} salient points",
                    snapshot.faces.len(),
                    snapshot.salient_points.len()
                );
                service.update_perception(snapshot).await;
                ConsoleOutput::Message(message)
            }
            ConsoleCommand::Tick(n) => {
                let mut reports = Vec::with_capacity(n as usize);
                for _ in 0..n {
                    reports.push(service.tick_once().await);
                }
                ConsoleOutput::Reports(reports)
            }
            ConsoleCommand::Status => {
                let status = service.status().await;
                let json = serde_json::to_string_pretty(&status)
                    .map_err(|e| AttentionError::InvalidCommand(e.to_string()))?;
                ConsoleOutput::Message(json)
            }
            ConsoleCommand::Quit => ConsoleOutput::Quit,
        };
        Ok(output)
    }
}

// =============================================================================
// TESTS
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_mode_by_name_and_code() {
        assert_eq!(
            ConsoleCommand::parse("eyecontact both_eyes").unwrap(),
            ConsoleCommand::EyeContact(EyeContact::BothEyes)
        );
        assert_eq!(
            ConsoleCommand::parse("gaze 3").unwrap(),
            ConsoleCommand::Gaze(GazeCoordination::GazeLeadsHead)
        );
        assert_eq!(
            ConsoleCommand::parse("MIRRORING All").unwrap(),
            ConsoleCommand::Mirroring(Mirroring::All)
        );
    }

    #[test]
    fn test_parse_lookat_with_id() {
        assert_eq!(
            ConsoleCommand::parse("lookat one_face 7").unwrap(),
            ConsoleCommand::LookAt {
                mode: LookAt::OneFace,
                id: 7
            }
        );
        assert_eq!(
            ConsoleCommand::parse("lookat saliency").unwrap(),
            ConsoleCommand::LookAt {
                mode: LookAt::Saliency,
                id: 0
            }
        );
    }

    #[test]
    fn test_parse_points() {
        assert_eq!(
            ConsoleCommand::parse("face 3 1.5 -0.2 0").unwrap(),
            ConsoleCommand::Face {
                id: 3,
                position: Point3::new(1.5, -0.2, 0.0)
            }
        );
        assert_eq!(
            ConsoleCommand::parse("salient 2 0.5 1").unwrap(),
            ConsoleCommand::Salient(Point3::new(2.0, 0.5, 1.0))
        );
    }

    #[test]
    fn test_parse_simple_commands() {
        assert_eq!(ConsoleCommand::parse("  commit ").unwrap(), ConsoleCommand::Commit);
        assert_eq!(ConsoleCommand::parse("exit").unwrap(), ConsoleCommand::Quit);
        assert_eq!(ConsoleCommand::parse("tick").unwrap(), ConsoleCommand::Tick(1));
        assert_eq!(ConsoleCommand::parse("tick 25").unwrap(), ConsoleCommand::Tick(25));
    }

    #[test]
    fn test_parse_caps_tick_count() {
        assert_eq!(ConsoleCommand::parse("tick 10000").unwrap(), ConsoleCommand::Tick(10_000));
        assert!(matches!(
            ConsoleCommand::parse("tick 10001"),
            Err(AttentionError::InvalidCommand(_))
        ));
        assert!(matches!(
            ConsoleCommand::parse("tick 4000000000"),
            Err(AttentionError::InvalidCommand(_))
        ));
        assert!(ConsoleCommand::parse("tick 99999999999").is_err());
    }

    #[test]
    fn test_parse_rejects_garbage() {
        assert!(matches!(
            ConsoleCommand::parse("dance"),
            Err(AttentionError::InvalidCommand(_))
        ));
        assert!(matches!(
            ConsoleCommand::parse("lookat sideways"),
            Err(AttentionError::UnknownMode { .. })
        ));
        assert!(ConsoleCommand::parse("face x 1 2 3").is_err());
    }
}
