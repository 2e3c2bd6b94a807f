//! Attention synthesizer: decides, tick by tick, where a robot's head and eyes point
//!
//! Perception snapshots and mode requests come in; gaze/head targets,
//! facial-parameter commands and animation-mode toggles go out.

pub mod core;
pub mod types;

use types::Point3;

// =============================================================================
// TIMING
// =============================================================================

/// Default synthesizer rate (ticks per second)
pub const DEFAULT_SYNTHESIZER_RATE: f64 = 10.0;

/// Shortest tick period the ticker accepts (milliseconds)
pub const MIN_TICK_PERIOD_MS: u64 = 1;

/// Longest tick period the ticker accepts (seconds)
pub const MAX_TICK_PERIOD_SECS: u64 = 3600;

/// Default bound on a frame-transform lookup (milliseconds), one tick at 10 Hz
pub const DEFAULT_TRANSFORM_TIMEOUT_MS: u64 = 100;

// =============================================================================
// FRAMES
// =============================================================================

/// Frame the actuation backend expects every target in
pub const OUTPUT_FRAME: &str = "device";

/// Frame perception snapshots are reported in unless they say otherwise
pub const PERCEPTION_FRAME: &str = "robot";

/// Straight ahead, in the output frame
pub const IDLE_HEADING: Point3 = Point3::new(1.0, 0.0, 0.0);

// =============================================================================
// ACTUATION
// =============================================================================

/// Speed used for the leading gaze command
pub const GAZE_FAST_SPEED: f64 = 5.0;

/// Animation mode in which the renderer accepts direct facial parameters
pub const PARAMETER_DRIVE_MODE: u8 = 148;

/// Animation mode handing the face back to the renderer's own cycle
pub const ANIMATION_MODE_OFF: u8 = 0;

// =============================================================================
// FACE GEOMETRY (meters, relative to face center)
// =============================================================================

/// Eyes and mouth sit this far in front of the face center
pub const FACE_FEATURE_DEPTH: f64 = -0.05;

/// Lateral offset of each eye
pub const EYE_LATERAL_OFFSET: f64 = 0.03;

/// Eyes sit above the center
pub const EYE_VERTICAL_OFFSET: f64 = 0.06;

/// Mouth sits below the center
pub const MOUTH_VERTICAL_OFFSET: f64 = -0.04;

// =============================================================================
// VERSION
// =============================================================================

pub const VERSION: &str = "1.0.0";
