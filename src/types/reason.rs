//! Reason codes explaining what a tick did

use serde::{Deserialize, Serialize};

/// Outcome of one synthesis tick
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[allow(non_camel_case_types)]
pub enum ReasonCode {
    // =========================================================================
    // A100: Skipped
    // =========================================================================
    /// Synthesizer disabled by configuration
    A101_DISABLED,
    /// No configuration applied yet
    A102_NOT_CONFIGURED,

    // =========================================================================
    // A200: Pointed at a target
    // =========================================================================
    /// Pointed at the attended face
    A201_FACE,
    /// Pointed at the selected salient point
    A202_SALIENT_POINT,
    /// Pointed at a point in the attention region
    A203_REGION,
    /// Region dwell still running, heading kept
    A204_REGION_DWELL,

    // =========================================================================
    // A300: Idle heading
    // =========================================================================
    /// LookAt is Idle
    A301_IDLE_MODE,
    /// Nothing to look at, straightened the head
    A302_NOTHING_SELECTED,
    /// A sub-step failed, fell back to the idle heading
    A303_DEGRADED,

    // =========================================================================
    // A400: No pointing
    // =========================================================================
    /// Avoid / Hold issue no pointing command
    A401_HOLDING,
}

impl ReasonCode {
    /// Get the code string (for logging)
    pub fn code(&self) -> &'static str {
        match self {
            Self::A101_DISABLED => "A101_DISABLED",
            Self::A102_NOT_CONFIGURED => "A102_NOT_CONFIGURED",
            Self::A201_FACE => "A201_FACE",
            Self::A202_SALIENT_POINT => "A202_SALIENT_POINT",
            Self::A203_REGION => "A203_REGION",
            Self::A204_REGION_DWELL => "A204_REGION_DWELL",
            Self::A301_IDLE_MODE => "A301_IDLE_MODE",
            Self::A302_NOTHING_SELECTED => "A302_NOTHING_SELECTED",
            Self::A303_DEGRADED => "A303_DEGRADED",
            Self::A401_HOLDING => "A401_HOLDING",
        }
    }

    /// Get human-readable description
    pub fn description(&self) -> &'static str {
        match self {
            Self::A101_DISABLED => "Synthesizer disabled",
            Self::A102_NOT_CONFIGURED => "Waiting for configuration",
            Self::A201_FACE => "Looking at face",
            Self::A202_SALIENT_POINT => "Looking at salient point",
            Self::A203_REGION => "Looking into region",
            Self::A204_REGION_DWELL => "Dwelling in region",
            Self::A301_IDLE_MODE => "Looking ahead",
            Self::A302_NOTHING_SELECTED => "Nothing to look at",
            Self::A303_DEGRADED => "Sub-step failed, looking ahead",
            Self::A401_HOLDING => "Holding heading",
        }
    }

    /// Tick emitted the idle heading
    pub fn is_idle_heading(&self) -> bool {
        matches!(
            self,
            Self::A301_IDLE_MODE | Self::A302_NOTHING_SELECTED | Self::A303_DEGRADED
        )
    }
}

impl std::fmt::Display for ReasonCode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}: {}", self.code(), self.description())
    }
}
