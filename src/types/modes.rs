//! Behavior mode definitions
//!
//! Four orthogonal state machines decide how the robot attends. Each mode has a
//! numeric wire code (declaration order) and a snake_case name; both parse.

use serde::{Deserialize, Serialize};

use crate::types::AttentionError;

macro_rules! wire_mode {
    (
        $(#[$meta:meta])*
        $name:ident {
            $( $(#[$vmeta:meta])* $variant:ident = $code:literal => $label:literal, )+
        }
    ) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
        #[serde(rename_all = "snake_case")]
        pub enum $name {
            $( $(#[$vmeta])* $variant, )+
        }

        impl $name {
            /// Every variant, in wire-code order
            pub const ALL: &'static [$name] = &[$($name::$variant),+];

            /// Numeric wire code
            pub fn code(self) -> u8 {
                match self {
                    $( $name::$variant => $code, )+
                }
            }

            /// Look up a variant by wire code
            pub fn from_code(code: u8) -> Option<Self> {
                match code {
                    $( $code => Some($name::$variant), )+
                    _ => None,
                }
            }

            /// snake_case name
            pub fn name(self) -> &'static str {
                match self {
                    $( $name::$variant => $label, )+
                }
            }
        }

        impl std::fmt::Display for $name {
            fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
                write!(f, "{}", self.name())
            }
        }

        impl std::str::FromStr for $name {
            type Err = AttentionError;

            fn from_str(s: &str) -> Result<Self, Self::Err> {
                let wanted = s.trim();
                if let Some(mode) = Self::ALL
                    .iter()
                    .copied()
                    .find(|m| m.name().eq_ignore_ascii_case(wanted))
                {
                    return Ok(mode);
                }
                wanted
                    .parse::<u8>()
                    .ok()
                    .and_then(Self::from_code)
                    .ok_or_else(|| AttentionError::UnknownMode {
                        kind: stringify!($name),
                        value: wanted.to_string(),
                    })
            }
        }
    };
}

wire_mode! {
    /// Where on the attended face the eyes rest
    EyeContact {
        /// Look at the center of the face
        Idle = 0 => "idle",
        LeftEye = 1 => "left_eye",
        RightEye = 2 => "right_eye",
        /// Alternate between the eyes
        BothEyes = 3 => "both_eyes",
        /// Cycle left eye, right eye, mouth
        Triangle = 4 => "triangle",
    }
}

wire_mode! {
    /// What the robot attends to
    LookAt {
        /// Straight ahead
        Idle = 0 => "idle",
        /// Reserved; issues no pointing command
        Avoid = 1 => "avoid",
        /// Cycle through salient points
        Saliency = 2 => "saliency",
        /// Stay on one face (optionally pinned by id)
        OneFace = 3 => "one_face",
        /// Cycle through all faces
        AllFaces = 4 => "all_faces",
        /// Look into a named attention region
        Region = 5 => "region",
        /// Keep the last heading
        Hold = 6 => "hold",
        /// Keep switching to the face closest to the robot
        NearestFace = 7 => "nearest_face",
    }
}

wire_mode! {
    /// Which facial features of the attended face are mirrored
    Mirroring {
        Idle = 0 => "idle",
        Eyebrows = 1 => "eyebrows",
        Eyelids = 2 => "eyelids",
        /// Eyebrows and eyelids
        Eyes = 3 => "eyes",
        Mouth = 4 => "mouth",
        MouthEyebrows = 5 => "mouth_eyebrows",
        MouthEyelids = 6 => "mouth_eyelids",
        All = 7 => "all",
    }
}

wire_mode! {
    /// How head and eyes share the pointing work
    GazeCoordination {
        GazeOnly = 0 => "gaze_only",
        HeadOnly = 1 => "head_only",
        GazeAndHead = 2 => "gaze_and_head",
        /// Eyes first, head follows after the gaze delay
        GazeLeadsHead = 3 => "gaze_leads_head",
        /// Head first, eyes follow after the gaze delay
        HeadLeadsGaze = 4 => "head_leads_gaze",
    }
}

wire_mode! {
    /// Named attention regions
    AttentionRegion {
        Audience = 0 => "audience",
        /// Presenter region
        Main = 1 => "main",
        /// Co-presenter or setting-specific region
        Specific = 2 => "specific",
    }
}

impl Default for EyeContact {
    fn default() -> Self {
        EyeContact::Idle
    }
}

impl Default for LookAt {
    fn default() -> Self {
        LookAt::Idle
    }
}

impl Default for Mirroring {
    fn default() -> Self {
        Mirroring::Idle
    }
}

impl Default for GazeCoordination {
    fn default() -> Self {
        GazeCoordination::GazeOnly
    }
}

impl Default for AttentionRegion {
    fn default() -> Self {
        AttentionRegion::Audience
    }
}

impl Mirroring {
    pub fn mirrors_eyebrows(self) -> bool {
        matches!(
            self,
            Mirroring::Eyebrows | Mirroring::Eyes | Mirroring::MouthEyebrows | Mirroring::All
        )
    }

    pub fn mirrors_eyelids(self) -> bool {
        matches!(
            self,
            Mirroring::Eyelids | Mirroring::Eyes | Mirroring::MouthEyelids | Mirroring::All
        )
    }

    pub fn mirrors_mouth(self) -> bool {
        matches!(
            self,
            Mirroring::Mouth | Mirroring::MouthEyebrows | Mirroring::MouthEyelids | Mirroring::All
        )
    }
}

impl GazeCoordination {
    /// One actuator leads, the other follows after a delay
    pub fn is_staggered(self) -> bool {
        matches!(
            self,
            GazeCoordination::GazeLeadsHead | GazeCoordination::HeadLeadsGaze
        )
    }
}

/// The four current mode values, echoed back after every external change
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct ModeSnapshot {
    pub eye_contact: EyeContact,
    pub look_at: LookAt,
    pub mirroring: Mirroring,
    pub gaze: GazeCoordination,
}

impl std::fmt::Display for ModeSnapshot {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "eyecontact={} lookat={} mirroring={} gaze={}",
            self.eye_contact, self.look_at, self.mirroring, self.gaze
        )
    }
}
