//! Core modules for the attention synthesizer

pub mod counter;
pub mod transform;
pub mod region;
pub mod selector;
pub mod gaze;
pub mod mirroring;
pub mod interruption;
pub mod controller;
pub mod service;
pub mod console;
pub mod api;

pub use counter::{CounterBank, DwellCounter};
pub use transform::{CoordinateTransformer, FrameTransformer, RigidTransform, StaticTransforms};
pub use region::{Region, RegionProvider, RegionTable};
pub use selector::{reconcile, select_next_face, select_next_salient_point, select_region_target, SelectionCursor};
pub use gaze::{GazeCoordinator, TargetRequest};
pub use mirroring::mirror_features;
pub use interruption::{Interruption, InterruptionManager};
pub use controller::{AttentionController, DwellCounters, FaceSpot, FaceSpots};
pub use service::AttentionService;
pub use console::{Console, ConsoleCommand, ConsoleOutput};
pub use api::{create_router, run_server};
