//! Attention controller: owns every piece of behavior state and runs one
//! synthesis step per tick.
//!
//! Per tick:
//! 1. skip when disabled or not configured
//! 2. dispatch on LookAt (idle / hold / saliency / region / faces)
//! 3. trailing command of a staggered gaze mode
//! 4. interruption bookkeeping
//!
//! Every failure inside a step degrades to the idle heading for that tick
//! only.

use chrono::{DateTime, Utc};
use tracing::{debug, info, warn};

use crate::core::counter::{CounterBank, DwellCounter};
use crate::core::gaze::{GazeCoordinator, TargetRequest};
use crate::core::interruption::{Interruption, InterruptionManager};
use crate::core::mirroring::mirror_features;
use crate::core::region::RegionProvider;
use crate::core::selector::{self, SelectionCursor};
use crate::core::transform::CoordinateTransformer;
use crate::types::{
    AnimationMode, AttentionConfig, AttentionError, AttentionRegion, AttentionResult, Command,
    ControllerStatus, EyeContact, GazeCoordination, LookAt, Mirroring, ModeSnapshot,
    PerceptionState, Point3, ReasonCode, StampedPoint, TargetCommand, TickReport,
};
use crate::{
    EYE_LATERAL_OFFSET, EYE_VERTICAL_OFFSET, FACE_FEATURE_DEPTH, IDLE_HEADING,
    MOUTH_VERTICAL_OFFSET,
};

/// Spot on the attended face the eyes currently rest on
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum FaceSpot {
    #[default]
    LeftEye,
    RightEye,
    Mouth,
}

impl FaceSpot {
    /// BothEyes alternation
    fn other_eye(self) -> Self {
        match self {
            FaceSpot::RightEye => FaceSpot::LeftEye,
            FaceSpot::LeftEye | FaceSpot::Mouth => FaceSpot::RightEye,
        }
    }

    /// Triangle cycle
    fn next_in_triangle(self) -> Self {
        match self {
            FaceSpot::LeftEye => FaceSpot::RightEye,
            FaceSpot::RightEye => FaceSpot::Mouth,
            FaceSpot::Mouth => FaceSpot::LeftEye,
        }
    }
}

/// Eye and mouth positions derived from a face center
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FaceSpots {
    pub center: Point3,
    pub left_eye: Point3,
    pub right_eye: Point3,
    pub mouth: Point3,
}

impl FaceSpots {
    pub fn from_center(center: Point3) -> Self {
        Self {
            center,
            left_eye: center.offset(FACE_FEATURE_DEPTH, EYE_LATERAL_OFFSET, EYE_VERTICAL_OFFSET),
            right_eye: center.offset(FACE_FEATURE_DEPTH, -EYE_LATERAL_OFFSET, EYE_VERTICAL_OFFSET),
            mouth: center.offset(FACE_FEATURE_DEPTH, 0.0, MOUTH_VERTICAL_OFFSET),
        }
    }

    pub fn get(&self, spot: FaceSpot) -> Point3 {
        match spot {
            FaceSpot::LeftEye => self.left_eye,
            FaceSpot::RightEye => self.right_eye,
            FaceSpot::Mouth => self.mouth,
        }
    }
}

/// Per-behavior dwell counters
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DwellCounters {
    pub saliency: DwellCounter,
    pub faces: DwellCounter,
    pub eyes: DwellCounter,
    pub region: DwellCounter,
}

/// The synthesizer's single owner of mutable state
pub struct AttentionController {
    config: AttentionConfig,
    configured: bool,
    perception: PerceptionState,
    cursor: SelectionCursor,
    wanted_face_id: u32,
    eye_contact: EyeContact,
    look_at: LookAt,
    mirroring: Mirroring,
    counters: DwellCounters,
    face_spot: FaceSpot,
    gaze: GazeCoordinator,
    interruption: InterruptionManager,
    bank: CounterBank,
    transformer: CoordinateTransformer,
    regions: Box<dyn RegionProvider>,
    outbox: Vec<Command>,
    tick: u64,
}

impl std::fmt::Debug for AttentionController {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AttentionController")
            .field("modes", &self.modes())
            .field("configured", &self.configured)
            .field("cursor", &self.cursor)
            .field("wanted_face_id", &self.wanted_face_id)
            .field("counters", &self.counters)
            .field("tick", &self.tick)
            .finish()
    }
}

impl AttentionController {
    /// Controller with default configuration, not yet configured
    pub fn new(transformer: CoordinateTransformer, regions: Box<dyn RegionProvider>, mut bank: CounterBank) -> Self {
        let config = AttentionConfig::default();
        let rate = config.synthesizer_rate;
        let counters = DwellCounters {
            saliency: bank.reseed(config.saliency_time, rate),
            faces: bank.reseed(config.faces_time, rate),
            eyes: bank.reseed(config.eyes_time, rate),
            region: bank.reseed(config.region_time, rate),
        };
        let interruption = InterruptionManager::new(&mut bank, &config);
        Self {
            config,
            configured: false,
            perception: PerceptionState::empty(),
            cursor: SelectionCursor::default(),
            wanted_face_id: 0,
            eye_contact: EyeContact::Idle,
            look_at: LookAt::Idle,
            mirroring: Mirroring::Idle,
            counters,
            face_spot: FaceSpot::LeftEye,
            gaze: GazeCoordinator::new(),
            interruption,
            bank,
            transformer,
            regions,
            outbox: Vec::new(),
            tick: 0,
        }
    }

    // =========================================================================
    // ACCESSORS
    // =========================================================================

    pub fn config(&self) -> &AttentionConfig {
        &self.config
    }

    pub fn is_configured(&self) -> bool {
        self.configured
    }

    pub fn modes(&self) -> ModeSnapshot {
        ModeSnapshot {
            eye_contact: self.eye_contact,
            look_at: self.look_at,
            mirroring: self.mirroring,
            gaze: self.gaze.mode(),
        }
    }

    pub fn look_at(&self) -> LookAt {
        self.look_at
    }

    pub fn cursor(&self) -> SelectionCursor {
        self.cursor
    }

    pub fn wanted_face_id(&self) -> u32 {
        self.wanted_face_id
    }

    pub fn counters(&self) -> DwellCounters {
        self.counters
    }

    pub fn face_spot(&self) -> FaceSpot {
        self.face_spot
    }

    pub fn gaze(&self) -> &GazeCoordinator {
        &self.gaze
    }

    pub fn interruption(&self) -> &InterruptionManager {
        &self.interruption
    }

    pub fn perception(&self) -> &PerceptionState {
        &self.perception
    }

    pub fn status(&self) -> ControllerStatus {
        ControllerStatus {
            modes: self.modes(),
            configured: self.configured,
            enabled: self.config.enabled,
            synthesizer_rate: self.config.synthesizer_rate,
            face_count: self.perception.faces.len(),
            salient_count: self.perception.salient_points.len(),
            current_face: self.cursor.face,
            current_salient: self.cursor.salient,
            wanted_face_id: self.wanted_face_id,
            interrupting: self.interruption.is_interrupting(),
            tick: self.tick,
        }
    }

    /// Commands queued by direct setter calls since the last drain
    pub fn take_commands(&mut self) -> Vec<Command> {
        std::mem::take(&mut self.outbox)
    }

    // =========================================================================
    // CONFIGURATION
    // =========================================================================

    /// Apply a configuration snapshot as a whole
    ///
    /// Counters whose bounds changed are reseeded; a rate change reseeds all of
    /// them. A running interruption is cancelled and its saved LookAt restored.
    pub fn apply_config(&mut self, config: AttentionConfig) -> AttentionResult<Vec<Command>> {
        let new = config.normalized()?;
        let old = std::mem::replace(&mut self.config, new);
        let rate_changed = old.synthesizer_rate != self.config.synthesizer_rate;

        if old.enabled != self.config.enabled {
            info!("synthesizer {}", if self.config.enabled { "enabled" } else { "disabled" });
        }

        let rate = self.config.synthesizer_rate;
        if old.saliency_time != self.config.saliency_time {
            self.counters.saliency = self.bank.reseed(self.config.saliency_time, rate);
        }
        if old.faces_time != self.config.faces_time {
            self.counters.faces = self.bank.reseed(self.config.faces_time, rate);
        }
        if old.eyes_time != self.config.eyes_time {
            self.counters.eyes = self.bank.reseed(self.config.eyes_time, rate);
        }
        if old.region_time != self.config.region_time {
            self.counters.region = self.bank.reseed(self.config.region_time, rate);
        }
        if old.interrupt_start_time != self.config.interrupt_start_time {
            self.interruption.reseed_start(&mut self.bank, &self.config);
        }
        if old.interrupt_duration_time != self.config.interrupt_duration_time {
            self.interruption.reseed_duration(&mut self.bank, &self.config);
        }

        if let Some(restore) = self.interruption.cancel() {
            info!("configuration reset cancels interruption, back to {}", restore);
            self.set_look_at(restore);
        }

        self.transformer.set_timeout(self.config.transform_timeout());

        if let Some(modes) = self.config.modes {
            self.set_eye_contact(modes.eye_contact);
            self.set_look_at(modes.look_at);
            self.set_mirroring(modes.mirroring);
            self.set_gaze(modes.gaze);
            self.echo_state();
        }

        if rate_changed {
            info!(
                "synthesizer rate {} -> {} Hz, reseeding counters",
                old.synthesizer_rate, self.config.synthesizer_rate
            );
            self.reseed_all();
        } else if old.gaze_delay != self.config.gaze_delay {
            self.gaze.rearm(self.config.gaze_delay_ticks());
        }

        self.configured = true;
        Ok(self.take_commands())
    }

    /// Re-quantize every counter at the current rate
    pub fn reseed_all(&mut self) {
        let rate = self.config.synthesizer_rate;
        self.counters = DwellCounters {
            saliency: self.bank.reseed(self.config.saliency_time, rate),
            faces: self.bank.reseed(self.config.faces_time, rate),
            eyes: self.bank.reseed(self.config.eyes_time, rate),
            region: self.bank.reseed(self.config.region_time, rate),
        };
        self.interruption.reseed_start(&mut self.bank, &self.config);
        self.interruption.reseed_duration(&mut self.bank, &self.config);
        self.gaze.rearm(self.config.gaze_delay_ticks());
    }

    // =========================================================================
    // PERCEPTION
    // =========================================================================

    /// Replace the perception snapshot and reconcile the selection
    pub fn apply_perception(&mut self, state: PerceptionState) {
        self.perception = state;
        selector::reconcile(&self.perception, &mut self.cursor, self.wanted_face_id, self.look_at);
        debug!(
            "perception: {} faces, {} salient points, cursor {:?}",
            self.perception.faces.len(),
            self.perception.salient_points.len(),
            self.cursor
        );
    }

    // =========================================================================
    // MODE SETTERS
    // =========================================================================

    /// Returns true when the mode changed
    pub fn set_eye_contact(&mut self, mode: EyeContact) -> bool {
        if mode == self.eye_contact {
            return false;
        }
        info!("eye contact {} -> {}", self.eye_contact, mode);
        self.eye_contact = mode;
        if matches!(mode, EyeContact::BothEyes | EyeContact::Triangle) {
            self.reseed_eyes();
        }
        true
    }

    pub fn set_look_at(&mut self, mode: LookAt) -> bool {
        if mode == self.look_at {
            return false;
        }
        info!("look at {} -> {}", self.look_at, mode);
        self.look_at = mode;
        let rate = self.config.synthesizer_rate;
        match mode {
            LookAt::Saliency => {
                self.counters.saliency = self.bank.reseed(self.config.saliency_time, rate);
            }
            LookAt::OneFace => self.reseed_eyes(),
            LookAt::AllFaces => {
                self.counters.faces = self.bank.reseed(self.config.faces_time, rate);
                self.reseed_eyes();
            }
            LookAt::Region => {
                self.counters.region = self.bank.reseed(self.config.region_time, rate);
            }
            LookAt::Idle | LookAt::Avoid | LookAt::Hold | LookAt::NearestFace => {}
        }
        true
    }

    /// Entering any mirroring mode arms parameter drive; returning to Idle
    /// disarms it
    pub fn set_mirroring(&mut self, mode: Mirroring) -> bool {
        if mode == self.mirroring {
            return false;
        }
        info!("mirroring {} -> {}", self.mirroring, mode);
        let was_idle = self.mirroring == Mirroring::Idle;
        self.mirroring = mode;
        if mode == Mirroring::Idle {
            self.outbox.push(Command::AnimationMode {
                mode: AnimationMode::Off,
            });
        } else if was_idle {
            self.outbox.push(Command::AnimationMode {
                mode: AnimationMode::ParameterDrive,
            });
        }
        true
    }

    pub fn set_gaze(&mut self, mode: GazeCoordination) -> bool {
        let changed = self.gaze.set_mode(mode, self.config.gaze_delay_ticks());
        if changed {
            info!("gaze coordination -> {}", mode);
        }
        changed
    }

    fn reseed_eyes(&mut self) {
        self.counters.eyes = self.bank.reseed(self.config.eyes_time, self.config.synthesizer_rate);
    }

    // =========================================================================
    // EXTERNAL REQUESTS
    // =========================================================================

    fn echo_state(&mut self) {
        self.outbox.push(Command::StateEcho(self.modes()));
    }

    pub fn request_eye_contact(&mut self, mode: EyeContact) -> Vec<Command> {
        self.set_eye_contact(mode);
        self.echo_state();
        self.take_commands()
    }

    /// `id` is the face id to pin for OneFace and the region code for Region;
    /// it is ignored otherwise
    pub fn request_look_at(&mut self, mode: LookAt, id: u32) -> AttentionResult<Vec<Command>> {
        match mode {
            LookAt::OneFace => {
                self.wanted_face_id = id;
                if id != 0 {
                    self.cursor.face = self.perception.face_index(id);
                }
            }
            LookAt::Region => {
                let region = u8::try_from(id)
                    .ok()
                    .and_then(AttentionRegion::from_code)
                    .ok_or_else(|| AttentionError::UnknownMode {
                        kind: "AttentionRegion",
                        value: id.to_string(),
                    })?;
                self.config.attention_region = region;
                self.wanted_face_id = 0;
            }
            _ => self.wanted_face_id = 0,
        }
        self.set_look_at(mode);
        self.echo_state();
        Ok(self.take_commands())
    }

    pub fn request_mirroring(&mut self, mode: Mirroring) -> Vec<Command> {
        self.set_mirroring(mode);
        self.echo_state();
        self.take_commands()
    }

    pub fn request_gaze(&mut self, mode: GazeCoordination) -> Vec<Command> {
        self.set_gaze(mode);
        self.echo_state();
        self.take_commands()
    }

    // =========================================================================
    // TICK
    // =========================================================================

    /// Run one synthesis step
    pub fn step(&mut self, stamp: DateTime<Utc>) -> TickReport {
        self.tick += 1;

        if !self.configured {
            return TickReport::new(self.tick, stamp, ReasonCode::A102_NOT_CONFIGURED, Vec::new());
        }
        if !self.config.enabled {
            return TickReport::new(self.tick, stamp, ReasonCode::A101_DISABLED, Vec::new());
        }

        let reason = match self.look_at {
            LookAt::Idle => {
                self.point_idle(stamp);
                ReasonCode::A301_IDLE_MODE
            }
            LookAt::Avoid | LookAt::Hold => ReasonCode::A401_HOLDING,
            LookAt::Saliency => self.step_saliency(stamp),
            LookAt::Region => self.step_region(stamp),
            LookAt::OneFace | LookAt::AllFaces | LookAt::NearestFace => self.step_faces(stamp),
        };

        self.step_follow_up();
        self.step_interruption();

        let report = TickReport::new(self.tick, stamp, reason, self.take_commands());
        debug!("{}", report.to_parseable_string());
        report
    }

    fn step_saliency(&mut self, stamp: DateTime<Utc>) -> ReasonCode {
        if self.counters.saliency.tick() {
            self.cursor.salient = selector::select_next_salient_point(&self.perception, self.cursor.salient);
            if self.cursor.salient.is_some() {
                self.counters.saliency = self
                    .bank
                    .reseed(self.config.saliency_time, self.config.synthesizer_rate);
            }
        }

        let Some(point) = self
            .cursor
            .salient
            .and_then(|i| self.perception.salient_points.get(i))
            .map(|s| s.position)
        else {
            self.point_idle(stamp);
            return ReasonCode::A302_NOTHING_SELECTED;
        };

        let target = StampedPoint::new(point, self.perception.frame.clone(), stamp);
        match self.point_at(target) {
            Ok(()) => ReasonCode::A202_SALIENT_POINT,
            Err(e) => self.degrade(stamp, &e),
        }
    }

    fn step_region(&mut self, stamp: DateTime<Utc>) -> ReasonCode {
        if !self.counters.region.tick() {
            return ReasonCode::A204_REGION_DWELL;
        }
        self.counters.region = self
            .bank
            .reseed(self.config.region_time, self.config.synthesizer_rate);

        let output_frame = self.transformer.output_frame().to_string();
        let result = selector::select_region_target(&mut *self.regions, self.config.attention_region)
            .and_then(|p| self.point_at(StampedPoint::new(p, output_frame, stamp)));
        match result {
            Ok(()) => ReasonCode::A203_REGION,
            Err(e) => self.degrade(stamp, &e),
        }
    }

    fn step_faces(&mut self, stamp: DateTime<Utc>) -> ReasonCode {
        if matches!(self.look_at, LookAt::AllFaces | LookAt::NearestFace) && self.counters.faces.tick() {
            self.counters.faces = self
                .bank
                .reseed(self.config.faces_time, self.config.synthesizer_rate);
            self.cursor.face = selector::select_next_face(&self.perception, self.cursor.face, self.look_at);
        }

        match self.look_at_face(stamp) {
            Ok(()) => ReasonCode::A201_FACE,
            Err(AttentionError::NoFaceSelected) => {
                self.point_idle(stamp);
                ReasonCode::A302_NOTHING_SELECTED
            }
            Err(e) => self.degrade(stamp, &e),
        }
    }

    /// Eye-contact pointing and mirroring for the selected face
    fn look_at_face(&mut self, stamp: DateTime<Utc>) -> AttentionResult<()> {
        let face = self
            .cursor
            .face
            .and_then(|i| self.perception.faces.get(i))
            .cloned()
            .ok_or(AttentionError::NoFaceSelected)?;
        let spots = FaceSpots::from_center(face.position);

        let point = match self.eye_contact {
            EyeContact::Idle => spots.center,
            EyeContact::LeftEye => spots.left_eye,
            EyeContact::RightEye => spots.right_eye,
            EyeContact::BothEyes => {
                if self.counters.eyes.tick() {
                    self.reseed_eyes();
                    self.face_spot = self.face_spot.other_eye();
                }
                match self.face_spot {
                    FaceSpot::LeftEye => spots.left_eye,
                    FaceSpot::RightEye | FaceSpot::Mouth => spots.right_eye,
                }
            }
            EyeContact::Triangle => {
                if self.counters.eyes.tick() {
                    self.reseed_eyes();
                    self.face_spot = self.face_spot.next_in_triangle();
                }
                spots.get(self.face_spot)
            }
        };

        self.point_at(StampedPoint::new(point, self.perception.frame.clone(), stamp))?;

        if let Some(params) = face
            .features
            .and_then(|f| mirror_features(self.mirroring, &f))
            .filter(|p| !p.is_empty())
        {
            self.outbox.push(Command::FacialParameters(params));
        }
        Ok(())
    }

    fn step_follow_up(&mut self) {
        let Some(request) = self
            .gaze
            .follow_up(self.config.gaze_delay_ticks(), self.config.gaze_speed)
        else {
            return;
        };
        if let Err(e) = self.emit(vec![request]) {
            warn!("trailing {} command skipped: {}", self.gaze.mode(), e);
        }
    }

    fn step_interruption(&mut self) {
        let transition = self
            .interruption
            .evaluate(self.look_at, &mut self.bank, &self.config);
        match transition {
            Some(Interruption::Begin { .. }) => {
                self.set_look_at(LookAt::AllFaces);
                self.echo_state();
            }
            Some(Interruption::End { restore }) => {
                self.set_look_at(restore);
                self.echo_state();
            }
            None => {}
        }
    }

    // =========================================================================
    // POINTING
    // =========================================================================

    fn point_at(&mut self, target: StampedPoint) -> AttentionResult<()> {
        let requests = self.gaze.point_at(target, self.config.head_speed);
        self.emit(requests)
    }

    fn point_idle(&mut self, stamp: DateTime<Utc>) {
        let idle = StampedPoint::new(IDLE_HEADING, self.transformer.output_frame(), stamp);
        if let Err(e) = self.point_at(idle) {
            warn!("idle heading failed: {}", e);
        }
    }

    fn degrade(&mut self, stamp: DateTime<Utc>, error: &AttentionError) -> ReasonCode {
        warn!("{} step failed, looking ahead: {}", self.look_at, error);
        self.point_idle(stamp);
        ReasonCode::A303_DEGRADED
    }

    /// Convert every request first so a failed lookup emits nothing
    fn emit(&mut self, requests: Vec<TargetRequest>) -> AttentionResult<()> {
        let mut converted = Vec::with_capacity(requests.len());
        for request in requests {
            let point = self.transformer.to_output_frame(&request.target)?;
            converted.push(Command::Target(TargetCommand {
                actuator: request.actuator,
                point,
                speed: request.speed,
                frame: self.transformer.output_frame().to_string(),
                stamp: request.target.stamp,
            }));
        }
        self.outbox.extend(converted);
        Ok(())
    }
}

// =============================================================================
// TESTS
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::region::{Region, RegionTable};
    use crate::core::transform::{RigidTransform, StaticTransforms};
    use crate::types::{Actuator, DwellBounds, Face, FacialFeatures};
    use std::time::Duration;

    fn controller() -> AttentionController {
        let table = StaticTransforms::new().with("device", "robot", RigidTransform::default());
        let transformer = CoordinateTransformer::new(Box::new(table), "device", Duration::from_millis(100));
        let regions = RegionTable::new().with_region("audience", Region::point(Point3::new(3.0, 0.0, 0.5)));
        let mut c = AttentionController::new(transformer, Box::new(regions), CounterBank::from_seed(11));
        c.apply_config(AttentionConfig::default()).unwrap();
        c
    }

    fn targets(report: &TickReport) -> Vec<&TargetCommand> {
        report.commands.iter().filter_map(Command::as_target).collect()
    }

    #[test]
    fn test_unconfigured_tick_is_noop() {
        let table = StaticTransforms::new();
        let transformer = CoordinateTransformer::new(Box::new(table), "device", Duration::from_millis(100));
        let mut c = AttentionController::new(transformer, Box::new(RegionTable::new()), CounterBank::from_seed(1));
        let report = c.step(Utc::now());
        assert_eq!(report.reason, ReasonCode::A102_NOT_CONFIGURED);
        assert!(report.commands.is_empty());
    }

    #[test]
    fn test_disabled_tick_is_noop() {
        let mut c = controller();
        c.apply_config(AttentionConfig {
            enabled: false,
            ..AttentionConfig::default()
        })
        .unwrap();
        let report = c.step(Utc::now());
        assert_eq!(report.reason, ReasonCode::A101_DISABLED);
        assert!(report.commands.is_empty());
    }

    #[test]
    fn test_idle_points_straight_ahead() {
        let mut c = controller();
        let report = c.step(Utc::now());
        assert_eq!(report.reason, ReasonCode::A301_IDLE_MODE);
        let t = targets(&report);
        assert_eq!(t.len(), 1);
        assert_eq!(t[0].point, IDLE_HEADING);
        assert_eq!(t[0].actuator, Actuator::Gaze);
    }

    #[test]
    fn test_hold_issues_nothing() {
        let mut c = controller();
        c.request_look_at(LookAt::Hold, 0).unwrap();
        let report = c.step(Utc::now());
        assert_eq!(report.reason, ReasonCode::A401_HOLDING);
        assert!(targets(&report).is_empty());
    }

    #[test]
    fn test_eye_spots() {
        let spots = FaceSpots::from_center(Point3::new(1.0, 0.0, 0.0));
        assert_eq!(spots.left_eye, Point3::new(0.95, 0.03, 0.06));
        assert_eq!(spots.right_eye, Point3::new(0.95, -0.03, 0.06));
        assert_eq!(spots.mouth, Point3::new(0.95, 0.0, -0.04));
    }

    #[test]
    fn test_one_face_left_eye() {
        let mut c = controller();
        c.apply_perception(PerceptionState::with_faces(vec![Face::new(3, Point3::new(1.0, 0.0, 0.0))]));
        c.request_look_at(LookAt::OneFace, 0).unwrap();
        c.request_eye_contact(EyeContact::LeftEye);
        let report = c.step(Utc::now());
        assert_eq!(report.reason, ReasonCode::A201_FACE);
        assert_eq!(targets(&report)[0].point, FaceSpots::from_center(Point3::new(1.0, 0.0, 0.0)).left_eye);
    }

    #[test]
    fn test_triangle_cycles_spots() {
        let mut c = controller();
        c.apply_config(AttentionConfig {
            eyes_time: DwellBounds::new(0.1, 0.1),
            ..AttentionConfig::default()
        })
        .unwrap();
        c.apply_perception(PerceptionState::with_faces(vec![Face::new(1, Point3::new(1.0, 0.0, 0.0))]));
        c.request_look_at(LookAt::OneFace, 0).unwrap();
        c.request_eye_contact(EyeContact::Triangle);
        let mut spots = Vec::new();
        for _ in 0..4 {
            c.step(Utc::now());
            spots.push(c.face_spot());
        }
        assert_eq!(
            spots,
            vec![FaceSpot::RightEye, FaceSpot::Mouth, FaceSpot::LeftEye, FaceSpot::RightEye]
        );
    }

    #[test]
    fn test_no_face_falls_back_to_idle() {
        let mut c = controller();
        c.request_look_at(LookAt::OneFace, 0).unwrap();
        let report = c.step(Utc::now());
        assert_eq!(report.reason, ReasonCode::A302_NOTHING_SELECTED);
        assert_eq!(targets(&report)[0].point, IDLE_HEADING);
    }

    #[test]
    fn test_mirroring_arms_and_disarms() {
        let mut c = controller();
        let cmds = c.request_mirroring(Mirroring::Eyes);
        assert_eq!(
            cmds[0],
            Command::AnimationMode {
                mode: AnimationMode::ParameterDrive
            }
        );
        let cmds = c.request_mirroring(Mirroring::Eyes);
        assert_eq!(cmds.len(), 1);
        assert!(matches!(cmds[0], Command::StateEcho(_)));
        let cmds = c.request_mirroring(Mirroring::Idle);
        assert_eq!(cmds[0], Command::AnimationMode { mode: AnimationMode::Off });
    }

    #[test]
    fn test_mirroring_emits_facial_parameters() {
        let mut c = controller();
        let face = Face::new(1, Point3::new(1.0, 0.0, 0.0)).with_features(FacialFeatures {
            mouth_open: 0.6,
            ..FacialFeatures::default()
        });
        c.apply_perception(PerceptionState::with_faces(vec![face]));
        c.request_look_at(LookAt::OneFace, 0).unwrap();
        c.request_mirroring(Mirroring::Mouth);
        let report = c.step(Utc::now());
        let params = report
            .commands
            .iter()
            .find_map(|cmd| match cmd {
                Command::FacialParameters(p) => Some(p.clone()),
                _ => None,
            })
            .unwrap();
        assert_eq!(params.get("lip-JAW.DN"), Some(0.6));
    }

    #[test]
    fn test_region_request_records_region() {
        let mut c = controller();
        c.request_look_at(LookAt::Region, 2).unwrap();
        assert_eq!(c.config().attention_region, AttentionRegion::Specific);
        assert!(c.request_look_at(LookAt::Region, 9).is_err());
    }

    #[test]
    fn test_region_lookup_failure_degrades() {
        let mut c = controller();
        c.apply_config(AttentionConfig {
            region_time: DwellBounds::new(0.1, 0.1),
            ..AttentionConfig::default()
        })
        .unwrap();
        c.request_look_at(LookAt::Region, 1).unwrap();
        let report = c.step(Utc::now());
        assert_eq!(report.reason, ReasonCode::A303_DEGRADED);
        assert_eq!(targets(&report)[0].point, IDLE_HEADING);

        c.request_look_at(LookAt::Region, 0).unwrap();
        let report = c.step(Utc::now());
        assert_eq!(report.reason, ReasonCode::A203_REGION);
        assert_eq!(targets(&report)[0].point, Point3::new(3.0, 0.0, 0.5));
    }
}
