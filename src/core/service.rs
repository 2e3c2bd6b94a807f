//! Async service around the controller
//!
//! One tokio task ticks the controller at the configured rate. Perception,
//! configuration and mode requests take the same lock, so every handler runs
//! to completion between ticks. Emitted commands fan out over a broadcast
//! channel.

use std::sync::Arc;
use std::time::Duration;

use chrono::Utc;
use tokio::sync::{broadcast, Mutex};
use tokio::task::JoinHandle;
use tokio::time::MissedTickBehavior;
use tracing::{debug, info};

use crate::core::controller::AttentionController;
use crate::types::{
    AttentionConfig, AttentionResult, Command, ControllerStatus, EyeContact, GazeCoordination,
    LookAt, Mirroring, ModeSnapshot, PerceptionState, TickReport,
};

const COMMAND_CHANNEL_CAPACITY: usize = 256;

pub struct AttentionService {
    controller: Arc<Mutex<AttentionController>>,
    commands: broadcast::Sender<Command>,
    ticker: Mutex<Option<JoinHandle<()>>>,
}

impl AttentionService {
    pub fn new(controller: AttentionController) -> Self {
        let (commands, _) = broadcast::channel(COMMAND_CHANNEL_CAPACITY);
        Self {
            controller: Arc::new(Mutex::new(controller)),
            commands,
            ticker: Mutex::new(None),
        }
    }

    /// Receive every command emitted from now on
    pub fn subscribe(&self) -> broadcast::Receiver<Command> {
        self.commands.subscribe()
    }

    fn publish(&self, commands: Vec<Command>) {
        for command in commands {
            // No receivers is fine
            let _ = self.commands.send(command);
        }
    }

    // =========================================================================
    // TICKER
    // =========================================================================

    fn spawn_ticker(&self, period: Duration) -> JoinHandle<()> {
        let controller = Arc::clone(&self.controller);
        let tx = self.commands.clone();
        let handle = tokio::spawn(async move {
            let mut interval = tokio::time::interval(period);
            interval.set_missed_tick_behavior(MissedTickBehavior::Skip);
            loop {
                interval.tick().await;
                let report = controller.lock().await.step(Utc::now());
                for command in report.commands {
                    let _ = tx.send(command);
                }
            }
        });
        info!("ticker running every {:?}", period);
        handle
    }

    /// (Re)start the ticker at the controller's current rate
    pub async fn start(&self) {
        let mut ticker = self.ticker.lock().await;
        if let Some(handle) = ticker.take() {
            handle.abort();
        }
        let period = self.controller.lock().await.config().tick_period();
        *ticker = Some(self.spawn_ticker(period));
    }

    pub async fn stop(&self) {
        if let Some(handle) = self.ticker.lock().await.take() {
            handle.abort();
            info!("ticker stopped");
        }
    }

    pub async fn is_ticking(&self) -> bool {
        self.ticker
            .lock()
            .await
            .as_ref()
            .is_some_and(|h| !h.is_finished())
    }

    /// Run one step outside the ticker
    pub async fn tick_once(&self) -> TickReport {
        let report = self.controller.lock().await.step(Utc::now());
        self.publish(report.commands.clone());
        report
    }

    // =========================================================================
    // INPUTS
    // =========================================================================

    pub async fn update_perception(&self, state: PerceptionState) {
        self.controller.lock().await.apply_perception(state);
    }

    /// Apply a configuration snapshot
    ///
    /// A rate change swaps the schedule in one critical section: the old
    /// ticker is stopped before counters are requantized and the new one
    /// starts only after. A rejected snapshot leaves the old schedule running.
    pub async fn update_config(&self, config: AttentionConfig) -> AttentionResult<ModeSnapshot> {
        let mut ticker = self.ticker.lock().await;
        let mut controller = self.controller.lock().await;

        let old_period = controller.config().tick_period();
        let rate_changed = config.synthesizer_rate != controller.config().synthesizer_rate;
        let running = ticker.as_ref().is_some_and(|h| !h.is_finished());

        if rate_changed && running {
            if let Some(handle) = ticker.take() {
                handle.abort();
            }
        }

        let result = controller.apply_config(config);
        let period = controller.config().tick_period();
        let modes = controller.modes();
        drop(controller);

        if rate_changed && running {
            match &result {
                Ok(_) => debug!("rate changed, restarting ticker"),
                Err(_) => debug!("configuration rejected, keeping previous schedule"),
            }
            let period = if result.is_ok() { period } else { old_period };
            *ticker = Some(self.spawn_ticker(period));
        }
        drop(ticker);

        self.publish(result?);
        Ok(modes)
    }

    pub async fn request_eye_contact(&self, mode: EyeContact) -> ModeSnapshot {
        let mut controller = self.controller.lock().await;
        let commands = controller.request_eye_contact(mode);
        self.publish(commands);
        controller.modes()
    }

    pub async fn request_look_at(&self, mode: LookAt, id: u32) -> AttentionResult<ModeSnapshot> {
        let mut controller = self.controller.lock().await;
        let commands = controller.request_look_at(mode, id)?;
        self.publish(commands);
        Ok(controller.modes())
    }

    pub async fn request_mirroring(&self, mode: Mirroring) -> ModeSnapshot {
        let mut controller = self.controller.lock().await;
        let commands = controller.request_mirroring(mode);
        self.publish(commands);
        controller.modes()
    }

    pub async fn request_gaze(&self, mode: GazeCoordination) -> ModeSnapshot {
        let mut controller = self.controller.lock().await;
        let commands = controller.request_gaze(mode);
        self.publish(commands);
        controller.modes()
    }

    // =========================================================================
    // QUERIES
    // =========================================================================

    pub async fn status(&self) -> ControllerStatus {
        self.controller.lock().await.status()
    }

    pub async fn modes(&self) -> ModeSnapshot {
        self.controller.lock().await.modes()
    }
}

impl Drop for AttentionService {
    fn drop(&mut self) {
        if let Some(handle) = self.ticker.get_mut().take() {
            handle.abort();
        }
    }
}
