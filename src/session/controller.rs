use std::sync::Arc;
use std::time::Duration;

use tokio::sync::{mpsc, watch};
use tracing::{debug, info, warn};

use crate::common::errors::{GatewayError, SessionError};
use crate::common::types::Seconds;
use crate::configs::PlayerConfig;
use crate::engine::{EngineEvent, MediaEngine};
use crate::gateway::{ItemBundle, MetadataGateway};
use crate::prefs::{self, PreferenceStore, keys};
use crate::protocol::{ItemRef, SequenceKind, SkipToggles};
use crate::session::navigate::{self, EndAction};
use crate::session::overlay::{self, OverlayMark};
use crate::session::reconfigure::ModeReconfigurer;
use crate::session::report::ActivityReporter;
use crate::session::skip;
use crate::session::state::{Modifier, PauseKind, PlaybackModifiers, PlayerPhase, SessionState};

/// Imperative actions the embedding UI sends into the session.
#[derive(Debug, Clone)]
pub enum SessionCommand {
    /// Load and show this item, replacing whatever is active.
    Open(ItemRef),
    TogglePlay,
    Seek(Seconds),
    SetModifier(Modifier, bool),
    SetSkipToggles(SkipToggles),
    SetRate(f64),
    /// The viewer picked a sequence tab.
    SelectContext(SequenceKind),
    /// Re-open the current item after an error.
    Retry,
    /// Tear the session down.
    Close,
}

/// Everything that can move the state machine. Commands, gateway resolutions
/// and engine lifecycle all funnel through one queue, so transitions stay
/// serialized with no hidden reentrancy between handlers.
#[derive(Debug)]
pub enum SessionEvent {
    Command(SessionCommand),
    FetchResolved {
        token: u64,
        result: Result<ItemBundle, GatewayError>,
    },
    Engine(EngineEvent),
}

/// Read-only view published to the embedder after every handled event.
#[derive(Debug, Clone)]
pub struct SessionSnapshot {
    pub phase: PlayerPhase,
    pub item: Option<ItemRef>,
    pub position_secs: Seconds,
    pub duration_secs: Seconds,
    pub modifiers: PlaybackModifiers,
    pub marks: Vec<OverlayMark>,
    pub error: Option<String>,
    pub remediation: Option<&'static str>,
}

impl SessionSnapshot {
    fn empty() -> Self {
        Self {
            phase: PlayerPhase::Idle,
            item: None,
            position_secs: 0.0,
            duration_secs: 0.0,
            modifiers: PlaybackModifiers::default(),
            marks: Vec::new(),
            error: None,
            remediation: None,
        }
    }
}

/// Cheap handle the embedder keeps: feeds commands and engine events in,
/// observes snapshots out.
#[derive(Clone)]
pub struct SessionHandle {
    events_tx: mpsc::UnboundedSender<SessionEvent>,
    snapshot_rx: watch::Receiver<SessionSnapshot>,
}

impl SessionHandle {
    pub fn command(&self, command: SessionCommand) {
        let _ = self.events_tx.send(SessionEvent::Command(command));
    }

    /// Forward a lifecycle notification from the real media engine.
    pub fn engine_event(&self, event: EngineEvent) {
        let _ = self.events_tx.send(SessionEvent::Engine(event));
    }

    pub fn subscribe(&self) -> watch::Receiver<SessionSnapshot> {
        self.snapshot_rx.clone()
    }

    pub fn snapshot(&self) -> SessionSnapshot {
        self.snapshot_rx.borrow().clone()
    }
}

/// Owns the session state machine and the single media engine instance.
///
/// `Idle → Loading → Ready → {Playing ⇄ Paused} → Ended`, with `Error`
/// reachable from `Loading` and `Playing`/`Paused`. `Ended` is resolved
/// immediately by the end-of-item decision table.
pub struct SessionController {
    state: SessionState,
    engine: Box<dyn MediaEngine>,
    gateway: Arc<dyn MetadataGateway>,
    prefs: Arc<dyn PreferenceStore>,
    reconfigurer: ModeReconfigurer,
    reporter: ActivityReporter,
    events_tx: mpsc::UnboundedSender<SessionEvent>,
    events_rx: mpsc::UnboundedReceiver<SessionEvent>,
    snapshot_tx: watch::Sender<SessionSnapshot>,
    heartbeat_interval: Duration,
    /// Monotonic token guarding against out-of-order metadata responses.
    fetch_token: u64,
    /// Whether the next engine-ready should resume playing (kept across the
    /// nested reload of a mode switch and across auto-advance).
    resume_playing_after_ready: bool,
}

impl SessionController {
    pub fn new(
        config: &PlayerConfig,
        engine: Box<dyn MediaEngine>,
        gateway: Arc<dyn MetadataGateway>,
        prefs: Arc<dyn PreferenceStore>,
    ) -> (Self, SessionHandle) {
        let (events_tx, events_rx) = mpsc::unbounded_channel();
        let (snapshot_tx, snapshot_rx) = watch::channel(SessionSnapshot::empty());

        let controller = Self {
            state: SessionState::new(prefs.as_ref()),
            engine,
            gateway: gateway.clone(),
            prefs,
            reconfigurer: ModeReconfigurer::new(config.resume_grace_secs),
            reporter: ActivityReporter::new(gateway, config.record_history),
            events_tx: events_tx.clone(),
            events_rx,
            snapshot_tx,
            heartbeat_interval: Duration::from_secs(config.heartbeat_interval_secs.max(1)),
            fetch_token: 0,
            resume_playing_after_ready: false,
        };
        let handle = SessionHandle {
            events_tx,
            snapshot_rx,
        };
        (controller, handle)
    }

    /// Drive the session until `Close`. The heartbeat timer lives inside this
    /// loop, so dropping out of it cancels the timer and releases the event
    /// listeners in one motion.
    pub async fn run(mut self) {
        let mut heartbeat = tokio::time::interval(self.heartbeat_interval);
        heartbeat.set_missed_tick_behavior(tokio::time::MissedTickBehavior::Skip);

        loop {
            tokio::select! {
                event = self.events_rx.recv() => {
                    let Some(event) = event else { break };
                    if !self.handle_event(event) {
                        break;
                    }
                }
                _ = heartbeat.tick() => {
                    self.on_heartbeat();
                    self.publish();
                }
            }
        }
    }

    /// Apply one event. Returns `false` once the session has been torn down.
    pub fn handle_event(&mut self, event: SessionEvent) -> bool {
        let keep_running = match event {
            SessionEvent::Command(command) => self.handle_command(command),
            SessionEvent::FetchResolved { token, result } => {
                self.on_fetch_resolved(token, result);
                true
            }
            SessionEvent::Engine(engine_event) => {
                self.on_engine_event(engine_event);
                true
            }
        };
        self.publish();
        keep_running
    }

    pub fn phase(&self) -> PlayerPhase {
        self.state.phase
    }

    pub fn state(&self) -> &SessionState {
        &self.state
    }

    // -- Commands ---------------------------------------------------------

    fn handle_command(&mut self, command: SessionCommand) -> bool {
        match command {
            SessionCommand::Open(item_ref) => self.open(item_ref),
            SessionCommand::TogglePlay => self.toggle_play(),
            SessionCommand::Seek(position) => {
                if matches!(
                    self.state.phase,
                    PlayerPhase::Ready | PlayerPhase::Playing | PlayerPhase::Paused
                ) {
                    self.engine.seek(position);
                    self.state.position_secs = position;
                }
            }
            SessionCommand::SetModifier(modifier, value) => self.set_modifier(modifier, value),
            SessionCommand::SetSkipToggles(toggles) => {
                prefs::persist_skip_toggles(self.prefs.as_ref(), &toggles);
                self.state.skip_toggles = toggles;
            }
            SessionCommand::SetRate(rate) => {
                self.state.playback_rate = rate;
                self.prefs.set(keys::PLAYBACK_RATE, &rate.to_string());
                self.engine.set_rate(rate);
            }
            SessionCommand::SelectContext(kind) => {
                self.state.selected_context = Some(kind);
            }
            SessionCommand::Retry => self.retry(),
            SessionCommand::Close => {
                self.teardown();
                return false;
            }
        }
        true
    }

    fn open(&mut self, item_ref: ItemRef) {
        // Flush progress for the item being replaced before its state goes
        // away.
        if let Some(item) = &self.state.item {
            if matches!(self.state.phase, PlayerPhase::Playing | PlayerPhase::Paused) {
                self.reporter.flush(item.internal_id, self.engine.position_secs());
            }
        }

        self.state.clear_item_state();
        self.reporter.reset();
        self.reconfigurer.reset();
        // A leftover resume intent belongs to the navigation that set it,
        // never to a fresh open.
        self.resume_playing_after_ready = false;
        self.state.current_ref = Some(item_ref.clone());
        self.state.phase = PlayerPhase::Loading;

        self.fetch_token += 1;
        let token = self.fetch_token;
        let gateway = self.gateway.clone();
        let events_tx = self.events_tx.clone();
        info!("opening {}", item_ref);

        tokio::spawn(async move {
            let result = gateway.fetch_item(&item_ref).await;
            let _ = events_tx.send(SessionEvent::FetchResolved { token, result });
        });
    }

    fn toggle_play(&mut self) {
        match self.state.phase {
            PlayerPhase::Ready | PlayerPhase::Paused => {
                self.engine.play();
                self.state.phase = PlayerPhase::Playing;
                self.state.pause_kind = None;
            }
            PlayerPhase::Playing => self.enter_paused(PauseKind::User),
            PlayerPhase::Ended => {
                // Replay from the top.
                self.engine.seek(0.0);
                self.state.position_secs = 0.0;
                self.engine.play();
                self.state.phase = PlayerPhase::Playing;
            }
            _ => {}
        }
    }

    fn enter_paused(&mut self, kind: PauseKind) {
        self.engine.pause();
        self.state.phase = PlayerPhase::Paused;
        self.state.pause_kind = Some(kind);
        if let Some(item) = &self.state.item {
            self.reporter.flush(item.internal_id, self.engine.position_secs());
        }
    }

    fn set_modifier(&mut self, modifier: Modifier, value: bool) {
        self.state.modifiers.set(modifier, value);
        self.state.modifiers.persist(self.prefs.as_ref());

        match modifier {
            // Navigation-time and presentation-only axes never touch the
            // source.
            Modifier::Loop | Modifier::PlayNext | Modifier::Theater => {}
            Modifier::AudioOnly | Modifier::SpoofContentType => match self.state.phase {
                PlayerPhase::Ready | PlayerPhase::Playing | PlayerPhase::Paused => {
                    let was_playing = self.state.phase == PlayerPhase::Playing;
                    match self
                        .reconfigurer
                        .switch_mode(self.engine.as_mut(), &mut self.state)
                    {
                        Ok(true) => {
                            // Nested reload: outer intent survives it.
                            self.resume_playing_after_ready = was_playing;
                            self.state.phase = PlayerPhase::Loading;
                        }
                        Ok(false) => {}
                        Err(err) => self.fail(err),
                    }
                }
                // Remediation path: a mode change while errored re-opens the
                // item under the new modifiers.
                PlayerPhase::Error => self.retry(),
                _ => {}
            },
        }
    }

    fn retry(&mut self) {
        if let Some(item_ref) = self.state.current_ref.clone() {
            self.open(item_ref);
        }
    }

    fn teardown(&mut self) {
        if let Some(item) = &self.state.item {
            // Best-effort final report; the task outlives the session.
            self.reporter.flush(item.internal_id, self.engine.position_secs());
        }
        self.engine.unload();
        self.reconfigurer.reset();
        self.state.clear_item_state();
        self.state.current_ref = None;
        self.state.phase = PlayerPhase::Idle;
        info!("session closed");
    }

    // -- Metadata resolution ----------------------------------------------

    fn on_fetch_resolved(&mut self, token: u64, result: Result<ItemBundle, GatewayError>) {
        if token != self.fetch_token {
            debug!("discarding stale metadata response (token {})", token);
            return;
        }

        match result {
            Ok(bundle) => {
                debug!(
                    "resolved {} with {} contexts",
                    bundle.item.item_ref,
                    bundle.sequence_contexts.len()
                );
                self.state.duration_secs = bundle.item.duration_secs;
                self.state.contexts = bundle.sequence_contexts;

                // Attach the source under the current modifiers; the machine
                // reaches Ready once the engine reports the source loaded.
                let modifiers = self.state.modifiers;
                let attached = self
                    .reconfigurer
                    .attach_initial(self.engine.as_mut(), &bundle.item, &modifiers);
                self.state.item = Some(bundle.item);
                if let Err(err) = attached {
                    self.fail(err);
                }
            }
            Err(err) => self.fail(SessionError::MetadataFetch(err)),
        }
    }

    // -- Engine lifecycle --------------------------------------------------

    fn on_engine_event(&mut self, event: EngineEvent) {
        match event {
            EngineEvent::Ready { duration_secs } => self.on_ready(duration_secs),
            EngineEvent::Tick { position_secs } => self.on_tick(position_secs),
            EngineEvent::SystemPaused => {
                if self.state.phase == PlayerPhase::Playing {
                    self.enter_paused(PauseKind::System);
                }
            }
            EngineEvent::Ended => {
                if self.state.phase == PlayerPhase::Playing {
                    self.on_ended();
                }
            }
            EngineEvent::Failed { message } => {
                warn!("engine failure: {}", message);
                self.fail(SessionError::Decode(message));
            }
        }
    }

    fn on_ready(&mut self, duration_secs: Seconds) {
        // Ready is only meaningful while a source attach is in flight; a
        // stray notification in any other phase is not a transition.
        if self.state.phase != PlayerPhase::Loading {
            return;
        }
        if duration_secs > 0.0 {
            self.state.duration_secs = duration_secs;
        }

        // Preserved position (mode switch in flight) wins over the catalog's
        // resume offset; the pending value is consumed either way.
        let target = self.reconfigurer.resume_target(&mut self.state);
        if target > 0.0 {
            self.engine.seek(target);
        }
        self.state.position_secs = target;
        self.engine.set_rate(self.state.playback_rate);

        if self.resume_playing_after_ready {
            self.resume_playing_after_ready = false;
            self.engine.play();
            self.state.phase = PlayerPhase::Playing;
        } else {
            self.state.phase = PlayerPhase::Ready;
        }
    }

    fn on_tick(&mut self, position_secs: Seconds) {
        if self.state.phase != PlayerPhase::Playing {
            return;
        }
        self.state.position_secs = position_secs;

        let Some(item) = &self.state.item else { return };
        if let Some(target) = skip::evaluate(
            position_secs,
            self.state.duration_secs,
            &item.sponsor_segments,
            &self.state.skip_toggles,
        ) {
            debug!("segment skip: {:.1}s -> {:.1}s", position_secs, target);
            self.engine.seek(target);
            self.state.position_secs = target;
        }
    }

    fn on_ended(&mut self) {
        self.state.phase = PlayerPhase::Ended;

        // Report the full duration so the catalog can mark the item watched.
        if let Some(item) = &self.state.item {
            self.reporter.flush(item.internal_id, self.state.duration_secs);
        }

        let Some(current) = self.state.current_ref.clone() else {
            return;
        };
        let action = navigate::on_ended(
            &self.state.modifiers,
            navigate::active_context(&self.state.contexts, self.state.selected_context),
            &current,
        );

        match action {
            EndAction::Restart => {
                self.engine.seek(0.0);
                self.state.position_secs = 0.0;
                self.engine.play();
                self.state.phase = PlayerPhase::Playing;
            }
            EndAction::Advance(next) => {
                debug!("advancing {} -> {}", current, next);
                // After open(), which clears any stale resume intent.
                self.open(next);
                self.resume_playing_after_ready = true;
            }
            EndAction::Stop => {}
        }
    }

    // -- Periodic work -----------------------------------------------------

    fn on_heartbeat(&mut self) {
        if self.state.phase != PlayerPhase::Playing {
            return;
        }
        if let Some(item) = &self.state.item {
            // Sample the clock at the moment of the report.
            self.reporter.heartbeat(item.internal_id, self.engine.position_secs());
        }
    }

    // -- Shared tail -------------------------------------------------------

    fn fail(&mut self, err: SessionError) {
        warn!("session error: {} ({})", err, err.remediation());
        // A failed attach or mode switch must not leave a stale preserved
        // position or resume intent behind.
        self.state.pending_preserved_position = None;
        self.resume_playing_after_ready = false;
        self.state.phase = PlayerPhase::Error;
        self.state.last_error = Some(err);
    }

    fn publish(&self) {
        let marks = match &self.state.item {
            Some(item) => overlay::overlay_marks(item, &self.state.skip_toggles),
            None => Vec::new(),
        };
        let snapshot = SessionSnapshot {
            phase: self.state.phase,
            item: self.state.current_ref.clone(),
            position_secs: self.state.position_secs,
            duration_secs: self.state.duration_secs,
            modifiers: self.state.modifiers,
            marks,
            error: self.state.last_error.as_ref().map(|e| e.to_string()),
            remediation: self.state.last_error.as_ref().map(|e| e.remediation()),
        };
        let _ = self.snapshot_tx.send(snapshot);
    }
}
