use crate::common::errors::SessionError;
use crate::common::types::Seconds;
use crate::prefs::{self, PreferenceStore, keys};
use crate::protocol::{ItemRef, MediaItem, SequenceContext, SequenceKind, SkipToggles};

/// Where the session currently is in the item's lifecycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PlayerPhase {
    Idle,
    Loading,
    Ready,
    Playing,
    Paused,
    Ended,
    Error,
}

/// The five independently toggleable playback axes. Each change is persisted
/// immediately.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct PlaybackModifiers {
    pub loop_playback: bool,
    pub play_next: bool,
    pub spoof_content_type: bool,
    pub audio_only: bool,
    pub theater: bool,
}

/// Names one modifier axis for the `SetModifier` command.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Modifier {
    Loop,
    PlayNext,
    SpoofContentType,
    AudioOnly,
    Theater,
}

impl PlaybackModifiers {
    pub fn load(store: &dyn PreferenceStore) -> Self {
        Self {
            loop_playback: prefs::get_bool(store, keys::LOOP, false),
            play_next: prefs::get_bool(store, keys::PLAY_NEXT, false),
            spoof_content_type: prefs::get_bool(store, keys::SPOOF_CONTENT_TYPE, false),
            audio_only: prefs::get_bool(store, keys::AUDIO_ONLY, false),
            theater: prefs::get_bool(store, keys::THEATER, false),
        }
    }

    pub fn persist(&self, store: &dyn PreferenceStore) {
        prefs::set_bool(store, keys::LOOP, self.loop_playback);
        prefs::set_bool(store, keys::PLAY_NEXT, self.play_next);
        prefs::set_bool(store, keys::SPOOF_CONTENT_TYPE, self.spoof_content_type);
        prefs::set_bool(store, keys::AUDIO_ONLY, self.audio_only);
        prefs::set_bool(store, keys::THEATER, self.theater);
    }

    pub fn set(&mut self, modifier: Modifier, value: bool) {
        match modifier {
            Modifier::Loop => self.loop_playback = value,
            Modifier::PlayNext => self.play_next = value,
            Modifier::SpoofContentType => self.spoof_content_type = value,
            Modifier::AudioOnly => self.audio_only = value,
            Modifier::Theater => self.theater = value,
        }
    }
}

/// Why the session is paused.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PauseKind {
    /// The viewer paused on purpose.
    User,
    /// The environment paused us (tab hidden, device sleep). The embedder may
    /// auto-resume these; the machine itself never does.
    System,
}

/// All mutable state owned by the controller. Mutated only from the session's
/// event queue, so no locking is needed.
#[derive(Debug)]
pub struct SessionState {
    pub phase: PlayerPhase,
    /// Identity of the item being shown or loaded.
    pub current_ref: Option<ItemRef>,
    pub item: Option<MediaItem>,
    pub contexts: Vec<SequenceContext>,
    /// Sequence tab the viewer picked, if any.
    pub selected_context: Option<SequenceKind>,
    pub modifiers: PlaybackModifiers,
    pub skip_toggles: SkipToggles,
    pub playback_rate: f64,
    pub position_secs: Seconds,
    pub duration_secs: Seconds,
    /// Set only while a mode switch is in flight; cleared unconditionally
    /// once the next source reports ready, success or not.
    pub pending_preserved_position: Option<Seconds>,
    pub pause_kind: Option<PauseKind>,
    pub last_error: Option<SessionError>,
}

impl SessionState {
    pub fn new(store: &dyn PreferenceStore) -> Self {
        let playback_rate = store
            .get(keys::PLAYBACK_RATE)
            .and_then(|v| v.parse().ok())
            .unwrap_or(1.0);

        Self {
            phase: PlayerPhase::Idle,
            current_ref: None,
            item: None,
            contexts: Vec::new(),
            selected_context: None,
            modifiers: PlaybackModifiers::load(store),
            skip_toggles: prefs::load_skip_toggles(store),
            playback_rate,
            position_secs: 0.0,
            duration_secs: 0.0,
            pending_preserved_position: None,
            pause_kind: None,
            last_error: None,
        }
    }

    /// Drop everything tied to the old item when the session switches. The
    /// modifiers and skip toggles are the viewer's, not the item's, and stay.
    pub fn clear_item_state(&mut self) {
        self.item = None;
        self.contexts.clear();
        self.position_secs = 0.0;
        self.duration_secs = 0.0;
        self.pending_preserved_position = None;
        self.pause_kind = None;
        self.last_error = None;
    }
}
