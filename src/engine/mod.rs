use crate::common::types::Seconds;

/// Delivery mode of an attached source.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SourceKind {
    Full,
    AudioOnly,
}

/// Everything the engine needs to (re)configure playback in place.
#[derive(Debug, Clone, PartialEq)]
pub struct SourceDescriptor {
    pub url: String,
    pub kind: SourceKind,
    /// Serve the stream under a generic content type to get past strict
    /// container sniffing in the underlying player.
    pub spoof_content_type: bool,
}

/// Lifecycle notifications the embedder forwards from the real player into
/// the session's event queue.
#[derive(Debug, Clone)]
pub enum EngineEvent {
    /// The attached source finished loading; the duration is now known.
    Ready { duration_secs: Seconds },
    /// The media clock advanced.
    Tick { position_secs: Seconds },
    /// The engine paused without a user action (e.g. tab hidden).
    SystemPaused,
    /// Natural end of the media.
    Ended,
    /// Decode or network failure inside the engine.
    Failed { message: String },
}

/// Handle over the single underlying media engine instance.
///
/// One engine exists per session. It is reconfigured in place via `load` for
/// item and mode changes, and released only at teardown via `unload` — never
/// duplicated.
pub trait MediaEngine: Send {
    fn load(&mut self, source: &SourceDescriptor);
    fn play(&mut self);
    fn pause(&mut self);
    fn seek(&mut self, position_secs: Seconds);
    fn set_rate(&mut self, rate: f64);
    fn position_secs(&self) -> Seconds;
    /// Release the media resource at session teardown.
    fn unload(&mut self);
}
