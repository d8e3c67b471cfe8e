use tracing::debug;

use crate::common::errors::SessionError;
use crate::common::types::Seconds;
use crate::engine::{MediaEngine, SourceDescriptor, SourceKind};
use crate::protocol::MediaItem;
use crate::session::state::{PlaybackModifiers, SessionState};

/// Builds source descriptors and swaps them on the engine without losing the
/// viewer's position.
pub struct ModeReconfigurer {
    grace_secs: Seconds,
    /// Descriptor currently attached to the engine, if any.
    current: Option<SourceDescriptor>,
}

impl ModeReconfigurer {
    pub fn new(grace_secs: Seconds) -> Self {
        Self {
            grace_secs,
            current: None,
        }
    }

    /// Descriptor for `item` under `modifiers`.
    pub fn build_source(
        &self,
        item: &MediaItem,
        modifiers: &PlaybackModifiers,
    ) -> Result<SourceDescriptor, SessionError> {
        let (url, kind) = if modifiers.audio_only {
            if item.audio_only_disabled {
                return Err(SessionError::AudioOnlyUnavailable);
            }
            match &item.sources.audio_only {
                Some(url) => (url.clone(), SourceKind::AudioOnly),
                None => return Err(SessionError::AudioOnlyUnavailable),
            }
        } else {
            (item.sources.full.clone(), SourceKind::Full)
        };

        Ok(SourceDescriptor {
            url,
            kind,
            spoof_content_type: modifiers.spoof_content_type,
        })
    }

    /// First attach for a freshly fetched item.
    pub fn attach_initial(
        &mut self,
        engine: &mut dyn MediaEngine,
        item: &MediaItem,
        modifiers: &PlaybackModifiers,
    ) -> Result<(), SessionError> {
        let source = self.build_source(item, modifiers)?;
        engine.load(&source);
        self.current = Some(source);
        Ok(())
    }

    /// Swap the source for new modifiers, preserving the position.
    ///
    /// Idempotent: when the target descriptor equals the attached one there
    /// is no rebuild and no position capture, so the grace offset can never
    /// apply twice. Returns whether a rebuild actually happened.
    pub fn switch_mode(
        &mut self,
        engine: &mut dyn MediaEngine,
        state: &mut SessionState,
    ) -> Result<bool, SessionError> {
        let Some(item) = state.item.as_ref() else {
            return Ok(false);
        };
        let source = self.build_source(item, &state.modifiers)?;

        if self.current.as_ref() == Some(&source) {
            debug!("mode switch is a no-op, source unchanged");
            return Ok(false);
        }

        state.pending_preserved_position = Some(engine.position_secs());
        debug!(
            "rebuilding source at position {:.1}s: {:?}",
            state.pending_preserved_position.unwrap_or(0.0),
            source.kind
        );
        engine.load(&source);
        self.current = Some(source);
        Ok(true)
    }

    /// Where the clock should land once a new source reports ready.
    ///
    /// Consumes the preserved position unconditionally. The grace compensates
    /// for duration-estimation drift in the transcoded path and applies only
    /// to preserved positions, never to plain resume offsets.
    pub fn resume_target(&self, state: &mut SessionState) -> Seconds {
        match state.pending_preserved_position.take() {
            Some(preserved) => (preserved - self.grace_secs).max(0.0),
            None => state
                .item
                .as_ref()
                .and_then(|i| i.resume_offset_secs)
                .unwrap_or(0.0),
        }
    }

    /// Forget the attached source (item switch or teardown).
    pub fn reset(&mut self) {
        self.current = None;
    }
}
