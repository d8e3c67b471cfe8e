use crate::protocol::{ItemRef, SequenceContext, SequenceKind};
use crate::session::state::PlaybackModifiers;

/// What the session should do once the clock reports the item finished.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EndAction {
    /// Restart the current item at zero.
    Restart,
    /// Stay in `Ended`; nothing to do.
    Stop,
    /// Open this item next.
    Advance(ItemRef),
}

/// Entry following `current` in the context, or `None` when `current` is
/// absent or last.
pub fn next_after<'a>(context: &'a SequenceContext, current: &ItemRef) -> Option<&'a ItemRef> {
    let idx = context.position_of(current)?;
    context.items.get(idx + 1)
}

pub fn first_item(context: &SequenceContext) -> Option<&ItemRef> {
    context.items.first()
}

/// Pick the context that drives auto-advance: the viewer-selected tab when it
/// is non-empty, else the first non-empty one.
pub fn active_context<'a>(
    contexts: &'a [SequenceContext],
    selected: Option<SequenceKind>,
) -> Option<&'a SequenceContext> {
    if let Some(kind) = selected {
        if let Some(ctx) = contexts.iter().find(|c| c.kind == kind && !c.is_empty()) {
            return Some(ctx);
        }
    }
    contexts.iter().find(|c| !c.is_empty())
}

/// The end-of-item decision table.
pub fn on_ended(
    modifiers: &PlaybackModifiers,
    context: Option<&SequenceContext>,
    current: &ItemRef,
) -> EndAction {
    if modifiers.loop_playback {
        return EndAction::Restart;
    }
    if !modifiers.play_next {
        return EndAction::Stop;
    }
    let Some(context) = context else {
        return EndAction::Stop;
    };
    if let Some(next) = next_after(context, current) {
        return EndAction::Advance(next.clone());
    }
    match first_item(context) {
        // Singleton context: wrapping around to ourselves is a restart, not a
        // pointless re-open.
        Some(first) if first == current => EndAction::Restart,
        Some(first) => EndAction::Advance(first.clone()),
        None => EndAction::Stop,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn item(id: &str) -> ItemRef {
        ItemRef::new("youtube", id)
    }

    fn context(kind: SequenceKind, ids: &[&str]) -> SequenceContext {
        SequenceContext {
            kind,
            items: ids.iter().map(|id| item(id)).collect(),
        }
    }

    fn modifiers(loop_playback: bool, play_next: bool) -> PlaybackModifiers {
        PlaybackModifiers {
            loop_playback,
            play_next,
            ..Default::default()
        }
    }

    #[test]
    fn test_loop_restarts_without_navigation() {
        let ctx = context(SequenceKind::Playlist, &["a", "b", "c"]);
        let action = on_ended(&modifiers(true, true), Some(&ctx), &item("a"));
        assert_eq!(action, EndAction::Restart);
    }

    #[test]
    fn test_no_play_next_stops() {
        let ctx = context(SequenceKind::Playlist, &["a", "b"]);
        let action = on_ended(&modifiers(false, false), Some(&ctx), &item("a"));
        assert_eq!(action, EndAction::Stop);
    }

    #[test]
    fn test_play_next_advances_to_following_item() {
        let ctx = context(SequenceKind::Playlist, &["a", "b", "c"]);
        let action = on_ended(&modifiers(false, true), Some(&ctx), &item("b"));
        assert_eq!(action, EndAction::Advance(item("c")));
    }

    #[test]
    fn test_singleton_context_restarts_instead_of_self_open() {
        let ctx = context(SequenceKind::Uploader, &["a"]);
        let action = on_ended(&modifiers(false, true), Some(&ctx), &item("a"));
        assert_eq!(action, EndAction::Restart);
    }

    #[test]
    fn test_last_item_wraps_around_to_first() {
        let ctx = context(SequenceKind::Playlist, &["a", "b", "c"]);
        let action = on_ended(&modifiers(false, true), Some(&ctx), &item("c"));
        assert_eq!(action, EndAction::Advance(item("a")));
    }

    #[test]
    fn test_current_not_in_list_falls_back_to_first() {
        let ctx = context(SequenceKind::Playlist, &["a", "b"]);
        let action = on_ended(&modifiers(false, true), Some(&ctx), &item("zzz"));
        assert_eq!(action, EndAction::Advance(item("a")));
    }

    #[test]
    fn test_empty_or_missing_context_stops() {
        let empty = context(SequenceKind::Job, &[]);
        assert_eq!(
            on_ended(&modifiers(false, true), Some(&empty), &item("a")),
            EndAction::Stop
        );
        assert_eq!(
            on_ended(&modifiers(false, true), None, &item("a")),
            EndAction::Stop
        );
    }

    #[test]
    fn test_next_after_is_deterministic() {
        let ctx = context(SequenceKind::Playlist, &["a", "b", "c"]);
        let first = next_after(&ctx, &item("a")).cloned();
        let second = next_after(&ctx, &item("a")).cloned();
        assert_eq!(first, second);
        assert_eq!(first, Some(item("b")));
    }

    #[test]
    fn test_active_context_prefers_selected_tab() {
        let contexts = vec![
            context(SequenceKind::Uploader, &["a", "b"]),
            context(SequenceKind::Playlist, &["c", "d"]),
        ];

        let picked = active_context(&contexts, Some(SequenceKind::Playlist)).unwrap();
        assert_eq!(picked.kind, SequenceKind::Playlist);
    }

    #[test]
    fn test_active_context_falls_back_to_first_non_empty() {
        let contexts = vec![
            context(SequenceKind::Uploader, &[]),
            context(SequenceKind::Playlist, &["c"]),
        ];

        // Selected tab is empty: fall through.
        let picked = active_context(&contexts, Some(SequenceKind::Uploader)).unwrap();
        assert_eq!(picked.kind, SequenceKind::Playlist);
        // No selection at all.
        let picked = active_context(&contexts, None).unwrap();
        assert_eq!(picked.kind, SequenceKind::Playlist);
    }
}
