use crate::common::types::Seconds;
use crate::protocol::{SkipToggles, SponsorSegment};

/// Decide whether the clock should jump forward out of one or more tagged
/// segments.
///
/// Returns the seek target, or `None` when playback should continue. Pure:
/// the caller performs the actual seek. When several matched segments
/// overlap, the largest end wins, so a single jump clears them all instead of
/// re-triggering on every tick.
pub fn evaluate(
    current_secs: Seconds,
    duration_secs: Seconds,
    segments: &[SponsorSegment],
    toggles: &SkipToggles,
) -> Option<Seconds> {
    // Never evaluate in the final second: an outro abutting the end of the
    // media would otherwise re-trigger a jump loop forever.
    if current_secs.ceil() >= duration_secs.ceil() {
        return None;
    }

    let mut target: Option<Seconds> = None;
    for segment in segments {
        if !toggles.is_enabled(segment.category) {
            continue;
        }
        if toggles.only_skip_locked && !segment.locked.unwrap_or(false) {
            continue;
        }
        if segment.start_sec <= current_secs && current_secs < segment.end_sec {
            target = Some(match target {
                Some(t) => t.max(segment.end_sec),
                None => segment.end_sec,
            });
        }
    }

    // Malformed data guard: never hand back a non-forward target.
    target.filter(|t| *t > current_secs)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::protocol::SegmentCategory;

    fn segment(
        category: SegmentCategory,
        start: f64,
        end: f64,
        locked: Option<bool>,
    ) -> SponsorSegment {
        SponsorSegment {
            category,
            start_sec: start,
            end_sec: end,
            locked,
        }
    }

    fn toggles(categories: &[SegmentCategory], only_locked: bool) -> SkipToggles {
        let mut t = SkipToggles::default();
        for c in categories {
            t.enable(*c);
        }
        t.only_skip_locked = only_locked;
        t
    }

    #[test]
    fn test_locked_sponsor_skips_to_segment_end() {
        let segments = [segment(SegmentCategory::Sponsor, 0.0, 30.0, Some(true))];
        let t = toggles(&[SegmentCategory::Sponsor], true);

        assert_eq!(evaluate(10.0, 300.0, &segments, &t), Some(30.0));
    }

    #[test]
    fn test_overlapping_matches_jump_to_max_end() {
        let segments = [
            segment(SegmentCategory::Sponsor, 0.0, 30.0, None),
            segment(SegmentCategory::Selfpromo, 20.0, 50.0, None),
        ];
        let t = toggles(&[SegmentCategory::Sponsor, SegmentCategory::Selfpromo], false);

        assert_eq!(evaluate(25.0, 300.0, &segments, &t), Some(50.0));
    }

    #[test]
    fn test_unlocked_segment_ignored_when_only_locked() {
        let segments = [segment(SegmentCategory::Sponsor, 0.0, 30.0, None)];
        let t = toggles(&[SegmentCategory::Sponsor], true);

        assert_eq!(evaluate(10.0, 300.0, &segments, &t), None);
    }

    #[test]
    fn test_disabled_category_never_matches() {
        let segments = [segment(SegmentCategory::Intro, 0.0, 10.0, Some(true))];
        let t = toggles(&[SegmentCategory::Sponsor], false);

        assert_eq!(evaluate(5.0, 300.0, &segments, &t), None);
    }

    #[test]
    fn test_no_evaluation_in_final_second() {
        // Outro abutting the end of the media: without the ceil guard this
        // would jump in place forever.
        let segments = [segment(SegmentCategory::Outro, 290.0, 300.0, Some(true))];
        let t = toggles(&[SegmentCategory::Outro], false);

        assert_eq!(evaluate(299.5, 300.0, &segments, &t), None);
        // Further from the end, the same segment still skips.
        assert_eq!(evaluate(295.0, 300.0, &segments, &t), Some(300.0));
    }

    #[test]
    fn test_time_past_segment_end_is_not_a_match() {
        let segments = [segment(SegmentCategory::Sponsor, 0.0, 30.0, None)];
        let t = toggles(&[SegmentCategory::Sponsor], false);

        assert_eq!(evaluate(30.0, 300.0, &segments, &t), None);
    }

    #[test]
    fn test_malformed_segment_never_yields_backward_target() {
        // end <= start should never produce a jump.
        let segments = [segment(SegmentCategory::Sponsor, 40.0, 40.0, None)];
        let t = toggles(&[SegmentCategory::Sponsor], false);

        assert_eq!(evaluate(40.0, 300.0, &segments, &t), None);
    }

    #[test]
    fn test_target_is_always_forward() {
        // Sweep a grid of positions against a messy segment list and assert
        // the no-backward-skip property.
        let segments = [
            segment(SegmentCategory::Sponsor, 0.0, 30.0, Some(true)),
            segment(SegmentCategory::Intro, 10.0, 12.0, None),
            segment(SegmentCategory::Filler, 25.0, 25.0, None),
            segment(SegmentCategory::Outro, 290.0, 300.0, Some(false)),
        ];
        let t = toggles(&SegmentCategory::ALL, false);

        let mut pos = 0.0;
        while pos < 300.0 {
            if let Some(target) = evaluate(pos, 300.0, &segments, &t) {
                assert!(target > pos, "backward skip at position {}", pos);
            }
            pos += 0.25;
        }
    }
}
