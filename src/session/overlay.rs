use crate::common::types::Seconds;
use crate::protocol::{MediaItem, SegmentCategory, SkipToggles};

/// A band or boundary the embedder draws on the progress bar.
#[derive(Debug, Clone, PartialEq)]
pub enum OverlayMark {
    /// Tagged segment band; `active` when its category is currently skipped.
    SegmentBand {
        category: SegmentCategory,
        start_sec: Seconds,
        end_sec: Seconds,
        active: bool,
    },
    /// Chapter boundary with its title.
    ChapterStart { title: String, start_sec: Seconds },
}

/// Derive the overlay marks for one item under the current toggles.
pub fn overlay_marks(item: &MediaItem, toggles: &SkipToggles) -> Vec<OverlayMark> {
    let mut marks = Vec::with_capacity(item.sponsor_segments.len() + item.chapters.len());

    for segment in &item.sponsor_segments {
        marks.push(OverlayMark::SegmentBand {
            category: segment.category,
            start_sec: segment.start_sec,
            end_sec: segment.end_sec,
            active: toggles.is_enabled(segment.category),
        });
    }
    for chapter in &item.chapters {
        marks.push(OverlayMark::ChapterStart {
            title: chapter.title.clone(),
            start_sec: chapter.start_sec,
        });
    }

    marks
}
