use serde::{Deserialize, Serialize};

use crate::common::types::Seconds;
use crate::protocol::segments::SponsorSegment;

/// Identity of one catalog item: the extractor that produced it plus the
/// extractor-scoped id.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ItemRef {
    pub extractor: String,
    pub id: String,
}

impl ItemRef {
    pub fn new(extractor: impl Into<String>, id: impl Into<String>) -> Self {
        Self {
            extractor: extractor.into(),
            id: id.into(),
        }
    }
}

impl std::fmt::Display for ItemRef {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}:{}", self.extractor, self.id)
    }
}

/// Source URLs for one item, one per delivery mode.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SourceVariants {
    /// Muxed audio+video stream.
    pub full: String,
    /// Server-transcoded audio-only stream, when the catalog offers one.
    #[serde(default)]
    pub audio_only: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SubtitleTrack {
    pub lang: String,
    pub url: String,
    #[serde(default)]
    pub name: Option<String>,
}

/// Chapter marks. Overlay rendering only, never skip logic.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Chapter {
    pub title: String,
    pub start_sec: Seconds,
    pub end_sec: Seconds,
}

/// Full descriptor of one catalog item.
///
/// Immutable once fetched; the session replaces it wholesale when it
/// navigates to a different item.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MediaItem {
    /// Catalog database id, used by activity reports.
    pub internal_id: i64,
    pub item_ref: ItemRef,
    pub title: String,
    #[serde(default)]
    pub uploader: Option<String>,
    pub duration_secs: Seconds,
    pub sources: SourceVariants,
    #[serde(default)]
    pub subtitle_tracks: Vec<SubtitleTrack>,
    #[serde(default)]
    pub chapters: Vec<Chapter>,
    /// Sorted by start; overlaps are possible. Read-only once attached.
    #[serde(default)]
    pub sponsor_segments: Vec<SponsorSegment>,
    /// Last persisted watch position, when the viewer has one.
    #[serde(default)]
    pub resume_offset_secs: Option<Seconds>,
    /// Server flag: audio-only delivery disabled for this item.
    #[serde(default)]
    pub audio_only_disabled: bool,
    #[serde(default = "default_true")]
    pub local_source_available: bool,
}

fn default_true() -> bool {
    true
}
