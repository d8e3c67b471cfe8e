use std::collections::HashSet;

use serde::{Deserialize, Serialize};

use crate::common::types::Seconds;

/// Community-tagged segment categories eligible for automatic skipping.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SegmentCategory {
    Sponsor,
    Selfpromo,
    Interaction,
    Intro,
    Outro,
    Preview,
    Filler,
    MusicOfftopic,
}

impl SegmentCategory {
    pub const ALL: [SegmentCategory; 8] = [
        Self::Sponsor,
        Self::Selfpromo,
        Self::Interaction,
        Self::Intro,
        Self::Outro,
        Self::Preview,
        Self::Filler,
        Self::MusicOfftopic,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Sponsor => "sponsor",
            Self::Selfpromo => "selfpromo",
            Self::Interaction => "interaction",
            Self::Intro => "intro",
            Self::Outro => "outro",
            Self::Preview => "preview",
            Self::Filler => "filler",
            Self::MusicOfftopic => "music_offtopic",
        }
    }
}

/// One tagged time range in an item.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SponsorSegment {
    pub category: SegmentCategory,
    pub start_sec: Seconds,
    pub end_sec: Seconds,
    /// Community-verified flag; `None` when the provider did not say.
    #[serde(default)]
    pub locked: Option<bool>,
}

/// Which categories the viewer skips, and whether only verified segments
/// count.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SkipToggles {
    #[serde(default)]
    pub enabled: HashSet<SegmentCategory>,
    #[serde(default)]
    pub only_skip_locked: bool,
}

impl SkipToggles {
    pub fn is_enabled(&self, category: SegmentCategory) -> bool {
        self.enabled.contains(&category)
    }

    pub fn enable(&mut self, category: SegmentCategory) {
        self.enabled.insert(category);
    }

    pub fn disable(&mut self, category: SegmentCategory) {
        self.enabled.remove(&category);
    }
}
