use serde::{Deserialize, Serialize};

use crate::protocol::items::ItemRef;

/// Which sibling ordering a context represents.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum SequenceKind {
    Uploader,
    Playlist,
    Job,
}

/// One ordered view of the active item's siblings.
///
/// The current index is derived by identity lookup each time it is needed;
/// the list can be refetched underneath us, so caching an index would go
/// stale.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SequenceContext {
    pub kind: SequenceKind,
    pub items: Vec<ItemRef>,
}

impl SequenceContext {
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn position_of(&self, item: &ItemRef) -> Option<usize> {
        self.items.iter().position(|r| r == item)
    }
}
