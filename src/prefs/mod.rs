use crate::protocol::{SegmentCategory, SkipToggles};

pub mod file;

pub use file::FilePreferenceStore;

/// Small synchronous key/value store for user playback preferences.
///
/// The original UI read these from scattered browser-storage calls; every
/// read and write now goes through this one seam.
pub trait PreferenceStore: Send + Sync {
    fn get(&self, key: &str) -> Option<String>;
    fn set(&self, key: &str, value: &str);
}

/// Well-known preference keys.
pub mod keys {
    pub const LOOP: &str = "player.loop";
    pub const PLAY_NEXT: &str = "player.playNext";
    pub const SPOOF_CONTENT_TYPE: &str = "player.spoofContentType";
    pub const AUDIO_ONLY: &str = "player.audioOnly";
    pub const THEATER: &str = "player.theater";
    pub const PLAYBACK_RATE: &str = "player.rate";
    pub const ONLY_SKIP_LOCKED: &str = "skip.onlyLocked";
    /// Per-category skip flags: `skip.category.<name>`.
    pub const SKIP_CATEGORY_PREFIX: &str = "skip.category.";
}

pub fn get_bool(store: &dyn PreferenceStore, key: &str, default: bool) -> bool {
    store.get(key).map(|v| v == "true").unwrap_or(default)
}

pub fn set_bool(store: &dyn PreferenceStore, key: &str, value: bool) {
    store.set(key, if value { "true" } else { "false" });
}

pub fn load_skip_toggles(store: &dyn PreferenceStore) -> SkipToggles {
    let mut toggles = SkipToggles::default();
    for category in SegmentCategory::ALL {
        let key = format!("{}{}", keys::SKIP_CATEGORY_PREFIX, category.as_str());
        if get_bool(store, &key, false) {
            toggles.enable(category);
        }
    }
    toggles.only_skip_locked = get_bool(store, keys::ONLY_SKIP_LOCKED, false);
    toggles
}

pub fn persist_skip_toggles(store: &dyn PreferenceStore, toggles: &SkipToggles) {
    for category in SegmentCategory::ALL {
        let key = format!("{}{}", keys::SKIP_CATEGORY_PREFIX, category.as_str());
        set_bool(store, &key, toggles.is_enabled(category));
    }
    set_bool(store, keys::ONLY_SKIP_LOCKED, toggles.only_skip_locked);
}

/// Volatile store, used as the default when no backing file is wanted and by
/// tests.
#[derive(Default)]
pub struct MemoryPreferenceStore {
    values: parking_lot::Mutex<std::collections::HashMap<String, String>>,
}

impl PreferenceStore for MemoryPreferenceStore {
    fn get(&self, key: &str) -> Option<String> {
        self.values.lock().get(key).cloned()
    }

    fn set(&self, key: &str, value: &str) {
        self.values.lock().insert(key.to_string(), value.to_string());
    }
}
