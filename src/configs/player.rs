use serde::{Deserialize, Serialize};

#[derive(Debug, Deserialize, Serialize, Clone)]
pub struct PlayerConfig {
    /// Seconds between positional heartbeats while playing.
    #[serde(default = "default_heartbeat_interval_secs")]
    pub heartbeat_interval_secs: u64,
    /// Compensation subtracted when restoring a preserved position after a
    /// source rebuild. Offsets duration-estimation drift in the audio-only
    /// transcode path; tune per transcoder.
    #[serde(default = "default_resume_grace_secs")]
    pub resume_grace_secs: f64,
    /// Whether positional heartbeats are persisted to the catalog at all.
    #[serde(default = "default_record_history")]
    pub record_history: bool,
}

impl Default for PlayerConfig {
    fn default() -> Self {
        Self {
            heartbeat_interval_secs: default_heartbeat_interval_secs(),
            resume_grace_secs: default_resume_grace_secs(),
            record_history: default_record_history(),
        }
    }
}

fn default_heartbeat_interval_secs() -> u64 {
    10
}

fn default_resume_grace_secs() -> f64 {
    1.0
}

fn default_record_history() -> bool {
    true
}
