use serde::{Deserialize, Serialize};

#[derive(Debug, Deserialize, Serialize, Clone, Default)]
pub struct LoggingConfig {
    /// Base log level (`trace`..`error`). Defaults to `info`.
    pub level: Option<String>,
    /// Extra per-target filter directives appended to the base level.
    pub filters: Option<String>,
}
