use thiserror::Error;

/// Fatal playback errors. Any of these puts the session into the `Error`
/// phase; recovery is an explicit user action (retry or a mode change).
#[derive(Debug, Error)]
pub enum SessionError {
    /// The catalog could not deliver the item descriptor.
    #[error("metadata fetch failed: {0}")]
    MetadataFetch(#[from] GatewayError),

    /// The engine could not decode or keep playing the attached source.
    #[error("playback failed: {0}")]
    Decode(String),

    /// Audio-only delivery is disabled server-side for this item.
    #[error("audio-only stream is unavailable for this item")]
    AudioOnlyUnavailable,
}

impl SessionError {
    /// Short remediation hint rendered next to the error message.
    pub fn remediation(&self) -> &'static str {
        match self {
            Self::MetadataFetch(_) => "retry loading the item",
            Self::Decode(_) => {
                "toggle content-type spoofing or open the file externally"
            }
            Self::AudioOnlyUnavailable => "disable audio-only mode",
        }
    }
}

/// Transport-level failures talking to the catalog service.
#[derive(Debug, Error)]
pub enum GatewayError {
    #[error("request failed: {0}")]
    Http(#[from] reqwest::Error),

    /// Non-2xx response from the catalog.
    #[error("catalog responded with status {0}")]
    Status(u16),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_remediation_hints_differ_per_variant() {
        let fetch = SessionError::MetadataFetch(GatewayError::Status(502));
        let decode = SessionError::Decode("bad container".into());
        let audio = SessionError::AudioOnlyUnavailable;

        assert_ne!(fetch.remediation(), decode.remediation());
        assert_ne!(decode.remediation(), audio.remediation());
    }

    #[test]
    fn test_status_error_message_carries_code() {
        let err = GatewayError::Status(503);
        assert!(err.to_string().contains("503"));
    }
}
