//! Playback session controller for a self-hosted video catalog.
//!
//! The crate drives one media engine through the lifecycle of watching
//! downloaded items: it resolves item metadata from the catalog, attaches the
//! right source variant for the active playback mode, skips tagged sponsor
//! segments, auto-advances through uploader/playlist/job sequences and
//! reports watch progress back to the catalog.
//!
//! The embedder supplies two things: a [`engine::MediaEngine`] wrapping the
//! actual player, and a task forwarding its lifecycle notifications into the
//! [`session::SessionHandle`]. Everything else is owned by the
//! [`session::SessionController`] event loop.

pub mod common;
pub mod configs;
pub mod engine;
pub mod gateway;
pub mod prefs;
pub mod protocol;
pub mod session;

pub use common::errors::{GatewayError, SessionError};
pub use common::types::Seconds;
pub use configs::Config;
pub use engine::{EngineEvent, MediaEngine, SourceDescriptor, SourceKind};
pub use gateway::{HttpMetadataGateway, ItemBundle, MetadataGateway};
pub use prefs::{FilePreferenceStore, MemoryPreferenceStore, PreferenceStore};
pub use session::{
    SessionCommand, SessionController, SessionHandle, SessionSnapshot, SessionState,
};
