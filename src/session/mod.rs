pub mod controller;
pub mod navigate;
pub mod overlay;
pub mod reconfigure;
pub mod report;
pub mod skip;
pub mod state;

pub use controller::{SessionCommand, SessionController, SessionEvent, SessionHandle, SessionSnapshot};
pub use navigate::EndAction;
pub use overlay::OverlayMark;
pub use state::{Modifier, PauseKind, PlaybackModifiers, PlayerPhase, SessionState};
