pub mod controller;
pub mod session;
pub mod state_machine;

pub use controller::{MediaEvent, PlaybackController, RequestOutcome};
pub use session::{MediaSource, PlaybackSession, SessionError};
pub use state_machine::{PlaybackAction, PlaybackEvent, PlaybackState};
