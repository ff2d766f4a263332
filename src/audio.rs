//! Audio output: the session abstraction the controller drives, and its
//! `rodio` implementation.

mod session;
mod sink;
mod types;

pub use session::{OutputSession, SessionFactory};
pub use sink::RodioOutput;
pub use types::{CompletionSignal, PlayerEvent, SessionId};
