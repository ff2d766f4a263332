//! Application module: the playback controller driven by the runtime.
//!
//! `Controller` owns the playlist, the single live output session, the
//! current track and the loop flag.

mod controller;

pub use controller::*;

#[cfg(test)]
mod tests;
