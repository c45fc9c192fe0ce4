//! Game scheduling
//!
//! A [`Session`] runs one playthrough on a dedicated task: a pacing timer
//! drives the ticks, turns arrive over a channel and every tick publishes a
//! [`Snapshot`] for the front end to redraw from.

pub mod handle;
pub mod snapshot;

pub use handle::{Command, Session, SessionHandle};
pub use snapshot::Snapshot;
