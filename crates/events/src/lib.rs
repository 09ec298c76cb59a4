//! Domain events.
//!
//! Events describe what already happened to an aggregate. They are kept in an
//! in-memory [`EventLog`]; nothing in this workspace persists them.

pub mod event;
pub mod log;

pub use event::Event;
pub use log::EventLog;
