//! Append-only, in-memory event history of one aggregate.

use chrono::{DateTime, Utc};

use crate::event::Event;

/// Append-only list of events. The version is the number of events recorded;
/// the first event brings the log to version 1.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EventLog<E> {
    events: Vec<E>,
}

impl<E> Default for EventLog<E> {
    fn default() -> Self {
        Self { events: Vec::new() }
    }
}

impl<E: Event> EventLog<E> {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append `event` and return the new version.
    pub fn record(&mut self, event: E) -> u64 {
        self.events.push(event);
        self.version()
    }

    pub fn version(&self) -> u64 {
        self.events.len() as u64
    }

    pub fn len(&self) -> usize {
        self.events.len()
    }

    pub fn is_empty(&self) -> bool {
        self.events.is_empty()
    }

    pub fn as_slice(&self) -> &[E] {
        &self.events
    }

    /// Events recorded after `version`. Empty if `version` is current or ahead.
    pub fn since(&self, version: u64) -> &[E] {
        let len = self.events.len();
        let start = usize::try_from(version).map_or(len, |v| v.min(len));
        &self.events[start..]
    }

    /// Events whose [`Event::event_type`] equals `event_type`, oldest first.
    pub fn of_type<'a>(&'a self, event_type: &'a str) -> impl Iterator<Item = &'a E> + 'a {
        self.events
            .iter()
            .filter(move |e| e.event_type() == event_type)
    }

    /// Timestamp of the newest event, if any.
    pub fn last_occurred_at(&self) -> Option<DateTime<Utc>> {
        self.events.last().map(Event::occurred_at)
    }
}
