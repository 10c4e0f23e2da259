//! Host events emitted by systems.
//!
//! Systems cannot reach into the runner directly. Instead they push
//! [`Event`]s into the [`EventManager`] they are lent during configure, and
//! the runner drains and applies them at the start of the next step.

use std::collections::VecDeque;
use std::fmt;

use serde::{Deserialize, Serialize};

/// A request from a system to the host.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Event {
    /// Pause (`true`) or resume (`false`) stepping.
    Pause(bool),
    /// Stop the run; later steps are ignored.
    Stop,
    /// Restore initial poses and zero the clock.
    Reset,
}

impl fmt::Display for Event {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Pause(true) => write!(f, "Pause"),
            Self::Pause(false) => write!(f, "Resume"),
            Self::Stop => write!(f, "Stop"),
            Self::Reset => write!(f, "Reset"),
        }
    }
}

/// FIFO queue of pending events.
#[derive(Debug, Clone, Default)]
pub struct EventManager {
    queue: VecDeque<Event>,
}

impl EventManager {
    /// Creates an empty queue.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Queues an event.
    pub fn emit(&mut self, event: Event) {
        tracing::debug!(%event, "event queued");
        self.queue.push_back(event);
    }

    /// Removes and returns all pending events in emission order.
    pub fn drain(&mut self) -> impl Iterator<Item = Event> + '_ {
        self.queue.drain(..)
    }

    /// Number of pending events.
    #[must_use]
    pub fn len(&self) -> usize {
        self.queue.len()
    }

    /// Returns `true` if nothing is pending.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.queue.is_empty()
    }
}
