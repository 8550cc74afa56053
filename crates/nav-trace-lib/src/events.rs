//! In-process domain events
//!
//! Import publishes one [`PathCreated`] per parsed path so UI layers can react
//! (add a map layer, focus the viewport) without being wired into the import
//! flow itself. Handlers run synchronously, in subscription order, on the
//! publishing thread.

use crate::path::PathKind;
use chrono::{DateTime, Utc};

/// Raised once for every path produced by an import.
#[derive(Clone, Debug)]
pub struct PathCreated {
    pub kind: PathKind,
    pub name: String,
    pub point_count: usize,
    pub occurred_on: DateTime<Utc>,
}

impl PathCreated {
    pub fn new(kind: PathKind, name: impl Into<String>, point_count: usize) -> Self {
        Self {
            kind,
            name: name.into(),
            point_count,
            occurred_on: Utc::now(),
        }
    }
}

type Handler = Box<dyn Fn(&PathCreated) + Send + Sync>;

/// Synchronous fan-out of [`PathCreated`] events to registered handlers.
#[derive(Default)]
pub struct EventPublisher {
    handlers: Vec<Handler>,
}

impl std::fmt::Debug for EventPublisher {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("EventPublisher")
            .field("handlers", &self.handlers.len())
            .finish()
    }
}

impl EventPublisher {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a handler. Handlers cannot be removed; publishers are expected
    /// to live as long as their subscribers.
    pub fn subscribe(&mut self, handler: impl Fn(&PathCreated) + Send + Sync + 'static) {
        self.handlers.push(Box::new(handler));
    }

    pub fn publish(&self, event: &PathCreated) {
        tracing::debug!(
            "publishing PathCreated: {} ({}, {} points)",
            event.name,
            event.kind,
            event.point_count
        );
        for handler in &self.handlers {
            handler(event);
        }
    }

    #[inline]
    pub fn subscriber_count(&self) -> usize {
        self.handlers.len()
    }
}
