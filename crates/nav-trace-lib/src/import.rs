//! Import workflow on top of the dispatch service
//!
//! Wraps [`ParseService`] with the two conveniences callers actually want: a
//! user-facing success/error message instead of a `Result`, and one
//! [`PathCreated`] event per resulting path. File import is a one-shot async
//! read; an I/O failure stays an `Err` because it is an environment problem,
//! not a property of the input.

use crate::dispatch::ParseService;
use crate::events::{EventPublisher, PathCreated};
use crate::path::PathVariant;
use crate::Result;
use std::path::Path;

/// Whether an import message reports success or a parse failure.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum MessageKind {
    Success,
    Error,
}

/// User-facing status line for one import.
#[derive(Clone, Debug)]
pub struct ImportMessage {
    pub kind: MessageKind,
    pub text: String,
}

/// The result of one import: the parsed paths (possibly none) and a message
/// describing what happened.
#[derive(Clone, Debug)]
pub struct ImportOutcome {
    pub paths: Vec<PathVariant>,
    pub message: ImportMessage,
}

impl ImportOutcome {
    #[inline]
    pub fn is_success(&self) -> bool {
        self.message.kind == MessageKind::Success
    }
}

/// Imports text or files, publishing a [`PathCreated`] event per path.
#[derive(Default)]
pub struct PathImporter {
    service: ParseService,
    publisher: EventPublisher,
}

impl PathImporter {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a handler for [`PathCreated`] events.
    pub fn subscribe(&mut self, handler: impl Fn(&PathCreated) + Send + Sync + 'static) {
        self.publisher.subscribe(handler);
    }

    /// Parse `input` and publish one event per resulting path.
    ///
    /// A parse failure is reported in the outcome's message, never as an
    /// `Err`: from the caller's point of view the import ran, it just found
    /// nothing usable.
    pub fn import_from_text(&mut self, input: &str) -> ImportOutcome {
        match self.service.parse(input) {
            Ok(parsed) => {
                for reason in &parsed.skipped {
                    tracing::debug!("import skipped a line: {reason}");
                }
                for path in &parsed.paths {
                    self.publisher
                        .publish(&PathCreated::new(path.kind(), path.name(), path.len()));
                }
                ImportOutcome {
                    paths: parsed.paths,
                    message: ImportMessage {
                        kind: MessageKind::Success,
                        text: parsed.message,
                    },
                }
            }
            Err(error) => {
                tracing::warn!("import failed: {error}");
                ImportOutcome {
                    paths: Vec::new(),
                    message: ImportMessage {
                        kind: MessageKind::Error,
                        text: error.to_string(),
                    },
                }
            }
        }
    }

    /// Read `path` in one shot and import its contents.
    ///
    /// # Errors
    /// Returns the underlying I/O error when the file cannot be read.
    pub async fn import_from_file(&mut self, path: impl AsRef<Path>) -> Result<ImportOutcome> {
        let contents = tokio::fs::read_to_string(path).await?;
        Ok(self.import_from_text(&contents))
    }
}
