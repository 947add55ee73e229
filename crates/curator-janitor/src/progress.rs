//! Progress channels for batch runs
//!
//! Each run is keyed by an opaque progress id. A subscriber registers the id
//! before (or while) the run emits; events for ids nobody subscribed to are
//! dropped. Several runs may share one registry.

use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::sync::{Arc, PoisonError, RwLock};
use tokio::sync::mpsc::{unbounded_channel, UnboundedReceiver, UnboundedSender};

/// Stage of a batch run
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ProgressStep {
    /// Corpus is being loaded
    Loading,
    /// A document is about to be analyzed
    Analyzing,
    /// A document has been analyzed
    Analyzed,
    /// The run finished
    Complete,
    /// The run aborted
    Error,
}

impl ProgressStep {
    /// Whether no further events follow
    pub fn is_terminal(&self) -> bool {
        matches!(self, ProgressStep::Complete | ProgressStep::Error)
    }
}

/// One progress update
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProgressEvent {
    /// Stage
    pub step: ProgressStep,

    /// Percent complete, 0-100
    pub progress: u8,

    /// Human-readable status
    pub message: String,

    /// Step-specific payload
    #[serde(default, skip_serializing_if = "serde_json::Value::is_null")]
    pub details: serde_json::Value,
}

impl ProgressEvent {
    /// Event without details
    pub fn new(step: ProgressStep, progress: u8, message: impl Into<String>) -> Self {
        Self {
            step,
            progress: progress.min(100),
            message: message.into(),
            details: serde_json::Value::Null,
        }
    }

    /// Attach details
    pub fn with_details(mut self, details: serde_json::Value) -> Self {
        self.details = details;
        self
    }
}

/// Registry of progress channels keyed by progress id
#[derive(Debug, Clone, Default)]
pub struct ProgressRegistry {
    channels: Arc<RwLock<HashMap<String, UnboundedSender<ProgressEvent>>>>,
}

impl ProgressRegistry {
    /// Create an empty registry
    pub fn new() -> Self {
        Self::default()
    }

    /// Subscribe to a progress id, replacing any earlier subscriber
    pub fn subscribe(&self, progress_id: &str) -> UnboundedReceiver<ProgressEvent> {
        let (tx, rx) = unbounded_channel();
        self.channels
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .insert(progress_id.to_string(), tx);
        rx
    }

    /// Deliver an event; dropped when nobody subscribed or the receiver is gone
    pub fn emit(&self, progress_id: &str, event: ProgressEvent) -> bool {
        let channels = self.channels.read().unwrap_or_else(PoisonError::into_inner);
        match channels.get(progress_id) {
            Some(tx) => tx.send(event).is_ok(),
            None => false,
        }
    }

    /// Tear down a channel; its receiver sees end-of-stream once drained
    pub fn close(&self, progress_id: &str) {
        self.channels
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .remove(progress_id);
    }

    /// Sender currently registered for the id
    pub fn sender(&self, progress_id: &str) -> Option<UnboundedSender<ProgressEvent>> {
        self.channels
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .get(progress_id)
            .cloned()
    }

    /// Tear down the channel only if `tx` is still the one registered
    ///
    /// Returns false when the id was re-subscribed or already closed.
    pub fn close_if_current(&self, progress_id: &str, tx: &UnboundedSender<ProgressEvent>) -> bool {
        let mut channels = self.channels.write().unwrap_or_else(PoisonError::into_inner);
        if channels.get(progress_id).is_some_and(|current| current.same_channel(tx)) {
            channels.remove(progress_id);
            true
        } else {
            false
        }
    }

    /// Whether a subscriber is registered for the id
    pub fn is_subscribed(&self, progress_id: &str) -> bool {
        self.channels
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .contains_key(progress_id)
    }

    /// Number of open channels
    pub fn len(&self) -> usize {
        self.channels.read().unwrap_or_else(PoisonError::into_inner).len()
    }

    /// No open channels
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}
