//! Audit sinks.
//!
//! The service reports every state-changing operation to an [`AuditSink`]
//! after the operation has taken effect. Recording is fire-and-forget: a
//! sink failure is logged and never undoes the operation.

use chrono::{DateTime, Utc};
use parking_lot::Mutex;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// An audit event describing one state change.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AuditEvent {
    /// What happened, e.g. "leave_submitted".
    pub event_type: String,
    /// Who did it.
    pub actor_id: String,
    /// The kind of entity changed, e.g. "leave_request".
    pub target_type: String,
    /// The identifier of the entity changed.
    pub target_id: String,
    /// Event-specific details.
    pub details: serde_json::Value,
    /// When it happened.
    pub timestamp: DateTime<Utc>,
}

/// An audit sink could not record an event.
#[derive(Debug, Error)]
#[error("audit sink failed: {message}")]
pub struct AuditError {
    /// A description of the failure.
    pub message: String,
}

/// Destination for audit events.
pub trait AuditSink: Send + Sync {
    /// Records an event.
    fn record(&self, event: &AuditEvent) -> Result<(), AuditError>;
}

/// Emits each event as a structured log record on the `audit` target.
#[derive(Debug, Clone, Copy, Default)]
pub struct TracingAuditSink;

impl AuditSink for TracingAuditSink {
    fn record(&self, event: &AuditEvent) -> Result<(), AuditError> {
        tracing::info!(
            target: "audit",
            event_type = %event.event_type,
            actor_id = %event.actor_id,
            target_type = %event.target_type,
            target_id = %event.target_id,
            details = %event.details,
            timestamp = %event.timestamp,
            "audit event"
        );
        Ok(())
    }
}

/// Keeps events in memory; useful in tests and for inspection.
#[derive(Debug, Default)]
pub struct MemoryAuditSink {
    events: Mutex<Vec<AuditEvent>>,
    failing: Mutex<bool>,
}

impl MemoryAuditSink {
    /// Creates an empty sink.
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns a copy of every recorded event.
    pub fn events(&self) -> Vec<AuditEvent> {
        self.events.lock().clone()
    }

    /// Makes subsequent `record` calls fail (or succeed again).
    pub fn set_failing(&self, failing: bool) {
        *self.failing.lock() = failing;
    }
}

impl AuditSink for MemoryAuditSink {
    fn record(&self, event: &AuditEvent) -> Result<(), AuditError> {
        if *self.failing.lock() {
            return Err(AuditError {
                message: "sink unavailable".to_string(),
            });
        }
        self.events.lock().push(event.clone());
        Ok(())
    }
}
