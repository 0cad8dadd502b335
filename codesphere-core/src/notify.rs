//! Transient toast notifications.
//!
//! Toasts are not backed by detached timers: each one carries a deadline and
//! the queue is pruned on the application's logic tick. Dropping the queue
//! therefore cancels every pending expiry — nothing can fire against
//! torn-down state. Display order is insertion order and multiple toasts
//! coexist; there is no priority scheme.

use std::time::{Duration, Instant};

/// How long a toast stays visible.
pub const TOAST_TTL: Duration = Duration::from_secs(3);

/// Visual treatment of a toast.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Severity {
    Success,
    Error,
}

/// A transient, auto-expiring user notification.
#[derive(Debug, Clone)]
pub struct Toast {
    pub id: String,
    pub message: String,
    pub severity: Severity,
    pub expires_at: Instant,
}

/// Insertion-ordered queue of live toasts.
#[derive(Debug)]
pub struct ToastQueue {
    toasts: Vec<Toast>,
    ttl: Duration,
}

impl ToastQueue {
    pub fn new() -> Self {
        Self { toasts: Vec::new(), ttl: TOAST_TTL }
    }

    /// Queue with a non-default lifetime. Tests use short TTLs.
    pub fn with_ttl(ttl: Duration) -> Self {
        Self { toasts: Vec::new(), ttl }
    }

    /// Appends a toast expiring `ttl` after `now` and returns its id.
    pub fn push(&mut self, message: impl Into<String>, severity: Severity, now: Instant) -> String {
        let id = uuid::Uuid::new_v4().to_string();
        self.toasts.push(Toast {
            id: id.clone(),
            message: message.into(),
            severity,
            expires_at: now + self.ttl,
        });
        id
    }

    /// Drops every toast whose deadline has passed. Called on each logic tick.
    pub fn prune(&mut self, now: Instant) {
        self.toasts.retain(|t| t.expires_at > now);
    }

    /// Live toasts in insertion order.
    pub fn visible(&self) -> &[Toast] {
        &self.toasts
    }

    pub fn is_empty(&self) -> bool {
        self.toasts.is_empty()
    }
}

impl Default for ToastQueue {
    fn default() -> Self {
        Self::new()
    }
}
