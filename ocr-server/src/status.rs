//! Process-wide server status: the status label, the processed-upload counter
//! and a bounded log of recent requests.
//!
//! Shared by every request handler. The label and the log live behind one
//! mutex that is never held across an `.await`; the counter is atomic.

use std::collections::VecDeque;
use std::fmt;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Mutex, MutexGuard, PoisonError};
use std::time::Instant;

use chrono::{DateTime, Local};
use serde::Serialize;
use uuid::Uuid;

/// Headers whose values never make it into the request log.
const REDACTED_HEADERS: &[&str] = &["authorization", "cookie", "proxy-authorization", "x-api-key"];

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum StatusLabel {
    Active,
    Processing,
    Ready,
    Error,
}

impl StatusLabel {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Active => "active",
            Self::Processing => "processing",
            Self::Ready => "ready",
            Self::Error => "error",
        }
    }
}

impl fmt::Display for StatusLabel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct RequestLogEntry {
    pub request_id: Uuid,
    pub received_at: DateTime<Local>,
    pub source: String,
    pub headers: Vec<(String, String)>,
    pub message: String,
}

impl RequestLogEntry {
    pub fn new(
        request_id: Uuid,
        source: impl Into<String>,
        headers: Vec<(String, String)>,
        message: impl Into<String>,
    ) -> Self {
        let headers = headers
            .into_iter()
            .map(|(name, value)| {
                if REDACTED_HEADERS.iter().any(|h| h.eq_ignore_ascii_case(&name)) {
                    (name, "***".to_string())
                } else {
                    (name, value)
                }
            })
            .collect();

        Self {
            request_id,
            received_at: Local::now(),
            source: source.into(),
            headers,
            message: message.into(),
        }
    }

    /// Human-readable lines for the status page.
    pub fn lines(&self) -> Vec<String> {
        let mut lines = Vec::with_capacity(self.headers.len() + 2);
        lines.push(format!(
            "[{}] Unique ID: {}",
            self.received_at.format("%Y-%m-%d:%H:%M:%S"),
            self.request_id
        ));
        lines.extend(
            self.headers
                .iter()
                .map(|(name, value)| format!("{name}: {value}")),
        );
        lines.push(self.message.clone());
        lines
    }
}

/// Point-in-time copy of the status, safe to render or serialize.
#[derive(Debug, Clone, Serialize)]
pub struct StatusSnapshot {
    pub status: StatusLabel,
    pub uptime_secs: f64,
    pub processed_count: u64,
    pub started_at: DateTime<Local>,
    /// Newest first.
    pub recent_requests: Vec<RequestLogEntry>,
}

struct StatusInner {
    label: StatusLabel,
    log: VecDeque<RequestLogEntry>,
}

pub struct ServerStatus {
    inner: Mutex<StatusInner>,
    processed: AtomicU64,
    started_at: DateTime<Local>,
    started: Instant,
    log_capacity: usize,
}

impl ServerStatus {
    pub fn new(log_capacity: usize) -> Self {
        Self {
            inner: Mutex::new(StatusInner {
                label: StatusLabel::Active,
                log: VecDeque::with_capacity(log_capacity.min(1024)),
            }),
            processed: AtomicU64::new(0),
            started_at: Local::now(),
            started: Instant::now(),
            log_capacity,
        }
    }

    // A panic while holding the lock cannot leave the label or the log in a
    // torn state, so a poisoned lock is still usable.
    fn lock(&self) -> MutexGuard<'_, StatusInner> {
        self.inner.lock().unwrap_or_else(PoisonError::into_inner)
    }

    pub fn label(&self) -> StatusLabel {
        self.lock().label
    }

    pub fn set(&self, label: StatusLabel) {
        self.lock().label = label;
    }

    pub fn begin_processing(&self) {
        self.set(StatusLabel::Processing);
    }

    pub fn fail(&self) {
        self.set(StatusLabel::Error);
    }

    /// Count one successful upload and return to `ready`.
    pub fn complete(&self) -> u64 {
        let mut inner = self.lock();
        let count = self.processed.fetch_add(1, Ordering::SeqCst) + 1;
        inner.label = StatusLabel::Ready;
        count
    }

    pub fn processed_count(&self) -> u64 {
        self.processed.load(Ordering::SeqCst)
    }

    pub fn record_request(&self, entry: RequestLogEntry) {
        if self.log_capacity == 0 {
            return;
        }
        let mut inner = self.lock();
        while inner.log.len() >= self.log_capacity {
            inner.log.pop_front();
        }
        inner.log.push_back(entry);
    }

    pub fn uptime_secs(&self) -> f64 {
        (self.started.elapsed().as_secs_f64() * 100.0).round() / 100.0
    }

    pub fn snapshot(&self) -> StatusSnapshot {
        let inner = self.lock();
        StatusSnapshot {
            status: inner.label,
            uptime_secs: self.uptime_secs(),
            processed_count: self.processed_count(),
            started_at: self.started_at,
            recent_requests: inner.log.iter().rev().cloned().collect(),
        }
    }
}
