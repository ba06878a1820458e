use std::collections::HashMap;
use std::time::{SystemTime, UNIX_EPOCH};

use serde::{Deserialize, Serialize};
use sha1::{Digest, Sha1};
use tracing::debug;

pub const SESSION_TTL_MS: u64 = 24 * 60 * 60 * 1000;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SessionStatus {
    InProgress,
    Completed,
}

/// Progress through one multi-step application on one site.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ApplicationSession {
    pub id: String,
    pub created_at: u64,
    pub steps_visited: Vec<String>,
    pub current_step: String,
    pub status: SessionStatus,
}

impl ApplicationSession {
    fn new(hostname: &str, url: &str, now_ms: u64) -> Self {
        let mut hasher = Sha1::new();
        hasher.update(hostname.as_bytes());
        hasher.update(now_ms.to_be_bytes());
        let id = hasher
            .finalize()
            .iter()
            .take(8)
            .map(|b| format!("{:02x}", b))
            .collect();

        Self {
            id,
            created_at: now_ms,
            steps_visited: Vec::new(),
            current_step: url.to_string(),
            status: SessionStatus::InProgress,
        }
    }

    pub fn is_expired(&self, now_ms: u64) -> bool {
        now_ms.saturating_sub(self.created_at) > SESSION_TTL_MS
    }
}

pub fn now_millis() -> u64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_millis() as u64)
        .unwrap_or_default()
}

/// Sessions keyed by hostname. Storage is up to the caller; the tracker
/// serializes as a plain map.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct SessionTracker {
    sessions: HashMap<String, ApplicationSession>,
}

impl SessionTracker {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, hostname: &str) -> Option<&ApplicationSession> {
        self.sessions.get(hostname)
    }

    /// Live session for `hostname`; expired or completed sessions are
    /// replaced by a fresh one starting at `url`.
    pub fn get_or_create(&mut self, hostname: &str, url: &str, now_ms: u64) -> &mut ApplicationSession {
        let stale = self
            .sessions
            .get(hostname)
            .is_some_and(|s| s.is_expired(now_ms) || s.status == SessionStatus::Completed);
        if stale {
            debug!(hostname, "Discarding stale application session");
            self.sessions.remove(hostname);
        }

        self.sessions
            .entry(hostname.to_string())
            .or_insert_with(|| ApplicationSession::new(hostname, url, now_ms))
    }

    /// Record a visit to `url` as the current step.
    pub fn update_step(&mut self, hostname: &str, url: &str, now_ms: u64) -> &ApplicationSession {
        let session = self.get_or_create(hostname, url, now_ms);
        if !session.steps_visited.iter().any(|s| s == url) {
            session.steps_visited.push(url.to_string());
        }
        session.current_step = url.to_string();
        session
    }

    pub fn mark_completed(&mut self, hostname: &str, url: &str, now_ms: u64) {
        self.get_or_create(hostname, url, now_ms).status = SessionStatus::Completed;
    }

    pub fn len(&self) -> usize {
        self.sessions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.sessions.is_empty()
    }
}
