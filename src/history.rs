// src/history.rs
//! Bounded in-memory log of analysis outcomes. Best-effort by design: a
//! failed push is logged and the request proceeds without a record id.
//! Entries keep a hashed text id instead of raw input.

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Mutex;
use std::time::{SystemTime, UNIX_EPOCH};

use serde::Serialize;

use crate::crisis::RiskLevel;
use crate::rewrite::RewriteMethod;
use crate::sentiment::SentimentLabel;

#[derive(Debug, Clone, Serialize)]
pub struct HistoryEntry {
    pub id: u64,
    pub ts_unix: u64,
    /// Short sha256 prefix of the input; raw text is never stored here.
    pub text_hash: String,
    pub text_length: usize,
    pub is_toxic: bool,
    pub overall_toxicity: f32,
    pub sentiment_label: SentimentLabel,
    pub sentiment_improved: bool,
    pub risk_level: RiskLevel,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub rewrite_method: Option<RewriteMethod>,
}

#[derive(Debug)]
pub struct History {
    inner: Mutex<Vec<HistoryEntry>>,
    cap: usize,
    next_id: AtomicU64,
}

impl History {
    pub fn with_capacity(cap: usize) -> Self {
        let cap = cap.min(10_000);
        Self {
            inner: Mutex::new(Vec::with_capacity(cap)),
            cap,
            next_id: AtomicU64::new(1),
        }
    }

    /// Append an entry and return its record id, or `None` if the store is
    /// unusable (poisoned lock). Never panics.
    pub fn push(&self, mut entry: HistoryEntry) -> Option<u64> {
        let id = self.next_id.fetch_add(1, Ordering::Relaxed);
        entry.id = id;
        entry.ts_unix = now_unix();

        let mut v = match self.inner.lock() {
            Ok(guard) => guard,
            Err(_) => {
                tracing::warn!("history store lock poisoned, dropping record");
                return None;
            }
        };
        v.push(entry);
        if v.len() > self.cap {
            let excess = v.len() - self.cap;
            v.drain(0..excess);
        }
        Some(id)
    }

    pub fn snapshot_last_n(&self, n: usize) -> Vec<HistoryEntry> {
        let v = match self.inner.lock() {
            Ok(guard) => guard,
            Err(_) => return Vec::new(),
        };
        let len = v.len();
        let start = len.saturating_sub(n);
        v[start..].to_vec()
    }

    pub fn len(&self) -> usize {
        self.inner.lock().map(|v| v.len()).unwrap_or(0)
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

fn now_unix() -> u64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .unwrap_or_default()
        .as_secs()
}
