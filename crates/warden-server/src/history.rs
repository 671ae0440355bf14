//! In-memory log of classification results.
//!
//! Bounded: once `capacity` entries are held the oldest is evicted. Nothing
//! survives a restart.

use std::collections::VecDeque;
use std::sync::{PoisonError, RwLock};

use chrono::{DateTime, Utc};
use serde::Serialize;

use warden_core::{ArtifactKind, ClassificationResult, ResultSource, RiskLevel};

/// Default number of entries kept.
pub const DEFAULT_HISTORY_CAPACITY: usize = 1000;

/// Number of entries served by `GET /history`.
pub const RECENT_LIMIT: usize = 100;

/// One classified artifact.
#[derive(Debug, Clone, Serialize)]
pub struct HistoryEntry {
    #[serde(rename = "type")]
    pub kind: ArtifactKind,
    /// Text, URL, or file name as submitted.
    pub input: String,
    pub risk: RiskLevel,
    pub confidence: f32,
    pub source: ResultSource,
    pub result: serde_json::Value,
    pub date: DateTime<Utc>,
}

impl HistoryEntry {
    pub fn new(kind: ArtifactKind, input: impl Into<String>, result: &ClassificationResult) -> Self {
        Self {
            kind,
            input: input.into(),
            risk: result.risk,
            confidence: result.confidence,
            source: result.source.clone(),
            result: result.detail.clone(),
            date: Utc::now(),
        }
    }
}

/// Count and share of one risk level.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RiskShare {
    pub count: usize,
    /// Percentage of all entries, one decimal place.
    pub percent: String,
}

/// Distribution of risk levels across the history.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Analytics {
    pub none: RiskShare,
    pub low: RiskShare,
    pub medium: RiskShare,
    pub high: RiskShare,
    pub total: usize,
}

/// Thread-safe bounded history.
#[derive(Debug)]
pub struct History {
    entries: RwLock<VecDeque<HistoryEntry>>,
    capacity: usize,
}

impl History {
    /// Creates an empty history holding at most `capacity` entries.
    pub fn new(capacity: usize) -> Self {
        let capacity = capacity.max(1);
        Self {
            entries: RwLock::new(VecDeque::with_capacity(capacity.min(DEFAULT_HISTORY_CAPACITY))),
            capacity,
        }
    }

    /// Returns the maximum number of entries kept.
    pub fn capacity(&self) -> usize {
        self.capacity
    }

    /// Appends an entry, evicting the oldest if full.
    pub fn record(&self, entry: HistoryEntry) {
        let mut entries = self.entries.write().unwrap_or_else(PoisonError::into_inner);
        if entries.len() == self.capacity {
            entries.pop_front();
        }
        entries.push_back(entry);
    }

    /// Returns up to `limit` entries, newest first.
    pub fn recent(&self, limit: usize) -> Vec<HistoryEntry> {
        let entries = self.entries.read().unwrap_or_else(PoisonError::into_inner);
        entries.iter().rev().take(limit).cloned().collect()
    }

    /// Returns the number of entries held.
    pub fn len(&self) -> usize {
        self.entries
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .len()
    }

    /// Returns true if no entries are held.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Removes every entry.
    pub fn clear(&self) {
        self.entries
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .clear();
    }

    /// Summarizes entries by risk level.
    pub fn analytics(&self) -> Analytics {
        let entries = self.entries.read().unwrap_or_else(PoisonError::into_inner);
        let total = entries.len();
        let count = |level: RiskLevel| entries.iter().filter(|e| e.risk == level).count();
        // Empty history reports 0.0% everywhere rather than dividing by zero.
        let divisor = total.max(1) as f64;
        let share = |level: RiskLevel| {
            let count = count(level);
            RiskShare {
                count,
                percent: format!("{:.1}", count as f64 / divisor * 100.0),
            }
        };

        Analytics {
            none: share(RiskLevel::None),
            low: share(RiskLevel::Low),
            medium: share(RiskLevel::Medium),
            high: share(RiskLevel::High),
            total,
        }
    }
}

impl Default for History {
    fn default() -> Self {
        Self::new(DEFAULT_HISTORY_CAPACITY)
    }
}
