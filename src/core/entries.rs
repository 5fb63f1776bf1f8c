// Unicorn Logs - core/entries.rs
//
// Bounded, newest-first list of rendered log entries.
//
// Each entry carries its own highlight deadline instead of a timer, so an
// entry evicted before its highlight expires takes the deadline with it.
// All time-dependent operations take an explicit `now` so callers (and tests)
// control the clock.

use crate::core::model::{DisplayEntry, LogRecord};
use chrono::Local;
use std::collections::VecDeque;
use std::time::{Duration, Instant};

/// Newest-first entry list with a hard capacity.
#[derive(Debug)]
pub struct EntryList {
    /// Front = newest.
    entries: VecDeque<DisplayEntry>,
    capacity: usize,
    highlight_duration: Duration,
    next_id: u64,
    evicted: u64,
}

impl EntryList {
    /// Create an empty list. `capacity` is clamped to at least 1.
    pub fn new(capacity: usize, highlight_duration: Duration) -> Self {
        let capacity = capacity.max(1);
        Self {
            entries: VecDeque::with_capacity(capacity.min(4_096)),
            capacity,
            highlight_duration,
            next_id: 0,
            evicted: 0,
        }
    }

    /// Insert a record before all existing entries and mark it highlighted.
    ///
    /// Evicts the oldest entry when the capacity is exceeded. Returns the new
    /// entry's ID.
    pub fn push_front(&mut self, record: LogRecord, now: Instant) -> u64 {
        let id = self.next_id;
        self.next_id += 1;

        self.entries.push_front(DisplayEntry {
            id,
            text: record.display_line(),
            record,
            received_at: Local::now(),
            highlight_until: Some(now + self.highlight_duration),
        });

        while self.entries.len() > self.capacity {
            if let Some(old) = self.entries.pop_back() {
                self.evicted += 1;
                tracing::trace!(id = old.id, "Evicted oldest entry");
            }
        }

        id
    }

    /// Clear highlight markers whose deadline has passed.
    ///
    /// Returns the number of highlights cleared.
    pub fn expire_highlights(&mut self, now: Instant) -> usize {
        let mut cleared = 0;
        // New entries sit at the front, so highlighted ones form a prefix;
        // stop at the first entry that was already cleared.
        for entry in self.entries.iter_mut() {
            match entry.highlight_until {
                Some(until) if now >= until => {
                    entry.highlight_until = None;
                    cleared += 1;
                }
                Some(_) => {}
                None => break,
            }
        }
        cleared
    }

    /// Earliest pending highlight deadline, used to schedule the next repaint.
    pub fn next_highlight_deadline(&self) -> Option<Instant> {
        self.entries
            .iter()
            .map_while(|e| e.highlight_until)
            .min()
    }

    /// Remove all entries. IDs keep increasing.
    pub fn clear(&mut self) {
        self.entries.clear();
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Total number of entries dropped by the capacity bound.
    pub fn evicted(&self) -> u64 {
        self.evicted
    }

    /// Entry at display position `index` (0 = newest).
    pub fn get(&self, index: usize) -> Option<&DisplayEntry> {
        self.entries.get(index)
    }

    /// Look up an entry by its ID.
    pub fn find(&self, id: u64) -> Option<&DisplayEntry> {
        self.entries.iter().find(|e| e.id == id)
    }

    /// Iterate newest first.
    pub fn iter(&self) -> impl Iterator<Item = &DisplayEntry> {
        self.entries.iter()
    }
}
