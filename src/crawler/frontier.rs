//! Crawl frontier: the FIFO queue of pages awaiting a fetch
//!
//! The frontier also owns the visited set. A URL is marked visited at the
//! moment it is enqueued, so the same link discovered on several pages is only
//! ever queued once and every URL is dequeued at most once.

use std::collections::{HashSet, VecDeque};

/// A URL waiting to be fetched, with its link distance from the seed
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FrontierEntry {
    /// Absolute URL to fetch
    pub url: String,

    /// Number of link hops from the seed URL
    pub depth: u32,
}

/// FIFO frontier with enqueue-time deduplication
///
/// The frontier is depth-agnostic storage: whether a page's children are
/// enqueued at all is decided by the caller.
#[derive(Debug, Default)]
pub struct Frontier {
    queue: VecDeque<FrontierEntry>,
    visited: HashSet<String>,
}

impl Frontier {
    /// Creates an empty frontier
    pub fn new() -> Self {
        Self::default()
    }

    /// Queues `url` at `depth` unless it has been seen before
    ///
    /// Returns `true` if the URL was queued, `false` if it was already in the
    /// visited set.
    pub fn enqueue(&mut self, url: impl Into<String>, depth: u32) -> bool {
        let url = url.into();
        if !self.visited.insert(url.clone()) {
            return false;
        }

        self.queue.push_back(FrontierEntry { url, depth });
        true
    }

    /// Removes and returns the oldest entry
    pub fn dequeue(&mut self) -> Option<FrontierEntry> {
        self.queue.pop_front()
    }

    /// Depth of the entry that would be dequeued next
    pub fn front_depth(&self) -> Option<u32> {
        self.queue.front().map(|entry| entry.depth)
    }

    /// Returns whether the queue is empty
    pub fn is_empty(&self) -> bool {
        self.queue.is_empty()
    }

    /// Number of entries still waiting to be fetched
    pub fn len(&self) -> usize {
        self.queue.len()
    }

    /// Returns whether `url` has ever been enqueued
    pub fn is_visited(&self, url: &str) -> bool {
        self.visited.contains(url)
    }

    /// Number of distinct URLs ever enqueued
    pub fn visited_count(&self) -> usize {
        self.visited.len()
    }
}
