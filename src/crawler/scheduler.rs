//! Scheduler for managing the crawl frontier
//!
//! This module handles:
//! - FIFO queueing of discovered URLs (breadth-first order)
//! - Frontier membership checks so a URL is queued at most once
//! - Depth limiting at enqueue time
//! - Popping concurrency- and budget-bounded batches

use std::collections::{HashSet, VecDeque};

/// A URL waiting to be fetched
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FrontierEntry {
    /// Normalized URL
    pub url: String,

    /// Link hops from the seed
    pub depth: u32,
}

/// Breadth-first frontier
///
/// Entries come out in the order they were added; since every entry at
/// depth `d + 1` is discovered while processing depth `d`, FIFO order is
/// breadth-first order with ties broken by discovery order.
#[derive(Debug)]
pub struct Scheduler {
    frontier: VecDeque<FrontierEntry>,

    /// URLs currently queued
    queued: HashSet<String>,

    max_depth: u32,
}

impl Scheduler {
    /// Creates an empty scheduler that refuses entries deeper than `max_depth`
    pub fn new(max_depth: u32) -> Self {
        Self {
            frontier: VecDeque::new(),
            queued: HashSet::new(),
            max_depth,
        }
    }

    /// Adds an entry to the back of the frontier
    ///
    /// # Returns
    ///
    /// * `true` - The entry was queued
    /// * `false` - It exceeds the depth limit or is already queued
    pub fn add_to_frontier(&mut self, entry: FrontierEntry) -> bool {
        if entry.depth > self.max_depth {
            tracing::trace!("Not queueing {} at depth {}", entry.url, entry.depth);
            return false;
        }

        if !self.queued.insert(entry.url.clone()) {
            return false;
        }

        tracing::trace!("Queued {} at depth {}", entry.url, entry.depth);
        self.frontier.push_back(entry);
        true
    }

    /// Returns true if the URL is waiting in the frontier
    pub fn contains(&self, url: &str) -> bool {
        self.queued.contains(url)
    }

    /// Pops up to `size` entries from the front of the frontier
    pub fn next_batch(&mut self, size: usize) -> Vec<FrontierEntry> {
        let count = size.min(self.frontier.len());
        let batch: Vec<FrontierEntry> = self.frontier.drain(..count).collect();

        for entry in &batch {
            self.queued.remove(&entry.url);
        }

        batch
    }

    /// Gets the current size of the frontier
    pub fn frontier_size(&self) -> usize {
        self.frontier.len()
    }

    pub fn is_empty(&self) -> bool {
        self.frontier.is_empty()
    }
}
