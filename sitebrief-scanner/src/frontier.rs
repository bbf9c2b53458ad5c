use std::collections::{HashSet, VecDeque};

/// Working set of a crawl: URLs already tried and URLs waiting to be tried.
///
/// A URL is never in both sets. `pending` is drained first-in first-out, so a
/// crawl of a fixed site visits pages in the same order every run.
#[derive(Debug, Default)]
pub struct Frontier {
    visited: HashSet<String>,
    visit_order: Vec<String>,
    pending: VecDeque<String>,
    pending_set: HashSet<String>,
}

impl Frontier {
    pub fn new(seed: String) -> Self {
        let mut frontier = Self::default();
        frontier.enqueue(seed);
        frontier
    }

    /// Queue a canonical URL. Returns false if it was already visited or queued.
    pub fn enqueue(&mut self, url: String) -> bool {
        if self.visited.contains(&url) || self.pending_set.contains(&url) {
            return false;
        }
        self.pending_set.insert(url.clone());
        self.pending.push_back(url);
        true
    }

    /// Take the next URL to try.
    pub fn next_pending(&mut self) -> Option<String> {
        let url = self.pending.pop_front()?;
        self.pending_set.remove(&url);
        Some(url)
    }

    /// Record an attempt, successful or not. Returns false on a repeat.
    pub fn mark_visited(&mut self, url: &str) -> bool {
        if !self.visited.insert(url.to_string()) {
            return false;
        }
        if self.pending_set.remove(url) {
            self.pending.retain(|pending| pending != url);
        }
        self.visit_order.push(url.to_string());
        true
    }

    pub fn is_visited(&self, url: &str) -> bool {
        self.visited.contains(url)
    }

    pub fn visited_count(&self) -> usize {
        self.visited.len()
    }

    pub fn pending_count(&self) -> usize {
        self.pending.len()
    }

    pub fn into_visited(self) -> Vec<String> {
        self.visit_order
    }
}
