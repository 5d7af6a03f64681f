//! Breadth-first frontier with a visited set and a page budget

use crate::url::normalize_url;
use std::collections::{HashSet, VecDeque};
use url::Url;

/// A URL waiting in the frontier
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CrawlTask {
    /// The link as found on the page; fetched and used as the base for its links
    pub url: Url,
    /// Normalized form of `url`, the visited-set key
    pub key: String,
    /// Link hops from the seed
    pub depth: u32,
}

impl CrawlTask {
    fn new(url: Url, depth: u32) -> Self {
        let key = visit_key(&url);
        Self { url, key, depth }
    }
}

fn visit_key(url: &Url) -> String {
    normalize_url(url.as_str())
        .map(|normalized| normalized.to_string())
        .unwrap_or_else(|_| url.to_string())
}

/// FIFO queue of crawl tasks
///
/// The budget counts visited pages, whether or not their fetch succeeded.
/// Once it is spent, [`Frontier::next_task`] returns `None` and whatever is
/// still queued is dropped.
#[derive(Debug)]
pub struct Frontier {
    queue: VecDeque<CrawlTask>,
    visited: HashSet<String>,
    max_pages: usize,
    max_depth: Option<u32>,
}

impl Frontier {
    /// Creates a frontier holding only the seed at depth 0
    pub fn new(seed: Url, max_pages: usize, max_depth: Option<u32>) -> Self {
        let mut queue = VecDeque::new();
        queue.push_back(CrawlTask::new(seed, 0));

        Self {
            queue,
            visited: HashSet::new(),
            max_pages,
            max_depth,
        }
    }

    /// Dequeues the next unvisited task and marks it visited
    pub fn next_task(&mut self) -> Option<CrawlTask> {
        while !self.budget_spent() {
            let task = self.queue.pop_front()?;
            if self.visited.insert(task.key.clone()) {
                return Some(task);
            }
        }
        None
    }

    /// Queues a link found on a page at `parent_depth`
    ///
    /// Returns false when the link was already visited or lies past the
    /// depth bound. Links already queued but not yet visited are queued again
    /// and skipped on dequeue.
    pub fn enqueue(&mut self, url: Url, parent_depth: u32) -> bool {
        let depth = parent_depth.saturating_add(1);

        if self.max_depth.is_some_and(|max| depth > max) {
            return false;
        }

        let task = CrawlTask::new(url, depth);
        if self.visited.contains(&task.key) {
            return false;
        }

        self.queue.push_back(task);
        true
    }

    pub fn visited_count(&self) -> usize {
        self.visited.len()
    }

    pub fn queued(&self) -> usize {
        self.queue.len()
    }

    pub fn budget_spent(&self) -> bool {
        self.visited.len() >= self.max_pages
    }
}
