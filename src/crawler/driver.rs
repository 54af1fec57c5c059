//! Crawl driver - main crawl orchestration logic
//!
//! The driver owns the frontier and the result accumulators for one crawl. It
//! repeatedly dequeues a page, hands it to the page processor, folds the
//! outcome into the accumulators, and enqueues newly discovered links until the
//! frontier runs dry or the page budget is spent.

use crate::crawler::fetcher::build_http_client;
use crate::crawler::frontier::{Frontier, FrontierEntry};
use crate::crawler::processor::{PageProcessor, ProcessedPage};
use crate::crawler::request::CrawlRequest;
use crate::crawler::result::{CrawlResult, FailedPage, PageResult};
use crate::crawler::CrawlSettings;
use crate::HarvestError;
use futures::stream::{self, StreamExt};
use std::time::{Duration, Instant};

/// Entries dequeued per batch in level-parallel mode, per worker
const BATCH_PER_WORKER: usize = 4;

/// Driver state machine
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CrawlPhase {
    Running,
    Done,
}

/// Drives a single bounded crawl
pub struct CrawlDriver {
    seed_url: String,
    frontier: Frontier,
    processor: PageProcessor,
    max_depth: u32,
    max_pages: u32,
    concurrency: usize,
    pages_scraped: u32,
    urls_visited: Vec<String>,
    data: Vec<PageResult>,
    failures: Vec<FailedPage>,
}

impl CrawlDriver {
    /// Validates `request` and prepares a driver with the seed enqueued
    ///
    /// Validation runs before the HTTP client is built, so an invalid request
    /// never causes network activity.
    pub fn new(request: &CrawlRequest, settings: &CrawlSettings) -> Result<Self, HarvestError> {
        let validated = request.validate()?;
        let client = build_http_client(&settings.user_agent)?;

        let processor = PageProcessor::new(
            client,
            validated.selectors,
            settings.request_timeout,
            settings.link_resolution,
        );

        // The seed is queued exactly as given so it appears verbatim in
        // `urls_visited`
        let seed_url = request.seed_url.trim().to_string();
        let mut frontier = Frontier::new();
        frontier.enqueue(seed_url.as_str(), 0);

        Ok(Self {
            seed_url,
            frontier,
            processor,
            max_depth: validated.max_depth,
            max_pages: validated.max_pages,
            concurrency: settings.concurrency.max(1),
            pages_scraped: 0,
            urls_visited: Vec::new(),
            data: Vec::new(),
            failures: Vec::new(),
        })
    }

    /// The frontier, including any entries left when the budget ran out
    pub fn frontier(&self) -> &Frontier {
        &self.frontier
    }

    /// Runs the crawl loop to completion and returns the aggregated result
    ///
    /// The loop stops only when the frontier is empty or `max_pages` pages
    /// have been scraped. Page failures are recorded and skipped.
    pub async fn run(&mut self) -> CrawlResult {
        tracing::info!(
            "Starting crawl of {} (max depth {}, max pages {}, concurrency {})",
            self.seed_url,
            self.max_depth,
            self.max_pages,
            self.concurrency
        );

        let start_time = Instant::now();
        let mut phase = CrawlPhase::Running;

        while phase == CrawlPhase::Running {
            phase = if self.concurrency > 1 {
                self.step_level().await
            } else {
                self.step().await
            };
        }

        self.finish(start_time.elapsed())
    }

    /// Processes one frontier entry
    async fn step(&mut self) -> CrawlPhase {
        if self.should_stop() {
            return CrawlPhase::Done;
        }

        let Some(entry) = self.frontier.dequeue() else {
            return CrawlPhase::Done;
        };

        self.urls_visited.push(entry.url.clone());
        let page = self.processor.process(&entry.url, entry.depth).await;
        self.fold(page);

        CrawlPhase::Running
    }

    /// Processes a batch of same-depth entries concurrently
    ///
    /// Results are folded in dequeue order once the whole batch is done, so
    /// every link discovered at depth d is enqueued before any depth d+1 entry
    /// is dequeued.
    async fn step_level(&mut self) -> CrawlPhase {
        if self.should_stop() {
            return CrawlPhase::Done;
        }

        let batch = self.next_batch();
        if batch.is_empty() {
            return CrawlPhase::Done;
        }

        self.urls_visited
            .extend(batch.iter().map(|entry| entry.url.clone()));

        let processor = &self.processor;
        let pages: Vec<ProcessedPage> = stream::iter(batch.iter())
            .map(|entry| processor.process(&entry.url, entry.depth))
            .buffered(self.concurrency)
            .collect()
            .await;

        for page in pages {
            self.fold(page);
        }

        CrawlPhase::Running
    }

    /// Dequeues up to one batch of entries sharing the front depth
    ///
    /// The batch never exceeds the remaining page budget, which keeps
    /// `pages_scraped <= max_pages` even if every page in it succeeds.
    fn next_batch(&mut self) -> Vec<FrontierEntry> {
        let remaining = self.max_pages.saturating_sub(self.pages_scraped) as usize;
        let limit = remaining.min(self.concurrency.saturating_mul(BATCH_PER_WORKER));

        let Some(depth) = self.frontier.front_depth() else {
            return Vec::new();
        };

        let mut batch = Vec::with_capacity(limit);
        while batch.len() < limit && self.frontier.front_depth() == Some(depth) {
            match self.frontier.dequeue() {
                Some(entry) => batch.push(entry),
                None => break,
            }
        }
        batch
    }

    /// Folds one page outcome into the accumulators
    fn fold(&mut self, page: ProcessedPage) {
        let ProcessedPage { result, links } = page;

        if let Some(error) = &result.fetch_error {
            tracing::warn!("Failed to scrape {}: {}", result.url, error);
            self.failures
                .push(FailedPage::new(&result.url, result.depth, error));
            return;
        }

        if result.depth < self.max_depth {
            let child_depth = result.depth + 1;
            let mut queued = 0usize;
            for link in links {
                if self.frontier.enqueue(link.as_str(), child_depth) {
                    tracing::trace!("Queued {} (depth {})", link, child_depth);
                    queued += 1;
                }
            }
            tracing::debug!("Queued {} new links from {}", queued, result.url);
        }

        self.pages_scraped += 1;
        self.data.push(result);
    }

    fn should_stop(&self) -> bool {
        self.frontier.is_empty() || self.pages_scraped >= self.max_pages
    }

    /// Assembles the final result, leaving the driver's accumulators empty
    fn finish(&mut self, elapsed: Duration) -> CrawlResult {
        tracing::info!(
            "Crawl completed: {} pages scraped, {} failed, {} visited, {} left in frontier, in {:?}",
            self.pages_scraped,
            self.failures.len(),
            self.urls_visited.len(),
            self.frontier.len(),
            elapsed
        );

        CrawlResult {
            success: true,
            pages_scraped: self.pages_scraped,
            execution_time: elapsed,
            urls_visited: std::mem::take(&mut self.urls_visited),
            data: std::mem::take(&mut self.data),
            failures: std::mem::take(&mut self.failures),
        }
    }
}
