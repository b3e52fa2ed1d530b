use std::collections::HashMap;
use std::sync::Arc;

use chrono::{DateTime, Local, TimeDelta};
use tokio::task::JoinSet;
use tracing::{debug, warn};

use crate::config::{TrackerConfig, TrackingRequest};
use crate::engine::SearchEngine;
use crate::proxy::load_optional_proxy;
use crate::request::{BatchRequest, Fetch, HttpFetcher};
use crate::{elapsed_secs, info_time, Result, PAGE_SIZE};

/// How a session ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Outcome {
    /// Every keyword was found.
    Resolved,
    /// The result limit was reached with keywords still pending.
    Exhausted,
}

/// Result of a finished session. Keywords that were never found have no entry in
/// `found` or `timings`.
#[derive(Debug, Clone)]
pub struct TrackingReport {
    pub outcome: Outcome,
    /// keyword -> absolute 1-based position
    pub found: HashMap<String, usize>,
    /// keyword -> time from session start until it was found
    pub timings: HashMap<String, TimeDelta>,
    /// Keywords still pending at the end, in input order.
    pub unresolved: Vec<String>,
    /// Number of result pages (batches) requested.
    pub pages_fetched: usize,
}

impl TrackingReport {
    pub fn elapsed_secs(&self, keyword: &str) -> Option<f64> {
        self.timings.get(keyword).copied().map(elapsed_secs)
    }
}

/// Mutable state of one session. Owned by a single `run`, never shared.
struct Session {
    started_at: DateTime<Local>,
    offset: usize,
    /// (input index, keyword)
    pending: Vec<(usize, String)>,
    found: HashMap<String, usize>,
    timings: HashMap<String, TimeDelta>,
    pages_fetched: usize,
}

impl Session {
    fn new(request: &TrackingRequest) -> Self {
        Self {
            started_at: Local::now(),
            offset: 0,
            pending: request.keywords().iter().cloned().enumerate().collect(),
            found: HashMap::new(),
            timings: HashMap::new(),
            pages_fetched: 0,
        }
    }

    /// Write-once: a keyword that already has a position keeps it.
    fn record(&mut self, keyword: &str, rank: usize) {
        if self.found.contains_key(keyword) {
            return;
        }
        let position = self.offset + rank;
        let elapsed = Local::now() - self.started_at;
        info_time!(
            self.started_at,
            "found `{}` at position {}",
            keyword,
            position
        );
        self.found.insert(keyword.to_string(), position);
        self.timings.insert(keyword.to_string(), elapsed);
    }

    fn into_report(self, outcome: Outcome) -> TrackingReport {
        TrackingReport {
            outcome,
            found: self.found,
            timings: self.timings,
            unresolved: self.pending.into_iter().map(|(_, k)| k).collect(),
            pages_fetched: self.pages_fetched,
        }
    }
}

/// Pages through the results of every pending keyword until each one is found or the
/// result limit is reached.
pub struct Tracker {
    engine: Arc<dyn SearchEngine>,
    fetcher: Box<dyn Fetch>,
    request: TrackingRequest,
    proxy: Option<String>,
}

impl Tracker {
    /// Fails if the engine's URL template is missing a slot.
    pub fn new(
        engine: Box<dyn SearchEngine>,
        fetcher: Box<dyn Fetch>,
        request: TrackingRequest,
    ) -> Result<Self> {
        engine.validate()?;
        Ok(Self {
            engine: Arc::from(engine),
            fetcher,
            request,
            proxy: None,
        })
    }

    /// Builds a tracker with the HTTP fetcher, loading the proxy list if one is configured.
    pub fn from_config(config: TrackerConfig) -> Result<Self> {
        let proxy = load_optional_proxy(config.proxy_file.as_deref())?;
        let tracker = Self::new(
            config.engine.build(),
            Box::new(HttpFetcher::new(config.timeout)),
            config.request,
        )?;
        Ok(tracker.with_proxy(proxy))
    }

    /// Routes every request of the session through `proxy`.
    pub fn with_proxy(mut self, proxy: Option<String>) -> Self {
        self.proxy = proxy;
        self
    }

    pub fn request(&self) -> &TrackingRequest {
        &self.request
    }

    pub async fn run(&self) -> TrackingReport {
        let mut session = Session::new(&self.request);
        info_time!(
            "Started tracking {} keywords for {}",
            session.pending.len(),
            self.request.site()
        );

        let outcome = loop {
            if session.pending.is_empty() {
                break Outcome::Resolved;
            }
            self.process_page(&mut session).await;

            if session.pending.is_empty() {
                break Outcome::Resolved;
            }
            if session.offset >= self.request.limit() {
                break Outcome::Exhausted;
            }
            session.offset += PAGE_SIZE;
        };

        info_time!(
            session.started_at,
            "Finished tracking: {:?}, {} found, {} unresolved",
            outcome,
            session.found.len(),
            session.pending.len()
        );
        session.into_report(outcome)
    }

    /// One iteration: fetch the current page for every pending keyword and rank the
    /// site on each. Failed fetches and misses stay pending for the next offset.
    async fn process_page(&self, session: &mut Session) {
        let start_page_time = Local::now();
        let batch: Vec<BatchRequest> = session
            .pending
            .iter()
            .map(|(id, keyword)| {
                BatchRequest::get(*id, self.engine.build_url(keyword, session.offset))
                    .with_proxy(self.proxy.clone())
            })
            .collect();

        let responses = self.fetcher.fetch(batch).await;
        session.pages_fetched += 1;

        // Page parsing is CPU bound, keep it off the runtime threads.
        let mut parses = JoinSet::new();
        for (id, response) in responses {
            match response {
                Ok(html) => {
                    let engine = Arc::clone(&self.engine);
                    let site = self.request.site().to_string();
                    parses.spawn_blocking(move || (id, engine.parse(&html, &site)));
                }
                Err(e) => warn!(id, offset = session.offset, "fetch failed: {e}"),
            }
        }

        let mut ranks = HashMap::new();
        while let Some(task) = parses.join_next().await {
            match task {
                Ok((id, Some(rank))) => {
                    ranks.insert(id, rank);
                }
                Ok((_, None)) => {}
                Err(e) => warn!(offset = session.offset, "parse task failed: {e}"),
            }
        }

        let pending = std::mem::take(&mut session.pending);
        for (id, keyword) in pending {
            match ranks.get(&id) {
                Some(&rank) => session.record(&keyword, rank),
                None => {
                    debug!(keyword = %keyword, offset = session.offset, "not found on this page");
                    session.pending.push((id, keyword));
                }
            }
        }

        info_time!(
            start_page_time,
            "Processed offset {}, {} keywords pending",
            session.offset,
            session.pending.len()
        );
    }
}
