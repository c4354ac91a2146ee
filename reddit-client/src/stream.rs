use crate::api::RedditClient;
use async_trait::async_trait;
use pradon_core::{CoreError, StreamItem};
use std::collections::{HashSet, VecDeque};
use std::sync::Arc;
use std::time::Duration;
use tokio_util::sync::CancellationToken;
use tracing::debug;

const FETCH_LIMIT: u32 = 100;
// Three poll batches of headroom before old fullnames are forgotten.
const SEEN_WINDOW: usize = 300;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FeedKind {
    Submissions,
    Comments,
    Inbox,
}

impl FeedKind {
    pub fn label(&self) -> &'static str {
        match self {
            FeedKind::Submissions => "posts",
            FeedKind::Comments => "comments",
            FeedKind::Inbox => "mentions",
        }
    }
}

/// Fetch side of the platform: one newest-first page for a feed kind.
/// Implemented by the live client and by fakes in tests.
#[async_trait]
pub trait ItemFetcher: Send + Sync {
    async fn fetch_newest(
        &self,
        kind: FeedKind,
        subreddit: &str,
        limit: u32,
    ) -> Result<Vec<StreamItem>, CoreError>;
}

#[async_trait]
impl ItemFetcher for RedditClient {
    async fn fetch_newest(
        &self,
        kind: FeedKind,
        subreddit: &str,
        limit: u32,
    ) -> Result<Vec<StreamItem>, CoreError> {
        match kind {
            FeedKind::Submissions => self.new_submissions(subreddit, limit).await,
            FeedKind::Comments => self.new_comments(subreddit, limit).await,
            FeedKind::Inbox => self.inbox_messages(limit).await,
        }
    }
}

/// Emulates a live item stream over Reddit's polling API. Each poll fetches
/// the newest items, drops ones already seen, and queues the rest in arrival
/// order. The first poll only primes the seen window so a freshly started
/// feed does not replay the backlog.
pub struct ItemFeed {
    fetcher: Arc<dyn ItemFetcher>,
    kind: FeedKind,
    subreddit: String,
    poll_interval: Duration,
    seen: BoundedSet,
    pending: VecDeque<StreamItem>,
    primed: bool,
}

impl ItemFeed {
    pub fn new(
        fetcher: Arc<dyn ItemFetcher>,
        kind: FeedKind,
        subreddit: impl Into<String>,
        poll_interval: Duration,
    ) -> Self {
        Self {
            fetcher,
            kind,
            subreddit: subreddit.into(),
            poll_interval,
            seen: BoundedSet::new(SEEN_WINDOW),
            pending: VecDeque::new(),
            primed: false,
        }
    }

    /// Yields the next item, sleeping between polls until one arrives.
    /// Returns `Ok(None)` once `cancel` fires.
    pub async fn next(
        &mut self,
        cancel: &CancellationToken,
    ) -> Result<Option<StreamItem>, CoreError> {
        loop {
            if cancel.is_cancelled() {
                return Ok(None);
            }
            if let Some(item) = self.pending.pop_front() {
                return Ok(Some(item));
            }

            // The priming poll runs right away; every later poll waits out
            // the interval first.
            if self.primed {
                tokio::select! {
                    _ = cancel.cancelled() => return Ok(None),
                    _ = tokio::time::sleep(self.poll_interval) => {}
                }
            }

            self.poll().await?;
        }
    }

    async fn poll(&mut self) -> Result<(), CoreError> {
        let items = self
            .fetcher
            .fetch_newest(self.kind, &self.subreddit, FETCH_LIMIT)
            .await?;

        // Reddit returns newest first; queue in arrival order.
        let mut fresh = 0usize;
        for item in items.into_iter().rev() {
            if self.seen.insert(item.fullname()) && self.primed {
                self.pending.push_back(item);
                fresh += 1;
            }
        }

        if !self.primed {
            debug!("Primed {} feed, skipping backlog", self.kind.label());
            self.primed = true;
        } else if fresh > 0 {
            debug!("Queued {} new items from {} feed", fresh, self.kind.label());
        }

        Ok(())
    }
}

/// Insertion-ordered set that forgets its oldest entries past a fixed
/// capacity.
struct BoundedSet {
    capacity: usize,
    order: VecDeque<String>,
    items: HashSet<String>,
}

impl BoundedSet {
    fn new(capacity: usize) -> Self {
        Self {
            capacity,
            order: VecDeque::with_capacity(capacity),
            items: HashSet::with_capacity(capacity),
        }
    }

    /// Returns true if the value was not already present.
    fn insert(&mut self, value: &str) -> bool {
        if self.items.contains(value) {
            return false;
        }
        self.items.insert(value.to_string());
        self.order.push_back(value.to_string());
        if self.order.len() > self.capacity {
            if let Some(oldest) = self.order.pop_front() {
                self.items.remove(&oldest);
            }
        }
        true
    }
}
