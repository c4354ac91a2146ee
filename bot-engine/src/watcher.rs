//! Stream watcher: pulls items from a feed, applies the trigger policy,
//! and writes quote replies back through the API handle.

use std::sync::Arc;

use async_trait::async_trait;
use tokio_util::sync::CancellationToken;
use tracing::{debug, info};

use crate::compose::compose_reply;
use crate::normalize::normalize;
use crate::trigger::TriggerPolicy;
use pradon_core::{CoreError, QuoteSet, StreamItem};
use reddit_client::{ItemFeed, RedditClient};
use response_store::ResponseStore;

/// Subject line that marks an inbox message as a username mention,
/// compared after normalization.
const MENTION_SUBJECT: &str = "username mention";

/// What the watcher decided to do with a single item.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ItemOutcome {
    /// A reply was posted and recorded.
    Replied,
    /// The trigger policy declined the item.
    NoTrigger,
    /// The response store already holds this fullname.
    AlreadyReplied,
    /// An inbox item that is not a comment mention.
    Ineligible,
}

/// Source of stream items. Implemented by the live polling feed and by
/// fakes in tests.
#[async_trait]
pub trait ItemSource: Send {
    /// Yields the next item, or `None` once cancellation is observed.
    async fn next(&mut self, cancel: &CancellationToken)
        -> Result<Option<StreamItem>, CoreError>;
}

/// Write side of the platform: posting replies and marking inbox items read.
#[async_trait]
pub trait ResponseApi: Send + Sync {
    async fn reply(&self, parent_fullname: &str, text: &str) -> Result<(), CoreError>;
    async fn mark_read(&self, fullname: &str) -> Result<(), CoreError>;
}

#[async_trait]
impl ItemSource for ItemFeed {
    async fn next(
        &mut self,
        cancel: &CancellationToken,
    ) -> Result<Option<StreamItem>, CoreError> {
        ItemFeed::next(self, cancel).await
    }
}

#[async_trait]
impl ResponseApi for RedditClient {
    async fn reply(&self, parent_fullname: &str, text: &str) -> Result<(), CoreError> {
        self.submit_comment(parent_fullname, text).await
    }

    async fn mark_read(&self, fullname: &str) -> Result<(), CoreError> {
        self.mark_message_read(fullname).await
    }
}

/// One supervised stream loop over posts, comments, or mentions.
///
/// Posts and comments go through the trigger policy; mentions have their
/// own eligibility rule and are answered unconditionally, then marked read
/// so they leave the inbox. Before posting, the watcher claims the fullname
/// in the response store; only the claim winner replies, so a fullname is
/// answered at most once across restarts and across watchers that surface
/// the same item.
#[derive(Clone)]
pub struct StreamWatcher {
    name: &'static str,
    policy: TriggerPolicy,
    quotes: QuoteSet,
    username: String,
    api: Arc<dyn ResponseApi>,
    store: ResponseStore,
}

impl StreamWatcher {
    pub fn new(
        name: &'static str,
        policy: TriggerPolicy,
        quotes: QuoteSet,
        username: impl Into<String>,
        api: Arc<dyn ResponseApi>,
        store: ResponseStore,
    ) -> Self {
        Self {
            name,
            policy,
            quotes,
            username: username.into(),
            api,
            store,
        }
    }

    /// Drains `source` until it reports cancellation or fails.
    pub async fn run<S: ItemSource>(
        &self,
        source: &mut S,
        cancel: &CancellationToken,
    ) -> Result<(), CoreError> {
        info!(watcher = self.name, "watcher starting");

        while let Some(item) = source.next(cancel).await? {
            let outcome = self.process_item(&item).await?;
            match outcome {
                ItemOutcome::Replied => {
                    info!(
                        watcher = self.name,
                        fullname = item.fullname(),
                        kind = item.kind(),
                        author = item.author(),
                        "posted reply"
                    );
                }
                ItemOutcome::NoTrigger => {
                    debug!(watcher = self.name, fullname = item.fullname(), "no trigger");
                }
                ItemOutcome::AlreadyReplied => {
                    debug!(
                        watcher = self.name,
                        fullname = item.fullname(),
                        "already replied, skipping"
                    );
                }
                ItemOutcome::Ineligible => {
                    debug!(
                        watcher = self.name,
                        fullname = item.fullname(),
                        "not a comment mention, skipping"
                    );
                }
            }
        }

        info!(watcher = self.name, "watcher stopped");
        Ok(())
    }

    /// Applies the full decision pipeline to one item.
    pub async fn process_item(&self, item: &StreamItem) -> Result<ItemOutcome, CoreError> {
        if let StreamItem::Mention {
            subject,
            is_comment,
            ..
        } = item
        {
            return self.process_mention(item, subject, *is_comment).await;
        }

        if !self.policy.should_respond(&item.text_fields()) {
            return Ok(ItemOutcome::NoTrigger);
        }
        if !self.store.mark_replied(item.fullname()).await? {
            return Ok(ItemOutcome::AlreadyReplied);
        }

        let reply = compose_reply(&self.quotes, &self.username);
        self.api.reply(item.fullname(), &reply).await?;
        Ok(ItemOutcome::Replied)
    }

    /// Mentions skip the keyword and opt-out checks: being summoned by name
    /// is the trigger. Only comment mentions qualify.
    async fn process_mention(
        &self,
        item: &StreamItem,
        subject: &str,
        is_comment: bool,
    ) -> Result<ItemOutcome, CoreError> {
        if !is_comment || normalize(subject) != MENTION_SUBJECT {
            return Ok(ItemOutcome::Ineligible);
        }
        if !self.store.mark_replied(item.fullname()).await? {
            return Ok(ItemOutcome::AlreadyReplied);
        }

        let reply = compose_reply(&self.quotes, &self.username);
        self.api.reply(item.fullname(), &reply).await?;
        self.api.mark_read(item.fullname()).await?;
        Ok(ItemOutcome::Replied)
    }
}
