use crate::error::ConfigError;

/// One item delivered by a live feed. The fullname is Reddit's globally
/// unique identity (t3_ post, t1_ comment, t4_ message) and is what the
/// reply, mark-read, and dedup paths key on.
#[derive(Debug, Clone)]
pub enum StreamItem {
    Post {
        fullname: String,
        title: String,
        body: String,
        author: String,
    },
    Comment {
        fullname: String,
        body: String,
        author: String,
    },
    Mention {
        fullname: String,
        subject: String,
        body: String,
        author: String,
        is_comment: bool,
    },
}

impl StreamItem {
    pub fn fullname(&self) -> &str {
        match self {
            StreamItem::Post { fullname, .. }
            | StreamItem::Comment { fullname, .. }
            | StreamItem::Mention { fullname, .. } => fullname,
        }
    }

    pub fn author(&self) -> &str {
        match self {
            StreamItem::Post { author, .. }
            | StreamItem::Comment { author, .. }
            | StreamItem::Mention { author, .. } => author,
        }
    }

    /// Text fields the trigger policy inspects for this variant.
    pub fn text_fields(&self) -> Vec<&str> {
        match self {
            StreamItem::Post { title, body, .. } => vec![title.as_str(), body.as_str()],
            StreamItem::Comment { body, .. } => vec![body.as_str()],
            StreamItem::Mention { body, .. } => vec![body.as_str()],
        }
    }

    pub fn kind(&self) -> &'static str {
        match self {
            StreamItem::Post { .. } => "post",
            StreamItem::Comment { .. } => "comment",
            StreamItem::Mention { .. } => "mention",
        }
    }
}

/// Fixed pool of reply quotes. Construction rejects an empty pool, so a
/// holder can always draw from it.
#[derive(Debug, Clone)]
pub struct QuoteSet {
    quotes: Vec<String>,
}

impl QuoteSet {
    pub fn new(quotes: Vec<String>) -> Result<Self, ConfigError> {
        if quotes.is_empty() {
            return Err(ConfigError::ValidationFailed {
                reason: "quote set must not be empty".to_string(),
            });
        }
        Ok(Self { quotes })
    }

    pub fn len(&self) -> usize {
        self.quotes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.quotes.is_empty()
    }

    pub fn as_slice(&self) -> &[String] {
        &self.quotes
    }
}
