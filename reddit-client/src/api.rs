use crate::auth::{Authenticator, RedditCredentials};
use pradon_core::{CoreError, RedditApiError, StreamItem};
use reqwest::{Client, Method, Response};
use serde::{Deserialize, Serialize};
use std::time::Duration;
use tracing::{debug, error, warn};

const REDDIT_API_BASE: &str = "https://oauth.reddit.com";

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RedditListing<T> {
    pub kind: String,
    pub data: RedditListingData<T>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RedditListingData<T> {
    pub children: Vec<RedditListingChild<T>>,
    pub after: Option<String>,
    pub before: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RedditListingChild<T> {
    pub kind: String,
    pub data: T,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RedditPostData {
    pub id: String,
    pub name: String,
    pub title: String,
    pub selftext: String,
    pub author: String,
    pub subreddit: String,
    pub created_utc: f64,
    pub stickied: bool,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RedditCommentData {
    pub id: String,
    pub name: String,
    pub body: String,
    pub author: String,
    pub subreddit: String,
    pub created_utc: f64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RedditMessageData {
    pub id: String,
    pub name: String,
    pub subject: String,
    pub body: String,
    pub author: Option<String>,
    pub created_utc: f64,
    pub was_comment: bool,
    pub new: bool,
}

// Reddit wraps comment submission results in {"json": {"errors": [...]}}
// and reports failures inside a 200 response.
#[derive(Debug, Clone, Deserialize)]
pub struct ApiJsonEnvelope {
    pub json: ApiJsonBody,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ApiJsonBody {
    #[serde(default)]
    pub errors: Vec<Vec<serde_json::Value>>,
}

impl ApiJsonEnvelope {
    /// First error tuple flattened to one readable string.
    pub fn first_error(&self) -> Option<String> {
        self.json.errors.first().map(|parts| {
            parts
                .iter()
                .filter_map(|part| part.as_str())
                .collect::<Vec<_>>()
                .join(": ")
        })
    }
}

pub struct RedditClient {
    http_client: Client,
    auth: Authenticator,
    user_agent: String,
}

impl RedditClient {
    pub fn new(credentials: RedditCredentials) -> Result<Self, CoreError> {
        let user_agent = credentials.user_agent.clone();
        let auth = Authenticator::new(credentials)?;

        let http_client = Client::builder()
            .user_agent(&user_agent)
            .timeout(Duration::from_secs(30))
            .build()?;

        Ok(Self {
            http_client,
            auth,
            user_agent,
        })
    }

    pub async fn make_request(
        &self,
        method: Method,
        endpoint: &str,
        query_params: Option<&[(&str, &str)]>,
        form_params: Option<&[(&str, &str)]>,
    ) -> Result<Response, CoreError> {
        let url = format!("{}{}", REDDIT_API_BASE, endpoint);
        let access_token = self.auth.access_token().await?;

        let mut request_builder = self
            .http_client
            .request(method.clone(), &url)
            .bearer_auth(&access_token)
            .header("User-Agent", &self.user_agent);

        if let Some(params) = query_params {
            request_builder = request_builder.query(params);
        }
        if let Some(params) = form_params {
            request_builder = request_builder.form(params);
        }

        debug!("Making Reddit API request: {} {}", method, endpoint);
        let response = match request_builder.send().await {
            Ok(response) => {
                if response.status().is_success() {
                    debug!("Request successful: {} {}", response.status(), endpoint);
                } else {
                    error!(
                        "Request failed with status: {} for {}",
                        response.status(),
                        endpoint
                    );

                    if response.status().as_u16() == 429 {
                        let retry_seconds = response
                            .headers()
                            .get("retry-after")
                            .and_then(|value| value.to_str().ok())
                            .and_then(|value| value.parse::<u64>().ok())
                            .unwrap_or(60);
                        warn!("Rate limited, retry after {} seconds", retry_seconds);
                        return Err(CoreError::RedditApi(RedditApiError::RateLimitExceeded {
                            retry_after: retry_seconds,
                        }));
                    } else if response.status().as_u16() == 401 {
                        return Err(CoreError::RedditApi(RedditApiError::InvalidToken));
                    } else if response.status().as_u16() == 403 {
                        return Err(CoreError::RedditApi(RedditApiError::Forbidden {
                            resource: endpoint.to_string(),
                        }));
                    } else if response.status().as_u16() == 404 {
                        return Err(CoreError::RedditApi(RedditApiError::InvalidResponse {
                            details: "Resource not found".to_string(),
                        }));
                    } else if response.status().is_server_error() {
                        return Err(CoreError::RedditApi(RedditApiError::ServerError {
                            status_code: response.status().as_u16(),
                        }));
                    }
                }

                response
            }
            Err(e) => {
                error!("Network error for {} {}: {}", method, endpoint, e);
                if e.is_timeout() {
                    return Err(CoreError::RedditApi(RedditApiError::RequestTimeout));
                } else {
                    return Err(CoreError::Network(e));
                }
            }
        };

        Ok(response)
    }

    /// Newest submissions in a subreddit, as Reddit returns them (newest
    /// first).
    pub async fn new_submissions(
        &self,
        subreddit: &str,
        limit: u32,
    ) -> Result<Vec<StreamItem>, CoreError> {
        let endpoint = format!("/r/{}/new", subreddit);
        let limit_str = limit.to_string();
        let params = [("limit", limit_str.as_str())];

        let response = self
            .make_request(Method::GET, &endpoint, Some(&params), None)
            .await?;

        let listing: RedditListing<RedditPostData> = response.json().await.map_err(|e| {
            error!("Failed to parse submissions: {}", e);
            CoreError::RedditApi(RedditApiError::InvalidResponse {
                details: format!("Failed to parse submissions for r/{}", subreddit),
            })
        })?;

        debug!(
            "Retrieved {} submissions from r/{}",
            listing.data.children.len(),
            subreddit
        );
        Ok(listing
            .data
            .children
            .into_iter()
            .map(|child| child.data.into())
            .collect())
    }

    /// Newest comments in a subreddit, newest first.
    pub async fn new_comments(
        &self,
        subreddit: &str,
        limit: u32,
    ) -> Result<Vec<StreamItem>, CoreError> {
        let endpoint = format!("/r/{}/comments", subreddit);
        let limit_str = limit.to_string();
        let params = [("limit", limit_str.as_str())];

        let response = self
            .make_request(Method::GET, &endpoint, Some(&params), None)
            .await?;

        let listing: RedditListing<RedditCommentData> = response.json().await.map_err(|e| {
            error!("Failed to parse comments: {}", e);
            CoreError::RedditApi(RedditApiError::InvalidResponse {
                details: format!("Failed to parse comments for r/{}", subreddit),
            })
        })?;

        debug!(
            "Retrieved {} comments from r/{}",
            listing.data.children.len(),
            subreddit
        );
        Ok(listing
            .data
            .children
            .into_iter()
            .map(|child| child.data.into())
            .collect())
    }

    /// Newest items in the account inbox, newest first. Includes comment
    /// replies, mentions, and private messages.
    pub async fn inbox_messages(&self, limit: u32) -> Result<Vec<StreamItem>, CoreError> {
        let limit_str = limit.to_string();
        let params = [("limit", limit_str.as_str())];

        let response = self
            .make_request(Method::GET, "/message/inbox", Some(&params), None)
            .await?;

        let listing: RedditListing<RedditMessageData> = response.json().await.map_err(|e| {
            error!("Failed to parse inbox: {}", e);
            CoreError::RedditApi(RedditApiError::InvalidResponse {
                details: "Failed to parse inbox listing".to_string(),
            })
        })?;

        debug!("Retrieved {} inbox items", listing.data.children.len());
        Ok(listing
            .data
            .children
            .into_iter()
            .map(|child| child.data.into())
            .collect())
    }

    /// Posts a reply under the given fullname. Failures show up inside the
    /// JSON envelope rather than the status code.
    pub async fn submit_comment(
        &self,
        parent_fullname: &str,
        text: &str,
    ) -> Result<(), CoreError> {
        let form = [
            ("api_type", "json"),
            ("thing_id", parent_fullname),
            ("text", text),
        ];

        let response = self
            .make_request(Method::POST, "/api/comment", None, Some(&form))
            .await?;

        let envelope: ApiJsonEnvelope = response.json().await.map_err(|e| {
            error!("Failed to parse comment response: {}", e);
            CoreError::RedditApi(RedditApiError::InvalidResponse {
                details: "Failed to parse comment response".to_string(),
            })
        })?;

        if let Some(reason) = envelope.first_error() {
            return Err(CoreError::RedditApi(RedditApiError::ReplyRejected {
                reason,
            }));
        }

        Ok(())
    }

    pub async fn mark_message_read(&self, fullname: &str) -> Result<(), CoreError> {
        let form = [("id", fullname)];
        self.make_request(Method::POST, "/api/read_message", None, Some(&form))
            .await?;
        Ok(())
    }
}

// Wire data to domain item conversions.
impl From<RedditPostData> for StreamItem {
    fn from(data: RedditPostData) -> Self {
        StreamItem::Post {
            fullname: data.name,
            title: data.title,
            body: data.selftext,
            author: data.author,
        }
    }
}

impl From<RedditCommentData> for StreamItem {
    fn from(data: RedditCommentData) -> Self {
        StreamItem::Comment {
            fullname: data.name,
            body: data.body,
            author: data.author,
        }
    }
}

impl From<RedditMessageData> for StreamItem {
    fn from(data: RedditMessageData) -> Self {
        StreamItem::Mention {
            fullname: data.name,
            subject: data.subject,
            body: data.body,
            author: data.author.unwrap_or_else(|| "[deleted]".to_string()),
            is_comment: data.was_comment,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn test_credentials() -> RedditCredentials {
        RedditCredentials {
            client_id: "test_client_id".to_string(),
            client_secret: "test_client_secret".to_string(),
            username: "test_user".to_string(),
            password: "test_password".to_string(),
            user_agent: "test-user-agent/1.0".to_string(),
        }
    }

    #[test]
    fn test_api_client_creation() {
        let client = RedditClient::new(test_credentials()).expect("client builds");
        assert_eq!(client.user_agent, "test-user-agent/1.0");
    }

    #[test]
    fn test_post_listing_deserialization() {
        let raw = r#"{
            "kind": "Listing",
            "data": {
                "children": [
                    {
                        "kind": "t3",
                        "data": {
                            "id": "abc123",
                            "name": "t3_abc123",
                            "title": "On the nature of reality",
                            "selftext": "A long reflection.",
                            "author": "philosopher",
                            "subreddit": "quotes",
                            "created_utc": 1640995200.0,
                            "stickied": false
                        }
                    }
                ],
                "after": "t3_abc123",
                "before": null
            }
        }"#;

        let listing: RedditListing<RedditPostData> =
            serde_json::from_str(raw).expect("listing parses");
        assert_eq!(listing.kind, "Listing");
        assert_eq!(listing.data.children.len(), 1);
        assert_eq!(listing.data.children[0].kind, "t3");
        assert_eq!(listing.data.after.as_deref(), Some("t3_abc123"));

        let item: StreamItem = listing.data.children[0].data.clone().into();
        assert_eq!(item.fullname(), "t3_abc123");
        assert_eq!(item.text_fields(), vec!["On the nature of reality", "A long reflection."]);
    }

    #[test]
    fn test_comment_conversion() {
        let data = RedditCommentData {
            id: "def456".to_string(),
            name: "t1_def456".to_string(),
            body: "what is freedom anyway".to_string(),
            author: "asker".to_string(),
            subreddit: "quotes".to_string(),
            created_utc: 1640995300.0,
        };

        let item: StreamItem = data.into();
        assert_eq!(item.fullname(), "t1_def456");
        assert_eq!(item.kind(), "comment");
        assert_eq!(item.text_fields(), vec!["what is freedom anyway"]);
    }

    #[test]
    fn test_message_conversion_keeps_comment_flag() {
        let data = RedditMessageData {
            id: "ghi789".to_string(),
            name: "t1_ghi789".to_string(),
            subject: "username mention".to_string(),
            body: "u/pradon-bot what say you".to_string(),
            author: Some("summoner".to_string()),
            created_utc: 1640995400.0,
            was_comment: true,
            new: true,
        };

        let item: StreamItem = data.into();
        match item {
            StreamItem::Mention {
                subject,
                is_comment,
                author,
                ..
            } => {
                assert_eq!(subject, "username mention");
                assert!(is_comment);
                assert_eq!(author, "summoner");
            }
            other => panic!("expected mention, got {:?}", other),
        }
    }

    #[test]
    fn test_message_conversion_without_author() {
        let data = RedditMessageData {
            id: "jkl012".to_string(),
            name: "t4_jkl012".to_string(),
            subject: "welcome".to_string(),
            body: "hello".to_string(),
            author: None,
            created_utc: 1640995500.0,
            was_comment: false,
            new: true,
        };

        let item: StreamItem = data.into();
        assert_eq!(item.author(), "[deleted]");
    }

    #[test]
    fn test_comment_envelope_reports_first_error() {
        let raw = r#"{
            "json": {
                "errors": [
                    ["RATELIMIT", "you are doing that too much. try again in 2 minutes.", "ratelimit"]
                ]
            }
        }"#;

        let envelope: ApiJsonEnvelope = serde_json::from_str(raw).expect("envelope parses");
        let reason = envelope.first_error().expect("error surfaced");
        assert!(reason.contains("RATELIMIT"));
        assert!(reason.contains("too much"));
    }

    #[test]
    fn test_comment_envelope_without_errors() {
        let raw = r#"{"json": {"errors": []}}"#;
        let envelope: ApiJsonEnvelope = serde_json::from_str(raw).expect("envelope parses");
        assert!(envelope.first_error().is_none());

        let raw_missing = r#"{"json": {}}"#;
        let envelope: ApiJsonEnvelope =
            serde_json::from_str(raw_missing).expect("envelope parses without errors key");
        assert!(envelope.first_error().is_none());
    }
}
