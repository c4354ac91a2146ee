pub mod api;
pub mod auth;
pub mod stream;


pub use api::{
    ApiJsonEnvelope, RedditClient, RedditCommentData, RedditListing, RedditListingChild,
    RedditListingData, RedditMessageData, RedditPostData,
};
pub use auth::{Authenticator, RedditCredentials, RedditToken};
pub use stream::{FeedKind, ItemFeed, ItemFetcher};
