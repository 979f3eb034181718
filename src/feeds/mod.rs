pub mod reddit;

use anyhow::Result;
use async_trait::async_trait;

/// Envelope sent from a fetch task back to the UI loop.
///
/// `generation` is the refresh token of the cycle that started the fetch;
/// widgets drop messages from superseded cycles so a slow response can never
/// overwrite a newer one.
#[derive(Debug, Clone)]
pub struct FeedMessage {
    pub widget_id: String,
    pub generation: u64,
    pub data: FeedData,
}

#[derive(Debug, Clone, PartialEq)]
pub enum FeedData {
    Reddit(Vec<RedditPost>),
    Loading,
    Error(String),
}

/// A Reddit post normalized out of the listing envelope.
///
/// Title, score, permalink and creation time are always present; the flair
/// fields are absent whenever the upstream post carries no flair.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RedditPost {
    pub title: String,
    pub subreddit: String,
    pub flair_text: Option<String>,
    pub flair_background: Option<String>,
    pub flair_text_color: Option<String>,
    pub score: i64,
    pub num_comments: u64,
    pub permalink: String,
    pub created_utc: i64,
}

impl RedditPost {
    /// Absolute URL of the post on reddit.com.
    pub fn full_url(&self) -> String {
        format!("https://www.reddit.com{}", self.permalink)
    }
}

#[async_trait]
pub trait FeedFetcher: Send + Sync {
    async fn fetch(&self) -> Result<FeedData>;
}
