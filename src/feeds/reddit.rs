use std::time::Duration;

use anyhow::Result;
use async_trait::async_trait;
use futures::future;
use serde::Deserialize;
use tracing::warn;

use super::{FeedData, FeedFetcher, RedditPost};
use crate::config::Tag;

const REDDIT_API_BASE: &str = "https://www.reddit.com";

/// Fixed page size of the merged feed.
pub const MAX_POSTS: usize = 40;

pub struct RedditFetcher {
    tags: Vec<Tag>,
    max_posts: usize,
    base_url: String,
    client: reqwest::Client,
}

#[derive(Debug, Deserialize)]
struct Listing {
    data: ListingData,
}

#[derive(Debug, Deserialize)]
struct ListingData {
    children: Vec<ListingChild>,
}

#[derive(Debug, Deserialize)]
struct ListingChild {
    data: ApiPost,
}

#[derive(Debug, Deserialize)]
struct ApiPost {
    title: String,
    subreddit: String,
    link_flair_text: Option<String>,
    link_flair_background_color: Option<String>,
    link_flair_text_color: Option<String>,
    score: i64,
    num_comments: u64,
    permalink: String,
    created_utc: f64,
}

impl From<ApiPost> for RedditPost {
    fn from(post: ApiPost) -> Self {
        // Reddit sends "" rather than null for unset flair colors.
        let non_empty = |value: Option<String>| value.filter(|s| !s.is_empty());

        RedditPost {
            title: post.title,
            subreddit: post.subreddit,
            flair_text: non_empty(post.link_flair_text),
            flair_background: non_empty(post.link_flair_background_color),
            flair_text_color: non_empty(post.link_flair_text_color),
            score: post.score,
            num_comments: post.num_comments,
            permalink: post.permalink,
            created_utc: post.created_utc as i64,
        }
    }
}

/// Parse a raw listing response body into normalized posts.
///
/// Pure so tests can exercise the envelope handling without a server.
pub fn parse_listing(body: &str) -> Result<Vec<RedditPost>> {
    let listing: Listing = serde_json::from_str(body)?;
    Ok(listing
        .data
        .children
        .into_iter()
        .map(|child| child.data.into())
        .collect())
}

/// Flatten per-source batches into one list ranked by score descending,
/// capped at `cap` posts.
///
/// The sort is stable: posts with equal scores keep their discovery order
/// (source order, then upstream order within a source).
pub fn merge_and_rank(batches: Vec<Vec<RedditPost>>, cap: usize) -> Vec<RedditPost> {
    let mut posts: Vec<RedditPost> = batches.into_iter().flatten().collect();
    posts.sort_by(|a, b| b.score.cmp(&a.score));
    posts.truncate(cap);
    posts
}

impl RedditFetcher {
    pub fn new(tags: Vec<Tag>, max_posts: usize) -> Self {
        Self::with_base_url(tags, max_posts, REDDIT_API_BASE)
    }

    pub fn with_base_url(tags: Vec<Tag>, max_posts: usize, base_url: impl Into<String>) -> Self {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(15))
            .user_agent("reddash/0.1 (terminal dashboard)")
            .build()
            .unwrap_or_else(|_| reqwest::Client::new());

        Self {
            tags,
            max_posts,
            base_url: base_url.into(),
            client,
        }
    }

    /// Top posts of the day for one subreddit.
    async fn top_posts(&self, subreddit: &str) -> Result<Vec<RedditPost>> {
        let url = format!(
            "{}/r/{}/top.json?limit={}&t=day",
            self.base_url,
            urlencoding::encode(subreddit),
            self.max_posts,
        );

        let response = self.client.get(&url).send().await?;

        if !response.status().is_success() {
            return Err(anyhow::anyhow!("Reddit API error: {}", response.status()));
        }

        let body = response.text().await?;
        parse_listing(&body)
    }

    /// One full aggregation cycle.
    ///
    /// Fans out one request per tag that carries a subreddit value (tags
    /// without one contribute nothing and cost no I/O), waits for every
    /// request to settle, folds failures into empty batches, then merges,
    /// ranks and caps the rest. A cycle where every source fails yields an
    /// empty feed, not an error.
    pub async fn fetch_posts(&self) -> Vec<RedditPost> {
        let requests = self.tags.iter().map(|tag| async move {
            let Some(subreddit) = tag.subreddit() else {
                return Vec::new();
            };
            match self.top_posts(subreddit).await {
                Ok(posts) => posts,
                Err(e) => {
                    warn!(subreddit, "dropping failed source: {e}");
                    Vec::new()
                }
            }
        });

        let batches = future::join_all(requests).await;
        merge_and_rank(batches, self.max_posts)
    }
}

#[async_trait]
impl FeedFetcher for RedditFetcher {
    async fn fetch(&self) -> Result<FeedData> {
        Ok(FeedData::Reddit(self.fetch_posts().await))
    }
}
