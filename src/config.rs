use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use serde::Deserialize;

/// Grid placement of a widget on the dashboard.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
pub struct Position {
    pub row: usize,
    pub col: usize,
}

/// A user-selected topic. Tags that carry subreddit names are queried;
/// tags without any contribute nothing to the feed.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct Tag {
    pub name: String,
    #[serde(default)]
    pub reddit: Option<Vec<String>>,
}

impl Tag {
    /// The subreddit queried for this tag (only the first value is used).
    pub fn subreddit(&self) -> Option<&str> {
        self.reddit
            .as_ref()
            .and_then(|values| values.first())
            .map(String::as_str)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ListingMode {
    #[default]
    Normal,
    Compact,
}

#[derive(Debug, Clone, Deserialize)]
pub struct RedditConfig {
    pub title: String,
    #[serde(default)]
    pub tags: Vec<Tag>,
    #[serde(default = "default_max_posts")]
    pub max_posts: usize,
    #[serde(default)]
    pub listing_mode: ListingMode,
    /// Toggle for promoted rows. Accepted and passed through; no promoted
    /// content provider is wired in.
    #[serde(default)]
    pub with_ads: bool,
    pub position: Position,
}

fn default_max_posts() -> usize {
    crate::feeds::reddit::MAX_POSTS
}

#[derive(Debug, Clone, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum WidgetConfig {
    Reddit(RedditConfig),
}

#[derive(Debug, Clone, Deserialize)]
pub struct Config {
    #[serde(default = "default_refresh_interval")]
    pub refresh_interval_secs: u64,
    #[serde(default)]
    pub widgets: Vec<WidgetConfig>,
}

fn default_refresh_interval() -> u64 {
    300
}

impl Default for Config {
    fn default() -> Self {
        Self {
            refresh_interval_secs: default_refresh_interval(),
            widgets: vec![WidgetConfig::Reddit(RedditConfig {
                title: "Reddit".to_string(),
                tags: vec![
                    Tag {
                        name: "rust".to_string(),
                        reddit: Some(vec!["rust".to_string()]),
                    },
                    Tag {
                        name: "programming".to_string(),
                        reddit: Some(vec!["programming".to_string()]),
                    },
                ],
                max_posts: default_max_posts(),
                listing_mode: ListingMode::default(),
                with_ads: false,
                position: Position { row: 0, col: 0 },
            })],
        }
    }
}

impl Config {
    pub fn load(path: &Path) -> Result<Self> {
        let raw = fs::read_to_string(path)
            .with_context(|| format!("failed to read config file {}", path.display()))?;
        let config: Config = toml::from_str(&raw)
            .with_context(|| format!("failed to parse config file {}", path.display()))?;
        Ok(config)
    }

    /// Load from an explicit path, the default location, or fall back to the
    /// built-in configuration when no file exists.
    pub fn load_or_default(path: Option<&Path>) -> Result<Self> {
        if let Some(path) = path {
            return Self::load(path);
        }
        match Self::default_path() {
            Some(path) if path.exists() => Self::load(&path),
            _ => Ok(Self::default()),
        }
    }

    pub fn default_path() -> Option<PathBuf> {
        dirs::config_dir().map(|dir| dir.join("reddash").join("config.toml"))
    }
}
