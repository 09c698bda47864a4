//! News feed panel
//!
//! The feed is fetched through an RSS-to-JSON proxy; the proxy's response is
//! parsed here.

use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};
use thiserror::Error;
use url::Url;

use super::{ContentAction, ContentEvent, FetchRequest, HttpMethod, PanelContent, StatusTone};
use crate::window::WindowKind;

/// Errors loading the feed
#[derive(Debug, Error)]
pub enum FeedError {
    #[error("invalid feed proxy url: {0}")]
    Url(#[from] url::ParseError),

    #[error("feed request failed: {0}")]
    Transport(String),

    #[error("feed proxy returned HTTP {0}")]
    Status(u16),

    #[error("feed proxy reported an error: {0}")]
    Upstream(String),

    #[error("malformed feed response: {0}")]
    Parse(#[from] serde_json::Error),
}

/// One rendered feed entry
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct FeedItem {
    pub title: String,
    pub link: String,
    /// Publication date formatted for display, if the proxy sent one
    pub published: Option<String>,
    pub summary: String,
}

/// Parsed feed
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct Feed {
    pub title: String,
    pub description: String,
    pub items: Vec<FeedItem>,
}

#[derive(Deserialize)]
struct ProxyResponse {
    #[serde(default)]
    status: Option<String>,
    #[serde(default)]
    message: Option<String>,
    #[serde(default)]
    feed: ProxyFeed,
    #[serde(default)]
    items: Vec<ProxyItem>,
}

#[derive(Default, Deserialize)]
struct ProxyFeed {
    #[serde(default)]
    title: String,
    #[serde(default)]
    description: String,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct ProxyItem {
    #[serde(default)]
    title: String,
    #[serde(default)]
    link: String,
    #[serde(default)]
    pub_date: Option<String>,
    #[serde(default)]
    description: String,
    #[serde(default)]
    content: String,
}

const PROXY_DATE_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

fn display_date(raw: &str) -> String {
    match NaiveDateTime::parse_from_str(raw.trim(), PROXY_DATE_FORMAT) {
        Ok(dt) => dt.format("%d/%m/%Y %H:%M").to_string(),
        Err(_) => raw.trim().to_string(),
    }
}

impl Feed {
    /// Parse the proxy's JSON response
    pub fn from_proxy_json(body: &str) -> Result<Feed, FeedError> {
        let response: ProxyResponse = serde_json::from_str(body)?;
        if let Some(status) = response.status.as_deref() {
            if status != "ok" {
                return Err(FeedError::Upstream(
                    response.message.unwrap_or_else(|| status.to_string()),
                ));
            }
        }

        let items = response
            .items
            .into_iter()
            .map(|item| {
                let summary = if item.description.trim().is_empty() {
                    item.content
                } else {
                    item.description
                };
                FeedItem {
                    title: item.title,
                    link: item.link,
                    published: item.pub_date.as_deref().filter(|d| !d.trim().is_empty()).map(display_date),
                    summary,
                }
            })
            .collect();

        Ok(Feed {
            title: response.feed.title,
            description: response.feed.description,
            items,
        })
    }
}

/// Build the proxy URL for `feed_url`
pub fn proxy_url(proxy: &str, feed_url: &str) -> Result<Url, FeedError> {
    Ok(Url::parse_with_params(proxy, &[("rss_url", feed_url)])?)
}

/// Load progress of the feed panel
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum FeedState {
    Idle,
    Loading,
    Loaded,
    Failed,
    Closed,
}

/// Feed panel
#[derive(Debug)]
pub struct FeedReader {
    proxy: String,
    feed_url: String,
    state: FeedState,
    feed: Option<Feed>,
    status: Option<String>,
}

impl FeedReader {
    pub fn new(proxy: impl Into<String>, feed_url: impl Into<String>) -> Self {
        Self {
            proxy: proxy.into(),
            feed_url: feed_url.into(),
            state: FeedState::Idle,
            feed: None,
            status: None,
        }
    }

    pub fn state(&self) -> FeedState {
        self.state
    }

    /// Last successfully loaded feed
    pub fn feed(&self) -> Option<&Feed> {
        self.feed.as_ref()
    }

    fn request(&mut self) -> Vec<ContentAction> {
        match proxy_url(&self.proxy, &self.feed_url) {
            Ok(url) => {
                self.state = FeedState::Loading;
                self.status = Some("A carregar notícias...".to_string());
                vec![
                    ContentAction::status("A carregar notícias...", StatusTone::Busy),
                    ContentAction::Fetch {
                        request: FetchRequest {
                            method: HttpMethod::Get,
                            url: url.into(),
                            body: None,
                        },
                    },
                ]
            }
            Err(e) => self.fail(e),
        }
    }

    fn fail(&mut self, error: FeedError) -> Vec<ContentAction> {
        log::warn!("feed load failed: {}", error);
        self.state = FeedState::Failed;
        let message = "Erro ao carregar o feed. Tente novamente mais tarde.";
        self.status = Some(message.to_string());
        vec![ContentAction::status(message, StatusTone::Error)]
    }

    fn complete(&mut self, status: u16, body: &str) -> Vec<ContentAction> {
        if !(200..300).contains(&status) {
            return self.fail(FeedError::Status(status));
        }
        match Feed::from_proxy_json(body) {
            Ok(feed) => {
                log::info!("feed loaded: {} items", feed.items.len());
                self.state = FeedState::Loaded;
                self.status = None;
                self.feed = Some(feed.clone());
                vec![ContentAction::ClearStatus, ContentAction::RenderFeed { feed }]
            }
            Err(e) => self.fail(e),
        }
    }
}

impl PanelContent for FeedReader {
    fn kind(&self) -> WindowKind {
        WindowKind::Rss
    }

    fn attach(&mut self, _container_id: &str, _now_ms: f64) -> Vec<ContentAction> {
        if self.state != FeedState::Idle {
            return Vec::new();
        }
        self.request()
    }

    fn handle(&mut self, event: ContentEvent, _now_ms: f64) -> Vec<ContentAction> {
        match (self.state, event) {
            (FeedState::Closed, _) => Vec::new(),
            (FeedState::Loading, ContentEvent::FetchCompleted { status, body }) => self.complete(status, &body),
            (FeedState::Loading, ContentEvent::FetchFailed { reason }) => self.fail(FeedError::Transport(reason)),
            (FeedState::Loaded | FeedState::Failed, ContentEvent::Refresh) => self.request(),
            _ => Vec::new(),
        }
    }

    fn teardown(&mut self) -> Vec<ContentAction> {
        self.state = FeedState::Closed;
        self.status = None;
        Vec::new()
    }

    fn status(&self) -> Option<&str> {
        self.status.as_deref()
    }
}
