use crate::extractor::PLAYER_ALLOW;
use crate::{general, Player, ScrapingOptions, Strategy, Summary, SummaryError};
use async_trait::async_trait;
use tracing::{debug, warn};
use url::Url;

pub const NICOZON_ORIGIN: &str = "https://www.nicozon.net";

const NICONICO_HOSTS: &[&str] = &["nicovideo.jp", "www.nicovideo.jp"];
const NICONICO_FAVICON: &str = "https://resource.video.nimg.jp/web/images/favicon/favicon.ico";
const NICONICO_SITENAME: &str = "ニコニコ動画";
const EMBED_WIDTH: u32 = 640;
const EMBED_HEIGHT: u32 = 360;

/// niconico video pages, falling back to the nicozon mirror when the
/// primary origin answers with a bad status.
#[derive(Debug, Clone)]
pub struct NiconicoStrategy {
    hosts: Vec<String>,
    mirror: Url,
}

impl Default for NiconicoStrategy {
    fn default() -> Self {
        Self::new()
    }
}

impl NiconicoStrategy {
    pub fn new() -> Self {
        Self {
            hosts: NICONICO_HOSTS.iter().map(|h| h.to_string()).collect(),
            mirror: Url::parse(NICOZON_ORIGIN).expect("mirror origin is a valid URL"),
        }
    }

    /// Replace the hosts the predicate accepts.
    pub fn with_hosts<I, S>(mut self, hosts: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.hosts = hosts.into_iter().map(Into::into).collect();
        self
    }

    /// Scheme, host and port of the mirror; path and query come from the original URL.
    pub fn with_mirror(mut self, origin: Url) -> Self {
        self.mirror = origin;
        self
    }

    fn mirror_url(&self, url: &Url) -> Url {
        let mut mirrored = self.mirror.clone();
        mirrored.set_path(url.path());
        mirrored.set_query(url.query());
        mirrored
    }

    async fn summarize_mirror(
        &self,
        url: &Url,
        options: &ScrapingOptions,
    ) -> Result<Option<Summary>, SummaryError> {
        let mirror_url = self.mirror_url(url);
        debug!(url = %url, mirror = %mirror_url, "Retrying against mirror");

        let Some(summary) = general(&mirror_url, options).await? else {
            return Ok(None);
        };

        let video_id = video_id(url);
        let allow = if summary.player.allow.is_empty() {
            PLAYER_ALLOW.iter().map(|s| s.to_string()).collect()
        } else {
            summary.player.allow.clone()
        };

        Ok(Some(Summary {
            icon: Some(NICONICO_FAVICON.to_string()),
            description: Some(video_id.to_string()),
            player: Player {
                url: Some(embed_url(video_id)),
                width: Some(EMBED_WIDTH),
                height: Some(EMBED_HEIGHT),
                allow,
            },
            sitename: Some(NICONICO_SITENAME.to_string()),
            ..summary
        }))
    }
}

#[async_trait]
impl Strategy for NiconicoStrategy {
    fn name(&self) -> &'static str {
        "niconico"
    }

    fn matches(&self, url: &Url) -> bool {
        url.host_str()
            .is_some_and(|host| self.hosts.iter().any(|h| h == host))
    }

    async fn summarize(
        &self,
        url: &Url,
        options: &ScrapingOptions,
    ) -> Result<Option<Summary>, SummaryError> {
        match general(url, options).await {
            Ok(summary) => Ok(summary),
            Err(e) if e.is_bad_status() => {
                warn!(url = %url, error = %e, "Primary origin rejected the request");
                match self.summarize_mirror(url, options).await {
                    Ok(summary) => Ok(summary),
                    Err(retry_error) => {
                        warn!(url = %url, error = %retry_error, "Mirror retry failed");
                        Ok(None)
                    }
                }
            }
            Err(e) => Err(e),
        }
    }
}

fn video_id(url: &Url) -> &str {
    url.path().strip_prefix("/watch/").unwrap_or(url.path())
}

fn embed_url(video_id: &str) -> String {
    format!("https://embed.nicovideo.jp/watch/{video_id}?autoplay=1")
}
