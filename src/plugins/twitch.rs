use crate::extractor::PLAYER_ALLOW;
use crate::{
    embed_host, fetch_page, MetadataExtractor, Player, ScrapingOptions, Strategy, Summary,
    SummaryError,
};
use async_trait::async_trait;
use tracing::debug;
use url::Url;

const TWITCH_ICON: &str = "https://assets.twitch.tv/assets/favicon-32-e29e246c157142c94346.png";
const TWITCH_SITENAME: &str = "Twitch";

/// Twitch channels and videos. The embedded player refuses to load unless it
/// is told which host embeds it.
#[derive(Debug, Clone, Default)]
pub struct TwitchStrategy {
    embed_host: Option<String>,
}

impl TwitchStrategy {
    /// Embedding host taken from the `HOST` environment variable at call time.
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_embed_host(mut self, host: impl Into<String>) -> Self {
        self.embed_host = Some(host.into());
        self
    }

    fn embed_host(&self) -> String {
        self.embed_host.clone().unwrap_or_else(embed_host)
    }
}

#[async_trait]
impl Strategy for TwitchStrategy {
    fn name(&self) -> &'static str {
        "twitch"
    }

    fn matches(&self, url: &Url) -> bool {
        url.host_str()
            .is_some_and(|host| host == "twitch.tv" || host.ends_with(".twitch.tv"))
    }

    async fn summarize(
        &self,
        url: &Url,
        options: &ScrapingOptions,
    ) -> Result<Option<Summary>, SummaryError> {
        let page = fetch_page(url, options).await?;
        let summary = MetadataExtractor::new().extract(&page.text(), url);

        let player_url = summary
            .player
            .url
            .as_deref()
            .and_then(|raw| Url::parse(raw).ok())
            .map(|player| with_parent(player, &self.embed_host()));
        debug!(url = %url, player = ?player_url, "Twitch player");

        let player = match player_url {
            Some(player_url) => Player {
                url: Some(player_url),
                allow: PLAYER_ALLOW.iter().map(|s| s.to_string()).collect(),
                ..summary.player.clone()
            },
            None => Player::default(),
        };

        Ok(Some(Summary {
            icon: Some(TWITCH_ICON.to_string()),
            player,
            sitename: Some(TWITCH_SITENAME.to_string()),
            activity_pub: None,
            fediverse_creator: None,
            ..summary
        }))
    }
}

fn with_parent(mut player: Url, host: &str) -> String {
    let kept: Vec<(String, String)> = player
        .query_pairs()
        .filter(|(key, _)| key != "parent")
        .map(|(key, value)| (key.into_owned(), value.into_owned()))
        .collect();
    player
        .query_pairs_mut()
        .clear()
        .extend_pairs(kept)
        .append_pair("parent", host);
    player.to_string()
}
