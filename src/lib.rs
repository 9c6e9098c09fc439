mod error;
mod extractor;
mod fetcher;
mod general;
#[cfg(feature = "logging")]
mod logging;
mod options;
pub mod plugins;
mod redirect;
#[cfg(feature = "server")]
pub mod server;
mod strategy;
mod summarizer;
mod utils;

pub use error::SummaryError;
pub use extractor::MetadataExtractor;
pub use fetcher::{FetchResult, Fetcher, FetcherConfig, ACCEPT_HTML, MAX_REDIRECTS};
pub use general::{fetch_page, general, parse_general, GeneralStrategy};
#[cfg(feature = "logging")]
pub use logging::{log_error_card, log_summary_card, setup_logging, LogConfig};
pub use options::{
    AgentConfig, ScrapingOptions, SummaryOptions, DEFAULT_BOT_UA, DEFAULT_OPERATION_TIMEOUT,
    DEFAULT_RESPONSE_TIMEOUT,
};
pub use redirect::resolve_redirects;
pub use strategy::{Strategy, StrategyRegistry};
pub use summarizer::{summarize, Diagnostics, SummaryReport, Summarizer};
pub use utils::{embed_host, DEFAULT_EMBED_HOST};

/// Embeddable media advertised by the page.
#[derive(Debug, Clone, Default, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct Player {
    pub url: Option<String>,
    pub width: Option<u32>,
    pub height: Option<u32>,
    pub allow: Vec<String>,
}

/// What a strategy derives from a resource. Every field may be absent.
#[derive(Debug, Clone, Default, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Summary {
    pub title: Option<String>,
    pub icon: Option<String>,
    pub description: Option<String>,
    pub thumbnail: Option<String>,
    pub player: Player,
    pub sitename: Option<String>,
    pub activity_pub: Option<String>,
    pub fediverse_creator: Option<String>,
}

/// A summary stamped with the URL that was actually summarized.
#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct SummaryResult {
    #[serde(flatten)]
    pub summary: Summary,
    pub url: String,
}

impl std::ops::Deref for SummaryResult {
    type Target = Summary;

    fn deref(&self) -> &Summary {
        &self.summary
    }
}
