use crate::strategy::Strategy;
use std::sync::Arc;
use std::time::Duration;

pub const DEFAULT_RESPONSE_TIMEOUT: Duration = Duration::from_secs(20);
pub const DEFAULT_OPERATION_TIMEOUT: Duration = Duration::from_secs(60);
pub const DEFAULT_BOT_UA: &str = concat!(
    "Mozilla/5.0 (compatible; UrlSummaryBot/",
    env!("CARGO_PKG_VERSION"),
    ")"
);

/// Transport settings handed to every Fetch Client explicitly.
///
/// Clients are built per call, so there is no idle pool to tune here.
#[derive(Debug, Clone, Default)]
pub struct AgentConfig {
    /// Proxy for every scheme, e.g. `http://proxy.internal:3128`.
    pub proxy: Option<String>,
}

/// Caller-facing options for a single summarize call.
///
/// # Examples
/// ```ignore
/// let options = SummaryOptions::default()
///     .with_lang("ja-JP")
///     .with_content_length_limit(1024 * 1024)
///     .with_request_id("3f1c...");
/// ```
#[derive(Clone)]
pub struct SummaryOptions {
    pub lang: Option<String>,
    pub follow_redirects: bool,
    /// Appended after the built-in strategies for this call only.
    pub plugins: Vec<Arc<dyn Strategy>>,
    pub agent: AgentConfig,
    pub user_agent: Option<String>,
    pub response_timeout: Option<Duration>,
    pub operation_timeout: Option<Duration>,
    pub content_length_limit: Option<u64>,
    pub content_length_required: bool,
    pub request_id: Option<String>,
}

impl Default for SummaryOptions {
    fn default() -> Self {
        Self {
            lang: None,
            follow_redirects: true,
            plugins: Vec::new(),
            agent: AgentConfig::default(),
            user_agent: None,
            response_timeout: None,
            operation_timeout: None,
            content_length_limit: None,
            content_length_required: false,
            request_id: None,
        }
    }
}

impl std::fmt::Debug for SummaryOptions {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let plugins: Vec<_> = self.plugins.iter().map(|p| p.name()).collect();
        f.debug_struct("SummaryOptions")
            .field("lang", &self.lang)
            .field("follow_redirects", &self.follow_redirects)
            .field("plugins", &plugins)
            .field("agent", &self.agent)
            .field("user_agent", &self.user_agent)
            .field("response_timeout", &self.response_timeout)
            .field("operation_timeout", &self.operation_timeout)
            .field("content_length_limit", &self.content_length_limit)
            .field("content_length_required", &self.content_length_required)
            .field("request_id", &self.request_id)
            .finish()
    }
}

impl SummaryOptions {
    pub fn with_lang(mut self, lang: impl Into<String>) -> Self {
        self.lang = Some(lang.into());
        self
    }

    pub fn with_follow_redirects(mut self, follow: bool) -> Self {
        self.follow_redirects = follow;
        self
    }

    pub fn with_plugin(mut self, plugin: Arc<dyn Strategy>) -> Self {
        self.plugins.push(plugin);
        self
    }

    pub fn with_agent(mut self, agent: AgentConfig) -> Self {
        self.agent = agent;
        self
    }

    pub fn with_user_agent(mut self, user_agent: impl Into<String>) -> Self {
        self.user_agent = Some(user_agent.into());
        self
    }

    pub fn with_response_timeout(mut self, timeout: Duration) -> Self {
        self.response_timeout = Some(timeout);
        self
    }

    pub fn with_operation_timeout(mut self, timeout: Duration) -> Self {
        self.operation_timeout = Some(timeout);
        self
    }

    pub fn with_content_length_limit(mut self, limit: u64) -> Self {
        self.content_length_limit = Some(limit);
        self
    }

    pub fn with_content_length_required(mut self, required: bool) -> Self {
        self.content_length_required = required;
        self
    }

    pub fn with_request_id(mut self, request_id: impl Into<String>) -> Self {
        self.request_id = Some(request_id.into());
        self
    }

    /// The immutable per-call view handed to strategies, with defaults filled in.
    pub fn scraping_options(&self) -> ScrapingOptions {
        ScrapingOptions {
            lang: self.lang.clone(),
            user_agent: self
                .user_agent
                .clone()
                .unwrap_or_else(|| DEFAULT_BOT_UA.to_string()),
            response_timeout: self.response_timeout.unwrap_or(DEFAULT_RESPONSE_TIMEOUT),
            operation_timeout: self.operation_timeout.unwrap_or(DEFAULT_OPERATION_TIMEOUT),
            follow_redirects: self.follow_redirects,
            content_length_limit: self.content_length_limit,
            content_length_required: self.content_length_required,
            request_id: self.request_id.clone(),
            agent: self.agent.clone(),
        }
    }
}

#[derive(Debug, Clone)]
pub struct ScrapingOptions {
    pub lang: Option<String>,
    pub user_agent: String,
    /// Bound for every single network phase.
    pub response_timeout: Duration,
    /// Bound for the whole request, start to end.
    pub operation_timeout: Duration,
    pub follow_redirects: bool,
    pub content_length_limit: Option<u64>,
    pub content_length_required: bool,
    pub request_id: Option<String>,
    pub agent: AgentConfig,
}

impl Default for ScrapingOptions {
    fn default() -> Self {
        SummaryOptions::default().scraping_options()
    }
}
