use crate::{
    resolve_redirects, Strategy, StrategyRegistry, SummaryError, SummaryOptions, SummaryResult,
};
use std::sync::Arc;
use tracing::{debug, instrument};
use url::Url;

/// Context of one summarize call, available whether it succeeded or not.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Diagnostics {
    pub request_id: Option<String>,
    pub requested_url: String,
    /// The URL handed to the strategy, once known.
    pub resolved_url: Option<String>,
    pub strategy: Option<&'static str>,
    /// Why redirect resolution was skipped over, if it failed.
    pub redirect_error: Option<String>,
}

#[derive(Debug)]
pub struct SummaryReport {
    pub diagnostics: Diagnostics,
    pub result: Result<SummaryResult, SummaryError>,
}

impl SummaryReport {
    pub fn into_result(self) -> Result<SummaryResult, SummaryError> {
        self.result
    }
}

/// Resolves redirects, dispatches to exactly one strategy and stamps the
/// resolved URL on the result.
#[derive(Clone, Default)]
pub struct Summarizer {
    registry: StrategyRegistry,
}

impl Summarizer {
    /// Built-in strategies, generic fallback.
    pub fn new() -> Self {
        Self::with_registry(StrategyRegistry::builtin())
    }

    pub fn with_registry(registry: StrategyRegistry) -> Self {
        Self { registry }
    }

    /// Appends a strategy after the ones already registered.
    pub fn with_plugin(mut self, plugin: Arc<dyn Strategy>) -> Self {
        self.registry = self.registry.with(plugin);
        self
    }

    pub fn registry(&self) -> &StrategyRegistry {
        &self.registry
    }

    pub async fn summarize(
        &self,
        url: &str,
        options: SummaryOptions,
    ) -> Result<SummaryResult, SummaryError> {
        self.summarize_with_report(url, options).await.into_result()
    }

    #[instrument(level = "debug", skip(self, options), fields(request_id = ?options.request_id))]
    pub async fn summarize_with_report(&self, url: &str, options: SummaryOptions) -> SummaryReport {
        let scraping = options.scraping_options();
        let mut diagnostics = Diagnostics {
            request_id: scraping.request_id.clone(),
            requested_url: url.to_string(),
            ..Diagnostics::default()
        };

        let input = match Url::parse(url) {
            Ok(input) => input,
            Err(e) => {
                return SummaryReport {
                    diagnostics,
                    result: Err(e.into()),
                }
            }
        };

        let (actual, actual_url) = if scraping.follow_redirects {
            match resolve_redirects(&input, &scraping).await {
                Ok(resolved) if resolved != input => {
                    let resolved_url = resolved.to_string();
                    (resolved, resolved_url)
                }
                Ok(_) => (input, url.to_string()),
                Err(e) => {
                    debug!(error = %e, "Redirect resolution failed, keeping the original URL");
                    diagnostics.redirect_error = Some(e.to_string());
                    (input, url.to_string())
                }
            }
        } else {
            (input, url.to_string())
        };
        diagnostics.resolved_url = Some(actual_url.clone());

        let strategy = self.registry.select(&actual, &options.plugins);
        diagnostics.strategy = Some(strategy.name());
        debug!(url = %actual_url, strategy = strategy.name(), "Dispatching");

        let result = match strategy.summarize(&actual, &scraping).await {
            Ok(Some(summary)) => Ok(SummaryResult {
                summary,
                url: actual_url,
            }),
            Ok(None) => Err(SummaryError::SummarizationFailed(actual_url)),
            Err(e) => Err(e),
        };

        SummaryReport {
            diagnostics,
            result,
        }
    }
}

/// Summarize `url` with the built-in strategies.
pub async fn summarize(url: &str, options: SummaryOptions) -> Result<SummaryResult, SummaryError> {
    Summarizer::new().summarize(url, options).await
}
