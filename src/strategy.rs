use crate::{plugins, GeneralStrategy, ScrapingOptions, Summary, SummaryError};
use async_trait::async_trait;
use std::sync::Arc;
use url::Url;

/// A site-specific way of summarizing URLs.
///
/// `matches` must look only at the URL's structure and never perform I/O.
/// `summarize` returns `Ok(None)` when the resource has nothing worth
/// summarizing; that is not an error.
#[async_trait]
pub trait Strategy: Send + Sync {
    fn name(&self) -> &'static str;

    fn matches(&self, url: &Url) -> bool;

    async fn summarize(
        &self,
        url: &Url,
        options: &ScrapingOptions,
    ) -> Result<Option<Summary>, SummaryError>;
}

/// Ordered strategies plus the generic fallback. Read-only once built.
#[derive(Clone)]
pub struct StrategyRegistry {
    strategies: Vec<Arc<dyn Strategy>>,
    fallback: Arc<dyn Strategy>,
}

impl Default for StrategyRegistry {
    fn default() -> Self {
        Self::builtin()
    }
}

impl StrategyRegistry {
    /// A registry where everything goes to the generic extractor.
    pub fn empty() -> Self {
        Self {
            strategies: Vec::new(),
            fallback: Arc::new(GeneralStrategy),
        }
    }

    pub fn builtin() -> Self {
        plugins::builtin()
            .into_iter()
            .fold(Self::empty(), |registry, strategy| registry.with(strategy))
    }

    pub fn with(mut self, strategy: Arc<dyn Strategy>) -> Self {
        self.strategies.push(strategy);
        self
    }

    pub fn names(&self) -> Vec<&'static str> {
        self.strategies.iter().map(|s| s.name()).collect()
    }

    /// First registered strategy whose predicate holds, then `extra` in order,
    /// else the generic fallback. Exactly one strategy is ever returned.
    pub fn select(&self, url: &Url, extra: &[Arc<dyn Strategy>]) -> Arc<dyn Strategy> {
        self.strategies
            .iter()
            .chain(extra.iter())
            .find(|strategy| strategy.matches(url))
            .unwrap_or(&self.fallback)
            .clone()
    }
}
