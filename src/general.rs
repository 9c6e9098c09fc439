use crate::{
    FetchResult, Fetcher, MetadataExtractor, ScrapingOptions, Strategy, Summary, SummaryError,
};
use async_trait::async_trait;
use tracing::{debug, instrument};
use url::Url;

const ALLOWED_CONTENT_TYPES: &[&str] = &["text/html", "application/xhtml+xml"];

/// The default strategy: fetch the page and read its generic metadata.
#[derive(Debug, Clone, Copy, Default)]
pub struct GeneralStrategy;

#[async_trait]
impl Strategy for GeneralStrategy {
    fn name(&self) -> &'static str {
        "general"
    }

    fn matches(&self, _url: &Url) -> bool {
        true
    }

    async fn summarize(
        &self,
        url: &Url,
        options: &ScrapingOptions,
    ) -> Result<Option<Summary>, SummaryError> {
        general(url, options).await
    }
}

#[instrument(level = "debug", skip(url, options), fields(url = %url, request_id = ?options.request_id))]
pub async fn general(url: &Url, options: &ScrapingOptions) -> Result<Option<Summary>, SummaryError> {
    let page = fetch_page(url, options).await?;
    Ok(parse_general(url, &page))
}

/// Fetch a markup page under the caller's limits, rejecting non-markup content types.
pub async fn fetch_page(url: &Url, options: &ScrapingOptions) -> Result<FetchResult, SummaryError> {
    let fetcher = Fetcher::from_options(options)?;
    let page = fetcher.get(url).await?;

    if let Some(content_type) = page.content_type() {
        let mime = content_type
            .split(';')
            .next()
            .unwrap_or_default()
            .trim()
            .to_ascii_lowercase();
        if !ALLOWED_CONTENT_TYPES.contains(&mime.as_str()) {
            return Err(SummaryError::InvalidContentType(content_type.to_string()));
        }
    }

    Ok(page)
}

/// `None` when the page yields no usable title.
pub fn parse_general(url: &Url, page: &FetchResult) -> Option<Summary> {
    let summary = MetadataExtractor::new().extract(&page.text(), url);
    if summary.title.is_none() {
        debug!(url = %url, "No title found, nothing to summarize");
        return None;
    }
    Some(summary)
}
