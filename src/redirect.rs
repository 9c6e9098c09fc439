use crate::{Fetcher, FetcherConfig, ScrapingOptions, SummaryError};
use tracing::{debug, instrument};
use url::Url;

/// Probe `url` with a header-only request and report where the server sends it.
///
/// The probe shares the caller's language, user agent and both timeout
/// budgets, never retries, and never reads a body, so the content-length
/// policy is left to the extraction fetch. Any failure is returned as-is;
/// the caller decides whether to absorb it.
#[instrument(level = "debug", skip(url, options), fields(url = %url), err)]
pub async fn resolve_redirects(url: &Url, options: &ScrapingOptions) -> Result<Url, SummaryError> {
    let mut config = FetcherConfig::from_options(options).with_follow_redirects(true);
    config.content_length_limit = None;
    config.content_length_required = false;

    let fetcher = Fetcher::new_with_config(config)?;
    let probe = fetcher.head(url).await?;

    if probe.url != *url {
        debug!(from = %url, to = %probe.url, "Followed redirect");
    }
    Ok(probe.url)
}
