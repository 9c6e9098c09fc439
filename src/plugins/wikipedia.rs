use crate::utils::clip;
use crate::{Fetcher, FetcherConfig, ScrapingOptions, Strategy, Summary, SummaryError};
use async_trait::async_trait;
use serde::Deserialize;
use std::collections::HashMap;
use tracing::{debug, instrument};
use url::Url;

const WIKIPEDIA_ICON: &str = "https://wikipedia.org/static/favicon/wikipedia.ico";
const WIKIPEDIA_SITENAME: &str = "Wikipedia";
const DESCRIPTION_MAX_CHARS: usize = 300;

#[derive(Debug, Deserialize)]
struct ApiResponse {
    query: ApiQuery,
}

#[derive(Debug, Deserialize)]
struct ApiQuery {
    pages: HashMap<String, ApiPage>,
}

#[derive(Debug, Deserialize)]
struct ApiPage {
    title: String,
    #[serde(default)]
    extract: Option<String>,
    #[serde(default)]
    missing: Option<serde_json::Value>,
}

/// Article intros from the MediaWiki extracts API instead of the page markup.
#[derive(Debug, Clone, Copy, Default)]
pub struct WikipediaStrategy;

#[async_trait]
impl Strategy for WikipediaStrategy {
    fn name(&self) -> &'static str {
        "wikipedia"
    }

    fn matches(&self, url: &Url) -> bool {
        url.host_str()
            .is_some_and(|host| host == "wikipedia.org" || host.ends_with(".wikipedia.org"))
    }

    #[instrument(level = "debug", skip(self, url, options), fields(url = %url), err)]
    async fn summarize(
        &self,
        url: &Url,
        options: &ScrapingOptions,
    ) -> Result<Option<Summary>, SummaryError> {
        let lang = language(url, options);
        let Some(endpoint) = api_endpoint(url, &lang)? else {
            debug!("No article title in path");
            return Ok(None);
        };

        let fetcher =
            Fetcher::new_with_config(FetcherConfig::from_options(options).with_accept("application/json"))?;
        let response = fetcher.get(&endpoint).await?;

        let api: ApiResponse =
            serde_json::from_slice(&response.body).map_err(|e| SummaryError::ExternalServiceError {
                service: WIKIPEDIA_SITENAME.to_string(),
                message: e.to_string(),
            })?;

        let Some(page) = api.query.pages.into_values().next() else {
            return Ok(None);
        };
        if page.missing.is_some() {
            debug!(title = %page.title, "Article does not exist");
            return Ok(None);
        }

        Ok(Some(Summary {
            title: Some(page.title),
            icon: Some(WIKIPEDIA_ICON.to_string()),
            description: page
                .extract
                .map(|e| e.trim().to_string())
                .filter(|e| !e.is_empty())
                .map(|e| clip(&e, DESCRIPTION_MAX_CHARS)),
            thumbnail: Some(format!(
                "https://wikipedia.org/static/images/project-logos/{lang}wiki.png"
            )),
            sitename: Some(WIKIPEDIA_SITENAME.to_string()),
            ..Summary::default()
        }))
    }
}

/// `en.wikipedia.org` is English; the bare domain follows the caller's language.
fn language(url: &Url, options: &ScrapingOptions) -> String {
    let subdomain = url
        .host_str()
        .and_then(|host| host.strip_suffix(".wikipedia.org"))
        .and_then(|sub| sub.split('.').next());
    match subdomain {
        Some(sub) if sub != "www" && sub != "m" => sub.to_string(),
        _ => options
            .lang
            .as_deref()
            .and_then(|lang| lang.split(['-', '_', ',', ';']).next())
            .filter(|lang| !lang.is_empty())
            .unwrap_or("en")
            .to_ascii_lowercase(),
    }
}

fn api_endpoint(url: &Url, lang: &str) -> Result<Option<Url>, SummaryError> {
    let title = match url.path_segments().and_then(|mut segments| segments.nth(1)) {
        Some(raw) if !raw.is_empty() => urlencoding::decode(raw)
            .map(|decoded| decoded.into_owned())
            .unwrap_or_else(|_| raw.to_string()),
        _ => return Ok(None),
    };

    let mut endpoint = if matches!(url.host_str(), Some("wikipedia.org") | Some("www.wikipedia.org")) {
        Url::parse(&format!("https://{lang}.wikipedia.org/w/api.php"))?
    } else {
        url.join("/w/api.php")?
    };

    endpoint
        .query_pairs_mut()
        .clear()
        .append_pair("format", "json")
        .append_pair("action", "query")
        .append_pair("prop", "extracts")
        .append_pair("exintro", "")
        .append_pair("explaintext", "")
        .append_pair("titles", &title);
    Ok(Some(endpoint))
}
