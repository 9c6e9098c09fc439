use crate::{AgentConfig, ScrapingOptions, SummaryError};
use reqwest::header::{HeaderMap, ACCEPT, ACCEPT_LANGUAGE, CONTENT_LENGTH, CONTENT_TYPE};
use reqwest::{Client, Method, Response, StatusCode};
use std::time::Duration;
use tracing::{debug, instrument, warn};
use url::Url;

pub const ACCEPT_HTML: &str = "text/html,application/xhtml+xml";
pub const MAX_REDIRECTS: usize = 10;

/// Everything a single outbound request needs; nothing is read from ambient state.
///
/// # Examples
/// ```ignore
/// let config = FetcherConfig::from_options(&scraping_options)
///     .with_accept("application/json");
/// let fetcher = Fetcher::new_with_config(config)?;
/// let result = fetcher.get(&url).await?;
/// ```
#[derive(Debug, Clone)]
pub struct FetcherConfig {
    pub user_agent: String,
    pub lang: Option<String>,
    pub accept: String,
    pub response_timeout: Duration,
    pub operation_timeout: Duration,
    pub follow_redirects: bool,
    pub content_length_limit: Option<u64>,
    pub content_length_required: bool,
    pub agent: AgentConfig,
}

impl Default for FetcherConfig {
    fn default() -> Self {
        Self::from_options(&ScrapingOptions::default())
    }
}

impl FetcherConfig {
    pub fn from_options(opts: &ScrapingOptions) -> Self {
        Self {
            user_agent: opts.user_agent.clone(),
            lang: opts.lang.clone(),
            accept: ACCEPT_HTML.to_string(),
            response_timeout: opts.response_timeout,
            operation_timeout: opts.operation_timeout,
            follow_redirects: opts.follow_redirects,
            content_length_limit: opts.content_length_limit,
            content_length_required: opts.content_length_required,
            agent: opts.agent.clone(),
        }
    }

    pub fn with_accept(mut self, accept: impl Into<String>) -> Self {
        self.accept = accept.into();
        self
    }

    pub fn with_follow_redirects(mut self, follow: bool) -> Self {
        self.follow_redirects = follow;
        self
    }
}

#[derive(Debug, Clone)]
pub struct FetchResult {
    /// Final URL after any redirects the client followed.
    pub url: Url,
    pub status: StatusCode,
    pub headers: HeaderMap,
    pub body: Vec<u8>,
}

impl FetchResult {
    pub fn content_type(&self) -> Option<&str> {
        self.headers.get(CONTENT_TYPE).and_then(|v| v.to_str().ok())
    }

    pub fn text(&self) -> String {
        String::from_utf8_lossy(&self.body).into_owned()
    }
}

#[derive(Clone)]
pub struct Fetcher {
    client: Client,
    config: FetcherConfig,
}

impl Fetcher {
    pub fn from_options(opts: &ScrapingOptions) -> Result<Self, SummaryError> {
        Self::new_with_config(FetcherConfig::from_options(opts))
    }

    pub fn new_with_config(config: FetcherConfig) -> Result<Self, SummaryError> {
        let redirect_policy = if config.follow_redirects {
            reqwest::redirect::Policy::limited(MAX_REDIRECTS)
        } else {
            reqwest::redirect::Policy::none()
        };

        // connect_timeout covers lookup, connect and the TLS handshake;
        // read_timeout covers the first byte and every idle gap after it.
        let mut builder = Client::builder()
            .user_agent(config.user_agent.as_str())
            .connect_timeout(config.response_timeout)
            .read_timeout(config.response_timeout)
            .timeout(config.operation_timeout)
            .redirect(redirect_policy)
            .http1_only();

        if let Some(proxy) = &config.agent.proxy {
            let proxy =
                reqwest::Proxy::all(proxy).map_err(|e| SummaryError::InvalidAgent(e.to_string()))?;
            builder = builder.proxy(proxy);
        }

        let client = builder
            .build()
            .map_err(|e| SummaryError::InvalidAgent(e.to_string()))?;

        Ok(Self { client, config })
    }

    pub fn config(&self) -> &FetcherConfig {
        &self.config
    }

    /// GET with the content-length policy enforced on both the declared and the observed size.
    #[instrument(level = "debug", skip(self, url), fields(url = %url), err)]
    pub async fn get(&self, url: &Url) -> Result<FetchResult, SummaryError> {
        let mut response = self.send(Method::GET, url).await?;

        check_content_length(
            response.headers(),
            self.config.content_length_limit,
            self.config.content_length_required,
            url,
        )?;

        let final_url = response.url().clone();
        let status = response.status();
        let headers = response.headers().clone();

        let mut body = Vec::new();
        while let Some(chunk) = response
            .chunk()
            .await
            .map_err(|e| SummaryError::transport(url.as_str(), e))?
        {
            body.extend_from_slice(&chunk);
            if let Some(limit) = self.config.content_length_limit {
                if body.len() as u64 > limit {
                    warn!(url = %url, limit, "Body grew past the content length limit");
                    return Err(SummaryError::ContentLengthExceeded {
                        limit,
                        actual: body.len() as u64,
                    });
                }
            }
        }

        debug!(url = %final_url, status = %status, content_length = body.len(), "Fetched resource");
        Ok(FetchResult {
            url: final_url,
            status,
            headers,
            body,
        })
    }

    /// Header-only probe; the body is never read.
    #[instrument(level = "debug", skip(self, url), fields(url = %url), err)]
    pub async fn head(&self, url: &Url) -> Result<FetchResult, SummaryError> {
        let response = self.send(Method::HEAD, url).await?;

        Ok(FetchResult {
            url: response.url().clone(),
            status: response.status(),
            headers: response.headers().clone(),
            body: Vec::new(),
        })
    }

    async fn send(&self, method: Method, url: &Url) -> Result<Response, SummaryError> {
        let mut request = self
            .client
            .request(method, url.clone())
            .header(ACCEPT, self.config.accept.as_str());
        if let Some(lang) = &self.config.lang {
            request = request.header(ACCEPT_LANGUAGE, lang.as_str());
        }

        // Headers must arrive within one response timeout.
        let response = tokio::time::timeout(self.config.response_timeout, request.send())
            .await
            .map_err(|_| SummaryError::Timeout {
                url: url.to_string(),
                message: format!(
                    "no response within {} ms",
                    self.config.response_timeout.as_millis()
                ),
            })?
            .map_err(|e| SummaryError::transport(url.as_str(), e))?;

        let status = response.status();
        if !status.is_success() && !status.is_redirection() {
            return Err(SummaryError::BadStatus {
                url: url.to_string(),
                status: status.as_u16(),
            });
        }

        Ok(response)
    }
}

fn declared_content_length(headers: &HeaderMap) -> Option<u64> {
    headers
        .get(CONTENT_LENGTH)
        .and_then(|v| v.to_str().ok())
        .and_then(|v| v.trim().parse().ok())
}

pub(crate) fn check_content_length(
    headers: &HeaderMap,
    limit: Option<u64>,
    required: bool,
    url: &Url,
) -> Result<(), SummaryError> {
    let declared = declared_content_length(headers);

    match (declared, limit) {
        (None, _) if required => Err(SummaryError::ContentLengthRequired(url.to_string())),
        (Some(actual), Some(limit)) if actual > limit => {
            Err(SummaryError::ContentLengthExceeded { limit, actual })
        }
        _ => Ok(()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use reqwest::header::HeaderValue;

    fn headers_with_length(length: Option<&'static str>) -> HeaderMap {
        let mut headers = HeaderMap::new();
        if let Some(length) = length {
            headers.insert(CONTENT_LENGTH, HeaderValue::from_static(length));
        }
        headers
    }

    fn url() -> Url {
        Url::parse("https://example.com/page").unwrap()
    }

    #[test]
    fn test_declared_length_over_limit_is_rejected() {
        let result = check_content_length(&headers_with_length(Some("2048")), Some(1024), false, &url());
        assert!(matches!(
            result,
            Err(SummaryError::ContentLengthExceeded {
                limit: 1024,
                actual: 2048
            })
        ));
    }

    #[test]
    fn test_missing_length_only_fails_when_required() {
        assert!(check_content_length(&headers_with_length(None), Some(1024), false, &url()).is_ok());
        assert!(matches!(
            check_content_length(&headers_with_length(None), None, true, &url()),
            Err(SummaryError::ContentLengthRequired(_))
        ));
    }

    #[test]
    fn test_no_policy_accepts_anything() {
        assert!(check_content_length(&headers_with_length(Some("999999999")), None, false, &url()).is_ok());
        assert!(check_content_length(&headers_with_length(Some("not a number")), None, false, &url()).is_ok());
    }

    #[test]
    fn test_config_mirrors_scraping_options() {
        let opts = ScrapingOptions {
            lang: Some("en".into()),
            follow_redirects: false,
            content_length_limit: Some(10),
            ..ScrapingOptions::default()
        };
        let config = FetcherConfig::from_options(&opts);

        assert_eq!(config.accept, ACCEPT_HTML);
        assert_eq!(config.lang.as_deref(), Some("en"));
        assert!(!config.follow_redirects);
        assert_eq!(config.content_length_limit, Some(10));
    }

    #[test]
    fn test_agent_proxy_is_applied_to_the_client() {
        let with_proxy = |proxy: &str| FetcherConfig {
            agent: AgentConfig {
                proxy: Some(proxy.to_string()),
            },
            ..FetcherConfig::default()
        };

        assert!(Fetcher::new_with_config(with_proxy("http://proxy.internal:3128")).is_ok());
        assert!(matches!(
            Fetcher::new_with_config(with_proxy("ftp://proxy.internal")),
            Err(SummaryError::InvalidAgent(_))
        ));
    }
}
