use crate::{fetch_page, parse_general, ScrapingOptions, Strategy, Summary, SummaryError};
use async_trait::async_trait;
use url::Url;

/// Bare `youtube.com` and `youtu.be` links, fetched from the canonical watch page.
#[derive(Debug, Clone, Copy, Default)]
pub struct YoutubeStrategy;

#[async_trait]
impl Strategy for YoutubeStrategy {
    fn name(&self) -> &'static str {
        "youtube"
    }

    fn matches(&self, url: &Url) -> bool {
        matches!(url.host_str(), Some("youtube.com") | Some("youtu.be"))
    }

    async fn summarize(
        &self,
        url: &Url,
        options: &ScrapingOptions,
    ) -> Result<Option<Summary>, SummaryError> {
        let canonical = canonical_url(url)?;
        let page = fetch_page(&canonical, options).await?;
        Ok(parse_general(url, &page))
    }
}

fn canonical_url(url: &Url) -> Result<Url, SummaryError> {
    let canonical = match url.host_str() {
        Some("youtu.be") => {
            let video_id = url.path().trim_start_matches('/');
            let mut watch = Url::parse("https://www.youtube.com/watch")?;
            watch.query_pairs_mut().append_pair("v", video_id);
            watch
        }
        Some("youtube.com") => {
            let mut www = Url::parse("https://www.youtube.com")?;
            www.set_path(url.path());
            www.set_query(url.query());
            www
        }
        _ => url.clone(),
    };
    Ok(canonical)
}
