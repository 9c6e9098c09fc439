use crate::{general, ScrapingOptions, Strategy, Summary, SummaryError};
use async_trait::async_trait;
use url::Url;

/// Branch.io deep links serve an app interstitial unless asked for the web page.
#[derive(Debug, Clone, Copy, Default)]
pub struct BranchIoStrategy;

#[async_trait]
impl Strategy for BranchIoStrategy {
    fn name(&self) -> &'static str {
        "branchio-deeplinks"
    }

    fn matches(&self, url: &Url) -> bool {
        url.host_str()
            .is_some_and(|host| host.ends_with(".app.link") || host.ends_with(".test-app.link"))
    }

    async fn summarize(
        &self,
        url: &Url,
        options: &ScrapingOptions,
    ) -> Result<Option<Summary>, SummaryError> {
        general(&web_only(url), options).await
    }
}

fn web_only(url: &Url) -> Url {
    let mut web = url.clone();
    web.query_pairs_mut().append_pair("$web_only", "true");
    web
}
