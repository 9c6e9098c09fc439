use crate::utils::{clip, resolve_url};
use crate::{Player, Summary};
use scraper::{Html, Selector};
use tracing::debug;
use url::Url;

const TITLE_MAX_CHARS: usize = 100;
const DESCRIPTION_MAX_CHARS: usize = 300;

const TITLE_SELECTORS: &[&str] = &[
    "meta[property='og:title']",
    "meta[name='twitter:title'], meta[property='twitter:title']",
];
const DESCRIPTION_SELECTORS: &[&str] = &[
    "meta[property='og:description']",
    "meta[name='twitter:description'], meta[property='twitter:description']",
    "meta[name='description']",
];
const IMAGE_META_SELECTORS: &[&str] = &[
    "meta[property='og:image']",
    "meta[name='twitter:image'], meta[property='twitter:image']",
];
const IMAGE_LINK_SELECTORS: &[&str] = &[
    "link[rel='image_src']",
    "link[rel='apple-touch-icon']",
    "link[rel='apple-touch-icon image_src']",
];
const PLAYER_SELECTORS: &[&str] = &[
    "meta[name='twitter:player'], meta[property='twitter:player']",
    "meta[property='og:video:secure_url']",
    "meta[property='og:video:url']",
    "meta[property='og:video']",
];
const PLAYER_WIDTH_SELECTORS: &[&str] = &[
    "meta[name='twitter:player:width'], meta[property='twitter:player:width']",
    "meta[property='og:video:width']",
];
const PLAYER_HEIGHT_SELECTORS: &[&str] = &[
    "meta[name='twitter:player:height'], meta[property='twitter:player:height']",
    "meta[property='og:video:height']",
];
const ICON_SELECTORS: &[&str] = &["link[rel='icon']", "link[rel='shortcut icon']"];
const SITENAME_SELECTORS: &[&str] = &[
    "meta[property='og:site_name']",
    "meta[name='application-name']",
];

pub(crate) const PLAYER_ALLOW: &[&str] = &["autoplay", "encrypted-media", "fullscreen"];

/// Derives summary fields from markup, each field following its own fixed
/// priority across the competing metadata conventions.
#[derive(Clone)]
pub struct MetadataExtractor;

impl Default for MetadataExtractor {
    fn default() -> Self {
        Self::new()
    }
}

impl MetadataExtractor {
    pub fn new() -> Self {
        Self
    }

    /// Never fails; fields the page does not carry are left empty.
    pub fn extract(&self, html: &str, url: &Url) -> Summary {
        let document = Html::parse_document(html);

        let sitename = self.extract_site_name(&document, url);
        let title = self
            .extract_title(&document)
            .map(|t| strip_site_suffix(&t, sitename.as_deref()))
            .map(|t| clip(&t, TITLE_MAX_CHARS));
        let description = self
            .extract_description(&document)
            .map(|d| clip(&d, DESCRIPTION_MAX_CHARS))
            .filter(|d| Some(d) != title.as_ref());

        let summary = Summary {
            icon: self.extract_favicon(&document, url),
            description,
            thumbnail: self.extract_image(&document, url),
            player: self.extract_player(&document, url),
            sitename,
            activity_pub: self.extract_activity_pub(&document, url),
            fediverse_creator: first_attr(&document, &["meta[name='fediverse:creator']"], "content"),
            title,
        };

        debug!(url = %url, title = ?summary.title, "Extracted metadata");
        summary
    }

    fn extract_title(&self, document: &Html) -> Option<String> {
        // If there is no social-preview title, fall back to the regular title
        first_attr(document, TITLE_SELECTORS, "content").or_else(|| {
            let selector = Selector::parse("title").ok()?;
            document
                .select(&selector)
                .next()
                .map(|el| el.text().collect::<String>())
                .map(|s| s.trim().to_string())
                .filter(|s| !s.is_empty())
        })
    }

    fn extract_description(&self, document: &Html) -> Option<String> {
        first_attr(document, DESCRIPTION_SELECTORS, "content")
    }

    fn extract_image(&self, document: &Html, url: &Url) -> Option<String> {
        first_attr(document, IMAGE_META_SELECTORS, "content")
            .or_else(|| first_attr(document, IMAGE_LINK_SELECTORS, "href"))
            .and_then(|href| resolve_url(url, &href))
    }

    fn extract_player(&self, document: &Html, url: &Url) -> Player {
        let player_url =
            first_attr(document, PLAYER_SELECTORS, "content").and_then(|href| resolve_url(url, &href));

        let Some(player_url) = player_url else {
            return Player::default();
        };

        Player {
            url: Some(player_url),
            width: first_attr(document, PLAYER_WIDTH_SELECTORS, "content")
                .and_then(|w| w.parse().ok()),
            height: first_attr(document, PLAYER_HEIGHT_SELECTORS, "content")
                .and_then(|h| h.parse().ok()),
            allow: PLAYER_ALLOW.iter().map(|s| s.to_string()).collect(),
        }
    }

    fn extract_favicon(&self, document: &Html, url: &Url) -> Option<String> {
        first_attr(document, ICON_SELECTORS, "href")
            .and_then(|href| resolve_url(url, &href))
            .or_else(|| resolve_url(url, "/favicon.ico"))
    }

    fn extract_site_name(&self, document: &Html, url: &Url) -> Option<String> {
        first_attr(document, SITENAME_SELECTORS, "content").or_else(|| url.host_str().map(String::from))
    }

    fn extract_activity_pub(&self, document: &Html, url: &Url) -> Option<String> {
        first_attr(
            document,
            &["link[rel='alternate'][type='application/activity+json']"],
            "href",
        )
        .and_then(|href| resolve_url(url, &href))
    }
}

/// First non-empty, trimmed attribute value, walking the selectors in priority order.
fn first_attr(document: &Html, selectors: &[&str], attr: &str) -> Option<String> {
    selectors.iter().find_map(|raw| {
        let selector = Selector::parse(raw).ok()?;
        document
            .select(&selector)
            .filter_map(|el| el.value().attr(attr))
            .map(str::trim)
            .find(|v| !v.is_empty())
            .map(String::from)
    })
}

fn strip_site_suffix(title: &str, sitename: Option<&str>) -> String {
    let Some(sitename) = sitename.filter(|s| !s.is_empty()) else {
        return title.to_string();
    };
    for separator in [" - ", " | ", " – "] {
        if let Some(stripped) = title.strip_suffix(&format!("{separator}{sitename}")) {
            if !stripped.trim().is_empty() {
                return stripped.trim().to_string();
            }
        }
    }
    title.to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn page_url() -> Url {
        Url::parse("https://example.com/articles/1").unwrap()
    }

    #[test]
    fn test_social_title_wins_over_title_element() {
        let html = r#"<html><head>
            <title>Plain Title</title>
            <meta name="twitter:title" content="Twitter Title">
            <meta property="og:title" content="OG Title">
        </head></html>"#;

        let summary = MetadataExtractor::new().extract(html, &page_url());
        assert_eq!(summary.title.as_deref(), Some("OG Title"));
    }

    #[test]
    fn test_title_element_is_the_last_resort() {
        let html = "<html><head><title>  Plain &amp; Simple </title></head></html>";
        let summary = MetadataExtractor::new().extract(html, &page_url());
        assert_eq!(summary.title.as_deref(), Some("Plain & Simple"));

        let summary = MetadataExtractor::new().extract("<html><body>no head</body></html>", &page_url());
        assert_eq!(summary.title, None);
    }

    #[test]
    fn test_empty_tags_fall_through() {
        let html = r#"<html><head>
            <meta property="og:title" content="   ">
            <meta name="twitter:title" content="Twitter Title">
        </head></html>"#;

        let summary = MetadataExtractor::new().extract(html, &page_url());
        assert_eq!(summary.title.as_deref(), Some("Twitter Title"));
    }

    #[test]
    fn test_relative_urls_are_resolved() {
        let html = r#"<html><head>
            <title>t</title>
            <meta property="og:image" content="/img/cover.png">
            <link rel="icon" href="icons/fav.png">
        </head></html>"#;

        let summary = MetadataExtractor::new().extract(html, &page_url());
        assert_eq!(
            summary.thumbnail.as_deref(),
            Some("https://example.com/img/cover.png")
        );
        assert_eq!(
            summary.icon.as_deref(),
            Some("https://example.com/articles/icons/fav.png")
        );
    }

    #[test]
    fn test_icon_defaults_to_origin_favicon() {
        let summary = MetadataExtractor::new().extract("<title>t</title>", &page_url());
        assert_eq!(summary.icon.as_deref(), Some("https://example.com/favicon.ico"));
    }

    #[test]
    fn test_thumbnail_falls_back_to_link_tags() {
        let html = r#"<title>t</title><link rel="apple-touch-icon" href="https://cdn.example.com/touch.png">"#;
        let summary = MetadataExtractor::new().extract(html, &page_url());
        assert_eq!(
            summary.thumbnail.as_deref(),
            Some("https://cdn.example.com/touch.png")
        );
    }

    #[test]
    fn test_player_only_when_embeddable_media_present() {
        let summary = MetadataExtractor::new().extract("<title>t</title>", &page_url());
        assert_eq!(summary.player, Player::default());

        let html = r#"<title>t</title>
            <meta name="twitter:player" content="https://player.example.com/embed/1">
            <meta name="twitter:player:width" content="480">
            <meta name="twitter:player:height" content="not-a-number">"#;
        let summary = MetadataExtractor::new().extract(html, &page_url());
        assert_eq!(
            summary.player.url.as_deref(),
            Some("https://player.example.com/embed/1")
        );
        assert_eq!(summary.player.width, Some(480));
        assert_eq!(summary.player.height, None);
        assert_eq!(
            summary.player.allow,
            vec!["autoplay", "encrypted-media", "fullscreen"]
        );
    }

    #[test]
    fn test_og_video_is_used_when_no_twitter_player() {
        let html = r#"<title>t</title>
            <meta property="og:video" content="https://video.example.com/raw.mp4">
            <meta property="og:video:secure_url" content="https://video.example.com/secure.mp4">
            <meta property="og:video:width" content="1280">
            <meta property="og:video:height" content="720">"#;
        let summary = MetadataExtractor::new().extract(html, &page_url());
        assert_eq!(
            summary.player.url.as_deref(),
            Some("https://video.example.com/secure.mp4")
        );
        assert_eq!(summary.player.width, Some(1280));
        assert_eq!(summary.player.height, Some(720));
    }

    #[test]
    fn test_federation_hints() {
        let html = r#"<title>t</title>
            <link rel="alternate" type="application/activity+json" href="https://social.example/users/alice">
            <meta name="fediverse:creator" content="@alice@social.example">"#;
        let summary = MetadataExtractor::new().extract(html, &page_url());
        assert_eq!(
            summary.activity_pub.as_deref(),
            Some("https://social.example/users/alice")
        );
        assert_eq!(
            summary.fediverse_creator.as_deref(),
            Some("@alice@social.example")
        );

        let summary = MetadataExtractor::new().extract("<title>t</title>", &page_url());
        assert_eq!(summary.activity_pub, None);
        assert_eq!(summary.fediverse_creator, None);
    }

    #[test]
    fn test_sitename_priority_and_title_suffix() {
        let html = r#"<title>Release notes | Example News</title>
            <meta name="application-name" content="Example App">
            <meta property="og:site_name" content="Example News">"#;
        let summary = MetadataExtractor::new().extract(html, &page_url());
        assert_eq!(summary.sitename.as_deref(), Some("Example News"));
        assert_eq!(summary.title.as_deref(), Some("Release notes"));

        let summary = MetadataExtractor::new().extract("<title>t</title>", &page_url());
        assert_eq!(summary.sitename.as_deref(), Some("example.com"));
    }

    #[test]
    fn test_description_priority_and_clipping() {
        let long = "a".repeat(400);
        let html = format!(
            r#"<title>t</title>
            <meta name="description" content="plain">
            <meta property="og:description" content="{long}">"#
        );
        let summary = MetadataExtractor::new().extract(&html, &page_url());
        let description = summary.description.unwrap();
        assert_eq!(description.chars().count(), 301);
        assert!(description.ends_with('…'));

        let html = r#"<title>Same</title><meta name="description" content="Same">"#;
        let summary = MetadataExtractor::new().extract(html, &page_url());
        assert_eq!(summary.description, None);
    }
}
