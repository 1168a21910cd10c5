//! download
//!
//! Adapter for upstreams with no API at all: a plain HTML download page.
//!
//! # Design
//!
//! The page is fetched and every anchor with a resolvable target and a
//! direct text node becomes an entry in a [`LinkMap`], keyed by the
//! anchor's literal text. Relative targets are resolved against the page's
//! own URL.
//!
//! Anchors wrapping nested markup instead of a text node, and anchors whose
//! target does not resolve, are skipped silently. That leniency is
//! deliberate: download pages are messy, and a partial link map is more
//! useful than a parse error.

use regex::Regex;
use reqwest::Client;
use url::Url;

use crate::http;
use crate::traits::ForgeError;

/// Mapping from anchor text to absolute URL, in document order.
///
/// Keys are not guaranteed unique on real pages; the last occurrence wins
/// for the value, while the entry keeps the position of its first
/// occurrence.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct LinkMap {
    entries: Vec<(String, String)>,
}

impl LinkMap {
    /// Create an empty map.
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert a link, replacing the value of an existing key in place.
    pub fn insert(&mut self, text: impl Into<String>, url: impl Into<String>) {
        let text = text.into();
        let url = url.into();
        match self.entries.iter_mut().find(|(key, _)| *key == text) {
            Some(entry) => entry.1 = url,
            None => self.entries.push((text, url)),
        }
    }

    /// Look up a link by its anchor text.
    pub fn get(&self, text: &str) -> Option<&str> {
        self.entries
            .iter()
            .find(|(key, _)| key == text)
            .map(|(_, url)| url.as_str())
    }

    /// Number of links.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Whether the map is empty.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Iterate links in document order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> + '_ {
        self.entries
            .iter()
            .map(|(text, url)| (text.as_str(), url.as_str()))
    }
}

impl IntoIterator for LinkMap {
    type Item = (String, String);
    type IntoIter = std::vec::IntoIter<(String, String)>;

    fn into_iter(self) -> Self::IntoIter {
        self.entries.into_iter()
    }
}

/// Adapter for a plain HTML download page.
#[derive(Debug)]
pub struct DownloadPage {
    /// HTTP client for making requests
    client: Client,
    /// The page to scrape; also the base for resolving relative targets
    page_url: Url,
}

impl DownloadPage {
    /// Create a download-page adapter.
    ///
    /// # Errors
    ///
    /// `ForgeError::InvalidProject` if `page_url` is not an absolute URL.
    pub fn new(page_url: &str) -> Result<Self, ForgeError> {
        let page_url = Url::parse(page_url).map_err(|e| {
            ForgeError::InvalidProject(format!("'{}' is not a valid page URL: {}", page_url, e))
        })?;
        Ok(Self {
            client: Client::new(),
            page_url,
        })
    }

    /// Fetch the page and extract its links.
    ///
    /// # Errors
    ///
    /// `ForgeError::Http` if the page fetch returns non-2xx.
    pub async fn get_web_page_links(&self) -> Result<LinkMap, ForgeError> {
        let body = http::get_text(&self.client, self.page_url.as_str()).await?;
        Ok(extract_links(&self.page_url, &body))
    }
}

/// Extract every usable anchor from `body`, resolving targets against `base`.
///
/// An anchor is usable when its `href` resolves against the base URL and
/// its content is a direct text node (`[^<]` keeps anchors wrapping nested
/// markup out, matching the "no visible text node" skip rule).
fn extract_links(base: &Url, body: &str) -> LinkMap {
    let anchor = Regex::new(r#"(?is)<a\s[^>]*href\s*=\s*(?:"([^"]*)"|'([^']*)')[^>]*>([^<]*)</a>"#)
        .expect("valid anchor pattern");

    let mut links = LinkMap::new();
    for captures in anchor.captures_iter(body) {
        let href = captures
            .get(1)
            .or_else(|| captures.get(2))
            .map(|m| m.as_str())
            .unwrap_or_default();
        let text = captures.get(3).map(|m| m.as_str()).unwrap_or_default();

        if text.trim().is_empty() {
            continue;
        }
        let Ok(resolved) = base.join(href) else {
            continue;
        };
        links.insert(text, resolved.to_string());
    }
    links
}
