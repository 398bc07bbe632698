//! Job-posting page fetcher.
//!
//! Fetches a page over HTTP and reduces it to the text of the job
//! description: known description containers first, then sections under
//! job-related headings, then the main content area, then the whole page.

use std::sync::LazyLock;
use std::time::Duration;

use reqwest::blocking::Client;
use reqwest::redirect;
use scraper::{ElementRef, Html, Selector};
use tracing::debug;

use super::PageFetcher;
use crate::error::{RecError, Result};

pub const DEFAULT_USER_AGENT: &str = "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36 \
     (KHTML, like Gecko) Chrome/124.0 Safari/537.36";

/// Characters of whole-page text kept when nothing more specific matched.
const PAGE_TEXT_LIMIT: usize = 2000;

const DESCRIPTION_SELECTORS: &[&str] = &[
    "div.description",
    "div.job-description",
    "#job-description",
    ".job-details",
    ".description",
    "[data-test=\"job-description\"]",
    "section.description",
    "div.details",
    ".details-pane",
    ".job-desc",
    ".show-more-less-html",
];

const HEADING_KEYWORDS: &[&str] = &[
    "responsibilities",
    "requirements",
    "qualifications",
    "about the job",
    "job summary",
    "what you'll do",
    "what we're looking for",
];

const SECTION_BREAKS: &[&str] = &["h1", "h2", "h3", "h4"];

fn selectors(sources: &[&str]) -> Vec<Selector> {
    sources.iter().filter_map(|s| Selector::parse(s).ok()).collect()
}

static DESCRIPTION: LazyLock<Vec<Selector>> = LazyLock::new(|| selectors(DESCRIPTION_SELECTORS));
static HEADINGS: LazyLock<Vec<Selector>> = LazyLock::new(|| selectors(&["h1, h2, h3, h4, strong"]));
static CONTENT: LazyLock<Vec<Selector>> =
    LazyLock::new(|| selectors(&["main", "article", "div.content"]));
static TITLE: LazyLock<Vec<Selector>> = LazyLock::new(|| selectors(&["title"]));
static BODY: LazyLock<Vec<Selector>> = LazyLock::new(|| selectors(&["body"]));

/// HTTP fetcher with a bounded timeout and a browser-like user agent.
pub struct HttpPageFetcher {
    client: Client,
}

impl HttpPageFetcher {
    pub fn new(timeout: Duration, user_agent: &str) -> Result<Self> {
        let client = Client::builder()
            .redirect(redirect::Policy::limited(5))
            .timeout(timeout)
            .user_agent(user_agent)
            .build()
            .map_err(|err| RecError::Config(format!("page fetch http client: {err}")))?;
        Ok(Self { client })
    }
}

impl PageFetcher for HttpPageFetcher {
    fn fetch_text(&self, url: &str) -> Result<String> {
        if !(url.starts_with("http://") || url.starts_with("https://")) {
            return Err(RecError::InputError(format!("not an http(s) url: {url}")));
        }

        let response = self
            .client
            .get(url)
            .send()
            .map_err(|err| RecError::InputError(format!("could not fetch {url}: {err}")))?;
        if !response.status().is_success() {
            return Err(RecError::InputError(format!(
                "could not fetch {url}: HTTP {}",
                response.status()
            )));
        }
        let html = response
            .text()
            .map_err(|err| RecError::InputError(format!("could not read {url}: {err}")))?;

        let text = extract_posting_text(&html);
        if text.trim().is_empty() {
            return Err(RecError::InputError(format!("no readable text at {url}")));
        }
        debug!(url, chars = text.chars().count(), "fetched job posting");
        Ok(text)
    }
}

/// Reduce an HTML document to the text of its job description.
pub fn extract_posting_text(html: &str) -> String {
    let document = Html::parse_document(html);

    for selector in DESCRIPTION.iter() {
        if let Some(elem) = document.select(selector).next() {
            let text = element_lines(elem);
            if !text.is_empty() {
                return text;
            }
        }
    }

    if let Some(text) = heading_sections(&document) {
        return text;
    }

    for selector in CONTENT.iter() {
        if let Some(elem) = document.select(selector).next() {
            let text = element_lines(elem);
            if !text.is_empty() {
                return text;
            }
        }
    }

    let title = first_match(&document, &TITLE)
        .map(|elem| compact_ws(&text_content(elem)))
        .filter(|t| !t.is_empty())
        .unwrap_or_else(|| "Job Listing".to_string());
    let body = first_match(&document, &BODY)
        .map(|elem| compact_ws(&text_content(elem)))
        .unwrap_or_default();
    let body: String = body.chars().take(PAGE_TEXT_LIMIT).collect();
    format!("{title}\n{body}").trim().to_string()
}

/// Text of the siblings following the first job-related heading, up to the
/// next section heading.
fn heading_sections(document: &Html) -> Option<String> {
    for selector in HEADINGS.iter() {
        for heading in document.select(selector) {
            let heading_text = text_content(heading).to_lowercase();
            if !HEADING_KEYWORDS.iter().any(|k| heading_text.contains(k)) {
                continue;
            }

            let lines: Vec<String> = heading
                .next_siblings()
                .filter_map(ElementRef::wrap)
                .take_while(|elem| !SECTION_BREAKS.contains(&elem.value().name()))
                .map(|elem| compact_ws(&text_content(elem)))
                .filter(|line| !line.is_empty())
                .collect();
            if !lines.is_empty() {
                return Some(lines.join("\n"));
            }
        }
    }
    None
}

fn first_match<'a>(document: &'a Html, selectors: &[Selector]) -> Option<ElementRef<'a>> {
    selectors
        .iter()
        .find_map(|selector| document.select(selector).next())
}

/// One line per non-empty text node, whitespace compacted.
fn element_lines(elem: ElementRef<'_>) -> String {
    elem.text()
        .map(compact_ws)
        .filter(|line| !line.is_empty())
        .collect::<Vec<_>>()
        .join("\n")
}

fn text_content(elem: ElementRef<'_>) -> String {
    elem.text().collect::<Vec<_>>().join(" ")
}

fn compact_ws(text: &str) -> String {
    text.split_whitespace().collect::<Vec<_>>().join(" ")
}
