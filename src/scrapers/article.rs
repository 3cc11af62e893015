//! Single-article fetcher.
//!
//! Downloads a page, strips non-printable characters from the markup, and
//! extracts a title plus paragraph text with `scraper`.

use reqwest::Client;
use scraper::{ElementRef, Html, Selector};
use unicode_general_category::{get_general_category, GeneralCategory};
use tracing::{debug, info, instrument};
use url::Url;

use crate::config::{HTTP_TIMEOUT, USER_AGENT};
use crate::errors::FetchError;
use crate::models::ArticleRecord;
use crate::utils::truncate_for_log;

/// Download and parse the article at `url`.
///
/// No retries: any network, HTTP status or extraction failure is returned
/// to the caller.
#[instrument(level = "info", skip_all, fields(%url))]
pub async fn fetch_article(url: &str) -> Result<ArticleRecord, FetchError> {
    let parsed = Url::parse(url).map_err(|source| FetchError::InvalidUrl {
        url: url.to_string(),
        source,
    })?;

    let client = Client::builder()
        .timeout(HTTP_TIMEOUT)
        .user_agent(USER_AGENT)
        .build()?;

    let html = client
        .get(parsed.as_str())
        .send()
        .await?
        .error_for_status()?
        .text()
        .await?;
    info!(bytes = html.len(), "Downloaded article markup");

    let cleaned = clean_html(&html);
    if cleaned.len() != html.len() {
        debug!(removed_bytes = html.len() - cleaned.len(), "Stripped non-printable characters");
    }

    parse_article(parsed.as_str(), cleaned)
}

/// Remove every character that is neither printable nor one of `\n`, `\t`, ` `.
///
/// NUL bytes, stray control characters, zero-width/format characters,
/// private-use and unassigned code points, and non-space separators would
/// otherwise trip up the markup parser.
///
/// # Examples
///
/// ```ignore
/// assert_eq!(clean_html("<p>a\u{0}b\r\n</p>"), "<p>ab\n</p>");
/// ```
pub fn clean_html(raw_html: &str) -> String {
    raw_html
        .chars()
        .filter(|&c| matches!(c, '\n' | '\t' | ' ') || is_printable(c))
        .collect()
}

/// Printable in the usual sense: not in a "Other" category (Cc, Cf, Cs,
/// Co, Cn) and not a separator (Zl, Zp, Zs) other than the plain space.
fn is_printable(c: char) -> bool {
    use GeneralCategory::*;
    match get_general_category(c) {
        Control | Format | Surrogate | PrivateUse | Unassigned => false,
        LineSeparator | ParagraphSeparator => false,
        SpaceSeparator => c == ' ',
        _ => true,
    }
}

/// Extract an [`ArticleRecord`] from already-cleaned markup.
///
/// Title precedence: `og:title`, `<title>`, first `<h1>`. Body: the `<p>`
/// elements inside `<article>` when they carry text, otherwise every `<p>`
/// on the page, joined by blank lines.
#[instrument(level = "debug", skip(html))]
pub fn parse_article(url: &str, html: String) -> Result<ArticleRecord, FetchError> {
    let document = Html::parse_document(&html);

    let title = extract_title(&document);
    let body_text = extract_body(&document);

    if title.is_empty() && body_text.is_empty() {
        return Err(FetchError::Empty(url.to_string()));
    }

    info!(
        title = %truncate_for_log(&title, 80),
        chars = body_text.chars().count(),
        "Parsed article"
    );
    Ok(ArticleRecord {
        title,
        body_text,
        raw_html: html,
    })
}

fn extract_title(document: &Html) -> String {
    let og_selector = Selector::parse(r#"meta[property="og:title"]"#).unwrap();
    let title_selector = Selector::parse("title").unwrap();
    let h1_selector = Selector::parse("h1").unwrap();

    let og = document
        .select(&og_selector)
        .filter_map(|el| el.value().attr("content"))
        .map(collapse_whitespace)
        .find(|t| !t.is_empty());
    if let Some(title) = og {
        return title;
    }

    document
        .select(&title_selector)
        .chain(document.select(&h1_selector))
        .map(element_text)
        .find(|t| !t.is_empty())
        .unwrap_or_default()
}

fn extract_body(document: &Html) -> String {
    let article_selector = Selector::parse("article p").unwrap();
    let paragraph_selector = Selector::parse("p").unwrap();

    let scoped = paragraphs(document.select(&article_selector));
    let paras = if scoped.is_empty() {
        paragraphs(document.select(&paragraph_selector))
    } else {
        scoped
    };
    paras.join("\n\n")
}

fn paragraphs<'a>(elements: impl Iterator<Item = ElementRef<'a>>) -> Vec<String> {
    elements
        .map(element_text)
        .filter(|t| !t.is_empty())
        .collect()
}

fn element_text(element: ElementRef<'_>) -> String {
    collapse_whitespace(&element.text().collect::<String>())
}

fn collapse_whitespace(s: &str) -> String {
    s.split_whitespace().collect::<Vec<_>>().join(" ")
}
