use scraper::{Html, Selector};
use tracing::warn;

use crate::{Error, Result};

const CITATION_SELECTOR: &str = "cite";

/// Returns the 1-based rank of `site` among the citations of a listing-style result page,
/// or `None` if the site isn't on the page.
///
/// Broken markup never fails here: whatever `scraper` manages to recover is ranked, and a
/// page it can't make sense of simply has no citations.
pub fn find_rank(html: &str, site: &str) -> Option<usize> {
    rank_of(&ranked_sites(html), site)
}

/// The ordered site identifiers of every citation on the page.
pub fn ranked_sites(html: &str) -> Vec<String> {
    match parse_citations(html) {
        Ok(citations) => citations.iter().map(|c| site_from_citation(c)).collect(),
        Err(e) => {
            warn!("couldn't extract citations: {e}");
            Vec::new()
        }
    }
}

/// First exact match wins, ranks start at 1.
pub fn rank_of(sites: &[String], site: &str) -> Option<usize> {
    sites.iter().position(|s| s == site).map(|idx| idx + 1)
}

/// Text content of every `<cite>` element, in document order.
fn parse_citations(html: &str) -> Result<Vec<String>> {
    let doc = Html::parse_document(html);
    let selector = create_selector(CITATION_SELECTOR)?;

    Ok(doc
        .select(&selector)
        .map(|el| el.text().collect::<String>())
        .collect())
}

/// Reduces a displayed citation to its host-like token.
///
/// `"example.com › Blog › Post"` and `"example.com/blog/post"` both become `"example.com"`.
/// Whitespace separators take priority over `/`.
pub fn site_from_citation(citation: &str) -> String {
    let citation = citation.trim();
    let citation = citation
        .strip_prefix("https://")
        .or_else(|| citation.strip_prefix("http://"))
        .unwrap_or(citation);

    let site = if citation.contains(char::is_whitespace) {
        citation.split(char::is_whitespace).next()
    } else {
        citation.split('/').next()
    };
    site.unwrap_or_default().to_string()
}

#[inline]
fn create_selector(sel_str: &str) -> Result<Selector> {
    Selector::parse(sel_str).map_err(|_| Error::ParseMissingSelector(sel_str.into()))
}
