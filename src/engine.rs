//! Search engine variants.
//!
//! Every engine is a pair of capabilities: building the query URL for a keyword at a
//! result offset, and ranking the target site on a returned page. The engine is chosen
//! once, when the session is built.

use crate::{parse, Error, Result};

pub const KEYWORD_SLOT: &str = "{keyword}";
pub const POSITION_SLOT: &str = "{position}";

pub trait SearchEngine: Send + Sync {
    /// URL template containing both [`KEYWORD_SLOT`] and [`POSITION_SLOT`].
    fn template(&self) -> &str;

    /// Ranks `site` on one result page. `None` means it's not on this page.
    fn parse(&self, html: &str, site: &str) -> Option<usize>;

    fn build_url(&self, keyword: &str, offset: usize) -> String {
        fill_template(self.template(), keyword, offset)
    }

    /// Checks the template once, before anything is fetched.
    fn validate(&self) -> Result<()> {
        validate_template(self.template())
    }
}

pub fn validate_template(template: &str) -> Result<()> {
    for slot in [KEYWORD_SLOT, POSITION_SLOT] {
        if !template.contains(slot) {
            return Err(Error::MissingTemplateSlot {
                template: template.to_string(),
                slot,
            });
        }
    }
    Ok(())
}

fn fill_template(template: &str, keyword: &str, offset: usize) -> String {
    template
        .replace(KEYWORD_SLOT, &urlencoding::encode(keyword))
        .replace(POSITION_SLOT, &offset.to_string())
}

#[derive(Debug, Clone, Copy, Default)]
pub struct Google;

impl Google {
    pub const TEMPLATE: &'static str = "https://www.google.com/search?q={keyword}&start={position}";
}

impl SearchEngine for Google {
    fn template(&self) -> &str {
        Self::TEMPLATE
    }

    fn parse(&self, html: &str, site: &str) -> Option<usize> {
        parse::find_rank(html, site)
    }
}

/// Any engine whose result pages list results as `<cite>` citations, addressed through a
/// caller supplied URL template.
#[derive(Debug, Clone)]
pub struct TemplateEngine {
    template: String,
}

impl TemplateEngine {
    pub fn new(template: impl Into<String>) -> Self {
        Self {
            template: template.into(),
        }
    }
}

impl SearchEngine for TemplateEngine {
    fn template(&self) -> &str {
        &self.template
    }

    fn parse(&self, html: &str, site: &str) -> Option<usize> {
        parse::find_rank(html, site)
    }
}

/// Engine selection as it comes from configuration.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum EngineKind {
    #[default]
    Google,
    Template(String),
}

impl EngineKind {
    pub fn build(&self) -> Box<dyn SearchEngine> {
        match self {
            EngineKind::Google => Box::new(Google),
            EngineKind::Template(template) => Box::new(TemplateEngine::new(template.clone())),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn google_url() {
        assert_eq!(
            Google.build_url("rust lang", 20),
            "https://www.google.com/search?q=rust%20lang&start=20"
        );
    }

    #[test]
    fn keyword_is_encoded() {
        let engine = TemplateEngine::new("http://localhost/s?q={keyword}&p={position}");
        assert_eq!(
            engine.build_url("a&b=c", 0),
            "http://localhost/s?q=a%26b%3Dc&p=0"
        );
    }

    #[test]
    fn google_template_is_valid() {
        assert!(Google.validate().is_ok());
    }

    #[test]
    fn missing_keyword_slot() {
        let err = TemplateEngine::new("http://localhost/s?p={position}")
            .validate()
            .unwrap_err();
        assert!(matches!(
            err,
            Error::MissingTemplateSlot { slot: KEYWORD_SLOT, .. }
        ));
        assert!(err.is_configuration());
    }

    #[test]
    fn missing_position_slot() {
        let err = TemplateEngine::new("http://localhost/s?q={keyword}")
            .validate()
            .unwrap_err();
        assert!(matches!(
            err,
            Error::MissingTemplateSlot { slot: POSITION_SLOT, .. }
        ));
    }

    #[test]
    fn kind_builds_engine() {
        let engine = EngineKind::Template("x/{keyword}/{position}".into()).build();
        assert_eq!(engine.build_url("k", 10), "x/k/10");
        assert_eq!(EngineKind::default().build().template(), Google::TEMPLATE);
    }
}
