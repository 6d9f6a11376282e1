//! Article field extraction
//!
//! Three fixed rules pull the headline, body and publish date out of an
//! article page. A field whose rule matches nothing is left empty; missing
//! fields are never an error.

use crate::config::ExtractConfig;
use crate::dom::{Document, Element};
use crate::ParseError;
use serde::Serialize;

/// Structured record extracted from one article page
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct Article {
    pub url: String,
    pub headline: String,
    pub content: String,
    pub published: String,
}

/// How a rule's class marker is compared against the `class` attribute
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ClassMatch {
    /// Attribute contains the marker as a substring
    Contains,
    /// Attribute equals the marker exactly
    Exact,
}

/// Selects elements by tag name and class marker
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClassRule {
    pub tag: String,
    pub class: String,
    pub mode: ClassMatch,
}

impl ClassRule {
    pub fn new(tag: &str, class: &str, mode: ClassMatch) -> Self {
        Self {
            tag: tag.to_string(),
            class: class.to_string(),
            mode,
        }
    }

    pub fn matches(&self, element: &Element) -> bool {
        if element.name() != self.tag {
            return false;
        }

        match (self.mode, element.attr("class")) {
            (ClassMatch::Contains, Some(class)) => class.contains(&self.class),
            (ClassMatch::Exact, Some(class)) => class == self.class,
            (_, None) => false,
        }
    }
}

/// The three field rules applied to every article
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExtractionRules {
    pub headline: ClassRule,
    pub content: ClassRule,
    pub published: ClassRule,
}

impl From<&ExtractConfig> for ExtractionRules {
    fn from(config: &ExtractConfig) -> Self {
        Self {
            headline: ClassRule::new("h1", &config.headline_class, ClassMatch::Contains),
            content: ClassRule::new("section", &config.content_class, ClassMatch::Exact),
            published: ClassRule::new("span", &config.published_class, ClassMatch::Exact),
        }
    }
}

impl Default for ExtractionRules {
    fn default() -> Self {
        Self::from(&ExtractConfig::default())
    }
}

/// Extracts an [`Article`] from a fetched page
///
/// Each field is the text of every element matching its rule, one match after
/// another separated by a single space. Text inside a match keeps its own
/// run-joining (see [`Document::text`]).
///
/// # Arguments
///
/// * `url` - URL the page was fetched from
/// * `html` - Raw page body
/// * `rules` - Field rules
///
/// # Returns
///
/// * `Ok(Article)` - The record, with empty strings for unmatched fields
/// * `Err(ParseError)` - The page could not be parsed at all
pub fn extract_article(
    url: &str,
    html: &str,
    rules: &ExtractionRules,
) -> Result<Article, ParseError> {
    let doc = Document::parse(html)?;

    let article = Article {
        url: url.to_string(),
        headline: extract_field(&doc, &rules.headline),
        content: extract_field(&doc, &rules.content),
        published: extract_field(&doc, &rules.published),
    };

    if article.headline.is_empty() && article.content.is_empty() {
        tracing::debug!("No headline or content matched for {}", url);
    }

    Ok(article)
}

fn extract_field(doc: &Document, rule: &ClassRule) -> String {
    doc.select_all(|element| rule.matches(element))
        .into_iter()
        .map(|node| doc.text(node))
        .collect::<Vec<_>>()
        .join(" ")
}

#[cfg(test)]
mod tests {
    use super::*;

    const ARTICLE: &str = r#"<html><body>
        <article>
            <h1 class="yle__article__heading yle__article__heading--h1">Title</h1>
            <span class="yle__article__date--published">1.2.2024 klo 10.00</span>
            <section class="yle__article__content"><p>First.</p><p>Second.</p></section>
        </article>
    </body></html>"#;

    #[test]
    fn test_extracts_all_fields() {
        let article =
            extract_article("https://yle.fi/a/1", ARTICLE, &ExtractionRules::default()).unwrap();

        assert_eq!(article.url, "https://yle.fi/a/1");
        assert_eq!(article.headline, "Title");
        assert_eq!(article.content, "First. Second.");
        assert_eq!(article.published, "1.2.2024 klo 10.00");
    }

    #[test]
    fn test_missing_fields_are_empty() {
        let html = r#"<html><body><h1 class="yle__article__heading">Only a title</h1></body></html>"#;
        let article = extract_article("u", html, &ExtractionRules::default()).unwrap();

        assert_eq!(article.headline, "Only a title");
        assert_eq!(article.content, "");
        assert_eq!(article.published, "");
    }

    #[test]
    fn test_multiple_matches_are_space_separated() {
        let html = r#"<h1 class="x yle__article__heading">One</h1><h1 class="yle__article__heading">Two</h1>"#;
        let article = extract_article("u", html, &ExtractionRules::default()).unwrap();
        assert_eq!(article.headline, "One Two");
    }

    #[test]
    fn test_exact_rules_ignore_extra_classes() {
        let html = r#"<section class="yle__article__content wide">Body</section>
            <span class="yle__article__date--published hidden">Never</span>"#;
        let article = extract_article("u", html, &ExtractionRules::default()).unwrap();

        assert_eq!(article.content, "");
        assert_eq!(article.published, "");
    }

    #[test]
    fn test_rule_requires_tag() {
        let html = r#"<h2 class="yle__article__heading">Not a headline</h2>"#;
        let article = extract_article("u", html, &ExtractionRules::default()).unwrap();
        assert_eq!(article.headline, "");
    }

    #[test]
    fn test_rules_from_config() {
        let config = ExtractConfig {
            headline_class: "story-title".to_string(),
            content_class: "story-body".to_string(),
            published_class: "story-date".to_string(),
        };
        let rules = ExtractionRules::from(&config);
        let html = r#"<h1 class="big story-title">Custom</h1><section class="story-body">Text</section>"#;
        let article = extract_article("u", html, &rules).unwrap();

        assert_eq!(article.headline, "Custom");
        assert_eq!(article.content, "Text");
    }

    #[test]
    fn test_article_serializes() {
        let article = Article {
            url: "https://yle.fi/a/1".to_string(),
            headline: "Title".to_string(),
            ..Default::default()
        };
        let json = serde_json::to_value(&article).unwrap();
        assert_eq!(json["headline"], "Title");
        assert_eq!(json["published"], "");
    }
}
