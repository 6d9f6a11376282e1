//! Crawl statistics
//!
//! Condenses a [`CrawlReport`] into the numbers an operator cares about.

use crate::crawler::CrawlReport;
use chrono::{DateTime, Utc};
use std::time::Duration;

/// Crawl statistics summary
#[derive(Debug, Clone, PartialEq)]
pub struct CrawlStatistics {
    pub seed_url: String,

    /// When the crawl started
    pub started_at: DateTime<Utc>,

    /// Raw links found in the selected cluster
    pub links_discovered: usize,

    /// Links that survived normalization
    pub links_normalized: usize,

    /// Articles extracted
    pub articles: usize,

    /// Articles dropped, with the reason
    pub failures: Vec<(String, String)>,

    /// Articles with at least one empty field
    pub incomplete_articles: usize,

    pub elapsed: Duration,
}

impl CrawlStatistics {
    pub fn from_report(report: &CrawlReport) -> Self {
        Self {
            seed_url: report.seed_url.clone(),
            started_at: report.started_at,
            links_discovered: report.links_discovered,
            links_normalized: report.links_normalized,
            articles: report.articles.len(),
            failures: report
                .failures
                .iter()
                .map(|f| (f.url.clone(), f.error.clone()))
                .collect(),
            incomplete_articles: report
                .articles
                .iter()
                .filter(|a| {
                    a.headline.is_empty() || a.content.is_empty() || a.published.is_empty()
                })
                .count(),
            elapsed: report.elapsed,
        }
    }

    /// Share of fetched links that produced an article
    pub fn success_rate(&self) -> f64 {
        if self.links_normalized == 0 {
            0.0
        } else {
            (self.articles as f64 / self.links_normalized as f64) * 100.0
        }
    }
}

/// Renders statistics as plain text
pub fn format_statistics(stats: &CrawlStatistics) -> String {
    let mut out = String::new();

    out.push_str("=== Crawl Statistics ===\n\n");
    out.push_str(&format!("Seed: {}\n", stats.seed_url));
    out.push_str(&format!(
        "  Started: {}\n",
        stats.started_at.format("%Y-%m-%d %H:%M:%S UTC")
    ));
    out.push_str(&format!("  Links in cluster: {}\n", stats.links_discovered));
    out.push_str(&format!("  Links fetched: {}\n", stats.links_normalized));
    out.push_str(&format!("  Articles extracted: {}\n", stats.articles));
    out.push_str(&format!(
        "  Articles with empty fields: {}\n",
        stats.incomplete_articles
    ));
    out.push_str(&format!("  Elapsed: {:.2?}\n", stats.elapsed));

    if !stats.failures.is_empty() {
        out.push_str(&format!("\nDropped Articles ({}):\n", stats.failures.len()));
        for (url, error) in &stats.failures {
            out.push_str(&format!("  - {}: {}\n", url, error));
        }
    }

    out.push_str(&format!(
        "\nSuccess Rate: {:.1}% ({} / {} links)\n",
        stats.success_rate(),
        stats.articles,
        stats.links_normalized
    ));

    out
}

/// Prints statistics to stderr, keeping stdout free for article output
pub fn print_statistics(stats: &CrawlStatistics) {
    eprint!("{}", format_statistics(stats));
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::crawler::{Article, FailedArticle};
    use chrono::TimeZone;

    fn report() -> CrawlReport {
        CrawlReport {
            seed_url: "https://yle.fi/uutiset".to_string(),
            base_url: "https://yle.fi".to_string(),
            started_at: Utc.with_ymd_and_hms(2024, 3, 1, 8, 30, 0).unwrap(),
            elapsed: Duration::from_millis(1500),
            links_discovered: 5,
            links_normalized: 4,
            articles: vec![
                Article {
                    url: "https://yle.fi/a/1".to_string(),
                    headline: "H".to_string(),
                    content: "C".to_string(),
                    published: "P".to_string(),
                },
                Article {
                    url: "https://yle.fi/a/2".to_string(),
                    headline: "H".to_string(),
                    ..Default::default()
                },
            ],
            failures: vec![FailedArticle {
                url: "https://yle.fi/a/3".to_string(),
                error: "HTTP 500".to_string(),
            }],
        }
    }

    #[test]
    fn test_statistics_from_report() {
        let stats = CrawlStatistics::from_report(&report());

        assert_eq!(stats.links_discovered, 5);
        assert_eq!(stats.links_normalized, 4);
        assert_eq!(stats.articles, 2);
        assert_eq!(stats.incomplete_articles, 1);
        assert_eq!(stats.failures.len(), 1);
        assert!((stats.success_rate() - 50.0).abs() < f64::EPSILON);
    }

    #[test]
    fn test_format_lists_failures() {
        let text = format_statistics(&CrawlStatistics::from_report(&report()));
        assert!(text.contains("Dropped Articles (1)"));
        assert!(text.contains("https://yle.fi/a/3: HTTP 500"));
        assert!(text.contains("Success Rate: 50.0% (2 / 4 links)"));
    }

    #[test]
    fn test_format_shows_start_time() {
        let stats = CrawlStatistics::from_report(&report());
        assert_eq!(stats.started_at, report().started_at);
        assert!(format_statistics(&stats).contains("Started: 2024-03-01 08:30:00 UTC"));
    }

    #[test]
    fn test_success_rate_without_links() {
        let mut empty = report();
        empty.links_normalized = 0;
        empty.articles.clear();
        assert_eq!(CrawlStatistics::from_report(&empty).success_rate(), 0.0);
    }
}
