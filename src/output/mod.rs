//! Output module for crawl results
//!
//! This module handles:
//! - Writing extracted articles as JSON (to a file or stdout)
//! - Summarizing crawl statistics for the operator

pub mod stats;

pub use stats::{format_statistics, print_statistics, CrawlStatistics};

use crate::crawler::Article;
use crate::CrawlError;
use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::Path;

/// Serializes articles as a JSON array into `writer`
///
/// # Arguments
///
/// * `writer` - Destination
/// * `articles` - The records to write
/// * `pretty` - Indent the output
pub fn write_articles<W: Write>(
    mut writer: W,
    articles: &[Article],
    pretty: bool,
) -> Result<(), CrawlError> {
    if pretty {
        serde_json::to_writer_pretty(&mut writer, articles)?;
    } else {
        serde_json::to_writer(&mut writer, articles)?;
    }
    writeln!(writer)?;
    writer.flush()?;
    Ok(())
}

/// Writes articles to `path`, or to stdout when no path is given
pub fn export_articles(
    articles: &[Article],
    path: Option<&Path>,
    pretty: bool,
) -> Result<(), CrawlError> {
    match path {
        Some(path) => {
            let file = File::create(path)?;
            write_articles(BufWriter::new(file), articles, pretty)?;
            tracing::info!("Wrote {} articles to {}", articles.len(), path.display());
        }
        None => {
            let stdout = std::io::stdout();
            write_articles(stdout.lock(), articles, pretty)?;
        }
    }
    Ok(())
}
