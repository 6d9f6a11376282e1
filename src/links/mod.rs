//! Link discovery module
//!
//! This module turns a parsed front page into a list of article URLs:
//! - Structural clustering to locate the page's main list of links
//! - Normalization of the raw hrefs against the site's base URL

mod cluster;
mod normalize;

pub use cluster::{find_common_parents, find_interesting_links, select_cluster, CommonParents};
pub use normalize::{normalize_links, site_origin};
