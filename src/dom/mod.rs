//! Tree adapter over the HTML parser
//!
//! The parsed document is flattened into an arena of elements indexed by
//! [`NodeId`]. Parent and child links are stored as indices, so node identity
//! is a plain integer that can be hashed, ordered and used as a map key by the
//! link clustering algorithm.
//!
//! # Example
//!
//! ```
//! use news_cluster_crawler::dom::{is_anchor_with_href, Document};
//!
//! let doc = Document::parse(r#"<ul><li><a href="/a">A</a></li></ul>"#).unwrap();
//! let anchors = doc.select_all(is_anchor_with_href);
//! assert_eq!(doc.attribute(anchors[0], "href"), Some("/a"));
//! ```

mod document;
mod element;

pub use document::{Document, NodeId};
pub use element::{is_anchor_with_href, Element};
