//! Structural link clustering
//!
//! Finds the container holding a page's primary list of links by climbing from
//! every anchor towards the root and recording the elements where two or more
//! climbing nodes meet.

use crate::dom::{is_anchor_with_href, Document, NodeId};
use crate::CrawlError;
use std::collections::{BTreeMap, BTreeSet};

/// Convergence points recorded while climbing from the anchors
///
/// Maps each common parent to the frontier nodes that arrived at it after the
/// first one. Ordered by document position so selection is reproducible.
pub type CommonParents = BTreeMap<NodeId, Vec<NodeId>>;

/// Climbs from all anchors and records every common parent
pub fn find_common_parents(doc: &Document) -> CommonParents {
    let mut frontier: BTreeSet<NodeId> =
        doc.select_all(is_anchor_with_href).into_iter().collect();
    let mut common_parents = CommonParents::new();
    let mut round = 0usize;

    while !frontier.is_empty() {
        round += 1;
        let mut parents_this_round = BTreeSet::new();

        for &node in &frontier {
            let Some(parent) = doc.parent(node) else {
                continue;
            };

            if !parents_this_round.insert(parent) {
                common_parents.entry(parent).or_default().push(node);
            }
        }

        tracing::trace!(
            round,
            frontier = frontier.len(),
            parents = parents_this_round.len(),
            common = common_parents.len(),
            "Clustering round"
        );

        if parents_this_round.len() <= 1 {
            break;
        }

        frontier = parents_this_round
            .into_iter()
            .filter(|parent| !common_parents.contains_key(parent))
            .collect();
    }

    common_parents
}

/// Picks the common parent with the most direct children
///
/// Ties go to the element that appears first in the document.
pub fn select_cluster(doc: &Document, common_parents: &CommonParents) -> Option<NodeId> {
    common_parents
        .keys()
        .copied()
        .rev()
        .max_by_key(|&node| doc.children(node).len())
}

/// Returns the hrefs of the page's main link list, in child order
///
/// Each direct child of the selected container contributes the href of the
/// first anchor nested inside it. A child that is itself an anchor, or holds
/// no anchor, contributes nothing.
///
/// # Arguments
///
/// * `doc` - The parsed page
///
/// # Returns
///
/// * `Ok(Vec<String>)` - Raw href values, unresolved
/// * `Err(CrawlError::NoClusterFound)` - No two anchors ever converged
///
/// # Example
///
/// ```
/// use news_cluster_crawler::dom::Document;
/// use news_cluster_crawler::links::find_interesting_links;
///
/// let doc = Document::parse(
///     r#"<ul><li><a href="/one">1</a></li><li><a href="/two">2</a></li></ul>"#,
/// ).unwrap();
/// assert_eq!(find_interesting_links(&doc).unwrap(), vec!["/one", "/two"]);
/// ```
pub fn find_interesting_links(doc: &Document) -> Result<Vec<String>, CrawlError> {
    let common_parents = find_common_parents(doc);
    let cluster = select_cluster(doc, &common_parents).ok_or(CrawlError::NoClusterFound)?;

    let element = doc.element(cluster);
    tracing::info!(
        tag = element.name(),
        children = doc.children(cluster).len(),
        converged = common_parents.get(&cluster).map_or(0, Vec::len),
        candidates = common_parents.len(),
        "Selected link cluster"
    );

    let links = doc
        .children(cluster)
        .iter()
        .filter_map(|&child| doc.first_descendant_matching(child, is_anchor_with_href))
        .filter_map(|anchor| doc.attribute(anchor, "href"))
        .map(str::to_string)
        .collect();

    Ok(links)
}
