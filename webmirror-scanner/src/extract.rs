use crate::normalize::{CrawlTarget, NormalizedUrl, normalize_href};
use scraper::Html;
use std::collections::HashSet;
use tracing::trace;

/// Parse a page body as HTML, whatever its declared content type.
pub fn parse_page(body: &[u8]) -> Html {
    Html::parse_document(&String::from_utf8_lossy(body))
}

/// Collect in-scope anchor targets from `document`, in document order.
///
/// Duplicates are removed within this page only; links to the scope root are
/// dropped. Global deduplication is the visited set's job.
pub fn extract_links(document: &Html, page: &NormalizedUrl, target: &CrawlTarget) -> Vec<String> {
    let mut seen = HashSet::new();
    let mut links = Vec::new();

    // depth-first, pre-order walk over the whole tree
    for node in document.tree.root().descendants() {
        let Some(element) = node.value().as_element() else {
            continue;
        };
        if element.name() != "a" {
            continue;
        }
        let Some(href) = element.attr("href") else {
            continue;
        };

        let Some(url) = normalize_href(href, page) else {
            trace!("Discarded href {:?} on {}", href, page);
            continue;
        };

        if !target.admits(&url) {
            trace!("Out of scope: {}", url);
            continue;
        }

        if url.path() == target.scope_path() {
            continue;
        }

        let key = target.canonicalize(&url).key();
        if seen.insert(key.clone()) {
            links.push(key);
        }
    }

    links
}

/// Parse `body` and extract its links in one step.
///
/// The parsed document is not `Send`, so it never outlives this call.
pub fn extract_from_body(body: &[u8], page: &NormalizedUrl, target: &CrawlTarget) -> Vec<String> {
    if body.is_empty() {
        return Vec::new();
    }
    let document = parse_page(body);
    extract_links(&document, page, target)
}
