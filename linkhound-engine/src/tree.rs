use serde::Serialize;
use std::collections::BTreeMap;
use url::Url;

/// One node of the hierarchical site map.
///
/// Children are keyed by path segment name in a `BTreeMap` so iteration,
/// rendering and JSON output are all lexicographic. Purely derived from the
/// result set after the crawl completes; never consulted for deduplication
/// or scheduling.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SiteTreeNode {
    pub name: String,
    #[serde(skip_serializing_if = "BTreeMap::is_empty")]
    pub children: BTreeMap<String, SiteTreeNode>,
}

impl SiteTreeNode {
    fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            children: BTreeMap::new(),
        }
    }
}

/// Folds the accepted links (plus the target itself) into a tree keyed by
/// URL path segments.
///
/// Only URLs on the target's host participate; everything else is silently
/// excluded, regardless of the run's filter mode. The final segment's display
/// name carries the URL's query string as a literal suffix, and a root-path
/// URL with a query contributes a root-level `"?query"` child.
pub fn build_tree(target: &str, results: &[String]) -> SiteTreeNode {
    let root_host = Url::parse(target)
        .ok()
        .and_then(|u| u.host_str().map(str::to_string));
    let mut root = SiteTreeNode::new("/");

    for url_str in std::iter::once(target).chain(results.iter().map(String::as_str)) {
        let Ok(parsed) = Url::parse(url_str) else {
            continue;
        };
        if parsed.host_str().map(str::to_string) != root_host {
            continue;
        }

        let path = parsed.path();
        let suffix = parsed
            .query()
            .map(|q| format!("?{q}"))
            .unwrap_or_default();

        let parts: Vec<&str> = path.split('/').collect();
        let mut current = &mut root;

        for (i, part) in parts.iter().enumerate() {
            if part.is_empty() {
                continue;
            }
            let name = if i == parts.len() - 1 {
                format!("{part}{suffix}")
            } else {
                (*part).to_string()
            };
            current = current
                .children
                .entry(name.clone())
                .or_insert_with(|| SiteTreeNode::new(name));
        }

        if path == "/" && !suffix.is_empty() {
            root.children
                .entry(suffix.clone())
                .or_insert_with(|| SiteTreeNode::new(suffix.clone()));
        }
    }

    root
}

/// Renders the tree with box-drawing connectors, one line per node.
pub fn render(root: &SiteTreeNode) -> String {
    let mut out = String::new();
    render_children(root, "", &mut out);
    out
}

fn render_children(node: &SiteTreeNode, prefix: &str, out: &mut String) {
    let count = node.children.len();
    for (i, (name, child)) in node.children.iter().enumerate() {
        let last = i + 1 == count;
        out.push_str(prefix);
        out.push_str(if last { "└── " } else { "├── " });
        out.push_str(name);
        out.push('\n');

        let child_prefix = format!("{prefix}{}", if last { "    " } else { "│   " });
        render_children(child, &child_prefix, out);
    }
}
