use crate::error::Result;
use crate::tree::SiteTreeNode;
use serde::Serialize;
use std::fs::File;
use std::path::Path;

/// JSON export of a completed run: the original target, the accepted links
/// in discovery order, and optionally the site tree.
#[derive(Debug, Clone, Serialize)]
pub struct CrawlExport {
    pub target: String,
    pub results: Vec<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub tree: Option<SiteTreeNode>,
    pub count: usize,
}

impl CrawlExport {
    pub fn new(target: String, results: Vec<String>, tree: Option<SiteTreeNode>) -> Self {
        let count = results.len();
        Self {
            target,
            results,
            tree,
            count,
        }
    }

    /// Writes the export as 2-space indented JSON.
    pub fn write_to(&self, path: &Path) -> Result<()> {
        let file = File::create(path)?;
        serde_json::to_writer_pretty(file, self)?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tree::build_tree;

    #[test]
    fn export_shape_matches_contract() {
        let export = CrawlExport::new(
            "https://a.com".to_string(),
            vec!["https://a.com/b".to_string()],
            None,
        );
        let json = serde_json::to_value(&export).unwrap();
        assert_eq!(json["count"], 1);
        assert_eq!(json["target"], "https://a.com");
        assert_eq!(json["results"][0], "https://a.com/b");
        assert!(json.get("tree").is_none());
    }

    #[test]
    fn tree_is_included_when_present() {
        let results = vec!["https://a.com/b".to_string()];
        let tree = build_tree("https://a.com", &results);
        let export = CrawlExport::new("https://a.com".to_string(), results, Some(tree));
        let json = serde_json::to_value(&export).unwrap();
        assert_eq!(json["tree"]["name"], "/");
        assert_eq!(json["tree"]["children"]["b"]["name"], "b");
    }

    #[test]
    fn writes_indented_json_to_disk() {
        let dir = std::env::temp_dir().join("linkhound-export-test");
        std::fs::create_dir_all(&dir).unwrap();
        let path = dir.join("out.json");

        let export = CrawlExport::new(
            "https://a.com".to_string(),
            vec!["https://a.com/b".to_string()],
            None,
        );
        export.write_to(&path).unwrap();

        let written = std::fs::read_to_string(&path).unwrap();
        let parsed: serde_json::Value = serde_json::from_str(&written).unwrap();
        assert_eq!(parsed["count"], 1);
        assert!(written.contains("\n  \"target\""));
        std::fs::remove_file(&path).ok();
    }
}
