//! JSON output types for the nested outline.

use super::{Document, HeadingNode};
use crate::render;
use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

/// Root of the JSON outline output
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TocOutput {
    pub document: TocRoot,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TocRoot {
    pub metadata: TocMetadata,
    pub toc: Vec<HeadingNode>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TocMetadata {
    pub source: Option<String>,
    pub title: Option<String>,
    #[serde(rename = "headingCount")]
    pub heading_count: usize,
    /// Deepest nesting in the outline (0 when there are no headings)
    #[serde(rename = "maxDepth")]
    pub max_depth: usize,
    /// Heading counts keyed by level
    pub levels: IndexMap<usize, usize>,
    #[serde(rename = "readingMinutes")]
    pub reading_minutes: u32,
}

impl TocOutput {
    /// Build the JSON outline for a parsed document.
    pub fn from_document(doc: &Document, source: Option<String>, words_per_minute: u32) -> Self {
        let toc = doc.build_tree();
        let max_depth = toc.iter().map(HeadingNode::depth).max().unwrap_or(0);

        Self {
            document: TocRoot {
                metadata: TocMetadata {
                    source,
                    title: doc.title().map(str::to_string),
                    heading_count: doc.headings.len(),
                    max_depth,
                    levels: doc.level_counts(),
                    reading_minutes: render::reading_time(&doc.content, words_per_minute),
                },
                toc,
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::parser::parse_markdown;

    #[test]
    fn test_output_shape() {
        let doc = parse_markdown("# Intro\n## Background\n## Method\n### Details\n# Conclusion\n");
        let output = TocOutput::from_document(&doc, Some("post.md".to_string()), 200);
        let json = serde_json::to_value(&output).unwrap();

        let meta = &json["document"]["metadata"];
        assert_eq!(meta["source"], "post.md");
        assert_eq!(meta["title"], "Intro");
        assert_eq!(meta["headingCount"], 5);
        assert_eq!(meta["maxDepth"], 3);
        assert_eq!(meta["levels"]["2"], 2);
        assert_eq!(meta["readingMinutes"], 1);

        let toc = &json["document"]["toc"];
        assert_eq!(toc.as_array().unwrap().len(), 2);
        assert_eq!(
            toc[0]["children"][1],
            serde_json::json!({
                "id": "method",
                "text": "Method",
                "level": 2,
                "children": [
                    {"id": "details", "text": "Details", "level": 3, "children": []}
                ]
            })
        );
    }

    #[test]
    fn test_output_empty_document() {
        let doc = parse_markdown("");
        let output = TocOutput::from_document(&doc, None, 200);

        assert_eq!(output.document.metadata.max_depth, 0);
        assert_eq!(output.document.metadata.reading_minutes, 0);
        assert!(output.document.toc.is_empty());
    }
}
