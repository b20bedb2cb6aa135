use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

/// A heading kept for the outline, in document order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Heading {
    /// Heading depth (1-6)
    pub level: usize,
    /// Plain text of the heading, math excluded, trimmed
    pub text: String,
    /// Identifier derived from `text`
    pub id: String,
    /// Line number in the source (1-indexed)
    pub line: usize,
    /// Byte offset of the heading in the source
    pub offset: usize,
}

/// A heading with its nested sub-headings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HeadingNode {
    pub id: String,
    pub text: String,
    pub level: usize,
    pub children: Vec<HeadingNode>,
}

impl HeadingNode {
    fn leaf(heading: &Heading) -> Self {
        Self {
            id: heading.id.clone(),
            text: heading.text.clone(),
            level: heading.level,
            children: Vec::new(),
        }
    }

    /// Number of levels in this subtree, counting the node itself.
    pub fn depth(&self) -> usize {
        1 + self.children.iter().map(HeadingNode::depth).max().unwrap_or(0)
    }

    /// Pre-order traversal: this node, then each child subtree in order.
    pub fn flatten(&self) -> Vec<&HeadingNode> {
        let mut out = vec![self];
        for child in &self.children {
            out.extend(child.flatten());
        }
        out
    }

    /// Render this subtree with box-drawing characters.
    ///
    /// `prefix` is the indentation inherited from ancestors and `is_last`
    /// whether this node is the last of its siblings.
    pub fn render_box_tree(&self, prefix: &str, is_last: bool) -> String {
        let connector = if is_last { "└── " } else { "├── " };
        let mut out = format!(
            "{}{}{} {}\n",
            prefix,
            connector,
            "#".repeat(self.level),
            self.text
        );

        let child_prefix = format!("{}{}", prefix, if is_last { "    " } else { "│   " });
        for (i, child) in self.children.iter().enumerate() {
            let last = i == self.children.len() - 1;
            out.push_str(&child.render_box_tree(&child_prefix, last));
        }
        out
    }
}

/// Assemble a forest from headings in document order.
///
/// Keeps a stack of open ancestors. Each heading closes every open node of
/// the same or deeper level, then becomes a child of whatever is left on
/// top of the stack, or a new root if nothing is.
pub fn build_forest(headings: &[Heading]) -> Vec<HeadingNode> {
    let mut roots = Vec::new();
    let mut stack: Vec<HeadingNode> = Vec::new();

    for heading in headings {
        while let Some(closed) = stack.pop_if(|open| open.level >= heading.level) {
            attach(closed, &mut stack, &mut roots);
        }
        stack.push(HeadingNode::leaf(heading));
    }

    while let Some(closed) = stack.pop() {
        attach(closed, &mut stack, &mut roots);
    }

    roots
}

fn attach(node: HeadingNode, stack: &mut [HeadingNode], roots: &mut Vec<HeadingNode>) {
    match stack.last_mut() {
        Some(parent) => parent.children.push(node),
        None => roots.push(node),
    }
}

/// A parsed markdown document: the source plus its retained headings.
#[derive(Debug, Clone)]
pub struct Document {
    pub content: String,
    pub headings: Vec<Heading>,
}

impl Document {
    pub fn new(content: String, headings: Vec<Heading>) -> Self {
        Self { content, headings }
    }

    /// Nested outline of the document.
    pub fn build_tree(&self) -> Vec<HeadingNode> {
        build_forest(&self.headings)
    }

    /// Headings whose text contains `pattern`, case-insensitively.
    pub fn filter_headings(&self, pattern: &str) -> Vec<&Heading> {
        let pattern = pattern.to_lowercase();
        self.headings
            .iter()
            .filter(|h| h.text.to_lowercase().contains(&pattern))
            .collect()
    }

    pub fn headings_at_level(&self, level: usize) -> Vec<&Heading> {
        self.headings.iter().filter(|h| h.level == level).collect()
    }

    /// Look up a heading by exact text, then case-insensitive text, then id.
    pub fn find_heading(&self, query: &str) -> Option<&Heading> {
        self.headings
            .iter()
            .find(|h| h.text == query)
            .or_else(|| {
                self.headings
                    .iter()
                    .find(|h| h.text.eq_ignore_ascii_case(query))
            })
            .or_else(|| self.headings.iter().find(|h| h.id == query))
    }

    /// The heading whose section contains `line`: the last heading starting
    /// at or before it.
    pub fn heading_at_line(&self, line: usize) -> Option<&Heading> {
        self.headings.iter().take_while(|h| h.line <= line).last()
    }

    /// Source text of a section, from its heading up to the next heading of
    /// the same or a shallower level.
    pub fn extract_section(&self, query: &str) -> Option<&str> {
        let heading = self.find_heading(query)?;
        let index = self
            .headings
            .iter()
            .position(|h| std::ptr::eq(h, heading))?;

        let end = self.headings[index + 1..]
            .iter()
            .find(|h| h.level <= heading.level)
            .map(|h| h.offset)
            .unwrap_or(self.content.len());

        Some(self.content[heading.offset..end].trim_end())
    }

    /// Text of the first level-1 heading.
    pub fn title(&self) -> Option<&str> {
        self.headings
            .iter()
            .find(|h| h.level == 1)
            .map(|h| h.text.as_str())
    }

    /// Heading counts keyed by level, shallowest first.
    pub fn level_counts(&self) -> IndexMap<usize, usize> {
        let mut counts = IndexMap::new();
        for level in 1..=6 {
            let count = self.headings.iter().filter(|h| h.level == level).count();
            if count > 0 {
                counts.insert(level, count);
            }
        }
        counts
    }
}
