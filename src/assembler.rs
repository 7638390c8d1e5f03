use chrono::{DateTime, SecondsFormat, Utc};

use crate::config::RenderConfig;
use crate::node::{RenderedChild, RenderedNode};

/// Serializes a finished tree of [`RenderedNode`]s into one document.
///
/// A node without nested nodes is written on a single line
/// (`header + text + footer`). Any other node writes its header, then each
/// child on its own line one indentation unit deeper, then its footer on a
/// line of its own at the node's depth. A node with neither header nor
/// footer (its tag was unsafe) contributes only its children.
#[derive(Debug, Clone, PartialEq)]
pub struct Assembler {
    indent: String,
    preamble: bool,
    timestamp: Option<DateTime<Utc>>,
}

impl Default for Assembler {
    fn default() -> Self {
        Self::new(&RenderConfig::default())
    }
}

impl Assembler {
    pub fn new(config: &RenderConfig) -> Self {
        Self {
            indent: config.indent.clone(),
            preamble: config.preamble,
            timestamp: None,
        }
    }

    /// Pins the preamble timestamp instead of reading the clock.
    pub fn at(mut self, timestamp: DateTime<Utc>) -> Self {
        self.timestamp = Some(timestamp);
        self
    }

    /// `{{ # Template auto generated <timestamp> }}` followed by a blank line.
    pub fn preamble(timestamp: &DateTime<Utc>) -> String {
        format!(
            "{{{{ # Template auto generated {} }}}}\n\n",
            timestamp.to_rfc3339_opts(SecondsFormat::Secs, true)
        )
    }

    pub fn assemble(&self, root: &RenderedChild) -> String {
        let timestamp = self.timestamp.unwrap_or_else(Utc::now);
        self.assemble_at(root, &timestamp)
    }

    pub fn assemble_at(&self, root: &RenderedChild, timestamp: &DateTime<Utc>) -> String {
        let mut lines = Vec::new();
        match root {
            RenderedChild::Node(node) => self.write_node(&mut lines, node, 0),
            RenderedChild::Text(text) => lines.push(text.clone()),
        }
        self.finish(lines, timestamp)
    }

    /// Assembles a root node in place, without wrapping it in a [`RenderedChild`].
    pub fn assemble_node(&self, root: &RenderedNode) -> String {
        let timestamp = self.timestamp.unwrap_or_else(Utc::now);
        self.assemble_node_at(root, &timestamp)
    }

    pub fn assemble_node_at(&self, root: &RenderedNode, timestamp: &DateTime<Utc>) -> String {
        let mut lines = Vec::new();
        self.write_node(&mut lines, root, 0);
        self.finish(lines, timestamp)
    }

    fn finish(&self, lines: Vec<String>, timestamp: &DateTime<Utc>) -> String {
        let mut out = if self.preamble {
            Self::preamble(timestamp)
        } else {
            String::new()
        };
        out.push_str(&lines.join("\n"));
        out
    }

    /// A node whose tag was dropped has an empty header and footer. Its
    /// children are written in its place, at its depth.
    fn write_node(&self, lines: &mut Vec<String>, node: &RenderedNode, depth: usize) {
        let unwrapped = node.header().is_empty() && node.footer().is_empty();

        if !node.has_nested_nodes() {
            let mut line = node.header().to_string();
            for child in node.children() {
                if let RenderedChild::Text(text) = child {
                    line.push_str(text);
                }
            }
            line.push_str(node.footer());
            if !(unwrapped && line.is_empty()) {
                lines.push(self.indented(depth, &line));
            }
            return;
        }

        let child_depth = if unwrapped { depth } else { depth + 1 };
        if !unwrapped {
            lines.push(self.indented(depth, node.header()));
        }
        for child in node.children() {
            match child {
                RenderedChild::Node(nested) => self.write_node(lines, nested, child_depth),
                RenderedChild::Text(text) => lines.push(self.indented(child_depth, text)),
            }
        }
        if !unwrapped {
            lines.push(self.indented(depth, node.footer()));
        }
    }

    fn indented(&self, depth: usize, content: &str) -> String {
        let mut line = self.indent.repeat(depth);
        line.push_str(content);
        line
    }
}

/// Assembles `root` with the default layout and the current time.
pub fn assemble(root: &RenderedNode) -> String {
    Assembler::default().assemble_node(root)
}
