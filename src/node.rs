/// A node reduced to markup: opening tag, closing tag and ordered children.
///
/// Built once by the synthesizer. Children are moved in by
/// [`RenderedNode::append_child`] and never touched again.
#[derive(Debug, Clone, PartialEq)]
pub struct RenderedNode {
    pub(crate) header: String,
    pub(crate) footer: String,
    pub(crate) children: Vec<RenderedChild>,
    pub(crate) is_void: bool,
}

/// Entry in a rendered node's child collection.
#[derive(Debug, Clone, PartialEq)]
pub enum RenderedChild {
    Node(RenderedNode),
    /// Literal markup: already escaped text, or caller-trusted raw HTML.
    Text(String),
}

impl RenderedNode {
    pub fn new(header: impl Into<String>, footer: impl Into<String>) -> Self {
        Self {
            header: header.into(),
            footer: footer.into(),
            children: Vec::new(),
            is_void: false,
        }
    }

    pub(crate) fn void(header: String) -> Self {
        Self {
            header,
            footer: String::new(),
            children: Vec::new(),
            is_void: true,
        }
    }

    pub fn header(&self) -> &str {
        &self.header
    }

    pub fn footer(&self) -> &str {
        &self.footer
    }

    pub fn children(&self) -> &[RenderedChild] {
        &self.children
    }

    pub fn is_void(&self) -> bool {
        self.is_void
    }

    /// True if any child is itself a node (rather than literal text).
    pub fn has_nested_nodes(&self) -> bool {
        self.children
            .iter()
            .any(|c| matches!(c, RenderedChild::Node(_)))
    }

    /// Takes ownership of `child` and appends it. Void elements never
    /// receive children; the child is discarded.
    pub fn append_child(&mut self, child: impl Into<RenderedChild>) {
        if self.is_void {
            tracing::warn!(header = %self.header, "discarding child appended to void element");
            return;
        }
        self.children.push(child.into());
    }
}

impl From<RenderedNode> for RenderedChild {
    fn from(node: RenderedNode) -> Self {
        RenderedChild::Node(node)
    }
}

impl From<String> for RenderedChild {
    fn from(text: String) -> Self {
        RenderedChild::Text(text)
    }
}

impl From<&str> for RenderedChild {
    fn from(text: &str) -> Self {
        RenderedChild::Text(text.to_string())
    }
}
