//! Callback surface for whatever builds the component tree.
//!
//! The tree builder decides when nodes are instantiated. It calls
//! [`Host::create_instance`] once per element, [`Host::append_initial_child`]
//! once per parent/child edge, in child order, and [`Host::finalize`] once
//! when the tree is complete. [`mount`] is a builder for fully static trees.

use crate::assembler::Assembler;
use crate::escape::escape_html;
use crate::node::RenderedChild;
use crate::props::{KnownProps, Node, PropValue, Props};
use crate::synthesizer::{resolve_child_source, ChildSource, Synthesizer};

pub trait Host {
    type Instance;
    type Document;

    /// True if the element's content comes from its own props (inline text,
    /// raw HTML, or nothing) rather than from mounted children.
    fn should_set_text_content(&self, tag: &str, props: &Props) -> bool;

    fn create_instance(&self, tag: &str, props: &Props) -> Self::Instance;

    fn create_text_instance(&self, text: &str) -> Self::Instance;

    /// Transfers ownership of `child` to `parent`.
    fn append_initial_child(&self, parent: &mut Self::Instance, child: Self::Instance);

    fn finalize(&self, root: Self::Instance) -> Self::Document;
}

/// Host producing a template document.
#[derive(Debug, Clone)]
pub struct TemplateHost {
    synthesizer: Synthesizer,
    known_props: KnownProps,
    assembler: Assembler,
}

impl TemplateHost {
    pub fn new(synthesizer: Synthesizer, known_props: KnownProps, assembler: Assembler) -> Self {
        Self {
            synthesizer,
            known_props,
            assembler,
        }
    }
}

impl Host for TemplateHost {
    type Instance = RenderedChild;
    type Document = String;

    fn should_set_text_content(&self, tag: &str, props: &Props) -> bool {
        !matches!(
            resolve_child_source(&tag.to_ascii_lowercase(), props),
            ChildSource::Nested(_)
        )
    }

    fn create_instance(&self, tag: &str, props: &Props) -> RenderedChild {
        RenderedChild::Node(self.synthesizer.synthesize_node(tag, props, &self.known_props))
    }

    fn create_text_instance(&self, text: &str) -> RenderedChild {
        RenderedChild::Text(escape_html(text).into_owned())
    }

    fn append_initial_child(&self, parent: &mut RenderedChild, child: RenderedChild) {
        match parent {
            RenderedChild::Node(node) => node.append_child(child),
            RenderedChild::Text(text) => {
                tracing::warn!(parent = %text, "text instance cannot own children; child dropped");
            }
        }
    }

    fn finalize(&self, root: RenderedChild) -> String {
        self.assembler.assemble(&root)
    }
}

/// Builds host instances for a static tree, children before their parent.
pub fn mount<H: Host>(host: &H, node: &Node) -> H::Instance {
    let element = match node {
        Node::Text(text) => return host.create_text_instance(text),
        Node::Element(element) => element,
    };

    let mut children = Vec::new();
    if !host.should_set_text_content(&element.tag, &element.props) {
        if let Some(PropValue::Children(nodes)) = element.props.children() {
            children = nodes.iter().map(|child| mount(host, child)).collect();
        }
    }

    let mut instance = host.create_instance(&element.tag, &element.props);
    for child in children {
        host.append_initial_child(&mut instance, child);
    }
    instance
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::props::Element;
    use chrono::{TimeZone, Utc};
    use pretty_assertions::assert_eq;

    fn host(known: &[&str]) -> TemplateHost {
        let ts = Utc.with_ymd_and_hms(2024, 1, 2, 3, 4, 5).unwrap();
        TemplateHost::new(
            Synthesizer::default(),
            known.iter().copied().collect(),
            Assembler::default().at(ts),
        )
    }

    #[test]
    fn test_mount_and_finalize() {
        let host = host(&["id"]);
        let tree = Element::new("div")
            .prop("id", "root")
            .child(Element::new("span").text("Jenna's"))
            .child(Element::new("ul").children((1..=2).map(|n| Element::new("li").text(n.to_string()))));
        let root = mount(&host, &tree.into());
        assert_eq!(
            host.finalize(root),
            "{{ # Template auto generated 2024-01-02T03:04:05Z }}\n\n\
             <div id=\"#{{ id }}\">\n\
             \t<span>Jenna&#x27;s</span>\n\
             \t<ul>\n\
             \t\t<li>1</li>\n\
             \t\t<li>2</li>\n\
             \t</ul>\n\
             </div>"
        );
    }

    #[test]
    fn test_text_children_are_escaped() {
        let host = host(&[]);
        let tree = Element::new("p").child("a < b").child(Element::new("br"));
        match mount(&host, &tree.into()) {
            RenderedChild::Node(node) => {
                assert_eq!(node.children()[0], RenderedChild::Text("a &lt; b".to_string()));
                assert_eq!(node.children().len(), 2);
            }
            other => panic!("Expected node, got {:?}", other),
        }
    }

    #[test]
    fn test_inline_text_not_mounted_twice() {
        let host = host(&[]);
        assert!(host.should_set_text_content("li", &Props::new().with("children", "1")));
        assert!(host.should_set_text_content("br", &Props::new()));
        let nested = Props::new().with("children", vec![Node::from("x")]);
        assert!(!host.should_set_text_content("UL", &nested));
    }

    #[test]
    fn test_void_element_children_not_mounted() {
        let host = host(&[]);
        let tree = Element::new("hr").child(Element::new("span"));
        match mount(&host, &tree.into()) {
            RenderedChild::Node(node) => {
                assert_eq!(node.header(), "<hr/>");
                assert!(node.children().is_empty());
            }
            other => panic!("Expected node, got {:?}", other),
        }
    }

    #[test]
    fn test_unsafe_tag_children_keep_parent_depth() {
        let host = host(&[]);
        let tree = Element::new("ul").child(
            Element::new("bad tag")
                .child(Element::new("li").text("1"))
                .child(Element::new("li").text("2")),
        );
        let root = mount(&host, &tree.into());
        assert_eq!(
            host.finalize(root),
            "{{ # Template auto generated 2024-01-02T03:04:05Z }}\n\n\
             <ul>\n\t<li>1</li>\n\t<li>2</li>\n</ul>"
        );

        let unsafe_root = Element::new("bad tag").child(Element::new("b"));
        let root = mount(&host, &unsafe_root.into());
        assert_eq!(
            host.finalize(root),
            "{{ # Template auto generated 2024-01-02T03:04:05Z }}\n\n<b></b>"
        );
    }

    #[test]
    fn test_append_to_text_is_dropped() {
        let host = host(&[]);
        let mut parent = host.create_text_instance("x");
        host.append_initial_child(&mut parent, host.create_text_instance("y"));
        assert_eq!(parent, RenderedChild::Text("x".to_string()));
    }
}
