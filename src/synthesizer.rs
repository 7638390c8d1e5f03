//! Turns one node's tag and props into its opening tag, closing tag and
//! child source.
//!
//! Each prop is classified once: a known DOM property (rendered by the
//! rules of its [`PropertyKind`]), a binding the component declared in its
//! [`KnownProps`] (rendered as a `#{{ ... }}` placeholder for the template
//! engine), or an unknown attribute (rendered if its name is safe).
//! Anything else is dropped without error.

use regex::Regex;
use std::sync::{Arc, OnceLock};

use crate::escape::{escape_html, quote_attribute_value};
use crate::node::RenderedNode;
use crate::props::{KnownProps, Node, PropValue, Props};
use crate::registry::{self, PropertyKind};
use crate::style::{create_markup_for_styles, StyleNameCache};

/// Tags that never have children or a closing tag.
pub const VOID_ELEMENTS: &[&str] = &[
    "area", "base", "br", "col", "embed", "hr", "source", "track", "wbr",
];

/// Tags whose parser drops one leading newline of their content.
pub const NEWLINE_EATING_TAGS: &[&str] = &["listing", "pre", "textarea"];

/// Custom elements are recognised by a hyphen in the tag name.
pub fn is_custom_element(tag: &str) -> bool {
    tag.contains('-')
}

pub fn is_void_element(tag: &str) -> bool {
    VOID_ELEMENTS.contains(&tag)
}

fn is_valid_tag(tag: &str) -> bool {
    static TAG_REGEX: OnceLock<Regex> = OnceLock::new();
    let re = TAG_REGEX.get_or_init(|| Regex::new(r"^[a-zA-Z][a-zA-Z:_.\-\d]*$").unwrap());
    re.is_match(tag)
}

/// Where a node's children come from. Exactly one source applies.
#[derive(Debug, Clone, PartialEq)]
pub enum ChildSource<'a> {
    Empty,
    /// Escaped inline text content.
    Text(String),
    /// Caller-trusted markup, inserted verbatim.
    Raw(String),
    /// Structured children the caller synthesizes and attaches.
    Nested(&'a [Node]),
}

/// Resolves the child source of a node, in priority order: raw HTML,
/// inline text or number, structured collection.
pub fn resolve_child_source<'a>(tag: &str, props: &'a Props) -> ChildSource<'a> {
    if is_void_element(tag) {
        return ChildSource::Empty;
    }
    if let Some(html) = props.inner_html().and_then(|raw| raw.html.as_ref()) {
        return ChildSource::Raw(restore_eaten_newline(tag, html.clone()));
    }
    match props.children() {
        Some(value @ (PropValue::Str(_) | PropValue::Number(_))) => {
            let text = value.to_text().unwrap_or_default();
            let content = escape_html(&text).into_owned();
            ChildSource::Text(restore_eaten_newline(tag, content))
        }
        Some(PropValue::Children(children)) => ChildSource::Nested(children),
        _ => ChildSource::Empty,
    }
}

/// Newline-eating tags drop the first newline of their content, so one
/// is added back in front of content that starts with a newline.
fn restore_eaten_newline(tag: &str, mut content: String) -> String {
    if NEWLINE_EATING_TAGS.contains(&tag) && content.starts_with('\n') {
        content.insert(0, '\n');
    }
    content
}

/// Output of [`Synthesizer::synthesize`] for a single node.
#[derive(Debug, Clone, PartialEq)]
pub struct Synthesized<'a> {
    pub header: String,
    pub footer: String,
    pub children: ChildSource<'a>,
    pub is_void: bool,
}

impl Synthesized<'_> {
    /// Builds the rendered node. Inline and raw content become its single
    /// text child; nested children are left for the caller to attach.
    pub fn into_rendered(self) -> RenderedNode {
        if self.is_void {
            return RenderedNode::void(self.header);
        }
        let mut node = RenderedNode::new(self.header, self.footer);
        match self.children {
            ChildSource::Text(content) | ChildSource::Raw(content) => node.append_child(content),
            ChildSource::Empty | ChildSource::Nested(_) => {}
        }
        node
    }
}

/// Expression prefixes for placeholder attributes.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PlaceholderPolicy {
    /// Prefix on custom elements, e.g. `currentItem` → `#{{ currentItem.id }}`
    pub item_scope: String,
    /// Optional prefix on standard elements; `None` → `#{{ id }}`
    pub scope: Option<String>,
}

impl Default for PlaceholderPolicy {
    fn default() -> Self {
        Self {
            item_scope: "currentItem".to_string(),
            scope: None,
        }
    }
}

impl PlaceholderPolicy {
    pub fn expression(&self, name: &str, is_custom_element: bool) -> String {
        let scope = if is_custom_element {
            Some(self.item_scope.as_str())
        } else {
            self.scope.as_deref()
        };
        match scope {
            Some(scope) => format!("{}.{}", scope, name),
            None => name.to_string(),
        }
    }

    /// `name="#{{ expression }}"`. The expression is escaped like any
    /// other attribute value.
    pub fn attribute(&self, name: &str, is_custom_element: bool) -> String {
        let expression = self.expression(name, is_custom_element);
        format!("{}=\"#{{{{ {} }}}}\"", name, escape_html(&expression))
    }
}

/// Markup synthesizer. Holds the shared style-name cache and the
/// placeholder policy; otherwise stateless.
#[derive(Debug, Clone, Default)]
pub struct Synthesizer {
    style_names: Arc<StyleNameCache>,
    placeholders: PlaceholderPolicy,
}

impl Synthesizer {
    pub fn new(style_names: Arc<StyleNameCache>, placeholders: PlaceholderPolicy) -> Self {
        Self {
            style_names,
            placeholders,
        }
    }

    pub fn style_names(&self) -> &Arc<StyleNameCache> {
        &self.style_names
    }

    pub fn placeholders(&self) -> &PlaceholderPolicy {
        &self.placeholders
    }

    /// Produces the opening tag, closing tag and child source of one node.
    pub fn synthesize<'a>(
        &self,
        tag: &str,
        props: &'a Props,
        known_props: &KnownProps,
    ) -> Synthesized<'a> {
        let tag = tag.to_ascii_lowercase();
        if !is_valid_tag(&tag) {
            tracing::warn!(tag = %tag, "unsafe tag name; emitting children without a wrapper");
            return Synthesized {
                header: String::new(),
                footer: String::new(),
                children: resolve_child_source(&tag, props),
                is_void: false,
            };
        }

        let is_custom = is_custom_element(&tag);
        let mut header = format!("<{}", tag);
        for (key, value) in props.iter() {
            if value.is_null() {
                continue;
            }
            if let Some(markup) = self.attribute_markup(key, value, is_custom, known_props) {
                header.push(' ');
                header.push_str(&markup);
            }
        }

        let is_void = is_void_element(&tag);
        let footer = if is_void {
            header.push_str("/>");
            String::new()
        } else {
            header.push('>');
            format!("</{}>", tag)
        };

        if is_void && (props.inner_html().is_some() || props.children().is_some()) {
            tracing::warn!(tag = %tag, "void element cannot have children; content dropped");
        }

        Synthesized {
            header,
            footer,
            children: resolve_child_source(&tag, props),
            is_void,
        }
    }

    /// Convenience for [`Synthesizer::synthesize`] followed by
    /// [`Synthesized::into_rendered`].
    pub fn synthesize_node(&self, tag: &str, props: &Props, known_props: &KnownProps) -> RenderedNode {
        self.synthesize(tag, props, known_props).into_rendered()
    }

    fn attribute_markup(
        &self,
        key: &str,
        value: &PropValue,
        is_custom: bool,
        known_props: &KnownProps,
    ) -> Option<String> {
        if key == "style" {
            return self.style_markup(value);
        }

        let descriptor = registry::lookup(key);
        if registry::should_ignore(key, descriptor, is_custom) {
            return None;
        }

        if let Some(descriptor) = descriptor {
            let name = &descriptor.attribute_name;
            return match descriptor.kind {
                PropertyKind::Reserved => None,
                PropertyKind::Boolean => value.is_truthy().then(|| format!("{}=\"\"", name)),
                PropertyKind::OverloadedBoolean if matches!(value, PropValue::Bool(true)) => {
                    Some(format!("{}=\"\"", name))
                }
                PropertyKind::OverloadedBoolean
                | PropertyKind::UrlSanitized
                | PropertyKind::Generic => scalar_attribute(name, value),
            };
        }

        if !registry::is_safe_attribute_name(key) {
            tracing::trace!(attribute = key, "dropping attribute with unsafe name");
            return None;
        }
        if known_props.contains(key) {
            return Some(self.placeholders.attribute(key, is_custom));
        }
        if is_custom {
            tracing::trace!(attribute = key, "dropping undeclared attribute on custom element");
            return None;
        }
        scalar_attribute(key, value)
    }

    fn style_markup(&self, value: &PropValue) -> Option<String> {
        let css = match value {
            PropValue::Style(styles) => create_markup_for_styles(styles, &self.style_names)?,
            PropValue::Str(s) if !s.trim().is_empty() => s.trim().to_string(),
            _ => return None,
        };
        Some(format!("style={}", quote_attribute_value(&css)))
    }
}

/// `name="value"` for scalar values; structured values have no attribute form.
fn scalar_attribute(name: &str, value: &PropValue) -> Option<String> {
    match value.to_text() {
        Some(text) => Some(format!("{}={}", name, quote_attribute_value(&text))),
        None => {
            tracing::trace!(attribute = name, "dropping attribute with non-scalar value");
            None
        }
    }
}
