use std::collections::HashSet;

use crate::style::StyleMap;

/// Markup supplied by the caller and inserted verbatim (`dangerouslySetInnerHTML`).
#[derive(Debug, Clone, PartialEq)]
pub struct RawHtml {
    pub html: Option<String>,
}

impl RawHtml {
    pub fn new(html: impl Into<String>) -> Self {
        Self {
            html: Some(html.into()),
        }
    }
}

/// A single prop value.
#[derive(Debug, Clone, PartialEq)]
pub enum PropValue {
    Null,
    Bool(bool),
    Number(f64),
    Str(String),
    Style(StyleMap),
    RawHtml(RawHtml),
    Children(Vec<Node>),
}

impl PropValue {
    pub fn is_null(&self) -> bool {
        matches!(self, PropValue::Null)
    }

    /// Truthiness used by boolean attributes
    pub fn is_truthy(&self) -> bool {
        match self {
            PropValue::Null => false,
            PropValue::Bool(b) => *b,
            PropValue::Number(n) => *n != 0.0 && !n.is_nan(),
            PropValue::Str(s) => !s.is_empty(),
            PropValue::Style(_) | PropValue::RawHtml(_) | PropValue::Children(_) => true,
        }
    }

    /// Coerces a scalar value to its text form. Structured values have none.
    pub fn to_text(&self) -> Option<String> {
        match self {
            PropValue::Bool(b) => Some(b.to_string()),
            PropValue::Number(n) => Some(number_to_string(*n)),
            PropValue::Str(s) => Some(s.clone()),
            _ => None,
        }
    }
}

/// Formats a number the way template text expects it: `42`, not `42.0`.
///
/// Follows ECMAScript number-to-string: `-0` prints as `0`, and magnitudes
/// of at least `1e21` or below `1e-6` switch to exponent form (`1e+21`).
pub fn number_to_string(n: f64) -> String {
    if n.is_nan() {
        return "NaN".to_string();
    }
    if n.is_infinite() {
        return if n > 0.0 { "Infinity" } else { "-Infinity" }.to_string();
    }
    if n == 0.0 {
        return "0".to_string();
    }
    let magnitude = n.abs();
    if (1e-6..1e21).contains(&magnitude) {
        // Display for f64 never prints a trailing `.0`
        return n.to_string();
    }
    let exponent_form = format!("{:e}", n);
    match exponent_form.split_once('e') {
        Some((mantissa, exponent)) if !exponent.starts_with('-') => {
            format!("{}e+{}", mantissa, exponent)
        }
        _ => exponent_form,
    }
}

impl From<&str> for PropValue {
    fn from(s: &str) -> Self {
        PropValue::Str(s.to_string())
    }
}

impl From<String> for PropValue {
    fn from(s: String) -> Self {
        PropValue::Str(s)
    }
}

impl From<bool> for PropValue {
    fn from(b: bool) -> Self {
        PropValue::Bool(b)
    }
}

impl From<f64> for PropValue {
    fn from(n: f64) -> Self {
        PropValue::Number(n)
    }
}

impl From<i32> for PropValue {
    fn from(n: i32) -> Self {
        PropValue::Number(n.into())
    }
}

impl From<StyleMap> for PropValue {
    fn from(style: StyleMap) -> Self {
        PropValue::Style(style)
    }
}

impl From<RawHtml> for PropValue {
    fn from(raw: RawHtml) -> Self {
        PropValue::RawHtml(raw)
    }
}

impl From<Vec<Node>> for PropValue {
    fn from(children: Vec<Node>) -> Self {
        PropValue::Children(children)
    }
}

impl<T: Into<PropValue>> From<Option<T>> for PropValue {
    fn from(value: Option<T>) -> Self {
        value.map(Into::into).unwrap_or(PropValue::Null)
    }
}

/// Prop mapping of a node. Iteration follows insertion order; re-inserting
/// a key replaces the value in place.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Props {
    entries: Vec<(String, PropValue)>,
}

impl Props {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with(mut self, key: impl Into<String>, value: impl Into<PropValue>) -> Self {
        self.insert(key, value);
        self
    }

    pub fn insert(&mut self, key: impl Into<String>, value: impl Into<PropValue>) {
        let key = key.into();
        let value = value.into();
        match self.entries.iter_mut().find(|(k, _)| *k == key) {
            Some(entry) => entry.1 = value,
            None => self.entries.push((key, value)),
        }
    }

    pub fn get(&self, key: &str) -> Option<&PropValue> {
        self.entries.iter().find(|(k, _)| k == key).map(|(_, v)| v)
    }

    pub fn get_mut(&mut self, key: &str) -> Option<&mut PropValue> {
        self.entries
            .iter_mut()
            .find(|(k, _)| k == key)
            .map(|(_, v)| v)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &PropValue)> {
        self.entries.iter().map(|(k, v)| (k.as_str(), v))
    }

    pub fn iter_mut(&mut self) -> impl Iterator<Item = (&str, &mut PropValue)> {
        self.entries.iter_mut().map(|(k, v)| (k.as_str(), v))
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// `self` overlaid with `overrides`; keys from `overrides` win.
    pub fn merged(&self, overrides: &Props) -> Props {
        let mut merged = self.clone();
        for (key, value) in overrides.iter() {
            merged.insert(key, value.clone());
        }
        merged
    }

    pub fn children(&self) -> Option<&PropValue> {
        self.get("children")
    }

    pub fn inner_html(&self) -> Option<&RawHtml> {
        match self.get("dangerouslySetInnerHTML") {
            Some(PropValue::RawHtml(raw)) => Some(raw),
            _ => None,
        }
    }
}

impl<K: Into<String>, V: Into<PropValue>> FromIterator<(K, V)> for Props {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        let mut props = Props::new();
        for (k, v) in iter {
            props.insert(k, v);
        }
        props
    }
}

/// Prop names a component declares as supplied by the template engine at
/// render time. Such props become placeholder attributes.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct KnownProps {
    names: HashSet<String>,
}

impl KnownProps {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn contains(&self, name: &str) -> bool {
        self.names.contains(name)
    }

    pub fn insert(&mut self, name: impl Into<String>) {
        self.names.insert(name.into());
    }

    pub fn is_empty(&self) -> bool {
        self.names.is_empty()
    }
}

impl<S: Into<String>> FromIterator<S> for KnownProps {
    fn from_iter<I: IntoIterator<Item = S>>(iter: I) -> Self {
        Self {
            names: iter.into_iter().map(Into::into).collect(),
        }
    }
}

/// A node of the component tree handed to the renderer.
#[derive(Debug, Clone, PartialEq)]
pub enum Node {
    Element(Element),
    Text(String),
}

impl From<Element> for Node {
    fn from(element: Element) -> Self {
        Node::Element(element)
    }
}

impl From<&str> for Node {
    fn from(text: &str) -> Self {
        Node::Text(text.to_string())
    }
}

impl From<String> for Node {
    fn from(text: String) -> Self {
        Node::Text(text)
    }
}

/// A host element: tag name plus props. Children live in `props.children`.
#[derive(Debug, Clone, PartialEq)]
pub struct Element {
    pub tag: String,
    pub props: Props,
}

impl Element {
    pub fn new(tag: impl Into<String>) -> Self {
        Self {
            tag: tag.into(),
            props: Props::new(),
        }
    }

    pub fn prop(mut self, key: impl Into<String>, value: impl Into<PropValue>) -> Self {
        self.props.insert(key, value);
        self
    }

    /// Sets inline text content (`children` as a single string).
    pub fn text(self, text: impl Into<String>) -> Self {
        self.prop("children", text.into())
    }

    /// Appends a structured child, turning `children` into a collection.
    pub fn child(mut self, child: impl Into<Node>) -> Self {
        let child = child.into();
        match self.props.get_mut("children") {
            Some(PropValue::Children(children)) => children.push(child),
            Some(existing) => {
                let previous = std::mem::replace(existing, PropValue::Null);
                let mut children = Vec::with_capacity(2);
                if let Some(text) = previous.to_text() {
                    children.push(Node::Text(text));
                }
                children.push(child);
                *existing = PropValue::Children(children);
            }
            None => self.props.insert("children", vec![child]),
        }
        self
    }

    pub fn children(self, children: impl IntoIterator<Item = impl Into<Node>>) -> Self {
        children.into_iter().fold(self, |el, c| el.child(c))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_insert_keeps_position() {
        let mut props = Props::new().with("a", 1).with("b", 2);
        props.insert("a", 3);
        let keys: Vec<_> = props.iter().map(|(k, _)| k).collect();
        assert_eq!(keys, vec!["a", "b"]);
        assert_eq!(props.get("a"), Some(&PropValue::Number(3.0)));
    }

    #[test]
    fn test_merged_overrides_win() {
        let defaults = Props::new().with("id", "root").with("title", "x");
        let given = Props::new().with("id", "main");
        let merged = defaults.merged(&given);
        assert_eq!(merged.get("id"), Some(&PropValue::from("main")));
        assert_eq!(merged.get("title"), Some(&PropValue::from("x")));
    }

    #[test]
    fn test_number_to_string() {
        assert_eq!(number_to_string(42.0), "42");
        assert_eq!(number_to_string(1.5), "1.5");
        assert_eq!(number_to_string(-3.0), "-3");
        assert_eq!(number_to_string(f64::INFINITY), "Infinity");
    }

    #[test]
    fn test_number_to_string_edges() {
        assert_eq!(number_to_string(-0.0), "0");
        assert_eq!(number_to_string(1e21), "1e+21");
        assert_eq!(number_to_string(1.5e300), "1.5e+300");
        assert_eq!(number_to_string(1e20), "100000000000000000000");
        assert_eq!(number_to_string(0.000001), "0.000001");
        assert_eq!(number_to_string(1.5e-7), "1.5e-7");
        assert_eq!(number_to_string(-2e-9), "-2e-9");
        assert_eq!(number_to_string(f64::NAN), "NaN");
    }

    #[test]
    fn test_truthiness() {
        assert!(!PropValue::Null.is_truthy());
        assert!(!PropValue::from("").is_truthy());
        assert!(!PropValue::from(0).is_truthy());
        assert!(PropValue::from("yes").is_truthy());
        assert!(PropValue::from(true).is_truthy());
    }

    #[test]
    fn test_child_builds_collection() {
        let el = Element::new("ul").child(Element::new("li").text("1")).child("tail");
        match el.props.children() {
            Some(PropValue::Children(children)) => assert_eq!(children.len(), 2),
            other => panic!("Expected children collection, got {:?}", other),
        }
    }

    #[test]
    fn test_child_after_text_keeps_text() {
        let el = Element::new("p").text("hello").child(Element::new("br"));
        match el.props.children() {
            Some(PropValue::Children(children)) => {
                assert_eq!(children[0], Node::Text("hello".to_string()));
            }
            other => panic!("Expected children collection, got {:?}", other),
        }
    }
}
