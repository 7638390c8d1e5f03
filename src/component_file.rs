use serde::Deserialize;
use serde_yaml::{Mapping, Value};
use std::collections::HashSet;
use std::path::Path;

use crate::error::{MarkupError, MarkupResult};
use crate::props::{Element, KnownProps, Node, PropValue, Props, RawHtml};
use crate::registry::is_safe_attribute_name;
use crate::render::Component;
use crate::style::{StyleMap, StyleValue};

/// A component defined in YAML rather than in code.
///
/// ```yaml
/// name: Greeting
/// knownProps: [id]
/// defaultProps:
///   id: greeting
///   who: world
/// body:
///   tag: div
///   props:
///     id: "{props.id}"
///     children:
///       - tag: span
///         props:
///           children: "{props.who}"
///       - plain text child
/// ```
///
/// A string value that is exactly `{props.key}` is replaced by the merged
/// prop `key` at render time, keeping its type. Unresolved references stay
/// as written.
#[derive(Debug, Clone, PartialEq)]
pub struct ComponentFile {
    /// PascalCase component name
    pub name: String,
    pub known_props: KnownProps,
    pub default_props: Props,
    pub body: Node,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
struct RawComponentFile {
    name: String,
    #[serde(default)]
    known_props: Vec<String>,
    #[serde(default)]
    default_props: Mapping,
    body: Value,
}

/// Parses a YAML component file.
pub fn parse_component_file(yaml: &str) -> MarkupResult<ComponentFile> {
    let raw: RawComponentFile = serde_yaml::from_str(yaml)?;

    if !is_pascal_case(&raw.name) {
        return Err(MarkupError::InvalidComponentFile {
            reason: format!("component name '{}' must be PascalCase", raw.name),
        });
    }

    let mut seen = HashSet::new();
    for name in &raw.known_props {
        if !is_safe_attribute_name(name) {
            return Err(MarkupError::InvalidComponentFile {
                reason: format!("known prop '{}' is not a valid attribute name", name),
            });
        }
        if !seen.insert(name.as_str()) {
            return Err(MarkupError::InvalidComponentFile {
                reason: format!("duplicate known prop '{}'", name),
            });
        }
    }

    let default_props = props_from_mapping(&raw.default_props, "defaultProps")?;
    let body = node_from_value(&raw.body, "body")?;

    Ok(ComponentFile {
        name: raw.name,
        known_props: raw.known_props.into_iter().collect(),
        default_props,
        body,
    })
}

pub fn load_component_file(path: impl AsRef<Path>) -> MarkupResult<ComponentFile> {
    let path = path.as_ref();
    let content = std::fs::read_to_string(path)
        .map_err(|e| MarkupError::io(path.display().to_string(), e))?;
    parse_component_file(&content)
}

impl Component for ComponentFile {
    fn render(&self, props: &Props) -> Node {
        substitute_props_in_node(&self.body, props)
    }

    fn default_props(&self) -> Props {
        self.default_props.clone()
    }

    fn known_props(&self) -> KnownProps {
        self.known_props.clone()
    }
}

/// Check if a string is PascalCase (starts with uppercase, alphanumeric only)
pub fn is_pascal_case(s: &str) -> bool {
    let mut chars = s.chars();
    match chars.next() {
        Some(c) if c.is_ascii_uppercase() => chars.all(|c| c.is_ascii_alphanumeric()),
        _ => false,
    }
}

// ─── YAML → tree ────────────────────────────────────────────────────────────

fn invalid(path: &str, reason: impl Into<String>) -> MarkupError {
    MarkupError::InvalidNode {
        path: path.to_string(),
        reason: reason.into(),
    }
}

fn node_from_value(value: &Value, path: &str) -> MarkupResult<Node> {
    let map = match value {
        Value::Mapping(map) => map,
        Value::String(s) => return Ok(Node::Text(s.clone())),
        Value::Number(_) | Value::Bool(_) => {
            let text = scalar_from_value(value, path)?.to_text().unwrap_or_default();
            return Ok(Node::Text(text));
        }
        _ => return Err(invalid(path, "expected text or a mapping with 'tag'")),
    };

    let mut tag = None;
    let mut props = Props::new();
    for (key, value) in map {
        match key.as_str() {
            Some("tag") => match value.as_str() {
                Some(t) if !t.is_empty() => tag = Some(t.to_string()),
                _ => return Err(invalid(path, "'tag' must be a non-empty string")),
            },
            Some("props") => match value {
                Value::Mapping(m) => props = props_from_mapping(m, &format!("{}.props", path))?,
                Value::Null => {}
                _ => return Err(invalid(path, "'props' must be a mapping")),
            },
            _ => return Err(invalid(path, format!("unexpected key {:?}", key))),
        }
    }

    let tag = tag.ok_or_else(|| invalid(path, "missing 'tag'"))?;
    Ok(Node::Element(Element { tag, props }))
}

fn props_from_mapping(map: &Mapping, path: &str) -> MarkupResult<Props> {
    let mut props = Props::new();
    for (key, value) in map {
        let key = key
            .as_str()
            .ok_or_else(|| invalid(path, format!("prop name {:?} must be a string", key)))?;
        let prop_path = format!("{}.{}", path, key);
        let value = match (key, value) {
            ("children", Value::Sequence(items)) => {
                let children = items
                    .iter()
                    .enumerate()
                    .map(|(i, item)| node_from_value(item, &format!("{}[{}]", prop_path, i)))
                    .collect::<MarkupResult<Vec<_>>>()?;
                PropValue::Children(children)
            }
            ("children", Value::Mapping(_)) => {
                PropValue::Children(vec![node_from_value(value, &format!("{}[0]", prop_path))?])
            }
            ("style", Value::Mapping(m)) => PropValue::Style(style_from_mapping(m, &prop_path)?),
            ("dangerouslySetInnerHTML", Value::Mapping(m)) => {
                let html = match m.get("__html") {
                    None | Some(Value::Null) => None,
                    Some(Value::String(s)) => Some(s.clone()),
                    Some(_) => return Err(invalid(&prop_path, "'__html' must be a string")),
                };
                PropValue::RawHtml(RawHtml { html })
            }
            _ => scalar_from_value(value, &prop_path)?,
        };
        props.insert(key, value);
    }
    Ok(props)
}

fn style_from_mapping(map: &Mapping, path: &str) -> MarkupResult<StyleMap> {
    let mut style = StyleMap::new();
    for (key, value) in map {
        let name = key
            .as_str()
            .ok_or_else(|| invalid(path, format!("style name {:?} must be a string", key)))?;
        let value = match scalar_from_value(value, &format!("{}.{}", path, name))? {
            PropValue::Bool(b) => StyleValue::Bool(b),
            PropValue::Number(n) => StyleValue::Number(n),
            PropValue::Str(s) => StyleValue::Str(s),
            _ => StyleValue::Null,
        };
        style.insert(name, value);
    }
    Ok(style)
}

fn scalar_from_value(value: &Value, path: &str) -> MarkupResult<PropValue> {
    match value {
        Value::Null => Ok(PropValue::Null),
        Value::Bool(b) => Ok(PropValue::Bool(*b)),
        Value::Number(n) => n
            .as_f64()
            .map(PropValue::Number)
            .ok_or_else(|| invalid(path, format!("number {} out of range", n))),
        Value::String(s) => Ok(PropValue::Str(s.clone())),
        _ => Err(invalid(path, "expected a scalar value")),
    }
}

// ─── Prop substitution ──────────────────────────────────────────────────────

/// Resolves `{props.key}` against `props`; `None` if `s` is not a reference
/// or the prop is missing.
fn lookup_prop_reference<'a>(s: &str, props: &'a Props) -> Option<&'a PropValue> {
    let key = s.strip_prefix("{props.")?.strip_suffix('}')?;
    if key.is_empty() {
        return None;
    }
    props.get(key)
}

fn substitute_props_in_value(value: &PropValue, props: &Props) -> PropValue {
    match value {
        PropValue::Str(s) => lookup_prop_reference(s, props)
            .cloned()
            .unwrap_or_else(|| value.clone()),
        PropValue::Style(style) => PropValue::Style(substitute_props_in_style(style, props)),
        PropValue::Children(children) => PropValue::Children(
            children
                .iter()
                .map(|c| substitute_props_in_node(c, props))
                .collect(),
        ),
        other => other.clone(),
    }
}

fn substitute_props_in_style(style: &StyleMap, props: &Props) -> StyleMap {
    style
        .iter()
        .map(|(name, value)| {
            let resolved = match value {
                StyleValue::Str(s) => match lookup_prop_reference(s, props) {
                    Some(PropValue::Str(v)) => StyleValue::Str(v.clone()),
                    Some(PropValue::Number(n)) => StyleValue::Number(*n),
                    Some(PropValue::Bool(b)) => StyleValue::Bool(*b),
                    Some(PropValue::Null) => StyleValue::Null,
                    _ => value.clone(),
                },
                _ => value.clone(),
            };
            (name, resolved)
        })
        .collect()
}

fn substitute_props_in_node(node: &Node, props: &Props) -> Node {
    match node {
        Node::Text(text) => match lookup_prop_reference(text, props).and_then(|v| v.to_text()) {
            Some(resolved) => Node::Text(resolved),
            None => node.clone(),
        },
        Node::Element(element) => Node::Element(Element {
            tag: element.tag.clone(),
            props: element
                .props
                .iter()
                .map(|(key, value)| (key, substitute_props_in_value(value, props)))
                .collect(),
        }),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const GREETING: &str = r#"
name: Greeting
knownProps: [id]
defaultProps:
  id: greeting
  who: world
  size: 14
body:
  tag: div
  props:
    id: "{props.id}"
    style:
      fontSize: "{props.size}"
    children:
      - tag: span
        props:
          children: "{props.who}"
      - "{props.missing}"
"#;

    #[test]
    fn test_is_pascal_case() {
        assert!(is_pascal_case("TestComponent"));
        assert!(!is_pascal_case("testComponent"));
        assert!(!is_pascal_case("Test-Component"));
        assert!(!is_pascal_case(""));
    }

    #[test]
    fn test_parse_component_file_basic() {
        let cf = parse_component_file(GREETING).unwrap();
        assert_eq!(cf.name, "Greeting");
        assert!(cf.known_props.contains("id"));
        assert_eq!(cf.default_props.get("size"), Some(&PropValue::Number(14.0)));
        match &cf.body {
            Node::Element(el) => {
                assert_eq!(el.tag, "div");
                assert!(matches!(el.props.get("style"), Some(PropValue::Style(_))));
            }
            other => panic!("Expected element, got {:?}", other),
        }
    }

    #[test]
    fn test_substitution() {
        let cf = parse_component_file(GREETING).unwrap();
        let props = cf.default_props().merged(&Props::new().with("who", "Jenna"));
        let Node::Element(div) = cf.render(&props) else {
            panic!("Expected element");
        };
        assert_eq!(div.props.get("id"), Some(&PropValue::from("greeting")));
        match div.props.get("style") {
            Some(PropValue::Style(style)) => {
                let values: Vec<_> = style.iter().collect();
                assert_eq!(values, vec![("fontSize", &StyleValue::Number(14.0))]);
            }
            other => panic!("Expected style, got {:?}", other),
        }
        let Some(PropValue::Children(children)) = div.props.children() else {
            panic!("Expected children");
        };
        match &children[0] {
            Node::Element(span) => {
                assert_eq!(span.props.children(), Some(&PropValue::from("Jenna")));
            }
            other => panic!("Expected span, got {:?}", other),
        }
        assert_eq!(children[1], Node::Text("{props.missing}".to_string()));
    }

    #[test]
    fn test_raw_html_prop() {
        let yaml = r#"
name: Raw
body:
  tag: div
  props:
    dangerouslySetInnerHTML:
      __html: "<b>hi</b>"
"#;
        let cf = parse_component_file(yaml).unwrap();
        let Node::Element(div) = &cf.body else {
            panic!("Expected element");
        };
        assert_eq!(div.props.inner_html(), Some(&RawHtml::new("<b>hi</b>")));
    }

    #[test]
    fn test_rejects_lowercase_name() {
        let err = parse_component_file("name: widget\nbody: hi\n").unwrap_err();
        assert!(matches!(err, MarkupError::InvalidComponentFile { .. }));
    }

    #[test]
    fn test_rejects_duplicate_known_prop() {
        let err = parse_component_file("name: W\nknownProps: [id, id]\nbody: hi\n").unwrap_err();
        match err {
            MarkupError::InvalidComponentFile { reason } => assert!(reason.contains("duplicate")),
            other => panic!("Expected InvalidComponentFile, got {:?}", other),
        }
    }

    #[test]
    fn test_invalid_node_path() {
        let yaml = r#"
name: W
body:
  tag: ul
  props:
    children:
      - tag: li
      - [1, 2]
"#;
        match parse_component_file(yaml).unwrap_err() {
            MarkupError::InvalidNode { path, .. } => assert_eq!(path, "body.props.children[1]"),
            other => panic!("Expected InvalidNode, got {:?}", other),
        }
    }

    #[test]
    fn test_missing_tag() {
        let err = parse_component_file("name: W\nbody:\n  props: {}\n").unwrap_err();
        assert!(matches!(err, MarkupError::InvalidNode { .. }));
    }

    #[test]
    fn test_unknown_top_level_key() {
        let err = parse_component_file("name: W\nbody: hi\nextra: 1\n").unwrap_err();
        assert!(matches!(err, MarkupError::Yaml(_)));
    }
}
