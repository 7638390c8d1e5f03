use dashmap::DashMap;
use std::sync::OnceLock;

use crate::props::number_to_string;

/// A single value in a style object.
#[derive(Debug, Clone, PartialEq)]
pub enum StyleValue {
    Null,
    Bool(bool),
    Number(f64),
    Str(String),
}

impl From<&str> for StyleValue {
    fn from(s: &str) -> Self {
        StyleValue::Str(s.to_string())
    }
}

impl From<String> for StyleValue {
    fn from(s: String) -> Self {
        StyleValue::Str(s)
    }
}

impl From<f64> for StyleValue {
    fn from(n: f64) -> Self {
        StyleValue::Number(n)
    }
}

impl From<i32> for StyleValue {
    fn from(n: i32) -> Self {
        StyleValue::Number(n.into())
    }
}

impl From<bool> for StyleValue {
    fn from(b: bool) -> Self {
        StyleValue::Bool(b)
    }
}

/// Style object in camelCase form (`backgroundColor`), kept in insertion order.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct StyleMap {
    entries: Vec<(String, StyleValue)>,
}

impl StyleMap {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with(mut self, name: impl Into<String>, value: impl Into<StyleValue>) -> Self {
        self.insert(name, value);
        self
    }

    pub fn insert(&mut self, name: impl Into<String>, value: impl Into<StyleValue>) {
        let name = name.into();
        let value = value.into();
        match self.entries.iter_mut().find(|(n, _)| *n == name) {
            Some(entry) => entry.1 = value,
            None => self.entries.push((name, value)),
        }
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &StyleValue)> {
        self.entries.iter().map(|(n, v)| (n.as_str(), v))
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl<K: Into<String>, V: Into<StyleValue>> FromIterator<(K, V)> for StyleMap {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        let mut style = StyleMap::new();
        for (k, v) in iter {
            style.insert(k, v);
        }
        style
    }
}

/// `backgroundColor` → `background-color`, `msTransition` → `-ms-transition`.
pub fn hyphenate_style_name(name: &str) -> String {
    let mut out = String::with_capacity(name.len() + 4);
    for ch in name.chars() {
        if ch.is_ascii_uppercase() {
            out.push('-');
            out.push(ch.to_ascii_lowercase());
        } else {
            out.push(ch.to_ascii_lowercase());
        }
    }
    if out.starts_with("ms-") {
        out.insert(0, '-');
    }
    out
}

/// Memo table for hyphenated style names.
///
/// Safe to share between threads; a given name always maps to the same
/// hyphenated form, so the cache never changes output.
#[derive(Debug, Default)]
pub struct StyleNameCache {
    names: DashMap<String, String>,
}

impl StyleNameCache {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn hyphenate(&self, name: &str) -> String {
        if let Some(hit) = self.names.get(name) {
            return hit.value().clone();
        }
        let hyphenated = hyphenate_style_name(name);
        self.names.insert(name.to_string(), hyphenated.clone());
        hyphenated
    }

    pub fn len(&self) -> usize {
        self.names.len()
    }

    pub fn is_empty(&self) -> bool {
        self.names.is_empty()
    }
}

// ─── Unitless numbers ───────────────────────────────────────────────────────

const UNITLESS_NUMBERS: &[&str] = &[
    "animationIterationCount",
    "aspectRatio",
    "borderImageOutset",
    "borderImageSlice",
    "borderImageWidth",
    "boxFlex",
    "boxFlexGroup",
    "boxOrdinalGroup",
    "columnCount",
    "columns",
    "flex",
    "flexGrow",
    "flexPositive",
    "flexShrink",
    "flexNegative",
    "flexOrder",
    "gridArea",
    "gridRow",
    "gridRowEnd",
    "gridRowSpan",
    "gridRowStart",
    "gridColumn",
    "gridColumnEnd",
    "gridColumnSpan",
    "gridColumnStart",
    "fontWeight",
    "lineClamp",
    "lineHeight",
    "opacity",
    "order",
    "orphans",
    "tabSize",
    "widows",
    "zIndex",
    "zoom",
    "fillOpacity",
    "floodOpacity",
    "stopOpacity",
    "strokeDasharray",
    "strokeDashoffset",
    "strokeMiterlimit",
    "strokeOpacity",
    "strokeWidth",
];

const VENDOR_PREFIXES: &[&str] = &["Webkit", "ms", "Moz", "O"];

/// Returns true if a numeric value for this property takes no `px` suffix.
pub fn is_unitless_number(name: &str) -> bool {
    static UNITLESS: OnceLock<std::collections::HashSet<String>> = OnceLock::new();
    let table = UNITLESS.get_or_init(|| {
        let mut set = std::collections::HashSet::new();
        for &name in UNITLESS_NUMBERS {
            set.insert(name.to_string());
            let mut chars = name.chars();
            if let Some(first) = chars.next() {
                let capitalized: String = first.to_ascii_uppercase().to_string() + chars.as_str();
                for prefix in VENDOR_PREFIXES {
                    set.insert(format!("{}{}", prefix, capitalized));
                }
            }
        }
        set
    });
    table.contains(name)
}

/// Serializes one style value, or `None` if the declaration must be omitted.
fn style_value_to_css(name: &str, value: &StyleValue, is_custom_property: bool) -> Option<String> {
    match value {
        StyleValue::Null | StyleValue::Bool(_) => None,
        StyleValue::Str(s) => {
            let trimmed = s.trim();
            if trimmed.is_empty() {
                None
            } else {
                Some(trimmed.to_string())
            }
        }
        StyleValue::Number(n) if !n.is_finite() => None,
        StyleValue::Number(n) => {
            if is_custom_property || *n == 0.0 || is_unitless_number(name) {
                Some(number_to_string(*n))
            } else {
                Some(format!("{}px", number_to_string(*n)))
            }
        }
    }
}

/// Reduces a style object to a declaration string (`color:red;margin:4px`).
///
/// Custom properties (`--x`) keep their name as written. Returns `None`
/// when no declaration survives.
pub fn create_markup_for_styles(styles: &StyleMap, cache: &StyleNameCache) -> Option<String> {
    let mut serialized = String::new();
    let mut delimiter = "";
    for (name, value) in styles.iter() {
        let is_custom_property = name.starts_with("--");
        let Some(css_value) = style_value_to_css(name, value, is_custom_property) else {
            tracing::trace!(property = name, "omitting style declaration");
            continue;
        };
        serialized.push_str(delimiter);
        if is_custom_property {
            serialized.push_str(name);
        } else {
            serialized.push_str(&cache.hyphenate(name));
        }
        serialized.push(':');
        serialized.push_str(&css_value);
        delimiter = ";";
    }
    if serialized.is_empty() {
        None
    } else {
        Some(serialized)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_hyphenate_style_name() {
        assert_eq!(hyphenate_style_name("backgroundColor"), "background-color");
        assert_eq!(hyphenate_style_name("color"), "color");
        assert_eq!(hyphenate_style_name("msTransition"), "-ms-transition");
        assert_eq!(hyphenate_style_name("WebkitTransform"), "-webkit-transform");
    }

    #[test]
    fn test_custom_property_and_order() {
        let cache = StyleNameCache::new();
        let style = StyleMap::new().with("backgroundColor", "red").with("--x", "1");
        assert_eq!(
            create_markup_for_styles(&style, &cache),
            Some("background-color:red;--x:1".to_string())
        );
    }

    #[test]
    fn test_null_values_skipped() {
        let cache = StyleNameCache::new();
        let style = StyleMap::new()
            .with("color", StyleValue::Null)
            .with("margin", "0 auto");
        assert_eq!(
            create_markup_for_styles(&style, &cache),
            Some("margin:0 auto".to_string())
        );
    }

    #[test]
    fn test_empty_style_is_none() {
        let cache = StyleNameCache::new();
        assert_eq!(create_markup_for_styles(&StyleMap::new(), &cache), None);
        let only_null = StyleMap::new().with("color", StyleValue::Null);
        assert_eq!(create_markup_for_styles(&only_null, &cache), None);
    }

    #[test]
    fn test_malformed_values_omitted() {
        let cache = StyleNameCache::new();
        let style = StyleMap::new()
            .with("display", true)
            .with("color", "  ")
            .with("width", f64::NAN)
            .with("height", 10);
        assert_eq!(
            create_markup_for_styles(&style, &cache),
            Some("height:10px".to_string())
        );
    }

    #[test]
    fn test_numeric_units() {
        let cache = StyleNameCache::new();
        let style = StyleMap::new()
            .with("width", 12)
            .with("opacity", 0.5)
            .with("zIndex", 3)
            .with("margin", 0)
            .with("WebkitFlexGrow", 1)
            .with("--gap", 8);
        assert_eq!(
            create_markup_for_styles(&style, &cache),
            Some("width:12px;opacity:0.5;z-index:3;margin:0;-webkit-flex-grow:1;--gap:8".to_string())
        );
    }

    #[test]
    fn test_cache_memoizes() {
        let cache = StyleNameCache::new();
        assert!(cache.is_empty());
        assert_eq!(cache.hyphenate("fontSize"), "font-size");
        assert_eq!(cache.hyphenate("fontSize"), "font-size");
        assert_eq!(cache.len(), 1);
    }
}
