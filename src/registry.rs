//! Static table of known DOM properties and the attribute-name safety check.

use regex::Regex;
use std::borrow::Cow;
use std::collections::HashMap;
use std::sync::OnceLock;

/// Props consumed by the renderer itself; never emitted as attributes.
pub const RESERVED_PROPS: &[&str] = &[
    "children",
    "dangerouslySetInnerHTML",
    "suppressContentEditableWarning",
    "suppressHydrationWarning",
];

/// How a known property is serialized.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PropertyKind {
    /// Internal to the component model; never rendered.
    Reserved,
    /// Present as `name=""` when truthy, absent otherwise.
    Boolean,
    /// `name=""` when exactly `true`, otherwise a regular quoted value.
    OverloadedBoolean,
    /// Value is coerced to a string before quoting.
    UrlSanitized,
    /// Plain quoted and escaped value.
    Generic,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PropertyDescriptor {
    /// Attribute name written to the markup (e.g. `class` for `className`)
    pub attribute_name: Cow<'static, str>,
    pub kind: PropertyKind,
    pub must_sanitize_url: bool,
}

impl PropertyDescriptor {
    fn new(attribute_name: impl Into<Cow<'static, str>>, kind: PropertyKind) -> Self {
        Self {
            attribute_name: attribute_name.into(),
            kind,
            must_sanitize_url: matches!(kind, PropertyKind::UrlSanitized),
        }
    }
}

// ─── Property table ─────────────────────────────────────────────────────────

const RESERVED: &[&str] = &[
    "children",
    "dangerouslySetInnerHTML",
    "defaultValue",
    "defaultChecked",
    "innerHTML",
    "suppressContentEditableWarning",
    "suppressHydrationWarning",
];

/// Props whose attribute name differs from the prop name.
const RENAMED: &[(&str, &str)] = &[
    ("acceptCharset", "accept-charset"),
    ("className", "class"),
    ("htmlFor", "for"),
    ("httpEquiv", "http-equiv"),
];

/// Props rendered under their lower-cased name.
const LOWERCASED: &[&str] = &[
    "contentEditable",
    "draggable",
    "spellCheck",
    "value",
    "tabIndex",
    "crossOrigin",
    "rowSpan",
    "start",
    "cols",
    "rows",
    "size",
    "span",
];

/// SVG/XML props rendered under a hyphenated or namespaced name.
const SVG_RENAMED: &[(&str, &str)] = &[
    ("accentHeight", "accent-height"),
    ("alignmentBaseline", "alignment-baseline"),
    ("clipPath", "clip-path"),
    ("clipRule", "clip-rule"),
    ("colorInterpolation", "color-interpolation"),
    ("dominantBaseline", "dominant-baseline"),
    ("fillOpacity", "fill-opacity"),
    ("fillRule", "fill-rule"),
    ("floodColor", "flood-color"),
    ("fontFamily", "font-family"),
    ("fontSize", "font-size"),
    ("fontWeight", "font-weight"),
    ("markerEnd", "marker-end"),
    ("markerStart", "marker-start"),
    ("stopColor", "stop-color"),
    ("stopOpacity", "stop-opacity"),
    ("strokeDasharray", "stroke-dasharray"),
    ("strokeLinecap", "stroke-linecap"),
    ("strokeLinejoin", "stroke-linejoin"),
    ("strokeOpacity", "stroke-opacity"),
    ("strokeWidth", "stroke-width"),
    ("textAnchor", "text-anchor"),
    ("xlinkActuate", "xlink:actuate"),
    ("xlinkArcrole", "xlink:arcrole"),
    ("xlinkRole", "xlink:role"),
    ("xlinkShow", "xlink:show"),
    ("xlinkTitle", "xlink:title"),
    ("xlinkType", "xlink:type"),
    ("xmlBase", "xml:base"),
    ("xmlLang", "xml:lang"),
    ("xmlSpace", "xml:space"),
];

const BOOLEANS: &[&str] = &[
    "allowFullScreen",
    "async",
    "autoFocus",
    "autoPlay",
    "controls",
    "default",
    "defer",
    "disabled",
    "disablePictureInPicture",
    "disableRemotePlayback",
    "formNoValidate",
    "hidden",
    "loop",
    "noModule",
    "noValidate",
    "open",
    "playsInline",
    "readOnly",
    "required",
    "reversed",
    "scoped",
    "seamless",
    "itemScope",
    "checked",
    "multiple",
    "muted",
    "selected",
];

const OVERLOADED_BOOLEANS: &[&str] = &["capture", "download"];

const URLS: &[(&str, &str)] = &[
    ("src", "src"),
    ("href", "href"),
    ("action", "action"),
    ("formAction", "formaction"),
    ("xlinkHref", "xlink:href"),
];

fn properties() -> &'static HashMap<&'static str, PropertyDescriptor> {
    static PROPERTIES: OnceLock<HashMap<&'static str, PropertyDescriptor>> = OnceLock::new();
    PROPERTIES.get_or_init(|| {
        let mut table = HashMap::new();
        for &name in RESERVED {
            table.insert(name, PropertyDescriptor::new(name, PropertyKind::Reserved));
        }
        for &(name, attr) in RENAMED.iter().chain(SVG_RENAMED) {
            table.insert(name, PropertyDescriptor::new(attr, PropertyKind::Generic));
        }
        for &name in LOWERCASED {
            table.insert(
                name,
                PropertyDescriptor::new(name.to_ascii_lowercase(), PropertyKind::Generic),
            );
        }
        for &name in BOOLEANS {
            table.insert(
                name,
                PropertyDescriptor::new(name.to_ascii_lowercase(), PropertyKind::Boolean),
            );
        }
        for &name in OVERLOADED_BOOLEANS {
            table.insert(
                name,
                PropertyDescriptor::new(name, PropertyKind::OverloadedBoolean),
            );
        }
        for &(name, attr) in URLS {
            table.insert(name, PropertyDescriptor::new(attr, PropertyKind::UrlSanitized));
        }
        table
    })
}

// ─── Public lookups ─────────────────────────────────────────────────────────

/// Looks up the descriptor for a prop name. `None` means the property is unknown.
pub fn lookup(name: &str) -> Option<&'static PropertyDescriptor> {
    properties().get(name)
}

/// Returns true if `name` can be written as an attribute name without
/// breaking out of the tag (no whitespace, quotes, `<`, `>`, `=`, `/`).
pub fn is_safe_attribute_name(name: &str) -> bool {
    const START: &str = r":A-Z_a-z\x{C0}-\x{D6}\x{D8}-\x{F6}\x{F8}-\x{2FF}\x{370}-\x{37D}\x{37F}-\x{1FFF}\x{200C}-\x{200D}\x{2070}-\x{218F}\x{2C00}-\x{2FEF}\x{3001}-\x{D7FF}\x{F900}-\x{FDCF}\x{FDF0}-\x{FFFD}";
    const REST: &str = r"\-.0-9\x{B7}\x{300}-\x{36F}\x{203F}-\x{2040}";

    static ATTRIBUTE_NAME_REGEX: OnceLock<Regex> = OnceLock::new();
    let re = ATTRIBUTE_NAME_REGEX
        .get_or_init(|| Regex::new(&format!("^[{START}][{START}{REST}]*$")).unwrap());
    re.is_match(name)
}

/// Returns true if the prop must never reach the markup.
///
/// Known reserved props are always ignored. Unknown props on standard
/// elements are ignored when they look like event handlers (`onClick`).
pub fn should_ignore(
    name: &str,
    descriptor: Option<&PropertyDescriptor>,
    is_custom_element: bool,
) -> bool {
    if let Some(descriptor) = descriptor {
        return descriptor.kind == PropertyKind::Reserved;
    }
    if RESERVED_PROPS.contains(&name) {
        return true;
    }
    if is_custom_element {
        return false;
    }
    let bytes = name.as_bytes();
    bytes.len() > 2 && matches!(bytes[0], b'o' | b'O') && matches!(bytes[1], b'n' | b'N')
}
