//! # Scriban Markup
//!
//! Renders component trees to HTML-like template documents with Scriban
//! placeholders (`#{{ name }}`) that a separate templating engine fills in.
//!
//! ## Features
//! - Property classification: known DOM properties, template-bound props, safe custom attributes
//! - Boolean and overloaded-boolean attributes, style objects, void elements, raw HTML
//! - Deterministic, indented document assembly with a generated-timestamp preamble
//! - Components in code (the [`Component`] trait) or in YAML ([`ComponentFile`])
//!
//! ## Example
//! ```ignore
//! use scriban_markup::{render, Component, Element, KnownProps, MemoryTarget, Node, Props};
//!
//! struct List;
//!
//! impl Component for List {
//!     fn render(&self, props: &Props) -> Node {
//!         Element::new("ul")
//!             .prop("id", props.get("id").cloned())
//!             .children((1..=3).map(|n| Element::new("li").text(n.to_string())))
//!             .into()
//!     }
//!
//!     fn known_props(&self) -> KnownProps {
//!         ["id"].into_iter().collect()
//!     }
//! }
//!
//! let mut target = MemoryTarget::new();
//! render(&List, Some(&Props::new().with("id", "list")), &mut target).unwrap();
//! // {{ # Template auto generated 2024-01-01T00:00:00Z }}
//! //
//! // <ul id="#{{ id }}">
//! //     <li>1</li>
//! //     ...
//! ```

pub mod assembler;
pub mod component_file;
pub mod config;
pub mod error;
pub mod escape;
pub mod host;
pub mod node;
pub mod props;
pub mod registry;
pub mod render;
pub mod style;
pub mod synthesizer;

// --- Core types ---
pub use assembler::{assemble, Assembler};
pub use config::RenderConfig;
pub use error::{MarkupError, MarkupResult};
pub use host::{mount, Host, TemplateHost};
pub use node::{RenderedChild, RenderedNode};
pub use props::{Element, KnownProps, Node, PropValue, Props, RawHtml};
pub use registry::{is_safe_attribute_name, lookup, should_ignore, PropertyDescriptor, PropertyKind};
pub use style::{StyleMap, StyleNameCache, StyleValue};
pub use synthesizer::{ChildSource, PlaceholderPolicy, Synthesized, Synthesizer};

// --- Rendering ---
pub use render::{render, Component, FileTarget, MemoryTarget, OutputTarget, Renderer};

// --- Component file types ---
pub use component_file::{load_component_file, parse_component_file, ComponentFile};
