use chrono::{DateTime, Utc};
use std::path::{Path, PathBuf};
use std::sync::Arc;

use crate::assembler::Assembler;
use crate::config::RenderConfig;
use crate::error::{MarkupError, MarkupResult};
use crate::host::{mount, Host, TemplateHost};
use crate::props::{KnownProps, Node, Props};
use crate::style::StyleNameCache;
use crate::synthesizer::Synthesizer;

/// A renderable component: a function from props to a tree, plus the
/// props it declares.
pub trait Component {
    fn render(&self, props: &Props) -> Node;

    /// Merged under caller props; caller values win.
    fn default_props(&self) -> Props {
        Props::new()
    }

    /// Props bound by the template engine at render time. Each becomes a
    /// placeholder attribute wherever the tree sets it.
    fn known_props(&self) -> KnownProps {
        KnownProps::new()
    }
}

/// Destination of a rendered document. Writing replaces any document
/// previously written to the same target.
pub trait OutputTarget {
    fn describe(&self) -> String;

    fn write_document(&mut self, document: &str) -> MarkupResult<()>;
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FileTarget {
    path: PathBuf,
}

impl FileTarget {
    pub fn new(path: impl AsRef<Path>) -> Self {
        Self {
            path: path.as_ref().to_path_buf(),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl OutputTarget for FileTarget {
    fn describe(&self) -> String {
        self.path.display().to_string()
    }

    fn write_document(&mut self, document: &str) -> MarkupResult<()> {
        std::fs::write(&self.path, document).map_err(|e| MarkupError::io(self.describe(), e))
    }
}

/// In-memory target, mostly for tests and embedding.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MemoryTarget {
    document: Option<String>,
    writes: usize,
}

impl MemoryTarget {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn document(&self) -> Option<&str> {
        self.document.as_deref()
    }

    pub fn writes(&self) -> usize {
        self.writes
    }
}

impl OutputTarget for MemoryTarget {
    fn describe(&self) -> String {
        "<memory>".to_string()
    }

    fn write_document(&mut self, document: &str) -> MarkupResult<()> {
        self.document = Some(document.to_string());
        self.writes += 1;
        Ok(())
    }
}

/// Renders components to template documents.
///
/// Cheap to clone; clones share the style-name cache.
#[derive(Debug, Clone, Default)]
pub struct Renderer {
    config: RenderConfig,
    style_names: Arc<StyleNameCache>,
    timestamp: Option<DateTime<Utc>>,
}

impl Renderer {
    pub fn new(config: RenderConfig) -> Self {
        Self {
            config,
            ..Self::default()
        }
    }

    pub fn with_style_cache(mut self, style_names: Arc<StyleNameCache>) -> Self {
        self.style_names = style_names;
        self
    }

    /// Pins the preamble timestamp for reproducible output.
    pub fn at(mut self, timestamp: DateTime<Utc>) -> Self {
        self.timestamp = Some(timestamp);
        self
    }

    pub fn config(&self) -> &RenderConfig {
        &self.config
    }

    fn host(&self, known_props: KnownProps) -> TemplateHost {
        let synthesizer = Synthesizer::new(
            Arc::clone(&self.style_names),
            self.config.placeholder_policy(),
        );
        let mut assembler = Assembler::new(&self.config);
        if let Some(timestamp) = self.timestamp {
            assembler = assembler.at(timestamp);
        }
        TemplateHost::new(synthesizer, known_props, assembler)
    }

    pub fn render_to_string<C: Component + ?Sized>(&self, component: &C, props: Option<&Props>) -> String {
        let defaults = component.default_props();
        let merged = match props {
            Some(props) => defaults.merged(props),
            None => defaults,
        };
        let tree = component.render(&merged);
        let host = self.host(component.known_props());
        let root = mount(&host, &tree);
        host.finalize(root)
    }

    /// Renders `component` and writes the document to `target`,
    /// replacing whatever the target held.
    pub fn render<C: Component + ?Sized>(
        &self,
        component: &C,
        props: Option<&Props>,
        target: &mut dyn OutputTarget,
    ) -> MarkupResult<()> {
        let document = self.render_to_string(component, props);
        tracing::debug!(target_name = %target.describe(), bytes = document.len(), "flushing document");
        target.write_document(&document)
    }
}

/// Renders with the default configuration.
pub fn render<C: Component + ?Sized>(
    component: &C,
    props: Option<&Props>,
    target: &mut dyn OutputTarget,
) -> MarkupResult<()> {
    Renderer::default().render(component, props, target)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::props::Element;
    use chrono::TimeZone;
    use pretty_assertions::assert_eq;

    struct Badge;

    impl Component for Badge {
        fn render(&self, props: &Props) -> Node {
            let label = props
                .get("label")
                .and_then(|v| v.to_text())
                .unwrap_or_default();
            Element::new("span")
                .prop("id", props.get("id").cloned())
                .text(label)
                .into()
        }

        fn default_props(&self) -> Props {
            Props::new().with("id", "badge").with("label", "new")
        }

        fn known_props(&self) -> KnownProps {
            ["id"].into_iter().collect()
        }
    }

    fn renderer() -> Renderer {
        Renderer::default().at(Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap())
    }

    #[test]
    fn test_defaults_and_placeholders() {
        let doc = renderer().render_to_string(&Badge, None);
        assert_eq!(
            doc,
            "{{ # Template auto generated 2024-01-01T00:00:00Z }}\n\n<span id=\"#{{ id }}\">new</span>"
        );
    }

    #[test]
    fn test_caller_props_win() {
        let props = Props::new().with("label", "hot");
        let doc = renderer().render_to_string(&Badge, Some(&props));
        assert!(doc.ends_with(">hot</span>"));
    }

    #[test]
    fn test_render_overwrites_target() {
        let mut target = MemoryTarget::new();
        renderer().render(&Badge, None, &mut target).unwrap();
        let props = Props::new().with("label", "second");
        renderer().render(&Badge, Some(&props), &mut target).unwrap();
        assert_eq!(target.writes(), 2);
        let doc = target.document().unwrap();
        assert!(doc.ends_with(">second</span>"));
        assert_eq!(doc.matches("auto generated").count(), 1);
    }

    #[test]
    fn test_preamble_disabled() {
        let config = RenderConfig {
            preamble: false,
            ..RenderConfig::default()
        };
        let doc = Renderer::new(config).render_to_string(&Badge, None);
        assert_eq!(doc, "<span id=\"#{{ id }}\">new</span>");
    }

    #[test]
    fn test_shared_style_cache() {
        let cache = Arc::new(StyleNameCache::new());
        let renderer = Renderer::default().with_style_cache(Arc::clone(&cache));
        struct Styled;
        impl Component for Styled {
            fn render(&self, _: &Props) -> Node {
                Element::new("div")
                    .prop("style", crate::style::StyleMap::new().with("fontSize", 12))
                    .into()
            }
        }
        let doc = renderer.render_to_string(&Styled, None);
        assert!(doc.ends_with("<div style=\"font-size:12px\"></div>"));
        assert_eq!(cache.len(), 1);
    }

    #[test]
    fn test_file_target_error() {
        let mut target = FileTarget::new("/nonexistent-dir/out.sbn");
        let err = renderer().render(&Badge, None, &mut target).unwrap_err();
        assert!(matches!(err, MarkupError::Io { .. }));
        assert!(err.to_string().contains("/nonexistent-dir/out.sbn"));
    }
}
