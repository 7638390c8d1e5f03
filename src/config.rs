use regex::Regex;
use serde::{Deserialize, Serialize};
use std::path::Path;
use std::sync::OnceLock;

use crate::error::{MarkupError, MarkupResult};
use crate::synthesizer::PlaceholderPolicy;

/// Rendering options. Every field has a default, so an empty YAML
/// document is a valid config.
///
/// ```yaml
/// indent: "  "
/// itemScope: item
/// placeholderScope: model
/// preamble: false
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default, deny_unknown_fields)]
pub struct RenderConfig {
    /// Indentation unit, repeated once per depth.
    pub indent: String,
    /// Placeholder prefix on custom elements.
    pub item_scope: String,
    /// Placeholder prefix on standard elements.
    pub placeholder_scope: Option<String>,
    /// Emit the generated-timestamp comment.
    pub preamble: bool,
}

impl Default for RenderConfig {
    fn default() -> Self {
        Self {
            indent: "\t".to_string(),
            item_scope: "currentItem".to_string(),
            placeholder_scope: None,
            preamble: true,
        }
    }
}

impl RenderConfig {
    pub fn from_yaml_str(input: &str) -> MarkupResult<Self> {
        // serde_yaml reads an empty document as unit, not as an empty map
        if input.trim().is_empty() {
            return Ok(Self::default());
        }
        let config: RenderConfig = serde_yaml::from_str(input)?;
        config.validate()?;
        Ok(config)
    }

    pub fn from_path(path: impl AsRef<Path>) -> MarkupResult<Self> {
        let path = path.as_ref();
        let input = std::fs::read_to_string(path)
            .map_err(|e| MarkupError::io(path.display().to_string(), e))?;
        Self::from_yaml_str(&input)
    }

    pub fn validate(&self) -> MarkupResult<()> {
        if !self.indent.chars().all(char::is_whitespace) {
            return Err(MarkupError::InvalidConfig(format!(
                "indent must be whitespace, got {:?}",
                self.indent
            )));
        }
        validate_scope("itemScope", &self.item_scope)?;
        if let Some(scope) = &self.placeholder_scope {
            validate_scope("placeholderScope", scope)?;
        }
        Ok(())
    }

    pub fn placeholder_policy(&self) -> PlaceholderPolicy {
        PlaceholderPolicy {
            item_scope: self.item_scope.clone(),
            scope: self.placeholder_scope.clone(),
        }
    }
}

/// Scopes are dotted template identifiers: `currentItem`, `page.model`.
fn validate_scope(field: &str, scope: &str) -> MarkupResult<()> {
    static SCOPE_REGEX: OnceLock<Regex> = OnceLock::new();
    let re = SCOPE_REGEX.get_or_init(|| {
        Regex::new(r"^[A-Za-z_][A-Za-z0-9_]*(\.[A-Za-z_][A-Za-z0-9_]*)*$").unwrap()
    });
    if re.is_match(scope) {
        Ok(())
    } else {
        Err(MarkupError::InvalidConfig(format!(
            "{} must be a dotted identifier, got '{}'",
            field, scope
        )))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_empty_document_is_default() {
        assert_eq!(RenderConfig::from_yaml_str("").unwrap(), RenderConfig::default());
    }

    #[test]
    fn test_partial_override() {
        let config = RenderConfig::from_yaml_str("indent: \"  \"\nplaceholderScope: i_item\n").unwrap();
        assert_eq!(config.indent, "  ");
        assert_eq!(config.item_scope, "currentItem");
        assert_eq!(config.placeholder_scope.as_deref(), Some("i_item"));
        assert!(config.preamble);
    }

    #[test]
    fn test_unknown_field_rejected() {
        let err = RenderConfig::from_yaml_str("indnet: x").unwrap_err();
        assert!(matches!(err, MarkupError::Yaml(_)));
    }

    #[test]
    fn test_invalid_scope() {
        let err = RenderConfig::from_yaml_str("itemScope: \"a b\"").unwrap_err();
        match err {
            MarkupError::InvalidConfig(msg) => assert!(msg.contains("itemScope")),
            other => panic!("Expected InvalidConfig, got {:?}", other),
        }
    }

    #[test]
    fn test_non_whitespace_indent() {
        let err = RenderConfig::from_yaml_str("indent: \"->\"").unwrap_err();
        assert!(matches!(err, MarkupError::InvalidConfig(_)));
    }

    #[test]
    fn test_from_path() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "preamble: false").unwrap();
        let config = RenderConfig::from_path(file.path()).unwrap();
        assert!(!config.preamble);
    }

    #[test]
    fn test_missing_file() {
        let err = RenderConfig::from_path("/nonexistent/render.yaml").unwrap_err();
        assert!(matches!(err, MarkupError::Io { .. }));
    }

    #[test]
    fn test_placeholder_policy() {
        let policy = RenderConfig::default().placeholder_policy();
        assert_eq!(policy, PlaceholderPolicy::default());
    }
}
