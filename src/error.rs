use thiserror::Error;

pub type MarkupResult<T> = Result<T, MarkupError>;

/// Errors raised by the outer surfaces of the renderer.
///
/// Markup synthesis and document assembly never fail: unknown or unsafe
/// properties are dropped and malformed style values are omitted. Only
/// loading inputs and writing the finished document can go wrong.
#[derive(Error, Debug)]
pub enum MarkupError {
    #[error("I/O error on {target}: {source}")]
    Io {
        target: String,
        #[source]
        source: std::io::Error,
    },

    #[error("YAML error: {0}")]
    Yaml(#[from] serde_yaml::Error),

    #[error("Invalid component file: {reason}")]
    InvalidComponentFile { reason: String },

    #[error("Invalid node at '{path}': {reason}")]
    InvalidNode { path: String, reason: String },

    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),
}

impl MarkupError {
    pub(crate) fn io(target: impl Into<String>, source: std::io::Error) -> Self {
        MarkupError::Io {
            target: target.into(),
            source,
        }
    }
}
