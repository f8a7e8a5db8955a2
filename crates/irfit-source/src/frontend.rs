//! Source front ends.
//!
//! A front end turns the text of one source file into a [`SourceFile`].
//! The [`FrontendRegistry`] picks the front end by file suffix.

use crate::file::SourceFile;
use crate::model_frontend::ModelFrontend;
use std::fmt;
use std::path::{Path, PathBuf};

/// Error produced while reading a source file into a model.
#[derive(Debug)]
pub enum FrontendError {
    Io {
        path: PathBuf,
        source: std::io::Error,
    },
    /// The input is not a well-formed document for the front end.
    Syntax { path: PathBuf, message: String },
    /// No registered front end accepts the file.
    Unsupported { path: PathBuf },
}

impl fmt::Display for FrontendError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FrontendError::Io { path, source } => {
                write!(f, "cannot read {}: {}", path.display(), source)
            }
            FrontendError::Syntax { path, message } => {
                write!(f, "{}: {}", path.display(), message)
            }
            FrontendError::Unsupported { path } => {
                write!(f, "no source front end accepts {}", path.display())
            }
        }
    }
}

impl std::error::Error for FrontendError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            FrontendError::Io { source, .. } => Some(source),
            _ => None,
        }
    }
}

/// Builds a [`SourceFile`] from source text.
pub trait SourceFrontend {
    /// Short name for logs.
    fn name(&self) -> &'static str;

    /// File-name suffixes this front end accepts (lower case).
    fn suffixes(&self) -> &[&'static str];

    /// Parse `text`; `path` is the path reported for the file.
    fn parse(&self, path: &str, text: &str) -> Result<SourceFile, FrontendError>;

    fn accepts(&self, file_name: &str) -> bool {
        let lower = file_name.to_ascii_lowercase();
        self.suffixes().iter().any(|suffix| lower.ends_with(suffix))
    }
}

/// Registered front ends, consulted in registration order.
pub struct FrontendRegistry {
    frontends: Vec<Box<dyn SourceFrontend>>,
}

impl Default for FrontendRegistry {
    fn default() -> Self {
        let mut registry = FrontendRegistry::empty();
        registry.register(Box::new(ModelFrontend));
        registry
    }
}

impl FrontendRegistry {
    /// A registry with the shipped front ends.
    pub fn new() -> Self {
        Self::default()
    }

    pub fn empty() -> Self {
        FrontendRegistry {
            frontends: Vec::new(),
        }
    }

    pub fn register(&mut self, frontend: Box<dyn SourceFrontend>) {
        self.frontends.push(frontend);
    }

    /// First front end accepting `file_name`.
    pub fn select(&self, file_name: &str) -> Option<&dyn SourceFrontend> {
        self.frontends
            .iter()
            .find(|frontend| frontend.accepts(file_name))
            .map(|frontend| frontend.as_ref())
    }

    /// True if some front end accepts `file_name`.
    pub fn supports(&self, file_name: &str) -> bool {
        self.select(file_name).is_some()
    }

    /// Read `path` from disk and parse it, reporting it as `display_path`.
    pub fn parse_file(&self, path: &Path, display_path: &str) -> Result<SourceFile, FrontendError> {
        let file_name = path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_default();
        let Some(frontend) = self.select(&file_name) else {
            return Err(FrontendError::Unsupported {
                path: path.to_path_buf(),
            });
        };
        let text = std::fs::read_to_string(path).map_err(|source| FrontendError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        tracing::debug!(path = %path.display(), frontend = frontend.name(), "parsing source model");
        frontend.parse(display_path, &text)
    }
}
