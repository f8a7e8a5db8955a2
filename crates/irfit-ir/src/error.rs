//! Errors raised while loading IR model files.

use std::fmt;
use std::path::PathBuf;

/// Failure to read or decode a serialized IR model.
#[derive(Debug)]
pub enum IrLoadError {
    Io {
        path: PathBuf,
        source: std::io::Error,
    },
    Parse {
        path: PathBuf,
        source: serde_json::Error,
    },
    UnknownModifier {
        path: PathBuf,
        element: String,
        modifier: String,
    },
}

impl fmt::Display for IrLoadError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            IrLoadError::Io { path, source } => {
                write!(f, "cannot read IR model {}: {}", path.display(), source)
            }
            IrLoadError::Parse { path, source } => {
                write!(f, "malformed IR model {}: {}", path.display(), source)
            }
            IrLoadError::UnknownModifier {
                path,
                element,
                modifier,
            } => write!(
                f,
                "unknown modifier '{}' on {} in {}",
                modifier,
                element,
                path.display()
            ),
        }
    }
}

impl std::error::Error for IrLoadError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            IrLoadError::Io { source, .. } => Some(source),
            IrLoadError::Parse { source, .. } => Some(source),
            IrLoadError::UnknownModifier { .. } => None,
        }
    }
}
