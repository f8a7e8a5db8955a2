//! Source-side program model for irfit.
//!
//! A [`SourceFile`] is an arena of the elements reconstructed from one
//! source file. Element handles are typed indices into that arena; every
//! element carries an optional position and a write-once [`MatchLink`] to
//! the IR element it was matched with.
//!
//! Source text is never parsed here: a [`SourceFrontend`] turns a file into
//! a `SourceFile`. The shipped [`ModelFrontend`] reads serialized source
//! trees (`*.src.json`) produced by an external parser.

pub mod elements;
pub mod file;
pub mod frontend;
pub mod ids;
pub mod imports;
pub mod model_frontend;
pub mod resolver;

pub use elements::*;
pub use file::SourceFile;
pub use frontend::{FrontendError, FrontendRegistry, SourceFrontend};
pub use ids::*;
pub use imports::Import;
pub use model_frontend::ModelFrontend;
pub use resolver::{FuzzyTypeResolver, MethodCandidates};
