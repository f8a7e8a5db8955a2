//! Low-level program model for irfit.
//!
//! The IR pool is a flat, append-only arena of the elements reconstructed
//! from a compiled artifact: types, fields, methods and the instruction-level
//! elements of method bodies. Every element carries a globally unique textual
//! id and an optional source-line hint.
//!
//! Pools are assembled with [`IrPoolBuilder`], either programmatically or from
//! a serialized [`IrModel`], and are immutable once [`IrPoolBuilder::finish`]
//! returns. Consumption state is tracked by the matcher, not here, so a pool
//! can be shared read-only by every matching pass.

pub mod builder;
pub mod elements;
pub mod error;
pub mod flags;
pub mod ids;
pub mod model;
pub mod pool;

pub use builder::{IrBuild, IrPoolBuilder, field_id, method_id};
pub use elements::*;
pub use error::IrLoadError;
pub use flags::IrModifiers;
pub use ids::*;
pub use model::{IrModel, load_pool};
pub use pool::IrPool;
