// Prevent accidental debug output in library code.
#![deny(clippy::print_stderr)]

//! A specializing array-storage engine for a dynamic-language runtime.
//!
//! Two call-site shapes build arrays: [`literal::LiteralArraySite`] for
//! fixed-arity literals (`[e1, e2, ..., eN]`) and [`builder::ArrayBuilder`]
//! for incrementally-built arrays of arity unknown until `finish`. Both
//! share the same underlying [`store::Store`] representation and the same
//! [`specialize::SpecializingSlot`] controller: a call site starts generic,
//! classifies its first full execution, and from then on runs a
//! speculative specialized path that widens — monotonically, and only as
//! far as the next value actually requires — on the first value its
//! current shape can't hold.

pub mod builder;
pub mod config;
pub mod error;
pub mod host;
pub mod literal;
pub mod specialize;
pub mod store;
pub mod value;

pub use builder::{ArrayBuilder, BuildState};
pub use config::EngineConfig;
pub use error::ArrayEngineError;
pub use host::{ArrayAllocator, SourceArray, ValueProducer};
pub use literal::LiteralArraySite;
pub use specialize::empty_sentinel;
pub use store::{Shape, Store};
pub use value::{Value, ValueKind};
