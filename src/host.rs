//! The two seams spec §6 calls "downward to the host runtime": a
//! producer of subexpression values, and the allocator that wraps a
//! finished store into a user-visible array. Both are out of scope per
//! spec §1 ("we consume opaque producers of values... we consume an
//! allocator that pairs a store with a size") — this module only defines
//! the traits a host implements.

use crate::error::ArrayEngineError;
use crate::store::Store;
use crate::value::Value;

/// A source of subexpression values for literal-array construction.
///
/// `evaluate` is called once per subexpression, strictly in order — spec
/// §4.2's ordering guarantee ("no subexpression may be skipped,
/// re-evaluated, or reordered") is a property of how the literal site
/// *calls* this trait, not of the trait itself, so it is documented here
/// and enforced by every call site in `literal.rs`.
pub trait ValueProducer {
    type Error;

    /// Evaluate the `index`-th subexpression and return its value.
    /// Errors propagate unchanged (spec §7: "Subexpression producers may
    /// themselves fail; such failures propagate through the engine
    /// unchanged, leaving the site's current specialisation unchanged").
    fn evaluate(&mut self, index: usize) -> Result<Value, Self::Error>;
}

/// The factory that turns a finished `(Store, length)` pair into a
/// user-visible array object (spec §1: "object allocation for the
/// finished array wrapper... we consume an allocator that pairs a store
/// with a size").
pub trait ArrayAllocator {
    type Array;

    fn allocate(&mut self, store: Store, length: usize) -> Self::Array;
}

/// A source array for `append_array`, i.e. "extension by a whole source
/// array" from spec §1. `shape_name` backs spec §7's "unrecoverable
/// error naming the shape" when the builder sees a store shape the
/// object variant hasn't been taught to fast-path.
pub trait SourceArray {
    /// Borrow the underlying store so the builder can classify its shape
    /// and pick a fast or slow append path.
    fn store(&self) -> &Store;
}

impl SourceArray for Store {
    fn store(&self) -> &Store {
        self
    }
}

/// Convenience used by the object-variant builder (spec §4.3's
/// `seenInt`/`seenLong`/`seenDouble`/`seenObject` bookkeeping) when it
/// encounters a shape it has no fast path for at all — this should be
/// unreachable given the five shapes this crate knows about, and exists
/// only to give spec §7's "fifth representation added without updating
/// the object builder" scenario a concrete, named error instead of a
/// silent `_ => unreachable!()`.
pub fn unsupported_shape_error(name: &'static str) -> ArrayEngineError {
    ArrayEngineError::UnsupportedStoreShape(name)
}
