//! Errors the engine can surface to subexpression producers.
//!
//! Per spec §7, type mismatches never produce errors — they drive
//! specialization transitions instead. What remains is a small, mostly
//! unrecoverable taxonomy, modeled directly on `vm::error::VmError`'s
//! flat-enum-plus-hand-written-`Display` shape.

/// Errors the engine itself can produce.
///
/// `EmptyStoreMisuse` and `UnsupportedStoreShape` both correspond to
/// spec's "unrecoverable assertion" cases: they indicate a caller bug
/// (reading the empty sentinel, or appending from a store shape the
/// object builder doesn't recognize), not a runtime condition a caller
/// can meaningfully recover from. They are still modeled as an `Error`
/// type rather than a bare `panic!` so callers that want to convert them
/// into a host-level assertion can do so at the boundary of their choice.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ArrayEngineError {
    /// Read, sort, or iterate on a non-zero range of the `Empty` sentinel.
    EmptyStoreMisuse,
    /// `append_array` received a source store whose shape this build does
    /// not recognize (spec §7: "a fifth representation added without
    /// updating the object builder").
    UnsupportedStoreShape(&'static str),
}

impl std::fmt::Display for ArrayEngineError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::EmptyStoreMisuse => {
                write!(f, "attempted to read or index the empty array sentinel")
            }
            Self::UnsupportedStoreShape(shape) => {
                write!(f, "append_array: unsupported source store shape {shape}")
            }
        }
    }
}

impl std::error::Error for ArrayEngineError {}
