//! Dynamic runtime value, classified at runtime into the shapes the
//! specializing store hierarchy cares about.
//!
//! A real host runtime owns its own value representation; this is the
//! minimal stand-in the array engine needs in order to be a compilable,
//! testable crate on its own. `Value` plays the role of
//! `vm::value::Value` in the teacher crate, trimmed to the four kinds
//! spec.md's classifier distinguishes.

use std::fmt;
use std::sync::Arc;

/// An opaque runtime value.
///
/// `Other` covers every dynamic value that is neither a 32-bit integer, a
/// 64-bit integer, nor a double: strings, booleans, nested arrays, user
/// objects, and so on. The engine never inspects `Other`'s payload; it
/// only ever boxes and copies it.
#[derive(Debug, Clone)]
pub enum Value {
    Int(i32),
    Long(i64),
    Double(f64),
    Other(Arc<dyn OpaqueValue>),
}

/// Marker trait for the payload carried by `Value::Other`.
///
/// Anything a host wants to put in an `Object`-shaped store implements
/// this; the engine requires nothing beyond `Debug`, plus `Send + Sync`
/// so that `Value` (and thus `Store`) can cross thread boundaries the way
/// spec §5's multi-threaded host model expects.
pub trait OpaqueValue: fmt::Debug + Send + Sync {}

impl<T: fmt::Debug + Send + Sync> OpaqueValue for T {}

/// The four kinds the classifier distinguishes, per spec §3.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ValueKind {
    Int32,
    Int64,
    Double,
    Other,
}

impl Value {
    /// Classify this value into one of the four kinds the store
    /// hierarchy understands.
    pub fn kind(&self) -> ValueKind {
        match self {
            Value::Int(_) => ValueKind::Int32,
            Value::Long(n) => {
                if fits_into_i32(*n) {
                    ValueKind::Int32
                } else {
                    ValueKind::Int64
                }
            }
            Value::Double(_) => ValueKind::Double,
            Value::Other(_) => ValueKind::Other,
        }
    }

    pub fn is_int32(&self) -> bool {
        matches!(self.kind(), ValueKind::Int32)
    }

    pub fn is_int64(&self) -> bool {
        matches!(self.kind(), ValueKind::Int32 | ValueKind::Int64)
    }

    pub fn is_double(&self) -> bool {
        matches!(self, Value::Double(_))
    }

    /// Coerce this value to `f64`, preserving integer values exactly
    /// within the range double can represent without loss (spec §6: the
    /// coercion used only by the literal `Double` path "must preserve
    /// integer values exactly").
    ///
    /// Returns `None` for values with no numeric interpretation.
    pub fn to_double_exact(&self) -> Option<f64> {
        match self {
            Value::Int(n) => Some(f64::from(*n)),
            Value::Long(n) => {
                let as_f = *n as f64;
                if as_f as i64 == *n {
                    Some(as_f)
                } else {
                    None
                }
            }
            Value::Double(d) => Some(*d),
            Value::Other(_) => None,
        }
    }

    /// The `i32` value of this value, if it fits exactly.
    pub fn as_i32(&self) -> Option<i32> {
        match self {
            Value::Int(n) => Some(*n),
            Value::Long(n) => i32::try_from(*n).ok(),
            _ => None,
        }
    }

    /// The `i64` value of this value, if it is integral.
    pub fn as_i64(&self) -> Option<i64> {
        match self {
            Value::Int(n) => Some(i64::from(*n)),
            Value::Long(n) => Some(*n),
            _ => None,
        }
    }

    /// The `f64` value of this value, if it is a `Double`.
    pub fn as_f64(&self) -> Option<f64> {
        match self {
            Value::Double(d) => Some(*d),
            _ => None,
        }
    }
}

impl PartialEq for Value {
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (Value::Int(a), Value::Int(b)) => a == b,
            (Value::Long(a), Value::Long(b)) => a == b,
            (Value::Double(a), Value::Double(b)) => a == b,
            // Opaque payloads compare by debug text; good enough for
            // tests, never relied on by the engine itself.
            (Value::Other(a), Value::Other(b)) => format!("{a:?}") == format!("{b:?}"),
            _ => false,
        }
    }
}

/// `fits-into-int32(long)` from spec §6.
pub fn fits_into_i32(n: i64) -> bool {
    i32::try_from(n).is_ok()
}
