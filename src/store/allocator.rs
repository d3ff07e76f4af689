//! Per-shape allocators: the factory + acceptance-predicate + default-value
//! surface from spec §3/§4.1, modeled on the role
//! `vm::value::array_element::ArrayElementType` plays for the teacher's
//! `ArrayData` — a small tag type that both names a shape and knows how
//! to build/validate storage of that shape.

use crate::value::{Value, ValueKind};

use super::{Shape, Store};

/// A per-shape factory, acceptance predicate, and default-value oracle.
///
/// Each shape has exactly one allocator, which is why these are
/// zero-sized marker types rather than instance data — the allocator
/// *is* the shape, from the caller's point of view.
pub trait Allocator: Copy + std::fmt::Debug {
    /// The shape this allocator produces.
    const SHAPE: Shape;

    /// Allocate a fresh store of this shape with the given buffer
    /// capacity and length 0.
    fn allocate(self, capacity: usize) -> Store;

    /// Can `value` be inserted without widening the store?
    fn accepts(self, value: &Value) -> bool;

    /// Is `value` equal to this shape's zero/default element?
    fn is_default_value(self, value: &Value) -> bool;
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct EmptyAllocator;

impl Allocator for EmptyAllocator {
    const SHAPE: Shape = Shape::Empty;

    fn allocate(self, _capacity: usize) -> Store {
        Store::Empty
    }

    fn accepts(self, _value: &Value) -> bool {
        false
    }

    fn is_default_value(self, _value: &Value) -> bool {
        false
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct IntAllocator;

impl Allocator for IntAllocator {
    const SHAPE: Shape = Shape::Int;

    fn allocate(self, capacity: usize) -> Store {
        Store::Int(Vec::with_capacity(capacity))
    }

    fn accepts(self, value: &Value) -> bool {
        matches!(value.kind(), ValueKind::Int32)
    }

    fn is_default_value(self, value: &Value) -> bool {
        matches!(value.as_i32(), Some(0))
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct LongAllocator;

impl Allocator for LongAllocator {
    const SHAPE: Shape = Shape::Long;

    fn allocate(self, capacity: usize) -> Store {
        Store::Long(Vec::with_capacity(capacity))
    }

    fn accepts(self, value: &Value) -> bool {
        matches!(value.kind(), ValueKind::Int32 | ValueKind::Int64)
    }

    fn is_default_value(self, value: &Value) -> bool {
        matches!(value.as_i64(), Some(0))
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct DoubleAllocator;

impl Allocator for DoubleAllocator {
    const SHAPE: Shape = Shape::Double;

    fn allocate(self, capacity: usize) -> Store {
        Store::Double(Vec::with_capacity(capacity))
    }

    fn accepts(self, value: &Value) -> bool {
        value.is_double()
    }

    fn is_default_value(self, value: &Value) -> bool {
        matches!(value.as_f64(), Some(x) if x == 0.0)
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ObjectAllocator;

impl Allocator for ObjectAllocator {
    const SHAPE: Shape = Shape::Object;

    fn allocate(self, capacity: usize) -> Store {
        Store::Object(Vec::with_capacity(capacity))
    }

    fn accepts(self, _value: &Value) -> bool {
        // Object is the top of the lattice; it accepts everything.
        true
    }

    fn is_default_value(self, _value: &Value) -> bool {
        // Object has no shape-wide default; any boxed value is valid.
        false
    }
}
