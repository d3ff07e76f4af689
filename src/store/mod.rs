//! Type-segregated array storage.
//!
//! `Store` is the trimmed, construction-only counterpart of the teacher's
//! `vm::value::array_data::ArrayData`: one variant per shape, a single
//! flat `match` dispatching every capability the engine needs during
//! construction. Post-construction mutation (push/pop/insert, as
//! `array_data.rs` also provides) is a Non-goal here — see spec §1 — so
//! it is not carried over.

pub mod allocator;

pub use allocator::{Allocator, DoubleAllocator, EmptyAllocator, IntAllocator, LongAllocator, ObjectAllocator};

use crate::error::ArrayEngineError;
use crate::value::Value;

/// The five store shapes, ordered bottom (`Empty`) to top (`Object`) by
/// generality. `Int`, `Long`, and `Double` are mutually incomparable in
/// the general lattice-join sense (generalizing across any two of them
/// lands on `Object`); the one exception is the specific `Int → Long`
/// widening rule in spec §4.4, implemented in
/// [`crate::specialize::generalize_for_value`] rather than encoded here
/// as a blanket ordering.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Shape {
    Empty,
    Int,
    Long,
    Double,
    Object,
}

impl Shape {
    /// A human-readable name, used in diagnostics (spec §7's
    /// "unrecoverable error naming the shape").
    pub fn name(self) -> &'static str {
        match self {
            Shape::Empty => "Empty",
            Shape::Int => "Int",
            Shape::Long => "Long",
            Shape::Double => "Double",
            Shape::Object => "Object",
        }
    }

    /// `Shape` doubles as the lightweight handle spec calls `Allocator`:
    /// each shape has exactly one, stateless, allocator, so rather than
    /// boxing a `dyn Allocator` trait object at every call site, the
    /// shape tag itself exposes the three allocator operations and
    /// delegates to the zero-sized marker type in [`allocator`].
    pub fn allocate(self, capacity: usize) -> Store {
        match self {
            Shape::Empty => EmptyAllocator.allocate(capacity),
            Shape::Int => IntAllocator.allocate(capacity),
            Shape::Long => LongAllocator.allocate(capacity),
            Shape::Double => DoubleAllocator.allocate(capacity),
            Shape::Object => ObjectAllocator.allocate(capacity),
        }
    }

    pub fn accepts(self, value: &Value) -> bool {
        match self {
            Shape::Empty => EmptyAllocator.accepts(value),
            Shape::Int => IntAllocator.accepts(value),
            Shape::Long => LongAllocator.accepts(value),
            Shape::Double => DoubleAllocator.accepts(value),
            Shape::Object => ObjectAllocator.accepts(value),
        }
    }

    pub fn is_default_value(self, value: &Value) -> bool {
        match self {
            Shape::Empty => EmptyAllocator.is_default_value(value),
            Shape::Int => IntAllocator.is_default_value(value),
            Shape::Long => LongAllocator.is_default_value(value),
            Shape::Double => DoubleAllocator.is_default_value(value),
            Shape::Object => ObjectAllocator.is_default_value(value),
        }
    }
}

/// Type-segregated backing storage for an array under construction.
///
/// `Object` holds boxed values in a homogeneous `Vec<Value>`; the
/// primitive shapes hold their elements unboxed. `Empty` carries no
/// buffer at all — it is the shared sentinel (see
/// [`crate::specialize::empty_sentinel`]).
#[derive(Debug, Clone)]
pub enum Store {
    Empty,
    Int(Vec<i32>),
    Long(Vec<i64>),
    Double(Vec<f64>),
    Object(Vec<Value>),
}

impl Store {
    /// The shape tag of this store.
    pub fn shape(&self) -> Shape {
        match self {
            Store::Empty => Shape::Empty,
            Store::Int(_) => Shape::Int,
            Store::Long(_) => Shape::Long,
            Store::Double(_) => Shape::Double,
            Store::Object(_) => Shape::Object,
        }
    }

    /// Logical length (number of elements written so far).
    pub fn len(&self) -> usize {
        match self {
            Store::Empty => 0,
            Store::Int(v) => v.len(),
            Store::Long(v) => v.len(),
            Store::Double(v) => v.len(),
            Store::Object(v) => v.len(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Buffer capacity. Spec §4.1: `capacity() → int`.
    pub fn capacity(&self) -> usize {
        match self {
            Store::Empty => 0,
            Store::Int(v) => v.capacity(),
            Store::Long(v) => v.capacity(),
            Store::Double(v) => v.capacity(),
            Store::Object(v) => v.capacity(),
        }
    }

    /// Read element `i`, boxing primitive slots as needed. Fails on
    /// `Empty` per spec's invariant that the sentinel can never be read.
    pub fn read(&self, i: usize) -> Result<Value, ArrayEngineError> {
        match self {
            Store::Empty => Err(ArrayEngineError::EmptyStoreMisuse),
            Store::Int(v) => Ok(Value::Int(v[i])),
            Store::Long(v) => Ok(Value::Long(v[i])),
            Store::Double(v) => Ok(Value::Double(v[i])),
            Store::Object(v) => Ok(v[i].clone()),
        }
    }

    /// Write `value` at index `i`. Precondition: the shape's allocator
    /// accepts `value` (primitive shapes reject anything incompatible
    /// outright, by panicking — callers are expected to check `accepts`
    /// or generalize first, exactly as the literal/builder sites do).
    ///
    /// `i == len()` appends, growing the buffer per
    /// [`crate::config::EngineConfig::grow`] when capacity is exhausted.
    /// `i < len()` overwrites in place. `i > len()` pads the gap with the
    /// shape's default value first — neither construction path leaves
    /// gaps in practice, but padding keeps the invariant "length never
    /// exceeds capacity" true without a separate unsafe bookkeeping path.
    pub fn write(&mut self, i: usize, value: Value, config: crate::config::EngineConfig) {
        match self {
            Store::Empty => panic!("write on Empty store (caller bug, see ArrayEngineError::EmptyStoreMisuse)"),
            Store::Int(v) => {
                let x = value.as_i32().expect("write: value does not fit Int store");
                write_primitive(v, i, x, config);
            }
            Store::Long(v) => {
                let x = value.as_i64().expect("write: value does not fit Long store");
                write_primitive(v, i, x, config);
            }
            Store::Double(v) => {
                let x = value.as_f64().expect("write: value does not fit Double store");
                write_primitive(v, i, x, config);
            }
            Store::Object(v) => {
                write_primitive(v, i, value, config);
            }
        }
    }

    /// Return a boxed buffer of `new_capacity`, with this store's
    /// contents boxed into the first `capacity()` slots. Used when
    /// widening to `Object`.
    pub fn expand(&self, new_capacity: usize) -> Vec<Value> {
        let mut out = Vec::with_capacity(new_capacity.max(self.len()));
        match self {
            Store::Empty => {}
            Store::Int(v) => out.extend(v.iter().map(|&x| Value::Int(x))),
            Store::Long(v) => out.extend(v.iter().map(|&x| Value::Long(x))),
            Store::Double(v) => out.extend(v.iter().map(|&x| Value::Double(x))),
            Store::Object(v) => out.extend(v.iter().cloned()),
        }
        out
    }

    /// Extract the sub-range `[start, end)` into a fresh store of the
    /// same shape. For `Empty`, requires `start == end == 0`.
    pub fn extract_range(&self, start: usize, end: usize) -> Result<Store, ArrayEngineError> {
        match self {
            Store::Empty => {
                if start == 0 && end == 0 {
                    Ok(Store::Empty)
                } else {
                    Err(ArrayEngineError::EmptyStoreMisuse)
                }
            }
            Store::Int(v) => Ok(Store::Int(v[start..end].to_vec())),
            Store::Long(v) => Ok(Store::Long(v[start..end].to_vec())),
            Store::Double(v) => Ok(Store::Double(v[start..end].to_vec())),
            Store::Object(v) => Ok(Store::Object(v[start..end].to_vec())),
        }
    }

    /// A flat boxed copy of `[start, start+length)`.
    pub fn boxed_copy_of_range(&self, start: usize, length: usize) -> Vec<Value> {
        (start..start + length)
            .map(|i| self.read(i).expect("boxed_copy_of_range: index within bounds"))
            .collect()
    }

    /// Bulk-copy `length` elements from `self[src_start..]` into
    /// `dest[dest_start..]`. Uses a same-shape fast path when possible;
    /// otherwise widens `dest` through boxing via `generalize_for_store`
    /// first (callers are expected to have already widened `dest` if
    /// needed — this performs the copy assuming compatible shapes, or
    /// Object destinations, which always accept a boxed copy).
    ///
    /// The incompatible-shapes case is spec §7's "source store for
    /// `appendArray` has a shape the implementation does not recognise":
    /// every call site in this crate widens `dest` first, so this should
    /// be unreachable in practice — it exists as a trip-wire for a future
    /// shape added without updating every fast path, rather than an
    /// expected runtime condition.
    pub fn copy_contents(&self, src_start: usize, dest: &mut Store, dest_start: usize, length: usize) -> Result<(), ArrayEngineError> {
        match (self, &mut *dest) {
            (Store::Int(s), Store::Int(d)) => splice_primitive(s, src_start, d, dest_start, length),
            (Store::Long(s), Store::Long(d)) => splice_primitive(s, src_start, d, dest_start, length),
            (Store::Double(s), Store::Double(d)) => splice_primitive(s, src_start, d, dest_start, length),
            (Store::Object(s), Store::Object(d)) => splice_primitive(s, src_start, d, dest_start, length),
            (_, Store::Object(d)) => {
                let boxed = self.boxed_copy_of_range(src_start, length);
                splice_primitive(&boxed, 0, d, dest_start, length);
            }
            _ => return Err(crate::host::unsupported_shape_error(self.shape().name())),
        }
        Ok(())
    }

    /// A flat boxed copy of the first `length` elements, for interop with
    /// a host that wants a plain boxed array (spec's `toJavaArrayCopy`).
    pub fn to_vec_copy(&self, length: usize) -> Vec<Value> {
        self.boxed_copy_of_range(0, length)
    }

    /// Sort the first `size` elements in place under the shape's natural
    /// ordering. Trivial (no-op) for `Empty`.
    pub fn sort(&mut self, size: usize) {
        match self {
            Store::Empty => {
                if size != 0 {
                    panic!("sort: non-zero range on Empty store");
                }
            }
            Store::Int(v) => v[..size].sort_unstable(),
            Store::Long(v) => v[..size].sort_unstable(),
            Store::Double(v) => v[..size].sort_unstable_by(|a, b| a.total_cmp(b)),
            Store::Object(v) => v[..size].sort_by(|a, b| format!("{a:?}").cmp(&format!("{b:?}"))),
        }
    }

    /// A finite, single-pass iterator over `[from, from+length)`, boxing
    /// primitives lazily.
    pub fn iterate(&self, from: usize, length: usize) -> impl Iterator<Item = Value> + '_ {
        (from..from + length).map(move |i| self.read(i).expect("iterate: index within bounds"))
    }

    /// The allocator for the tightest shape that accepts both this
    /// store's existing contents and `value` (spec's
    /// `generalizeForValue`).
    pub fn generalize_for_value(&self, value: &Value) -> Shape {
        crate::specialize::generalize_for_value(self.shape(), value)
    }

    /// The allocator for the tightest shape that accepts both this
    /// store's contents and `other`'s wholesale (spec's
    /// `generalizeForStore`).
    pub fn generalize_for_store(&self, other: &Store) -> Shape {
        crate::specialize::generalize_for_shapes(self.shape(), other.shape())
    }

    /// The allocator that produces stores of this shape. Spec's
    /// `allocator() → Allocator`; see [`Shape::allocate`] and friends.
    pub fn allocator(&self) -> Shape {
        self.shape()
    }

    /// Rebuild this store's existing contents as a store of `target`
    /// shape, reserving room for `capacity_hint` elements total. Used by
    /// the literal site and builder when a value arrives that the
    /// current shape doesn't accept: the already-written prefix has to
    /// move to the wider shape before construction can continue (spec
    /// §4.2/§4.3's "transfer the unboxed prefix").
    ///
    /// `target` must be at least as general as `self.shape()` under
    /// [`crate::specialize::generalize_for_shapes`] — the one non-Object
    /// widening this knows how to do without boxing is `Int → Long`;
    /// every other pair boxes through `expand`.
    pub fn generalize_into(&self, target: Shape, capacity_hint: usize) -> Store {
        if target == self.shape() {
            return self.clone();
        }
        match (self, target) {
            // Nothing to transfer out of `Empty` — just hand back a fresh
            // buffer of the target shape.
            (Store::Empty, _) => target.allocate(capacity_hint),
            (Store::Int(v), Shape::Long) => {
                let mut out = Vec::with_capacity(capacity_hint.max(v.len()));
                out.extend(v.iter().map(|&x| i64::from(x)));
                Store::Long(out)
            }
            _ => Store::Object(self.expand(capacity_hint)),
        }
    }
}

fn write_primitive<T>(v: &mut Vec<T>, i: usize, value: T, config: crate::config::EngineConfig)
where
    T: Clone + Default,
{
    if i < v.len() {
        v[i] = value;
        return;
    }
    if i > v.len() {
        // Sequential writers never skip ahead; pad defensively rather
        // than leaving the buffer shorter than `i` demands.
        v.resize(i, T::default());
    }
    if v.len() == v.capacity() {
        let target = config.grow(v.capacity(), v.len() + 1);
        v.reserve(target - v.len());
    }
    v.push(value);
}

fn splice_primitive<T: Clone>(src: &[T], src_start: usize, dest: &mut Vec<T>, dest_start: usize, length: usize) {
    let slice = &src[src_start..src_start + length];
    if dest_start == dest.len() {
        dest.extend_from_slice(slice);
    } else {
        dest[dest_start..dest_start + length].clone_from_slice(slice);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::EngineConfig;

    #[test]
    fn capacity_tracks_underlying_buffer() {
        let s = Store::Int(Vec::with_capacity(8));
        assert_eq!(s.capacity(), 8);
        assert_eq!(s.len(), 0);
    }

    #[test]
    fn write_then_read_round_trips() {
        let mut s = Store::Int(Vec::with_capacity(4));
        s.write(0, Value::Int(7), EngineConfig::DEFAULT);
        s.write(1, Value::Int(9), EngineConfig::DEFAULT);
        assert_eq!(s.read(0).unwrap(), Value::Int(7));
        assert_eq!(s.read(1).unwrap(), Value::Int(9));
        assert_eq!(s.len(), 2);
    }

    #[test]
    fn write_overwrite_in_place_does_not_grow_length() {
        let mut s = Store::Int(Vec::with_capacity(4));
        s.write(0, Value::Int(1), EngineConfig::DEFAULT);
        s.write(0, Value::Int(2), EngineConfig::DEFAULT);
        assert_eq!(s.len(), 1);
        assert_eq!(s.read(0).unwrap(), Value::Int(2));
    }

    #[test]
    fn write_past_capacity_grows() {
        let mut s = Store::Int(Vec::with_capacity(1));
        for i in 0..10 {
            s.write(i, Value::Int(i as i32), EngineConfig::DEFAULT);
        }
        assert_eq!(s.len(), 10);
        assert!(s.capacity() >= 10);
    }

    #[test]
    fn empty_read_is_an_error() {
        let s = Store::Empty;
        assert_eq!(s.read(0).unwrap_err(), ArrayEngineError::EmptyStoreMisuse);
    }

    #[test]
    fn empty_extract_range_zero_zero_ok() {
        let s = Store::Empty;
        assert!(matches!(s.extract_range(0, 0), Ok(Store::Empty)));
    }

    #[test]
    fn empty_extract_range_nonzero_errors() {
        let s = Store::Empty;
        assert!(s.extract_range(0, 1).is_err());
    }

    #[test]
    fn expand_boxes_existing_contents() {
        let s = Store::Int(vec![1, 2, 3]);
        let boxed = s.expand(8);
        assert_eq!(boxed, vec![Value::Int(1), Value::Int(2), Value::Int(3)]);
    }

    #[test]
    fn boxed_copy_of_range_matches_contents() {
        let s = Store::Double(vec![1.0, 2.0, 3.0]);
        assert_eq!(
            s.boxed_copy_of_range(1, 2),
            vec![Value::Double(2.0), Value::Double(3.0)]
        );
    }

    #[test]
    fn copy_contents_same_shape_fast_path() {
        let src = Store::Int(vec![1, 2, 3]);
        let mut dest = Store::Int(Vec::with_capacity(3));
        src.copy_contents(0, &mut dest, 0, 3).unwrap();
        assert_eq!(dest.boxed_copy_of_range(0, 3), vec![Value::Int(1), Value::Int(2), Value::Int(3)]);
    }

    #[test]
    fn copy_contents_widens_into_object_dest() {
        let src = Store::Long(vec![10, 20]);
        let mut dest = Store::Object(vec![Value::Int(1)]);
        src.copy_contents(0, &mut dest, 1, 2).unwrap();
        assert_eq!(
            dest.boxed_copy_of_range(0, 3),
            vec![Value::Int(1), Value::Long(10), Value::Long(20)]
        );
    }

    #[test]
    fn copy_contents_incompatible_shapes_errors() {
        let src = Store::Int(vec![1]);
        let mut dest = Store::Double(vec![1.0]);
        assert_eq!(
            src.copy_contents(0, &mut dest, 1, 1).unwrap_err(),
            ArrayEngineError::UnsupportedStoreShape("Int")
        );
    }

    #[test]
    fn sort_orders_in_place() {
        let mut s = Store::Int(vec![3, 1, 2]);
        s.sort(3);
        assert_eq!(s.boxed_copy_of_range(0, 3), vec![Value::Int(1), Value::Int(2), Value::Int(3)]);
    }

    #[test]
    fn sort_empty_zero_size_is_noop() {
        let mut s = Store::Empty;
        s.sort(0);
    }

    #[test]
    fn iterate_is_lazy_and_finite() {
        let s = Store::Int(vec![1, 2, 3]);
        let collected: Vec<_> = s.iterate(1, 2).collect();
        assert_eq!(collected, vec![Value::Int(2), Value::Int(3)]);
    }

    #[test]
    fn generalize_into_long_widens_without_boxing() {
        let s = Store::Int(vec![1, 2, 3]);
        let widened = s.generalize_into(Shape::Long, 8);
        assert!(matches!(widened, Store::Long(_)));
        assert_eq!(widened.boxed_copy_of_range(0, 3), vec![Value::Long(1), Value::Long(2), Value::Long(3)]);
        assert!(widened.capacity() >= 8);
    }

    #[test]
    fn generalize_into_from_empty_allocates_target_shape_directly() {
        let s = Store::Empty;
        let widened = s.generalize_into(Shape::Int, 4);
        assert!(matches!(widened, Store::Int(_)));
        assert_eq!(widened.len(), 0);
        assert!(widened.capacity() >= 4);
    }

    #[test]
    fn generalize_into_object_boxes_contents() {
        let s = Store::Double(vec![1.5, 2.5]);
        let widened = s.generalize_into(Shape::Object, 4);
        assert_eq!(
            widened.boxed_copy_of_range(0, 2),
            vec![Value::Double(1.5), Value::Double(2.5)]
        );
    }
}
