//! The specialization controller shared by the literal-array site and the
//! incremental builder (spec §4.4): the state machine, its monotonic
//! transitions, and the shared `Empty` sentinel.
//!
//! Modeled on spec §9's own guidance for the "node self-replacement"
//! pattern: a sum type for the variant (`Shape`, in `store::mod`) plus an
//! atomic reference for the call-site slot. `SpecializingSlot` is that
//! slot: every literal site and every builder call site owns one.

use std::sync::atomic::{AtomicU8, AtomicUsize, Ordering};
use std::sync::Arc;

use once_cell::sync::Lazy;

use crate::store::{Shape, Store};
use crate::value::{Value, ValueKind};

/// Tightest shape that accepts both a store of `current` shape and
/// `value`, per spec §4.4's transition triggers. `current` is never
/// `Empty` here — callers route the `Empty → any` transition separately,
/// since it is triggered by "first append" rather than by a rejected
/// value.
pub fn generalize_for_value(current: Shape, value: &Value) -> Shape {
    if current.accepts(value) {
        return current;
    }
    match (current, value.kind()) {
        // The one designated non-Object widening: Int overflowing into a
        // 64-bit-only integer promotes to Long rather than jumping
        // straight to Object.
        (Shape::Int, ValueKind::Int64) => Shape::Long,
        _ => Shape::Object,
    }
}

/// Tightest shape that accepts both `a` and `b` wholesale (spec's
/// `generalizeForStore`), used when appending one store's entire
/// contents into another.
pub fn generalize_for_shapes(a: Shape, b: Shape) -> Shape {
    match (a, b) {
        (x, y) if x == y => x,
        (Shape::Empty, other) | (other, Shape::Empty) => other,
        (Shape::Int, Shape::Long) | (Shape::Long, Shape::Int) => Shape::Long,
        _ => Shape::Object,
    }
}

/// Joint classification of a value sequence (spec §4.2 step 2 / §4.3's
/// three sticky booleans), tracked incrementally so both the literal
/// site (which classifies all-at-once) and the builder (which
/// classifies one value at a time) share the same logic.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ClassificationFlags {
    pub could_use_int: bool,
    pub could_use_long: bool,
    pub could_use_double: bool,
}

impl ClassificationFlags {
    /// All three flags start true; only ever cleared, per spec §4.3.
    pub const fn new() -> Self {
        ClassificationFlags {
            could_use_int: true,
            could_use_long: true,
            could_use_double: true,
        }
    }

    /// Fold one more observed value into the flags. Monotonic: a flag
    /// once cleared never becomes true again.
    pub fn observe(&mut self, value: &Value) {
        self.could_use_int &= value.is_int32();
        self.could_use_long &= value.is_int64();
        // Double promotes any numeric value (spec §4.2: "integer-to-float
        // promotion permitted"), but never a non-numeric `Other`.
        self.could_use_double &= value.to_double_exact().is_some();
    }

    /// The tightest shape consistent with every value observed so far.
    /// `len == 0` (no values observed) resolves to `Empty` regardless of
    /// the (vacuously true) flags — spec §4.2: "the empty case (N = 0)
    /// chooses Empty."
    pub fn resolve(&self, len: usize) -> Shape {
        if len == 0 {
            Shape::Empty
        } else if self.could_use_int {
            Shape::Int
        } else if self.could_use_long {
            Shape::Long
        } else if self.could_use_double {
            Shape::Double
        } else {
            Shape::Object
        }
    }
}

impl Default for ClassificationFlags {
    fn default() -> Self {
        Self::new()
    }
}

/// Joint classification of a fully-materialized value slice, for the
/// literal-array site's first execution (spec §4.2 step 2).
pub fn classify_values(values: &[Value]) -> Shape {
    let mut flags = ClassificationFlags::new();
    for v in values {
        flags.observe(v);
    }
    flags.resolve(values.len())
}

/// The shared, immutable, zero-length sentinel (spec §5: "must be
/// immutable"; §8 invariant 5: "reference-identical across all
/// zero-length constructions").
///
/// `Store::Empty` already carries no heap allocation, so sharing it is
/// really about giving callers a single canonical `Arc` to compare by
/// identity when a test wants to assert "same sentinel" rather than
/// "equal contents".
static EMPTY_SENTINEL: Lazy<Arc<Store>> = Lazy::new(|| Arc::new(Store::Empty));

/// Returns the shared empty sentinel: one process-wide `Arc<Store>`,
/// matching spec §5's "shared across all arrays of length 0" and §8
/// invariant 5 ("reference-identical across all zero-length
/// constructions"). `Value::Other` is `Arc`-boxed specifically so `Store`
/// stays `Send + Sync` and this sentinel can be handed to any
/// construction thread without cloning its (nonexistent) buffer.
pub fn empty_sentinel() -> Arc<Store> {
    Arc::clone(&EMPTY_SENTINEL)
}

/// The specializing call site's mutable state: which shape it has
/// committed to (or `None` for uninitialised), and the expected length
/// learned on first full execution (spec §3: "Expected length").
///
/// Encoded as two atomics rather than a `Mutex<Shape>` so that spec §5's
/// concurrency model — "site replacement is a single reference store...
/// races are resolved by the host runtime's reference-write semantics" —
/// holds without any blocking: a racing reader either sees the old state
/// or the fully-updated new state, never a torn mix, and every op
/// rechecks the *store argument's* own shape before trusting the cached
/// one (the type-check-on-store invariant from spec §5).
#[derive(Debug)]
pub struct SpecializingSlot {
    shape: AtomicU8,
    expected_length: AtomicUsize,
}

const UNINITIALIZED: u8 = 0xFF;

fn shape_to_tag(shape: Shape) -> u8 {
    match shape {
        Shape::Empty => 0,
        Shape::Int => 1,
        Shape::Long => 2,
        Shape::Double => 3,
        Shape::Object => 4,
    }
}

fn tag_to_shape(tag: u8) -> Option<Shape> {
    match tag {
        0 => Some(Shape::Empty),
        1 => Some(Shape::Int),
        2 => Some(Shape::Long),
        3 => Some(Shape::Double),
        4 => Some(Shape::Object),
        _ => None,
    }
}

impl SpecializingSlot {
    pub fn new() -> Self {
        SpecializingSlot {
            shape: AtomicU8::new(UNINITIALIZED),
            expected_length: AtomicUsize::new(0),
        }
    }

    /// The currently-committed shape, or `None` if still uninitialised.
    pub fn current(&self) -> Option<Shape> {
        tag_to_shape(self.shape.load(Ordering::Acquire))
    }

    pub fn expected_length(&self) -> usize {
        self.expected_length.load(Ordering::Acquire)
    }

    /// Replace the call site's committed shape. Spec §4.4: "No
    /// transition ever reverses" — enforced here by only ever widening
    /// relative to the currently-stored shape (or leaving
    /// `Uninitialised` if nothing is stored yet), never narrowing.
    ///
    /// Returns `true` if this call actually performed a transition (used
    /// by tests to assert the "exactly one U → Int transition" property
    /// from spec §8).
    pub fn transition_to(&self, new_shape: Shape) -> bool {
        loop {
            let current_tag = self.shape.load(Ordering::Acquire);
            let current = tag_to_shape(current_tag);
            let target = match current {
                None => new_shape,
                Some(existing) => generalize_for_shapes(existing, new_shape),
            };
            if current == Some(target) {
                return false;
            }
            let target_tag = shape_to_tag(target);
            if self
                .shape
                .compare_exchange(current_tag, target_tag, Ordering::AcqRel, Ordering::Acquire)
                .is_ok()
            {
                return true;
            }
            // Lost a race with another thread's transition; retry against
            // whatever shape is there now (monotonic, so convergent).
        }
    }

    /// Record the expected length learned on a full execution/finish,
    /// per spec §3 ("per-site integer learned on first full execution").
    pub fn record_expected_length(&self, length: usize) {
        self.expected_length.store(length, Ordering::Release);
    }
}

impl Default for SpecializingSlot {
    fn default() -> Self {
        Self::new()
    }
}
