//! Incremental array construction (spec §4.3): a call site that appends
//! one value or one whole source array at a time, with arity unknown
//! until `finish`.
//!
//! Shares the [`SpecializingSlot`] machinery with [`crate::literal`], but
//! since the host drives construction across several calls instead of
//! one, the in-flight state (`BuildState`) has to be threaded through
//! those calls explicitly rather than living in a local variable.

use crate::config::EngineConfig;
use crate::host::SourceArray;
use crate::specialize::{classify_values, generalize_for_shapes, generalize_for_value, ClassificationFlags, SpecializingSlot};
use crate::store::{Shape, Store};
use crate::value::Value;

/// A builder call site: owns the specialization history (committed
/// shape + learned expected length) across many builds, the way a
/// single literal-array site does.
#[derive(Debug)]
pub struct ArrayBuilder {
    slot: SpecializingSlot,
}

impl ArrayBuilder {
    pub fn new() -> Self {
        ArrayBuilder {
            slot: SpecializingSlot::new(),
        }
    }

    pub fn current_shape(&self) -> Option<Shape> {
        self.slot.current()
    }

    pub fn expected_length(&self) -> usize {
        self.slot.expected_length()
    }

    /// spec §4.3 `start()`: begin a build with no length hint. Once
    /// specialized, reuses the length learned from the previous
    /// `finish`; before that, falls back to `config.uninitialized_size`
    /// (spec §6's `ARRAY_UNINITIALIZED_SIZE`).
    pub fn start(&self, config: EngineConfig) -> BuildState {
        let hint = match self.slot.current() {
            Some(_) => self.slot.expected_length(),
            None => config.uninitialized_size,
        };
        self.begin(hint)
    }

    /// spec §4.3 `start(length)`: begin a build with an explicit length
    /// hint. If the site has already specialized but `length` exceeds
    /// what it learned before, this particular build de-specializes
    /// back to joint classification rather than risk paying for many
    /// incremental widenings — the site's own committed shape is
    /// unaffected (transitions never reverse; see
    /// [`SpecializingSlot::transition_to`]), only this build's strategy.
    pub fn start_with_length(&self, length: usize, _config: EngineConfig) -> BuildState {
        self.begin(length)
    }

    fn begin(&self, capacity_hint: usize) -> BuildState {
        match self.slot.current() {
            Some(shape) if capacity_hint <= self.slot.expected_length() => BuildState {
                store: shape.allocate(capacity_hint),
                flags: None,
                seen_int: false,
                seen_long: false,
                seen_double: false,
                seen_object: false,
            },
            _ => BuildState {
                store: Store::Object(Vec::with_capacity(capacity_hint)),
                flags: Some(ClassificationFlags::new()),
                seen_int: false,
                seen_long: false,
                seen_double: false,
                seen_object: false,
            },
        }
    }

    /// spec §4.3 `finish(length)`: commit a build. While still
    /// classifying, resolves the shape jointly from every value observed
    /// this build and materializes it; once specialized, just hands back
    /// whatever shape the build ended up widening to (if any). Either
    /// way, the resulting shape and `length` are recorded for the next
    /// `start`.
    pub fn finish(&self, state: BuildState, length: usize, config: EngineConfig) -> Store {
        let store = match state.flags {
            Some(flags) => {
                let shape = flags.resolve(length);
                self.slot.transition_to(shape);
                materialize(state.store, shape, length, config)
            }
            None => {
                self.slot.transition_to(state.store.shape());
                state.store
            }
        };
        self.slot.record_expected_length(length);
        store
    }
}

impl Default for ArrayBuilder {
    fn default() -> Self {
        Self::new()
    }
}

/// Convert a fully-populated boxed scratch buffer into a store of the
/// resolved shape. `Object` is already in the right representation;
/// every other shape needs its first `length` boxed values unboxed one
/// at a time.
fn materialize(scratch: Store, shape: Shape, length: usize, config: EngineConfig) -> Store {
    if shape == Shape::Object {
        return scratch;
    }
    let mut store = shape.allocate(length);
    for i in 0..length {
        let value = scratch.read(i).expect("materialize: index within collected bounds");
        store.write(i, value, config);
    }
    store
}

/// In-flight state for one build, threaded through `ensure`/
/// `append_value`/`append_array` calls and consumed by `finish`.
///
/// `flags` is `Some` only while the build is still jointly classifying
/// (i.e. the site hadn't specialized yet, or this build de-specialized
/// via `start_with_length`); during that phase every value is boxed into
/// `store` regardless of kind, exactly like the literal site's first
/// execution. Once `flags` is `None`, `store`'s own shape is the
/// speculative shape, and a rejected value triggers the same prefix-widen
/// fallback [`crate::literal::LiteralArraySite`] uses.
#[derive(Debug)]
pub struct BuildState {
    store: Store,
    flags: Option<ClassificationFlags>,
    /// spec §4.3's `seenInt`/`seenLong`/`seenDouble`/`seenObject`: once this
    /// build's store is `Object`-shaped, these record which source shapes
    /// `append_array` has already reconciled against it, so a repeat
    /// `appendArray` of the same shape can skip re-deriving the (always
    /// `Object`) target shape.
    seen_int: bool,
    seen_long: bool,
    seen_double: bool,
    seen_object: bool,
}

impl BuildState {
    /// The working shape of this build so far. `Object` while still
    /// classifying (the scratch buffer is always boxed during that
    /// phase), regardless of what the final resolved shape turns out to
    /// be at `finish`.
    pub fn shape(&self) -> Shape {
        self.store.shape()
    }

    pub fn len(&self) -> usize {
        self.store.len()
    }

    pub fn is_empty(&self) -> bool {
        self.store.is_empty()
    }

    /// Borrow the in-progress store, e.g. to hand a partially-built
    /// array to `append_array` on another builder.
    pub fn peek(&self) -> &Store {
        &self.store
    }

    /// spec §4.3 `ensure(length)`: reserve room for at least `length`
    /// elements without forcing a caller to pay for it one push at a
    /// time.
    pub fn ensure(&mut self, length: usize) {
        if length <= self.store.capacity() {
            return;
        }
        let additional = length - self.store.len();
        match &mut self.store {
            Store::Empty => {}
            Store::Int(v) => v.reserve(additional),
            Store::Long(v) => v.reserve(additional),
            Store::Double(v) => v.reserve(additional),
            Store::Object(v) => v.reserve(additional),
        }
    }

    /// spec §4.3 `append(index, value)`: place `value` at `index`,
    /// widening the working shape first if it doesn't fit.
    pub fn append_value(&mut self, index: usize, value: Value, config: EngineConfig) {
        if let Some(flags) = &mut self.flags {
            flags.observe(&value);
            self.store.write(index, value, config);
            return;
        }
        let shape = self.store.shape();
        if !shape.accepts(&value) {
            // `generalize_for_value` assumes a non-`Empty` current shape
            // (see its doc comment) — a build that re-entered a
            // previously-learned `Empty` specialization classifies its
            // first real value the same way a fresh literal site would.
            let target = if shape == Shape::Empty {
                classify_values(std::slice::from_ref(&value))
            } else {
                generalize_for_value(shape, &value)
            };
            self.store = self.store.generalize_into(target, index + 1);
        }
        self.store.write(index, value, config);
    }

    /// spec §4.3 `appendArray(index, other)`: splice another source
    /// array's entire contents in starting at `index`. Widens first if
    /// `other`'s shape isn't already accepted, then uses
    /// [`Store::copy_contents`]'s same-shape fast path (or its boxing
    /// path into an already-`Object` destination).
    ///
    /// Once this build's store has widened to `Object`, repeat appends of
    /// a source shape already seen before skip re-deriving the target
    /// shape entirely (spec §4.3's `seenInt`/`seenLong`/`seenDouble`/
    /// `seenObject` fast path) — `Object` is the top of the shape lattice,
    /// so a previously reconciled source shape can only ever generalize
    /// into `Object` again.
    pub fn append_array<S: SourceArray>(&mut self, index: usize, other: &S, config: EngineConfig) {
        let other = other.store();
        let other_len = other.len();
        if other_len == 0 {
            return;
        }
        if let Some(flags) = &mut self.flags {
            for k in 0..other_len {
                let value = other.read(k).expect("append_array: index within source bounds");
                flags.observe(&value);
                self.store.write(index + k, value, config);
            }
            return;
        }
        let shape = self.store.shape();
        let already_seen = self.mark_seen(other.shape());
        if shape != Shape::Object || !already_seen {
            let target = generalize_for_shapes(shape, other.shape());
            if target != shape {
                self.store = self.store.generalize_into(target, index + other_len);
            }
        }
        other
            .copy_contents(0, &mut self.store, index, other_len)
            .expect("append_array: destination shape reconciled against the source shape above");
    }

    /// Record that `shape` has now been observed as a source of
    /// `append_array` on this build, returning whether it had already
    /// been seen before this call.
    fn mark_seen(&mut self, shape: Shape) -> bool {
        let seen = match shape {
            Shape::Empty => return true,
            Shape::Int => &mut self.seen_int,
            Shape::Long => &mut self.seen_long,
            Shape::Double => &mut self.seen_double,
            Shape::Object => &mut self.seen_object,
        };
        let already_seen = *seen;
        *seen = true;
        already_seen
    }
}
