//! Fixed-arity literal-array construction (spec §4.2): `[e1, e2, ..., eN]`
//! where `N` is known at the call site and never changes between
//! executions.
//!
//! Mirrors the teacher's node-self-replacement idiom from
//! `vm::exec::array_basic`: a call site starts generic, classifies its
//! first full execution, and from then on runs a speculative specialized
//! path that falls back to the general one on the first value the
//! current shape can't hold.

use crate::config::EngineConfig;
use crate::host::{ArrayAllocator, ValueProducer};
use crate::specialize::{classify_values, generalize_for_value, SpecializingSlot};
use crate::store::{Shape, Store};
use crate::value::Value;

/// One literal-array call site. `arity` is fixed for the lifetime of the
/// site — spec §4.2 never allows `N` itself to change, only the shape
/// specialized for it.
#[derive(Debug)]
pub struct LiteralArraySite {
    slot: SpecializingSlot,
    arity: usize,
}

/// Coerce `value` to fit `shape` when the shape's allocator wouldn't
/// otherwise accept it as-is. Only `Double` has such a coercion (spec §6):
/// a classification batch that mixed doubles with exact integers settles
/// on `Double`, so the integers must become `Value::Double` before they
/// can be written into the chosen store.
fn coerce_for_shape(shape: Shape, value: Value) -> Value {
    if shape == Shape::Double && !shape.accepts(&value) {
        if let Some(d) = value.to_double_exact() {
            return Value::Double(d);
        }
    }
    value
}

impl LiteralArraySite {
    pub fn new(arity: usize) -> Self {
        LiteralArraySite {
            slot: SpecializingSlot::new(),
            arity,
        }
    }

    /// The shape this site has committed to, or `None` before its first
    /// execution.
    pub fn current_shape(&self) -> Option<Shape> {
        self.slot.current()
    }

    /// Evaluate all `arity` subexpressions, in order, and produce the
    /// finished array. `producer.evaluate` is called exactly once per
    /// index, left to right, regardless of which path below is taken
    /// (spec §4.2: "no subexpression may be skipped, re-evaluated, or
    /// reordered").
    pub fn execute<P, A>(&self, producer: &mut P, allocator: &mut A, config: EngineConfig) -> Result<A::Array, P::Error>
    where
        P: ValueProducer,
        A: ArrayAllocator,
    {
        let store = match self.slot.current() {
            None => self.execute_uninitialized(producer, config)?,
            Some(shape) => self.execute_specialized(shape, producer, config)?,
        };
        Ok(allocator.allocate(store, self.arity))
    }

    /// First execution: evaluate every subexpression into a boxed
    /// scratch buffer, classify the whole batch jointly, and install the
    /// resulting shape as this site's specialization (spec §4.2 step 2).
    fn execute_uninitialized<P: ValueProducer>(&self, producer: &mut P, config: EngineConfig) -> Result<Store, P::Error> {
        let mut boxed = Vec::with_capacity(self.arity);
        for i in 0..self.arity {
            boxed.push(producer.evaluate(i)?);
        }
        let shape = classify_values(&boxed);
        self.slot.transition_to(shape);
        self.slot.record_expected_length(self.arity);

        let mut store = shape.allocate(self.arity);
        for (i, value) in boxed.into_iter().enumerate() {
            let value = coerce_for_shape(shape, value);
            store.write(i, value, config);
        }
        Ok(store)
    }

    /// Subsequent executions: speculate that `shape` still holds.
    /// `Object` and `Empty` have nothing to fall back from, so they take
    /// the straight-line path; the primitive shapes watch for the first
    /// value the shape rejects and widen from there.
    fn execute_specialized<P: ValueProducer>(
        &self,
        shape: Shape,
        producer: &mut P,
        config: EngineConfig,
    ) -> Result<Store, P::Error> {
        if shape == Shape::Empty || shape == Shape::Object {
            let mut store = shape.allocate(self.arity);
            for i in 0..self.arity {
                let value = producer.evaluate(i)?;
                store.write(i, value, config);
            }
            return Ok(store);
        }

        let mut store = shape.allocate(self.arity);
        for i in 0..self.arity {
            let value = producer.evaluate(i)?;
            if shape.accepts(&value) {
                store.write(i, value, config);
                continue;
            }
            if shape == Shape::Double {
                if let Some(d) = value.to_double_exact() {
                    store.write(i, Value::Double(d), config);
                    continue;
                }
            }
            return self.widen_and_finish(store, shape, i, value, producer, config);
        }
        Ok(store)
    }

    /// A value at index `mismatch_index` didn't fit `current`. Transfer
    /// the already-written prefix to the tightest shape that accepts
    /// both the prefix and the mismatching value, write it, and keep
    /// evaluating the remaining subexpressions into that wider store —
    /// widening further, as many times as needed, if a later value still
    /// doesn't fit (spec §4.2: "transfer the unboxed prefix... then
    /// evaluate the remaining subexpressions directly into the boxed
    /// buffer"; widening may land on `Long` rather than `Object` per the
    /// `Int → Long` rule before it ever reaches `Object`).
    fn widen_and_finish<P: ValueProducer>(
        &self,
        prefix: Store,
        current: Shape,
        mismatch_index: usize,
        mismatch_value: Value,
        producer: &mut P,
        config: EngineConfig,
    ) -> Result<Store, P::Error> {
        let mut shape = generalize_for_value(current, &mismatch_value);
        let mut store = prefix.generalize_into(shape, self.arity);
        store.write(mismatch_index, mismatch_value, config);

        for j in (mismatch_index + 1)..self.arity {
            let value = producer.evaluate(j)?;
            if !shape.accepts(&value) {
                shape = generalize_for_value(shape, &value);
                store = store.generalize_into(shape, self.arity);
            }
            store.write(j, value, config);
        }

        self.slot.transition_to(shape);
        Ok(store)
    }
}
