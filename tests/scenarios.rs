//! End-to-end scenarios exercising the literal-array site and the
//! incremental builder together, mirroring spec §8's worked examples.

use std::cell::RefCell;
use std::sync::Arc;

use array_specialize::{ArrayAllocator, ArrayBuilder, EngineConfig, LiteralArraySite, Shape, Store, Value, ValueProducer};

struct Scripted {
    values: Vec<Value>,
}

impl Scripted {
    fn new(values: Vec<Value>) -> Self {
        Scripted { values }
    }
}

impl ValueProducer for Scripted {
    type Error = std::convert::Infallible;

    fn evaluate(&mut self, index: usize) -> Result<Value, Self::Error> {
        Ok(self.values[index].clone())
    }
}

struct PassthroughAllocator;

impl ArrayAllocator for PassthroughAllocator {
    type Array = Store;

    fn allocate(&mut self, store: Store, _length: usize) -> Store {
        store
    }
}

fn run(site: &LiteralArraySite, values: Vec<Value>) -> Store {
    let mut producer = Scripted::new(values);
    let mut allocator = PassthroughAllocator;
    site.execute(&mut producer, &mut allocator, EngineConfig::DEFAULT).unwrap()
}

#[test]
fn literal_all_small_ints_specializes_to_int() {
    let site = LiteralArraySite::new(3);
    let store = run(&site, vec![Value::Int(1), Value::Int(2), Value::Int(3)]);
    assert_eq!(store.shape(), Shape::Int);
    assert_eq!(store.boxed_copy_of_range(0, 3), vec![Value::Int(1), Value::Int(2), Value::Int(3)]);
}

#[test]
fn literal_wide_integer_specializes_to_long() {
    let site = LiteralArraySite::new(3);
    let store = run(&site, vec![Value::Int(1), Value::Int(2), Value::Long(3_000_000_000)]);
    assert_eq!(store.shape(), Shape::Long);
}

#[test]
fn literal_int_and_double_promotes_to_double() {
    let site = LiteralArraySite::new(3);
    let store = run(&site, vec![Value::Double(1.0), Value::Double(2.0), Value::Int(3)]);
    assert_eq!(store.shape(), Shape::Double);
    assert_eq!(
        store.boxed_copy_of_range(0, 3),
        vec![Value::Double(1.0), Value::Double(2.0), Value::Double(3.0)]
    );
}

#[test]
fn literal_int_and_opaque_value_is_object() {
    let site = LiteralArraySite::new(3);
    let store = run(&site, vec![Value::Int(1), Value::Other(Arc::new("a")), Value::Int(3)]);
    assert_eq!(store.shape(), Shape::Object);
}

#[test]
fn builder_all_ints_finishes_to_int() {
    let builder = ArrayBuilder::new();
    let mut state = builder.start(EngineConfig::DEFAULT);
    for (i, v) in [1, 2, 3].into_iter().enumerate() {
        state.append_value(i, Value::Int(v), EngineConfig::DEFAULT);
    }
    let store = builder.finish(state, 3, EngineConfig::DEFAULT);
    assert_eq!(store.shape(), Shape::Int);
}

#[test]
fn builder_mixed_int_and_double_finishes_to_object() {
    let builder = ArrayBuilder::new();
    let mut state = builder.start(EngineConfig::DEFAULT);
    state.append_value(0, Value::Int(1), EngineConfig::DEFAULT);
    state.append_value(1, Value::Double(2.5), EngineConfig::DEFAULT);
    let store = builder.finish(state, 2, EngineConfig::DEFAULT);
    assert_eq!(store.shape(), Shape::Object);
}

#[test]
fn builder_oversized_start_despecializes_this_build_only() {
    let builder = ArrayBuilder::new();
    let mut warm = builder.start(EngineConfig::DEFAULT);
    for i in 0..16 {
        warm.append_value(i, Value::Int(i as i32), EngineConfig::DEFAULT);
    }
    builder.finish(warm, 16, EngineConfig::DEFAULT);
    assert_eq!(builder.expected_length(), 16);

    let mut big = builder.start_with_length(1000, EngineConfig::DEFAULT);
    assert_eq!(big.shape(), Shape::Object);
    for i in 0..1000 {
        big.append_value(i, Value::Int(i as i32), EngineConfig::DEFAULT);
    }
    let store = builder.finish(big, 1000, EngineConfig::DEFAULT);
    assert_eq!(store.shape(), Shape::Int, "a fully-integer oversized build still resolves to Int");
    assert_eq!(builder.expected_length(), 1000);
}

#[test]
fn builder_append_array_int_plus_long_widens_to_long() {
    let builder = ArrayBuilder::new();
    let source = Store::Long(vec![3_000_000_000, 9]);

    let mut state = builder.start(EngineConfig::DEFAULT);
    state.append_value(0, Value::Int(1), EngineConfig::DEFAULT);
    state.append_array(1, &source, EngineConfig::DEFAULT);
    let store = builder.finish(state, 3, EngineConfig::DEFAULT);

    assert_eq!(store.shape(), Shape::Long);
    assert_eq!(
        store.boxed_copy_of_range(0, 3),
        vec![Value::Long(1), Value::Long(3_000_000_000), Value::Long(9)]
    );
}

/// spec §8: repeating the same all-int literal site one hundred times
/// performs exactly one U → Int transition; every later execution reuses
/// the committed shape without touching the slot.
#[test]
fn repeated_int_literal_transitions_exactly_once() {
    let site = LiteralArraySite::new(3);
    let transitions = RefCell::new(0usize);

    for _ in 0..100 {
        let before = site.current_shape();
        run(&site, vec![Value::Int(1), Value::Int(2), Value::Int(3)]);
        if before.is_none() {
            *transitions.borrow_mut() += 1;
        }
    }

    assert_eq!(*transitions.borrow(), 1);
    assert_eq!(site.current_shape(), Some(Shape::Int));
}
