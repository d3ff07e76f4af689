//! Characterizes the amortized-O(1) push guarantee spec §4.1 places on
//! the buffer growth policy: building an N-element Int array through
//! repeated single-value appends should scale linearly in N, not
//! quadratically, however small the starting capacity.

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};

use array_specialize::{ArrayBuilder, EngineConfig};

fn bench_incremental_build(c: &mut Criterion) {
    let mut group = c.benchmark_group("incremental_int_build");
    for &size in &[256usize, 4_096, 65_536] {
        group.bench_with_input(BenchmarkId::from_parameter(size), &size, |b, &size| {
            b.iter(|| {
                let builder = ArrayBuilder::new();
                let mut state = builder.start_with_length(0, EngineConfig::DEFAULT);
                for i in 0..size {
                    state.append_value(i, array_specialize::Value::Int(i as i32), EngineConfig::DEFAULT);
                }
                let store = builder.finish(state, size, EngineConfig::DEFAULT);
                black_box(store);
            });
        });
    }
    group.finish();
}

fn bench_literal_site_reexecution(c: &mut Criterion) {
    use array_specialize::{ArrayAllocator, LiteralArraySite, Store, Value, ValueProducer};

    struct Ints(usize);
    impl ValueProducer for Ints {
        type Error = std::convert::Infallible;
        fn evaluate(&mut self, index: usize) -> Result<Value, Self::Error> {
            Ok(Value::Int((index + self.0) as i32))
        }
    }

    struct Passthrough;
    impl ArrayAllocator for Passthrough {
        type Array = Store;
        fn allocate(&mut self, store: Store, _length: usize) -> Store {
            store
        }
    }

    let site = LiteralArraySite::new(8);
    let mut allocator = Passthrough;
    // Warm the specialization once before measuring the steady-state cost.
    site.execute(&mut Ints(0), &mut allocator, EngineConfig::DEFAULT).unwrap();

    c.bench_function("literal_site_specialized_reexecution", |b| {
        b.iter(|| {
            let store = site.execute(&mut Ints(1), &mut allocator, EngineConfig::DEFAULT).unwrap();
            black_box(store);
        });
    });
}

criterion_group!(benches, bench_incremental_build, bench_literal_site_reexecution);
criterion_main!(benches);
