use criterion::{black_box, criterion_group, Criterion};
use fastseq_array::ArrayStore;

#[cfg(not(full_bench))]
const N_ITEMS: [usize; 2] = [10_000, 100_000];
#[cfg(full_bench)]
const N_ITEMS: [usize; 4] = [10_000, 100_000, 1_000_000, 10_000_000];

fn bench_append(c: &mut Criterion) {
    for n in N_ITEMS {
        c.bench_function(&format!("{}/n={}", module_path!(), n), |b| {
            b.iter(|| {
                let mut store = ArrayStore::new();
                for i in 0..n as u64 {
                    store.append(i);
                }
                black_box(store.reallocations());
            });
        });
    }
}

criterion_group! {
    name = benches;
    config = Criterion::default().sample_size(10);
    targets = bench_append
}
