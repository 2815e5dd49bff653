use criterion::{criterion_group, BatchSize, Criterion};
use fastseq_array::ArrayStore;
use rand::{rngs::StdRng, Rng, SeedableRng};

#[cfg(not(full_bench))]
const N_ITEMS: [usize; 1] = [10_000];
#[cfg(full_bench)]
const N_ITEMS: [usize; 3] = [10_000, 50_000, 100_000];

fn bench_insert(c: &mut Criterion) {
    for variant in ["single", "range"] {
        for n in N_ITEMS {
            let label = format!("{}/variant={variant} n={n}", module_path!());
            c.bench_function(&label, |b| {
                b.iter_batched(
                    || {
                        // Pick insertion points up front so only the inserts are measured
                        let mut rng = StdRng::seed_from_u64(0);
                        let store: ArrayStore<u64> = (0..n as u64).collect();
                        let indices: Vec<usize> = (0..100).map(|_| rng.gen_range(0..=n)).collect();
                        (store, indices)
                    },
                    |(mut store, indices)| {
                        for index in indices {
                            if variant == "single" {
                                store.insert_at(index, 0).unwrap();
                            } else {
                                store.insert_range(index, [0u64; 8]).unwrap();
                            }
                        }
                    },
                    BatchSize::SmallInput,
                )
            });
        }
    }
}

criterion_group! {
    name = benches;
    config = Criterion::default().sample_size(10);
    targets = bench_insert
}
