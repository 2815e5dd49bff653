use criterion::{black_box, criterion_group, Criterion};
use fastseq_parallel::{create_pool, Config, Parallel, Pipeline, Sequential, Strategy};

#[cfg(not(full_bench))]
const N_ITEMS: [usize; 2] = [10_000, 100_000];
#[cfg(full_bench)]
const N_ITEMS: [usize; 4] = [10_000, 100_000, 1_000_000, 10_000_000];

/// Position of the match, as a fraction of the source length.
const TARGETS: [(&str, usize, usize); 3] = [("early", 1, 10), ("middle", 1, 2), ("late", 9, 10)];

fn bench_detect(c: &mut Criterion) {
    let strategy = Parallel::new(Config {
        batch_size: 4_096,
        thread_pool: Some(create_pool(8).unwrap()),
    })
    .unwrap();
    for n in N_ITEMS {
        let data: Vec<u64> = (0..n as u64).collect();
        let pipeline = Pipeline::new(&data);
        for (label, num, den) in TARGETS {
            let target = (n * num / den) as u64;
            c.bench_function(
                &format!("{}/n={} target={} strategy=sequential", module_path!(), n, label),
                |b| {
                    b.iter(|| black_box(Sequential.detect(&pipeline, |x| **x == target).unwrap()));
                },
            );
            c.bench_function(
                &format!("{}/n={} target={} strategy=parallel", module_path!(), n, label),
                |b| {
                    b.iter(|| black_box(strategy.detect(&pipeline, |x| **x == target).unwrap()));
                },
            );
        }
    }
}

criterion_group! {
    name = benches;
    config = Criterion::default().sample_size(10);
    targets = bench_detect
}
