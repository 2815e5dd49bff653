use criterion::criterion_main;

mod detect;

criterion_main!(collect::benches, detect::benches);
