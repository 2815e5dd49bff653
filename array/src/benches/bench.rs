use criterion::criterion_main;

mod append;
mod insert;

criterion_main!(append::benches, insert::benches);
