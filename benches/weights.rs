use criterion::{Criterion, criterion_group, criterion_main};
use std::hint::black_box;
use symbez::{Symbol, SymbolicConverter};

fn curve_weights(c: &mut Criterion) {
    let converter = SymbolicConverter::new();
    let s = Symbol::new("s");
    for degree in [3, 8] {
        c.bench_function(&format!("curve_weights_{degree}"), |b| {
            b.iter(|| {
                let weights = converter.curve_weights(black_box(degree), &s).unwrap();
                black_box(weights.sum())
            })
        });
    }
}

fn surface_weights(c: &mut Criterion) {
    let converter = SymbolicConverter::new();
    let s = Symbol::new("s");
    let t = Symbol::new("t");
    for degree in [2, 5] {
        c.bench_function(&format!("surface_weights_{degree}"), |b| {
            b.iter(|| {
                let weights = converter.surface_weights(black_box(degree), &s, &t).unwrap();
                black_box(weights.sum())
            })
        });
    }
}

criterion_group!(benches, curve_weights, surface_weights);
criterion_main!(benches);
