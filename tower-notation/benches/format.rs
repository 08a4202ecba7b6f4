use criterion::{Criterion, black_box, criterion_group, criterion_main};

use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha20Rng;
use tower_decimal::Decimal;
use tower_notation::prelude::*;

/// Values spread over ordinary, exponential and tetrational magnitudes.
fn sample_values(count: usize) -> Vec<Decimal> {
    let mut rng = ChaCha20Rng::seed_from_u64(0x42);
    (0..count)
        .map(|_| match rng.random_range(0..3) {
            0 => Decimal::from(rng.random_range(0.0..1e6)),
            1 => Decimal::from_log10(rng.random_range(6.0..1e5)),
            _ => Decimal::TEN.tetrate(Decimal::from(rng.random_range(2.0..50.0))),
        })
        .collect()
}

fn bench_notation(c: &mut Criterion, name: &str, notation: &dyn Notation, values: &[Decimal]) {
    c.bench_function(name, |b| {
        b.iter(|| {
            for value in values {
                black_box(notation.format(black_box(*value)));
            }
        })
    });
}

fn bench_fraction(c: &mut Criterion) {
    let mut rng = ChaCha20Rng::seed_from_u64(0xf4ac);
    let values: Vec<Decimal> = (0..256)
        .map(|_| Decimal::from(rng.random_range(0.0..1000.0)))
        .collect();
    let fraction = FractionNotation::default();
    bench_notation(c, "fraction", &fraction, &values);

    let mut mixed = FractionNotation::default();
    mixed.reconfigure(|cfg| cfg.mixed = true).unwrap();
    bench_notation(c, "fraction_mixed", &mixed, &values);
}

fn bench_hypersplit(c: &mut Criterion) {
    let values = sample_values(256);
    bench_notation(c, "hypersplit", &HypersplitNotation::default(), &values);
}

fn bench_prestige(c: &mut Criterion) {
    let values = sample_values(256);
    bench_notation(c, "prestige", &PrestigeLayerNotation::default(), &values);

    let mut recursive = PrestigeLayerNotation::default();
    recursive
        .reconfigure(|cfg| {
            cfg.recursive = true;
            cfg.rampings = vec![Ramping::new(5, 1.5, 2)];
        })
        .unwrap();
    bench_notation(c, "prestige_recursive", &recursive, &values);
}

criterion_group!(benches, bench_fraction, bench_hypersplit, bench_prestige);
criterion_main!(benches);
