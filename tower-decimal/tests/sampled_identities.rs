use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha20Rng;
use tower_decimal::Decimal;

const SAMPLES: usize = 2_000;

fn relative_gap(a: Decimal, b: Decimal) -> f64 {
    if a == b {
        return 0.0;
    }
    ((a - b).abs() / b.abs()).to_f64()
}

/// A positive value whose decimal exponent is uniform in `[-250, 4000)`.
fn sample(rng: &mut impl Rng) -> Decimal {
    Decimal::from_log10(rng.random_range(-250.0..4000.0))
}

#[test]
fn ordering_matches_f64_on_layer_zero() {
    let mut rng = ChaCha20Rng::seed_from_u64(0x5eed);
    for _ in 0..SAMPLES {
        let a: f64 = rng.random_range(-1e12..1e12);
        let b: f64 = rng.random_range(-1e12..1e12);
        assert_eq!(
            Decimal::from(a).partial_cmp(&Decimal::from(b)),
            a.partial_cmp(&b),
            "{a} vs {b}"
        );
    }
}

#[test]
fn multiplication_and_division_invert() {
    let mut rng = ChaCha20Rng::seed_from_u64(0xd1ff);
    for _ in 0..SAMPLES {
        let a = sample(&mut rng);
        let b = sample(&mut rng);
        let back = (a * b) / b;
        assert!(relative_gap(back, a) < 1e-9, "{a} * {b} / {b} = {back}");
    }
}

#[test]
fn log_and_pow10_invert() {
    let mut rng = ChaCha20Rng::seed_from_u64(0x106);
    for _ in 0..SAMPLES {
        let a = sample(&mut rng);
        let back = a.log10().pow10();
        let drift = (back.log10() - a.log10()).abs();
        assert!(drift < Decimal::from_f64(1e-9), "{a} -> {back}");
    }
}

#[test]
fn addition_is_monotone() {
    let mut rng = ChaCha20Rng::seed_from_u64(0xadd);
    for _ in 0..SAMPLES {
        let a = sample(&mut rng);
        let b = sample(&mut rng);
        let sum = a + b;
        assert!(sum >= a.max(b), "{a} + {b} = {sum}");
        assert!(sum <= a.max(b) * Decimal::TWO, "{a} + {b} = {sum}");
    }
}

#[test]
fn slog_inverts_tetration_for_sampled_heights() {
    let mut rng = ChaCha20Rng::seed_from_u64(0x7e7);
    for base in [Decimal::TWO, Decimal::from(3), Decimal::TEN, Decimal::from(1e6)] {
        for _ in 0..200 {
            let height: f64 = rng.random_range(-0.9..6.0);
            let tower = base.tetrate(Decimal::from(height));
            let back = tower.slog(base).to_f64();
            assert!(
                (back - height).abs() < 1e-6,
                "base {base}, height {height}: slog gave {back}"
            );
        }
    }
}

#[test]
fn tall_towers_stay_consistent() {
    let base = Decimal::TEN;
    for height in [10u64, 100, 10_000, 1_000_000_000] {
        let tower = base.tetrate(Decimal::from(height));
        assert_eq!(tower.layer(), height - 2);
        assert_eq!(tower.slog(base), Decimal::from(height));
        let lowered = tower.iterated_log(base, height - 2);
        assert_eq!(lowered, Decimal::from_f64(1e10));
    }
}
