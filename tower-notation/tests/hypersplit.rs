use std::sync::Arc;

use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha20Rng;
use strum::IntoEnumIterator;
use tower_decimal::Decimal;
use tower_notation::prelude::*;

/// Lower both values to layer 0 with the same number of logarithms, then
/// compare relatively.
fn close(a: Decimal, b: Decimal) -> bool {
    let n = a.layer();
    let (x, y) = (a.iterated_log(Decimal::TEN, n), b.iterated_log(Decimal::TEN, n));
    (x - y).abs() <= x.abs() * 1e-9
}

#[test]
fn googol_scale_split() {
    let hyper = HypersplitNotation::default();
    let split = hyper.split(&Decimal::from(1e15));
    assert!((split.mantissa.to_f64() - 1.0).abs() < 1e-12);
    assert_eq!(split.exponent, Decimal::from(15));
    assert_eq!(split.tetration, Decimal::ZERO);
    assert_eq!(split.pentation, Decimal::ZERO);
}

#[test]
fn sampled_recombination() {
    let mut rng = ChaCha20Rng::seed_from_u64(0x5b1);
    let hyper = HypersplitNotation::default();
    for _ in 0..500 {
        let value = Decimal::from_log10(rng.random_range(0.0..300.0));
        let back = hyper.split(&value).recombine(Decimal::TEN);
        assert!(close(value, back), "{value} -> {back}");
    }
    for _ in 0..200 {
        let value = Decimal::TEN.tetrate(Decimal::from(rng.random_range(2.0..40.0)));
        let back = hyper.split(&value).recombine(Decimal::TEN);
        assert!(close(value, back), "{value} -> {back}");
    }
}

#[test]
fn recombination_in_other_bases() {
    let mut rng = ChaCha20Rng::seed_from_u64(0xba5e);
    for base in [2.0, 3.0, 16.0] {
        let base = Decimal::from(base);
        let hyper = HypersplitNotation::new(HypersplitConfig {
            base,
            maximums: [base; 3],
            ..HypersplitConfig::default()
        })
        .unwrap();
        for _ in 0..200 {
            let value = Decimal::from_log10(rng.random_range(0.0..250.0));
            let split = hyper.split(&value);
            assert!(split.mantissa < base || split.mantissa < Decimal::ONE, "{split:?}");
            let back = split.recombine(base);
            assert!(close(value, back), "{value} -> {back}");
        }
    }
}

#[test]
fn every_level_permutation_renders_each_component_once() {
    let levels: Vec<_> = HyperLevel::iter().collect();
    let mut orders = Vec::new();
    for &a in &levels {
        for &b in &levels {
            for &c in &levels {
                for &d in &levels {
                    let order = [a, b, c, d];
                    if levels.iter().all(|level| order.contains(level)) {
                        orders.push(order);
                    }
                }
            }
        }
    }
    assert_eq!(orders.len(), 24);

    let mut hyper = HypersplitNotation::default();
    for order in orders {
        hyper
            .reconfigure(|cfg| {
                cfg.order = order;
                cfg.show = [ShowPolicy::Always; 4];
                cfg.delimiters = [
                    ("m".to_string(), ";".to_string()),
                    ("e".to_string(), ";".to_string()),
                    ("t".to_string(), ";".to_string()),
                    ("p".to_string(), ";".to_string()),
                ];
            })
            .unwrap();
        let text = hyper.format(5);
        for part in ["m5;", "e0;", "t0;", "p0;"] {
            assert_eq!(text.matches(part).count(), 1, "{order:?}: {text}");
        }
        assert_eq!(text.len(), 12);
    }
}

#[test]
fn hidden_components_leave_no_delimiters() {
    let hyper = HypersplitNotation::default();
    assert_eq!(hyper.format(3), "3");
    assert_eq!(hyper.format(1e20), "1e20");
    let text = hyper.format(Decimal::from_parts(1, 2, 11.0));
    assert_eq!(text, "2T 1.1e1");
}

#[test]
fn inner_notations_format_components() {
    let mut hyper = HypersplitNotation::default();
    let mut exponent = FractionNotation::default();
    exponent
        .reconfigure(|cfg| cfg.show_unit_denominator = true)
        .unwrap();
    hyper
        .reconfigure(|cfg| cfg.notations[HyperLevel::Exponent.index()] = Arc::new(exponent))
        .unwrap();
    assert_eq!(hyper.format(1e20), "1e20/1");
}

#[test]
fn rollover_cap_bounds_work() {
    let mut hyper = HypersplitNotation::default();
    hyper.reconfigure(|cfg| cfg.max_rollovers = 1).unwrap();
    let split = hyper.split(&Decimal::from_parts(1, 2, 11.0));
    assert_eq!(split.tetration, Decimal::ZERO);
    assert!((split.exponent.to_f64() - 1e11).abs() < 1.0, "{split:?}");
}

#[test]
fn below_minimum_is_not_split() {
    let mut hyper = HypersplitNotation::default();
    hyper
        .reconfigure(|cfg| cfg.minimum = Decimal::from(1e30))
        .unwrap();
    let split = hyper.split(&Decimal::from(1e20));
    assert_eq!(split.mantissa, Decimal::from(1e20));
    assert_eq!(split.exponent, Decimal::ZERO);
}
