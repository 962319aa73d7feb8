//! Property-based tests for the SINAD estimator.
//!
//! Verifies invariants that must hold for any block of finite samples:
//! results are never negative, identical blocks give identical results, and
//! non-finite samples are rejected without producing a value.

use proptest::prelude::*;
use radiosinad::sinad::{BlockDefect, DegeneratePolicy, Sinad, SinadConfig, SinadError};

fn estimator(reference_frequency: f64) -> Sinad<f64> {
    Sinad::new(SinadConfig::new(reference_frequency, 48000.0)).unwrap()
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(100))]

    /// Any finite block yields a non-negative value or a degenerate ratio,
    /// never NaN.
    #[test]
    fn never_negative(
        block in prop::collection::vec(-1.0f64..=1.0f64, 16..1200),
        reference in 400.0f64..2900.0,
    ) {
        match estimator(reference).estimate(&block) {
            Ok(db) => {
                prop_assert!(db >= 0.0, "negative SINAD {}", db);
                prop_assert!(!db.is_nan());
            }
            Err(SinadError::DegenerateRatio { .. }) => {}
            Err(err) => prop_assert!(false, "unexpected error {}", err),
        }
    }

    /// With the saturate policy, every finite block yields a value within
    /// `[0, ceiling]`.
    #[test]
    fn saturated_within_bounds(
        block in prop::collection::vec(-1.0f64..=1.0f64, 1..1200),
        ceiling in 0.0f64..100.0,
    ) {
        let sinad = Sinad::<f64>::new(
            SinadConfig::new(1000.0, 48000.0)
                .with_degenerate_policy(DegeneratePolicy::Saturate(ceiling)),
        )
        .unwrap();
        let db = sinad.estimate(&block).unwrap();
        prop_assert!((0.0..=ceiling).contains(&db));
    }

    /// Estimating the same block twice gives bit-identical results.
    #[test]
    fn deterministic(block in prop::collection::vec(-10.0f32..=10.0f32, 1000)) {
        let sinad = Sinad::<f32>::new(SinadConfig::new(1000.0, 48000.0).with_block_len(1000)).unwrap();
        prop_assert_eq!(sinad.estimate(&block), sinad.estimate(&block));
    }

    /// A single non-finite sample anywhere rejects the block.
    #[test]
    fn non_finite_rejected(
        mut block in prop::collection::vec(-1.0f64..=1.0f64, 1..1200),
        position in any::<prop::sample::Index>(),
        bad in prop_oneof![Just(f64::NAN), Just(f64::INFINITY), Just(f64::NEG_INFINITY)],
    ) {
        let index = position.index(block.len());
        block[index] = bad;
        prop_assert_eq!(
            estimator(1000.0).estimate(&block),
            Err(SinadError::InvalidInputBlock(BlockDefect::NonFinite { index }))
        );
    }

    /// The noise region is always contained in the signal region.
    #[test]
    fn noise_within_signal(
        len in 1usize..4096,
        reference in 1.0f64..20000.0,
        bandwidth in prop_oneof![1.0f64..500.0, 500.0f64..1e300],
    ) {
        let bins = SinadConfig::new(reference, 48000.0)
            .with_reference_bandwidth(bandwidth)
            .bins(len);
        let signal = bins.signal_range(len);
        for noise in bins.noise_ranges(len) {
            prop_assert!(noise.start >= signal.start && noise.end <= signal.end);
            prop_assert!(noise.end <= len);
        }
    }
}
