use proptest::prelude::*;
use voxterra_noise::{BasisType, Interpolation, NoiseGraph};

fn basis() -> impl Strategy<Value = BasisType> {
    prop_oneof![
        Just(BasisType::Simplex),
        Just(BasisType::Gradient),
        Just(BasisType::Value),
        Just(BasisType::Cellular),
    ]
}

fn interp() -> impl Strategy<Value = Interpolation> {
    prop_oneof![
        Just(Interpolation::None),
        Just(Interpolation::Linear),
        Just(Interpolation::Hermite),
        Just(Interpolation::Quintic),
    ]
}

proptest! {
    #[test]
    fn evaluation_is_bit_identical(
        seed in any::<u32>(),
        octaves in 0u32..5,
        basis in basis(),
        interp in interp(),
        x in -500.0f64..500.0,
        y in -500.0f64..500.0,
        z in -500.0f64..500.0,
    ) {
        let mut g = NoiseGraph::new();
        let n = g.fractal_brownian_motion(basis, interp, octaves, 0.05, seed);
        let r = g.ridged_multifractal(basis, interp, octaves, 0.05, seed);
        let sum = g.add(n, r);
        let a = g.evaluate(sum, x, y, z);
        let b = g.evaluate(sum, x, y, z);
        prop_assert_eq!(a.to_bits(), b.to_bits());
        prop_assert!(a.is_finite());
    }

    #[test]
    fn same_seed_rebuilds_same_field(
        seed in any::<u32>(),
        x in -200.0f64..200.0,
        y in -200.0f64..200.0,
    ) {
        let build = || {
            let mut g = NoiseGraph::new();
            let n = g.fractal_brownian_motion(BasisType::Simplex, Interpolation::Quintic, 3, 0.01, seed);
            (g, n)
        };
        let (g1, n1) = build();
        let (g2, n2) = build();
        prop_assert_eq!(
            g1.evaluate(n1, x, y, 0.0).to_bits(),
            g2.evaluate(n2, x, y, 0.0).to_bits()
        );
    }

    #[test]
    fn divide_by_zero_yields_zero(a in -1.0e6f64..1.0e6, b in prop_oneof![Just(0.0f64), -1.0e3f64..1.0e3]) {
        let mut g = NoiseGraph::new();
        let na = g.constant(a);
        let nb = g.constant(b);
        let d = g.divide(na, nb);
        let v = g.evaluate(d, 0.0, 0.0, 0.0);
        if b == 0.0 {
            prop_assert_eq!(v, 0.0);
        } else {
            prop_assert_eq!(v, a / b);
        }
    }

    #[test]
    fn ridged_two_octaves_span_zero_to_two(
        seed in any::<u32>(),
        x in -1000.0f64..1000.0,
        y in -1000.0f64..1000.0,
        z in -1000.0f64..1000.0,
    ) {
        let mut g = NoiseGraph::new();
        let r = g.ridged_multifractal(BasisType::Simplex, Interpolation::Quintic, 2, 0.05, seed);
        let v = g.evaluate(r, x, y, z);
        prop_assert!((0.0..=2.0).contains(&v));
    }
}
