use crate::traits::{DynamicalSystem, Scalar};

/// Number of first-order equations in the system.
pub const DIMENSION: usize = 5;

/// Coefficients of y, y', y'', y''', y'''' in the expression for y^(5).
/// They are the expansion of (λ + 3)^5 with the leading term moved across.
pub const COEFFICIENTS: [f64; DIMENSION] = [-243.0, -405.0, -270.0, -90.0, -15.0];

/// State at the initial time that matches `exact::exact_solution`.
pub const INITIAL_STATE: [f64; DIMENSION] = [0.0, 3.0, -9.0, -8.0, 0.0];

/// y^(5) + 15y'''' + 90y''' + 270y'' + 405y' + 243y = 0 written as
/// five chained first-order equations.
#[derive(Debug, Clone, Copy, Default)]
pub struct QuinticSystem;

impl<T: Scalar> DynamicalSystem<T> for QuinticSystem {
    fn dimension(&self) -> usize {
        DIMENSION
    }

    fn apply(&self, _t: T, x: &[T], out: &mut [T]) {
        out[..DIMENSION - 1].copy_from_slice(&x[1..DIMENSION]);

        let mut highest = T::zero();
        for (&c, &xi) in COEFFICIENTS.iter().zip(x) {
            highest = highest + T::lift(c) * xi;
        }
        out[DIMENSION - 1] = highest;
    }
}

#[cfg(test)]
mod tests {
    use super::{QuinticSystem, COEFFICIENTS, DIMENSION, INITIAL_STATE};
    use crate::autodiff::Dual;
    use crate::traits::DynamicalSystem;

    #[test]
    fn derivatives_chain_into_each_other() {
        let x = [1.0, 2.0, 3.0, 4.0, 5.0];
        let mut out = [0.0; DIMENSION];
        QuinticSystem.apply(0.0, &x, &mut out);
        assert_eq!(&out[..4], &[2.0, 3.0, 4.0, 5.0]);
        let expected = -243.0 - 810.0 - 810.0 - 360.0 - 75.0;
        assert_eq!(out[4], expected);
    }

    #[test]
    fn right_hand_side_ignores_time() {
        let mut at_zero = [0.0; DIMENSION];
        let mut later = [0.0; DIMENSION];
        QuinticSystem.apply(0.0, &INITIAL_STATE, &mut at_zero);
        QuinticSystem.apply(42.0, &INITIAL_STATE, &mut later);
        assert_eq!(at_zero, later);
        assert_eq!(at_zero, [3.0, -9.0, -8.0, 0.0, 1935.0]);
    }

    #[test]
    fn coefficients_expand_repeated_root() {
        // (λ + 3)^5 = λ^5 + 15λ^4 + 90λ^3 + 270λ^2 + 405λ + 243
        let mut poly = vec![1.0];
        for _ in 0..5 {
            let mut next = vec![0.0; poly.len() + 1];
            for (i, &c) in poly.iter().enumerate() {
                next[i] += 3.0 * c;
                next[i + 1] += c;
            }
            poly = next;
        }
        for i in 0..DIMENSION {
            assert_eq!(COEFFICIENTS[i], -poly[i]);
        }
    }

    #[test]
    fn dual_evaluation_matches_plain_values() {
        let x: Vec<Dual> = INITIAL_STATE.iter().map(|&v| Dual::new(v, 1.0)).collect();
        let mut out = vec![Dual::new(0.0, 0.0); DIMENSION];
        QuinticSystem.apply(Dual::new(0.0, 0.0), &x, &mut out);

        let mut plain = [0.0; DIMENSION];
        QuinticSystem.apply(0.0, &INITIAL_STATE, &mut plain);
        for i in 0..DIMENSION {
            assert_eq!(out[i].val, plain[i]);
        }
        // Directional derivative along (1, 1, 1, 1, 1).
        assert_eq!(out[4].eps, COEFFICIENTS.iter().sum::<f64>());
    }
}
