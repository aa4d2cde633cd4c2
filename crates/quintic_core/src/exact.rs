//! Closed-form solution of the quintic system for the initial state
//! `system::INITIAL_STATE`.
//!
//! The characteristic root -3 has multiplicity five, so the general solution is
//! `e^{-3x}` times a polynomial of degree four. Differentiating keeps that shape:
//! `(e^{rx} p)' = e^{rx} (p' + r p)`, which lets the derivatives be carried
//! exactly as coefficient lists.

use crate::system::DIMENSION;
use crate::traits::Scalar;

/// Decay rate of the repeated root.
pub const RATE: f64 = -3.0;

/// y(x) = -(1/12) e^{-3x} x (129x^3 + 16x^2 - 54x - 36)
pub fn exact_solution<T: Scalar>(x: T) -> T {
    let c = T::lift;
    let cubic = c(129.0) * x * x * x + c(16.0) * x * x - c(54.0) * x - c(36.0);
    -c(1.0) / c(12.0) * (c(RATE) * x).exp() * x * cubic
}

/// `e^{rate * x} * sum(coeffs[k] * x^k)`
#[derive(Debug, Clone, PartialEq)]
pub struct ExpPolynomial {
    pub rate: f64,
    /// Ascending powers of x.
    pub coeffs: Vec<f64>,
}

impl ExpPolynomial {
    pub fn new(rate: f64, coeffs: Vec<f64>) -> Self {
        Self { rate, coeffs }
    }

    /// The exact solution in expanded form:
    /// p(x) = 3x + 4.5x^2 - (4/3)x^3 - (129/12)x^4
    pub fn solution() -> Self {
        Self::new(RATE, vec![0.0, 3.0, 4.5, -16.0 / 12.0, -129.0 / 12.0])
    }

    pub fn eval(&self, x: f64) -> f64 {
        // Horner
        let poly = self.coeffs.iter().rev().fold(0.0, |acc, &c| acc * x + c);
        (self.rate * x).exp() * poly
    }

    pub fn derivative(&self) -> Self {
        let mut coeffs: Vec<f64> = self.coeffs.iter().map(|&c| self.rate * c).collect();
        for (k, &c) in self.coeffs.iter().enumerate().skip(1) {
            coeffs[k - 1] += k as f64 * c;
        }
        Self::new(self.rate, coeffs)
    }

    /// `[f, f', ..., f^(n-1)]` as exp-polynomials.
    pub fn derivatives(&self, n: usize) -> Vec<Self> {
        let mut out = Vec::with_capacity(n);
        let mut current = self.clone();
        for _ in 0..n {
            let next = current.derivative();
            out.push(current);
            current = next;
        }
        out
    }
}

/// Exact value of the full state vector (y, y', y'', y''', y'''') at `x`.
pub fn exact_state(x: f64) -> [f64; DIMENSION] {
    let mut state = [0.0; DIMENSION];
    for (slot, f) in state
        .iter_mut()
        .zip(ExpPolynomial::solution().derivatives(DIMENSION))
    {
        *slot = f.eval(x);
    }
    state
}
