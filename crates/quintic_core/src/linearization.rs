use nalgebra::DMatrix;

use crate::autodiff::Dual;
use crate::traits::DynamicalSystem;

/// Jacobian of the vector field at (t, x), one column per dual-number sweep.
/// Column j comes from evaluating the system with x_j seeded as a variable.
///
/// For [`QuinticSystem`](crate::system::QuinticSystem) this is the constant
/// companion matrix of (λ+3)^5; together with [`rk4_propagator`] it gives the
/// reference operator that [`RK4`](crate::solvers::RK4) must reproduce.
pub fn jacobian<S>(system: &S, t: f64, x: &[f64]) -> DMatrix<f64>
where
    S: DynamicalSystem<Dual>,
{
    let n = system.dimension();
    let mut jac = DMatrix::zeros(n, n);
    let mut dual_x = vec![Dual::constant(0.0); n];
    let mut dual_out = vec![Dual::constant(0.0); n];
    let t_dual = Dual::constant(t);

    for j in 0..n {
        for (i, slot) in dual_x.iter_mut().enumerate() {
            *slot = if i == j {
                Dual::variable(x[i])
            } else {
                Dual::constant(x[i])
            };
        }
        system.apply(t_dual, &dual_x, &mut dual_out);
        for (i, value) in dual_out.iter().enumerate() {
            jac[(i, j)] = value.eps;
        }
    }
    jac
}

/// Reference RK4 operator: one classical RK4 step of the linear system
/// y' = A y, as a matrix I + hA + (hA)^2/2 + (hA)^3/6 + (hA)^4/24.
/// Stepping a linear system with [`RK4`](crate::solvers::RK4) is
/// multiplication by this matrix up to rounding.
pub fn rk4_propagator(a: &DMatrix<f64>, h: f64) -> DMatrix<f64> {
    let n = a.nrows();
    let ha = a * h;
    let mut term = DMatrix::identity(n, n);
    let mut sum = term.clone();
    for k in 1..=4 {
        term = &term * &ha / k as f64;
        sum += &term;
    }
    sum
}
