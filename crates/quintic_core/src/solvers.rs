use crate::error::{IntegrationError, Result};
use crate::traits::{DynamicalSystem, Scalar, Steppable};
use crate::vector::{add_scaled, copy};

/// Classic Runge-Kutta 4th Order Solver
///
/// Stage buffers are allocated once and overwritten on every step.
pub struct RK4<T: Scalar> {
    k1: Vec<T>,
    k2: Vec<T>,
    k3: Vec<T>,
    k4: Vec<T>,
    tmp: Vec<T>,
}

fn zeroed<T: Scalar>(buffer: &'static str, dim: usize) -> Result<Vec<T>> {
    let mut v = Vec::new();
    v.try_reserve_exact(dim)
        .map_err(|source| IntegrationError::Allocation {
            buffer,
            dim,
            source,
        })?;
    v.resize(dim, T::zero());
    Ok(v)
}

impl<T: Scalar> RK4<T> {
    pub fn try_new(dim: usize) -> Result<Self> {
        Ok(Self {
            k1: zeroed("k1", dim)?,
            k2: zeroed("k2", dim)?,
            k3: zeroed("k3", dim)?,
            k4: zeroed("k4", dim)?,
            tmp: zeroed("working copy", dim)?,
        })
    }

    pub fn dimension(&self) -> usize {
        self.tmp.len()
    }

    /// Stage derivatives from the most recent step.
    pub fn stages(&self) -> [&[T]; 4] {
        [&self.k1, &self.k2, &self.k3, &self.k4]
    }
}

impl<T: Scalar> Steppable<T> for RK4<T> {
    fn step(&mut self, system: &impl DynamicalSystem<T>, t: &mut T, state: &mut [T], dt: T) {
        let half = T::lift(0.5);
        let sixth = T::lift(1.0 / 6.0);
        let third = T::lift(1.0 / 3.0);

        let t0 = *t;

        // k1 = f(t, y)
        system.apply(t0, state, &mut self.k1);

        // k2 = f(t + dt/2, y + dt*k1/2)
        copy(&mut self.tmp, state);
        add_scaled(&mut self.tmp, &self.k1, half * dt);
        system.apply(t0 + half * dt, &self.tmp, &mut self.k2);

        // k3 = f(t + dt/2, y + dt*k2/2)
        copy(&mut self.tmp, state);
        add_scaled(&mut self.tmp, &self.k2, half * dt);
        system.apply(t0 + half * dt, &self.tmp, &mut self.k3);

        // k4 = f(t + dt, y + dt*k3)
        copy(&mut self.tmp, state);
        add_scaled(&mut self.tmp, &self.k3, dt);
        system.apply(t0 + dt, &self.tmp, &mut self.k4);

        // y_next = y + dt/6 k1 + dt/3 k2 + dt/3 k3 + dt/6 k4
        add_scaled(state, &self.k1, dt * sixth);
        add_scaled(state, &self.k2, dt * third);
        add_scaled(state, &self.k3, dt * third);
        add_scaled(state, &self.k4, dt * sixth);

        *t = t0 + dt;
    }
}
