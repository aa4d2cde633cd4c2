pub mod autodiff;
pub mod config;
pub mod error;
pub mod exact;
pub mod integrator;
pub mod linearization;
pub mod record;
pub mod solvers;
pub mod system;
pub mod vector;
/// The `quintic_core` crate integrates y^(5) + 15y'''' + 90y''' + 270y'' + 405y' + 243y = 0
/// with fixed-step RK4 and compares every step against the closed-form solution.
/// The scalar type is generic so the same system and exact solution can be
/// evaluated with `f64` or with dual numbers.
///
/// Key components:
/// - **Traits**: `Scalar` (numeric type abstraction), `DynamicalSystem` (the vector field), `Steppable` (solvers).
/// - **System / Exact**: the hard-wired right-hand side and its analytic solution.
/// - **Solvers**: the RK4 stepper with preallocated stage buffers.
/// - **Integrator**: the driver loop as an explicit context, and the file writer.
/// - **Autodiff / Linearization**: dual numbers and the Jacobian built from them.
pub mod traits;

pub use config::IntegrationConfig;
pub use error::IntegrationError;
pub use integrator::{integrate, integrate_to_file, IntegrationContext, RunSummary};
pub use record::Record;
