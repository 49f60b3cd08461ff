pub mod angles;
pub mod bodies;
pub mod elements;
pub mod error;
pub mod lambert;
pub mod maneuvers;
pub mod propagator;

pub use bodies::{BodyRegistry, CelestialBody};
pub use elements::{OrbitalElements, OrbitalState};
pub use error::{OrbitError, OrbitResult};
pub use lambert::{solve_lambert, LambertSolution};
pub use maneuvers::{
    bielliptic, bielliptic_within_budget, hohmann, hohmann_within_budget, BiellipticTransfer,
    HohmannTransfer,
};
pub use propagator::{propagate_orbit, solve_kepler};
