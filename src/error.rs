use thiserror::Error;

/// Result alias used across the crate.
pub type OrbitResult<T> = Result<T, OrbitError>;

/// Failure values for the orbital mechanics engine.
///
/// Every fallible operation returns one of these instead of panicking or
/// logging: this library runs inside real-time simulation loops where a bad
/// input must not stop the frame, and a silent numerical failure must not be
/// ignorable by the caller.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum OrbitError {
    /// Kepler's equation did not converge within the iteration cap.
    ///
    /// Carries the best eccentric-anomaly estimate (rad) so the caller can
    /// decide whether an approximate answer is acceptable.
    #[error(
        "Kepler solver did not converge after {iterations} iterations \
         (best E = {best_estimate} rad, residual {residual:e})"
    )]
    KeplerDivergence {
        best_estimate: f64,
        iterations: u32,
        residual: f64,
    },

    /// The Lambert universal-variable iteration did not converge.
    ///
    /// No velocities are reported: a half-converged boundary-value solution
    /// is a wrong answer, not an approximate one.
    #[error(
        "Lambert solver did not converge after {iterations} iterations \
         (time-of-flight error {tof_error} s)"
    )]
    LambertDivergence { iterations: u32, tof_error: f64 },

    /// Input geometry admits no defined solution (e.g. a 0 deg or 180 deg
    /// Lambert transfer angle, where the transfer plane is indeterminate).
    #[error("degenerate geometry: {0}")]
    DegenerateGeometry(&'static str),

    /// The orbit regime is outside what the operation supports
    /// (Kepler propagation is elliptical-only).
    #[error("unsupported orbit regime: eccentricity {eccentricity} is not elliptical")]
    UnsupportedOrbit { eccentricity: f64 },

    /// A planned maneuver needs more delta-v than the caller allows.
    /// Reported as "no solution", never as a clamped plan.
    #[error("delta-v budget exceeded: required {required} km/s, budget {budget} km/s")]
    BudgetExceeded { required: f64, budget: f64 },

    /// A scalar argument was out of range (non-positive mu, zero-length
    /// position, negative time of flight).
    #[error("invalid input: {0}")]
    InvalidInput(&'static str),
}
