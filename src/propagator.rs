use std::f64::consts::TAU;

use crate::angles::wrap_degrees;
use crate::elements::{OrbitalElements, OrbitalState};
use crate::error::{OrbitError, OrbitResult};

/// Convergence tolerance on the eccentric-anomaly update, rad.
const KEPLER_TOL: f64 = 1e-8;
/// Hard cap on Newton iterations; guarantees termination on bad inputs.
const KEPLER_MAX_ITER: u32 = 50;

/// Solve Kepler's equation M = E - e*sin(E) for the eccentric anomaly E.
///
/// Newton-Raphson with initial guess E = M + e*sin(M); converges within the
/// cap for all elliptical eccentricities of practical interest (tested over
/// e in [0, 0.99], M in [0, 2pi)). Inputs and output in radians.
///
/// On non-convergence the error carries the best available estimate so the
/// caller can decide whether to accept it.
pub fn solve_kepler(mean_anomaly: f64, eccentricity: f64) -> OrbitResult<f64> {
    let m = mean_anomaly;
    let e = eccentricity;

    let mut ecc_anom = m + e * m.sin();
    for _ in 0..KEPLER_MAX_ITER {
        let f = ecc_anom - e * ecc_anom.sin() - m;
        let f_prime = 1.0 - e * ecc_anom.cos();
        let delta = f / f_prime;
        ecc_anom -= delta;
        if delta.abs() < KEPLER_TOL {
            return Ok(ecc_anom);
        }
    }

    Err(OrbitError::KeplerDivergence {
        best_estimate: ecc_anom,
        iterations: KEPLER_MAX_ITER,
        residual: (ecc_anom - e * ecc_anom.sin() - m).abs(),
    })
}

/// True anomaly (rad) to eccentric anomaly (rad), quadrant-safe half-angle form.
pub fn true_to_eccentric(true_anomaly: f64, eccentricity: f64) -> f64 {
    2.0 * f64::atan2(
        (1.0 - eccentricity).sqrt() * (true_anomaly / 2.0).sin(),
        (1.0 + eccentricity).sqrt() * (true_anomaly / 2.0).cos(),
    )
}

/// Eccentric anomaly (rad) to true anomaly (rad), quadrant-safe half-angle form.
pub fn eccentric_to_true(eccentric_anomaly: f64, eccentricity: f64) -> f64 {
    2.0 * f64::atan2(
        (1.0 + eccentricity).sqrt() * (eccentric_anomaly / 2.0).sin(),
        (1.0 - eccentricity).sqrt() * (eccentric_anomaly / 2.0).cos(),
    )
}

/// Advance a state by `dt` seconds along its two-body orbit.
///
/// Converts to elements, steps the mean anomaly by n*dt, solves Kepler's
/// equation back to a true anomaly, and rebuilds the state at
/// `state.time + dt`. Elliptical orbits only (e < 1); hyperbolic and
/// parabolic states are rejected as [`OrbitError::UnsupportedOrbit`], and a
/// state at the attracting center as [`OrbitError::InvalidInput`].
///
/// The anomaly advance is exact two-body motion: specific energy and
/// angular momentum are conserved to numerical precision.
pub fn propagate_orbit(state: &OrbitalState, dt: f64, mu: f64) -> OrbitResult<OrbitalState> {
    if mu <= 0.0 {
        return Err(OrbitError::InvalidInput("mu must be positive"));
    }
    if state.radius() == 0.0 {
        return Err(OrbitError::InvalidInput("position must be nonzero"));
    }

    let elements = OrbitalElements::from_state(state, mu);
    let e = elements.eccentricity;
    if e >= 1.0 {
        return Err(OrbitError::UnsupportedOrbit { eccentricity: e });
    }

    let n = elements.mean_motion(mu);
    let ecc_anom0 = true_to_eccentric(elements.true_anomaly.to_radians(), e);
    let mean_anom0 = ecc_anom0 - e * ecc_anom0.sin();

    let mean_anom = (mean_anom0 + n * dt).rem_euclid(TAU);
    let ecc_anom = solve_kepler(mean_anom, e)?;
    let true_anom = eccentric_to_true(ecc_anom, e);

    let advanced = elements.at_true_anomaly(wrap_degrees(true_anom.to_degrees()));
    Ok(advanced.to_state(mu, state.time + dt))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::bodies::{MU_EARTH, R_EARTH};
    use approx::assert_relative_eq;
    use nalgebra::Vector3;
    use std::f64::consts::PI;

    #[test]
    fn kepler_solver_converges_across_regimes() {
        // e in [0, 0.99] x M in [0, 2pi): must converge and satisfy
        // M = E - e*sin(E) to 1e-8
        for i in 0..100 {
            let e = i as f64 * 0.01;
            for j in 0..64 {
                let m = j as f64 * TAU / 64.0;
                let ecc_anom = solve_kepler(m, e)
                    .unwrap_or_else(|err| panic!("e={} M={}: {}", e, m, err));
                let residual = (ecc_anom - e * ecc_anom.sin() - m).abs();
                assert!(
                    residual < 1e-8,
                    "residual {:.3e} at e={}, M={}",
                    residual,
                    e,
                    m
                );
            }
        }
    }

    #[test]
    fn kepler_circular_is_identity() {
        let m = 1.234;
        assert_relative_eq!(solve_kepler(m, 0.0).unwrap(), m, epsilon = 1e-12);
    }

    #[test]
    fn anomaly_conversions_invert() {
        let e = 0.63;
        for k in 0..24 {
            let nu = -PI + k as f64 * TAU / 24.0;
            let back = eccentric_to_true(true_to_eccentric(nu, e), e);
            assert_relative_eq!(back, nu, epsilon = 1e-12);
        }
    }

    #[test]
    fn full_period_returns_to_start() {
        let elements = crate::elements::OrbitalElements {
            semi_major_axis: 9500.0,
            eccentricity: 0.25,
            inclination: 33.0,
            raan: 80.0,
            arg_periapsis: 45.0,
            true_anomaly: 170.0,
        };
        let state = elements.to_state(MU_EARTH, 100.0);
        let period = elements.period(MU_EARTH);

        let after = propagate_orbit(&state, period, MU_EARTH).unwrap();
        assert!(
            (after.position - state.position).norm() < 1e-6 * state.radius(),
            "did not return to start: {:?}",
            after.position
        );
        assert!((after.velocity - state.velocity).norm() < 1e-6 * state.speed());
        assert_relative_eq!(after.time, 100.0 + period);
    }

    #[test]
    fn quarter_period_of_circular_orbit_sweeps_90_degrees() {
        let r = R_EARTH + 500.0;
        let elements = crate::elements::OrbitalElements::circular(r, 0.0);
        let state = elements.to_state(MU_EARTH, 0.0);

        let after = propagate_orbit(&state, elements.period(MU_EARTH) / 4.0, MU_EARTH).unwrap();
        let swept = state.position.angle(&after.position);
        assert_relative_eq!(swept, PI / 2.0, max_relative = 1e-6);
        assert_relative_eq!(after.radius(), r, max_relative = 1e-9);
    }

    #[test]
    fn propagation_conserves_energy_and_momentum() {
        let state = OrbitalState::new(
            Vector3::new(-6045.0, -3490.0, 2500.0),
            Vector3::new(-3.457, 6.618, 2.533),
            0.0,
        );
        let energy0 = state.specific_energy(MU_EARTH);
        let h0 = state.angular_momentum().norm();

        // A mix of short and long spans, including many revolutions
        for dt in [10.0, 600.0, 5400.0, 86400.0, 1.23e6] {
            let after = propagate_orbit(&state, dt, MU_EARTH).unwrap();
            assert_relative_eq!(
                after.specific_energy(MU_EARTH),
                energy0,
                max_relative = 1e-9
            );
            assert_relative_eq!(after.angular_momentum().norm(), h0, max_relative = 1e-9);
        }
    }

    #[test]
    fn propagation_composes() {
        // Stepping twice by dt matches stepping once by 2*dt
        let state = OrbitalState::new(
            Vector3::new(8000.0, 100.0, 1200.0),
            Vector3::new(-0.5, 7.0, 1.0),
            0.0,
        );
        let dt = 1800.0;
        let once = propagate_orbit(&state, 2.0 * dt, MU_EARTH).unwrap();
        let half = propagate_orbit(&state, dt, MU_EARTH).unwrap();
        let twice = propagate_orbit(&half, dt, MU_EARTH).unwrap();

        assert!((once.position - twice.position).norm() < 1e-7 * once.radius());
        assert!((once.velocity - twice.velocity).norm() < 1e-7 * once.speed());
    }

    #[test]
    fn state_at_the_center_is_rejected() {
        let state = OrbitalState::new(Vector3::zeros(), Vector3::new(1.0, 0.0, 0.0), 0.0);
        assert!(matches!(
            propagate_orbit(&state, 60.0, MU_EARTH),
            Err(OrbitError::InvalidInput(_))
        ));
    }

    #[test]
    fn hyperbolic_propagation_is_rejected() {
        let r = 7000.0;
        let v_escape = (2.0 * MU_EARTH / r).sqrt();
        let state = OrbitalState::new(
            Vector3::new(r, 0.0, 0.0),
            Vector3::new(0.0, 1.5 * v_escape, 0.0),
            0.0,
        );
        match propagate_orbit(&state, 60.0, MU_EARTH) {
            Err(OrbitError::UnsupportedOrbit { eccentricity }) => {
                assert!(eccentricity > 1.0)
            }
            other => panic!("expected UnsupportedOrbit, got {:?}", other),
        }
    }
}
