use std::f64::consts::PI;

use nalgebra::Vector3;

use crate::error::{OrbitError, OrbitResult};

/// Relative time-of-flight convergence tolerance.
const LAMBERT_TOL: f64 = 1e-8;
/// Hard cap on Newton iterations (including infeasible-y bisections).
const LAMBERT_MAX_ITER: u32 = 50;
/// At z = 4 pi^2 a zero-revolution transfer closes a full orbit and the time
/// of flight blows up; the root always lies below this.
const Z_SINGLE_REV: f64 = 4.0 * PI * PI;
/// Below this |z| the Stumpff functions use their parabolic limits.
const PARABOLIC_EPS: f64 = 1e-8;

/// Stumpff function C(z): (1 - cos(sqrt(z)))/z for elliptic z, hyperbolic
/// analogue for z < 0, limit 1/2 at z = 0.
pub fn stumpff_c(z: f64) -> f64 {
    if z > PARABOLIC_EPS {
        (1.0 - z.sqrt().cos()) / z
    } else if z < -PARABOLIC_EPS {
        ((-z).sqrt().cosh() - 1.0) / -z
    } else {
        0.5
    }
}

/// Stumpff function S(z): (sqrt(z) - sin(sqrt(z)))/sqrt(z)^3 for elliptic z,
/// hyperbolic analogue for z < 0, limit 1/6 at z = 0.
pub fn stumpff_s(z: f64) -> f64 {
    if z > PARABOLIC_EPS {
        let sqrt_z = z.sqrt();
        (sqrt_z - sqrt_z.sin()) / (sqrt_z * z)
    } else if z < -PARABOLIC_EPS {
        let sqrt_mz = (-z).sqrt();
        (sqrt_mz.sinh() - sqrt_mz) / (sqrt_mz * -z)
    } else {
        1.0 / 6.0
    }
}

/// Orbit connecting two position vectors in a fixed time of flight.
///
/// Velocities are the two impulsive endpoints a rendezvous planner needs;
/// the transfer orbit's shape is reported alongside so callers can check
/// periapsis clearance before committing to the burn.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LambertSolution {
    pub v1: Vector3<f64>,     // km/s, departure velocity at r1
    pub v2: Vector3<f64>,     // km/s, arrival velocity at r2
    pub transfer_angle: f64,  // deg, swept true anomaly in (0, 360)
    pub semi_major_axis: f64, // km, transfer orbit; < 0 when hyperbolic
    pub eccentricity: f64,    // transfer orbit
    pub time_of_flight: f64,  // s, as requested
    pub prograde: bool,
}

/// Solve Lambert's boundary-value problem.
///
/// Universal-variable formulation (Curtis ch. 5): the transfer angle comes
/// from the cross product of the endpoints and the `prograde` flag, then
/// Newton-Raphson drives the universal variable z until the computed time of
/// flight matches `tof` to 1e-8 relative, with each step confined to a
/// bracket on z and bisection taking over when Newton would leave it. One
/// solver covers the elliptic (z > 0), hyperbolic (z < 0) and parabolic
/// (z ~ 0) regimes through the Stumpff functions. Endpoint velocities come
/// from the Lagrange f, g, gdot coefficients.
///
/// Anti-parallel endpoints (180 deg transfer) leave the transfer plane
/// indeterminate and return [`OrbitError::DegenerateGeometry`]; a
/// non-converged iteration returns [`OrbitError::LambertDivergence`] rather
/// than a wrong answer.
pub fn solve_lambert(
    r1: &Vector3<f64>,
    r2: &Vector3<f64>,
    tof: f64,
    mu: f64,
    prograde: bool,
) -> OrbitResult<LambertSolution> {
    if mu <= 0.0 {
        return Err(OrbitError::InvalidInput("mu must be positive"));
    }
    if tof <= 0.0 {
        return Err(OrbitError::InvalidInput("time of flight must be positive"));
    }
    let r1_mag = r1.norm();
    let r2_mag = r2.norm();
    if r1_mag == 0.0 || r2_mag == 0.0 {
        return Err(OrbitError::InvalidInput("position vectors must be nonzero"));
    }

    // Transfer angle, disambiguated by the orbit normal's z-sign
    let cos_dnu = (r1.dot(r2) / (r1_mag * r2_mag)).clamp(-1.0, 1.0);
    let cross = r1.cross(r2);
    let short_way = if prograde {
        cross.z >= 0.0
    } else {
        cross.z < 0.0
    };
    let dnu = if short_way {
        cos_dnu.acos()
    } else {
        std::f64::consts::TAU - cos_dnu.acos()
    };

    // A = sin(dnu) * sqrt(r1 r2 / (1 - cos(dnu))); A = 0 means the endpoints
    // are parallel or anti-parallel and the transfer plane is indeterminate
    if (1.0 - cos_dnu).abs() < 1e-12 {
        return Err(OrbitError::DegenerateGeometry(
            "transfer angle of 0 deg: endpoints are parallel",
        ));
    }
    let a_geom = dnu.sin() * (r1_mag * r2_mag / (1.0 - cos_dnu)).sqrt();
    if a_geom.abs() < 1e-12 * (r1_mag + r2_mag) {
        return Err(OrbitError::DegenerateGeometry(
            "transfer angle of 180 deg: transfer plane is indeterminate",
        ));
    }

    let sqrt_mu = mu.sqrt();

    // The time of flight grows monotonically with z between the hyperbolic
    // side and the single-revolution limit, so a shrinking bracket always
    // contains the root. Raw Newton is unsafe here: on long-way geometries
    // (negative A) a full step can jump past z = 4 pi^2, where the
    // time-of-flight curve turns non-monotonic and the iterates oscillate.
    let mut z_lo = -Z_SINGLE_REV;
    let mut z_hi = Z_SINGLE_REV;
    let mut z = 0.0;
    let mut converged = false;
    let mut tof_error = f64::INFINITY;

    for _ in 0..LAMBERT_MAX_ITER {
        let c = stumpff_c(z);
        let s = stumpff_s(z);

        let y = r1_mag + r2_mag + a_geom * (z * s - 1.0) / c.sqrt();
        if y < 0.0 {
            // Infeasible iterate. y rises with z when A > 0 and falls when
            // A < 0, so tighten the bracket from the matching side and bisect
            if a_geom > 0.0 {
                z_lo = z;
            } else {
                z_hi = z;
            }
            z = 0.5 * (z_lo + z_hi);
            continue;
        }

        let chi = (y / c).sqrt();
        let tof_calc = (chi.powi(3) * s + a_geom * y.sqrt()) / sqrt_mu;
        tof_error = tof_calc - tof;
        if tof_error.abs() <= LAMBERT_TOL * tof {
            converged = true;
            break;
        }
        if tof_error < 0.0 {
            z_lo = z;
        } else {
            z_hi = z;
        }

        // dt/dz (Curtis eq. 5.43), with the z -> 0 limiting form
        let dt_dz = if z.abs() < PARABOLIC_EPS {
            (2.0_f64.sqrt() / 40.0 * y.powf(1.5)
                + a_geom / 8.0 * (y.sqrt() + a_geom * (0.5 / y).sqrt()))
                / sqrt_mu
        } else {
            ((y / c).powf(1.5) * ((c - 1.5 * s / c) / (2.0 * z) + 0.75 * s * s / c)
                + a_geom / 8.0 * (3.0 * s / c * y.sqrt() + a_geom * (c / y).sqrt()))
                / sqrt_mu
        };

        // Take the Newton step when it stays inside the bracket, bisect when
        // it does not
        let z_newton = z - tof_error / dt_dz;
        z = if z_newton.is_finite() && z_newton > z_lo && z_newton < z_hi {
            z_newton
        } else {
            0.5 * (z_lo + z_hi)
        };
    }

    if !converged {
        return Err(OrbitError::LambertDivergence {
            iterations: LAMBERT_MAX_ITER,
            tof_error,
        });
    }

    // Lagrange coefficients at the converged y
    let c = stumpff_c(z);
    let s = stumpff_s(z);
    let y = r1_mag + r2_mag + a_geom * (z * s - 1.0) / c.sqrt();

    let f = 1.0 - y / r1_mag;
    let g = a_geom * (y / mu).sqrt();
    let g_dot = 1.0 - y / r2_mag;

    let v1 = (r2 - f * r1) / g;
    let v2 = (g_dot * r2 - r1) / g;

    // Transfer orbit shape from the departure state
    let energy = 0.5 * v1.norm_squared() - mu / r1_mag;
    let semi_major_axis = -mu / (2.0 * energy);
    let e_vec = ((v1.norm_squared() - mu / r1_mag) * r1 - r1.dot(&v1) * &v1) / mu;

    Ok(LambertSolution {
        v1,
        v2,
        transfer_angle: dnu.to_degrees(),
        semi_major_axis,
        eccentricity: e_vec.norm(),
        time_of_flight: tof,
        prograde,
    })
}
