use nalgebra::Vector3;

use crate::angles::{quadrant_acos, wrap_degrees};
use crate::bodies::CelestialBody;

/// Vector magnitudes below this are treated as degenerate (circular or
/// equatorial geometry) relative to normalized inputs.
const DEGENERACY_EPS: f64 = 1e-10;

/// Cartesian orbital state in the inertial frame of the dominant body.
/// Units: km, km/s, s.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct OrbitalState {
    pub position: Vector3<f64>,
    pub velocity: Vector3<f64>,
    pub time: f64,
}

impl OrbitalState {
    pub fn new(position: Vector3<f64>, velocity: Vector3<f64>, time: f64) -> Self {
        OrbitalState {
            position,
            velocity,
            time,
        }
    }

    /// Distance from the body center (km).
    pub fn radius(&self) -> f64 {
        self.position.norm()
    }

    pub fn speed(&self) -> f64 {
        self.velocity.norm()
    }

    /// Specific orbital energy, km^2/s^2. Negative for bound orbits.
    pub fn specific_energy(&self, mu: f64) -> f64 {
        0.5 * self.velocity.norm_squared() - mu / self.radius()
    }

    /// Specific angular momentum vector, km^2/s.
    pub fn angular_momentum(&self) -> Vector3<f64> {
        self.position.cross(&self.velocity)
    }
}

/// Classical Keplerian orbital elements.
///
/// All angles are in degrees at this boundary (converted to radians
/// internally for trigonometry). Derived quantities (period, semi-minor
/// axis, apsis radii) are recomputed from the primary five on demand and
/// never stored.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct OrbitalElements {
    pub semi_major_axis: f64, // km; > 0 elliptical, < 0 hyperbolic
    pub eccentricity: f64,    // >= 0
    pub inclination: f64,     // deg, [0, 180]
    pub raan: f64,            // deg, [0, 360); 0 when equatorial (undefined)
    pub arg_periapsis: f64,   // deg, [0, 360); 0 when circular (undefined)
    pub true_anomaly: f64,    // deg, [0, 360)
}

impl OrbitalElements {
    /// Extract elements from a Cartesian state.
    ///
    /// Degenerate-case policy: an equatorial orbit (|node| ~ 0) gets
    /// `raan = 0` and measures `arg_periapsis` from the x-axis; a circular
    /// orbit (|e| ~ 0) gets `arg_periapsis = 0` and measures `true_anomaly`
    /// from the ascending node, or from the x-axis if also equatorial.
    /// Parabolic states (e ~ 1) leave `semi_major_axis` infinite.
    pub fn from_state(state: &OrbitalState, mu: f64) -> Self {
        let pos = state.position;
        let vel = state.velocity;
        let r = pos.norm();
        let v = vel.norm();

        // Specific angular momentum and node vector n = z_hat x h
        let h = pos.cross(&vel);
        let h_mag = h.norm();
        let n = Vector3::new(-h.y, h.x, 0.0);
        let n_mag = n.norm();

        // Eccentricity vector points at periapsis
        let e_vec = ((v * v - mu / r) * pos - pos.dot(&vel) * vel) / mu;
        let ecc = e_vec.norm();

        let energy = 0.5 * v * v - mu / r;
        let sma = -mu / (2.0 * energy);

        // Zero angular momentum (radial trajectory) leaves the orbital plane
        // undefined; fall back to the equatorial conventions instead of
        // dividing into NaN
        let inclination = if h_mag > DEGENERACY_EPS {
            quadrant_acos(h.z / h_mag, false)
        } else {
            0.0
        };

        let raan = if n_mag > DEGENERACY_EPS {
            quadrant_acos(n.x / n_mag, n.y < 0.0)
        } else {
            0.0
        };

        let arg_periapsis = if ecc <= DEGENERACY_EPS {
            0.0
        } else if n_mag > DEGENERACY_EPS {
            quadrant_acos(n.dot(&e_vec) / (n_mag * ecc), e_vec.z < 0.0)
        } else {
            // Equatorial ellipse: measure periapsis from the x-axis
            quadrant_acos(e_vec.x / ecc, e_vec.y < 0.0)
        };

        let true_anomaly = if ecc > DEGENERACY_EPS {
            quadrant_acos(e_vec.dot(&pos) / (ecc * r), pos.dot(&vel) < 0.0)
        } else if n_mag > DEGENERACY_EPS {
            // Circular inclined: argument of latitude from the node
            quadrant_acos(n.dot(&pos) / (n_mag * r), pos.z < 0.0)
        } else {
            // Circular equatorial: true longitude from the x-axis
            quadrant_acos(pos.x / r, pos.y < 0.0)
        };

        OrbitalElements {
            semi_major_axis: sma,
            eccentricity: ecc,
            inclination,
            raan,
            arg_periapsis,
            true_anomaly,
        }
    }

    /// Rebuild the Cartesian state at the stored true anomaly.
    ///
    /// Exact inverse of [`from_state`](Self::from_state) for non-degenerate
    /// inputs: perifocal position/velocity rotated into the inertial frame
    /// by R_z(raan) * R_x(inclination) * R_z(arg_periapsis).
    pub fn to_state(&self, mu: f64, time: f64) -> OrbitalState {
        let nu = self.true_anomaly.to_radians();
        let ecc = self.eccentricity;

        let p = self.semi_latus_rectum();
        let r = p / (1.0 + ecc * nu.cos());

        let r_pqw = Vector3::new(r * nu.cos(), r * nu.sin(), 0.0);

        let sqrt_mu_p = (mu / p).sqrt();
        let v_pqw = Vector3::new(-sqrt_mu_p * nu.sin(), sqrt_mu_p * (ecc + nu.cos()), 0.0);

        let (sin_raan, cos_raan) = self.raan.to_radians().sin_cos();
        let (sin_argp, cos_argp) = self.arg_periapsis.to_radians().sin_cos();
        let (sin_inc, cos_inc) = self.inclination.to_radians().sin_cos();

        let rotate = |v: &Vector3<f64>| -> Vector3<f64> {
            Vector3::new(
                (cos_raan * cos_argp - sin_raan * sin_argp * cos_inc) * v.x
                    + (-cos_raan * sin_argp - sin_raan * cos_argp * cos_inc) * v.y,
                (sin_raan * cos_argp + cos_raan * sin_argp * cos_inc) * v.x
                    + (-sin_raan * sin_argp + cos_raan * cos_argp * cos_inc) * v.y,
                (sin_argp * sin_inc) * v.x + (cos_argp * sin_inc) * v.y,
            )
        };

        OrbitalState {
            position: rotate(&r_pqw),
            velocity: rotate(&v_pqw),
            time,
        }
    }

    /// Circular orbit of the given radius (km) and inclination (deg).
    pub fn circular(radius: f64, inclination: f64) -> Self {
        OrbitalElements {
            semi_major_axis: radius,
            eccentricity: 0.0,
            inclination,
            raan: 0.0,
            arg_periapsis: 0.0,
            true_anomaly: 0.0,
        }
    }

    /// Semi-latus rectum p = a(1 - e^2), km. Well-defined even near e = 1.
    pub fn semi_latus_rectum(&self) -> f64 {
        self.semi_major_axis * (1.0 - self.eccentricity * self.eccentricity)
    }

    /// Semi-minor axis, km. Elliptical orbits only.
    pub fn semi_minor_axis(&self) -> f64 {
        self.semi_major_axis * (1.0 - self.eccentricity * self.eccentricity).sqrt()
    }

    /// Orbital period, s. Elliptical orbits only.
    pub fn period(&self, mu: f64) -> f64 {
        2.0 * std::f64::consts::PI * (self.semi_major_axis.powi(3) / mu).sqrt()
    }

    /// Mean angular rate n = sqrt(mu / a^3), rad/s.
    pub fn mean_motion(&self, mu: f64) -> f64 {
        (mu / self.semi_major_axis.powi(3)).sqrt()
    }

    /// Periapsis distance from the body center, km.
    pub fn periapsis_radius(&self) -> f64 {
        self.semi_major_axis * (1.0 - self.eccentricity)
    }

    /// Apoapsis distance from the body center, km. Infinite for e >= 1.
    pub fn apoapsis_radius(&self) -> f64 {
        self.semi_major_axis * (1.0 + self.eccentricity)
    }

    /// Periapsis altitude above the body's reference radius, km.
    pub fn periapsis_altitude(&self, body: &CelestialBody) -> f64 {
        body.altitude(self.periapsis_radius())
    }

    /// Apoapsis altitude above the body's reference radius, km.
    pub fn apoapsis_altitude(&self, body: &CelestialBody) -> f64 {
        body.altitude(self.apoapsis_radius())
    }

    /// Copy of these elements at a different true anomaly (deg).
    pub fn at_true_anomaly(&self, true_anomaly: f64) -> Self {
        OrbitalElements {
            true_anomaly: wrap_degrees(true_anomaly),
            ..*self
        }
    }
}
