use std::collections::HashMap;

use crate::error::{OrbitError, OrbitResult};

/// Earth gravitational parameter, km^3/s^2.
pub const MU_EARTH: f64 = 3.986_004_418e5;
/// Earth equatorial radius, km.
pub const R_EARTH: f64 = 6_378.137;

/// Reference data for a gravitating body.
///
/// `mu` is the only quantity the propagation math needs; mass and radius are
/// carried for callers computing altitudes or building their own mu.
/// Units: kg, km, km^3/s^2.
#[derive(Debug, Clone, PartialEq)]
pub struct CelestialBody {
    pub name: String,
    pub mass: f64,   // kg
    pub radius: f64, // km, reference (equatorial) radius
    pub mu: f64,     // km^3/s^2, must be > 0
}

impl CelestialBody {
    /// Build a body record, rejecting a non-positive gravitational parameter.
    pub fn new(name: impl Into<String>, mass: f64, radius: f64, mu: f64) -> OrbitResult<Self> {
        if mu <= 0.0 {
            return Err(OrbitError::InvalidInput(
                "gravitational parameter must be positive",
            ));
        }
        Ok(CelestialBody {
            name: name.into(),
            mass,
            radius,
            mu,
        })
    }

    /// Altitude above the reference radius for a given distance from center (km).
    pub fn altitude(&self, r: f64) -> f64 {
        r - self.radius
    }
}

/// Lookup table of known bodies, keyed by name.
///
/// The simulation's world module decides which body a craft treats as
/// dominant and feeds its `mu` into the math below; this table only stores
/// and returns reference data. Callers may register their own bodies.
#[derive(Debug, Clone, Default)]
pub struct BodyRegistry {
    bodies: HashMap<String, CelestialBody>,
}

impl BodyRegistry {
    /// Empty registry.
    pub fn new() -> Self {
        Self::default()
    }

    /// Registry pre-populated with the major solar-system bodies.
    pub fn with_standard_bodies() -> Self {
        let mut registry = Self::new();
        for (name, mass, radius, mu) in [
            ("Sun", 1.989e30, 695_700.0, 1.327_124_400_18e11),
            ("Mercury", 3.301e23, 2_439.7, 2.203_2e4),
            ("Venus", 4.867e24, 6_051.8, 3.248_59e5),
            ("Earth", 5.972e24, R_EARTH, MU_EARTH),
            ("Moon", 7.342e22, 1_737.4, 4.904_869_5e3),
            ("Mars", 6.417e23, 3_389.5, 4.282_837e4),
            ("Jupiter", 1.898e27, 69_911.0, 1.266_865_34e8),
            ("Saturn", 5.683e26, 58_232.0, 3.793_118_7e7),
        ] {
            registry.insert(CelestialBody {
                name: name.to_string(),
                mass,
                radius,
                mu,
            });
        }
        registry
    }

    /// Register a body, replacing any previous entry with the same name.
    pub fn insert(&mut self, body: CelestialBody) {
        self.bodies.insert(body.name.clone(), body);
    }

    pub fn get(&self, name: &str) -> Option<&CelestialBody> {
        self.bodies.get(name)
    }

    pub fn len(&self) -> usize {
        self.bodies.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bodies.is_empty()
    }
}
