use std::f64::consts::PI;

use crate::angles::wrap_degrees;
use crate::error::{OrbitError, OrbitResult};

/// Two-burn transfer plan between coplanar circular orbits.
/// Immutable value object; produced once per planning call.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct HohmannTransfer {
    pub dv1: f64,           // km/s, departure burn onto the transfer ellipse
    pub dv2: f64,           // km/s, arrival circularization burn
    pub total_dv: f64,      // km/s
    pub transfer_time: f64, // s, half the transfer orbit period
    pub transfer_sma: f64,  // km, semi-major axis of the transfer ellipse
    pub phase_angle: f64,   // deg, required target lead angle at departure
    pub r1: f64,            // km, initial orbit radius
    pub r2: f64,            // km, final orbit radius
}

/// Three-burn transfer plan through an intermediate apoapsis.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BiellipticTransfer {
    pub dv1: f64,           // km/s, raise apoapsis to rb
    pub dv2: f64,           // km/s, at rb, raise periapsis to r2
    pub dv3: f64,           // km/s, at r2, circularize (retrograde)
    pub total_dv: f64,      // km/s
    pub transfer_time: f64, // s, both half-ellipse legs
    pub r1: f64,            // km
    pub rb: f64,            // km, intermediate apoapsis
    pub r2: f64,            // km
}

/// Circular orbit speed at radius `r` (km), km/s.
pub fn circular_velocity(r: f64, mu: f64) -> f64 {
    (mu / r).sqrt()
}

/// Speed at radius `r` on an orbit of semi-major axis `a`, via vis-viva.
fn vis_viva(r: f64, a: f64, mu: f64) -> f64 {
    (mu * (2.0 / r - 1.0 / a)).sqrt()
}

/// Compute a Hohmann transfer between two circular orbits.
///
/// `r1` and `r2` are orbital radii from the body center (not altitudes), km.
/// The phase angle is the in-plane lead the target must have at the first
/// burn so that both arrive at the apoapsis point together.
pub fn hohmann(r1: f64, r2: f64, mu: f64) -> HohmannTransfer {
    let a_transfer = (r1 + r2) / 2.0;

    let v_circ1 = circular_velocity(r1, mu);
    let v_circ2 = circular_velocity(r2, mu);

    let v_depart = vis_viva(r1, a_transfer, mu);
    let v_arrive = vis_viva(r2, a_transfer, mu);

    let dv1 = (v_depart - v_circ1).abs();
    let dv2 = (v_circ2 - v_arrive).abs();

    let transfer_time = PI * (a_transfer.powi(3) / mu).sqrt();

    // Target sweeps n2 * t during the transfer; we cover 180 degrees
    let target_rate = (mu / r2.powi(3)).sqrt();
    let phase_angle = wrap_degrees(180.0 - (target_rate * transfer_time).to_degrees());

    HohmannTransfer {
        dv1,
        dv2,
        total_dv: dv1 + dv2,
        transfer_time,
        transfer_sma: a_transfer,
        phase_angle,
        r1,
        r2,
    }
}

/// Hohmann transfer, rejected as "no solution" when the total delta-v
/// exceeds `dv_budget` (km/s).
pub fn hohmann_within_budget(
    r1: f64,
    r2: f64,
    mu: f64,
    dv_budget: f64,
) -> OrbitResult<HohmannTransfer> {
    let transfer = hohmann(r1, r2, mu);
    if transfer.total_dv > dv_budget {
        return Err(OrbitError::BudgetExceeded {
            required: transfer.total_dv,
            budget: dv_budget,
        });
    }
    Ok(transfer)
}

/// Compute a bi-elliptic transfer through intermediate apoapsis `rb` (km).
///
/// Two Hohmann-like half-ellipse legs: r1 -> rb, then rb -> r2, with a final
/// circularization at r2. Beats a plain Hohmann only for large radius ratios
/// (r2/r1 above ~11.94, given a sufficiently high rb); the planner does not
/// validate the choice of `rb` — picking a useful one is the caller's job.
pub fn bielliptic(r1: f64, r2: f64, rb: f64, mu: f64) -> BiellipticTransfer {
    let a_first = (r1 + rb) / 2.0;
    let a_second = (rb + r2) / 2.0;

    // Burn 1 at r1: circular orbit onto the first ellipse
    let dv1 = (vis_viva(r1, a_first, mu) - circular_velocity(r1, mu)).abs();
    // Burn 2 at rb: switch ellipses at the shared apoapsis
    let dv2 = (vis_viva(rb, a_second, mu) - vis_viva(rb, a_first, mu)).abs();
    // Burn 3 at r2: circularize
    let dv3 = (circular_velocity(r2, mu) - vis_viva(r2, a_second, mu)).abs();

    let transfer_time =
        PI * (a_first.powi(3) / mu).sqrt() + PI * (a_second.powi(3) / mu).sqrt();

    BiellipticTransfer {
        dv1,
        dv2,
        dv3,
        total_dv: dv1 + dv2 + dv3,
        transfer_time,
        r1,
        rb,
        r2,
    }
}

/// Bi-elliptic transfer, rejected as "no solution" when the total delta-v
/// exceeds `dv_budget` (km/s).
pub fn bielliptic_within_budget(
    r1: f64,
    r2: f64,
    rb: f64,
    mu: f64,
    dv_budget: f64,
) -> OrbitResult<BiellipticTransfer> {
    let transfer = bielliptic(r1, r2, rb, mu);
    if transfer.total_dv > dv_budget {
        return Err(OrbitError::BudgetExceeded {
            required: transfer.total_dv,
            budget: dv_budget,
        });
    }
    Ok(transfer)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::bodies::MU_EARTH;

    #[test]
    fn hohmann_leo_to_geo_known_values() {
        // LEO (300 km) to GEO: dv1 ~ 2.43 km/s, dv2 ~ 1.47 km/s, ~5.26 h
        let h = hohmann(6678.0, 42164.0, MU_EARTH);

        assert!((h.dv1 - 2.43).abs() / 2.43 < 0.01, "dv1 = {:.3} km/s", h.dv1);
        assert!((h.dv2 - 1.47).abs() / 1.47 < 0.01, "dv2 = {:.3} km/s", h.dv2);
        let hours = h.transfer_time / 3600.0;
        assert!((hours - 5.26).abs() / 5.26 < 0.01, "transfer = {:.2} h", hours);
        assert_eq!(h.transfer_sma, (6678.0 + 42164.0) / 2.0);
    }

    #[test]
    fn hohmann_phase_angle_leo_to_geo() {
        // Target sweeps ~79 deg during the ~5.26 h coast, so it must lead by
        // ~101 deg at departure (standard rendezvous figure).
        let h = hohmann(6678.0, 42164.0, MU_EARTH);
        assert!(
            (h.phase_angle - 100.6).abs() < 1.0,
            "phase angle = {:.1} deg",
            h.phase_angle
        );
    }

    #[test]
    fn zero_dv_for_same_orbit() {
        let h = hohmann(7000.0, 7000.0, MU_EARTH);
        assert!(h.total_dv < 1e-9);
    }

    #[test]
    fn hohmann_descent_mirrors_ascent() {
        let up = hohmann(7000.0, 20000.0, MU_EARTH);
        let down = hohmann(20000.0, 7000.0, MU_EARTH);
        assert!((up.total_dv - down.total_dv).abs() < 1e-12);
        assert!((up.transfer_time - down.transfer_time).abs() < 1e-9);
    }

    #[test]
    fn bielliptic_beats_hohmann_for_large_ratios() {
        // r2/r1 = 17 with a high intermediate apoapsis: the three-burn path
        // should be cheaper than the direct Hohmann.
        let r1 = 7000.0;
        let r2 = 17.0 * r1;
        let rb = 60.0 * r1;

        let direct = hohmann(r1, r2, MU_EARTH);
        let threeb = bielliptic(r1, r2, rb, MU_EARTH);

        assert!(
            threeb.total_dv < direct.total_dv,
            "bi-elliptic {:.4} km/s should beat Hohmann {:.4} km/s",
            threeb.total_dv,
            direct.total_dv
        );
        assert!(threeb.transfer_time > direct.transfer_time);
    }

    #[test]
    fn bielliptic_with_rb_equal_r2_degenerates_to_hohmann() {
        let r1 = 6678.0;
        let r2 = 42164.0;
        let direct = hohmann(r1, r2, MU_EARTH);
        let threeb = bielliptic(r1, r2, r2, MU_EARTH);

        // Second burn folds into the circularization; totals match
        assert!((threeb.total_dv - direct.total_dv).abs() < 1e-9);
        assert!((threeb.dv1 - direct.dv1).abs() < 1e-12);
    }

    #[test]
    fn budget_check_reports_no_solution() {
        match hohmann_within_budget(6678.0, 42164.0, MU_EARTH, 1.0) {
            Err(OrbitError::BudgetExceeded { required, budget }) => {
                assert!(required > 3.8);
                assert_eq!(budget, 1.0);
            }
            other => panic!("expected BudgetExceeded, got {:?}", other),
        }

        assert!(hohmann_within_budget(6678.0, 42164.0, MU_EARTH, 4.5).is_ok());
        assert!(bielliptic_within_budget(6678.0, 42164.0, 100_000.0, MU_EARTH, 0.5).is_err());
    }
}
