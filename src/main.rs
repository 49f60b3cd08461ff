use orbital_nav::{
    hohmann, propagate_orbit, solve_lambert, BodyRegistry, OrbitalElements, OrbitalState,
};

fn main() {
    let registry = BodyRegistry::with_standard_bodies();
    let earth = registry.get("Earth").expect("standard table has Earth");
    let mu = earth.mu;

    println!("=== Hohmann Transfer: LEO -> GEO ===\n");

    let r_leo = earth.radius + 300.0;
    let r_geo = 42_164.0;
    let transfer = hohmann(r_leo, r_geo, mu);

    println!("LEO altitude: {:.0} km", earth.altitude(r_leo));
    println!("GEO altitude: {:.0} km", earth.altitude(r_geo));
    println!();
    println!("Delta-v 1 (raise apoapsis): {:.3} km/s", transfer.dv1);
    println!("Delta-v 2 (circularize):    {:.3} km/s", transfer.dv2);
    println!("Total delta-v:              {:.3} km/s", transfer.total_dv);
    println!(
        "Transfer time:              {:.2} hours",
        transfer.transfer_time / 3600.0
    );
    println!("Departure phase angle:      {:.1} deg", transfer.phase_angle);
    println!();

    println!("=== Orbit Propagation ===\n");

    let orbit = OrbitalElements {
        semi_major_axis: earth.radius + 800.0,
        eccentricity: 0.02,
        inclination: 51.6,
        raan: 40.0,
        arg_periapsis: 30.0,
        true_anomaly: 0.0,
    };
    let period = orbit.period(mu);
    let state = orbit.to_state(mu, 0.0);

    println!(
        "Orbit: a = {:.0} km, e = {:.3}, i = {:.1} deg",
        orbit.semi_major_axis, orbit.eccentricity, orbit.inclination
    );
    println!("Period: {:.1} min", period / 60.0);

    for i in 0..=4 {
        let dt = i as f64 * period / 4.0;
        match propagate_orbit(&state, dt, mu) {
            Ok(s) => {
                let elements = OrbitalElements::from_state(&s, mu);
                println!(
                    "  t = {:>7.1} s: r = {:.1} km, v = {:.3} km/s, nu = {:.1} deg",
                    s.time,
                    s.radius(),
                    s.speed(),
                    elements.true_anomaly
                );
            }
            Err(err) => println!("  t = {:>7.1} s: {}", dt, err),
        }
    }
    println!();

    println!("=== Lambert Cross-Check ===\n");

    // Connect two points a quarter orbit apart and compare against the
    // orbit's own velocities
    let dt = period / 4.0;
    let depart: OrbitalState = state;
    let arrive = propagate_orbit(&depart, dt, mu).expect("elliptical propagation");

    match solve_lambert(&depart.position, &arrive.position, dt, mu, true) {
        Ok(sol) => {
            println!("Transfer angle:   {:.2} deg", sol.transfer_angle);
            println!(
                "Transfer orbit:   a = {:.0} km, e = {:.4}",
                sol.semi_major_axis, sol.eccentricity
            );
            println!(
                "Departure dv vs orbit: {:.6} km/s",
                (sol.v1 - depart.velocity).norm()
            );
            println!(
                "Arrival dv vs orbit:   {:.6} km/s",
                (sol.v2 - arrive.velocity).norm()
            );
        }
        Err(err) => println!("Lambert failed: {}", err),
    }
}
