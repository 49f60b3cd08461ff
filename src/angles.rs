/// Normalize an angle in degrees to [0, 360).
pub fn wrap_degrees(angle: f64) -> f64 {
    let wrapped = angle.rem_euclid(360.0);
    // rem_euclid can return exactly 360.0 for tiny negative inputs
    if wrapped >= 360.0 {
        wrapped - 360.0
    } else {
        wrapped
    }
}

/// Quadrant-corrected arccosine, in degrees.
///
/// `acos` alone only covers [0, 180]; the caller passes the sign check that
/// decides whether the true angle lies in the other half-plane (`n_y < 0`
/// for RAAN, `e_z < 0` for the argument of periapsis, `r.v < 0` for true
/// anomaly). When `flip` is set the angle is reflected to `360 - theta`.
pub fn quadrant_acos(cos_value: f64, flip: bool) -> f64 {
    let angle = cos_value.clamp(-1.0, 1.0).acos().to_degrees();
    if flip {
        wrap_degrees(360.0 - angle)
    } else {
        angle
    }
}
