use crate::core::calibration::{
    CornerCalibration, BANKING_MAX_DEG, FT_S_TO_MPH, GRAVITY_FT_S2, RADIUS_MIN_FT,
};

/// grip_coefficient returns the friction coefficient mu for the given effective grip (tire grip
/// times surface grip), capped at the calibrated maximum.
pub fn grip_coefficient(effective_grip: f64, cal: &CornerCalibration) -> f64 {
    let grip = if effective_grip.is_finite() {
        effective_grip.max(0.0).min(1.0)
    } else {
        0.0
    };

    let mu = cal.grip_coeff_max * (cal.grip_coeff_base_fraction + (1.0 - cal.grip_coeff_base_fraction) * grip);
    mu.max(0.0).min(cal.grip_coeff_max)
}

/// max_corner_speed returns the maximum speed (mph) through a banked turn.
///
/// v = sqrt(r * g * (sin(theta) + mu * cos(theta)) / (cos(theta) - mu * sin(theta)))
///
/// Banking is clamped to [0, 89] deg and the radius to at least 1 ft. mu is clamped below
/// cot(theta) so that the denominator stays strictly positive and the result finite.
pub fn max_corner_speed(
    banking_deg: f64,
    radius_ft: f64,
    effective_grip: f64,
    cal: &CornerCalibration,
) -> f64 {
    let banking_deg = if banking_deg.is_finite() {
        banking_deg.max(0.0).min(BANKING_MAX_DEG)
    } else {
        0.0
    };
    let radius = if radius_ft.is_finite() {
        radius_ft.max(RADIUS_MIN_FT)
    } else {
        RADIUS_MIN_FT
    };

    let theta = banking_deg.to_radians();
    let (sin_theta, cos_theta) = theta.sin_cos();

    let mut mu = grip_coefficient(effective_grip, cal);
    if sin_theta > 0.0 {
        mu = mu.min(cal.denominator_margin * cos_theta / sin_theta);
    }

    let numerator = sin_theta + mu * cos_theta;
    let denominator = cos_theta - mu * sin_theta;

    (radius * GRAVITY_FT_S2 * numerator / denominator).sqrt() * FT_S_TO_MPH
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_grip_coefficient_cap() {
        let cal = CornerCalibration::default();
        assert_relative_eq!(grip_coefficient(1.0, &cal), 0.62);
        assert_relative_eq!(grip_coefficient(3.0, &cal), 0.62);
        assert_relative_eq!(grip_coefficient(0.0, &cal), 0.62 * 0.55);
        assert_relative_eq!(grip_coefficient(f64::NAN, &cal), 0.62 * 0.55);
    }

    #[test]
    fn test_flat_corner_matches_friction_circle() {
        // without banking v = sqrt(mu * g * r)
        let cal = CornerCalibration::default();
        let v = max_corner_speed(0.0, 500.0, 1.0, &cal);
        let expected = (0.62 * GRAVITY_FT_S2 * 500.0_f64).sqrt() * FT_S_TO_MPH;
        assert_relative_eq!(v, expected, epsilon = 1e-9);
    }

    #[test]
    fn test_banking_increases_speed() {
        let cal = CornerCalibration::default();
        let flat = max_corner_speed(0.0, 640.0, 1.0, &cal);
        let bristol = max_corner_speed(26.0, 640.0, 1.0, &cal);
        let daytona = max_corner_speed(31.0, 640.0, 1.0, &cal);
        assert!(flat < bristol && bristol < daytona);
        // calibrated Bristol corner speed
        assert!(bristol > 120.0 && bristol < 130.0, "bristol corner speed {}", bristol);
    }

    #[test]
    fn test_grip_increases_speed() {
        let cal = CornerCalibration::default();
        let worn = max_corner_speed(24.0, 1150.0, 0.75, &cal);
        let fresh = max_corner_speed(24.0, 1150.0, 1.0, &cal);
        assert!(worn < fresh);
    }

    #[test]
    fn test_pathological_inputs_stay_finite() {
        let cal = CornerCalibration::default();
        for &(banking, radius, grip) in &[
            (89.0, 500.0, 1.0),
            (120.0, 500.0, 1.0),
            (60.0, 0.0, 1.0),
            (-10.0, -5.0, -1.0),
            (f64::NAN, f64::INFINITY, f64::NAN),
        ] {
            let v = max_corner_speed(banking, radius, grip, &cal);
            assert!(v.is_finite() && v > 0.0, "{} {} {} -> {}", banking, radius, grip, v);
        }
    }
}
