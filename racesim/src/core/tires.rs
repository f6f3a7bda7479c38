use crate::core::calibration::TireCalibration;
use crate::core::track::TrackCategory;
use helpers::general::lin_interp;

/// grip returns the available tire grip in [grip_floor, 1.0] after the given number of laps on a
/// set of tires.
///
/// * linear decay from 1.0 at lap 0 to the grip floor at the tire life of the track category
/// * clamped at the floor afterwards, tires degrade but never fail outright
pub fn grip(laps_on_tires: f64, category: TrackCategory, cal: &TireCalibration) -> f64 {
    let tire_life = cal.life_laps.get(category);
    let age_frac = laps_on_tires.max(0.0) / tire_life;

    (1.0 - (1.0 - cal.grip_floor) * age_frac).max(cal.grip_floor)
}

/// grip_from_wear converts the remaining tire percentage (100 = fresh) into laps on tires of the
/// track category and returns the corresponding grip.
pub fn grip_from_wear(tire_wear: f64, category: TrackCategory, cal: &TireCalibration) -> f64 {
    let worn_frac = (100.0 - tire_wear.max(0.0).min(100.0)) / 100.0;
    grip(worn_frac * cal.life_laps.get(category), category, cal)
}

/// lap_time_penalty returns the lap time loss (s) caused by the given grip on top of the base lap
/// time.
///
/// * grip >= onset: no penalty
/// * floor <= grip < onset: linear penalty rising to `penalty_at_floor` * base at the floor
/// * grip < floor: exponential growth from that level (tire cliff)
pub fn lap_time_penalty(base_laptime: f64, grip: f64, cal: &TireCalibration) -> f64 {
    let penalty_frac = if grip >= cal.penalty_onset_grip {
        0.0
    } else if grip >= cal.grip_floor {
        lin_interp(
            grip,
            &[cal.grip_floor, cal.penalty_onset_grip],
            &[cal.penalty_at_floor, 0.0],
        )
    } else {
        cal.penalty_at_floor * (cal.cliff_steepness * (cal.grip_floor - grip)).exp()
    };

    base_laptime * penalty_frac
}

/// wear_rate_per_lap returns the tire percentage lost during one lap.
pub fn wear_rate_per_lap(
    category: TrackCategory,
    aggression_multiplier: f64,
    side_by_side: bool,
    cal: &TireCalibration,
) -> f64 {
    let side_by_side_factor = if side_by_side { cal.side_by_side_wear } else { 1.0 };

    100.0 / cal.life_laps.get(category) * aggression_multiplier * side_by_side_factor
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_grip_decay() {
        let cal = TireCalibration::default();
        assert_relative_eq!(grip(0.0, TrackCategory::Short, &cal), 1.0);
        assert_relative_eq!(grip(50.0, TrackCategory::Short, &cal), 0.75);
        assert_relative_eq!(grip(100.0, TrackCategory::Short, &cal), 0.5);
        assert_relative_eq!(grip(70.0, TrackCategory::Superspeedway, &cal), 0.75);
    }

    #[test]
    fn test_grip_never_below_floor() {
        let cal = TireCalibration::default();
        assert_relative_eq!(grip(500.0, TrackCategory::Intermediate, &cal), 0.5);
        assert_relative_eq!(grip(-10.0, TrackCategory::Intermediate, &cal), 1.0);
    }

    #[test]
    fn test_grip_from_wear() {
        let cal = TireCalibration::default();
        for category in [
            TrackCategory::Short,
            TrackCategory::Intermediate,
            TrackCategory::Superspeedway,
        ] {
            assert_relative_eq!(grip_from_wear(100.0, category, &cal), 1.0);
            assert_relative_eq!(grip_from_wear(50.0, category, &cal), 0.75, epsilon = 1e-12);
            assert_relative_eq!(grip_from_wear(0.0, category, &cal), 0.5);
            assert_relative_eq!(grip_from_wear(-20.0, category, &cal), 0.5);
        }
    }

    #[test]
    fn test_lap_time_penalty_regions() {
        let cal = TireCalibration::default();
        assert_relative_eq!(lap_time_penalty(100.0, 1.0, &cal), 0.0);
        assert_relative_eq!(lap_time_penalty(100.0, 0.8, &cal), 0.0);
        assert_relative_eq!(lap_time_penalty(100.0, 0.65, &cal), 2.0, epsilon = 1e-9);
        assert_relative_eq!(lap_time_penalty(100.0, 0.5, &cal), 4.0, epsilon = 1e-9);

        // the cliff grows faster than the linear region
        let below = lap_time_penalty(100.0, 0.4, &cal);
        assert!(below > 4.0 * 2.5, "cliff penalty too small: {}", below);
    }

    #[test]
    fn test_lap_time_penalty_is_monotonic() {
        let cal = TireCalibration::default();
        let mut prev = 0.0;
        for i in (30..=100).rev() {
            let penalty = lap_time_penalty(20.0, i as f64 / 100.0, &cal);
            assert!(penalty >= prev);
            prev = penalty;
        }
    }

    #[test]
    fn test_wear_rate() {
        let cal = TireCalibration::default();
        assert_relative_eq!(wear_rate_per_lap(TrackCategory::Short, 1.0, false, &cal), 1.0);
        assert_relative_eq!(
            wear_rate_per_lap(TrackCategory::Short, 1.0, true, &cal),
            1.1,
            epsilon = 1e-12
        );
        assert_relative_eq!(
            wear_rate_per_lap(TrackCategory::Superspeedway, 1.4, false, &cal),
            1.0,
            epsilon = 1e-12
        );
    }
}
