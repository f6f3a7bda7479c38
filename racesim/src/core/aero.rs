use crate::core::calibration::AeroCalibration;
use helpers::general::lin_interp;

/// * `in_draft` - True if the car gains from the slipstream of the car ahead
/// * `distance` - (car lengths) Trailing distance to the car ahead
/// * `speed_boost` - (mph) Straight-line speed gain
/// * `fuel_savings` - (-) Relative fuel consumption reduction
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct DraftStatus {
    pub in_draft: bool,
    pub distance: f64,
    pub speed_boost: f64,
    pub fuel_savings: f64,
}

/// draft_speed_boost returns the straight-line speed gain (mph) when trailing the car ahead at
/// the given distance. Triangular: zero when blocked at 0 lengths, peak at the optimal distance,
/// zero again at and beyond the maximum distance.
pub fn draft_speed_boost(distance: f64, cal: &AeroCalibration) -> f64 {
    if !distance.is_finite() {
        return 0.0;
    }

    lin_interp(
        distance,
        &[0.0, cal.optimal_lengths, cal.max_lengths],
        &[0.0, cal.peak_boost_mph, 0.0],
    )
}

/// draft_status returns the draft status of a car trailing the car ahead at the given distance.
pub fn draft_status(distance: f64, fuel_saving: f64, cal: &AeroCalibration) -> DraftStatus {
    let speed_boost = draft_speed_boost(distance, cal);
    let in_draft = speed_boost > 0.0;

    DraftStatus {
        in_draft,
        distance,
        speed_boost,
        fuel_savings: if in_draft { fuel_saving } else { 0.0 },
    }
}

/// is_side_by_side returns true if two cars are close enough to race side by side.
pub fn is_side_by_side(distance: f64, cal: &AeroCalibration) -> bool {
    distance < cal.side_by_side_lengths
}

/// side_by_side_factor returns the speed multiplier of a car racing side by side.
pub fn side_by_side_factor(side_by_side: bool, cal: &AeroCalibration) -> f64 {
    if side_by_side {
        1.0 - cal.side_by_side_penalty
    } else {
        1.0
    }
}

/// gap_to_car_lengths converts a time gap (s) at the given speed (ft/s) into car lengths.
pub fn gap_to_car_lengths(gap: f64, speed_ft_s: f64, cal: &AeroCalibration) -> f64 {
    gap.max(0.0) * speed_ft_s / cal.car_length_ft
}
