use crate::core::aero::DraftStatus;
use crate::core::calibration::FuelCalibration;
use crate::core::driver::{fraction, DriverSkills, MentalState};
use crate::core::track::TrackCategory;

/// consumption_per_lap returns the fuel (gal) burned during one lap.
///
/// The factors are applied in a fixed order: consistency, frustration, confidence, draft. Changing
/// the order changes the rounding of the result.
pub fn consumption_per_lap(
    category: TrackCategory,
    skills: &DriverSkills,
    mental: &MentalState,
    draft: &DraftStatus,
    cal: &FuelCalibration,
) -> f64 {
    let mut consumption = cal.base_rate_gal.get(category);

    consumption *= 1.0 - cal.consistency_saving * fraction(skills.consistency);
    consumption *= 1.0 + cal.frustration_increase * fraction(mental.frustration);
    consumption *= 1.0 - cal.confidence_saving * fraction(mental.confidence);

    if draft.in_draft {
        consumption *= 1.0 - draft.fuel_savings;
    }

    consumption
}

/// weight_penalty returns the lap time loss (s) caused by carrying the given amount of fuel.
pub fn weight_penalty(fuel_gal: f64, category: TrackCategory, cal: &FuelCalibration) -> f64 {
    fuel_gal.max(0.0) * cal.weight_coeff.get(category)
}

/// accel_factor returns the straight-line speed multiplier caused by the fuel weight.
pub fn accel_factor(fuel_gal: f64, cal: &FuelCalibration) -> f64 {
    let fill_frac = (fuel_gal / cal.tank_capacity_gal).max(0.0).min(1.0);
    1.0 - cal.accel_loss_full_tank * fill_frac
}

/// fuel_pct_to_gal converts a fuel level in percent of the tank into gallons.
pub fn fuel_pct_to_gal(fuel_pct: f64, cal: &FuelCalibration) -> f64 {
    fuel_pct.max(0.0).min(100.0) / 100.0 * cal.tank_capacity_gal
}

/// fuel_gal_to_pct converts gallons into a fuel level in percent of the tank.
pub fn fuel_gal_to_pct(fuel_gal: f64, cal: &FuelCalibration) -> f64 {
    fuel_gal / cal.tank_capacity_gal * 100.0
}
