//! Calibration constants of the physical lap-time models.
//!
//! The formulas in `tires`, `fuel`, `aero`, `corner` and `lap_time` never hard-code a tuning value,
//! they read it from a `Calibration`. `Calibration::default()` reproduces the reference lap times
//! (e.g. Bristol at roughly 15.5s). Tuning tools may load a partial override from JSON, every
//! field that is missing keeps its default value.

use crate::core::track::TrackCategory;
use serde::Deserialize;

/// (ft/s^2) Gravitational acceleration.
pub const GRAVITY_FT_S2: f64 = 32.174;
/// Conversion factor from ft/s to mph.
pub const FT_S_TO_MPH: f64 = 3600.0 / 5280.0;
/// (ft) Feet per statute mile.
pub const FT_PER_MILE: f64 = 5280.0;

// TIRES -------------------------------------------------------------------------------------------
pub const TIRE_LIFE_LAPS: CategoryTable = CategoryTable {
    short: 100.0,
    intermediate: 120.0,
    superspeedway: 140.0,
    road: 120.0,
};
pub const TIRE_GRIP_FLOOR: f64 = 0.5;
pub const TIRE_PENALTY_ONSET_GRIP: f64 = 0.8;
pub const TIRE_PENALTY_AT_FLOOR: f64 = 0.04;
pub const TIRE_CLIFF_STEEPNESS: f64 = 10.0;
pub const TIRE_SIDE_BY_SIDE_WEAR: f64 = 1.10;
pub const TIRE_AGGRESSION_SWING: f64 = 0.15;
pub const TIRE_MANAGEMENT_SWING: f64 = 0.10;
pub const TIRE_WEAR_MULTIPLIER_FLOOR: f64 = 0.5;

// FUEL --------------------------------------------------------------------------------------------
pub const FUEL_BASE_RATE_GAL: CategoryTable = CategoryTable {
    short: 0.11,
    intermediate: 0.20,
    superspeedway: 0.27,
    road: 0.18,
};
pub const FUEL_WEIGHT_COEFF: CategoryTable = CategoryTable {
    short: 0.055,
    intermediate: 0.040,
    superspeedway: 0.025,
    road: 0.045,
};
pub const FUEL_TANK_CAPACITY_GAL: f64 = 18.0;
pub const FUEL_CONSISTENCY_SAVING: f64 = 0.12;
pub const FUEL_FRUSTRATION_INCREASE: f64 = 0.20;
pub const FUEL_CONFIDENCE_SAVING: f64 = 0.08;
pub const FUEL_DRAFT_SAVING: f64 = 0.12;
pub const FUEL_ACCEL_LOSS_FULL_TANK: f64 = 0.01;

// AERODYNAMICS ------------------------------------------------------------------------------------
pub const DRAFT_PEAK_BOOST_MPH: f64 = 4.0;
pub const DRAFT_OPTIMAL_LENGTHS: f64 = 1.5;
pub const DRAFT_MAX_LENGTHS: f64 = 2.5;
pub const SIDE_BY_SIDE_LENGTHS: f64 = 0.5;
pub const SIDE_BY_SIDE_SPEED_PENALTY: f64 = 0.02;
pub const CAR_LENGTH_FT: f64 = 16.0;

// CORNERS -----------------------------------------------------------------------------------------
pub const GRIP_COEFF_MAX: f64 = 0.62;
pub const GRIP_COEFF_BASE_FRACTION: f64 = 0.55;
pub const GRIP_COEFF_DENOMINATOR_MARGIN: f64 = 0.95;
pub const BANKING_MAX_DEG: f64 = 89.0;
pub const RADIUS_MIN_FT: f64 = 1.0;

// DRIVER ------------------------------------------------------------------------------------------
pub const RACECRAFT_TURN_SWING: f64 = 0.08;
pub const RACECRAFT_STRAIGHT_SWING: f64 = 0.05;
pub const MENTAL_CONFIDENCE_SWING: f64 = 0.05;
pub const MENTAL_FRUSTRATION_SWING: f64 = 0.05;
pub const MENTAL_MULTIPLIER_MIN: f64 = 0.92;
pub const MENTAL_MULTIPLIER_MAX: f64 = 1.08;
pub const DAMAGE_SPEED_LOSS: f64 = 0.10;

/// CategoryTable holds one value per track category.
#[derive(Debug, Deserialize, Clone, Copy, PartialEq)]
pub struct CategoryTable {
    pub short: f64,
    pub intermediate: f64,
    pub superspeedway: f64,
    pub road: f64,
}

impl CategoryTable {
    pub fn get(&self, category: TrackCategory) -> f64 {
        match category {
            TrackCategory::Short => self.short,
            TrackCategory::Intermediate => self.intermediate,
            TrackCategory::Superspeedway => self.superspeedway,
            TrackCategory::Road => self.road,
        }
    }
}

/// * `life_laps` - (laps) Laps until the tire reaches the grip floor
/// * `grip_floor` - (-) Minimum grip of a fully worn tire
/// * `penalty_onset_grip` - (-) Grip below which a lap time penalty applies
/// * `penalty_at_floor` - (-) Relative lap time penalty at the grip floor
/// * `cliff_steepness` - (-) Exponential growth rate of the penalty below the grip floor
/// * `side_by_side_wear` - (-) Wear multiplier while racing side by side
/// * `aggression_swing` - (-) Wear multiplier change between aggression 50 and 100
/// * `management_swing` - (-) Wear multiplier change between tire management 50 and 100
/// * `wear_multiplier_floor` - (-) Lower bound of the driver wear multiplier
#[derive(Debug, Deserialize, Clone, PartialEq)]
#[serde(default)]
pub struct TireCalibration {
    pub life_laps: CategoryTable,
    pub grip_floor: f64,
    pub penalty_onset_grip: f64,
    pub penalty_at_floor: f64,
    pub cliff_steepness: f64,
    pub side_by_side_wear: f64,
    pub aggression_swing: f64,
    pub management_swing: f64,
    pub wear_multiplier_floor: f64,
}

impl Default for TireCalibration {
    fn default() -> Self {
        TireCalibration {
            life_laps: TIRE_LIFE_LAPS,
            grip_floor: TIRE_GRIP_FLOOR,
            penalty_onset_grip: TIRE_PENALTY_ONSET_GRIP,
            penalty_at_floor: TIRE_PENALTY_AT_FLOOR,
            cliff_steepness: TIRE_CLIFF_STEEPNESS,
            side_by_side_wear: TIRE_SIDE_BY_SIDE_WEAR,
            aggression_swing: TIRE_AGGRESSION_SWING,
            management_swing: TIRE_MANAGEMENT_SWING,
            wear_multiplier_floor: TIRE_WEAR_MULTIPLIER_FLOOR,
        }
    }
}

/// * `base_rate_gal` - (gal/lap) Consumption per lap before driver and draft effects
/// * `weight_coeff` - (s/gal) Lap time loss per gallon carried
/// * `tank_capacity_gal` - (gal) Fuel level 100 % in gallons
/// * `consistency_saving` - (-) Consumption reduction at consistency 100
/// * `frustration_increase` - (-) Consumption increase at frustration 100
/// * `confidence_saving` - (-) Consumption reduction at confidence 100
/// * `draft_saving` - (-) Consumption reduction while drafting
/// * `accel_loss_full_tank` - (-) Straight-line speed loss with a full tank
#[derive(Debug, Deserialize, Clone, PartialEq)]
#[serde(default)]
pub struct FuelCalibration {
    pub base_rate_gal: CategoryTable,
    pub weight_coeff: CategoryTable,
    pub tank_capacity_gal: f64,
    pub consistency_saving: f64,
    pub frustration_increase: f64,
    pub confidence_saving: f64,
    pub draft_saving: f64,
    pub accel_loss_full_tank: f64,
}

impl Default for FuelCalibration {
    fn default() -> Self {
        FuelCalibration {
            base_rate_gal: FUEL_BASE_RATE_GAL,
            weight_coeff: FUEL_WEIGHT_COEFF,
            tank_capacity_gal: FUEL_TANK_CAPACITY_GAL,
            consistency_saving: FUEL_CONSISTENCY_SAVING,
            frustration_increase: FUEL_FRUSTRATION_INCREASE,
            confidence_saving: FUEL_CONFIDENCE_SAVING,
            draft_saving: FUEL_DRAFT_SAVING,
            accel_loss_full_tank: FUEL_ACCEL_LOSS_FULL_TANK,
        }
    }
}

/// * `peak_boost_mph` - (mph) Draft speed boost at the optimal distance
/// * `optimal_lengths` - (car lengths) Distance of the maximum draft effect
/// * `max_lengths` - (car lengths) Distance beyond which no draft exists
/// * `side_by_side_lengths` - (car lengths) Distance below which two cars race side by side
/// * `side_by_side_penalty` - (-) Speed loss of both cars racing side by side
/// * `car_length_ft` - (ft) Length of one car
#[derive(Debug, Deserialize, Clone, PartialEq)]
#[serde(default)]
pub struct AeroCalibration {
    pub peak_boost_mph: f64,
    pub optimal_lengths: f64,
    pub max_lengths: f64,
    pub side_by_side_lengths: f64,
    pub side_by_side_penalty: f64,
    pub car_length_ft: f64,
}

impl Default for AeroCalibration {
    fn default() -> Self {
        AeroCalibration {
            peak_boost_mph: DRAFT_PEAK_BOOST_MPH,
            optimal_lengths: DRAFT_OPTIMAL_LENGTHS,
            max_lengths: DRAFT_MAX_LENGTHS,
            side_by_side_lengths: SIDE_BY_SIDE_LENGTHS,
            side_by_side_penalty: SIDE_BY_SIDE_SPEED_PENALTY,
            car_length_ft: CAR_LENGTH_FT,
        }
    }
}

/// * `grip_coeff_max` - (-) Upper bound of the friction coefficient mu
/// * `grip_coeff_base_fraction` - (-) Share of `grip_coeff_max` available at zero effective grip
/// * `denominator_margin` - (-) mu is kept below this fraction of cot(banking)
#[derive(Debug, Deserialize, Clone, PartialEq)]
#[serde(default)]
pub struct CornerCalibration {
    pub grip_coeff_max: f64,
    pub grip_coeff_base_fraction: f64,
    pub denominator_margin: f64,
}

impl Default for CornerCalibration {
    fn default() -> Self {
        CornerCalibration {
            grip_coeff_max: GRIP_COEFF_MAX,
            grip_coeff_base_fraction: GRIP_COEFF_BASE_FRACTION,
            denominator_margin: GRIP_COEFF_DENOMINATOR_MARGIN,
        }
    }
}

/// * `racecraft_turn_swing` - (-) Turn speed change between racecraft 50 and 100
/// * `racecraft_straight_swing` - (-) Straight speed change between racecraft 50 and 100
/// * `confidence_swing` - (-) Speed change between confidence 50 and 100
/// * `frustration_swing` - (-) Speed loss at frustration 100
/// * `mental_min`, `mental_max` - (-) Bounds of the mental state multiplier
/// * `damage_speed_loss` - (-) Speed loss at 100 % damage
#[derive(Debug, Deserialize, Clone, PartialEq)]
#[serde(default)]
pub struct DriverCalibration {
    pub racecraft_turn_swing: f64,
    pub racecraft_straight_swing: f64,
    pub confidence_swing: f64,
    pub frustration_swing: f64,
    pub mental_min: f64,
    pub mental_max: f64,
    pub damage_speed_loss: f64,
}

impl Default for DriverCalibration {
    fn default() -> Self {
        DriverCalibration {
            racecraft_turn_swing: RACECRAFT_TURN_SWING,
            racecraft_straight_swing: RACECRAFT_STRAIGHT_SWING,
            confidence_swing: MENTAL_CONFIDENCE_SWING,
            frustration_swing: MENTAL_FRUSTRATION_SWING,
            mental_min: MENTAL_MULTIPLIER_MIN,
            mental_max: MENTAL_MULTIPLIER_MAX,
            damage_speed_loss: DAMAGE_SPEED_LOSS,
        }
    }
}

/// Calibration bundles all tuning values of the lap-time models.
#[derive(Debug, Deserialize, Clone, PartialEq, Default)]
#[serde(default)]
pub struct Calibration {
    pub tires: TireCalibration,
    pub fuel: FuelCalibration,
    pub aero: AeroCalibration,
    pub corner: CornerCalibration,
    pub driver: DriverCalibration,
}
