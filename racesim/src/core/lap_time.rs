//! Lap time integration.
//!
//! A lap is the ordered sum of the track sections. Turns are limited by the banked-corner model,
//! straights by the reference top speed. Both are scaled by the driver, the car condition and the
//! traffic situation. The integration is deterministic, identical inputs always give bit-identical
//! lap times.

use crate::core::aero::{side_by_side_factor, DraftStatus};
use crate::core::calibration::{Calibration, FT_S_TO_MPH};
use crate::core::car::CarState;
use crate::core::corner::max_corner_speed;
use crate::core::driver::{fraction, DriverState};
use crate::core::fuel::{accel_factor, fuel_pct_to_gal, weight_penalty};
use crate::core::tires::{grip_from_wear, lap_time_penalty};
use crate::core::track::{Section, SectionKind, Track};
use helpers::general::max;

/// LapConditions bundles everything that varies per entrant and lap.
#[derive(Debug, Clone, Copy)]
pub struct LapConditions<'a> {
    pub driver: &'a DriverState,
    pub car: &'a CarState,
    pub draft: DraftStatus,
    pub side_by_side: bool,
}

impl<'a> LapConditions<'a> {
    /// Conditions in clean air, i.e. without draft and without a car alongside.
    pub fn clean_air(driver: &'a DriverState, car: &'a CarState) -> LapConditions<'a> {
        LapConditions {
            driver,
            car,
            draft: DraftStatus::default(),
            side_by_side: false,
        }
    }
}

/// * `kind` - Straight or turn
/// * `length` - (ft) Section length
/// * `ref_speed` - (mph) Reference speed of the section
/// * `speed` - (mph) Achieved section speed
/// * `time` - (s) Section time
#[derive(Debug, Clone, PartialEq)]
pub struct SectionTiming {
    pub kind: SectionKind,
    pub length: f64,
    pub ref_speed: f64,
    pub speed: f64,
    pub time: f64,
}

/// * `laptime` - (s) Total lap time
/// * `sections` - Timing of every section in track order
/// * `t_sections` - (s) Sum of the section times
/// * `t_fuel_weight` - (s) Lap time loss due to the carried fuel
/// * `t_tire_degr` - (s) Lap time loss due to tire degradation
/// * `grip` - (-) Tire grip during the lap
/// * `fuel_gal` - (gal) Fuel carried during the lap
/// * `avg_speed` - (mph) Average lap speed
/// * `top_speed` - (mph) Highest section speed
#[derive(Debug, Clone, PartialEq)]
pub struct LapTimeBreakdown {
    pub laptime: f64,
    pub sections: Vec<SectionTiming>,
    pub t_sections: f64,
    pub t_fuel_weight: f64,
    pub t_tire_degr: f64,
    pub grip: f64,
    pub fuel_gal: f64,
    pub avg_speed: f64,
    pub top_speed: f64,
}

/// calc_lap_time returns the lap time (s) of one entrant on the given track.
pub fn calc_lap_time(track: &Track, cond: &LapConditions, cal: &Calibration) -> f64 {
    calc_lap_time_breakdown(track, cond, cal).laptime
}

/// calc_lap_time_breakdown integrates the section times of one lap and returns them together with
/// the fuel and tire contributions.
pub fn calc_lap_time_breakdown(
    track: &Track,
    cond: &LapConditions,
    cal: &Calibration,
) -> LapTimeBreakdown {
    let grip = grip_from_wear(cond.car.tire_wear, track.category, &cal.tires);
    let fuel_gal = fuel_pct_to_gal(cond.car.fuel, &cal.fuel);

    // multipliers that apply to every section
    let mental = cond.driver.mental_multiplier(&cal.driver);
    let damage = 1.0 - cal.driver.damage_speed_loss * fraction(cond.car.damage);
    let traffic = side_by_side_factor(cond.side_by_side, &cal.aero);
    let common = mental * damage * traffic;

    let turn_skill = cond.driver.turn_skill_multiplier(&cal.driver);
    let straight_skill = cond.driver.straight_skill_multiplier(&cal.driver);
    let accel = accel_factor(fuel_gal, &cal.fuel);

    let mut sections = Vec::with_capacity(track.sections.len());
    let mut t_sections = 0.0;

    for section in track.sections.iter() {
        let speed = match *section {
            Section::Turn {
                banking,
                radius,
                surface_grip,
                ..
            } => max_corner_speed(banking, radius, grip * surface_grip, &cal.corner) * turn_skill * common,
            Section::Straight { ref_speed, .. } => {
                (ref_speed + cond.draft.speed_boost) * accel * straight_skill * common
            }
        };

        let time = section.length() / (speed / FT_S_TO_MPH);
        t_sections += time;

        sections.push(SectionTiming {
            kind: section.kind(),
            length: section.length(),
            ref_speed: section.ref_speed(),
            speed,
            time,
        });
    }

    let t_fuel_weight = weight_penalty(fuel_gal, track.category, &cal.fuel);
    let t_tire_degr = lap_time_penalty(t_sections, grip, &cal.tires);
    let laptime = t_sections + t_fuel_weight + t_tire_degr;

    let speeds: Vec<f64> = sections.iter().map(|s| s.speed).collect();

    LapTimeBreakdown {
        laptime,
        t_sections,
        t_fuel_weight,
        t_tire_degr,
        grip,
        fuel_gal,
        avg_speed: track.length / laptime * 3600.0,
        top_speed: max(&speeds),
        sections,
    }
}
