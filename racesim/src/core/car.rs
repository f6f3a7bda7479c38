use crate::core::driver::{DriverState, EntrantPars};
use crate::core::state_handler::StateHandler;
use log::warn;
use serde::Serialize;

/// * `tire_wear` - (%) Remaining tire, 100 = fresh set
/// * `fuel` - (%) Fuel level, 100 = full tank
/// * `damage` - (%) Car damage, 0 = undamaged
/// * `in_pit` - True if the car pits at the end of the current lap
/// * `laps_since_pit` - Laps driven since the last pit stop
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct CarState {
    pub tire_wear: f64,
    pub fuel: f64,
    pub damage: f64,
    pub in_pit: bool,
    pub laps_since_pit: u32,
}

impl Default for CarState {
    fn default() -> Self {
        CarState {
            tire_wear: 100.0,
            fuel: 100.0,
            damage: 0.0,
            in_pit: false,
            laps_since_pit: 0,
        }
    }
}

/// IncidentOutcome is applied to a car between two laps by the decision/incident handling.
/// Positive deltas add to the respective percentage, `t_penalty` (s) adds to the race time.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct IncidentOutcome {
    pub tire_wear_delta: f64,
    pub fuel_delta: f64,
    pub damage_delta: f64,
    pub t_penalty: f64,
}

/// Car is one entrant of the race: the driver snapshot, the car condition and the lap history.
#[derive(Debug, Clone)]
pub struct Car {
    pub driver_id: String,
    pub name: String,
    pub car_no: u32,
    pub p_grid: u32,
    pub driver: DriverState,
    pub state: CarState,
    pub laptimes: Vec<f64>,
    pub racetime: f64,
    pub laps_led: u32,
    pub clean_laps: u32,
    pub sh: StateHandler,
    pit_laps: Vec<u32>,
    pit_requested: bool,
    t_pit_standstill: f64,
    fuel_warned: bool,
}

impl Car {
    pub fn new(pars: &EntrantPars, p_grid: u32) -> Car {
        Car {
            driver_id: pars.id.to_owned(),
            name: pars.name.to_owned(),
            car_no: pars.car_no,
            p_grid,
            driver: DriverState::new(pars.skills, pars.mental),
            state: CarState::default(),
            laptimes: Vec::new(),
            racetime: 0.0,
            laps_led: 0,
            clean_laps: 0,
            sh: StateHandler::default(),
            pit_laps: pars.pit_laps.to_owned(),
            pit_requested: false,
            t_pit_standstill: pars.t_pit_standstill.max(0.0),
            fuel_warned: false,
        }
    }

    /// Method checks if the car pits at the end of the given lap, either by strategy or on request.
    pub fn pit_this_lap(&self, cur_lap: u32) -> bool {
        self.pit_requested || self.pit_laps.iter().any(|&inlap| inlap == cur_lap)
    }

    /// Method marks the car as pitting if the given lap is a pit lap. Called when a lap begins.
    pub fn begin_lap(&mut self, cur_lap: u32) {
        self.state.in_pit = self.pit_this_lap(cur_lap);
    }

    /// Method requests a pit stop at the end of the current lap.
    pub fn request_pit(&mut self) {
        self.pit_requested = true;
        self.state.in_pit = true;
    }

    /// Method returns the standstill time of a pit stop.
    pub fn t_add_pit_standstill(&self) -> f64 {
        self.t_pit_standstill
    }

    /// Method applies the wear and the fuel consumption of one lap.
    pub fn drive_lap(&mut self, tire_wear: f64, fuel_used_pct: f64) {
        self.state.tire_wear = (self.state.tire_wear - tire_wear).max(0.0);
        self.state.fuel -= fuel_used_pct;

        if self.state.fuel <= 0.0 {
            if !self.fuel_warned {
                warn!("Car {} ({}) ran out of fuel!", self.car_no, self.driver_id);
                self.fuel_warned = true;
            }
            self.state.fuel = 0.0;
        }

        self.state.laps_since_pit += 1;
    }

    /// Method performs a pit stop: fresh tires, full tank, repaired car.
    pub fn perform_pitstop(&mut self) {
        self.state = CarState::default();
        self.pit_requested = false;
        self.fuel_warned = false;
    }

    /// Method applies the outcome of an incident or decision to the car.
    pub fn apply_incident(&mut self, outcome: &IncidentOutcome) {
        self.state.tire_wear = clamp_pct(self.state.tire_wear + outcome.tire_wear_delta);
        self.state.fuel = clamp_pct(self.state.fuel + outcome.fuel_delta);
        self.state.damage = clamp_pct(self.state.damage + outcome.damage_delta);

        if outcome.t_penalty.is_finite() {
            self.racetime = (self.racetime + outcome.t_penalty).max(0.0);
        }
    }

    pub fn last_laptime(&self) -> f64 {
        self.laptimes.last().copied().unwrap_or(0.0)
    }

    pub fn compl_laps(&self) -> u32 {
        self.sh.get_compl_lap()
    }
}

fn clamp_pct(value: f64) -> f64 {
    if value.is_finite() {
        value.max(0.0).min(100.0)
    } else {
        0.0
    }
}
