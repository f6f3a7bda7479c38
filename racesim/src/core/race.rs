use crate::core::aero::{draft_status, gap_to_car_lengths, is_side_by_side, DraftStatus};
use crate::core::calibration::Calibration;
use crate::core::car::{Car, IncidentOutcome};
use crate::core::driver::{DriverState, EntrantPars};
use crate::core::error::SimError;
use crate::core::fuel::{consumption_per_lap, fuel_gal_to_pct};
use crate::core::lap_time::{calc_lap_time, calc_lap_time_breakdown, LapConditions, LapTimeBreakdown};
use crate::core::tires::wear_rate_per_lap;
use crate::core::track::{Track, TrackPars};
use crate::interfaces::race_state::{EntrantState, RaceState};
use crate::post::race_result::{EntrantResult, RaceResult};
use helpers::general::{argmin, argsort, SortOrder};
use log::{debug, info, warn};
use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use rand::SeedableRng;
use serde::{Deserialize, Serialize};
use std::collections::HashSet;

pub const MAX_ENTRANTS: usize = 40;

/// * `season` - Season
/// * `tot_no_laps` - Race distance in laps, defaults to the distance of the track
/// * `draw_seed` - Seed of the grid draw for entrants without a start position
#[derive(Debug, Deserialize, Clone)]
pub struct RacePars {
    pub season: u32,
    #[serde(default)]
    pub tot_no_laps: Option<u32>,
    #[serde(default)]
    pub draw_seed: u64,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum RaceStatus {
    Initialized,
    Running,
    Paused,
    Completed,
}

/// * `rank` - Position in the field, 1 = leader
/// * `racetime` - (s) Cumulative race time
/// * `last_laptime` - (s) Time of the last completed lap
/// * `gap_to_leader` - (s) Race time difference to the leader
/// * `gap_to_next` - (s) Race time difference to the car one position ahead
/// * `laps_led` - Number of laps completed in the lead
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Position {
    pub driver_id: String,
    pub rank: u32,
    pub racetime: f64,
    pub last_laptime: f64,
    pub gap_to_leader: f64,
    pub gap_to_next: f64,
    pub laps_led: u32,
}

/// Traffic situation of a car during one lap.
#[derive(Debug, Clone, Copy, Default)]
struct Traffic {
    draft: DraftStatus,
    side_by_side: bool,
}

#[derive(Debug)]
pub struct Race {
    status: RaceStatus,
    season: u32,
    tot_no_laps: u32,
    cur_lap: u32,
    track: Track,
    calibration: Calibration,
    cars_list: Vec<Car>,
    order: Vec<usize>,
    standings: Vec<Position>,
    cur_laptimes: Vec<f64>,
    cur_laptimes_valid: bool,
    t_lap_elapsed: f64,
}

impl Race {
    /// Initializes a race: validates track and entrants, assigns the starting grid and puts every
    /// car into fresh condition.
    pub fn new(
        race_pars: &RacePars,
        track_pars: &TrackPars,
        entrant_pars_all: &[EntrantPars],
        calibration: Calibration,
    ) -> Result<Race, SimError> {
        let track = Track::new(track_pars)?;
        let tot_no_laps = race_pars.tot_no_laps.unwrap_or(track.tot_no_laps);

        if tot_no_laps == 0 {
            return Err(SimError::NoLaps);
        }

        check_entrants(entrant_pars_all)?;
        let grid = assign_grid_positions(entrant_pars_all, race_pars.draw_seed)?;

        // create cars
        let cars_list: Vec<Car> = entrant_pars_all
            .iter()
            .zip(grid.iter())
            .map(|(pars, &p_grid)| Car::new(pars, p_grid))
            .collect();

        let order = argsort(&grid, SortOrder::Ascending);
        let no_cars = cars_list.len();

        let mut race = Race {
            status: RaceStatus::Initialized,
            season: race_pars.season,
            tot_no_laps,
            cur_lap: 0,
            track,
            calibration,
            cars_list,
            order,
            standings: Vec::with_capacity(no_cars),
            cur_laptimes: vec![0.0; no_cars],
            cur_laptimes_valid: false,
            t_lap_elapsed: 0.0,
        };
        race.build_standings();

        info!(
            "Race initialized: {} {} with {} cars over {} laps",
            race.track.name, race.season, no_cars, race.tot_no_laps
        );

        Ok(race)
    }

    // ---------------------------------------------------------------------------------------------
    // STATE MACHINE -------------------------------------------------------------------------------
    // ---------------------------------------------------------------------------------------------

    pub fn start(&mut self) -> Result<(), SimError> {
        if self.status != RaceStatus::Initialized {
            return Err(SimError::InvalidTransition {
                action: "start",
                status: self.status,
            });
        }

        self.status = RaceStatus::Running;
        self.cur_lap = 1;
        self.begin_lap();
        info!("Race started");
        Ok(())
    }

    pub fn pause(&mut self) -> Result<(), SimError> {
        if self.status != RaceStatus::Running {
            return Err(SimError::InvalidTransition {
                action: "pause",
                status: self.status,
            });
        }

        self.status = RaceStatus::Paused;
        info!("Race paused in lap {}", self.cur_lap);
        Ok(())
    }

    pub fn resume(&mut self) -> Result<(), SimError> {
        if self.status != RaceStatus::Paused {
            return Err(SimError::InvalidTransition {
                action: "resume",
                status: self.status,
            });
        }

        self.status = RaceStatus::Running;
        info!("Race resumed in lap {}", self.cur_lap);
        Ok(())
    }

    pub fn get_status(&self) -> RaceStatus {
        self.status
    }

    pub fn is_complete(&self) -> bool {
        self.cur_lap > self.tot_no_laps
    }

    // ---------------------------------------------------------------------------------------------
    // MAIN METHODS --------------------------------------------------------------------------------
    // ---------------------------------------------------------------------------------------------

    /// Method simulates one full lap for every car. Returns false without touching the race if it
    /// is not running.
    pub fn simulate_lap(&mut self) -> bool {
        if self.status != RaceStatus::Running {
            warn!("simulate_lap called while race is {:?}, ignoring", self.status);
            return false;
        }

        let traffic = self.calc_traffic();
        let laptimes = self.calc_cur_laptimes(&traffic);
        let category = self.track.category;
        let cal = &self.calibration;

        for (i, car) in self.cars_list.iter_mut().enumerate() {
            let tire_wear = wear_rate_per_lap(
                category,
                car.driver.aggression_multiplier(&cal.tires),
                traffic[i].side_by_side,
                &cal.tires,
            );
            let fuel_used = consumption_per_lap(
                category,
                &car.driver.skills,
                &car.driver.mental,
                &traffic[i].draft,
                &cal.fuel,
            );

            car.laptimes.push(laptimes[i]);
            car.racetime += laptimes[i];
            car.drive_lap(tire_wear, fuel_gal_to_pct(fuel_used, &cal.fuel));

            if car.pit_this_lap(self.cur_lap) {
                debug!("Car {} ({}) pits after lap {}", car.car_no, car.driver_id, self.cur_lap);
                car.perform_pitstop();
            }

            car.sh.complete_lap();
        }

        self.sort_order();
        self.cars_list[self.order[0]].laps_led += 1;
        self.build_standings();

        debug!(
            "Lap {} completed, leader {} at {:.3}s",
            self.cur_lap, self.standings[0].driver_id, self.standings[0].racetime
        );

        self.cur_lap += 1;
        self.cur_laptimes_valid = false;
        self.t_lap_elapsed = 0.0;

        if self.is_complete() {
            self.status = RaceStatus::Completed;
            info!("Race completed, winner {}", self.standings[0].driver_id);
        } else {
            self.begin_lap();
        }

        true
    }

    /// Method advances the race by the given real time (ms). The lap progress of every car moves
    /// at its projected lap time. Once the fastest car completes its lap, the lap is committed via
    /// `simulate_lap`, so the lap times are the same as in the lap-based mode. Returns false
    /// without touching the race if it is not running.
    pub fn simulate_tick(&mut self, ms: f64) -> bool {
        if self.status != RaceStatus::Running {
            warn!("simulate_tick called while race is {:?}, ignoring", self.status);
            return false;
        }

        if !(ms > 0.0 && ms.is_finite()) {
            warn!("simulate_tick called with invalid tick size {}ms, ignoring", ms);
            return false;
        }

        let mut timestep_size = ms / 1000.0;

        while timestep_size > 0.0 && self.status == RaceStatus::Running {
            if !self.cur_laptimes_valid {
                let traffic = self.calc_traffic();
                self.cur_laptimes = self.calc_cur_laptimes(&traffic);
                self.cur_laptimes_valid = true;
            }

            let t_lap = self.cur_laptimes[argmin(&self.cur_laptimes)];
            let t_remaining = (t_lap - self.t_lap_elapsed).max(0.0);
            let t_step = timestep_size.min(t_remaining);

            for (i, car) in self.cars_list.iter_mut().enumerate() {
                car.sh.update_race_prog(self.cur_laptimes[i], t_step);
            }

            if timestep_size < t_remaining {
                self.t_lap_elapsed += timestep_size;
                timestep_size = 0.0;
            } else {
                timestep_size -= t_remaining;
                self.simulate_lap();
            }
        }

        true
    }

    // ---------------------------------------------------------------------------------------------
    // RACE SIMULATOR PARTS ------------------------------------------------------------------------
    // ---------------------------------------------------------------------------------------------

    fn begin_lap(&mut self) {
        let cur_lap = self.cur_lap;
        self.cars_list.iter_mut().for_each(|car| car.begin_lap(cur_lap));
    }

    /// Determines draft and side-by-side racing from the gaps at the end of the previous lap. On
    /// the first lap the field is still in grid formation and nobody drafts.
    fn calc_traffic(&self) -> Vec<Traffic> {
        let mut traffic = vec![Traffic::default(); self.cars_list.len()];

        if self.cur_lap <= 1 {
            return traffic;
        }

        let cal = &self.calibration;

        for pair in self.order.windows(2) {
            let (idx_front, idx_rear) = (pair[0], pair[1]);
            let car_front = &self.cars_list[idx_front];
            let laptime_front = car_front.last_laptime();

            if laptime_front <= 0.0 {
                continue;
            }

            let gap = self.cars_list[idx_rear].racetime - car_front.racetime;
            let distance = gap_to_car_lengths(gap, self.track.length_ft / laptime_front, &cal.aero);

            traffic[idx_rear].draft = draft_status(distance, cal.fuel.draft_saving, &cal.aero);

            if is_side_by_side(distance, &cal.aero) {
                traffic[idx_rear].side_by_side = true;
                traffic[idx_front].side_by_side = true;
            }
        }

        traffic
    }

    /// Calculates the lap time of every car for the current lap including pit stop losses.
    fn calc_cur_laptimes(&self, traffic: &[Traffic]) -> Vec<f64> {
        self.cars_list
            .iter()
            .zip(traffic.iter())
            .map(|(car, traffic)| {
                let cond = LapConditions {
                    driver: &car.driver,
                    car: &car.state,
                    draft: traffic.draft,
                    side_by_side: traffic.side_by_side,
                };
                let mut laptime = calc_lap_time(&self.track, &cond, &self.calibration);

                if car.pit_this_lap(self.cur_lap) {
                    laptime += self.track.get_pit_drive_timeloss(laptime) + car.t_add_pit_standstill();
                }

                laptime
            })
            .collect()
    }

    /// Stable sort of the running order by race time, ties keep their previous order.
    fn sort_order(&mut self) {
        let racetimes: Vec<f64> = self.order.iter().map(|&i| self.cars_list[i].racetime).collect();
        let idxs_sorted = argsort(&racetimes, SortOrder::Ascending);
        self.order = idxs_sorted.iter().map(|&k| self.order[k]).collect();
    }

    fn build_standings(&mut self) {
        let cars_list = &self.cars_list;
        let leader_racetime = cars_list[self.order[0]].racetime;

        self.standings = self
            .order
            .iter()
            .enumerate()
            .map(|(k, &i)| {
                let car = &cars_list[i];
                let ahead_racetime = if k == 0 {
                    car.racetime
                } else {
                    cars_list[self.order[k - 1]].racetime
                };

                Position {
                    driver_id: car.driver_id.to_owned(),
                    rank: k as u32 + 1,
                    racetime: car.racetime,
                    last_laptime: car.last_laptime(),
                    gap_to_leader: car.racetime - leader_racetime,
                    gap_to_next: car.racetime - ahead_racetime,
                    laps_led: car.laps_led,
                }
            })
            .collect();
    }

    // ---------------------------------------------------------------------------------------------
    // EXTERNAL MUTATION POINTS --------------------------------------------------------------------
    // ---------------------------------------------------------------------------------------------

    /// Replaces the driver snapshot, e.g. after the mental state changed between two laps.
    pub fn set_driver_state(&mut self, driver_id: &str, driver: DriverState) -> Result<(), SimError> {
        let idx = self.get_mutable_car_idx(driver_id, "set driver state")?;
        self.cars_list[idx].driver = driver;
        Ok(())
    }

    /// Applies the outcome of an incident or decision. Time penalties re-sort the standings.
    pub fn apply_incident(&mut self, driver_id: &str, outcome: &IncidentOutcome) -> Result<(), SimError> {
        let idx = self.get_mutable_car_idx(driver_id, "apply incident")?;
        self.cars_list[idx].apply_incident(outcome);
        self.sort_order();
        self.build_standings();
        Ok(())
    }

    /// Requests a pit stop at the end of the current lap.
    pub fn request_pit(&mut self, driver_id: &str) -> Result<(), SimError> {
        let idx = self.get_mutable_car_idx(driver_id, "request pit stop")?;
        self.cars_list[idx].request_pit();
        Ok(())
    }

    /// Counts a lap that the incident handling judged as clean.
    pub fn record_clean_lap(&mut self, driver_id: &str) -> Result<(), SimError> {
        let idx = self.get_mutable_car_idx(driver_id, "record clean lap")?;
        self.cars_list[idx].clean_laps += 1;
        Ok(())
    }

    fn get_car_idx(&self, driver_id: &str) -> Result<usize, SimError> {
        self.cars_list
            .iter()
            .position(|car| car.driver_id == driver_id)
            .ok_or_else(|| SimError::UnknownDriver(driver_id.to_owned()))
    }

    fn get_mutable_car_idx(&mut self, driver_id: &str, action: &'static str) -> Result<usize, SimError> {
        if self.status == RaceStatus::Completed {
            return Err(SimError::InvalidTransition {
                action,
                status: self.status,
            });
        }

        let idx = self.get_car_idx(driver_id)?;
        self.cur_laptimes_valid = false;
        Ok(idx)
    }

    // ---------------------------------------------------------------------------------------------
    // OUTPUTS -------------------------------------------------------------------------------------
    // ---------------------------------------------------------------------------------------------

    pub fn get_standings(&self) -> &[Position] {
        &self.standings
    }

    pub fn get_cur_lap(&self) -> u32 {
        self.cur_lap
    }

    pub fn get_tot_no_laps(&self) -> u32 {
        self.tot_no_laps
    }

    pub fn get_season(&self) -> u32 {
        self.season
    }

    pub fn get_track(&self) -> &Track {
        &self.track
    }

    pub fn get_calibration(&self) -> &Calibration {
        &self.calibration
    }

    /// Returns the cars in entrant order.
    pub fn get_cars(&self) -> &[Car] {
        &self.cars_list
    }

    /// Returns the lap time breakdown the given car would drive in the current lap in clean air.
    pub fn get_lap_time_breakdown(&self, driver_id: &str) -> Result<LapTimeBreakdown, SimError> {
        let car = &self.cars_list[self.get_car_idx(driver_id)?];
        Ok(calc_lap_time_breakdown(
            &self.track,
            &LapConditions::clean_air(&car.driver, &car.state),
            &self.calibration,
        ))
    }

    pub fn snapshot(&self) -> RaceState {
        RaceState {
            status: self.status,
            cur_lap: self.cur_lap,
            tot_no_laps: self.tot_no_laps,
            track_name: self.track.name.to_owned(),
            standings: self.standings.to_owned(),
            car_states: self
                .cars_list
                .iter()
                .map(|car| EntrantState {
                    driver_id: car.driver_id.to_owned(),
                    car_no: car.car_no,
                    car: car.state,
                    race_prog: car.sh.get_race_prog(),
                })
                .collect(),
            final_result: None,
        }
    }

    /// Returns the final results. Only available once the race is completed.
    pub fn get_race_result(&self) -> Result<RaceResult, SimError> {
        if self.status != RaceStatus::Completed {
            return Err(SimError::RaceNotCompleted {
                status: self.status,
            });
        }

        let no_cars = self.cars_list.len();

        Ok(RaceResult {
            track_name: self.track.name.to_owned(),
            season: self.season,
            tot_no_laps: self.tot_no_laps,
            entries: self
                .order
                .iter()
                .enumerate()
                .map(|(k, &i)| EntrantResult::new(&self.cars_list[i], k as u32 + 1, no_cars))
                .collect(),
        })
    }
}

// -------------------------------------------------------------------------------------------------
// INITIALIZATION HELPERS --------------------------------------------------------------------------
// -------------------------------------------------------------------------------------------------

fn check_entrants(entrant_pars_all: &[EntrantPars]) -> Result<(), SimError> {
    if entrant_pars_all.is_empty() || entrant_pars_all.len() > MAX_ENTRANTS {
        return Err(SimError::EntrantCount {
            count: entrant_pars_all.len(),
            max: MAX_ENTRANTS,
        });
    }

    let mut ids = HashSet::with_capacity(entrant_pars_all.len());

    for pars in entrant_pars_all.iter() {
        if !ids.insert(pars.id.as_str()) {
            return Err(SimError::DuplicateDriver(pars.id.to_owned()));
        }

        let mental = [
            ("confidence", pars.mental.confidence),
            ("frustration", pars.mental.frustration),
            ("mental focus", pars.mental.focus),
            ("distraction", pars.mental.distraction),
        ];

        for &(field, value) in pars.skills.named().iter().chain(mental.iter()) {
            if !(0.0..=100.0).contains(&value) {
                return Err(SimError::SkillRange {
                    driver: pars.id.to_owned(),
                    field,
                    value,
                });
            }
        }
    }

    Ok(())
}

/// Returns the grid position of every entrant. Explicit start positions are kept, the remaining
/// positions are drawn deterministically from the seed.
fn assign_grid_positions(entrant_pars_all: &[EntrantPars], draw_seed: u64) -> Result<Vec<u32>, SimError> {
    let no_cars = entrant_pars_all.len();
    let mut taken = vec![false; no_cars + 1];

    for pars in entrant_pars_all.iter() {
        if let Some(position) = pars.start_position {
            if position == 0 || position as usize > no_cars || taken[position as usize] {
                return Err(SimError::StartPosition {
                    driver: pars.id.to_owned(),
                    position,
                    count: no_cars,
                });
            }
            taken[position as usize] = true;
        }
    }

    let mut free: Vec<u32> = (1..=no_cars as u32).filter(|&p| !taken[p as usize]).collect();
    let mut rng = StdRng::seed_from_u64(draw_seed);
    free.shuffle(&mut rng);
    let mut free = free.into_iter();

    Ok(entrant_pars_all
        .iter()
        .map(|pars| match pars.start_position {
            Some(position) => position,
            None => free.next().unwrap_or(0),
        })
        .collect())
}
