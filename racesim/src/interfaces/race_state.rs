use crate::core::car::CarState;
use crate::core::race::{Position, RaceStatus};
use crate::post::race_result::RaceResult;
use serde::Serialize;

/// (1/s) Maximum number of snapshots per second of simulated race time in the real-time driver.
pub const MAX_SNAPSHOT_FREQUENCY: f64 = 20.0;

/// * `race_prog` - (laps) Completed laps plus the fraction of the current lap
#[derive(Debug, Clone, Serialize)]
pub struct EntrantState {
    pub driver_id: String,
    pub car_no: u32,
    pub car: CarState,
    pub race_prog: f64,
}

/// RaceState is the read-only snapshot of a race handed to renderers after every lap or tick.
#[derive(Debug, Clone, Serialize)]
pub struct RaceState {
    pub status: RaceStatus,
    pub cur_lap: u32,
    pub tot_no_laps: u32,
    pub track_name: String,
    pub standings: Vec<Position>,
    pub car_states: Vec<EntrantState>,

    // final results payload (sent once when race finishes)
    pub final_result: Option<RaceResult>,
}

impl RaceState {
    pub fn leader(&self) -> Option<&Position> {
        self.standings.first()
    }
}
