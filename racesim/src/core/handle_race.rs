use crate::core::calibration::Calibration;
use crate::core::race::Race;
use crate::interfaces::race_state::{RaceState, MAX_SNAPSHOT_FREQUENCY};
use crate::post::race_result::RaceResult;
use crate::pre::read_sim_pars::SimPars;
use anyhow::Context;
use flume::Sender;
use log::{debug, info, warn};
use std::thread::sleep;
use std::time::{Duration, Instant};

/// simulate_batch runs a started race lap by lap until it is completed.
pub fn simulate_batch(race: &mut Race, print_debug: bool) {
    while race.simulate_lap() {
        if print_debug {
            if let Some(leader) = race.get_standings().first() {
                debug!(
                    "Simulating... lap {} of {} completed, leader {} at {:.3}s",
                    race.get_cur_lap() - 1,
                    race.get_tot_no_laps(),
                    leader.driver_id,
                    leader.racetime
                );
            }
        }
    }
}

/// simulate_ticked runs a started race in ticks of `tick_ms` race time. If a sender is inserted,
/// snapshots are sent at most with `MAX_SNAPSHOT_FREQUENCY` per second of race time and once more
/// with the final result after the race. If a real-time factor is inserted, the loop sleeps until
/// every tick is finished in real time as well.
pub fn simulate_ticked(
    race: &mut Race,
    tick_ms: f64,
    tx: Option<&Sender<RaceState>>,
    realtime_factor: Option<f64>,
) -> anyhow::Result<()> {
    if !(tick_ms > 0.0 && tick_ms.is_finite()) {
        anyhow::bail!("Tick size must be positive, got {}ms!", tick_ms);
    }

    let mut t_race = 0.0;
    let mut t_race_update_snapshot = f64::NEG_INFINITY;
    let mut warned_realtime = false;

    while !race.is_complete() {
        let t_start = Instant::now();

        if !race.simulate_tick(tick_ms) {
            anyhow::bail!("Race stopped at {:?} before completion!", race.get_status());
        }
        t_race += tick_ms / 1000.0;

        if let Some(tx) = tx {
            if t_race > t_race_update_snapshot + 1.0 / MAX_SNAPSHOT_FREQUENCY - 0.001 {
                tx.send(race.snapshot())
                    .context("Failed to send race state to the receiver!")?;
                t_race_update_snapshot = t_race;
            }
        }

        // sleep until tick is finished in real-time as well (calculation in ms)
        if let Some(realtime_factor) = realtime_factor {
            let t_sleep = (tick_ms / realtime_factor) as i64 - t_start.elapsed().as_millis() as i64;

            if t_sleep > 0 {
                sleep(Duration::from_millis(t_sleep as u64));
            } else if !warned_realtime {
                warn!("Could not keep up with real-time!");
                warned_realtime = true;
            }
        }
    }

    // after the loop finishes, send the final result once
    if let Some(tx) = tx {
        let mut final_msg = race.snapshot();
        final_msg.final_result = Some(race.get_race_result()?);
        tx.send(final_msg)
            .context("Failed to send final race result to the receiver!")?;
    }

    Ok(())
}

/// handle_race creates and simulates a race on the basis of the inserted parameters, and returns
/// the results for post-processing. Without a sender the race is simulated lap by lap, otherwise
/// tick by tick with snapshots.
pub fn handle_race(
    sim_pars: &SimPars,
    calibration: &Calibration,
    tick_ms: f64,
    print_debug: bool,
    tx: Option<&Sender<RaceState>>,
    realtime_factor: Option<f64>,
) -> anyhow::Result<RaceResult> {
    let mut race = Race::new(
        &sim_pars.race_pars,
        &sim_pars.track_pars,
        &sim_pars.entrant_pars_all,
        calibration.to_owned(),
    )
    .context("Failed to initialize race!")?;

    race.start()?;

    if tx.is_none() && realtime_factor.is_none() {
        simulate_batch(&mut race, print_debug);
    } else {
        simulate_ticked(&mut race, tick_ms, tx, realtime_factor)?;
    }

    if print_debug {
        let laptime = race
            .get_standings()
            .first()
            .map(|leader| leader.last_laptime)
            .unwrap_or(0.0);
        debug!(
            "Estimated time loss for driving through the pit lane (w/o standstill): {:.2}s",
            race.get_track().get_pit_drive_timeloss(laptime)
        );
    }

    let result = race.get_race_result()?;

    if let Some(winner) = result.winner() {
        info!("Winner: {} (car {})", winner.name, winner.car_no);
    }

    Ok(result)
}
