use clap::Parser;
use log::{info, warn, LevelFilter};
use racesim::core::calibration::Calibration;
use racesim::core::handle_race::handle_race;
use racesim::post::race_result::RaceResult;
use racesim::pre::read_sim_pars::{read_calibration, read_sim_pars, SimPars};
use racesim::pre::sim_opts::SimOpts;
use rayon::prelude::*;
use std::thread;
use std::time::Instant;

fn main() -> anyhow::Result<()> {
    // PRE-PROCESSING ------------------------------------------------------------------------------
    // get simulation options from the command line arguments
    let sim_opts: SimOpts = SimOpts::parse();

    env_logger::Builder::from_default_env()
        .filter_level(if sim_opts.debug {
            LevelFilter::Debug
        } else {
            LevelFilter::Info
        })
        .init();

    // get simulation parameters
    info!("Reading simulation parameters from {:?}", sim_opts.parfile_path);
    let sim_pars = read_sim_pars(&sim_opts.parfile_path)?;

    let calibration = match &sim_opts.calibration_path {
        Some(path) => {
            info!("Reading calibration from {:?}", path);
            read_calibration(path)?
        }
        None => Calibration::default(),
    };

    // print race details
    info!(
        "Simulating {} {} with {} entrants",
        sim_pars.track_pars.name,
        sim_pars.race_pars.season,
        sim_pars.entrant_pars_all.len()
    );

    // EXECUTION -----------------------------------------------------------------------------------
    let race_result = if !sim_opts.realtime {
        run_batch(&sim_opts, &sim_pars, &calibration)?
    } else {
        run_realtime(&sim_opts, &sim_pars, &calibration)?
    };

    // POST-PROCESSING -----------------------------------------------------------------------------
    race_result.print_results();

    if sim_opts.debug {
        race_result.print_lap_and_race_times();
    }

    match race_result.write_results_to_csv(sim_opts.output_path.as_deref()) {
        Ok(path) => info!("Results written to {}", path),
        Err(e) => warn!("Could not write results: {}", e),
    }

    Ok(())
}

/// run_batch simulates the requested number of races in parallel. Every run draws the open grid
/// positions with its own seed. The result of the first run is returned.
fn run_batch(
    sim_opts: &SimOpts,
    sim_pars: &SimPars,
    calibration: &Calibration,
) -> anyhow::Result<RaceResult> {
    let t_start = Instant::now();
    let no_sim_runs = sim_opts.no_sim_runs.max(1);

    let results = (0..no_sim_runs)
        .into_par_iter()
        .map(|run| {
            let mut sim_pars_run = sim_pars.to_owned();
            sim_pars_run.race_pars.draw_seed = sim_pars.race_pars.draw_seed.wrapping_add(run as u64);
            handle_race(
                &sim_pars_run,
                calibration,
                sim_opts.tick_ms,
                sim_opts.debug && no_sim_runs == 1,
                None,
                None,
            )
        })
        .collect::<anyhow::Result<Vec<RaceResult>>>()?;

    info!(
        "Execution time for {} run(s): {}ms",
        no_sim_runs,
        t_start.elapsed().as_millis()
    );

    if no_sim_runs > 1 {
        for result in results.iter() {
            if let Some(winner) = result.winner() {
                info!("Run winner: {} in {:.3}s", winner.name, winner.racetime);
            }
        }
    }

    results
        .into_iter()
        .next()
        .ok_or_else(|| anyhow::anyhow!("No simulation run was executed!"))
}

/// run_realtime simulates the race in a separate thread and logs the leader of every snapshot.
fn run_realtime(
    sim_opts: &SimOpts,
    sim_pars: &SimPars,
    calibration: &Calibration,
) -> anyhow::Result<RaceResult> {
    info!("Starting real-time simulation...");

    // create channel between simulator and receiver
    let (tx, rx) = flume::unbounded();

    let sim_pars_thread = sim_pars.to_owned();
    let calibration_thread = calibration.to_owned();
    let tick_ms = sim_opts.tick_ms;
    let realtime_factor = sim_opts.realtime_factor;

    let handle = thread::spawn(move || {
        handle_race(
            &sim_pars_thread,
            &calibration_thread,
            tick_ms,
            false,
            Some(&tx),
            Some(realtime_factor),
        )
    });

    let mut last_logged_lap = 0;

    // the receiver loop ends when the simulator drops the sender
    for race_state in rx.iter() {
        if race_state.final_result.is_some() {
            break;
        }

        if race_state.cur_lap > last_logged_lap {
            if let Some(leader) = race_state.leader() {
                info!(
                    "Lap {} of {}: leader {} ({:.3}s)",
                    race_state.cur_lap, race_state.tot_no_laps, leader.driver_id, leader.racetime
                );
            }
            last_logged_lap = race_state.cur_lap;
        }
    }

    handle
        .join()
        .map_err(|_| anyhow::anyhow!("Simulation thread panicked!"))?
}
