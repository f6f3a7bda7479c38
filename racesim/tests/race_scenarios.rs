use racesim::core::calibration::Calibration;
use racesim::core::driver::{DriverSkills, EntrantPars};
use racesim::core::handle_race::{handle_race, simulate_batch, simulate_ticked};
use racesim::core::race::{Race, RacePars, RaceStatus};
use racesim::pre::read_sim_pars::{read_sim_pars, SimPars};
use std::path::PathBuf;

fn bristol_pars() -> SimPars {
    let path: PathBuf = [env!("CARGO_MANIFEST_DIR"), "..", "input", "parameters", "bristol.json"]
        .iter()
        .collect();
    read_sim_pars(&path).unwrap()
}

fn new_race(sim_pars: &SimPars) -> Race {
    Race::new(
        &sim_pars.race_pars,
        &sim_pars.track_pars,
        &sim_pars.entrant_pars_all,
        Calibration::default(),
    )
    .unwrap()
}

fn entrant(id: &str, racecraft: f64, start_position: u32) -> EntrantPars {
    EntrantPars {
        id: id.to_owned(),
        name: id.to_owned(),
        car_no: start_position,
        start_position: Some(start_position),
        skills: DriverSkills {
            racecraft,
            consistency: 65.0,
            ..DriverSkills::default()
        },
        mental: Default::default(),
        pit_laps: Vec::new(),
        t_pit_standstill: 12.0,
    }
}

#[test]
fn skill_differential_decides_short_race() {
    let sim_pars = bristol_pars();
    let race_pars = RacePars {
        season: 2024,
        tot_no_laps: Some(10),
        draw_seed: 0,
    };

    // weakest driver starts in front
    let entrants = vec![
        entrant("SLOW", 30.0, 1),
        entrant("MID1", 60.0, 2),
        entrant("MID2", 60.0, 3),
        entrant("FAST", 90.0, 4),
    ];

    let mut race = Race::new(&race_pars, &sim_pars.track_pars, &entrants, Calibration::default()).unwrap();
    race.start().unwrap();
    simulate_batch(&mut race, false);

    let result = race.get_race_result().unwrap();
    let pos = |id: &str| result.get_entry(id).unwrap().finish_position;
    assert!(pos("FAST") < pos("SLOW"));
    assert_eq!(result.entries.len(), 4);
    assert!(result.entries.iter().all(|e| e.laps_completed == 10));
}

#[test]
fn full_fixture_race() {
    let sim_pars = bristol_pars();
    let result = handle_race(&sim_pars, &Calibration::default(), 100.0, false, None, None).unwrap();

    assert_eq!(result.tot_no_laps, 150);
    assert_eq!(result.entries.len(), 4);

    // finish positions are a permutation ordered by race time
    for (k, entry) in result.entries.iter().enumerate() {
        assert_eq!(entry.finish_position, k as u32 + 1);
        assert_eq!(entry.laptimes.len(), 150);
        let sum: f64 = entry.laptimes.iter().sum();
        approx::assert_relative_eq!(sum, entry.racetime, max_relative = 1e-12);
    }
    for pair in result.entries.windows(2) {
        assert!(pair[0].racetime <= pair[1].racetime);
    }

    let laps_led: u32 = result.entries.iter().map(|e| e.laps_led).sum();
    assert_eq!(laps_led, 150);

    // the pit lap is clearly the slowest lap of every entrant
    let ham = result.get_entry("HAM").unwrap();
    let slowest = ham.laptimes.iter().cloned().fold(0.0, f64::max);
    assert_eq!(slowest, ham.laptimes[74]);
    assert!(ham.laptimes[74] > ham.fastest_lap + 12.0);
}

#[test]
fn result_invariants_hold_for_every_entrant() {
    let sim_pars = bristol_pars();
    let mut race = new_race(&sim_pars);
    race.start().unwrap();

    // ELL is judged clean on every lap, BRO on every second lap
    while !race.is_complete() {
        let lap = race.get_cur_lap();
        race.record_clean_lap("ELL").unwrap();
        if lap % 2 == 0 {
            race.record_clean_lap("BRO").unwrap();
        }
        race.simulate_lap();
    }

    let result = race.get_race_result().unwrap();

    for entry in result.entries.iter() {
        assert_eq!(
            entry.positions_gained,
            entry.start_position as i32 - entry.finish_position as i32
        );
        assert!(entry.fastest_lap <= entry.average_lap);
        assert_eq!(entry.laps_completed, 150);
        assert!(entry.fastest_lap_no >= 1 && entry.fastest_lap_no <= 150);
        assert_eq!(entry.fastest_lap, entry.laptimes[entry.fastest_lap_no as usize - 1]);
    }

    assert_eq!(result.get_entry("ELL").unwrap().clean_laps, 150);
    assert_eq!(result.get_entry("BRO").unwrap().clean_laps, 75);
    assert_eq!(result.get_entry("HAM").unwrap().clean_laps, 0);
    assert_eq!(result.get_entry("ELL").unwrap().xp.clean_laps, 30);
}

#[test]
fn strategy_pit_lap_is_flagged_in_snapshot() {
    let sim_pars = bristol_pars();
    let mut race = new_race(&sim_pars);
    race.start().unwrap();

    for _ in 0..74 {
        race.simulate_lap();
    }

    // HAM and BRO pit at the end of lap 75
    let snapshot = race.snapshot();
    assert_eq!(snapshot.cur_lap, 75);
    for entrant in snapshot.car_states.iter() {
        let pits = entrant.driver_id == "HAM" || entrant.driver_id == "BRO";
        assert_eq!(entrant.car.in_pit, pits, "{}", entrant.driver_id);
    }

    race.simulate_lap();
    let snapshot = race.snapshot();
    assert!(snapshot.car_states.iter().all(|c| !c.car.in_pit));
    let ham = snapshot.car_states.iter().find(|c| c.driver_id == "HAM").unwrap();
    assert_eq!(ham.car.laps_since_pit, 0);
}

#[test]
fn batch_and_tick_modes_agree() {
    let sim_pars = bristol_pars();

    let mut race_batch = new_race(&sim_pars);
    race_batch.start().unwrap();
    simulate_batch(&mut race_batch, false);

    let mut race_ticked = new_race(&sim_pars);
    race_ticked.start().unwrap();
    simulate_ticked(&mut race_ticked, 250.0, None, None).unwrap();

    let result_batch = race_batch.get_race_result().unwrap();
    let result_ticked = race_ticked.get_race_result().unwrap();

    for (a, b) in result_batch.entries.iter().zip(result_ticked.entries.iter()) {
        assert_eq!(a.driver_id, b.driver_id);
        assert_eq!(a.racetime.to_bits(), b.racetime.to_bits());
        assert_eq!(a.laptimes, b.laptimes);
    }
}

#[test]
fn identical_inputs_give_identical_races() {
    let sim_pars = bristol_pars();
    let cal = Calibration::default();
    let a = handle_race(&sim_pars, &cal, 100.0, false, None, None).unwrap();
    let b = handle_race(&sim_pars, &cal, 100.0, false, None, None).unwrap();
    assert_eq!(a, b);
}

#[test]
fn snapshots_are_streamed_with_final_result() {
    let mut sim_pars = bristol_pars();
    sim_pars.race_pars.tot_no_laps = Some(3);

    let (tx, rx) = flume::unbounded();
    let result = handle_race(&sim_pars, &Calibration::default(), 100.0, false, Some(&tx), None).unwrap();
    drop(tx);

    let states: Vec<_> = rx.iter().collect();
    assert!(states.len() > 3);

    let last = states.last().unwrap();
    assert_eq!(last.status, RaceStatus::Completed);
    assert_eq!(last.final_result.as_ref(), Some(&result));
    assert!(states[..states.len() - 1].iter().all(|s| s.final_result.is_none()));

    // race progress never decreases
    for pair in states.windows(2) {
        for (a, b) in pair[0].car_states.iter().zip(pair[1].car_states.iter()) {
            assert!(b.race_prog >= a.race_prog);
        }
    }
}

#[test]
fn different_seed_changes_only_open_grid_positions() {
    let mut sim_pars = bristol_pars();
    sim_pars.race_pars.tot_no_laps = Some(1);

    let grids: Vec<Vec<u32>> = (0..8)
        .map(|seed| {
            sim_pars.race_pars.draw_seed = seed;
            new_race(&sim_pars).get_cars().iter().map(|c| c.p_grid).collect()
        })
        .collect();

    // HAM has an explicit pole position
    assert!(grids.iter().all(|g| g[0] == 1));
    assert!(grids.iter().any(|g| g != &grids[0]));
}
