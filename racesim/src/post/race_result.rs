use crate::core::car::Car;
use helpers::general::{argmin, mean};
use serde::Serialize;
use std::fmt::Write;
use std::path::Path;

/// XpAward is the experience a driver collects from one race.
#[derive(Debug, Serialize, Clone, Copy, PartialEq, Default)]
pub struct XpAward {
    pub finish: u32,
    pub positions_gained: u32,
    pub laps_led: u32,
    pub clean_laps: u32,
    pub win_bonus: u32,
    pub total: u32,
}

impl XpAward {
    /// calc determines the award: 10 per position beaten plus 10, 5 per position gained, 1 per lap
    /// led, 1 per 5 clean laps and a bonus of 50 for the winner.
    pub fn calc(
        finish_position: u32,
        no_cars: usize,
        positions_gained: i32,
        laps_led: u32,
        clean_laps: u32,
    ) -> XpAward {
        let finish = (no_cars as u32 + 1).saturating_sub(finish_position) * 10;
        let positions_gained = positions_gained.max(0) as u32 * 5;
        let clean_laps = clean_laps / 5;
        let win_bonus = if finish_position == 1 { 50 } else { 0 };

        XpAward {
            finish,
            positions_gained,
            laps_led,
            clean_laps,
            win_bonus,
            total: finish + positions_gained + laps_led + clean_laps + win_bonus,
        }
    }
}

/// * `fastest_lap` - (s) Fastest lap of the entrant
/// * `average_lap` - (s) Average lap time of the entrant
/// * `racetime` - (s) Final race time including penalties
#[derive(Debug, Serialize, Clone, PartialEq)]
pub struct EntrantResult {
    pub driver_id: String,
    pub name: String,
    pub car_no: u32,
    pub finish_position: u32,
    pub start_position: u32,
    pub positions_gained: i32,
    pub laps_led: u32,
    pub laps_completed: u32,
    pub fastest_lap: f64,
    pub fastest_lap_no: u32,
    pub average_lap: f64,
    pub clean_laps: u32,
    pub xp: XpAward,
    pub racetime: f64,
    pub laptimes: Vec<f64>,
}

impl EntrantResult {
    pub fn new(car: &Car, finish_position: u32, no_cars: usize) -> EntrantResult {
        let positions_gained = car.p_grid as i32 - finish_position as i32;

        let (fastest_lap, fastest_lap_no, average_lap) = if car.laptimes.is_empty() {
            (0.0, 0, 0.0)
        } else {
            let idx = argmin(&car.laptimes);
            (car.laptimes[idx], idx as u32 + 1, mean(&car.laptimes))
        };

        EntrantResult {
            driver_id: car.driver_id.to_owned(),
            name: car.name.to_owned(),
            car_no: car.car_no,
            finish_position,
            start_position: car.p_grid,
            positions_gained,
            laps_led: car.laps_led,
            laps_completed: car.compl_laps(),
            fastest_lap,
            fastest_lap_no,
            average_lap,
            clean_laps: car.clean_laps,
            xp: XpAward::calc(
                finish_position,
                no_cars,
                positions_gained,
                car.laps_led,
                car.clean_laps,
            ),
            racetime: car.racetime,
            laptimes: car.laptimes.to_owned(),
        }
    }
}

/// RaceResult contains all race information that is required for post-processing the results.
/// The entries are ordered by finish position.
#[derive(Debug, Serialize, Clone, PartialEq)]
pub struct RaceResult {
    pub track_name: String,
    pub season: u32,
    pub tot_no_laps: u32,
    pub entries: Vec<EntrantResult>,
}

impl RaceResult {
    pub fn winner(&self) -> Option<&EntrantResult> {
        self.entries.first()
    }

    /// get_entry returns the result of the given driver.
    pub fn get_entry(&self, driver_id: &str) -> Option<&EntrantResult> {
        self.entries.iter().find(|e| e.driver_id == driver_id)
    }

    /// print_results prints the final classification to the console output.
    pub fn print_results(&self) {
        println!("RESULT: {} {} ({} laps)", self.track_name, self.season, self.tot_no_laps);
        println!("pos, car, driver              , start,  led,    fastest,    average,  gap to leader,  xp");

        let leader_racetime = self.winner().map(|e| e.racetime).unwrap_or(0.0);

        for entry in self.entries.iter() {
            println!(
                "{:3}, {:3}, {:20}, {:5}, {:4}, {:9.3}s, {:9.3}s, {:13.3}s, {:3}",
                entry.finish_position,
                entry.car_no,
                entry.name,
                entry.start_position,
                entry.laps_led,
                entry.fastest_lap,
                entry.average_lap,
                entry.racetime - leader_racetime,
                entry.xp.total
            );
        }
    }

    /// print_lap_and_race_times prints the resulting lap and race times to the console output.
    pub fn print_lap_and_race_times(&self) {
        match self.format_lap_and_race_times() {
            Ok(content) => println!("{}", content),
            Err(e) => println!("WARNING: Could not format lap times: {}", e),
        }
    }

    fn format_lap_and_race_times(&self) -> Result<String, std::fmt::Error> {
        let mut tmp_string_laptime = String::new();
        let mut tmp_string_racetime = String::new();
        let mut racetimes = vec![0.0; self.entries.len()];

        for lap in 0..self.tot_no_laps as usize {
            write!(&mut tmp_string_laptime, "{:3}", lap + 1)?;
            write!(&mut tmp_string_racetime, "{:3}", lap + 1)?;

            for (i, entry) in self.entries.iter().enumerate() {
                let laptime = entry.laptimes.get(lap).copied().unwrap_or(0.0);
                racetimes[i] += laptime;
                write!(&mut tmp_string_laptime, ", {:8.3}s", laptime)?;
                write!(&mut tmp_string_racetime, ", {:8.3}s", racetimes[i])?;
            }

            writeln!(&mut tmp_string_laptime)?;
            writeln!(&mut tmp_string_racetime)?;
        }

        let mut tmp_string_car_driver_info = String::from("lap");
        for entry in self.entries.iter() {
            write!(&mut tmp_string_car_driver_info, ", {:3} ({})", entry.car_no, entry.driver_id)?;
        }

        let mut content = String::new();
        writeln!(&mut content, "RESULT: Lap times")?;
        writeln!(&mut content, "{}", tmp_string_car_driver_info)?;
        writeln!(&mut content, "{}", tmp_string_laptime)?;
        writeln!(&mut content, "RESULT: Race times")?;
        writeln!(&mut content, "{}", tmp_string_car_driver_info)?;
        write!(&mut content, "{}", tmp_string_racetime)?;
        Ok(content)
    }

    /// write_results_to_csv writes the classification and the lap times of every entrant to a csv
    /// file in output/ (or the given path). Returns the path to the written file.
    pub fn write_results_to_csv(&self, path: Option<&Path>) -> anyhow::Result<String> {
        let out_path = match path {
            Some(p) => p.to_path_buf(),
            None => {
                let out_dir = Path::new("output");
                std::fs::create_dir_all(out_dir)?;
                out_dir.join("last_run.csv")
            }
        };

        let mut wtr = csv::WriterBuilder::new().flexible(true).from_path(&out_path)?;

        let mut header = vec![
            "finish_position".to_owned(),
            "driver_id".to_owned(),
            "car_no".to_owned(),
            "start_position".to_owned(),
            "laps_led".to_owned(),
            "clean_laps".to_owned(),
            "fastest_lap".to_owned(),
            "racetime".to_owned(),
            "xp".to_owned(),
        ];
        header.extend((1..=self.tot_no_laps).map(|lap| format!("lap_{}", lap)));
        wtr.write_record(&header)?;

        for entry in self.entries.iter() {
            let mut record = vec![
                entry.finish_position.to_string(),
                entry.driver_id.to_owned(),
                entry.car_no.to_string(),
                entry.start_position.to_string(),
                entry.laps_led.to_string(),
                entry.clean_laps.to_string(),
                format!("{:.3}", entry.fastest_lap),
                format!("{:.3}", entry.racetime),
                entry.xp.total.to_string(),
            ];
            record.extend(entry.laptimes.iter().map(|t| format!("{:.3}", t)));
            wtr.write_record(&record)?;
        }

        wtr.flush()?;

        Ok(out_path.to_string_lossy().into_owned())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_xp_award() {
        // winner from 3rd in a field of 4, 10 laps led, 12 clean laps
        let xp = XpAward::calc(1, 4, 2, 10, 12);
        assert_eq!(xp.finish, 40);
        assert_eq!(xp.positions_gained, 10);
        assert_eq!(xp.clean_laps, 2);
        assert_eq!(xp.win_bonus, 50);
        assert_eq!(xp.total, 112);

        // lost positions are not punished
        let xp = XpAward::calc(4, 4, -3, 0, 4);
        assert_eq!(xp.total, 10);
    }

    fn result() -> RaceResult {
        let entry = |id: &str, pos: u32, laptimes: Vec<f64>| EntrantResult {
            driver_id: id.to_owned(),
            name: id.to_owned(),
            car_no: pos,
            finish_position: pos,
            start_position: 3 - pos,
            positions_gained: 2 * pos as i32 - 3,
            laps_led: 0,
            laps_completed: laptimes.len() as u32,
            fastest_lap: 0.0,
            fastest_lap_no: 0,
            average_lap: 0.0,
            clean_laps: 0,
            xp: XpAward::default(),
            racetime: laptimes.iter().sum(),
            laptimes,
        };

        RaceResult {
            track_name: "Test".to_owned(),
            season: 2024,
            tot_no_laps: 2,
            entries: vec![entry("A", 1, vec![15.5, 15.6]), entry("B", 2, vec![15.7, 15.8])],
        }
    }

    #[test]
    fn test_lap_and_race_time_table() {
        let content = result().format_lap_and_race_times().unwrap();
        assert!(content.contains("lap,   1 (A),   2 (B)"));
        assert!(content.contains("  2,   31.100s,   31.500s"));
    }

    #[test]
    fn test_write_csv() {
        let path = std::env::temp_dir().join("racesim_result_test.csv");
        let written = result().write_results_to_csv(Some(&path)).unwrap();
        let content = std::fs::read_to_string(&written).unwrap();
        let mut lines = content.lines();
        assert_eq!(
            lines.next().unwrap(),
            "finish_position,driver_id,car_no,start_position,laps_led,clean_laps,fastest_lap,racetime,xp,lap_1,lap_2"
        );
        assert!(lines.next().unwrap().starts_with("1,A,1,2,"));
        std::fs::remove_file(&path).unwrap();
    }
}
