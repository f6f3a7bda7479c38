use crate::core::calibration::Calibration;
use crate::core::driver::EntrantPars;
use crate::core::race::RacePars;
use crate::core::track::TrackPars;
use anyhow::Context;
use serde::de::DeserializeOwned;
use serde::Deserialize;
use std::fs::OpenOptions;
use std::path::Path;

/// SimPars is used to store all other parameter structs.
#[derive(Debug, Deserialize, Clone)]
pub struct SimPars {
    pub race_pars: RacePars,
    pub track_pars: TrackPars,
    pub entrant_pars_all: Vec<EntrantPars>,
}

fn read_json<T: DeserializeOwned>(filepath: &Path, description: &str) -> anyhow::Result<T> {
    let fh = OpenOptions::new()
        .read(true)
        .open(filepath)
        .context(format!(
            "Failed to open {} file {}!",
            description,
            filepath.display()
        ))?;
    let pars = serde_json::from_reader(&fh).context(format!(
        "Failed to parse {} file {}!",
        description,
        filepath.display()
    ))?;
    Ok(pars)
}

/// read_sim_pars reads the JSON file and decodes the JSON string into the simulation parameters
/// struct.
pub fn read_sim_pars(filepath: &Path) -> anyhow::Result<SimPars> {
    read_json(filepath, "parameter")
}

/// read_calibration reads a calibration override. Missing fields keep their default values.
pub fn read_calibration(filepath: &Path) -> anyhow::Result<Calibration> {
    read_json(filepath, "calibration")
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;

    fn fixture(name: &str) -> PathBuf {
        [env!("CARGO_MANIFEST_DIR"), "..", "input", "parameters", name]
            .iter()
            .collect()
    }

    #[test]
    fn test_read_fixture() {
        let pars = read_sim_pars(&fixture("bristol.json")).unwrap();
        assert_eq!(pars.entrant_pars_all.len(), 4);
        assert_eq!(pars.track_pars.sections.len(), 6);
    }

    #[test]
    fn test_missing_file_has_context() {
        let err = read_sim_pars(&fixture("does_not_exist.json")).unwrap_err();
        assert!(err.to_string().contains("Failed to open parameter file"));
    }

    #[test]
    fn test_partial_calibration() {
        let path = std::env::temp_dir().join("racesim_partial_calibration.json");
        std::fs::write(&path, r#"{"aero": {"peak_boost_mph": 6.0}}"#).unwrap();
        let cal = read_calibration(&path).unwrap();
        std::fs::remove_file(&path).unwrap();

        let default = Calibration::default();
        assert_eq!(cal.aero.peak_boost_mph, 6.0);
        assert_eq!(cal.aero.car_length_ft, default.aero.car_length_ft);
        assert_eq!(cal.tires.life_laps.short, default.tires.life_laps.short);
    }
}
