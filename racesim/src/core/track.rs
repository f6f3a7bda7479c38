use crate::core::calibration::FT_PER_MILE;
use crate::core::error::SimError;
use serde::Deserialize;

/// Relative tolerance between the summed section lengths and the track length.
const SECTION_LENGTH_TOLERANCE: f64 = 0.005;
const SURFACE_GRIP_MIN: f64 = 0.8;
const SURFACE_GRIP_MAX: f64 = 1.0;

#[derive(Debug, Deserialize, Clone, Copy, PartialEq, Eq, Hash)]
#[serde(rename_all = "snake_case")]
pub enum TrackCategory {
    Short,
    Intermediate,
    Superspeedway,
    Road,
}

#[derive(Debug, Deserialize, Clone, Copy, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum SectionKind {
    Straight,
    Turn,
}

/// * `kind` - Straight or turn
/// * `length` - (ft) Length of the section
/// * `banking` - (deg) Banking angle, required for turns
/// * `radius` - (ft) Turn radius, required for turns
/// * `ref_speed` - (mph) Reference speed, the top speed on straights
/// * `surface_grip` - (-) Surface grip multiplier in [0.8, 1.0], defaults to the track value
#[derive(Debug, Deserialize, Clone)]
pub struct SectionPars {
    pub kind: SectionKind,
    pub length: f64,
    #[serde(default)]
    pub banking: Option<f64>,
    #[serde(default)]
    pub radius: Option<f64>,
    pub ref_speed: f64,
    #[serde(default)]
    pub surface_grip: Option<f64>,
}

/// * `id` - Track identifier, e.g. bristol
/// * `name` - Track name, e.g. Bristol Motor Speedway
/// * `length` - (mi) Length of the track
/// * `category` - Track category used by tire, fuel and weight calibrations
/// * `banking` - (deg) Banking summary of the turns
/// * `surface_grip` - (-) Default surface grip multiplier of all sections
/// * `sections` - Ordered straights and turns of one lap
/// * `tot_no_laps` - Race distance in laps
/// * `pit_speedlimit` - (mph) Speed limit when driving through the pit lane
/// * `pit_lane_length` - (ft) Length of the pit lane
#[derive(Debug, Deserialize, Clone)]
pub struct TrackPars {
    pub id: String,
    pub name: String,
    pub length: f64,
    pub category: TrackCategory,
    pub banking: f64,
    #[serde(default = "default_surface_grip")]
    pub surface_grip: f64,
    pub sections: Vec<SectionPars>,
    pub tot_no_laps: u32,
    #[serde(default = "default_pit_speedlimit")]
    pub pit_speedlimit: f64,
    #[serde(default)]
    pub pit_lane_length: f64,
}

fn default_surface_grip() -> f64 {
    1.0
}

fn default_pit_speedlimit() -> f64 {
    45.0
}

/// A validated track section. Turns always carry banking and radius.
#[derive(Debug, Clone, PartialEq)]
pub enum Section {
    Straight {
        length: f64,
        ref_speed: f64,
        surface_grip: f64,
    },
    Turn {
        length: f64,
        banking: f64,
        radius: f64,
        ref_speed: f64,
        surface_grip: f64,
    },
}

impl Section {
    pub fn kind(&self) -> SectionKind {
        match self {
            Section::Straight { .. } => SectionKind::Straight,
            Section::Turn { .. } => SectionKind::Turn,
        }
    }

    pub fn length(&self) -> f64 {
        match *self {
            Section::Straight { length, .. } | Section::Turn { length, .. } => length,
        }
    }

    pub fn ref_speed(&self) -> f64 {
        match *self {
            Section::Straight { ref_speed, .. } | Section::Turn { ref_speed, .. } => ref_speed,
        }
    }
}

#[derive(Debug, Clone)]
pub struct Track {
    pub id: String,
    pub name: String,
    pub length: f64,
    pub length_ft: f64,
    pub category: TrackCategory,
    pub banking: f64,
    pub surface_grip: f64,
    pub sections: Vec<Section>,
    pub tot_no_laps: u32,
    pub pit_speedlimit: f64,
    pub pit_lane_length: f64,
}

impl Track {
    /// Validates the track parameters and creates the track. Fails if the sections do not add up
    /// to the track length or if a turn lacks its geometry.
    pub fn new(track_pars: &TrackPars) -> Result<Track, SimError> {
        if track_pars.sections.is_empty() {
            return Err(SimError::NoSections {
                track: track_pars.id.to_owned(),
            });
        }

        check_range(&track_pars.id, "length", track_pars.length, f64::MIN_POSITIVE, f64::MAX)?;
        check_range(
            &track_pars.id,
            "surface_grip",
            track_pars.surface_grip,
            SURFACE_GRIP_MIN,
            SURFACE_GRIP_MAX,
        )?;
        check_range(
            &track_pars.id,
            "pit_speedlimit",
            track_pars.pit_speedlimit,
            f64::MIN_POSITIVE,
            f64::MAX,
        )?;

        let mut sections = Vec::with_capacity(track_pars.sections.len());

        for (i, section_pars) in track_pars.sections.iter().enumerate() {
            check_range(&track_pars.id, "section length", section_pars.length, f64::MIN_POSITIVE, f64::MAX)?;
            check_range(&track_pars.id, "section ref_speed", section_pars.ref_speed, f64::MIN_POSITIVE, f64::MAX)?;

            let surface_grip = section_pars.surface_grip.unwrap_or(track_pars.surface_grip);
            check_range(
                &track_pars.id,
                "section surface_grip",
                surface_grip,
                SURFACE_GRIP_MIN,
                SURFACE_GRIP_MAX,
            )?;

            let section = match section_pars.kind {
                SectionKind::Straight => Section::Straight {
                    length: section_pars.length,
                    ref_speed: section_pars.ref_speed,
                    surface_grip,
                },
                SectionKind::Turn => match (section_pars.banking, section_pars.radius) {
                    (Some(banking), Some(radius)) if radius > 0.0 => Section::Turn {
                        length: section_pars.length,
                        banking,
                        radius,
                        ref_speed: section_pars.ref_speed,
                        surface_grip,
                    },
                    _ => {
                        return Err(SimError::TurnGeometryMissing {
                            track: track_pars.id.to_owned(),
                            section: i,
                        })
                    }
                },
            };

            sections.push(section);
        }

        let length_ft = track_pars.length * FT_PER_MILE;
        let sum_ft: f64 = sections.iter().map(|s| s.length()).sum();

        if (sum_ft - length_ft).abs() > SECTION_LENGTH_TOLERANCE * length_ft {
            return Err(SimError::SectionLengthMismatch {
                track: track_pars.id.to_owned(),
                sum_ft,
                length_ft,
            });
        }

        Ok(Track {
            id: track_pars.id.to_owned(),
            name: track_pars.name.to_owned(),
            length: track_pars.length,
            length_ft,
            category: track_pars.category,
            banking: track_pars.banking,
            surface_grip: track_pars.surface_grip,
            sections,
            tot_no_laps: track_pars.tot_no_laps,
            pit_speedlimit: track_pars.pit_speedlimit,
            pit_lane_length: track_pars.pit_lane_length,
        })
    }

    /// The method returns the approximate time loss when driving through the pit lane instead of
    /// covering the same distance on track at the given lap time.
    pub fn get_pit_drive_timeloss(&self, laptime: f64) -> f64 {
        if self.pit_lane_length <= 0.0 {
            return 0.0;
        }

        let pit_speed_ft_s = self.pit_speedlimit * FT_PER_MILE / 3600.0;
        let pit_zone_lap_frac = (self.pit_lane_length / self.length_ft).min(1.0);

        (self.pit_lane_length / pit_speed_ft_s - laptime * pit_zone_lap_frac).max(0.0)
    }
}

fn check_range(track: &str, field: &'static str, value: f64, min: f64, max: f64) -> Result<(), SimError> {
    if value.is_finite() && value >= min && value <= max {
        Ok(())
    } else {
        Err(SimError::TrackRangeViolation {
            track: track.to_owned(),
            field,
            min,
            max,
            value,
        })
    }
}

#[cfg(test)]
pub mod test_tracks {
    //! Reference ovals used throughout the tests. Two straights and four turns each.
    use super::*;

    fn oval(
        id: &str,
        category: TrackCategory,
        length_mi: f64,
        banking: f64,
        straight_len: f64,
        straight_speed: f64,
        radius: f64,
        tot_no_laps: u32,
    ) -> TrackPars {
        let turn_len = (length_mi * FT_PER_MILE - 2.0 * straight_len) / 4.0;
        let straight = SectionPars {
            kind: SectionKind::Straight,
            length: straight_len,
            banking: None,
            radius: None,
            ref_speed: straight_speed,
            surface_grip: None,
        };
        let turn = SectionPars {
            kind: SectionKind::Turn,
            length: turn_len,
            banking: Some(banking),
            radius: Some(radius),
            ref_speed: straight_speed * 0.9,
            surface_grip: None,
        };

        TrackPars {
            id: id.to_owned(),
            name: id.to_owned(),
            length: length_mi,
            category,
            banking,
            surface_grip: 1.0,
            sections: vec![
                straight.clone(),
                turn.clone(),
                turn.clone(),
                straight,
                turn.clone(),
                turn,
            ],
            tot_no_laps,
            pit_speedlimit: 30.0,
            pit_lane_length: 1200.0,
        }
    }

    pub fn bristol() -> TrackPars {
        oval("bristol", TrackCategory::Short, 0.533, 26.0, 650.0, 135.0, 640.0, 500)
    }

    pub fn charlotte() -> TrackPars {
        oval("charlotte", TrackCategory::Intermediate, 1.5, 24.0, 1980.0, 190.0, 1150.0, 400)
    }

    pub fn daytona() -> TrackPars {
        oval("daytona", TrackCategory::Superspeedway, 2.5, 31.0, 3800.0, 195.0, 1100.0, 200)
    }
}
