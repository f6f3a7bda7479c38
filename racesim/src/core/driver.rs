use crate::core::calibration::{DriverCalibration, TireCalibration};
use serde::Deserialize;

/// Neutral value of a skill or mental attribute.
const NEUTRAL: f64 = 50.0;

/// Driver skills, each in [0, 100].
#[derive(Debug, Deserialize, Clone, Copy, PartialEq)]
#[serde(default)]
pub struct DriverSkills {
    pub racecraft: f64,
    pub consistency: f64,
    pub aggression: f64,
    pub focus: f64,
    pub stamina: f64,
    pub composure: f64,
    pub draft_sense: f64,
    pub tire_management: f64,
    pub fuel_management: f64,
    pub pit_strategy: f64,
}

impl Default for DriverSkills {
    fn default() -> Self {
        DriverSkills {
            racecraft: NEUTRAL,
            consistency: NEUTRAL,
            aggression: NEUTRAL,
            focus: NEUTRAL,
            stamina: NEUTRAL,
            composure: NEUTRAL,
            draft_sense: NEUTRAL,
            tire_management: NEUTRAL,
            fuel_management: NEUTRAL,
            pit_strategy: NEUTRAL,
        }
    }
}

impl DriverSkills {
    /// Returns all skills together with their names, used for validation.
    pub fn named(&self) -> [(&'static str, f64); 10] {
        [
            ("racecraft", self.racecraft),
            ("consistency", self.consistency),
            ("aggression", self.aggression),
            ("focus", self.focus),
            ("stamina", self.stamina),
            ("composure", self.composure),
            ("draft_sense", self.draft_sense),
            ("tire_management", self.tire_management),
            ("fuel_management", self.fuel_management),
            ("pit_strategy", self.pit_strategy),
        ]
    }
}

/// Mental state of a driver, each value in [0, 100]. Mutated between laps by the character
/// subsystem, read by the lap time models as a snapshot.
#[derive(Debug, Deserialize, Clone, Copy, PartialEq)]
#[serde(default)]
pub struct MentalState {
    pub confidence: f64,
    pub frustration: f64,
    pub focus: f64,
    pub distraction: f64,
}

impl Default for MentalState {
    fn default() -> Self {
        MentalState {
            confidence: NEUTRAL,
            frustration: 0.0,
            focus: NEUTRAL,
            distraction: 0.0,
        }
    }
}

/// DriverState is the read-only snapshot of a driver handed to the lap time integrator.
#[derive(Debug, Deserialize, Clone, Copy, PartialEq, Default)]
#[serde(default)]
pub struct DriverState {
    pub skills: DriverSkills,
    pub mental: MentalState,
}

impl DriverState {
    pub fn new(skills: DriverSkills, mental: MentalState) -> DriverState {
        DriverState { skills, mental }
    }

    /// Speed multiplier from racecraft for turns. 1.0 at racecraft 50.
    pub fn turn_skill_multiplier(&self, cal: &DriverCalibration) -> f64 {
        1.0 + centered(self.skills.racecraft) * cal.racecraft_turn_swing
    }

    /// Speed multiplier from racecraft for straights. 1.0 at racecraft 50.
    pub fn straight_skill_multiplier(&self, cal: &DriverCalibration) -> f64 {
        1.0 + centered(self.skills.racecraft) * cal.racecraft_straight_swing
    }

    /// Speed multiplier combining confidence and frustration, bounded to the calibrated range.
    pub fn mental_multiplier(&self, cal: &DriverCalibration) -> f64 {
        let confidence = centered(self.mental.confidence) * cal.confidence_swing;
        let frustration = fraction(self.mental.frustration) * cal.frustration_swing;

        (1.0 + confidence - frustration).max(cal.mental_min).min(cal.mental_max)
    }

    /// Tire wear multiplier: aggressive drivers wear tires faster, good tire managers slower.
    pub fn aggression_multiplier(&self, cal: &TireCalibration) -> f64 {
        let aggression = centered(self.skills.aggression) * cal.aggression_swing;
        let management = centered(self.skills.tire_management) * cal.management_swing;

        (1.0 + aggression - management).max(cal.wear_multiplier_floor)
    }
}

/// Maps a [0, 100] attribute onto [-1, 1] around the neutral value.
fn centered(value: f64) -> f64 {
    (value.max(0.0).min(100.0) - NEUTRAL) / NEUTRAL
}

/// Maps a [0, 100] attribute onto [0, 1].
pub(crate) fn fraction(value: f64) -> f64 {
    value.max(0.0).min(100.0) / 100.0
}

/// * `id` - Driver identifier, e.g. initials
/// * `name` - Driver name
/// * `car_no` - Car number
/// * `start_position` - Grid position, drawn if not set
/// * `skills` - Driver skills
/// * `mental` - Initial mental state
/// * `pit_laps` - Laps at the end of which the car pits
/// * `t_pit_standstill` - (s) Standstill time of a pit stop
#[derive(Debug, Deserialize, Clone)]
pub struct EntrantPars {
    pub id: String,
    pub name: String,
    pub car_no: u32,
    #[serde(default)]
    pub start_position: Option<u32>,
    #[serde(default)]
    pub skills: DriverSkills,
    #[serde(default)]
    pub mental: MentalState,
    #[serde(default)]
    pub pit_laps: Vec<u32>,
    #[serde(default = "default_t_pit_standstill")]
    pub t_pit_standstill: f64,
}

fn default_t_pit_standstill() -> f64 {
    12.0
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_neutral_driver_has_unit_multipliers() {
        let state = DriverState::default();
        let cal = DriverCalibration::default();
        assert_relative_eq!(state.turn_skill_multiplier(&cal), 1.0, epsilon = 1e-12);
        assert_relative_eq!(state.straight_skill_multiplier(&cal), 1.0, epsilon = 1e-12);
        assert_relative_eq!(state.mental_multiplier(&cal), 1.0, epsilon = 1e-12);
        assert_relative_eq!(state.aggression_multiplier(&TireCalibration::default()), 1.0, epsilon = 1e-12);
    }

    #[test]
    fn test_racecraft_range() {
        let cal = DriverCalibration::default();
        let mut state = DriverState::default();
        state.skills.racecraft = 100.0;
        assert_relative_eq!(state.turn_skill_multiplier(&cal), 1.08, epsilon = 1e-12);
        assert_relative_eq!(state.straight_skill_multiplier(&cal), 1.05, epsilon = 1e-12);
        state.skills.racecraft = 0.0;
        assert_relative_eq!(state.turn_skill_multiplier(&cal), 0.92, epsilon = 1e-12);
        assert_relative_eq!(state.straight_skill_multiplier(&cal), 0.95, epsilon = 1e-12);
    }

    #[test]
    fn test_mental_multiplier_is_bounded() {
        let cal = DriverCalibration::default();
        let mut state = DriverState::default();
        state.mental.confidence = 0.0;
        state.mental.frustration = 100.0;
        assert_relative_eq!(state.mental_multiplier(&cal), 0.92, epsilon = 1e-12);
        state.mental.confidence = 100.0;
        state.mental.frustration = 0.0;
        assert_relative_eq!(state.mental_multiplier(&cal), 1.05, epsilon = 1e-12);
    }

    #[test]
    fn test_aggression_multiplier() {
        let cal = TireCalibration::default();
        let mut state = DriverState::default();
        state.skills.aggression = 100.0;
        assert_relative_eq!(state.aggression_multiplier(&cal), 1.15, epsilon = 1e-12);
        state.skills.tire_management = 100.0;
        assert_relative_eq!(state.aggression_multiplier(&cal), 1.05, epsilon = 1e-12);
    }

    #[test]
    fn test_entrant_pars_defaults() {
        let pars: EntrantPars =
            serde_json::from_str(r#"{"id": "KB", "name": "Kyle B", "car_no": 8}"#).unwrap();
        assert_eq!(pars.start_position, None);
        assert_eq!(pars.skills, DriverSkills::default());
        assert_eq!(pars.t_pit_standstill, 12.0);
    }
}
