pub mod core {
    pub mod aero;
    pub mod calibration;
    pub mod car;
    pub mod corner;
    pub mod driver;
    pub mod error;
    pub mod fuel;
    pub mod handle_race;
    pub mod lap_time;
    pub mod race;
    pub mod state_handler;
    pub mod tires;
    pub mod track;
}
pub mod interfaces {
    pub mod race_state;
}
pub mod post {
    pub mod race_result;
}
pub mod pre {
    pub mod read_sim_pars;
    pub mod sim_opts;
}
