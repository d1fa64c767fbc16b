/// Match-wide tuning: room limits, map scale and explosion physics.

#[derive(Debug, Clone, Copy)]
pub struct GameTuning {
    pub max_players: usize,

    /// Seconds spent in the starting phase before going live.
    pub countdown_seconds: u32,

    /// Map scale used when a map does not specify one.
    pub default_map_units_per_meter: i64,

    /// Shockwave expansion speed.
    pub speed_of_sound_mps: f64,

    pub shockwave_max_radius_m: f64,

    /// Push given to a ship sitting right at the shockwave origin.
    pub shockwave_max_delta_v_mps: f64,

    /// Quadratic falloff of the push with distance (m/s per m^2).
    pub shockwave_delta_v_coef: f64,

    /// Kill feed entries older than this are purged.
    pub kill_feed_lifetime_seconds: u32,
}

impl Default for GameTuning {
    fn default() -> Self {
        Self {
            max_players: 8,
            countdown_seconds: 5,
            default_map_units_per_meter: 100,
            speed_of_sound_mps: 600.0,
            shockwave_max_radius_m: 4000.0,
            shockwave_max_delta_v_mps: 30.0,
            shockwave_delta_v_coef: -1.875e-6,
            kill_feed_lifetime_seconds: 8,
        }
    }
}
