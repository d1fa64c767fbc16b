/// Gameplay tuning for tube-launched munitions.

#[derive(Debug, Clone, Copy)]
pub struct MagnetMineTuning {
    pub arming_ms: f64,
    pub acceleration_mps2: f64,

    /// Detonates on its own after this long.
    pub max_life_ms: f64,

    pub trigger_radius_m: f64,
    pub damage_radius_m: f64,
}

impl Default for MagnetMineTuning {
    fn default() -> Self {
        Self {
            arming_ms: 3000.0,
            acceleration_mps2: 6.0,
            max_life_ms: 120_000.0,
            trigger_radius_m: 15.0,
            damage_radius_m: 50.0,
        }
    }
}

#[derive(Debug, Clone, Copy)]
pub struct EmpTuning {
    pub arming_ms: f64,
    pub max_life_ms: f64,

    /// Any ship other than the launcher inside this radius sets it off.
    pub trigger_radius_m: f64,

    pub damage_radius_m: f64,

    /// Battery drained from every ship caught in the blast.
    pub battery_drain: i64,
}

impl Default for EmpTuning {
    fn default() -> Self {
        Self {
            arming_ms: 3000.0,
            max_life_ms: 90_000.0,
            trigger_radius_m: 25.0,
            damage_radius_m: 75.0,
            battery_drain: 25_000,
        }
    }
}

#[derive(Debug, Clone, Copy)]
pub struct HunterDroneTuning {
    pub arming_ms: f64,
    pub acceleration_mps2: f64,
    pub trigger_radius_m: f64,
    pub damage_radius_m: f64,

    /// Targets further than this are ignored.
    pub max_acquisition_m: f64,

    pub hull_width_m: f64,
    pub hull_length_m: f64,
}

impl Default for HunterDroneTuning {
    fn default() -> Self {
        Self {
            arming_ms: 2000.0,
            acceleration_mps2: 15.0,
            trigger_radius_m: 10.0,
            damage_radius_m: 25.0,
            max_acquisition_m: 4000.0,
            hull_width_m: 1.0,
            hull_length_m: 3.0,
        }
    }
}

#[derive(Debug, Clone, Copy, Default)]
pub struct MunitionTuning {
    pub magnet_mine: MagnetMineTuning,
    pub emp: EmpTuning,
    pub hunter_drone: HunterDroneTuning,
}
