/// Gameplay tuning for ships and their subsystems.
///
/// Keep this separate from runtime/server configuration (tick rates, buffer sizes, etc.).
/// Rates are per second and converted to per-tick amounts by the simulation.

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct HullTuning {
    /// Hull width in meters (x axis at heading 0).
    pub width_m: f64,

    /// Hull length in meters, nose to tail.
    pub length_m: f64,

    pub hull_mass_kg: i64,
    pub pilot_mass_kg: i64,
    pub battery_mass_kg: i64,
    pub engine_mass_kg: i64,

    /// Fuel units that weigh one kilogram.
    pub fuel_units_per_kg: i64,

    /// Level above which a destroyed ship produces the larger, fiery explosion.
    pub fiery_explosion_fuel_level: i64,
}

impl Default for HullTuning {
    fn default() -> Self {
        Self {
            width_m: 4.0,
            length_m: 12.0,
            hull_mass_kg: 1000,
            pilot_mass_kg: 100,
            battery_mass_kg: 100,
            engine_mass_kg: 500,
            fuel_units_per_kg: 10,
            fiery_explosion_fuel_level: 6000,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PowerTuning {
    pub battery_start: i64,
    pub battery_capacity: i64,
    pub fuel_start: i64,
    pub fuel_capacity: i64,
}

impl Default for PowerTuning {
    fn default() -> Self {
        Self {
            battery_start: 30_000,
            battery_capacity: 40_000,
            fuel_start: 10_000,
            fuel_capacity: 10_000,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct EngineTuning {
    /// Thrust in newtons while lit.
    pub newtons: f64,

    /// Total battery power needed to bring the engine online.
    pub activation_power: i64,
    pub activation_rate: f64,

    /// Battery draw while online and not lit.
    pub idle_power_rate: f64,

    /// Fuel burned while lit.
    pub fuel_rate: f64,

    /// Battery charge produced while lit.
    pub battery_charge_rate: f64,

    /// Thrust and fuel multiplier for a boosted tick.
    pub boost_multiple: f64,

    pub thermal_rate: f64,
}

impl Default for EngineTuning {
    fn default() -> Self {
        Self {
            newtons: 28_000.0,
            activation_power: 3000,
            activation_rate: 1000.0,
            idle_power_rate: 100.0,
            fuel_rate: 50.0,
            battery_charge_rate: 500.0,
            boost_multiple: 5.0,
            thermal_rate: 600.0,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ApuTuning {
    pub activation_power: i64,
    pub activation_rate: f64,
    pub battery_charge_rate: f64,
    pub fuel_rate: f64,
    pub thermal_rate: f64,
}

impl Default for ApuTuning {
    fn default() -> Self {
        Self {
            activation_power: 2000,
            activation_rate: 400.0,
            battery_charge_rate: 200.0,
            fuel_rate: 50.0,
            thermal_rate: 300.0,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ScannerTuning {
    pub radar_range_m: f64,
    pub ir_range_m: f64,

    /// Weakest thermal signature the IR scanner can pick up.
    pub ir_min_signature: i64,

    /// Targets with an anti-radar coating above this level stay hidden from radar.
    pub radar_sensitivity: i64,

    pub idle_power_rate: f64,
    pub activation_power: i64,
    pub activation_rate: f64,

    /// Total power needed to complete a target lock.
    pub lock_power: i64,
    pub lock_rate: f64,

    /// Max bearing change per second before an in-progress lock breaks.
    pub locking_max_traversal_deg: f64,

    /// Max bearing change per second before an established lock breaks.
    pub locked_max_traversal_deg: f64,

    /// Ships closer than this are always seen, scanner or not.
    pub visual_range_m: f64,
}

impl Default for ScannerTuning {
    fn default() -> Self {
        Self {
            radar_range_m: 3000.0,
            ir_range_m: 5000.0,
            ir_min_signature: 600,
            radar_sensitivity: 0,
            idle_power_rate: 300.0,
            activation_power: 1000,
            activation_rate: 500.0,
            lock_power: 2000,
            lock_rate: 1000.0,
            locking_max_traversal_deg: 30.0,
            locked_max_traversal_deg: 60.0,
            visual_range_m: 300.0,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct EbeamTuning {
    pub charge_capacity: f64,

    /// Charge required before the beam may be fired.
    pub fire_minimum: f64,

    pub charge_rate: f64,

    /// Battery spent per unit of charge.
    pub charge_power_multiple: f64,

    /// Charge drained per second while firing.
    pub discharge_rate: f64,

    pub thermal_rate: f64,

    /// Farthest target autofire will shoot at.
    pub autofire_max_range_m: f64,
}

impl Default for EbeamTuning {
    fn default() -> Self {
        Self {
            charge_capacity: 12_000.0,
            fire_minimum: 4000.0,
            charge_rate: 3000.0,
            charge_power_multiple: 1.5,
            discharge_rate: 35_000.0,
            thermal_rate: 800.0,
            autofire_max_range_m: 3000.0,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ServicesTuning {
    pub gravity_brake_deployed_position: i64,
    pub gravity_brake_traversal_rate: f64,

    pub reaction_wheel_activation_power: i64,
    pub reaction_wheel_idle_power_rate: f64,

    pub mining_power_rate: f64,
    pub mining_kg_rate: f64,
    pub cargo_capacity_kg: f64,

    pub refuel_units_rate: f64,
    pub refuel_ore_kg_per_unit: f64,

    /// Thermal signature lost per second.
    pub thermal_dissipation_rate: f64,

    /// Position hold disengages once both velocity components are at or below this.
    pub position_hold_threshold_mps: f64,
}

impl Default for ServicesTuning {
    fn default() -> Self {
        Self {
            gravity_brake_deployed_position: 100,
            gravity_brake_traversal_rate: 50.0,
            reaction_wheel_activation_power: 500,
            reaction_wheel_idle_power_rate: 30.0,
            mining_power_rate: 200.0,
            mining_kg_rate: 50.0,
            cargo_capacity_kg: 500.0,
            refuel_units_rate: 1000.0,
            refuel_ore_kg_per_unit: 0.05,
            thermal_dissipation_rate: 400.0,
            position_hold_threshold_mps: 3.0,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TubeTuning {
    pub tube_count: u32,
    pub starting_magnet_mines: u32,
    pub starting_emps: u32,
    pub starting_hunter_drones: u32,

    pub launch_velocity_min_mps: i64,
    pub launch_velocity_max_mps: i64,

    /// Velocity pushed onto the launching ship, opposite to its heading.
    pub recoil_mps: f64,

    /// Launches push nothing back onto the ship.
    pub recoilless: bool,

    pub magnet_mine_cost_kg: f64,
    pub emp_cost_kg: f64,
    pub hunter_drone_cost_kg: f64,
}

impl Default for TubeTuning {
    fn default() -> Self {
        Self {
            tube_count: 8,
            starting_magnet_mines: 2,
            starting_emps: 2,
            starting_hunter_drones: 2,
            launch_velocity_min_mps: 5,
            launch_velocity_max_mps: 75,
            recoil_mps: 10.0,
            recoilless: false,
            magnet_mine_cost_kg: 300.0,
            emp_cost_kg: 200.0,
            hunter_drone_cost_kg: 600.0,
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct ShipTuning {
    pub hull: HullTuning,
    pub power: PowerTuning,
    pub engine: EngineTuning,
    pub apu: ApuTuning,
    pub scanner: ScannerTuning,
    pub ebeam: EbeamTuning,
    pub services: ServicesTuning,
    pub tubes: TubeTuning,
}
