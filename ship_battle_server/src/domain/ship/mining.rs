// Ore mining, ore storage and the ore side of refueling.

use crate::domain::ids::FeatureId;
use crate::domain::resources::{ResourcePool, per_tick};
use crate::domain::tuning::ServicesTuning;
use std::collections::BTreeMap;

/// Ore carried in the hold plus ore banked at stations.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct OreHold {
    pub cargo_kg: f64,

    /// Ore traded in at a station. Spendable but weightless.
    pub virtual_kg: f64,
}

impl OreHold {
    pub fn total_kg(&self) -> f64 {
        self.cargo_kg + self.virtual_kg
    }

    /// Takes ore from cargo first, then from the bank. All or nothing.
    pub fn withdraw(&mut self, kg: f64) -> Result<(), OreShortfall> {
        if kg > self.total_kg() {
            return Err(OreShortfall {
                requested_kg: kg,
                available_kg: self.total_kg(),
            });
        }
        let from_cargo = kg.min(self.cargo_kg);
        self.cargo_kg -= from_cargo;
        self.virtual_kg -= kg - from_cargo;
        Ok(())
    }

    /// Moves all cargo into the bank. Returns the amount moved.
    pub fn deposit_cargo(&mut self) -> f64 {
        let moved = self.cargo_kg;
        self.virtual_kg += moved;
        self.cargo_kg = 0.0;
        moved
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct OreShortfall {
    pub requested_kg: f64,
    pub available_kg: f64,
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct Mining {
    pub active: bool,

    /// Ore mine the ship is parked at, if any.
    pub parked_at: Option<FeatureId>,

    pub fueling: bool,
    pub last_ore_deposit_frame: Option<u64>,

    /// Last known remaining ore per mine. Sticky between sightings.
    pub scouted_ore: BTreeMap<FeatureId, f64>,
}

impl Mining {
    pub fn stop(&mut self) {
        self.active = false;
    }

    /// Mining power draw for one tick.
    pub fn tick(&mut self, tuning: &ServicesTuning, fps: u32, battery: &mut ResourcePool) {
        if self.active && battery.spend(per_tick(tuning.mining_power_rate, fps)).is_err() {
            self.active = false;
        }
    }

    /// Kilograms to move this tick given cargo and mine state. Zero means mining
    /// should stop.
    pub fn transfer_kg(tuning: &ServicesTuning, fps: u32, cargo_kg: f64, remaining_kg: f64) -> f64 {
        let per_tick = round2(tuning.mining_kg_rate / fps.max(1) as f64);
        let room = per_tick.min(tuning.cargo_capacity_kg - cargo_kg);
        if room <= 0.0 || remaining_kg <= 0.0 {
            return 0.0;
        }
        remaining_kg.min(per_tick).min(room)
    }

    /// Refuels from ore for one tick. `at_station` means docked with the brake
    /// deployed and no velocity.
    pub fn refuel(
        &mut self,
        tuning: &ServicesTuning,
        fps: u32,
        fuel: &mut ResourcePool,
        hold: &mut OreHold,
        at_station: bool,
    ) {
        if !self.fueling {
            return;
        }
        let room = fuel.headroom();
        if !at_station || room <= 0 {
            self.fueling = false;
            return;
        }
        let units = room.min(per_tick(tuning.refuel_units_rate, fps));
        let ore = units as f64 * tuning.refuel_ore_kg_per_unit;
        match hold.withdraw(ore) {
            Ok(()) => {
                fuel.fill(units);
            }
            Err(_) => self.fueling = false,
        }
    }
}

fn round2(v: f64) -> f64 {
    (v * 100.0).round() / 100.0
}
