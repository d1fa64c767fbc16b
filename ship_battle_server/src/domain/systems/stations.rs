// Station and ore mine services: gravity brake catch, parking, mining, scouting.

use super::weapons::meters_between;
use crate::domain::coord_cache::CoordCache;
use crate::domain::ids::{FeatureId, ShipId};
use crate::domain::map::GameMap;
use crate::domain::ship::{Mining, Ship};
use std::collections::BTreeMap;
use tracing::debug;

/// Catches ships flying a deployed gravity brake through a station's service
/// radius. Every living ship close enough to see the station records the catch.
pub fn check_gravity_brake_catch(
    ships: &mut BTreeMap<ShipId, Ship>,
    map: &GameMap,
    cache: &mut CoordCache,
    frame: u64,
) {
    let mut catches: Vec<(ShipId, FeatureId)> = Vec::new();
    for ship in ships.values_mut() {
        if !ship.is_alive()
            || ship.gravity_brake.active
            || ship.docked_at.is_some()
            || !ship.gravity_brake.is_deployed(&ship.tuning.services)
        {
            continue;
        }
        let Some(station) = map
            .space_stations
            .iter()
            .find(|st| cache.distance(ship.position, st.position) <= st.service_radius)
        else {
            continue;
        };
        ship.engine.unlight();
        ship.scanner.clear_lock();
        ship.gravity_brake.active = true;
        ship.docking_at = Some(station.id.clone());
        catches.push((ship.id, station.id.clone()));
        debug!(ship = %ship.id, station = %station.id, frame, "gravity brake catch");
    }

    let upm = map.units_per_meter;
    for (caught, station_id) in catches {
        let Some(station_pos) = map.feature_position(&station_id) else {
            continue;
        };
        for ship in ships.values_mut().filter(|s| s.is_alive()) {
            let sight_m = ship
                .scanner
                .range_m(&ship.tuning.scanner)
                .max(ship.tuning.scanner.visual_range_m);
            if ship.id == caught || meters_between(ship.position, station_pos, upm) <= sight_m {
                ship.station_catch_frames.insert(station_id.clone(), frame);
            }
        }
    }
}

/// Parks stationary ships at the first ore mine whose service radius they sit in.
pub fn check_ore_parking(ships: &mut BTreeMap<ShipId, Ship>, map: &GameMap, cache: &mut CoordCache) {
    for ship in ships.values_mut() {
        if !ship.is_alive() || !ship.is_stationary() {
            ship.mining.parked_at = None;
            continue;
        }
        if ship.mining.parked_at.is_some() {
            continue;
        }
        ship.mining.parked_at = map
            .ore_mines
            .iter()
            .find(|m| cache.distance(ship.position, m.feature.position) <= m.feature.service_radius)
            .map(|m| m.feature.id.clone());
    }
}

/// Moves ore from mines into the cargo of mining ships.
pub fn advance_mining(
    ships: &mut BTreeMap<ShipId, Ship>,
    ore_remaining: &mut BTreeMap<FeatureId, f64>,
    fps: u32,
) {
    for ship in ships.values_mut() {
        let Some(mine_id) = ship.mining.parked_at.clone() else {
            ship.mining.active = false;
            continue;
        };
        if !ship.mining.active {
            continue;
        }
        let remaining = ore_remaining.get(&mine_id).copied().unwrap_or(0.0);
        let kg = Mining::transfer_kg(&ship.tuning.services, fps, ship.ore.cargo_kg, remaining);
        if kg <= 0.0 {
            ship.mining.active = false;
            continue;
        }
        ore_remaining.insert(mine_id, remaining - kg);
        ship.ore.cargo_kg += kg;
    }
}

/// Refreshes each ship's sticky ore readings for mines it can currently see.
pub fn update_scouted_ore(
    ships: &mut BTreeMap<ShipId, Ship>,
    map: &GameMap,
    ore_remaining: &BTreeMap<FeatureId, f64>,
) {
    let upm = map.units_per_meter;
    for ship in ships.values_mut().filter(|s| s.is_alive()) {
        let sight_m = ship
            .scanner
            .range_m(&ship.tuning.scanner)
            .max(ship.tuning.scanner.visual_range_m);
        for mine in &map.ore_mines {
            if meters_between(ship.position, mine.feature.position, upm) <= sight_m {
                let ore = ore_remaining.get(&mine.feature.id).copied().unwrap_or(0.0);
                ship.mining.scouted_ore.insert(mine.feature.id.clone(), ore);
            }
        }
    }
}
