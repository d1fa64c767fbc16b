use crate::domain::coord_cache::CoordCache;
use crate::domain::geometry::Point;
use crate::domain::ids::{MunitionId, ShipId};
use crate::domain::munitions::Munitions;
use crate::domain::ship::{
    MunitionReading, MunitionReadingKind, ReadingPayload, ScannerMode, Ship, ShipReading,
};
use std::collections::BTreeMap;

struct Contact {
    id: ShipId,
    designator: String,
    position: Point,
    heading: i32,
    alive: bool,
    exploded: bool,
    thermal_signature: i64,
    anti_radar_coating: i64,
    diameter_m: f64,
}

struct Blip {
    id: MunitionId,
    kind: MunitionReadingKind,
    position: Point,
    exploded: bool,
}

/// Rebuilds every ship's readings from scratch, then re-checks scanner locks.
///
/// Detection is one-sided: each observer uses its own range, mode and
/// thresholds, so A may see B while B does not see A.
pub fn update_scanner_readings(
    ships: &mut BTreeMap<ShipId, Ship>,
    munitions: &Munitions,
    cache: &mut CoordCache,
    units_per_meter: i64,
    fps: u32,
) {
    let upm = units_per_meter.max(1) as f64;
    let contacts: Vec<Contact> = ships
        .values()
        .filter(|s| !s.damage.removed_from_map)
        .map(|s| Contact {
            id: s.id,
            designator: s.designator.clone(),
            position: s.position,
            heading: s.heading,
            alive: s.is_alive(),
            exploded: s.damage.is_exploded(),
            thermal_signature: s.thermal_signature,
            anti_radar_coating: s.anti_radar_coating,
            diameter_m: s.tuning.hull.width_m.hypot(s.tuning.hull.length_m),
        })
        .collect();

    let blips: Vec<Blip> = munitions
        .magnet_mines
        .values()
        .map(|m| Blip {
            id: m.id,
            kind: MunitionReadingKind::MagnetMine,
            position: m.motion.position(),
            exploded: m.exploded,
        })
        .chain(munitions.emps.values().map(|e| Blip {
            id: e.id,
            kind: MunitionReadingKind::Emp,
            position: e.motion.position(),
            exploded: e.exploded,
        }))
        .chain(munitions.hunter_drones.values().map(|d| Blip {
            id: d.id,
            kind: MunitionReadingKind::HunterDrone,
            position: d.motion.position(),
            exploded: d.exploded,
        }))
        .collect();

    for observer in ships.values_mut() {
        observer.scanner.readings.clear();
        if !observer.is_alive() {
            continue;
        }
        let tuning = observer.tuning.scanner;
        let online = observer.scanner.is_online();
        let range_m = observer.scanner.range_m(&tuning);
        let mode = observer.scanner.mode;

        for c in contacts.iter().filter(|c| c.id != observer.id) {
            let distance_m = (cache.distance(observer.position, c.position) / upm).round() as i64;
            let visual = tuning.visual_range_m >= distance_m as f64;
            let scannable = online
                && range_m >= distance_m as f64
                && match mode {
                    ScannerMode::Ir => c.thermal_signature >= tuning.ir_min_signature,
                    ScannerMode::Radar => c.anti_radar_coating <= tuning.radar_sensitivity,
                };
            if !visual && !scannable {
                continue;
            }
            let bearing = cache.heading(observer.position, c.position);
            let payload = match (scannable, mode) {
                (false, _) => ReadingPayload::Visual,
                (true, ScannerMode::Radar) => ReadingPayload::Radar {
                    diameter_m: c.diameter_m,
                },
                (true, ScannerMode::Ir) => ReadingPayload::Ir {
                    thermal_signature: c.thermal_signature,
                },
            };
            observer.scanner.readings.ships.insert(
                c.id,
                ShipReading {
                    designator: c.designator.clone(),
                    position: c.position,
                    distance_m,
                    relative_heading: (bearing.round() as i32).rem_euclid(360),
                    bearing,
                    heading: c.heading,
                    alive: c.alive,
                    exploded: c.exploded,
                    visual,
                    payload,
                },
            );
        }

        for b in &blips {
            let distance_m = (cache.distance(observer.position, b.position) / upm).round() as i64;
            let visual = tuning.visual_range_m >= distance_m as f64;
            let in_range = online && range_m >= distance_m as f64;
            // Mines and EMPs are cold; only radar picks them up.
            let scannable = match b.kind {
                MunitionReadingKind::HunterDrone => in_range,
                _ => in_range && mode == ScannerMode::Radar,
            };
            if !visual && !scannable {
                continue;
            }
            let bearing = cache.heading(observer.position, b.position);
            observer.scanner.readings.munitions.insert(
                b.id,
                MunitionReading {
                    kind: b.kind,
                    position: b.position,
                    distance_m,
                    relative_heading: (bearing.round() as i32).rem_euclid(360),
                    visual,
                    exploded: b.exploded,
                },
            );
        }

        observer.scanner.verify_lock(&tuning, fps);
    }
}
