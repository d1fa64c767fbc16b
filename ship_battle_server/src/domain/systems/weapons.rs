use super::FrameEvents;
use crate::domain::effects::{BlastSpec, EbeamRay};
use crate::domain::geometry::{
    MapBounds, Point, heading_to_vector, heading_within_hitbox, hitbox_ray_intersect,
    invert_heading, point_distance,
};
use crate::domain::ids::{MunitionId, ShipId};
use crate::domain::killfeed::KillCause;
use crate::domain::map::{GameMap, MapFeature};
use crate::domain::munitions::{
    Ballistics, Emp, HunterDrone, MagnetMine, Munitions, PatrolTurn,
};
use crate::domain::ship::{Hull, MunitionKind, Ship};
use crate::domain::tuning::MunitionTuning;
use std::collections::BTreeMap;
use tracing::debug;

/// Kills and explodes every living ship outside the map or inside a feature's
/// collision radius.
pub fn resolve_collisions(
    ships: &mut BTreeMap<ShipId, Ship>,
    map: &GameMap,
    frame: u64,
    events: &mut FrameEvents,
) {
    for ship in ships.values_mut().filter(|s| s.is_alive()) {
        let position = ship.position;
        let inside = |f: &MapFeature| point_distance(position, f.position) < f.collision_radius;
        let cause = if !map.bounds.contains(position) {
            Some(KillCause::MapBoundary)
        } else if map.space_stations.iter().any(inside) {
            Some(KillCause::StationCollision)
        } else if map.ore_mines.iter().any(|m| inside(&m.feature)) {
            Some(KillCause::OreMineCollision)
        } else {
            None
        };
        let Some(cause) = cause else {
            continue;
        };

        ship.die(frame);
        ship.explode();
        let fiery = ship.fuel.level() > ship.tuning.hull.fiery_explosion_fuel_level;
        events.blasts.push(BlastSpec::ship(ship.id, ship.position, fiery));
        events.kill(ship.id, cause);
    }
}

/// Discharges every firing e-beam and kills the nearest ship on each ray.
/// Armed autofire beams start firing first if a target lines up.
pub fn fire_ebeams(
    ships: &mut BTreeMap<ShipId, Ship>,
    bounds: MapBounds,
    fps: u32,
    frame: u64,
    rays: &mut Vec<EbeamRay>,
    events: &mut FrameEvents,
) {
    let shooter_ids: Vec<ShipId> = ships.keys().copied().collect();
    for shooter_id in shooter_ids {
        let Some(shooter) = ships.get_mut(&shooter_id) else {
            continue;
        };
        if !shooter.is_alive() {
            continue;
        }
        let tuning = shooter.tuning.ebeam;
        if shooter.ebeam.autofire_ready(&tuning) {
            let solution = firing_solution(ships, shooter_id);
            if let (Some(target), Some(shooter)) = (solution, ships.get_mut(&shooter_id)) {
                shooter.ebeam.trigger_autofire();
                debug!(shooter = %shooter_id, target = %target, frame, "e-beam autofire");
            }
        }
        let Some(shooter) = ships.get_mut(&shooter_id) else {
            continue;
        };
        if !shooter.ebeam.discharge(&tuning, fps) {
            continue;
        }
        let start = shooter.nose();
        let heading = shooter.ebeam_heading();

        // Measured from the firing nose to each target's center. Ties go to
        // the lower ship id.
        let hit = ships
            .values()
            .filter(|t| t.id != shooter_id && t.is_alive())
            .filter(|t| hitbox_ray_intersect(start, heading, bounds, &t.outline()))
            .map(|t| (point_distance(start, t.position), t.id))
            .min_by(|a, b| a.0.total_cmp(&b.0).then(a.1.cmp(&b.1)))
            .map(|(_, id)| id);

        rays.push(EbeamRay {
            ship_id: shooter_id,
            start,
            heading,
            hit,
        });

        let Some(victim_id) = hit else {
            continue;
        };
        if let Some(victim) = ships.get_mut(&victim_id) {
            victim.die(frame);
        }
        if let Some(shooter) = ships.get_mut(&shooter_id) {
            shooter.ebeam.last_hit_frame = Some(frame);
        }
        debug!(shooter = %shooter_id, victim = %victim_id, frame, "e-beam hit");
        events.kill(victim_id, KillCause::Ebeam { shooter: shooter_id });
    }
}

/// First scanner-visible living ship within autofire range whose hitbox the
/// shooter's heading passes through.
fn firing_solution(ships: &BTreeMap<ShipId, Ship>, shooter_id: ShipId) -> Option<ShipId> {
    let shooter = ships.get(&shooter_id)?;
    let max_range_m = shooter.tuning.ebeam.autofire_max_range_m;
    shooter
        .scanner
        .readings
        .ships
        .iter()
        .filter(|(_, reading)| reading.alive && reading.distance_m as f64 <= max_range_m)
        .filter_map(|(id, _)| ships.get(id))
        .filter(|t| t.id != shooter_id && t.is_alive())
        .find(|t| heading_within_hitbox(shooter.position, shooter.heading as f64, &t.outline()))
        .map(|t| t.id)
}

/// Turns queued tube launches into live munitions and applies recoil.
pub fn launch_munitions(
    ships: &mut BTreeMap<ShipId, Ship>,
    munitions: &mut Munitions,
    next_id: &mut u64,
    tuning: &MunitionTuning,
    units_per_meter: i64,
    frame: u64,
) {
    for ship in ships.values_mut().filter(|s| s.is_alive()) {
        let Some(launch) = ship.tubes.take_launch(frame) else {
            continue;
        };
        let heading = ship.heading as f64;
        let (lx, ly) = heading_to_vector(launch.velocity_mps, heading);
        let velocity = (ship.velocity.0 + lx, ship.velocity.1 + ly);
        let spawn_at = match launch.kind {
            MunitionKind::HunterDrone => ship.position,
            MunitionKind::MagnetMine | MunitionKind::Emp => ship.nose(),
        };
        let motion = Ballistics {
            x: spawn_at.x as f64,
            y: spawn_at.y as f64,
            velocity,
            elapsed_ms: 0.0,
        };

        let id = MunitionId(*next_id);
        *next_id += 1;
        match launch.kind {
            MunitionKind::MagnetMine => {
                munitions.magnet_mines.insert(
                    id,
                    MagnetMine {
                        id,
                        launched_by: ship.id,
                        launched_on_frame: frame,
                        motion,
                        armed: false,
                        exploded: false,
                        closest_ship: None,
                        distance_to_closest_m: None,
                    },
                );
            }
            MunitionKind::Emp => {
                munitions.emps.insert(
                    id,
                    Emp {
                        id,
                        launched_by: ship.id,
                        launched_on_frame: frame,
                        motion,
                        armed: false,
                        exploded: false,
                    },
                );
            }
            MunitionKind::HunterDrone => {
                let upm = units_per_meter as f64;
                let mut drone = HunterDrone {
                    id,
                    launched_by: ship.id,
                    launched_on_frame: frame,
                    team_id: ship.team_id,
                    motion,
                    heading: 0,
                    hull: Hull::new(
                        (tuning.hunter_drone.hull_width_m * upm).round() as i64,
                        (tuning.hunter_drone.hull_length_m * upm).round() as i64,
                    ),
                    armed: false,
                    exploded: false,
                    target: None,
                    patrol: if ship.heading < 180 {
                        PatrolTurn::Clockwise
                    } else {
                        PatrolTurn::CounterClockwise
                    },
                };
                drone.set_heading(ship.heading);
                munitions.hunter_drones.insert(id, drone);
            }
        }

        if !ship.tuning.tubes.recoilless {
            if let Ok(recoil_heading) = invert_heading(heading) {
                ship.push(recoil_heading, ship.tuning.tubes.recoil_mps);
            }
        }
        debug!(ship = %ship.id, munition = %id, kind = %launch.kind, frame, "munition launched");
    }
}

/// Distance in meters between two map points.
pub(crate) fn meters_between(a: Point, b: Point, units_per_meter: i64) -> f64 {
    point_distance(a, b) / units_per_meter.max(1) as f64
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::map::{FeatureSpec, MapSpec};
    use crate::domain::ship::scanner::{ReadingPayload, ShipReading};
    use crate::domain::ship::tests::test_ship;
    use crate::domain::tuning::EbeamTuning;

    const BOUNDS: MapBounds = MapBounds {
        x_max: 10_000,
        y_max: 10_000,
    };

    fn duel(shooter_heading: i32) -> BTreeMap<ShipId, Ship> {
        let mut ships = BTreeMap::new();
        let mut shooter = test_ship(1, Point::new(1000, 1000), 10);
        shooter.set_heading(shooter_heading);
        shooter.ebeam.charge = 8000.0;
        shooter.ebeam.firing = true;
        ships.insert(ShipId(1), shooter);
        ships.insert(ShipId(2), test_ship(2, Point::new(1000, 6000), 10));
        ships
    }

    #[test]
    fn when_beam_points_at_target_then_target_dies_this_tick() {
        let mut ships = duel(0);
        let mut rays = Vec::new();
        let mut events = FrameEvents::default();
        fire_ebeams(&mut ships, BOUNDS, 12, 7, &mut rays, &mut events);

        assert_eq!(ships[&ShipId(2)].damage.died_on_frame, Some(7));
        assert_eq!(ships[&ShipId(1)].ebeam.last_hit_frame, Some(7));
        assert_eq!(ships[&ShipId(1)].ebeam.charge, 5083.0);
        assert_eq!(rays[0].hit, Some(ShipId(2)));
        assert_eq!(
            events.kills[0].cause,
            KillCause::Ebeam {
                shooter: ShipId(1)
            }
        );
    }

    #[test]
    fn when_beam_points_away_then_it_misses_but_still_drains() {
        let mut ships = duel(315);
        let mut rays = Vec::new();
        let mut events = FrameEvents::default();
        fire_ebeams(&mut ships, BOUNDS, 12, 7, &mut rays, &mut events);

        assert!(ships[&ShipId(2)].is_alive());
        assert!(events.kills.is_empty());
        let expected = (8000.0 - EbeamTuning::default().discharge_rate / 12.0).round();
        assert_eq!(ships[&ShipId(1)].ebeam.charge, expected);
    }

    fn visible(ship: &Ship, distance_m: i64) -> ShipReading {
        ShipReading {
            designator: ship.designator.clone(),
            position: ship.position,
            distance_m,
            relative_heading: 0,
            bearing: 0.0,
            heading: ship.heading,
            alive: true,
            exploded: false,
            visual: true,
            payload: ReadingPayload::Radar { diameter_m: 10.0 },
        }
    }

    #[test]
    fn when_autofire_target_lines_up_then_beam_fires_once_and_disarms() {
        let mut ships = duel(0);
        let target = visible(&ships[&ShipId(2)], 500);
        let shooter = ships.get_mut(&ShipId(1)).unwrap();
        shooter.ebeam.firing = false;
        shooter.ebeam.set_autofire(true);
        shooter.scanner.readings.ships.insert(ShipId(2), target);

        let mut rays = Vec::new();
        let mut events = FrameEvents::default();
        fire_ebeams(&mut ships, BOUNDS, 12, 9, &mut rays, &mut events);

        assert!(!ships[&ShipId(1)].ebeam.autofire);
        assert_eq!(rays[0].hit, Some(ShipId(2)));
        assert_eq!(ships[&ShipId(2)].damage.died_on_frame, Some(9));
    }

    #[test]
    fn when_autofire_target_is_unseen_or_out_of_range_then_beam_holds() {
        let mut ships = duel(0);
        let far = visible(&ships[&ShipId(2)], 5000);
        let shooter = ships.get_mut(&ShipId(1)).unwrap();
        shooter.ebeam.firing = false;
        shooter.ebeam.set_autofire(true);

        let mut rays = Vec::new();
        let mut events = FrameEvents::default();
        fire_ebeams(&mut ships, BOUNDS, 12, 9, &mut rays, &mut events);
        assert!(rays.is_empty());

        ships
            .get_mut(&ShipId(1))
            .unwrap()
            .scanner
            .readings
            .ships
            .insert(ShipId(2), far);
        fire_ebeams(&mut ships, BOUNDS, 12, 10, &mut rays, &mut events);
        assert!(rays.is_empty());
        assert!(ships[&ShipId(1)].ebeam.autofire);
        assert!(ships[&ShipId(2)].is_alive());
    }

    #[test]
    fn when_two_ships_share_the_ray_then_only_the_nearest_dies() {
        let mut ships = duel(0);
        ships.insert(ShipId(3), test_ship(3, Point::new(1000, 3000), 10));
        let mut rays = Vec::new();
        let mut events = FrameEvents::default();
        fire_ebeams(&mut ships, BOUNDS, 12, 1, &mut rays, &mut events);
        assert!(ships[&ShipId(2)].is_alive());
        assert!(!ships[&ShipId(3)].is_alive());
    }

    #[test]
    fn when_ship_leaves_map_or_hits_station_then_it_explodes() {
        let map = GameMap::from_spec(
            MapSpec {
                name: "m".to_string(),
                meters_x: 1000,
                meters_y: 1000,
                units_per_meter: Some(10),
                spawn_points: vec![],
                space_stations: vec![FeatureSpec {
                    id: "st".to_string(),
                    name: "St".to_string(),
                    position_m: (500, 500),
                    service_radius_m: 100.0,
                    collision_radius_m: 20.0,
                }],
                mining_locations: vec![],
            },
            100,
        )
        .unwrap();
        let mut ships = BTreeMap::new();
        ships.insert(ShipId(1), test_ship(1, Point::new(-5, 100), 10));
        ships.insert(ShipId(2), test_ship(2, Point::new(5100, 5000), 10));
        ships.insert(ShipId(3), test_ship(3, Point::new(5300, 5000), 10));
        let mut events = FrameEvents::default();
        resolve_collisions(&mut ships, &map, 3, &mut events);

        assert!(ships[&ShipId(1)].damage.is_exploded());
        assert!(ships[&ShipId(2)].damage.is_exploded());
        assert!(ships[&ShipId(3)].is_alive());
        assert_eq!(events.kills[0].cause, KillCause::MapBoundary);
        assert_eq!(events.kills[1].cause, KillCause::StationCollision);
        // Full tank makes for the larger blast.
        assert_eq!(events.blasts[0].radius_m, 100.0);
    }

    #[test]
    fn when_mine_is_launched_then_it_leaves_the_nose_and_ship_recoils() {
        let mut ships = BTreeMap::new();
        let mut ship = test_ship(1, Point::new(1000, 1000), 10);
        ship.set_heading(90);
        ship.tubes
            .launch(MunitionKind::MagnetMine, 10, &ship.tuning.tubes)
            .unwrap();
        ships.insert(ShipId(1), ship);
        let mut munitions = Munitions::default();
        let mut next_id = 1;

        launch_munitions(
            &mut ships,
            &mut munitions,
            &mut next_id,
            &MunitionTuning::default(),
            10,
            4,
        );

        let mine = &munitions.magnet_mines[&MunitionId(1)];
        assert_eq!(mine.motion.position(), Point::new(1060, 1000));
        assert!((mine.motion.velocity.0 - 10.0).abs() < 1e-9);
        let ship = &ships[&ShipId(1)];
        assert!((ship.velocity.0 + 10.0).abs() < 1e-9);
        assert_eq!(ship.tubes.magnet_mines, 1);
        assert_eq!(ship.tubes.last_fire_frame, Some(4));
        assert_eq!(next_id, 2);
    }

    #[test]
    fn when_tubes_are_recoilless_then_launch_leaves_ship_velocity_alone() {
        let mut ships = BTreeMap::new();
        let mut ship = test_ship(1, Point::new(1000, 1000), 10);
        ship.set_heading(90);
        ship.tuning.tubes.recoilless = true;
        ship.tubes
            .launch(MunitionKind::Emp, 10, &ship.tuning.tubes)
            .unwrap();
        ships.insert(ShipId(1), ship);
        let mut munitions = Munitions::default();
        let mut next_id = 1;

        launch_munitions(
            &mut ships,
            &mut munitions,
            &mut next_id,
            &MunitionTuning::default(),
            10,
            4,
        );

        assert!(munitions.emps.contains_key(&MunitionId(1)));
        assert_eq!(ships[&ShipId(1)].velocity, (0.0, 0.0));
    }
}
