// Munition arming, tracking and detonation.

use super::weapons::meters_between;
use super::{EmpBlastSpec, FrameEvents};
use crate::domain::effects::BlastSpec;
use crate::domain::geometry::{
    Point, heading_between, heading_to_vector, opposite_heading, resultant_vector,
};
use crate::domain::ids::{MunitionId, ShipId};
use crate::domain::killfeed::KillCause;
use crate::domain::munitions::{Ballistics, Munitions, PatrolTurn};
use crate::domain::ship::Ship;
use crate::domain::tuning::{EmpTuning, HunterDroneTuning, MagnetMineTuning};
use std::collections::BTreeMap;
use tracing::debug;

/// Shared world view for a munition pass.
pub struct MunitionWorld<'a> {
    pub ships: &'a mut BTreeMap<ShipId, Ship>,
    pub units_per_meter: i64,
    pub fps: u32,
    pub frame: u64,
}

impl MunitionWorld<'_> {
    /// Nearest living ship matching `filter`, with its distance in meters.
    fn nearest(&self, from: Point, filter: impl Fn(&Ship) -> bool) -> Option<(ShipId, f64)> {
        self.ships
            .values()
            .filter(|s| s.is_alive() && filter(s))
            .map(|s| (s.id, meters_between(from, s.position, self.units_per_meter)))
            .min_by(|a, b| a.1.total_cmp(&b.1).then(a.0.cmp(&b.0)))
    }

    /// Kills every living ship within `radius_m` of `origin`.
    fn kill_within(&mut self, origin: Point, radius_m: f64, cause: KillCause, events: &mut FrameEvents) {
        let upm = self.units_per_meter;
        for ship in self.ships.values_mut() {
            if ship.is_alive()
                && meters_between(origin, ship.position, upm) <= radius_m
                && ship.die(self.frame)
            {
                events.kill(ship.id, cause);
            }
        }
    }

    /// Accelerates `motion` along `heading` for one tick.
    fn thrust(&self, motion: &mut Ballistics, heading: f64, acceleration_mps2: f64) {
        let (dx, dy) = heading_to_vector(acceleration_mps2 / self.fps.max(1) as f64, heading);
        motion.velocity.0 += dx;
        motion.velocity.1 += dy;
    }
}

pub fn advance_magnet_mines(
    world: &mut MunitionWorld<'_>,
    munitions: &mut Munitions,
    tuning: &MagnetMineTuning,
    events: &mut FrameEvents,
) {
    let mut detonated: Vec<MunitionId> = Vec::new();
    for mine in munitions.magnet_mines.values_mut() {
        mine.motion.age(world.fps);
        mine.armed = mine.motion.elapsed_ms > tuning.arming_ms;

        let position = mine.motion.position();
        let mut explode = false;
        if mine.armed {
            let closest = world.nearest(position, |_| true);
            mine.closest_ship = closest.map(|(id, _)| id);
            mine.distance_to_closest_m = closest.map(|(_, d)| d);
            if closest.is_some_and(|(_, d)| d <= tuning.trigger_radius_m) {
                explode = true;
            }
        }
        if mine.motion.elapsed_ms > tuning.max_life_ms {
            explode = true;
        }

        if explode {
            mine.exploded = true;
            events.blasts.push(BlastSpec {
                origin: position,
                radius_m: tuning.damage_radius_m * 1.1,
                flame_ms: 1200.0,
                fade_ms: 2000.0,
                ship_id: None,
            });
            world.kill_within(position, tuning.damage_radius_m, KillCause::MagnetMine, events);
            debug!(munition = %mine.id, frame = world.frame, "magnet mine detonated");
            detonated.push(mine.id);
            continue;
        }

        if let Some(target) = mine.closest_ship.and_then(|id| world.ships.get(&id)) {
            let target = target.position;
            let heading = heading_between(
                (mine.motion.x, mine.motion.y),
                (target.x as f64, target.y as f64),
            );
            world.thrust(&mut mine.motion, heading, tuning.acceleration_mps2);
        }
        mine.motion.drift(world.units_per_meter, world.fps);
    }
    for id in detonated {
        munitions.magnet_mines.remove(&id);
    }
}

pub fn advance_emps(
    world: &mut MunitionWorld<'_>,
    munitions: &mut Munitions,
    tuning: &EmpTuning,
    events: &mut FrameEvents,
) {
    let mut detonated: Vec<MunitionId> = Vec::new();
    for emp in munitions.emps.values_mut() {
        emp.motion.age(world.fps);
        emp.armed = emp.motion.elapsed_ms > tuning.arming_ms;
        let position = emp.motion.position();

        let launcher = emp.launched_by;
        let proximate = emp.armed
            && world
                .nearest(position, |s| s.id != launcher)
                .is_some_and(|(_, d)| d <= tuning.trigger_radius_m);
        if !proximate && emp.motion.elapsed_ms <= tuning.max_life_ms {
            emp.motion.drift(world.units_per_meter, world.fps);
            continue;
        }

        emp.exploded = true;
        // The pulse spares nobody, launcher included.
        let upm = world.units_per_meter;
        for ship in world.ships.values_mut() {
            if meters_between(position, ship.position, upm) <= tuning.damage_radius_m {
                ship.emp(tuning.battery_drain);
            }
        }
        events.emp_blasts.push(EmpBlastSpec {
            origin: position,
            radius_m: tuning.damage_radius_m,
        });
        debug!(munition = %emp.id, frame = world.frame, "emp detonated");
        detonated.push(emp.id);
    }
    for id in detonated {
        munitions.emps.remove(&id);
    }
}

pub fn advance_hunter_drones(
    world: &mut MunitionWorld<'_>,
    munitions: &mut Munitions,
    tuning: &HunterDroneTuning,
    events: &mut FrameEvents,
) {
    let mut detonated: Vec<MunitionId> = Vec::new();
    for drone in munitions.hunter_drones.values_mut() {
        drone.motion.age(world.fps);
        if !drone.armed {
            if drone.motion.elapsed_ms > tuning.arming_ms {
                drone.armed = true;
            } else {
                drone.motion.drift(world.units_per_meter, world.fps);
                continue;
            }
        }
        let position = drone.motion.position();

        if let Some(target) = drone.target {
            if world.ships.get(&target).is_none_or(|s| !s.is_alive()) {
                drone.target = None;
            }
        }
        if drone.target.is_none() {
            let team = drone.team_id;
            let launcher = drone.launched_by;
            drone.target = world
                .nearest(position, |s| {
                    s.id != launcher && (team.is_none() || s.team_id != team)
                })
                .filter(|(_, d)| *d <= tuning.max_acquisition_m)
                .map(|(id, _)| id);
        }

        let (speed, velocity_heading) =
            resultant_vector(drone.motion.velocity.0, drone.motion.velocity.1);
        let target_pos = drone
            .target
            .and_then(|id| world.ships.get(&id))
            .map(|s| s.position);
        let heading = match target_pos {
            None => match drone.patrol {
                PatrolTurn::Clockwise => velocity_heading + 90,
                PatrolTurn::CounterClockwise => velocity_heading - 90,
            },
            Some(target) => {
                let bearing = heading_between(
                    (drone.motion.x, drone.motion.y),
                    (target.x as f64, target.y as f64),
                )
                .round() as i32;
                if speed == 0.0 {
                    bearing
                } else {
                    steer(velocity_heading, bearing)
                }
            }
        };
        drone.set_heading(heading);
        world.thrust(&mut drone.motion, drone.heading as f64, tuning.acceleration_mps2);
        drone.motion.drift(world.units_per_meter, world.fps);

        let (Some(target_id), Some(target)) = (drone.target, target_pos) else {
            continue;
        };
        let position = drone.motion.position();
        if meters_between(position, target, world.units_per_meter) > tuning.trigger_radius_m {
            continue;
        }

        drone.exploded = true;
        events.blasts.push(BlastSpec {
            origin: position,
            radius_m: tuning.damage_radius_m * 1.1,
            flame_ms: 800.0,
            fade_ms: 1400.0,
            ship_id: None,
        });
        if let Some(ship) = world.ships.get_mut(&target_id) {
            if ship.die(world.frame) {
                events.kill(target_id, KillCause::HunterDrone);
            }
        }
        world.kill_within(position, tuning.damage_radius_m, KillCause::HunterDrone, events);
        debug!(munition = %drone.id, target = %target_id, frame = world.frame, "hunter drone detonated");
        detonated.push(drone.id);
    }
    for id in detonated {
        munitions.hunter_drones.remove(&id);
    }
}

/// Chooses a thrust heading from the velocity heading and the bearing to the
/// target: burn straight at it when nearly aligned, retro-burn when flying away,
/// otherwise push sideways toward it.
fn steer(velocity_heading: i32, bearing: i32) -> i32 {
    let delta = (bearing - velocity_heading + 540).rem_euclid(360) - 180;
    if delta.abs() < 5 {
        bearing
    } else if delta.abs() > 90 {
        opposite_heading(velocity_heading)
    } else {
        velocity_heading + 90 * delta.signum()
    }
}
