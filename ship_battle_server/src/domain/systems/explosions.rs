use super::weapons::meters_between;
use super::{EmpBlastSpec, FrameEvents};
use crate::domain::effects::{BlastSpec, Effects, EmpBlast, Explosion, Shockwave};
use crate::domain::geometry::heading_between;
use crate::domain::ids::ShipId;
use crate::domain::killfeed::KillCause;
use crate::domain::ship::Ship;
use crate::domain::tuning::GameTuning;
use std::collections::BTreeMap;

/// Turns this tick's blast requests into an explosion plus a shockwave each.
pub fn register_blasts(
    effects: &mut Effects,
    blasts: &[BlastSpec],
    emp_blasts: &[EmpBlastSpec],
    next_id: &mut u64,
) {
    for spec in blasts {
        effects.explosions.push(Explosion::new(take_id(next_id), *spec));
        effects
            .shockwaves
            .push(Shockwave::new(take_id(next_id), spec.origin, spec.radius_m));
    }
    for spec in emp_blasts {
        effects
            .emp_blasts
            .push(EmpBlast::new(take_id(next_id), spec.origin, spec.radius_m));
    }
}

fn take_id(next_id: &mut u64) -> u64 {
    let id = *next_id;
    *next_id += 1;
    id
}

/// Ages explosions and EMP blasts. A finished ship explosion takes the wreck
/// off the map.
pub fn advance_explosions(effects: &mut Effects, ships: &mut BTreeMap<ShipId, Ship>, fps: u32) {
    let step = 1000.0 / fps.max(1) as f64;
    for explosion in &mut effects.explosions {
        explosion.elapsed_ms += step;
    }
    effects.explosions.retain(|explosion| {
        if !explosion.is_finished() {
            return true;
        }
        if let Some(ship) = explosion.ship_id.and_then(|id| ships.get_mut(&id)) {
            ship.damage.removed_from_map = true;
        }
        false
    });

    for blast in &mut effects.emp_blasts {
        blast.elapsed_ms += step;
    }
    effects.emp_blasts.retain(|blast| !blast.is_finished());
}

/// Expands every shockwave. Each ship is struck once per wave: pushed away
/// from the origin, and killed if the ring is still inside its lethal radius.
/// Exploded wrecks and ships held by a station are unaffected.
pub fn advance_shockwaves(
    effects: &mut Effects,
    ships: &mut BTreeMap<ShipId, Ship>,
    tuning: &GameTuning,
    units_per_meter: i64,
    fps: u32,
    frame: u64,
    events: &mut FrameEvents,
) {
    let growth_m = tuning.speed_of_sound_mps / fps.max(1) as f64;
    for wave in &mut effects.shockwaves {
        wave.radius_m += growth_m;
        let lethal = wave.radius_m <= wave.lethal_radius_m;

        for ship in ships.values_mut() {
            if wave.hit.contains(&ship.id)
                || ship.damage.is_exploded()
                || ship.docked_at.is_some()
                || ship.docking_at.is_some()
            {
                continue;
            }
            let distance_m = meters_between(wave.origin, ship.position, units_per_meter);
            if distance_m > wave.radius_m {
                continue;
            }
            wave.hit.insert(ship.id);
            if lethal && ship.die(frame) {
                events.kill(ship.id, KillCause::Shockwave);
            }
            let heading = heading_between(
                (wave.origin.x as f64, wave.origin.y as f64),
                (ship.position.x as f64, ship.position.y as f64),
            );
            ship.push(heading, shockwave_delta_v(tuning, distance_m));
        }
    }
    effects
        .shockwaves
        .retain(|wave| wave.radius_m <= tuning.shockwave_max_radius_m);
}

/// Push felt at `distance_m` from the blast center. Falls off quadratically.
fn shockwave_delta_v(tuning: &GameTuning, distance_m: f64) -> f64 {
    (tuning.shockwave_delta_v_coef * distance_m.powi(2) + tuning.shockwave_max_delta_v_mps).max(0.0)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::geometry::Point;
    use crate::domain::ship::tests::test_ship;

    #[test]
    fn when_blast_is_registered_then_it_brings_a_shockwave() {
        let mut effects = Effects::default();
        let mut next_id = 1;
        let spec = BlastSpec::ship(ShipId(3), Point::new(100, 100), false);
        register_blasts(&mut effects, &[spec], &[], &mut next_id);

        assert_eq!(effects.explosions.len(), 1);
        assert_eq!(effects.shockwaves.len(), 1);
        assert_eq!(effects.shockwaves[0].lethal_radius_m, 65.0);
        assert_eq!(effects.shockwaves[0].radius_m, 1.0);
        assert_eq!(next_id, 3);
    }

    #[test]
    fn when_ship_explosion_finishes_then_wreck_leaves_the_map() {
        let mut ships = BTreeMap::new();
        ships.insert(ShipId(3), test_ship(3, Point::new(100, 100), 10));
        let mut effects = Effects::default();
        let mut next_id = 1;
        let spec = BlastSpec::ship(ShipId(3), Point::new(100, 100), false);
        register_blasts(&mut effects, &[spec], &[], &mut next_id);

        // 1500 ms flame plus 4500 ms fade at one second per tick.
        for _ in 0..5 {
            advance_explosions(&mut effects, &mut ships, 1);
        }
        assert_eq!(effects.explosions.len(), 1);
        assert!(!ships[&ShipId(3)].damage.removed_from_map);

        advance_explosions(&mut effects, &mut ships, 1);
        assert!(effects.explosions.is_empty());
        assert!(ships[&ShipId(3)].damage.removed_from_map);
    }

    #[test]
    fn when_ring_passes_close_ships_then_they_die_and_far_ships_are_pushed() {
        let mut ships = BTreeMap::new();
        ships.insert(ShipId(1), test_ship(1, Point::new(0, 300), 10));
        ships.insert(ShipId(2), test_ship(2, Point::new(0, 2000), 10));
        let mut effects = Effects::default();
        effects
            .shockwaves
            .push(Shockwave::new(1, Point::new(0, 0), 65.0));
        let tuning = GameTuning::default();
        let mut events = FrameEvents::default();

        for frame in 0..20 {
            advance_shockwaves(&mut effects, &mut ships, &tuning, 10, 30, frame, &mut events);
        }

        assert!(!ships[&ShipId(1)].is_alive());
        assert_eq!(events.kills.len(), 1);
        assert_eq!(events.kills[0].cause, KillCause::Shockwave);
        let far = &ships[&ShipId(2)];
        assert!(far.is_alive());
        assert!(far.velocity.1 > 0.0);
        assert!(far.velocity.1 < 30.0);
        assert_eq!(effects.shockwaves[0].hit.len(), 2);
    }

    #[test]
    fn when_ship_is_docking_then_the_wave_passes_it_by() {
        let mut ships = BTreeMap::new();
        let mut ship = test_ship(1, Point::new(0, 100), 10);
        ship.docking_at = Some("st".to_string());
        ships.insert(ShipId(1), ship);
        let mut effects = Effects::default();
        effects
            .shockwaves
            .push(Shockwave::new(1, Point::new(0, 0), 65.0));
        let mut events = FrameEvents::default();

        advance_shockwaves(&mut effects, &mut ships, &GameTuning::default(), 10, 30, 1, &mut events);
        assert!(ships[&ShipId(1)].is_alive());
        assert_eq!(ships[&ShipId(1)].velocity, (0.0, 0.0));
    }

    #[test]
    fn when_wave_catches_a_ship_then_push_depends_on_the_ship_distance() {
        let mut ships = BTreeMap::new();
        ships.insert(ShipId(1), test_ship(1, Point::new(0, 10_000), 10));
        let mut effects = Effects::default();
        let mut wave = Shockwave::new(1, Point::new(0, 0), 65.0);
        // Ring already well past the ship when it is first checked.
        wave.radius_m = 1980.0;
        effects.shockwaves.push(wave);
        let tuning = GameTuning::default();
        let mut events = FrameEvents::default();

        advance_shockwaves(&mut effects, &mut ships, &tuning, 10, 30, 1, &mut events);

        let expected = shockwave_delta_v(&tuning, 1000.0);
        let pushed = ships[&ShipId(1)].velocity.1;
        assert!((pushed - expected).abs() < 1e-9, "{pushed} != {expected}");
        assert!(pushed > shockwave_delta_v(&tuning, 2000.0));
    }

    #[test]
    fn when_wave_outgrows_its_reach_then_it_is_dropped() {
        let mut ships = BTreeMap::new();
        let mut effects = Effects::default();
        effects
            .shockwaves
            .push(Shockwave::new(1, Point::new(0, 0), 65.0));
        let mut events = FrameEvents::default();
        for frame in 0..7 {
            advance_shockwaves(&mut effects, &mut ships, &GameTuning::default(), 10, 1, frame, &mut events);
        }
        assert!(effects.shockwaves.is_empty());
    }
}
