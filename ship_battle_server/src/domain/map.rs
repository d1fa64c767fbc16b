// Static map features. Authored in meters, simulated in map units.

use super::errors::GameError;
use super::geometry::{MapBounds, Point};
use super::ids::FeatureId;
use std::collections::BTreeSet;

/// Map definition as authored, all distances in meters.
#[derive(Debug, Clone, PartialEq)]
pub struct MapSpec {
    pub name: String,
    pub meters_x: i64,
    pub meters_y: i64,

    /// Falls back to the game default when absent.
    pub units_per_meter: Option<i64>,

    pub spawn_points: Vec<(i64, i64)>,
    pub space_stations: Vec<FeatureSpec>,
    pub mining_locations: Vec<MiningLocationSpec>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct FeatureSpec {
    pub id: FeatureId,
    pub name: String,
    pub position_m: (i64, i64),
    pub service_radius_m: f64,
    pub collision_radius_m: f64,
}

#[derive(Debug, Clone, PartialEq)]
pub struct MiningLocationSpec {
    pub feature: FeatureSpec,
    pub starting_ore_kg: f64,
}

/// A fixed, circular map feature in map units.
#[derive(Debug, Clone, PartialEq)]
pub struct MapFeature {
    pub id: FeatureId,
    pub name: String,
    pub position: Point,

    /// Parking/docking range.
    pub service_radius: f64,

    /// Anything closer than this is a fatal collision.
    pub collision_radius: f64,
}

#[derive(Debug, Clone, PartialEq)]
pub struct OreMine {
    pub feature: MapFeature,
    pub starting_ore_kg: f64,
}

/// Map converted into simulation units. Immutable once loaded.
#[derive(Debug, Clone, PartialEq)]
pub struct GameMap {
    pub name: String,
    pub units_per_meter: i64,
    pub bounds: MapBounds,
    pub spawn_points: Vec<Point>,
    pub space_stations: Vec<MapFeature>,
    pub ore_mines: Vec<OreMine>,
}

impl GameMap {
    /// Validates `spec` and converts every coordinate to map units.
    pub fn from_spec(spec: MapSpec, default_units_per_meter: i64) -> Result<Self, GameError> {
        let upm = spec.units_per_meter.unwrap_or(default_units_per_meter);
        if upm <= 0 {
            return Err(GameError::InvalidMap(format!(
                "units per meter must be positive, got {upm}"
            )));
        }
        if spec.meters_x <= 0 || spec.meters_y <= 0 {
            return Err(GameError::InvalidMap(format!(
                "map extent must be positive, got {}x{} meters",
                spec.meters_x, spec.meters_y
            )));
        }

        let bounds = MapBounds {
            x_max: spec.meters_x * upm,
            y_max: spec.meters_y * upm,
        };
        let to_units = |(x, y): (i64, i64)| Point::new(x * upm, y * upm);

        let mut spawn_points = Vec::with_capacity(spec.spawn_points.len());
        for (i, p) in spec.spawn_points.iter().enumerate() {
            let point = to_units(*p);
            if !bounds.contains(point) {
                return Err(GameError::InvalidMap(format!(
                    "spawn point {i} at {p:?} is outside the map"
                )));
            }
            if spawn_points.contains(&point) {
                return Err(GameError::InvalidMap(format!(
                    "spawn point {i} at {p:?} overlaps another spawn point"
                )));
            }
            spawn_points.push(point);
        }

        let mut seen = BTreeSet::new();
        let mut convert = |f: FeatureSpec| -> Result<MapFeature, GameError> {
            if !seen.insert(f.id.clone()) {
                return Err(GameError::InvalidMap(format!(
                    "duplicate feature id {}",
                    f.id
                )));
            }
            if f.service_radius_m < 0.0 || f.collision_radius_m < 0.0 {
                return Err(GameError::InvalidMap(format!(
                    "feature {} has a negative radius",
                    f.id
                )));
            }
            Ok(MapFeature {
                id: f.id,
                name: f.name,
                position: to_units(f.position_m),
                service_radius: f.service_radius_m * upm as f64,
                collision_radius: f.collision_radius_m * upm as f64,
            })
        };

        let space_stations = spec
            .space_stations
            .into_iter()
            .map(&mut convert)
            .collect::<Result<Vec<_>, _>>()?;
        let ore_mines = spec
            .mining_locations
            .into_iter()
            .map(|m| {
                Ok(OreMine {
                    feature: convert(m.feature)?,
                    starting_ore_kg: m.starting_ore_kg.max(0.0),
                })
            })
            .collect::<Result<Vec<_>, GameError>>()?;

        Ok(Self {
            name: spec.name,
            units_per_meter: upm,
            bounds,
            spawn_points,
            space_stations,
            ore_mines,
        })
    }

    /// Position of a station or ore mine by id.
    pub fn feature_position(&self, id: &str) -> Option<Point> {
        self.space_stations
            .iter()
            .chain(self.ore_mines.iter().map(|m| &m.feature))
            .find(|f| f.id == id)
            .map(|f| f.position)
    }

    pub fn ore_mine(&self, id: &str) -> Option<&OreMine> {
        self.ore_mines.iter().find(|m| m.feature.id == id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn feature(id: &str, x: i64, y: i64) -> FeatureSpec {
        FeatureSpec {
            id: id.to_string(),
            name: id.to_uppercase(),
            position_m: (x, y),
            service_radius_m: 50.0,
            collision_radius_m: 10.0,
        }
    }

    fn spec() -> MapSpec {
        MapSpec {
            name: "belt".to_string(),
            meters_x: 1000,
            meters_y: 800,
            units_per_meter: None,
            spawn_points: vec![(100, 100), (900, 700)],
            space_stations: vec![feature("st-1", 500, 400)],
            mining_locations: vec![MiningLocationSpec {
                feature: feature("mine-1", 200, 600),
                starting_ore_kg: 5000.0,
            }],
        }
    }

    #[test]
    fn when_map_loads_then_meters_become_map_units() {
        let map = GameMap::from_spec(spec(), 100).unwrap();
        assert_eq!(map.bounds, MapBounds { x_max: 100_000, y_max: 80_000 });
        assert_eq!(map.spawn_points[1], Point::new(90_000, 70_000));
        assert_eq!(map.space_stations[0].service_radius, 5000.0);
        assert_eq!(map.space_stations[0].collision_radius, 1000.0);
        assert_eq!(map.feature_position("mine-1"), Some(Point::new(20_000, 60_000)));
        assert_eq!(map.feature_position("nope"), None);
    }

    #[test]
    fn when_scale_is_given_then_it_overrides_default() {
        let mut s = spec();
        s.units_per_meter = Some(10);
        let map = GameMap::from_spec(s, 100).unwrap();
        assert_eq!(map.units_per_meter, 10);
        assert_eq!(map.bounds.x_max, 10_000);
    }

    #[test]
    fn when_spawn_point_is_outside_then_map_is_rejected() {
        let mut s = spec();
        s.spawn_points.push((1001, 5));
        assert!(matches!(GameMap::from_spec(s, 100), Err(GameError::InvalidMap(_))));
    }

    #[test]
    fn when_feature_ids_collide_then_map_is_rejected() {
        let mut s = spec();
        s.space_stations.push(feature("mine-1", 10, 10));
        assert!(matches!(GameMap::from_spec(s, 100), Err(GameError::InvalidMap(_))));
    }
}
