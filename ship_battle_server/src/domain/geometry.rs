// 2D geometry kernel: headings, vectors, rotation and ray casts.
//
// Headings are degrees clockwise from north on a Y-up grid. 360 is the same as 0.

use std::fmt;

/// Integer position in map units.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, PartialOrd, Ord)]
pub struct Point {
    pub x: i64,
    pub y: i64,
}

impl Point {
    pub const ORIGIN: Point = Point { x: 0, y: 0 };

    pub const fn new(x: i64, y: i64) -> Self {
        Self { x, y }
    }

    pub fn offset(self, other: Point) -> Point {
        Point::new(self.x + other.x, self.y + other.y)
    }
}

/// Inclusive extent of the playable area. The lower bound is always (0, 0).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MapBounds {
    pub x_max: i64,
    pub y_max: i64,
}

impl MapBounds {
    pub fn contains(&self, p: Point) -> bool {
        p.x >= 0 && p.y >= 0 && p.x <= self.x_max && p.y <= self.y_max
    }

    pub fn contains_f64(&self, x: f64, y: f64) -> bool {
        x >= 0.0 && y >= 0.0 && x <= self.x_max as f64 && y <= self.y_max as f64
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum GeometryError {
    /// Heading outside `[0, 360]`.
    HeadingOutOfRange(f64),
}

impl fmt::Display for GeometryError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            GeometryError::HeadingOutOfRange(h) => write!(f, "heading {h} is outside 0..=360"),
        }
    }
}

impl std::error::Error for GeometryError {}

/// Rotates `point` around `origin` clockwise by `radians` and rounds to map units.
pub fn rotate(origin: Point, point: Point, radians: f64) -> Point {
    // Headings grow clockwise, so negate to reuse the standard counter-clockwise matrix.
    let angle = -radians;
    let (sin, cos) = angle.sin_cos();
    let dx = (point.x - origin.x) as f64;
    let dy = (point.y - origin.y) as f64;
    Point::new(
        origin.x + (cos * dx - sin * dy).round() as i64,
        origin.y + (sin * dx + cos * dy).round() as i64,
    )
}

/// Splits a magnitude along a heading into `(x, y)` components.
pub fn heading_to_vector(magnitude: f64, heading: f64) -> (f64, f64) {
    if magnitude == 0.0 {
        return (0.0, 0.0);
    }
    let (sin, cos) = heading.to_radians().sin_cos();
    (magnitude * sin, magnitude * cos)
}

/// Inverse of [`heading_to_vector`]. Heading is rounded to whole degrees; a zero
/// vector has heading 0.
pub fn resultant_vector(x: f64, y: f64) -> (f64, i32) {
    if x == 0.0 && y == 0.0 {
        return (0.0, 0);
    }
    let magnitude = x.hypot(y);
    (magnitude, round_heading(unrounded_heading(x, y)))
}

/// Heading from `from` to `to`, rounded to whole degrees. Identical points yield 0.
pub fn heading_to_point(from: Point, to: Point) -> i32 {
    if from == to {
        return 0;
    }
    round_heading(unrounded_heading(
        (to.x - from.x) as f64,
        (to.y - from.y) as f64,
    ))
}

/// Unrounded heading between two float positions.
pub fn heading_between(from: (f64, f64), to: (f64, f64)) -> f64 {
    let dx = to.0 - from.0;
    let dy = to.1 - from.1;
    if dx == 0.0 && dy == 0.0 {
        return 0.0;
    }
    unrounded_heading(dx, dy)
}

fn unrounded_heading(x: f64, y: f64) -> f64 {
    x.atan2(y).to_degrees().rem_euclid(360.0)
}

fn round_heading(heading: f64) -> i32 {
    (heading.round() as i32).rem_euclid(360)
}

/// Moves `point` `distance` map units along `heading`, rounding the result.
pub fn translate_point(point: Point, heading: f64, distance: f64) -> Point {
    let (dx, dy) = heading_to_vector(distance, heading);
    Point::new(
        (point.x as f64 + dx).round() as i64,
        (point.y as f64 + dy).round() as i64,
    )
}

pub fn point_distance(a: Point, b: Point) -> f64 {
    ((b.x - a.x) as f64).hypot((b.y - a.y) as f64)
}

pub fn distance_f64(a: (f64, f64), b: (f64, f64)) -> f64 {
    (b.0 - a.0).hypot(b.1 - a.1)
}

/// Returns the opposite heading. Fails for input outside `[0, 360]`.
pub fn invert_heading(heading: f64) -> Result<f64, GeometryError> {
    if !(0.0..=360.0).contains(&heading) {
        return Err(GeometryError::HeadingOutOfRange(heading));
    }
    if heading >= 180.0 {
        Ok(heading - 180.0)
    } else {
        Ok(heading + 180.0)
    }
}

/// Opposite of a whole-degree heading, always in `[0, 360)`.
pub fn opposite_heading(heading: i32) -> i32 {
    (heading + 180).rem_euclid(360)
}

/// Maps a heading in `[0, 360)` to the signed rotation from zero in `(-180, 180]`.
pub fn delta_heading_from_zero(heading: i32) -> i32 {
    if heading <= 180 { heading } else { heading - 360 }
}

pub fn signed_angle_to_unsigned(angle: i32) -> i32 {
    angle.rem_euclid(360)
}

/// Smallest absolute angle between two headings, in `[0, 180]`.
pub fn delta_degrees(a: f64, b: f64) -> f64 {
    let diff = (a - b).rem_euclid(360.0);
    if diff > 180.0 { 360.0 - diff } else { diff }
}

/// Casts a ray from `origin` along `heading` to the edge of `bounds` and reports
/// whether it crosses any edge of the closed polyline `hitbox`.
pub fn hitbox_ray_intersect(
    origin: Point,
    heading: i32,
    bounds: MapBounds,
    hitbox: &[Point],
) -> bool {
    if hitbox.len() < 2 {
        return false;
    }

    let heading = signed_angle_to_unsigned(heading);
    let (min_x, max_x, min_y, max_y) = bounding_box(hitbox);
    match heading {
        0 => min_x <= origin.x && origin.x <= max_x && max_y >= origin.y,
        90 => min_y <= origin.y && origin.y <= max_y && max_x >= origin.x,
        180 => min_x <= origin.x && origin.x <= max_x && min_y <= origin.y,
        270 => min_y <= origin.y && origin.y <= max_y && min_x <= origin.x,
        _ => {
            let start = (origin.x as f64, origin.y as f64);
            let end = ray_end_point(start, heading as f64, bounds);
            hitbox_edges(hitbox).any(|(a, b)| {
                segments_intersect(
                    start,
                    end,
                    (a.x as f64, a.y as f64),
                    (b.x as f64, b.y as f64),
                )
            })
        }
    }
}

/// Whether `heading` from `origin` passes strictly between the outermost
/// bearings to the hitbox corners. Spans straddling north are unwrapped first.
pub fn heading_within_hitbox(origin: Point, heading: f64, hitbox: &[Point]) -> bool {
    if hitbox.is_empty() {
        return false;
    }
    let from = (origin.x as f64, origin.y as f64);
    let bearings: Vec<f64> = hitbox
        .iter()
        .map(|p| heading_between(from, (p.x as f64, p.y as f64)))
        .collect();
    let (low, high) = bearing_span(bearings.iter().copied());
    if high - low < 180.0 {
        return low < heading && heading < high;
    }
    let unwrap = |b: f64| if b < 180.0 { b + 360.0 } else { b };
    let (low, high) = bearing_span(bearings.into_iter().map(unwrap));
    let heading = unwrap(heading);
    low < heading && heading < high
}

fn bearing_span(bearings: impl Iterator<Item = f64>) -> (f64, f64) {
    bearings.fold((f64::INFINITY, f64::NEG_INFINITY), |(low, high), b| {
        (low.min(b), high.max(b))
    })
}

fn bounding_box(points: &[Point]) -> (i64, i64, i64, i64) {
    points.iter().fold(
        (i64::MAX, i64::MIN, i64::MAX, i64::MIN),
        |(min_x, max_x, min_y, max_y), p| {
            (min_x.min(p.x), max_x.max(p.x), min_y.min(p.y), max_y.max(p.y))
        },
    )
}

fn hitbox_edges(hitbox: &[Point]) -> impl Iterator<Item = (Point, Point)> + '_ {
    hitbox
        .iter()
        .zip(hitbox.iter().cycle().skip(1))
        .map(|(a, b)| (*a, *b))
}

// Walks the slope out of the origin until the first boundary it meets.
fn ray_end_point(start: (f64, f64), heading: f64, bounds: MapBounds) -> (f64, f64) {
    let (dx, dy) = heading_to_vector(1.0, heading);
    let t_x = if dx > 0.0 {
        (bounds.x_max as f64 - start.0) / dx
    } else if dx < 0.0 {
        -start.0 / dx
    } else {
        f64::INFINITY
    };
    let t_y = if dy > 0.0 {
        (bounds.y_max as f64 - start.1) / dy
    } else if dy < 0.0 {
        -start.1 / dy
    } else {
        f64::INFINITY
    };
    let t = t_x.min(t_y).max(0.0);
    (start.0 + dx * t, start.1 + dy * t)
}

fn ccw(a: (f64, f64), b: (f64, f64), c: (f64, f64)) -> bool {
    (c.1 - a.1) * (b.0 - a.0) > (b.1 - a.1) * (c.0 - a.0)
}

/// Segment/segment intersection using point orientation.
pub fn segments_intersect(a: (f64, f64), b: (f64, f64), c: (f64, f64), d: (f64, f64)) -> bool {
    ccw(a, c, d) != ccw(b, c, d) && ccw(a, b, c) != ccw(a, b, d)
}
