use crate::domain::geometry::{Point, delta_heading_from_zero, rotate};

/// Kite-shaped hull outline relative to the ship's center.
///
/// The heading-zero points are fixed at construction; the rotated points are
/// recomputed from them on every heading change so rounding never accumulates.
#[derive(Debug, Clone, PartialEq)]
pub struct Hull {
    fixed: HullPoints,
    rotated: HullPoints,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct HullPoints {
    pub nose: Point,
    pub bottom_left: Point,
    pub bottom_right: Point,
    pub bottom_center: Point,
    pub fin_left: [Point; 2],
    pub fin_right: [Point; 2],
}

impl Hull {
    /// `width` and `length` in map units.
    pub fn new(width: i64, length: i64) -> Self {
        let half_w = width / 2;
        let half_l = length / 2;
        let shoulder_y = -half_l + length / 8;
        let fixed = HullPoints {
            nose: Point::new(0, half_l),
            bottom_left: Point::new(-half_w, shoulder_y),
            bottom_right: Point::new(half_w, shoulder_y),
            bottom_center: Point::new(0, -half_l),
            fin_left: [
                Point::new(-half_w, shoulder_y),
                Point::new(-half_w - width / 4, -half_l),
            ],
            fin_right: [
                Point::new(half_w, shoulder_y),
                Point::new(half_w + width / 4, -half_l),
            ],
        };
        Self {
            fixed,
            rotated: fixed,
        }
    }

    pub fn points(&self) -> &HullPoints {
        &self.rotated
    }

    pub fn set_heading(&mut self, heading: i32) {
        let radians = (delta_heading_from_zero(heading) as f64).to_radians();
        let r = |p: Point| rotate(Point::ORIGIN, p, radians);
        let f = &self.fixed;
        self.rotated = HullPoints {
            nose: r(f.nose),
            bottom_left: r(f.bottom_left),
            bottom_right: r(f.bottom_right),
            bottom_center: r(f.bottom_center),
            fin_left: [r(f.fin_left[0]), r(f.fin_left[1])],
            fin_right: [r(f.fin_right[0]), r(f.fin_right[1])],
        };
    }

    /// Closed outline in map coordinates: nose, bottom left, bottom center,
    /// bottom right.
    pub fn outline_at(&self, position: Point) -> [Point; 4] {
        let p = &self.rotated;
        [
            position.offset(p.nose),
            position.offset(p.bottom_left),
            position.offset(p.bottom_center),
            position.offset(p.bottom_right),
        ]
    }

    pub fn nose_at(&self, position: Point) -> Point {
        position.offset(self.rotated.nose)
    }
}
