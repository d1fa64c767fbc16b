// Per-frame memo of pairwise distances and headings between map points.

use super::geometry::{Point, heading_between, invert_heading, point_distance};
use std::collections::HashMap;

/// Symmetric cache keyed by point pairs. Cleared at the start of every frame.
#[derive(Debug, Default)]
pub struct CoordCache {
    distances: HashMap<(Point, Point), f64>,
    headings: HashMap<(Point, Point), f64>,
}

impl CoordCache {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn clear(&mut self) {
        self.distances.clear();
        self.headings.clear();
    }

    /// Distance between two points, stored for both orderings on first use.
    pub fn distance(&mut self, a: Point, b: Point) -> f64 {
        if let Some(d) = self.distances.get(&(a, b)) {
            return *d;
        }
        let d = point_distance(a, b);
        self.distances.insert((a, b), d);
        self.distances.insert((b, a), d);
        d
    }

    /// Unrounded heading from `a` to `b`. The reverse key gets the inverted heading.
    pub fn heading(&mut self, a: Point, b: Point) -> f64 {
        if let Some(h) = self.headings.get(&(a, b)) {
            return *h;
        }
        let h = heading_between((a.x as f64, a.y as f64), (b.x as f64, b.y as f64));
        self.headings.insert((a, b), h);
        if a != b {
            if let Ok(reverse) = invert_heading(h) {
                self.headings.insert((b, a), reverse);
            }
        }
        h
    }

    pub fn len(&self) -> usize {
        self.distances.len()
    }

    pub fn is_empty(&self) -> bool {
        self.distances.is_empty() && self.headings.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn when_distance_is_cached_then_reverse_order_hits_same_entry() {
        let mut cache = CoordCache::new();
        let a = Point::new(0, 0);
        let b = Point::new(300, 400);
        assert_eq!(cache.distance(a, b), 500.0);
        assert_eq!(cache.len(), 2);
        assert_eq!(cache.distance(b, a), 500.0);
        assert_eq!(cache.len(), 2);
    }

    #[test]
    fn when_heading_is_cached_then_reverse_is_inverted() {
        let mut cache = CoordCache::new();
        let a = Point::new(10, 10);
        let b = Point::new(-3, 22);
        let forward = cache.heading(a, b);
        assert_eq!(forward.round(), 313.0);
        let reverse = cache.heading(b, a);
        assert_eq!(Ok(reverse), invert_heading(forward));
        assert_eq!(reverse.round(), 133.0);
    }

    #[test]
    fn when_cleared_then_cache_is_empty() {
        let mut cache = CoordCache::new();
        cache.distance(Point::new(1, 1), Point::new(2, 2));
        cache.heading(Point::new(1, 1), Point::new(2, 2));
        cache.clear();
        assert!(cache.is_empty());
    }
}
