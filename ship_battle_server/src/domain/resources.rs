// Bounded resource pools shared by ship subsystems (battery, fuel).

use std::fmt;

/// A spend request the pool could not cover. Nothing was debited.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Shortfall {
    pub requested: i64,
    pub available: i64,
}

impl fmt::Display for Shortfall {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "requested {} but only {} available",
            self.requested, self.available
        )
    }
}

/// Integer pool whose level always stays within `[0, capacity]`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ResourcePool {
    level: i64,
    capacity: i64,
}

impl ResourcePool {
    pub fn new(level: i64, capacity: i64) -> Self {
        let capacity = capacity.max(0);
        Self {
            level: level.clamp(0, capacity),
            capacity,
        }
    }

    pub fn level(&self) -> i64 {
        self.level
    }

    pub fn capacity(&self) -> i64 {
        self.capacity
    }

    pub fn headroom(&self) -> i64 {
        self.capacity - self.level
    }

    pub fn is_full(&self) -> bool {
        self.level >= self.capacity
    }

    pub fn set_level(&mut self, level: i64) {
        self.level = level.clamp(0, self.capacity);
    }

    /// Debits `amount` atomically: either the whole amount or nothing.
    pub fn spend(&mut self, amount: i64) -> Result<i64, Shortfall> {
        if amount > self.level {
            return Err(Shortfall {
                requested: amount,
                available: self.level,
            });
        }
        self.level -= amount.max(0);
        Ok(amount)
    }

    /// Adds up to `amount`, capped at capacity. Returns what was added.
    pub fn fill(&mut self, amount: i64) -> i64 {
        let added = amount.clamp(0, self.headroom());
        self.level += added;
        added
    }

    /// Removes up to `amount`, stopping at zero. Returns what was removed.
    pub fn drain(&mut self, amount: i64) -> i64 {
        let removed = amount.clamp(0, self.level);
        self.level -= removed;
        removed
    }
}

/// Converts a per-second rate into a per-tick quantity that is never zero.
pub fn per_tick(rate_per_second: f64, fps: u32) -> i64 {
    ((rate_per_second / fps.max(1) as f64).round() as i64).max(1)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn when_spend_exceeds_level_then_nothing_is_debited() {
        let mut pool = ResourcePool::new(100, 200);
        assert_eq!(
            pool.spend(101),
            Err(Shortfall {
                requested: 101,
                available: 100
            })
        );
        assert_eq!(pool.level(), 100);
        assert_eq!(pool.spend(100), Ok(100));
        assert_eq!(pool.level(), 0);
    }

    #[test]
    fn when_filling_past_capacity_then_level_is_capped() {
        let mut pool = ResourcePool::new(150, 200);
        assert_eq!(pool.fill(80), 50);
        assert_eq!(pool.level(), 200);
        assert!(pool.is_full());
    }

    #[test]
    fn when_draining_past_zero_then_level_saturates() {
        let mut pool = ResourcePool::new(30, 200);
        assert_eq!(pool.drain(80), 30);
        assert_eq!(pool.level(), 0);
    }

    #[test]
    fn when_constructed_out_of_range_then_level_is_clamped() {
        assert_eq!(ResourcePool::new(500, 200).level(), 200);
        assert_eq!(ResourcePool::new(-5, 200).level(), 0);
    }

    #[test]
    fn when_rate_is_tiny_then_per_tick_still_progresses() {
        assert_eq!(per_tick(2000.0, 2), 1000);
        assert_eq!(per_tick(100.0, 2), 50);
        assert_eq!(per_tick(1.0, 60), 1);
        assert_eq!(per_tick(35.0, 30), 1);
    }
}
