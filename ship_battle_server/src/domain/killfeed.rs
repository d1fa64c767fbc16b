use super::ids::ShipId;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum KillCause {
    Ebeam { shooter: ShipId },
    MapBoundary,
    StationCollision,
    OreMineCollision,
    MagnetMine,
    HunterDrone,
    Shockwave,
    /// Player left and took the ship down with them.
    Abandoned,
}

#[derive(Debug, Clone, PartialEq)]
pub struct KillFeedEntry {
    pub victim: ShipId,
    pub victim_designator: String,
    pub cause: KillCause,
    pub created_frame: u64,
}

/// Recent deaths, oldest first.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct KillFeed {
    entries: Vec<KillFeedEntry>,
}

impl KillFeed {
    pub fn push(&mut self, entry: KillFeedEntry) {
        self.entries.push(entry);
    }

    pub fn entries(&self) -> &[KillFeedEntry] {
        &self.entries
    }

    /// Drops entries created more than `lifetime_frames` before `frame`.
    pub fn purge(&mut self, frame: u64, lifetime_frames: u64) {
        let cutoff = frame.saturating_sub(lifetime_frames);
        self.entries.retain(|e| e.created_frame >= cutoff);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn entry(frame: u64) -> KillFeedEntry {
        KillFeedEntry {
            victim: ShipId(frame),
            victim_designator: "old fox".to_string(),
            cause: KillCause::Shockwave,
            created_frame: frame,
        }
    }

    #[test]
    fn when_purging_then_only_recent_entries_survive() {
        let mut feed = KillFeed::default();
        feed.push(entry(10));
        feed.push(entry(50));
        feed.purge(290, 240);
        assert_eq!(feed.entries().len(), 1);
        assert_eq!(feed.entries()[0].created_frame, 50);
    }
}
