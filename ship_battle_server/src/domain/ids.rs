use std::fmt;

/// Player ids are assigned by the surrounding service.
pub type PlayerId = u64;

pub type TeamId = u32;

/// Map feature (station / ore mine) ids come from the map definition.
pub type FeatureId = String;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ShipId(pub u64);

impl fmt::Display for ShipId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "ship-{}", self.0)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct MunitionId(pub u64);

impl fmt::Display for MunitionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "munition-{}", self.0)
    }
}
