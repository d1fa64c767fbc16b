// Research tree. Core upgrades are one-off unlocks; ship upgrades have levels
// that raise the ship's tuning when each one completes.

use super::commands::ShipCommandError;
use super::mining::OreHold;
use crate::domain::resources::ResourcePool;
use crate::domain::tuning::ShipTuning;
use std::collections::{BTreeMap, BTreeSet};
use std::fmt;

/// Share of the ore cost returned when research is cancelled.
const CANCEL_ORE_REFUND: f64 = 0.75;

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum CoreUpgrade {
    TitaniumAlloyHull,
    AdvancedElectronics,
    LiquidNitrogenCooling,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum ShipUpgrade {
    EngineNewtons,
    ScannerLockTraversal,
    RadarSensitivity,
    ScannerRange,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum UpgradeKind {
    Core(CoreUpgrade),
    Ship(ShipUpgrade),
}

/// Paid up front when research starts.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct UpgradeCost {
    pub ore_kg: f64,
    pub electricity: i64,
    pub seconds: f64,
}

const fn cost(ore_kg: f64, electricity: i64, seconds: f64) -> UpgradeCost {
    UpgradeCost {
        ore_kg,
        electricity,
        seconds,
    }
}

impl CoreUpgrade {
    pub const ALL: [CoreUpgrade; 3] = [
        CoreUpgrade::TitaniumAlloyHull,
        CoreUpgrade::AdvancedElectronics,
        CoreUpgrade::LiquidNitrogenCooling,
    ];

    pub fn slug(self) -> &'static str {
        match self {
            CoreUpgrade::TitaniumAlloyHull => "titanium_alloy_hull",
            CoreUpgrade::AdvancedElectronics => "advanced_electronics",
            CoreUpgrade::LiquidNitrogenCooling => "liquid_nitrogen_cooling",
        }
    }

    pub fn name(self) -> &'static str {
        match self {
            CoreUpgrade::TitaniumAlloyHull => "Titanium Alloy Hull",
            CoreUpgrade::AdvancedElectronics => "Advanced Electronics",
            CoreUpgrade::LiquidNitrogenCooling => "Liquid Nitrogen Cooling",
        }
    }

    pub fn cost(self) -> UpgradeCost {
        match self {
            CoreUpgrade::TitaniumAlloyHull => cost(200.0, 10_000, 75.0),
            CoreUpgrade::AdvancedElectronics => cost(150.0, 30_000, 50.0),
            CoreUpgrade::LiquidNitrogenCooling => cost(175.0, 20_000, 65.0),
        }
    }
}

impl ShipUpgrade {
    pub const ALL: [ShipUpgrade; 4] = [
        ShipUpgrade::EngineNewtons,
        ShipUpgrade::ScannerLockTraversal,
        ShipUpgrade::RadarSensitivity,
        ShipUpgrade::ScannerRange,
    ];

    pub fn slug(self) -> &'static str {
        match self {
            ShipUpgrade::EngineNewtons => "engine_newtons",
            ShipUpgrade::ScannerLockTraversal => "scanner_lock_traversal",
            ShipUpgrade::RadarSensitivity => "radar_sensitivity",
            ShipUpgrade::ScannerRange => "scanner_range",
        }
    }

    pub fn name(self) -> &'static str {
        match self {
            ShipUpgrade::EngineNewtons => "Engine Newtons",
            ShipUpgrade::ScannerLockTraversal => "Scanner Lock Traversal",
            ShipUpgrade::RadarSensitivity => "Radar Sensitivity",
            ShipUpgrade::ScannerRange => "Scanner Range",
        }
    }

    fn costs(self) -> &'static [UpgradeCost] {
        const ENGINE: [UpgradeCost; 2] = [cost(60.0, 40_000, 30.0), cost(90.0, 50_000, 60.0)];
        const TRAVERSAL: [UpgradeCost; 3] = [
            cost(60.0, 20_000, 30.0),
            cost(90.0, 30_000, 45.0),
            cost(120.0, 40_000, 55.0),
        ];
        const SENSITIVITY: [UpgradeCost; 3] = [
            cost(50.0, 20_000, 30.0),
            cost(120.0, 30_000, 45.0),
            cost(200.0, 40_000, 55.0),
        ];
        const RANGE: [UpgradeCost; 3] = [
            cost(75.0, 50_000, 30.0),
            cost(95.0, 70_000, 45.0),
            cost(150.0, 90_000, 55.0),
        ];
        match self {
            ShipUpgrade::EngineNewtons => &ENGINE,
            ShipUpgrade::ScannerLockTraversal => &TRAVERSAL,
            ShipUpgrade::RadarSensitivity => &SENSITIVITY,
            ShipUpgrade::ScannerRange => &RANGE,
        }
    }

    /// Highest level with a price attached.
    pub fn max_level(self) -> u8 {
        self.costs().len() as u8
    }

    /// Price of reaching `level` (1-based).
    pub fn cost(self, level: u8) -> Option<UpgradeCost> {
        let index = usize::from(level).checked_sub(1)?;
        self.costs().get(index).copied()
    }

    /// Core upgrade that must be earned before researching `level`.
    pub fn required_core(self, level: u8) -> Option<CoreUpgrade> {
        match (self, level) {
            (ShipUpgrade::EngineNewtons, 2) => Some(CoreUpgrade::TitaniumAlloyHull),
            (ShipUpgrade::ScannerLockTraversal, 1) => Some(CoreUpgrade::AdvancedElectronics),
            (ShipUpgrade::RadarSensitivity, 1) => Some(CoreUpgrade::AdvancedElectronics),
            (ShipUpgrade::ScannerRange, 3) => Some(CoreUpgrade::AdvancedElectronics),
            _ => None,
        }
    }

    /// Applies the stat gains of reaching `level`.
    pub fn apply(self, level: u8, tuning: &mut ShipTuning) {
        match self {
            ShipUpgrade::EngineNewtons => {
                tuning.engine.newtons += if level >= 2 { 1600.0 } else { 900.0 };
            }
            ShipUpgrade::ScannerLockTraversal => {
                tuning.scanner.locking_max_traversal_deg += 0.5;
                tuning.scanner.locked_max_traversal_deg += 0.6;
            }
            ShipUpgrade::RadarSensitivity => tuning.scanner.radar_sensitivity += 1,
            ShipUpgrade::ScannerRange => {
                tuning.scanner.radar_range_m += 600.0;
                tuning.scanner.ir_range_m += 800.0;
            }
        }
    }
}

impl UpgradeKind {
    pub fn slug(self) -> &'static str {
        match self {
            UpgradeKind::Core(core) => core.slug(),
            UpgradeKind::Ship(ship) => ship.slug(),
        }
    }

    pub fn name(self) -> &'static str {
        match self {
            UpgradeKind::Core(core) => core.name(),
            UpgradeKind::Ship(ship) => ship.name(),
        }
    }
}

impl fmt::Display for UpgradeKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.slug())
    }
}

/// Where one upgrade stands, for clients.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct UpgradeStatus {
    pub kind: UpgradeKind,
    pub current_level: u8,
    pub max_level: u8,
    pub seconds_researched: Option<f64>,

    /// Price of the next level; `None` once maxed out or earned.
    pub next_cost: Option<UpgradeCost>,
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct Research {
    earned: BTreeSet<CoreUpgrade>,
    levels: BTreeMap<ShipUpgrade, u8>,

    /// Seconds spent on each upgrade under research.
    active: BTreeMap<UpgradeKind, f64>,
}

impl Research {
    pub fn is_earned(&self, core: CoreUpgrade) -> bool {
        self.earned.contains(&core)
    }

    pub fn level(&self, upgrade: ShipUpgrade) -> u8 {
        self.levels.get(&upgrade).copied().unwrap_or(0)
    }

    pub fn seconds_researched(&self, kind: UpgradeKind) -> Option<f64> {
        self.active.get(&kind).copied()
    }

    /// Cost of the next step for `kind`, checking prerequisites.
    fn next_cost(&self, kind: UpgradeKind) -> Result<UpgradeCost, ShipCommandError> {
        match kind {
            UpgradeKind::Core(core) => {
                if self.is_earned(core) {
                    return Err(ShipCommandError::UpgradeComplete(kind));
                }
                Ok(core.cost())
            }
            UpgradeKind::Ship(upgrade) => {
                let next = self.level(upgrade) + 1;
                let cost = upgrade
                    .cost(next)
                    .ok_or(ShipCommandError::UpgradeComplete(kind))?;
                match upgrade.required_core(next) {
                    Some(core) if !self.is_earned(core) => Err(
                        ShipCommandError::MissingCoreUpgrade(UpgradeKind::Core(core)),
                    ),
                    _ => Ok(cost),
                }
            }
        }
    }

    /// Pays for and begins researching the next step of `kind`. Core research
    /// needs a station.
    pub fn start(
        &mut self,
        kind: UpgradeKind,
        docked: bool,
        battery: &mut ResourcePool,
        ore: &mut OreHold,
    ) -> Result<(), ShipCommandError> {
        if matches!(kind, UpgradeKind::Core(_)) && !docked {
            return Err(ShipCommandError::NotDocked);
        }
        if self.active.contains_key(&kind) {
            return Err(ShipCommandError::AlreadyResearching(kind));
        }
        let cost = self.next_cost(kind)?;
        if ore.total_kg() < cost.ore_kg {
            return Err(ShipCommandError::InsufficientOre {
                required_kg: cost.ore_kg,
                available_kg: ore.total_kg(),
            });
        }
        if battery.level() < cost.electricity {
            return Err(ShipCommandError::InsufficientPower {
                required: cost.electricity,
                available: battery.level(),
            });
        }
        battery
            .spend(cost.electricity)
            .map_err(|s| ShipCommandError::InsufficientPower {
                required: s.requested,
                available: s.available,
            })?;
        ore.withdraw(cost.ore_kg)
            .map_err(|s| ShipCommandError::InsufficientOre {
                required_kg: s.requested_kg,
                available_kg: s.available_kg,
            })?;
        self.active.insert(kind, 0.0);
        Ok(())
    }

    /// Stops research on `kind`. Electricity comes back in full, ore at a loss
    /// and into the station bank.
    pub fn cancel(
        &mut self,
        kind: UpgradeKind,
        battery: &mut ResourcePool,
        ore: &mut OreHold,
    ) -> Result<(), ShipCommandError> {
        if !self.active.contains_key(&kind) {
            return Err(ShipCommandError::NotResearching(kind));
        }
        let Some(cost) = price(&self.levels, kind) else {
            return Err(ShipCommandError::NotResearching(kind));
        };
        self.active.remove(&kind);
        ore.virtual_kg += cost.ore_kg * CANCEL_ORE_REFUND;
        battery.fill(cost.electricity);
        Ok(())
    }

    /// Advances every active project by one tick. Finished ship upgrades are
    /// applied to `tuning`. Returns what finished.
    pub fn tick(&mut self, fps: u32, tuning: &mut ShipTuning) -> Vec<UpgradeKind> {
        let step = 1.0 / fps.max(1) as f64;
        let mut finished = Vec::new();
        for (kind, seconds) in self.active.iter_mut() {
            *seconds += step;
            let done = price(&self.levels, *kind).is_none_or(|cost| *seconds >= cost.seconds);
            if done {
                finished.push(*kind);
            }
        }
        for kind in &finished {
            self.active.remove(kind);
            match *kind {
                UpgradeKind::Core(core) => {
                    self.earned.insert(core);
                }
                UpgradeKind::Ship(upgrade) => {
                    let level = self.level(upgrade) + 1;
                    if upgrade.cost(level).is_some() {
                        self.levels.insert(upgrade, level);
                        upgrade.apply(level, tuning);
                    }
                }
            }
        }
        finished
    }

    pub fn summary(&self) -> Vec<UpgradeStatus> {
        let cores = CoreUpgrade::ALL.into_iter().map(|core| {
            let kind = UpgradeKind::Core(core);
            let earned = self.is_earned(core);
            UpgradeStatus {
                kind,
                current_level: u8::from(earned),
                max_level: 1,
                seconds_researched: self.seconds_researched(kind),
                next_cost: (!earned).then(|| core.cost()),
            }
        });
        let ships = ShipUpgrade::ALL.into_iter().map(|upgrade| {
            let kind = UpgradeKind::Ship(upgrade);
            let level = self.level(upgrade);
            UpgradeStatus {
                kind,
                current_level: level,
                max_level: upgrade.max_level(),
                seconds_researched: self.seconds_researched(kind),
                next_cost: upgrade.cost(level + 1),
            }
        });
        cores.chain(ships).collect()
    }

    /// Progress of each active project as a percentage.
    pub fn progress(&self) -> impl Iterator<Item = (UpgradeKind, u8)> + '_ {
        self.active.iter().filter_map(|(kind, seconds)| {
            let cost = price(&self.levels, *kind)?;
            let percent = (seconds / cost.seconds.max(f64::EPSILON) * 100.0)
                .round()
                .clamp(0.0, 100.0) as u8;
            Some((*kind, percent))
        })
    }
}

// Price of the step under research. Prerequisites were checked when it started.
fn price(levels: &BTreeMap<ShipUpgrade, u8>, kind: UpgradeKind) -> Option<UpgradeCost> {
    match kind {
        UpgradeKind::Core(core) => Some(core.cost()),
        UpgradeKind::Ship(upgrade) => {
            upgrade.cost(levels.get(&upgrade).copied().unwrap_or(0) + 1)
        }
    }
}
