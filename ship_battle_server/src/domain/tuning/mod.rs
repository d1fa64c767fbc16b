pub mod game;
pub mod munitions;
pub mod ship;

pub use game::GameTuning;
pub use munitions::{EmpTuning, HunterDroneTuning, MagnetMineTuning, MunitionTuning};
pub use ship::{
    ApuTuning, EbeamTuning, EngineTuning, HullTuning, PowerTuning, ScannerTuning, ServicesTuning,
    ShipTuning, TubeTuning,
};
