// Death sequence: disabled -> aflame -> exploded, then removed once the blast fades.

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DeathStage {
    Alive,
    /// Dead and drifting, systems off.
    Disabled,
    Aflame { since_frame: u64 },
    Exploded,
}

/// What the death sequence produced this tick.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DeathVisual {
    Disabled,
    Aflame,
    /// Exploded on this tick. The caller registers the blast.
    NewExplosion,
    Exploded,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Damage {
    pub stage: DeathStage,
    pub died_on_frame: Option<u64>,

    /// Set once the wreck's explosion has faded.
    pub removed_from_map: bool,

    seconds_to_aflame: f64,
    seconds_to_explode: f64,
}

impl Damage {
    /// Delays are rolled at spawn so the sequence stays deterministic per seed.
    pub fn new(seconds_to_aflame: f64, seconds_to_explode: f64) -> Self {
        Self {
            stage: DeathStage::Alive,
            died_on_frame: None,
            removed_from_map: false,
            seconds_to_aflame,
            seconds_to_explode,
        }
    }

    pub fn is_alive(&self) -> bool {
        self.died_on_frame.is_none()
    }

    pub fn is_exploded(&self) -> bool {
        self.stage == DeathStage::Exploded
    }

    pub fn is_aflame(&self) -> bool {
        matches!(self.stage, DeathStage::Aflame { .. })
    }

    /// Marks the ship dead. Returns false if it was already dead.
    pub fn die(&mut self, frame: u64) -> bool {
        if !self.is_alive() {
            return false;
        }
        self.died_on_frame = Some(frame);
        self.stage = DeathStage::Disabled;
        true
    }

    pub fn explode(&mut self) {
        self.stage = DeathStage::Exploded;
    }

    /// Advances the sequence. `None` while alive.
    pub fn advance(&mut self, frame: u64, fps: u32) -> Option<DeathVisual> {
        let died = self.died_on_frame?;
        let seconds = |since: u64| frame.saturating_sub(since) as f64 / fps.max(1) as f64;
        match self.stage {
            DeathStage::Alive => None,
            DeathStage::Exploded => Some(DeathVisual::Exploded),
            DeathStage::Disabled => {
                if seconds(died) > self.seconds_to_aflame {
                    self.stage = DeathStage::Aflame { since_frame: frame };
                    Some(DeathVisual::Aflame)
                } else {
                    Some(DeathVisual::Disabled)
                }
            }
            DeathStage::Aflame { since_frame } => {
                if seconds(since_frame) > self.seconds_to_explode {
                    self.explode();
                    Some(DeathVisual::NewExplosion)
                } else {
                    Some(DeathVisual::Aflame)
                }
            }
        }
    }
}
