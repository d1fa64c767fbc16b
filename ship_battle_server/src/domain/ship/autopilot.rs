use crate::domain::geometry::{opposite_heading, resultant_vector};
use crate::domain::ids::FeatureId;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AutopilotProgram {
    /// Burn retrograde until the ship is (nearly) still, then disengage.
    PositionHold,
    Prograde,
    Retrograde,
    /// Face the scanner lock target.
    LockTarget,
    /// Face a station or ore mine.
    Waypoint { feature_id: FeatureId },
}

/// What the autopilot wants done this tick.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AutopilotAction {
    Hold,
    Steer { heading: i32 },
    SteerAndBurn { heading: i32 },
    /// Zero velocity, stop burning and disengage.
    Finish,
    Disengage,
}

/// Ship state the autopilot reads.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct AutopilotInputs {
    pub velocity: (f64, f64),
    pub engine_online: bool,
    pub lock_heading: Option<i32>,
    pub waypoint_heading: Option<i32>,
    pub hold_threshold_mps: f64,
}

pub fn plan(program: &AutopilotProgram, inputs: &AutopilotInputs) -> AutopilotAction {
    let (vx, vy) = inputs.velocity;
    let stationary = vx == 0.0 && vy == 0.0;
    let (_, velocity_heading) = resultant_vector(vx, vy);

    match program {
        AutopilotProgram::PositionHold => {
            if vx.abs().round() <= inputs.hold_threshold_mps
                && vy.abs().round() <= inputs.hold_threshold_mps
            {
                AutopilotAction::Finish
            } else if !inputs.engine_online {
                AutopilotAction::Disengage
            } else {
                AutopilotAction::SteerAndBurn {
                    heading: opposite_heading(velocity_heading),
                }
            }
        }
        AutopilotProgram::Prograde if stationary => AutopilotAction::Hold,
        AutopilotProgram::Prograde => AutopilotAction::Steer {
            heading: velocity_heading,
        },
        AutopilotProgram::Retrograde if stationary => AutopilotAction::Hold,
        AutopilotProgram::Retrograde => AutopilotAction::Steer {
            heading: opposite_heading(velocity_heading),
        },
        AutopilotProgram::LockTarget => match inputs.lock_heading {
            Some(heading) => AutopilotAction::Steer { heading },
            None => AutopilotAction::Disengage,
        },
        AutopilotProgram::Waypoint { .. } => match inputs.waypoint_heading {
            Some(heading) => AutopilotAction::Steer { heading },
            None => AutopilotAction::Disengage,
        },
    }
}
