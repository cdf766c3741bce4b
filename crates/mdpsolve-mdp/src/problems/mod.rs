//! Ready-made problems that plug into both solver engines.

mod gambler;
mod magic_bus;

pub use gambler::{Gambler, GamblerSim};
pub use magic_bus::{MagicBus, MagicBusSim, Travel};

use crate::MdpError;

fn check_probability(name: &'static str, value: f64) -> Result<(), MdpError> {
    if !(0.0..=1.0).contains(&value) {
        return Err(MdpError::InvalidParameter {
            name,
            reason: format!("must lie in [0, 1], got {value}"),
        });
    }
    Ok(())
}

/// Largest goal whose position arithmetic (`goal + 1`, `2 * state`) fits in `u32`.
pub const MAX_GOAL: u32 = u32::MAX / 2;

fn check_goal(goal: u32) -> Result<(), MdpError> {
    if !(2..=MAX_GOAL).contains(&goal) {
        return Err(MdpError::InvalidParameter {
            name: "goal",
            reason: format!("must lie in [2, {MAX_GOAL}], got {goal}"),
        });
    }
    Ok(())
}

fn check_gamma(gamma: f64) -> Result<(), MdpError> {
    if !(0.0..=1.0).contains(&gamma) {
        return Err(MdpError::InvalidGamma { gamma });
    }
    Ok(())
}
