//! Tick faults
//!
//! Gameplay outcomes (life loss, destruction, denied actions) are state
//! transitions. These are the states a tick refuses to continue from.

use std::fmt;

/// Fault that aborts the remainder of a tick
#[derive(Debug, Clone, PartialEq)]
pub enum TickFault {
    /// Scroll delta handed to the terrain was negative or not finite
    InvalidScroll { delta: f32 },
    /// Adjacent terrain segments don't meet
    TerrainGap { expected_x: f32, found_x: f32 },
    /// An entity position became NaN or infinite
    NonFinitePosition { entity: &'static str, id: u32 },
}

impl fmt::Display for TickFault {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TickFault::InvalidScroll { delta } => {
                write!(f, "invalid scroll delta {delta}")
            }
            TickFault::TerrainGap {
                expected_x,
                found_x,
            } => write!(
                f,
                "terrain gap: expected segment at x={expected_x}, found x={found_x}"
            ),
            TickFault::NonFinitePosition { entity, id } => {
                write!(f, "non-finite position on {entity} #{id}")
            }
        }
    }
}

impl std::error::Error for TickFault {}
