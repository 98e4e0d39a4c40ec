//! Resource transfer - health/armor steal with clamping on both ends

use serde::{Deserialize, Serialize};

/// Outcome of moving a resource from one actor to another
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct Transfer {
    /// Amount removed from the source
    pub taken: i32,
    /// Amount actually added to the destination (after its cap)
    pub granted: i32,
    /// Destination value after the transfer
    pub destination_after: i32,
}

/// Amount that can be taken from a source holding `source_current`
pub fn steal(requested: i32, source_current: i32) -> i32 {
    requested.max(0).min(source_current.max(0))
}

/// Add `amount` to `current` without exceeding `max`
///
/// A value already above `max` is left where it is rather than lowered.
pub fn grant(current: i32, amount: i32, max: i32) -> i32 {
    if current >= max {
        return current;
    }
    current.saturating_add(amount.max(0)).min(max)
}

/// Take up to `requested` from the source and give it to the destination
pub fn transfer(requested: i32, source_current: i32, destination_current: i32, destination_max: i32) -> Transfer {
    let taken = steal(requested, source_current);
    let destination_after = grant(destination_current, taken, destination_max);
    Transfer {
        taken,
        granted: (destination_after - destination_current).max(0),
        destination_after,
    }
}
