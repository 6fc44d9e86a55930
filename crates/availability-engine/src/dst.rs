//! DST transition policies for slots expressed in a business's local time.

use serde::{Deserialize, Serialize};

/// Policy for slots whose local start falls in a DST gap (e.g. 02:30 during
/// spring forward). Times repeated at fall-back always take the earlier
/// instant.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DstPolicy {
    /// Drop slots that start in the gap.
    Skip,
    /// Move the slot to the first valid local minute after the gap.
    ShiftForward,
    /// Keep the wall-clock reading and apply the offset in force before the
    /// transition.
    #[default]
    WallClock,
}
