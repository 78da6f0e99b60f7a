//! Snap defaults.

/// Maximum distance (px, inclusive) between the pose and a target.
pub const SNAP_POS_PX: f64 = 8.0;
/// Maximum absolute normalized rotation (degrees, inclusive).
pub const SNAP_ANGLE_DEG: f64 = 5.0;
/// Whether a snapped piece becomes fixed.
pub const SNAP_LOCK_AFTER: bool = false;
