//! Shape constants.
//!
//! Policy
//! - These are the defaults behind `ShapeCfg::default()`. Handle fractions are
//!   fixed; only notch size and curvature range are configurable.

/// Notch size relative to the cell dimension.
pub const NOTCH_SCALE: f64 = 0.25;
/// Exclusive upper bound for `notch_scale`; at 0.5 bumps from both ends of an edge would touch the corners.
pub const NOTCH_SCALE_MAX: f64 = 0.5;
/// Lower bound of the per-piece curvature factor.
pub const ARC_K_MIN: f64 = 0.55;
/// Width of the curvature range (`arc_k` lies in `[0.55, 0.70)`).
pub const ARC_K_SPAN: f64 = 0.15;
/// Along-edge handle offset at the bump base, as a fraction of the notch half-width.
pub(crate) const BASE_HANDLE: f64 = 0.2;
/// Across-edge lift of the handles next to the tip, as a fraction of the bump depth.
pub(crate) const TIP_LIFT: f64 = 0.2;
/// Draw threshold: unit draws at or above this become Tab.
pub(crate) const TAB_THRESHOLD: f64 = 0.5;
