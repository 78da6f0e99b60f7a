//! Snap-to-target matching.
//!
//! Purpose
//! - Decide whether a dragged piece is close enough (position and rotation)
//!   to one of its target points to be pulled into place.
//!
//! Policy
//! - Both tolerances are inclusive. Among qualifying candidates the closest
//!   wins; on equal distance the earlier candidate wins.
//! - Rotation is compared after normalizing into (-180, 180].
//! - Non-finite poses, targets or tolerances never qualify. This is not an
//!   error: the pose is returned unchanged.
//!
//! Code cross-refs: `parts::target_candidates` (builds the candidate list)

pub mod cfg;
mod matcher;
mod types;

pub use matcher::{evaluate, normalize_deg, SnapCfg, SnapMatcher};
pub use types::{CandidateCheck, CandidateLabel, ParseLabelError, Pose, SnapCandidate, SnapResult};
