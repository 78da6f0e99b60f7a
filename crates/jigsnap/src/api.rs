//! Curated entry points.
//!
//! - `generate`: board from a plain `u32` seed.
//! - `evaluate`: snap decision with explicit tolerances.
//! - `hash_str_to_seed`: string key to seed.
//!
//! Callers that need custom shape parameters or a lock-after-snap policy use
//! `shape::generate_with` and `snap::SnapMatcher` directly.

pub use crate::parts::{
    export_record, hotspot_radius, target_candidates, Canvas, CanvasFit, PartRecord, PartsDoc,
};
pub use crate::rng::{hash_str_to_seed, SeededRng};
pub use crate::shape::{Board, Difficulty, EdgePolarity, GenerateError, PieceGeometry, ShapeCfg};
pub use crate::snap::{evaluate, CandidateLabel, Pose, SnapCandidate, SnapCfg, SnapMatcher, SnapResult};

/// Generate a board from a seed. Equal arguments give bit-identical boards.
pub fn generate(
    rows: u32,
    cols: u32,
    board_width: f64,
    board_height: f64,
    seed: u32,
) -> Result<Board, GenerateError> {
    let mut rng = SeededRng::new(seed);
    tracing::debug!(seed, "api::generate");
    crate::shape::generate(rows, cols, board_width, board_height, &mut rng)
}

/// Generate a board for a difficulty preset.
pub fn generate_preset(
    difficulty: Difficulty,
    board_width: f64,
    board_height: f64,
    seed: u32,
) -> Result<Board, GenerateError> {
    generate(difficulty.rows(), difficulty.cols(), board_width, board_height, seed)
}
