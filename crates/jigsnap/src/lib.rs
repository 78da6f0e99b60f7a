//! Jigsaw piece generation and snap matching.
//!
//! Modules
//! - `rng`: Mulberry32 generator and FNV-1a string-key hashing.
//! - `shape`: seeded tab/slot outlines for a `rows × cols` board.
//! - `snap`: tolerance-based snap-to-target decisions.
//! - `parts`: fitting an image-parts document onto the board and deriving
//!   snap targets from it.
//!
//! API Policy
//! - `api` is the curated surface for the CLI and the Python bindings.
//!   Everything is pure and synchronous; no I/O happens in this crate.

pub mod api;
pub mod parts;
pub mod rng;
pub mod shape;
pub mod snap;

/// Library version string.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

pub use nalgebra::Vector2 as Vec2;

/// Common exports for quick imports in callers.
pub mod prelude {
    pub use crate::parts::{target_candidates, CanvasFit, PartRecord, PartsDoc};
    pub use crate::rng::{hash_str_to_seed, SeededRng};
    pub use crate::shape::{
        generate, generate_with, Board, Difficulty, EdgePolarity, Edges, GenerateError, Outline,
        PathSeg, PieceGeometry, ShapeCfg, Side,
    };
    pub use crate::snap::{
        evaluate, normalize_deg, CandidateLabel, Pose, SnapCandidate, SnapCfg, SnapMatcher,
        SnapResult,
    };
    pub use nalgebra::Vector2 as Vec2;
}
