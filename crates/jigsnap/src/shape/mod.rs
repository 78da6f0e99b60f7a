//! Jigsaw piece shapes.
//!
//! Purpose
//! - Cut a `width × height` board into a `rows × cols` grid of interlocking
//!   pieces from a seeded generator, reproducibly.
//!
//! Model
//! - Every interior seam gets one random polarity; the two cells sharing it
//!   read it with opposite sign, so a Tab always meets a Slot.
//! - Outer border edges are `Flat`.
//! - Each piece also draws a curvature factor `arc_k` that only moves the
//!   handles next to the bump tip; tips and bases stay shared.
//!
//! Code cross-refs: `rng::SeededRng`, `generate::generate_with`, `outline::Outline`

pub mod cfg;
mod generate;
mod outline;
mod seams;
mod types;

pub use generate::{generate, generate_with, GenerateError};
pub use outline::{cubic_point, polygon_area, Bounds, Outline, PathSeg};
pub use seams::SeamGrid;
pub use types::{
    Board, Difficulty, EdgePolarity, Edges, ParseDifficultyError, PieceGeometry, ShapeCfg, Side,
};
