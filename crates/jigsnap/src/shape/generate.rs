//! Board generation.
//!
//! Steps
//! 1. Validate dimensions and `ShapeCfg`.
//! 2. Draw the seam grid (`SeamGrid::draw`).
//! 3. Row-major over cells: draw `arc_k`, resolve edges, build the outline,
//!    record the board offset `(col * cell_w, row * cell_h)`.
//!
//! The draw order (seams first, then one curvature draw per cell) is part of
//! the output contract: reordering it changes every board.

use std::fmt;

use nalgebra::Vector2;

use super::outline::piece_outline;
use super::seams::SeamGrid;
use super::types::{Board, PieceGeometry, ShapeCfg};
use crate::rng::SeededRng;

/// Generation failures. Both are caller contract violations; retrying with
/// the same arguments fails the same way.
#[derive(Debug, Clone, PartialEq)]
pub enum GenerateError {
    /// Rows/cols must be ≥ 1 and the board size finite and > 0.
    InvalidDimensions {
        rows: u32,
        cols: u32,
        width: f64,
        height: f64,
    },
    /// `ShapeCfg` outside its valid range.
    InvalidShapeCfg { reason: String },
}

impl GenerateError {
    pub(crate) fn invalid_cfg(reason: impl Into<String>) -> Self {
        Self::InvalidShapeCfg {
            reason: reason.into(),
        }
    }
}

impl fmt::Display for GenerateError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            GenerateError::InvalidDimensions {
                rows,
                cols,
                width,
                height,
            } => write!(
                f,
                "invalid board dimensions: {rows} rows x {cols} cols on {width} x {height} px \
                 (need rows, cols >= 1 and a finite positive size)"
            ),
            GenerateError::InvalidShapeCfg { reason } => {
                write!(f, "invalid shape parameters: {reason}")
            }
        }
    }
}

impl std::error::Error for GenerateError {}

fn validate_dimensions(rows: u32, cols: u32, width: f64, height: f64) -> Result<(), GenerateError> {
    let size_ok = width.is_finite() && height.is_finite() && width > 0.0 && height > 0.0;
    if rows == 0 || cols == 0 || !size_ok {
        return Err(GenerateError::InvalidDimensions {
            rows,
            cols,
            width,
            height,
        });
    }
    Ok(())
}

/// Generate a board with default shape parameters.
pub fn generate(
    rows: u32,
    cols: u32,
    board_width: f64,
    board_height: f64,
    rng: &mut SeededRng,
) -> Result<Board, GenerateError> {
    generate_with(rows, cols, board_width, board_height, rng, &ShapeCfg::default())
}

/// Generate a board. `rng` is advanced by one draw per interior seam plus one per cell.
pub fn generate_with(
    rows: u32,
    cols: u32,
    board_width: f64,
    board_height: f64,
    rng: &mut SeededRng,
    cfg: &ShapeCfg,
) -> Result<Board, GenerateError> {
    validate_dimensions(rows, cols, board_width, board_height)?;
    cfg.validate()?;

    let cell_w = board_width / cols as f64;
    let cell_h = board_height / rows as f64;
    tracing::debug!(rows, cols, cell_w, cell_h, "generate_board");

    let seams = SeamGrid::draw(rows, cols, rng);
    let mut pieces = Vec::with_capacity(rows as usize * cols as usize);
    for row in 0..rows {
        for col in 0..cols {
            let arc_k = cfg.arc_k(rng.next_unit());
            let edges = seams.cell_edges(row as usize, col as usize);
            let outline = piece_outline(cell_w, cell_h, &edges, cfg, arc_k);
            pieces.push(PieceGeometry {
                id: PieceGeometry::id_for(row, col),
                row,
                col,
                outline,
                offset: Vector2::new(col as f64 * cell_w, row as f64 * cell_h),
                cell_width: cell_w,
                cell_height: cell_h,
                edges,
                arc_k,
            });
        }
    }
    tracing::trace!(
        pieces = pieces.len(),
        interior_seams = seams.interior_count(),
        "generate_board_done"
    );

    Ok(Board {
        board_width,
        board_height,
        rows,
        cols,
        pieces,
    })
}
