//! Piece and board data types.
//!
//! - `EdgePolarity`: Slot / Tab / Flat, signed from the owning cell's perspective.
//! - `Side`, `Edges`: the four edges of a cell in outline order (top, right, bottom, left).
//! - `ShapeCfg`: notch and curvature parameters.
//! - `PieceGeometry`, `Board`: immutable generation output.
//! - `Difficulty`: the grid presets offered to players.
//!
//! Code cross-refs: `outline::Outline`, `seams::SeamGrid`, `generate::generate`

use std::fmt;
use std::ops::Neg;
use std::str::FromStr;

use nalgebra::Vector2;
use serde::{Deserialize, Serialize};

use super::cfg::{ARC_K_MIN, ARC_K_SPAN, NOTCH_SCALE, NOTCH_SCALE_MAX};
use super::generate::GenerateError;
use super::outline::Outline;

/// Edge shape as seen from the cell that draws it.
///
/// `Tab` protrudes out of the cell, `Slot` indents into it, `Flat` is the
/// straight outer border of the grid.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EdgePolarity {
    Slot,
    Tab,
    Flat,
}

impl EdgePolarity {
    /// `+1` for Tab, `-1` for Slot, `0` for Flat.
    #[inline]
    pub fn sign(self) -> i8 {
        match self {
            EdgePolarity::Tab => 1,
            EdgePolarity::Slot => -1,
            EdgePolarity::Flat => 0,
        }
    }

    #[inline]
    pub fn is_flat(self) -> bool {
        matches!(self, EdgePolarity::Flat)
    }

    /// The same seam seen from the neighboring cell.
    #[inline]
    pub fn flipped(self) -> Self {
        match self {
            EdgePolarity::Tab => EdgePolarity::Slot,
            EdgePolarity::Slot => EdgePolarity::Tab,
            EdgePolarity::Flat => EdgePolarity::Flat,
        }
    }
}

impl Neg for EdgePolarity {
    type Output = EdgePolarity;
    #[inline]
    fn neg(self) -> Self::Output {
        self.flipped()
    }
}

/// Cell side, in the order the outline walks them.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Side {
    Top,
    Right,
    Bottom,
    Left,
}

impl Side {
    pub const ALL: [Side; 4] = [Side::Top, Side::Right, Side::Bottom, Side::Left];

    #[inline]
    pub fn opposite(self) -> Side {
        match self {
            Side::Top => Side::Bottom,
            Side::Right => Side::Left,
            Side::Bottom => Side::Top,
            Side::Left => Side::Right,
        }
    }

    /// Outward unit normal in the local frame (y grows downward).
    #[inline]
    pub fn outward(self) -> Vector2<f64> {
        match self {
            Side::Top => Vector2::new(0.0, -1.0),
            Side::Right => Vector2::new(1.0, 0.0),
            Side::Bottom => Vector2::new(0.0, 1.0),
            Side::Left => Vector2::new(-1.0, 0.0),
        }
    }

    /// True for the two sides that run along the x axis.
    #[inline]
    pub fn is_horizontal(self) -> bool {
        matches!(self, Side::Top | Side::Bottom)
    }
}

/// Resolved polarities of one cell.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Edges {
    pub top: EdgePolarity,
    pub right: EdgePolarity,
    pub bottom: EdgePolarity,
    pub left: EdgePolarity,
}

impl Edges {
    pub const FLAT: Edges = Edges {
        top: EdgePolarity::Flat,
        right: EdgePolarity::Flat,
        bottom: EdgePolarity::Flat,
        left: EdgePolarity::Flat,
    };

    #[inline]
    pub fn get(&self, side: Side) -> EdgePolarity {
        match side {
            Side::Top => self.top,
            Side::Right => self.right,
            Side::Bottom => self.bottom,
            Side::Left => self.left,
        }
    }

    pub fn iter(&self) -> impl Iterator<Item = (Side, EdgePolarity)> + '_ {
        Side::ALL.into_iter().map(move |side| (side, self.get(side)))
    }
}

/// Shape parameters.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ShapeCfg {
    /// Notch size as a fraction of the cell dimension (half-width along the
    /// edge and depth across it).
    pub notch_scale: f64,
    /// Lower bound of the per-piece curvature factor.
    pub arc_k_min: f64,
    /// Width of the curvature range; `0` gives every piece the same roundness.
    pub arc_k_span: f64,
}

impl Default for ShapeCfg {
    fn default() -> Self {
        Self {
            notch_scale: NOTCH_SCALE,
            arc_k_min: ARC_K_MIN,
            arc_k_span: ARC_K_SPAN,
        }
    }
}

impl ShapeCfg {
    pub fn validate(&self) -> Result<(), GenerateError> {
        if !(self.notch_scale.is_finite() && self.arc_k_min.is_finite() && self.arc_k_span.is_finite())
        {
            return Err(GenerateError::invalid_cfg("shape parameters must be finite"));
        }
        if self.notch_scale <= 0.0 || self.notch_scale >= NOTCH_SCALE_MAX {
            return Err(GenerateError::invalid_cfg(format!(
                "notch_scale must lie in (0, {NOTCH_SCALE_MAX})"
            )));
        }
        if self.arc_k_span < 0.0 {
            return Err(GenerateError::invalid_cfg("arc_k_span must be >= 0"));
        }
        Ok(())
    }

    /// Map a unit draw onto the curvature range.
    #[inline]
    pub fn arc_k(&self, unit: f64) -> f64 {
        self.arc_k_min + unit * self.arc_k_span
    }
}

/// One generated piece. Outline coordinates are local: `(0,0)` is the cell's
/// nominal top-left; add `offset` to place it on the board.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct PieceGeometry {
    pub id: String,
    pub row: u32,
    pub col: u32,
    pub outline: Outline,
    pub offset: Vector2<f64>,
    pub cell_width: f64,
    pub cell_height: f64,
    pub edges: Edges,
    pub arc_k: f64,
}

impl PieceGeometry {
    /// Stable identifier for the cell at `(row, col)`.
    pub fn id_for(row: u32, col: u32) -> String {
        format!("r{row}c{col}")
    }

    /// Outline placed at its correct board position.
    pub fn board_outline(&self) -> Outline {
        self.outline.translated(self.offset)
    }
}

/// Generation output: every cell in row-major order.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Board {
    pub board_width: f64,
    pub board_height: f64,
    pub rows: u32,
    pub cols: u32,
    pub pieces: Vec<PieceGeometry>,
}

impl Board {
    #[inline]
    pub fn cell_size(&self) -> (f64, f64) {
        (
            self.board_width / self.cols as f64,
            self.board_height / self.rows as f64,
        )
    }

    pub fn piece(&self, row: u32, col: u32) -> Option<&PieceGeometry> {
        if row >= self.rows || col >= self.cols {
            return None;
        }
        self.pieces.get((row * self.cols + col) as usize)
    }

    pub fn piece_by_id(&self, id: &str) -> Option<&PieceGeometry> {
        self.pieces.iter().find(|p| p.id == id)
    }

    /// Neighbor across `side`, if the seam is interior.
    pub fn neighbor(&self, row: u32, col: u32, side: Side) -> Option<&PieceGeometry> {
        let (r, c) = match side {
            Side::Top => (row.checked_sub(1)?, col),
            Side::Right => (row, col + 1),
            Side::Bottom => (row + 1, col),
            Side::Left => (row, col.checked_sub(1)?),
        };
        self.piece(r, c)
    }
}

/// Grid presets (rows × cols).
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Difficulty {
    Easy,
    Normal,
    Hard,
}

impl Difficulty {
    pub const ALL: [Difficulty; 3] = [Difficulty::Easy, Difficulty::Normal, Difficulty::Hard];

    pub fn rows(self) -> u32 {
        match self {
            Difficulty::Easy => 4,
            Difficulty::Normal => 6,
            Difficulty::Hard => 9,
        }
    }

    pub fn cols(self) -> u32 {
        match self {
            Difficulty::Easy => 6,
            Difficulty::Normal => 10,
            Difficulty::Hard => 14,
        }
    }

    pub fn key(self) -> &'static str {
        match self {
            Difficulty::Easy => "easy",
            Difficulty::Normal => "normal",
            Difficulty::Hard => "hard",
        }
    }
}

impl fmt::Display for Difficulty {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.key())
    }
}

/// Unknown difficulty key.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParseDifficultyError(pub String);

impl fmt::Display for ParseDifficultyError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "unknown difficulty '{}' (expected easy, normal or hard)", self.0)
    }
}

impl std::error::Error for ParseDifficultyError {}

impl FromStr for Difficulty {
    type Err = ParseDifficultyError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        let trimmed = value.trim();
        Difficulty::ALL
            .into_iter()
            .find(|d| d.key().eq_ignore_ascii_case(trimmed))
            .ok_or_else(|| ParseDifficultyError(trimmed.to_string()))
    }
}
