use std::fmt;
use std::str::FromStr;

use nalgebra::{Rotation2, Vector2};
use serde::{Deserialize, Serialize};

/// Caller-owned placement of a piece on the board.
///
/// `(x, y)` is the piece's anchor point in board space; rotation (degrees,
/// clockwise on screen) is about that point.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct Pose {
    pub x: f64,
    pub y: f64,
    pub rotation_deg: f64,
    #[serde(default)]
    pub locked: bool,
}

impl Pose {
    #[inline]
    pub fn new(x: f64, y: f64, rotation_deg: f64) -> Self {
        Self {
            x,
            y,
            rotation_deg,
            locked: false,
        }
    }

    #[inline]
    pub fn position(&self) -> Vector2<f64> {
        Vector2::new(self.x, self.y)
    }

    pub fn is_finite(&self) -> bool {
        self.x.is_finite() && self.y.is_finite() && self.rotation_deg.is_finite()
    }

    /// Board point expressed in the piece frame (origin at the anchor, axes
    /// rotated with the piece).
    pub fn to_local(&self, board_point: Vector2<f64>) -> Vector2<f64> {
        let undo = Rotation2::new(-self.rotation_deg.to_radians());
        undo * (board_point - self.position())
    }

    /// Inverse of [`Pose::to_local`].
    pub fn to_board(&self, local_point: Vector2<f64>) -> Vector2<f64> {
        Rotation2::new(self.rotation_deg.to_radians()) * local_point + self.position()
    }
}

/// Which reference point of the part a candidate was derived from.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum CandidateLabel {
    Anchor,
    Center,
    TopLeftAsCenter,
}

impl CandidateLabel {
    pub const ALL: [CandidateLabel; 3] = [
        CandidateLabel::Anchor,
        CandidateLabel::Center,
        CandidateLabel::TopLeftAsCenter,
    ];

    pub fn key(self) -> &'static str {
        match self {
            CandidateLabel::Anchor => "anchor",
            CandidateLabel::Center => "center",
            CandidateLabel::TopLeftAsCenter => "topLeftAsCenter",
        }
    }
}

impl fmt::Display for CandidateLabel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.key())
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParseLabelError(pub String);

impl fmt::Display for ParseLabelError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "unknown candidate label '{}' (expected anchor, center or top-left-as-center)",
            self.0
        )
    }
}

impl std::error::Error for ParseLabelError {}

impl FromStr for CandidateLabel {
    type Err = ParseLabelError;

    /// Case-insensitive; `-` and `_` are ignored (`top-left-as-center`, `topLeftAsCenter`).
    fn from_str(value: &str) -> Result<Self, Self::Err> {
        let squashed: String = value
            .trim()
            .chars()
            .filter(|c| *c != '-' && *c != '_')
            .collect();
        CandidateLabel::ALL
            .into_iter()
            .find(|l| l.key().eq_ignore_ascii_case(&squashed))
            .ok_or_else(|| ParseLabelError(value.trim().to_string()))
    }
}

/// One admissible snap target.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct SnapCandidate {
    pub target: Vector2<f64>,
    pub label: CandidateLabel,
}

impl SnapCandidate {
    #[inline]
    pub fn new(x: f64, y: f64, label: CandidateLabel) -> Self {
        Self {
            target: Vector2::new(x, y),
            label,
        }
    }
}

/// Outcome of a snap evaluation. When `matched` is false, position, rotation
/// and lock flag are the input pose's, untouched.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct SnapResult {
    pub matched: bool,
    pub position: Vector2<f64>,
    pub rotation_deg: f64,
    pub locked: bool,
    pub label: Option<CandidateLabel>,
}

impl SnapResult {
    pub(crate) fn unchanged(current: &Pose) -> Self {
        Self {
            matched: false,
            position: current.position(),
            rotation_deg: current.rotation_deg,
            locked: current.locked,
            label: None,
        }
    }

    /// The resulting pose.
    pub fn pose(&self) -> Pose {
        Pose {
            x: self.position.x,
            y: self.position.y,
            rotation_deg: self.rotation_deg,
            locked: self.locked,
        }
    }
}

/// Per-candidate diagnostics.
#[derive(Clone, Copy, Debug, PartialEq, Serialize)]
pub struct CandidateCheck {
    pub label: CandidateLabel,
    pub distance: f64,
    pub angle_deg: f64,
    pub qualifies: bool,
}
