//! Parts layout: mapping a parts document onto the play board.
//!
//! Model
//! - A parts document lists image parts with their correct position in the
//!   coordinates of a reference canvas (`correctX/Y`), plus an anchor (which
//!   point of the part the position refers to, fractions of its size) and an
//!   origin (trim offset inside the canvas).
//! - The canvas is fitted into the board with a uniform scale and centered.
//!   Snap targets and exports are expressed through that fit.
//!
//! Formulas (per axis; `s` scale, `d` centering offset, `w` displayed size)
//! - anchor target: `correct*s + d - (0.5 - anchor)*w + origin*s`
//! - center target: `correct*s + d`
//! - export: `correct = round(((disp - d) + (0.5 - anchor)*w - origin*s) / s)`
//!
//! Code cross-refs: `snap::SnapMatcher` (consumes the candidates)

use nalgebra::Vector2;
use serde::{Deserialize, Serialize};

use crate::snap::{CandidateLabel, Pose, SnapCandidate};

/// Board size the parts UI lays out on.
pub const DEFAULT_BOARD_W: f64 = 1200.0;
pub const DEFAULT_BOARD_H: f64 = 600.0;
/// Anchor used when a record has none (part center).
pub const DEFAULT_ANCHOR: f64 = 0.5;
/// Stacking order written for records without one.
pub const DEFAULT_Z: i32 = 1;

/// Reference canvas the correct positions were authored on.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct Canvas {
    pub w: f64,
    pub h: f64,
}

/// One part as exchanged in `parts.json`.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PartRecord {
    pub id: String,
    #[serde(default)]
    pub label: String,
    #[serde(default)]
    pub src: String,
    pub correct_x: f64,
    pub correct_y: f64,
    pub width: f64,
    pub height: f64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub z: Option<i32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub anchor_x: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub anchor_y: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub origin_x: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub origin_y: Option<f64>,
}

impl PartRecord {
    #[inline]
    pub fn correct(&self) -> Vector2<f64> {
        Vector2::new(self.correct_x, self.correct_y)
    }

    #[inline]
    pub fn anchor(&self) -> Vector2<f64> {
        Vector2::new(
            self.anchor_x.unwrap_or(DEFAULT_ANCHOR),
            self.anchor_y.unwrap_or(DEFAULT_ANCHOR),
        )
    }

    #[inline]
    pub fn origin(&self) -> Vector2<f64> {
        Vector2::new(self.origin_x.unwrap_or(0.0), self.origin_y.unwrap_or(0.0))
    }

    #[inline]
    pub fn size(&self) -> Vector2<f64> {
        Vector2::new(self.width, self.height)
    }

    /// On-board size when the part is drawn at the fit scale times `factor`.
    pub fn displayed_size(&self, fit: &CanvasFit, factor: f64) -> Vector2<f64> {
        self.size() * (fit.scale * factor)
    }
}

/// `parts.json`: either a bare list or `{ canvas?, parts }`.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum PartsDoc {
    Document {
        #[serde(default, skip_serializing_if = "Option::is_none")]
        canvas: Option<Canvas>,
        parts: Vec<PartRecord>,
    },
    List(Vec<PartRecord>),
}

impl PartsDoc {
    pub fn canvas(&self) -> Option<Canvas> {
        match self {
            PartsDoc::Document { canvas, .. } => *canvas,
            PartsDoc::List(_) => None,
        }
    }

    pub fn parts(&self) -> &[PartRecord] {
        match self {
            PartsDoc::Document { parts, .. } | PartsDoc::List(parts) => parts,
        }
    }
}

/// Uniform canvas-to-board transform: `board = canvas * scale + offset`.
#[derive(Clone, Copy, Debug, PartialEq, Serialize)]
pub struct CanvasFit {
    pub scale: f64,
    pub offset: Vector2<f64>,
}

impl CanvasFit {
    pub fn identity() -> Self {
        Self {
            scale: 1.0,
            offset: Vector2::zeros(),
        }
    }

    /// Largest uniform scale that fits `canvas` into the board, centered.
    /// Missing or degenerate canvases give the identity.
    pub fn fit(board_w: f64, board_h: f64, canvas: Option<Canvas>) -> Self {
        let Some(c) = canvas else {
            return Self::identity();
        };
        let usable = |v: f64| v.is_finite() && v > 0.0;
        if !(usable(c.w) && usable(c.h) && usable(board_w) && usable(board_h)) {
            tracing::debug!(canvas_w = c.w, canvas_h = c.h, "degenerate canvas; using identity fit");
            return Self::identity();
        }
        let scale = (board_w / c.w).min(board_h / c.h);
        let offset = Vector2::new((board_w - c.w * scale) / 2.0, (board_h - c.h * scale) / 2.0);
        Self { scale, offset }
    }

    #[inline]
    pub fn to_board(&self, canvas_point: Vector2<f64>) -> Vector2<f64> {
        canvas_point * self.scale + self.offset
    }
}

/// Anchor, center and top-left-as-center targets, in that order.
pub fn target_candidates(
    part: &PartRecord,
    fit: &CanvasFit,
    displayed_size: Vector2<f64>,
) -> [SnapCandidate; 3] {
    let center = fit.to_board(part.correct());
    let shift = (Vector2::repeat(0.5) - part.anchor()).component_mul(&displayed_size);
    let anchor = center - shift + part.origin() * fit.scale;
    let top_left = center + displayed_size * 0.5;
    [
        SnapCandidate {
            target: anchor,
            label: CandidateLabel::Anchor,
        },
        SnapCandidate {
            target: center,
            label: CandidateLabel::Center,
        },
        SnapCandidate {
            target: top_left,
            label: CandidateLabel::TopLeftAsCenter,
        },
    ]
}

/// Record describing where the part currently sits.
///
/// `pose` is the part's on-board anchor position; `None` means the part was
/// never moved and sits on its anchor target. `natural_size` replaces the
/// record's size (e.g. the decoded image size) when known. Defaults are
/// filled in so the written record is complete.
pub fn export_record(
    part: &PartRecord,
    pose: Option<&Pose>,
    fit: &CanvasFit,
    displayed_size: Vector2<f64>,
    natural_size: Option<Vector2<f64>>,
) -> PartRecord {
    let anchor = part.anchor();
    let origin = part.origin();
    let disp = match pose {
        Some(p) => p.position(),
        None => target_candidates(part, fit, displayed_size)[0].target,
    };
    let shift = (Vector2::repeat(0.5) - anchor).component_mul(&displayed_size);
    let correct = ((disp - fit.offset) + shift - origin * fit.scale) / fit.scale;
    let size = natural_size.unwrap_or_else(|| part.size());
    PartRecord {
        id: part.id.clone(),
        label: part.label.clone(),
        src: part.src.clone(),
        correct_x: correct.x.round(),
        correct_y: correct.y.round(),
        width: size.x,
        height: size.y,
        z: Some(part.z.unwrap_or(DEFAULT_Z)),
        anchor_x: Some(anchor.x),
        anchor_y: Some(anchor.y),
        origin_x: Some(origin.x),
        origin_y: Some(origin.y),
    }
}

/// Full export document. Without a canvas the board size is recorded.
pub fn export_doc(canvas: Option<Canvas>, parts: Vec<PartRecord>) -> PartsDoc {
    PartsDoc::Document {
        canvas: Some(canvas.unwrap_or(Canvas {
            w: DEFAULT_BOARD_W,
            h: DEFAULT_BOARD_H,
        })),
        parts,
    }
}

/// Grab-handle radius for a part of the given on-board size.
#[inline]
pub fn hotspot_radius(width: f64, height: f64) -> f64 {
    (width.min(height) * 0.2).clamp(12.0, 48.0)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn part() -> PartRecord {
        PartRecord {
            id: "skull".into(),
            label: "Skull".into(),
            src: "parts/skull.png".into(),
            correct_x: 300.0,
            correct_y: 120.0,
            width: 200.0,
            height: 100.0,
            z: None,
            anchor_x: None,
            anchor_y: None,
            origin_x: None,
            origin_y: None,
        }
    }

    #[test]
    fn fit_scales_and_centers() {
        let fit = CanvasFit::fit(1200.0, 600.0, Some(Canvas { w: 800.0, h: 600.0 }));
        assert_eq!(fit.scale, 1.0);
        assert_eq!(fit.offset, Vector2::new(200.0, 0.0));

        let fit = CanvasFit::fit(1200.0, 600.0, Some(Canvas { w: 2400.0, h: 600.0 }));
        assert_eq!(fit.scale, 0.5);
        assert_eq!(fit.offset, Vector2::new(0.0, 150.0));

        assert_eq!(CanvasFit::fit(1200.0, 600.0, None), CanvasFit::identity());
        assert_eq!(
            CanvasFit::fit(1200.0, 600.0, Some(Canvas { w: 0.0, h: 600.0 })),
            CanvasFit::identity()
        );
    }

    #[test]
    fn centered_anchor_coincides_with_center() {
        let fit = CanvasFit::identity();
        let [a, c, t] = target_candidates(&part(), &fit, part().size());
        assert_eq!(a.target, c.target);
        assert_eq!(c.target, Vector2::new(300.0, 120.0));
        assert_eq!(t.target, Vector2::new(400.0, 170.0));
        assert_eq!(
            [a.label, c.label, t.label],
            [
                CandidateLabel::Anchor,
                CandidateLabel::Center,
                CandidateLabel::TopLeftAsCenter
            ]
        );
    }

    #[test]
    fn top_left_anchor_with_origin() {
        let p = PartRecord {
            anchor_x: Some(0.0),
            anchor_y: Some(0.0),
            origin_x: Some(10.0),
            origin_y: Some(20.0),
            ..part()
        };
        let fit = CanvasFit::fit(1200.0, 600.0, Some(Canvas { w: 2400.0, h: 600.0 }));
        let size = p.displayed_size(&fit, 1.0);
        assert_eq!(size, Vector2::new(100.0, 50.0));
        let [a, c, _] = target_candidates(&p, &fit, size);
        // center = (150, 60) + (0, 150)
        assert_eq!(c.target, Vector2::new(150.0, 210.0));
        // anchor = center - (0.5*100, 0.5*50) + (5, 10)
        assert_eq!(a.target, Vector2::new(105.0, 195.0));
    }

    #[test]
    fn export_round_trips_anchor_position() {
        let p = PartRecord {
            anchor_x: Some(0.25),
            anchor_y: Some(0.75),
            origin_x: Some(4.0),
            origin_y: Some(6.0),
            ..part()
        };
        let fit = CanvasFit::fit(1200.0, 600.0, Some(Canvas { w: 1600.0, h: 900.0 }));
        let size = p.displayed_size(&fit, 1.0);
        let target = target_candidates(&p, &fit, size)[0].target;
        let pose = Pose::new(target.x, target.y, 0.0);
        let out = export_record(&p, Some(&pose), &fit, size, None);
        assert_eq!(out.correct(), p.correct());
        assert_eq!(out.z, Some(DEFAULT_Z));
        assert_eq!(out.anchor(), p.anchor());

        let unmoved = export_record(&p, None, &fit, size, Some(Vector2::new(512.0, 256.0)));
        assert_eq!(unmoved.correct(), p.correct());
        assert_eq!((unmoved.width, unmoved.height), (512.0, 256.0));
    }

    #[test]
    fn export_rounds_to_pixels() {
        let fit = CanvasFit::identity();
        let pose = Pose::new(300.4, 119.6, 0.0);
        let out = export_record(&part(), Some(&pose), &fit, part().size(), None);
        assert_eq!((out.correct_x, out.correct_y), (300.0, 120.0));
        assert_eq!(out.anchor_x, Some(0.5));
        assert_eq!(out.origin_x, Some(0.0));
    }

    #[test]
    fn hotspot_radius_clamps() {
        assert_eq!(hotspot_radius(20.0, 200.0), 12.0);
        assert_eq!(hotspot_radius(150.0, 100.0), 20.0);
        assert_eq!(hotspot_radius(1000.0, 900.0), 48.0);
    }

    #[test]
    fn parses_both_document_shapes() {
        let bare = r#"[{"id":"a","correctX":1,"correctY":2,"width":3,"height":4}]"#;
        let doc: PartsDoc = serde_json::from_str(bare).unwrap();
        assert!(matches!(doc, PartsDoc::List(_)));
        assert_eq!(doc.parts()[0].anchor(), Vector2::new(0.5, 0.5));
        assert_eq!(doc.canvas(), None);

        let full = r#"{"canvas":{"w":800,"h":400},"parts":[
            {"id":"b","label":"Tail","src":"t.png","correctX":10,"correctY":20,
             "width":30,"height":40,"z":3,"anchorX":0,"anchorY":1,"originX":5}]}"#;
        let doc: PartsDoc = serde_json::from_str(full).unwrap();
        assert_eq!(doc.canvas(), Some(Canvas { w: 800.0, h: 400.0 }));
        let b = &doc.parts()[0];
        assert_eq!(b.z, Some(3));
        assert_eq!(b.anchor(), Vector2::new(0.0, 1.0));
        assert_eq!(b.origin(), Vector2::new(5.0, 0.0));
    }

    #[test]
    fn export_doc_writes_camel_case_and_default_canvas() {
        let rec = export_record(&part(), None, &CanvasFit::identity(), part().size(), None);
        let v = serde_json::to_value(export_doc(None, vec![rec])).unwrap();
        assert_eq!(v["canvas"]["w"], 1200.0);
        assert_eq!(v["parts"][0]["correctX"], 300.0);
        assert_eq!(v["parts"][0]["anchorY"], 0.5);
        assert_eq!(v["parts"][0]["z"], 1);
    }
}
