//! PyO3 bindings for `jigsnap`.
//!
//! Notes
//! - Keep bindings thin: plain tuples in and out, no Python classes.
//! - `GenerateError` and unknown candidate labels surface as `ValueError`.

mod common;

use common::{candidates_from_py, map_generate_err, result_to_py, PyCandidate, PySnapResult};
use jigsnap::api::{self, Pose, SnapCfg, SnapMatcher};
use pyo3::prelude::*;

/// 32-bit FNV-1a seed for a string key.
#[pyfunction]
fn hash_str_to_seed(key: &str) -> u32 {
    api::hash_str_to_seed(key)
}

/// Generate a board; returns `(id, svg_path, x, y)` per piece in row-major
/// order, with the path in the piece's local frame and `(x, y)` its offset.
#[pyfunction]
fn generate_board(
    rows: u32,
    cols: u32,
    board_width: f64,
    board_height: f64,
    seed: u32,
) -> PyResult<Vec<(String, String, f64, f64)>> {
    let board = api::generate(rows, cols, board_width, board_height, seed).map_err(map_generate_err)?;
    Ok(board
        .pieces
        .into_iter()
        .map(|p| {
            let path = p.outline.to_svg_path();
            (p.id, path, p.offset.x, p.offset.y)
        })
        .collect())
}

/// Snap decision for `pose = (x, y, rotation_deg)` against `(x, y, label)` candidates.
#[pyfunction]
#[pyo3(signature = (pose, candidates, pos_tolerance_px = 8.0, angle_tolerance_deg = 5.0, lock_after_snap = false))]
fn evaluate_snap(
    pose: (f64, f64, f64),
    candidates: Vec<PyCandidate>,
    pos_tolerance_px: f64,
    angle_tolerance_deg: f64,
    lock_after_snap: bool,
) -> PyResult<PySnapResult> {
    let candidates = candidates_from_py(candidates)?;
    let matcher = SnapMatcher::new(SnapCfg {
        pos_tolerance_px,
        angle_tolerance_deg,
        lock_after_snap,
    });
    let result = matcher.evaluate(&Pose::new(pose.0, pose.1, pose.2), &candidates);
    Ok(result_to_py(&result))
}

#[pymodule]
fn jigsnap_native(_py: Python, m: &PyModule) -> PyResult<()> {
    m.add_function(wrap_pyfunction!(hash_str_to_seed, m)?)?;
    m.add_function(wrap_pyfunction!(generate_board, m)?)?;
    m.add_function(wrap_pyfunction!(evaluate_snap, m)?)?;
    m.add("VERSION", jigsnap::VERSION)?;
    Ok(())
}
