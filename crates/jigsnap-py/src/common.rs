use jigsnap::api::{CandidateLabel, GenerateError, SnapCandidate, SnapResult};
use pyo3::exceptions::PyValueError;
use pyo3::prelude::*;

/// Python-side candidate: `(x, y, label)`.
pub type PyCandidate = (f64, f64, String);

/// Python-side result: `(matched, x, y, rotation_deg, locked, label)`.
pub type PySnapResult = (bool, f64, f64, f64, bool, Option<String>);

pub fn candidates_from_py(raw: Vec<PyCandidate>) -> PyResult<Vec<SnapCandidate>> {
    raw.into_iter()
        .map(|(x, y, label)| {
            let label = label
                .parse::<CandidateLabel>()
                .map_err(|err| PyValueError::new_err(err.to_string()))?;
            Ok(SnapCandidate::new(x, y, label))
        })
        .collect()
}

pub fn result_to_py(r: &SnapResult) -> PySnapResult {
    (
        r.matched,
        r.position.x,
        r.position.y,
        r.rotation_deg,
        r.locked,
        r.label.map(|l| l.key().to_string()),
    )
}

pub fn map_generate_err(err: GenerateError) -> PyErr {
    PyValueError::new_err(err.to_string())
}
