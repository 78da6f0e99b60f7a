//! Batch snap evaluation over CSV files.
//!
//! Input columns: `x,y,rotation,target_x,target_y` (one anchor target per row).
//! Output columns: `matched,x,y,rotation`. Rows with missing values never match.

use anyhow::{Context, Result};
use jigsnap::snap::{CandidateLabel, Pose, SnapCandidate, SnapMatcher};
use polars::prelude::*;
use std::fs::File;
use std::path::Path;

const INPUT_COLUMNS: [&str; 5] = ["x", "y", "rotation", "target_x", "target_y"];

/// Evaluate every row of `input` and write the results to `out`. Returns the row count.
pub fn snap_batch(input: &Path, out: &Path, matcher: &SnapMatcher) -> Result<usize> {
    let df = LazyCsvReader::new(input)
        .with_has_header(true)
        .with_infer_schema_length(Some(100))
        .finish()
        .with_context(|| format!("opening {}", input.display()))?
        .select(
            INPUT_COLUMNS
                .iter()
                .map(|name| col(*name).cast(DataType::Float64))
                .collect::<Vec<_>>(),
        )
        .collect()
        .with_context(|| format!("reading columns {INPUT_COLUMNS:?} from {}", input.display()))?;

    let x = df.column("x")?.f64()?;
    let y = df.column("y")?.f64()?;
    let rot = df.column("rotation")?.f64()?;
    let tx = df.column("target_x")?.f64()?;
    let ty = df.column("target_y")?.f64()?;

    let n = df.height();
    let mut matched = Vec::with_capacity(n);
    let mut out_x = Vec::with_capacity(n);
    let mut out_y = Vec::with_capacity(n);
    let mut out_rot = Vec::with_capacity(n);
    let nan = |v: Option<f64>| v.unwrap_or(f64::NAN);
    for ((((px, py), pr), cx), cy) in x.into_iter().zip(y).zip(rot).zip(tx).zip(ty) {
        let pose = Pose::new(nan(px), nan(py), nan(pr));
        let target = SnapCandidate::new(nan(cx), nan(cy), CandidateLabel::Anchor);
        let r = matcher.evaluate(&pose, &[target]);
        matched.push(r.matched);
        out_x.push(r.position.x);
        out_y.push(r.position.y);
        out_rot.push(r.rotation_deg);
    }
    let hits = matched.iter().filter(|m| **m).count();
    tracing::info!(rows = n, matched = hits, "snap_batch");

    let mut result = df!(
        "matched" => matched,
        "x" => out_x,
        "y" => out_y,
        "rotation" => out_rot
    )?;
    crate::provenance::ensure_parent(out)?;
    let mut file = File::create(out).with_context(|| format!("creating {}", out.display()))?;
    CsvWriter::new(&mut file)
        .include_header(true)
        .finish(&mut result)
        .with_context(|| format!("writing {}", out.display()))?;
    Ok(n)
}

#[cfg(test)]
mod tests {
    use super::*;
    use jigsnap::snap::SnapCfg;
    use tempfile::tempdir;

    #[test]
    fn batch_matches_rows_independently() {
        let dir = tempdir().unwrap();
        let input = dir.path().join("poses.csv");
        let out = dir.path().join("out/results.csv");
        std::fs::write(
            &input,
            "x,y,rotation,target_x,target_y\n\
             100,100,3,104,100\n\
             100,100,30,104,100\n\
             0,0,0,50,50\n\
             10,10,-359,10,18\n",
        )
        .unwrap();

        let rows = snap_batch(&input, &out, &SnapMatcher::new(SnapCfg::default())).unwrap();
        assert_eq!(rows, 4);

        let df = LazyCsvReader::new(&out)
            .with_has_header(true)
            .finish()
            .unwrap()
            .collect()
            .unwrap();
        let matched: Vec<Option<bool>> = df.column("matched").unwrap().bool().unwrap().into_iter().collect();
        assert_eq!(matched, vec![Some(true), Some(false), Some(false), Some(true)]);
        let xs: Vec<Option<f64>> = df.column("x").unwrap().f64().unwrap().into_iter().collect();
        assert_eq!(xs[0], Some(104.0));
        assert_eq!(xs[1], Some(100.0));
        let rot: Vec<Option<f64>> = df.column("rotation").unwrap().f64().unwrap().into_iter().collect();
        assert_eq!(rot[0], Some(0.0));
        assert_eq!(rot[1], Some(30.0));
    }

    #[test]
    fn missing_column_is_an_error() {
        let dir = tempdir().unwrap();
        let input = dir.path().join("bad.csv");
        std::fs::write(&input, "x,y\n1,2\n").unwrap();
        let out = dir.path().join("never.csv");
        assert!(snap_batch(&input, &out, &SnapMatcher::default()).is_err());
        assert!(!out.exists());
    }
}
