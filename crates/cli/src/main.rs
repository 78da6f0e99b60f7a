use anyhow::{bail, Context, Result};
use clap::{ArgAction, Parser, Subcommand};
use jigsnap::api::{self, Difficulty};
use jigsnap::parts::{self, export_doc, export_record, CanvasFit, PartsDoc};
use jigsnap::rng::hash_str_to_seed;
use jigsnap::shape::{cfg::NOTCH_SCALE, generate_with, Board, PieceGeometry, ShapeCfg};
use jigsnap::snap::{
    cfg::{SNAP_ANGLE_DEG, SNAP_POS_PX},
    CandidateLabel, Pose, SnapCandidate, SnapCfg, SnapMatcher,
};
use jigsnap::rng::SeededRng;
use serde::Serialize;
use std::path::{Path, PathBuf};
use tracing::Level;
use tracing_subscriber::fmt::SubscriberBuilder;

mod batch;
mod provenance;

use provenance::{ensure_parent, Payload};

const DEFAULT_SEED: u32 = 42;

#[derive(Parser)]
#[command(name = "jigsnap")]
#[command(about = "Seeded jigsaw boards and snap matching")]
struct Cmd {
    /// More log output (-v debug, -vv trace)
    #[arg(short, long, action = ArgAction::Count, global = true)]
    verbose: u8,

    #[command(subcommand)]
    action: Action,
}

#[derive(Subcommand)]
enum Action {
    /// Generate a board and write it as JSON (plus optional SVG preview)
    Generate {
        /// Grid preset; explicit --rows/--cols override it
        #[arg(long)]
        difficulty: Option<Difficulty>,
        #[arg(long)]
        rows: Option<u32>,
        #[arg(long)]
        cols: Option<u32>,
        #[arg(long, default_value_t = parts::DEFAULT_BOARD_W)]
        width: f64,
        #[arg(long, default_value_t = parts::DEFAULT_BOARD_H)]
        height: f64,
        /// Decimal or 0x-prefixed hex
        #[arg(long, value_parser = parse_seed, conflicts_with = "key")]
        seed: Option<u32>,
        /// String key hashed into the seed
        #[arg(long)]
        key: Option<String>,
        #[arg(long, default_value_t = NOTCH_SCALE)]
        notch_scale: f64,
        #[arg(long)]
        out: PathBuf,
        #[arg(long)]
        svg: Option<PathBuf>,
    },
    /// Print the seed a string key hashes to
    Seed {
        #[arg(long)]
        key: String,
    },
    /// Evaluate one pose against explicit candidates
    Snap {
        #[arg(long, allow_hyphen_values = true)]
        x: f64,
        #[arg(long, allow_hyphen_values = true)]
        y: f64,
        #[arg(long, allow_hyphen_values = true, default_value_t = 0.0)]
        rotation: f64,
        /// `X,Y[,LABEL]`, repeatable; LABEL is anchor, center or top-left-as-center
        #[arg(long = "candidate", value_parser = parse_candidate, allow_hyphen_values = true)]
        candidates: Vec<SnapCandidate>,
        #[arg(long, default_value_t = SNAP_POS_PX)]
        pos_tol: f64,
        #[arg(long, default_value_t = SNAP_ANGLE_DEG)]
        angle_tol: f64,
        /// Lock the piece after a successful snap
        #[arg(long)]
        lock: bool,
        /// Include per-candidate diagnostics
        #[arg(long)]
        explain: bool,
    },
    /// Evaluate a CSV of poses (x,y,rotation,target_x,target_y)
    SnapBatch {
        #[arg(long)]
        input: PathBuf,
        #[arg(long)]
        out: PathBuf,
        #[arg(long, default_value_t = SNAP_POS_PX)]
        pos_tol: f64,
        #[arg(long, default_value_t = SNAP_ANGLE_DEG)]
        angle_tol: f64,
    },
    /// Print snap targets for every part of a parts document
    Parts {
        #[arg(long)]
        input: PathBuf,
        #[arg(long, default_value_t = parts::DEFAULT_BOARD_W)]
        board_width: f64,
        #[arg(long, default_value_t = parts::DEFAULT_BOARD_H)]
        board_height: f64,
        /// Display size factor applied on top of the canvas fit
        #[arg(long, default_value_t = 1.0)]
        factor: f64,
        /// Also write a normalized parts document (defaults filled in)
        #[arg(long)]
        export: Option<PathBuf>,
    },
    /// Print a small provenance JSON block
    Report,
}

fn main() -> Result<()> {
    let cmd = Cmd::parse();
    let level = match cmd.verbose {
        0 => Level::INFO,
        1 => Level::DEBUG,
        _ => Level::TRACE,
    };
    SubscriberBuilder::default()
        .with_target(false)
        .with_max_level(level)
        .with_writer(std::io::stderr)
        .init();
    match cmd.action {
        Action::Generate {
            difficulty,
            rows,
            cols,
            width,
            height,
            seed,
            key,
            notch_scale,
            out,
            svg,
        } => {
            let preset = difficulty.unwrap_or(Difficulty::Easy);
            let args = GenerateArgs {
                difficulty,
                rows: rows.unwrap_or(preset.rows()),
                cols: cols.unwrap_or(preset.cols()),
                width,
                height,
                seed: resolve_seed(seed, key.as_deref()),
                key,
                notch_scale,
            };
            generate(&args, &out, svg.as_deref())
        }
        Action::Seed { key } => {
            let seed = hash_str_to_seed(&key);
            tracing::info!(key, seed, "seed");
            println!("{seed}");
            Ok(())
        }
        Action::Snap {
            x,
            y,
            rotation,
            candidates,
            pos_tol,
            angle_tol,
            lock,
            explain,
        } => snap(
            Pose::new(x, y, rotation),
            &candidates,
            SnapCfg {
                pos_tolerance_px: pos_tol,
                angle_tolerance_deg: angle_tol,
                lock_after_snap: lock,
            },
            explain,
        ),
        Action::SnapBatch {
            input,
            out,
            pos_tol,
            angle_tol,
        } => {
            let matcher = SnapMatcher::new(SnapCfg {
                pos_tolerance_px: pos_tol,
                angle_tolerance_deg: angle_tol,
                ..SnapCfg::default()
            });
            let rows = batch::snap_batch(&input, &out, &matcher)?;
            let payload = Payload::new(
                "snap-batch",
                serde_json::json!({
                    "input": input.to_string_lossy(),
                    "rows": rows,
                    "pos_tol": pos_tol,
                    "angle_tol": angle_tol,
                }),
            );
            provenance::write_sidecar(&out, &[], &payload)?;
            Ok(())
        }
        Action::Parts {
            input,
            board_width,
            board_height,
            factor,
            export,
        } => parts_targets(&input, board_width, board_height, factor, export.as_deref()),
        Action::Report => report(),
    }
}

/// Decimal or `0x`/`0X` hex `u32`.
fn parse_seed(raw: &str) -> Result<u32, String> {
    let s = raw.trim();
    let parsed = match s.strip_prefix("0x").or_else(|| s.strip_prefix("0X")) {
        Some(hex) => u32::from_str_radix(hex, 16),
        None => s.parse::<u32>(),
    };
    parsed.map_err(|e| format!("invalid seed '{raw}': {e}"))
}

/// `X,Y[,LABEL]`; the label defaults to `anchor`.
fn parse_candidate(raw: &str) -> Result<SnapCandidate, String> {
    let fields: Vec<&str> = raw.split(',').map(str::trim).collect();
    let coord = |s: &str| {
        s.parse::<f64>()
            .map_err(|e| format!("invalid coordinate '{s}' in '{raw}': {e}"))
    };
    match fields.as_slice() {
        &[x, y] => Ok(SnapCandidate::new(coord(x)?, coord(y)?, CandidateLabel::Anchor)),
        &[x, y, label] => {
            let label = label.parse::<CandidateLabel>().map_err(|e| e.to_string())?;
            Ok(SnapCandidate::new(coord(x)?, coord(y)?, label))
        }
        _ => Err(format!("expected X,Y[,LABEL], got '{raw}'")),
    }
}

fn resolve_seed(seed: Option<u32>, key: Option<&str>) -> u32 {
    match (seed, key) {
        (Some(seed), _) => seed,
        (None, Some(key)) => hash_str_to_seed(key),
        (None, None) => DEFAULT_SEED,
    }
}

struct GenerateArgs {
    difficulty: Option<Difficulty>,
    rows: u32,
    cols: u32,
    width: f64,
    height: f64,
    seed: u32,
    key: Option<String>,
    notch_scale: f64,
}

#[derive(Serialize)]
struct PieceOut<'a> {
    #[serde(flatten)]
    piece: &'a PieceGeometry,
    /// SVG path data in the piece's local frame.
    path: String,
}

#[derive(Serialize)]
struct BoardOut<'a> {
    seed: u32,
    board_width: f64,
    board_height: f64,
    rows: u32,
    cols: u32,
    pieces: Vec<PieceOut<'a>>,
}

impl<'a> BoardOut<'a> {
    fn new(board: &'a Board, seed: u32) -> Self {
        Self {
            seed,
            board_width: board.board_width,
            board_height: board.board_height,
            rows: board.rows,
            cols: board.cols,
            pieces: board
                .pieces
                .iter()
                .map(|piece| PieceOut {
                    piece,
                    path: piece.outline.to_svg_path(),
                })
                .collect(),
        }
    }
}

fn generate(args: &GenerateArgs, out: &Path, svg: Option<&Path>) -> Result<()> {
    tracing::info!(
        rows = args.rows,
        cols = args.cols,
        width = args.width,
        height = args.height,
        seed = args.seed,
        "generate"
    );
    let cfg = ShapeCfg {
        notch_scale: args.notch_scale,
        ..ShapeCfg::default()
    };
    let mut rng = SeededRng::new(args.seed);
    let board = generate_with(args.rows, args.cols, args.width, args.height, &mut rng, &cfg)
        .context("generating board")?;

    ensure_parent(out)?;
    let json = serde_json::to_vec_pretty(&BoardOut::new(&board, args.seed))?;
    std::fs::write(out, json).with_context(|| format!("writing {}", out.display()))?;

    let mut extra = Vec::new();
    if let Some(svg_path) = svg {
        ensure_parent(svg_path)?;
        std::fs::write(svg_path, render_svg(&board))
            .with_context(|| format!("writing {}", svg_path.display()))?;
        extra.push(svg_path);
    }

    let payload = Payload::new(
        "generate",
        serde_json::json!({
            "difficulty": args.difficulty.map(|d| d.key()),
            "rows": args.rows,
            "cols": args.cols,
            "width": args.width,
            "height": args.height,
            "key": args.key,
            "notch_scale": args.notch_scale,
        }),
    )
    .with_seed(args.seed);
    provenance::write_sidecar(out, &extra, &payload)?;
    tracing::info!(pieces = board.pieces.len(), out = %out.display(), "generate_done");
    Ok(())
}

/// Standalone SVG document with every piece at its correct position.
fn render_svg(board: &Board) -> String {
    let pad = board.board_width.max(board.board_height) * 0.1;
    let mut doc = format!(
        r#"<svg xmlns="http://www.w3.org/2000/svg" viewBox="{} {} {} {}">"#,
        -pad,
        -pad,
        board.board_width + 2.0 * pad,
        board.board_height + 2.0 * pad
    );
    doc.push('\n');
    for p in &board.pieces {
        doc.push_str(&format!(
            r##"  <path id="{}" d="{}" fill="none" stroke="#222" stroke-width="1"/>"##,
            p.id,
            p.board_outline().to_svg_path()
        ));
        doc.push('\n');
    }
    doc.push_str("</svg>\n");
    doc
}

fn snap(pose: Pose, candidates: &[SnapCandidate], cfg: SnapCfg, explain: bool) -> Result<()> {
    let matcher = SnapMatcher::new(cfg);
    let result = matcher.evaluate(&pose, candidates);
    tracing::info!(matched = result.matched, label = ?result.label, "snap");
    let doc = if explain {
        serde_json::json!({
            "result": result,
            "checks": matcher.check(&pose, candidates),
        })
    } else {
        serde_json::to_value(result)?
    };
    println!("{}", serde_json::to_string_pretty(&doc)?);
    Ok(())
}

fn parts_targets(
    input: &Path,
    board_width: f64,
    board_height: f64,
    factor: f64,
    export: Option<&Path>,
) -> Result<()> {
    if !(factor.is_finite() && factor > 0.0) {
        bail!("--factor must be a positive number, got {factor}");
    }
    let raw = std::fs::read_to_string(input).with_context(|| format!("reading {}", input.display()))?;
    let doc: PartsDoc =
        serde_json::from_str(&raw).with_context(|| format!("parsing {}", input.display()))?;
    let fit = CanvasFit::fit(board_width, board_height, doc.canvas());
    tracing::info!(parts = doc.parts().len(), scale = fit.scale, "parts");

    let listing: Vec<serde_json::Value> = doc
        .parts()
        .iter()
        .map(|part| {
            let size = part.displayed_size(&fit, factor);
            serde_json::json!({
                "id": part.id,
                "displayed": [size.x, size.y],
                "hotspot_radius": parts::hotspot_radius(size.x, size.y),
                "candidates": parts::target_candidates(part, &fit, size),
            })
        })
        .collect();
    println!(
        "{}",
        serde_json::to_string_pretty(&serde_json::json!({ "fit": fit, "parts": listing }))?
    );

    if let Some(path) = export {
        let records = doc
            .parts()
            .iter()
            .map(|part| export_record(part, None, &fit, part.displayed_size(&fit, factor), None))
            .collect();
        ensure_parent(path)?;
        let out = serde_json::to_vec_pretty(&export_doc(doc.canvas(), records))?;
        std::fs::write(path, out).with_context(|| format!("writing {}", path.display()))?;
        tracing::info!(path = %path.display(), "parts_exported");
    }
    Ok(())
}

fn report() -> Result<()> {
    let obj = serde_json::json!({
        "code_rev": provenance::current_git_rev(),
        "jigsnap_version": jigsnap::VERSION,
        "difficulties": Difficulty::ALL
            .iter()
            .map(|d| serde_json::json!({ "key": d.key(), "rows": d.rows(), "cols": d.cols() }))
            .collect::<Vec<_>>(),
        "snap_defaults": {
            "pos_tolerance_px": SNAP_POS_PX,
            "angle_tolerance_deg": SNAP_ANGLE_DEG,
        },
        "sample_board_ok": api::generate(2, 2, 200.0, 200.0, DEFAULT_SEED).is_ok(),
    });
    println!("{}", serde_json::to_string_pretty(&obj)?);
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn seed_parsing_accepts_hex_and_decimal() {
        assert_eq!(parse_seed("42"), Ok(42));
        assert_eq!(parse_seed("0x2A"), Ok(42));
        assert_eq!(parse_seed("0XFFFFFFFF"), Ok(u32::MAX));
        assert!(parse_seed("-1").is_err());
        assert!(parse_seed("0xZZ").is_err());
    }

    #[test]
    fn candidate_parsing() {
        let c = parse_candidate("104,100").unwrap();
        assert_eq!((c.target.x, c.target.y, c.label), (104.0, 100.0, CandidateLabel::Anchor));
        let c = parse_candidate("-3.5, 7, top-left-as-center").unwrap();
        assert_eq!(c.target.x, -3.5);
        assert_eq!(c.label, CandidateLabel::TopLeftAsCenter);
        assert!(parse_candidate("1").is_err());
        assert!(parse_candidate("1,2,corner").is_err());
    }

    #[test]
    fn key_takes_effect_without_seed() {
        assert_eq!(resolve_seed(Some(7), None), 7);
        assert_eq!(resolve_seed(None, Some("a")), 0xE40C_292C);
        assert_eq!(resolve_seed(None, None), DEFAULT_SEED);
    }

    #[test]
    fn cli_definition_is_consistent() {
        use clap::CommandFactory;
        Cmd::command().debug_assert();
    }

    #[test]
    fn generate_writes_board_svg_and_sidecar() {
        let dir = tempdir().unwrap();
        let out = dir.path().join("boards/b.json");
        let svg = dir.path().join("boards/b.svg");
        let args = GenerateArgs {
            difficulty: None,
            rows: 2,
            cols: 2,
            width: 200.0,
            height: 200.0,
            seed: 42,
            key: None,
            notch_scale: NOTCH_SCALE,
        };
        generate(&args, &out, Some(svg.as_path())).unwrap();

        let board: serde_json::Value = serde_json::from_slice(&std::fs::read(&out).unwrap()).unwrap();
        assert_eq!(board["seed"], 42);
        assert_eq!(board["pieces"].as_array().unwrap().len(), 4);
        assert_eq!(board["pieces"][0]["id"], "r0c0");
        assert!(board["pieces"][0]["path"].as_str().unwrap().starts_with("M 0 0"));
        assert_eq!(board["pieces"][0]["edges"]["top"], "flat");

        let svg_text = std::fs::read_to_string(&svg).unwrap();
        assert_eq!(svg_text.matches("<path").count(), 4);
        assert!(dir.path().join("boards/b.provenance.json").exists());
    }

    #[test]
    fn generate_rejects_bad_dimensions() {
        let dir = tempdir().unwrap();
        let out = dir.path().join("b.json");
        let args = GenerateArgs {
            difficulty: None,
            rows: 0,
            cols: 2,
            width: 200.0,
            height: 200.0,
            seed: 1,
            key: None,
            notch_scale: NOTCH_SCALE,
        };
        assert!(generate(&args, &out, None).is_err());
        assert!(!out.exists());
    }

    #[test]
    fn parts_export_normalizes_records() {
        let dir = tempdir().unwrap();
        let input = dir.path().join("parts.json");
        std::fs::write(
            &input,
            r#"{"canvas":{"w":2400,"h":1200},"parts":[
                {"id":"jaw","correctX":400,"correctY":300,"width":120,"height":80}]}"#,
        )
        .unwrap();
        let export = dir.path().join("normalized.json");
        parts_targets(&input, 1200.0, 600.0, 1.0, Some(export.as_path())).unwrap();
        let doc: PartsDoc = serde_json::from_slice(&std::fs::read(&export).unwrap()).unwrap();
        let jaw = &doc.parts()[0];
        assert_eq!((jaw.correct_x, jaw.correct_y), (400.0, 300.0));
        assert_eq!(jaw.anchor_x, Some(0.5));
        assert_eq!(jaw.z, Some(1));
        assert!(parts_targets(&input, 1200.0, 600.0, 0.0, None).is_err());
    }
}
