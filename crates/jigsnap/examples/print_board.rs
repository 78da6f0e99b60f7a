//! Print an SVG document for a seeded board.
//!
//! Usage: `cargo run -p jigsnap --example print_board -- [seed] [difficulty]`
//! Defaults: seed 42, difficulty `easy`, board 1200×800.

use jigsnap::api::{generate_preset, Difficulty};

fn main() {
    let mut args = std::env::args().skip(1);
    let seed: u32 = args.next().and_then(|s| s.parse().ok()).unwrap_or(42);
    let difficulty: Difficulty = args
        .next()
        .and_then(|s| s.parse().ok())
        .unwrap_or(Difficulty::Easy);

    let (w, h) = (1200.0, 800.0);
    let board = generate_preset(difficulty, w, h, seed).expect("preset dimensions are valid");
    let pad = h * 0.2;

    println!(
        r#"<svg xmlns="http://www.w3.org/2000/svg" viewBox="{} {} {} {}">"#,
        -pad,
        -pad,
        w + 2.0 * pad,
        h + 2.0 * pad
    );
    println!(r##"  <rect x="0" y="0" width="{w}" height="{h}" fill="none" stroke="#ccc"/>"##);
    for p in &board.pieces {
        println!(
            r##"  <path id="{}" d="{}" fill="none" stroke="#333" stroke-width="1"/>"##,
            p.id,
            p.board_outline().to_svg_path()
        );
    }
    println!("</svg>");
    eprintln!(
        "seed={seed} difficulty={difficulty} pieces={} cell={:?}",
        board.pieces.len(),
        board.cell_size()
    );
}
