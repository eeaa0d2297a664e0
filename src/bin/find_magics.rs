//! Search for magic numbers and print them as Rust constants.
//!
//! Usage: cargo run --release --bin find_magics -- --seed 1 --piece rook > magics.rs

use std::time::Instant;

use clap::{Parser, ValueEnum};
use color_eyre::eyre::Result;

use magic_attacks::finder::find_all;
use magic_attacks::magic::verify;
use magic_attacks::types::{PieceType, Square};

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
enum Slider {
    Rook,
    Bishop,
    Both,
}

#[derive(Parser, Debug)]
#[command(name = "find_magics")]
#[command(about = "Find collision-free magic numbers for rook and bishop attack tables")]
struct Args {
    /// Seed for the random candidates, the same seed always finds the same magics
    #[arg(short, long, default_value_t = 1)]
    seed: u64,

    #[arg(short, long, value_enum, default_value_t = Slider::Both)]
    piece: Slider,
}

fn print_table(pt: PieceType, magics: &[u64]) {
    println!(
        "pub const {}_MAGICS: [u64; 64] = [",
        pt.to_human().to_uppercase()
    );
    for row in magics.chunks(4) {
        let cells: Vec<String> = row.iter().map(|m| format!("0x{m:016X}")).collect();
        println!("    {},", cells.join(", "));
    }
    println!("];");
}

fn main() -> Result<()> {
    color_eyre::install()?;
    let args = Args::parse();

    let pieces: &[PieceType] = match args.piece {
        Slider::Rook => &[PieceType::Rook],
        Slider::Bishop => &[PieceType::Bishop],
        Slider::Both => &[PieceType::Rook, PieceType::Bishop],
    };

    println!(
        "// Generated by find_magics with seed {} on {}",
        args.seed,
        chrono::Local::now().format("%Y-%m-%d %H:%M:%S")
    );
    for &pt in pieces {
        let start = Instant::now();
        let magics = find_all(pt, args.seed);
        eprintln!("{} magics found in {:?}", pt.to_human(), start.elapsed());

        for (sq, &magic) in Square::all().zip(&magics) {
            verify(pt, sq, magic)?;
        }
        println!();
        print_table(pt, &magics);
    }
    Ok(())
}
