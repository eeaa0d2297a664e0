//! Inspect and check the attack tables.
//!
//! Usage: cargo run --release --bin attacks -- show --piece r --square d4 --occupied d6 f4
//!        cargo run --release --bin attacks -- between a1 h8
//!        cargo run --release --bin attacks -- verify

use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::Instant;

use clap::{Parser, Subcommand};
use color_eyre::eyre::{bail, eyre, Result};
use itertools::iproduct;
use rayon::prelude::*;

use magic_attacks::attacks::{self, tables};
use magic_attacks::bitboard::Bitboard;
use magic_attacks::magic::{Indexing, HARDWARE_PEXT};
use magic_attacks::sliding::{ray_attacks, relevant_mask, subsets};
use magic_attacks::types::{PieceType, Square};

#[derive(Parser, Debug)]
#[command(name = "attacks")]
#[command(about = "Query and verify precomputed attack tables")]
struct Args {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Print the squares a piece attacks
    Show {
        /// Piece letter: p, n, b, r, q or k
        #[arg(short, long)]
        piece: char,

        /// Square the piece stands on, e.g. d4
        #[arg(short, long)]
        square: String,

        /// Occupied squares
        #[arg(short, long, num_args = 0..)]
        occupied: Vec<String>,
    },
    /// Print the line through two squares
    Line { a: String, b: String },
    /// Print the squares between two squares
    Between { a: String, b: String },
    /// Check every magic lookup against the ray walker
    Verify,
}

fn parse_square(s: &str) -> Result<Square> {
    Square::from_algebraic(s).ok_or_else(|| eyre!("`{s}` is not a square, expected e.g. e4"))
}

fn show(piece: char, square: &str, occupied: &[String]) -> Result<()> {
    let pt = PieceType::from_char(piece).ok_or_else(|| eyre!("unknown piece `{piece}`"))?;
    let sq = parse_square(square)?;
    let occupied = occupied
        .iter()
        .map(|s| parse_square(s))
        .collect::<Result<Bitboard>>()?;

    let attacked = attacks::attacks(pt, sq, occupied);
    println!("{} on {} attacks {} squares", pt.to_human(), sq, attacked.count());
    println!("{}", attacked.pretty());
    Ok(())
}

/// Returns the number of lookups checked
fn verify() -> Result<usize> {
    let tables = tables();
    let checked = AtomicUsize::new(0);

    let work: Vec<(PieceType, Square)> =
        iproduct!([PieceType::Rook, PieceType::Bishop], Square::all()).collect();

    let mismatches: Vec<String> = work
        .par_iter()
        .flat_map_iter(|&(pt, sq)| {
            let found: Vec<String> = subsets(relevant_mask(pt, sq))
                .filter_map(|occupied| {
                    checked.fetch_add(1, Ordering::Relaxed);
                    let expected = ray_attacks(pt, sq, occupied);
                    let actual = tables.attacks(pt, sq, occupied);
                    (expected != actual).then(|| {
                        format!("{} on {} with occupancy {:#018x}", pt.to_human(), sq, occupied.0)
                    })
                })
                .collect();
            found
        })
        .collect();

    for m in mismatches.iter().take(10) {
        eprintln!("mismatch: {m}");
    }
    if !mismatches.is_empty() {
        bail!("{} lookups disagree with the ray walker", mismatches.len());
    }
    Ok(checked.into_inner())
}

fn main() -> Result<()> {
    color_eyre::install()?;
    let args = Args::parse();

    let start = Instant::now();
    attacks::init();
    let indexing = match Indexing::default() {
        Indexing::Multiply => "magic multiply",
        Indexing::Extract if HARDWARE_PEXT => "hardware pext",
        Indexing::Extract => "software pext",
    };
    eprintln!("tables ready in {:?} ({indexing})", start.elapsed());

    match args.command {
        Command::Show {
            piece,
            square,
            occupied,
        } => show(piece, &square, &occupied)?,
        Command::Line { a, b } => {
            println!("{}", attacks::line(parse_square(&a)?, parse_square(&b)?).pretty())
        }
        Command::Between { a, b } => {
            println!("{}", attacks::between(parse_square(&a)?, parse_square(&b)?).pretty())
        }
        Command::Verify => {
            let start = Instant::now();
            let checked = verify()?;
            println!("{checked} lookups match in {:?}", start.elapsed());
        }
    }
    Ok(())
}
