//! Offline search for magic numbers.
//!
//! This is how the constants in [`crate::magic`] are produced. It is far too slow for
//! startup and is only run from the `find_magics` binary and tests.

use crate::bitboard::Bitboard;
use crate::sliding::{ray_attacks, relevant_mask, subsets};
use crate::types::{PieceType, Square};
use rand::prelude::*;
use rand::rngs::StdRng;
use rayon::prelude::*;

/// Magic candidates work best with few set bits
fn sparse_random(rng: &mut impl Rng) -> u64 {
    rng.gen::<u64>() & rng.gen::<u64>() & rng.gen::<u64>()
}

/// Search for a magic number of a rook or bishop on `sq`.
///
/// Candidates that do not spread the mask into the top byte are skipped without a full
/// check. The attack table doubles as the verification buffer; `epoch` records which
/// attempt last wrote each slot so nothing needs clearing between attempts.
pub fn find_magic(pt: PieceType, sq: Square, rng: &mut impl Rng) -> u64 {
    let mask = relevant_mask(pt, sq);
    let bits = mask.count();
    let shift = 64 - bits;
    let size = 1usize << bits;

    let (occupancy, reference): (Vec<Bitboard>, Vec<Bitboard>) = subsets(mask)
        .map(|occupied| (occupied, ray_attacks(pt, sq, occupied)))
        .unzip();

    let mut table = vec![Bitboard::EMPTY; size];
    let mut epoch = vec![0u32; size];
    let mut attempt = 0u32;

    loop {
        let magic = sparse_random(rng);
        if (mask.0.wrapping_mul(magic) >> 56).count_ones() < 6 {
            continue;
        }

        attempt += 1;
        let passed = occupancy.iter().zip(&reference).all(|(occupied, attacks)| {
            let index = (occupied.0.wrapping_mul(magic) >> shift) as usize;
            if epoch[index] < attempt {
                epoch[index] = attempt;
                table[index] = *attacks;
                true
            } else {
                table[index] == *attacks
            }
        });
        if passed {
            return magic;
        }
    }
}

/// Deterministic per-square seed, so squares can be searched in any order
fn square_seed(seed: u64, sq: Square) -> u64 {
    seed ^ (sq.index() as u64).wrapping_mul(0x9E37_79B9_7F4A_7C15)
}

/// Magic numbers for all 64 squares, searched in parallel
pub fn find_all(pt: PieceType, seed: u64) -> Vec<u64> {
    let squares: Vec<Square> = Square::all().collect();
    squares
        .par_iter()
        .map(|&sq| {
            let mut rng = StdRng::seed_from_u64(square_seed(seed, sq));
            find_magic(pt, sq, &mut rng)
        })
        .collect()
}
