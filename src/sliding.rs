//! Brute-force sliding attacks, used to build and check the magic tables.
//! Never called on the lookup path.

use crate::bitboard::{file_bb, rank_bb, Bitboard, FILE_A, FILE_H, RANK_1, RANK_8};
use crate::types::{PieceType, Square};

/// Directions as (file delta, rank delta)
const ROOK_DIRECTIONS: [(i8, i8); 4] = [(0, 1), (0, -1), (1, 0), (-1, 0)];
const BISHOP_DIRECTIONS: [(i8, i8); 4] = [(1, 1), (1, -1), (-1, -1), (-1, 1)];

fn directions(pt: PieceType) -> &'static [(i8, i8); 4] {
    match pt {
        PieceType::Rook => &ROOK_DIRECTIONS,
        PieceType::Bishop => &BISHOP_DIRECTIONS,
        other => panic!("{} does not slide along a single set of rays", other.to_human()),
    }
}

/// Walk every ray of a rook or bishop from `sq` until the board edge or the first
/// occupied square. The blocker is part of the result, squares behind it are not.
/// Occupancy of `sq` itself is ignored.
pub fn ray_attacks(pt: PieceType, sq: Square, occupied: Bitboard) -> Bitboard {
    let mut attacks = Bitboard::EMPTY;

    for &(df, dr) in directions(pt) {
        let mut file = sq.file() as i8 + df;
        let mut rank = sq.rank() as i8 + dr;
        while (0..8).contains(&file) && (0..8).contains(&rank) {
            let target = Square::new(file as u8, rank as u8);
            attacks |= target;
            if occupied.contains(target) {
                break;
            }
            file += df;
            rank += dr;
        }
    }
    attacks
}

/// Board edge squares that are not on the rank or file of `sq`.
/// A blocker there cannot hide anything further along the ray.
pub fn edges(sq: Square) -> Bitboard {
    ((RANK_1 | RANK_8) & !rank_bb(sq.rank())) | ((FILE_A | FILE_H) & !file_bb(sq.file()))
}

/// Squares whose occupancy can change the attacks of a rook or bishop on `sq`
pub fn relevant_mask(pt: PieceType, sq: Square) -> Bitboard {
    ray_attacks(pt, sq, Bitboard::EMPTY) & !edges(sq)
}

/// Every subset of `mask`, starting with the empty set, via the Carry-Rippler trick
pub fn subsets(mask: Bitboard) -> impl Iterator<Item = Bitboard> {
    let mut subset = 0u64;
    let mut done = false;
    std::iter::from_fn(move || {
        if done {
            return None;
        }
        let current = subset;
        subset = subset.wrapping_sub(mask.0) & mask.0;
        if subset == 0 {
            done = true;
        }
        Some(Bitboard(current))
    })
}
