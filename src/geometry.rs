//! Square geometry: leaper attacks, lines, between-squares and distances.
//!
//! Everything here is computed once while building the attack tables.

use crate::bitboard::Bitboard;
use crate::types::{Color, PieceType, Square};
use itertools::iproduct;

pub type PairTable<T> = Box<[[T; 64]; 64]>;

/// Raw index steps, checked for wrap-around by `safe_destination`
pub const KING_STEPS: [i8; 8] = [-9, -8, -7, -1, 1, 7, 8, 9];
pub const KNIGHT_STEPS: [i8; 8] = [-17, -15, -10, -6, 6, 10, 15, 17];
const WHITE_PAWN_STEPS: [i8; 2] = [7, 9];
const BLACK_PAWN_STEPS: [i8; 2] = [-7, -9];

/// Chebyshev distance: the larger of the file and rank differences
#[inline]
pub fn chebyshev(a: Square, b: Square) -> u8 {
    a.file().abs_diff(b.file()).max(a.rank().abs_diff(b.rank()))
}

/// The target of `step` from `sq`, or nothing if it leaves the board.
/// No leaper moves further than 2 files or ranks, so anything further wrapped around an edge.
fn safe_destination(sq: Square, step: i8) -> Bitboard {
    match sq.offset(step) {
        Some(to) if chebyshev(sq, to) <= 2 => to.bb(),
        _ => Bitboard::EMPTY,
    }
}

pub fn leaper_attacks(sq: Square, steps: &[i8]) -> Bitboard {
    steps
        .iter()
        .fold(Bitboard::EMPTY, |bb, &step| bb | safe_destination(sq, step))
}

pub fn pawn_attacks_bb(color: Color, sq: Square) -> Bitboard {
    match color {
        Color::White => leaper_attacks(sq, &WHITE_PAWN_STEPS),
        Color::Black => leaper_attacks(sq, &BLACK_PAWN_STEPS),
    }
}

pub fn init_distances() -> PairTable<u8> {
    let mut distance = Box::new([[0u8; 64]; 64]);
    for (a, b) in iproduct!(Square::all(), Square::all()) {
        distance[a.index()][b.index()] = chebyshev(a, b);
    }
    distance
}

/// Line and between tables, derived from empty-board and single-blocker slider attacks.
///
/// `line[a][b]` is the whole rank, file or diagonal through both squares (empty when
/// they share none). `between[a][b]` is the squares strictly between them plus `b`
/// itself, and just `b` when they are not aligned.
pub fn init_lines(
    slider_attacks: impl Fn(PieceType, Square, Bitboard) -> Bitboard,
) -> (PairTable<Bitboard>, PairTable<Bitboard>) {
    let mut line = Box::new([[Bitboard::EMPTY; 64]; 64]);
    let mut between = Box::new([[Bitboard::EMPTY; 64]; 64]);

    for (a, b) in iproduct!(Square::all(), Square::all()) {
        for pt in [PieceType::Bishop, PieceType::Rook] {
            if slider_attacks(pt, a, Bitboard::EMPTY).contains(b) {
                line[a.index()][b.index()] =
                    (slider_attacks(pt, a, Bitboard::EMPTY) & slider_attacks(pt, b, Bitboard::EMPTY))
                        | a
                        | b;
                between[a.index()][b.index()] =
                    slider_attacks(pt, a, b.bb()) & slider_attacks(pt, b, a.bb());
            }
        }
        between[a.index()][b.index()] |= b;
    }
    (line, between)
}

pub fn init_popcnt16() -> Box<[u8]> {
    (0..=u16::MAX).map(|i| i.count_ones() as u8).collect()
}

/// Population count through four 16-bit table lookups
#[inline]
pub fn popcount_with(table: &[u8], bb: Bitboard) -> u32 {
    let b = bb.0;
    table[(b & 0xFFFF) as usize] as u32
        + table[((b >> 16) & 0xFFFF) as usize] as u32
        + table[((b >> 32) & 0xFFFF) as usize] as u32
        + table[(b >> 48) as usize] as u32
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sliding::ray_attacks;

    fn sq(s: &str) -> Square {
        Square::from_algebraic(s).unwrap()
    }

    fn bb(squares: &[&str]) -> Bitboard {
        squares.iter().map(|s| sq(s)).collect()
    }

    #[test]
    fn test_knight_corner() {
        assert_eq!(leaper_attacks(Square::A1, &KNIGHT_STEPS), bb(&["b3", "c2"]));
        assert_eq!(leaper_attacks(Square::H8, &KNIGHT_STEPS), bb(&["g6", "f7"]));
    }

    #[test]
    fn test_knight_does_not_wrap() {
        // h1 + 10 lands on b3 and h1 + 17 on a4 without the distance check
        let attacks = leaper_attacks(Square::H1, &KNIGHT_STEPS);
        assert_eq!(attacks, bb(&["f2", "g3"]));
    }

    #[test]
    fn test_king_counts() {
        assert_eq!(leaper_attacks(Square::A1, &KING_STEPS), bb(&["a2", "b1", "b2"]));
        assert_eq!(leaper_attacks(sq("d4"), &KING_STEPS).count(), 8);
        assert_eq!(leaper_attacks(sq("h4"), &KING_STEPS).count(), 5);
    }

    #[test]
    fn test_pawn_attacks() {
        assert_eq!(pawn_attacks_bb(Color::White, sq("e4")), bb(&["d5", "f5"]));
        assert_eq!(pawn_attacks_bb(Color::Black, sq("e5")), bb(&["d4", "f4"]));
        assert_eq!(pawn_attacks_bb(Color::White, sq("a2")), bb(&["b3"]));
        assert_eq!(pawn_attacks_bb(Color::White, sq("h8")), Bitboard::EMPTY);
    }

    #[test]
    fn test_chebyshev() {
        assert_eq!(chebyshev(Square::A1, Square::H8), 7);
        assert_eq!(chebyshev(sq("d4"), sq("e6")), 2);
        assert_eq!(chebyshev(sq("d4"), sq("d4")), 0);
    }

    #[test]
    fn test_lines_from_ray_walker() {
        let (line, between) = init_lines(ray_attacks);
        let (c4, f7) = (sq("c4"), sq("f7"));
        assert_eq!(between[c4.index()][f7.index()], bb(&["d5", "e6", "f7"]));
        assert_eq!(
            line[c4.index()][f7.index()],
            bb(&["a2", "b3", "c4", "d5", "e6", "f7", "g8"])
        );
        // knight's move apart: no line, between is just the destination
        let b1 = sq("b1");
        let c3 = sq("c3");
        assert_eq!(line[b1.index()][c3.index()], Bitboard::EMPTY);
        assert_eq!(between[b1.index()][c3.index()], c3.bb());
    }

    #[test]
    fn test_popcount_table() {
        let table = init_popcnt16();
        assert_eq!(table.len(), 1 << 16);
        for b in [0u64, 1, 0xFFFF, 0x8000_0000_0000_0001, !0, 0x0123_4567_89AB_CDEF] {
            assert_eq!(popcount_with(&table, Bitboard(b)), b.count_ones());
        }
    }
}
