//! Precomputed attack tables and the lookup API used by move generation.
//!
//! All tables live in one process-wide [`AttackTables`], built exactly once by [`init`]
//! (or lazily by the first query) and never mutated afterwards, so lookups from any
//! number of threads need no locking.

use crate::bitboard::Bitboard;
use crate::geometry::{
    init_distances, init_lines, init_popcnt16, leaper_attacks, pawn_attacks_bb, popcount_with,
    PairTable, KING_STEPS, KNIGHT_STEPS,
};
use crate::magic::{init_magics, Indexing, Magic};
use crate::types::{Color, PieceType, Square};
use once_cell::sync::OnceCell;

pub struct AttackTables {
    rook_magics: Box<[Magic; 64]>,
    bishop_magics: Box<[Magic; 64]>,
    /// Empty-board attacks: pseudo_attacks[piece type][square]. Pawns are white pawns.
    pseudo_attacks: [[Bitboard; 64]; 6],
    pawn_attacks: [[Bitboard; 64]; 2],
    line: PairTable<Bitboard>,
    between: PairTable<Bitboard>,
    distance: PairTable<u8>,
    popcnt16: Box<[u8]>,
}

impl AttackTables {
    pub fn new() -> Self {
        Self::with_indexing(Indexing::default())
    }

    pub fn with_indexing(indexing: Indexing) -> Self {
        let rook_magics = init_magics(PieceType::Rook, indexing);
        let bishop_magics = init_magics(PieceType::Bishop, indexing);

        let slider = |pt: PieceType, sq: Square, occupied: Bitboard| match pt {
            PieceType::Rook => rook_magics[sq.index()].attacks(occupied),
            PieceType::Bishop => bishop_magics[sq.index()].attacks(occupied),
            other => unreachable!("{} is not a slider", other.to_human()),
        };

        let mut pseudo_attacks = [[Bitboard::EMPTY; 64]; 6];
        let mut pawn_attacks = [[Bitboard::EMPTY; 64]; 2];
        for sq in Square::all() {
            let s = sq.index();
            for color in Color::ALL {
                pawn_attacks[color.index()][s] = pawn_attacks_bb(color, sq);
            }
            let bishop = slider(PieceType::Bishop, sq, Bitboard::EMPTY);
            let rook = slider(PieceType::Rook, sq, Bitboard::EMPTY);

            pseudo_attacks[PieceType::Pawn.index()][s] = pawn_attacks[Color::White.index()][s];
            pseudo_attacks[PieceType::Knight.index()][s] = leaper_attacks(sq, &KNIGHT_STEPS);
            pseudo_attacks[PieceType::Bishop.index()][s] = bishop;
            pseudo_attacks[PieceType::Rook.index()][s] = rook;
            pseudo_attacks[PieceType::Queen.index()][s] = bishop | rook;
            pseudo_attacks[PieceType::King.index()][s] = leaper_attacks(sq, &KING_STEPS);
        }

        let (line, between) = init_lines(slider);

        AttackTables {
            rook_magics,
            bishop_magics,
            pseudo_attacks,
            pawn_attacks,
            line,
            between,
            distance: init_distances(),
            popcnt16: init_popcnt16(),
        }
    }

    #[inline(always)]
    pub fn rook_attacks(&self, sq: Square, occupied: Bitboard) -> Bitboard {
        self.rook_magics[sq.index()].attacks(occupied)
    }

    #[inline(always)]
    pub fn bishop_attacks(&self, sq: Square, occupied: Bitboard) -> Bitboard {
        self.bishop_magics[sq.index()].attacks(occupied)
    }

    #[inline(always)]
    pub fn queen_attacks(&self, sq: Square, occupied: Bitboard) -> Bitboard {
        self.rook_attacks(sq, occupied) | self.bishop_attacks(sq, occupied)
    }

    /// Attacks of any piece type. Leapers ignore `occupied`.
    #[inline(always)]
    pub fn attacks(&self, pt: PieceType, sq: Square, occupied: Bitboard) -> Bitboard {
        match pt {
            PieceType::Bishop => self.bishop_attacks(sq, occupied),
            PieceType::Rook => self.rook_attacks(sq, occupied),
            PieceType::Queen => self.queen_attacks(sq, occupied),
            _ => self.pseudo_attacks(pt, sq),
        }
    }

    #[inline(always)]
    pub fn pseudo_attacks(&self, pt: PieceType, sq: Square) -> Bitboard {
        self.pseudo_attacks[pt.index()][sq.index()]
    }

    #[inline(always)]
    pub fn pawn_attacks(&self, color: Color, sq: Square) -> Bitboard {
        self.pawn_attacks[color.index()][sq.index()]
    }

    #[inline(always)]
    pub fn line(&self, a: Square, b: Square) -> Bitboard {
        self.line[a.index()][b.index()]
    }

    #[inline(always)]
    pub fn between(&self, a: Square, b: Square) -> Bitboard {
        self.between[a.index()][b.index()]
    }

    #[inline(always)]
    pub fn distance(&self, a: Square, b: Square) -> u8 {
        self.distance[a.index()][b.index()]
    }

    #[inline(always)]
    pub fn popcount16(&self, bb: Bitboard) -> u32 {
        popcount_with(&self.popcnt16, bb)
    }

    pub fn rook_magic(&self, sq: Square) -> &Magic {
        &self.rook_magics[sq.index()]
    }

    pub fn bishop_magic(&self, sq: Square) -> &Magic {
        &self.bishop_magics[sq.index()]
    }
}

impl Default for AttackTables {
    fn default() -> Self {
        Self::new()
    }
}

/// Global attack tables (built once)
static TABLES: OnceCell<AttackTables> = OnceCell::new();

/// Build the global tables. Call at startup before spawning search threads;
/// later calls return immediately.
pub fn init() {
    TABLES.get_or_init(AttackTables::new);
}

/// Get the global tables, building them first if `init` was never called
#[inline(always)]
pub fn tables() -> &'static AttackTables {
    TABLES.get_or_init(AttackTables::new)
}

#[inline(always)]
pub fn attacks(pt: PieceType, sq: Square, occupied: Bitboard) -> Bitboard {
    tables().attacks(pt, sq, occupied)
}

#[inline(always)]
pub fn rook_attacks(sq: Square, occupied: Bitboard) -> Bitboard {
    tables().rook_attacks(sq, occupied)
}

#[inline(always)]
pub fn bishop_attacks(sq: Square, occupied: Bitboard) -> Bitboard {
    tables().bishop_attacks(sq, occupied)
}

#[inline(always)]
pub fn queen_attacks(sq: Square, occupied: Bitboard) -> Bitboard {
    tables().queen_attacks(sq, occupied)
}

#[inline(always)]
pub fn pseudo_attacks(pt: PieceType, sq: Square) -> Bitboard {
    tables().pseudo_attacks(pt, sq)
}

#[inline(always)]
pub fn pawn_attacks(color: Color, sq: Square) -> Bitboard {
    tables().pawn_attacks(color, sq)
}

/// The full rank, file or diagonal through both squares, empty if there is none
#[inline(always)]
pub fn line(a: Square, b: Square) -> Bitboard {
    tables().line(a, b)
}

/// Squares strictly between `a` and `b` on a shared line, plus `b`.
/// Just `b` when the squares are not aligned.
#[inline(always)]
pub fn between(a: Square, b: Square) -> Bitboard {
    tables().between(a, b)
}

/// Are the three squares on one rank, file or diagonal
#[inline(always)]
pub fn aligned(a: Square, b: Square, c: Square) -> bool {
    line(a, b).contains(c)
}

#[inline(always)]
pub fn distance(a: Square, b: Square) -> u8 {
    tables().distance(a, b)
}

/// Population count through the 16-bit lookup table
#[inline(always)]
pub fn popcount16(bb: Bitboard) -> u32 {
    tables().popcount16(bb)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sq(s: &str) -> Square {
        Square::from_algebraic(s).unwrap()
    }

    fn bb(squares: &[&str]) -> Bitboard {
        squares.iter().map(|s| sq(s)).collect()
    }

    #[test]
    fn test_rook_d4_with_blocker_on_d6() {
        init();
        let d4 = Square::from_index(27);
        let empty = attacks(PieceType::Rook, d4, Bitboard::EMPTY);
        assert_eq!(empty.count(), 14);
        assert_eq!(
            empty,
            bb(&["d1", "d2", "d3", "d5", "d6", "d7", "d8", "a4", "b4", "c4", "e4", "f4", "g4", "h4"])
        );

        let blocked = attacks(PieceType::Rook, d4, sq("d6").bb());
        assert!(blocked.contains(sq("d5")));
        assert!(blocked.contains(sq("d6")));
        assert!(!blocked.contains(sq("d7")));
        assert!(!blocked.contains(sq("d8")));
    }

    #[test]
    fn test_bishop_a1_empty_board() {
        assert_eq!(
            attacks(PieceType::Bishop, Square::A1, Bitboard::EMPTY),
            bb(&["b2", "c3", "d4", "e5", "f6", "g7", "h8"])
        );
    }

    #[test]
    fn test_magic_queen_attacks() {
        // Queen on e4 with no blockers: 14 rook + 13 bishop
        assert_eq!(queen_attacks(sq("e4"), Bitboard::EMPTY).count(), 27);
    }

    #[test]
    fn test_magic_bishop_attacks_with_blockers() {
        let occupied = bb(&["c2", "g6"]);
        let attacks = bishop_attacks(sq("e4"), occupied);

        assert!(attacks.contains(sq("c2"))); // blocker
        assert!(attacks.contains(sq("g6"))); // blocker
        assert!(!attacks.contains(sq("b1")));
        assert!(!attacks.contains(sq("h7")));
    }

    #[test]
    fn test_leapers_ignore_occupancy() {
        let everything = Bitboard::ALL;
        assert_eq!(attacks(PieceType::King, Square::A1, everything), bb(&["a2", "b1", "b2"]));
        assert_eq!(attacks(PieceType::Knight, Square::A1, everything), bb(&["b3", "c2"]));
        assert_eq!(attacks(PieceType::King, sq("d4"), Bitboard::EMPTY).count(), 8);
        assert_eq!(attacks(PieceType::Pawn, sq("e4"), everything), bb(&["d5", "f5"]));
    }

    #[test]
    fn test_pseudo_attacks_of_sliders_are_empty_board_attacks() {
        for s in Square::all() {
            for pt in [PieceType::Bishop, PieceType::Rook, PieceType::Queen] {
                assert_eq!(pseudo_attacks(pt, s), attacks(pt, s, Bitboard::EMPTY));
            }
        }
    }

    #[test]
    fn test_pawn_attacks_by_color() {
        assert_eq!(pawn_attacks(Color::White, sq("a2")), bb(&["b3"]));
        assert_eq!(pawn_attacks(Color::Black, sq("h7")), bb(&["g6"]));
        assert_eq!(pseudo_attacks(PieceType::Pawn, sq("c5")), pawn_attacks(Color::White, sq("c5")));
    }

    #[test]
    fn test_between_and_aligned() {
        assert_eq!(between(sq("a1"), sq("a4")), bb(&["a2", "a3", "a4"]));
        assert_eq!(between(sq("a1"), sq("b3")), bb(&["b3"]));
        assert_eq!(between(sq("e4"), sq("e4")), bb(&["e4"]));
        assert!(aligned(sq("a1"), sq("c3"), sq("h8")));
        assert!(!aligned(sq("a1"), sq("c3"), sq("h7")));
    }

    #[test]
    fn test_distance_and_popcount() {
        assert_eq!(distance(sq("a1"), sq("h8")), 7);
        assert_eq!(distance(sq("b2"), sq("c4")), 2);
        assert_eq!(popcount16(Bitboard(0xF0F0_0000_0000_0001)), 9);
    }

    #[test]
    fn test_init_twice_is_harmless() {
        init();
        let first = tables() as *const AttackTables;
        init();
        assert_eq!(first, tables() as *const AttackTables);
    }
}
