//! Magic bitboards for O(1) sliding piece attack lookups.
//!
//! For every square, the occupancy bits that can change a rook or bishop attack set
//! (the relevant mask) are hashed into a dense per-square table. The hash is either
//! a multiplication by a precomputed "magic number" followed by a shift keeping the top
//! `popcount(mask)` bits, or a parallel bit extract of exactly the mask bits. Both give
//! the same lookups, they only differ in speed and portability.
//!
//! Magic numbers are searched for offline (the `find_magics` binary does this), never
//! at startup.

use crate::bitboard::Bitboard;
use crate::sliding::{ray_attacks, relevant_mask, subsets};
use crate::types::{PieceType, Square};
use std::fmt;

/// Precomputed magic numbers for rook attacks.
/// Every one maps the subsets of its relevant mask without destructive collisions.
pub const ROOK_MAGICS: [u64; 64] = [
    0x0080001020400080, 0x0040001000200040, 0x0080081000200080, 0x0080040800100080,
    0x0080020400080080, 0x0080010200040080, 0x0080008001000200, 0x0080002040800100,
    0x0000800020400080, 0x0000400020005000, 0x0000801000200080, 0x0000800800100080,
    0x0000800400080080, 0x0000800200040080, 0x0000800100020080, 0x0000800040800100,
    0x0000208000400080, 0x0000404000201000, 0x0000808010002000, 0x0000808008001000,
    0x0000808004000800, 0x0000808002000400, 0x0000010100020004, 0x0000020000408104,
    0x0000208080004000, 0x0000200040005000, 0x0000100080200080, 0x0000080080100080,
    0x0000040080080080, 0x0000020080040080, 0x0000010080800200, 0x0000800080004100,
    0x0000204000800080, 0x0000200040401000, 0x0000100080802000, 0x0000080080801000,
    0x0000040080800800, 0x0000020080800400, 0x0000020001010004, 0x0000800040800100,
    0x0000204000808000, 0x0000200040008080, 0x0000100020008080, 0x0000080010008080,
    0x0000040008008080, 0x0000020004008080, 0x0000010002008080, 0x0000004081020004,
    0x0000204000800080, 0x0000200040008080, 0x0000100020008080, 0x0000080010008080,
    0x0000040008008080, 0x0000020004008080, 0x0000800100020080, 0x0000800041000080,
    0x00FFFCDDFCED714A, 0x007FFCDDFCED714A, 0x003FFFCDFFD88096, 0x0000040810002101,
    0x0001000204080011, 0x0001000204000801, 0x0001000082000401, 0x0001FFFAABFAD1A2,
];

/// Precomputed magic numbers for bishop attacks.
pub const BISHOP_MAGICS: [u64; 64] = [
    0x0002020202020200, 0x0002020202020000, 0x0004010202000000, 0x0004040080000000,
    0x0001104000000000, 0x0000821040000000, 0x0000410410400000, 0x0000104104104000,
    0x0000040404040400, 0x0000020202020200, 0x0000040102020000, 0x0000040400800000,
    0x0000011040000000, 0x0000008210400000, 0x0000004104104000, 0x0000002082082000,
    0x0004000808080800, 0x0002000404040400, 0x0001000202020200, 0x0000800802004000,
    0x0000800400A00000, 0x0000200100884000, 0x0000400082082000, 0x0000200041041000,
    0x0002080010101000, 0x0001040008080800, 0x0000208004010400, 0x0000404004010200,
    0x0000840000802000, 0x0000404002011000, 0x0000808001041000, 0x0000404000820800,
    0x0001041000202000, 0x0000820800101000, 0x0000104400080800, 0x0000020080080080,
    0x0000404040040100, 0x0000808100020100, 0x0001010100020800, 0x0000808080010400,
    0x0000820820004000, 0x0000410410002000, 0x0000082088001000, 0x0000002011000800,
    0x0000080100400400, 0x0001010101000200, 0x0002020202000400, 0x0001010101000200,
    0x0000410410400000, 0x0000208208200000, 0x0000002084100000, 0x0000000020880000,
    0x0000001002020000, 0x0000040408020000, 0x0004040404040000, 0x0002020202020000,
    0x0000104104104000, 0x0000002082082000, 0x0000000020841000, 0x0000000000208800,
    0x0000000010020200, 0x0000000404080200, 0x0000040404040400, 0x0002020202020200,
];

/// True when the crate was built to index with the BMI2 `pext` instruction
pub const HARDWARE_PEXT: bool = cfg!(all(
    feature = "pext",
    target_arch = "x86_64",
    target_feature = "bmi2"
));

/// How relevant occupancy is turned into a table index
#[derive(Debug, PartialEq, Eq, Clone, Copy)]
pub enum Indexing {
    /// `(occupancy * magic) >> (64 - popcount(mask))`
    Multiply,
    /// Pack the mask bits of the occupancy into the low bits of the index
    Extract,
}

impl Default for Indexing {
    fn default() -> Self {
        if HARDWARE_PEXT {
            Indexing::Extract
        } else {
            Indexing::Multiply
        }
    }
}

/// Parallel bit extract: gather the bits of `src` selected by `mask` into the low bits
#[cfg(all(feature = "pext", target_arch = "x86_64", target_feature = "bmi2"))]
#[inline(always)]
pub fn pext(src: u64, mask: u64) -> u64 {
    // SAFETY: only compiled when the target is known to support bmi2
    unsafe { std::arch::x86_64::_pext_u64(src, mask) }
}

/// Parallel bit extract: gather the bits of `src` selected by `mask` into the low bits
#[cfg(not(all(feature = "pext", target_arch = "x86_64", target_feature = "bmi2")))]
#[inline]
pub fn pext(src: u64, mask: u64) -> u64 {
    let mut mask = mask;
    let mut result = 0u64;
    let mut bit = 1u64;
    while mask != 0 {
        if src & mask & mask.wrapping_neg() != 0 {
            result |= bit;
        }
        mask &= mask - 1;
        bit <<= 1;
    }
    result
}

#[inline(always)]
fn multiply_index(occupied: Bitboard, magic: u64, shift: u32) -> usize {
    (occupied.0.wrapping_mul(magic) >> shift) as usize
}

/// Magic entry for a single square: everything needed to look up its attacks
#[derive(Debug, Clone)]
pub struct Magic {
    /// Relevant occupancy mask (excludes edges)
    pub mask: Bitboard,
    pub magic: u64,
    /// `64 - popcount(mask)`, or `None` when indexing by bit extraction
    pub shift: Option<u32>,
    /// Attack sets, `2^popcount(mask)` of them
    attacks: Box<[Bitboard]>,
}

impl Magic {
    /// Build the attack table of a rook or bishop on `sq`, walking every subset of the
    /// relevant mask with the reference ray walker.
    pub fn new(pt: PieceType, sq: Square, magic: u64, indexing: Indexing) -> Self {
        let mask = relevant_mask(pt, sq);
        let bits = mask.count();
        let shift = match indexing {
            Indexing::Multiply => Some(64 - bits),
            Indexing::Extract => None,
        };

        let mut entry = Magic {
            mask,
            magic,
            shift,
            attacks: vec![Bitboard::EMPTY; 1 << bits].into_boxed_slice(),
        };

        // only consulted by the debug assertion below
        let mut filled = vec![false; if cfg!(debug_assertions) { 1 << bits } else { 0 }];

        for occupied in subsets(mask) {
            let index = entry.index(occupied);
            let attacks = ray_attacks(pt, sq, occupied);
            debug_assert!(index < entry.attacks.len());
            if cfg!(debug_assertions) {
                debug_assert!(
                    !filled[index] || entry.attacks[index] == attacks,
                    "{} magic for {} collides at index {}",
                    pt.to_human(),
                    sq,
                    index
                );
                filled[index] = true;
            }
            entry.attacks[index] = attacks;
        }
        entry
    }

    /// Table index of an arbitrary occupancy. Bits outside the mask are ignored.
    #[inline(always)]
    pub fn index(&self, occupied: Bitboard) -> usize {
        let relevant = occupied & self.mask;
        match self.shift {
            Some(shift) => multiply_index(relevant, self.magic, shift),
            None => pext(relevant.0, self.mask.0) as usize,
        }
    }

    #[inline(always)]
    pub fn attacks(&self, occupied: Bitboard) -> Bitboard {
        self.attacks[self.index(occupied)]
    }

    pub fn table_len(&self) -> usize {
        self.attacks.len()
    }
}

/// The precomputed magic number of a rook or bishop on `sq`
pub fn magic_number(pt: PieceType, sq: Square) -> u64 {
    match pt {
        PieceType::Rook => ROOK_MAGICS[sq.index()],
        PieceType::Bishop => BISHOP_MAGICS[sq.index()],
        other => panic!("no magic numbers for {}", other.to_human()),
    }
}

/// Magic entries for all 64 squares of a rook or bishop
pub fn init_magics(pt: PieceType, indexing: Indexing) -> Box<[Magic; 64]> {
    Box::new(std::array::from_fn(|i| {
        let sq = Square::from_index(i as u8);
        Magic::new(pt, sq, magic_number(pt, sq), indexing)
    }))
}

/// Two relevant occupancies that share a table index but attack differently
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MagicCollision {
    pub piece: PieceType,
    pub square: Square,
    pub magic: u64,
    pub index: usize,
    pub first: Bitboard,
    pub second: Bitboard,
}

impl fmt::Display for MagicCollision {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} magic {:#018x} for {}: occupancies {:#018x} and {:#018x} both map to index {}",
            self.piece.to_human(),
            self.magic,
            self.square,
            self.first.0,
            self.second.0,
            self.index
        )
    }
}

impl std::error::Error for MagicCollision {}

/// Check that `magic` maps every subset of the relevant mask of `sq` to an index
/// holding its own attack set. Collisions between subsets with equal attacks are fine.
pub fn verify(pt: PieceType, sq: Square, magic: u64) -> Result<(), MagicCollision> {
    let mask = relevant_mask(pt, sq);
    let shift = 64 - mask.count();
    let mut seen: Vec<Option<(Bitboard, Bitboard)>> = vec![None; 1 << mask.count()];

    for occupied in subsets(mask) {
        let index = multiply_index(occupied, magic, shift);
        let attacks = ray_attacks(pt, sq, occupied);
        let slot = seen[index];
        match slot {
            Some((first, stored)) if stored != attacks => {
                return Err(MagicCollision {
                    piece: pt,
                    square: sq,
                    magic,
                    index,
                    first,
                    second: occupied,
                });
            }
            Some(_) => {}
            None => seen[index] = Some((occupied, attacks)),
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_shipped_magics_are_collision_free() {
        for sq in Square::all() {
            assert_eq!(verify(PieceType::Rook, sq, ROOK_MAGICS[sq.index()]), Ok(()));
            assert_eq!(verify(PieceType::Bishop, sq, BISHOP_MAGICS[sq.index()]), Ok(()));
        }
    }

    #[test]
    fn test_bad_magic_is_reported() {
        // zero sends every occupancy to index 0
        let err = verify(PieceType::Rook, Square::A1, 0).unwrap_err();
        assert_eq!(err.index, 0);
        assert_eq!(err.first, Bitboard::EMPTY);
        assert_ne!(
            ray_attacks(PieceType::Rook, Square::A1, err.first),
            ray_attacks(PieceType::Rook, Square::A1, err.second)
        );
        assert!(err.to_string().contains("rook magic"));
    }

    #[test]
    fn test_table_sizes() {
        let rooks = init_magics(PieceType::Rook, Indexing::Multiply);
        let bishops = init_magics(PieceType::Bishop, Indexing::Multiply);
        assert_eq!(rooks.iter().map(Magic::table_len).sum::<usize>(), 102_400);
        assert_eq!(bishops.iter().map(Magic::table_len).sum::<usize>(), 5_248);
        assert_eq!(rooks[0].shift, Some(52));
        assert_eq!(bishops[27].shift, Some(55));
    }

    #[test]
    fn test_pext_packs_mask_bits() {
        assert_eq!(pext(0b1010_1100, 0b1111_0000), 0b1010);
        assert_eq!(pext(0b1010_1100, 0b0101_0101), 0b0010);
        assert_eq!(pext(!0, 0x8000_0000_0000_0001), 0b11);
        assert_eq!(pext(0x1234, 0), 0);
    }

    #[test]
    fn test_extract_indexing_is_dense() {
        let entry = Magic::new(PieceType::Bishop, Square::A1, 0, Indexing::Extract);
        assert_eq!(entry.shift, None);
        let mut indices: Vec<usize> = subsets(entry.mask).map(|occ| entry.index(occ)).collect();
        indices.sort();
        assert_eq!(indices, (0..entry.table_len()).collect::<Vec<_>>());
    }

    #[test]
    fn test_strategies_agree_on_every_subset() {
        for pt in [PieceType::Rook, PieceType::Bishop] {
            for sq in Square::all() {
                let multiply = Magic::new(pt, sq, magic_number(pt, sq), Indexing::Multiply);
                let extract = Magic::new(pt, sq, magic_number(pt, sq), Indexing::Extract);
                for occupied in subsets(multiply.mask) {
                    assert_eq!(multiply.attacks(occupied), extract.attacks(occupied));
                }
            }
        }
    }

    #[test]
    fn test_bits_outside_mask_are_ignored() {
        let d4 = Square::from_algebraic("d4").unwrap();
        let magic = magic_number(PieceType::Rook, d4);
        let entry = Magic::new(PieceType::Rook, d4, magic, Indexing::Multiply);
        // edge squares and the origin itself never matter
        let noise = crate::sliding::edges(d4) | d4;
        let blockers = Square::from_algebraic("d6").unwrap().bb();
        assert_eq!(entry.attacks(blockers | noise), entry.attacks(blockers));
    }
}
