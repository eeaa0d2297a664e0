//! Bitboard representation.
//!
//! A bitboard is a 64-bit integer where each bit represents a square on the chess board.
//! Square indexing: a1 = 0, b1 = 1, ..., h1 = 7, a2 = 8, ..., h8 = 63
//! This corresponds to: square_index = rank * 8 + file where rank/file are 0-indexed.

use crate::types::Square;
use std::fmt;
use std::ops::{BitAnd, BitAndAssign, BitOr, BitOrAssign, BitXor, BitXorAssign, Not};

#[derive(Debug, PartialEq, Eq, Clone, Copy, Default, Hash)]
pub struct Bitboard(pub u64);

pub const FILE_A: Bitboard = Bitboard(0x0101010101010101);
pub const FILE_H: Bitboard = Bitboard(0x8080808080808080);
pub const RANK_1: Bitboard = Bitboard(0x00000000000000FF);
pub const RANK_8: Bitboard = Bitboard(0xFF00000000000000);

/// All the squares on the given file (0 = a)
#[inline(always)]
pub const fn file_bb(file: u8) -> Bitboard {
    Bitboard(FILE_A.0 << file)
}

/// All the squares on the given rank (0 = first rank)
#[inline(always)]
pub const fn rank_bb(rank: u8) -> Bitboard {
    Bitboard(RANK_1.0 << (8 * rank))
}

impl Bitboard {
    pub const EMPTY: Bitboard = Bitboard(0);
    pub const ALL: Bitboard = Bitboard(!0);

    #[inline(always)]
    pub const fn is_empty(self) -> bool {
        self.0 == 0
    }

    #[inline(always)]
    pub const fn contains(self, sq: Square) -> bool {
        self.0 & (1u64 << sq.index()) != 0
    }

    /// Number of set squares, using the hardware instruction where available
    #[inline(always)]
    pub const fn count(self) -> u32 {
        self.0.count_ones()
    }

    #[inline(always)]
    pub const fn more_than_one(self) -> bool {
        self.0 & self.0.wrapping_sub(1) != 0
    }

    #[inline(always)]
    pub fn lsb(self) -> Option<Square> {
        if self.0 == 0 {
            None
        } else {
            Some(Square::from_index(self.0.trailing_zeros() as u8))
        }
    }

    #[inline(always)]
    pub fn pop_lsb(&mut self) -> Option<Square> {
        let sq = self.lsb()?;
        self.0 &= self.0 - 1; // Clear the lowest set bit
        Some(sq)
    }

    /// ASCII grid of the board with an `X` on every set square, rank 8 on top.
    /// Useful for debugging.
    pub fn pretty(self) -> String {
        const BORDER: &str = "+---+---+---+---+---+---+---+---+\n";

        let mut s = String::from(BORDER);
        for rank in (0..8).rev() {
            for file in 0..8 {
                s += if self.contains(Square::new(file, rank)) {
                    "| X "
                } else {
                    "|   "
                };
            }
            s += &format!("| {}\n", rank + 1);
            s += BORDER;
        }
        s += "  a   b   c   d   e   f   g   h\n";
        s
    }
}

impl From<Square> for Bitboard {
    #[inline(always)]
    fn from(sq: Square) -> Self {
        Bitboard(1u64 << sq.index())
    }
}

impl Square {
    #[inline(always)]
    pub fn bb(self) -> Bitboard {
        Bitboard::from(self)
    }
}

impl fmt::Display for Bitboard {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.pretty())
    }
}

macro_rules! impl_bit_op {
    ($trait:ident, $method:ident, $assign_trait:ident, $assign_method:ident, $op:tt) => {
        impl $trait for Bitboard {
            type Output = Bitboard;
            #[inline(always)]
            fn $method(self, rhs: Bitboard) -> Bitboard {
                Bitboard(self.0 $op rhs.0)
            }
        }

        impl $trait<Square> for Bitboard {
            type Output = Bitboard;
            #[inline(always)]
            fn $method(self, rhs: Square) -> Bitboard {
                self $op rhs.bb()
            }
        }

        impl<Rhs> $assign_trait<Rhs> for Bitboard
        where
            Bitboard: $trait<Rhs, Output = Bitboard>,
        {
            #[inline(always)]
            fn $assign_method(&mut self, rhs: Rhs) {
                *self = *self $op rhs;
            }
        }
    };
}

impl_bit_op!(BitAnd, bitand, BitAndAssign, bitand_assign, &);
impl_bit_op!(BitOr, bitor, BitOrAssign, bitor_assign, |);
impl_bit_op!(BitXor, bitxor, BitXorAssign, bitxor_assign, ^);

impl Not for Bitboard {
    type Output = Bitboard;
    #[inline(always)]
    fn not(self) -> Bitboard {
        Bitboard(!self.0)
    }
}

/// Iterate over set bits in a bitboard, returning squares
impl Iterator for Bitboard {
    type Item = Square;

    #[inline(always)]
    fn next(&mut self) -> Option<Self::Item> {
        self.pop_lsb()
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        let n = self.count() as usize;
        (n, Some(n))
    }
}

impl FromIterator<Square> for Bitboard {
    fn from_iter<I: IntoIterator<Item = Square>>(iter: I) -> Self {
        iter.into_iter().fold(Bitboard::EMPTY, |bb, sq| bb | sq)
    }
}
