use std::fmt;

#[derive(Debug, PartialEq, Eq, Clone, Copy, Hash)]
pub enum Color {
    White,
    Black,
}

impl Color {
    pub const ALL: [Color; 2] = [Color::White, Color::Black];

    pub fn from_char(c: char) -> Option<Color> {
        match c {
            'w' => Some(Color::White),
            'b' => Some(Color::Black),
            _ => None,
        }
    }

    pub fn other(&self) -> Color {
        match self {
            Color::White => Color::Black,
            Color::Black => Color::White,
        }
    }

    #[inline(always)]
    pub const fn index(self) -> usize {
        self as usize
    }

    pub fn to_human(&self) -> &str {
        match self {
            Self::White => "white",
            Self::Black => "black",
        }
    }
}

#[derive(Debug, PartialEq, Eq, Clone, Copy, Hash)]
pub enum PieceType {
    Pawn,
    Knight,
    Bishop,
    Rook,
    Queen,
    King,
}

impl PieceType {
    pub const ALL: [PieceType; 6] = [
        PieceType::Pawn,
        PieceType::Knight,
        PieceType::Bishop,
        PieceType::Rook,
        PieceType::Queen,
        PieceType::King,
    ];

    pub fn from_char(c: char) -> Option<PieceType> {
        match c.to_ascii_lowercase() {
            'p' => Some(PieceType::Pawn),
            'n' => Some(PieceType::Knight),
            'b' => Some(PieceType::Bishop),
            'r' => Some(PieceType::Rook),
            'q' => Some(PieceType::Queen),
            'k' => Some(PieceType::King),
            _ => None,
        }
    }

    #[inline(always)]
    pub const fn index(self) -> usize {
        self as usize
    }

    /// Is the piece a sliding piece (one which can move multiple square in a given direction)
    pub fn is_sliding(&self) -> bool {
        matches!(self, PieceType::Rook | PieceType::Bishop | PieceType::Queen)
    }

    pub fn to_human(&self) -> &str {
        match self {
            Self::Pawn => "pawn",
            Self::Knight => "knight",
            Self::Bishop => "bishop",
            Self::Rook => "rook",
            Self::Queen => "queen",
            Self::King => "king",
        }
    }

    pub fn to_char(&self) -> char {
        match self {
            Self::Pawn => 'P',
            Self::Knight => 'N',
            Self::Bishop => 'B',
            Self::Rook => 'R',
            Self::Queen => 'Q',
            Self::King => 'K',
        }
    }
}

/// A board square, a1 = 0, b1 = 1, ..., h1 = 7, a2 = 8, ..., h8 = 63.
///
/// File is `index % 8` and rank is `index / 8`, both 0-indexed.
#[derive(Debug, PartialEq, Eq, PartialOrd, Ord, Clone, Copy, Hash)]
pub struct Square(u8);

impl Square {
    pub const A1: Square = Square(0);
    pub const H1: Square = Square(7);
    pub const A8: Square = Square(56);
    pub const H8: Square = Square(63);

    #[inline(always)]
    pub const fn new(file: u8, rank: u8) -> Self {
        debug_assert!(file < 8 && rank < 8);
        Square(rank * 8 + file)
    }

    #[inline(always)]
    pub const fn from_index(index: u8) -> Self {
        debug_assert!(index < 64);
        Square(index)
    }

    #[inline(always)]
    pub const fn index(self) -> usize {
        self.0 as usize
    }

    #[inline(always)]
    pub const fn file(self) -> u8 {
        self.0 & 7
    }

    #[inline(always)]
    pub const fn rank(self) -> u8 {
        self.0 >> 3
    }

    /// Raw index arithmetic. Says nothing about wrapping around the a/h files,
    /// callers that care have to check the distance travelled.
    #[inline]
    pub fn offset(self, step: i8) -> Option<Square> {
        let to = self.0 as i16 + step as i16;
        if (0..64).contains(&to) {
            Some(Square(to as u8))
        } else {
            None
        }
    }

    pub fn all() -> impl Iterator<Item = Square> + Clone {
        (0..64u8).map(Square)
    }

    pub fn from_algebraic(s: &str) -> Option<Square> {
        let mut chars = s.chars();
        let file_char = chars.next()?;
        let rank_char = chars.next()?;
        if chars.next().is_some() {
            return None;
        }
        if !('a'..='h').contains(&file_char) || !('1'..='8').contains(&rank_char) {
            return None;
        }
        Some(Square::new(
            file_char as u8 - b'a',
            rank_char as u8 - b'1',
        ))
    }

    pub fn to_algebraic(&self) -> String {
        format!(
            "{}{}",
            (self.file() + b'a') as char,
            (self.rank() + b'1') as char
        )
    }
}

impl fmt::Display for Square {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_algebraic())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_square_file_rank() {
        let d4 = Square::from_index(27);
        assert_eq!(d4.file(), 3);
        assert_eq!(d4.rank(), 3);
        assert_eq!(Square::new(3, 3), d4);
        assert_eq!(d4.to_algebraic(), "d4");
    }

    #[test]
    fn test_algebraic_roundtrip_and_rejects() {
        for sq in Square::all() {
            assert_eq!(Square::from_algebraic(&sq.to_algebraic()), Some(sq));
        }
        assert_eq!(Square::from_algebraic("i1"), None);
        assert_eq!(Square::from_algebraic("a9"), None);
        assert_eq!(Square::from_algebraic("a10"), None);
        assert_eq!(Square::from_algebraic(""), None);
    }

    #[test]
    fn test_offset_stays_on_index_range() {
        assert_eq!(Square::A1.offset(-1), None);
        assert_eq!(Square::H8.offset(1), None);
        // wraps to a2, which is why leaper tables need a distance check
        assert_eq!(Square::H1.offset(1), Some(Square::from_index(8)));
    }

    #[test]
    fn test_piece_type_chars() {
        for pt in PieceType::ALL {
            assert_eq!(PieceType::from_char(pt.to_char()), Some(pt));
        }
        assert_eq!(PieceType::from_char('x'), None);
        assert!(PieceType::Queen.is_sliding());
        assert!(!PieceType::Knight.is_sliding());
    }
}
