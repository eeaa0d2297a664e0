pub mod types;
pub mod bitboard;
pub mod sliding;
pub mod magic;
pub mod geometry;
pub mod attacks;
pub mod finder;
