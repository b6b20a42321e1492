pub mod matrix;
pub mod vec;

pub use matrix::{directly_summed, BitMatrix, ParseBitMatrixError};
pub use vec::{BitVec, Word};

pub const WORD_BIT_LEN: usize = Word::BITS as usize;

#[inline]
#[must_use]
pub(crate) fn word_count(bit_length: usize) -> usize {
    bit_length.div_ceil(WORD_BIT_LEN)
}
