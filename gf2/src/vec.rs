use crate::{word_count, WORD_BIT_LEN};
use rand::Rng;
use std::ops::{BitAnd, BitXor, BitXorAssign};

pub type Word = u64;

/// A fixed-length vector of bits packed into 64-bit words.
///
/// Bits past `len()` in the last word are always zero, so word-wise equality,
/// hashing and weight computations never see stale data.
///
/// # Example
///
/// ```
/// use gf2::BitVec;
///
/// let mut v = BitVec::zeros(70);
/// v.assign_index(3, true);
/// v.assign_index(68, true);
/// assert_eq!(v.weight(), 2);
/// assert_eq!(v.support().collect::<Vec<_>>(), vec![3, 68]);
/// ```
#[must_use]
#[derive(Clone, PartialEq, Eq, Hash, Default)]
pub struct BitVec {
    bit_length: usize,
    words: Vec<Word>,
}

impl BitVec {
    pub fn zeros(length: usize) -> Self {
        Self {
            bit_length: length,
            words: vec![0; word_count(length)],
        }
    }

    pub fn ones(length: usize) -> Self {
        let mut res = Self {
            bit_length: length,
            words: vec![Word::MAX; word_count(length)],
        };
        res.clear_tail();
        res
    }

    /// Vector of the given length with a single bit set at `index`.
    ///
    /// # Panics
    ///
    /// Panics if `index >= length`.
    pub fn unit(length: usize, index: usize) -> Self {
        let mut res = Self::zeros(length);
        res.assign_index(index, true);
        res
    }

    pub fn random(length: usize, random_number_generator: &mut impl Rng) -> Self {
        let mut res = Self {
            bit_length: length,
            words: (0..word_count(length)).map(|_| random_number_generator.gen()).collect(),
        };
        res.clear_tail();
        res
    }

    /// Rebuilds a vector from its packed words.
    ///
    /// # Panics
    ///
    /// Panics if `words` does not hold exactly enough words for `length` bits.
    pub fn from_words(length: usize, words: &[Word]) -> Self {
        assert_eq!(words.len(), word_count(length));
        let mut res = Self {
            bit_length: length,
            words: words.to_vec(),
        };
        res.clear_tail();
        res
    }

    #[must_use]
    pub fn as_words(&self) -> &[Word] {
        &self.words
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.bit_length
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.bit_length == 0
    }

    /// # Panics
    ///
    /// Panics if `index` is out of bounds.
    #[must_use]
    pub fn index(&self, index: usize) -> bool {
        assert!(index < self.bit_length, "bit index {index} out of bounds for length {}", self.bit_length);
        (self.words[index / WORD_BIT_LEN] >> (index % WORD_BIT_LEN)) & 1 == 1
    }

    /// # Panics
    ///
    /// Panics if `index` is out of bounds.
    pub fn assign_index(&mut self, index: usize, to: bool) {
        assert!(index < self.bit_length, "bit index {index} out of bounds for length {}", self.bit_length);
        let mask = 1 << (index % WORD_BIT_LEN);
        let word = &mut self.words[index / WORD_BIT_LEN];
        if to {
            *word |= mask;
        } else {
            *word &= !mask;
        }
    }

    /// # Panics
    ///
    /// Panics if `index` is out of bounds.
    pub fn negate_index(&mut self, index: usize) {
        assert!(index < self.bit_length, "bit index {index} out of bounds for length {}", self.bit_length);
        self.words[index / WORD_BIT_LEN] ^= 1 << (index % WORD_BIT_LEN);
    }

    #[must_use]
    pub fn weight(&self) -> usize {
        self.words.iter().map(|word| word.count_ones() as usize).sum()
    }

    #[must_use]
    pub fn is_zero(&self) -> bool {
        self.words.iter().all(|word| *word == 0)
    }

    /// Indices of the set bits, in increasing order.
    pub fn support(&self) -> impl Iterator<Item = usize> + '_ {
        self.words.iter().enumerate().flat_map(|(word_index, word)| {
            let mut remaining = *word;
            std::iter::from_fn(move || {
                if remaining == 0 {
                    return None;
                }
                let bit = remaining.trailing_zeros() as usize;
                remaining &= remaining - 1;
                Some(word_index * WORD_BIT_LEN + bit)
            })
        })
    }

    pub fn iter(&self) -> impl Iterator<Item = bool> + '_ {
        (0..self.bit_length).map(|index| self.index(index))
    }

    /// Parity of the bitwise AND, i.e. the inner product over GF(2).
    ///
    /// # Panics
    ///
    /// Panics if the lengths differ.
    #[must_use]
    pub fn dot(&self, other: &BitVec) -> bool {
        assert_eq!(self.bit_length, other.bit_length);
        let ones: u32 = std::iter::zip(&self.words, &other.words)
            .map(|(left, right)| (left & right).count_ones())
            .sum();
        ones % 2 == 1
    }

    /// Concatenation of `self` followed by `other`.
    pub fn concatenated(&self, other: &BitVec) -> BitVec {
        self.iter().chain(other.iter()).collect()
    }

    /// Copy of `self` moved up by `offset` bits inside a zero vector of `length` bits.
    ///
    /// # Panics
    ///
    /// Panics if `offset + self.len() > length`.
    pub fn with_offset(&self, offset: usize, length: usize) -> BitVec {
        assert!(offset + self.bit_length <= length);
        let mut res = BitVec::zeros(length);
        for index in self.support() {
            res.assign_index(index + offset, true);
        }
        res
    }

    fn clear_tail(&mut self) {
        let used = self.bit_length % WORD_BIT_LEN;
        if used != 0 {
            if let Some(last) = self.words.last_mut() {
                *last &= (1 << used) - 1;
            }
        }
    }
}

impl FromIterator<bool> for BitVec {
    fn from_iter<Iterable: IntoIterator<Item = bool>>(iterable: Iterable) -> Self {
        let mut words = Vec::new();
        let mut bit_length = 0;
        for bit in iterable {
            if bit_length % WORD_BIT_LEN == 0 {
                words.push(0);
            }
            if bit {
                if let Some(last) = words.last_mut() {
                    *last |= 1 << (bit_length % WORD_BIT_LEN);
                }
            }
            bit_length += 1;
        }
        Self { bit_length, words }
    }
}

impl BitXorAssign<&BitVec> for BitVec {
    fn bitxor_assign(&mut self, rhs: &BitVec) {
        assert_eq!(self.bit_length, rhs.bit_length);
        for (word, other) in std::iter::zip(&mut self.words, &rhs.words) {
            *word ^= other;
        }
    }
}

impl BitXor for &BitVec {
    type Output = BitVec;

    fn bitxor(self, rhs: Self) -> Self::Output {
        let mut res = self.clone();
        res ^= rhs;
        res
    }
}

impl BitAnd for &BitVec {
    type Output = BitVec;

    fn bitand(self, rhs: Self) -> Self::Output {
        assert_eq!(self.bit_length, rhs.bit_length);
        BitVec {
            bit_length: self.bit_length,
            words: std::iter::zip(&self.words, &rhs.words).map(|(left, right)| left & right).collect(),
        }
    }
}

impl std::fmt::Display for BitVec {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        for bit in self.iter() {
            write!(f, "{}", u8::from(bit))?;
        }
        Ok(())
    }
}

impl std::fmt::Debug for BitVec {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "BitVec(len={},value={self})", self.bit_length)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn ones_clears_bits_past_length() {
        let v = BitVec::ones(65);
        assert_eq!(v.weight(), 65);
        assert_eq!(v.as_words()[1], 1);
    }

    #[test]
    fn support_spans_words() {
        let v: BitVec = (0..130).map(|index| index % 64 == 0).collect();
        assert_eq!(v.support().collect::<Vec<_>>(), vec![0, 64, 128]);
    }

    #[test]
    fn dot_is_parity_of_overlap() {
        let left: BitVec = [true, true, false, true].into_iter().collect();
        let right: BitVec = [true, false, true, true].into_iter().collect();
        assert!(!left.dot(&right));
        assert_eq!((&left & &right).support().collect::<Vec<_>>(), vec![0, 3]);
        assert!(left.dot(&BitVec::unit(4, 3)));
    }
}
