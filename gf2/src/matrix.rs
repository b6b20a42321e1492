use crate::BitVec;
use derive_more::Display;
use rand::Rng;
use std::ops::{Index, Mul};
use std::str::FromStr;

/// A dense matrix over GF(2), stored as packed rows.
///
/// Rows are [`BitVec`]s of equal length, so row operations (the workhorse of
/// Gaussian elimination) are word-parallel XORs.
///
/// # Example
///
/// ```
/// use gf2::BitMatrix;
///
/// let mut m = BitMatrix::identity(3);
/// m.add_row_into(0, 2);
/// assert_eq!(m.rank(), 3);
/// assert_eq!(&m * &m, BitMatrix::identity(3));
/// assert_eq!(format!("{m:#}"), "[100|010|101]");
/// ```
#[must_use]
#[derive(Clone, PartialEq, Eq, Hash)]
pub struct BitMatrix {
    column_count: usize,
    rows: Vec<BitVec>,
}

impl BitMatrix {
    pub fn zeros(row_count: usize, column_count: usize) -> Self {
        Self {
            column_count,
            rows: vec![BitVec::zeros(column_count); row_count],
        }
    }

    pub fn identity(dimension: usize) -> Self {
        Self {
            column_count: dimension,
            rows: (0..dimension).map(|index| BitVec::unit(dimension, index)).collect(),
        }
    }

    /// # Panics
    ///
    /// Panics if a row length differs from `column_count`.
    pub fn from_rows(rows: Vec<BitVec>, column_count: usize) -> Self {
        for row in &rows {
            assert_eq!(row.len(), column_count);
        }
        Self { column_count, rows }
    }

    /// Builds a matrix from nested iterators of booleans.
    ///
    /// # Panics
    ///
    /// Panics if a row does not have exactly `column_count` entries.
    pub fn from_iter<Row, Rows>(rows: Rows, column_count: usize) -> Self
    where
        Row: IntoIterator<Item = bool>,
        Rows: IntoIterator<Item = Row>,
    {
        Self::from_rows(rows.into_iter().map(|row| row.into_iter().collect()).collect(), column_count)
    }

    pub fn random(row_count: usize, column_count: usize, random_number_generator: &mut impl Rng) -> Self {
        Self {
            column_count,
            rows: (0..row_count)
                .map(|_| BitVec::random(column_count, random_number_generator))
                .collect(),
        }
    }

    /// Uniformly random invertible square matrix, by rejection sampling.
    pub fn random_invertible(dimension: usize, random_number_generator: &mut impl Rng) -> Self {
        loop {
            let candidate = Self::random(dimension, dimension, random_number_generator);
            if candidate.is_invertible() {
                return candidate;
            }
        }
    }

    #[must_use]
    pub fn row_count(&self) -> usize {
        self.rows.len()
    }

    #[must_use]
    pub fn column_count(&self) -> usize {
        self.column_count
    }

    #[must_use]
    pub fn shape(&self) -> (usize, usize) {
        (self.row_count(), self.column_count)
    }

    #[must_use]
    pub fn is_square(&self) -> bool {
        self.row_count() == self.column_count
    }

    pub fn row(&self, index: usize) -> &BitVec {
        &self.rows[index]
    }

    pub fn row_mut(&mut self, index: usize) -> &mut BitVec {
        &mut self.rows[index]
    }

    pub fn rows(&self) -> impl ExactSizeIterator<Item = &BitVec> {
        self.rows.iter()
    }

    #[must_use]
    pub fn get(&self, (row_index, column_index): (usize, usize)) -> bool {
        self.rows[row_index].index(column_index)
    }

    pub fn set(&mut self, (row_index, column_index): (usize, usize), to: bool) {
        self.rows[row_index].assign_index(column_index, to);
    }

    /// Row `to` becomes row `to` XOR row `from`.
    ///
    /// # Panics
    ///
    /// Panics if `from == to` or either index is out of bounds.
    pub fn add_row_into(&mut self, from: usize, to: usize) {
        assert_ne!(from, to);
        let (source, target) = if from < to {
            let (head, tail) = self.rows.split_at_mut(to);
            (&head[from], &mut tail[0])
        } else {
            let (head, tail) = self.rows.split_at_mut(from);
            (&tail[0], &mut head[to])
        };
        *target ^= source;
    }

    pub fn swap_rows(&mut self, first: usize, second: usize) {
        self.rows.swap(first, second);
    }

    #[must_use]
    pub fn is_zero(&self) -> bool {
        self.rows.iter().all(BitVec::is_zero)
    }

    #[must_use]
    pub fn is_identity(&self) -> bool {
        self.is_square() && *self == Self::identity(self.column_count)
    }

    /// Reduces the matrix in place to reduced row echelon form and returns
    /// the pivot column of every nonzero row (the rank profile).
    pub fn echelonize(&mut self) -> Vec<usize> {
        let mut rank_profile = Vec::with_capacity(self.column_count.min(self.row_count()));
        let mut pivot_row = 0;
        for column_index in 0..self.column_count {
            if pivot_row == self.row_count() {
                break;
            }
            let Some(found) = (pivot_row..self.row_count()).find(|row_index| self.get((*row_index, column_index)))
            else {
                continue;
            };
            self.swap_rows(found, pivot_row);
            for row_index in 0..self.row_count() {
                if row_index != pivot_row && self.get((row_index, column_index)) {
                    self.add_row_into(pivot_row, row_index);
                }
            }
            rank_profile.push(column_index);
            pivot_row += 1;
        }
        rank_profile
    }

    /// Dimension of the row space, computed exactly by Gaussian elimination.
    #[must_use]
    pub fn rank(&self) -> usize {
        self.clone().echelonize().len()
    }

    #[must_use]
    pub fn is_invertible(&self) -> bool {
        self.is_square() && self.rank() == self.column_count
    }

    /// Inverse by Gauss-Jordan elimination on `[self | I]`, `None` when singular.
    #[must_use]
    pub fn inverted(&self) -> Option<Self> {
        if !self.is_square() {
            return None;
        }
        let dimension = self.column_count;
        let identity = Self::identity(dimension);
        let augmented_rows = std::iter::zip(&self.rows, &identity.rows)
            .map(|(row, unit)| row.concatenated(unit))
            .collect();
        let mut augmented = Self::from_rows(augmented_rows, 2 * dimension);
        let rank_profile = augmented.echelonize();
        if rank_profile.iter().filter(|column| **column < dimension).count() != dimension {
            return None;
        }
        Some(Self::from_iter(
            augmented.rows.iter().map(|row| (dimension..2 * dimension).map(|index| row.index(index))),
            dimension,
        ))
    }

    pub fn transposed(&self) -> Self {
        let mut res = Self::zeros(self.column_count, self.row_count());
        for (row_index, row) in self.rows.iter().enumerate() {
            for column_index in row.support() {
                res.set((column_index, row_index), true);
            }
        }
        res
    }
}

impl Index<(usize, usize)> for BitMatrix {
    type Output = bool;

    fn index(&self, index: (usize, usize)) -> &Self::Output {
        if self.get(index) {
            &true
        } else {
            &false
        }
    }
}

impl Mul for &BitMatrix {
    type Output = BitMatrix;

    fn mul(self, other: Self) -> Self::Output {
        assert_eq!(self.column_count, other.row_count());
        let rows = self
            .rows
            .iter()
            .map(|row| {
                let mut product = BitVec::zeros(other.column_count);
                for index in row.support() {
                    product ^= other.row(index);
                }
                product
            })
            .collect();
        BitMatrix {
            column_count: other.column_count,
            rows,
        }
    }
}

impl Mul<&BitVec> for &BitMatrix {
    type Output = BitVec;

    fn mul(self, right: &BitVec) -> Self::Output {
        assert_eq!(right.len(), self.column_count);
        self.rows.iter().map(|row| row.dot(right)).collect()
    }
}

/// Block-diagonal direct sum of the given matrices, zeros off the diagonal blocks.
pub fn directly_summed<'t, Matrices>(matrices: Matrices) -> BitMatrix
where
    Matrices: IntoIterator<Item = &'t BitMatrix>,
{
    let matrices = Vec::from_iter(matrices);
    let column_count = matrices.iter().map(|matrix| matrix.column_count).sum();
    let mut rows = Vec::with_capacity(matrices.iter().map(|matrix| matrix.row_count()).sum());
    let mut column_offset = 0;
    for matrix in matrices {
        for row in &matrix.rows {
            rows.push(row.with_offset(column_offset, column_count));
        }
        column_offset += matrix.column_count;
    }
    BitMatrix { column_count, rows }
}

impl std::fmt::Display for BitMatrix {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        if f.alternate() {
            write!(f, "[")?;
        }
        for (row_index, row) in self.rows.iter().enumerate() {
            write!(f, "{row}")?;
            if f.alternate() {
                if row_index + 1 != self.row_count() {
                    write!(f, "|")?;
                }
            } else {
                writeln!(f)?;
            }
        }
        if f.alternate() {
            write!(f, "]")?;
        }
        Ok(())
    }
}

impl std::fmt::Debug for BitMatrix {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "BitMatrix(shape={:?},value={self:#})", self.shape())
    }
}

#[derive(Debug, Display, Clone, Copy, PartialEq, Eq)]
#[display("invalid character {_0:?} in bit matrix")]
pub struct ParseBitMatrixError(pub char);

impl std::error::Error for ParseBitMatrixError {}

impl FromStr for BitMatrix {
    type Err = ParseBitMatrixError;

    /// Parses rows of `0`/`1` separated by `|`, `;` or newlines, optionally in brackets.
    /// Rows shorter than the longest row are padded with zeros.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let mut rows = Vec::<Vec<bool>>::new();
        for row_string in s.split(['|', '[', ']', ';', '\n']) {
            let mut row = Vec::new();
            for char in row_string.chars() {
                match char {
                    '0' | '.' => row.push(false),
                    '1' => row.push(true),
                    ' ' | ',' | '\t' | '\r' => {}
                    _ => return Err(ParseBitMatrixError(char)),
                }
            }
            if !row.is_empty() {
                rows.push(row);
            }
        }
        let column_count = rows.iter().map(Vec::len).max().unwrap_or(0);
        Ok(Self::from_iter(
            rows.into_iter().map(|row| {
                let padding = column_count - row.len();
                row.into_iter().chain(std::iter::repeat(false).take(padding))
            }),
            column_count,
        ))
    }
}
