use num_complex::Complex64;
use std::f64::consts::FRAC_PI_4;
use std::ops::{Index, IndexMut, Mul};

pub const TOLERANCE: f64 = 1e-9;

/// Dense `2ᴺ × 2ᴺ` complex matrix in row-major order.
///
/// Qubit `q` corresponds to bit `q` of a basis index, so on two qubits the
/// basis is ordered `|00⟩, |10⟩, |01⟩, |11⟩` when states are written `|x₀x₁⟩`.
#[must_use]
#[derive(Clone, Debug, PartialEq)]
pub struct UnitaryMatrix {
    dimension: usize,
    entries: Vec<Complex64>,
}

/// `ωᵏ` with `ω = e^{iπ/4}`.
#[must_use]
pub fn omega_power(power: u8) -> Complex64 {
    Complex64::from_polar(1.0, FRAC_PI_4 * f64::from(power % 8))
}

impl UnitaryMatrix {
    pub fn zeros(dimension: usize) -> Self {
        Self {
            dimension,
            entries: vec![Complex64::new(0.0, 0.0); dimension * dimension],
        }
    }

    pub fn identity(dimension: usize) -> Self {
        let mut res = Self::zeros(dimension);
        for index in 0..dimension {
            res[(index, index)] = Complex64::new(1.0, 0.0);
        }
        res
    }

    #[must_use]
    pub fn dimension(&self) -> usize {
        self.dimension
    }

    /// Entry-wise complex conjugate.
    pub fn conj(&self) -> Self {
        Self {
            dimension: self.dimension,
            entries: self.entries.iter().map(Complex64::conj).collect(),
        }
    }

    pub fn transpose(&self) -> Self {
        let mut res = Self::zeros(self.dimension);
        for row in 0..self.dimension {
            for column in 0..self.dimension {
                res[(column, row)] = self[(row, column)];
            }
        }
        res
    }

    pub fn adjoint(&self) -> Self {
        self.transpose().conj()
    }

    #[must_use]
    pub fn is_unitary(&self) -> bool {
        (&self.adjoint() * self).approx_eq(&Self::identity(self.dimension))
    }

    /// Entry-wise equality within [`TOLERANCE`].
    #[must_use]
    pub fn approx_eq(&self, other: &UnitaryMatrix) -> bool {
        self.dimension == other.dimension
            && std::iter::zip(&self.entries, &other.entries).all(|(left, right)| (left - right).norm() < TOLERANCE)
    }

    /// Equality up to a unit-modulus scalar factor.
    #[must_use]
    pub fn approx_eq_up_to_phase(&self, other: &UnitaryMatrix) -> bool {
        if self.dimension != other.dimension {
            return false;
        }
        let pivot = self
            .entries
            .iter()
            .enumerate()
            .max_by(|(_, left), (_, right)| left.norm().total_cmp(&right.norm()))
            .map(|(index, _)| index);
        let Some(pivot) = pivot else {
            return true;
        };
        if self.entries[pivot].norm() < TOLERANCE {
            return other.entries.iter().all(|entry| entry.norm() < TOLERANCE);
        }
        let phase = other.entries[pivot] / self.entries[pivot];
        if (phase.norm() - 1.0).abs() > TOLERANCE {
            return false;
        }
        std::iter::zip(&self.entries, &other.entries).all(|(left, right)| (left * phase - right).norm() < TOLERANCE)
    }
}

impl Index<(usize, usize)> for UnitaryMatrix {
    type Output = Complex64;

    fn index(&self, (row, column): (usize, usize)) -> &Self::Output {
        &self.entries[row * self.dimension + column]
    }
}

impl IndexMut<(usize, usize)> for UnitaryMatrix {
    fn index_mut(&mut self, (row, column): (usize, usize)) -> &mut Self::Output {
        &mut self.entries[row * self.dimension + column]
    }
}

impl Mul for &UnitaryMatrix {
    type Output = UnitaryMatrix;

    /// # Panics
    ///
    /// Panics if the dimensions differ.
    fn mul(self, rhs: Self) -> Self::Output {
        assert_eq!(self.dimension, rhs.dimension);
        let dimension = self.dimension;
        let mut res = UnitaryMatrix::zeros(dimension);
        for row in 0..dimension {
            for middle in 0..dimension {
                let left = self[(row, middle)];
                if left.norm() < TOLERANCE {
                    continue;
                }
                for column in 0..dimension {
                    res[(row, column)] += left * rhs[(middle, column)];
                }
            }
        }
        res
    }
}
