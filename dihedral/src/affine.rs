use crate::error::{check_dimensions, Result};
use crate::subscript_digits;
use gf2::{directly_summed, BitMatrix, BitVec};

/// Invertible affine map `x ↦ linear·x + shift` on `n` bits.
///
/// This is the classical, reversible part of a CNOT-dihedral element: the
/// computational basis state `|x⟩` is sent to `|linear·x + shift⟩`.
#[must_use]
#[derive(Clone, PartialEq, Eq, Hash)]
pub struct AffineFunction {
    linear: BitMatrix,
    shift: BitVec,
}

impl AffineFunction {
    pub fn identity(num_bits: usize) -> Self {
        Self {
            linear: BitMatrix::identity(num_bits),
            shift: BitVec::zeros(num_bits),
        }
    }

    /// Pairs a linear part with a shift without checking invertibility, see [`AffineFunction::is_valid`].
    pub fn new(linear: BitMatrix, shift: BitVec) -> Self {
        Self { linear, shift }
    }

    #[must_use]
    pub fn num_bits(&self) -> usize {
        self.shift.len()
    }

    pub fn linear(&self) -> &BitMatrix {
        &self.linear
    }

    pub fn shift(&self) -> &BitVec {
        &self.shift
    }

    /// `linear` is `n × n` for an `n`-bit shift and has full rank over GF(2).
    #[must_use]
    pub fn is_valid(&self) -> bool {
        self.linear.shape() == (self.num_bits(), self.num_bits()) && self.linear.is_invertible()
    }

    /// # Errors
    ///
    /// [`DimensionMismatch`](crate::DihedralError::DimensionMismatch) if `bits` is not `n` bits long.
    pub fn apply(&self, bits: &BitVec) -> Result<BitVec> {
        check_dimensions(self.num_bits(), bits.len())?;
        let mut image = &self.linear * bits;
        image ^= &self.shift;
        Ok(image)
    }

    /// The map `x ↦ self(other(x))`.
    ///
    /// # Errors
    ///
    /// [`DimensionMismatch`](crate::DihedralError::DimensionMismatch) on differing sizes.
    pub fn after(&self, other: &AffineFunction) -> Result<AffineFunction> {
        check_dimensions(self.num_bits(), other.num_bits())?;
        let linear = &self.linear * &other.linear;
        let mut shift = &self.linear * &other.shift;
        shift ^= &self.shift;
        Ok(Self { linear, shift })
    }

    /// Acts with `self` on the low bits and `other` on the high bits.
    pub fn direct_sum(&self, other: &AffineFunction) -> AffineFunction {
        Self {
            linear: directly_summed([&self.linear, &other.linear]),
            shift: self.shift.concatenated(&other.shift),
        }
    }

    /// Output bit `target` becomes `target ⊕ control`.
    pub(crate) fn add_output_into(&mut self, control: usize, target: usize) {
        self.linear.add_row_into(control, target);
        let control_shift = self.shift.index(control);
        if control_shift {
            self.shift.negate_index(target);
        }
    }

    pub(crate) fn flip_output(&mut self, index: usize) {
        self.shift.negate_index(index);
    }
}

impl std::fmt::Display for AffineFunction {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "(")?;
        for (row_index, row) in self.linear.rows().enumerate() {
            if row_index != 0 {
                write!(f, ", ")?;
            }
            let mut wrote = false;
            for column_index in row.support() {
                if wrote {
                    write!(f, " + ")?;
                }
                write!(f, "x{}", subscript_digits(column_index))?;
                wrote = true;
            }
            if row_index < self.shift.len() && self.shift.index(row_index) {
                write!(f, "{}1", if wrote { " + " } else { "" })?;
            } else if !wrote {
                write!(f, "0")?;
            }
        }
        write!(f, ")")
    }
}

impl std::fmt::Debug for AffineFunction {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "AffineFunction{self}")
    }
}
