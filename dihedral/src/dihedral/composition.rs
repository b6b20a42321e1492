use super::CnotDihedral;
use crate::error::{check_dimensions, DihedralError, Result};
use crate::polynomial::PhasePolynomial;
use std::ops::Mul;

impl CnotDihedral {
    /// `self ∘ other`: `other` acts first, then `self`.
    ///
    /// # Errors
    ///
    /// - [`DimensionMismatch`](DihedralError::DimensionMismatch) if the qubit counts differ.
    /// - [`DegreeOverflow`](DihedralError::DegreeOverflow) if an operand is not a valid element
    ///   and the product leaves the degree 3 polynomials.
    pub fn right_multiply(&self, other: &CnotDihedral) -> Result<CnotDihedral> {
        composed(self, other)
    }

    /// `other ∘ self`: `self` acts first, then `other`.
    ///
    /// # Errors
    ///
    /// As for [`CnotDihedral::right_multiply`].
    pub fn left_multiply(&self, other: &CnotDihedral) -> Result<CnotDihedral> {
        composed(other, self)
    }

    /// Circuit-style composition: with `front == false` the result applies `self` and then `other`,
    /// with `front == true` it applies `other` and then `self`.
    ///
    /// # Errors
    ///
    /// As for [`CnotDihedral::right_multiply`].
    pub fn compose(&self, other: &CnotDihedral, front: bool) -> Result<CnotDihedral> {
        if front {
            self.right_multiply(other)
        } else {
            self.left_multiply(other)
        }
    }

    /// [`CnotDihedral::compose`] restricted to `qubits` of `self`.
    ///
    /// Only the full, ordered qubit list `[0, 1, …, n-1]` is supported.
    ///
    /// # Errors
    ///
    /// [`UnsupportedOperation`](DihedralError::UnsupportedOperation) for any other qubit list,
    /// otherwise as for [`CnotDihedral::compose`].
    pub fn compose_on(&self, other: &CnotDihedral, qubits: &[usize], front: bool) -> Result<CnotDihedral> {
        if !qubits.iter().copied().eq(self.qubits()) {
            return Err(DihedralError::UnsupportedOperation(format!(
                "composition on qubits {qubits:?} of a {}-qubit element",
                self.num_qubits
            )));
        }
        self.compose(other, front)
    }

    /// `self` on qubits `0..n` and `other` on the following `m` qubits.
    pub fn tensor(&self, other: &CnotDihedral) -> CnotDihedral {
        CnotDihedral {
            num_qubits: self.num_qubits + other.num_qubits,
            poly: self.poly.direct_sum(&other.poly),
            affine: self.affine.direct_sum(&other.affine),
        }
    }

    /// `other` on the low qubits and `self` on the following ones.
    pub fn expand(&self, other: &CnotDihedral) -> CnotDihedral {
        other.tensor(self)
    }

    /// Output `i` as a polynomial in the inputs: `p_J`, or `1 - p_J` when shift bit `i` is set,
    /// with `J` the support of row `i` of the linear part.
    fn output_parities(&self) -> Result<Vec<PhasePolynomial>> {
        self.qubits()
            .map(|index| {
                let mut parity = PhasePolynomial::parity(self.num_qubits, self.linear().row(index).support())?;
                if self.shift().index(index) {
                    parity = -parity;
                    parity.set_constant(parity.constant() + 1);
                }
                Ok(parity)
            })
            .collect()
    }
}

/// `outer ∘ inner`.
///
/// The phase picked up by `|x⟩` is `p_inner(x) + p_outer(A_inner·x + b_inner)`; the second
/// summand is `p_outer` evaluated at the output parities of `inner`.
fn composed(outer: &CnotDihedral, inner: &CnotDihedral) -> Result<CnotDihedral> {
    check_dimensions(outer.num_qubits, inner.num_qubits)?;
    let affine = outer.affine.after(&inner.affine)?;
    let mut poly = outer.poly.evaluate(&inner.output_parities()?)?;
    poly += &inner.poly;
    poly.set_constant(0);
    Ok(CnotDihedral {
        num_qubits: outer.num_qubits,
        poly,
        affine,
    })
}

impl Mul for &CnotDihedral {
    type Output = CnotDihedral;

    /// `self ∘ rhs`, see [`CnotDihedral::right_multiply`].
    ///
    /// # Panics
    ///
    /// Panics if the qubit counts differ or an operand is not a valid element.
    fn mul(self, rhs: Self) -> CnotDihedral {
        match self.right_multiply(rhs) {
            Ok(product) => product,
            Err(error) => panic!("{error}"),
        }
    }
}
