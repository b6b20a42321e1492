use crate::affine::AffineFunction;
use crate::circuit::{Circuit, Instruction, QubitId};
use crate::error::{check_qubit, DihedralError, Result};
use crate::operations::{Gate, ALL_GATES};
use crate::polynomial::PhasePolynomial;
use gf2::{BitMatrix, BitVec};
use itertools::Itertools;
use rand::Rng;
use std::fmt::{Debug, Display};

mod composition;
mod synthesis;

/// Element of the CNOT-dihedral group on `n` qubits.
///
/// The group is generated by CNOT, `T = diag(1, ω)` and `X` gates, with
/// `ω = e^{iπ/4}`. Every element acts on computational basis states as
///
/// ```text
/// |x⟩ ↦ ω^{p(x)} |Ax + b⟩
/// ```
///
/// where `x ↦ Ax + b` is an invertible [`AffineFunction`] over GF(2) and `p`
/// is a [`PhasePolynomial`] of degree at most 3 with coefficients in Z₈.
/// Global phase is not tracked, so the constant term of `p` is always zero
/// for valid elements.
///
/// Gates are applied by left multiplication, that is, `left_mul_*(...)`
/// replaces the element `U` by `G·U`.
///
/// # Example
///
/// ```
/// use dihedral::CnotDihedral;
///
/// let mut element = CnotDihedral::identity(2);
/// element.left_mul_cx(0, 1)?;
/// element.left_mul_phase(1, 1)?;
/// assert!(element.is_valid());
/// assert_eq!(element.poly().term(&[0, 1])?, 6);
/// # Ok::<(), dihedral::DihedralError>(())
/// ```
#[must_use]
#[derive(Clone, PartialEq, Eq, Hash)]
pub struct CnotDihedral {
    num_qubits: usize,
    poly: PhasePolynomial,
    affine: AffineFunction,
}

impl CnotDihedral {
    pub fn identity(num_qubits: usize) -> Self {
        Self {
            num_qubits,
            poly: PhasePolynomial::zero(num_qubits),
            affine: AffineFunction::identity(num_qubits),
        }
    }

    /// # Errors
    ///
    /// [`InvalidElement`](DihedralError::InvalidElement) if the parts do not form a group element,
    /// see [`CnotDihedral::validate`].
    pub fn from_parts(poly: PhasePolynomial, affine: AffineFunction) -> Result<Self> {
        let res = Self::from_parts_unchecked(poly, affine);
        res.validate()?;
        Ok(res)
    }

    /// Skips validation; the qubit count is taken from the polynomial.
    pub fn from_parts_unchecked(poly: PhasePolynomial, affine: AffineFunction) -> Self {
        Self {
            num_qubits: poly.num_variables(),
            poly,
            affine,
        }
    }

    #[must_use]
    pub fn into_parts(self) -> (PhasePolynomial, AffineFunction) {
        (self.poly, self.affine)
    }

    /// The gates of `circuit` applied in order to the identity.
    ///
    /// # Errors
    ///
    /// As for [`CnotDihedral::left_mul`].
    pub fn from_circuit(circuit: &Circuit) -> Result<Self> {
        let mut res = Self::identity(circuit.num_qubits());
        for instruction in circuit {
            res.left_mul(instruction.gate, &instruction.qubits)?;
        }
        Ok(res)
    }

    /// Identity followed by `4n + 4` uniformly chosen generators on random qubits.
    pub fn random(num_qubits: usize, random_number_generator: &mut impl Rng) -> Self {
        let mut res = Self::identity(num_qubits);
        let gates = ALL_GATES
            .into_iter()
            .filter(|gate| *gate != Gate::I && gate.arity() <= num_qubits)
            .collect_vec();
        if gates.is_empty() {
            return res;
        }
        for _ in 0..4 * num_qubits + 4 {
            let gate = gates[random_number_generator.gen_range(0..gates.len())];
            let qubits = rand::seq::index::sample(random_number_generator, num_qubits, gate.arity()).into_vec();
            res.apply_unchecked(gate, &qubits);
        }
        res
    }

    #[must_use]
    pub fn num_qubits(&self) -> usize {
        self.num_qubits
    }

    pub fn qubits(&self) -> std::ops::Range<usize> {
        0..self.num_qubits
    }

    pub fn poly(&self) -> &PhasePolynomial {
        &self.poly
    }

    pub fn affine(&self) -> &AffineFunction {
        &self.affine
    }

    pub fn linear(&self) -> &BitMatrix {
        self.affine.linear()
    }

    pub fn shift(&self) -> &BitVec {
        self.affine.shift()
    }

    #[must_use]
    pub fn is_identity(&self) -> bool {
        self.poly.is_zero() && self.shift().is_zero() && self.linear().is_identity()
    }

    #[must_use]
    pub fn is_valid(&self) -> bool {
        self.validate().is_ok()
    }

    /// Checks that `self` is a CNOT-dihedral group element:
    ///
    /// - the polynomial has `n` variables, `n`, `C(n,2)` and `C(n,3)` linear, quadratic and cubic terms,
    ///   and a zero constant term;
    /// - linear coefficients are in `0..8`, quadratic ones in `{0,2,4,6}` and cubic ones in `{0,4}`;
    /// - the affine part has an `n`-bit shift and an invertible `n × n` linear part.
    ///
    /// # Errors
    ///
    /// [`InvalidElement`](DihedralError::InvalidElement) naming the first violated condition.
    pub fn validate(&self) -> Result<()> {
        let invalid = |reason| Err(DihedralError::InvalidElement(reason));
        let n = self.num_qubits;
        if self.poly.num_variables() != n {
            return invalid("phase polynomial has the wrong number of variables");
        }
        if !self.poly.has_consistent_term_counts() {
            return invalid("phase polynomial has the wrong number of terms");
        }
        if self.poly.constant() != 0 {
            return invalid("phase polynomial has a nonzero constant term");
        }
        if !self.poly.has_group_coefficients() {
            return invalid("phase polynomial coefficient outside the group range");
        }
        if self.affine.num_bits() != n || self.linear().shape() != (n, n) {
            return invalid("affine function has the wrong size");
        }
        if !self.linear().is_invertible() {
            return invalid("linear part is not invertible over GF(2)");
        }
        Ok(())
    }

    /// Left multiplication by CNOT with `control` and `target`.
    ///
    /// # Errors
    ///
    /// - [`QubitIndex`](DihedralError::QubitIndex) if a qubit is out of range.
    /// - [`UnsupportedOperation`](DihedralError::UnsupportedOperation) if `control == target`.
    pub fn left_mul_cx(&mut self, control: QubitId, target: QubitId) -> Result<()> {
        self.left_mul(Gate::ControlledX, &[control, target])
    }

    /// Left multiplication by `diag(1, ωᵏ)` on `qubit`.
    ///
    /// # Errors
    ///
    /// [`QubitIndex`](DihedralError::QubitIndex) if `qubit` is out of range.
    pub fn left_mul_phase(&mut self, power: u8, qubit: QubitId) -> Result<()> {
        check_qubit(qubit, self.num_qubits)?;
        self.phase_unchecked(power, qubit);
        Ok(())
    }

    /// Left multiplication by `X` on `qubit`.
    ///
    /// # Errors
    ///
    /// [`QubitIndex`](DihedralError::QubitIndex) if `qubit` is out of range.
    pub fn left_mul_x(&mut self, qubit: QubitId) -> Result<()> {
        check_qubit(qubit, self.num_qubits)?;
        self.affine.flip_output(qubit);
        Ok(())
    }

    /// Left multiplication by `gate` acting on `qubits`, with global phase dropped.
    ///
    /// # Errors
    ///
    /// As for [`Instruction::new`]; `self` is unchanged on error.
    pub fn left_mul(&mut self, gate: Gate, qubits: &[QubitId]) -> Result<()> {
        Instruction::new(gate, qubits, self.num_qubits)?;
        self.apply_unchecked(gate, qubits);
        Ok(())
    }

    fn apply_unchecked(&mut self, gate: Gate, qubits: &[QubitId]) {
        match gate {
            Gate::I => {}
            Gate::X => self.affine.flip_output(qubits[0]),
            Gate::Y => {
                self.affine.flip_output(qubits[0]);
                self.phase_unchecked(4, qubits[0]);
            }
            Gate::ControlledX => self.affine.add_output_into(qubits[0], qubits[1]),
            Gate::ControlledZ => {
                let (first, second) = (qubits[0], qubits[1]);
                self.phase_unchecked(7, second);
                self.phase_unchecked(7, first);
                self.affine.add_output_into(second, first);
                self.phase_unchecked(2, first);
                self.affine.add_output_into(second, first);
                self.phase_unchecked(7, second);
                self.phase_unchecked(7, first);
            }
            Gate::Swap => {
                let (first, second) = (qubits[0], qubits[1]);
                self.affine.add_output_into(first, second);
                self.affine.add_output_into(second, first);
                self.affine.add_output_into(first, second);
            }
            diagonal => {
                let power = diagonal.phase_power().unwrap_or_default();
                self.phase_unchecked(power, qubits[0]);
            }
        }
    }

    /// Output wire `qubit` carries `⊕_{j ∈ J} x_j ⊕ b` with `J` the support of its linear row,
    /// so the phase `ωᵏ` on it contributes `k·p_J` when `b = 0` and `k - k·p_J` when `b = 1`.
    fn phase_unchecked(&mut self, power: u8, qubit: QubitId) {
        let power = if self.shift().index(qubit) {
            (7 * (power % 8)) % 8
        } else {
            power % 8
        };
        let support = self.linear().row(qubit).support().collect_vec();
        self.poly.add_alternating_subset_terms(&support, power);
    }
}

impl Display for CnotDihedral {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "phase polynomial = {}\naffine function = {}", self.poly, self.affine)
    }
}

impl Debug for CnotDihedral {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        Display::fmt(self, f)
    }
}
