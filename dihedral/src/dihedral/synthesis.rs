use super::CnotDihedral;
use crate::affine::AffineFunction;
use crate::circuit::{Circuit, QubitId};
use crate::error::{DihedralError, Result};
use crate::operations::Gate;
use crate::unitary::UnitaryMatrix;
use itertools::Itertools;

impl CnotDihedral {
    /// Circuit over the generator gates that implements `self`.
    ///
    /// The affine part is reduced to the identity with `X` and CNOT gates (Gauss-Jordan
    /// elimination over GF(2)), which leaves the phase polynomial untouched. The remaining
    /// diagonal element is built term by term, highest degree first:
    ///
    /// ```text
    /// 4xᵢxⱼxₖ:  CX(i,k) CX(j,k) T(k) CX(i,k) CX(j,k)
    /// cxᵢxⱼ:    CX(i,j) P(j) CX(i,j)
    /// cxᵢ:      P(i)
    /// ```
    ///
    /// where `P` is a word in `T, S, Z, SInv, TInv`. The result is the diagonal part
    /// followed by the inverse of the reduction. No attempt is made to minimize gate count.
    ///
    /// # Errors
    ///
    /// [`InvalidElement`](DihedralError::InvalidElement) if `self` is not a valid element.
    pub fn to_circuit(&self) -> Result<Circuit> {
        self.validate()?;
        let reduction = self.affine_reduction()?;
        let mut res = self.diagonal_circuit()?;
        res.append(&reduction.inverse())?;
        Ok(res)
    }

    /// Dense `2ⁿ × 2ⁿ` matrix of the synthesized circuit; qubit `q` is bit `q` of a basis index.
    ///
    /// # Errors
    ///
    /// As for [`CnotDihedral::to_circuit`].
    pub fn to_matrix(&self) -> Result<UnitaryMatrix> {
        Ok(self.to_circuit()?.unitary())
    }

    /// Inverse element.
    ///
    /// # Errors
    ///
    /// As for [`CnotDihedral::to_circuit`].
    pub fn adjoint(&self) -> Result<CnotDihedral> {
        CnotDihedral::from_circuit(&self.to_circuit()?.inverse())
    }

    /// Element whose matrix is the entry-wise complex conjugate, up to global phase.
    ///
    /// # Errors
    ///
    /// As for [`CnotDihedral::to_circuit`].
    pub fn conjugate(&self) -> Result<CnotDihedral> {
        CnotDihedral::from_circuit(&self.to_circuit()?.conjugate())
    }

    /// Element whose matrix is the transpose, up to global phase.
    ///
    /// # Errors
    ///
    /// As for [`CnotDihedral::to_circuit`].
    pub fn transpose(&self) -> Result<CnotDihedral> {
        CnotDihedral::from_circuit(&self.to_circuit()?.reverse_ops())
    }

    /// `X` and CNOT gates `R` such that `R·self` has the identity affine part.
    fn affine_reduction(&self) -> Result<Circuit> {
        let n = self.num_qubits;
        let mut res = Circuit::new(n);
        let mut working = self.affine.clone();
        for qubit in self.shift().support() {
            res.push(Gate::X, &[qubit])?;
            working.flip_output(qubit);
        }
        let mut push_cx = |working: &mut AffineFunction, control: QubitId, target: QubitId| {
            working.add_output_into(control, target);
            res.push(Gate::ControlledX, &[control, target])
        };
        for column in 0..n {
            if !working.linear()[(column, column)] {
                let pivot = (column + 1..n)
                    .find(|row| working.linear()[(*row, column)])
                    .ok_or(DihedralError::InvalidElement("linear part is not invertible over GF(2)"))?;
                push_cx(&mut working, pivot, column)?;
                push_cx(&mut working, column, pivot)?;
                push_cx(&mut working, pivot, column)?;
            }
            for row in 0..n {
                if row != column && working.linear()[(row, column)] {
                    push_cx(&mut working, column, row)?;
                }
            }
        }
        debug_assert!(working.shift().is_zero() && working.linear().is_identity());
        Ok(res)
    }

    /// Circuit for the diagonal element with the phase polynomial of `self`.
    fn diagonal_circuit(&self) -> Result<Circuit> {
        let n = self.num_qubits;
        let target = &self.poly;
        let mut synthesized = DiagonalBuilder::new(n);

        for (first, second, third) in (0..n).tuple_combinations() {
            if target.term(&[first, second, third])? != 0 {
                synthesized.push(Gate::ControlledX, &[first, third])?;
                synthesized.push(Gate::ControlledX, &[second, third])?;
                synthesized.push(Gate::T, &[third])?;
                synthesized.push(Gate::ControlledX, &[first, third])?;
                synthesized.push(Gate::ControlledX, &[second, third])?;
            }
        }
        for (first, second) in (0..n).tuple_combinations() {
            let current = synthesized.element.poly.term(&[first, second])?;
            let power = ((current + 8 - target.term(&[first, second])?) % 8) / 2;
            if power != 0 {
                synthesized.push(Gate::ControlledX, &[first, second])?;
                synthesized.push_phase(power, second)?;
                synthesized.push(Gate::ControlledX, &[first, second])?;
            }
        }
        for qubit in 0..n {
            let current = synthesized.element.poly.term(&[qubit])?;
            let power = (target.term(&[qubit])? + 8 - current) % 8;
            synthesized.push_phase(power, qubit)?;
        }

        if synthesized.element.poly != *target {
            return Err(DihedralError::InvalidElement("phase polynomial cannot be synthesized"));
        }
        Ok(synthesized.circuit)
    }
}

/// Circuit under construction together with the element it implements.
struct DiagonalBuilder {
    circuit: Circuit,
    element: CnotDihedral,
}

impl DiagonalBuilder {
    fn new(num_qubits: usize) -> Self {
        Self {
            circuit: Circuit::new(num_qubits),
            element: CnotDihedral::identity(num_qubits),
        }
    }

    fn push(&mut self, gate: Gate, qubits: &[QubitId]) -> Result<()> {
        self.element.left_mul(gate, qubits)?;
        self.circuit.push(gate, qubits)
    }

    fn push_phase(&mut self, power: u8, qubit: QubitId) -> Result<()> {
        for gate in Gate::phase_gates(power) {
            self.push(gate, &[qubit])?;
        }
        Ok(())
    }
}
