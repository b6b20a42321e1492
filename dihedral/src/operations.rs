use derive_more::{Display, FromStr, TryFrom};
use smallvec::{smallvec, SmallVec};

/// Generators of the CNOT-dihedral group, as they appear in circuits.
///
/// `T = diag(1, ω)` with `ω = e^{iπ/4}`, `S = T²`, `Z = T⁴`; the remaining
/// variants are the usual Pauli, CNOT, CZ and SWAP gates.
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "schemars", derive(schemars::JsonSchema))]
#[derive(Clone, Copy, Debug, Display, FromStr, TryFrom, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[repr(u8)]
#[try_from(repr)]
pub enum Gate {
    I,
    X,
    Y,
    Z,
    T,
    TInv,
    S,
    SInv,
    ControlledX,
    ControlledZ,
    Swap,
}

pub const GATE_COUNT: usize = 11;

pub const ALL_GATES: [Gate; GATE_COUNT] = [
    Gate::I,
    Gate::X,
    Gate::Y,
    Gate::Z,
    Gate::T,
    Gate::TInv,
    Gate::S,
    Gate::SInv,
    Gate::ControlledX,
    Gate::ControlledZ,
    Gate::Swap,
];

/// Powers of `ω` picked up by `|1⟩` under the diagonal single-qubit gates.
const T_POWER: u8 = 1;
const S_POWER: u8 = 2;
const Z_POWER: u8 = 4;

impl Gate {
    #[must_use]
    pub fn arity(self) -> usize {
        match self {
            Gate::ControlledX | Gate::ControlledZ | Gate::Swap => 2,
            _ => 1,
        }
    }

    #[must_use]
    pub fn inverse(self) -> Gate {
        match self {
            Gate::T => Gate::TInv,
            Gate::TInv => Gate::T,
            Gate::S => Gate::SInv,
            Gate::SInv => Gate::S,
            other => other,
        }
    }

    /// Complex conjugate of the gate matrix, up to global phase.
    #[must_use]
    pub fn conjugate(self) -> Gate {
        self.inverse()
    }

    /// Every generator matrix is symmetric up to global phase.
    #[must_use]
    pub fn transpose(self) -> Gate {
        self
    }

    /// Power `k` such that the gate is `diag(1, ωᵏ)`, for the single-qubit diagonal gates.
    #[must_use]
    pub fn phase_power(self) -> Option<u8> {
        match self {
            Gate::T => Some(T_POWER),
            Gate::S => Some(S_POWER),
            Gate::Z => Some(Z_POWER),
            Gate::SInv => Some(8 - S_POWER),
            Gate::TInv => Some(8 - T_POWER),
            _ => None,
        }
    }

    /// Shortest word of `T, S, Z, SInv, TInv` gates equal to `diag(1, ωᵏ)`.
    ///
    /// # Example
    ///
    /// ```
    /// use dihedral::Gate;
    /// assert_eq!(Gate::phase_gates(5).as_slice(), [Gate::Z, Gate::T]);
    /// assert!(Gate::phase_gates(8).is_empty());
    /// ```
    #[must_use]
    pub fn phase_gates(power: u8) -> SmallVec<[Gate; 2]> {
        match power % 8 {
            1 => smallvec![Gate::T],
            2 => smallvec![Gate::S],
            3 => smallvec![Gate::S, Gate::T],
            4 => smallvec![Gate::Z],
            5 => smallvec![Gate::Z, Gate::T],
            6 => smallvec![Gate::SInv],
            7 => smallvec![Gate::TInv],
            _ => SmallVec::new(),
        }
    }

    /// Image of the basis state `|basis⟩` as `(index, k)`, meaning `ωᵏ |index⟩`.
    ///
    /// Qubit `q` is bit `q` of the basis index. `qubits` must hold
    /// [`Gate::arity`] distinct in-range indices.
    pub(crate) fn basis_image(self, qubits: &[usize], basis: usize) -> (usize, u8) {
        let bit = |index: usize| (basis >> qubits[index]) & 1 == 1;
        match self {
            Gate::I => (basis, 0),
            Gate::X => (basis ^ (1 << qubits[0]), 0),
            Gate::Y => (basis ^ (1 << qubits[0]), if bit(0) { 6 } else { 2 }),
            Gate::ControlledX => {
                if bit(0) {
                    (basis ^ (1 << qubits[1]), 0)
                } else {
                    (basis, 0)
                }
            }
            Gate::ControlledZ => (basis, if bit(0) && bit(1) { Z_POWER } else { 0 }),
            Gate::Swap => {
                if bit(0) == bit(1) {
                    (basis, 0)
                } else {
                    (basis ^ (1 << qubits[0]) ^ (1 << qubits[1]), 0)
                }
            }
            diagonal => {
                let power = diagonal.phase_power().unwrap_or_default();
                (basis, if bit(0) { power } else { 0 })
            }
        }
    }
}
