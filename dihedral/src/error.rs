use thiserror::Error;

pub type Result<T> = std::result::Result<T, DihedralError>;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum DihedralError {
    #[error("dimension mismatch: expected {expected} qubits, found {found}")]
    DimensionMismatch { expected: usize, found: usize },

    #[error("qubit index {index} is out of bounds for {num_qubits} qubits")]
    QubitIndex { index: usize, num_qubits: usize },

    #[error("invalid CNOT-dihedral element: {0}")]
    InvalidElement(&'static str),

    #[error("unsupported operation: {0}")]
    UnsupportedOperation(String),

    #[error("invalid polynomial term {0:?}: expected at most 3 distinct variables")]
    InvalidTerm(Vec<usize>),

    #[error("cannot parse circuit line {line}: {reason}")]
    Parse { line: usize, reason: String },

    #[error("substitution produced a degree {degree} monomial with nonzero coefficient {coefficient}")]
    DegreeOverflow { degree: usize, coefficient: u8 },
}

pub(crate) fn check_qubit(index: usize, num_qubits: usize) -> Result<()> {
    if index < num_qubits {
        Ok(())
    } else {
        Err(DihedralError::QubitIndex { index, num_qubits })
    }
}

pub(crate) fn check_dimensions(expected: usize, found: usize) -> Result<()> {
    if expected == found {
        Ok(())
    } else {
        Err(DihedralError::DimensionMismatch { expected, found })
    }
}
