use crate::error::{check_dimensions, check_qubit, DihedralError, Result};
use crate::operations::Gate;
use crate::unitary::{omega_power, UnitaryMatrix};
use itertools::Itertools;
use smallvec::SmallVec;
use std::str::FromStr;

pub type QubitId = usize;

#[must_use]
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct Instruction {
    pub gate: Gate,
    pub qubits: SmallVec<[QubitId; 2]>,
}

impl Instruction {
    /// # Errors
    ///
    /// - [`UnsupportedOperation`](DihedralError::UnsupportedOperation) if the number of qubits does not
    ///   match [`Gate::arity`] or a qubit is repeated.
    /// - [`QubitIndex`](DihedralError::QubitIndex) if a qubit is not below `num_qubits`.
    pub fn new(gate: Gate, qubits: &[QubitId], num_qubits: usize) -> Result<Self> {
        if qubits.len() != gate.arity() {
            return Err(DihedralError::UnsupportedOperation(format!(
                "{gate} acts on {} qubit(s), got {qubits:?}",
                gate.arity()
            )));
        }
        for qubit in qubits {
            check_qubit(*qubit, num_qubits)?;
        }
        if !qubits.iter().all_unique() {
            return Err(DihedralError::UnsupportedOperation(format!("{gate} on repeated qubits {qubits:?}")));
        }
        Ok(Self {
            gate,
            qubits: SmallVec::from_slice(qubits),
        })
    }

    fn with_gate(&self, gate: Gate) -> Instruction {
        Instruction {
            gate,
            qubits: self.qubits.clone(),
        }
    }
}

impl std::fmt::Display for Instruction {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.gate)?;
        for qubit in &self.qubits {
            write!(f, " {qubit}")?;
        }
        Ok(())
    }
}

/// Sequence of generator gates on a fixed number of qubits, applied first to last.
#[must_use]
#[derive(Clone, Debug, Default, PartialEq, Eq, Hash)]
pub struct Circuit {
    num_qubits: usize,
    instructions: Vec<Instruction>,
}

impl Circuit {
    pub fn new(num_qubits: usize) -> Self {
        Self {
            num_qubits,
            instructions: Vec::new(),
        }
    }

    pub fn with_capacity(num_qubits: usize, capacity: usize) -> Self {
        Self {
            num_qubits,
            instructions: Vec::with_capacity(capacity),
        }
    }

    #[must_use]
    pub fn num_qubits(&self) -> usize {
        self.num_qubits
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.instructions.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.instructions.is_empty()
    }

    #[must_use]
    pub fn instructions(&self) -> &[Instruction] {
        &self.instructions
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Instruction> {
        self.instructions.iter()
    }

    /// Appends `gate` on `qubits`, see [`Instruction::new`] for the checks.
    ///
    /// # Errors
    ///
    /// As for [`Instruction::new`]; the circuit is unchanged on error.
    pub fn push(&mut self, gate: Gate, qubits: &[QubitId]) -> Result<()> {
        let instruction = Instruction::new(gate, qubits, self.num_qubits)?;
        self.instructions.push(instruction);
        Ok(())
    }

    /// Appends all instructions of `other`.
    ///
    /// # Errors
    ///
    /// [`DimensionMismatch`](DihedralError::DimensionMismatch) if the qubit counts differ.
    pub fn append(&mut self, other: &Circuit) -> Result<()> {
        check_dimensions(self.num_qubits, other.num_qubits)?;
        self.instructions.extend(other.instructions.iter().cloned());
        Ok(())
    }

    /// Gates in reverse order, each replaced by its inverse.
    pub fn inverse(&self) -> Circuit {
        self.mapped(true, Gate::inverse)
    }

    /// Gates in the same order, each replaced by its complex conjugate.
    pub fn conjugate(&self) -> Circuit {
        self.mapped(false, Gate::conjugate)
    }

    /// Gates in reverse order, each replaced by its transpose.
    pub fn reverse_ops(&self) -> Circuit {
        self.mapped(true, Gate::transpose)
    }

    fn mapped(&self, reversed: bool, transform: fn(Gate) -> Gate) -> Circuit {
        let transformed = |instruction: &Instruction| instruction.with_gate(transform(instruction.gate));
        let instructions = if reversed {
            self.instructions.iter().rev().map(transformed).collect()
        } else {
            self.instructions.iter().map(transformed).collect()
        };
        Circuit {
            num_qubits: self.num_qubits,
            instructions,
        }
    }

    /// Dense matrix of the circuit, built column by column from basis-state images.
    pub fn unitary(&self) -> UnitaryMatrix {
        let dimension = 1usize << self.num_qubits;
        let mut res = UnitaryMatrix::zeros(dimension);
        for column in 0..dimension {
            let (row, power) = self.instructions.iter().fold((column, 0u8), |(basis, power), instruction| {
                let (image, step) = instruction.gate.basis_image(&instruction.qubits, basis);
                (image, (power + step) % 8)
            });
            res[(row, column)] = omega_power(power);
        }
        res
    }
}

impl<'life> IntoIterator for &'life Circuit {
    type Item = &'life Instruction;
    type IntoIter = std::slice::Iter<'life, Instruction>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

/// One header line `qubits N` followed by one instruction per line.
///
/// ```text
/// qubits 2
/// ControlledX 0 1
/// T 1
/// ```
impl std::fmt::Display for Circuit {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "qubits {}", self.num_qubits)?;
        for instruction in &self.instructions {
            write!(f, "\n{instruction}")?;
        }
        Ok(())
    }
}

impl FromStr for Circuit {
    type Err = DihedralError;

    fn from_str(string: &str) -> Result<Self> {
        let mut lines = string
            .lines()
            .enumerate()
            .map(|(index, line)| (index + 1, line.trim()))
            .filter(|(_, line)| !line.is_empty());

        let (header_line, header) = lines.next().ok_or(DihedralError::Parse {
            line: 1,
            reason: "missing `qubits` header".to_owned(),
        })?;
        let num_qubits = match header.split_whitespace().collect_tuple() {
            Some(("qubits", count)) => parse_index(count, header_line)?,
            _ => {
                return Err(DihedralError::Parse {
                    line: header_line,
                    reason: format!("expected `qubits N`, found {header:?}"),
                })
            }
        };

        let mut res = Circuit::new(num_qubits);
        for (line_number, line) in lines {
            let mut tokens = line.split_whitespace();
            let name = tokens.next().unwrap_or_default();
            let gate = Gate::from_str(name)
                .map_err(|_| DihedralError::UnsupportedOperation(format!("unknown gate {name:?} on line {line_number}")))?;
            let qubits = tokens
                .map(|token| parse_index(token, line_number))
                .collect::<Result<Vec<QubitId>>>()?;
            res.push(gate, &qubits)?;
        }
        Ok(res)
    }
}

fn parse_index(token: &str, line: usize) -> Result<usize> {
    token.parse().map_err(|_| DihedralError::Parse {
        line,
        reason: format!("{token:?} is not a qubit index"),
    })
}
