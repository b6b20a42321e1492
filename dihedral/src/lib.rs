pub mod affine;
pub mod circuit;
pub mod dihedral;
pub mod error;
pub mod operations;
pub mod polynomial;
pub mod unitary;

pub use affine::AffineFunction;
pub use circuit::{Circuit, Instruction};
pub use dihedral::CnotDihedral;
pub use error::{DihedralError, Result};
pub use operations::Gate;
pub use polynomial::{Monomial, PhasePolynomial};
pub use unitary::UnitaryMatrix;

#[cfg(feature = "serde")]
mod serde;

#[cfg(feature = "schemars")]
mod schemars;

// Utility functions
#[must_use]
pub fn subscript_digits(number: usize) -> String {
    number
        .to_string()
        .chars()
        .filter_map(|char| char.to_digit(10))
        .map(|digit| SUB_CHARS[digit as usize])
        .collect()
}

pub const SUB_CHARS: [char; 10] = ['₀', '₁', '₂', '₃', '₄', '₅', '₆', '₇', '₈', '₉'];
