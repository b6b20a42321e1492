use dihedral::unitary::omega_power;
use dihedral::{AffineFunction, Circuit, CnotDihedral, DihedralError, Gate, PhasePolynomial, UnitaryMatrix};
use gf2::{BitMatrix, BitVec};
use proptest::prelude::*;
use rand::prelude::*;
use std::ops::Range;

pub fn arbitrary_element(qubit_count_range: Range<usize>) -> impl Strategy<Value = CnotDihedral> {
    qubit_count_range.prop_flat_map(|qubit_count| {
        any::<u64>().prop_map(move |seed| CnotDihedral::random(qubit_count, &mut StdRng::seed_from_u64(seed)))
    })
}

pub fn arbitrary_triple(
    qubit_count_range: Range<usize>,
) -> impl Strategy<Value = (CnotDihedral, CnotDihedral, CnotDihedral)> {
    qubit_count_range.prop_flat_map(|qubit_count| {
        any::<u64>().prop_map(move |seed| {
            let mut random_number_generator = StdRng::seed_from_u64(seed);
            (
                CnotDihedral::random(qubit_count, &mut random_number_generator),
                CnotDihedral::random(qubit_count, &mut random_number_generator),
                CnotDihedral::random(qubit_count, &mut random_number_generator),
            )
        })
    })
}

pub fn arbitrary_circuit(qubit_count_range: Range<usize>) -> impl Strategy<Value = Circuit> {
    qubit_count_range.prop_flat_map(|qubit_count| {
        (any::<u64>(), 0..30usize).prop_map(move |(seed, length)| {
            let mut random_number_generator = StdRng::seed_from_u64(seed);
            let gates = dihedral::operations::ALL_GATES
                .into_iter()
                .filter(|gate| gate.arity() <= qubit_count)
                .collect::<Vec<_>>();
            let mut circuit = Circuit::new(qubit_count);
            for _ in 0..length {
                let gate = *gates.choose(&mut random_number_generator).unwrap();
                let qubits = rand::seq::index::sample(&mut random_number_generator, qubit_count, gate.arity()).into_vec();
                circuit.push(gate, &qubits).unwrap();
            }
            circuit
        })
    })
}

/// Matrix of `|x⟩ ↦ ω^{p(x)} |Ax + b⟩`, evaluated directly from the two parts.
fn action_matrix(element: &CnotDihedral) -> UnitaryMatrix {
    let qubit_count = element.num_qubits();
    let dimension = 1usize << qubit_count;
    let mut res = UnitaryMatrix::zeros(dimension);
    for column in 0..dimension {
        let point: Vec<bool> = (0..qubit_count).map(|qubit| (column >> qubit) & 1 == 1).collect();
        let input: BitVec = point.iter().copied().collect();
        let image = element.affine().apply(&input).unwrap();
        let row: usize = image.support().map(|qubit| 1 << qubit).sum();
        let phase = element.poly().evaluate_at(&point).unwrap();
        res[(row, column)] = omega_power(phase);
    }
    res
}

fn kron_little_endian(low: &UnitaryMatrix, high: &UnitaryMatrix) -> UnitaryMatrix {
    let mut res = UnitaryMatrix::zeros(low.dimension() * high.dimension());
    for high_row in 0..high.dimension() {
        for high_column in 0..high.dimension() {
            for low_row in 0..low.dimension() {
                for low_column in 0..low.dimension() {
                    let row = low_row + low.dimension() * high_row;
                    let column = low_column + low.dimension() * high_column;
                    res[(row, column)] = low[(low_row, low_column)] * high[(high_row, high_column)];
                }
            }
        }
    }
    res
}

proptest! {
    #[test]
    fn random_elements_are_valid(element in arbitrary_element(0..8)) {
        element.validate().unwrap();
        assert_eq!(element.poly().constant(), 0);
    }

    #[test]
    fn identity_laws(element in arbitrary_element(1..7)) {
        let identity = CnotDihedral::identity(element.num_qubits());
        assert_eq!(element.right_multiply(&identity).unwrap(), element);
        assert_eq!(identity.right_multiply(&element).unwrap(), element);
        assert_eq!(element.left_multiply(&identity).unwrap(), element);
        assert_eq!(identity.left_multiply(&element).unwrap(), element);
    }

    #[test]
    fn closure((first, second, _) in arbitrary_triple(1..8)) {
        for product in [first.right_multiply(&second).unwrap(), first.left_multiply(&second).unwrap()] {
            product.validate().unwrap();
            assert_eq!(product.poly().constant(), 0);
        }
    }

    #[test]
    fn associativity((first, second, third) in arbitrary_triple(1..7)) {
        let left = first.right_multiply(&second).unwrap().right_multiply(&third).unwrap();
        let right = first.right_multiply(&second.right_multiply(&third).unwrap()).unwrap();
        assert_eq!(left, right);
    }

    #[test]
    fn multiplication_orders_are_mirrored((first, second, _) in arbitrary_triple(1..6)) {
        assert_eq!(first.left_multiply(&second).unwrap(), second.right_multiply(&first).unwrap());
        assert_eq!(first.compose(&second, true).unwrap(), first.right_multiply(&second).unwrap());
        assert_eq!(first.compose(&second, false).unwrap(), second.right_multiply(&first).unwrap());
        assert_eq!(&first * &second, first.right_multiply(&second).unwrap());
    }

    #[test]
    fn matrix_is_the_action(element in arbitrary_element(0..5)) {
        let matrix = element.to_matrix().unwrap();
        assert!(matrix.is_unitary());
        assert!(matrix.approx_eq(&action_matrix(&element)));
    }

    #[test]
    fn composition_is_matrix_product((first, second, _) in arbitrary_triple(1..5)) {
        let product = first.right_multiply(&second).unwrap();
        let expected = &first.to_matrix().unwrap() * &second.to_matrix().unwrap();
        assert!(product.to_matrix().unwrap().approx_eq_up_to_phase(&expected));
    }

    #[test]
    fn circuit_round_trip(element in arbitrary_element(0..7)) {
        let circuit = element.to_circuit().unwrap();
        assert_eq!(circuit.num_qubits(), element.num_qubits());
        assert_eq!(CnotDihedral::from_circuit(&circuit).unwrap(), element);
    }

    #[test]
    fn circuit_application_matches_gate_matrices(circuit in arbitrary_circuit(1..5)) {
        let element = CnotDihedral::from_circuit(&circuit).unwrap();
        element.validate().unwrap();
        assert!(element.to_matrix().unwrap().approx_eq_up_to_phase(&circuit.unitary()));
    }

    #[test]
    fn adjoint_is_inverse(element in arbitrary_element(1..7)) {
        let adjoint = element.adjoint().unwrap();
        assert!(element.right_multiply(&adjoint).unwrap().is_identity());
        assert!(adjoint.right_multiply(&element).unwrap().is_identity());
    }

    #[test]
    fn conjugate_and_transpose_follow_matrices(element in arbitrary_element(1..5)) {
        let matrix = element.to_matrix().unwrap();
        let conjugate = element.conjugate().unwrap();
        let transpose = element.transpose().unwrap();
        conjugate.validate().unwrap();
        transpose.validate().unwrap();
        assert!(conjugate.to_matrix().unwrap().approx_eq_up_to_phase(&matrix.conj()));
        assert!(transpose.to_matrix().unwrap().approx_eq_up_to_phase(&matrix.transpose()));
    }

    #[test]
    fn tensor_is_block_diagonal(first in arbitrary_element(0..4), second in arbitrary_element(0..4)) {
        let tensor = first.tensor(&second);
        let (low, high) = (first.num_qubits(), second.num_qubits());
        assert_eq!(tensor.num_qubits(), low + high);
        tensor.validate().unwrap();
        for row in 0..low + high {
            for column in 0..low + high {
                let expected = match (row < low, column < low) {
                    (true, true) => first.linear()[(row, column)],
                    (false, false) => second.linear()[(row - low, column - low)],
                    _ => false,
                };
                assert_eq!(tensor.linear()[(row, column)], expected);
            }
            let expected_shift = if row < low { first.shift().index(row) } else { second.shift().index(row - low) };
            assert_eq!(tensor.shift().index(row), expected_shift);
        }
        let expected = kron_little_endian(&first.to_matrix().unwrap(), &second.to_matrix().unwrap());
        assert!(tensor.to_matrix().unwrap().approx_eq(&expected));
        assert_eq!(first.expand(&second), second.tensor(&first));
    }

    #[test]
    fn full_qubit_list_composes(first in arbitrary_element(1..5), front in any::<bool>()) {
        let second = CnotDihedral::random(first.num_qubits(), &mut thread_rng());
        let qubits: Vec<usize> = first.qubits().collect();
        assert_eq!(first.compose_on(&second, &qubits, front).unwrap(), first.compose(&second, front).unwrap());
    }
}

#[test]
fn generator_order_matters() {
    let mut cx_first = CnotDihedral::identity(2);
    cx_first.left_mul_cx(0, 1).unwrap();
    cx_first.left_mul_phase(1, 1).unwrap();

    let mut phase_first = CnotDihedral::identity(2);
    phase_first.left_mul_phase(1, 1).unwrap();
    phase_first.left_mul_cx(0, 1).unwrap();

    assert_ne!(cx_first, phase_first);
    assert_eq!(cx_first.poly().term(&[0, 1]).unwrap(), 6);
    assert_eq!(phase_first.poly().term(&[0, 1]).unwrap(), 0);
}

#[test]
fn repeated_phase_adds_up() {
    let mut repeated = CnotDihedral::identity(1);
    for _ in 0..4 {
        repeated.left_mul_phase(1, 0).unwrap();
    }
    let mut single = CnotDihedral::identity(1);
    single.left_mul_phase(4, 0).unwrap();

    assert_eq!(repeated, single);
    assert_eq!(repeated.poly().linear_weights(), &[4]);
    assert_eq!(repeated.poly().constant(), 0);
    assert!(repeated.shift().is_zero());
    assert!(repeated.linear().is_identity());
}

#[test]
fn cx_on_two_qubits() {
    let mut element = CnotDihedral::identity(2);
    element.left_mul_cx(0, 1).unwrap();
    assert_eq!(*element.linear(), "[10|11]".parse::<BitMatrix>().unwrap());
    assert!(element.shift().is_zero());
    assert!(element.poly().is_zero());
    assert!(element.linear().is_invertible());
    assert!(element.is_valid());
}

#[test]
fn phase_on_shifted_wire_is_negated() {
    let mut element = CnotDihedral::identity(1);
    element.left_mul_x(0).unwrap();
    element.left_mul_phase(1, 0).unwrap();
    assert_eq!(element.poly().term(&[0]).unwrap(), 7);
    assert!(element.shift().index(0));
}

#[test]
fn nonzero_constant_is_invalid() {
    let mut poly = PhasePolynomial::zero(2);
    poly.set_constant(1);
    let result = CnotDihedral::from_parts(poly.clone(), AffineFunction::identity(2));
    assert!(matches!(result, Err(DihedralError::InvalidElement(_))));
    let unchecked = CnotDihedral::from_parts_unchecked(poly, AffineFunction::identity(2));
    assert!(!unchecked.is_valid());
    assert!(matches!(unchecked.to_circuit(), Err(DihedralError::InvalidElement(_))));
}

#[test]
fn malformed_parts_are_invalid_not_fatal() {
    let singular = AffineFunction::new("[11|11]".parse().unwrap(), BitVec::zeros(2));
    assert!(!CnotDihedral::from_parts_unchecked(PhasePolynomial::zero(2), singular).is_valid());

    let wrong_size = AffineFunction::identity(3);
    assert!(!CnotDihedral::from_parts_unchecked(PhasePolynomial::zero(2), wrong_size).is_valid());

    let odd_quadratic = PhasePolynomial::from_weights(2, 0, vec![0, 0], vec![3], vec![]);
    assert!(!CnotDihedral::from_parts_unchecked(odd_quadratic, AffineFunction::identity(2)).is_valid());

    let short_tables = PhasePolynomial::from_weights(3, 0, vec![0, 0, 0], vec![0], vec![]);
    assert!(!CnotDihedral::from_parts_unchecked(short_tables, AffineFunction::identity(3)).is_valid());

    let mut cubic = PhasePolynomial::zero(3);
    cubic.set_term(&[0, 1, 2], 4).unwrap();
    assert!(CnotDihedral::from_parts(cubic.clone(), AffineFunction::identity(3)).is_ok());
    cubic.set_term(&[0, 1, 2], 2).unwrap();
    assert!(CnotDihedral::from_parts(cubic, AffineFunction::identity(3)).is_err());
}

#[test]
fn from_parts_accepts_valid_parts() {
    let mut random_number_generator = StdRng::seed_from_u64(7);
    let element = CnotDihedral::random(4, &mut random_number_generator);
    let (poly, affine) = element.clone().into_parts();
    assert_eq!(CnotDihedral::from_parts(poly, affine).unwrap(), element);
}

#[test]
fn mutator_errors_leave_element_unchanged() {
    let mut element = CnotDihedral::identity(2);
    element.left_mul_cx(0, 1).unwrap();
    let before = element.clone();

    assert_eq!(
        element.left_mul_x(2),
        Err(DihedralError::QubitIndex { index: 2, num_qubits: 2 })
    );
    assert!(matches!(element.left_mul_phase(1, 5), Err(DihedralError::QubitIndex { .. })));
    assert!(matches!(element.left_mul_cx(1, 1), Err(DihedralError::UnsupportedOperation(_))));
    assert!(matches!(element.left_mul_cx(0, 3), Err(DihedralError::QubitIndex { .. })));
    assert!(matches!(element.left_mul(Gate::ControlledZ, &[0]), Err(DihedralError::UnsupportedOperation(_))));
    assert!(matches!(element.left_mul(Gate::T, &[0, 1]), Err(DihedralError::UnsupportedOperation(_))));
    assert_eq!(element, before);
}

#[test]
fn size_mismatch_is_reported() {
    let small = CnotDihedral::identity(2);
    let large = CnotDihedral::identity(3);
    assert_eq!(
        small.right_multiply(&large),
        Err(DihedralError::DimensionMismatch { expected: 2, found: 3 })
    );
    assert!(matches!(small.left_multiply(&large), Err(DihedralError::DimensionMismatch { .. })));
    assert!(matches!(small.compose(&large, true), Err(DihedralError::DimensionMismatch { .. })));
}

#[test]
fn qubit_subset_composition_is_unsupported() {
    let first = CnotDihedral::random(3, &mut thread_rng());
    let second = CnotDihedral::random(3, &mut thread_rng());
    for qubits in [&[0, 1][..], &[1, 0, 2], &[0, 1, 2, 3], &[]] {
        assert!(matches!(
            first.compose_on(&second, qubits, false),
            Err(DihedralError::UnsupportedOperation(_))
        ));
    }
}

#[test]
fn controlled_z_and_swap_decompositions() {
    let mut controlled_z = CnotDihedral::identity(2);
    controlled_z.left_mul(Gate::ControlledZ, &[0, 1]).unwrap();
    assert!(controlled_z.linear().is_identity());
    assert!(controlled_z.shift().is_zero());
    assert_eq!(controlled_z.poly().linear_weights(), &[0, 0]);
    assert_eq!(controlled_z.poly().term(&[0, 1]).unwrap(), 4);

    let mut swap = CnotDihedral::identity(2);
    swap.left_mul(Gate::Swap, &[0, 1]).unwrap();
    assert_eq!(*swap.linear(), "[01|10]".parse::<BitMatrix>().unwrap());
    assert!(swap.poly().is_zero());
}

#[test]
fn display_lists_both_parts() {
    let mut element = CnotDihedral::identity(2);
    element.left_mul_cx(0, 1).unwrap();
    element.left_mul_phase(1, 1).unwrap();
    element.left_mul_x(0).unwrap();
    assert_eq!(
        element.to_string(),
        "phase polynomial = x₀ + x₁ + 6x₀x₁\naffine function = (x₀ + 1, x₀ + x₁)"
    );
    assert_eq!(format!("{element:?}"), element.to_string());
}

#[test]
fn single_qubit_elements_are_the_dihedral_group() {
    let mut elements = std::collections::HashSet::new();
    for flip in [false, true] {
        for power in 0..8 {
            let mut element = CnotDihedral::identity(1);
            element.left_mul_phase(power, 0).unwrap();
            if flip {
                element.left_mul_x(0).unwrap();
            }
            elements.insert(element);
        }
    }
    assert_eq!(elements.len(), 16);
    for element in &elements {
        assert_eq!(CnotDihedral::from_circuit(&element.to_circuit().unwrap()).as_ref(), Ok(element));
    }
}
