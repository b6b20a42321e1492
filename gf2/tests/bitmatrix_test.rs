use gf2::{directly_summed, BitMatrix, BitVec};
use proptest::prelude::*;
use rand::prelude::*;

proptest! {
    #[test]
    fn shape(row_count in 0..100usize, column_count in 0..100usize) {
        let matrix = BitMatrix::zeros(row_count, column_count);
        assert_eq!(matrix.row_count(), row_count);
        assert_eq!(matrix.column_count(), column_count);
        assert!(matrix.is_zero());
    }

    #[test]
    fn identity_is_neutral(matrix in arbitrary_bitmatrix(40)) {
        let left = BitMatrix::identity(matrix.row_count());
        let right = BitMatrix::identity(matrix.column_count());
        assert_eq!(&left * &matrix, matrix);
        assert_eq!(&matrix * &right, matrix);
    }

    #[test]
    fn product_acts_like_composition(dimension in 1..70usize) {
        let first = BitMatrix::random(dimension, dimension, &mut thread_rng());
        let second = BitMatrix::random(dimension, dimension, &mut thread_rng());
        let vector = BitVec::random(dimension, &mut thread_rng());
        let product = &first * &second;
        assert_eq!(&product * &vector, &first * &(&second * &vector));
    }

    #[test]
    fn rank_bounded_by_shape(matrix in arbitrary_bitmatrix(80)) {
        assert!(matrix.rank() <= matrix.row_count().min(matrix.column_count()));
        assert_eq!(matrix.rank(), matrix.transposed().rank());
    }

    #[test]
    fn invertible_matrices_have_inverses(dimension in 0..70usize) {
        let matrix = BitMatrix::random_invertible(dimension, &mut thread_rng());
        assert_eq!(matrix.rank(), dimension);
        let inverse = matrix.inverted().expect("full rank matrix is invertible");
        assert!((&matrix * &inverse).is_identity());
        assert!((&inverse * &matrix).is_identity());
    }

    #[test]
    fn direct_sum_is_block_diagonal(first in arbitrary_bitmatrix(20), second in arbitrary_bitmatrix(20)) {
        let sum = directly_summed([&first, &second]);
        assert_eq!(sum.row_count(), first.row_count() + second.row_count());
        assert_eq!(sum.column_count(), first.column_count() + second.column_count());
        for row_index in 0..sum.row_count() {
            for column_index in 0..sum.column_count() {
                let expected = match (row_index < first.row_count(), column_index < first.column_count()) {
                    (true, true) => first[(row_index, column_index)],
                    (false, false) => second[(row_index - first.row_count(), column_index - first.column_count())],
                    _ => false,
                };
                assert_eq!(sum[(row_index, column_index)], expected);
            }
        }
        assert_eq!(sum.rank(), first.rank() + second.rank());
    }

    #[test]
    fn format_roundtrip(matrix in nonempty_bitmatrix(30)) {
        let formatted = format!("{matrix:#}");
        assert_eq!(formatted.parse::<BitMatrix>().unwrap(), matrix);
    }
}

#[test]
fn singular_matrix_has_no_inverse() {
    let matrix: BitMatrix = "[110|011|101]".parse().unwrap();
    assert_eq!(matrix.rank(), 2);
    assert!(!matrix.is_invertible());
    assert!(matrix.inverted().is_none());
}

#[test]
fn rank_is_exact_for_large_dimension() {
    let dimension = 200;
    let mut matrix = BitMatrix::identity(dimension);
    for index in 1..dimension {
        matrix.add_row_into(index - 1, index);
    }
    assert!(matrix.is_invertible());
    let combined = matrix.row(0) ^ matrix.row(1);
    *matrix.row_mut(dimension - 1) = combined;
    assert_eq!(matrix.rank(), dimension - 1);
    assert!(matrix.inverted().is_none());
}

prop_compose! {
    fn arbitrary_bitmatrix(max_dimension: usize)(row_count in 0..max_dimension, column_count in 0..max_dimension) -> BitMatrix {
        BitMatrix::random(row_count, column_count, &mut thread_rng())
    }
}

prop_compose! {
    fn nonempty_bitmatrix(max_dimension: usize)(row_count in 1..max_dimension, column_count in 1..max_dimension) -> BitMatrix {
        BitMatrix::random(row_count, column_count, &mut thread_rng())
    }
}
