use crate::error::{check_dimensions, check_qubit, DihedralError, Result};
use crate::subscript_digits;
use itertools::Itertools;
use smallvec::{smallvec, SmallVec};
use std::collections::BTreeMap;
use std::ops::{Add, AddAssign, Neg};

pub const MAX_DEGREE: usize = 3;
pub const MODULUS: u8 = 8;

/// Sorted, duplicate-free variable indices of a monomial; empty for the constant term.
pub type Monomial = SmallVec<[usize; MAX_DEGREE]>;

type SparseTerms = BTreeMap<Monomial, u8>;

/// Multilinear polynomial of degree at most 3 in `n` boolean variables with
/// coefficients in Z₈.
///
/// Coefficients are stored densely per degree. Terms of each degree are laid
/// out in lexicographic order of their index sets, which is the order in
/// which `itertools::combinations` enumerates them:
///
/// ```text
/// quadratic: x₀x₁, x₀x₂, …, x₀xₙ₋₁, x₁x₂, …
/// cubic:     x₀x₁x₂, x₀x₁x₃, …
/// ```
///
/// For polynomials that arise from CNOT-dihedral elements the quadratic
/// coefficients are even and the cubic ones are `0` or `4`; see
/// [`PhasePolynomial::has_group_coefficients`].
#[must_use]
#[derive(Clone, PartialEq, Eq, Hash)]
pub struct PhasePolynomial {
    num_variables: usize,
    constant: u8,
    linear: Vec<u8>,
    quadratic: Vec<u8>,
    cubic: Vec<u8>,
}

#[must_use]
pub fn binomial(n: usize, k: usize) -> usize {
    if k > n {
        return 0;
    }
    (0..k).fold(1, |acc, index| acc * (n - index) / (index + 1))
}

#[inline]
fn pair_offset(num_variables: usize, first: usize, second: usize) -> usize {
    binomial(num_variables, 2) - binomial(num_variables - first, 2) + (second - first - 1)
}

#[inline]
fn triple_offset(num_variables: usize, first: usize, second: usize, third: usize) -> usize {
    binomial(num_variables, 3) - binomial(num_variables - first, 3) + binomial(num_variables - first - 1, 2)
        - binomial(num_variables - second, 2)
        + (third - second - 1)
}

impl PhasePolynomial {
    pub fn zero(num_variables: usize) -> Self {
        Self {
            num_variables,
            constant: 0,
            linear: vec![0; num_variables],
            quadratic: vec![0; binomial(num_variables, 2)],
            cubic: vec![0; binomial(num_variables, 3)],
        }
    }

    /// Builds a polynomial from raw coefficient tables in the documented term order.
    ///
    /// Nothing is reduced or checked here so that malformed input can be
    /// classified later by [`PhasePolynomial::has_consistent_term_counts`]
    /// and [`PhasePolynomial::has_group_coefficients`].
    pub fn from_weights(
        num_variables: usize,
        constant: u8,
        linear: Vec<u8>,
        quadratic: Vec<u8>,
        cubic: Vec<u8>,
    ) -> Self {
        Self {
            num_variables,
            constant,
            linear,
            quadratic,
            cubic,
        }
    }

    /// The parity polynomial `p_J` of `support = J`:
    ///
    /// ```text
    /// p_J(x) = Σ_{∅ ≠ S ⊆ J} (-2)^(|S|-1) Π_{s ∈ S} x_s   (mod 8, degree ≤ 3)
    /// ```
    ///
    /// It agrees with `⊕_{j ∈ J} x_j` on every boolean input, modulo 8.
    ///
    /// # Errors
    ///
    /// [`QubitIndex`](DihedralError::QubitIndex) if an index is not below `num_variables`.
    pub fn parity(num_variables: usize, support: impl IntoIterator<Item = usize>) -> Result<Self> {
        let mut res = Self::zero(num_variables);
        res.set_parity(support)?;
        Ok(res)
    }

    /// Overwrites `self` with the parity polynomial of `support`, see [`PhasePolynomial::parity`].
    ///
    /// # Errors
    ///
    /// [`QubitIndex`](DihedralError::QubitIndex) if an index is out of range; `self` is left unchanged.
    pub fn set_parity(&mut self, support: impl IntoIterator<Item = usize>) -> Result<()> {
        let support: Vec<usize> = support.into_iter().sorted_unstable().dedup().collect();
        for index in &support {
            check_qubit(*index, self.num_variables)?;
        }
        *self = Self::zero(self.num_variables);
        self.add_alternating_subset_terms(&support, 1);
        Ok(())
    }

    /// Adds `k·(-2)^(|S|-1)` to the term of every subset `S` of `support` with `1 ≤ |S| ≤ 3`.
    ///
    /// `support` must be sorted, duplicate-free and in range.
    pub(crate) fn add_alternating_subset_terms(&mut self, support: &[usize], k: u8) {
        let k = k % MODULUS;
        for index in support {
            self.add_to_term_unchecked(&[*index], k);
        }
        for pair in support.iter().copied().tuple_combinations::<(_, _)>() {
            self.add_to_term_unchecked(&[pair.0, pair.1], (6 * k) % MODULUS);
        }
        for triple in support.iter().copied().tuple_combinations::<(_, _, _)>() {
            self.add_to_term_unchecked(&[triple.0, triple.1, triple.2], (4 * k) % MODULUS);
        }
    }

    #[must_use]
    pub fn num_variables(&self) -> usize {
        self.num_variables
    }

    #[must_use]
    pub fn constant(&self) -> u8 {
        self.constant
    }

    pub fn set_constant(&mut self, value: u8) {
        self.constant = value % MODULUS;
    }

    #[must_use]
    pub fn linear_weights(&self) -> &[u8] {
        &self.linear
    }

    #[must_use]
    pub fn quadratic_weights(&self) -> &[u8] {
        &self.quadratic
    }

    #[must_use]
    pub fn cubic_weights(&self) -> &[u8] {
        &self.cubic
    }

    /// Coefficient of the monomial over `indices` (in any order); `[]` addresses the constant.
    ///
    /// # Errors
    ///
    /// - [`InvalidTerm`](DihedralError::InvalidTerm) for more than three or repeated indices.
    /// - [`QubitIndex`](DihedralError::QubitIndex) for an index not below `num_variables`.
    pub fn term(&self, indices: &[usize]) -> Result<u8> {
        let monomial = self.normalized(indices)?;
        self.coefficient(&monomial).copied().ok_or(MALFORMED)
    }

    /// Sets the coefficient of the monomial over `indices`, reduced modulo 8.
    ///
    /// # Errors
    ///
    /// As for [`PhasePolynomial::term`].
    pub fn set_term(&mut self, indices: &[usize], value: u8) -> Result<()> {
        let monomial = self.normalized(indices)?;
        let coefficient = self.coefficient_mut(&monomial).ok_or(MALFORMED)?;
        *coefficient = value % MODULUS;
        Ok(())
    }

    /// Nonzero terms as `(monomial, coefficient)`, by degree then lexicographically.
    pub fn terms(&self) -> impl Iterator<Item = (Monomial, u8)> + '_ {
        let constant = std::iter::once((Monomial::new(), self.constant));
        let linear = self
            .linear
            .iter()
            .enumerate()
            .map(|(index, value)| (smallvec![index], *value));
        let quadratic = (0..self.num_variables)
            .combinations(2)
            .zip(&self.quadratic)
            .map(|(indices, value)| (Monomial::from_vec(indices), *value));
        let cubic = (0..self.num_variables)
            .combinations(3)
            .zip(&self.cubic)
            .map(|(indices, value)| (Monomial::from_vec(indices), *value));
        constant
            .chain(linear)
            .chain(quadratic)
            .chain(cubic)
            .map(|(monomial, value)| (monomial, value % MODULUS))
            .filter(|(_, value)| *value != 0)
    }

    #[must_use]
    pub fn is_zero(&self) -> bool {
        self.terms().next().is_none()
    }

    /// Largest degree of a nonzero term, `None` for the zero polynomial.
    #[must_use]
    pub fn degree(&self) -> Option<usize> {
        self.terms().map(|(monomial, _)| monomial.len()).max()
    }

    /// Value at a boolean point, in Z₈.
    ///
    /// # Errors
    ///
    /// [`DimensionMismatch`](DihedralError::DimensionMismatch) if `point` has the wrong length.
    pub fn evaluate_at(&self, point: &[bool]) -> Result<u8> {
        check_dimensions(self.num_variables, point.len())?;
        let value = self
            .terms()
            .filter(|(monomial, _)| monomial.iter().all(|index| point.get(*index).copied().unwrap_or(false)))
            .fold(0u8, |acc, (_, value)| (acc + value) % MODULUS);
        Ok(value)
    }

    /// Substitutes `substitutions[i]` for `xᵢ` and re-expands modulo 8, using `xᵢ² = xᵢ`.
    ///
    /// Each monomial is expanded coefficient first: `c·q₁·q₂·q₃` is built as
    /// `((c·q₁)·q₂)·q₃` with zero coefficients pruned after every product, so
    /// the even quadratic and `{0,4}` cubic coefficients of group elements keep
    /// every intermediate product within degree 3.
    ///
    /// # Errors
    ///
    /// - [`DimensionMismatch`](DihedralError::DimensionMismatch) if there is not exactly one
    ///   substitution per variable or the substitutions disagree on their variable count.
    /// - [`DegreeOverflow`](DihedralError::DegreeOverflow) if a monomial above degree 3
    ///   survives with a nonzero coefficient.
    pub fn evaluate(&self, substitutions: &[PhasePolynomial]) -> Result<PhasePolynomial> {
        check_dimensions(self.num_variables, substitutions.len())?;
        let num_variables = substitutions.first().map_or(self.num_variables, Self::num_variables);
        for substitution in substitutions {
            check_dimensions(num_variables, substitution.num_variables)?;
        }
        let substitutions: Vec<SparseTerms> = substitutions.iter().map(|poly| poly.terms().collect()).collect();

        let mut expanded = SparseTerms::new();
        for (monomial, value) in self.terms() {
            let mut product = SparseTerms::from([(Monomial::new(), value)]);
            for index in monomial {
                product = multiplied(&product, &substitutions[index]);
                if product.is_empty() {
                    break;
                }
            }
            for (term, value) in product {
                accumulate(&mut expanded, term, value);
            }
        }

        let mut res = Self::zero(num_variables);
        for (monomial, value) in expanded {
            if value == 0 {
                continue;
            }
            if monomial.len() > MAX_DEGREE {
                return Err(DihedralError::DegreeOverflow {
                    degree: monomial.len(),
                    coefficient: value,
                });
            }
            res.add_to_term_unchecked(&monomial, value);
        }
        Ok(res)
    }

    /// Polynomial in `self.num_variables() + other.num_variables()` variables with
    /// the terms of `self` on the low variables and those of `other` shifted up.
    pub fn direct_sum(&self, other: &PhasePolynomial) -> PhasePolynomial {
        let offset = self.num_variables;
        let mut res = Self::zero(offset + other.num_variables);
        for (monomial, value) in self.terms() {
            res.add_to_term_unchecked(&monomial, value);
        }
        for (monomial, value) in other.terms() {
            let shifted: Monomial = monomial.iter().map(|index| index + offset).collect();
            res.add_to_term_unchecked(&shifted, value);
        }
        res
    }

    /// # Errors
    ///
    /// [`DimensionMismatch`](DihedralError::DimensionMismatch) on differing variable counts.
    pub fn try_add(&self, other: &PhasePolynomial) -> Result<PhasePolynomial> {
        check_dimensions(self.num_variables, other.num_variables)?;
        Ok(self + other)
    }

    /// Table sizes are `n`, `C(n,2)` and `C(n,3)`.
    #[must_use]
    pub fn has_consistent_term_counts(&self) -> bool {
        self.linear.len() == self.num_variables
            && self.quadratic.len() == binomial(self.num_variables, 2)
            && self.cubic.len() == binomial(self.num_variables, 3)
    }

    /// Linear coefficients in `0..8`, quadratic in `{0,2,4,6}`, cubic in `{0,4}`.
    #[must_use]
    pub fn has_group_coefficients(&self) -> bool {
        self.linear.iter().all(|value| *value < MODULUS)
            && self.quadratic.iter().all(|value| *value < MODULUS && value % 2 == 0)
            && self.cubic.iter().all(|value| *value == 0 || *value == 4)
    }

    pub(crate) fn add_to_term_unchecked(&mut self, monomial: &[usize], value: u8) {
        if let Some(coefficient) = self.coefficient_mut(monomial) {
            *coefficient = (*coefficient % MODULUS + value % MODULUS) % MODULUS;
        }
    }

    fn normalized(&self, indices: &[usize]) -> Result<Monomial> {
        if indices.len() > MAX_DEGREE {
            return Err(DihedralError::InvalidTerm(indices.to_vec()));
        }
        for index in indices {
            check_qubit(*index, self.num_variables)?;
        }
        let mut monomial = Monomial::from_slice(indices);
        monomial.sort_unstable();
        if monomial.iter().tuple_windows().any(|(left, right)| left == right) {
            return Err(DihedralError::InvalidTerm(indices.to_vec()));
        }
        Ok(monomial)
    }

    fn coefficient(&self, monomial: &[usize]) -> Option<&u8> {
        let n = self.num_variables;
        match *monomial {
            [] => Some(&self.constant),
            [first] => self.linear.get(first),
            [first, second] => self.quadratic.get(pair_offset(n, first, second)),
            [first, second, third] => self.cubic.get(triple_offset(n, first, second, third)),
            _ => None,
        }
    }

    fn coefficient_mut(&mut self, monomial: &[usize]) -> Option<&mut u8> {
        let n = self.num_variables;
        match *monomial {
            [] => Some(&mut self.constant),
            [first] => self.linear.get_mut(first),
            [first, second] => self.quadratic.get_mut(pair_offset(n, first, second)),
            [first, second, third] => self.cubic.get_mut(triple_offset(n, first, second, third)),
            _ => None,
        }
    }
}

const MALFORMED: DihedralError =
    DihedralError::InvalidElement("polynomial term tables do not match its variable count");

fn accumulate(terms: &mut SparseTerms, monomial: Monomial, value: u8) {
    let entry = terms.entry(monomial).or_insert(0);
    *entry = (*entry + value) % MODULUS;
}

/// Product of two sparse Z₈ polynomials in boolean variables, zero terms dropped.
fn multiplied(left: &SparseTerms, right: &SparseTerms) -> SparseTerms {
    // A factor with 2-adic valuation v only meets right-hand coefficients of valuation < 3 - v.
    let valuation = left.values().map(|value| value.trailing_zeros()).min().unwrap_or(3);
    let mut product = SparseTerms::new();
    for (right_monomial, right_value) in right {
        if right_value.trailing_zeros() + valuation >= 3 {
            continue;
        }
        for (left_monomial, left_value) in left {
            let value = (left_value * right_value) % MODULUS;
            if value != 0 {
                accumulate(&mut product, union(left_monomial, right_monomial), value);
            }
        }
    }
    product.retain(|_, value| *value != 0);
    product
}

fn union(left: &[usize], right: &[usize]) -> Monomial {
    left.iter().copied().merge(right.iter().copied()).dedup().collect()
}

impl Neg for &PhasePolynomial {
    type Output = PhasePolynomial;

    fn neg(self) -> Self::Output {
        let negated = |values: &[u8]| -> Vec<u8> {
            values.iter().map(|value| (MODULUS - value % MODULUS) % MODULUS).collect()
        };
        PhasePolynomial {
            num_variables: self.num_variables,
            constant: (MODULUS - self.constant % MODULUS) % MODULUS,
            linear: negated(&self.linear),
            quadratic: negated(&self.quadratic),
            cubic: negated(&self.cubic),
        }
    }
}

impl Neg for PhasePolynomial {
    type Output = PhasePolynomial;

    fn neg(self) -> Self::Output {
        -&self
    }
}

impl AddAssign<&PhasePolynomial> for PhasePolynomial {
    /// # Panics
    ///
    /// Panics if the variable counts differ.
    fn add_assign(&mut self, rhs: &PhasePolynomial) {
        assert_eq!(self.num_variables, rhs.num_variables);
        let added = |values: &mut Vec<u8>, others: &[u8]| {
            for (value, other) in std::iter::zip(values, others) {
                *value = (*value % MODULUS + other % MODULUS) % MODULUS;
            }
        };
        self.constant = (self.constant % MODULUS + rhs.constant % MODULUS) % MODULUS;
        added(&mut self.linear, &rhs.linear);
        added(&mut self.quadratic, &rhs.quadratic);
        added(&mut self.cubic, &rhs.cubic);
    }
}

impl Add for &PhasePolynomial {
    type Output = PhasePolynomial;

    fn add(self, rhs: Self) -> Self::Output {
        let mut res = self.clone();
        res += rhs;
        res
    }
}

impl std::fmt::Display for PhasePolynomial {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let mut wrote = false;
        for (monomial, value) in self.terms() {
            if wrote {
                write!(f, " + ")?;
            }
            if monomial.is_empty() || value != 1 {
                write!(f, "{value}")?;
            }
            for index in monomial {
                write!(f, "x{}", subscript_digits(index))?;
            }
            wrote = true;
        }
        if !wrote {
            write!(f, "0")?;
        }
        Ok(())
    }
}

impl std::fmt::Debug for PhasePolynomial {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "PhasePolynomial(num_variables={}, {self})", self.num_variables)
    }
}
