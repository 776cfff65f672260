//! Symmetric matrices of polynomials.

use crate::Error;
use crate::polynomial::Polynomial;
use crate::variable::{Variable, Variables};
use num::{Num, Signed};
use std::fmt;
use std::fmt::Display;
use std::mem::swap;
use std::ops::{Index, IndexMut};

/// Square symmetric matrix stored as its upper triangle in a single vector.
///
/// Entry `(i, j)` with `i <= j` lives at index `j(j+1)/2 + i`.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Sym<A>(Vec<A>);

impl<A> Sym<A> {
    /// Length of the underlying vector for `size` lines.
    #[inline]
    fn data_size(size: usize) -> usize {
        (size * (size + 1)) / 2
    }
    #[inline]
    fn flat_index(mut i: usize, mut j: usize) -> usize {
        if j < i {
            swap(&mut i, &mut j)
        };
        Self::data_size(j) + i
    }
    /// Create a matrix with `n` lines filled with `elem`.
    pub fn new(elem: A, n: usize) -> Self
    where
        A: Clone,
    {
        Sym(vec![elem; Self::data_size(n)])
    }
    /// Number of lines.
    pub fn size(&self) -> usize {
        let mut res = 0;
        while Self::data_size(res) < self.0.len() {
            res += 1
        }
        debug_assert_eq!(Self::data_size(res), self.0.len());
        res
    }
    /// Pairs `(i, j)` with `i <= j`, in storage order.
    pub fn index_iter(n: usize) -> impl Iterator<Item = (usize, usize)> {
        (0..n).flat_map(move |j| (0..=j).map(move |i| (i, j)))
    }
}

impl<A> Index<(usize, usize)> for Sym<A> {
    type Output = A;

    fn index(&self, (i, j): (usize, usize)) -> &Self::Output {
        &self.0[Self::flat_index(i, j)]
    }
}

impl<A> IndexMut<(usize, usize)> for Sym<A> {
    fn index_mut(&mut self, (i, j): (usize, usize)) -> &mut A {
        &mut self.0[Self::flat_index(i, j)]
    }
}

/// A symmetric matrix whose entries are polynomials.
#[derive(Clone, Debug, PartialEq)]
pub struct PolyMatrix<N> {
    entries: Sym<Polynomial<N>>,
}

impl<N> PolyMatrix<N>
where
    N: Num + Clone,
{
    /// The `n × n` zero matrix.
    pub fn zero(n: usize) -> Self {
        Self {
            entries: Sym::new(Polynomial::zero(), n),
        }
    }
    /// Build from full rows, checking that the matrix is square and symmetric.
    pub fn from_rows(rows: Vec<Vec<Polynomial<N>>>) -> Result<Self, Error> {
        let n = rows.len();
        if rows.iter().any(|row| row.len() != n) {
            return Err(Error::NotSquare);
        }
        let mut res = Self::zero(n);
        for (i, j) in Sym::<()>::index_iter(n) {
            if rows[i][j] != rows[j][i] {
                return Err(Error::NotSymmetric { row: i, col: j });
            }
            res.entries[(i, j)] = rows[i][j].clone()
        }
        Ok(res)
    }
    /// Diagonal matrix with the given diagonal.
    pub fn diagonal(diag: Vec<Polynomial<N>>) -> Self {
        let mut res = Self::zero(diag.len());
        for (i, p) in diag.into_iter().enumerate() {
            res.entries[(i, i)] = p
        }
        res
    }
    /// Number of lines.
    pub fn size(&self) -> usize {
        self.entries.size()
    }
    /// Set entries `(i, j)` and `(j, i)` to `p`.
    pub fn set(&mut self, i: usize, j: usize, p: Polynomial<N>) {
        self.entries[(i, j)] = p
    }
    /// Variables appearing in some entry, in declaration order.
    pub fn variables(&self) -> Vec<Variable> {
        let mut vars: Vec<Variable> = self.entries.0.iter().flat_map(|p| p.variables()).collect();
        vars.sort();
        vars.dedup();
        vars
    }
    /// Maximal degree of the entries.
    pub fn degree(&self) -> u32 {
        self.entries.0.iter().map(Polynomial::degree).max().unwrap_or(0)
    }
    /// The polynomial `yᵗ P y`.
    pub fn quadratic_form(&self, y: &[Variable]) -> Result<Polynomial<N>, Error> {
        if y.len() != self.size() {
            return Err(Error::DimensionMismatch {
                expected: self.size(),
                found: y.len(),
            });
        }
        Ok(self.raw_quadratic_form(y))
    }
    /// Declare `y[1]`, ..., `y[n]` in `vars` and return them with `yᵗ P y`.
    pub fn quadratic_form_fresh(
        &self,
        vars: &Variables,
        name: &str,
    ) -> (Vec<Variable>, Polynomial<N>) {
        let y = vars.declare_vec(name, self.size());
        let p = self.raw_quadratic_form(&y);
        (y, p)
    }
    fn raw_quadratic_form(&self, y: &[Variable]) -> Polynomial<N> {
        let n = self.size();
        assert_eq!(y.len(), n);
        let two = N::one() + N::one();
        let mut res = Polynomial::zero();
        for (i, j) in Sym::<()>::index_iter(n) {
            let yy = &Polynomial::var(&y[i]) * &Polynomial::var(&y[j]);
            let term = &self[(i, j)] * &yy;
            if i == j {
                res += &term
            } else {
                res += &(term * two.clone())
            }
        }
        res
    }
}

impl<N> Index<(usize, usize)> for PolyMatrix<N> {
    type Output = Polynomial<N>;

    fn index(&self, ij: (usize, usize)) -> &Self::Output {
        &self.entries[ij]
    }
}

impl<N> Display for PolyMatrix<N>
where
    N: Num + Signed + Display + Clone,
{
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        let n = self.size();
        for i in 0..n {
            write!(f, "[")?;
            for j in 0..n {
                if j > 0 {
                    write!(f, ", ")?;
                }
                write!(f, "{}", self[(i, j)])?;
            }
            writeln!(f, "]")?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::monomial::Monomial;

    #[test]
    fn sym_storage() {
        assert_eq!(Sym::new(42, 0).0.len(), 0);
        assert_eq!(Sym::new(0, 5).size(), 5);
        let mut m = Sym::new(0, 4);
        m[(3, 1)] = 7;
        assert_eq!(m[(1, 3)], 7);
        assert_eq!(Sym::<i32>::index_iter(4).count(), 10);
        // every slot visited once
        let mut seen = Sym::new(0, 6);
        for (i, j) in Sym::<i32>::index_iter(6) {
            assert!(i <= j);
            seen[(i, j)] += 1
        }
        assert!(seen.0.iter().all(|&c| c == 1));
    }

    #[test]
    fn from_rows_checks_symmetry() {
        let vars = Variables::new();
        let x = vars.declare("x");
        let px: Polynomial<i64> = Polynomial::var(&x);
        let one = Polynomial::one();
        let ok = PolyMatrix::from_rows(vec![vec![one.clone(), px.clone()], vec![px.clone(), one.clone()]]);
        assert!(ok.is_ok());
        let err = PolyMatrix::from_rows(vec![vec![one.clone(), px.clone()], vec![one.clone(), one.clone()]]);
        assert!(matches!(err, Err(Error::NotSymmetric { row: 0, col: 1 })));
        let err = PolyMatrix::from_rows(vec![vec![one.clone(), px]]);
        assert!(matches!(err, Err(Error::NotSquare)));
    }

    #[test]
    fn quadratic_form() {
        let vars = Variables::new();
        let x = vars.declare("x");
        let px: Polynomial<i64> = Polynomial::var(&x);
        let mut p = PolyMatrix::diagonal(vec![Polynomial::one(), &px * &px]);
        assert_eq!(p.degree(), 2);
        p.set(0, 1, px.clone());
        assert_eq!(p[(1, 0)], px);
        let (y, q) = p.quadratic_form_fresh(&vars, "y");
        assert_eq!(y.len(), 2);
        // y1^2 + 2x y1 y2 + x^2 y2^2
        assert_eq!(q.len(), 3);
        let xy1y2 = &(&Monomial::from(&x) * &Monomial::from(&y[0])) * &Monomial::from(&y[1]);
        assert_eq!(q.coeff(&xy1y2), 2);
        assert_eq!(q.degree(), 4);
        assert!(matches!(
            p.quadratic_form(&y[..1]),
            Err(Error::DimensionMismatch { expected: 2, found: 1 })
        ));
        assert_eq!(p.variables(), vec![x]);
        assert_eq!(PolyMatrix::<i64>::zero(3).degree(), 0);
    }
}
