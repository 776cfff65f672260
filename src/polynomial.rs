//! Sparse multivariate polynomials.

use crate::monomial::Monomial;
use crate::variable::Variable;
use num::pow::Pow;
use num::{Num, Signed, ToPrimitive};
use rand::Rng;
use std::collections::BTreeMap;
use std::fmt;
use std::fmt::Display;
use std::ops::*;

/// A polynomial with coefficients in `N`.
///
/// Terms are stored in graded lexicographic order of their monomials.
/// A zero coefficient is never stored, so two equal polynomials have the
/// same terms.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Polynomial<N> {
    terms: BTreeMap<Monomial, N>,
}

impl<N> Default for Polynomial<N> {
    fn default() -> Self {
        Self {
            terms: BTreeMap::new(),
        }
    }
}

impl<N> Polynomial<N> {
    pub fn zero() -> Self {
        Self::default()
    }
    pub fn is_zero(&self) -> bool {
        self.terms.is_empty()
    }
    /// Number of nonzero terms.
    pub fn len(&self) -> usize {
        self.terms.len()
    }
    pub fn is_empty(&self) -> bool {
        self.terms.is_empty()
    }
    /// Iterator on the terms in increasing monomial order.
    pub fn terms(&self) -> impl DoubleEndedIterator<Item = (&Monomial, &N)> {
        self.terms.iter()
    }
    /// Monomials with a nonzero coefficient, in increasing order.
    pub fn support(&self) -> impl Iterator<Item = &Monomial> {
        self.terms.keys()
    }
    pub fn coefficient(&self, m: &Monomial) -> Option<&N> {
        self.terms.get(m)
    }
    /// Variables appearing in the polynomial, in declaration order.
    pub fn variables(&self) -> Vec<Variable> {
        let mut vars: Vec<Variable> = self
            .terms
            .keys()
            .flat_map(|m| m.variables().cloned())
            .collect();
        vars.sort();
        vars.dedup();
        vars
    }
    /// Minimal and maximal total degree of the terms.
    pub fn degree_range(&self) -> Option<(u32, u32)> {
        let mut degrees = self.terms.keys().map(Monomial::degree);
        let first = degrees.next()?;
        Some(degrees.fold((first, first), |(lo, hi), d| (lo.min(d), hi.max(d))))
    }
    /// Maximal total degree, zero for the zero polynomial.
    pub fn degree(&self) -> u32 {
        self.degree_range().map_or(0, |(_, hi)| hi)
    }
    pub fn map<G, M>(&self, g: G) -> Polynomial<M>
    where
        G: Fn(&N) -> M,
        M: Num + Clone,
    {
        let mut res = Polynomial::zero();
        for (m, c) in &self.terms {
            res.add_term(m.clone(), g(c));
        }
        res
    }
}

impl<N> Polynomial<N>
where
    N: Num + Clone,
{
    /// The constant polynomial `c`.
    pub fn constant(c: N) -> Self {
        Self::term(c, Monomial::one())
    }
    pub fn one() -> Self {
        Self::constant(N::one())
    }
    /// The polynomial `c * m`.
    pub fn term(c: N, m: Monomial) -> Self {
        let mut res = Self::zero();
        res.add_term(m, c);
        res
    }
    /// The polynomial `v`.
    pub fn var(v: &Variable) -> Self {
        Self::term(N::one(), Monomial::from(v))
    }
    /// Add `c * m` in place.
    pub fn add_term(&mut self, m: Monomial, c: N) {
        if c.is_zero() {
            return;
        }
        match self.terms.entry(m) {
            std::collections::btree_map::Entry::Vacant(e) => {
                let _ = e.insert(c);
            }
            std::collections::btree_map::Entry::Occupied(mut e) => {
                let sum = e.get().clone() + c;
                if sum.is_zero() {
                    let _ = e.remove();
                } else {
                    *e.get_mut() = sum
                }
            }
        }
    }
    /// Coefficient of `m`, zero if absent.
    pub fn coeff(&self, m: &Monomial) -> N {
        self.terms.get(m).cloned().unwrap_or_else(N::zero)
    }
    /// Collect the terms by their power of `v`: `self = Σ_k v^k * res[k]`.
    pub fn coefficients_in(&self, v: &Variable) -> Vec<Self> {
        let mut res: Vec<Self> = Vec::new();
        for (m, c) in &self.terms {
            let k = m.exponent(v) as usize;
            if res.len() <= k {
                res.resize_with(k + 1, Self::zero);
            }
            let others: Vec<Variable> = m.variables().filter(|&w| w != v).cloned().collect();
            res[k].add_term(m.restrict(&others), c.clone());
        }
        res
    }
    /// Evaluate at a point given as `(variable, value)` pairs.
    /// Variables missing from `point` are left symbolic.
    pub fn substitute(&self, point: &[(Variable, N)]) -> Self {
        let mut res = Self::zero();
        for (m, c) in &self.terms {
            let mut c = c.clone();
            let mut rest = Monomial::one();
            for (v, e) in m.powers() {
                match point.iter().find(|(w, _)| w == v) {
                    Some((_, val)) => {
                        for _ in 0..*e {
                            c = c * val.clone()
                        }
                    }
                    None => rest = &rest * &Monomial::power(v, *e),
                }
            }
            res.add_term(rest, c);
        }
        res
    }
}

impl Polynomial<f64> {
    /// Largest absolute difference between coefficients of `self` and `other`.
    pub fn distance(&self, other: &Self) -> f64 {
        let diff = self - other;
        diff.terms.values().fold(0., |acc, c| acc.max(c.abs()))
    }
    /// Drop the terms whose coefficient has absolute value below `threshold`.
    pub fn with_threshold(mut self, threshold: f64) -> Self {
        self.terms.retain(|_, c| c.abs() >= threshold);
        self
    }
}

impl<N> Polynomial<N>
where
    N: Num + Clone + ToPrimitive,
{
    pub fn to_f64(&self) -> Polynomial<f64> {
        self.map(|c| c.to_f64().unwrap_or(f64::NAN))
    }
}

impl Polynomial<i64> {
    /// Random polynomial in `vars` of degree at most `degree`, coefficients in `-5..=5`.
    pub fn random<R: Rng>(vars: &[Variable], degree: u32, rng: &mut R) -> Self {
        let bounds = vec![(0, degree); vars.len()];
        let mut res = Self::zero();
        for m in crate::monomial::monomials_in_box(vars, 0, degree, &bounds) {
            res.add_term(m, rng.random_range(-5..=5));
        }
        res
    }
}

// ==================== arithmetic ===========

impl<N> Add<&Self> for Polynomial<N>
where
    N: Num + Clone,
{
    type Output = Self;

    fn add(mut self, other: &Self) -> Self::Output {
        for (m, c) in &other.terms {
            self.add_term(m.clone(), c.clone())
        }
        self
    }
}

impl<N> Add for Polynomial<N>
where
    N: Num + Clone,
{
    type Output = Self;

    fn add(self, other: Self) -> Self::Output {
        self + &other
    }
}

impl<'a, N> Add for &'a Polynomial<N>
where
    N: Num + Clone,
{
    type Output = Polynomial<N>;

    fn add(self, other: Self) -> Self::Output {
        self.clone() + other
    }
}

impl<N> Add<N> for Polynomial<N>
where
    N: Num + Clone,
{
    type Output = Self;

    fn add(mut self, c: N) -> Self::Output {
        self.add_term(Monomial::one(), c);
        self
    }
}

impl<N> AddAssign<&Self> for Polynomial<N>
where
    N: Num + Clone,
{
    fn add_assign(&mut self, other: &Self) {
        for (m, c) in &other.terms {
            self.add_term(m.clone(), c.clone())
        }
    }
}

impl<N> Neg for Polynomial<N>
where
    N: Clone + Neg<Output = N>,
{
    type Output = Self;

    fn neg(self) -> Self::Output {
        Self {
            terms: self.terms.into_iter().map(|(m, c)| (m, -c)).collect(),
        }
    }
}

impl<'a, N> Neg for &'a Polynomial<N>
where
    N: Clone + Neg<Output = N>,
{
    type Output = Polynomial<N>;

    fn neg(self) -> Self::Output {
        -self.clone()
    }
}

impl<'a, N> Sub for &'a Polynomial<N>
where
    N: Num + Clone,
{
    type Output = Polynomial<N>;

    fn sub(self, other: Self) -> Self::Output {
        let mut res = self.clone();
        for (m, c) in &other.terms {
            res.add_term(m.clone(), N::zero() - c.clone())
        }
        res
    }
}

impl<N> Sub for Polynomial<N>
where
    N: Num + Clone,
{
    type Output = Self;

    fn sub(self, other: Self) -> Self {
        &self - &other
    }
}

impl<N> Sub<N> for Polynomial<N>
where
    N: Num + Clone,
{
    type Output = Self;

    fn sub(mut self, c: N) -> Self::Output {
        self.add_term(Monomial::one(), N::zero() - c);
        self
    }
}

impl<'a, N> Mul for &'a Polynomial<N>
where
    N: Num + Clone,
{
    type Output = Polynomial<N>;

    fn mul(self, other: Self) -> Polynomial<N> {
        let mut res = Polynomial::zero();
        for (m1, c1) in &self.terms {
            for (m2, c2) in &other.terms {
                res.add_term(m1 * m2, c1.clone() * c2.clone())
            }
        }
        res
    }
}

impl<N> Mul for Polynomial<N>
where
    N: Num + Clone,
{
    type Output = Self;

    fn mul(self, other: Self) -> Self {
        &self * &other
    }
}

// Right scalar multiplication
impl<N> Mul<N> for Polynomial<N>
where
    N: Num + Clone,
{
    type Output = Self;

    fn mul(self, rhs: N) -> Self::Output {
        if rhs.is_zero() {
            return Self::zero();
        }
        Self {
            terms: self
                .terms
                .into_iter()
                .map(|(m, c)| (m, c * rhs.clone()))
                .collect(),
        }
    }
}

impl<N> Pow<u32> for &Polynomial<N>
where
    N: Num + Clone,
{
    type Output = Polynomial<N>;

    fn pow(self, n: u32) -> Polynomial<N> {
        let mut res = Polynomial::one();
        for _ in 0..n {
            res = &res * self
        }
        res
    }
}

impl<N> From<&Variable> for Polynomial<N>
where
    N: Num + Clone,
{
    fn from(v: &Variable) -> Self {
        Self::var(v)
    }
}

impl<N> From<Monomial> for Polynomial<N>
where
    N: Num + Clone,
{
    fn from(m: Monomial) -> Self {
        Self::term(N::one(), m)
    }
}

impl<N> Display for Polynomial<N>
where
    N: Num + Signed + Display + Clone,
{
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        if self.is_zero() {
            return write!(f, "0");
        }
        // Leading term first.
        for (k, (m, c)) in self.terms.iter().rev().enumerate() {
            match (k, c.is_negative()) {
                (0, true) => write!(f, "-")?,
                (0, false) => (),
                (_, true) => write!(f, " - ")?,
                (_, false) => write!(f, " + ")?,
            }
            let abs = c.abs();
            if m.is_constant() {
                write!(f, "{abs}")?;
            } else if abs.is_one() {
                write!(f, "{m}")?;
            } else {
                write!(f, "{abs}{m}")?;
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::variable::Variables;

    #[test]
    fn arithmetic() {
        let vars = Variables::new();
        let x = vars.declare("x");
        let y = vars.declare("y");
        let px: Polynomial<i64> = Polynomial::var(&x);
        let py: Polynomial<i64> = Polynomial::var(&y);
        let sum = &px + &py;
        let square = &sum * &sum;
        assert_eq!(square.len(), 3);
        assert_eq!(
            square.coeff(&(&Monomial::from(&x) * &Monomial::from(&y))),
            2
        );
        assert!((&square - &square).is_zero());
        assert_eq!((&px).pow(0), Polynomial::one());
        assert_eq!((px.clone() * 0).len(), 0);
        assert_eq!(square.degree_range(), Some((2, 2)));
        assert_eq!(square.variables(), vec![x, y]);
    }

    #[test]
    fn display() {
        let vars = Variables::new();
        let x = vars.declare("x");
        let px: Polynomial<i64> = Polynomial::var(&x);
        let p = (&px).pow(2) - px.clone() * 2 + 2;
        assert_eq!(format!("{p}"), "x^2 - 2x + 2");
        assert_eq!(format!("{}", -p), "-x^2 + 2x - 2");
        assert_eq!(format!("{}", Polynomial::<f64>::zero()), "0");
        let q: Polynomial<f64> = Polynomial::var(&x) * 0.5 - 1.;
        assert_eq!(format!("{q}"), "0.5x - 1");
    }

    #[test]
    fn coefficients_in_a_variable() {
        let vars = Variables::new();
        let x = vars.declare("x");
        let y = vars.declare("y");
        let px: Polynomial<i64> = Polynomial::var(&x);
        let py: Polynomial<i64> = Polynomial::var(&y);
        // (x + 1) y^2 + 3
        let p = &(px.clone() + 1) * &(&py).pow(2) + 3;
        let c = p.coefficients_in(&y);
        assert_eq!(c.len(), 3);
        assert_eq!(c[0], Polynomial::constant(3));
        assert!(c[1].is_zero());
        assert_eq!(c[2], px + 1);
    }

    #[test]
    fn substitute() {
        let vars = Variables::new();
        let x = vars.declare("x");
        let y = vars.declare("y");
        let px: Polynomial<i64> = Polynomial::var(&x);
        let py: Polynomial<i64> = Polynomial::var(&y);
        let p = &(&px).pow(2) * &py + 1;
        assert_eq!(p.substitute(&[(x.clone(), 3)]), py * 9 + 1);
        assert_eq!(p.substitute(&[(x, 1), (y, -1)]), Polynomial::zero());
    }

    #[test]
    fn distance() {
        let vars = Variables::new();
        let x = vars.declare("x");
        let p: Polynomial<f64> = Polynomial::var(&x) + 1.;
        let q = p.clone() + 1e-9;
        assert!(p.distance(&q) < 1e-8);
        assert_eq!(q.with_threshold(1e-3).len(), 2);
    }
}
