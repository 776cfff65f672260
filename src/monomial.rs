//! Monomials as sparse products of powers of indeterminates.

use crate::variable::Variable;
use std::cmp::Ordering;
use std::fmt;
use std::fmt::Display;

/// A product of powers of variables.
///
/// Powers are sorted by variable and never zero, so the constant monomial
/// is the empty product. Monomials are compared in graded lexicographic
/// order: total degree first, then the exponent of the earliest declared
/// variable where they differ.
#[derive(Clone, Debug, PartialEq, Eq, Hash, Default)]
pub struct Monomial {
    powers: Vec<(Variable, u32)>,
}

impl Monomial {
    /// The constant monomial `1`.
    pub fn one() -> Self {
        Self::default()
    }
    /// The monomial `v^exp`.
    pub fn power(v: &Variable, exp: u32) -> Self {
        if exp == 0 {
            Self::one()
        } else {
            Self {
                powers: vec![(v.clone(), exp)],
            }
        }
    }
    /// Build a monomial from the exponents of `vars`.
    pub fn from_exponents(vars: &[Variable], exps: &[u32]) -> Self {
        assert_eq!(vars.len(), exps.len());
        let mut powers: Vec<_> = vars
            .iter()
            .zip(exps)
            .filter(|&(_, &e)| e > 0)
            .map(|(v, &e)| (v.clone(), e))
            .collect();
        powers.sort_by(|a, b| a.0.cmp(&b.0));
        let mut res = Self::one();
        for (v, e) in powers {
            res = &res * &Self::power(&v, e);
        }
        res
    }
    pub fn is_constant(&self) -> bool {
        self.powers.is_empty()
    }
    /// Total degree.
    pub fn degree(&self) -> u32 {
        self.powers.iter().map(|(_, e)| e).sum()
    }
    /// Exponent of `v`, zero if `v` does not appear.
    pub fn exponent(&self, v: &Variable) -> u32 {
        match self.powers.binary_search_by(|(w, _)| w.cmp(v)) {
            Ok(i) => self.powers[i].1,
            Err(_) => 0,
        }
    }
    /// Exponent vector with respect to `vars`.
    pub fn exponents(&self, vars: &[Variable]) -> Vec<u32> {
        vars.iter().map(|v| self.exponent(v)).collect()
    }
    /// Variables with a nonzero exponent.
    pub fn variables(&self) -> impl Iterator<Item = &Variable> {
        self.powers.iter().map(|(v, _)| v)
    }
    pub fn powers(&self) -> &[(Variable, u32)] {
        &self.powers
    }
    /// Keep only the powers of the variables in `vars`.
    pub fn restrict(&self, vars: &[Variable]) -> Self {
        Self {
            powers: self
                .powers
                .iter()
                .filter(|(v, _)| vars.contains(v))
                .cloned()
                .collect(),
        }
    }
    /// The monomial `self / other`, if `other` divides `self`.
    pub fn divide(&self, other: &Self) -> Option<Self> {
        let mut powers = Vec::with_capacity(self.powers.len());
        for (v, e) in &self.powers {
            let d = other.exponent(v);
            match e.cmp(&d) {
                Ordering::Less => return None,
                Ordering::Equal => (),
                Ordering::Greater => powers.push((v.clone(), e - d)),
            }
        }
        if other.variables().any(|v| self.exponent(v) == 0) {
            return None;
        }
        Some(Self { powers })
    }
    /// Square of the monomial.
    pub fn square(&self) -> Self {
        Self {
            powers: self.powers.iter().map(|(v, e)| (v.clone(), 2 * e)).collect(),
        }
    }
}

impl<'a> std::ops::Mul for &'a Monomial {
    type Output = Monomial;

    fn mul(self, other: Self) -> Monomial {
        let mut powers = Vec::with_capacity(self.powers.len() + other.powers.len());
        let (mut i, mut j) = (0, 0);
        while i < self.powers.len() && j < other.powers.len() {
            let (a, ea) = &self.powers[i];
            let (b, eb) = &other.powers[j];
            match a.cmp(b) {
                Ordering::Less => {
                    powers.push((a.clone(), *ea));
                    i += 1
                }
                Ordering::Greater => {
                    powers.push((b.clone(), *eb));
                    j += 1
                }
                Ordering::Equal => {
                    powers.push((a.clone(), ea + eb));
                    i += 1;
                    j += 1
                }
            }
        }
        powers.extend_from_slice(&self.powers[i..]);
        powers.extend_from_slice(&other.powers[j..]);
        Monomial { powers }
    }
}

impl std::ops::Mul for Monomial {
    type Output = Self;

    fn mul(self, other: Self) -> Self {
        &self * &other
    }
}

impl Ord for Monomial {
    fn cmp(&self, other: &Self) -> Ordering {
        match self.degree().cmp(&other.degree()) {
            Ordering::Equal => (),
            ord => return ord,
        }
        // Walk both power lists; the first variable where exponents
        // differ decides.
        let (mut i, mut j) = (0, 0);
        loop {
            match (self.powers.get(i), other.powers.get(j)) {
                (None, None) => return Ordering::Equal,
                (Some(_), None) => return Ordering::Greater,
                (None, Some(_)) => return Ordering::Less,
                (Some((a, ea)), Some((b, eb))) => match a.cmp(b) {
                    Ordering::Less => return Ordering::Greater,
                    Ordering::Greater => return Ordering::Less,
                    Ordering::Equal => match ea.cmp(eb) {
                        Ordering::Equal => {
                            i += 1;
                            j += 1
                        }
                        ord => return ord,
                    },
                },
            }
        }
    }
}

impl PartialOrd for Monomial {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl From<&Variable> for Monomial {
    fn from(v: &Variable) -> Self {
        Self::power(v, 1)
    }
}

impl Display for Monomial {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        if self.is_constant() {
            return write!(f, "1");
        }
        for (k, (v, e)) in self.powers.iter().enumerate() {
            if k > 0 {
                write!(f, "*")?;
            }
            if *e == 1 {
                write!(f, "{v}")?;
            } else {
                write!(f, "{v}^{e}")?;
            }
        }
        Ok(())
    }
}

/// All monomials in `vars` of total degree between `min_degree` and
/// `max_degree` whose exponent in `vars[i]` lies in `bounds[i]`.
///
/// The result is sorted in graded lexicographic order.
pub fn monomials_in_box(
    vars: &[Variable],
    min_degree: u32,
    max_degree: u32,
    bounds: &[(u32, u32)],
) -> Vec<Monomial> {
    assert_eq!(vars.len(), bounds.len());
    let mut res = Vec::new();
    let mut exps: Vec<u32> = bounds.iter().map(|b| b.0).collect();
    if bounds.iter().any(|(lo, hi)| lo > hi) {
        return res;
    }
    // Odometer over the box.
    loop {
        let d: u32 = exps.iter().sum();
        if min_degree <= d && d <= max_degree {
            res.push(Monomial::from_exponents(vars, &exps));
        }
        let mut k = 0;
        loop {
            if k == vars.len() {
                res.sort();
                return res;
            }
            if exps[k] < bounds[k].1 {
                exps[k] += 1;
                break;
            }
            exps[k] = bounds[k].0;
            k += 1;
        }
    }
}
