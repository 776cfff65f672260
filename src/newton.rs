//! Selection of the monomial basis of a sum-of-squares certificate.
//!
//! If `p = Σ q_k²` then every monomial `m` of every `q_k` satisfies
//! `2m ∈ Newt(p)`, the convex hull of the exponents of `p`. The modes of
//! [`NewtonPolytope`] trade the precision of this half Newton polytope
//! against the cost of computing it.

use crate::Error;
use crate::hull::in_convex_hull;
use crate::monomial::{Monomial, monomials_in_box};
use crate::polynomial::Polynomial;
use crate::variable::Variable;
use log::*;
use std::collections::HashSet;

/// How the half Newton polytope of a polynomial is approximated.
#[derive(Clone, Debug, PartialEq, Eq, Default)]
pub enum NewtonPolytope {
    /// Degree and per-variable exponent bounds over all variables at once.
    #[default]
    Unipartite,
    /// The bounds are computed separately on each part of a partition of
    /// the variables, and the candidate basis is the product of the
    /// parts. Variables of the polynomial missing from the partition form
    /// an extra part.
    Multipartite(Vec<Vec<Variable>>),
    /// Exact half Newton polytope: the unipartite candidates `m` such that
    /// `2m` is in the convex hull of the support.
    Exact,
}

// Integer bounds of the half of [lo, hi].
fn half(lo: u32, hi: u32) -> (u32, u32) {
    (lo.div_ceil(2), hi / 2)
}

/// Bounds of the restriction of `p` to `vars`: half total degree range
/// and half exponent range of each variable.
fn half_bounds<N>(p: &Polynomial<N>, vars: &[Variable]) -> ((u32, u32), Vec<(u32, u32)>) {
    let mut degree = (u32::MAX, 0);
    let mut exps = vec![(u32::MAX, 0); vars.len()];
    for m in p.support() {
        let d = m.restrict(vars).degree();
        degree = (degree.0.min(d), degree.1.max(d));
        for (v, bound) in vars.iter().zip(exps.iter_mut()) {
            let e = m.exponent(v);
            *bound = (bound.0.min(e), bound.1.max(e));
        }
    }
    (
        half(degree.0, degree.1),
        exps.into_iter().map(|(lo, hi)| half(lo, hi)).collect(),
    )
}

fn unipartite<N>(p: &Polynomial<N>, vars: &[Variable]) -> Vec<Monomial> {
    let ((lo, hi), bounds) = half_bounds(p, vars);
    monomials_in_box(vars, lo, hi, &bounds)
}

/// Check the partition and complete it with the variables of `p` it misses.
fn complete_partition(
    parts: &[Vec<Variable>],
    vars: &[Variable],
) -> Result<Vec<Vec<Variable>>, Error> {
    let mut seen = HashSet::new();
    for part in parts {
        if part.is_empty() {
            return Err(Error::EmptyPartition);
        }
        for v in part {
            if !seen.insert(v.clone()) {
                return Err(Error::OverlappingPartition(v.name().to_string()));
            }
        }
    }
    let mut res: Vec<Vec<Variable>> = parts
        .iter()
        .map(|part| part.iter().filter(|v| vars.contains(v)).cloned().collect())
        .filter(|part: &Vec<Variable>| !part.is_empty())
        .collect();
    let rest: Vec<Variable> = vars.iter().filter(|v| !seen.contains(*v)).cloned().collect();
    if !rest.is_empty() {
        res.push(rest)
    }
    Ok(res)
}

fn multipartite<N>(
    p: &Polynomial<N>,
    vars: &[Variable],
    parts: &[Vec<Variable>],
) -> Result<Vec<Monomial>, Error> {
    let parts = complete_partition(parts, vars)?;
    let (lo, hi) = half_bounds(p, vars).0;
    let mut res = vec![Monomial::one()];
    for part in &parts {
        let candidates = unipartite(p, part);
        trace!("{} candidates on part of {} variables", candidates.len(), part.len());
        res = res
            .iter()
            .flat_map(|a| candidates.iter().map(move |b| a * b))
            .collect();
    }
    res.retain(|m| (lo..=hi).contains(&m.degree()));
    res.sort();
    Ok(res)
}

fn exact<N>(p: &Polynomial<N>, vars: &[Variable]) -> Vec<Monomial> {
    let points: Vec<Vec<i64>> = p
        .support()
        .map(|m| m.exponents(vars).into_iter().map(i64::from).collect())
        .collect();
    let mut res = unipartite(p, vars);
    res.retain(|m| {
        let target: Vec<i64> = m.exponents(vars).iter().map(|&e| 2 * i64::from(e)).collect();
        let keep = in_convex_hull(&points, &target);
        if !keep {
            trace!("{} is outside the half Newton polytope", m);
        }
        keep
    });
    res
}

impl NewtonPolytope {
    /// Candidate monomials for the square roots of `p`, in increasing order.
    pub fn half_newton_polytope<N>(&self, p: &Polynomial<N>) -> Result<Vec<Monomial>, Error> {
        if p.is_zero() {
            return Ok(Vec::new());
        }
        let vars = p.variables();
        let res = match self {
            Self::Unipartite => unipartite(p, &vars),
            Self::Multipartite(parts) => multipartite(p, &vars, parts)?,
            Self::Exact => exact(p, &vars),
        };
        debug!("{} Newton polytope selected {} monomials", self.name(), res.len());
        Ok(res)
    }
    fn name(&self) -> &'static str {
        match self {
            Self::Unipartite => "unipartite",
            Self::Multipartite(_) => "multipartite",
            Self::Exact => "exact",
        }
    }
}

/// Remove the monomials `m` of `basis` that would force a zero diagonal
/// entry in every Gram matrix of `p`: `m²` is not a term of `p` and is not
/// the product of two distinct monomials of the basis.
///
/// Removal is repeated until no monomial is removed.
pub fn diagonal_filter<N>(p: &Polynomial<N>, mut basis: Vec<Monomial>) -> Vec<Monomial> {
    loop {
        let set: HashSet<&Monomial> = basis.iter().collect();
        let keep: Vec<bool> = basis
            .iter()
            .map(|m| {
                let square = m.square();
                p.coefficient(&square).is_some()
                    || basis.iter().any(|a| {
                        a != m
                            && square
                                .divide(a)
                                .is_some_and(|b| b != *a && set.contains(&b))
                    })
            })
            .collect();
        if keep.iter().all(|&k| k) {
            return basis;
        }
        let mut it = keep.iter();
        basis.retain(|m| {
            let k = it.next().copied().unwrap_or(true);
            if !k {
                trace!("{} removed by the diagonal filter", m);
            }
            k
        });
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::variable::Variables;

    fn names(basis: &[Monomial]) -> Vec<String> {
        basis.iter().map(|m| format!("{m}")).collect()
    }

    // y1^2 (x^2 - 2x + 2) + 2x y1 y2 + x^2 y2^2
    fn matrix_example() -> (Vec<Variable>, Vec<Variable>, Polynomial<i64>) {
        let vars = Variables::new();
        let x = vars.declare("x");
        let y = vars.declare_vec("y", 2);
        let px: Polynomial<i64> = Polynomial::var(&x);
        let y1: Polynomial<i64> = Polynomial::var(&y[0]);
        let y2: Polynomial<i64> = Polynomial::var(&y[1]);
        let p11 = &px * &px - px.clone() * 2 + 2;
        let p = &(&y1 * &y1) * &p11 + (&px * &(&y1 * &y2)) * 2 + &(&px * &px) * &(&y2 * &y2);
        (vec![x], y, p)
    }

    #[test]
    fn unipartite_over_selects() {
        let (_, _, p) = matrix_example();
        let basis = NewtonPolytope::Unipartite.half_newton_polytope(&p).unwrap();
        assert_eq!(
            names(&basis),
            vec!["y[2]", "y[1]", "x", "y[1]*y[2]", "x*y[2]", "x*y[1]"]
        );
    }

    #[test]
    fn multipartite_matches_matrix_structure() {
        let (x, y, p) = matrix_example();
        let basis = NewtonPolytope::Multipartite(vec![x, y])
            .half_newton_polytope(&p)
            .unwrap();
        assert_eq!(names(&basis), vec!["y[2]", "y[1]", "x*y[2]", "x*y[1]"]);
    }

    #[test]
    fn exact_is_smallest() {
        let (_, _, p) = matrix_example();
        let basis = NewtonPolytope::Exact.half_newton_polytope(&p).unwrap();
        assert_eq!(names(&basis), vec!["y[1]", "x*y[2]", "x*y[1]"]);
    }

    #[test]
    fn diagonal_filter_reaches_exact() {
        let (_, _, p) = matrix_example();
        let basis = NewtonPolytope::Unipartite.half_newton_polytope(&p).unwrap();
        let filtered = diagonal_filter(&p, basis);
        assert_eq!(names(&filtered), vec!["y[1]", "x*y[2]", "x*y[1]"]);
    }

    #[test]
    fn partition_errors() {
        let (x, y, p) = matrix_example();
        let empty = NewtonPolytope::Multipartite(vec![x.clone(), vec![]]);
        assert!(matches!(empty.half_newton_polytope(&p), Err(Error::EmptyPartition)));
        let overlap = NewtonPolytope::Multipartite(vec![x.clone(), vec![x[0].clone(), y[0].clone()]]);
        assert!(matches!(
            overlap.half_newton_polytope(&p),
            Err(Error::OverlappingPartition(name)) if name == "x"
        ));
        // y missing from the partition forms its own part
        let partial = NewtonPolytope::Multipartite(vec![x]).half_newton_polytope(&p).unwrap();
        assert_eq!(partial.len(), 4);
    }

    #[test]
    fn zero_and_constant() {
        let zero: Polynomial<i64> = Polynomial::zero();
        assert!(NewtonPolytope::Exact.half_newton_polytope(&zero).unwrap().is_empty());
        let one: Polynomial<i64> = Polynomial::one();
        assert_eq!(
            NewtonPolytope::Unipartite.half_newton_polytope(&one).unwrap(),
            vec![Monomial::one()]
        );
    }

    #[test]
    fn odd_degree_has_no_square_root() {
        let vars = Variables::new();
        let x = vars.declare("x");
        let p: Polynomial<i64> = Polynomial::term(1, Monomial::power(&x, 3));
        assert!(NewtonPolytope::Exact.half_newton_polytope(&p).unwrap().is_empty());
    }
}
