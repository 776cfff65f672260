//! Exact membership in the convex hull of integer points.
//!
//! `target` is in the hull of `points` iff the linear program
//!
//! ```text
//! Σ λ_i points_i = target,   Σ λ_i = 1,   λ ≥ 0
//! ```
//!
//! is feasible. Feasibility is decided by the first phase of the simplex
//! method on rationals, with Bland's rule so that it always terminates.

use num::{BigInt, BigRational, Signed, Zero};

fn rational(x: i64) -> BigRational {
    BigRational::from_integer(BigInt::from(x))
}

/// Phase-one simplex tableau for `A λ = b`, `λ ≥ 0`, with one artificial
/// variable per row.
#[derive(Debug)]
struct Tableau {
    /// `rows × (cols + rows)`: original columns then artificial ones.
    a: Vec<Vec<BigRational>>,
    b: Vec<BigRational>,
    basis: Vec<usize>,
    /// Reduced costs of the phase-one objective `Σ artificials`.
    cost: Vec<BigRational>,
    cols: usize,
}

impl Tableau {
    fn new(mut a: Vec<Vec<BigRational>>, mut b: Vec<BigRational>) -> Self {
        let rows = a.len();
        let cols = a.first().map_or(0, Vec::len);
        for (row, rhs) in a.iter_mut().zip(b.iter_mut()) {
            if rhs.is_negative() {
                for v in row.iter_mut() {
                    *v = -v.clone()
                }
                *rhs = -rhs.clone()
            }
        }
        let mut cost = vec![BigRational::zero(); cols + rows];
        for (r, row) in a.iter_mut().enumerate() {
            for (j, v) in row.iter().enumerate() {
                cost[j] -= v
            }
            row.extend((0..rows).map(|k| if k == r { rational(1) } else { rational(0) }));
        }
        Self {
            a,
            b,
            basis: (cols..cols + rows).collect(),
            cost,
            cols,
        }
    }
    fn entering(&self) -> Option<usize> {
        self.cost.iter().position(|c| c.is_negative())
    }
    fn leaving(&self, j: usize) -> Option<usize> {
        let mut best: Option<(usize, BigRational)> = None;
        for r in 0..self.a.len() {
            if self.a[r][j].is_positive() {
                let ratio = &self.b[r] / &self.a[r][j];
                let better = match &best {
                    None => true,
                    Some((r0, q)) => {
                        ratio < *q || (ratio == *q && self.basis[r] < self.basis[*r0])
                    }
                };
                if better {
                    best = Some((r, ratio))
                }
            }
        }
        best.map(|(r, _)| r)
    }
    fn pivot(&mut self, r: usize, j: usize) {
        let p = self.a[r][j].clone();
        for v in self.a[r].iter_mut() {
            *v /= &p
        }
        self.b[r] /= &p;
        let pivot_row = self.a[r].clone();
        let pivot_rhs = self.b[r].clone();
        for k in 0..self.a.len() {
            if k != r && !self.a[k][j].is_zero() {
                let f = self.a[k][j].clone();
                for (v, pv) in self.a[k].iter_mut().zip(&pivot_row) {
                    *v -= &f * pv
                }
                self.b[k] -= &f * &pivot_rhs;
            }
        }
        let f = self.cost[j].clone();
        for (c, pv) in self.cost.iter_mut().zip(&pivot_row) {
            *c -= &f * pv
        }
        self.basis[r] = j;
    }
    /// Run phase one and tell whether the system is feasible.
    fn feasible(mut self) -> bool {
        while let Some(j) = self.entering() {
            match self.leaving(j) {
                Some(r) => self.pivot(r, j),
                // The phase-one objective is bounded below by zero.
                None => unreachable!("unbounded phase-one program"),
            }
        }
        self.basis
            .iter()
            .zip(&self.b)
            .all(|(&col, val)| col < self.cols || val.is_zero())
    }
}

/// Whether `target` lies in the convex hull of `points`.
pub fn in_convex_hull(points: &[Vec<i64>], target: &[i64]) -> bool {
    if points.is_empty() {
        return false;
    }
    let dim = target.len();
    debug_assert!(points.iter().all(|p| p.len() == dim));
    if points.iter().any(|p| p.as_slice() == target) {
        return true;
    }
    // One row per coordinate plus the row Σ λ = 1.
    let mut a: Vec<Vec<BigRational>> = (0..dim)
        .map(|d| points.iter().map(|p| rational(p[d])).collect())
        .collect();
    a.push(vec![rational(1); points.len()]);
    let mut b: Vec<BigRational> = target.iter().map(|&t| rational(t)).collect();
    b.push(rational(1));
    Tableau::new(a, b).feasible()
}
