//! Sum-of-squares constraints on polynomials and polynomial matrices.
//!
//! A polynomial `p` is a sum of squares over a monomial vector `b` iff
//! there is a Gram matrix `Q ⪰ 0` with `p = bᵗ Q b`. Matching the
//! coefficients of both sides gives one linear equality on `Q` per
//! monomial, which is the semidefinite program sent to the solver.
//!
//! A symmetric matrix `P(x)` is an SOS matrix, `P = MᵗM`, iff `yᵗ P(x) y`
//! is a sum of squares for fresh variables `y` with a certificate linear
//! in `y`.

use crate::Error;
use crate::certificate::SosResult;
use crate::csdp::{Csdp, TerminationStatus};
use crate::matrix::PolyMatrix;
use crate::monomial::Monomial;
use crate::newton::{NewtonPolytope, diagonal_filter};
use crate::polynomial::Polynomial;
use crate::sdpa::{SdpaCoeff, SdpaProblem, push_identities};
use crate::variable::{Variable, Variables};
use log::*;
use num::{Num, ToPrimitive};
use std::collections::BTreeMap;

/// How the certificate basis is chosen.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct SosOptions {
    /// Approximation of the half Newton polytope.
    pub newton: NewtonPolytope,
    /// Also apply [`diagonal_filter`] to the selected basis.
    pub diagonal_filter: bool,
}

impl SosOptions {
    pub fn new(newton: NewtonPolytope) -> Self {
        Self {
            newton,
            diagonal_filter: false,
        }
    }
    pub fn with_diagonal_filter(mut self) -> Self {
        self.diagonal_filter = true;
        self
    }
    fn basis<N>(&self, p: &Polynomial<N>) -> Result<Vec<Monomial>, Error> {
        let basis = self.newton.half_newton_polytope(p)?;
        Ok(if self.diagonal_filter {
            diagonal_filter(p, basis)
        } else {
            basis
        })
    }
}

/// The semidefinite program `∃ Q ⪰ 0, bᵗ Q b = p` minimizing `tr Q`.
#[derive(Debug, Clone)]
pub struct GramSdp {
    pub basis: Vec<Monomial>,
    /// Monomial of each equality constraint, in the order of the SDPA file.
    pub monomials: Vec<Monomial>,
    pub problem: SdpaProblem,
}

impl GramSdp {
    /// Build the program, or return a term of `p` that no product of two
    /// basis monomials can produce.
    pub fn new(p: &Polynomial<f64>, basis: Vec<Monomial>) -> Result<Self, Monomial> {
        let m = basis.len();
        // Products b_i b_j for i <= j, grouped by monomial.
        let mut pairs: BTreeMap<Monomial, Vec<(usize, usize)>> = BTreeMap::new();
        for j in 0..m {
            for i in 0..=j {
                pairs.entry(&basis[i] * &basis[j]).or_default().push((i, j))
            }
        }
        if let Some(missing) = p.support().find(|mono| !pairs.contains_key(mono)) {
            return Err(missing.clone());
        }
        let block_sizes = vec![m as i32];
        let mut monomials = Vec::with_capacity(pairs.len());
        let mut b = Vec::with_capacity(pairs.len());
        let mut coeffs = Vec::new();
        for (k, (mono, list)) in pairs.into_iter().enumerate() {
            b.push(p.coeff(&mono));
            for (i, j) in list {
                coeffs.push(SdpaCoeff {
                    mat: k + 1,
                    block: 1,
                    i: i + 1,
                    j: j + 1,
                    val: 1.,
                })
            }
            monomials.push(mono);
        }
        // csdp maximizes, so the objective -tr(Q) minimizes the trace.
        push_identities(&mut coeffs, 0, &block_sizes, -1.);
        Ok(Self {
            basis,
            monomials,
            problem: SdpaProblem::new(block_sizes, b, coeffs),
        })
    }
}

/// Solve `p` SOS over `basis`.
fn solve_gram(
    p: &Polynomial<f64>,
    basis: Vec<Monomial>,
    solver: &Csdp,
    name: &str,
) -> Result<SosResult, Error> {
    if p.is_zero() {
        info!("Zero polynomial: empty certificate");
        return Ok(SosResult::trivial(basis));
    }
    match GramSdp::new(p, basis.clone()) {
        Err(missing) => {
            info!("Term {} is not a product of basis monomials: infeasible", missing);
            Ok(SosResult::unsolved(TerminationStatus::Infeasible, basis))
        }
        Ok(sdp) => {
            debug!(
                "Gram matrix of size {} with {} constraints",
                sdp.basis.len(),
                sdp.monomials.len()
            );
            let output = solver.solve(&sdp.problem, name)?;
            if !output.status.is_success() {
                warn!("SOS program not solved: {}", output.status);
            }
            Ok(SosResult::from_output(output, sdp.basis))
        }
    }
}

/// The constraint "`p` is a sum of squares".
#[derive(Debug, Clone)]
pub struct SosConstraint<N> {
    pub poly: Polynomial<N>,
    pub options: SosOptions,
}

impl<N> SosConstraint<N>
where
    N: Num + Clone + ToPrimitive,
{
    pub fn new(poly: Polynomial<N>, options: SosOptions) -> Self {
        Self { poly, options }
    }
    /// Monomials of the certificate, computed without calling the solver.
    pub fn monomial_basis(&self) -> Result<Vec<Monomial>, Error> {
        self.options.basis(&self.poly)
    }
    pub fn solve(&self, solver: &Csdp) -> Result<SosResult, Error> {
        let basis = self.monomial_basis()?;
        solve_gram(&self.poly.to_f64(), basis, solver, "sos")
    }
}

/// The constraint "`P` is an SOS matrix", that is `P = MᵗM` for a
/// polynomial matrix `M`.
#[derive(Debug, Clone)]
pub struct SosMatrixConstraint<N> {
    pub matrix: PolyMatrix<N>,
    /// Fresh variables of the quadratic form `yᵗ P y`.
    pub y: Vec<Variable>,
    /// The quadratic form `yᵗ P y`.
    pub poly: Polynomial<N>,
    pub diagonal_filter: bool,
}

impl<N> SosMatrixConstraint<N>
where
    N: Num + Clone + ToPrimitive,
{
    /// Declare the fresh variables of the reformulation in `vars`.
    pub fn new(matrix: PolyMatrix<N>, vars: &Variables) -> Self {
        let (y, poly) = matrix.quadratic_form_fresh(vars, "y");
        Self {
            matrix,
            y,
            poly,
            diagonal_filter: false,
        }
    }
    pub fn with_diagonal_filter(mut self) -> Self {
        self.diagonal_filter = true;
        self
    }
    /// The variables of the matrix and `y` are split: the basis is the
    /// product of the half Newton polytope in the former with `y`.
    pub fn options(&self) -> SosOptions {
        let parts = [self.matrix.variables(), self.y.clone()]
            .into_iter()
            .filter(|part| !part.is_empty())
            .collect();
        SosOptions {
            newton: NewtonPolytope::Multipartite(parts),
            diagonal_filter: self.diagonal_filter,
        }
    }
    /// Monomials of the certificate, computed without calling the solver.
    pub fn monomial_basis(&self) -> Result<Vec<Monomial>, Error> {
        self.options().basis(&self.poly)
    }
    pub fn solve(&self, solver: &Csdp) -> Result<SosResult, Error> {
        let basis = self.monomial_basis()?;
        let res = solve_gram(&self.poly.to_f64(), basis, solver, "sos_matrix")?;
        Ok(res.with_matrix_rows(self.y.clone()))
    }
}
