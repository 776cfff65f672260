//! Results of sum-of-squares programs.

use crate::Error;
use crate::csdp::{SolverOutput, TerminationStatus};
use crate::monomial::Monomial;
use crate::polynomial::Polynomial;
use crate::variable::Variable;
use ndarray::{Array1, Array2};
use ndarray_linalg::{Eigh, UPLO};

/// Outcome of an SOS constraint: status reported by the solver, monomials
/// of the certificate and, when solved, its Gram matrix.
#[derive(Debug, Clone)]
pub struct SosResult {
    status: TerminationStatus,
    basis: Vec<Monomial>,
    primal_value: Option<f64>,
    gram: Option<Array2<f64>>,
    /// Variables `y` of the quadratic form `yᵗ P y` for matrix constraints.
    matrix_rows: Option<Vec<Variable>>,
}

impl SosResult {
    pub(crate) fn trivial(basis: Vec<Monomial>) -> Self {
        let n = basis.len();
        Self {
            status: TerminationStatus::Optimal,
            basis,
            primal_value: Some(0.),
            gram: Some(Array2::zeros((n, n))),
            matrix_rows: None,
        }
    }
    pub(crate) fn unsolved(status: TerminationStatus, basis: Vec<Monomial>) -> Self {
        Self {
            status,
            basis,
            primal_value: None,
            gram: None,
            matrix_rows: None,
        }
    }
    pub(crate) fn from_output(output: SolverOutput, basis: Vec<Monomial>) -> Self {
        let n = basis.len();
        let gram = output.solution.map(|sol| sol.primal_matrix(n));
        Self {
            status: output.status,
            // The objective is -I
            primal_value: gram.as_ref().map(|q| -q.diag().sum()),
            gram,
            basis,
            matrix_rows: None,
        }
    }
    pub(crate) fn with_matrix_rows(mut self, y: Vec<Variable>) -> Self {
        self.matrix_rows = Some(y);
        self
    }
    pub fn status(&self) -> TerminationStatus {
        self.status
    }
    /// Monomials of the certificate, in increasing order.
    pub fn certificate_monomials(&self) -> &[Monomial] {
        &self.basis
    }
    /// Gram matrix `Q` such that `p = bᵗ Q b` where `b` is the certificate basis.
    pub fn gram_matrix(&self) -> Option<&Array2<f64>> {
        self.gram.as_ref()
    }
    /// Objective value of the solved program, `-tr(Q)`.
    pub fn primal_value(&self) -> Option<f64> {
        self.primal_value
    }
    /// Polynomials `q_k` with `p ≈ Σ q_k²`, one for each eigenvalue of the
    /// Gram matrix above `tol`. `None` when the program was not solved.
    pub fn sos_decomposition(&self, tol: f64) -> Result<Option<Vec<Polynomial<f64>>>, Error> {
        let gram = match &self.gram {
            Some(gram) => gram,
            None => return Ok(None),
        };
        let res = eigen_squares(gram, tol)?
            .into_iter()
            .map(|(lambda, v)| {
                let mut q = Polynomial::zero();
                for (m, c) in self.basis.iter().zip(v.iter()) {
                    q.add_term(m.clone(), c * lambda.sqrt())
                }
                q
            })
            .collect();
        Ok(Some(res))
    }
    /// For a matrix constraint, the matrix `M` with `P ≈ MᵗM`, as rows.
    ///
    /// Row `k` holds the coefficients of `y_1`, ..., `y_n` in the `k`-th
    /// square of [`sos_decomposition`](Self::sos_decomposition).
    pub fn factor(&self, tol: f64) -> Result<Option<Vec<Vec<Polynomial<f64>>>>, Error> {
        let y = match &self.matrix_rows {
            Some(y) => y,
            None => return Ok(None),
        };
        let squares = match self.sos_decomposition(tol)? {
            Some(squares) => squares,
            None => return Ok(None),
        };
        let rows = squares
            .iter()
            .map(|q| {
                y.iter()
                    .map(|v| q.coefficients_in(v).into_iter().nth(1).unwrap_or_default())
                    .collect()
            })
            .collect();
        Ok(Some(rows))
    }
}

/// Eigenpairs `(λ, v)` of a symmetric `gram` with `λ > tol`, so that
/// `gram ≈ Σ λ v vᵗ`.
pub fn eigen_squares(gram: &Array2<f64>, tol: f64) -> Result<Vec<(f64, Array1<f64>)>, Error> {
    if gram.is_empty() {
        return Ok(Vec::new());
    }
    let (eigenvalues, eigenvectors) = gram.eigh(UPLO::Lower)?;
    let res = eigenvalues
        .iter()
        .zip(eigenvectors.columns())
        .filter(|&(&lambda, _)| lambda > tol)
        .map(|(&lambda, v)| (lambda, v.to_owned()))
        .collect();
    Ok(res)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sdpa::{SdpaCoeff, SdpaSolution};
    use crate::variable::Variables;
    use approx::assert_relative_eq;
    use ndarray::arr2;

    fn output_with_gram(gram: &Array2<f64>) -> SolverOutput {
        let mut coeffs = Vec::new();
        for i in 0..gram.nrows() {
            for j in i..gram.ncols() {
                if gram[(i, j)] != 0. {
                    coeffs.push(SdpaCoeff {
                        mat: 2,
                        block: 1,
                        i: i + 1,
                        j: j + 1,
                        val: gram[(i, j)],
                    })
                }
            }
        }
        SolverOutput {
            status: TerminationStatus::Optimal,
            solution: Some(SdpaSolution { y: vec![], coeffs }),
        }
    }

    #[test]
    fn eigen_squares_reconstruct() {
        let q = arr2(&[[2., -1., 1.], [-1., 1., 0.], [1., 0., 1.]]);
        let terms = eigen_squares(&q, 1e-9).unwrap();
        assert_eq!(terms.len(), 2);
        let mut sum = Array2::zeros((3, 3));
        for (lambda, v) in &terms {
            for i in 0..3 {
                for j in 0..3 {
                    sum[(i, j)] += lambda * v[i] * v[j]
                }
            }
        }
        for (a, b) in sum.iter().zip(q.iter()) {
            assert_relative_eq!(a, b, epsilon = 1e-9);
        }
        assert!(eigen_squares(&Array2::zeros((2, 2)), 1e-9).unwrap().is_empty());
        assert!(eigen_squares(&Array2::zeros((0, 0)), 1e-9).unwrap().is_empty());
    }

    #[test]
    fn decomposition_of_a_square() {
        let vars = Variables::new();
        let x = vars.declare("x");
        let px: Polynomial<f64> = Polynomial::var(&x);
        let p = &px * &px + px.clone() * 2. + 1.;
        let basis = vec![Monomial::one(), Monomial::from(&x)];
        let gram = arr2(&[[1., 1.], [1., 1.]]);
        let res = SosResult::from_output(output_with_gram(&gram), basis);
        assert_eq!(res.status(), TerminationStatus::Optimal);
        assert_eq!(res.primal_value(), Some(-2.));
        let squares = res.sos_decomposition(1e-9).unwrap().unwrap();
        assert_eq!(squares.len(), 1);
        let sum = squares.iter().fold(Polynomial::zero(), |acc, q| acc + q * q);
        assert!(sum.distance(&p) < 1e-9);
        // Not a matrix constraint
        assert!(res.factor(1e-9).unwrap().is_none());
    }

    #[test]
    fn factor_of_matrix_example() {
        let vars = Variables::new();
        let x = vars.declare("x");
        let y = vars.declare_vec("y", 2);
        let (mx, my1, my2) = (Monomial::from(&x), Monomial::from(&y[0]), Monomial::from(&y[1]));
        let basis = vec![my1.clone(), &mx * &my2, &mx * &my1];
        let gram = arr2(&[[2., 1., -1.], [1., 1., 0.], [-1., 0., 1.]]);
        let res = SosResult::from_output(output_with_gram(&gram), basis).with_matrix_rows(y);
        assert_eq!(res.primal_value(), Some(-4.));
        let m = res.factor(1e-9).unwrap().unwrap();
        let px: Polynomial<f64> = Polynomial::var(&x);
        let expected = [
            [&px * &px - px.clone() * 2. + 2., px.clone()],
            [px.clone(), &px * &px],
        ];
        for i in 0..2 {
            for j in 0..2 {
                let entry = m
                    .iter()
                    .fold(Polynomial::zero(), |acc, row| acc + &row[i] * &row[j]);
                assert!(entry.distance(&expected[i][j]) < 1e-9, "{entry}");
            }
        }
    }

    #[test]
    fn unsolved_has_no_certificate() {
        let res = SosResult::unsolved(TerminationStatus::Infeasible, vec![Monomial::one()]);
        assert_eq!(res.certificate_monomials().len(), 1);
        assert!(res.gram_matrix().is_none());
        assert!(res.sos_decomposition(1e-9).unwrap().is_none());
        assert!(res.primal_value().is_none());
    }
}
