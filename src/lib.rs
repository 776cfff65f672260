//!Sum-of-squares certificates for symmetric polynomial matrices.
//!
//!A symmetric polynomial matrix `P(x)` is positive semidefinite for every
//!`x` if it is an *SOS matrix*: `P = MᵗM` for a polynomial matrix `M`.
//!This crate searches such certificates by semidefinite programming,
//!with the [CSDP](https://github.com/coin-or/Csdp) solver.
//!
//!# Example
//!
//!```rust,no_run
//!extern crate sos_matrix;
//!
//!use sos_matrix::*;
//!
//!pub fn main() {
//!    let vars = Variables::new();
//!    let x: Polynomial<i64> = Polynomial::var(&vars.declare("x"));
//!
//!    // P = [x² - 2x + 2, x; x, x²]
//!    let p11 = &x * &x - x.clone() * 2 + 2;
//!    let p = PolyMatrix::from_rows(vec![
//!        vec![p11, x.clone()],
//!        vec![x.clone(), &x * &x],
//!    ])
//!    .unwrap();
//!
//!    // Matrix-native query: is P = MᵗM ?
//!    let solver = Csdp::default();
//!    let result = SosMatrixConstraint::new(p.clone(), &vars).solve(&solver).unwrap();
//!    println!("{} with {} monomials", result.status(), result.certificate_monomials().len());
//!
//!    // Scalar reformulation: is yᵗPy a sum of squares ?
//!    let (_, q) = p.quadratic_form_fresh(&vars, "z");
//!    let scalar = SosConstraint::new(q, SosOptions::new(NewtonPolytope::Unipartite));
//!    let result = scalar.solve(&solver).unwrap();
//!    println!("{} with {} monomials", result.status(), result.certificate_monomials().len());
//!}
//!```
//!

#![warn(
    missing_debug_implementations,
    trivial_casts,
    trivial_numeric_casts,
    unsafe_code,
    unstable_features,
    unused_import_braces,
    unused_labels
)]

#[macro_use]
extern crate serde_derive;

mod error;
pub use crate::error::Error;

pub mod certificate;
pub mod csdp;
mod hull;
pub mod matrix;
pub mod monomial;
pub mod newton;
pub mod polynomial;
pub mod sdpa;
pub mod sos;
pub mod variable;

pub use crate::certificate::SosResult;
pub use crate::csdp::{Csdp, SolverSettings, TerminationStatus};
pub use crate::matrix::PolyMatrix;
pub use crate::monomial::Monomial;
pub use crate::newton::NewtonPolytope;
pub use crate::polynomial::Polynomial;
pub use crate::sos::{SosConstraint, SosMatrixConstraint, SosOptions};
pub use crate::variable::{Variable, Variables};

fn init_log(level: log::LevelFilter) {
    let _ = env_logger::Builder::new()
        .filter_level(level)
        .parse_default_env()
        .format_target(false)
        .try_init();
}

/// Log solver calls and results on the terminal.
pub fn init_default_log() {
    init_log(log::LevelFilter::Info)
}

/// Log everything, including the iterations of the solver.
pub fn init_debug_log() {
    init_log(log::LevelFilter::Trace)
}
