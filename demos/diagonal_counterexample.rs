extern crate sos_matrix;

use sos_matrix::*;

// For diag(x1², x2²) the multipartite basis keeps the monomials x1*y2 and
// x2*y1, which cannot appear in any certificate. The exact Newton polytope
// and the diagonal filter both remove them.
pub fn main() {
    init_default_log();

    let vars = Variables::new();
    let x = vars.declare_vec("x", 2);
    let x1: Polynomial<i64> = Polynomial::var(&x[0]);
    let x2: Polynomial<i64> = Polynomial::var(&x[1]);
    let p = PolyMatrix::diagonal(vec![&x1 * &x1, &x2 * &x2]);

    let cons = SosMatrixConstraint::new(p, &vars);
    println!("yᵗPy = {}", cons.poly);

    let show = |name: &str, basis: Vec<Monomial>| {
        let basis: Vec<String> = basis.iter().map(|m| format!("{m}")).collect();
        println!("{:>14}: {}", name, basis.join(", "));
    };
    show("multipartite", cons.monomial_basis().unwrap());
    show(
        "filtered",
        cons.clone().with_diagonal_filter().monomial_basis().unwrap(),
    );
    let exact = SosConstraint::new(cons.poly.clone(), SosOptions::new(NewtonPolytope::Exact));
    show("exact", exact.monomial_basis().unwrap());

    let res = cons.solve(&Csdp::default()).unwrap();
    println!("{} with objective {:?}", res.status(), res.primal_value());
}
