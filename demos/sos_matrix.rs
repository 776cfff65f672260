extern crate sos_matrix;

use sos_matrix::*;

// Certificate of nonnegativity for the symmetric matrix
//   P(x) = [x² - 2x + 2,  x ]
//          [x,            x²]
// once as an SOS matrix, once through the scalar form yᵗ P y.
pub fn main() {
    init_default_log();

    let vars = Variables::new();
    let x: Polynomial<i64> = Polynomial::var(&vars.declare("x"));
    let p = PolyMatrix::from_rows(vec![
        vec![&x * &x - x.clone() * 2 + 2, x.clone()],
        vec![x.clone(), &x * &x],
    ])
    .unwrap();
    println!("P =\n{}\nof degree {}", p, p.degree());

    let solver = Csdp::default().verbosity(1);

    let cons = SosMatrixConstraint::new(p.clone(), &vars);
    let res = cons.solve(&solver).unwrap();
    report("SOS matrix", &res);
    if let Some(m) = res.factor(1e-7).unwrap() {
        println!("M (P = MᵗM):");
        for row in m {
            let row: Vec<String> = row.iter().map(|q| format!("{}", q.clone().with_threshold(1e-6))).collect();
            println!("  [{}]", row.join(", "));
        }
    }

    let (_, q) = p.quadratic_form_fresh(&vars, "z");
    let scalar = SosConstraint::new(q, SosOptions::new(NewtonPolytope::Unipartite));
    let res = scalar.solve(&solver).unwrap();
    report("Scalar yᵗPy", &res);
}

fn report(name: &str, res: &SosResult) {
    let monomials: Vec<String> = res.certificate_monomials().iter().map(|m| format!("{m}")).collect();
    println!(
        "{}: {} with {} monomials [{}]",
        name,
        res.status(),
        monomials.len(),
        monomials.join(", ")
    );
}
