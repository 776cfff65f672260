extern crate sos_matrix;

use num::pow::Pow;
use rand::SeedableRng;
use rand::rngs::StdRng;
use sos_matrix::*;

fn random_pair(seed: u64, degree: u32) -> (Vec<Variable>, Polynomial<i64>, Polynomial<i64>) {
    let mut rng = StdRng::seed_from_u64(seed);
    let vars = Variables::new().declare_vec("x", 3);
    let p = Polynomial::random(&vars, degree, &mut rng);
    let q = Polynomial::random(&vars, degree, &mut rng);
    (vars, p, q)
}

#[test]
pub fn identities() {
    for seed in 0..5 {
        let (_, x, y) = random_pair(seed, 2);
        assert_eq!(&(&x - &y) * &x, &(&x * &x) - &(&y * &x));
        assert_eq!(&(&x + &y) * &(&x - &y), &(&x * &x) - &(&y * &y));
    }
}

#[test]
pub fn mul_commutativity() {
    for seed in 0..5 {
        let (_, x, y) = random_pair(seed, 3);
        assert_eq!(&x * &y, &y * &x)
    }
}

#[test]
pub fn mul_associativity() {
    let (vars, x, y) = random_pair(42, 2);
    let z = Polynomial::random(&vars, 1, &mut StdRng::seed_from_u64(7));
    assert_eq!(&(&x * &y) * &z, &x * &(&y * &z))
}

#[test]
pub fn degrees_add_up() {
    let (_, x, y) = random_pair(3, 2);
    if !x.is_zero() && !y.is_zero() {
        assert_eq!((&x * &y).degree(), x.degree() + y.degree());
    }
    assert_eq!((&x).pow(3).degree(), 3 * x.degree());
}

#[test]
pub fn quadratic_form_is_symmetric_bilinear() {
    // yᵗ P y with P = [[p, q], [q, p]] evaluated at y = (1, 1) is 2p + 2q
    let (_, p, q) = random_pair(11, 2);
    let m = PolyMatrix::from_rows(vec![vec![p.clone(), q.clone()], vec![q.clone(), p.clone()]]).unwrap();
    let vars = Variables::new();
    let (y, form) = m.quadratic_form_fresh(&vars, "y");
    let at_ones = form.substitute(&[(y[0].clone(), 1), (y[1].clone(), 1)]);
    assert_eq!(at_ones, (p + q) * 2);
}
