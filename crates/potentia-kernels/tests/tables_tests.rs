use potentia_core::{PotentialError, TablePotential, Variable};
use potentia_kernels::*;

fn var(id: usize, n: usize) -> Variable {
    Variable::new(id, n)
}

fn table(vars: &[Variable], values: &[f64]) -> TablePotential {
    TablePotential::from_parts(vars.to_vec(), values.to_vec()).unwrap()
}

#[test]
fn multiply_two_disjoint_tables() {
    let a = table(&[var(0, 2)], &[2.0, 5.0]);
    let b = table(&[var(1, 3)], &[10.0, 20.0, 30.0]);
    let r = multiply_tables(&[a, b]).unwrap();
    assert_eq!(r.variables, vec![var(0, 2), var(1, 3)]);
    assert_eq!(r.values, vec![20.0, 50.0, 40.0, 100.0, 60.0, 150.0]);
}

#[test]
fn multiply_shared_variable() {
    // P(a) * P(b | a), a and b binary
    let pa = table(&[var(0, 2)], &[0.3, 0.7]);
    // layout (b, a) with b fastest: P(b=0|a=0), P(b=1|a=0), P(b=0|a=1), P(b=1|a=1)
    let pba = table(&[var(1, 2), var(0, 2)], &[0.9, 0.1, 0.4, 0.6]);
    let cfg = MultiplyConfig {
        reorder: false,
        ..MultiplyConfig::default()
    };
    let joint = multiply_tables_with(&cfg, &[pa, pba]).unwrap();
    assert_eq!(joint.variables, vec![var(0, 2), var(1, 2)]);
    // (a, b) with a fastest: (0,0) (1,0) (0,1) (1,1)
    let expected = [0.3 * 0.9, 0.7 * 0.4, 0.3 * 0.1, 0.7 * 0.6];
    for (x, e) in joint.values.iter().zip(expected) {
        assert!((x - e).abs() < 1e-15);
    }
    let total: f64 = joint.values.iter().sum();
    assert!((total - 1.0).abs() < 1e-12);
}

#[test]
fn reorder_puts_smaller_tables_first() {
    let big = table(&[var(5, 3), var(6, 2)], &[1.0, 2.0, 3.0, 4.0, 5.0, 6.0]);
    let small = table(&[var(6, 2)], &[10.0, 100.0]);
    let r = multiply_tables(&[big, small]).unwrap();
    // union follows the sorted order: small (var 6) first
    assert_eq!(r.variables, vec![var(6, 2), var(5, 3)]);
    assert_eq!(r.values, vec![10.0, 400.0, 20.0, 500.0, 30.0, 600.0]);
}

#[test]
fn constants_fold_into_scale() {
    let a = table(&[var(0, 2)], &[1.0, 3.0]);
    let k = TablePotential::constant(0.5);
    let one_state = table(&[var(9, 1)], &[4.0]);
    let r = multiply_tables(&[a, k, one_state]).unwrap();
    assert_eq!(r.variables, vec![var(0, 2)]);
    assert_eq!(r.values, vec![2.0, 6.0]);
}

#[test]
fn only_constants_give_constant() {
    let r = multiply_tables(&[TablePotential::constant(2.0), TablePotential::constant(3.5)]).unwrap();
    assert!(r.variables.is_empty());
    assert_eq!(r.values, vec![7.0]);
}

#[test]
fn zero_and_one_potentials() {
    assert_eq!(multiply_tables(&[]).unwrap(), TablePotential::constant(1.0));
    let a = table(&[var(0, 2)], &[1.0, 3.0]);
    assert_eq!(multiply_tables(&[a.clone()]).unwrap(), a);
}

#[test]
fn conflicting_cardinality_fails() {
    let a = table(&[var(0, 2)], &[1.0, 3.0]);
    let b = table(&[var(0, 3)], &[1.0, 1.0, 1.0]);
    assert!(multiply_tables(&[a, b]).is_err());
}

#[test]
fn divide_conditional_by_marginal() {
    // joint over (a, b) divided by marginal over a
    let joint = table(&[var(0, 2), var(1, 2)], &[0.27, 0.28, 0.03, 0.42]);
    let pa = table(&[var(0, 2)], &[0.3, 0.7]);
    let q = divide_tables(&joint, &pa).unwrap();
    assert_eq!(q.variables, vec![var(0, 2), var(1, 2)]);
    let expected = [0.9, 0.4, 0.1, 0.6];
    for (x, e) in q.values.iter().zip(expected) {
        assert!((x - e).abs() < 1e-12);
    }
}

#[test]
fn divide_by_constant_and_zero() {
    let a = table(&[var(0, 3)], &[1.0, 2.0, 3.0]);
    let q = divide_tables(&a, &TablePotential::constant(2.0)).unwrap();
    assert_eq!(q.values, vec![0.5, 1.0, 1.5]);
    let z = divide_tables(&a, &TablePotential::constant(0.0)).unwrap();
    assert_eq!(z.values, vec![0.0, 0.0, 0.0]);
}

#[test]
fn marginalize_parent_out_of_joint() {
    // Σ_a P(a) P(b | a) = P(b)
    let pa = table(&[var(0, 2)], &[0.3, 0.7]);
    let pba = table(&[var(1, 2), var(0, 2)], &[0.9, 0.1, 0.4, 0.6]);
    let pb = multiply_and_marginalize(&[pa, pba], &[var(1, 2)], &[var(0, 2)]).unwrap();
    assert_eq!(pb.variables, vec![var(1, 2)]);
    let expected = [0.3 * 0.9 + 0.7 * 0.4, 0.3 * 0.1 + 0.7 * 0.6];
    for (x, e) in pb.values.iter().zip(expected) {
        assert!((x - e).abs() < 1e-15);
    }
}

#[test]
fn marginalize_keeps_requested_order() {
    let a = table(&[var(0, 2), var(1, 3)], &[1.0, 2.0, 3.0, 4.0, 5.0, 6.0]);
    let c = table(&[var(2, 2)], &[1.0, 10.0]);
    // keep (1, 0) in that order, sum out var 2
    let r = multiply_and_marginalize(&[a, c], &[var(1, 3), var(0, 2)], &[var(2, 2)]).unwrap();
    assert_eq!(r.variables, vec![var(1, 3), var(0, 2)]);
    // r[b + 3a] = a_table[a + 2b] * 11
    assert_eq!(r.values, vec![11.0, 33.0, 55.0, 22.0, 44.0, 66.0]);
}

#[test]
fn marginalize_everything_and_nothing() {
    let a = table(&[var(0, 3)], &[1.0, 2.0, 3.0]);
    let total = multiply_and_marginalize(std::slice::from_ref(&a), &[], &[var(0, 3)]).unwrap();
    assert!(total.variables.is_empty());
    assert_eq!(total.values, vec![6.0]);
    let same = multiply_and_marginalize(std::slice::from_ref(&a), &[var(0, 3)], &[]).unwrap();
    assert_eq!(same, a);
}

#[test]
fn marginalize_free_variable_and_constants() {
    let a = table(&[var(0, 2)], &[1.0, 3.0]);
    let k = TablePotential::constant(0.5);
    // var 7 appears in no potential: summing it out multiplies by its 4 states
    let r = multiply_and_marginalize(&[a, k], &[var(0, 2)], &[var(7, 4)]).unwrap();
    assert_eq!(r.values, vec![2.0, 6.0]);
    let only_constants =
        multiply_and_marginalize(&[TablePotential::constant(2.0)], &[var(3, 2)], &[]).unwrap();
    assert_eq!(only_constants.values, vec![2.0, 2.0]);
}

#[test]
fn marginalize_rejects_bad_partitions() {
    let a = table(&[var(0, 2), var(1, 2)], &[1.0, 2.0, 3.0, 4.0]);
    let dup = multiply_and_marginalize(std::slice::from_ref(&a), &[var(0, 2), var(1, 2)], &[var(0, 2)]);
    assert!(matches!(dup, Err(PotentialError::InvalidArgument(_))));
    let missing = multiply_and_marginalize(std::slice::from_ref(&a), &[var(0, 2)], &[]);
    assert!(matches!(missing, Err(PotentialError::InvalidArgument(_))));
    let wrong_states = multiply_and_marginalize(std::slice::from_ref(&a), &[var(0, 2)], &[var(1, 3)]);
    assert!(wrong_states.is_err());
}
