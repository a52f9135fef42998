use potentia_core::*;
use proptest::prelude::*;

#[test]
fn strides_variable_zero_fastest() {
    let s = strides_first_fastest(&[2, 3, 4]).unwrap();
    assert_eq!(s, vec![1, 2, 6]);
    assert!(strides_first_fastest(&[]).unwrap().is_empty());
}

#[test]
fn rank_and_unrank_agree_on_small_domain() {
    let dims = [2usize, 3];
    // (c0, c1) enumerated with c0 fastest
    let expected = [[0, 0], [1, 0], [0, 1], [1, 1], [0, 2], [1, 2]];
    let mut c = [0usize; 2];
    for (k, e) in expected.iter().enumerate() {
        unrank(k, &dims, &mut c).unwrap();
        assert_eq!(&c, e);
        assert_eq!(rank(e, &dims).unwrap(), k);
    }
}

#[test]
fn rank_rejects_out_of_bounds_coordinate() {
    let err = rank(&[2, 0], &[2, 3]).unwrap_err();
    assert!(matches!(err, PotentialError::InvalidArgument(_)));
    let err = rank(&[0], &[2, 3]).unwrap_err();
    assert!(matches!(err, PotentialError::SizeMismatch(_)));
}

#[test]
fn unrank_rejects_index_past_domain() {
    let mut c = [0usize; 2];
    let err = unrank(6, &[2, 3], &mut c).unwrap_err();
    assert!(matches!(err, PotentialError::InvalidArgument(_)));
}

#[test]
fn product_overflow_is_size_mismatch() {
    let err = product_checked(&[usize::MAX, 2]).unwrap_err();
    assert!(matches!(err, PotentialError::SizeMismatch(_)));
    assert_eq!(product_checked(&[]).unwrap(), 1);
}

#[test]
fn accumulated_offsets_of_missing_leading_variable() {
    // table over var1 only, joint dims [2, 3]
    let acc = accumulated_offsets(&[2, 3], &[0, 1]).unwrap();
    assert_eq!(acc, vec![0, 1]);
    // table over var0 only: wrapping var0 from 1 back to 0 costs -1
    let acc = accumulated_offsets(&[2, 3], &[1, 0]).unwrap();
    assert_eq!(acc, vec![1, -1]);
}

#[test]
fn accumulated_offsets_with_permuted_table_order() {
    // joint (a, b, c) binary; table stored as (b, a): stride b = 1, stride a = 2
    let acc = accumulated_offsets(&[2, 2, 2], &[2, 1, 0]).unwrap();
    // a: +2; b after a wraps: 2 + 1 - 2*2 = -1; c after a and b wrap: -1 + 0 - 2*1 = -3
    assert_eq!(acc, vec![2, -1, -3]);
}

#[test]
fn counter_steps_follow_accumulated_offsets() {
    let dims = [2usize, 3, 2];
    let strides = [0isize, 2, 1];
    let acc = accumulated_offsets(&dims, &strides).unwrap();
    let mut coordinate = [0usize; 3];
    let mut pos: isize = 0;
    for _ in 1..12 {
        let v = advance(&mut coordinate, &dims).unwrap();
        pos += acc[v];
        assert_eq!(pos, position(&coordinate, &strides).unwrap());
    }
    assert_eq!(advance(&mut coordinate, &dims), None);
}

proptest! {
    #[test]
    fn unrank_then_rank_is_identity(dims in proptest::collection::vec(1usize..5, 0..5), seed in any::<usize>()) {
        let size = product_checked(&dims).unwrap();
        let k = seed % size;
        let mut c = vec![0usize; dims.len()];
        unrank(k, &dims, &mut c).unwrap();
        prop_assert_eq!(rank(&c, &dims).unwrap(), k);
    }

    #[test]
    fn strides_recovered_from_accumulated(
        dims in proptest::collection::vec(1usize..5, 1..5),
        raw in proptest::collection::vec(-20isize..20, 5),
    ) {
        let strides: Vec<isize> = raw[..dims.len()].to_vec();
        let acc = accumulated_offsets(&dims, &strides).unwrap();
        prop_assert_eq!(strides_from_accumulated(&dims, &acc).unwrap(), strides);
    }
}
