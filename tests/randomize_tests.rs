use proptest::prelude::*;
use recall_wager::design::{
    assign_stratified, balanced_labels, permute, session_rng, shuffle_after_prefix,
    shuffle_within_blocks, BlockOrder,
};

#[test]
fn test_balanced_labels_stratum_of_eight() {
    for seed in 0..50 {
        let mut rng = session_rng(Some(seed));
        let labels = balanced_labels(&mut rng, 8, &["studied", "unstudied"]).unwrap();
        assert_eq!(labels.len(), 8);
        assert_eq!(labels.iter().filter(|l| **l == "studied").count(), 4);
        assert_eq!(labels.iter().filter(|l| **l == "unstudied").count(), 4);
    }
}

#[test]
fn test_balanced_labels_remainder_goes_to_first_levels() {
    let mut rng = session_rng(Some(3));
    let labels = balanced_labels(&mut rng, 7, &['a', 'b', 'c']).unwrap();
    let count = |c: char| labels.iter().filter(|l| **l == c).count();
    assert_eq!((count('a'), count('b'), count('c')), (3, 2, 2));
}

#[test]
fn test_balanced_labels_needs_levels() {
    let mut rng = session_rng(Some(1));
    assert!(balanced_labels::<u8>(&mut rng, 4, &[]).is_err());
}

#[test]
fn test_stratified_assignment_balances_each_stratum() {
    let rows: Vec<(usize, &str)> = (0..20)
        .map(|i| (i, if i < 12 { "studied" } else { "unstudied" }))
        .collect();
    let mut rng = session_rng(Some(11));
    let labels = assign_stratified(&mut rng, &rows, |r| r.1, &[true, false]).unwrap();
    assert_eq!(labels.len(), rows.len());

    let safe_in = |kind: &str| {
        rows.iter()
            .zip(&labels)
            .filter(|(r, l)| r.1 == kind && **l)
            .count()
    };
    assert_eq!(safe_in("studied"), 6);
    assert_eq!(safe_in("unstudied"), 4);
}

#[test]
fn test_within_blocks_preserves_block_order() {
    let rows: Vec<(u32, u32)> = (1..=4).flat_map(|b| (0..5).map(move |i| (b, i))).collect();
    let mut rng = session_rng(Some(42));
    let out = shuffle_within_blocks(&mut rng, rows.clone(), |r| r.0, BlockOrder::Preserve);

    let blocks: Vec<u32> = out.iter().map(|r| r.0).collect();
    let expected: Vec<u32> = rows.iter().map(|r| r.0).collect();
    assert_eq!(blocks, expected);

    for b in 1..=4 {
        let mut members: Vec<u32> = out.iter().filter(|r| r.0 == b).map(|r| r.1).collect();
        members.sort();
        assert_eq!(members, vec![0, 1, 2, 3, 4]);
    }
}

#[test]
fn test_within_blocks_shuffled_order_keeps_blocks_contiguous() {
    let rows: Vec<(u32, u32)> = (1..=6).flat_map(|b| (0..3).map(move |i| (b, i))).collect();
    let mut rng = session_rng(Some(5));
    let out = shuffle_within_blocks(&mut rng, rows, |r| r.0, BlockOrder::Shuffle);

    for chunk in out.chunks(3) {
        assert!(chunk.iter().all(|r| r.0 == chunk[0].0));
    }
}

#[test]
fn test_prefix_stays_fixed() {
    let mut rows: Vec<u32> = (0..30).collect();
    let mut rng = session_rng(Some(9));
    shuffle_after_prefix(&mut rng, &mut rows, 4);
    assert_eq!(&rows[..4], &[0, 1, 2, 3]);

    let mut tail = rows[4..].to_vec();
    tail.sort();
    assert_eq!(tail, (4..30).collect::<Vec<_>>());

    // Prefix longer than the table is clamped.
    shuffle_after_prefix(&mut rng, &mut rows, 100);
}

#[test]
fn test_explicit_seed_replays() {
    let run = |seed| {
        let mut rng = session_rng(Some(seed));
        let mut rows: Vec<u32> = (0..50).collect();
        permute(&mut rng, &mut rows);
        rows
    };
    assert_eq!(run(77), run(77));
    assert_ne!(run(77), run(78));
}

proptest! {
    #[test]
    fn prop_balanced_when_divisible(seed in any::<u64>(), per_level in 0usize..40, levels in 1usize..5) {
        let mut rng = session_rng(Some(seed));
        let level_ids: Vec<usize> = (0..levels).collect();
        let labels = balanced_labels(&mut rng, per_level * levels, &level_ids).unwrap();
        for l in &level_ids {
            prop_assert_eq!(labels.iter().filter(|x| *x == l).count(), per_level);
        }
    }

    #[test]
    fn prop_remainder_differs_by_at_most_one(seed in any::<u64>(), size in 0usize..100, levels in 1usize..6) {
        let mut rng = session_rng(Some(seed));
        let level_ids: Vec<usize> = (0..levels).collect();
        let labels = balanced_labels(&mut rng, size, &level_ids).unwrap();
        prop_assert_eq!(labels.len(), size);
        let counts: Vec<usize> = level_ids
            .iter()
            .map(|l| labels.iter().filter(|x| *x == l).count())
            .collect();
        let max = *counts.iter().max().unwrap();
        let min = *counts.iter().min().unwrap();
        prop_assert!(max - min <= 1);
    }

    #[test]
    fn prop_permute_is_a_permutation(seed in any::<u64>(), n in 0usize..200) {
        let mut rng = session_rng(Some(seed));
        let mut rows: Vec<usize> = (0..n).collect();
        permute(&mut rng, &mut rows);
        rows.sort();
        prop_assert_eq!(rows, (0..n).collect::<Vec<_>>());
    }
}
