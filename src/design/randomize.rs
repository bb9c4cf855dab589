use crate::error::{invalid, WagerResult};
use fastrand::Rng;

/// Seeded generator when a seed is given, otherwise one seeded from entropy.
pub fn session_rng(seed: Option<u64>) -> Rng {
    match seed {
        Some(s) => Rng::with_seed(s),
        None => Rng::new(),
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum BlockOrder {
    /// Blocks stay in order of first appearance.
    #[default]
    Preserve,
    /// Block order is permuted as well.
    Shuffle,
}

/// Uniform random permutation of every row.
pub fn permute<T>(rng: &mut Rng, rows: &mut [T]) {
    rng.shuffle(rows);
}

/// Permutes rows within each block independently. Blocks are identified by
/// `key` and gathered in order of first appearance, so a non-contiguous
/// block is pulled together at the position of its first row.
pub fn shuffle_within_blocks<T, K, F>(rng: &mut Rng, rows: Vec<T>, key: F, order: BlockOrder) -> Vec<T>
where
    K: PartialEq,
    F: Fn(&T) -> K,
{
    let mut blocks: Vec<(K, Vec<T>)> = Vec::new();
    for row in rows {
        let k = key(&row);
        match blocks.iter_mut().find(|(bk, _)| *bk == k) {
            Some((_, members)) => members.push(row),
            None => blocks.push((k, vec![row])),
        }
    }

    for (_, members) in blocks.iter_mut() {
        rng.shuffle(members);
    }
    if order == BlockOrder::Shuffle {
        rng.shuffle(&mut blocks);
    }

    blocks.into_iter().flat_map(|(_, members)| members).collect()
}

/// Keeps the first `fixed` rows in place and permutes the rest.
pub fn shuffle_after_prefix<T>(rng: &mut Rng, rows: &mut [T], fixed: usize) {
    let fixed = fixed.min(rows.len());
    rng.shuffle(&mut rows[fixed..]);
}

/// Labels for a stratum of `size` rows, each level appearing `size / levels`
/// times. The `size % levels` leftover rows take one extra label each from the
/// front of `levels`, in declaration order, before the whole stratum is shuffled.
pub fn balanced_labels<L: Clone>(rng: &mut Rng, size: usize, levels: &[L]) -> WagerResult<Vec<L>> {
    if levels.is_empty() {
        return invalid("balanced assignment needs at least one label level");
    }

    let mut labels: Vec<L> = levels
        .iter()
        .cycle()
        .take(size)
        .cloned()
        .collect();
    rng.shuffle(&mut labels);
    Ok(labels)
}

/// Balanced labels for every row, computed independently within each stratum.
/// The returned vector is index-aligned with `rows`.
pub fn assign_stratified<T, K, F, L>(
    rng: &mut Rng,
    rows: &[T],
    stratum: F,
    levels: &[L],
) -> WagerResult<Vec<L>>
where
    K: PartialEq,
    F: Fn(&T) -> K,
    L: Clone,
{
    let mut strata: Vec<(K, Vec<usize>)> = Vec::new();
    for (i, row) in rows.iter().enumerate() {
        let k = stratum(row);
        match strata.iter_mut().find(|(sk, _)| *sk == k) {
            Some((_, members)) => members.push(i),
            None => strata.push((k, vec![i])),
        }
    }

    let mut out: Vec<Option<L>> = vec![None; rows.len()];
    for (_, members) in &strata {
        let labels = balanced_labels(rng, members.len(), levels)?;
        for (&i, label) in members.iter().zip(labels) {
            out[i] = Some(label);
        }
    }

    // Every index belongs to exactly one stratum.
    Ok(out.into_iter().flatten().collect())
}
