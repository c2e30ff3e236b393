//! Ranked group selection.
//!
//! A fitness-sorted sequence (best first) is split into `groups` contiguous
//! groups of equal size; the last group absorbs the remainder of the integer
//! division. From group `g` the first `floor(size_g × rank_fn(g))` members
//! are retained, in order. The rank function therefore shapes elitism: a
//! constant `1.0` keeps everyone, a decreasing function keeps more of the
//! fittest groups.
//!
//! The retained count depends only on the sequence length, the number of
//! groups, and the rank function, so it can be computed before any fitness
//! is known (see [`survivor_count`]).

/// Sizes of the `groups` contiguous groups over `len` elements.
///
/// Returns an empty vector when `groups == 0`.
pub fn group_sizes(len: usize, groups: usize) -> Vec<usize> {
    if groups == 0 {
        return Vec::new();
    }
    let base = len / groups;
    let mut sizes = vec![base; groups];
    if let Some(last) = sizes.last_mut() {
        *last += len % groups;
    }
    sizes
}

/// Number of members kept from a group of `size` with retention `fraction`.
///
/// The fraction is clamped to `[0, 1]`; NaN keeps nobody.
fn retained(size: usize, fraction: f64) -> usize {
    let fraction = if fraction.is_nan() {
        0.0
    } else {
        fraction.clamp(0.0, 1.0)
    };
    ((size as f64 * fraction).floor() as usize).min(size)
}

/// How many of `len` ranked elements survive selection.
pub fn survivor_count<F>(len: usize, groups: usize, rank_fn: F) -> usize
where
    F: Fn(usize) -> f64,
{
    group_sizes(len, groups)
        .into_iter()
        .enumerate()
        .map(|(g, size)| retained(size, rank_fn(g)))
        .sum()
}

/// Splits ranked `items` into groups and keeps the head of each group.
///
/// Order is preserved within and across groups.
pub fn split_by_groups_and_select<T, F>(items: Vec<T>, groups: usize, rank_fn: F) -> Vec<T>
where
    F: Fn(usize) -> f64,
{
    let sizes = group_sizes(items.len(), groups);
    let mut result = Vec::with_capacity(items.len());
    let mut iter = items.into_iter();

    for (g, size) in sizes.into_iter().enumerate() {
        let keep = retained(size, rank_fn(g));
        result.extend(iter.by_ref().take(keep));
        // Drop the unselected tail of the group
        iter.by_ref().take(size - keep).for_each(drop);
    }

    result
}
