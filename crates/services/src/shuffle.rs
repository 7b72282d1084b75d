use rand::seq::SliceRandom;

/// Returns a uniformly random permutation of `items` as a new vector.
///
/// Fisher–Yates via `rand`; the input is never mutated. Used once per
/// question at ingestion time to fix its answer presentation order.
#[must_use]
pub fn shuffled<T: Clone>(items: &[T]) -> Vec<T> {
    let mut out = items.to_vec();
    out.shuffle(&mut rand::rng());
    out
}
