//! Discrete sampling helpers shared by evolution and cohort generation.
//!
//! Every helper takes the generator explicitly. One call consumes exactly one
//! draw from `rng`, so the draw sequence of a participant is fixed by the
//! order in which these are called.

use rand::Rng;

/// Sample one of `values` with relative integer `weights`.
///
/// Panics if the slices differ in length or all weights are zero; callers pass
/// fixed tables.
#[inline]
pub fn weighted_choice<T: Copy, R: Rng + ?Sized>(values: &[T], weights: &[u32], rng: &mut R) -> T {
    debug_assert_eq!(values.len(), weights.len());
    let total: u64 = weights.iter().map(|&w| u64::from(w)).sum();
    assert!(total > 0, "weighted_choice: all weights are zero");
    let mut r = rng.random_range(0..total);
    for (v, &w) in values.iter().zip(weights) {
        let w = u64::from(w);
        if r < w {
            return *v;
        }
        r -= w;
    }
    // Unreachable with r < total
    values[values.len() - 1]
}

/// Sample a Likert value 1..=5 with relative weights for each level.
#[inline]
pub fn weighted_likert<R: Rng + ?Sized>(weights: &[u32; 5], rng: &mut R) -> i64 {
    weighted_choice(&[1, 2, 3, 4, 5], weights, rng)
}

/// Uniform Likert value 1..=5.
#[inline]
pub fn uniform_likert<R: Rng + ?Sized>(rng: &mut R) -> i64 {
    rng.random_range(1..=5)
}

/// Bernoulli trial with probability `p`, drawn as one uniform in [0, 1).
#[inline]
pub fn chance<R: Rng + ?Sized>(p: f64, rng: &mut R) -> bool {
    rng.random::<f64>() < p
}

/// Even choice between −1 and +1.
#[inline]
pub fn random_sign<R: Rng + ?Sized>(rng: &mut R) -> i64 {
    if rng.random::<bool>() {
        1
    } else {
        -1
    }
}
