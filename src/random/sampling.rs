//! Primitive samplers shared by the color model and the shape generator.
//!
//! Every sampler takes the random source explicitly (`&mut R where R: Rng`), so callers decide
//! between an entropy-seeded generator (the default everywhere in production) and a fixed-seed
//! [`StdRng`] for reproducible output.

use rand::{Rng, SeedableRng, rngs::StdRng, seq::SliceRandom};

/// Alphabet used by [`random_token`].
pub const TOKEN_ALPHABET: &[u8] =
    b"ABCDEFGHIJKLMNOPQRSTUVWXYZabcdefghijklmnopqrstuvwxyz0123456789%!@#$%^&*()_+-=";

/// Build the default random source: an entropy-seeded [`StdRng`].
pub fn entropy_rng() -> StdRng {
    StdRng::from_entropy()
}

/// Build a reproducible random source from a fixed seed.
pub fn seeded_rng(seed: u64) -> StdRng {
    StdRng::seed_from_u64(seed)
}

/// Uniform integer in `[min, max]` (both inclusive).
///
/// Callers validate `min <= max` at the settings boundary.
pub fn uniform<R: Rng + ?Sized>(rng: &mut R, min: i64, max: i64) -> i64 {
    debug_assert!(min <= max, "uniform called with inverted bounds {min} > {max}");
    if min >= max {
        return min;
    }
    rng.gen_range(min..=max)
}

/// Uniform float in `[min, max)`.
pub fn random_float<R: Rng + ?Sized>(rng: &mut R, min: f64, max: f64) -> f64 {
    if min >= max {
        return min;
    }
    rng.gen_range(min..max)
}

/// Sample `uniform(center - half_range, center + half_range)` and wrap it into `[min, max)`.
///
/// Out-of-range values are wrapped by the span `max - min`, never clamped.
pub fn from_center<R: Rng + ?Sized>(
    rng: &mut R,
    center: i64,
    half_range: i64,
    min: i64,
    max: i64,
) -> i64 {
    let half_range = half_range.abs();
    let value = uniform(rng, center - half_range, center + half_range);
    wrap_into(value, min, max)
}

/// Wrap `value` into the half-open interval `[min, max)`.
pub fn wrap_into(value: i64, min: i64, max: i64) -> i64 {
    let span = max - min;
    if span <= 0 {
        return min;
    }
    min + (value - min).rem_euclid(span)
}

/// Uniform pick from a slice; `None` when the slice is empty.
pub fn choice<'a, T, R: Rng + ?Sized>(rng: &mut R, items: &'a [T]) -> Option<&'a T> {
    items.choose(rng)
}

/// Random string of `length` characters drawn with replacement from [`TOKEN_ALPHABET`].
pub fn random_token<R: Rng + ?Sized>(rng: &mut R, length: usize) -> String {
    (0..length)
        .map(|_| char::from(TOKEN_ALPHABET[rng.gen_range(0..TOKEN_ALPHABET.len())]))
        .collect()
}

/// Fair coin flip.
pub fn coin<R: Rng + ?Sized>(rng: &mut R) -> bool {
    rng.gen_bool(0.5)
}

#[cfg(test)]
#[path = "../../tests/unit/random/sampling.rs"]
mod tests;
