//! Random helpers with checked preconditions
//!
//! Every helper takes the generator explicitly, so callers control seeding
//! and determinism.

use rand::{Rng, RngExt};

use crate::errors::{PoolError, PoolResult};

/// Returns `+1` or `-1` with equal probability.
pub fn direction<R: Rng + ?Sized>(rng: &mut R) -> i32 {
    if rng.random_range(0..2) == 0 { -1 } else { 1 }
}

/// Uniform `f32` in `[min, max]`.
///
/// # Errors
///
/// [`PoolError::InvalidArgument`] when `min > max`.
pub fn f32_between<R: Rng + ?Sized>(rng: &mut R, min: f32, max: f32) -> PoolResult<f32> {
    if min > max {
        return Err(PoolError::InvalidArgument(format!(
            "min {min} exceeds max {max}"
        )));
    }
    Ok(rng.random_range(min..=max))
}

/// Uniform `f64` in `[min, max]`.
///
/// # Errors
///
/// [`PoolError::InvalidArgument`] when `min > max`.
pub fn f64_between<R: Rng + ?Sized>(rng: &mut R, min: f64, max: f64) -> PoolResult<f64> {
    if min > max {
        return Err(PoolError::InvalidArgument(format!(
            "min {min} exceeds max {max}"
        )));
    }
    Ok(rng.random_range(min..=max))
}

/// Uniformly chosen element of `items`; `None` for an empty slice.
pub fn pick<'a, R: Rng + ?Sized, T>(rng: &mut R, items: &'a [T]) -> Option<&'a T> {
    if items.is_empty() {
        None
    } else {
        items.get(rng.random_range(0..items.len()))
    }
}

/// Element of `items` chosen with probability proportional to its weight.
///
/// # Errors
///
/// [`PoolError::InvalidArgument`] when any weight is negative, or when the
/// slice is empty or all weights are zero.
pub fn pick_weighted<'a, R, T, W>(rng: &mut R, items: &'a [T], weight: W) -> PoolResult<&'a T>
where
    R: Rng + ?Sized,
    W: Fn(&T) -> f64,
{
    let mut total = 0.0;
    for item in items {
        let w = weight(item);
        if w < 0.0 {
            return Err(PoolError::InvalidArgument(format!(
                "weight cannot be negative, got {w}"
            )));
        }
        total += w;
    }
    if total <= 0.0 {
        return Err(PoolError::InvalidArgument(
            "no positive weights to pick from".to_string(),
        ));
    }

    let mut roll = rng.random_range(0.0..total);
    for item in items {
        roll -= weight(item);
        if roll < f64::EPSILON {
            return Ok(item);
        }
    }
    // float drift can leave a marginal positive roll after the last element
    match items.last() {
        Some(item) => Ok(item),
        None => Err(PoolError::InvalidArgument(
            "no positive weights to pick from".to_string(),
        )),
    }
}

/// Shuffle `items` in place (Fisher-Yates).
pub fn shuffle<R: Rng + ?Sized, T>(rng: &mut R, items: &mut [T]) {
    for i in (1..items.len()).rev() {
        let j = rng.random_range(0..=i);
        items.swap(i, j);
    }
}

/// `len` integers sampled uniformly from `[min, max)`.
///
/// # Errors
///
/// [`PoolError::InvalidArgument`] when `min > max`.
pub fn fill_i32<R: Rng + ?Sized>(
    rng: &mut R,
    min: i32,
    max: i32,
    len: usize,
) -> PoolResult<Vec<i32>> {
    if min > max {
        return Err(PoolError::InvalidArgument(format!(
            "min {min} exceeds max {max}"
        )));
    }
    if min == max {
        return Ok(vec![min; len]);
    }
    Ok((0..len).map(|_| rng.random_range(min..max)).collect())
}

/// `len` floats sampled uniformly from `[min, max]`.
///
/// # Errors
///
/// [`PoolError::InvalidArgument`] when `min > max`.
pub fn fill_f32<R: Rng + ?Sized>(
    rng: &mut R,
    min: f32,
    max: f32,
    len: usize,
) -> PoolResult<Vec<f32>> {
    if min > max {
        return Err(PoolError::InvalidArgument(format!(
            "min {min} exceeds max {max}"
        )));
    }
    Ok((0..len).map(|_| rng.random_range(min..=max)).collect())
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;
    use rand_chacha::ChaCha8Rng;

    fn rng() -> ChaCha8Rng {
        ChaCha8Rng::seed_from_u64(0x5eed)
    }

    #[test]
    fn direction_is_always_a_unit_step() {
        let mut rng = rng();
        for _ in 0..100 {
            let d = direction(&mut rng);
            assert!(d == 1 || d == -1);
        }
    }

    #[test]
    fn ranged_floats_stay_in_bounds() {
        let mut rng = rng();
        for _ in 0..100 {
            let v = f32_between(&mut rng, -2.0, 3.0).unwrap();
            assert!((-2.0..=3.0).contains(&v));
        }
        assert!(f32_between(&mut rng, 1.0, 0.0).is_err());
        assert!(f64_between(&mut rng, 1.0, 0.0).is_err());
    }

    #[test]
    fn pick_covers_the_slice_and_rejects_empty() {
        let mut rng = rng();
        let items = [10, 20, 30];

        assert!(pick::<_, i32>(&mut rng, &[]).is_none());
        for _ in 0..50 {
            assert!(items.contains(pick(&mut rng, &items).unwrap()));
        }
    }

    #[test]
    fn weighted_pick_skips_zero_weights() {
        let mut rng = rng();
        let items = ["never", "always"];

        for _ in 0..50 {
            let chosen = pick_weighted(&mut rng, &items, |item| {
                if *item == "never" { 0.0 } else { 1.0 }
            })
            .unwrap();
            assert_eq!(*chosen, "always");
        }
    }

    #[test]
    fn weighted_pick_validates_its_inputs() {
        let mut rng = rng();
        let items = [1, 2];

        assert!(pick_weighted(&mut rng, &items, |_| -1.0).is_err());
        assert!(pick_weighted(&mut rng, &items, |_| 0.0).is_err());
        assert!(pick_weighted::<_, i32, _>(&mut rng, &[], |_| 1.0).is_err());
    }

    #[test]
    fn shuffle_preserves_the_multiset() {
        let mut rng = rng();
        let mut items: Vec<u32> = (0..32).collect();
        shuffle(&mut rng, &mut items);

        let mut sorted = items.clone();
        sorted.sort_unstable();
        assert_eq!(sorted, (0..32).collect::<Vec<u32>>());
    }

    #[test]
    fn filled_vectors_respect_their_ranges() {
        let mut rng = rng();

        let ints = fill_i32(&mut rng, -5, 5, 64).unwrap();
        assert_eq!(ints.len(), 64);
        assert!(ints.iter().all(|v| (-5..5).contains(v)));

        let floats = fill_f32(&mut rng, 0.0, 1.0, 64).unwrap();
        assert!(floats.iter().all(|v| (0.0..=1.0).contains(v)));

        assert_eq!(fill_i32(&mut rng, 3, 3, 4).unwrap(), [3, 3, 3, 3]);
        assert!(fill_i32(&mut rng, 4, 3, 1).is_err());
        assert!(fill_f32(&mut rng, 1.0, 0.0, 1).is_err());
    }
}
