//! Scalar interpolation, easing and randomization helpers
//!
//! Pure functions only. Anything random takes the caller's RNG so the
//! simulation stays reproducible from its seed.

use rand::Rng;
use rand::distr::Distribution;
use rand::distr::weighted::WeightedIndex;

/// Linear interpolation between `a` and `b`
#[inline]
pub fn lerp(a: f32, b: f32, t: f32) -> f32 {
    a + (b - a) * t
}

/// Inverse of [`lerp`]: where `value` sits between `a` and `b` (unclamped)
#[inline]
pub fn inverse_lerp(a: f32, b: f32, value: f32) -> f32 {
    if (b - a).abs() < f32::EPSILON {
        0.0
    } else {
        (value - a) / (b - a)
    }
}

/// Clamp to [0, 1]
#[inline]
pub fn clamp01(t: f32) -> f32 {
    t.clamp(0.0, 1.0)
}

/// Cubic ease-in-out, input clamped to [0, 1]
pub fn ease_in_out_cubic(t: f32) -> f32 {
    let t = clamp01(t);
    if t < 0.5 {
        4.0 * t * t * t
    } else {
        let f = -2.0 * t + 2.0;
        1.0 - f * f * f / 2.0
    }
}

/// Quadratic ease-out, input clamped to [0, 1]
pub fn ease_out_quad(t: f32) -> f32 {
    let t = clamp01(t);
    1.0 - (1.0 - t) * (1.0 - t)
}

/// Hermite smoothstep between two edges
pub fn smoothstep(edge0: f32, edge1: f32, x: f32) -> f32 {
    let t = clamp01(inverse_lerp(edge0, edge1, x));
    t * t * (3.0 - 2.0 * t)
}

/// Uniform sample in `[min, max]`; a degenerate or inverted range yields `min`
pub fn random_between<R: Rng + ?Sized>(rng: &mut R, min: f32, max: f32) -> f32 {
    if max > min {
        rng.random_range(min..=max)
    } else {
        min
    }
}

/// Either -1.0 or 1.0 with equal probability
pub fn random_sign<R: Rng + ?Sized>(rng: &mut R) -> f32 {
    if rng.random_bool(0.5) { 1.0 } else { -1.0 }
}

/// Pick an index with probability proportional to its weight.
///
/// Returns `None` when the weights are empty or all zero.
pub fn weighted_index<R: Rng + ?Sized>(rng: &mut R, weights: &[u32]) -> Option<usize> {
    WeightedIndex::new(weights)
        .ok()
        .map(|dist| dist.sample(rng))
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;
    use rand_pcg::Pcg32;

    #[test]
    fn test_lerp_endpoints() {
        assert_eq!(lerp(2.0, 6.0, 0.0), 2.0);
        assert_eq!(lerp(2.0, 6.0, 1.0), 6.0);
        assert_eq!(lerp(2.0, 6.0, 0.5), 4.0);
        assert_eq!(inverse_lerp(2.0, 6.0, 4.0), 0.5);
        assert_eq!(inverse_lerp(3.0, 3.0, 10.0), 0.0);
    }

    #[test]
    fn test_easing_is_monotonic_and_pinned() {
        assert_eq!(ease_in_out_cubic(0.0), 0.0);
        assert_eq!(ease_in_out_cubic(1.0), 1.0);
        assert!((ease_in_out_cubic(0.5) - 0.5).abs() < 1e-6);
        assert_eq!(ease_out_quad(2.0), 1.0);

        let mut prev = 0.0;
        for i in 1..=20 {
            let v = ease_in_out_cubic(i as f32 / 20.0);
            assert!(v >= prev);
            prev = v;
        }
        assert!((smoothstep(0.0, 1.0, 0.5) - 0.5).abs() < 1e-6);
    }

    #[test]
    fn test_random_between_degenerate_range() {
        let mut rng = Pcg32::seed_from_u64(7);
        assert_eq!(random_between(&mut rng, 3.0, 3.0), 3.0);
        assert_eq!(random_between(&mut rng, 5.0, 1.0), 5.0);
        for _ in 0..100 {
            let v = random_between(&mut rng, -1.0, 1.0);
            assert!((-1.0..=1.0).contains(&v));
        }
    }

    #[test]
    fn test_weighted_index_respects_zero_weights() {
        let mut rng = Pcg32::seed_from_u64(42);
        for _ in 0..200 {
            assert_eq!(weighted_index(&mut rng, &[0, 5, 0]), Some(1));
        }
        assert_eq!(weighted_index(&mut rng, &[0, 0]), None);
        assert_eq!(weighted_index(&mut rng, &[]), None);
    }

    #[test]
    fn test_weighted_index_prefers_heavier_weight() {
        let mut rng = Pcg32::seed_from_u64(1);
        let mut counts = [0u32; 2];
        for _ in 0..4000 {
            if let Some(i) = weighted_index(&mut rng, &[1, 3]) {
                counts[i] += 1;
            }
        }
        assert!(counts[1] > counts[0] * 2);
    }
}
