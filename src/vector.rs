/*
 * Vector Module
 *
 * Small helpers on top of nannou's Vec2 that the steering code leans on:
 * force limiting, rescaling, reflection and the random jitter used whenever
 * a vector is too short to have a meaningful direction.
 */

use nannou::prelude::*;
use rand::Rng;

// Distances below this are treated as coincident points
pub const EPSILON: f32 = 0.001;

// Squared magnitude under which an averaged steering vector has no usable direction
pub const DEGENERATE_LENGTH_SQ: f32 = 0.0001;

pub trait VecExt {
    // Clamp the magnitude to `max`, keeping the direction.
    fn limit(self, max: f32) -> Vec2;

    // Rescale to exactly `length`. Degenerate vectors come back as zero.
    fn with_length(self, length: f32) -> Vec2;

    // Reflect about a unit `normal`.
    fn reflect(self, normal: Vec2) -> Vec2;

    // Counter-clockwise perpendicular.
    fn tangent(self) -> Vec2;

    fn is_degenerate(self) -> bool;
}

impl VecExt for Vec2 {
    #[inline]
    fn limit(self, max: f32) -> Vec2 {
        let length_squared = self.length_squared();
        if length_squared > max * max && length_squared > 0.0 {
            self * (max / length_squared.sqrt())
        } else {
            self
        }
    }

    #[inline]
    fn with_length(self, length: f32) -> Vec2 {
        let current = self.length();
        if current < EPSILON {
            return Vec2::ZERO;
        }
        self * (length / current)
    }

    #[inline]
    fn reflect(self, normal: Vec2) -> Vec2 {
        self - normal * (2.0 * self.dot(normal))
    }

    #[inline]
    fn tangent(self) -> Vec2 {
        vec2(-self.y, self.x)
    }

    #[inline]
    fn is_degenerate(self) -> bool {
        self.length_squared() < EPSILON * EPSILON
    }
}

// Random unit vector
pub fn random_unit<R: Rng + ?Sized>(rng: &mut R) -> Vec2 {
    let angle = rng.gen_range(0.0..std::f32::consts::TAU);
    vec2(angle.cos(), angle.sin())
}

// Small random perturbation substituted for vectors that cannot be normalized.
// The result is never zero: its length lies in `[magnitude / 2, magnitude]`.
pub fn jitter<R: Rng + ?Sized>(rng: &mut R, magnitude: f32) -> Vec2 {
    let length = rng.gen_range(0.5_f32..=1.0) * magnitude;
    random_unit(rng) * length
}

// Unit vector along `v`, or a random unit vector when `v` has no direction.
pub fn direction_or_random<R: Rng + ?Sized>(v: Vec2, rng: &mut R) -> Vec2 {
    if v.is_degenerate() {
        random_unit(rng)
    } else {
        v.normalize()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    #[test]
    fn limit_keeps_direction() {
        let v = vec2(30.0, 40.0).limit(5.0);
        assert!((v.length() - 5.0).abs() < 1e-4);
        assert!((v.x - 3.0).abs() < 1e-4 && (v.y - 4.0).abs() < 1e-4);

        let short = vec2(0.1, 0.0).limit(5.0);
        assert_eq!(short, vec2(0.1, 0.0));
    }

    #[test]
    fn with_length_of_zero_vector_is_zero() {
        assert_eq!(Vec2::ZERO.with_length(3.0), Vec2::ZERO);
        let v = vec2(0.0, -2.0).with_length(7.0);
        assert!((v.y + 7.0).abs() < 1e-4);
    }

    #[test]
    fn reflect_flips_normal_component() {
        let v = vec2(2.0, -3.0).reflect(vec2(0.0, 1.0));
        assert_eq!(v, vec2(2.0, 3.0));
    }

    #[test]
    fn jitter_is_small_and_never_zero() {
        let mut rng = StdRng::seed_from_u64(7);
        for _ in 0..1000 {
            let j = jitter(&mut rng, 0.1);
            assert!(j.length() >= 0.05 - 1e-6);
            assert!(j.length() <= 0.1 + 1e-6);
        }
    }
}
