/*
 * Boid Module
 *
 * This module defines the Boid struct: the kinematic body shared by every
 * agent kind (fish, predator fish, bird, predator bird). Each kind wraps a
 * Boid and decides which steering forces to feed it; the Boid only knows how
 * to accumulate forces and integrate them.
 *
 * Integration is symplectic Euler: velocity is updated before position.
 */

use nannou::prelude::*;
use rand::Rng;

use crate::vector::{random_unit, VecExt, EPSILON};

#[derive(Debug, Clone, PartialEq)]
pub struct Boid {
    pub position: Point2,
    pub velocity: Vec2,
    pub acceleration: Vec2,
    pub max_speed: f32,
    pub max_force: f32,
    // Speed floor for swimmers, so they never drift motionless
    pub min_speed: Option<f32>,
}

impl Boid {
    pub fn new(position: Point2, velocity: Vec2, max_speed: f32, max_force: f32) -> Self {
        Self {
            position,
            velocity,
            acceleration: Vec2::ZERO,
            max_speed,
            max_force,
            min_speed: None,
        }
    }

    // Random position inside [0, width) x [0, height) with a random heading
    pub fn random<R: Rng + ?Sized>(rng: &mut R, width: f32, height: f32, speed: f32) -> Self {
        let x = rng.gen_range(0.0..width);
        let y = rng.gen_range(0.0..height);
        let velocity = random_unit(rng) * speed;
        Self::new(pt2(x, y), velocity, 4.0, 0.1)
    }

    pub fn with_min_speed(mut self, min_speed: f32) -> Self {
        self.min_speed = Some(min_speed);
        self
    }

    // Apply a force to the boid
    #[inline]
    pub fn apply_force(&mut self, force: Vec2) {
        self.acceleration += force;
    }

    // Overwrite the tunable caps, used by mode switches
    pub fn set_limits(&mut self, max_speed: f32, max_force: f32) {
        self.max_speed = max_speed;
        self.max_force = max_force;
    }

    pub fn speed(&self) -> f32 {
        self.velocity.length()
    }

    // Effective speed floor: the configured minimum, never above `max_speed`.
    pub fn speed_floor(&self) -> Option<f32> {
        self.min_speed.map(|min| min.min(self.max_speed))
    }

    // Integrate the accumulated acceleration:
    // velocity += acceleration, clamp speed, position += velocity, reset acceleration.
    pub fn update<R: Rng + ?Sized>(&mut self, rng: &mut R) {
        self.velocity += self.acceleration;
        self.clamp_speed(rng);
        self.position += self.velocity;
        self.acceleration = Vec2::ZERO;
    }

    // Like `update`, but the summed acceleration is first limited to `max_force`.
    pub fn update_capped<R: Rng + ?Sized>(&mut self, rng: &mut R) {
        self.acceleration = self.acceleration.limit(self.max_force);
        self.update(rng);
    }

    // Rescale the velocity into [floor, max_speed]
    fn clamp_speed<R: Rng + ?Sized>(&mut self, rng: &mut R) {
        let speed = self.velocity.length();

        if speed > self.max_speed {
            self.velocity *= self.max_speed / speed;
            return;
        }

        if let Some(floor) = self.speed_floor() {
            if speed < floor {
                // A stalled swimmer has no heading left to keep
                let heading = if speed < EPSILON {
                    random_unit(rng)
                } else {
                    self.velocity / speed
                };
                self.velocity = heading * floor;
            }
        }
    }
}
