/*
 * Fish Module
 *
 * Agent policies for the ocean: schooling fish and the predator fish that
 * hunt them. Both wrap a Boid body and compose steering library calls; the
 * weights and caps depend on the current FishMode.
 *
 * Fish:
 * - Peaceful: slow, loose schooling
 * - Hunted: tight schooling plus flight from nearby predators
 * - Vortex: the whole school swirls around the world centre
 *
 * Predator fish patrol the school by distance band and occasionally burst
 * at full speed when prey is inside their wider grid window.
 */

use nannou::prelude::*;
use rand::Rng;

use crate::boid::Boid;
use crate::params::{ModeTuning, OceanParams, PredatorFishParams, World};
use crate::steering;
use crate::vector::VecExt;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FishMode {
    Peaceful = 1,
    Hunted = 2,
    Vortex = 3,
}

impl FishMode {
    pub fn tuning<'a>(&self, params: &'a OceanParams) -> &'a ModeTuning {
        match self {
            FishMode::Peaceful => &params.peaceful,
            FishMode::Hunted => &params.hunted,
            FishMode::Vortex => &params.vortex,
        }
    }

    pub fn number(&self) -> u8 {
        *self as u8
    }

    pub fn label(&self) -> &'static str {
        match self {
            FishMode::Peaceful => "peaceful",
            FishMode::Hunted => "hunted",
            FishMode::Vortex => "vortex",
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Fish {
    pub body: Boid,
}

// Everything a fish reacts to besides its school neighbors.
pub struct Surroundings<'a> {
    pub mode: FishMode,
    pub params: &'a OceanParams,
    pub world: &'a World,
    pub predators: &'a [PredatorFish],
}

impl Fish {
    pub fn new(body: Boid) -> Self {
        Self { body }
    }

    pub fn spawn<R: Rng + ?Sized>(rng: &mut R, world: &World, params: &OceanParams) -> Self {
        let body = Boid::random(rng, world.width, world.height, 1.0).with_min_speed(params.min_speed);
        Self::new(body)
    }

    // Take on a mode's caps immediately, no blending
    pub fn adopt(&mut self, tuning: &ModeTuning) {
        self.body.set_limits(tuning.max_speed, tuning.max_force);
    }

    // Weighted steering for one tick. `neighbors` are the school members in
    // this fish's grid window, itself excluded.
    pub fn steering_force<R: Rng + ?Sized>(&self, neighbors: &[&Boid], around: &Surroundings, rng: &mut R) -> Vec2 {
        let params = around.params;
        let tuning = around.mode.tuning(params);
        let me = &self.body;

        let drive = match around.mode {
            FishMode::Peaceful => Vec2::ZERO,
            FishMode::Hunted => around
                .predators
                .iter()
                .map(|p| steering::flee(me, p.body.position, params.flee_radius, params.flee_boost, rng))
                .fold(Vec2::ZERO, |sum, f| sum + f),
            FishMode::Vortex => steering::vortex(
                me,
                around.world.center(),
                me.max_speed * params.vortex_swirl,
                params.vortex_pull,
            ),
        };

        let separation = steering::separation(me, neighbors.iter().copied(), params.separation_radius, rng);
        let cohesion = steering::cohesion(me, neighbors.iter().copied(), params.cohesion_radius);
        let alignment = steering::alignment(
            me,
            neighbors.iter().copied(),
            params.alignment_radius * params.alignment_radius,
        );

        drive * params.drive_weight
            + separation * tuning.separation_weight
            + cohesion * tuning.cohesion_weight
            + alignment * tuning.alignment_weight
    }

    // Integrate, then keep inside the tank
    pub fn integrate<R: Rng + ?Sized>(&mut self, world: &World, params: &OceanParams, rng: &mut R) {
        self.body.update_capped(rng);
        steering::bounce_edges(&mut self.body, world, params.edge_margin);
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct PredatorFish {
    pub body: Boid,
    pub is_bursting: bool,
    pub burst_timer: u32,
    pub next_burst_time: u32,
}

impl PredatorFish {
    pub fn spawn<R: Rng + ?Sized>(rng: &mut R, position: Point2, ocean: &OceanParams) -> Self {
        let params = &ocean.predator;
        let velocity = vec2(rng.gen_range(-1.0..1.0), rng.gen_range(-1.0..1.0));
        let body = Boid::new(position, velocity, params.cruise_speed, params.max_force).with_min_speed(ocean.min_speed);
        Self {
            body,
            is_bursting: false,
            burst_timer: 0,
            next_burst_time: rng.gen_range(params.first_burst.clone()),
        }
    }

    // Spawn points just beyond the four world corners.
    pub fn gates(world: &World, offset: f32) -> [Point2; 4] {
        [
            pt2(-offset, -offset),
            pt2(world.width + offset, -offset),
            pt2(-offset, world.height + offset),
            pt2(world.width + offset, world.height + offset),
        ]
    }

    pub fn steering_force<'a, I, R>(
        &self,
        pack: I,
        school_center: Option<Vec2>,
        mode: FishMode,
        ocean: &OceanParams,
        world: &World,
        rng: &mut R,
    ) -> Vec2
    where
        I: IntoIterator<Item = &'a Boid>,
        R: Rng + ?Sized,
    {
        let params = &ocean.predator;
        let me = &self.body;

        let spacing = steering::predator_separation(me, pack, params.soft_radius, params.soft_force);
        let mut force = spacing * params.separation_weight;

        match mode {
            FishMode::Peaceful => {
                // Retreat to the den off-screen
                force += steering::seek(me, vec2(params.den.0, params.den.1));
            }
            FishMode::Hunted => {
                if let Some(center) = school_center {
                    force += steering::hunt(me, center, params.hunt_near, params.hunt_far, rng);
                }
                force += steering::avoid_walls(me, world, params.wall_margin, params.wall_strength);
            }
            FishMode::Vortex => {
                force += steering::orbit(
                    me,
                    world.center(),
                    params.orbit_tangential,
                    params.orbit_ring,
                    params.orbit_gain,
                );
                force += steering::avoid_walls(me, world, params.wall_margin, params.wall_strength);
            }
        }

        force
    }

    // Take on a mode's caps. Bursts only belong to the hunt, so any other
    // mode cuts a running one short.
    pub fn adopt(&mut self, mode: FishMode, params: &PredatorFishParams) {
        if mode != FishMode::Hunted && self.is_bursting {
            self.is_bursting = false;
            self.burst_timer = 0;
        }

        if self.is_bursting {
            return;
        }

        match mode {
            FishMode::Vortex => self.body.set_limits(params.vortex_speed, params.vortex_force),
            FishMode::Peaceful => self.body.set_limits(params.peaceful_speed, params.max_force),
            FishMode::Hunted => self.body.set_limits(params.cruise_speed, params.max_force),
        }
    }

    // Burst bookkeeping and integration. `prey_in_view` is whether the
    // predator's grid window holds any fish this tick.
    pub fn update<R: Rng + ?Sized>(&mut self, mode: FishMode, prey_in_view: bool, params: &PredatorFishParams, rng: &mut R) {
        self.next_burst_time = self.next_burst_time.saturating_sub(1);

        // Re-clamp speed for the current mode
        self.adopt(mode, params);

        if !self.is_bursting && mode == FishMode::Hunted && self.next_burst_time == 0 && prey_in_view {
            self.is_bursting = true;
            self.burst_timer = params.burst_duration;
            self.body.max_speed = params.burst_speed;
            self.body.velocity = self.body.velocity.with_length(params.burst_speed);
            log::debug!("predator burst at ({:.0}, {:.0})", self.body.position.x, self.body.position.y);
        }

        if self.is_bursting {
            self.burst_timer = self.burst_timer.saturating_sub(1);
            if self.burst_timer == 0 {
                self.is_bursting = false;
                self.next_burst_time = rng.gen_range(params.burst_cooldown.clone());
            }
        }

        self.body.update(rng);
    }
}
