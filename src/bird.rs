/*
 * Bird Module
 *
 * Agent policies for the sky: a "boiling" murmuration of birds and the
 * falcon that patrols and hunts them.
 *
 * Birds swirl under a time-varying field on top of their flocking forces.
 * The bird the falcon has locked onto panics: it zig-zags, flees, and is
 * tethered back toward the flock so it never escapes the frame.
 *
 * The falcon runs a three-phase chase state machine:
 *
 *   ORBIT --(target in range)--> INTERCEPT --(distance < capture)--> TETHERED
 *   INTERCEPT, TETHERED --(hunt timer expires, target gone, scout mode)--> ORBIT
 */

use nannou::prelude::*;
use rand::Rng;

use crate::boid::Boid;
use crate::params::{PredatorBirdParams, SkyParams, World};
use crate::spatial_grid::SpatialGrid;
use crate::steering;
use crate::vector::{direction_or_random, jitter, random_unit, VecExt, EPSILON};

// Milliseconds per tick at the 60 Hz frame rate the swirl field was tuned for
pub const TICK_MS: f32 = 1000.0 / 60.0;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum BirdMode {
    Scout,
    Hunt,
}

impl BirdMode {
    pub fn toggled(self) -> Self {
        match self {
            BirdMode::Scout => BirdMode::Hunt,
            BirdMode::Hunt => BirdMode::Scout,
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            BirdMode::Scout => "scout",
            BirdMode::Hunt => "hunt",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ChasePhase {
    Orbit,
    Intercept,
    Tethered,
}

// Per-tick surroundings shared by every bird.
#[derive(Debug, Clone, Copy)]
pub struct Flight<'a> {
    pub params: &'a SkyParams,
    pub world: &'a World,
    pub flock_center: Vec2,
    pub predator_position: Vec2,
    pub tick: u64,
}

// Result of the neighbor pass: a steering force and a positional nudge
// out of hard-radius contact.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Flocking {
    pub force: Vec2,
    pub nudge: Vec2,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Bird {
    pub body: Boid,
    pub panic_timer: u32,
    pub panic_dir: Vec2,
    pub is_swooping: bool,
}

impl Bird {
    pub fn new(body: Boid) -> Self {
        Self {
            body,
            panic_timer: 0,
            panic_dir: Vec2::ZERO,
            is_swooping: false,
        }
    }

    pub fn spawn<R: Rng + ?Sized>(rng: &mut R, world: &World, params: &SkyParams) -> Self {
        let x = rng.gen_range(0.0..world.width);
        let y = rng.gen_range(0.0..world.height);
        let spread = params.initial_speed;
        let velocity = vec2(rng.gen_range(-spread..spread), rng.gen_range(-spread..spread));
        Self::new(Boid::new(pt2(x, y), velocity, params.calm_speed, params.calm_force))
    }

    // Separation, alignment, cohesion and the swirl field over the birds in
    // this bird's grid window. The interaction radius is the grid cell size.
    pub fn flocking<R: Rng + ?Sized>(
        &self,
        neighbors: &[&Boid],
        params: &SkyParams,
        tick: u64,
        rng: &mut R,
    ) -> Flocking {
        let me = &self.body;
        let radius = params.cell_size;
        let radius_squared = radius * radius;

        let mut separation = Vec2::ZERO;
        let mut alignment = Vec2::ZERO;
        let mut cohesion = Vec2::ZERO;
        let mut nudge = Vec2::ZERO;
        let mut count = 0;

        for other in neighbors {
            let diff = me.position - other.position;
            let d_squared = diff.length_squared();

            // Stacked on top of each other: full push in a random direction
            if d_squared < EPSILON * EPSILON {
                nudge += jitter(rng, params.hard_radius * params.nudge);
                continue;
            }

            if d_squared < radius_squared {
                let d = d_squared.sqrt();
                let away = diff / d;

                // Hard collision
                if d < params.hard_radius {
                    nudge += away * (params.hard_radius - d) * params.nudge;
                }

                // Older contributions decay as neighbors accumulate
                separation = (separation + away * (radius - d)) / params.separation_decay;
                alignment += other.velocity;
                cohesion += other.position;
                count += 1;
            }
        }

        if count == 0 {
            return Flocking { force: Vec2::ZERO, nudge };
        }

        let alignment = if alignment.is_degenerate() {
            Vec2::ZERO
        } else {
            alignment.normalize() * params.alignment_strength
        };

        let to_center = cohesion / count as f32 - me.position;
        let cohesion = if to_center.is_degenerate() {
            Vec2::ZERO
        } else {
            to_center.normalize() * params.cohesion_strength
        };

        // Boiling: a rotating field whose strength pulses across the flock
        let t = tick as f32 * TICK_MS * 0.002;
        let pulse = (t * 0.5 + me.position.x * 0.01).sin() * 3.0;
        let swirl = vec2(t.cos(), t.sin()) * (2.0 + pulse) * params.swirl_strength;

        Flocking {
            force: separation * params.separation_weight + alignment + cohesion + swirl,
            nudge,
        }
    }

    pub fn update<R: Rng + ?Sized>(&mut self, flocking: Flocking, targeted: bool, flight: &Flight, rng: &mut R) {
        let params = flight.params;
        self.body.position += flocking.nudge;
        self.body.apply_force(flocking.force);

        let away_from_predator = self.body.position - flight.predator_position;

        if targeted {
            self.body.set_limits(params.panic_speed, params.panic_force);

            let from_center = self.body.position - flight.flock_center;
            let exit_flock = if from_center.is_degenerate() {
                Vec2::ZERO
            } else {
                from_center.normalize() * rng.gen_range(params.exit_flock.clone())
            };
            let startle = away_from_predator.with_length(params.startle_flee);
            self.body.apply_force(startle + self.panic_dir + exit_flock);

            // Haywire zig-zags
            self.panic_timer = self.panic_timer.saturating_sub(1);
            if self.panic_timer == 0 {
                self.panic_dir = random_unit(rng) * params.panic_strength;
                self.panic_timer = rng.gen_range(params.panic_interval.clone());
            }

            let flee = away_from_predator.with_length(params.flee_strength);

            // Safe zone tether back toward the flock
            let to_flock = flight.flock_center - self.body.position;
            let distance = to_flock.length();
            let pull_back = if distance > params.safe_zone_radius {
                to_flock.with_length((distance - params.safe_zone_radius) * params.safe_zone_gain)
            } else {
                Vec2::ZERO
            };

            self.body.apply_force(flee + self.panic_dir + pull_back);
        } else {
            let scatter_radius = params.scatter_radius;
            if away_from_predator.length_squared() < scatter_radius * scatter_radius {
                let scatter = direction_or_random(away_from_predator, rng) * params.scatter_strength;
                self.body.apply_force(scatter);
            }

            self.body.set_limits(params.calm_speed, params.calm_force);

            // Tether to world center
            let to_world_center = flight.world.center() - self.body.position;
            let tether = params.world_tether_radius;
            if to_world_center.length_squared() > tether * tether {
                self.body.apply_force(to_world_center.with_length(params.world_tether_strength));
            }
        }

        self.body.update_capped(rng);

        // Drives the flapping animation
        self.is_swooping = targeted && self.body.speed() > params.swoop_speed;
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct PredatorBird {
    pub body: Boid,
    pub mass: f32,
    // Index into the bird collection, re-validated every tick
    pub target: Option<usize>,
    pub chase_phase: ChasePhase,
    pub hunt_timer: u32,
    pub patrol_angle: f32,
    pub patrol_target: Vec2,
    pub is_swooping: bool,
    pub is_gliding: bool,
    pub glide_timer: u32,
}

impl PredatorBird {
    pub fn spawn<R: Rng + ?Sized>(rng: &mut R, position: Point2, params: &PredatorBirdParams) -> Self {
        let cardinals = [vec2(1.0, 0.0), vec2(-1.0, 0.0), vec2(0.0, 1.0), vec2(0.0, -1.0)];
        let heading = cardinals[rng.gen_range(0..cardinals.len())];
        let body = Boid::new(position, heading * params.launch_speed, params.orbit_speed, params.orbit_force);

        Self {
            body,
            mass: params.mass,
            target: None,
            chase_phase: ChasePhase::Orbit,
            hunt_timer: 0,
            patrol_angle: rng.gen_range(0.0..std::f32::consts::TAU),
            patrol_target: position,
            is_swooping: false,
            is_gliding: false,
            glide_timer: params.initial_glide,
        }
    }

    // Heavy body: forces are scaled down by mass
    pub fn apply_force(&mut self, force: Vec2) {
        self.body.apply_force(force / self.mass);
    }

    // Drop the current pursuit and go back to patrolling
    pub fn release(&mut self) {
        if self.chase_phase != ChasePhase::Orbit {
            log::debug!("falcon leaves {:?}, back to orbit", self.chase_phase);
        }
        self.target = None;
        self.hunt_timer = 0;
        self.chase_phase = ChasePhase::Orbit;
    }

    pub fn update<R: Rng + ?Sized>(
        &mut self,
        mode: BirdMode,
        birds: &[Bird],
        grid: &SpatialGrid,
        flock_center: Vec2,
        params: &PredatorBirdParams,
        rng: &mut R,
    ) {
        // 1. Re-validate the remembered target
        if matches!(self.target, Some(index) if index >= birds.len()) {
            self.release();
        }

        // 2. Target acquisition
        match mode {
            BirdMode::Hunt => {
                if self.target.is_none() {
                    let position = self.body.position;
                    self.target = grid
                        .neighbors(position, params.vision_cells)
                        .into_iter()
                        .filter(|&index| index < birds.len())
                        .min_by(|&a, &b| {
                            let da = birds[a].body.position.distance_squared(position);
                            let db = birds[b].body.position.distance_squared(position);
                            da.total_cmp(&db)
                        });
                }

                if let Some(index) = self.target {
                    let distance_squared = birds[index].body.position.distance_squared(self.body.position);
                    let engage = params.engage_radius;
                    if distance_squared < engage * engage && self.chase_phase == ChasePhase::Orbit {
                        self.chase_phase = ChasePhase::Intercept;
                        self.hunt_timer = rng.gen_range(params.hunt_duration.clone());
                        log::debug!("falcon intercepts bird {} for {} ticks", index, self.hunt_timer);
                    }
                }
            }
            BirdMode::Scout => self.release(),
        }

        // 3. Behavior
        let pursuit = match self.target {
            Some(index) if mode == BirdMode::Hunt && self.chase_phase != ChasePhase::Orbit => Some(index),
            _ => None,
        };

        if let Some(index) = pursuit {
            let target = &birds[index].body;
            self.hunt_timer = self.hunt_timer.saturating_sub(1);
            self.is_swooping = true;

            match self.chase_phase {
                ChasePhase::Intercept => {
                    self.body.set_limits(params.intercept_speed, params.intercept_force);
                    let force = steering::intercept(&self.body, target, params.lead, params.gain, rng);
                    self.apply_force(force);

                    if self.body.position.distance(target.position) < params.capture_distance {
                        self.chase_phase = ChasePhase::Tethered;
                        log::debug!("falcon latched onto bird {}", index);
                    }
                }
                ChasePhase::Tethered => {
                    // Latched: ride behind the target at a fixed offset
                    let heading = if target.velocity.is_degenerate() {
                        vec2(1.0, 0.0)
                    } else {
                        target.velocity.normalize()
                    };
                    self.body.position = target.position - heading * params.tether_offset;
                    self.body.velocity = target.velocity;
                }
                ChasePhase::Orbit => {}
            }

            if self.hunt_timer == 0 {
                self.release();
            }
        } else {
            // Orbiting patrol
            self.is_swooping = false;
            self.chase_phase = ChasePhase::Orbit;
            self.body.set_limits(params.orbit_speed, params.orbit_force);
            self.patrol_angle += params.patrol_step;
            let offset = vec2(self.patrol_angle.cos(), self.patrol_angle.sin()) * params.patrol_radius;
            self.patrol_target = flock_center + offset;

            // Soft arrive toward the patrol point
            let steer = steering::seek(&self.body, self.patrol_target) * params.patrol_gain;
            self.apply_force(steer);
        }

        // 4. Physics integration, skipped while latched
        if self.chase_phase != ChasePhase::Tethered {
            self.body.update_capped(rng);
        }
        self.body.acceleration = Vec2::ZERO;

        // 5. Glide timer
        if !self.is_swooping {
            self.glide_timer = self.glide_timer.saturating_sub(1);
            if self.glide_timer == 0 {
                self.is_gliding = !self.is_gliding;
                self.glide_timer = rng.gen_range(params.glide_interval.clone());
            }
        } else {
            self.is_gliding = false;
        }
    }
}
