/*
 * Sky Module
 *
 * Frame driver for the murmuration: the bird flock, the single falcon that
 * hunts it, and the spatial grid both of them query.
 *
 * Every tick the grid is rebuilt from the bird positions, the flock centre
 * is taken, each bird is updated in index order (the falcon's current target
 * panics, the rest boil), and then the falcon runs its chase state machine.
 */

use nannou::prelude::*;
use rand::rngs::StdRng;
use rand::SeedableRng;

use crate::bird::{Bird, BirdMode, ChasePhase, Flight, PredatorBird};
use crate::boid::Boid;
use crate::params::{SimulationParams, SkyParams, World};
use crate::physics::{centroid, AgentKind, AgentView, Command, Simulation};
use crate::spatial_grid::SpatialGrid;

pub struct SkySimulation {
    params: SkyParams,
    world: World,
    mode: BirdMode,
    birds: Vec<Bird>,
    predator: PredatorBird,
    grid: SpatialGrid,
    rng: StdRng,
    tick: u64,
}

impl SkySimulation {
    pub fn new(params: &SimulationParams) -> Self {
        let rng = match params.seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_entropy(),
        };
        Self::with_rng(params.world, params.sky.clone(), rng)
    }

    pub fn with_rng(world: World, params: SkyParams, mut rng: StdRng) -> Self {
        let birds = (0..params.bird_count)
            .map(|_| Bird::spawn(&mut rng, &world, &params))
            .collect();
        let predator = PredatorBird::spawn(&mut rng, world.center(), &params.predator);

        log::info!("sky ready: {} birds, falcon at centre", params.bird_count);

        Self {
            grid: SpatialGrid::new(params.cell_size),
            params,
            world,
            mode: BirdMode::Scout,
            birds,
            predator,
            rng,
            tick: 0,
        }
    }

    pub fn mode(&self) -> BirdMode {
        self.mode
    }

    pub fn birds(&self) -> &[Bird] {
        &self.birds
    }

    pub fn predator(&self) -> &PredatorBird {
        &self.predator
    }

    pub fn chase_phase(&self) -> ChasePhase {
        self.predator.chase_phase
    }

    pub fn params(&self) -> &SkyParams {
        &self.params
    }

    pub fn set_mode(&mut self, mode: BirdMode) {
        if mode != self.mode {
            log::info!("sky mode {} -> {}", self.mode.label(), mode.label());
        }
        self.mode = mode;
    }

    // The bird the falcon is hunting right now, if any.
    pub fn targeted(&self) -> Option<usize> {
        match self.mode {
            BirdMode::Hunt => self.predator.target.filter(|&index| index < self.birds.len()),
            BirdMode::Scout => None,
        }
    }

    // Camera zoom the view should ease toward in the current mode.
    pub fn target_zoom(&self) -> f32 {
        match self.mode {
            BirdMode::Hunt => self.params.hunt_zoom,
            BirdMode::Scout => self.params.scout_zoom,
        }
    }

    pub fn flock_center(&self) -> Vec2 {
        centroid(self.birds.iter().map(|b| &b.body)).unwrap_or_else(|| self.world.center())
    }

    fn rebuild_grid(&mut self) {
        self.grid.clear();
        for (index, bird) in self.birds.iter().enumerate() {
            self.grid.insert(index, bird.body.position);
        }
    }
}

impl Simulation for SkySimulation {
    fn step(&mut self) {
        self.rebuild_grid();

        let flock_center = self.flock_center();
        let targeted = self.targeted();
        let flight = Flight {
            params: &self.params,
            world: &self.world,
            flock_center,
            predator_position: self.predator.body.position,
            tick: self.tick,
        };

        for i in 0..self.birds.len() {
            let flocking = {
                let me = &self.birds[i];
                let neighbors: Vec<&Boid> = self
                    .grid
                    .neighbors(me.body.position, 1)
                    .into_iter()
                    .filter(|&j| j != i)
                    .map(|j| &self.birds[j].body)
                    .collect();
                me.flocking(&neighbors, &self.params, self.tick, &mut self.rng)
            };
            self.birds[i].update(flocking, targeted == Some(i), &flight, &mut self.rng);
        }

        self.predator.update(
            self.mode,
            &self.birds,
            &self.grid,
            flock_center,
            &self.params.predator,
            &mut self.rng,
        );

        self.tick += 1;
    }

    fn apply(&mut self, command: Command) -> bool {
        let mode = match command {
            Command::Scout => BirdMode::Scout,
            Command::Hunt => BirdMode::Hunt,
            Command::ToggleHunt => self.mode.toggled(),
            _ => return false,
        };
        self.set_mode(mode);
        true
    }

    fn agents(&self) -> Vec<AgentView> {
        let targeted = self.targeted();
        let birds = self.birds.iter().enumerate().map(|(index, bird)| AgentView {
            is_swooping: bird.is_swooping,
            is_targeted: targeted == Some(index),
            ..AgentView::new(AgentKind::Bird, &bird.body)
        });
        let falcon = AgentView {
            is_swooping: self.predator.is_swooping,
            is_gliding: self.predator.is_gliding,
            ..AgentView::new(AgentKind::PredatorBird, &self.predator.body)
        };
        birds.chain(std::iter::once(falcon)).collect()
    }

    fn world(&self) -> World {
        self.world
    }

    fn tick(&self) -> u64 {
        self.tick
    }

    fn mode_label(&self) -> String {
        self.mode.label().to_string()
    }
}
