/*
 * Ocean Module
 *
 * Frame driver for the fish tank. Owns the school, the predator pack, the
 * spatial grid and the random source, and advances them one tick at a time.
 *
 * A tick:
 * 1. Rebuild the grid from the fish positions
 * 2. Predators: hard contacts, then steering, burst bookkeeping, integration
 * 3. Fish: hard contacts, then steering and integration in index order
 *
 * Predators are spawned lazily at the four gates outside the world corners
 * the first time the school leaves peaceful mode.
 */

use rand::rngs::StdRng;
use rand::SeedableRng;

use crate::boid::Boid;
use crate::fish::{Fish, FishMode, PredatorFish, Surroundings};
use crate::params::{OceanParams, SimulationParams, World};
use crate::physics::{centroid, pair_mut, AgentKind, AgentView, Command, Simulation};
use crate::spatial_grid::SpatialGrid;
use crate::steering;

pub struct OceanSimulation {
    params: OceanParams,
    world: World,
    mode: FishMode,
    fish: Vec<Fish>,
    predators: Vec<PredatorFish>,
    grid: SpatialGrid,
    rng: StdRng,
    tick: u64,
}

impl OceanSimulation {
    pub fn new(params: &SimulationParams) -> Self {
        let rng = match params.seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_entropy(),
        };
        Self::with_rng(params.world, params.ocean.clone(), rng)
    }

    pub fn with_rng(world: World, params: OceanParams, mut rng: StdRng) -> Self {
        let mode = FishMode::Peaceful;
        let tuning = *mode.tuning(&params);

        let fish = (0..params.fish_count)
            .map(|_| {
                let mut fish = Fish::spawn(&mut rng, &world, &params);
                fish.adopt(&tuning);
                fish
            })
            .collect();

        log::info!("ocean ready: {} fish in {}x{}", params.fish_count, world.width, world.height);

        Self {
            grid: SpatialGrid::new(params.cell_size),
            params,
            world,
            mode,
            fish,
            predators: Vec::new(),
            rng,
            tick: 0,
        }
    }

    pub fn mode(&self) -> FishMode {
        self.mode
    }

    pub fn fish(&self) -> &[Fish] {
        &self.fish
    }

    pub fn predators(&self) -> &[PredatorFish] {
        &self.predators
    }

    pub fn grid(&self) -> &SpatialGrid {
        &self.grid
    }

    pub fn params(&self) -> &OceanParams {
        &self.params
    }

    // Switch every fish to `mode` in one go. The first switch out of
    // peaceful mode brings the predators in.
    pub fn set_mode(&mut self, mode: FishMode) {
        if mode != FishMode::Peaceful && self.predators.is_empty() {
            self.spawn_predators();
        }

        let tuning = *mode.tuning(&self.params);
        for fish in &mut self.fish {
            fish.adopt(&tuning);
        }
        for predator in &mut self.predators {
            predator.adopt(mode, &self.params.predator);
        }

        if mode != self.mode {
            log::info!("ocean mode {} -> {}", self.mode.label(), mode.label());
        }
        self.mode = mode;
    }

    // Hard fish contacts can be switched while running
    pub fn set_resolve_overlap(&mut self, enabled: bool) {
        if enabled != self.params.resolve_overlap {
            log::info!("fish hard collisions {}", if enabled { "on" } else { "off" });
        }
        self.params.resolve_overlap = enabled;
    }

    fn spawn_predators(&mut self) {
        let gates = PredatorFish::gates(&self.world, self.params.predator.gate_offset);
        for gate in gates {
            let predator = PredatorFish::spawn(&mut self.rng, gate, &self.params);
            self.predators.push(predator);
        }
        log::info!("{} predators entered the tank", self.predators.len());
    }

    fn rebuild_grid(&mut self) {
        self.grid.clear();
        for (index, fish) in self.fish.iter().enumerate() {
            self.grid.insert(index, fish.body.position);
        }
    }

    fn step_predators(&mut self) {
        let count = self.predators.len();
        if count == 0 {
            return;
        }

        // Hard spacing between predator pairs
        for i in 0..count {
            for j in (i + 1)..count {
                let (a, b) = pair_mut(&mut self.predators, i, j);
                steering::resolve_overlap(
                    &mut a.body,
                    &mut b.body,
                    self.params.predator.hard_radius,
                    self.params.collision_damping,
                    &mut self.rng,
                );
            }
        }

        let school_center = centroid(self.fish.iter().map(|f| &f.body));
        let vision = self.params.predator.vision_cells;

        for i in 0..count {
            let force = {
                let me = &self.predators[i];
                let pack = self
                    .predators
                    .iter()
                    .enumerate()
                    .filter(|&(j, _)| j != i)
                    .map(|(_, p)| &p.body);
                me.steering_force(pack, school_center, self.mode, &self.params, &self.world, &mut self.rng)
            };
            let prey_in_view = !self.grid.neighbors(self.predators[i].body.position, vision).is_empty();

            let predator = &mut self.predators[i];
            predator.body.apply_force(force);
            predator.update(self.mode, prey_in_view, &self.params.predator, &mut self.rng);

            // The den lies off-screen, so peaceful predators roam free
            if self.mode != FishMode::Peaceful {
                steering::bounce_edges(&mut predator.body, &self.world, self.params.edge_margin);
            }
        }
    }

    // Push apart fish that ended up inside each other's hard radius
    fn resolve_fish_contacts(&mut self) {
        let radius = self.params.collision_radius;
        let damping = self.params.collision_damping;

        for i in 0..self.fish.len() {
            for j in self.grid.neighbors(self.fish[i].body.position, 1) {
                if j <= i {
                    continue;
                }
                let (a, b) = pair_mut(&mut self.fish, i, j);
                steering::resolve_overlap(&mut a.body, &mut b.body, radius, damping, &mut self.rng);
            }
        }
    }

    fn step_fish(&mut self) {
        if self.params.resolve_overlap {
            self.resolve_fish_contacts();
        }

        let around = Surroundings {
            mode: self.mode,
            params: &self.params,
            world: &self.world,
            predators: &self.predators,
        };

        for i in 0..self.fish.len() {
            let force = {
                let me = &self.fish[i];
                let neighbors: Vec<&Boid> = self
                    .grid
                    .neighbors(me.body.position, 1)
                    .into_iter()
                    .filter(|&j| j != i)
                    .map(|j| &self.fish[j].body)
                    .collect();
                me.steering_force(&neighbors, &around, &mut self.rng)
            };

            let fish = &mut self.fish[i];
            fish.body.apply_force(force);
            fish.integrate(&self.world, &self.params, &mut self.rng);
        }
    }
}

impl Simulation for OceanSimulation {
    fn step(&mut self) {
        self.rebuild_grid();
        self.step_predators();
        self.step_fish();
        self.tick += 1;
    }

    fn apply(&mut self, command: Command) -> bool {
        let mode = match command {
            Command::Peaceful => FishMode::Peaceful,
            Command::Hunted => FishMode::Hunted,
            Command::Vortex => FishMode::Vortex,
            _ => return false,
        };
        self.set_mode(mode);
        true
    }

    fn agents(&self) -> Vec<AgentView> {
        let fish = self.fish.iter().map(|f| AgentView::new(AgentKind::Fish, &f.body));
        let predators = self.predators.iter().map(|p| AgentView {
            is_bursting: p.is_bursting,
            ..AgentView::new(AgentKind::PredatorFish, &p.body)
        });
        fish.chain(predators).collect()
    }

    fn world(&self) -> World {
        self.world
    }

    fn tick(&self) -> u64 {
        self.tick
    }

    fn mode_label(&self) -> String {
        format!("{} ({})", self.mode.label(), self.mode.number())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use nannou::prelude::*;

    fn small_ocean(fish_count: usize) -> OceanSimulation {
        let params = OceanParams {
            fish_count,
            ..OceanParams::default()
        };
        OceanSimulation::with_rng(World::default(), params, StdRng::seed_from_u64(11))
    }

    #[test]
    fn starts_peaceful_without_predators() {
        let ocean = small_ocean(50);
        assert_eq!(ocean.mode(), FishMode::Peaceful);
        assert!(ocean.predators().is_empty());
        assert!(ocean.fish().iter().all(|f| f.body.max_speed == 0.8 && f.body.max_force == 0.03));
    }

    #[test]
    fn foreign_commands_are_ignored() {
        let mut ocean = small_ocean(10);
        assert!(!ocean.apply(Command::Hunt));
        assert!(!ocean.apply(Command::ToggleHunt));
        assert_eq!(ocean.mode(), FishMode::Peaceful);
        assert!(ocean.apply(Command::Vortex));
        assert_eq!(ocean.mode(), FishMode::Vortex);
    }

    #[test]
    fn grid_matches_fish_after_step() {
        let mut ocean = small_ocean(80);
        ocean.step();
        assert_eq!(ocean.grid().len(), 80);
        assert_eq!(ocean.tick(), 1);
    }

    #[test]
    fn agent_views_cover_every_agent() {
        let mut ocean = small_ocean(30);
        ocean.apply(Command::Hunted);
        let views = ocean.agents();
        assert_eq!(views.len(), 34);
        assert_eq!(views.iter().filter(|v| v.kind == AgentKind::PredatorFish).count(), 4);
    }

    #[test]
    fn calming_down_mid_burst_reins_in_every_predator() {
        let mut ocean = small_ocean(60);
        ocean.apply(Command::Hunted);
        ocean.step();

        let burst_speed = ocean.params.predator.burst_speed;
        let bursting = &mut ocean.predators[2];
        bursting.is_bursting = true;
        bursting.burst_timer = 40;
        bursting.body.max_speed = burst_speed;
        bursting.body.velocity = bursting.body.velocity.normalize_or_zero() * burst_speed;

        ocean.apply(Command::Peaceful);
        let peaceful_speed = ocean.params.predator.peaceful_speed;
        assert!(ocean.predators().iter().all(|p| !p.is_bursting && p.body.max_speed == peaceful_speed));

        ocean.step();
        for predator in ocean.predators() {
            assert!(predator.body.speed() <= peaceful_speed + 1e-4);
        }
    }

    fn pair_distance_after_a_tick(resolve_overlap: bool) -> f32 {
        let mut ocean = small_ocean(2);
        ocean.set_resolve_overlap(resolve_overlap);
        ocean.fish[0].body.position = pt2(600.0, 600.0);
        ocean.fish[1].body.position = pt2(605.0, 600.0);
        for fish in &mut ocean.fish {
            fish.body.velocity = Vec2::ZERO;
        }
        ocean.step();
        ocean.fish[0].body.position.distance(ocean.fish[1].body.position)
    }

    #[test]
    fn collision_toggle_applies_to_a_running_ocean() {
        let mut ocean = small_ocean(10);
        ocean.step();
        ocean.set_resolve_overlap(false);
        assert!(!ocean.params().resolve_overlap);
        ocean.step();
        ocean.set_resolve_overlap(true);
        assert!(ocean.params().resolve_overlap);

        // Each fish moves at most 0.8 per tick in peaceful mode
        assert!(pair_distance_after_a_tick(true) > 10.0);
        assert!(pair_distance_after_a_tick(false) < 7.0);
    }

    #[test]
    fn mode_label_names_the_mode() {
        let mut ocean = small_ocean(5);
        ocean.apply(Command::Hunted);
        assert_eq!(ocean.mode_label(), "hunted (2)");
    }
}
