/*
 * Shoals - Module Definitions
 *
 * This file defines the module structure of the flocking simulation.
 * The simulation core (vector, spatial_grid, boid, steering, fish, bird,
 * ocean, sky, physics, params) has no dependency on the window; the
 * front-end modules (app, camera, input, renderer, ui, debug) drive it.
 */

// Re-export key components for easier access
pub use app::Model;
pub use bird::{Bird, BirdMode, ChasePhase, PredatorBird};
pub use boid::Boid;
pub use camera::Camera;
pub use debug::DebugInfo;
pub use error::ConfigError;
pub use fish::{Fish, FishMode, PredatorFish};
pub use ocean::OceanSimulation;
pub use params::{SimulationParams, World};
pub use physics::{AgentKind, AgentView, Command, Simulation};
pub use sky::SkySimulation;
pub use spatial_grid::SpatialGrid;

// Define modules
pub mod app;
pub mod bird;
pub mod boid;
pub mod camera;
pub mod debug;
pub mod error;
pub mod fish;
pub mod input;
pub mod ocean;
pub mod params;
pub mod physics;
pub mod renderer;
pub mod sky;
pub mod spatial_grid;
pub mod steering;
pub mod ui;
pub mod vector;

// Constants
pub const AGENT_SIZE: f32 = 6.0;
