/*
 * Simulation Parameters Module
 *
 * This module defines the SimulationParams struct that holds every tunable of
 * both simulation contexts: world size, population sizes, grid cell sizes,
 * per-mode speed/force caps and steering weights, and predator tuning.
 *
 * Parameters can be loaded from (and saved to) a JSON file. Any field missing
 * from the file keeps its default. Values are validated before use.
 */

use std::fs;
use std::ops::RangeInclusive;
use std::path::Path;

use nannou::prelude::*;
use serde::{Deserialize, Serialize};

use crate::error::ConfigError;

// Bounded world, origin at the top-left corner, y pointing down
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct World {
    pub width: f32,
    pub height: f32,
}

impl World {
    pub fn center(&self) -> Vec2 {
        vec2(self.width / 2.0, self.height / 2.0)
    }

    pub fn contains(&self, position: Vec2) -> bool {
        position.x >= 0.0 && position.x <= self.width && position.y >= 0.0 && position.y <= self.height
    }
}

impl Default for World {
    fn default() -> Self {
        Self { width: 1920.0, height: 1200.0 }
    }
}

// Speed/force caps and flocking weights applied to every fish in one mode.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ModeTuning {
    pub max_speed: f32,
    pub max_force: f32,
    pub separation_weight: f32,
    pub cohesion_weight: f32,
    pub alignment_weight: f32,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PredatorFishParams {
    pub max_force: f32,
    pub cruise_speed: f32,
    pub peaceful_speed: f32,
    pub burst_speed: f32,
    pub burst_duration: u32,
    pub first_burst: RangeInclusive<u32>,
    pub burst_cooldown: RangeInclusive<u32>,
    pub vortex_speed: f32,
    pub vortex_force: f32,
    // Prey search window, in cells around the predator's own cell
    pub vision_cells: i32,
    // Off-screen resting point in peaceful mode
    pub den: (f32, f32),
    // Spawn distance beyond each world corner
    pub gate_offset: f32,
    pub hunt_near: f32,
    pub hunt_far: f32,
    pub soft_radius: f32,
    pub soft_force: f32,
    pub separation_weight: f32,
    pub hard_radius: f32,
    pub wall_margin: f32,
    pub wall_strength: f32,
    pub orbit_ring: f32,
    pub orbit_tangential: f32,
    pub orbit_gain: f32,
}

impl Default for PredatorFishParams {
    fn default() -> Self {
        Self {
            max_force: 0.1,
            cruise_speed: 4.0,
            peaceful_speed: 0.8,
            burst_speed: 7.0,
            burst_duration: 60,
            first_burst: 100..=300,
            burst_cooldown: 150..=500,
            vortex_speed: 2.0,
            vortex_force: 0.3,
            vision_cells: 2,
            den: (-600.0, -600.0),
            gate_offset: 200.0,
            hunt_near: 300.0,
            hunt_far: 400.0,
            soft_radius: 120.0,
            soft_force: 0.2,
            separation_weight: 2.0,
            hard_radius: 50.0,
            wall_margin: 100.0,
            wall_strength: 2.0,
            orbit_ring: 300.0,
            orbit_tangential: 1.5,
            orbit_gain: 0.02,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct OceanParams {
    pub fish_count: usize,
    pub cell_size: f32,
    pub peaceful: ModeTuning,
    pub hunted: ModeTuning,
    pub vortex: ModeTuning,
    pub separation_radius: f32,
    pub cohesion_radius: f32,
    pub alignment_radius: f32,
    pub min_speed: f32,
    pub edge_margin: f32,
    pub resolve_overlap: bool,
    pub collision_radius: f32,
    pub collision_damping: f32,
    pub flee_radius: f32,
    pub flee_boost: f32,
    // Multiplier on the mode-specific drive (flee or vortex)
    pub drive_weight: f32,
    pub vortex_swirl: f32,
    pub vortex_pull: f32,
    pub predator: PredatorFishParams,
}

impl Default for OceanParams {
    fn default() -> Self {
        Self {
            fish_count: 700,
            cell_size: 100.0,
            peaceful: ModeTuning {
                max_speed: 0.8,
                max_force: 0.03,
                separation_weight: 1.5,
                cohesion_weight: 0.3,
                alignment_weight: 0.8,
            },
            hunted: ModeTuning {
                max_speed: 3.5,
                max_force: 0.1,
                separation_weight: 10.0,
                cohesion_weight: 0.5,
                alignment_weight: 1.0,
            },
            vortex: ModeTuning {
                max_speed: 5.0,
                max_force: 0.2,
                separation_weight: 50.0,
                cohesion_weight: 25.0,
                alignment_weight: 3.0,
            },
            separation_radius: 25.0,
            cohesion_radius: 50.0,
            alignment_radius: 50.0,
            min_speed: 0.5,
            edge_margin: 50.0,
            resolve_overlap: true,
            collision_radius: 12.0,
            collision_damping: 0.8,
            flee_radius: 150.0,
            flee_boost: 1.5,
            drive_weight: 2.0,
            vortex_swirl: 0.8,
            vortex_pull: 2.0,
            predator: PredatorFishParams::default(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PredatorBirdParams {
    pub mass: f32,
    pub orbit_speed: f32,
    pub orbit_force: f32,
    pub intercept_speed: f32,
    pub intercept_force: f32,
    pub patrol_radius: f32,
    pub patrol_step: f32,
    pub patrol_gain: f32,
    pub vision_cells: i32,
    pub engage_radius: f32,
    pub capture_distance: f32,
    pub tether_offset: f32,
    pub lead: f32,
    pub gain: f32,
    pub hunt_duration: RangeInclusive<u32>,
    pub glide_interval: RangeInclusive<u32>,
    pub initial_glide: u32,
    pub launch_speed: f32,
}

impl Default for PredatorBirdParams {
    fn default() -> Self {
        Self {
            mass: 50.0,
            orbit_speed: 12.0,
            orbit_force: 0.4,
            intercept_speed: 60.0,
            intercept_force: 8.0,
            patrol_radius: 1800.0,
            patrol_step: 0.05,
            patrol_gain: 0.1,
            vision_cells: 3,
            engage_radius: 300.0,
            capture_distance: 500.0,
            tether_offset: 400.0,
            lead: 2.0,
            gain: 8.0,
            hunt_duration: 300..=600,
            glide_interval: 80..=200,
            initial_glide: 60,
            launch_speed: 5.0,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SkyParams {
    pub bird_count: usize,
    pub cell_size: f32,
    pub hard_radius: f32,
    pub nudge: f32,
    pub separation_decay: f32,
    pub separation_weight: f32,
    pub alignment_strength: f32,
    pub cohesion_strength: f32,
    pub swirl_strength: f32,
    pub calm_speed: f32,
    pub calm_force: f32,
    pub panic_speed: f32,
    pub panic_force: f32,
    pub scatter_radius: f32,
    pub scatter_strength: f32,
    pub world_tether_radius: f32,
    pub world_tether_strength: f32,
    pub safe_zone_radius: f32,
    pub safe_zone_gain: f32,
    pub panic_strength: f32,
    pub panic_interval: RangeInclusive<u32>,
    pub startle_flee: f32,
    pub flee_strength: f32,
    pub exit_flock: RangeInclusive<f32>,
    pub swoop_speed: f32,
    pub initial_speed: f32,
    pub hunt_zoom: f32,
    pub scout_zoom: f32,
    pub zoom_smoothing: f32,
    pub predator: PredatorBirdParams,
}

impl Default for SkyParams {
    fn default() -> Self {
        Self {
            bird_count: 500,
            cell_size: 220.0,
            hard_radius: 42.0,
            nudge: 0.6,
            separation_decay: 1.5,
            separation_weight: 2.2,
            alignment_strength: 1.8,
            cohesion_strength: 3.5,
            swirl_strength: 20.0,
            calm_speed: 14.0,
            calm_force: 1.5,
            panic_speed: 36.0,
            panic_force: 6.0,
            scatter_radius: 150.0,
            scatter_strength: 20.0,
            world_tether_radius: 400.0,
            world_tether_strength: 1.2,
            safe_zone_radius: 80.0,
            safe_zone_gain: 0.08,
            panic_strength: 30.0,
            panic_interval: 8..=15,
            startle_flee: 25.0,
            flee_strength: 200.0,
            exit_flock: 200.0..=300.0,
            swoop_speed: 28.0,
            initial_speed: 4.0,
            hunt_zoom: 1.2,
            scout_zoom: 0.6,
            zoom_smoothing: 0.05,
            predator: PredatorBirdParams::default(),
        }
    }
}

// Parameters for both simulation contexts
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct SimulationParams {
    pub world: World,
    // Fixed seed for reproducible runs; entropy when absent
    pub seed: Option<u64>,
    pub ocean: OceanParams,
    pub sky: SkyParams,
}

impl SimulationParams {
    // Load parameters from a JSON file and validate them.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let json = fs::read_to_string(path)?;
        let params: Self = serde_json::from_str(&json)?;
        params.validate()?;
        Ok(params)
    }

    // Save parameters as pretty-printed JSON.
    pub fn save(&self, path: impl AsRef<Path>) -> Result<(), ConfigError> {
        let json = serde_json::to_string_pretty(self)?;
        fs::write(path, json)?;
        Ok(())
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if !(self.world.width > 0.0 && self.world.height > 0.0) {
            return Err(ConfigError::Invalid("world dimensions must be positive"));
        }
        if !(self.ocean.cell_size > 0.0) || !(self.sky.cell_size > 0.0) {
            return Err(ConfigError::Invalid("cell_size must be positive"));
        }
        if self.ocean.min_speed < 0.0 {
            return Err(ConfigError::Invalid("min_speed must not be negative"));
        }
        for tuning in [&self.ocean.peaceful, &self.ocean.hunted, &self.ocean.vortex] {
            if tuning.max_speed <= 0.0 || tuning.max_force < 0.0 {
                return Err(ConfigError::Invalid("mode speed caps must be positive"));
            }
        }
        let fish_predator = &self.ocean.predator;
        let falcon = &self.sky.predator;
        let speed_caps = [
            fish_predator.cruise_speed,
            fish_predator.peaceful_speed,
            fish_predator.burst_speed,
            fish_predator.vortex_speed,
            self.sky.calm_speed,
            self.sky.panic_speed,
            falcon.orbit_speed,
            falcon.intercept_speed,
        ];
        if speed_caps.iter().any(|&speed| !(speed > 0.0)) {
            return Err(ConfigError::Invalid("speed caps must be positive"));
        }
        let force_caps = [
            fish_predator.max_force,
            fish_predator.vortex_force,
            fish_predator.soft_force,
            self.sky.calm_force,
            self.sky.panic_force,
            falcon.orbit_force,
            falcon.intercept_force,
        ];
        if force_caps.iter().any(|&force| !(force >= 0.0)) {
            return Err(ConfigError::Invalid("force caps must not be negative"));
        }
        // Spawn velocities are drawn from (-initial_speed, initial_speed)
        if !(self.sky.initial_speed > 0.0) {
            return Err(ConfigError::Invalid("initial_speed must be positive"));
        }
        if !(falcon.launch_speed >= 0.0) {
            return Err(ConfigError::Invalid("launch_speed must not be negative"));
        }
        if self.ocean.predator.vision_cells < 0 || self.sky.predator.vision_cells < 0 {
            return Err(ConfigError::Invalid("vision_cells must not be negative"));
        }
        if self.sky.predator.mass <= 0.0 {
            return Err(ConfigError::Invalid("predator mass must be positive"));
        }

        let tick_ranges = [
            &self.ocean.predator.first_burst,
            &self.ocean.predator.burst_cooldown,
            &self.sky.panic_interval,
            &self.sky.predator.hunt_duration,
            &self.sky.predator.glide_interval,
        ];
        if tick_ranges.iter().any(|range| range.start() > range.end()) {
            return Err(ConfigError::Invalid("tick range start exceeds its end"));
        }
        if self.sky.exit_flock.start() > self.sky.exit_flock.end() {
            return Err(ConfigError::Invalid("exit_flock start exceeds its end"));
        }

        Ok(())
    }

    // Get parameter ranges for UI sliders
    pub fn get_fish_count_range() -> RangeInclusive<usize> {
        10..=3000
    }

    pub fn get_bird_count_range() -> RangeInclusive<usize> {
        10..=2000
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_are_valid() {
        assert!(SimulationParams::default().validate().is_ok());
    }

    #[test]
    fn non_positive_cell_size_is_rejected() {
        let mut params = SimulationParams::default();
        params.ocean.cell_size = 0.0;
        assert!(matches!(params.validate(), Err(ConfigError::Invalid(_))));

        let mut params = SimulationParams::default();
        params.sky.cell_size = -220.0;
        assert!(matches!(params.validate(), Err(ConfigError::Invalid(_))));
    }

    #[test]
    fn inverted_ranges_are_rejected() {
        let mut params = SimulationParams::default();
        params.sky.predator.hunt_duration = RangeInclusive::new(600, 300);
        assert!(params.validate().is_err());
    }

    #[test]
    fn still_birds_are_rejected() {
        let mut params = SimulationParams::default();
        params.sky.initial_speed = 0.0;
        assert!(matches!(params.validate(), Err(ConfigError::Invalid(_))));

        params.sky.initial_speed = f32::NAN;
        assert!(params.validate().is_err());
    }

    #[test]
    fn predator_caps_must_be_usable() {
        let mut params = SimulationParams::default();
        params.ocean.predator.burst_speed = 0.0;
        assert!(params.validate().is_err());

        let mut params = SimulationParams::default();
        params.sky.predator.intercept_force = -1.0;
        assert!(params.validate().is_err());

        let mut params = SimulationParams::default();
        params.sky.panic_speed = -36.0;
        assert!(params.validate().is_err());

        let mut params = SimulationParams::default();
        params.sky.calm_force = 0.0;
        assert!(params.validate().is_ok());
    }

    #[test]
    fn partial_json_keeps_defaults() {
        let json = r#"{ "world": { "width": 800.0, "height": 600.0 }, "ocean": { "fish_count": 42 } }"#;
        let params: SimulationParams = serde_json::from_str(json).unwrap();
        assert_eq!(params.world, World { width: 800.0, height: 600.0 });
        assert_eq!(params.ocean.fish_count, 42);
        assert_eq!(params.ocean.cell_size, 100.0);
        assert_eq!(params.sky, SkyParams::default());
    }

    #[test]
    fn save_then_load() {
        let path = std::env::temp_dir().join(format!("shoals-params-{}.json", std::process::id()));
        let mut params = SimulationParams::default();
        params.seed = Some(99);
        params.sky.bird_count = 123;
        params.save(&path).unwrap();

        let loaded = SimulationParams::load(&path).unwrap();
        let _ = std::fs::remove_file(&path);
        assert_eq!(loaded, params);
    }

    #[test]
    fn missing_file_is_an_io_error() {
        let result = SimulationParams::load("/definitely/not/here.json");
        assert!(matches!(result, Err(ConfigError::Io(_))));
    }
}
