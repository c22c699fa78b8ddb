/*
 * Application Module
 *
 * This module defines the main application model and the nannou update loop.
 * The model holds one active scene (the ocean or the sky), the parameters it
 * was built from, the camera, the egui panel and the debug readouts.
 *
 * Each frame advances the active scene by exactly one tick unless paused.
 * Mode commands from the keyboard or the panel are queued and applied just
 * before the tick.
 */

use std::env;

use nannou::prelude::*;
use nannou_egui::Egui;

use crate::camera::Camera;
use crate::debug::DebugInfo;
use crate::input;
use crate::ocean::OceanSimulation;
use crate::params::SimulationParams;
use crate::physics::{Command, Simulation};
use crate::renderer;
use crate::sky::SkySimulation;
use crate::ui;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SceneKind {
    Ocean,
    Sky,
}

impl SceneKind {
    pub fn other(self) -> Self {
        match self {
            SceneKind::Ocean => SceneKind::Sky,
            SceneKind::Sky => SceneKind::Ocean,
        }
    }
}

pub enum Scene {
    Ocean(OceanSimulation),
    Sky(SkySimulation),
}

impl Scene {
    pub fn new(kind: SceneKind, params: &SimulationParams) -> Self {
        match kind {
            SceneKind::Ocean => Scene::Ocean(OceanSimulation::new(params)),
            SceneKind::Sky => Scene::Sky(SkySimulation::new(params)),
        }
    }

    pub fn kind(&self) -> SceneKind {
        match self {
            Scene::Ocean(_) => SceneKind::Ocean,
            Scene::Sky(_) => SceneKind::Sky,
        }
    }

    pub fn simulation(&self) -> &dyn Simulation {
        match self {
            Scene::Ocean(ocean) => ocean,
            Scene::Sky(sky) => sky,
        }
    }

    pub fn simulation_mut(&mut self) -> &mut dyn Simulation {
        match self {
            Scene::Ocean(ocean) => ocean,
            Scene::Sky(sky) => sky,
        }
    }
}

// Main model for the application
pub struct Model {
    pub scene: Scene,
    pub params: SimulationParams,
    pub egui: Egui,
    pub debug_info: DebugInfo,
    pub camera: Camera,
    pub mouse_position: Vec2,
    // Commands waiting for the next tick boundary
    pub pending: Vec<Command>,
    pub paused: bool,
    pub show_debug: bool,
    pub window_rect: Rect,
}

impl Model {
    pub fn switch_scene(&mut self) {
        let kind = self.scene.kind().other();
        log::info!("switching to {:?}", kind);
        self.scene = Scene::new(kind, &self.params);
        self.pending.clear();
        self.frame_camera();
    }

    pub fn reset_scene(&mut self) {
        log::info!("resetting {:?}", self.scene.kind());
        self.scene = Scene::new(self.scene.kind(), &self.params);
        self.pending.clear();
        self.frame_camera();
    }

    // Initial framing for the active scene
    fn frame_camera(&mut self) {
        self.camera.end_drag();
        match &self.scene {
            Scene::Ocean(ocean) => self.camera.fit(&ocean.world(), self.window_rect),
            Scene::Sky(sky) => {
                self.camera.follow(sky.predator().body.position);
                self.camera.zoom = sky.target_zoom();
            }
        }
    }
}

// Parameters from the JSON file named on the command line, or the defaults
fn load_params() -> SimulationParams {
    let Some(path) = env::args().nth(1) else {
        return SimulationParams::default();
    };

    match SimulationParams::load(&path) {
        Ok(params) => {
            log::info!("loaded configuration from {}", path);
            params
        }
        Err(err) => {
            log::warn!("{} ({}), using defaults", err, path);
            SimulationParams::default()
        }
    }
}

// Initialize the model
pub fn model(app: &App) -> Model {
    // 80% of the primary monitor, or a fixed size when it is unknown
    let (window_width, window_height) = match app.primary_monitor() {
        Some(monitor) => {
            let size = monitor.size();
            (size.width as f32 * 0.8, size.height as f32 * 0.8)
        }
        None => (1280.0, 800.0),
    };

    let window_id = app
        .new_window()
        .title("Shoals")
        .size(window_width as u32, window_height as u32)
        .view(view)
        .key_pressed(input::key_pressed)
        .mouse_moved(input::mouse_moved)
        .mouse_pressed(input::mouse_pressed)
        .mouse_released(input::mouse_released)
        .mouse_wheel(input::mouse_wheel)
        .raw_event(input::raw_window_event)
        .build()
        .expect("failed to build the main window");

    let window = app.window(window_id).expect("main window closed during setup");
    let egui = Egui::from_window(&window);

    let params = load_params();
    let scene = Scene::new(SceneKind::Ocean, &params);

    let mut model = Model {
        scene,
        params,
        egui,
        debug_info: DebugInfo::default(),
        camera: Camera::new(),
        mouse_position: Vec2::ZERO,
        pending: Vec::new(),
        paused: false,
        show_debug: false,
        window_rect: window.rect(),
    };
    model.frame_camera();
    model
}

// Update the model
pub fn update(app: &App, model: &mut Model, update: Update) {
    model.debug_info.fps = app.fps();
    model.debug_info.frame_time = update.since_last;

    let resized = model.window_rect != app.window_rect();
    model.window_rect = app.window_rect();

    let actions = ui::update_ui(
        &mut model.egui,
        &mut model.params,
        &model.debug_info,
        model.scene.kind(),
        &mut model.paused,
        &mut model.show_debug,
    );
    model.pending.extend(actions.commands);

    if actions.switch_scene {
        model.switch_scene();
    } else if actions.reset {
        model.reset_scene();
    } else if resized && model.scene.kind() == SceneKind::Ocean {
        model.frame_camera();
    }

    // Live toggles that do not need a rebuild
    if let Scene::Ocean(ocean) = &mut model.scene {
        ocean.set_resolve_overlap(model.params.ocean.resolve_overlap);
    }

    // Mode changes land on the tick boundary
    let simulation = model.scene.simulation_mut();
    for command in model.pending.drain(..) {
        if !simulation.apply(command) {
            log::debug!("{:?} has no effect here", command);
        }
    }

    if !model.paused {
        simulation.step();
    }

    if let Scene::Sky(sky) = &model.scene {
        model.camera.follow(sky.predator().body.position);
        model.camera.ease_zoom(sky.target_zoom(), sky.params().zoom_smoothing);
    }

    let simulation = model.scene.simulation();
    let views = simulation.agents();
    model.debug_info.tick = simulation.tick();
    model.debug_info.agent_count = views.len();
    model.debug_info.visible_agents = renderer::visible_agents(&views, &model.camera, model.window_rect).len();
    model.debug_info.mode = simulation.mode_label();
    model.debug_info.chase_phase = match &model.scene {
        Scene::Sky(sky) => Some(format!("{:?}", sky.chase_phase())),
        Scene::Ocean(_) => None,
    };
}

pub fn view(app: &App, model: &Model, frame: Frame) {
    renderer::view(app, model, frame);
}
