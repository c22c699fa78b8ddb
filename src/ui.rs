/*
 * UI Module
 *
 * This module contains functions for creating and updating the user interface
 * using nannou_egui: mode buttons for the active scene, population sliders,
 * pause and reset, and debug readouts.
 */

use nannou_egui::{egui, Egui};

use crate::app::SceneKind;
use crate::debug::DebugInfo;
use crate::params::SimulationParams;
use crate::physics::Command;

// What the user asked for this frame.
#[derive(Debug, Default, Clone, PartialEq)]
pub struct UiActions {
    pub commands: Vec<Command>,
    pub switch_scene: bool,
    pub reset: bool,
}

pub fn update_ui(
    egui: &mut Egui,
    params: &mut SimulationParams,
    debug_info: &DebugInfo,
    scene: SceneKind,
    paused: &mut bool,
    show_debug: &mut bool,
) -> UiActions {
    let mut actions = UiActions::default();
    let fish_count = params.ocean.fish_count;
    let bird_count = params.sky.bird_count;

    let ctx = egui.begin_frame();

    egui::Window::new("Simulation Controls")
        .default_pos([10.0, 10.0])
        .show(&ctx, |ui| {
            ui.horizontal(|ui| {
                ui.label(match scene {
                    SceneKind::Ocean => "Ocean",
                    SceneKind::Sky => "Sky",
                });
                if ui.button("Switch Scene (Tab)").clicked() {
                    actions.switch_scene = true;
                }
            });

            match scene {
                SceneKind::Ocean => {
                    ui.collapsing("Fish Mode", |ui| {
                        ui.horizontal(|ui| {
                            if ui.button("1 Peaceful").clicked() {
                                actions.commands.push(Command::Peaceful);
                            }
                            if ui.button("2 Hunted").clicked() {
                                actions.commands.push(Command::Hunted);
                            }
                            if ui.button("3 Vortex").clicked() {
                                actions.commands.push(Command::Vortex);
                            }
                        });
                    });
                    ui.add(
                        egui::Slider::new(&mut params.ocean.fish_count, SimulationParams::get_fish_count_range())
                            .text("Number of Fish"),
                    );
                    ui.checkbox(&mut params.ocean.resolve_overlap, "Hard Collisions");
                }
                SceneKind::Sky => {
                    ui.collapsing("Falcon", |ui| {
                        ui.horizontal(|ui| {
                            if ui.button("Scout").clicked() {
                                actions.commands.push(Command::Scout);
                            }
                            if ui.button("Hunt").clicked() {
                                actions.commands.push(Command::Hunt);
                            }
                        });
                    });
                    ui.add(
                        egui::Slider::new(&mut params.sky.bird_count, SimulationParams::get_bird_count_range())
                            .text("Number of Birds"),
                    );
                }
            }

            if ui.button("Reset Scene (R)").clicked() {
                actions.reset = true;
            }

            ui.collapsing("Performance", |ui| {
                for line in debug_info.lines() {
                    ui.label(line);
                }
            });

            ui.checkbox(show_debug, "Show Debug Info");
            ui.checkbox(paused, "Pause Simulation (Space)");
        });

    // Population changes take effect through a reset
    if params.ocean.fish_count != fish_count || params.sky.bird_count != bird_count {
        actions.reset = true;
    }

    actions
}

// Draw debug information on the screen
pub fn draw_debug_info(draw: &nannou::Draw, debug_info: &DebugInfo, window_rect: nannou::geom::Rect) {
    let lines = debug_info.lines();

    let margin = 20.0;
    let line_height = 20.0;
    let panel_width = 220.0;
    let panel_height = line_height * lines.len() as f32 + margin;
    let panel_x = window_rect.right() - panel_width / 2.0;
    let panel_y = window_rect.top() - panel_height / 2.0;

    draw.rect()
        .x_y(panel_x, panel_y)
        .w_h(panel_width, panel_height)
        .color(nannou::color::rgba(0.0, 0.0, 0.0, 0.7));

    let text_x = window_rect.right() - panel_width + margin;
    let text_y = window_rect.top() - margin;

    for (i, text) in lines.iter().enumerate() {
        let y = text_y - (i as f32 * line_height);

        // nannou centres text on its position
        draw.text(text)
            .x_y(text_x + 80.0, y)
            .color(nannou::color::WHITE)
            .font_size(14);
    }
}
