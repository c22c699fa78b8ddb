/*
 * Renderer Module
 *
 * This module draws the active scene. Every agent is published by the
 * simulation as an AgentView and drawn as a kind-specific polygon oriented
 * along its velocity. Agents outside the camera view are skipped.
 */

use nannou::prelude::*;

use crate::app::{Model, SceneKind};
use crate::camera::Camera;
use crate::physics::{AgentKind, AgentView};
use crate::ui;
use crate::AGENT_SIZE;

// Views that land inside the window, with a margin for the polygon size.
pub fn visible_agents<'a>(views: &'a [AgentView], camera: &Camera, window_rect: Rect) -> Vec<&'a AgentView> {
    let margin = AGENT_SIZE * 4.0 / camera.zoom;
    let (min, max) = camera.visible_bounds(window_rect, margin);
    views
        .iter()
        .filter(|v| v.position.x >= min.x && v.position.x <= max.x && v.position.y >= min.y && v.position.y <= max.y)
        .collect()
}

// Local outline of an agent, nose along +x, in world units
fn outline(view: &AgentView, tick: u64) -> Vec<Point2> {
    let s = AGENT_SIZE;
    match view.kind {
        AgentKind::Fish => vec![pt2(s, 0.0), pt2(-s, s * 0.5), pt2(-s * 0.6, 0.0), pt2(-s, -s * 0.5)],
        AgentKind::PredatorFish => {
            let s = s * 2.5;
            vec![pt2(s, 0.0), pt2(0.0, s * 0.4), pt2(-s, s * 0.3), pt2(-s * 0.8, 0.0), pt2(-s, -s * 0.3), pt2(0.0, -s * 0.4)]
        }
        AgentKind::Bird => {
            // Wings beat faster while swooping
            let rate = if view.is_swooping { 0.8 } else { 0.3 };
            let flap = (tick as f32 * rate).sin() * 0.5 + 1.0;
            vec![pt2(s, 0.0), pt2(-s, s * flap), pt2(-s * 0.4, 0.0), pt2(-s, -s * flap)]
        }
        AgentKind::PredatorBird => {
            let s = s * 3.0;
            let span = if view.is_swooping {
                0.5
            } else if view.is_gliding {
                1.4
            } else {
                (tick as f32 * 0.2).sin() * 0.4 + 1.0
            };
            vec![pt2(s, 0.0), pt2(-s * 0.6, s * span), pt2(-s * 0.2, 0.0), pt2(-s * 0.6, -s * span)]
        }
    }
}

fn agent_color(view: &AgentView) -> Rgba {
    match view.kind {
        AgentKind::Fish => rgba(0.75, 0.85, 0.9, 1.0),
        AgentKind::PredatorFish if view.is_bursting => rgba(0.95, 0.3, 0.25, 1.0),
        AgentKind::PredatorFish => rgba(0.35, 0.4, 0.45, 1.0),
        AgentKind::Bird if view.is_targeted => rgba(0.9, 0.2, 0.2, 1.0),
        AgentKind::Bird => rgba(0.1, 0.1, 0.15, 1.0),
        AgentKind::PredatorBird => rgba(0.45, 0.3, 0.15, 1.0),
    }
}

fn draw_agent(draw: &Draw, view: &AgentView, camera: &Camera, window_rect: Rect, tick: u64) {
    let screen_pos = camera.world_to_screen(view.position, window_rect);
    // World is y-down, the screen is y-up
    let heading = vec2(view.velocity.x, -view.velocity.y);
    let angle = if heading.length_squared() > 0.0 { heading.y.atan2(heading.x) } else { 0.0 };

    let points = outline(view, tick).into_iter().map(|p| p * camera.zoom);
    draw.polygon()
        .points(points)
        .xy(screen_pos)
        .rotate(angle)
        .color(agent_color(view));
}

// Render the model
pub fn view(app: &App, model: &Model, frame: Frame) {
    let draw = app.draw();
    let window_rect = app.window_rect();
    let simulation = model.scene.simulation();

    match model.scene.kind() {
        SceneKind::Ocean => {
            draw.background().color(rgb(0.02, 0.12, 0.25));

            // Tank walls
            let world = simulation.world();
            let top_left = model.camera.world_to_screen(vec2(0.0, 0.0), window_rect);
            let bottom_right = model.camera.world_to_screen(vec2(world.width, world.height), window_rect);
            let tank = Rect::from_corners(top_left, bottom_right);
            draw.rect()
                .xy(tank.xy())
                .wh(tank.wh())
                .no_fill()
                .stroke_weight(1.0)
                .stroke(rgba(0.3, 0.5, 0.7, 1.0));
        }
        SceneKind::Sky => {
            draw.background().color(rgb(0.43, 0.63, 0.9));
        }
    }

    let views = simulation.agents();
    let tick = simulation.tick();
    for view in visible_agents(&views, &model.camera, window_rect) {
        draw_agent(&draw, view, &model.camera, window_rect, tick);
    }

    if model.show_debug {
        ui::draw_debug_info(&draw, &model.debug_info, window_rect);
    }

    if let Err(err) = draw.to_frame(app, &frame) {
        log::warn!("failed to draw frame: {:?}", err);
    }

    if let Err(err) = model.egui.draw_to_frame(&frame) {
        log::warn!("failed to draw ui: {:?}", err);
    }
}
