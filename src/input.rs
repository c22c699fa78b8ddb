/*
 * Input Module
 *
 * This module handles user input events for the simulation.
 *
 * Keyboard:
 * - 1 / 2 / 3: peaceful, hunted and vortex fish modes
 * - T: toggle the falcon between scouting and hunting
 * - Tab: switch between the ocean and the sky
 * - Space: pause
 * - R: reset the current scene
 *
 * Mouse: drag to pan and wheel to zoom in the ocean. The sky camera is
 * driven by the falcon.
 */

use nannou::prelude::*;
use nannou::winit::event::{MouseButton, MouseScrollDelta, TouchPhase};

use crate::app::{Model, SceneKind};
use crate::physics::Command;

// Map a key to a simulation command, if it is one.
pub fn command_for_key(key: Key) -> Option<Command> {
    match key {
        Key::Key1 => Some(Command::Peaceful),
        Key::Key2 => Some(Command::Hunted),
        Key::Key3 => Some(Command::Vortex),
        Key::T => Some(Command::ToggleHunt),
        _ => None,
    }
}

pub fn key_pressed(_app: &App, model: &mut Model, key: Key) {
    if let Some(command) = command_for_key(key) {
        // Applied at the next tick boundary
        model.pending.push(command);
        return;
    }

    match key {
        Key::Tab => model.switch_scene(),
        Key::Space => model.paused = !model.paused,
        Key::R => model.reset_scene(),
        _ => {}
    }
}

pub fn mouse_moved(_app: &App, model: &mut Model, pos: Point2) {
    if model.camera.is_dragging {
        model.camera.drag(pos);
    }
    model.mouse_position = pos;
}

pub fn mouse_pressed(_app: &App, model: &mut Model, button: MouseButton) {
    if button == MouseButton::Left
        && model.scene.kind() == SceneKind::Ocean
        && !model.egui.ctx().is_pointer_over_area()
    {
        model.camera.start_drag(model.mouse_position);
    }
}

pub fn mouse_released(_app: &App, model: &mut Model, button: MouseButton) {
    if button == MouseButton::Left {
        model.camera.end_drag();
    }
}

pub fn mouse_wheel(app: &App, model: &mut Model, delta: MouseScrollDelta, _phase: TouchPhase) {
    if model.scene.kind() != SceneKind::Ocean {
        return;
    }

    let window_rect = app.window_rect();
    match delta {
        MouseScrollDelta::LineDelta(x, y) => {
            model.camera.zoom(vec2(x, y), model.mouse_position, window_rect);
        }
        MouseScrollDelta::PixelDelta(pos) => {
            model.camera.zoom(vec2(pos.x as f32, pos.y as f32) * 0.01, model.mouse_position, window_rect);
        }
    }
}

// Pass raw window events to egui
pub fn raw_window_event(_app: &App, model: &mut Model, event: &nannou::winit::event::WindowEvent) {
    model.egui.handle_raw_event(event);
}
