/*
 * Camera Module
 *
 * This module defines the Camera struct that handles zooming and panning.
 * It provides coordinate transformations between world space (origin at the
 * top-left corner, y pointing down) and nannou's screen space (origin at the
 * window centre, y pointing up).
 *
 * The ocean view fits the whole tank in the window. The sky view follows the
 * falcon and eases its zoom toward a per-mode target.
 */

use nannou::prelude::*;

use crate::params::World;

pub struct Camera {
    // World point shown at the window centre
    pub position: Vec2,
    pub zoom: f32,
    pub drag_start: Option<Vec2>,
    pub min_zoom: f32,
    pub max_zoom: f32,
    pub is_dragging: bool,
    pub last_cursor_pos: Vec2,
}

impl Camera {
    pub fn new() -> Self {
        Self {
            position: Vec2::ZERO,
            zoom: 1.0,
            drag_start: None,
            min_zoom: 0.1,
            max_zoom: 5.0,
            is_dragging: false,
            last_cursor_pos: Vec2::ZERO,
        }
    }

    // Convert a point from world space to screen space
    pub fn world_to_screen(&self, point: Vec2, window_rect: Rect) -> Vec2 {
        let zoomed = (point - self.position) * self.zoom;
        vec2(zoomed.x, -zoomed.y) + window_rect.xy()
    }

    // Convert a point from screen space to world space
    pub fn screen_to_world(&self, point: Vec2, window_rect: Rect) -> Vec2 {
        let centered = point - window_rect.xy();
        vec2(centered.x, -centered.y) / self.zoom + self.position
    }

    // World-space rectangle currently on screen, grown by `margin` world units.
    // Returned as (min, max) corners.
    pub fn visible_bounds(&self, window_rect: Rect, margin: f32) -> (Vec2, Vec2) {
        let a = self.screen_to_world(vec2(window_rect.left(), window_rect.top()), window_rect);
        let b = self.screen_to_world(vec2(window_rect.right(), window_rect.bottom()), window_rect);
        (a.min(b) - Vec2::splat(margin), a.max(b) + Vec2::splat(margin))
    }

    // Centre the whole world in the window at the largest zoom that fits.
    pub fn fit(&mut self, world: &World, window_rect: Rect) {
        self.position = world.center();
        let zoom = (window_rect.w() / world.width).min(window_rect.h() / world.height);
        if zoom.is_finite() && zoom > 0.0 {
            self.zoom = zoom;
        }
    }

    pub fn follow(&mut self, point: Vec2) {
        self.position = point;
    }

    // Exponential smoothing of the zoom toward `target`.
    pub fn ease_zoom(&mut self, target: f32, rate: f32) {
        self.zoom += (target - self.zoom) * rate;
    }

    // Handle mouse wheel events for zooming
    pub fn zoom(&mut self, scroll_delta: Vec2, cursor_position: Vec2, window_rect: Rect) {
        // Calculate zoom factor based on scroll amount
        let zoom_factor = 1.0 + scroll_delta.y * 0.1;

        // Calculate cursor position in world space before zoom
        let cursor_world_before = self.screen_to_world(cursor_position, window_rect);

        // Apply zoom, clamping to min/max values
        self.zoom = (self.zoom * zoom_factor).clamp(self.min_zoom, self.max_zoom);

        // Calculate cursor position in world space after zoom
        let cursor_world_after = self.screen_to_world(cursor_position, window_rect);

        // Adjust camera position to keep cursor over the same world point
        self.position += cursor_world_before - cursor_world_after;
    }

    // Start dragging the camera
    pub fn start_drag(&mut self, position: Vec2) {
        // Only set the drag start position, don't move the camera yet
        self.drag_start = Some(position);
        self.last_cursor_pos = position;
        self.is_dragging = true;
    }

    // Update camera position while dragging
    pub fn drag(&mut self, position: Vec2) {
        if self.is_dragging {
            // Calculate drag delta from the last position (not the start position)
            let delta = position - self.last_cursor_pos;

            // Only apply movement if there's actually a change.
            // Screen y points up, world y points down.
            if delta.length_squared() > 0.0 {
                self.position -= vec2(delta.x, -delta.y) / self.zoom;
                self.last_cursor_pos = position;
            }
        }
    }

    // End dragging
    pub fn end_drag(&mut self) {
        self.drag_start = None;
        self.is_dragging = false;
    }
}

impl Default for Camera {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn window() -> Rect {
        Rect::from_w_h(800.0, 600.0)
    }

    #[test]
    fn world_y_points_down_on_screen() {
        let mut camera = Camera::new();
        camera.position = vec2(100.0, 100.0);
        let below = camera.world_to_screen(vec2(100.0, 150.0), window());
        assert_eq!(below, vec2(0.0, -50.0));
    }

    #[test]
    fn screen_and_world_invert_each_other() {
        let mut camera = Camera::new();
        camera.position = vec2(960.0, 600.0);
        camera.zoom = 0.37;
        let point = vec2(123.0, 987.0);
        let back = camera.screen_to_world(camera.world_to_screen(point, window()), window());
        assert!(back.distance(point) < 1e-3);
    }

    #[test]
    fn fit_shows_the_whole_world() {
        let mut camera = Camera::new();
        let world = World::default();
        camera.fit(&world, window());
        let (min, max) = camera.visible_bounds(window(), 0.0);
        assert!(min.x <= 0.0 + 1e-3 && min.y <= 0.0 + 1e-3);
        assert!(max.x >= world.width - 1e-3 && max.y >= world.height - 1e-3);
    }

    #[test]
    fn zoom_easing_converges() {
        let mut camera = Camera::new();
        camera.zoom = 0.6;
        for _ in 0..200 {
            camera.ease_zoom(1.2, 0.05);
        }
        assert!((camera.zoom - 1.2).abs() < 1e-3);

        // One step covers 5% of the gap
        camera.zoom = 0.6;
        camera.ease_zoom(1.2, 0.05);
        assert!((camera.zoom - 0.63).abs() < 1e-5);
    }

    #[test]
    fn wheel_zoom_keeps_the_cursor_over_its_world_point() {
        let mut camera = Camera::new();
        camera.position = vec2(500.0, 400.0);
        let cursor = vec2(120.0, -80.0);
        let under_cursor = camera.screen_to_world(cursor, window());

        camera.zoom(vec2(0.0, 3.0), cursor, window());
        assert!((camera.zoom - 1.3).abs() < 1e-5);
        assert!(camera.screen_to_world(cursor, window()).distance(under_cursor) < 1e-3);

        // Clamped at the far end
        for _ in 0..50 {
            camera.zoom(vec2(0.0, -5.0), cursor, window());
        }
        assert_eq!(camera.zoom, camera.min_zoom);
    }

    #[test]
    fn drag_moves_the_world_with_the_cursor() {
        let mut camera = Camera::new();
        camera.start_drag(vec2(0.0, 0.0));
        camera.drag(vec2(10.0, 10.0));
        camera.end_drag();
        // Dragging right and up reveals what lies left and below in world space
        assert_eq!(camera.position, vec2(-10.0, 10.0));
        assert!(!camera.is_dragging);
    }
}
