/*
 * Debug Information Module
 *
 * This module defines the DebugInfo struct that contains performance metrics
 * and simulation state to be displayed in the UI:
 * - FPS and frame time
 * - Tick count and agent counts
 * - Current mode and, in the sky, the falcon's chase phase
 */

use std::time::Duration;

#[derive(Debug, Clone, Default)]
pub struct DebugInfo {
    pub fps: f32,
    pub frame_time: Duration,
    pub tick: u64,
    pub agent_count: usize,
    pub visible_agents: usize,
    pub mode: String,
    pub chase_phase: Option<String>,
}

impl DebugInfo {
    pub fn lines(&self) -> Vec<String> {
        let mut lines = vec![
            format!("FPS: {:.1}", self.fps),
            format!("Frame time: {:.2} ms", self.frame_time.as_secs_f64() * 1000.0),
            format!("Tick: {}", self.tick),
            format!("Agents: {} ({} visible)", self.agent_count, self.visible_agents),
            format!("Mode: {}", self.mode),
        ];
        if let Some(phase) = &self.chase_phase {
            lines.push(format!("Chase: {}", phase));
        }
        lines
    }
}
