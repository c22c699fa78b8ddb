/*
 * Physics Module
 *
 * The seam between the simulation contexts and whoever drives them: the
 * commands they accept, the read-only agent views they publish each tick,
 * and the Simulation trait the frame loop calls.
 *
 * One tick of any context is: rebuild the spatial grid from the current
 * positions, then update every agent in index order against that grid.
 * Agents move in place during the pass, so later agents see earlier agents'
 * new positions while the grid itself stays a start-of-tick snapshot.
 */

use nannou::prelude::*;

use crate::boid::Boid;
use crate::params::World;

// Discrete mode-change commands accepted by the simulation contexts.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Command {
    // Ocean
    Peaceful,
    Hunted,
    Vortex,
    // Sky
    Scout,
    Hunt,
    ToggleHunt,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum AgentKind {
    Fish,
    PredatorFish,
    Bird,
    PredatorBird,
}

// What the renderer gets to see of one agent after a tick.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct AgentView {
    pub kind: AgentKind,
    pub position: Point2,
    pub velocity: Vec2,
    pub is_bursting: bool,
    pub is_swooping: bool,
    pub is_gliding: bool,
    pub is_targeted: bool,
}

impl AgentView {
    pub fn new(kind: AgentKind, body: &Boid) -> Self {
        Self {
            kind,
            position: body.position,
            velocity: body.velocity,
            is_bursting: false,
            is_swooping: false,
            is_gliding: false,
            is_targeted: false,
        }
    }
}

pub trait Simulation {
    // Advance one tick.
    fn step(&mut self);

    // Apply a mode command at the tick boundary. Returns `false` when the
    // command does not belong to this context.
    fn apply(&mut self, command: Command) -> bool;

    fn agents(&self) -> Vec<AgentView>;

    fn world(&self) -> World;

    // Ticks elapsed since construction
    fn tick(&self) -> u64;

    // Short label of the current mode for debug readouts
    fn mode_label(&self) -> String;
}

// Mean position of a set of bodies, `None` when empty.
pub fn centroid<'a, I>(bodies: I) -> Option<Vec2>
where
    I: IntoIterator<Item = &'a Boid>,
{
    let mut sum = Vec2::ZERO;
    let mut count = 0usize;
    for body in bodies {
        sum += body.position;
        count += 1;
    }
    (count > 0).then(|| sum / count as f32)
}

// Two distinct mutable elements of a slice.
pub fn pair_mut<T>(items: &mut [T], i: usize, j: usize) -> (&mut T, &mut T) {
    debug_assert_ne!(i, j);
    if i < j {
        let (head, tail) = items.split_at_mut(j);
        (&mut head[i], &mut tail[0])
    } else {
        let (head, tail) = items.split_at_mut(i);
        (&mut tail[0], &mut head[j])
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn centroid_of_nothing_is_none() {
        assert_eq!(centroid(std::iter::empty()), None);
    }

    #[test]
    fn centroid_is_mean_position() {
        let a = Boid::new(pt2(0.0, 0.0), Vec2::ZERO, 1.0, 1.0);
        let b = Boid::new(pt2(10.0, 20.0), Vec2::ZERO, 1.0, 1.0);
        assert_eq!(centroid([&a, &b]), Some(vec2(5.0, 10.0)));
    }

    #[test]
    fn pair_mut_returns_requested_order() {
        let mut items = vec![1, 2, 3, 4];
        {
            let (a, b) = pair_mut(&mut items, 3, 1);
            assert_eq!((*a, *b), (4, 2));
            *a = 40;
            *b = 20;
        }
        assert_eq!(items, vec![1, 20, 3, 40]);
    }
}
