/*
 * Steering Module
 *
 * The steering behavior library. Every behavior is a function of one agent
 * (plus the neighbors or points it reacts to) that returns a force vector;
 * the agent policies decide how to weight and sum them.
 *
 * Reynolds style throughout: steering = desired velocity - current velocity,
 * limited to the agent's max_force unless a function says otherwise.
 *
 * Degenerate geometry (coincident agents, zero-length averages) never
 * produces NaN: the affected vector is replaced by a small random jitter.
 */

use nannou::prelude::*;
use rand::Rng;

use crate::boid::Boid;
use crate::params::World;
use crate::vector::{direction_or_random, jitter, VecExt, DEGENERATE_LENGTH_SQ, EPSILON};

// Magnitude of the perturbation substituted for directionless vectors
pub const JITTER: f32 = 0.1;

// Calculate separation force (avoid crowding neighbors)
pub fn separation<'a, I, R>(me: &Boid, neighbors: I, radius: f32, rng: &mut R) -> Vec2
where
    I: IntoIterator<Item = &'a Boid>,
    R: Rng + ?Sized,
{
    let mut steering = Vec2::ZERO;
    let mut count = 0;

    for other in neighbors {
        let diff = me.position - other.position;
        let d = diff.length();

        if d < radius {
            if d < EPSILON {
                steering += jitter(rng, JITTER);
            } else {
                // Unit vector away from the neighbor, weighted by 1/d
                steering += diff / (d * d);
            }
            count += 1;
        }
    }

    if count == 0 {
        return Vec2::ZERO;
    }

    steering /= count as f32;
    if steering.length_squared() < DEGENERATE_LENGTH_SQ {
        steering = jitter(rng, JITTER);
    }

    // Implement Reynolds: Steering = Desired - Velocity
    let desired = steering.with_length(me.max_speed);
    (desired - me.velocity).limit(me.max_force)
}

// Calculate cohesion force (steer towards average position of neighbors)
pub fn cohesion<'a, I>(me: &Boid, neighbors: I, radius: f32) -> Vec2
where
    I: IntoIterator<Item = &'a Boid>,
{
    let mut center = Vec2::ZERO;
    let mut count = 0;

    for other in neighbors {
        if me.position.distance(other.position) < radius {
            center += other.position;
            count += 1;
        }
    }

    if count == 0 {
        return Vec2::ZERO;
    }

    let to_center = center / count as f32 - me.position;
    if to_center.is_degenerate() {
        return Vec2::ZERO;
    }

    let desired = to_center.with_length(me.max_speed);
    (desired - me.velocity).limit(me.max_force)
}

// Calculate alignment force (steer towards average heading of neighbors).
// Takes a squared radius to skip the square root per neighbor.
pub fn alignment<'a, I>(me: &Boid, neighbors: I, radius_squared: f32) -> Vec2
where
    I: IntoIterator<Item = &'a Boid>,
{
    let mut heading = Vec2::ZERO;
    let mut count = 0;

    for other in neighbors {
        if me.position.distance_squared(other.position) < radius_squared {
            heading += other.velocity;
            count += 1;
        }
    }

    if count == 0 {
        return Vec2::ZERO;
    }

    heading /= count as f32;
    if heading.is_degenerate() {
        return Vec2::ZERO;
    }

    let desired = heading.with_length(me.max_speed);
    (desired - me.velocity).limit(me.max_force)
}

// Turn away from walls before reaching them. Inside the margin the desired
// velocity's component on that axis becomes `max_speed` pointing away from the
// wall, the other component is kept. The result is limited to
// `max_force * strength`.
pub fn avoid_walls(me: &Boid, world: &World, margin: f32, strength: f32) -> Vec2 {
    let mut desired = me.velocity;
    let mut near_wall = false;

    if me.position.x < margin {
        desired.x = me.max_speed;
        near_wall = true;
    } else if me.position.x > world.width - margin {
        desired.x = -me.max_speed;
        near_wall = true;
    }

    if me.position.y < margin {
        desired.y = me.max_speed;
        near_wall = true;
    } else if me.position.y > world.height - margin {
        desired.y = -me.max_speed;
        near_wall = true;
    }

    if !near_wall {
        return Vec2::ZERO;
    }

    (desired - me.velocity).limit(me.max_force * strength)
}

// Hard boundary: reflect the offending velocity component and clamp the
// position back onto the margin line.
pub fn bounce_edges(me: &mut Boid, world: &World, margin: f32) {
    if me.position.x < margin {
        me.velocity.x = -me.velocity.x;
        me.position.x = margin;
    } else if me.position.x > world.width - margin {
        me.velocity.x = -me.velocity.x;
        me.position.x = world.width - margin;
    }

    if me.position.y < margin {
        me.velocity.y = -me.velocity.y;
        me.position.y = margin;
    } else if me.position.y > world.height - margin {
        me.velocity.y = -me.velocity.y;
        me.position.y = world.height - margin;
    }
}

// Hard-radius collision between two agents. Each is pushed by half the
// overlap along the separation normal, so they end up `hard_radius` apart,
// and both velocities are reflected about the normal and scaled by `damping`.
// Returns whether the pair was overlapping.
pub fn resolve_overlap<R: Rng + ?Sized>(
    a: &mut Boid,
    b: &mut Boid,
    hard_radius: f32,
    damping: f32,
    rng: &mut R,
) -> bool {
    let diff = a.position - b.position;
    let d = diff.length();

    if d >= hard_radius {
        return false;
    }

    if d < EPSILON {
        // Superimposed: no normal to push along, shake them apart instead
        let nudge = jitter(rng, 1.0);
        a.position += nudge;
        b.position -= nudge;
        return true;
    }

    let normal = diff / d;
    let push = normal * ((hard_radius - d) * 0.5);
    a.position += push;
    b.position -= push;

    a.velocity = a.velocity.reflect(normal) * damping;
    b.velocity = b.velocity.reflect(normal) * damping;
    true
}

// Predator patrol around a school centroid, by distance band:
// beyond `far` dive straight at it, inside `near` back off, in between
// circle along the tangent.
pub fn hunt<R: Rng + ?Sized>(me: &Boid, centroid: Vec2, near: f32, far: f32, rng: &mut R) -> Vec2 {
    let to_center = centroid - me.position;
    let dist = to_center.length();

    if dist < EPSILON {
        return jitter(rng, JITTER);
    }

    let heading = to_center / dist;
    let desired = if dist > far {
        heading * me.max_speed
    } else if dist < near {
        -heading * me.max_speed
    } else {
        heading.tangent() * me.max_speed
    };

    (desired - me.velocity).limit(me.max_force)
}

// Predictive pursuit: aim at where the target will be after `lead` ticks.
// Returns `(desired - velocity) * gain` without a force limit.
pub fn intercept<R: Rng + ?Sized>(me: &Boid, target: &Boid, lead: f32, gain: f32, rng: &mut R) -> Vec2 {
    let aim = target.position + target.velocity * lead - me.position;
    let desired = direction_or_random(aim, rng) * me.max_speed;
    (desired - me.velocity) * gain
}

// Full-speed steering toward a point, unlimited. Zero once on the point.
pub fn seek(me: &Boid, point: Vec2) -> Vec2 {
    let to_point = point - me.position;
    if to_point.is_degenerate() {
        return Vec2::ZERO;
    }
    to_point.with_length(me.max_speed) - me.velocity
}

// Run from a threat within `radius` at `boost` times max speed.
pub fn flee<R: Rng + ?Sized>(me: &Boid, threat: Vec2, radius: f32, boost: f32, rng: &mut R) -> Vec2 {
    let away = me.position - threat;
    if away.length_squared() >= radius * radius {
        return Vec2::ZERO;
    }
    direction_or_random(away, rng) * me.max_speed * boost - me.velocity
}

// Circle `center` on a ring: tangential push plus a radial spring toward
// `ring_radius`.
pub fn orbit(me: &Boid, center: Vec2, tangential: f32, ring_radius: f32, radial_gain: f32) -> Vec2 {
    let to_center = center - me.position;
    let dist = to_center.length();
    if dist < EPSILON {
        return Vec2::ZERO;
    }
    let heading = to_center / dist;
    heading.tangent() * tangential + heading * ((dist - ring_radius) * radial_gain)
}

// Whirlpool drift: swirl along the tangent with a constant pull inward.
pub fn vortex(me: &Boid, center: Vec2, swirl: f32, pull: f32) -> Vec2 {
    let to_center = center - me.position;
    if to_center.is_degenerate() {
        return Vec2::ZERO;
    }
    let heading = to_center.normalize();
    heading.tangent() * swirl + heading * pull
}

// Soft spacing between large predators. Like `separation` but over a wider
// radius with its own force cap.
pub fn predator_separation<'a, I>(me: &Boid, neighbors: I, soft_radius: f32, max_force: f32) -> Vec2
where
    I: IntoIterator<Item = &'a Boid>,
{
    let mut steering = Vec2::ZERO;
    let mut count = 0;

    for other in neighbors {
        let diff = me.position - other.position;
        let dist_squared = diff.length_squared();

        if dist_squared > 0.0 && dist_squared < soft_radius * soft_radius {
            // Force is stronger when closer
            steering += diff / dist_squared;
            count += 1;
        }
    }

    if count == 0 {
        return Vec2::ZERO;
    }

    steering /= count as f32;
    if steering.is_degenerate() {
        return Vec2::ZERO;
    }

    (steering.with_length(me.max_speed) - me.velocity).limit(max_force)
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    fn boid_at(x: f32, y: f32) -> Boid {
        Boid::new(pt2(x, y), Vec2::ZERO, 3.0, 0.15)
    }

    fn world() -> World {
        World { width: 800.0, height: 600.0 }
    }

    #[test]
    fn separation_pushes_away_from_close_neighbor() {
        let mut rng = StdRng::seed_from_u64(1);
        let me = boid_at(100.0, 100.0);
        let other = boid_at(110.0, 100.0);
        let force = separation(&me, [&other], 25.0, &mut rng);
        assert!(force.x < 0.0);
        assert!(force.length() <= me.max_force + 1e-5);
    }

    #[test]
    fn separation_of_coincident_agents_is_finite_and_nonzero() {
        let mut rng = StdRng::seed_from_u64(2);
        let me = boid_at(50.0, 50.0);
        let twin = boid_at(50.0, 50.0);
        for _ in 0..100 {
            let force = separation(&me, [&twin], 25.0, &mut rng);
            assert!(force.is_finite());
            assert!(force.length() > 0.0);
        }
    }

    #[test]
    fn separation_ignores_distant_agents() {
        let mut rng = StdRng::seed_from_u64(3);
        let me = boid_at(0.0, 0.0);
        let far = boid_at(100.0, 0.0);
        assert_eq!(separation(&me, [&far], 25.0, &mut rng), Vec2::ZERO);
    }

    #[test]
    fn cohesion_steers_toward_centroid() {
        let me = boid_at(0.0, 0.0);
        let a = boid_at(10.0, 10.0);
        let b = boid_at(10.0, -10.0);
        let force = cohesion(&me, [&a, &b], 50.0);
        assert!(force.x > 0.0);
        assert!(force.y.abs() < 1e-5);
        assert!(force.length() <= me.max_force + 1e-5);
    }

    #[test]
    fn cohesion_near_zero_is_finite() {
        let mut me = boid_at(10.0, 10.0);
        me.velocity = vec2(1e-7, 0.0);
        let twin = boid_at(10.0, 10.0);
        let force = cohesion(&me, [&twin], 50.0);
        assert!(force.is_finite());
        assert_eq!(force, Vec2::ZERO);
        assert_eq!(cohesion(&me, std::iter::empty(), 50.0), Vec2::ZERO);
    }

    #[test]
    fn alignment_matches_neighbor_heading() {
        let me = boid_at(0.0, 0.0);
        let mut other = boid_at(20.0, 0.0);
        other.velocity = vec2(0.0, 2.0);
        let force = alignment(&me, [&other], 2500.0);
        assert!(force.y > 0.0);
        assert!(force.x.abs() < 1e-5);

        let mut distant = boid_at(60.0, 0.0);
        distant.velocity = vec2(0.0, 2.0);
        assert_eq!(alignment(&me, [&distant], 2500.0), Vec2::ZERO);
    }

    #[test]
    fn avoid_walls_turns_back_inside_margin() {
        let mut me = boid_at(10.0, 300.0);
        me.velocity = vec2(-2.0, 1.0);
        let force = avoid_walls(&me, &world(), 50.0, 1.0);
        assert!(force.x > 0.0);
        assert!(force.y.abs() < 1e-5);
        assert!(force.length() <= me.max_force + 1e-5);

        let centre = boid_at(400.0, 300.0);
        assert_eq!(avoid_walls(&centre, &world(), 50.0, 1.0), Vec2::ZERO);
    }

    #[test]
    fn bounce_reflects_and_clamps() {
        let mut me = boid_at(790.0, 20.0);
        me.velocity = vec2(3.0, -1.0);
        bounce_edges(&mut me, &world(), 50.0);
        assert_eq!(me.position, pt2(750.0, 50.0));
        assert_eq!(me.velocity, vec2(-3.0, 1.0));
    }

    #[test]
    fn resolve_overlap_restores_hard_radius_and_damps() {
        let mut rng = StdRng::seed_from_u64(4);
        let mut a = boid_at(100.0, 100.0);
        let mut b = boid_at(105.0, 100.0);
        a.velocity = vec2(2.0, 1.0);
        b.velocity = vec2(-1.5, 0.5);

        let normal = (a.position - b.position).normalize();
        let before_a = a.velocity.dot(normal);
        let before_b = b.velocity.dot(normal);

        assert!(resolve_overlap(&mut a, &mut b, 12.0, 0.8, &mut rng));

        assert!((a.position.distance(b.position) - 12.0).abs() < 1e-4);
        assert!((a.velocity.dot(normal) + 0.8 * before_a).abs() < 1e-5);
        assert!((b.velocity.dot(normal) + 0.8 * before_b).abs() < 1e-5);
    }

    #[test]
    fn resolve_overlap_shakes_stacked_agents_apart() {
        let mut rng = StdRng::seed_from_u64(6);
        let mut a = boid_at(40.0, 40.0);
        let mut b = boid_at(40.0, 40.0);
        a.velocity = vec2(1.0, -2.0);
        b.velocity = vec2(0.5, 0.5);

        assert!(resolve_overlap(&mut a, &mut b, 12.0, 0.8, &mut rng));

        assert!(a.position.is_finite() && b.position.is_finite());
        // Each side moves by half to all of the unit jitter, in opposite directions
        let gap = a.position.distance(b.position);
        assert!(gap >= 1.0 - 1e-5 && gap <= 2.0 + 1e-5);
        assert!((a.position + b.position - pt2(80.0, 80.0)).length() < 1e-4);
        assert_eq!(a.velocity, vec2(1.0, -2.0));
        assert_eq!(b.velocity, vec2(0.5, 0.5));
    }

    #[test]
    fn resolve_overlap_leaves_separated_pairs_alone() {
        let mut rng = StdRng::seed_from_u64(5);
        let mut a = boid_at(0.0, 0.0);
        let mut b = boid_at(20.0, 0.0);
        assert!(!resolve_overlap(&mut a, &mut b, 12.0, 0.8, &mut rng));
        assert_eq!(a.position, pt2(0.0, 0.0));
    }

    #[test]
    fn hunt_bands() {
        let mut rng = StdRng::seed_from_u64(6);
        let centroid = vec2(0.0, 0.0);

        let far = Boid::new(pt2(500.0, 0.0), Vec2::ZERO, 5.0, 10.0);
        assert!(hunt(&far, centroid, 300.0, 400.0, &mut rng).x < 0.0);

        let near = Boid::new(pt2(100.0, 0.0), Vec2::ZERO, 5.0, 10.0);
        assert!(hunt(&near, centroid, 300.0, 400.0, &mut rng).x > 0.0);

        let middle = Boid::new(pt2(350.0, 0.0), Vec2::ZERO, 5.0, 10.0);
        let orbiting = hunt(&middle, centroid, 300.0, 400.0, &mut rng);
        assert!(orbiting.x.abs() < 1e-4);
        assert!(orbiting.y.abs() > 0.0);
    }

    #[test]
    fn intercept_leads_the_target() {
        let mut rng = StdRng::seed_from_u64(7);
        let hunter = Boid::new(pt2(0.0, 0.0), Vec2::ZERO, 10.0, 1.0);
        let mut prey = Boid::new(pt2(100.0, 0.0), vec2(0.0, 20.0), 10.0, 1.0);
        let force = intercept(&hunter, &prey, 2.0, 1.0, &mut rng);
        // Aims at (100, 40), not (100, 0)
        assert!(force.y > 0.0 && force.x > 0.0);

        prey.position = hunter.position;
        prey.velocity = Vec2::ZERO;
        assert!(intercept(&hunter, &prey, 2.0, 8.0, &mut rng).is_finite());
    }

    #[test]
    fn flee_only_inside_radius() {
        let mut rng = StdRng::seed_from_u64(8);
        let me = boid_at(0.0, 0.0);
        assert!(flee(&me, vec2(100.0, 0.0), 150.0, 1.5, &mut rng).x < 0.0);
        assert_eq!(flee(&me, vec2(200.0, 0.0), 150.0, 1.5, &mut rng), Vec2::ZERO);
    }

    #[test]
    fn predator_separation_uses_its_own_cap() {
        let me = Boid::new(pt2(0.0, 0.0), Vec2::ZERO, 5.0, 10.0);
        let other = Boid::new(pt2(30.0, 0.0), Vec2::ZERO, 5.0, 10.0);
        let force = predator_separation(&me, [&other], 120.0, 0.2);
        assert!(force.x < 0.0);
        assert!((force.length() - 0.2).abs() < 1e-5);
    }
}
