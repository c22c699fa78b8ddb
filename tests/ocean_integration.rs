use rand::rngs::StdRng;
use rand::SeedableRng;
use shoals::params::{OceanParams, World};
use shoals::{AgentKind, Command, FishMode, OceanSimulation, Simulation};

const EPS: f32 = 1e-3;

fn ocean(fish_count: usize, seed: u64) -> OceanSimulation {
    let params = OceanParams {
        fish_count,
        ..OceanParams::default()
    };
    OceanSimulation::with_rng(World::default(), params, StdRng::seed_from_u64(seed))
}

fn assert_speed_bounds(ocean: &OceanSimulation) {
    for fish in ocean.fish() {
        let speed = fish.body.speed();
        assert!(speed <= fish.body.max_speed + EPS, "fish too fast: {speed}");
        let floor = fish.body.speed_floor().unwrap_or(0.0);
        assert!(speed >= floor - EPS, "fish stalled: {speed}");
    }
    for predator in ocean.predators() {
        assert!(predator.body.speed() <= predator.body.max_speed + EPS);
    }
}

#[test]
fn mode_switch_rewrites_caps_before_the_next_tick() {
    let mut ocean = ocean(200, 1);
    ocean.step();

    assert!(ocean.apply(Command::Hunted));
    assert!(ocean
        .fish()
        .iter()
        .all(|f| f.body.max_speed == 3.5 && f.body.max_force == 0.1));

    assert!(ocean.apply(Command::Vortex));
    assert!(ocean
        .fish()
        .iter()
        .all(|f| f.body.max_speed == 5.0 && f.body.max_force == 0.2));

    assert!(ocean.apply(Command::Peaceful));
    assert!(ocean
        .fish()
        .iter()
        .all(|f| f.body.max_speed == 0.8 && f.body.max_force == 0.03));
}

#[test]
fn speeds_stay_within_bounds_in_every_mode() {
    let mut ocean = ocean(300, 2);
    for command in [Command::Peaceful, Command::Hunted, Command::Vortex, Command::Peaceful] {
        ocean.apply(command);
        for _ in 0..60 {
            ocean.step();
            assert_speed_bounds(&ocean);
        }
    }
}

#[test]
fn predators_arrive_once_and_stay() {
    let mut ocean = ocean(100, 3);
    for _ in 0..20 {
        ocean.step();
    }
    assert!(ocean.predators().is_empty());

    ocean.apply(Command::Hunted);
    assert_eq!(ocean.predators().len(), 4);

    ocean.apply(Command::Peaceful);
    ocean.step();
    ocean.apply(Command::Vortex);
    assert_eq!(ocean.predators().len(), 4);
    assert_eq!(ocean.agents().iter().filter(|v| v.kind == AgentKind::PredatorFish).count(), 4);
}

#[test]
fn fish_stay_inside_the_tank() {
    let mut ocean = ocean(300, 4);
    let world = World::default();
    let margin = ocean.params().edge_margin;
    ocean.apply(Command::Vortex);

    for _ in 0..120 {
        ocean.step();
        for fish in ocean.fish() {
            let p = fish.body.position;
            assert!(p.x >= margin - EPS && p.x <= world.width - margin + EPS);
            assert!(p.y >= margin - EPS && p.y <= world.height - margin + EPS);
        }
    }
}

#[test]
fn no_agent_goes_non_finite() {
    let mut ocean = ocean(400, 5);
    ocean.apply(Command::Hunted);
    for _ in 0..200 {
        ocean.step();
    }
    for view in ocean.agents() {
        assert!(view.position.is_finite());
        assert!(view.velocity.is_finite());
    }
}

#[test]
fn same_seed_same_school() {
    let mut a = ocean(150, 6);
    let mut b = ocean(150, 6);
    for sim in [&mut a, &mut b] {
        sim.apply(Command::Hunted);
        for _ in 0..50 {
            sim.step();
        }
    }
    assert_eq!(a.agents(), b.agents());
    assert_eq!(a.mode(), FishMode::Hunted);
}
