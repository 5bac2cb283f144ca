use std::time::Duration;

use clash_conquer_core::{
    Armament, Command, Damage, Event, Health, ProjectileId, Side, TargetId, WorldPoint,
};
use clash_conquer_system_combat::Combat;
use clash_conquer_system_targeting::Targeting;
use clash_conquer_world::{self as world, query, Config, World};

const TICK: Duration = Duration::from_millis(100);
const STEPS: usize = 16;

#[derive(Debug, PartialEq)]
struct ReplayOutcome {
    events: Vec<Event>,
    fired_per_step: Vec<usize>,
}

#[test]
fn deterministic_replay_fortification_wears_down_troop() {
    let first = replay();
    let second = replay();

    assert_eq!(first, second, "replay diverged between runs");
    assert_eq!(first.fired_per_step.len(), STEPS);

    let fired: Vec<ProjectileId> = first
        .events
        .iter()
        .filter_map(|event| match event {
            Event::ProjectileFired { projectile, .. } => Some(*projectile),
            _ => None,
        })
        .collect();
    assert_eq!(
        fired,
        (0..4).map(ProjectileId::new).collect::<Vec<_>>(),
        "shots are spaced by the cooldown"
    );

    let remaining: Vec<Health> = first
        .events
        .iter()
        .filter_map(|event| match event {
            Event::ProjectileHit { remaining, .. } => Some(*remaining),
            _ => None,
        })
        .collect();
    assert_eq!(
        remaining,
        vec![Health::new(20), Health::new(10), Health::ZERO]
    );

    let troop = TargetId::new(1);
    let defeated = first
        .events
        .iter()
        .filter(|event| matches!(event, Event::TargetDefeated { target, .. } if *target == troop))
        .count();
    assert_eq!(defeated, 1);

    let missed: Vec<(ProjectileId, WorldPoint)> = first
        .events
        .iter()
        .filter_map(|event| match event {
            Event::ProjectileMissed {
                projectile,
                position,
                ..
            } => Some((*projectile, *position)),
            _ => None,
        })
        .collect();
    assert_eq!(
        missed,
        vec![(ProjectileId::new(3), WorldPoint::new(100.0, 0.0))],
        "last shot flies on to where the troop fell"
    );
}

fn replay() -> ReplayOutcome {
    let mut world = World::with_config(Config::point_sized());
    let mut targeting = Targeting::new();
    let mut combat = Combat::new();
    let mut engagements = Vec::new();
    let mut commands = Vec::new();
    let mut events = Vec::new();
    let mut fired_per_step = Vec::new();

    for command in setup_commands() {
        world::apply(&mut world, command, &mut events);
    }

    for _ in 0..STEPS {
        let mut generated = Vec::new();
        world::apply(&mut world, Command::Tick { dt: TICK }, &mut generated);

        let targets = query::targets(&world);
        targeting.handle(&targets, &mut engagements);
        combat.handle(&generated, &targets, &engagements, &mut commands);
        events.extend(generated);

        fired_per_step.push(commands.len());
        for command in commands.drain(..) {
            world::apply(&mut world, command, &mut events);
        }
    }

    ReplayOutcome {
        events,
        fired_per_step,
    }
}

fn setup_commands() -> Vec<Command> {
    vec![
        Command::RaiseFortification {
            side: Side::Player,
            position: WorldPoint::new(0.0, 0.0),
            health: Health::new(200),
            armament: Some(Armament::new(
                200.0,
                Duration::from_millis(300),
                Damage::new(10),
                20.0,
            )),
        },
        Command::DeployTroop {
            side: Side::Enemy,
            position: WorldPoint::new(100.0, 0.0),
            health: Health::new(30),
            armament: None,
        },
    ]
}
