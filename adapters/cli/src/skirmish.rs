use std::fmt;

use clash_conquer_core::{
    Command, Event, Side, TargetKind, TargetSnapshot, TargetView, WELCOME_BANNER,
};
use clash_conquer_system_combat::Combat;
use clash_conquer_system_targeting::Targeting;
use clash_conquer_world::{self as world, query, World};
use serde::Serialize;
use tracing::info;

use crate::scenario::Scenario;

/// Outcome of a headless skirmish.
#[derive(Clone, Debug, Default, PartialEq, Serialize)]
pub(crate) struct Summary {
    seed: u64,
    ticks_run: u64,
    projectiles_fired: u32,
    hits: u32,
    misses: u32,
    damage_dealt: u64,
    rejected_commands: u32,
    winner: Option<Side>,
    defeated: Vec<Casualty>,
    survivors: Vec<Survivor>,
}

#[derive(Clone, Copy, Debug, PartialEq, Serialize)]
struct Casualty {
    target: u32,
    kind: TargetKind,
    tick: u64,
}

#[derive(Clone, Copy, Debug, PartialEq, Serialize)]
struct Survivor {
    target: u32,
    kind: TargetKind,
    side: Side,
    health: u32,
    max_health: u32,
}

impl From<&TargetSnapshot> for Survivor {
    fn from(snapshot: &TargetSnapshot) -> Self {
        Self {
            target: snapshot.id.get(),
            kind: snapshot.kind,
            side: snapshot.side,
            health: snapshot.health.get(),
            max_health: snapshot.max_health.get(),
        }
    }
}

impl Summary {
    fn record(&mut self, events: &[Event], tick: u64) {
        for event in events {
            match event {
                Event::ProjectileFired { .. } => {
                    self.projectiles_fired = self.projectiles_fired.saturating_add(1);
                }
                Event::ProjectileHit { damage, .. } => {
                    self.hits = self.hits.saturating_add(1);
                    self.damage_dealt = self.damage_dealt.saturating_add(u64::from(damage.get()));
                }
                Event::ProjectileMissed { .. } => {
                    self.misses = self.misses.saturating_add(1);
                }
                Event::TargetDefeated { target, kind } => self.defeated.push(Casualty {
                    target: target.get(),
                    kind: *kind,
                    tick,
                }),
                Event::FireRejected { .. }
                | Event::DeployRejected { .. }
                | Event::MoveRejected { .. }
                | Event::RemovalRejected { .. } => {
                    self.rejected_commands = self.rejected_commands.saturating_add(1);
                }
                Event::TimeAdvanced { .. }
                | Event::TargetDeployed { .. }
                | Event::TroopMoved { .. }
                | Event::TargetRemoved { .. } => {}
            }
        }
    }
}

impl fmt::Display for Summary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "{WELCOME_BANNER}")?;
        writeln!(f, "seed {} ran for {} ticks", self.seed, self.ticks_run)?;
        writeln!(
            f,
            "projectiles: {} fired, {} hit, {} missed ({} damage dealt)",
            self.projectiles_fired, self.hits, self.misses, self.damage_dealt
        )?;
        if self.rejected_commands > 0 {
            writeln!(f, "rejected commands: {}", self.rejected_commands)?;
        }
        for casualty in &self.defeated {
            writeln!(
                f,
                "  tick {:>5}: {:?} #{} defeated",
                casualty.tick, casualty.kind, casualty.target
            )?;
        }
        for survivor in &self.survivors {
            writeln!(
                f,
                "  {:?} {:?} #{} holds {}/{}",
                survivor.side, survivor.kind, survivor.target, survivor.health, survivor.max_health
            )?;
        }
        match self.winner {
            Some(side) => writeln!(f, "winner: {side:?}"),
            None => writeln!(f, "no winner"),
        }
    }
}

/// Deploys the scenario and simulates up to `ticks` ticks.
///
/// The run stops early once only one side has targets left, provided both
/// sides were present at the start.
pub(crate) fn run(scenario: &Scenario, ticks: u64, seed: u64) -> Summary {
    let mut world = World::new();
    let mut events = Vec::new();
    let mut summary = Summary {
        seed,
        ..Summary::default()
    };

    for command in scenario.deployment(seed) {
        world::apply(&mut world, command, &mut events);
    }
    summary.record(&events, 0);
    events.clear();

    let opening = query::targets(&world);
    let contested = remaining_side(&opening).is_none() && !opening.is_empty();
    info!(seed, ticks, targets = opening.len(), "skirmish started");

    let dt = scenario.tick_length();
    let mut targeting = Targeting::new();
    let mut combat = Combat::new();
    let mut engagements = Vec::new();
    let mut commands: Vec<Command> = Vec::new();

    for _ in 0..ticks {
        world::apply(&mut world, Command::Tick { dt }, &mut events);

        let targets = query::targets(&world);
        targeting.handle(&targets, &mut engagements);
        combat.handle(&events, &targets, &engagements, &mut commands);
        for command in commands.drain(..) {
            world::apply(&mut world, command, &mut events);
        }

        summary.record(&events, query::tick_index(&world));
        events.clear();

        if contested {
            if let Some(side) = remaining_side(&query::targets(&world)) {
                summary.winner = Some(side);
                break;
            }
        }
    }

    summary.ticks_run = query::tick_index(&world);
    summary.survivors = query::targets(&world)
        .iter()
        .map(Survivor::from)
        .collect();

    info!(
        ticks_run = summary.ticks_run,
        hits = summary.hits,
        misses = summary.misses,
        defeated = summary.defeated.len(),
        winner = ?summary.winner,
        "skirmish finished"
    );

    summary
}

/// Side that still holds the battlefield when its opponent has no targets left.
fn remaining_side(targets: &TargetView) -> Option<Side> {
    let player = targets.iter().any(|target| target.side == Side::Player);
    let enemy = targets.iter().any(|target| target.side == Side::Enemy);
    match (player, enemy) {
        (true, false) => Some(Side::Player),
        (false, true) => Some(Side::Enemy),
        _ => None,
    }
}
