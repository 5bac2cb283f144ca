#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Pure system that emits projectile firing commands from engagement data.

use std::{collections::BTreeMap, time::Duration};

use clash_conquer_core::{Command, Engagement, Event, TargetId, TargetView};

/// Combat system that tracks shooter cooldowns and queues firing commands.
#[derive(Debug, Default)]
pub struct Combat {
    cooldowns: BTreeMap<TargetId, Duration>,
    scratch: Vec<Command>,
}

impl Combat {
    /// Creates a new combat system with every shooter ready to fire.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Emits `Command::FireProjectile` entries for engaged shooters that are ready.
    ///
    /// Elapsed time is read from `Event::TimeAdvanced` entries. Shooters missing
    /// from `targets` lose their cooldown state.
    pub fn handle(
        &mut self,
        events: &[Event],
        targets: &TargetView,
        engagements: &[Engagement],
        out: &mut Vec<Command>,
    ) {
        let elapsed = events
            .iter()
            .filter_map(|event| match event {
                Event::TimeAdvanced { dt } => Some(*dt),
                _ => None,
            })
            .fold(Duration::ZERO, Duration::saturating_add);

        self.cooldowns
            .retain(|shooter, _| targets.get(*shooter).is_some());
        for remaining in self.cooldowns.values_mut() {
            *remaining = remaining.saturating_sub(elapsed);
        }

        if engagements.is_empty() {
            return;
        }

        self.scratch.clear();

        for engagement in engagements {
            let Some(armament) = targets
                .get(engagement.shooter)
                .and_then(|snapshot| snapshot.armament)
            else {
                continue;
            };

            if !self.is_ready(engagement.shooter) {
                continue;
            }

            let _ = self
                .cooldowns
                .insert(engagement.shooter, armament.cooldown);
            self.scratch.push(Command::FireProjectile {
                origin: engagement.shooter_position,
                target: engagement.target,
                damage: armament.damage,
                speed: armament.projectile_speed,
            });
        }

        if self.scratch.is_empty() {
            return;
        }

        out.reserve(self.scratch.len());
        out.append(&mut self.scratch);
    }

    /// Time left before the shooter may fire again.
    #[must_use]
    pub fn cooldown_remaining(&self, shooter: TargetId) -> Duration {
        self.cooldowns
            .get(&shooter)
            .copied()
            .unwrap_or(Duration::ZERO)
    }

    fn is_ready(&self, shooter: TargetId) -> bool {
        self.cooldown_remaining(shooter).is_zero()
    }
}
