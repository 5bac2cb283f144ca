#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Authoritative world state management for Clash and Conquer.

mod targets;

use clash_conquer_core::{
    Armament, Command, Damage, DeployRejection, Event, Extent, FireRejection, Health, ProjectileId,
    RemovalRejection, Side, TargetId, TargetKind, WorldPoint, WELCOME_BANNER,
};
use clash_conquer_system_projectile::{Flight, Launch, Projectile};
use tracing::{debug, info};

use self::targets::{Fortification, TargetEntry, TargetRegistry, Troop};

const PROJECTILE_WIDTH: f32 = 12.0;
const PROJECTILE_HEIGHT: f32 = 4.0;
const TROOP_SIZE: f32 = 24.0;
const FORTIFICATION_SIZE: f32 = 80.0;

/// Bounding extents the world assigns to newly created entities.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Config {
    projectile_extent: Extent,
    troop_extent: Extent,
    fortification_extent: Extent,
}

impl Config {
    /// Creates a configuration from explicit extents.
    #[must_use]
    pub const fn new(
        projectile_extent: Extent,
        troop_extent: Extent,
        fortification_extent: Extent,
    ) -> Self {
        Self {
            projectile_extent,
            troop_extent,
            fortification_extent,
        }
    }

    /// Configuration where every entity is a single point, so hits register
    /// only when a projectile lands exactly on its target.
    #[must_use]
    pub const fn point_sized() -> Self {
        Self::new(Extent::POINT, Extent::POINT, Extent::POINT)
    }

    /// Half-size assigned to projectiles.
    #[must_use]
    pub const fn projectile_extent(&self) -> Extent {
        self.projectile_extent
    }

    /// Half-size assigned to troops.
    #[must_use]
    pub const fn troop_extent(&self) -> Extent {
        self.troop_extent
    }

    /// Half-size assigned to fortifications.
    #[must_use]
    pub const fn fortification_extent(&self) -> Extent {
        self.fortification_extent
    }

    /// Largest per-tick speed at which a projectile homing on a stationary
    /// target cannot step over it.
    ///
    /// A projectile heading for a target's centre overlaps it along a segment
    /// at least twice the smaller combined half-size long. Faster projectiles
    /// may land on alternate sides of the target every tick and stay in flight
    /// for as long as the target lives.
    #[must_use]
    pub fn max_reliable_speed(&self) -> f32 {
        let projectile = self.projectile_extent;
        [self.troop_extent, self.fortification_extent]
            .iter()
            .map(|target| {
                let width = projectile.half_width() + target.half_width();
                let height = projectile.half_height() + target.half_height();
                2.0 * width.min(height)
            })
            .fold(f32::INFINITY, f32::min)
    }
}

impl Default for Config {
    fn default() -> Self {
        Self::new(
            Extent::from_size(PROJECTILE_WIDTH, PROJECTILE_HEIGHT),
            Extent::from_size(TROOP_SIZE, TROOP_SIZE),
            Extent::from_size(FORTIFICATION_SIZE, FORTIFICATION_SIZE),
        )
    }
}

/// Represents the authoritative Clash and Conquer world state.
#[derive(Debug)]
pub struct World {
    banner: &'static str,
    config: Config,
    targets: TargetRegistry,
    projectiles: Vec<Projectile>,
    next_projectile_id: Option<ProjectileId>,
    tick_index: u64,
}

impl World {
    /// Creates a new empty battlefield using the default entity extents.
    #[must_use]
    pub fn new() -> Self {
        Self::with_config(Config::default())
    }

    /// Creates a new empty battlefield using the provided configuration.
    #[must_use]
    pub fn with_config(config: Config) -> Self {
        Self {
            banner: WELCOME_BANNER,
            config,
            targets: TargetRegistry::new(),
            projectiles: Vec::new(),
            next_projectile_id: Some(ProjectileId::new(0)),
            tick_index: 0,
        }
    }

    fn allocate_projectile_id(&mut self) -> Option<ProjectileId> {
        let id = self.next_projectile_id?;
        self.next_projectile_id = id.get().checked_add(1).map(ProjectileId::new);
        Some(id)
    }

    fn deploy(
        &mut self,
        kind: TargetKind,
        side: Side,
        position: WorldPoint,
        health: Health,
        armament: Option<Armament>,
        out_events: &mut Vec<Event>,
    ) {
        if !position.is_finite() {
            reject_deploy(kind, DeployRejection::InvalidPosition, out_events);
            return;
        }

        let entry = match kind {
            TargetKind::Troop => TargetEntry::Troop(Troop {
                side,
                position,
                extent: self.config.troop_extent,
                health,
                max_health: health,
                armament,
            }),
            TargetKind::Fortification => TargetEntry::Fortification(Fortification {
                side,
                position,
                extent: self.config.fortification_extent,
                health,
                max_health: health,
                armament,
            }),
        };
        let Some(target) = self.targets.insert(entry) else {
            reject_deploy(kind, DeployRejection::IdentifiersExhausted, out_events);
            return;
        };
        out_events.push(Event::TargetDeployed {
            target,
            kind,
            side,
            position,
        });
    }

    fn fire(
        &mut self,
        origin: WorldPoint,
        target: TargetId,
        damage: Damage,
        speed: f32,
        out_events: &mut Vec<Event>,
    ) -> Result<(), FireRejection> {
        let target_position = self
            .targets
            .get(target)
            .map(TargetEntry::position)
            .ok_or(FireRejection::MissingTarget)?;
        if !origin.is_finite() {
            return Err(FireRejection::InvalidOrigin);
        }
        if !(speed.is_finite() && speed > 0.0) {
            return Err(FireRejection::InvalidSpeed);
        }
        if damage.is_zero() {
            return Err(FireRejection::ZeroDamage);
        }
        let id = self
            .allocate_projectile_id()
            .ok_or(FireRejection::IdentifiersExhausted)?;

        self.projectiles.push(Projectile::launch(Launch {
            id,
            origin,
            target,
            target_position,
            damage,
            speed,
            extent: self.config.projectile_extent,
        }));
        out_events.push(Event::ProjectileFired {
            projectile: id,
            target,
            origin,
        });
        Ok(())
    }

    fn advance_projectiles(&mut self, out_events: &mut Vec<Event>) {
        let Self {
            targets,
            projectiles,
            ..
        } = self;

        for projectile in projectiles.iter_mut() {
            match projectile.advance(&mut *targets) {
                Flight::InFlight => {}
                Flight::Hit {
                    target,
                    damage,
                    remaining,
                } => {
                    debug!(
                        projectile_id = projectile.id().get(),
                        target_id = target.get(),
                        damage = damage.get(),
                        remaining = remaining.get(),
                        "projectile hit"
                    );
                    out_events.push(Event::ProjectileHit {
                        projectile: projectile.id(),
                        target,
                        damage,
                        remaining,
                    });
                }
                Flight::Miss { target, position } => {
                    debug!(
                        projectile_id = projectile.id().get(),
                        target_id = target.get(),
                        "projectile missed vanished target"
                    );
                    out_events.push(Event::ProjectileMissed {
                        projectile: projectile.id(),
                        target,
                        position,
                    });
                }
            }
        }

        projectiles.retain(|projectile| projectile.resolution().is_none());

        for (target, kind) in targets.remove_depleted() {
            info!(target_id = target.get(), ?kind, "target defeated");
            out_events.push(Event::TargetDefeated { target, kind });
        }
    }
}

/// Applies the provided command to the world, mutating state deterministically.
pub fn apply(world: &mut World, command: Command, out_events: &mut Vec<Event>) {
    match command {
        Command::Tick { dt } => {
            world.tick_index = world.tick_index.saturating_add(1);
            out_events.push(Event::TimeAdvanced { dt });
            world.advance_projectiles(out_events);
        }
        Command::DeployTroop {
            side,
            position,
            health,
            armament,
        } => world.deploy(
            TargetKind::Troop,
            side,
            position,
            health,
            armament,
            out_events,
        ),
        Command::RaiseFortification {
            side,
            position,
            health,
            armament,
        } => world.deploy(
            TargetKind::Fortification,
            side,
            position,
            health,
            armament,
            out_events,
        ),
        Command::MoveTroop { troop, to } => match world.targets.relocate(troop, to) {
            Ok(from) => out_events.push(Event::TroopMoved { troop, from, to }),
            Err(reason) => {
                debug!(troop_id = troop.get(), ?reason, "move rejected");
                out_events.push(Event::MoveRejected { troop, reason });
            }
        },
        Command::RemoveTarget { target } => match world.targets.remove(target) {
            Some(kind) => out_events.push(Event::TargetRemoved { target, kind }),
            None => {
                debug!(target_id = target.get(), "removal rejected");
                out_events.push(Event::RemovalRejected {
                    target,
                    reason: RemovalRejection::MissingTarget,
                });
            }
        },
        Command::FireProjectile {
            origin,
            target,
            damage,
            speed,
        } => {
            if let Err(reason) = world.fire(origin, target, damage, speed, out_events) {
                debug!(target_id = target.get(), ?reason, "fire rejected");
                out_events.push(Event::FireRejected { target, reason });
            }
        }
    }
}

fn reject_deploy(kind: TargetKind, reason: DeployRejection, out_events: &mut Vec<Event>) {
    debug!(?kind, ?reason, "deployment rejected");
    out_events.push(Event::DeployRejected { kind, reason });
}

/// Query functions that provide read-only access to the world state.
pub mod query {
    use super::World;
    use clash_conquer_core::{ProjectileView, TargetId, TargetSnapshot, TargetView};

    /// Retrieves the welcome banner that adapters may display to players.
    #[must_use]
    pub fn welcome_banner(world: &World) -> &'static str {
        world.banner
    }

    /// Number of ticks processed since the world was created.
    #[must_use]
    pub fn tick_index(world: &World) -> u64 {
        world.tick_index
    }

    /// Captures a read-only view of every troop and fortification.
    #[must_use]
    pub fn targets(world: &World) -> TargetView {
        TargetView::from_snapshots(world.targets.snapshots())
    }

    /// Captures the state of a single target, if it is still on the battlefield.
    #[must_use]
    pub fn target(world: &World, id: TargetId) -> Option<TargetSnapshot> {
        world.targets.snapshot(id)
    }

    /// Captures a read-only view of every projectile in flight.
    #[must_use]
    pub fn projectiles(world: &World) -> ProjectileView {
        ProjectileView::from_snapshots(
            world
                .projectiles
                .iter()
                .map(|projectile| projectile.snapshot())
                .collect(),
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use clash_conquer_core::{Damage, TargetId, DEFAULT_PROJECTILE_DAMAGE};
    use std::time::Duration;

    fn deploy_enemy(world: &mut World, position: WorldPoint, health: u32) -> TargetId {
        let mut events = Vec::new();
        apply(
            world,
            Command::DeployTroop {
                side: Side::Enemy,
                position,
                health: Health::new(health),
                armament: None,
            },
            &mut events,
        );
        match events.as_slice() {
            [Event::TargetDeployed { target, .. }] => *target,
            other => panic!("unexpected deployment events: {other:?}"),
        }
    }

    #[test]
    fn deployment_allocates_sequential_identifiers() {
        let mut world = World::new();
        let first = deploy_enemy(&mut world, WorldPoint::new(0.0, 0.0), 10);
        let second = deploy_enemy(&mut world, WorldPoint::new(1.0, 0.0), 10);
        assert_eq!(first, TargetId::new(0));
        assert_eq!(second, TargetId::new(1));
        assert_eq!(query::targets(&world).len(), 2);
    }

    #[test]
    fn fire_rejections_name_their_reason() {
        let mut world = World::new();
        let target = deploy_enemy(&mut world, WorldPoint::new(50.0, 0.0), 10);
        let mut events = Vec::new();

        for (damage, speed) in [
            (DEFAULT_PROJECTILE_DAMAGE, 0.0),
            (DEFAULT_PROJECTILE_DAMAGE, f32::NAN),
        ] {
            apply(
                &mut world,
                Command::FireProjectile {
                    origin: WorldPoint::new(0.0, 0.0),
                    target,
                    damage,
                    speed,
                },
                &mut events,
            );
        }
        apply(
            &mut world,
            Command::FireProjectile {
                origin: WorldPoint::new(0.0, 0.0),
                target,
                damage: Damage::new(0),
                speed: 5.0,
            },
            &mut events,
        );
        apply(
            &mut world,
            Command::FireProjectile {
                origin: WorldPoint::new(0.0, 0.0),
                target: TargetId::new(77),
                damage: DEFAULT_PROJECTILE_DAMAGE,
                speed: 5.0,
            },
            &mut events,
        );

        assert_eq!(
            events,
            vec![
                Event::FireRejected {
                    target,
                    reason: FireRejection::InvalidSpeed,
                },
                Event::FireRejected {
                    target,
                    reason: FireRejection::InvalidSpeed,
                },
                Event::FireRejected {
                    target,
                    reason: FireRejection::ZeroDamage,
                },
                Event::FireRejected {
                    target: TargetId::new(77),
                    reason: FireRejection::MissingTarget,
                },
            ]
        );
        assert!(query::projectiles(&world).is_empty());
    }

    #[test]
    fn non_finite_origin_is_rejected() {
        let mut world = World::new();
        let target = deploy_enemy(&mut world, WorldPoint::new(50.0, 0.0), 10);
        let mut events = Vec::new();

        for origin in [
            WorldPoint::new(f32::NAN, 0.0),
            WorldPoint::new(0.0, f32::INFINITY),
        ] {
            apply(
                &mut world,
                Command::FireProjectile {
                    origin,
                    target,
                    damage: DEFAULT_PROJECTILE_DAMAGE,
                    speed: 10.0,
                },
                &mut events,
            );
        }

        assert_eq!(
            events,
            vec![
                Event::FireRejected {
                    target,
                    reason: FireRejection::InvalidOrigin,
                };
                2
            ]
        );
        assert!(query::projectiles(&world).is_empty());
    }

    #[test]
    fn non_finite_positions_are_not_deployed() {
        let mut world = World::new();
        let mut events = Vec::new();

        apply(
            &mut world,
            Command::DeployTroop {
                side: Side::Enemy,
                position: WorldPoint::new(f32::NAN, 3.0),
                health: Health::new(10),
                armament: None,
            },
            &mut events,
        );
        apply(
            &mut world,
            Command::RaiseFortification {
                side: Side::Player,
                position: WorldPoint::new(0.0, f32::NEG_INFINITY),
                health: Health::new(10),
                armament: None,
            },
            &mut events,
        );

        assert_eq!(
            events,
            vec![
                Event::DeployRejected {
                    kind: TargetKind::Troop,
                    reason: DeployRejection::InvalidPosition,
                },
                Event::DeployRejected {
                    kind: TargetKind::Fortification,
                    reason: DeployRejection::InvalidPosition,
                },
            ]
        );
        assert!(query::targets(&world).is_empty());
    }

    #[test]
    fn projectile_identifiers_are_never_reused() {
        let mut world = World::new();
        let target = deploy_enemy(&mut world, WorldPoint::new(50.0, 0.0), 10);
        world.next_projectile_id = Some(ProjectileId::new(u32::MAX));
        let mut events = Vec::new();

        for _ in 0..2 {
            apply(
                &mut world,
                Command::FireProjectile {
                    origin: WorldPoint::new(0.0, 0.0),
                    target,
                    damage: DEFAULT_PROJECTILE_DAMAGE,
                    speed: 5.0,
                },
                &mut events,
            );
        }

        assert_eq!(
            events,
            vec![
                Event::ProjectileFired {
                    projectile: ProjectileId::new(u32::MAX),
                    target,
                    origin: WorldPoint::new(0.0, 0.0),
                },
                Event::FireRejected {
                    target,
                    reason: FireRejection::IdentifiersExhausted,
                },
            ]
        );
        assert_eq!(query::projectiles(&world).len(), 1);
    }

    #[test]
    fn reliable_speed_follows_smallest_overlap() {
        assert_eq!(Config::default().max_reliable_speed(), 28.0);
        assert_eq!(Config::point_sized().max_reliable_speed(), 0.0);
    }

    #[test]
    fn tick_advances_clock() {
        let mut world = World::new();
        let mut events = Vec::new();
        apply(
            &mut world,
            Command::Tick {
                dt: Duration::from_millis(16),
            },
            &mut events,
        );
        assert_eq!(query::tick_index(&world), 1);
        assert_eq!(
            events,
            vec![Event::TimeAdvanced {
                dt: Duration::from_millis(16)
            }]
        );
    }

    #[test]
    fn removing_missing_target_is_rejected() {
        let mut world = World::new();
        let mut events = Vec::new();
        apply(
            &mut world,
            Command::RemoveTarget {
                target: TargetId::new(3),
            },
            &mut events,
        );
        assert_eq!(
            events,
            vec![Event::RemovalRejected {
                target: TargetId::new(3),
                reason: RemovalRejection::MissingTarget,
            }]
        );
    }

    #[test]
    fn configuration_extents_apply_to_new_targets() {
        let mut world = World::with_config(Config::point_sized());
        let id = deploy_enemy(&mut world, WorldPoint::new(3.0, 4.0), 10);
        let snapshot = query::target(&world, id).expect("target deployed");
        assert_eq!(snapshot.extent, Extent::POINT);
        assert_eq!(query::welcome_banner(&world), WELCOME_BANNER);
    }
}
