#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Homing projectile that resolves a single ranged attack.
//!
//! A [`Projectile`] is advanced once per tick against an explicit
//! [`CombatContext`]. Each call turns the projectile toward its target (or the
//! target's last known position once it has left the battlefield), moves it
//! forward by its speed, and then resolves the tick into a [`Flight`] outcome.
//! The caller owns removal: any resolved outcome means the projectile must
//! leave the simulation.

use clash_conquer_core::{
    CombatContext, Damage, Extent, Health, ProjectileId, ProjectileSnapshot, TargetId, WorldPoint,
    WorldRect,
};

/// Parameters captured when a projectile is fired.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Launch {
    /// Identifier allocated to the projectile.
    pub id: ProjectileId,
    /// Location the projectile starts from.
    pub origin: WorldPoint,
    /// Target tracked for the entire flight.
    pub target: TargetId,
    /// Target position observed at firing time.
    pub target_position: WorldPoint,
    /// Damage applied on contact.
    pub damage: Damage,
    /// Distance travelled per tick.
    pub speed: f32,
    /// Half-size of the projectile's bounding box.
    pub extent: Extent,
}

/// Outcome of advancing a projectile by one tick.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum Flight {
    /// The projectile keeps travelling and must be advanced again next tick.
    InFlight,
    /// The projectile struck its target.
    Hit {
        /// Target that was struck.
        target: TargetId,
        /// Damage applied to the target.
        damage: Damage,
        /// Health left on the target after the strike.
        remaining: Health,
    },
    /// The target vanished and the projectile reached its last known position.
    Miss {
        /// Target that vanished before contact.
        target: TargetId,
        /// Position where the projectile expired.
        position: WorldPoint,
    },
}

impl Flight {
    /// Reports whether the projectile must be removed from the simulation.
    #[must_use]
    pub const fn is_resolved(&self) -> bool {
        !matches!(self, Self::InFlight)
    }
}

/// Single ranged attack homing toward one target.
#[derive(Clone, Debug)]
pub struct Projectile {
    id: ProjectileId,
    target: TargetId,
    position: WorldPoint,
    heading: Heading,
    last_known_target: WorldPoint,
    damage: Damage,
    speed: f32,
    extent: Extent,
    resolution: Option<Flight>,
}

impl Projectile {
    /// Creates a projectile facing the target's position at firing time.
    #[must_use]
    pub fn launch(launch: Launch) -> Self {
        let mut projectile = Self {
            id: launch.id,
            target: launch.target,
            position: launch.origin,
            heading: Heading::EAST,
            last_known_target: launch.target_position,
            damage: launch.damage,
            speed: launch.speed,
            extent: launch.extent,
            resolution: None,
        };
        projectile.turn_towards(launch.target_position);
        projectile
    }

    /// Advances the projectile by one tick and resolves hits or misses.
    ///
    /// Once a tick resolves, later calls return the same outcome without
    /// touching the context again.
    pub fn advance<C>(&mut self, context: &mut C) -> Flight
    where
        C: CombatContext + ?Sized,
    {
        if let Some(outcome) = self.resolution {
            return outcome;
        }

        let live_position = context.target_position(self.target);
        match live_position {
            Some(position) => {
                self.turn_towards(position);
                self.last_known_target = position;
            }
            None => self.turn_towards(self.last_known_target),
        }

        self.position = self.position.offset(
            self.heading.x * self.speed,
            self.heading.y * self.speed,
        );

        let outcome = if live_position.is_some() {
            self.strike(context)
        } else if self.position.distance_to(self.last_known_target) < self.speed {
            Flight::Miss {
                target: self.target,
                position: self.position,
            }
        } else {
            Flight::InFlight
        };

        if outcome.is_resolved() {
            self.resolution = Some(outcome);
        }
        outcome
    }

    fn strike<C>(&self, context: &mut C) -> Flight
    where
        C: CombatContext + ?Sized,
    {
        if !context.target_intersects(self.target, self.bounds()) {
            return Flight::InFlight;
        }

        match context.damageable(self.target) {
            Some(target) => {
                target.reduce_health(self.damage);
                Flight::Hit {
                    target: self.target,
                    damage: self.damage,
                    remaining: target.health(),
                }
            }
            None => Flight::InFlight,
        }
    }

    fn turn_towards(&mut self, point: WorldPoint) {
        if let Some(heading) = Heading::between(self.position, point) {
            self.heading = heading;
        }
    }

    /// Identifier allocated to the projectile.
    #[must_use]
    pub const fn id(&self) -> ProjectileId {
        self.id
    }

    /// Target tracked by the projectile.
    #[must_use]
    pub const fn target(&self) -> TargetId {
        self.target
    }

    /// Current location of the projectile.
    #[must_use]
    pub const fn position(&self) -> WorldPoint {
        self.position
    }

    /// Target position recorded the last time the target was present.
    #[must_use]
    pub const fn last_known_target(&self) -> WorldPoint {
        self.last_known_target
    }

    /// Damage applied on contact.
    #[must_use]
    pub const fn damage(&self) -> Damage {
        self.damage
    }

    /// Distance travelled per tick.
    #[must_use]
    pub const fn speed(&self) -> f32 {
        self.speed
    }

    /// Direction of travel measured in radians from the positive x axis.
    #[must_use]
    pub fn heading_radians(&self) -> f32 {
        self.heading.y.atan2(self.heading.x)
    }

    /// Bounding box of the projectile at its current position.
    #[must_use]
    pub fn bounds(&self) -> WorldRect {
        self.extent.rect_at(self.position)
    }

    /// Outcome recorded when the projectile resolved, if it has.
    #[must_use]
    pub const fn resolution(&self) -> Option<Flight> {
        self.resolution
    }

    /// Captures an immutable snapshot for queries.
    #[must_use]
    pub fn snapshot(&self) -> ProjectileSnapshot {
        ProjectileSnapshot {
            id: self.id,
            target: self.target,
            position: self.position,
            heading_radians: self.heading_radians(),
            last_known_target: self.last_known_target,
            damage: self.damage,
            speed: self.speed,
        }
    }
}

/// Unit vector describing the direction of travel.
#[derive(Clone, Copy, Debug, PartialEq)]
struct Heading {
    x: f32,
    y: f32,
}

impl Heading {
    const EAST: Self = Self { x: 1.0, y: 0.0 };

    fn between(from: WorldPoint, to: WorldPoint) -> Option<Self> {
        let dx = to.x() - from.x();
        let dy = to.y() - from.y();
        let length = (dx * dx + dy * dy).sqrt();
        if length > 0.0 && length.is_finite() {
            Some(Self {
                x: dx / length,
                y: dy / length,
            })
        } else {
            None
        }
    }
}
