#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Core contracts shared across the Clash and Conquer engine.
//!
//! This crate defines the message surface that connects adapters, the
//! authoritative world, and pure systems. Adapters submit [`Command`] values
//! describing desired mutations, the world executes those commands via its
//! `apply` entry point, and then broadcasts [`Event`] values for systems to
//! react to deterministically. Systems consume event streams, query immutable
//! snapshots, and respond exclusively with new command batches.
//!
//! The projectile resolver never reaches into world internals. It receives an
//! explicit [`CombatContext`] for each tick and mutates targets only through
//! the [`Damageable`] capability.

use std::time::Duration;

use serde::{Deserialize, Serialize};

/// Canonical banner emitted when the experience boots.
pub const WELCOME_BANNER: &str = "Welcome to Clash and Conquer.";

/// Damage dealt by a projectile when the shooter does not specify otherwise.
pub const DEFAULT_PROJECTILE_DAMAGE: Damage = Damage::new(10);

/// Commands that express all permissible world mutations.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub enum Command {
    /// Advances the simulation by a single tick.
    Tick {
        /// Duration of simulated time that elapsed since the previous tick.
        dt: Duration,
    },
    /// Places a new troop on the battlefield.
    DeployTroop {
        /// Side the troop fights for.
        side: Side,
        /// Location of the troop's centre.
        position: WorldPoint,
        /// Starting health of the troop.
        health: Health,
        /// Ranged weapon carried by the troop, if any.
        armament: Option<Armament>,
    },
    /// Places a new fortification on the battlefield.
    RaiseFortification {
        /// Side the fortification belongs to.
        side: Side,
        /// Location of the fortification's centre.
        position: WorldPoint,
        /// Starting health of the fortification.
        health: Health,
        /// Ranged weapon mounted on the fortification, if any.
        armament: Option<Armament>,
    },
    /// Relocates a troop to a new position.
    MoveTroop {
        /// Identifier of the troop to relocate.
        troop: TargetId,
        /// Destination of the troop's centre.
        to: WorldPoint,
    },
    /// Withdraws a target from the battlefield without defeating it.
    RemoveTarget {
        /// Identifier of the target to withdraw.
        target: TargetId,
    },
    /// Launches a projectile that homes toward the provided target.
    FireProjectile {
        /// Location the projectile starts from.
        origin: WorldPoint,
        /// Target the projectile tracks for its entire flight.
        target: TargetId,
        /// Health removed from the target on contact.
        damage: Damage,
        /// Distance travelled per tick.
        speed: f32,
    },
}

/// Events broadcast by the world after processing commands.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub enum Event {
    /// Indicates that the simulation clock advanced.
    TimeAdvanced {
        /// Duration of simulated time that elapsed in the tick.
        dt: Duration,
    },
    /// Confirms that a troop or fortification entered the battlefield.
    TargetDeployed {
        /// Identifier assigned to the new target.
        target: TargetId,
        /// Variant of the new target.
        kind: TargetKind,
        /// Side the target belongs to.
        side: Side,
        /// Location of the target's centre.
        position: WorldPoint,
    },
    /// Reports that a deployment request was rejected.
    DeployRejected {
        /// Variant named in the rejected request.
        kind: TargetKind,
        /// Specific reason the request failed.
        reason: DeployRejection,
    },
    /// Confirms that a troop changed position.
    TroopMoved {
        /// Identifier of the relocated troop.
        troop: TargetId,
        /// Position before the move.
        from: WorldPoint,
        /// Position after the move.
        to: WorldPoint,
    },
    /// Confirms that a target was withdrawn by request.
    TargetRemoved {
        /// Identifier of the withdrawn target.
        target: TargetId,
        /// Variant of the withdrawn target.
        kind: TargetKind,
    },
    /// Reports that a target ran out of health and left the battlefield.
    TargetDefeated {
        /// Identifier of the defeated target.
        target: TargetId,
        /// Variant of the defeated target.
        kind: TargetKind,
    },
    /// Confirms that a projectile entered flight.
    ProjectileFired {
        /// Identifier assigned to the projectile.
        projectile: ProjectileId,
        /// Target the projectile tracks.
        target: TargetId,
        /// Location the projectile starts from.
        origin: WorldPoint,
    },
    /// Reports that a projectile struck its target and left the battlefield.
    ProjectileHit {
        /// Identifier of the projectile that struck.
        projectile: ProjectileId,
        /// Target that was struck.
        target: TargetId,
        /// Damage applied to the target.
        damage: Damage,
        /// Health left on the target after the strike.
        remaining: Health,
    },
    /// Reports that a projectile reached the last known position of a vanished target.
    ProjectileMissed {
        /// Identifier of the projectile that missed.
        projectile: ProjectileId,
        /// Target that vanished before contact.
        target: TargetId,
        /// Position where the projectile expired.
        position: WorldPoint,
    },
    /// Reports that a fire request was rejected.
    FireRejected {
        /// Target named in the rejected request.
        target: TargetId,
        /// Specific reason the request failed.
        reason: FireRejection,
    },
    /// Reports that a move request was rejected.
    MoveRejected {
        /// Target named in the rejected request.
        troop: TargetId,
        /// Specific reason the request failed.
        reason: MoveRejection,
    },
    /// Reports that a removal request was rejected.
    RemovalRejected {
        /// Target named in the rejected request.
        target: TargetId,
        /// Specific reason the request failed.
        reason: RemovalRejection,
    },
}

/// Reasons a fire request may be rejected by the world.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum FireRejection {
    /// No target with the provided identifier is on the battlefield.
    MissingTarget,
    /// The requested speed is not a positive, finite distance per tick.
    InvalidSpeed,
    /// The requested damage is zero.
    ZeroDamage,
    /// The origin has a NaN or infinite coordinate.
    InvalidOrigin,
    /// Every projectile identifier has been allocated.
    IdentifiersExhausted,
}

/// Reasons a deployment request may be rejected by the world.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum DeployRejection {
    /// The position has a NaN or infinite coordinate.
    InvalidPosition,
    /// Every target identifier has been allocated.
    IdentifiersExhausted,
}

/// Reasons a move request may be rejected by the world.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum MoveRejection {
    /// No target with the provided identifier is on the battlefield.
    MissingTarget,
    /// The target is a fortification and cannot move.
    Immobile,
    /// The destination has a NaN or infinite coordinate.
    InvalidPosition,
}

/// Reasons a removal request may be rejected by the world.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum RemovalRejection {
    /// No target with the provided identifier is on the battlefield.
    MissingTarget,
}

/// Unique identifier assigned to a troop or fortification.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct TargetId(u32);

impl TargetId {
    /// Creates a new target identifier with the provided numeric value.
    #[must_use]
    pub const fn new(value: u32) -> Self {
        Self(value)
    }

    /// Retrieves the numeric representation of the identifier.
    #[must_use]
    pub const fn get(&self) -> u32 {
        self.0
    }
}

/// Unique identifier assigned to a projectile.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct ProjectileId(u32);

impl ProjectileId {
    /// Creates a new projectile identifier with the provided numeric value.
    #[must_use]
    pub const fn new(value: u32) -> Self {
        Self(value)
    }

    /// Retrieves the numeric representation of the identifier.
    #[must_use]
    pub const fn get(&self) -> u32 {
        self.0
    }
}

/// Variants of entities a projectile can strike.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TargetKind {
    /// Mobile unit deployed onto the battlefield.
    Troop,
    /// Stationary structure such as a castle.
    Fortification,
}

/// Allegiance of a target.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Side {
    /// Controlled by the player.
    Player,
    /// Controlled by the opponent.
    Enemy,
}

impl Side {
    /// Returns the side this side fights against.
    #[must_use]
    pub const fn opposing(self) -> Self {
        match self {
            Self::Player => Self::Enemy,
            Self::Enemy => Self::Player,
        }
    }
}

/// Remaining hit points of a target.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct Health(u32);

impl Health {
    /// Health of a target that has been defeated.
    pub const ZERO: Self = Self(0);

    /// Creates a new health value.
    #[must_use]
    pub const fn new(value: u32) -> Self {
        Self(value)
    }

    /// Retrieves the numeric representation of the health value.
    #[must_use]
    pub const fn get(&self) -> u32 {
        self.0
    }

    /// Returns the health left after absorbing `damage`, clamped at zero.
    #[must_use]
    pub const fn saturating_sub(self, damage: Damage) -> Self {
        Self(self.0.saturating_sub(damage.get()))
    }

    /// Reports whether no health remains.
    #[must_use]
    pub const fn is_depleted(&self) -> bool {
        self.0 == 0
    }
}

/// Amount of health removed by a single strike.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct Damage(u32);

impl Damage {
    /// Creates a new damage amount.
    #[must_use]
    pub const fn new(value: u32) -> Self {
        Self(value)
    }

    /// Retrieves the numeric representation of the damage amount.
    #[must_use]
    pub const fn get(&self) -> u32 {
        self.0
    }

    /// Reports whether the amount would leave every target untouched.
    #[must_use]
    pub const fn is_zero(&self) -> bool {
        self.0 == 0
    }
}

/// Location on the battlefield expressed in world units.
#[derive(Clone, Copy, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct WorldPoint {
    x: f32,
    y: f32,
}

impl WorldPoint {
    /// Creates a new point from its coordinates.
    #[must_use]
    pub const fn new(x: f32, y: f32) -> Self {
        Self { x, y }
    }

    /// Horizontal coordinate.
    #[must_use]
    pub const fn x(&self) -> f32 {
        self.x
    }

    /// Vertical coordinate.
    #[must_use]
    pub const fn y(&self) -> f32 {
        self.y
    }

    /// Reports whether both coordinates are neither NaN nor infinite.
    #[must_use]
    pub fn is_finite(&self) -> bool {
        self.x.is_finite() && self.y.is_finite()
    }

    /// Euclidean distance between two points.
    #[must_use]
    pub fn distance_to(self, other: WorldPoint) -> f32 {
        self.distance_squared_to(other).sqrt()
    }

    /// Squared Euclidean distance between two points.
    #[must_use]
    pub fn distance_squared_to(self, other: WorldPoint) -> f32 {
        let dx = other.x - self.x;
        let dy = other.y - self.y;
        dx * dx + dy * dy
    }

    /// Returns the point shifted by the provided offsets.
    #[must_use]
    pub fn offset(self, dx: f32, dy: f32) -> Self {
        Self::new(self.x + dx, self.y + dy)
    }
}

/// Half-size of an entity's axis-aligned bounding box.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct Extent {
    half_width: f32,
    half_height: f32,
}

impl Extent {
    /// Bounding box collapsed to a single point.
    pub const POINT: Self = Self {
        half_width: 0.0,
        half_height: 0.0,
    };

    /// Creates an extent from half-width and half-height values.
    ///
    /// Negative or NaN inputs are treated as zero so rectangles never invert.
    #[must_use]
    pub fn new(half_width: f32, half_height: f32) -> Self {
        Self {
            half_width: half_width.max(0.0),
            half_height: half_height.max(0.0),
        }
    }

    /// Creates an extent from the full width and height of an image.
    #[must_use]
    pub fn from_size(width: f32, height: f32) -> Self {
        Self::new(width / 2.0, height / 2.0)
    }

    /// Half of the box width.
    #[must_use]
    pub const fn half_width(&self) -> f32 {
        self.half_width
    }

    /// Half of the box height.
    #[must_use]
    pub const fn half_height(&self) -> f32 {
        self.half_height
    }

    /// Positions the bounding box around the provided centre.
    #[must_use]
    pub fn rect_at(self, center: WorldPoint) -> WorldRect {
        WorldRect {
            min: center.offset(-self.half_width, -self.half_height),
            max: center.offset(self.half_width, self.half_height),
        }
    }
}

/// Axis-aligned rectangle in world units.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct WorldRect {
    min: WorldPoint,
    max: WorldPoint,
}

impl WorldRect {
    /// Corner with the smallest coordinates.
    #[must_use]
    pub const fn min(&self) -> WorldPoint {
        self.min
    }

    /// Corner with the largest coordinates.
    #[must_use]
    pub const fn max(&self) -> WorldPoint {
        self.max
    }

    /// Reports whether two rectangles overlap. Touching edges count as overlap,
    /// so point-sized boxes intersect exactly when they coincide.
    #[must_use]
    pub fn intersects(&self, other: &WorldRect) -> bool {
        self.min.x <= other.max.x
            && other.min.x <= self.max.x
            && self.min.y <= other.max.y
            && other.min.y <= self.max.y
    }
}

/// Ranged weapon carried by a troop or mounted on a fortification.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct Armament {
    /// Maximum distance to an engaged target, in world units.
    pub range: f32,
    /// Minimum simulated time between two shots.
    pub cooldown: Duration,
    /// Damage carried by every projectile fired.
    pub damage: Damage,
    /// Distance travelled per tick by every projectile fired.
    pub projectile_speed: f32,
}

impl Armament {
    /// Creates a new armament description.
    #[must_use]
    pub const fn new(range: f32, cooldown: Duration, damage: Damage, projectile_speed: f32) -> Self {
        Self {
            range,
            cooldown,
            damage,
            projectile_speed,
        }
    }
}

/// Capability implemented by every entity a projectile can damage.
pub trait Damageable {
    /// Current health of the entity.
    fn health(&self) -> Health;

    /// Lowers the entity's health by `amount`.
    ///
    /// Implementations decide how to treat results below zero.
    fn reduce_health(&mut self, amount: Damage);
}

/// Explicit handle onto the live battlefield handed to projectiles every tick.
pub trait CombatContext {
    /// Returns the target's position, or `None` when it left the battlefield.
    fn target_position(&self, target: TargetId) -> Option<WorldPoint>;

    /// Reports whether the target is present and its bounds overlap `area`.
    fn target_intersects(&self, target: TargetId, area: WorldRect) -> bool;

    /// Looks up the damage capability of a live target.
    fn damageable(&mut self, target: TargetId) -> Option<&mut dyn Damageable>;
}

/// Pairing of an armed shooter with the target it should fire at.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Engagement {
    /// Target carrying the armament.
    pub shooter: TargetId,
    /// Opposing target selected for the shooter.
    pub target: TargetId,
    /// Location of the shooter's centre.
    pub shooter_position: WorldPoint,
    /// Location of the selected target's centre.
    pub target_position: WorldPoint,
}

/// Immutable representation of a single target's state used for queries.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct TargetSnapshot {
    /// Identifier allocated to the target by the world.
    pub id: TargetId,
    /// Variant of the target.
    pub kind: TargetKind,
    /// Side the target belongs to.
    pub side: Side,
    /// Location of the target's centre.
    pub position: WorldPoint,
    /// Half-size of the target's bounding box.
    pub extent: Extent,
    /// Health remaining on the target.
    pub health: Health,
    /// Health the target was deployed with.
    pub max_health: Health,
    /// Ranged weapon carried by the target, if any.
    pub armament: Option<Armament>,
}

/// Read-only snapshot describing all targets on the battlefield.
#[derive(Clone, Debug, Default)]
pub struct TargetView {
    snapshots: Vec<TargetSnapshot>,
}

impl TargetView {
    /// Creates a new target view from the provided snapshots.
    #[must_use]
    pub fn from_snapshots(mut snapshots: Vec<TargetSnapshot>) -> Self {
        snapshots.sort_by_key(|snapshot| snapshot.id);
        Self { snapshots }
    }

    /// Iterator over the captured target snapshots in deterministic order.
    pub fn iter(&self) -> impl Iterator<Item = &TargetSnapshot> {
        self.snapshots.iter()
    }

    /// Looks up the snapshot captured for the provided target.
    #[must_use]
    pub fn get(&self, id: TargetId) -> Option<&TargetSnapshot> {
        self.snapshots
            .binary_search_by_key(&id, |snapshot| snapshot.id)
            .ok()
            .map(|index| &self.snapshots[index])
    }

    /// Number of captured snapshots.
    #[must_use]
    pub fn len(&self) -> usize {
        self.snapshots.len()
    }

    /// Reports whether the view captured no targets.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.snapshots.is_empty()
    }

    /// Consumes the view, yielding the underlying snapshots.
    #[must_use]
    pub fn into_vec(self) -> Vec<TargetSnapshot> {
        self.snapshots
    }
}

/// Immutable representation of a projectile in flight.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct ProjectileSnapshot {
    /// Identifier allocated to the projectile by the world.
    pub id: ProjectileId,
    /// Target the projectile tracks.
    pub target: TargetId,
    /// Current location of the projectile.
    pub position: WorldPoint,
    /// Direction of travel measured in radians from the positive x axis.
    pub heading_radians: f32,
    /// Target position recorded the last time the target was present.
    pub last_known_target: WorldPoint,
    /// Damage applied on contact.
    pub damage: Damage,
    /// Distance travelled per tick.
    pub speed: f32,
}

/// Read-only snapshot describing all projectiles in flight.
#[derive(Clone, Debug, Default)]
pub struct ProjectileView {
    snapshots: Vec<ProjectileSnapshot>,
}

impl ProjectileView {
    /// Creates a new projectile view from the provided snapshots.
    #[must_use]
    pub fn from_snapshots(mut snapshots: Vec<ProjectileSnapshot>) -> Self {
        snapshots.sort_by_key(|snapshot| snapshot.id);
        Self { snapshots }
    }

    /// Iterator over the captured projectile snapshots in deterministic order.
    pub fn iter(&self) -> impl Iterator<Item = &ProjectileSnapshot> {
        self.snapshots.iter()
    }

    /// Number of projectiles in flight.
    #[must_use]
    pub fn len(&self) -> usize {
        self.snapshots.len()
    }

    /// Reports whether no projectile is in flight.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.snapshots.is_empty()
    }

    /// Consumes the view, yielding the underlying snapshots.
    #[must_use]
    pub fn into_vec(self) -> Vec<ProjectileSnapshot> {
        self.snapshots
    }
}
