//! Authoritative troop and fortification state.

use std::collections::BTreeMap;

use clash_conquer_core::{
    Armament, CombatContext, Damage, Damageable, Extent, Health, MoveRejection, Side, TargetId,
    TargetKind, TargetSnapshot, WorldPoint, WorldRect,
};

/// Mobile unit deployed onto the battlefield.
#[derive(Clone, Debug)]
pub(crate) struct Troop {
    pub(crate) side: Side,
    pub(crate) position: WorldPoint,
    pub(crate) extent: Extent,
    pub(crate) health: Health,
    pub(crate) max_health: Health,
    pub(crate) armament: Option<Armament>,
}

impl Damageable for Troop {
    fn health(&self) -> Health {
        self.health
    }

    fn reduce_health(&mut self, amount: Damage) {
        self.health = self.health.saturating_sub(amount);
    }
}

/// Stationary structure such as a castle or tower.
#[derive(Clone, Debug)]
pub(crate) struct Fortification {
    pub(crate) side: Side,
    pub(crate) position: WorldPoint,
    pub(crate) extent: Extent,
    pub(crate) health: Health,
    pub(crate) max_health: Health,
    pub(crate) armament: Option<Armament>,
}

impl Damageable for Fortification {
    fn health(&self) -> Health {
        self.health
    }

    fn reduce_health(&mut self, amount: Damage) {
        self.health = self.health.saturating_sub(amount);
    }
}

/// Registry entry holding one of the target variants.
#[derive(Clone, Debug)]
pub(crate) enum TargetEntry {
    Troop(Troop),
    Fortification(Fortification),
}

impl TargetEntry {
    pub(crate) const fn kind(&self) -> TargetKind {
        match self {
            Self::Troop(_) => TargetKind::Troop,
            Self::Fortification(_) => TargetKind::Fortification,
        }
    }

    pub(crate) const fn position(&self) -> WorldPoint {
        match self {
            Self::Troop(troop) => troop.position,
            Self::Fortification(fortification) => fortification.position,
        }
    }

    fn bounds(&self) -> WorldRect {
        match self {
            Self::Troop(troop) => troop.extent.rect_at(troop.position),
            Self::Fortification(fortification) => {
                fortification.extent.rect_at(fortification.position)
            }
        }
    }

    fn health(&self) -> Health {
        match self {
            Self::Troop(troop) => troop.health(),
            Self::Fortification(fortification) => fortification.health(),
        }
    }

    fn snapshot(&self, id: TargetId) -> TargetSnapshot {
        let (side, extent, max_health, armament) = match self {
            Self::Troop(troop) => (troop.side, troop.extent, troop.max_health, troop.armament),
            Self::Fortification(fortification) => (
                fortification.side,
                fortification.extent,
                fortification.max_health,
                fortification.armament,
            ),
        };

        TargetSnapshot {
            id,
            kind: self.kind(),
            side,
            position: self.position(),
            extent,
            health: self.health(),
            max_health,
            armament,
        }
    }
}

/// Registry that stores targets and manages identifier allocation.
#[derive(Debug)]
pub(crate) struct TargetRegistry {
    entries: BTreeMap<TargetId, TargetEntry>,
    next_target_id: Option<TargetId>,
}

impl TargetRegistry {
    /// Creates an empty target registry with a reset identifier counter.
    pub(crate) fn new() -> Self {
        Self {
            entries: BTreeMap::new(),
            next_target_id: Some(TargetId::new(0)),
        }
    }

    /// Stores a new target and returns the identifier allocated to it.
    ///
    /// Returns `None` once every identifier has been handed out; identifiers
    /// are never reused.
    pub(crate) fn insert(&mut self, entry: TargetEntry) -> Option<TargetId> {
        let id = self.next_target_id?;
        self.next_target_id = id.get().checked_add(1).map(TargetId::new);
        let _ = self.entries.insert(id, entry);
        Some(id)
    }

    pub(crate) fn get(&self, id: TargetId) -> Option<&TargetEntry> {
        self.entries.get(&id)
    }

    /// Withdraws the target, returning its kind when it was present.
    pub(crate) fn remove(&mut self, id: TargetId) -> Option<TargetKind> {
        self.entries.remove(&id).map(|entry| entry.kind())
    }

    /// Moves a troop, returning its previous position.
    pub(crate) fn relocate(
        &mut self,
        id: TargetId,
        to: WorldPoint,
    ) -> Result<WorldPoint, MoveRejection> {
        match self.entries.get_mut(&id) {
            Some(TargetEntry::Troop(_)) if !to.is_finite() => Err(MoveRejection::InvalidPosition),
            Some(TargetEntry::Troop(troop)) => {
                let from = troop.position;
                troop.position = to;
                Ok(from)
            }
            Some(TargetEntry::Fortification(_)) => Err(MoveRejection::Immobile),
            None => Err(MoveRejection::MissingTarget),
        }
    }

    /// Removes every target whose health reached zero, in identifier order.
    pub(crate) fn remove_depleted(&mut self) -> Vec<(TargetId, TargetKind)> {
        let depleted: Vec<(TargetId, TargetKind)> = self
            .entries
            .iter()
            .filter(|(_, entry)| entry.health().is_depleted())
            .map(|(id, entry)| (*id, entry.kind()))
            .collect();

        for (id, _) in &depleted {
            let _ = self.entries.remove(id);
        }
        depleted
    }

    /// Captures snapshots of every target in identifier order.
    pub(crate) fn snapshots(&self) -> Vec<TargetSnapshot> {
        self.entries
            .iter()
            .map(|(id, entry)| entry.snapshot(*id))
            .collect()
    }

    pub(crate) fn snapshot(&self, id: TargetId) -> Option<TargetSnapshot> {
        self.entries.get(&id).map(|entry| entry.snapshot(id))
    }
}

impl CombatContext for TargetRegistry {
    fn target_position(&self, target: TargetId) -> Option<WorldPoint> {
        self.entries.get(&target).map(TargetEntry::position)
    }

    fn target_intersects(&self, target: TargetId, area: WorldRect) -> bool {
        self.entries
            .get(&target)
            .is_some_and(|entry| entry.bounds().intersects(&area))
    }

    fn damageable(&mut self, target: TargetId) -> Option<&mut dyn Damageable> {
        match self.entries.get_mut(&target)? {
            TargetEntry::Troop(troop) => Some(troop as &mut dyn Damageable),
            TargetEntry::Fortification(fortification) => {
                Some(fortification as &mut dyn Damageable)
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn troop(health: u32) -> TargetEntry {
        TargetEntry::Troop(Troop {
            side: Side::Enemy,
            position: WorldPoint::new(5.0, 5.0),
            extent: Extent::from_size(10.0, 10.0),
            health: Health::new(health),
            max_health: Health::new(health),
            armament: None,
        })
    }

    fn castle() -> TargetEntry {
        TargetEntry::Fortification(Fortification {
            side: Side::Player,
            position: WorldPoint::new(0.0, 0.0),
            extent: Extent::from_size(40.0, 40.0),
            health: Health::new(100),
            max_health: Health::new(100),
            armament: None,
        })
    }

    #[test]
    fn identifiers_are_allocated_in_ascending_order() {
        let mut registry = TargetRegistry::new();
        let first = registry.insert(troop(10)).expect("identifier available");
        let second = registry.insert(castle()).expect("identifier available");
        assert_eq!(first, TargetId::new(0));
        assert_eq!(second, TargetId::new(1));
        assert_eq!(registry.get(second).map(TargetEntry::kind), Some(TargetKind::Fortification));
    }

    #[test]
    fn exhausted_identifiers_never_overwrite_live_targets() {
        let mut registry = TargetRegistry::new();
        registry.next_target_id = Some(TargetId::new(u32::MAX));

        let last = registry.insert(troop(10));
        assert_eq!(last, Some(TargetId::new(u32::MAX)));
        assert_eq!(registry.insert(castle()), None);
        assert_eq!(
            registry.get(TargetId::new(u32::MAX)).map(TargetEntry::kind),
            Some(TargetKind::Troop)
        );
        assert_eq!(registry.snapshots().len(), 1);
    }

    #[test]
    fn removed_target_is_absent_from_context() {
        let mut registry = TargetRegistry::new();
        let id = registry.insert(troop(10)).expect("identifier available");
        assert_eq!(registry.remove(id), Some(TargetKind::Troop));
        assert!(registry.target_position(id).is_none());
        assert!(registry.damageable(id).is_none());
        assert_eq!(registry.remove(id), None);
    }

    #[test]
    fn damage_flows_through_capability() {
        let mut registry = TargetRegistry::new();
        let troop_id = registry.insert(troop(15)).expect("identifier available");
        let castle_id = registry.insert(castle()).expect("identifier available");

        if let Some(target) = registry.damageable(troop_id) {
            target.reduce_health(Damage::new(10));
            target.reduce_health(Damage::new(10));
        }
        if let Some(target) = registry.damageable(castle_id) {
            target.reduce_health(Damage::new(10));
        }

        assert_eq!(registry.snapshot(troop_id).map(|s| s.health), Some(Health::ZERO));
        assert_eq!(registry.snapshot(castle_id).map(|s| s.health), Some(Health::new(90)));
        assert_eq!(
            registry.remove_depleted(),
            vec![(troop_id, TargetKind::Troop)]
        );
        assert!(registry.get(troop_id).is_none());
    }

    #[test]
    fn fortifications_refuse_to_move() {
        let mut registry = TargetRegistry::new();
        let troop_id = registry.insert(troop(10)).expect("identifier available");
        let castle_id = registry.insert(castle()).expect("identifier available");

        assert_eq!(
            registry.relocate(troop_id, WorldPoint::new(9.0, 1.0)),
            Ok(WorldPoint::new(5.0, 5.0))
        );
        assert_eq!(
            registry.relocate(castle_id, WorldPoint::new(9.0, 1.0)),
            Err(MoveRejection::Immobile)
        );
        assert_eq!(
            registry.relocate(TargetId::new(42), WorldPoint::new(9.0, 1.0)),
            Err(MoveRejection::MissingTarget)
        );
        assert_eq!(
            registry.relocate(troop_id, WorldPoint::new(f32::INFINITY, 1.0)),
            Err(MoveRejection::InvalidPosition)
        );
        assert_eq!(
            registry.snapshot(troop_id).map(|s| s.position),
            Some(WorldPoint::new(9.0, 1.0))
        );
    }

    #[test]
    fn intersection_uses_target_bounds() {
        let mut registry = TargetRegistry::new();
        let id = registry.insert(troop(10)).expect("identifier available");
        let touching = Extent::POINT.rect_at(WorldPoint::new(10.0, 5.0));
        let outside = Extent::POINT.rect_at(WorldPoint::new(10.5, 5.0));
        assert!(registry.target_intersects(id, touching));
        assert!(!registry.target_intersects(id, outside));
    }
}
