#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Pure system that pairs armed targets with the nearest hostile in range.

use clash_conquer_core::{Engagement, Side, TargetId, TargetView, WorldPoint};

/// Targeting system that reuses scratch buffers to avoid repeated allocations.
#[derive(Debug, Default)]
pub struct Targeting {
    shooter_workspace: Vec<ShooterWorkspace>,
    candidate_workspace: Vec<Candidate>,
}

impl Targeting {
    /// Creates a new targeting system with empty scratch buffers.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Computes engagements for the provided battlefield snapshot.
    ///
    /// The output buffer is cleared before populating it with the latest
    /// assignments, ordered by shooter identifier.
    pub fn handle(&mut self, targets: &TargetView, out: &mut Vec<Engagement>) {
        out.clear();

        if targets.is_empty() {
            return;
        }

        self.prepare_shooter_workspace(targets);
        if self.shooter_workspace.is_empty() {
            return;
        }

        self.prepare_candidate_workspace(targets);

        for shooter in &self.shooter_workspace {
            let max_distance_sq = shooter.range * shooter.range;
            let mut best: Option<BestCandidate> = None;

            for candidate in &self.candidate_workspace {
                if candidate.side != shooter.side.opposing() {
                    continue;
                }

                let distance_sq = shooter.position.distance_squared_to(candidate.position);
                if distance_sq > max_distance_sq {
                    continue;
                }

                let current = BestCandidate {
                    distance_sq,
                    id: candidate.id,
                    position: candidate.position,
                };

                match &mut best {
                    Some(existing) => {
                        if current.precedes(existing) {
                            *existing = current;
                        }
                    }
                    None => best = Some(current),
                }
            }

            if let Some(best_candidate) = best {
                out.push(Engagement {
                    shooter: shooter.id,
                    target: best_candidate.id,
                    shooter_position: shooter.position,
                    target_position: best_candidate.position,
                });
            }
        }
    }

    fn prepare_shooter_workspace(&mut self, targets: &TargetView) {
        self.shooter_workspace.clear();

        for snapshot in targets.iter() {
            let Some(armament) = snapshot.armament else {
                continue;
            };
            if !(armament.range > 0.0) || snapshot.health.is_depleted() {
                continue;
            }

            self.shooter_workspace.push(ShooterWorkspace {
                id: snapshot.id,
                side: snapshot.side,
                position: snapshot.position,
                range: armament.range,
            });
        }
    }

    fn prepare_candidate_workspace(&mut self, targets: &TargetView) {
        self.candidate_workspace.clear();
        self.candidate_workspace.reserve(targets.len());

        for snapshot in targets.iter() {
            if snapshot.health.is_depleted() {
                continue;
            }

            self.candidate_workspace.push(Candidate {
                id: snapshot.id,
                side: snapshot.side,
                position: snapshot.position,
            });
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq)]
struct ShooterWorkspace {
    id: TargetId,
    side: Side,
    position: WorldPoint,
    range: f32,
}

#[derive(Clone, Copy, Debug, PartialEq)]
struct Candidate {
    id: TargetId,
    side: Side,
    position: WorldPoint,
}

#[derive(Clone, Copy, Debug, PartialEq)]
struct BestCandidate {
    distance_sq: f32,
    id: TargetId,
    position: WorldPoint,
}

impl BestCandidate {
    fn precedes(&self, other: &Self) -> bool {
        if self.distance_sq != other.distance_sq {
            return self.distance_sq < other.distance_sq;
        }

        self.id < other.id
    }
}
