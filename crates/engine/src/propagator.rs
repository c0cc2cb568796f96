//! Unlock propagation through an owner's prerequisite graph.

use std::collections::HashSet;
use stride_core::{ProgressUnit, UnitId, UnitStatus};
use stride_storage::{GraphStore, OwnerIdOf};
use tracing::debug;

/// Releases locked units whose prerequisites are now satisfied.
pub struct UnlockPropagator;

impl UnlockPropagator {
    /// Create a new propagator.
    pub fn new() -> Self {
        Self
    }

    /// Scan all units of the owner and unlock every `Locked` unit whose
    /// full prerequisite set is completed or skipped. Returns the ids that
    /// were unlocked, in sequence order.
    ///
    /// The scan is idempotent: re-running it on identical state is a no-op,
    /// so it is safe to retry in full after a crash or a duplicate event.
    /// Unlocks are strictly one-hop; a chain `a → b → c` releases `c` only
    /// once `b` itself completes.
    pub async fn propagate<G: GraphStore>(
        &self,
        store: &G,
        owner: OwnerIdOf<G>,
    ) -> stride_storage::Result<Vec<UnitId>> {
        let units = store.list_units(owner).await?;

        let satisfied: HashSet<UnitId> = units
            .iter()
            .filter(|u| u.status().satisfies_prerequisites())
            .map(|u| u.id())
            .collect();

        let mut unlocked = Vec::new();
        for mut unit in units {
            if unit.status() != UnitStatus::Locked {
                continue;
            }
            if unit.prerequisites().iter().all(|p| satisfied.contains(p)) {
                unit.set_status(UnitStatus::Unlocked);
                store.save_unit(&unit).await?;
                unlocked.push(unit.id());
            }
        }

        if !unlocked.is_empty() {
            debug!("unlocked {} unit(s) for owner {}", unlocked.len(), owner);
        }
        Ok(unlocked)
    }
}

impl Default for UnlockPropagator {
    fn default() -> Self {
        Self::new()
    }
}
