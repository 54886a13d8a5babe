//! Single-flight guard for pipeline runs.
//!
//! A manual trigger can land while the scheduled run is mid-flight; without
//! exclusion the two would race on the staging store and on the promotion
//! delete/insert. The guard is keyed by season so a run is taken out before
//! SCRAPE begins and released when the permit drops.

use std::{
  collections::HashSet,
  sync::{Arc, Mutex, MutexGuard},
};

use uuid::Uuid;

#[derive(Clone, Default)]
pub struct RunGuard {
  active: Arc<Mutex<HashSet<Uuid>>>,
}

/// Held for the duration of a run; releases the season key on drop.
pub struct RunPermit {
  season_id: Uuid,
  active:    Arc<Mutex<HashSet<Uuid>>>,
}

impl RunGuard {
  /// Claim the season for one run. `None` means a run is already in flight.
  pub fn try_acquire(&self, season_id: Uuid) -> Option<RunPermit> {
    let mut active = lock(&self.active);
    if !active.insert(season_id) {
      return None;
    }
    Some(RunPermit { season_id, active: Arc::clone(&self.active) })
  }
}

impl Drop for RunPermit {
  fn drop(&mut self) {
    lock(&self.active).remove(&self.season_id);
  }
}

// A poisoned lock only means a panicking run left its key behind; the set
// itself is still coherent.
fn lock(m: &Mutex<HashSet<Uuid>>) -> MutexGuard<'_, HashSet<Uuid>> {
  match m.lock() {
    Ok(g) => g,
    Err(poisoned) => poisoned.into_inner(),
  }
}
