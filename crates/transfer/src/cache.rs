//! Memoization of solved transfer grids keyed by the solver's effective inputs.
//!
//! Each key owns its own slot lock, so concurrent requests for the same inputs wait on
//! the first computation while requests for other inputs proceed independently. The
//! key map itself is only locked briefly, never across a computation.

use std::collections::HashMap;
use std::collections::hash_map::Entry;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use planner_core::Epoch;
use tracing::debug;

use crate::grid::TransferGrid;

/// Fingerprint of `(k, departure body, arrival body, departure epochs, arrival epochs)`.
///
/// Floats are compared by their bit patterns.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct CacheKey {
    mu_bits: u64,
    departure_body: String,
    arrival_body: String,
    departure_epochs: Vec<u64>,
    arrival_epochs: Vec<u64>,
}

impl CacheKey {
    pub fn new(
        mu_km3_s2: f64,
        departure_body: &str,
        arrival_body: &str,
        departure_epochs: &[Epoch],
        arrival_epochs: &[Epoch],
    ) -> Self {
        let bits = |epochs: &[Epoch]| -> Vec<u64> {
            epochs.iter().map(|e| e.julian_date().to_bits()).collect()
        };
        Self {
            mu_bits: mu_km3_s2.to_bits(),
            departure_body: departure_body.to_string(),
            arrival_body: arrival_body.to_string(),
            departure_epochs: bits(departure_epochs),
            arrival_epochs: bits(arrival_epochs),
        }
    }
}

type Slot = Arc<Mutex<Option<Arc<TransferGrid>>>>;

#[derive(Debug, Default)]
struct Slots {
    by_key: HashMap<CacheKey, Slot>,
    /// Slots in `by_key` that hold a grid.
    stored: usize,
}

impl Slots {
    /// Count a freshly filled slot, registering it again if a failure dropped it meanwhile.
    fn publish(&mut self, key: CacheKey, slot: &Slot) {
        match self.by_key.entry(key) {
            Entry::Occupied(current) if !Arc::ptr_eq(current.get(), slot) => return,
            Entry::Occupied(_) => {}
            Entry::Vacant(vacant) => {
                vacant.insert(Arc::clone(slot));
            }
        }
        self.stored += 1;
    }

    fn discard(&mut self, key: &CacheKey, slot: &Slot) {
        if self
            .by_key
            .get(key)
            .is_some_and(|current| Arc::ptr_eq(current, slot))
        {
            self.by_key.remove(key);
        }
    }
}

/// Unbounded single-flight cache of transfer grids.
#[derive(Debug, Default)]
pub struct ResultCache {
    slots: Mutex<Slots>,
}

impl ResultCache {
    pub fn new() -> Self {
        Self::default()
    }

    /// Return the stored grid for `key`, running `compute` only when none exists yet.
    ///
    /// A failed computation stores nothing and drops its slot; the next caller retries.
    pub fn get_or_compute<E, F>(&self, key: CacheKey, compute: F) -> Result<Arc<TransferGrid>, E>
    where
        F: FnOnce() -> Result<TransferGrid, E>,
    {
        let slot = {
            let mut slots = lock(&self.slots);
            Arc::clone(slots.by_key.entry(key.clone()).or_default())
        };

        let mut entry = lock(&slot);
        if let Some(grid) = entry.as_ref() {
            debug!("transfer grid cache hit");
            return Ok(Arc::clone(grid));
        }

        debug!("transfer grid cache miss");
        match compute() {
            Ok(grid) => {
                let grid = Arc::new(grid);
                *entry = Some(Arc::clone(&grid));
                lock(&self.slots).publish(key, &slot);
                Ok(grid)
            }
            Err(err) => {
                lock(&self.slots).discard(&key, &slot);
                Err(err)
            }
        }
    }

    pub fn get(&self, key: &CacheKey) -> Option<Arc<TransferGrid>> {
        let slot = lock(&self.slots).by_key.get(key).cloned()?;
        let entry = lock(&slot);
        entry.clone()
    }

    pub fn contains(&self, key: &CacheKey) -> bool {
        self.get(key).is_some()
    }

    /// Number of stored grids. Computations still in flight are not counted.
    pub fn len(&self) -> usize {
        lock(&self.slots).stored
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn clear(&self) {
        let mut slots = lock(&self.slots);
        slots.by_key.clear();
        slots.stored = 0;
    }
}

fn lock<T>(mutex: &Mutex<T>) -> MutexGuard<'_, T> {
    mutex.lock().unwrap_or_else(PoisonError::into_inner)
}

#[cfg(test)]
mod tests {
    use std::sync::Barrier;
    use std::thread;

    use planner_core::Body;

    use super::*;
    use crate::grid::{Grid, PathGrids};

    fn key(mu: f64) -> CacheKey {
        let epochs = [Epoch::from_julian_date(2_459_761.5)];
        CacheKey::new(mu, "Earth", "Mars", &epochs, &epochs)
    }

    fn empty_grid() -> TransferGrid {
        let grids = || PathGrids {
            c3: Grid::from_rows(Vec::new(), 0),
            v_infinity: Grid::from_rows(Vec::new(), 0),
            delta_v: Grid::from_rows(Vec::new(), 0),
        };
        TransferGrid {
            departure_body: Body::Earth,
            arrival_body: Body::Mars,
            departure_dates: Vec::new(),
            arrival_dates: Vec::new(),
            departure_epochs: Vec::new(),
            arrival_epochs: Vec::new(),
            tof_days: Grid::from_rows(Vec::new(), 0),
            short: grids(),
            long: grids(),
        }
    }

    #[test]
    fn keys_compare_floats_bitwise() {
        let epochs = [Epoch::from_julian_date(2_459_761.5)];
        let a = CacheKey::new(1.0, "Earth", "Mars", &epochs, &epochs);
        let b = CacheKey::new(1.0, "Earth", "Mars", &epochs, &epochs);
        let c = CacheKey::new(1.0 + f64::EPSILON, "Earth", "Mars", &epochs, &epochs);
        let d = CacheKey::new(1.0, "Mars", "Earth", &epochs, &epochs);
        assert_eq!(a, b);
        assert_ne!(a, c);
        assert_ne!(a, d);
    }

    #[test]
    fn failed_computations_leave_no_slot_behind() {
        let cache = ResultCache::new();
        for mu in [1.0, 2.0, 3.0] {
            let result = cache.get_or_compute(key(mu), || Err::<TransferGrid, _>("no states"));
            assert_eq!(result.unwrap_err(), "no states");
        }
        assert!(lock(&cache.slots).by_key.is_empty());
        assert!(cache.is_empty());

        cache
            .get_or_compute(key(1.0), || Ok::<_, ()>(empty_grid()))
            .unwrap();
        assert_eq!(lock(&cache.slots).by_key.len(), 1);
        assert_eq!(cache.len(), 1);
    }

    #[test]
    fn failed_slot_is_registered_again_by_a_successful_waiter() {
        let cache = ResultCache::new();
        let slot: Slot = Arc::default();
        lock(&cache.slots).by_key.insert(key(1.0), Arc::clone(&slot));

        lock(&cache.slots).discard(&key(1.0), &slot);
        assert!(cache.get(&key(1.0)).is_none());

        *lock(&slot) = Some(Arc::new(empty_grid()));
        lock(&cache.slots).publish(key(1.0), &slot);
        assert!(cache.contains(&key(1.0)));
        assert_eq!(cache.len(), 1);
    }

    #[test]
    fn len_does_not_wait_for_computations_in_flight() {
        let cache = ResultCache::new();
        cache
            .get_or_compute(key(1.0), || Ok::<_, ()>(empty_grid()))
            .unwrap();
        let entered = Barrier::new(2);
        let release = Barrier::new(2);

        thread::scope(|scope| {
            let worker = scope.spawn(|| {
                cache.get_or_compute(key(2.0), || {
                    entered.wait();
                    release.wait();
                    Ok::<_, ()>(empty_grid())
                })
            });
            entered.wait();
            assert_eq!(cache.len(), 1);
            assert!(!cache.is_empty());
            release.wait();
            worker.join().unwrap().unwrap();
        });
        assert_eq!(cache.len(), 2);
    }
}
