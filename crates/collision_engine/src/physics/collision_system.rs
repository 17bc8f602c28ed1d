//! Collider registry and per-frame collision sweep
//!
//! Based on Game Engine Architecture 3rd Edition, Chapter 13:
//! "The collision detection system is typically split into two phases:
//! broad-phase and narrow-phase."
//!
//! The broad phase here is brute force: every unordered pair of enabled
//! colliders is considered, gated only by the type-pair dispatch table. The
//! narrow phase is whatever test function the table holds for the pair.
//! Cost is O(n²) per frame.
//!
//! Colliders live in a generational arena owned by the manager. Entities keep
//! a [`ColliderHandle`]; a handle to a removed collider is detected as stale
//! instead of dangling.

use std::collections::{HashMap, HashSet};

use log::{debug, error, trace, warn};

use crate::config::CollisionConfig;
use crate::debug::CollisionDebugVisualizer;
use crate::foundation::collections::{ColliderArena, ColliderHandle};
use super::collider::Collider;
use super::collision_types::CollisionTypeId;
use super::CollisionError;

/// Narrow-phase test for an ordered pair of collider types
///
/// The first argument is a collider of the first registered type.
pub type PairTestFn = fn(&Collider, &Collider) -> bool;

/// Dispatch-table entry; `swapped` entries call the test with arguments reversed
#[derive(Clone, Copy)]
struct PairTest {
    test: PairTestFn,
    swapped: bool,
}

impl PairTest {
    fn run(self, a: &Collider, b: &Collider) -> bool {
        if self.swapped {
            (self.test)(b, a)
        } else {
            (self.test)(a, b)
        }
    }
}

/// Two colliders that overlapped during a sweep (smaller handle stored first)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct CollisionPair {
    /// First collider of the pair
    pub first: ColliderHandle,
    /// Second collider of the pair
    pub second: ColliderHandle,
}

impl CollisionPair {
    /// Create a new collision pair (always stores smaller handle first for consistency)
    pub fn new(a: ColliderHandle, b: ColliderHandle) -> Self {
        if a < b {
            Self { first: a, second: b }
        } else {
            Self { first: b, second: a }
        }
    }

    /// Whether `handle` is part of this pair
    pub fn involves(&self, handle: ColliderHandle) -> bool {
        self.first == handle || self.second == handle
    }

    /// The partner of `handle` in this pair
    pub fn other(&self, handle: ColliderHandle) -> Option<ColliderHandle> {
        if self.first == handle {
            Some(self.second)
        } else if self.second == handle {
            Some(self.first)
        } else {
            None
        }
    }
}

/// Owns the live colliders, the type-pair dispatch table and the sweep
pub struct CollisionManager {
    /// Live colliders
    colliders: ColliderArena<Collider>,

    /// (type A, type B) -> test
    pair_tests: HashMap<(CollisionTypeId, CollisionTypeId), PairTest>,

    /// Collision pairs from the current frame
    current_pairs: HashSet<CollisionPair>,

    /// Collision pairs from the previous frame
    previous_pairs: HashSet<CollisionPair>,

    config: CollisionConfig,

    /// Debug visualization flag; never affects the sweep
    visible: bool,
}

impl CollisionManager {
    /// Create an empty manager with default configuration
    pub fn new() -> Self {
        Self::with_config(CollisionConfig::default())
    }

    /// Create an empty manager
    pub fn with_config(config: CollisionConfig) -> Self {
        Self {
            colliders: ColliderArena::with_key(),
            pair_tests: HashMap::new(),
            current_pairs: HashSet::new(),
            previous_pairs: HashSet::new(),
            visible: config.debug_visible,
            config,
        }
    }

    /// Create a manager from a TOML or RON config file
    pub fn from_config_file(path: &str) -> Result<Self, CollisionError> {
        Ok(Self::with_config(CollisionConfig::load(path)?))
    }

    /// Active configuration
    pub fn config(&self) -> &CollisionConfig {
        &self.config
    }

    /// Register a collider and return its handle
    pub fn add_collider(&mut self, collider: Collider) -> ColliderHandle {
        let id = collider.id();
        let type_id = collider.type_id();
        let handle = self.colliders.insert(collider);
        debug!("Added {id} ({type_id}) as {handle:?}");
        handle
    }

    /// Unregister a collider, returning it
    ///
    /// Removing an absent or already-removed handle is a no-op.
    pub fn remove_collider(&mut self, handle: ColliderHandle) -> Option<Collider> {
        let removed = self.colliders.remove(handle)?;
        self.current_pairs.retain(|pair| !pair.involves(handle));
        debug!("Removed {} ({})", removed.id(), removed.type_id());
        Some(removed)
    }

    /// Whether `handle` refers to a live collider
    pub fn contains(&self, handle: ColliderHandle) -> bool {
        self.colliders.contains_key(handle)
    }

    /// Look up a collider
    pub fn get(&self, handle: ColliderHandle) -> Option<&Collider> {
        self.colliders.get(handle)
    }

    /// Look up a collider mutably
    pub fn get_mut(&mut self, handle: ColliderHandle) -> Option<&mut Collider> {
        self.colliders.get_mut(handle)
    }

    /// Look up a collider mutably, reporting stale handles as errors
    pub fn collider_mut(&mut self, handle: ColliderHandle) -> Result<&mut Collider, CollisionError> {
        match self.colliders.get_mut(handle) {
            Some(collider) => Ok(collider),
            None => {
                warn!("Stale collider handle {handle:?}");
                Err(CollisionError::StaleHandle(handle))
            }
        }
    }

    /// Apply `update` to a live collider
    pub fn update_collider<F>(&mut self, handle: ColliderHandle, update: F) -> Result<(), CollisionError>
    where
        F: FnOnce(&mut Collider),
    {
        update(self.collider_mut(handle)?);
        Ok(())
    }

    /// Number of live colliders
    pub fn len(&self) -> usize {
        self.colliders.len()
    }

    /// Whether no collider is registered
    pub fn is_empty(&self) -> bool {
        self.colliders.is_empty()
    }

    /// Iterate live colliders
    pub fn iter(&self) -> impl Iterator<Item = (ColliderHandle, &Collider)> {
        self.colliders.iter()
    }

    /// Drop every collider and all pair history; the dispatch table is kept
    pub fn clear(&mut self) {
        self.colliders.clear();
        self.current_pairs.clear();
        self.previous_pairs.clear();
    }

    /// Install the test for colliders of `type_a` against `type_b`
    ///
    /// The test receives the `type_a` collider first. Registering the same
    /// ordered pair again replaces the previous test, which is returned.
    pub fn register_pair_test(
        &mut self,
        type_a: CollisionTypeId,
        type_b: CollisionTypeId,
        test: PairTestFn,
    ) -> Option<PairTestFn> {
        let previous = self.pair_tests.insert((type_a, type_b), PairTest { test, swapped: false });
        if previous.is_some() {
            warn!("Replacing pair test for ({type_a}, {type_b})");
        } else {
            debug!("Registered pair test for ({type_a}, {type_b})");
        }
        previous.map(|entry| entry.test)
    }

    /// Install `test` for both `(type_a, type_b)` and `(type_b, type_a)`
    ///
    /// The reverse entry calls `test` with its arguments swapped, so `test`
    /// always sees the `type_a` collider first.
    pub fn register_pair_test_symmetric(
        &mut self,
        type_a: CollisionTypeId,
        type_b: CollisionTypeId,
        test: PairTestFn,
    ) {
        self.register_pair_test(type_a, type_b, test);
        if type_a != type_b {
            self.pair_tests.insert((type_b, type_a), PairTest { test, swapped: true });
        }
    }

    /// Remove the test for an ordered type pair
    pub fn unregister_pair_test(&mut self, type_a: CollisionTypeId, type_b: CollisionTypeId) -> bool {
        self.pair_tests.remove(&(type_a, type_b)).is_some()
    }

    /// Whether colliders of these types are tested against each other
    pub fn has_pair_test(&self, type_a: CollisionTypeId, type_b: CollisionTypeId) -> bool {
        self.find_pair_test(type_a, type_b).is_some()
    }

    /// Directional lookup: only the exact ordered key matches
    fn find_pair_test(&self, type_a: CollisionTypeId, type_b: CollisionTypeId) -> Option<PairTest> {
        self.pair_tests.get(&(type_a, type_b)).copied()
    }

    /// Test every unordered pair of enabled colliders and notify both sides of each overlap
    ///
    /// All pairs are tested before any handler runs, so handlers observe the
    /// frame's positions. Pairs without a registered test never collide.
    /// Returns the number of overlapping pairs.
    pub fn check_all_collisions(&mut self) -> usize {
        // Move current pairs to previous
        std::mem::swap(&mut self.current_pairs, &mut self.previous_pairs);
        self.current_pairs.clear();

        let handles: Vec<ColliderHandle> = self
            .colliders
            .iter_mut()
            .filter_map(|(handle, collider)| {
                collider.set_colliding(false);
                collider.is_enabled().then_some(handle)
            })
            .collect();

        let mut overlaps = Vec::new();
        let mut tested = 0usize;
        for (i, &handle_a) in handles.iter().enumerate() {
            for &handle_b in &handles[i + 1..] {
                let a = &self.colliders[handle_a];
                let b = &self.colliders[handle_b];
                let Some(pair_test) = self.find_pair_test(a.type_id(), b.type_id()) else {
                    continue;
                };

                tested += 1;
                if pair_test.run(a, b) {
                    overlaps.push((handle_a, handle_b));
                }
            }
        }

        trace!(
            "Collision sweep: {} colliders, {} pairs tested, {} overlapping",
            handles.len(),
            tested,
            overlaps.len()
        );

        let isolate = self.config.isolate_callback_panics;
        for (handle_a, handle_b) in overlaps {
            self.current_pairs.insert(CollisionPair::new(handle_a, handle_b));

            let Some([a, b]) = self.colliders.get_disjoint_mut([handle_a, handle_b]) else {
                continue;
            };
            a.set_colliding(true);
            b.set_colliding(true);

            if !a.notify(b, isolate) {
                error!("Collision handler of {} panicked while handling {}; skipped", a.id(), b.id());
            }
            if !b.notify(a, isolate) {
                error!("Collision handler of {} panicked while handling {}; skipped", b.id(), a.id());
            }
        }

        self.current_pairs.len()
    }

    /// Pairs that started overlapping in the last sweep
    pub fn collisions_entered(&self) -> Vec<CollisionPair> {
        self.current_pairs
            .difference(&self.previous_pairs)
            .copied()
            .collect()
    }

    /// Pairs that stopped overlapping in the last sweep
    pub fn collisions_exited(&self) -> Vec<CollisionPair> {
        self.previous_pairs
            .difference(&self.current_pairs)
            .copied()
            .collect()
    }

    /// All pairs overlapping in the last sweep
    pub fn current_collisions(&self) -> &HashSet<CollisionPair> {
        &self.current_pairs
    }

    /// Handles overlapping `handle` in the last sweep
    pub fn collisions_for(&self, handle: ColliderHandle) -> Vec<ColliderHandle> {
        self.current_pairs
            .iter()
            .filter_map(|pair| pair.other(handle))
            .collect()
    }

    /// Whether `handle` overlapped anything in the last sweep
    pub fn is_colliding(&self, handle: ColliderHandle) -> bool {
        self.current_pairs.iter().any(|pair| pair.involves(handle))
    }

    /// Turn debug visualization on or off
    pub fn set_visible(&mut self, visible: bool) {
        self.visible = visible;
    }

    /// Whether debug visualization is on
    pub fn is_visible(&self) -> bool {
        self.visible
    }

    /// Advance debug visualization; does nothing while hidden
    pub fn update(&self, visualizer: &mut CollisionDebugVisualizer, delta_time: f32) {
        if !self.visible {
            return;
        }
        visualizer.update(delta_time);
    }

    /// Queue debug shapes for every collider flagged for drawing; does nothing while hidden
    pub fn draw_debug(&self, visualizer: &mut CollisionDebugVisualizer) {
        if !self.visible {
            return;
        }
        for (_, collider) in self.colliders.iter() {
            visualizer.draw_collider(collider);
        }
    }
}

impl Default for CollisionManager {
    fn default() -> Self {
        Self::new()
    }
}
