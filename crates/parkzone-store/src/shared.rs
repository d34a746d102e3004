//! Shared registry handle.
//!
//! Readers take an `Arc` snapshot and never observe a half-applied change;
//! writers build a modified copy and swap it in. Every successful swap bumps
//! the generation, which views use to notice that their drawn zones are stale.
//!
//! The lock is unwrapped on access. Poisoning only happens when a writer
//! panicked mid-swap, which leaves nothing sensible to recover.

use std::sync::{Arc, RwLock};

use parkzone_core::error::Result;

use crate::registry::ZoneRegistry;

#[derive(Debug, Default)]
struct Versioned {
    registry: Arc<ZoneRegistry>,
    generation: u64,
}

/// Cloneable handle to the current zone registry
#[derive(Debug, Clone, Default)]
pub struct SharedRegistry {
    inner: Arc<RwLock<Versioned>>,
}

impl SharedRegistry {
    pub fn new(registry: ZoneRegistry) -> Self {
        Self {
            inner: Arc::new(RwLock::new(Versioned { registry: Arc::new(registry), generation: 0 })),
        }
    }

    /// Current registry contents
    pub fn snapshot(&self) -> Arc<ZoneRegistry> {
        Arc::clone(&self.inner.read().unwrap().registry)
    }

    /// Registry contents together with their generation
    pub fn versioned_snapshot(&self) -> (Arc<ZoneRegistry>, u64) {
        let guard = self.inner.read().unwrap();
        (Arc::clone(&guard.registry), guard.generation)
    }

    pub fn generation(&self) -> u64 {
        self.inner.read().unwrap().generation
    }

    /// Swap in a new registry, returning the new generation
    pub fn replace(&self, registry: ZoneRegistry) -> u64 {
        let mut guard = self.inner.write().unwrap();
        guard.registry = Arc::new(registry);
        guard.generation += 1;
        tracing::debug!(generation = guard.generation, zones = guard.registry.len(), "Registry replaced");
        guard.generation
    }

    /// Apply a change to a copy of the registry.
    ///
    /// The copy replaces the current registry only when `f` succeeds; on error
    /// the registry and generation are untouched.
    pub fn update<T, F>(&self, f: F) -> Result<T>
    where
        F: FnOnce(&mut ZoneRegistry) -> Result<T>,
    {
        let mut guard = self.inner.write().unwrap();
        let mut next = (*guard.registry).clone();
        let value = f(&mut next)?;
        guard.registry = Arc::new(next);
        guard.generation += 1;
        Ok(value)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use parkzone_core::error::ParkzoneError;
    use parkzone_core::models::{Point, Polygon, Zone, ZoneId};

    fn triangle(id: &str) -> Zone {
        let polygon =
            Polygon::new(vec![Point::new(0.0, 0.0), Point::new(0.0, 1.0), Point::new(1.0, 0.5)])
                .unwrap();
        Zone::new(id, id, polygon, Point::new(0.3, 0.5))
    }

    #[test]
    fn test_snapshot_is_isolated_from_later_updates() {
        let shared = SharedRegistry::default();
        let before = shared.snapshot();

        shared.update(|registry| registry.add(triangle("a"))).unwrap();

        assert!(before.is_empty());
        assert_eq!(shared.snapshot().len(), 1);
        assert_eq!(shared.generation(), 1);
    }

    #[test]
    fn test_failed_update_keeps_generation() {
        let shared = SharedRegistry::new(ZoneRegistry::from_zones(vec![triangle("a")]).unwrap());

        let err = shared.update(|registry| registry.add(triangle("a"))).unwrap_err();
        assert!(matches!(err, ParkzoneError::DuplicateId { .. }));
        assert_eq!(shared.generation(), 0);
        assert_eq!(shared.snapshot().len(), 1);
    }

    #[test]
    fn test_replace_bumps_generation() {
        let shared = SharedRegistry::default();
        let clone = shared.clone();

        let generation = shared.replace(ZoneRegistry::from_zones(vec![triangle("b")]).unwrap());

        assert_eq!(generation, 1);
        let (registry, seen) = clone.versioned_snapshot();
        assert_eq!(seen, 1);
        assert!(registry.contains(&ZoneId::from("b")));
    }
}
