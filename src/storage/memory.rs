use std::{collections::HashMap, sync::Mutex};

use anyhow::{anyhow, Result};

use super::{Region, RegionSet, StoragePort};
use crate::error::{self, SurveyError};

/// In-process backend. Used by tests and by callers that do not need the
/// survey to outlive the process.
#[derive(Debug, Default)]
pub struct MemoryStorage {
    regions: Mutex<HashMap<Region, String>>,
}

impl MemoryStorage {
    pub fn new() -> Self {
        Self::default()
    }

    /// Raw contents of a region, for inspection.
    pub fn snapshot(&self, region: Region) -> Option<String> {
        match self.regions.lock() {
            Ok(guard) => guard.get(&region).cloned(),
            Err(poisoned) => poisoned.into_inner().get(&region).cloned(),
        }
    }
}

impl StoragePort for MemoryStorage {
    fn load(&self, region: Region) -> Result<Option<String>> {
        let guard = self
            .regions
            .lock()
            .map_err(|_| anyhow!("memory storage lock poisoned"))?;
        Ok(guard.get(&region).cloned())
    }

    fn store(&self, region: Region, value: &str) -> Result<()> {
        let mut guard = self
            .regions
            .lock()
            .map_err(|_| anyhow!("memory storage lock poisoned"))?;
        guard.insert(region, value.to_string());
        Ok(())
    }

    /// Holds the lock for the whole update, so it can neither interleave with
    /// another one nor land halfway.
    fn update<T, F>(&self, apply: F) -> error::Result<T>
    where
        F: FnOnce(&mut RegionSet) -> error::Result<T> + Send + 'static,
        T: Send + 'static,
    {
        let mut guard = self
            .regions
            .lock()
            .map_err(|_| SurveyError::Storage(anyhow!("memory storage lock poisoned")))?;

        let mut set = RegionSet::new(
            Region::ALL.map(|region| (region, guard.get(&region).cloned())),
        );
        let value = apply(&mut set)?;
        for (region, document) in set.staged() {
            guard.insert(region, document.to_string());
        }
        Ok(value)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn unwritten_region_loads_as_none() {
        let storage = MemoryStorage::new();
        assert!(storage.load(Region::Responses).unwrap().is_none());
    }

    #[test]
    fn store_replaces_previous_value() {
        let storage = MemoryStorage::new();
        storage.store(Region::CurrentSession, "\"a\"").unwrap();
        storage.store(Region::CurrentSession, "\"b\"").unwrap();

        assert_eq!(
            storage.load(Region::CurrentSession).unwrap().as_deref(),
            Some("\"b\"")
        );
        assert_eq!(storage.snapshot(Region::Sessions), None);
    }

    #[test]
    fn concurrent_updates_do_not_lose_writes() {
        let storage = MemoryStorage::new();

        std::thread::scope(|scope| {
            for _ in 0..4 {
                scope.spawn(|| {
                    for _ in 0..50 {
                        storage
                            .update(|set| {
                                let count: u32 = set
                                    .get(Region::Responses)
                                    .map(|doc| doc.parse().unwrap())
                                    .unwrap_or(0);
                                set.put(Region::Responses, (count + 1).to_string());
                                Ok(())
                            })
                            .unwrap();
                    }
                });
            }
        });

        assert_eq!(storage.snapshot(Region::Responses).as_deref(), Some("200"));
    }
}
