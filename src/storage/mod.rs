//! Key/value storage port used by the session manager.
//!
//! The survey state lives in three independent named regions, each holding a
//! JSON document. Backends only move strings in and out; parsing and the
//! consistency rules between regions belong to the session manager.

mod memory;

pub use memory::MemoryStorage;

use std::{collections::BTreeMap, fmt};

use anyhow::Result;

use crate::error::{self, SurveyError};

const ENABLE_LOGS: bool = true;

use crate::log_error;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Region {
    /// JSON array of every response record
    Responses,
    /// JSON object keyed by session id
    Sessions,
    /// JSON string naming the active session
    CurrentSession,
}

impl Region {
    pub const ALL: [Region; 3] = [Region::Responses, Region::Sessions, Region::CurrentSession];

    pub fn key(&self) -> &'static str {
        match self {
            Region::Responses => "workshopResponses",
            Region::Sessions => "workshopSessions",
            Region::CurrentSession => "currentSessionId",
        }
    }

    /// Document a region holds when it has never been written.
    pub fn empty_document(&self) -> &'static str {
        match self {
            Region::Responses => "[]",
            Region::Sessions => "{}",
            Region::CurrentSession => "null",
        }
    }
}

impl fmt::Display for Region {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.key())
    }
}

/// Every region as one update sees it, plus the replacements it staged.
#[derive(Debug, Default)]
pub struct RegionSet {
    documents: BTreeMap<Region, Option<String>>,
    /// Staged regions in the order they were first written
    staged: Vec<Region>,
}

impl RegionSet {
    pub fn new(loaded: impl IntoIterator<Item = (Region, Option<String>)>) -> Self {
        Self {
            documents: loaded.into_iter().collect(),
            staged: Vec::new(),
        }
    }

    pub fn get(&self, region: Region) -> Option<&str> {
        self.documents.get(&region).and_then(|doc| doc.as_deref())
    }

    pub fn put(&mut self, region: Region, document: String) {
        if !self.staged.contains(&region) {
            self.staged.push(region);
        }
        self.documents.insert(region, Some(document));
    }

    pub fn staged(&self) -> impl Iterator<Item = (Region, &str)> + '_ {
        self.staged
            .iter()
            .map(move |region| (*region, self.get(*region).unwrap_or_else(|| region.empty_document())))
    }
}

pub trait StoragePort {
    /// Returns the raw document stored under `region`, or `None` if it was never written.
    fn load(&self, region: Region) -> Result<Option<String>>;

    /// Replaces the document stored under `region`.
    fn store(&self, region: Region, value: &str) -> Result<()>;

    /// Read-modify-write over all regions as one unit.
    ///
    /// `apply` sees every region and stages replacements; nothing is written
    /// if it fails. The default loads and stores region by region, restoring
    /// earlier regions when a later store fails. Backends with transactions
    /// override it so concurrent writers cannot interleave.
    fn update<T, F>(&self, apply: F) -> error::Result<T>
    where
        F: FnOnce(&mut RegionSet) -> error::Result<T> + Send + 'static,
        T: Send + 'static,
    {
        let mut prior = Vec::with_capacity(Region::ALL.len());
        for region in Region::ALL {
            prior.push((region, self.load(region).map_err(SurveyError::Storage)?));
        }

        let mut set = RegionSet::new(prior.clone());
        let value = apply(&mut set)?;
        store_staged(self, &set, &prior)?;
        Ok(value)
    }
}

/// Writes the staged regions in order.
///
/// If a write fails after an earlier one landed, the earlier regions are
/// restored to what they held before and the failure is reported as
/// `PartialWrite`.
fn store_staged<S: StoragePort + ?Sized>(
    storage: &S,
    set: &RegionSet,
    prior: &[(Region, Option<String>)],
) -> error::Result<()> {
    let mut written: Vec<Region> = Vec::new();

    for (region, document) in set.staged() {
        if let Err(err) = storage.store(region, document) {
            if written.is_empty() {
                return Err(SurveyError::Storage(err));
            }

            let rolled_back = roll_back(storage, &written, prior);
            log_error!(
                "partial write: storing {} failed after {} region(s) were written (rolled back: {}): {:#}",
                region,
                written.len(),
                rolled_back,
                err
            );
            return Err(SurveyError::PartialWrite {
                region,
                rolled_back,
                source: err,
            });
        }
        written.push(region);
    }

    Ok(())
}

fn roll_back<S: StoragePort + ?Sized>(
    storage: &S,
    written: &[Region],
    prior: &[(Region, Option<String>)],
) -> bool {
    let mut restored = true;
    for region in written.iter().rev() {
        let previous = prior
            .iter()
            .find(|(candidate, _)| candidate == region)
            .and_then(|(_, document)| document.as_deref())
            .unwrap_or_else(|| region.empty_document());
        if let Err(err) = storage.store(*region, previous) {
            log_error!("failed to restore {} during rollback: {:#}", region, err);
            restored = false;
        }
    }
    restored
}

impl<T: StoragePort + ?Sized> StoragePort for &T {
    fn load(&self, region: Region) -> Result<Option<String>> {
        (**self).load(region)
    }

    fn store(&self, region: Region, value: &str) -> Result<()> {
        (**self).store(region, value)
    }

    fn update<R, F>(&self, apply: F) -> error::Result<R>
    where
        F: FnOnce(&mut RegionSet) -> error::Result<R> + Send + 'static,
        R: Send + 'static,
    {
        (**self).update(apply)
    }
}

impl<T: StoragePort + ?Sized> StoragePort for std::sync::Arc<T> {
    fn load(&self, region: Region) -> Result<Option<String>> {
        (**self).load(region)
    }

    fn store(&self, region: Region, value: &str) -> Result<()> {
        (**self).store(region, value)
    }

    fn update<R, F>(&self, apply: F) -> error::Result<R>
    where
        F: FnOnce(&mut RegionSet) -> error::Result<R> + Send + 'static,
        R: Send + 'static,
    {
        (**self).update(apply)
    }
}
