use anyhow::{Context, Result};
use chrono::Utc;
use rusqlite::{params, Connection, OptionalExtension, TransactionBehavior};

use crate::{
    db::Database,
    error::{self, SurveyError},
    storage::{Region, RegionSet, StoragePort},
};

fn select_region(conn: &Connection, region: Region) -> Result<Option<String>> {
    conn.query_row(
        "SELECT value FROM kv_regions WHERE key = ?1",
        params![region.key()],
        |row| row.get::<_, String>(0),
    )
    .optional()
    .with_context(|| format!("failed to read {region}"))
}

fn upsert_region(conn: &Connection, region: Region, value: &str) -> Result<()> {
    conn.execute(
        "INSERT INTO kv_regions (key, value, updated_at)
         VALUES (?1, ?2, ?3)
         ON CONFLICT(key) DO UPDATE SET
             value = excluded.value,
             updated_at = excluded.updated_at",
        params![region.key(), value, Utc::now().to_rfc3339()],
    )
    .with_context(|| format!("failed to write {region}"))?;
    Ok(())
}

impl Database {
    pub fn read_region(&self, region: Region) -> Result<Option<String>> {
        self.execute(move |conn| select_region(conn, region))
    }

    pub fn write_region(&self, region: Region, value: &str) -> Result<()> {
        let value = value.to_string();
        self.execute(move |conn| upsert_region(conn, region, &value))
    }
}

impl StoragePort for Database {
    fn load(&self, region: Region) -> Result<Option<String>> {
        self.read_region(region)
    }

    fn store(&self, region: Region, value: &str) -> Result<()> {
        self.write_region(region, value)
    }

    /// Runs the whole read-modify-write in one `BEGIN IMMEDIATE` transaction,
    /// so writers in other processes queue behind it instead of interleaving.
    fn update<T, F>(&self, apply: F) -> error::Result<T>
    where
        F: FnOnce(&mut RegionSet) -> error::Result<T> + Send + 'static,
        T: Send + 'static,
    {
        self.execute(move |conn| {
            let tx = conn
                .transaction_with_behavior(TransactionBehavior::Immediate)
                .context("failed to begin region update")?;

            let mut loaded = Vec::with_capacity(Region::ALL.len());
            for region in Region::ALL {
                loaded.push((region, select_region(&tx, region)?));
            }

            let mut set = RegionSet::new(loaded);
            let value = match apply(&mut set) {
                Ok(value) => value,
                // Dropping the transaction rolls it back
                Err(err) => return Ok(Err(err)),
            };

            for (region, document) in set.staged() {
                upsert_region(&tx, region, document)?;
            }
            tx.commit().context("failed to commit region update")?;
            Ok(Ok(value))
        })
        .map_err(SurveyError::Storage)?
    }
}
