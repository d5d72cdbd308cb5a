use std::path::Path;
use std::sync::Arc;

use tracing::{debug, info, warn};

use super::StorageError;
use crate::types::{LandParcel, PlanRecord};

const PLANS_TREE: &str = "regeneration_plans";
const PARCELS_TREE: &str = "land_parcels";
const PING_KEY: &[u8] = b"__ping__";

/// Sled-backed store for plan records and land parcels.
#[derive(Clone)]
pub struct PlanStorage {
    db: Arc<sled::Db>,
    plans: sled::Tree,
    parcels: sled::Tree,
}

impl PlanStorage {
    /// Open or create the store at `path`.
    pub fn open<P: AsRef<Path>>(path: P) -> Result<Self, StorageError> {
        let path_ref = path.as_ref();
        let db = sled::open(path_ref)?;
        let plans = db.open_tree(PLANS_TREE)?;
        let parcels = db.open_tree(PARCELS_TREE)?;

        info!(
            path = %path_ref.display(),
            plans = plans.len(),
            parcels = parcels.len(),
            "Plan storage opened"
        );

        Ok(Self {
            db: Arc::new(db),
            plans,
            parcels,
        })
    }

    /// Lightweight read that proves the store is answering.
    pub fn ping(&self) -> Result<(), StorageError> {
        self.db.get(PING_KEY)?;
        Ok(())
    }

    /// Persist a plan record, assigning it a fresh id.
    ///
    /// Key: id as u64 big-endian bytes (sorts by insertion order)
    /// Value: JSON-serialized `PlanRecord`
    pub fn store_plan(&self, record: &PlanRecord) -> Result<PlanRecord, StorageError> {
        // generate_id starts at 0; ids are reported 1-based
        let id = self.db.generate_id()? + 1;
        let stored = PlanRecord {
            id,
            ..record.clone()
        };

        let value = serde_json::to_vec(&stored)?;
        self.plans.insert(id.to_be_bytes(), value)?;

        debug!(id, parcel_id = stored.parcel_id, "Stored regeneration plan");
        Ok(stored)
    }

    /// Look up a plan record by id.
    pub fn get_plan(&self, id: u64) -> Result<Option<PlanRecord>, StorageError> {
        match self.plans.get(id.to_be_bytes())? {
            Some(value) => Ok(Some(serde_json::from_slice(&value)?)),
            None => Ok(None),
        }
    }

    /// Most recent `limit` plan records, newest first.
    ///
    /// Records that fail to deserialize are skipped with a warning.
    pub fn recent_plans(&self, limit: usize) -> Result<Vec<PlanRecord>, StorageError> {
        let mut records = Vec::with_capacity(limit.min(self.plans.len()));

        for item in self.plans.iter().rev() {
            if records.len() >= limit {
                break;
            }

            let (key, value) = item?;
            match serde_json::from_slice::<PlanRecord>(&value) {
                Ok(record) => records.push(record),
                Err(e) => warn!(key = ?key, error = %e, "Skipping unreadable plan record"),
            }
        }

        Ok(records)
    }

    /// Insert or replace a land parcel.
    pub fn upsert_parcel(&self, parcel: &LandParcel) -> Result<(), StorageError> {
        let value = serde_json::to_vec(parcel)?;
        self.parcels.insert(parcel.id.to_be_bytes(), value)?;
        info!(parcel_id = parcel.id, level = ?parcel.degradation_level, "Parcel registered");
        Ok(())
    }

    pub fn get_parcel(&self, id: u64) -> Result<Option<LandParcel>, StorageError> {
        match self.parcels.get(id.to_be_bytes())? {
            Some(value) => Ok(Some(serde_json::from_slice(&value)?)),
            None => Ok(None),
        }
    }

    /// Flush pending writes to disk
    pub fn flush(&self) -> Result<(), StorageError> {
        self.db.flush()?;
        Ok(())
    }
}

impl std::fmt::Debug for PlanStorage {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PlanStorage")
            .field("plans", &self.plans.len())
            .field("parcels", &self.parcels.len())
            .finish()
    }
}
