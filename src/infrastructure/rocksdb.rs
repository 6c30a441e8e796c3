use crate::domain::commission::{
    Commission, CommissionId, NewFamily, PaymentStatus, PayoutBlock, payout_block,
};
use crate::domain::contract::{AdvisorId, ContractId};
use crate::domain::ports::{CommissionStore, PayoutDecision};
use crate::error::{CommissionError, Result};
use async_trait::async_trait;
use rocksdb::{ColumnFamilyDescriptor, DB, Options, WriteBatch};
use std::path::Path;
use std::sync::Arc;
use tokio::sync::Mutex;

/// Column Family for storing commission records.
pub const CF_COMMISSIONS: &str = "commissions";

/// A persistent commission store backed by RocksDB.
///
/// Records are keyed by big-endian id and stored as JSON. A single writer
/// gate serializes every mutation, so the uniqueness check of
/// `insert_family` and the exclusion check of `mark_paid` each run atomically
/// with their write.
///
/// This struct is thread-safe (`Clone` shares the underlying `Arc<DB>`).
#[derive(Clone)]
pub struct RocksDbCommissionStore {
    db: Arc<DB>,
    /// Highest assigned id; doubles as the single-writer gate.
    next_id: Arc<Mutex<u64>>,
}

impl RocksDbCommissionStore {
    /// Opens or creates a RocksDB instance at the specified path, ensuring
    /// the commissions column family exists and recovering the id counter
    /// from the stored keys.
    pub fn open<P: AsRef<Path>>(path: P) -> Result<Self> {
        let mut opts = Options::default();
        opts.create_if_missing(true);
        opts.create_missing_column_families(true);

        let cf_commissions = ColumnFamilyDescriptor::new(CF_COMMISSIONS, Options::default());
        let db = DB::open_cf_descriptors(&opts, path, vec![cf_commissions])?;

        let mut highest = 0u64;
        if let Some(cf) = db.cf_handle(CF_COMMISSIONS) {
            for item in db.iterator_cf(cf, rocksdb::IteratorMode::End) {
                let (key, _value) = item?;
                if let Ok(bytes) = <[u8; 8]>::try_from(key.as_ref()) {
                    highest = u64::from_be_bytes(bytes);
                }
                break;
            }
        }

        Ok(Self {
            db: Arc::new(db),
            next_id: Arc::new(Mutex::new(highest)),
        })
    }

    fn cf(&self) -> Result<&rocksdb::ColumnFamily> {
        self.db.cf_handle(CF_COMMISSIONS).ok_or_else(|| {
            CommissionError::Internal(Box::new(std::io::Error::other(
                "commissions column family not found",
            )))
        })
    }

    fn encode(commission: &Commission) -> Result<Vec<u8>> {
        serde_json::to_vec(commission).map_err(|e| CommissionError::Internal(Box::new(e)))
    }

    fn decode(bytes: &[u8]) -> Result<Commission> {
        serde_json::from_slice(bytes).map_err(|e| CommissionError::Internal(Box::new(e)))
    }

    fn scan(&self) -> Result<Vec<Commission>> {
        let cf = self.cf()?;
        let mut records = Vec::new();
        for item in self.db.iterator_cf(cf, rocksdb::IteratorMode::Start) {
            let (_key, value) = item?;
            records.push(Self::decode(&value)?);
        }
        Ok(records)
    }

    fn scan_family(&self, contract_id: ContractId, employee_id: AdvisorId) -> Result<Vec<Commission>> {
        let mut family: Vec<Commission> = self
            .scan()?
            .into_iter()
            .filter(|c| c.contract_id == contract_id && c.employee_id == employee_id)
            .collect();
        family.sort_by_key(|c| c.id);
        Ok(family)
    }

    fn put(&self, commission: &Commission) -> Result<()> {
        let cf = self.cf()?;
        self.db
            .put_cf(cf, commission.id.0.to_be_bytes(), Self::encode(commission)?)?;
        Ok(())
    }
}

#[async_trait]
impl CommissionStore for RocksDbCommissionStore {
    async fn insert_family(&self, family: NewFamily) -> Result<Vec<Commission>> {
        let mut next_id = self.next_id.lock().await;

        let existing = self.scan_family(family.contract_id, family.employee_id)?;
        if !existing.is_empty() {
            return Ok(existing);
        }

        let mut allocate = || {
            *next_id += 1;
            CommissionId(*next_id)
        };
        let (parent_id, first_id, second_id) = (allocate(), allocate(), allocate());
        let records = family.records(parent_id, first_id, second_id);

        let cf = self.cf()?;
        let mut batch = WriteBatch::default();
        for record in &records {
            batch.put_cf(cf, record.id.0.to_be_bytes(), Self::encode(record)?);
        }
        self.db.write(batch)?;
        Ok(records.to_vec())
    }

    async fn get(&self, id: CommissionId) -> Result<Option<Commission>> {
        let cf = self.cf()?;
        match self.db.get_cf(cf, id.0.to_be_bytes())? {
            Some(bytes) => Ok(Some(Self::decode(&bytes)?)),
            None => Ok(None),
        }
    }

    async fn family_of(
        &self,
        contract_id: ContractId,
        employee_id: AdvisorId,
    ) -> Result<Vec<Commission>> {
        self.scan_family(contract_id, employee_id)
    }

    async fn children_of(&self, parent_id: CommissionId) -> Result<Vec<Commission>> {
        let mut children: Vec<Commission> = self
            .scan()?
            .into_iter()
            .filter(|c| c.parent_id == Some(parent_id))
            .collect();
        children.sort_by_key(|c| c.id);
        Ok(children)
    }

    async fn update(&self, commission: Commission) -> Result<()> {
        let _gate = self.next_id.lock().await;
        self.put(&commission)
    }

    async fn all(&self) -> Result<Vec<Commission>> {
        // Keys are big-endian ids, so the scan is already id-ordered.
        self.scan()
    }

    async fn mark_paid(&self, id: CommissionId) -> Result<PayoutDecision> {
        let _gate = self.next_id.lock().await;

        let cf = self.cf()?;
        let Some(bytes) = self.db.get_cf(cf, id.0.to_be_bytes())? else {
            return Ok(PayoutDecision::Blocked(PayoutBlock::NotFound));
        };
        let mut target = Self::decode(&bytes)?;
        let family = self.scan_family(target.contract_id, target.employee_id)?;
        if let Some(block) = payout_block(&target, &family) {
            return Ok(PayoutDecision::Blocked(block));
        }
        target.payment_status = PaymentStatus::Paid;
        self.put(&target)?;
        Ok(PayoutDecision::Updated)
    }
}
