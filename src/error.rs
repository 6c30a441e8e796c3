use crate::domain::commission::CommissionId;
use crate::domain::contract::ContractId;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum CommissionError {
    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("contract {0} has no financing amount or term")]
    MissingFinancingData(ContractId),
    #[error("commission {0} not found")]
    NotFound(CommissionId),
    #[error("storage error: {0}")]
    Internal(Box<dyn std::error::Error + Send + Sync>),
}

#[cfg(feature = "storage-rocksdb")]
impl From<rocksdb::Error> for CommissionError {
    fn from(e: rocksdb::Error) -> Self {
        Self::Internal(Box::new(e))
    }
}

pub type Result<T> = std::result::Result<T, CommissionError>;
