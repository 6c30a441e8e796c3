use crate::domain::contract::Contract;
use crate::error::{CommissionError, Result};
use std::io::Read;

/// Reads contracts from a CSV source.
///
/// Wraps `csv::Reader` and provides an iterator over `Result<Contract>`,
/// trimming whitespace and tolerating flexible record lengths so one bad row
/// never aborts the stream.
pub struct ContractReader<R: Read> {
    reader: csv::Reader<R>,
}

impl<R: Read> ContractReader<R> {
    /// Creates a new `ContractReader` from any `Read` source (e.g., File, Stdin).
    pub fn new(source: R) -> Self {
        let reader = csv::ReaderBuilder::new()
            .trim(csv::Trim::All)
            .flexible(true)
            .from_reader(source);
        Self { reader }
    }

    /// Returns an iterator that lazily reads and deserializes contracts.
    pub fn contracts(self) -> impl Iterator<Item = Result<Contract>> {
        self.reader
            .into_deserialize()
            .map(|result| result.map_err(CommissionError::from))
    }
}
