use crate::domain::receivable::{ClientPayment, Installment};
use crate::error::{CommissionError, Result};
use std::io::Read;

/// Reads the accounts-receivable installment schedule from a CSV source.
pub struct InstallmentReader<R: Read> {
    reader: csv::Reader<R>,
}

impl<R: Read> InstallmentReader<R> {
    pub fn new(source: R) -> Self {
        let reader = csv::ReaderBuilder::new()
            .trim(csv::Trim::All)
            .flexible(true)
            .from_reader(source);
        Self { reader }
    }

    pub fn installments(self) -> impl Iterator<Item = Result<Installment>> {
        self.reader
            .into_deserialize()
            .map(|result| result.map_err(CommissionError::from))
    }
}

/// Reads client payments from a CSV source.
pub struct ClientPaymentReader<R: Read> {
    reader: csv::Reader<R>,
}

impl<R: Read> ClientPaymentReader<R> {
    pub fn new(source: R) -> Self {
        let reader = csv::ReaderBuilder::new()
            .trim(csv::Trim::All)
            .flexible(true)
            .from_reader(source);
        Self { reader }
    }

    pub fn payments(self) -> impl Iterator<Item = Result<ClientPayment>> {
        self.reader
            .into_deserialize()
            .map(|result| result.map_err(CommissionError::from))
    }
}
