pub mod commission_writer;
pub mod contract_reader;
pub mod receivable_reader;
