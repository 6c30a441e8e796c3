//! Inbound/outbound adapters. Transport is an external concern; CSV is the
//! exchange format the import and payout pipelines speak.

pub mod csv;
