use clap::Parser;
use commission_engine::application::ledger::{CommissionLedger, PayableFilter};
use commission_engine::application::verification::VerificationEngine;
use commission_engine::domain::contract::{AdvisorId, Period};
use commission_engine::domain::ports::{
    ClientPaymentStoreRef, CommissionStoreRef, ContractStoreRef, InstallmentStoreRef,
};
use commission_engine::infrastructure::in_memory::{
    InMemoryClientPaymentStore, InMemoryCommissionStore, InMemoryContractStore,
    InMemoryInstallmentStore,
};
use commission_engine::interfaces::csv::commission_writer::CommissionWriter;
use commission_engine::interfaces::csv::contract_reader::ContractReader;
use commission_engine::interfaces::csv::receivable_reader::{
    ClientPaymentReader, InstallmentReader,
};
use miette::{IntoDiagnostic, Result};
use std::fs::File;
use std::io;
use std::path::PathBuf;
use std::sync::Arc;

#[derive(Parser)]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Contracts CSV file
    #[arg(long)]
    contracts: PathBuf,

    /// Installment schedule CSV file (optional)
    #[arg(long)]
    installments: Option<PathBuf>,

    /// Client payments CSV file (optional)
    #[arg(long)]
    payments: Option<PathBuf>,

    /// Generation period month
    #[arg(long, value_parser = clap::value_parser!(u32).range(1..=12))]
    month: u32,

    /// Generation period year
    #[arg(long)]
    year: i32,

    /// Restrict the payable listing to one employee
    #[arg(long)]
    employee: Option<u32>,

    /// Path to persistent commission database (optional). If provided, uses RocksDB.
    #[arg(long)]
    db_path: Option<PathBuf>,
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_writer(io::stderr)
        .init();

    let cli = Cli::parse();
    let period = Period::new(cli.month, cli.year);

    let contract_store = InMemoryContractStore::new();
    let contracts_file = File::open(&cli.contracts).into_diagnostic()?;
    for result in ContractReader::new(contracts_file).contracts() {
        match result {
            Ok(contract) => contract_store.insert(contract).await,
            Err(e) => eprintln!("Error reading contract: {}", e),
        }
    }

    let installment_store = InMemoryInstallmentStore::new();
    if let Some(path) = &cli.installments {
        let file = File::open(path).into_diagnostic()?;
        for result in InstallmentReader::new(file).installments() {
            match result {
                Ok(installment) => installment_store.insert(installment).await,
                Err(e) => eprintln!("Error reading installment: {}", e),
            }
        }
    }

    let payment_store = InMemoryClientPaymentStore::new();
    if let Some(path) = &cli.payments {
        let file = File::open(path).into_diagnostic()?;
        for result in ClientPaymentReader::new(file).payments() {
            match result {
                Ok(payment) => payment_store.record(payment).await,
                Err(e) => eprintln!("Error reading payment: {}", e),
            }
        }
    }

    let contracts: ContractStoreRef = Arc::new(contract_store);
    let installments: InstallmentStoreRef = Arc::new(installment_store);
    let payments: ClientPaymentStoreRef = Arc::new(payment_store);

    let commissions: CommissionStoreRef = match cli.db_path {
        #[cfg(feature = "storage-rocksdb")]
        Some(db_path) => {
            use commission_engine::infrastructure::rocksdb::RocksDbCommissionStore;
            Arc::new(RocksDbCommissionStore::open(db_path).into_diagnostic()?)
        }
        #[cfg(not(feature = "storage-rocksdb"))]
        Some(_) => {
            eprintln!(
                "WARNING: Persistent storage requested via --db-path, but 'storage-rocksdb' \
                 feature is not enabled. Falling back to in-memory storage."
            );
            Arc::new(InMemoryCommissionStore::new())
        }
        None => Arc::new(InMemoryCommissionStore::new()),
    };

    let ledger = CommissionLedger::new(contracts, installments.clone(), commissions.clone());
    let engine = VerificationEngine::new(commissions, installments, payments);

    // Generate first, then re-check every payable part against the client's
    // installment payments before listing anything as payable.
    let generated = ledger
        .generate_for_period(period)
        .await
        .into_diagnostic()?;
    for commission in generated.iter().filter(|c| !c.is_parent()) {
        if let Err(e) = engine.verify(commission.id).await {
            eprintln!("Error verifying commission: {}", e);
        }
    }

    let payable = ledger
        .get_payable(PayableFilter {
            employee_id: cli.employee.map(AdvisorId),
            period: Some(period),
        })
        .await
        .into_diagnostic()?;

    let stdout = io::stdout();
    let mut writer = CommissionWriter::new(stdout.lock());
    writer.write_commissions(&payable).into_diagnostic()?;

    Ok(())
}
