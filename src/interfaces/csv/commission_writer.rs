use crate::domain::commission::Commission;
use crate::error::Result;
use std::io::Write;

/// Writes commission records as CSV for payout processors.
pub struct CommissionWriter<W: Write> {
    writer: csv::Writer<W>,
}

impl<W: Write> CommissionWriter<W> {
    pub fn new(destination: W) -> Self {
        Self {
            writer: csv::Writer::from_writer(destination),
        }
    }

    pub fn write_commissions(&mut self, commissions: &[Commission]) -> Result<()> {
        self.writer.write_record([
            "id",
            "contract",
            "employee",
            "part",
            "rate",
            "amount",
            "verification",
            "payment_status",
        ])?;

        for commission in commissions {
            let part = commission
                .payment_part
                .map(|p| p.number().to_string())
                .unwrap_or_default();
            self.writer.write_record([
                commission.id.to_string(),
                commission.contract_id.to_string(),
                commission.employee_id.to_string(),
                part,
                format!("{:.2}", commission.rate),
                format!("{:.2}", commission.amount),
                commission.verification.as_str().to_string(),
                commission.payment_status.as_str().to_string(),
            ])?;
        }

        self.writer.flush()?;
        Ok(())
    }
}
