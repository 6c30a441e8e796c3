use crate::domain::commission::{Commission, CommissionId, PaymentPart, VerificationStatus};
use crate::domain::ports::{ClientPaymentStoreRef, CommissionStoreRef, InstallmentStoreRef};
use crate::error::{CommissionError, Result};
use rust_decimal::Decimal;
use tracing::debug;

/// What a verification pass concluded about the two payable parts of a
/// contract/employee commission.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VerificationReport {
    pub commission_id: CommissionId,
    pub first_payment_verified: bool,
    pub second_payment_verified: bool,
    pub message: String,
}

struct ChildOutcome {
    verified: bool,
    note: String,
}

/// Confirms that the client paid the loan installment backing each commission
/// part, and moves the commission's verification state forward accordingly.
///
/// Every pass is idempotent: records whose state is already terminal are left
/// untouched, and unchanged state is never re-persisted.
pub struct VerificationEngine {
    commissions: CommissionStoreRef,
    installments: InstallmentStoreRef,
    payments: ClientPaymentStoreRef,
}

impl VerificationEngine {
    pub fn new(
        commissions: CommissionStoreRef,
        installments: InstallmentStoreRef,
        payments: ClientPaymentStoreRef,
    ) -> Self {
        Self {
            commissions,
            installments,
            payments,
        }
    }

    /// Verifies the commission behind `id`.
    ///
    /// A parent id verifies both of its children. A child id verifies that
    /// child; the report's flag for the sibling part reflects the sibling's
    /// current standing without touching it.
    pub async fn verify(&self, id: CommissionId) -> Result<VerificationReport> {
        let commission = self
            .commissions
            .get(id)
            .await?
            .ok_or(CommissionError::NotFound(id))?;

        if commission.is_parent() {
            self.verify_family(id).await
        } else {
            self.verify_single(commission).await
        }
    }

    async fn verify_family(&self, parent_id: CommissionId) -> Result<VerificationReport> {
        let mut verified = [false, false];
        let mut notes = Vec::new();
        let mut children = self.commissions.children_of(parent_id).await?;
        children.sort_by_key(|c| c.payment_part.map(PaymentPart::number));

        for child in children {
            let Some(part) = child.payment_part else {
                continue;
            };
            let outcome = self.verify_child(child).await?;
            verified[part.installment_index()] = outcome.verified;
            notes.push(format!("part {}: {}", part.number(), outcome.note));
        }
        if notes.is_empty() {
            notes.push("no child records".to_string());
        }

        Ok(VerificationReport {
            commission_id: parent_id,
            first_payment_verified: verified[0],
            second_payment_verified: verified[1],
            message: notes.join("; "),
        })
    }

    async fn verify_single(&self, commission: Commission) -> Result<VerificationReport> {
        let id = commission.id;
        let Some(part) = commission.payment_part else {
            return Err(CommissionError::Internal(
                format!("child commission {id} has no payment part").into(),
            ));
        };

        let family = self
            .commissions
            .family_of(commission.contract_id, commission.employee_id)
            .await?;
        let sibling_verified = family
            .iter()
            .filter(|c| c.parent_id.is_some() && c.id != id)
            .any(|c| c.verification.is_terminal());

        let outcome = self.verify_child(commission).await?;
        let (first, second) = match part {
            PaymentPart::First => (outcome.verified, sibling_verified),
            PaymentPart::Second => (sibling_verified, outcome.verified),
        };

        Ok(VerificationReport {
            commission_id: id,
            first_payment_verified: first,
            second_payment_verified: second,
            message: format!("part {}: {}", part.number(), outcome.note),
        })
    }

    /// Runs the state machine for one child record, persisting only actual
    /// transitions.
    async fn verify_child(&self, mut commission: Commission) -> Result<ChildOutcome> {
        if !commission.requires_verification {
            if commission.advance_verification(VerificationStatus::NotRequired) {
                self.commissions.update(commission).await?;
            }
            return Ok(ChildOutcome {
                verified: true,
                note: "verification not required".to_string(),
            });
        }

        if commission.verification == VerificationStatus::FullyVerified {
            return Ok(ChildOutcome {
                verified: true,
                note: "already verified".to_string(),
            });
        }

        let Some(part) = commission.payment_part else {
            return Err(CommissionError::Internal(
                format!("child commission {} has no payment part", commission.id).into(),
            ));
        };

        let schedule = self.installments.schedule_for(commission.contract_id).await?;
        let Some(installment) = schedule.get(part.installment_index()) else {
            // Missing installment data is non-fatal; the record simply stays
            // pending until the schedule shows up.
            debug!(
                commission = %commission.id,
                contract = %commission.contract_id,
                part = part.number(),
                "installment not on record, leaving verification pending"
            );
            return Ok(ChildOutcome {
                verified: false,
                note: format!("installment {} not on record", part.number()),
            });
        };

        let paid_total: Decimal = self
            .payments
            .for_installment(installment.id)
            .await?
            .iter()
            .map(|p| p.amount)
            .sum();

        if installment.is_settled_by(paid_total) {
            let id = commission.id;
            if commission.advance_verification(VerificationStatus::FullyVerified) {
                self.commissions.update(commission).await?;
            }
            debug!(commission = %id, "installment settled, commission payable");
            Ok(ChildOutcome {
                verified: true,
                note: "client payment verified".to_string(),
            })
        } else if paid_total > Decimal::ZERO {
            let note = format!(
                "partially paid ({paid_total:.2} of {:.2})",
                installment.original_amount
            );
            if commission.advance_verification(VerificationStatus::PartiallyVerified) {
                self.commissions.update(commission).await?;
            }
            Ok(ChildOutcome {
                verified: false,
                note,
            })
        } else {
            Ok(ChildOutcome {
                verified: false,
                note: "no client payment recorded".to_string(),
            })
        }
    }
}
