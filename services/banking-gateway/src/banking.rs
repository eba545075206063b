//! Mock core-banking responses

use crate::config::BankingConfig;
use crate::models::{
    BalanceResponse, BankingConfirmation, StatementEntry, TransactionRecord, TransferResponse,
};
use chrono::{DateTime, Duration, Utc};
use risk_engine::TransactionStatus;
use rust_decimal::Decimal;
use uuid::Uuid;

#[derive(Debug, Clone)]
pub struct MockBank {
    config: BankingConfig,
}

impl MockBank {
    pub fn new(config: BankingConfig) -> Self {
        Self { config }
    }

    pub fn balance(&self) -> BalanceResponse {
        BalanceResponse {
            balance: self.config.opening_balance,
            currency: self.config.currency.clone(),
            account_number: self.config.account_mask.clone(),
            last_updated: Utc::now(),
        }
    }

    /// Confirmation for a completed transfer. The balance is not carried
    /// between requests.
    pub fn confirm(&self, transaction_id: Uuid, amount: Decimal) -> BankingConfirmation {
        let now = Utc::now();
        BankingConfirmation {
            transaction_id,
            bank_reference: format!("BNK{}", now.timestamp_millis()),
            timestamp: now,
            new_balance: self.config.opening_balance - amount,
        }
    }

    pub fn transfer(&self) -> TransferResponse {
        let now = Utc::now();
        let millis = now.timestamp_millis();
        TransferResponse {
            success: true,
            transaction_id: format!("TXN{millis}"),
            reference: format!("REF{millis}"),
            message: "Transfer completed successfully".to_string(),
            timestamp: now,
        }
    }

    /// The user's records as statement lines, or the demo statement when
    /// there is no history yet.
    pub fn statement(&self, records: &[TransactionRecord]) -> Vec<StatementEntry> {
        if records.is_empty() {
            return sample_statement(Utc::now());
        }

        records
            .iter()
            .map(|record| StatementEntry {
                id: record.id.to_string(),
                date: record.created_at,
                description: match record.payee_name.as_deref() {
                    Some(payee) => format!("Transfer to {payee}"),
                    None => "Transfer".to_string(),
                },
                amount: -record.amount,
                balance: None,
                status: Some(record.status),
            })
            .collect()
    }
}

fn sample_statement(now: DateTime<Utc>) -> Vec<StatementEntry> {
    let lines: [(&str, i64, i64, i64); 5] = [
        ("Grocery Store", -500_00, 45_730_50, 1),
        ("Electric Bill Payment", -1_200_00, 46_230_50, 2),
        ("Salary Credit", 50_000_00, 47_430_50, 3),
        ("Online Shopping", -2_500_00, -2_570_50, 4),
        ("Restaurant", -850_00, 150_50, 5),
    ];

    lines
        .iter()
        .enumerate()
        .map(|(i, (description, amount, balance, days_ago))| StatementEntry {
            id: (i + 1).to_string(),
            date: now - Duration::days(*days_ago),
            description: description.to_string(),
            amount: Decimal::new(*amount, 2),
            balance: Some(Decimal::new(*balance, 2)),
            status: Some(TransactionStatus::Completed),
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use risk_engine::RiskLevel;
    use rust_decimal_macros::dec;

    fn bank() -> MockBank {
        MockBank::new(BankingConfig::default())
    }

    #[test]
    fn test_confirmation_debits_opening_balance() {
        let id = Uuid::new_v4();
        let confirmation = bank().confirm(id, dec!(230.50));

        assert_eq!(confirmation.transaction_id, id);
        assert_eq!(confirmation.new_balance, dec!(45000.00));
        assert!(confirmation.bank_reference.starts_with("BNK"));
    }

    #[test]
    fn test_sample_statement_when_no_history() {
        let statement = bank().statement(&[]);
        assert_eq!(statement.len(), 5);
        assert_eq!(statement[2].description, "Salary Credit");
        assert_eq!(statement[2].amount, dec!(50000));
    }

    #[test]
    fn test_statement_from_records() {
        let record = TransactionRecord {
            id: Uuid::new_v4(),
            user_id: Uuid::new_v4(),
            transaction_type: TransactionRecord::TRANSFER.to_string(),
            amount: dec!(750),
            payee_name: Some("Asha".to_string()),
            payee_account: None,
            status: TransactionStatus::Pending,
            risk_level: RiskLevel::Medium,
            requires_otp: true,
            otp_verified: false,
            guardian_notified: false,
            created_at: Utc::now(),
        };

        let statement = bank().statement(&[record]);
        assert_eq!(statement.len(), 1);
        assert_eq!(statement[0].description, "Transfer to Asha");
        assert_eq!(statement[0].amount, dec!(-750));
        assert_eq!(statement[0].status, Some(TransactionStatus::Pending));
    }

    #[test]
    fn test_transfer_references() {
        let transfer = bank().transfer();
        assert!(transfer.success);
        assert!(transfer.transaction_id.starts_with("TXN"));
        assert!(transfer.reference.starts_with("REF"));
    }
}
