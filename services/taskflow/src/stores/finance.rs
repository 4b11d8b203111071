//! services/taskflow/src/stores/finance.rs
//!
//! The per-user income and expense ledger.

use crate::adapters::records::TransactionRecord;
use crate::error::RecordError;
use crate::stores::{json, keys};
use chrono::Utc;
use std::sync::Arc;
use taskflow_core::domain::{new_id, NewTransaction, Transaction};
use taskflow_core::ports::{KeyValueStore, PortResult};
use tracing::warn;

fn validate(input: &NewTransaction) -> Result<(), RecordError> {
    if !input.amount.is_finite() || input.amount <= 0.0 {
        return Err(RecordError::Validation("amount must be a positive number".to_string()));
    }
    if input.description.trim().is_empty() {
        return Err(RecordError::Validation("description is required".to_string()));
    }
    if !input.category.allowed_for(input.kind) {
        return Err(RecordError::Validation(format!(
            "category '{}' cannot be used for {}",
            input.category.as_str(),
            input.kind.as_str()
        )));
    }
    Ok(())
}

#[derive(Clone)]
pub struct FinanceStore {
    store: Arc<dyn KeyValueStore>,
}

impl FinanceStore {
    pub fn new(store: Arc<dyn KeyValueStore>) -> Self {
        Self { store }
    }

    /// Never fails; an unreadable ledger is logged and read as empty.
    pub fn load_transactions(&self, user_id: &str) -> Vec<Transaction> {
        self.read_transactions(user_id).unwrap_or_else(|e| {
            warn!(user_id, error = %e, "could not load transactions");
            Vec::new()
        })
    }

    pub fn save_transactions(
        &self,
        user_id: &str,
        transactions: &[Transaction],
    ) -> PortResult<()> {
        let records: Vec<TransactionRecord> = transactions
            .iter()
            .map(TransactionRecord::from_domain)
            .collect();
        json::write(self.store.as_ref(), &keys::transactions(user_id), &records)
    }

    pub fn add_transaction(
        &self,
        user_id: &str,
        input: NewTransaction,
    ) -> Result<Transaction, RecordError> {
        validate(&input)?;
        let mut transactions = self.read_transactions(user_id)?;
        let transaction = Transaction {
            id: new_id(),
            kind: input.kind,
            amount: input.amount,
            category: input.category,
            description: input.description.trim().to_string(),
            date: input.date,
            created_at: Utc::now(),
        };
        transactions.insert(0, transaction.clone());
        self.save_transactions(user_id, &transactions)?;
        Ok(transaction)
    }

    /// Replaces every editable field of an existing transaction.
    pub fn update_transaction(
        &self,
        user_id: &str,
        transaction_id: &str,
        input: NewTransaction,
    ) -> Result<Transaction, RecordError> {
        validate(&input)?;
        let mut transactions = self.read_transactions(user_id)?;
        let existing = transactions
            .iter_mut()
            .find(|t| t.id == transaction_id)
            .ok_or_else(|| RecordError::NotFound(transaction_id.to_string()))?;
        existing.kind = input.kind;
        existing.amount = input.amount;
        existing.category = input.category;
        existing.description = input.description.trim().to_string();
        existing.date = input.date;
        let updated = existing.clone();
        self.save_transactions(user_id, &transactions)?;
        Ok(updated)
    }

    pub fn delete_transaction(
        &self,
        user_id: &str,
        transaction_id: &str,
    ) -> Result<Transaction, RecordError> {
        let mut transactions = self.read_transactions(user_id)?;
        let index = transactions
            .iter()
            .position(|t| t.id == transaction_id)
            .ok_or_else(|| RecordError::NotFound(transaction_id.to_string()))?;
        let removed = transactions.remove(index);
        self.save_transactions(user_id, &transactions)?;
        Ok(removed)
    }

    /// Entries with an unknown transaction type are skipped.
    fn read_transactions(&self, user_id: &str) -> PortResult<Vec<Transaction>> {
        let records: Option<Vec<TransactionRecord>> =
            json::read(self.store.as_ref(), &keys::transactions(user_id))?;
        Ok(records
            .unwrap_or_default()
            .into_iter()
            .filter_map(|record| {
                let id = record.id.clone();
                match record.to_domain() {
                    Ok(transaction) => Some(transaction),
                    Err(e) => {
                        warn!(user_id, transaction_id = %id, error = %e, "skipping transaction");
                        None
                    }
                }
            })
            .collect())
    }
}
