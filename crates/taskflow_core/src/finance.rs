//! crates/taskflow_core/src/finance.rs
//!
//! Totals over a list of income and expense transactions.

use crate::domain::{Category, Transaction, TransactionKind};

#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct FinanceSummary {
    pub total_income: f64,
    pub total_expenses: f64,
    pub balance: f64,
}

fn total(transactions: &[Transaction], kind: TransactionKind) -> f64 {
    transactions
        .iter()
        .filter(|t| t.kind == kind)
        .map(|t| t.amount)
        .sum()
}

pub fn summary(transactions: &[Transaction]) -> FinanceSummary {
    let total_income = total(transactions, TransactionKind::Income);
    let total_expenses = total(transactions, TransactionKind::Expense);
    FinanceSummary {
        total_income,
        total_expenses,
        balance: total_income - total_expenses,
    }
}

/// Expense totals per category in display order. Categories with no spend are omitted.
pub fn expenses_by_category(transactions: &[Transaction]) -> Vec<(Category, f64)> {
    Category::EXPENSE
        .into_iter()
        .map(|category| {
            let amount = transactions
                .iter()
                .filter(|t| t.kind == TransactionKind::Expense && t.category == category)
                .map(|t| t.amount)
                .sum();
            (category, amount)
        })
        .filter(|(_, amount)| *amount > 0.0)
        .collect()
}
