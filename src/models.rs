use chrono::{Datelike, NaiveDate};
use rust_decimal::Decimal;

use crate::error::{DreError, Result};

pub const MONTH_NAMES: [&str; 12] = [
    "Janeiro", "Fevereiro", "Março", "Abril", "Maio", "Junho", "Julho", "Agosto", "Setembro",
    "Outubro", "Novembro", "Dezembro",
];

/// Payable row as it comes out of the ledger export, before classification.
#[derive(Debug, Clone)]
pub struct RawPayable {
    pub amount: Decimal,
    pub paid_on: Option<NaiveDate>,
    pub category: String,
    pub cost_center: Option<String>,
}

/// Payable joined with the classification reference.
#[derive(Debug, Clone)]
pub struct Payable {
    pub amount: Decimal,
    pub paid_on: Option<NaiveDate>,
    pub category: String,
    pub cost_center: Option<String>,
    /// Normalized account name (ContaPadrao).
    pub account: String,
    /// Grupo; `None` when the account has no classification entry.
    pub group: Option<String>,
    /// Classificação ("variável" / "fixo").
    pub classification: Option<String>,
}

#[derive(Debug, Clone)]
pub struct Receivable {
    pub amount: Decimal,
    pub paid_on: Option<NaiveDate>,
    pub category: String,
}

/// One line of the billing sheet: a client/seller pair with an amount per month.
#[derive(Debug, Clone)]
pub struct BillingRow {
    pub client: String,
    pub seller: String,
    pub months: [Decimal; 12],
}

/// Calendar window for an aggregation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Period {
    #[default]
    Annual,
    Month(u32),
}

impl Period {
    pub fn month(m: u32) -> Result<Self> {
        if (1..=12).contains(&m) {
            Ok(Self::Month(m))
        } else {
            Err(DreError::InvalidMonth(m))
        }
    }

    /// Rows with no parseable date only ever match the annual window.
    pub fn contains(&self, date: Option<NaiveDate>) -> bool {
        match self {
            Self::Annual => true,
            Self::Month(m) => date.is_some_and(|d| d.month() == *m),
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            Self::Annual => "Anual",
            Self::Month(m) => month_name(*m),
        }
    }
}

/// Whether inter-account transfers stay in the payables before summing.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TransferPolicy {
    Exclude,
    Include,
}

pub fn month_name(m: u32) -> &'static str {
    MONTH_NAMES
        .get((m as usize).wrapping_sub(1))
        .copied()
        .unwrap_or("")
}
