use chrono::NaiveDateTime;

/// Date format used for DB columns and the transaction-creation request body.
pub const DATE_FORMAT: &str = "%Y-%m-%dT%H:%M:%S";

/// A tentative transaction derived from notification text, not yet durable.
/// Exists only when both amount and vendor were successfully extracted.
#[derive(Debug, Clone, PartialEq)]
pub struct TransactionCandidate {
    /// Whole currency units (원), never negative.
    pub amount: i64,
    pub vendor: String,
    pub occurred_at: NaiveDateTime,
    pub bank: String,
}

/// Record fields before the store assigns an id.
#[derive(Debug, Clone)]
pub struct NewTransaction {
    pub amount: i64,
    pub vendor: String,
    pub bank: String,
    pub raw_text: String,
    pub transaction_date: String,
}

impl NewTransaction {
    pub fn from_candidate(candidate: &TransactionCandidate, raw_text: &str) -> Self {
        Self {
            amount: candidate.amount,
            vendor: candidate.vendor.clone(),
            bank: candidate.bank.clone(),
            raw_text: raw_text.to_string(),
            transaction_date: candidate.occurred_at.format(DATE_FORMAT).to_string(),
        }
    }
}

/// The durable, store-owned representation of a transaction.
#[allow(dead_code)]
#[derive(Debug, Clone)]
pub struct TransactionRecord {
    pub id: i64,
    pub amount: i64,
    pub vendor: String,
    pub bank: String,
    pub raw_text: String,
    /// Filled from the server response on a successful sync, never locally.
    pub category: Option<String>,
    pub synced: bool,
    pub transaction_date: String,
    pub created_at: String,
}
