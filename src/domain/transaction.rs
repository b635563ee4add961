//! Completed sale records

use chrono::{DateTime, SubsecRound, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::{CartLineItem, Money};

/// An immutable ledger entry, one per checked-out line item.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TransactionRecord {
    /// Storage identity of the record
    pub id: Uuid,
    /// Unique within a ledger, assigned in commit order starting at 1
    pub transaction_code: i64,
    pub product_id: i64,
    pub product_name: String,
    pub quantity: i32,
    pub amount: Money,
    pub timestamp: DateTime<Utc>,
}

/// What a ledger needs to record one sale; the ledger assigns id and code.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewTransaction {
    pub product_id: i64,
    pub product_name: String,
    pub quantity: i32,
    pub amount: Money,
}

impl From<&CartLineItem> for NewTransaction {
    fn from(item: &CartLineItem) -> Self {
        Self {
            product_id: item.product_id,
            product_name: item.product_name.clone(),
            quantity: item.quantity,
            amount: item.line_total,
        }
    }
}

impl NewTransaction {
    /// Timestamps are kept at microsecond precision, the finest any store holds.
    pub fn into_record(self, transaction_code: i64, timestamp: DateTime<Utc>) -> TransactionRecord {
        TransactionRecord {
            id: Uuid::new_v4(),
            transaction_code,
            product_id: self.product_id,
            product_name: self.product_name,
            quantity: self.quantity,
            amount: self.amount,
            timestamp: timestamp.trunc_subsecs(6),
        }
    }
}
