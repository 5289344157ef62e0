//! Wallet transactions and the account they move

use crate::core::entity::RecordId;
use crate::core::field::parse_date_str;
use crate::{impl_resource, impl_status_serde};
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// Kind of money movement
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash)]
pub enum TransactionType {
    Deposit,
    Payment,
    Refund,
    #[default]
    Unknown,
    Other(String),
}

impl TransactionType {
    pub fn as_str(&self) -> &str {
        match self {
            TransactionType::Deposit => "deposit",
            TransactionType::Payment => "payment",
            TransactionType::Refund => "refund",
            TransactionType::Unknown => "",
            TransactionType::Other(label) => label,
        }
    }
}

impl From<String> for TransactionType {
    fn from(label: String) -> Self {
        match label.as_str() {
            "deposit" | "充值" => TransactionType::Deposit,
            "payment" | "支付" => TransactionType::Payment,
            "refund" | "退款" => TransactionType::Refund,
            "" => TransactionType::Unknown,
            _ => TransactionType::Other(label),
        }
    }
}

impl_status_serde!(TransactionType);

impl_resource!(
    Transaction,
    "transaction",
    "/wallet/transactions",
    transaction_id: RecordId,
    {
        transaction_type: TransactionType,
        amount: f64,
        description: Option<String>,
        payment_method: Option<String>,
        transaction_time: Option<String>,
        /// Wallet balance once this transaction settled
        balance_after: Option<f64>,
    }
);

impl Transaction {
    /// Calendar day (UTC) of the transaction
    pub fn day(&self) -> Option<NaiveDate> {
        self.transaction_time
            .as_deref()
            .and_then(parse_date_str)
            .map(|at| at.date_naive())
    }
}

/// Balance and limits of the signed-in member's wallet
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WalletAccount {
    #[serde(default)]
    pub balance: f64,
    pub daily_limit: f64,
    pub single_transaction_limit: f64,
}

impl WalletAccount {
    pub fn new(daily_limit: f64, single_transaction_limit: f64) -> Self {
        Self {
            balance: 0.0,
            daily_limit,
            single_transaction_limit,
        }
    }
}

/// Limits as returned by the limit endpoint
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TransactionLimits {
    pub daily_limit: f64,
    pub single_transaction_limit: f64,
}
