//! Wallet: balance, limits and money movements
//!
//! Account endpoints live one level above the transaction collection
//! (`/wallet/balance` next to `/wallet/transactions`).

use super::resource::{ResourceStore, require_record};
use crate::core::entity::RecordId;
use crate::core::error::{Result, StoreError};
use crate::core::query::{Filters, Page};
use crate::entities::{Transaction, TransactionLimits, WalletAccount};
use chrono::{DateTime, SecondsFormat, Utc};
use indexmap::IndexMap;
use serde_json::{Value, json};
use std::sync::{Mutex, MutexGuard, PoisonError};

/// Transaction history plus the account it belongs to
pub struct WalletStore {
    transactions: ResourceStore<Transaction>,
    account: Mutex<WalletAccount>,
    root: String,
}

impl WalletStore {
    pub fn new(transactions: ResourceStore<Transaction>, account: WalletAccount) -> Self {
        let root = match transactions.path().trim_end_matches('/').rsplit_once('/') {
            Some((parent, _)) if !parent.is_empty() => parent.to_string(),
            _ => transactions.path().to_string(),
        };
        Self {
            transactions,
            account: Mutex::new(account),
            root,
        }
    }

    /// Transaction list and detail
    pub fn transaction_store(&self) -> &ResourceStore<Transaction> {
        &self.transactions
    }

    fn account_mut(&self) -> MutexGuard<'_, WalletAccount> {
        self.account.lock().unwrap_or_else(PoisonError::into_inner)
    }

    pub fn account(&self) -> WalletAccount {
        self.account_mut().clone()
    }

    pub fn balance(&self) -> f64 {
        self.account_mut().balance
    }

    pub fn daily_limit(&self) -> f64 {
        self.account_mut().daily_limit
    }

    pub fn single_transaction_limit(&self) -> f64 {
        self.account_mut().single_transaction_limit
    }

    fn endpoint(&self, action: &str) -> String {
        format!("{}/{}", self.root, action)
    }

    /// Reload the balance
    pub async fn refresh_balance(&self) -> Result<f64> {
        let path = self.endpoint("balance");
        self.transactions
            .track("refresh_balance", async {
                let response = self.transactions.access().get(&path, IndexMap::new()).await?;
                let balance = read_number(&response, "balance")?;
                self.account_mut().balance = balance;
                Ok(balance)
            })
            .await
    }

    /// Load one page of transactions
    pub async fn transactions(&self, params: Filters) -> Result<Page<Transaction>> {
        self.transactions.list(params).await
    }

    pub async fn deposit(&self, amount: f64, method: &str) -> Result<Transaction> {
        let body = json!({
            "amount": amount,
            "paymentMethod": method,
            "transactionTime": timestamp(),
        });
        self.move_money("deposit", self.endpoint("deposit"), body).await
    }

    /// Pay from the wallet
    ///
    /// Amounts above the single-transaction limit are rejected without a
    /// request; the rejection is recorded like any other failure.
    pub async fn pay(&self, amount: f64, description: &str) -> Result<Transaction> {
        let limit = self.single_transaction_limit();
        if amount > limit {
            let rejected = Err(StoreError::LimitExceeded {
                message: format!("Amount exceeds the single transaction limit of {}", limit),
            }
            .into());
            return self.transactions.record("pay", rejected);
        }

        let body = json!({
            "amount": amount,
            "description": description,
            "transactionTime": timestamp(),
        });
        self.move_money("pay", self.endpoint("pay"), body).await
    }

    pub async fn refund(&self, transaction_id: &RecordId, reason: &str) -> Result<Transaction> {
        let body = json!({
            "originalTransactionId": transaction_id,
            "reason": reason,
            "transactionTime": timestamp(),
        });
        self.move_money("refund", self.endpoint("refund"), body).await
    }

    /// Change both limits; the server's values are kept
    pub async fn update_limits(
        &self,
        daily_limit: f64,
        single_transaction_limit: f64,
    ) -> Result<TransactionLimits> {
        let path = self.endpoint("limit");
        let body = json!({
            "dailyLimit": daily_limit,
            "singleTransactionLimit": single_transaction_limit,
        });
        self.transactions
            .track("update_limits", async {
                let response = self.transactions.access().put(&path, body).await?;
                let limits: TransactionLimits =
                    serde_json::from_value(response).map_err(|e| StoreError::UnexpectedResponse {
                        resource: "wallet".to_string(),
                        message: e.to_string(),
                    })?;
                let mut account = self.account_mut();
                account.daily_limit = limits.daily_limit;
                account.single_transaction_limit = limits.single_transaction_limit;
                Ok(limits)
            })
            .await
    }

    /// Prepend the returned transaction and take its resulting balance
    async fn move_money(&self, operation: &'static str, path: String, body: Value) -> Result<Transaction> {
        self.transactions
            .track(operation, async {
                let response = self.transactions.access().post(&path, body).await?;
                let transaction = require_record::<Transaction>(response)?;
                self.transactions.upsert_front(transaction.clone());
                if let Some(balance) = transaction.balance_after {
                    self.account_mut().balance = balance;
                }
                Ok(transaction)
            })
            .await
    }

    /// Sum of listed transaction amounts on the UTC day of `now`
    pub fn today_total(&self, now: DateTime<Utc>) -> f64 {
        let today = now.date_naive();
        self.transactions
            .filter_items(|t| t.day() == Some(today))
            .iter()
            .map(|t| t.amount)
            .sum()
    }

    /// Whether `amount` on top of today's total exceeds the daily limit
    pub fn is_over_daily_limit(&self, amount: f64, now: DateTime<Utc>) -> bool {
        self.today_total(now) + amount > self.daily_limit()
    }
}

fn timestamp() -> String {
    Utc::now().to_rfc3339_opts(SecondsFormat::Millis, true)
}

fn read_number(response: &Value, field: &str) -> Result<f64, StoreError> {
    response
        .get(field)
        .or_else(|| response.get("data").and_then(|data| data.get(field)))
        .and_then(Value::as_f64)
        .ok_or_else(|| StoreError::UnexpectedResponse {
            resource: "wallet".to_string(),
            message: format!("missing '{}'", field),
        })
}
