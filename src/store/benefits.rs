//! Benefits, their usage history and usage statistics

use super::resource::ResourceStore;
use crate::core::entity::RecordId;
use crate::core::error::{Result, StoreError};
use crate::core::query::{Filters, Page};
use crate::entities::{Benefit, BenefitUsage, UsageStats};
use chrono::{DateTime, Utc};
use indexmap::IndexMap;
use serde_json::{Value, json};
use std::sync::{Mutex, MutexGuard, PoisonError};

#[derive(Debug, Default)]
struct UsageState {
    history: Vec<BenefitUsage>,
    total: usize,
    stats: UsageStats,
}

/// Benefit catalogue plus usage figures for one benefit at a time
pub struct BenefitStore {
    benefits: ResourceStore<Benefit>,
    usage: Mutex<UsageState>,
}

impl BenefitStore {
    pub fn new(benefits: ResourceStore<Benefit>) -> Self {
        Self {
            benefits,
            usage: Mutex::new(UsageState::default()),
        }
    }

    /// Benefit list, detail and CRUD
    pub fn benefits(&self) -> &ResourceStore<Benefit> {
        &self.benefits
    }

    fn usage(&self) -> MutexGuard<'_, UsageState> {
        self.usage.lock().unwrap_or_else(PoisonError::into_inner)
    }

    pub fn usage_records(&self) -> Vec<BenefitUsage> {
        self.usage().history.clone()
    }

    pub fn usage_total(&self) -> usize {
        self.usage().total
    }

    pub fn usage_stats(&self) -> UsageStats {
        self.usage().stats.clone()
    }

    /// Load one page of a benefit's usage records
    pub async fn usage_history(&self, id: &RecordId, params: Filters) -> Result<Page<BenefitUsage>> {
        let path = self.benefits.action_path(Some(id), "usage-history");
        self.benefits
            .track("usage_history", async {
                let response = self.benefits.access().get(&path, params.into_inner()).await?;
                let page = Page::<BenefitUsage>::from_response("benefit_usage", response)?;
                let mut usage = self.usage();
                usage.history = page.items.clone();
                usage.total = page.total;
                Ok(page)
            })
            .await
    }

    /// Load usage statistics; does not raise `loading`
    pub async fn stats(&self, id: &RecordId) -> Result<UsageStats> {
        let path = self.benefits.action_path(None, "stats");
        let mut query = IndexMap::new();
        query.insert("benefitId".to_string(), json!(id));

        self.benefits
            .untracked("stats", async {
                let response = self.benefits.access().get(&path, query).await?;
                let stats = decode_stats(response)?;
                self.usage().stats = stats.clone();
                Ok(stats)
            })
            .await
    }

    /// Claim a benefit; the server's answer is returned as-is
    pub async fn use_benefit(&self, id: &RecordId, data: Value) -> Result<Value> {
        let path = self.benefits.action_path(Some(id), "use");
        self.benefits
            .track("use_benefit", async {
                Ok(self.benefits.access().post(&path, data).await?)
            })
            .await
    }

    /// Switch several benefits on or off at once
    pub async fn batch_update_status(&self, data: Value) -> Result<()> {
        let path = self.benefits.action_path(None, "batch-status");
        self.benefits
            .track("batch_update_status", async {
                self.benefits.access().put(&path, data).await?;
                Ok(())
            })
            .await
    }

    /// Active, not expired at `now`, and below its usage cap
    pub fn is_usable(benefit: &Benefit, now: DateTime<Utc>) -> bool {
        benefit.is_usable_at(now)
    }

    /// Listed benefits usable at `now`
    pub fn usable_benefits(&self, now: DateTime<Utc>) -> Vec<Benefit> {
        self.benefits.filter_items(|b| b.is_usable_at(now))
    }
}

fn decode_stats(response: Value) -> Result<UsageStats, StoreError> {
    let body = match response {
        Value::Object(mut body) if body.get("data").is_some_and(Value::is_object) => {
            body.remove("data").unwrap_or_default()
        }
        other => other,
    };
    serde_json::from_value(body).map_err(|e| StoreError::UnexpectedResponse {
        resource: "benefit_stats".to_string(),
        message: e.to_string(),
    })
}
