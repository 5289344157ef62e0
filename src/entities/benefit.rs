//! Citizen benefits, their usage records and usage statistics

use crate::core::entity::RecordId;
use crate::core::field::parse_date_str;
use crate::{impl_resource, impl_status_serde};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Whether a benefit can currently be claimed
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash)]
pub enum BenefitStatus {
    Active,
    Inactive,
    #[default]
    Unknown,
    Other(String),
}

impl BenefitStatus {
    pub fn as_str(&self) -> &str {
        match self {
            BenefitStatus::Active => "active",
            BenefitStatus::Inactive => "inactive",
            BenefitStatus::Unknown => "",
            BenefitStatus::Other(label) => label,
        }
    }
}

impl From<String> for BenefitStatus {
    fn from(label: String) -> Self {
        match label.as_str() {
            "active" | "使用中" => BenefitStatus::Active,
            "inactive" | "已停用" => BenefitStatus::Inactive,
            "" => BenefitStatus::Unknown,
            _ => BenefitStatus::Other(label),
        }
    }
}

impl_status_serde!(BenefitStatus);

impl_resource!(
    Benefit,
    "benefit",
    "/benefits",
    benefit_id: RecordId,
    {
        benefit_name: String,
        benefit_type: Option<String>,
        description: Option<String>,
        status: BenefitStatus,
        /// Expiry; absent means no expiry
        valid_until: Option<String>,
        /// Usage cap; absent or zero means unlimited
        usage_limit: Option<u32>,
        usage_count: u32,
    }
);

impl Benefit {
    pub fn expires_at(&self) -> Option<DateTime<Utc>> {
        self.valid_until.as_deref().and_then(parse_date_str)
    }

    /// Active, not expired at `now`, and below its usage cap
    ///
    /// An expiry that does not parse counts as expired.
    pub fn is_usable_at(&self, now: DateTime<Utc>) -> bool {
        let not_expired = match self.valid_until.as_deref() {
            None | Some("") => true,
            Some(_) => self.expires_at().is_some_and(|at| at > now),
        };
        let below_cap = match self.usage_limit {
            None | Some(0) => true,
            Some(limit) => self.usage_count < limit,
        };
        self.status == BenefitStatus::Active && not_expired && below_cap
    }
}

/// One recorded use of a benefit
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BenefitUsage {
    #[serde(default)]
    pub id: Option<RecordId>,
    #[serde(default)]
    pub member_id: Option<RecordId>,
    #[serde(default)]
    pub usage_amount: Option<f64>,
    #[serde(default)]
    pub transaction_id: Option<RecordId>,
    #[serde(default)]
    pub used_at: Option<String>,
    #[serde(flatten)]
    pub extra: serde_json::Map<String, serde_json::Value>,
}

/// Aggregated usage figures
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct UsageStats {
    pub total_usage: u64,
    pub monthly_usage: u64,
    pub usage_rate: f64,
}
