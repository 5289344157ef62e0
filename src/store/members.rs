//! Member administration

use super::resource::{ResourceStore, require_record};
use crate::core::error::Result;
use crate::core::query::Filters;
use crate::entities::Member;
use crate::core::entity::RecordId;
use serde_json::{Value, json};

pub type MemberStore = ResourceStore<Member>;

impl ResourceStore<Member> {
    /// Submit verification data; the returned member replaces the listed one
    pub async fn verify(&self, id: &RecordId, data: Value) -> Result<Member> {
        let path = self.action_path(Some(id), "verify");
        self.track("verify", async {
            let response = self.access().post(&path, data).await?;
            let member = require_record::<Member>(response)?;
            self.replace_item(member.clone());
            Ok(member)
        })
        .await
    }

    pub async fn update_status(&self, id: &RecordId, status: &str) -> Result<Member> {
        let path = self.action_path(Some(id), "status");
        self.track("update_status", async {
            let response = self.access().put(&path, json!({ "status": status })).await?;
            let member = require_record::<Member>(response)?;
            self.replace_item(member.clone());
            Ok(member)
        })
        .await
    }

    /// Change the status of several members, then reload the list
    pub async fn batch_update_status(&self, ids: &[RecordId], status: &str) -> Result<()> {
        let path = self.action_path(None, "batch-status");
        self.track("batch_update_status", async {
            self.access()
                .put(&path, json!({ "memberIds": ids, "status": status }))
                .await?;
            self.list(Filters::new()).await?;
            Ok(())
        })
        .await
    }

    pub fn verified_members(&self) -> Vec<Member> {
        self.filter_items(|m| m.is_verified)
    }

    pub fn active_members(&self) -> Vec<Member> {
        self.filter_items(|m| m.is_active)
    }

    pub fn members_by_role(&self, role: &str) -> Vec<Member> {
        self.filter_items(|m| m.has_role(role))
    }
}
