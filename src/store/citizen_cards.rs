//! Citizen cards: binding, loss reports and replacement

use super::resource::{ResourceStore, require_record};
use crate::core::entity::RecordId;
use crate::core::error::{Result, TransportError};
use crate::entities::CitizenCard;
use serde_json::{Value, json};
use std::future::Future;

pub type CitizenCardStore = ResourceStore<CitizenCard>;

impl ResourceStore<CitizenCard> {
    /// Attach a card to a member
    pub async fn bind(&self, card_number: &str, member_id: &RecordId) -> Result<CitizenCard> {
        let path = self.action_path(None, "bind");
        let body = json!({ "cardNumber": card_number, "memberId": member_id });
        self.card_action("bind", self.access().post(&path, body)).await
    }

    pub async fn unbind(&self, card_number: &str) -> Result<CitizenCard> {
        let path = self.action_path(Some(&card_number.to_string()), "unbind");
        self.card_action("unbind", self.access().put(&path, json!({}))).await
    }

    pub async fn report_loss(&self, card_number: &str, data: Value) -> Result<CitizenCard> {
        let path = self.action_path(Some(&card_number.to_string()), "report-loss");
        self.card_action("report_loss", self.access().put(&path, data)).await
    }

    /// Issue a new card for `old_number`; the old card leaves the list and
    /// the new one is prepended
    pub async fn replace(&self, old_number: &str, data: Value) -> Result<CitizenCard> {
        let old = old_number.to_string();
        let path = self.action_path(Some(&old), "replace");
        self.track("replace", async {
            let response = self.access().post(&path, data).await?;
            let card = require_record::<CitizenCard>(response)?;
            self.remove_item(&old);
            self.upsert_front(card.clone());
            Ok(card)
        })
        .await
    }

    pub fn bound_cards(&self) -> Vec<CitizenCard> {
        self.filter_items(CitizenCard::is_bound)
    }

    pub fn unbound_cards(&self) -> Vec<CitizenCard> {
        self.filter_items(|card| !card.is_bound())
    }

    /// Run a card action whose response is the updated card
    async fn card_action<F>(&self, operation: &'static str, request: F) -> Result<CitizenCard>
    where
        F: Future<Output = Result<Value, TransportError>>,
    {
        self.track(operation, async {
            let card = require_record::<CitizenCard>(request.await?)?;
            self.replace_item(card.clone());
            Ok(card)
        })
        .await
    }
}
