//! Bookings: cancellation, payment, seat checks

use super::resource::ResourceStore;
use crate::core::entity::RecordId;
use crate::core::error::{Result, StoreError};
use crate::entities::{Booking, BookingStatus};
use chrono::{DateTime, Utc};
use indexmap::IndexMap;
use serde_json::{Value, json};

pub type BookingStore = ResourceStore<Booking>;

impl ResourceStore<Booking> {
    /// Cancel a booking; the listed entry turns [`BookingStatus::Cancelled`]
    pub async fn cancel(&self, id: &RecordId, reason: &str) -> Result<()> {
        let path = self.action_path(Some(id), "cancel");
        self.track("cancel", async {
            self.access()
                .put(
                    &path,
                    json!({ "status": BookingStatus::Cancelled.as_str(), "reason": reason }),
                )
                .await?;
            self.modify_item(id, |b| b.status = BookingStatus::Cancelled);
            Ok(())
        })
        .await
    }

    /// Pay for a booking; the listed entry turns [`BookingStatus::Completed`]
    pub async fn confirm_and_pay(&self, id: &RecordId, payment: Value) -> Result<Value> {
        let path = self.action_path(Some(id), "confirm-pay");
        self.track("confirm_and_pay", async {
            let response = self.access().post(&path, payment).await?;
            self.modify_item(id, |b| b.status = BookingStatus::Completed);
            Ok(response)
        })
        .await
    }

    /// Whether one seat is still free
    pub async fn check_seat_availability(&self, showing_id: &RecordId, seat: &str) -> Result<bool> {
        let path = self.action_path(None, "check-seat");
        let mut query = IndexMap::new();
        query.insert("showingId".to_string(), json!(showing_id));
        query.insert("seatNumber".to_string(), json!(seat));

        self.untracked("check_seat_availability", async {
            let response = self.access().get(&path, query).await?;
            let available = response.get("available").and_then(Value::as_bool).ok_or_else(|| {
                StoreError::UnexpectedResponse {
                    resource: "booking".to_string(),
                    message: "missing 'available' flag".to_string(),
                }
            })?;
            Ok(available)
        })
        .await
    }

    /// Availability of several seats, as reported by the server
    pub async fn check_seats_availability(
        &self,
        showing_id: &RecordId,
        seats: &[String],
    ) -> Result<Value> {
        let path = self.action_path(None, "check-seats");
        self.untracked("check_seats_availability", async {
            let body = json!({ "showingId": showing_id, "seatNumbers": seats });
            Ok(self.access().post(&path, body).await?)
        })
        .await
    }

    pub async fn receipt(&self, id: &RecordId) -> Result<Value> {
        let path = self.action_path(Some(id), "receipt");
        self.untracked("receipt", async {
            Ok(self.access().get(&path, IndexMap::new()).await?)
        })
        .await
    }

    /// Still booked and scheduled after `now`
    pub fn can_cancel(booking: &Booking, now: DateTime<Utc>) -> bool {
        booking.is_cancellable_at(now)
    }
}
