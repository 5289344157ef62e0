//! Venues, their schedule and maintenance records

use super::resource::ResourceStore;
use crate::core::entity::RecordId;
use crate::core::error::Result;
use crate::core::query::{Filters, Page};
use crate::entities::{MaintenanceRecord, Showing, Venue, VenueStatus};
use indexmap::IndexMap;
use std::sync::{Mutex, PoisonError};

/// Venue list plus the schedule and maintenance log of one venue at a time
pub struct VenueStore {
    venues: ResourceStore<Venue>,
    schedule: ResourceStore<Showing>,
    maintenance: Mutex<Vec<MaintenanceRecord>>,
}

impl VenueStore {
    pub fn new(venues: ResourceStore<Venue>) -> Self {
        let schedule = ResourceStore::with_path(
            venues.access().clone(),
            format!("{}/schedule", venues.path()),
        );
        Self {
            venues,
            schedule,
            maintenance: Mutex::new(Vec::new()),
        }
    }

    /// Venue list, detail and CRUD
    pub fn venues(&self) -> &ResourceStore<Venue> {
        &self.venues
    }

    /// Showings loaded by the last [`schedule`](Self::schedule)
    pub fn schedule_store(&self) -> &ResourceStore<Showing> {
        &self.schedule
    }

    pub fn maintenance_records(&self) -> Vec<MaintenanceRecord> {
        self.maintenance
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    pub fn is_loading(&self) -> bool {
        self.venues.is_loading() || self.schedule.is_loading()
    }

    /// Load the showings scheduled in one venue
    pub async fn schedule(&self, venue_id: &RecordId, params: Filters) -> Result<Page<Showing>> {
        let path = self.venues.action_path(Some(venue_id), "schedule");
        self.schedule.list_at(&path, params).await
    }

    /// Load the maintenance log of one venue
    pub async fn maintenance(&self, venue_id: &RecordId) -> Result<Vec<MaintenanceRecord>> {
        let path = self.venues.action_path(Some(venue_id), "maintenance");
        self.venues
            .track("maintenance", async {
                let response = self.venues.access().get(&path, IndexMap::new()).await?;
                let page = Page::<MaintenanceRecord>::from_response("maintenance_record", response)?;
                *self.maintenance.lock().unwrap_or_else(PoisonError::into_inner) =
                    page.items.clone();
                Ok(page.items)
            })
            .await
    }

    pub fn available_venues(&self) -> Vec<Venue> {
        self.venues
            .filter_items(|v| v.status == VenueStatus::Available)
    }

    pub fn venues_under_maintenance(&self) -> Vec<Venue> {
        self.venues
            .filter_items(|v| v.status == VenueStatus::Maintenance)
    }
}
