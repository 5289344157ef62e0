//! Venues and their maintenance records

use crate::core::entity::RecordId;
use crate::{impl_resource, impl_status_serde};
use serde::{Deserialize, Serialize};

/// Operating state of a venue
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash)]
pub enum VenueStatus {
    Available,
    Maintenance,
    Closed,
    #[default]
    Unknown,
    Other(String),
}

impl VenueStatus {
    pub fn as_str(&self) -> &str {
        match self {
            VenueStatus::Available => "available",
            VenueStatus::Maintenance => "maintenance",
            VenueStatus::Closed => "closed",
            VenueStatus::Unknown => "",
            VenueStatus::Other(label) => label,
        }
    }
}

impl From<String> for VenueStatus {
    fn from(label: String) -> Self {
        match label.as_str() {
            "available" | "可用" | "正常" => VenueStatus::Available,
            "maintenance" | "維護中" => VenueStatus::Maintenance,
            "closed" | "已關閉" => VenueStatus::Closed,
            "" => VenueStatus::Unknown,
            _ => VenueStatus::Other(label),
        }
    }
}

impl_status_serde!(VenueStatus);

impl_resource!(
    Venue,
    "venue",
    "/venues",
    venue_id: RecordId,
    {
        venue_name: String,
        seat_count: Option<u32>,
        address: Option<String>,
        capacity: Option<u32>,
        status: VenueStatus,
    }
);

/// One maintenance entry for a venue
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MaintenanceRecord {
    #[serde(default)]
    pub id: Option<RecordId>,
    #[serde(default)]
    pub maintenance_type: Option<String>,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub maintenance_date: Option<String>,
    #[serde(flatten)]
    pub extra: serde_json::Map<String, serde_json::Value>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_venue_status_labels() {
        let venue: Venue =
            serde_json::from_value(json!({"venueId": 2, "status": "維護中"})).unwrap();
        assert_eq!(venue.status, VenueStatus::Maintenance);

        let venue: Venue = serde_json::from_value(json!({"venueId": 3, "status": "正常"})).unwrap();
        assert_eq!(venue.status, VenueStatus::Available);

        let venue: Venue = serde_json::from_value(json!({"venueId": 4})).unwrap();
        assert_eq!(venue.status, VenueStatus::Unknown);
    }
}
