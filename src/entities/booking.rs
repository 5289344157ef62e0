//! Seat bookings

use crate::core::entity::RecordId;
use crate::core::field::parse_date_str;
use crate::{impl_resource, impl_status_serde};
use chrono::{DateTime, Utc};

/// Lifecycle state of a booking
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash)]
pub enum BookingStatus {
    Booked,
    Cancelled,
    Completed,
    #[default]
    Unknown,
    Other(String),
}

impl BookingStatus {
    pub fn as_str(&self) -> &str {
        match self {
            BookingStatus::Booked => "booked",
            BookingStatus::Cancelled => "cancelled",
            BookingStatus::Completed => "completed",
            BookingStatus::Unknown => "",
            BookingStatus::Other(label) => label,
        }
    }
}

impl From<String> for BookingStatus {
    fn from(label: String) -> Self {
        match label.as_str() {
            "booked" | "已預訂" => BookingStatus::Booked,
            "cancelled" | "已取消" => BookingStatus::Cancelled,
            "completed" | "已完成" => BookingStatus::Completed,
            "" => BookingStatus::Unknown,
            _ => BookingStatus::Other(label),
        }
    }
}

impl_status_serde!(BookingStatus);

impl_resource!(
    Booking,
    "booking",
    "/bookings",
    booking_id: RecordId,
    {
        member_id: Option<RecordId>,
        movie_id: Option<RecordId>,
        showing_id: Option<RecordId>,
        seat_number: Option<String>,
        status: BookingStatus,
        /// Start of the booked showing
        show_time: Option<String>,
        booking_time: Option<String>,
    }
);

impl Booking {
    pub fn starts_at(&self) -> Option<DateTime<Utc>> {
        self.show_time.as_deref().and_then(parse_date_str)
    }

    /// Still booked and the showing has not started at `now`
    pub fn is_cancellable_at(&self, now: DateTime<Utc>) -> bool {
        self.status == BookingStatus::Booked && self.starts_at().is_some_and(|at| at > now)
    }
}
