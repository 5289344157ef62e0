//! Movies and their showings

use crate::core::entity::RecordId;
use crate::core::field::parse_date_str;
use crate::impl_resource;
use chrono::{DateTime, Utc};

/// Status of a movie currently on screen
pub const NOW_SHOWING: &str = "showing";

impl_resource!(
    Movie,
    "movie",
    "/movies",
    movie_id: RecordId,
    {
        movie_name: String,
        description: Option<String>,
        /// Running time in minutes
        duration: Option<u32>,
        category_id: Option<RecordId>,
        category_name: Option<String>,
        status: Option<String>,
        show_time: Option<String>,
        venue_id: Option<RecordId>,
    }
);

impl_resource!(
    /// One screening of a movie in a venue
    Showing,
    "showing",
    "/showings",
    id: RecordId,
    {
        movie_id: Option<RecordId>,
        show_time: Option<String>,
        venue_id: Option<RecordId>,
        available_seats: Option<i64>,
    }
);

impl Movie {
    pub fn is_now_showing(&self) -> bool {
        self.status.as_deref() == Some(NOW_SHOWING)
    }
}

impl Showing {
    pub fn starts_at(&self) -> Option<DateTime<Utc>> {
        self.show_time.as_deref().and_then(parse_date_str)
    }

    /// Seats left and the showing has not started at `now`
    pub fn is_bookable_at(&self, now: DateTime<Utc>) -> bool {
        self.available_seats.unwrap_or(0) > 0 && self.starts_at().is_some_and(|at| at > now)
    }
}
