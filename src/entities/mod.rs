//! Typed records for every resource the portal manages

pub mod macros;

pub mod benefit;
pub mod booking;
pub mod citizen_card;
pub mod member;
pub mod movie;
pub mod venue;
pub mod wallet;

pub use benefit::{Benefit, BenefitStatus, BenefitUsage, UsageStats};
pub use booking::{Booking, BookingStatus};
pub use citizen_card::CitizenCard;
pub use member::Member;
pub use movie::{Movie, NOW_SHOWING, Showing};
pub use venue::{MaintenanceRecord, Venue, VenueStatus};
pub use wallet::{Transaction, TransactionLimits, TransactionType, WalletAccount};
