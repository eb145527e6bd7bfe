// 📅 Reservation Entity - a guest's stay at a listing
//
// Dates follow the half-open interval convention: [checkin, checkout).
// The guest sleeps the nights of checkin .. checkout-1 and leaves on checkout,
// so a reservation ending on day D never conflicts with one starting on D.

use chrono::{NaiveDate, NaiveDateTime};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use super::{EntityId, ForeignKey, Record};
use crate::error::AnalyticsError;

// ============================================================================
// RESERVATION STATUS
// ============================================================================

/// Stored booking status. Not managed by the engine: earnings and counts
/// include every reservation regardless of status.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ReservationStatus {
    #[default]
    Confirmed,
    Completed,
    Cancelled,
}

impl ReservationStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            ReservationStatus::Confirmed => "confirmed",
            ReservationStatus::Completed => "completed",
            ReservationStatus::Cancelled => "cancelled",
        }
    }

    pub fn parse(value: &str) -> Option<Self> {
        match value.trim().to_lowercase().as_str() {
            "confirmed" => Some(ReservationStatus::Confirmed),
            "completed" => Some(ReservationStatus::Completed),
            "cancelled" | "canceled" => Some(ReservationStatus::Cancelled),
            _ => None,
        }
    }
}

// ============================================================================
// RESERVATION ENTITY
// ============================================================================

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Reservation {
    pub id: EntityId,
    pub checkin: NaiveDate,
    pub checkout: NaiveDate,
    pub guest_count: u32,
    pub status: ReservationStatus,
    pub listing_id: EntityId,
    pub guest_id: EntityId,
    pub created_at: NaiveDateTime,
}

impl Reservation {
    pub fn new(
        id: EntityId,
        listing_id: EntityId,
        guest_id: EntityId,
        checkin: NaiveDate,
        checkout: NaiveDate,
    ) -> Self {
        Reservation {
            id,
            checkin,
            checkout,
            guest_count: 1,
            status: ReservationStatus::default(),
            listing_id,
            guest_id,
            created_at: super::now(),
        }
    }

    pub fn with_status(mut self, status: ReservationStatus) -> Self {
        self.status = status;
        self
    }

    pub fn with_guest_count(mut self, guest_count: u32) -> Self {
        self.guest_count = guest_count;
        self
    }

    pub fn with_created_at(mut self, created_at: NaiveDateTime) -> Self {
        self.created_at = created_at;
        self
    }

    /// Whole nights between checkin and checkout (may be ≤ 0 for malformed rows)
    pub fn duration(&self) -> i64 {
        (self.checkout - self.checkin).num_days()
    }

    /// Nights stayed, failing fast when checkout is not after checkin
    pub fn nights(&self) -> crate::Result<i64> {
        let nights = self.duration();
        if nights <= 0 {
            return Err(AnalyticsError::invariant(
                Self::ENTITY,
                self.id,
                format!(
                    "checkout {} must be after checkin {}",
                    self.checkout, self.checkin
                ),
            ));
        }
        Ok(nights)
    }

    /// Cost of this stay at the given nightly price
    pub fn cost_at(&self, price_per_night: Decimal) -> crate::Result<Decimal> {
        price_per_night
            .checked_mul(Decimal::from(self.nights()?))
            .ok_or_else(|| AnalyticsError::invariant(Self::ENTITY, self.id, "cost overflows"))
    }

    /// Guest is on site on `date` (checkin ≤ date < checkout)
    pub fn covers(&self, date: NaiveDate) -> bool {
        self.checkin <= date && date < self.checkout
    }

    /// Stay intersects the half-open range [start, end)
    pub fn overlaps(&self, start: NaiveDate, end: NaiveDate) -> bool {
        self.checkin < end && self.checkout > start
    }
}

impl Record for Reservation {
    const ENTITY: &'static str = "reservation";

    fn id(&self) -> EntityId {
        self.id
    }

    fn foreign_key(&self, key: ForeignKey) -> Option<EntityId> {
        match key {
            ForeignKey::Listing => Some(self.listing_id),
            ForeignKey::Guest => Some(self.guest_id),
            _ => None,
        }
    }

    fn validate(&self) -> crate::Result<()> {
        self.nights().map(|_| ())
    }
}
