// 🏠 Listing Entity - a bookable place
//
// Belongs to a neighborhood and to a host (User). Owns reservations.
// Price is a fixed-point nightly rate with two decimal places.

use chrono::NaiveDateTime;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use super::{EntityId, ForeignKey, Record};
use crate::error::AnalyticsError;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Listing {
    pub id: EntityId,
    pub title: String,
    pub description: String,
    pub address: String,
    pub listing_type: String,

    /// Nightly price
    pub price: Decimal,

    pub max_guests: u32,
    pub neighborhood_id: EntityId,
    pub host_id: EntityId,
    pub active: bool,
    pub created_at: NaiveDateTime,
}

impl Listing {
    pub fn new(
        id: EntityId,
        title: &str,
        price: Decimal,
        neighborhood_id: EntityId,
        host_id: EntityId,
    ) -> Self {
        Listing {
            id,
            title: title.to_string(),
            description: String::new(),
            address: String::new(),
            listing_type: String::new(),
            price,
            max_guests: 1,
            neighborhood_id,
            host_id,
            active: true,
            created_at: super::now(),
        }
    }

    pub fn with_details(mut self, description: &str, address: &str, listing_type: &str) -> Self {
        self.description = description.to_string();
        self.address = address.to_string();
        self.listing_type = listing_type.to_string();
        self
    }

    pub fn with_max_guests(mut self, max_guests: u32) -> Self {
        self.max_guests = max_guests;
        self
    }
}

impl Record for Listing {
    const ENTITY: &'static str = "listing";

    fn id(&self) -> EntityId {
        self.id
    }

    fn foreign_key(&self, key: ForeignKey) -> Option<EntityId> {
        match key {
            ForeignKey::Neighborhood => Some(self.neighborhood_id),
            ForeignKey::Host => Some(self.host_id),
            _ => None,
        }
    }

    fn validate(&self) -> crate::Result<()> {
        if self.price < Decimal::ZERO {
            return Err(AnalyticsError::invariant(
                Self::ENTITY,
                self.id,
                format!("price must not be negative (got {})", self.price),
            ));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_listing_creation() {
        let listing = Listing::new(1, "Beautiful Apartment on Main Street", Decimal::new(5000, 2), 3, 7)
            .with_details("Close to subway", "123 Main Street", "private room")
            .with_max_guests(2);

        assert_eq!(listing.price, Decimal::new(50, 0));
        assert_eq!(listing.listing_type, "private room");
        assert_eq!(listing.max_guests, 2);
        assert!(listing.active);
        assert_eq!(listing.foreign_key(ForeignKey::Neighborhood), Some(3));
        assert_eq!(listing.foreign_key(ForeignKey::Host), Some(7));
        assert_eq!(listing.foreign_key(ForeignKey::Guest), None);
    }

    #[test]
    fn test_listing_negative_price_rejected() {
        let free = Listing::new(1, "Free couch", Decimal::ZERO, 1, 1);
        assert!(free.validate().is_ok());

        let broken = Listing::new(2, "Broken", Decimal::new(-100, 2), 1, 1);
        let err = broken.validate().unwrap_err();
        assert!(err.is_invariant_violation());
    }
}
