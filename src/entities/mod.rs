// Entity Models - the marketplace relation graph
//
// City → Neighborhood → Listing → Reservation → Review
//                User ↗ (host)      User ↗ (guest)
//
// Each entity has:
// - Stable integer identity assigned by the entity store
// - Foreign keys to its parents (resolved through the store, never embedded)
// - Its own value invariants (`validate`), checked when a snapshot is validated

pub mod city;
pub mod listing;
pub mod neighborhood;
pub mod reservation;
pub mod review;
pub mod user;

pub use city::City;
pub use listing::Listing;
pub use neighborhood::Neighborhood;
pub use reservation::{Reservation, ReservationStatus};
pub use review::Review;
pub use user::User;

use chrono::{NaiveDateTime, Utc};
use serde::{Deserialize, Serialize};

/// Row identity, as assigned by the entity store
pub type EntityId = i64;

/// Foreign-key columns that scoped fetches can filter on
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ForeignKey {
    /// `neighborhoods.city_id`
    City,
    /// `listings.neighborhood_id`
    Neighborhood,
    /// `listings.host_id`
    Host,
    /// `reservations.listing_id`
    Listing,
    /// `reservations.guest_id` and `reviews.guest_id`
    Guest,
    /// `reviews.reservation_id`
    Reservation,
}

/// Common surface of every stored entity
pub trait Record: Clone {
    /// Singular entity name used in errors and logs
    const ENTITY: &'static str;

    fn id(&self) -> EntityId;

    /// Value of the given foreign-key column, if this entity has one
    fn foreign_key(&self, key: ForeignKey) -> Option<EntityId>;

    /// Check the entity's own value invariants (not its references)
    fn validate(&self) -> crate::Result<()> {
        Ok(())
    }
}

pub(crate) fn now() -> NaiveDateTime {
    Utc::now().naive_utc()
}
