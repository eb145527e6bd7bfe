// 📸 Snapshot - fully materialised, read-only view of the entity store
//
// The analytics engine never talks to a database directly. It is handed a
// Snapshot: one ordered table per entity type, keyed by id. Anything that can
// produce a Snapshot (SQLite, fixtures, another service) is an EntityStore.
//
// Tables are BTreeMaps so every scan is in ascending id order. Aggregations
// rely on that for repeatable tie-breaking.

use std::collections::btree_map::{Entry, Values};
use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use crate::entities::{
    City, EntityId, ForeignKey, Listing, Neighborhood, Record, Reservation, Review, User,
};
use crate::error::{AnalyticsError, Result};

// ============================================================================
// ENTITY STORE
// ============================================================================

/// Source of marketplace data.
///
/// Implementations hand out a consistent snapshot; isolation from concurrent
/// writers is their concern, not the engine's.
pub trait EntityStore {
    fn load_snapshot(&self) -> Result<Snapshot>;
}

// ============================================================================
// SNAPSHOT
// ============================================================================

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Snapshot {
    cities: BTreeMap<EntityId, City>,
    neighborhoods: BTreeMap<EntityId, Neighborhood>,
    users: BTreeMap<EntityId, User>,
    listings: BTreeMap<EntityId, Listing>,
    reservations: BTreeMap<EntityId, Reservation>,
    reviews: BTreeMap<EntityId, Review>,
}

/// Entities that have a table in the snapshot
pub trait Table: Record {
    fn table(snapshot: &Snapshot) -> &BTreeMap<EntityId, Self>;
    fn table_mut(snapshot: &mut Snapshot) -> &mut BTreeMap<EntityId, Self>;
}

macro_rules! impl_table {
    ($entity:ty, $field:ident) => {
        impl Table for $entity {
            fn table(snapshot: &Snapshot) -> &BTreeMap<EntityId, Self> {
                &snapshot.$field
            }

            fn table_mut(snapshot: &mut Snapshot) -> &mut BTreeMap<EntityId, Self> {
                &mut snapshot.$field
            }
        }
    };
}

impl_table!(City, cities);
impl_table!(Neighborhood, neighborhoods);
impl_table!(User, users);
impl_table!(Listing, listings);
impl_table!(Reservation, reservations);
impl_table!(Review, reviews);

impl Snapshot {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add an entity; ids are unique per table
    pub fn insert<E: Table>(&mut self, entity: E) -> Result<()> {
        match E::table_mut(self).entry(entity.id()) {
            Entry::Occupied(_) => Err(AnalyticsError::invariant(
                E::ENTITY,
                entity.id(),
                "duplicate id",
            )),
            Entry::Vacant(slot) => {
                slot.insert(entity);
                Ok(())
            }
        }
    }

    /// Insert many entities of one type
    pub fn extend<E: Table>(&mut self, entities: impl IntoIterator<Item = E>) -> Result<()> {
        for entity in entities {
            self.insert(entity)?;
        }
        Ok(())
    }

    /// All rows of one type, ascending by id
    pub fn fetch_all<E: Table>(&self) -> Values<'_, EntityId, E> {
        E::table(self).values()
    }

    pub fn fetch_by_id<E: Table>(&self, id: EntityId) -> Option<&E> {
        E::table(self).get(&id)
    }

    /// Rows whose foreign-key column `key` equals `id`, ascending by id
    pub fn fetch_where<E: Table>(&self, key: ForeignKey, id: EntityId) -> Vec<&E> {
        self.fetch_all::<E>()
            .filter(|entity| entity.foreign_key(key) == Some(id))
            .collect()
    }

    pub fn count<E: Table>(&self) -> usize {
        E::table(self).len()
    }

    /// Lookup of a caller-supplied id
    pub fn get<E: Table>(&self, id: EntityId) -> Result<&E> {
        self.fetch_by_id(id)
            .ok_or_else(|| AnalyticsError::not_found(E::ENTITY, id))
    }

    /// Follow a stored foreign key; a missing target is corrupt data
    pub fn follow<S: Record, E: Table>(&self, source: &S, target: EntityId) -> Result<&E> {
        self.fetch_by_id(target).ok_or_else(|| {
            AnalyticsError::invariant(
                S::ENTITY,
                source.id(),
                format!("references missing {} {}", E::ENTITY, target),
            )
        })
    }

    pub fn is_empty(&self) -> bool {
        self.cities.is_empty()
            && self.neighborhoods.is_empty()
            && self.users.is_empty()
            && self.listings.is_empty()
            && self.reservations.is_empty()
            && self.reviews.is_empty()
    }

    /// Check every value invariant and every foreign key.
    ///
    /// Self-booking and a review guest that differs from its reservation's
    /// guest are allowed and only logged.
    pub fn validate(&self) -> Result<()> {
        self.validate_table::<City>()?;
        self.validate_table::<User>()?;

        for neighborhood in self.fetch_all::<Neighborhood>() {
            neighborhood.validate()?;
            self.follow::<_, City>(neighborhood, neighborhood.city_id)?;
        }

        for listing in self.fetch_all::<Listing>() {
            listing.validate()?;
            self.follow::<_, Neighborhood>(listing, listing.neighborhood_id)?;
            self.follow::<_, User>(listing, listing.host_id)?;
        }

        for reservation in self.fetch_all::<Reservation>() {
            reservation.validate()?;
            let listing: &Listing = self.follow(reservation, reservation.listing_id)?;
            self.follow::<_, User>(reservation, reservation.guest_id)?;
            if listing.host_id == reservation.guest_id {
                warn!(
                    reservation = reservation.id,
                    listing = listing.id,
                    user = reservation.guest_id,
                    "host booked their own listing"
                );
            }
        }

        for review in self.fetch_all::<Review>() {
            review.validate()?;
            let reservation: &Reservation = self.follow(review, review.reservation_id)?;
            self.follow::<_, User>(review, review.guest_id)?;
            if reservation.guest_id != review.guest_id {
                warn!(
                    review = review.id,
                    reservation = reservation.id,
                    review_guest = review.guest_id,
                    reservation_guest = reservation.guest_id,
                    "review author differs from reservation guest"
                );
            }
        }

        debug!(
            cities = self.cities.len(),
            neighborhoods = self.neighborhoods.len(),
            users = self.users.len(),
            listings = self.listings.len(),
            reservations = self.reservations.len(),
            reviews = self.reviews.len(),
            "snapshot validated"
        );
        Ok(())
    }

    fn validate_table<E: Table>(&self) -> Result<()> {
        self.fetch_all::<E>().try_for_each(|entity| entity.validate())
    }
}

impl EntityStore for Snapshot {
    fn load_snapshot(&self) -> Result<Snapshot> {
        Ok(self.clone())
    }
}
