// 🔗 Relationship Resolver - declared traversals over the relation graph
//
// Each traversal is a fixed sequence of join steps, named by a `Path`
// variant. Results keep duplicates (a guest who booked twice appears twice);
// callers that need uniqueness call `distinct` themselves.

use std::collections::HashSet;

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::entities::{
    City, EntityId, ForeignKey, Listing, Neighborhood, Record, Reservation, Review, User,
};
use crate::error::Result;
use crate::snapshot::Snapshot;

// ============================================================================
// PATHS
// ============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Path {
    /// City → Neighborhood
    CityNeighborhoods,
    /// City → Neighborhood → Listing
    CityListings,
    /// City → Neighborhood → Listing → Reservation
    CityReservations,
    /// Neighborhood → Listing
    NeighborhoodListings,
    /// Neighborhood → Listing → Reservation
    NeighborhoodReservations,
    /// Listing → Reservation
    ListingReservations,
    /// Listing → Reservation → Review
    ListingReviews,
    /// Listing → Reservation → Guest
    ListingGuests,
    /// User (as host) → Listing
    HostListings,
    /// User (as host) → Listing → Reservation
    HostReservations,
    /// User (as host) → Listing → Reservation → Guest
    HostGuests,
    /// User (as host) → Listing → Reservation → Review
    HostReviews,
    /// User (as guest) → Reservation
    GuestTrips,
    /// User (as author) → Review
    GuestReviews,
    /// Reservation → Review
    ReservationReviews,
}

impl Path {
    /// Entity type the path starts from
    pub fn source(&self) -> &'static str {
        match self {
            Path::CityNeighborhoods | Path::CityListings | Path::CityReservations => City::ENTITY,
            Path::NeighborhoodListings | Path::NeighborhoodReservations => Neighborhood::ENTITY,
            Path::ListingReservations | Path::ListingReviews | Path::ListingGuests => {
                Listing::ENTITY
            }
            Path::HostListings
            | Path::HostReservations
            | Path::HostGuests
            | Path::HostReviews
            | Path::GuestTrips
            | Path::GuestReviews => User::ENTITY,
            Path::ReservationReviews => Reservation::ENTITY,
        }
    }
}

/// Result of a traversal, tagged by target entity type
#[derive(Debug, Clone, PartialEq)]
pub enum Related<'a> {
    Neighborhoods(Vec<&'a Neighborhood>),
    Listings(Vec<&'a Listing>),
    Reservations(Vec<&'a Reservation>),
    Reviews(Vec<&'a Review>),
    Users(Vec<&'a User>),
}

impl<'a> Related<'a> {
    pub fn len(&self) -> usize {
        match self {
            Related::Neighborhoods(items) => items.len(),
            Related::Listings(items) => items.len(),
            Related::Reservations(items) => items.len(),
            Related::Reviews(items) => items.len(),
            Related::Users(items) => items.len(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Ids in traversal order
    pub fn ids(&self) -> Vec<EntityId> {
        match self {
            Related::Neighborhoods(items) => items.iter().map(|e| e.id).collect(),
            Related::Listings(items) => items.iter().map(|e| e.id).collect(),
            Related::Reservations(items) => items.iter().map(|e| e.id).collect(),
            Related::Reviews(items) => items.iter().map(|e| e.id).collect(),
            Related::Users(items) => items.iter().map(|e| e.id).collect(),
        }
    }

    /// Drop repeated entities, keeping first occurrences
    pub fn distinct(self) -> Self {
        match self {
            Related::Neighborhoods(items) => Related::Neighborhoods(distinct(items)),
            Related::Listings(items) => Related::Listings(distinct(items)),
            Related::Reservations(items) => Related::Reservations(distinct(items)),
            Related::Reviews(items) => Related::Reviews(distinct(items)),
            Related::Users(items) => Related::Users(distinct(items)),
        }
    }
}

/// Remove repeated ids, keeping the first occurrence of each
pub fn distinct<E: Record>(items: Vec<&E>) -> Vec<&E> {
    let mut seen = HashSet::new();
    items
        .into_iter()
        .filter(|item| seen.insert(item.id()))
        .collect()
}

// ============================================================================
// RESOLVER
// ============================================================================

#[derive(Debug, Clone, Copy)]
pub struct Resolver<'a> {
    snapshot: &'a Snapshot,
}

impl<'a> Resolver<'a> {
    pub fn new(snapshot: &'a Snapshot) -> Self {
        Resolver { snapshot }
    }

    pub fn snapshot(&self) -> &'a Snapshot {
        self.snapshot
    }

    /// Run a declared path from an existing entity.
    ///
    /// The source id must exist (NotFound otherwise); an entity with no
    /// related rows yields an empty result.
    pub fn related(&self, from: EntityId, path: Path) -> Result<Related<'a>> {
        self.ensure_source(from, path)?;
        debug!(source = path.source(), from, ?path, "resolving related rows");

        Ok(match path {
            Path::CityNeighborhoods => Related::Neighborhoods(self.city_neighborhoods(from)),
            Path::CityListings => Related::Listings(self.city_listings(from)),
            Path::CityReservations => Related::Reservations(self.city_reservations(from)),
            Path::NeighborhoodListings => Related::Listings(self.neighborhood_listings(from)),
            Path::NeighborhoodReservations => {
                Related::Reservations(self.neighborhood_reservations(from))
            }
            Path::ListingReservations => Related::Reservations(self.listing_reservations(from)),
            Path::ListingReviews => Related::Reviews(self.listing_reviews(from)),
            Path::ListingGuests => Related::Users(self.listing_guests(from)?),
            Path::HostListings => Related::Listings(self.host_listings(from)),
            Path::HostReservations => Related::Reservations(self.host_reservations(from)),
            Path::HostGuests => Related::Users(self.host_guests(from)?),
            Path::HostReviews => Related::Reviews(self.host_reviews(from)),
            Path::GuestTrips => Related::Reservations(self.guest_trips(from)),
            Path::GuestReviews => Related::Reviews(self.guest_reviews(from)),
            Path::ReservationReviews => Related::Reviews(self.reservation_reviews(from)),
        })
    }

    fn ensure_source(&self, from: EntityId, path: Path) -> Result<()> {
        match path {
            Path::CityNeighborhoods | Path::CityListings | Path::CityReservations => {
                self.snapshot.get::<City>(from)?;
            }
            Path::NeighborhoodListings | Path::NeighborhoodReservations => {
                self.snapshot.get::<Neighborhood>(from)?;
            }
            Path::ListingReservations | Path::ListingReviews | Path::ListingGuests => {
                self.snapshot.get::<Listing>(from)?;
            }
            Path::ReservationReviews => {
                self.snapshot.get::<Reservation>(from)?;
            }
            Path::HostListings
            | Path::HostReservations
            | Path::HostGuests
            | Path::HostReviews
            | Path::GuestTrips
            | Path::GuestReviews => {
                self.snapshot.get::<User>(from)?;
            }
        }
        Ok(())
    }

    // ------------------------------------------------------------------------
    // Downward traversals
    // ------------------------------------------------------------------------

    pub fn city_neighborhoods(&self, city_id: EntityId) -> Vec<&'a Neighborhood> {
        self.snapshot.fetch_where(ForeignKey::City, city_id)
    }

    pub fn city_listings(&self, city_id: EntityId) -> Vec<&'a Listing> {
        self.city_neighborhoods(city_id)
            .into_iter()
            .flat_map(|n| self.neighborhood_listings(n.id))
            .collect()
    }

    pub fn city_reservations(&self, city_id: EntityId) -> Vec<&'a Reservation> {
        self.city_listings(city_id)
            .into_iter()
            .flat_map(|l| self.listing_reservations(l.id))
            .collect()
    }

    pub fn neighborhood_listings(&self, neighborhood_id: EntityId) -> Vec<&'a Listing> {
        self.snapshot
            .fetch_where(ForeignKey::Neighborhood, neighborhood_id)
    }

    pub fn neighborhood_reservations(&self, neighborhood_id: EntityId) -> Vec<&'a Reservation> {
        self.neighborhood_listings(neighborhood_id)
            .into_iter()
            .flat_map(|l| self.listing_reservations(l.id))
            .collect()
    }

    pub fn listing_reservations(&self, listing_id: EntityId) -> Vec<&'a Reservation> {
        self.snapshot.fetch_where(ForeignKey::Listing, listing_id)
    }

    pub fn listing_reviews(&self, listing_id: EntityId) -> Vec<&'a Review> {
        self.listing_reservations(listing_id)
            .into_iter()
            .flat_map(|r| self.reservation_reviews(r.id))
            .collect()
    }

    /// One entry per reservation (not deduplicated)
    pub fn listing_guests(&self, listing_id: EntityId) -> Result<Vec<&'a User>> {
        self.listing_reservations(listing_id)
            .into_iter()
            .map(|r| self.reservation_guest(r))
            .collect()
    }

    pub fn host_listings(&self, user_id: EntityId) -> Vec<&'a Listing> {
        self.snapshot.fetch_where(ForeignKey::Host, user_id)
    }

    pub fn host_reservations(&self, user_id: EntityId) -> Vec<&'a Reservation> {
        self.host_listings(user_id)
            .into_iter()
            .flat_map(|l| self.listing_reservations(l.id))
            .collect()
    }

    /// One entry per reservation on the host's listings (not deduplicated)
    pub fn host_guests(&self, user_id: EntityId) -> Result<Vec<&'a User>> {
        self.host_reservations(user_id)
            .into_iter()
            .map(|r| self.reservation_guest(r))
            .collect()
    }

    /// Reviews attached to reservations of the host's listings
    pub fn host_reviews(&self, user_id: EntityId) -> Vec<&'a Review> {
        self.host_reservations(user_id)
            .into_iter()
            .flat_map(|r| self.reservation_reviews(r.id))
            .collect()
    }

    pub fn guest_trips(&self, user_id: EntityId) -> Vec<&'a Reservation> {
        self.snapshot.fetch_where(ForeignKey::Guest, user_id)
    }

    /// Reviews the user wrote
    pub fn guest_reviews(&self, user_id: EntityId) -> Vec<&'a Review> {
        self.snapshot.fetch_where(ForeignKey::Guest, user_id)
    }

    pub fn reservation_reviews(&self, reservation_id: EntityId) -> Vec<&'a Review> {
        self.snapshot
            .fetch_where(ForeignKey::Reservation, reservation_id)
    }

    // ------------------------------------------------------------------------
    // Upward lookups (stored foreign keys; a miss is an invariant violation)
    // ------------------------------------------------------------------------

    pub fn neighborhood_city(&self, neighborhood: &Neighborhood) -> Result<&'a City> {
        self.snapshot.follow(neighborhood, neighborhood.city_id)
    }

    pub fn listing_neighborhood(&self, listing: &Listing) -> Result<&'a Neighborhood> {
        self.snapshot.follow(listing, listing.neighborhood_id)
    }

    pub fn listing_city(&self, listing: &Listing) -> Result<&'a City> {
        let neighborhood = self.listing_neighborhood(listing)?;
        self.neighborhood_city(neighborhood)
    }

    pub fn listing_host(&self, listing: &Listing) -> Result<&'a User> {
        self.snapshot.follow(listing, listing.host_id)
    }

    pub fn reservation_listing(&self, reservation: &Reservation) -> Result<&'a Listing> {
        self.snapshot.follow(reservation, reservation.listing_id)
    }

    pub fn reservation_guest(&self, reservation: &Reservation) -> Result<&'a User> {
        self.snapshot.follow(reservation, reservation.guest_id)
    }

    pub fn review_reservation(&self, review: &Review) -> Result<&'a Reservation> {
        self.snapshot.follow(review, review.reservation_id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::{ids, scenario_marketplace};

    #[test]
    fn test_city_listings_through_neighborhoods() {
        let snapshot = scenario_marketplace();
        let resolver = Resolver::new(&snapshot);

        let nyc_listings = resolver.city_listings(ids::NYC);
        let mut listing_ids: Vec<EntityId> = nyc_listings.iter().map(|l| l.id).collect();
        listing_ids.sort();
        assert_eq!(
            listing_ids,
            vec![ids::FIDI_LOFT, ids::BRIGHTON_ROOM, ids::BRIGHTON_SUITE]
        );

        assert!(resolver.city_listings(ids::CHICAGO).is_empty());
    }

    #[test]
    fn test_related_returns_empty_for_no_rows() {
        let snapshot = scenario_marketplace();
        let resolver = Resolver::new(&snapshot);

        let related = resolver.related(ids::CHICAGO, Path::CityReservations).unwrap();
        assert!(related.is_empty());
        assert_eq!(related, Related::Reservations(vec![]));
    }

    #[test]
    fn test_related_unknown_source_is_not_found() {
        let snapshot = scenario_marketplace();
        let resolver = Resolver::new(&snapshot);

        let err = resolver.related(999_999, Path::HostListings).unwrap_err();
        assert!(err.is_not_found());
    }

    #[test]
    fn test_host_guests_keep_duplicates_until_distinct() {
        let snapshot = scenario_marketplace();
        let resolver = Resolver::new(&snapshot);

        // Logan booked two of Amanda's listings
        let guests = resolver.related(ids::AMANDA, Path::HostGuests).unwrap();
        let all = guests.ids();
        assert!(all.iter().filter(|id| **id == ids::LOGAN).count() >= 2);

        let unique = guests.distinct().ids();
        assert_eq!(unique.iter().filter(|id| **id == ids::LOGAN).count(), 1);
    }

    #[test]
    fn test_listing_reviews_through_reservations() {
        let snapshot = scenario_marketplace();
        let resolver = Resolver::new(&snapshot);

        let reviews = resolver
            .related(ids::FIDI_LOFT, Path::ListingReviews)
            .unwrap();
        assert_eq!(reviews.ids(), vec![ids::LOFT_REVIEW]);

        let listing = snapshot.get::<Listing>(ids::FIDI_LOFT).unwrap();
        assert_eq!(resolver.listing_city(listing).unwrap().name, "NYC");
    }

    #[test]
    fn test_guest_reviews_use_review_author() {
        let snapshot = scenario_marketplace();
        let resolver = Resolver::new(&snapshot);

        let written = resolver.guest_reviews(ids::LOGAN);
        assert!(written.iter().all(|r| r.guest_id == ids::LOGAN));
        assert!(resolver.guest_reviews(ids::AMANDA).is_empty());
    }

    #[test]
    fn test_path_source_names_starting_entity() {
        assert_eq!(Path::CityListings.source(), "city");
        assert_eq!(Path::NeighborhoodReservations.source(), "neighborhood");
        assert_eq!(Path::ListingGuests.source(), "listing");
        assert_eq!(Path::HostReviews.source(), "user");
        assert_eq!(Path::GuestTrips.source(), "user");
        assert_eq!(Path::ReservationReviews.source(), "reservation");
    }
}
