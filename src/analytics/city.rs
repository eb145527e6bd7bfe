// City winners. Only cities with at least one contributing row compete
// (a city with no reservations cannot win `most_reservations`).

use tracing::debug;

use super::Analytics;
use crate::aggregation::{argmax_group, group_average, group_count};
use crate::entities::{City, EntityId, Listing, Neighborhood, Reservation, Review};
use crate::error::Result;

impl<'a> Analytics<'a> {
    fn city_of_reservation(&self, reservation: &Reservation) -> Result<EntityId> {
        let listing = self.resolver.reservation_listing(reservation)?;
        Ok(self.resolver.listing_city(listing)?.id)
    }

    fn city_of_listing(&self, listing: &Listing) -> Result<EntityId> {
        Ok(self.resolver.listing_city(listing)?.id)
    }

    fn winning_city(&self, winner: Option<EntityId>) -> Result<Option<&'a City>> {
        winner
            .map(|id| self.snapshot.get::<City>(id))
            .transpose()
    }

    /// City whose listings hold the most reservations
    pub fn city_most_reservations(&self) -> Result<Option<&'a City>> {
        let counts = group_count(self.snapshot.fetch_all::<Reservation>(), |r| {
            self.city_of_reservation(r)
        })?;
        debug!(groups = counts.len(), "reservations grouped by city");
        self.winning_city(argmax_group(&counts))
    }

    /// City with the most hosted listings.
    ///
    /// Despite the name this ranks cities by listing count, not by any
    /// property of the hosts; kept that way for compatibility.
    pub fn city_biggest_host(&self) -> Result<Option<&'a City>> {
        let counts = group_count(self.snapshot.fetch_all::<Listing>(), |listing| {
            self.resolver.listing_host(listing)?;
            self.city_of_listing(listing)
        })?;
        self.winning_city(argmax_group(&counts))
    }

    /// City with the highest average review rating
    pub fn city_highest_rated(&self) -> Result<Option<&'a City>> {
        let averages = group_average(self.snapshot.fetch_all::<Review>(), |review| {
            let reservation = self.resolver.review_reservation(review)?;
            Ok((self.city_of_reservation(reservation)?, review.rating.into()))
        })?;
        self.winning_city(argmax_group(&averages))
    }

    /// City with the most listings
    pub fn city_most_listings(&self) -> Result<Option<&'a City>> {
        let counts = group_count(self.snapshot.fetch_all::<Listing>(), |listing| {
            self.city_of_listing(listing)
        })?;
        self.winning_city(argmax_group(&counts))
    }

    pub fn city_neighborhoods(&self, city_id: EntityId) -> Result<Vec<&'a Neighborhood>> {
        self.snapshot.get::<City>(city_id)?;
        Ok(self.resolver.city_neighborhoods(city_id))
    }

    /// Listings in the city, reached through its neighborhoods
    pub fn city_listings(&self, city_id: EntityId) -> Result<Vec<&'a Listing>> {
        self.snapshot.get::<City>(city_id)?;
        Ok(self.resolver.city_listings(city_id))
    }
}

#[cfg(test)]
mod tests {
    use crate::analytics::Analytics;
    use crate::entities::{City, Listing, Neighborhood, User};
    use crate::snapshot::Snapshot;
    use crate::testing::{dollars, ids, scenario_marketplace};

    #[test]
    fn test_nyc_wins_reservations_and_rating() {
        let snapshot = scenario_marketplace();
        let analytics = Analytics::new(&snapshot).unwrap();

        assert_eq!(analytics.city_most_reservations().unwrap().unwrap().name, "NYC");
        assert_eq!(analytics.city_highest_rated().unwrap().unwrap().name, "NYC");
    }

    #[test]
    fn test_nyc_has_most_listings() {
        let snapshot = scenario_marketplace();
        let analytics = Analytics::new(&snapshot).unwrap();

        assert_eq!(analytics.city_most_listings().unwrap().unwrap().id, ids::NYC);
        assert_eq!(analytics.city_biggest_host().unwrap().unwrap().id, ids::NYC);
    }

    #[test]
    fn test_empty_marketplace_has_no_winners() {
        let snapshot = Snapshot::new();
        let analytics = Analytics::new(&snapshot).unwrap();

        assert!(analytics.city_most_reservations().unwrap().is_none());
        assert!(analytics.city_biggest_host().unwrap().is_none());
        assert!(analytics.city_highest_rated().unwrap().is_none());
        assert!(analytics.city_most_listings().unwrap().is_none());
    }

    #[test]
    fn test_tied_cities_return_one_of_the_tied() {
        let mut snapshot = Snapshot::new();
        snapshot.insert(City::new(1, "Austin")).unwrap();
        snapshot.insert(City::new(2, "Denver")).unwrap();
        snapshot.insert(Neighborhood::new(10, "Zilker", 1)).unwrap();
        snapshot.insert(Neighborhood::new(20, "LoDo", 2)).unwrap();
        snapshot.insert(User::new(1, "Host")).unwrap();
        snapshot.insert(Listing::new(1, "A", dollars(10), 10, 1)).unwrap();
        snapshot.insert(Listing::new(2, "B", dollars(10), 20, 1)).unwrap();
        let analytics = Analytics::new(&snapshot).unwrap();

        let winner = analytics.city_most_listings().unwrap().unwrap();
        assert!(winner.id == 1 || winner.id == 2);
    }

    #[test]
    fn test_city_listings_and_neighborhoods() {
        let snapshot = scenario_marketplace();
        let analytics = Analytics::new(&snapshot).unwrap();

        assert_eq!(analytics.city_neighborhoods(ids::NYC).unwrap().len(), 2);
        assert_eq!(analytics.city_listings(ids::NYC).unwrap().len(), 3);
        assert_eq!(analytics.city_listings(ids::CHICAGO).unwrap().len(), 1);
        assert!(analytics.city_listings(404).unwrap_err().is_not_found());
    }

    #[test]
    fn test_results_are_idempotent() {
        let snapshot = scenario_marketplace();
        let analytics = Analytics::new(&snapshot).unwrap();

        let first = analytics.city_highest_rated().unwrap().map(|c| c.id);
        let second = analytics.city_highest_rated().unwrap().map(|c| c.id);
        assert_eq!(first, second);
    }
}
