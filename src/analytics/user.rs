// 👤 Host and guest derivations
//
// A user is a host through the listings they own and a guest through the
// reservations they hold (their trips). Neither role is stored.

use rust_decimal::Decimal;
use tracing::debug;

use super::{Analytics, TOP_DESTINATIONS_LIMIT};
use crate::aggregation::{argmax_group, average, group_count};
use crate::entities::{City, EntityId, Listing, Neighborhood, Reservation, Review, User};
use crate::error::Result;
use crate::ranking::top_n;
use crate::resolver::distinct;

impl<'a> Analytics<'a> {
    pub fn is_host(&self, user_id: EntityId) -> Result<bool> {
        self.snapshot.get::<User>(user_id)?;
        Ok(!self.resolver.host_listings(user_id).is_empty())
    }

    pub fn trip_count(&self, user_id: EntityId) -> Result<usize> {
        self.snapshot.get::<User>(user_id)?;
        Ok(self.resolver.guest_trips(user_id).len())
    }

    /// Mean nightly price of the user's listings; 0 for non-hosts
    pub fn average_listing_price(&self, user_id: EntityId) -> Result<Decimal> {
        self.snapshot.get::<User>(user_id)?;
        Ok(average(
            self.resolver
                .host_listings(user_id)
                .into_iter()
                .map(|listing| listing.price),
        ))
    }

    /// Distinct guests across all of the user's listings
    pub fn host_guests(&self, user_id: EntityId) -> Result<Vec<&'a User>> {
        self.snapshot.get::<User>(user_id)?;
        Ok(distinct(self.resolver.host_guests(user_id)?))
    }

    /// Reviews left on reservations of the user's listings
    pub fn host_reviews(&self, user_id: EntityId) -> Result<Vec<&'a Review>> {
        self.snapshot.get::<User>(user_id)?;
        Ok(self.resolver.host_reviews(user_id))
    }

    /// Up to three cities the user visited most, most visited first.
    ///
    /// Cities with equal visit counts come out in ascending id order.
    pub fn top_three_destinations(&self, user_id: EntityId) -> Result<Vec<&'a City>> {
        self.snapshot.get::<User>(user_id)?;
        let visits = group_count(self.resolver.guest_trips(user_id), |trip| {
            let listing = self.resolver.reservation_listing(trip)?;
            Ok(self.resolver.listing_city(listing)?.id)
        })?;
        debug!(user_id, cities = visits.len(), "trips grouped by city");

        top_n(visits, |(_, count)| Ok(*count), TOP_DESTINATIONS_LIMIT)?
            .into_iter()
            .map(|(city_id, _)| self.snapshot.get::<City>(city_id))
            .collect()
    }

    /// Neighborhood the user stayed in most often; None without trips
    pub fn favorite_neighborhood(&self, user_id: EntityId) -> Result<Option<&'a Neighborhood>> {
        self.snapshot.get::<User>(user_id)?;
        let visits = group_count(self.resolver.guest_trips(user_id), |trip| {
            let listing = self.resolver.reservation_listing(trip)?;
            Ok(listing.neighborhood_id)
        })?;
        argmax_group(&visits)
            .map(|id| self.snapshot.get::<Neighborhood>(id))
            .transpose()
    }

    /// Users owning at least one listing, ascending by id
    pub fn hosts(&self) -> Vec<&'a User> {
        self.snapshot
            .fetch_all::<User>()
            .filter(|user| !self.resolver.host_listings(user.id).is_empty())
            .collect()
    }

    /// Users holding at least one reservation, ascending by id
    pub fn guests(&self) -> Vec<&'a User> {
        self.snapshot
            .fetch_all::<User>()
            .filter(|user| !self.resolver.guest_trips(user.id).is_empty())
            .collect()
    }

    /// Host with the most listings
    pub fn top_host(&self) -> Result<Option<&'a User>> {
        let counts = group_count(self.snapshot.fetch_all::<Listing>(), |listing| {
            Ok(self.resolver.listing_host(listing)?.id)
        })?;
        argmax_group(&counts)
            .map(|id| self.snapshot.get::<User>(id))
            .transpose()
    }

    /// Guest with the most trips
    pub fn most_traveled(&self) -> Result<Option<&'a User>> {
        let counts = group_count(self.snapshot.fetch_all::<Reservation>(), |trip| {
            Ok(self.resolver.reservation_guest(trip)?.id)
        })?;
        argmax_group(&counts)
            .map(|id| self.snapshot.get::<User>(id))
            .transpose()
    }
}
