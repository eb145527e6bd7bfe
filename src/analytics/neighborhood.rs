use rust_decimal::Decimal;

use super::Analytics;
use crate::aggregation::{argmax_group, average, group_average, group_count, try_argmax};
use crate::entities::{EntityId, Listing, Neighborhood};
use crate::error::Result;

impl<'a> Analytics<'a> {
    /// Listing in the neighborhood with the most reservations; None when
    /// none of its listings has been booked
    pub fn neighborhood_most_popular_listing(
        &self,
        neighborhood_id: EntityId,
    ) -> Result<Option<&'a Listing>> {
        self.snapshot.get::<Neighborhood>(neighborhood_id)?;
        let counts = group_count(
            self.resolver.neighborhood_reservations(neighborhood_id),
            |reservation| Ok(reservation.listing_id),
        )?;
        argmax_group(&counts)
            .map(|id| self.snapshot.get::<Listing>(id))
            .transpose()
    }

    /// Mean nightly price of the neighborhood's listings; 0 with no listings
    pub fn neighborhood_average_price(&self, neighborhood_id: EntityId) -> Result<Decimal> {
        self.snapshot.get::<Neighborhood>(neighborhood_id)?;
        Ok(average(
            self.resolver
                .neighborhood_listings(neighborhood_id)
                .into_iter()
                .map(|listing| listing.price),
        ))
    }

    pub fn neighborhood_reservation_count(&self, neighborhood_id: EntityId) -> Result<usize> {
        self.snapshot.get::<Neighborhood>(neighborhood_id)?;
        Ok(self.resolver.neighborhood_reservations(neighborhood_id).len())
    }

    /// Neighborhood with the greatest summed earnings over all its listings
    pub fn neighborhood_highest_earner(&self) -> Result<Option<&'a Neighborhood>> {
        try_argmax(self.snapshot.fetch_all::<Neighborhood>(), |neighborhood| {
            self.neighborhood_earnings(neighborhood)
        })
    }

    /// Neighborhood with the highest average listing price
    pub fn neighborhood_most_expensive(&self) -> Result<Option<&'a Neighborhood>> {
        let averages = group_average(self.snapshot.fetch_all::<Listing>(), |listing| {
            Ok((self.resolver.listing_neighborhood(listing)?.id, listing.price))
        })?;
        argmax_group(&averages)
            .map(|id| self.snapshot.get::<Neighborhood>(id))
            .transpose()
    }
}
