// 🏠 Listing stats, rankings and filters

use rust_decimal::Decimal;
use tracing::debug;

use super::{Analytics, HIGHLY_RATED_THRESHOLD, TOP_EARNERS_LIMIT};
use crate::aggregation::{argmax, average, group_average, to_f64};
use crate::entities::{EntityId, Listing, Review, User};
use crate::error::Result;
use crate::ranking::top_n_scored;
use crate::resolver::distinct;

impl<'a> Analytics<'a> {
    /// Mean rating of reviews left on the listing's reservations; 0 with none
    pub fn listing_average_review_rating(&self, listing_id: EntityId) -> Result<f64> {
        self.snapshot.get::<Listing>(listing_id)?;
        let ratings = self
            .resolver
            .listing_reviews(listing_id)
            .into_iter()
            .map(|review| Decimal::from(review.rating));
        Ok(to_f64(average(ratings)))
    }

    pub fn is_booked(&self, listing_id: EntityId) -> Result<bool> {
        Ok(self.booking_count(listing_id)? > 0)
    }

    pub fn booking_count(&self, listing_id: EntityId) -> Result<usize> {
        self.snapshot.get::<Listing>(listing_id)?;
        Ok(self.resolver.listing_reservations(listing_id).len())
    }

    /// Latest review on the listing by creation time (id breaks ties)
    pub fn most_recent_review(&self, listing_id: EntityId) -> Result<Option<&'a Review>> {
        self.snapshot.get::<Listing>(listing_id)?;
        Ok(argmax(self.resolver.listing_reviews(listing_id), |review| {
            (review.created_at, review.id)
        }))
    }

    /// Distinct guests who booked the listing, in reservation order
    pub fn listing_guests(&self, listing_id: EntityId) -> Result<Vec<&'a User>> {
        self.snapshot.get::<Listing>(listing_id)?;
        Ok(distinct(self.resolver.listing_guests(listing_id)?))
    }

    /// The three highest-earning listings, best first
    pub fn top_earners(&self) -> Result<Vec<&'a Listing>> {
        Ok(self
            .top_earners_with_totals()?
            .into_iter()
            .map(|(listing, _)| listing)
            .collect())
    }

    /// `top_earners` together with each listing's total earnings
    pub fn top_earners_with_totals(&self) -> Result<Vec<(&'a Listing, Decimal)>> {
        let ranked = top_n_scored(
            self.snapshot.fetch_all::<Listing>(),
            |listing| self.earnings_of(listing),
            TOP_EARNERS_LIMIT,
        )?;
        debug!(ranked = ranked.len(), "top earners ranked");
        Ok(ranked)
    }

    /// Reviewed listings whose average rating is at least 4, ascending by id
    pub fn highest_rated_listings(&self) -> Result<Vec<&'a Listing>> {
        let averages = group_average(self.snapshot.fetch_all::<Review>(), |review| {
            let reservation = self.resolver.review_reservation(review)?;
            Ok((reservation.listing_id, Decimal::from(review.rating)))
        })?;
        let threshold = Decimal::from(HIGHLY_RATED_THRESHOLD);
        averages
            .into_iter()
            .filter(|(_, avg)| *avg >= threshold)
            .map(|(id, _)| self.snapshot.get::<Listing>(id))
            .collect()
    }

    pub fn most_expensive_listing(&self) -> Option<&'a Listing> {
        argmax(self.snapshot.fetch_all::<Listing>(), |listing| listing.price)
    }

    /// Listings located in every city with the given name
    pub fn listings_by_city(&self, city_name: &str) -> Result<Vec<&'a Listing>> {
        let mut matches = Vec::new();
        for listing in self.snapshot.fetch_all::<Listing>() {
            if self.resolver.listing_city(listing)?.name == city_name {
                matches.push(listing);
            }
        }
        Ok(matches)
    }
}
