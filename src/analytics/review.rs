// ⭐ Review histogram, averages and filters

use std::collections::BTreeMap;

use rust_decimal::Decimal;

use super::{Analytics, RECENT_REVIEWS_LIMIT};
use crate::aggregation::{average, group_count, to_f64};
use crate::entities::review::MAX_RATING;
use crate::entities::Review;
use crate::error::Result;
use crate::ranking::top_n;

/// Reviews at or below this rating count as low
const LOW_RATING_CEILING: u8 = 2;

impl<'a> Analytics<'a> {
    /// rating → number of reviews with that rating.
    ///
    /// Only ratings that occur appear as keys.
    pub fn detailed_ratings(&self) -> Result<BTreeMap<u8, usize>> {
        group_count(self.snapshot.fetch_all::<Review>(), |review| Ok(review.rating))
    }

    /// Mean rating over all reviews; 0 when there are none
    pub fn average_rating(&self) -> f64 {
        to_f64(average(
            self.snapshot
                .fetch_all::<Review>()
                .map(|review| Decimal::from(review.rating)),
        ))
    }

    /// The ten most recently created reviews, newest first
    pub fn most_recent_reviews(&self) -> Result<Vec<&'a Review>> {
        self.most_recent_reviews_n(RECENT_REVIEWS_LIMIT)
    }

    pub fn most_recent_reviews_n(&self, n: usize) -> Result<Vec<&'a Review>> {
        top_n(
            self.snapshot.fetch_all::<Review>(),
            |review| Ok((review.created_at, review.id)),
            n,
        )
    }

    pub fn reviews_by_rating(&self, rating: u8) -> Vec<&'a Review> {
        self.snapshot
            .fetch_all::<Review>()
            .filter(|review| review.rating == rating)
            .collect()
    }

    pub fn highest_rated_reviews(&self) -> Vec<&'a Review> {
        self.reviews_by_rating(MAX_RATING)
    }

    pub fn lowest_rated_reviews(&self) -> Vec<&'a Review> {
        self.snapshot
            .fetch_all::<Review>()
            .filter(|review| review.rating <= LOW_RATING_CEILING)
            .collect()
    }
}
