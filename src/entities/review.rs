// ⭐ Review Entity - a guest's rating of a stay
//
// The review's guest is stored independently of the reservation's guest.
// They should agree but the schema does not enforce it, so traversals that
// mean "reviews of a host's listings" go through the reservation, while
// "reviews written by a user" go through `guest_id`.

use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};

use super::{EntityId, ForeignKey, Record};
use crate::error::AnalyticsError;

pub const MIN_RATING: u8 = 1;
pub const MAX_RATING: u8 = 5;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Review {
    pub id: EntityId,
    pub description: String,

    /// Overall rating, 1-5
    pub rating: u8,

    pub cleanliness_rating: Option<u8>,
    pub communication_rating: Option<u8>,
    pub guest_id: EntityId,
    pub reservation_id: EntityId,
    pub created_at: NaiveDateTime,
}

impl Review {
    pub fn new(
        id: EntityId,
        reservation_id: EntityId,
        guest_id: EntityId,
        rating: u8,
        description: &str,
    ) -> Self {
        Review {
            id,
            description: description.to_string(),
            rating,
            cleanliness_rating: None,
            communication_rating: None,
            guest_id,
            reservation_id,
            created_at: super::now(),
        }
    }

    pub fn with_detail_ratings(mut self, cleanliness: u8, communication: u8) -> Self {
        self.cleanliness_rating = Some(cleanliness);
        self.communication_rating = Some(communication);
        self
    }

    pub fn with_created_at(mut self, created_at: NaiveDateTime) -> Self {
        self.created_at = created_at;
        self
    }

    fn check_rating(&self, field: &str, value: u8) -> crate::Result<()> {
        if !(MIN_RATING..=MAX_RATING).contains(&value) {
            return Err(AnalyticsError::invariant(
                Self::ENTITY,
                self.id,
                format!(
                    "{} must be between {} and {} (got {})",
                    field, MIN_RATING, MAX_RATING, value
                ),
            ));
        }
        Ok(())
    }
}

impl Record for Review {
    const ENTITY: &'static str = "review";

    fn id(&self) -> EntityId {
        self.id
    }

    fn foreign_key(&self, key: ForeignKey) -> Option<EntityId> {
        match key {
            ForeignKey::Guest => Some(self.guest_id),
            ForeignKey::Reservation => Some(self.reservation_id),
            _ => None,
        }
    }

    fn validate(&self) -> crate::Result<()> {
        self.check_rating("rating", self.rating)?;
        if let Some(cleanliness) = self.cleanliness_rating {
            self.check_rating("cleanliness_rating", cleanliness)?;
        }
        if let Some(communication) = self.communication_rating {
            self.check_rating("communication_rating", communication)?;
        }
        Ok(())
    }
}
