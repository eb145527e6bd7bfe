// 🗓️ Availability & overlap checks
//
// Stays are half-open [checkin, checkout): a guest checking out on day D
// frees the listing for a guest checking in on D.

use chrono::NaiveDate;
use tracing::debug;

use super::Analytics;
use crate::entities::{EntityId, Listing};
use crate::error::Result;

impl<'a> Analytics<'a> {
    /// No reservation on the listing has checkin ≤ date < checkout
    pub fn is_available(&self, listing_id: EntityId, date: NaiveDate) -> Result<bool> {
        self.snapshot.get::<Listing>(listing_id)?;
        Ok(!self
            .resolver
            .listing_reservations(listing_id)
            .iter()
            .any(|reservation| reservation.covers(date)))
    }

    fn is_free_between(&self, listing: &Listing, start: NaiveDate, end: NaiveDate) -> bool {
        !self
            .resolver
            .listing_reservations(listing.id)
            .iter()
            .any(|reservation| reservation.overlaps(start, end))
    }

    /// Listings with no reservation intersecting [start, end), ascending by id.
    ///
    /// The overlap test is applied literally; an empty or inverted range
    /// conflicts with nothing and returns every listing.
    pub fn available_between(&self, start: NaiveDate, end: NaiveDate) -> Vec<&'a Listing> {
        let available: Vec<&'a Listing> = self
            .snapshot
            .fetch_all::<Listing>()
            .filter(|listing| self.is_free_between(listing, start, end))
            .collect();
        debug!(%start, %end, available = available.len(), "availability computed");
        available
    }

    /// Range check for a single listing
    pub fn listing_available_between(
        &self,
        listing_id: EntityId,
        start: NaiveDate,
        end: NaiveDate,
    ) -> Result<bool> {
        let listing = self.snapshot.get::<Listing>(listing_id)?;
        Ok(self.is_free_between(listing, start, end))
    }
}

#[cfg(test)]
mod tests {
    use crate::analytics::Analytics;
    use crate::entities::{Listing, Reservation};
    use crate::testing::{date, ids, scenario_marketplace};

    #[test]
    fn test_listing_without_reservations_is_always_available() {
        let snapshot = scenario_marketplace();
        let analytics = Analytics::new(&snapshot).unwrap();

        for day in ["2000-01-01", "2024-04-10", "2099-12-31"] {
            assert!(analytics.is_available(ids::LOOP_STUDIO, date(day)).unwrap());
        }
    }

    #[test]
    fn test_checkout_day_is_free() {
        let mut snapshot = scenario_marketplace();
        snapshot
            .insert(Reservation::new(
                7000,
                ids::LOOP_STUDIO,
                ids::RITA,
                date("2024-04-10"),
                date("2024-04-15"),
            ))
            .unwrap();
        let analytics = Analytics::new(&snapshot).unwrap();

        assert!(analytics.is_available(ids::LOOP_STUDIO, date("2024-04-15")).unwrap());
        assert!(!analytics.is_available(ids::LOOP_STUDIO, date("2024-04-14")).unwrap());
        assert!(!analytics.is_available(ids::LOOP_STUDIO, date("2024-04-10")).unwrap());
        assert!(analytics.is_available(ids::LOOP_STUDIO, date("2024-04-09")).unwrap());
    }

    #[test]
    fn test_available_between_excludes_conflicts() {
        let snapshot = scenario_marketplace();
        let analytics = Analytics::new(&snapshot).unwrap();

        // Room and suite are both booked from 2024-04-10
        let free: Vec<i64> = analytics
            .available_between(date("2024-04-11"), date("2024-04-12"))
            .iter()
            .map(|l| l.id)
            .collect();
        assert_eq!(free, vec![ids::FIDI_LOFT, ids::MISSION_FLAT, ids::LOOP_STUDIO]);

        // Far future: everything is free
        let all = analytics.available_between(date("2030-01-01"), date("2030-01-05"));
        assert_eq!(all.len(), snapshot.count::<Listing>());
    }

    #[test]
    fn test_available_between_boundaries() {
        let snapshot = scenario_marketplace();
        let analytics = Analytics::new(&snapshot).unwrap();

        // Room stay is [2024-04-10, 2024-04-13)
        assert!(analytics
            .listing_available_between(ids::BRIGHTON_ROOM, date("2024-04-13"), date("2024-04-20"))
            .unwrap());
        assert!(analytics
            .listing_available_between(ids::BRIGHTON_ROOM, date("2024-04-01"), date("2024-04-10"))
            .unwrap());
        assert!(!analytics
            .listing_available_between(ids::BRIGHTON_ROOM, date("2024-04-12"), date("2024-04-13"))
            .unwrap());
    }

    #[test]
    fn test_unknown_listing_is_not_found() {
        let snapshot = scenario_marketplace();
        let analytics = Analytics::new(&snapshot).unwrap();

        let err = analytics.is_available(404, date("2024-01-01")).unwrap_err();
        assert!(err.is_not_found());
    }
}
