// 💵 Earnings - nights × nightly price, in fixed point
//
// Every reservation counts regardless of status; the stored status is not
// interpreted by the engine.

use rust_decimal::Decimal;

use super::Analytics;
use crate::entities::{EntityId, Listing, Neighborhood, Record, Reservation, User};
use crate::error::{AnalyticsError, Result};

/// Running total that reports overflow as a violation on `owner`
fn add_checked<E: Record>(owner: &E, total: Decimal, amount: Decimal) -> Result<Decimal> {
    total
        .checked_add(amount)
        .ok_or_else(|| AnalyticsError::invariant(E::ENTITY, owner.id(), "earnings overflow"))
}

impl<'a> Analytics<'a> {
    /// price_per_night × nights for one stay
    pub fn reservation_cost(&self, reservation: &Reservation) -> Result<Decimal> {
        let listing = self.resolver.reservation_listing(reservation)?;
        reservation.cost_at(listing.price)
    }

    /// `reservation_cost` by id
    pub fn reservation_total_cost(&self, reservation_id: EntityId) -> Result<Decimal> {
        let reservation = self.snapshot.get::<Reservation>(reservation_id)?;
        self.reservation_cost(reservation)
    }

    pub(crate) fn earnings_of(&self, listing: &Listing) -> Result<Decimal> {
        self.resolver
            .listing_reservations(listing.id)
            .into_iter()
            .try_fold(Decimal::ZERO, |total, reservation| {
                add_checked(listing, total, reservation.cost_at(listing.price)?)
            })
    }

    /// Sum of every reservation's cost on the listing; 0 with no reservations
    pub fn listing_total_earnings(&self, listing_id: EntityId) -> Result<Decimal> {
        let listing = self.snapshot.get::<Listing>(listing_id)?;
        self.earnings_of(listing)
    }

    /// Sum of listing earnings over every listing the user hosts
    pub fn user_total_earnings(&self, user_id: EntityId) -> Result<Decimal> {
        let host = self.snapshot.get::<User>(user_id)?;
        self.resolver
            .host_listings(user_id)
            .into_iter()
            .try_fold(Decimal::ZERO, |total, listing| {
                add_checked(host, total, self.earnings_of(listing)?)
            })
    }

    pub(crate) fn neighborhood_earnings(&self, neighborhood: &Neighborhood) -> Result<Decimal> {
        self.resolver
            .neighborhood_listings(neighborhood.id)
            .into_iter()
            .try_fold(Decimal::ZERO, |total, listing| {
                add_checked(neighborhood, total, self.earnings_of(listing)?)
            })
    }

    /// Earnings of every listing in the neighborhood
    pub fn neighborhood_total_earnings(&self, neighborhood_id: EntityId) -> Result<Decimal> {
        let neighborhood = self.snapshot.get::<Neighborhood>(neighborhood_id)?;
        self.neighborhood_earnings(neighborhood)
    }
}

#[cfg(test)]
mod tests {
    use rust_decimal::Decimal;

    use crate::analytics::Analytics;
    use crate::entities::{City, Listing, Neighborhood, Reservation, ReservationStatus, User};
    use crate::snapshot::Snapshot;
    use crate::testing::{date, dollars, ids, scenario_marketplace};

    #[test]
    fn test_reservation_cost_is_nights_times_price() {
        let snapshot = scenario_marketplace();
        let analytics = Analytics::new(&snapshot).unwrap();

        for reservation in snapshot.fetch_all::<Reservation>() {
            let listing = snapshot.get::<Listing>(reservation.listing_id).unwrap();
            let cost = analytics.reservation_cost(reservation).unwrap();
            assert_eq!(cost, listing.price * Decimal::from(reservation.duration()));
            assert!(cost >= Decimal::ZERO);
        }
    }

    #[test]
    fn test_total_cost_example() {
        let mut snapshot = Snapshot::new();
        snapshot.insert(City::new(1, "NYC")).unwrap();
        snapshot.insert(Neighborhood::new(1, "Fi Di", 1)).unwrap();
        snapshot.insert(User::new(1, "Amanda")).unwrap();
        snapshot.insert(User::new(2, "Logan")).unwrap();
        snapshot
            .insert(Listing::new(1, "Main Street", dollars(50), 1, 1))
            .unwrap();
        snapshot
            .insert(Reservation::new(1, 1, 2, date("2014-04-25"), date("2014-04-30")))
            .unwrap();
        let analytics = Analytics::new(&snapshot).unwrap();

        let reservation = snapshot.get::<Reservation>(1).unwrap();
        assert_eq!(reservation.duration(), 5);
        assert_eq!(analytics.reservation_total_cost(1).unwrap(), dollars(250));
        assert_eq!(analytics.reservation_total_cost(1).unwrap().to_string(), "250.00");
    }

    #[test]
    fn test_listing_and_host_earnings() {
        let snapshot = scenario_marketplace();
        let analytics = Analytics::new(&snapshot).unwrap();

        assert_eq!(analytics.listing_total_earnings(ids::BRIGHTON_ROOM).unwrap(), dollars(1200));
        assert_eq!(analytics.listing_total_earnings(ids::BRIGHTON_SUITE).unwrap(), dollars(1200));
        assert_eq!(analytics.listing_total_earnings(ids::LOOP_STUDIO).unwrap(), dollars(0));

        // loft 200 + room 1200 + suite 1200
        assert_eq!(analytics.user_total_earnings(ids::AMANDA).unwrap(), dollars(2600));
        // Logan hosts nothing
        assert_eq!(analytics.user_total_earnings(ids::LOGAN).unwrap(), dollars(0));

        assert_eq!(
            analytics.neighborhood_total_earnings(ids::BRIGHTON_BEACH).unwrap(),
            dollars(2400)
        );
        assert_eq!(analytics.neighborhood_total_earnings(ids::MISSION).unwrap(), dollars(450));
    }

    #[test]
    fn test_unknown_ids_are_not_found() {
        let snapshot = scenario_marketplace();
        let analytics = Analytics::new(&snapshot).unwrap();

        assert!(analytics.listing_total_earnings(404).unwrap_err().is_not_found());
        assert!(analytics.user_total_earnings(404).unwrap_err().is_not_found());
        assert!(analytics.reservation_total_cost(404).unwrap_err().is_not_found());
    }

    #[test]
    fn test_fractional_prices_stay_exact() {
        let mut snapshot = scenario_marketplace();
        snapshot
            .insert(Listing::new(2000, "Cents", Decimal::new(3333, 2), ids::LOOP, ids::SAM))
            .unwrap();
        snapshot
            .insert(Reservation::new(6000, 2000, ids::RITA, date("2024-01-01"), date("2024-01-04")))
            .unwrap();
        let analytics = Analytics::new(&snapshot).unwrap();

        assert_eq!(
            analytics.listing_total_earnings(2000).unwrap(),
            Decimal::new(9999, 2)
        );
    }

    #[test]
    fn test_cost_overflow_is_an_error() {
        let mut snapshot = scenario_marketplace();
        snapshot
            .insert(Listing::new(2000, "Palace", Decimal::MAX, ids::LOOP, ids::SAM))
            .unwrap();
        snapshot
            .insert(Reservation::new(6000, 2000, ids::RITA, date("2024-01-01"), date("2024-01-03")))
            .unwrap();
        let analytics = Analytics::new(&snapshot).unwrap();

        assert!(analytics.reservation_total_cost(6000).unwrap_err().is_invariant_violation());
        assert!(analytics.listing_total_earnings(2000).unwrap_err().is_invariant_violation());
        assert!(analytics.user_total_earnings(ids::SAM).unwrap_err().is_invariant_violation());
        assert!(analytics.neighborhood_highest_earner().unwrap_err().is_invariant_violation());
    }

    #[test]
    fn test_summed_earnings_overflow_is_an_error() {
        let mut snapshot = scenario_marketplace();
        let half = Decimal::MAX / Decimal::from(2);
        for offset in 0..3 {
            let listing_id = 2000 + offset;
            snapshot
                .insert(Listing::new(listing_id, "Tower", half, ids::LOOP, ids::SAM))
                .unwrap();
            snapshot
                .insert(Reservation::new(
                    6000 + offset,
                    listing_id,
                    ids::RITA,
                    date("2024-01-01"),
                    date("2024-01-02"),
                ))
                .unwrap();
        }
        let analytics = Analytics::new(&snapshot).unwrap();

        // Each listing on its own is representable
        assert_eq!(analytics.listing_total_earnings(2000).unwrap(), half);
        assert!(analytics
            .neighborhood_total_earnings(ids::LOOP)
            .unwrap_err()
            .is_invariant_violation());
        assert!(analytics.user_total_earnings(ids::SAM).unwrap_err().is_invariant_violation());
    }

    #[test]
    fn test_status_does_not_affect_earnings() {
        let mut snapshot = scenario_marketplace();
        snapshot
            .insert(
                Reservation::new(7000, ids::LOOP_STUDIO, ids::RITA, date("2024-06-01"), date("2024-06-03"))
                    .with_status(ReservationStatus::Cancelled),
            )
            .unwrap();
        snapshot
            .insert(
                Reservation::new(7001, ids::LOOP_STUDIO, ids::LOGAN, date("2024-07-01"), date("2024-07-02"))
                    .with_status(ReservationStatus::Completed),
            )
            .unwrap();
        let analytics = Analytics::new(&snapshot).unwrap();

        // 2 nights cancelled + 1 night completed, all at $80
        assert_eq!(analytics.listing_total_earnings(ids::LOOP_STUDIO).unwrap(), dollars(240));
        assert_eq!(analytics.booking_count(ids::LOOP_STUDIO).unwrap(), 2);
        assert!(analytics.is_booked(ids::LOOP_STUDIO).unwrap());
    }
}
