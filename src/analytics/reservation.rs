// 🧳 Reservation rankings and filters

use chrono::{Datelike, NaiveDate};

use super::{Analytics, RECENT_RESERVATIONS_LIMIT};
use crate::aggregation::try_argmax;
use crate::entities::{Reservation, User};
use crate::error::Result;
use crate::ranking::top_n;
use crate::resolver::distinct;

impl<'a> Analytics<'a> {
    /// The five most recently created reservations, newest first
    pub fn most_recent_reservations(&self) -> Result<Vec<&'a Reservation>> {
        self.most_recent_reservations_n(RECENT_RESERVATIONS_LIMIT)
    }

    /// Up to `n` reservations by creation time, newest first (id breaks ties)
    pub fn most_recent_reservations_n(&self, n: usize) -> Result<Vec<&'a Reservation>> {
        top_n(
            self.snapshot.fetch_all::<Reservation>(),
            |reservation| Ok((reservation.created_at, reservation.id)),
            n,
        )
    }

    /// Reservation with the largest total cost
    pub fn highest_grossing_reservation(&self) -> Result<Option<&'a Reservation>> {
        try_argmax(self.snapshot.fetch_all::<Reservation>(), |reservation| {
            self.reservation_cost(reservation)
        })
    }

    /// Reservations checking in during the given calendar month
    pub fn reservations_by_month(&self, month: u32, year: i32) -> Vec<&'a Reservation> {
        self.snapshot
            .fetch_all::<Reservation>()
            .filter(|r| r.checkin.month() == month && r.checkin.year() == year)
            .collect()
    }

    /// Distinct guests staying somewhere on `today`
    pub fn current_guests(&self, today: NaiveDate) -> Result<Vec<&'a User>> {
        let guests = self
            .snapshot
            .fetch_all::<Reservation>()
            .filter(|reservation| reservation.covers(today))
            .map(|reservation| self.resolver.reservation_guest(reservation))
            .collect::<Result<Vec<_>>>()?;
        Ok(distinct(guests))
    }
}

#[cfg(test)]
mod tests {
    use crate::analytics::Analytics;
    use crate::entities::Reservation;
    use crate::snapshot::Snapshot;
    use crate::testing::{at, date, ids, scenario_marketplace};

    #[test]
    fn test_most_recent_reservations_newest_first() {
        let snapshot = scenario_marketplace();
        let analytics = Analytics::new(&snapshot).unwrap();

        let recent: Vec<_> = analytics
            .most_recent_reservations_n(2)
            .unwrap()
            .iter()
            .map(|r| r.id)
            .collect();
        assert_eq!(recent, vec![ids::FLAT_STAY, ids::SUITE_STAY]);

        // Default limit exceeds the four stays in the fixture
        assert_eq!(analytics.most_recent_reservations().unwrap().len(), 4);
    }

    #[test]
    fn test_same_creation_time_orders_by_id() {
        let mut snapshot = scenario_marketplace();
        snapshot
            .insert(
                Reservation::new(7000, ids::LOOP_STUDIO, ids::RITA, date("2024-08-01"), date("2024-08-02"))
                    .with_created_at(at("2024-02-15")),
            )
            .unwrap();
        let analytics = Analytics::new(&snapshot).unwrap();

        let recent = analytics.most_recent_reservations_n(2).unwrap();
        assert_eq!(recent[0].id, 7000);
        assert_eq!(recent[1].id, ids::FLAT_STAY);
    }

    #[test]
    fn test_highest_grossing_reservation() {
        let snapshot = scenario_marketplace();
        let analytics = Analytics::new(&snapshot).unwrap();

        // Room and suite both gross 1200; the lower id wins
        let top = analytics.highest_grossing_reservation().unwrap().unwrap();
        assert_eq!(top.id, ids::ROOM_STAY);

        let empty = Snapshot::new();
        let analytics = Analytics::new(&empty).unwrap();
        assert!(analytics.highest_grossing_reservation().unwrap().is_none());
    }

    #[test]
    fn test_reservations_by_month() {
        let snapshot = scenario_marketplace();
        let analytics = Analytics::new(&snapshot).unwrap();

        let april: Vec<_> = analytics
            .reservations_by_month(4, 2024)
            .iter()
            .map(|r| r.id)
            .collect();
        assert_eq!(april, vec![ids::ROOM_STAY, ids::SUITE_STAY]);
        assert!(analytics.reservations_by_month(4, 2023).is_empty());
    }

    #[test]
    fn test_current_guests() {
        let snapshot = scenario_marketplace();
        let analytics = Analytics::new(&snapshot).unwrap();

        let guests: Vec<_> = analytics
            .current_guests(date("2024-04-11"))
            .unwrap()
            .iter()
            .map(|u| u.id)
            .collect();
        assert_eq!(guests, vec![ids::LOGAN, ids::RITA]);

        // Checkout day is free
        let on_checkout = analytics.current_guests(date("2024-04-13")).unwrap();
        assert!(on_checkout.is_empty());
    }
}
