// Shared fixtures for unit tests
//
// scenario_marketplace():
//   NYC     ── Fi Di          ── loft   $100   (Amanda)  1 stay  × 2 nights
//           └─ Brighton Beach ── room   $400   (Amanda)  1 stay  × 3 nights
//                             └─ suite  $600   (Amanda)  1 stay  × 2 nights
//   SF      ── Mission        ── flat   $150   (Sam)     1 stay  × 3 nights
//   Chicago ── Loop           ── studio  $80   (Sam)     no stays
//
// Reviews: loft 5, room 4, suite 5 (NYC avg 4.667), flat 4 (SF avg 4.0).

use chrono::{NaiveDate, NaiveDateTime};
use rust_decimal::Decimal;

use crate::entities::{City, Listing, Neighborhood, Reservation, Review, User};
use crate::snapshot::Snapshot;

pub mod ids {
    use crate::entities::EntityId;

    pub const NYC: EntityId = 1;
    pub const SF: EntityId = 2;
    pub const CHICAGO: EntityId = 3;

    pub const FIDI: EntityId = 10;
    pub const BRIGHTON_BEACH: EntityId = 11;
    pub const MISSION: EntityId = 12;
    pub const LOOP: EntityId = 13;

    pub const AMANDA: EntityId = 100;
    pub const LOGAN: EntityId = 101;
    pub const SAM: EntityId = 102;
    pub const RITA: EntityId = 103;

    pub const FIDI_LOFT: EntityId = 1000;
    pub const BRIGHTON_ROOM: EntityId = 1001;
    pub const BRIGHTON_SUITE: EntityId = 1002;
    pub const MISSION_FLAT: EntityId = 1003;
    pub const LOOP_STUDIO: EntityId = 1004;

    pub const LOFT_STAY: EntityId = 5000;
    pub const ROOM_STAY: EntityId = 5001;
    pub const SUITE_STAY: EntityId = 5002;
    pub const FLAT_STAY: EntityId = 5003;

    pub const LOFT_REVIEW: EntityId = 9000;
    pub const ROOM_REVIEW: EntityId = 9001;
    pub const SUITE_REVIEW: EntityId = 9002;
    pub const FLAT_REVIEW: EntityId = 9003;
}

pub fn date(s: &str) -> NaiveDate {
    NaiveDate::parse_from_str(s, "%Y-%m-%d").unwrap()
}

/// Midnight timestamp for a day
pub fn at(s: &str) -> NaiveDateTime {
    date(s).and_hms_opt(0, 0, 0).unwrap()
}

pub fn dollars(amount: i64) -> Decimal {
    Decimal::new(amount * 100, 2)
}

pub fn scenario_marketplace() -> Snapshot {
    use ids::*;

    let mut s = Snapshot::new();

    s.insert(City::new(NYC, "NYC").located("NY", "USA")).unwrap();
    s.insert(City::new(SF, "San Francisco").located("CA", "USA")).unwrap();
    s.insert(City::new(CHICAGO, "Chicago").located("IL", "USA")).unwrap();

    s.insert(Neighborhood::new(FIDI, "Fi Di", NYC).with_zip_code("10004")).unwrap();
    s.insert(Neighborhood::new(BRIGHTON_BEACH, "Brighton Beach", NYC).with_zip_code("11235"))
        .unwrap();
    s.insert(Neighborhood::new(MISSION, "Mission", SF).with_zip_code("94103")).unwrap();
    s.insert(Neighborhood::new(LOOP, "Loop", CHICAGO).with_zip_code("60601")).unwrap();

    s.insert(User::new(AMANDA, "Amanda").with_email("amanda@example.com")).unwrap();
    s.insert(User::new(LOGAN, "Logan").with_email("logan@example.com")).unwrap();
    s.insert(User::new(SAM, "Sam")).unwrap();
    s.insert(User::new(RITA, "Rita")).unwrap();

    s.insert(Listing::new(FIDI_LOFT, "Fi Di Loft", dollars(100), FIDI, AMANDA)).unwrap();
    s.insert(Listing::new(BRIGHTON_ROOM, "Ocean Room", dollars(400), BRIGHTON_BEACH, AMANDA))
        .unwrap();
    s.insert(Listing::new(BRIGHTON_SUITE, "Boardwalk Suite", dollars(600), BRIGHTON_BEACH, AMANDA))
        .unwrap();
    s.insert(Listing::new(MISSION_FLAT, "Valencia Flat", dollars(150), MISSION, SAM)).unwrap();
    s.insert(Listing::new(LOOP_STUDIO, "Loop Studio", dollars(80), LOOP, SAM)).unwrap();

    s.insert(
        Reservation::new(LOFT_STAY, FIDI_LOFT, LOGAN, date("2024-03-01"), date("2024-03-03"))
            .with_created_at(at("2024-02-01")),
    )
    .unwrap();
    s.insert(
        Reservation::new(ROOM_STAY, BRIGHTON_ROOM, LOGAN, date("2024-04-10"), date("2024-04-13"))
            .with_created_at(at("2024-02-05")),
    )
    .unwrap();
    s.insert(
        Reservation::new(SUITE_STAY, BRIGHTON_SUITE, RITA, date("2024-04-10"), date("2024-04-12"))
            .with_created_at(at("2024-02-10")),
    )
    .unwrap();
    s.insert(
        Reservation::new(FLAT_STAY, MISSION_FLAT, LOGAN, date("2024-05-01"), date("2024-05-04"))
            .with_created_at(at("2024-02-15")),
    )
    .unwrap();

    s.insert(
        Review::new(LOFT_REVIEW, LOFT_STAY, LOGAN, 5, "This place was great!")
            .with_created_at(at("2024-03-04")),
    )
    .unwrap();
    s.insert(
        Review::new(ROOM_REVIEW, ROOM_STAY, LOGAN, 4, "Pretty good stay")
            .with_created_at(at("2024-04-14")),
    )
    .unwrap();
    s.insert(
        Review::new(SUITE_REVIEW, SUITE_STAY, RITA, 5, "Loved the view")
            .with_detail_ratings(5, 4)
            .with_created_at(at("2024-04-13")),
    )
    .unwrap();
    s.insert(
        Review::new(FLAT_REVIEW, FLAT_STAY, LOGAN, 4, "Nice and sunny")
            .with_created_at(at("2024-05-05")),
    )
    .unwrap();

    s
}
