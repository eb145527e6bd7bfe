// 🌱 Demo marketplace - four cities, six users, nine stays
//
// Stay dates are offsets from a reference day so the demo always has past,
// current-ish and upcoming reservations. Creation timestamps follow insertion
// order, which keeps "most recent" rankings stable across runs.

use chrono::{Duration, NaiveDate, NaiveDateTime, NaiveTime};
use rusqlite::Connection;
use rust_decimal::Decimal;
use tracing::info;

use crate::db::{insert_snapshot, setup_database};
use crate::entities::{City, EntityId, Listing, Neighborhood, Reservation, Review, User};
use crate::error::Result;
use crate::snapshot::Snapshot;

const CITIES: [(EntityId, &str, &str); 4] = [
    (1, "New York City", "NY"),
    (2, "San Francisco", "CA"),
    (3, "Los Angeles", "CA"),
    (4, "Chicago", "IL"),
];

const NEIGHBORHOODS: [(EntityId, &str, EntityId); 9] = [
    (1, "Manhattan", 1),
    (2, "Brooklyn", 1),
    (3, "Queens", 1),
    (4, "Mission", 2),
    (5, "SOMA", 2),
    (6, "Castro", 2),
    (7, "Hollywood", 3),
    (8, "Venice", 3),
    (9, "The Loop", 4),
];

const USERS: [(EntityId, &str); 6] = [
    (1, "Alice Johnson"),
    (2, "Bob Smith"),
    (3, "Charlie Brown"),
    (4, "Diana Prince"),
    (5, "Emma Watson"),
    (6, "Frank Castle"),
];

struct ListingRow {
    id: EntityId,
    title: &'static str,
    description: &'static str,
    address: &'static str,
    listing_type: &'static str,
    cents: i64,
    neighborhood_id: EntityId,
    host_id: EntityId,
}

const LISTINGS: [ListingRow; 8] = [
    ListingRow {
        id: 1,
        title: "Cozy Studio in Manhattan",
        description: "Perfect for business travelers. Walking distance to subway.",
        address: "123 Broadway",
        listing_type: "entire apartment",
        cents: 18000,
        neighborhood_id: 1,
        host_id: 1,
    },
    ListingRow {
        id: 2,
        title: "Brooklyn Loft with Amazing Views",
        description: "Industrial chic loft in trendy neighborhood.",
        address: "456 Smith Street",
        listing_type: "entire apartment",
        cents: 22000,
        neighborhood_id: 2,
        host_id: 1,
    },
    ListingRow {
        id: 3,
        title: "Queens Budget Room",
        description: "Great value for money. Close to airport.",
        address: "789 Northern Blvd",
        listing_type: "private room",
        cents: 8500,
        neighborhood_id: 3,
        host_id: 1,
    },
    ListingRow {
        id: 4,
        title: "Mission District Apartment",
        description: "Hip neighborhood with great food scene.",
        address: "321 Valencia Street",
        listing_type: "entire apartment",
        cents: 25000,
        neighborhood_id: 4,
        host_id: 2,
    },
    ListingRow {
        id: 5,
        title: "SOMA High-Rise",
        description: "Modern apartment in tech district.",
        address: "555 Market Street",
        listing_type: "private room",
        cents: 16000,
        neighborhood_id: 5,
        host_id: 2,
    },
    ListingRow {
        id: 6,
        title: "Hollywood Glamour Suite",
        description: "Experience old Hollywood charm.",
        address: "777 Sunset Boulevard",
        listing_type: "entire apartment",
        cents: 30000,
        neighborhood_id: 7,
        host_id: 4,
    },
    ListingRow {
        id: 7,
        title: "Venice Beach House",
        description: "Steps from the beach and boardwalk.",
        address: "888 Ocean Front Walk",
        listing_type: "entire house",
        cents: 40000,
        neighborhood_id: 8,
        host_id: 4,
    },
    ListingRow {
        id: 8,
        title: "Downtown Chicago Studio",
        description: "Modern studio in the heart of the city.",
        address: "999 State Street",
        listing_type: "entire apartment",
        cents: 14000,
        neighborhood_id: 9,
        host_id: 5,
    },
];

/// (id, listing, guest, checkin offset, checkout offset) in days from today
const RESERVATIONS: [(EntityId, EntityId, EntityId, i64, i64); 9] = [
    (1, 1, 3, -30, -27),
    (2, 4, 3, -15, -12),
    (3, 6, 3, 10, 14),
    (4, 2, 4, -20, -18),
    (5, 8, 4, 5, 8),
    (6, 5, 5, -45, -42),
    (7, 7, 5, -10, -7),
    (8, 3, 6, -60, -58),
    (9, 1, 6, 20, 23),
];

/// (id, reservation, guest, rating, text)
const REVIEWS: [(EntityId, EntityId, EntityId, u8, &str); 6] = [
    (1, 1, 3, 5, "Amazing location! Alice was a wonderful host."),
    (2, 2, 3, 4, "Great apartment, but a bit noisy at night."),
    (3, 4, 4, 5, "Beautiful loft with incredible views!"),
    (4, 6, 5, 4, "Good value for the price. Clean and comfortable."),
    (5, 7, 5, 5, "Perfect beach getaway! Would definitely stay again."),
    (6, 8, 6, 3, "Basic room but served its purpose. Close to airport was convenient."),
];

fn stamp(today: NaiveDate, sequence: i64) -> NaiveDateTime {
    today.and_time(NaiveTime::MIN) + Duration::seconds(sequence)
}

/// The demo marketplace relative to `today`
pub fn demo_snapshot(today: NaiveDate) -> Result<Snapshot> {
    let mut snapshot = Snapshot::new();

    for (id, name, state) in CITIES {
        snapshot.insert(City::new(id, name).located(state, "USA"))?;
    }
    for (id, name, city_id) in NEIGHBORHOODS {
        snapshot.insert(Neighborhood::new(id, name, city_id))?;
    }
    for (id, name) in USERS {
        snapshot.insert(User::new(id, name))?;
    }
    for row in &LISTINGS {
        snapshot.insert(
            Listing::new(
                row.id,
                row.title,
                Decimal::new(row.cents, 2),
                row.neighborhood_id,
                row.host_id,
            )
            .with_details(row.description, row.address, row.listing_type),
        )?;
    }
    for (id, listing_id, guest_id, checkin, checkout) in RESERVATIONS {
        snapshot.insert(
            Reservation::new(
                id,
                listing_id,
                guest_id,
                today + Duration::days(checkin),
                today + Duration::days(checkout),
            )
            .with_created_at(stamp(today, id)),
        )?;
    }
    for (id, reservation_id, guest_id, rating, text) in REVIEWS {
        snapshot.insert(
            Review::new(id, reservation_id, guest_id, rating, text)
                .with_created_at(stamp(today, 100 + id)),
        )?;
    }

    Ok(snapshot)
}

/// Create the schema and write the demo marketplace; returns rows written
pub fn seed_database(conn: &mut Connection, today: NaiveDate) -> Result<usize> {
    setup_database(conn)?;
    let snapshot = demo_snapshot(today)?;
    let written = insert_snapshot(conn, &snapshot)?;
    info!(rows = written, %today, "demo marketplace seeded");
    Ok(written)
}
