// 🗄️ SQLite Entity Store
//
// Schema, inserts and snapshot loading for the six marketplace tables.
// Dates are stored as ISO-8601 TEXT, prices as decimal TEXT so no value ever
// passes through a float on its way in or out.

use std::path::Path;
use std::str::FromStr;

use chrono::{NaiveDate, NaiveDateTime};
use rusqlite::{params, Connection};
use rust_decimal::Decimal;
use tracing::{debug, info};

use crate::entities::{
    City, EntityId, Listing, Neighborhood, Reservation, ReservationStatus, Review, User,
};
use crate::error::{AnalyticsError, Result};
use crate::snapshot::{EntityStore, Snapshot};

const DATE_FORMAT: &str = "%Y-%m-%d";
const TIMESTAMP_FORMAT: &str = "%Y-%m-%d %H:%M:%S%.f";

// ============================================================================
// SCHEMA
// ============================================================================

pub fn setup_database(conn: &Connection) -> Result<()> {
    // Enable WAL mode for crash recovery (a no-op for in-memory databases)
    conn.pragma_update(None, "journal_mode", "WAL")?;
    conn.pragma_update(None, "foreign_keys", "ON")?;

    conn.execute_batch(
        "CREATE TABLE IF NOT EXISTS cities (
            id INTEGER PRIMARY KEY,
            name TEXT NOT NULL,
            state TEXT,
            country TEXT,
            created_at TEXT NOT NULL
        );

        CREATE TABLE IF NOT EXISTS neighborhoods (
            id INTEGER PRIMARY KEY,
            name TEXT NOT NULL,
            zip_code TEXT,
            city_id INTEGER NOT NULL REFERENCES cities(id) ON DELETE CASCADE,
            created_at TEXT NOT NULL
        );

        CREATE TABLE IF NOT EXISTS users (
            id INTEGER PRIMARY KEY,
            name TEXT NOT NULL,
            email TEXT,
            created_at TEXT NOT NULL
        );

        CREATE TABLE IF NOT EXISTS listings (
            id INTEGER PRIMARY KEY,
            title TEXT NOT NULL,
            description TEXT NOT NULL DEFAULT '',
            address TEXT NOT NULL DEFAULT '',
            listing_type TEXT NOT NULL DEFAULT '',
            price TEXT NOT NULL,
            max_guests INTEGER NOT NULL DEFAULT 1,
            neighborhood_id INTEGER NOT NULL REFERENCES neighborhoods(id) ON DELETE CASCADE,
            host_id INTEGER NOT NULL REFERENCES users(id),
            active INTEGER NOT NULL DEFAULT 1,
            created_at TEXT NOT NULL
        );

        CREATE TABLE IF NOT EXISTS reservations (
            id INTEGER PRIMARY KEY,
            checkin TEXT NOT NULL,
            checkout TEXT NOT NULL,
            guest_count INTEGER NOT NULL DEFAULT 1,
            status TEXT NOT NULL DEFAULT 'confirmed',
            listing_id INTEGER NOT NULL REFERENCES listings(id) ON DELETE CASCADE,
            guest_id INTEGER NOT NULL REFERENCES users(id),
            created_at TEXT NOT NULL
        );

        CREATE TABLE IF NOT EXISTS reviews (
            id INTEGER PRIMARY KEY,
            description TEXT NOT NULL DEFAULT '',
            rating INTEGER NOT NULL,
            cleanliness_rating INTEGER,
            communication_rating INTEGER,
            guest_id INTEGER NOT NULL REFERENCES users(id),
            reservation_id INTEGER NOT NULL REFERENCES reservations(id) ON DELETE CASCADE,
            created_at TEXT NOT NULL
        );

        CREATE INDEX IF NOT EXISTS idx_neighborhoods_city ON neighborhoods(city_id);
        CREATE INDEX IF NOT EXISTS idx_listings_neighborhood ON listings(neighborhood_id);
        CREATE INDEX IF NOT EXISTS idx_listings_host ON listings(host_id);
        CREATE INDEX IF NOT EXISTS idx_reservations_listing ON reservations(listing_id);
        CREATE INDEX IF NOT EXISTS idx_reservations_guest ON reservations(guest_id);
        CREATE INDEX IF NOT EXISTS idx_reviews_reservation ON reviews(reservation_id);",
    )?;

    Ok(())
}

// ============================================================================
// INSERTS
// ============================================================================

fn timestamp(value: &NaiveDateTime) -> String {
    value.format(TIMESTAMP_FORMAT).to_string()
}

fn day(value: &NaiveDate) -> String {
    value.format(DATE_FORMAT).to_string()
}

pub fn insert_city(conn: &Connection, city: &City) -> Result<()> {
    conn.execute(
        "INSERT INTO cities (id, name, state, country, created_at) VALUES (?1, ?2, ?3, ?4, ?5)",
        params![
            city.id,
            city.name,
            city.state,
            city.country,
            timestamp(&city.created_at)
        ],
    )?;
    Ok(())
}

pub fn insert_neighborhood(conn: &Connection, neighborhood: &Neighborhood) -> Result<()> {
    conn.execute(
        "INSERT INTO neighborhoods (id, name, zip_code, city_id, created_at)
         VALUES (?1, ?2, ?3, ?4, ?5)",
        params![
            neighborhood.id,
            neighborhood.name,
            neighborhood.zip_code,
            neighborhood.city_id,
            timestamp(&neighborhood.created_at)
        ],
    )?;
    Ok(())
}

pub fn insert_user(conn: &Connection, user: &User) -> Result<()> {
    conn.execute(
        "INSERT INTO users (id, name, email, created_at) VALUES (?1, ?2, ?3, ?4)",
        params![user.id, user.name, user.email, timestamp(&user.created_at)],
    )?;
    Ok(())
}

pub fn insert_listing(conn: &Connection, listing: &Listing) -> Result<()> {
    conn.execute(
        "INSERT INTO listings (
            id, title, description, address, listing_type, price,
            max_guests, neighborhood_id, host_id, active, created_at
        ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11)",
        params![
            listing.id,
            listing.title,
            listing.description,
            listing.address,
            listing.listing_type,
            listing.price.to_string(),
            listing.max_guests,
            listing.neighborhood_id,
            listing.host_id,
            listing.active,
            timestamp(&listing.created_at),
        ],
    )?;
    Ok(())
}

pub fn insert_reservation(conn: &Connection, reservation: &Reservation) -> Result<()> {
    conn.execute(
        "INSERT INTO reservations (
            id, checkin, checkout, guest_count, status, listing_id, guest_id, created_at
        ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8)",
        params![
            reservation.id,
            day(&reservation.checkin),
            day(&reservation.checkout),
            reservation.guest_count,
            reservation.status.as_str(),
            reservation.listing_id,
            reservation.guest_id,
            timestamp(&reservation.created_at),
        ],
    )?;
    Ok(())
}

pub fn insert_review(conn: &Connection, review: &Review) -> Result<()> {
    conn.execute(
        "INSERT INTO reviews (
            id, description, rating, cleanliness_rating, communication_rating,
            guest_id, reservation_id, created_at
        ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8)",
        params![
            review.id,
            review.description,
            review.rating,
            review.cleanliness_rating,
            review.communication_rating,
            review.guest_id,
            review.reservation_id,
            timestamp(&review.created_at),
        ],
    )?;
    Ok(())
}

/// Write every row of a snapshot, parents before children, in one transaction
pub fn insert_snapshot(conn: &mut Connection, snapshot: &Snapshot) -> Result<usize> {
    let tx = conn.transaction()?;
    let mut inserted = 0;

    for city in snapshot.fetch_all::<City>() {
        insert_city(&tx, city)?;
        inserted += 1;
    }
    for user in snapshot.fetch_all::<User>() {
        insert_user(&tx, user)?;
        inserted += 1;
    }
    for neighborhood in snapshot.fetch_all::<Neighborhood>() {
        insert_neighborhood(&tx, neighborhood)?;
        inserted += 1;
    }
    for listing in snapshot.fetch_all::<Listing>() {
        insert_listing(&tx, listing)?;
        inserted += 1;
    }
    for reservation in snapshot.fetch_all::<Reservation>() {
        insert_reservation(&tx, reservation)?;
        inserted += 1;
    }
    for review in snapshot.fetch_all::<Review>() {
        insert_review(&tx, review)?;
        inserted += 1;
    }

    tx.commit()?;
    info!(rows = inserted, "snapshot written to sqlite");
    Ok(inserted)
}

// ============================================================================
// DECODING
// ============================================================================

fn parse_date(column: &'static str, value: String) -> Result<NaiveDate> {
    NaiveDate::parse_from_str(&value, DATE_FORMAT).map_err(|e| AnalyticsError::Decode {
        column,
        reason: e.to_string(),
        value,
    })
}

fn parse_timestamp(column: &'static str, value: String) -> Result<NaiveDateTime> {
    NaiveDateTime::parse_from_str(&value, TIMESTAMP_FORMAT).map_err(|e| AnalyticsError::Decode {
        column,
        reason: e.to_string(),
        value,
    })
}

fn parse_decimal(column: &'static str, value: String) -> Result<Decimal> {
    Decimal::from_str(value.trim()).map_err(|e| AnalyticsError::Decode {
        column,
        reason: e.to_string(),
        value,
    })
}

fn parse_status(value: String) -> Result<ReservationStatus> {
    ReservationStatus::parse(&value).ok_or_else(|| AnalyticsError::Decode {
        column: "reservations.status",
        reason: "expected confirmed, completed or cancelled".to_string(),
        value,
    })
}

// ============================================================================
// SNAPSHOT LOADING
// ============================================================================

fn load_cities(conn: &Connection) -> Result<Vec<City>> {
    let mut stmt =
        conn.prepare("SELECT id, name, state, country, created_at FROM cities ORDER BY id")?;
    let rows = stmt
        .query_map([], |row| {
            Ok((
                row.get::<_, EntityId>(0)?,
                row.get::<_, String>(1)?,
                row.get::<_, Option<String>>(2)?,
                row.get::<_, Option<String>>(3)?,
                row.get::<_, String>(4)?,
            ))
        })?
        .collect::<std::result::Result<Vec<_>, _>>()?;

    rows.into_iter()
        .map(|(id, name, state, country, created_at)| {
            Ok(City {
                id,
                name,
                state,
                country,
                created_at: parse_timestamp("cities.created_at", created_at)?,
            })
        })
        .collect()
}

fn load_neighborhoods(conn: &Connection) -> Result<Vec<Neighborhood>> {
    let mut stmt = conn.prepare(
        "SELECT id, name, zip_code, city_id, created_at FROM neighborhoods ORDER BY id",
    )?;
    let rows = stmt
        .query_map([], |row| {
            Ok((
                row.get::<_, EntityId>(0)?,
                row.get::<_, String>(1)?,
                row.get::<_, Option<String>>(2)?,
                row.get::<_, EntityId>(3)?,
                row.get::<_, String>(4)?,
            ))
        })?
        .collect::<std::result::Result<Vec<_>, _>>()?;

    rows.into_iter()
        .map(|(id, name, zip_code, city_id, created_at)| {
            Ok(Neighborhood {
                id,
                name,
                zip_code,
                city_id,
                created_at: parse_timestamp("neighborhoods.created_at", created_at)?,
            })
        })
        .collect()
}

fn load_users(conn: &Connection) -> Result<Vec<User>> {
    let mut stmt = conn.prepare("SELECT id, name, email, created_at FROM users ORDER BY id")?;
    let rows = stmt
        .query_map([], |row| {
            Ok((
                row.get::<_, EntityId>(0)?,
                row.get::<_, String>(1)?,
                row.get::<_, Option<String>>(2)?,
                row.get::<_, String>(3)?,
            ))
        })?
        .collect::<std::result::Result<Vec<_>, _>>()?;

    rows.into_iter()
        .map(|(id, name, email, created_at)| {
            Ok(User {
                id,
                name,
                email,
                created_at: parse_timestamp("users.created_at", created_at)?,
            })
        })
        .collect()
}

fn load_listings(conn: &Connection) -> Result<Vec<Listing>> {
    let mut stmt = conn.prepare(
        "SELECT id, title, description, address, listing_type, price,
                max_guests, neighborhood_id, host_id, active, created_at
         FROM listings ORDER BY id",
    )?;

    struct Row {
        id: EntityId,
        title: String,
        description: String,
        address: String,
        listing_type: String,
        price: String,
        max_guests: u32,
        neighborhood_id: EntityId,
        host_id: EntityId,
        active: bool,
        created_at: String,
    }

    let rows = stmt
        .query_map([], |row| {
            Ok(Row {
                id: row.get(0)?,
                title: row.get(1)?,
                description: row.get(2)?,
                address: row.get(3)?,
                listing_type: row.get(4)?,
                price: row.get(5)?,
                max_guests: row.get(6)?,
                neighborhood_id: row.get(7)?,
                host_id: row.get(8)?,
                active: row.get(9)?,
                created_at: row.get(10)?,
            })
        })?
        .collect::<std::result::Result<Vec<_>, _>>()?;

    rows.into_iter()
        .map(|row| {
            Ok(Listing {
                id: row.id,
                title: row.title,
                description: row.description,
                address: row.address,
                listing_type: row.listing_type,
                price: parse_decimal("listings.price", row.price)?,
                max_guests: row.max_guests,
                neighborhood_id: row.neighborhood_id,
                host_id: row.host_id,
                active: row.active,
                created_at: parse_timestamp("listings.created_at", row.created_at)?,
            })
        })
        .collect()
}

fn load_reservations(conn: &Connection) -> Result<Vec<Reservation>> {
    let mut stmt = conn.prepare(
        "SELECT id, checkin, checkout, guest_count, status, listing_id, guest_id, created_at
         FROM reservations ORDER BY id",
    )?;
    let rows = stmt
        .query_map([], |row| {
            Ok((
                row.get::<_, EntityId>(0)?,
                row.get::<_, String>(1)?,
                row.get::<_, String>(2)?,
                row.get::<_, u32>(3)?,
                row.get::<_, String>(4)?,
                row.get::<_, EntityId>(5)?,
                row.get::<_, EntityId>(6)?,
                row.get::<_, String>(7)?,
            ))
        })?
        .collect::<std::result::Result<Vec<_>, _>>()?;

    rows.into_iter()
        .map(
            |(id, checkin, checkout, guest_count, status, listing_id, guest_id, created_at)| {
                Ok(Reservation {
                    id,
                    checkin: parse_date("reservations.checkin", checkin)?,
                    checkout: parse_date("reservations.checkout", checkout)?,
                    guest_count,
                    status: parse_status(status)?,
                    listing_id,
                    guest_id,
                    created_at: parse_timestamp("reservations.created_at", created_at)?,
                })
            },
        )
        .collect()
}

fn load_reviews(conn: &Connection) -> Result<Vec<Review>> {
    let mut stmt = conn.prepare(
        "SELECT id, description, rating, cleanliness_rating, communication_rating,
                guest_id, reservation_id, created_at
         FROM reviews ORDER BY id",
    )?;
    let rows = stmt
        .query_map([], |row| {
            Ok((
                row.get::<_, EntityId>(0)?,
                row.get::<_, String>(1)?,
                row.get::<_, u8>(2)?,
                row.get::<_, Option<u8>>(3)?,
                row.get::<_, Option<u8>>(4)?,
                row.get::<_, EntityId>(5)?,
                row.get::<_, EntityId>(6)?,
                row.get::<_, String>(7)?,
            ))
        })?
        .collect::<std::result::Result<Vec<_>, _>>()?;

    rows.into_iter()
        .map(
            |(
                id,
                description,
                rating,
                cleanliness_rating,
                communication_rating,
                guest_id,
                reservation_id,
                created_at,
            )| {
                Ok(Review {
                    id,
                    description,
                    rating,
                    cleanliness_rating,
                    communication_rating,
                    guest_id,
                    reservation_id,
                    created_at: parse_timestamp("reviews.created_at", created_at)?,
                })
            },
        )
        .collect()
}

/// Materialise every table into a Snapshot
pub fn load_snapshot(conn: &Connection) -> Result<Snapshot> {
    let mut snapshot = Snapshot::new();
    snapshot.extend(load_cities(conn)?)?;
    snapshot.extend(load_neighborhoods(conn)?)?;
    snapshot.extend(load_users(conn)?)?;
    snapshot.extend(load_listings(conn)?)?;
    snapshot.extend(load_reservations(conn)?)?;
    snapshot.extend(load_reviews(conn)?)?;

    debug!(
        listings = snapshot.count::<Listing>(),
        reservations = snapshot.count::<Reservation>(),
        "snapshot loaded from sqlite"
    );
    Ok(snapshot)
}

// ============================================================================
// SQLITE STORE
// ============================================================================

/// EntityStore backed by a SQLite database
pub struct SqliteStore {
    conn: Connection,
}

impl SqliteStore {
    /// Open (or create) a database file and make sure the schema exists
    pub fn open(path: &Path) -> Result<Self> {
        let conn = Connection::open(path)?;
        setup_database(&conn)?;
        info!(path = %path.display(), "sqlite store opened");
        Ok(SqliteStore { conn })
    }

    pub fn open_in_memory() -> Result<Self> {
        let conn = Connection::open_in_memory()?;
        setup_database(&conn)?;
        Ok(SqliteStore { conn })
    }

    pub fn connection(&self) -> &Connection {
        &self.conn
    }

    pub fn connection_mut(&mut self) -> &mut Connection {
        &mut self.conn
    }

    /// Number of rows in a table
    pub fn count(&self, table: &str) -> Result<i64> {
        let sql = match table {
            "cities" | "neighborhoods" | "users" | "listings" | "reservations" | "reviews" => {
                format!("SELECT COUNT(*) FROM {}", table)
            }
            other => {
                return Err(AnalyticsError::Decode {
                    column: "table",
                    value: other.to_string(),
                    reason: "unknown table".to_string(),
                })
            }
        };
        Ok(self.conn.query_row(&sql, [], |row| row.get(0))?)
    }
}

impl EntityStore for SqliteStore {
    fn load_snapshot(&self) -> Result<Snapshot> {
        load_snapshot(&self.conn)
    }
}
