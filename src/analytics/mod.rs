// 🧮 Analytics Engine - cross-entity queries over one snapshot
//
// One `Analytics` value wraps a validated Snapshot plus its Resolver. The
// operations live in per-concern files as separate `impl` blocks:
//
//   earnings.rs      reservation cost, listing / host / neighborhood totals
//   availability.rs  date and range conflict checks
//   city.rs          marketplace-wide city winners
//   neighborhood.rs  neighborhood winners and per-neighborhood stats
//   listing.rs       per-listing stats, listing rankings and filters
//   reservation.rs   reservation rankings and filters
//   review.rs        rating histogram, averages, filters
//   user.rs          host and guest derivations
//
// Everything is a pure read: calling any operation twice on the same
// snapshot yields the same result, and an Analytics value can be shared
// across threads.

mod availability;
mod city;
mod earnings;
mod listing;
mod neighborhood;
mod reservation;
mod review;
mod user;

use tracing::debug;

use crate::error::Result;
use crate::resolver::Resolver;
use crate::snapshot::{EntityStore, Snapshot};

pub const TOP_EARNERS_LIMIT: usize = 3;
pub const TOP_DESTINATIONS_LIMIT: usize = 3;
pub const RECENT_RESERVATIONS_LIMIT: usize = 5;
pub const RECENT_REVIEWS_LIMIT: usize = 10;

/// Minimum average rating for a listing to count as highly rated
pub const HIGHLY_RATED_THRESHOLD: u8 = 4;

#[derive(Debug, Clone, Copy)]
pub struct Analytics<'a> {
    snapshot: &'a Snapshot,
    resolver: Resolver<'a>,
}

impl<'a> Analytics<'a> {
    /// Validate the snapshot and build an engine over it.
    ///
    /// Malformed data (dangling keys, inverted stays, out-of-range ratings)
    /// is rejected here rather than producing wrong aggregates later.
    pub fn new(snapshot: &'a Snapshot) -> Result<Self> {
        snapshot.validate()?;
        debug!("analytics engine ready");
        Ok(Analytics {
            snapshot,
            resolver: Resolver::new(snapshot),
        })
    }

    pub fn snapshot(&self) -> &'a Snapshot {
        self.snapshot
    }

    pub fn resolver(&self) -> &Resolver<'a> {
        &self.resolver
    }
}

/// Load a snapshot from any store; pair with `Analytics::new`
pub fn load(store: &impl EntityStore) -> Result<Snapshot> {
    let snapshot = store.load_snapshot()?;
    debug!(empty = snapshot.is_empty(), "snapshot loaded");
    Ok(snapshot)
}
