// 📋 Analytics Report - every marketplace-wide aggregation in one value
//
// Built once from an Analytics engine and handed to the CLI (pretty print or
// JSON) and to the API server.

use std::collections::BTreeMap;

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use tracing::info;

use crate::analytics::Analytics;
use crate::entities::{City, EntityId, Listing, Neighborhood, Reservation, Review, User};
use crate::error::Result;

// ============================================================================
// REPORT TYPES
// ============================================================================

/// An entity reduced to its id and display name
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Named {
    pub id: EntityId,
    pub name: String,
}

impl Named {
    fn new(id: EntityId, name: &str) -> Self {
        Named {
            id,
            name: name.to_string(),
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct TableCounts {
    pub cities: usize,
    pub neighborhoods: usize,
    pub users: usize,
    pub listings: usize,
    pub reservations: usize,
    pub reviews: usize,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EarnerLine {
    pub listing_id: EntityId,
    pub title: String,
    pub earnings: Decimal,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AnalyticsReport {
    pub counts: TableCounts,

    pub city_most_reservations: Option<Named>,
    pub city_biggest_host: Option<Named>,
    pub city_highest_rated: Option<Named>,
    pub city_most_listings: Option<Named>,

    pub neighborhood_highest_earner: Option<Named>,
    pub neighborhood_most_expensive: Option<Named>,

    pub top_host: Option<Named>,
    pub most_traveled: Option<Named>,
    pub most_expensive_listing: Option<Named>,

    pub top_earners: Vec<EarnerLine>,
    pub rating_histogram: BTreeMap<u8, usize>,
    pub average_rating: f64,

    pub most_recent_reservations: Vec<EntityId>,
    pub most_recent_reviews: Vec<EntityId>,
}

fn city(c: Option<&City>) -> Option<Named> {
    c.map(|c| Named::new(c.id, &c.name))
}

fn neighborhood(n: Option<&Neighborhood>) -> Option<Named> {
    n.map(|n| Named::new(n.id, &n.name))
}

fn user(u: Option<&User>) -> Option<Named> {
    u.map(|u| Named::new(u.id, &u.name))
}

// ============================================================================
// BUILD
// ============================================================================

impl AnalyticsReport {
    pub fn build(analytics: &Analytics<'_>) -> Result<Self> {
        let snapshot = analytics.snapshot();

        let counts = TableCounts {
            cities: snapshot.count::<City>(),
            neighborhoods: snapshot.count::<Neighborhood>(),
            users: snapshot.count::<User>(),
            listings: snapshot.count::<Listing>(),
            reservations: snapshot.count::<Reservation>(),
            reviews: snapshot.count::<Review>(),
        };

        let top_earners = analytics
            .top_earners_with_totals()?
            .into_iter()
            .map(|(listing, earnings)| EarnerLine {
                listing_id: listing.id,
                title: listing.title.clone(),
                earnings,
            })
            .collect();

        let report = AnalyticsReport {
            counts,
            city_most_reservations: city(analytics.city_most_reservations()?),
            city_biggest_host: city(analytics.city_biggest_host()?),
            city_highest_rated: city(analytics.city_highest_rated()?),
            city_most_listings: city(analytics.city_most_listings()?),
            neighborhood_highest_earner: neighborhood(analytics.neighborhood_highest_earner()?),
            neighborhood_most_expensive: neighborhood(analytics.neighborhood_most_expensive()?),
            top_host: user(analytics.top_host()?),
            most_traveled: user(analytics.most_traveled()?),
            most_expensive_listing: analytics
                .most_expensive_listing()
                .map(|l| Named::new(l.id, &l.title)),
            top_earners,
            rating_histogram: analytics.detailed_ratings()?,
            average_rating: analytics.average_rating(),
            most_recent_reservations: analytics
                .most_recent_reservations()?
                .iter()
                .map(|r| r.id)
                .collect(),
            most_recent_reviews: analytics
                .most_recent_reviews()?
                .iter()
                .map(|r| r.id)
                .collect(),
        };

        info!(
            listings = report.counts.listings,
            reservations = report.counts.reservations,
            "analytics report built"
        );
        Ok(report)
    }

    pub fn to_json(&self) -> serde_json::Result<String> {
        serde_json::to_string_pretty(self)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::snapshot::Snapshot;
    use crate::testing::{dollars, ids, scenario_marketplace};

    #[test]
    fn test_report_over_scenario() {
        let snapshot = scenario_marketplace();
        let analytics = Analytics::new(&snapshot).unwrap();
        let report = AnalyticsReport::build(&analytics).unwrap();

        assert_eq!(report.counts.listings, 5);
        assert_eq!(report.counts.reviews, 4);
        assert_eq!(report.city_most_reservations.unwrap().name, "NYC");
        assert_eq!(report.neighborhood_highest_earner.unwrap().id, ids::BRIGHTON_BEACH);
        assert_eq!(report.top_host.unwrap().id, ids::AMANDA);
        assert_eq!(report.top_earners.len(), 3);
        assert_eq!(report.top_earners[0].earnings, dollars(1200));
        assert_eq!(report.average_rating, 4.5);
        assert_eq!(report.most_recent_reservations[0], ids::FLAT_STAY);
    }

    #[test]
    fn test_report_on_empty_marketplace() {
        let snapshot = Snapshot::new();
        let analytics = Analytics::new(&snapshot).unwrap();
        let report = AnalyticsReport::build(&analytics).unwrap();

        assert_eq!(report.counts, TableCounts::default());
        assert!(report.city_highest_rated.is_none());
        assert!(report.top_earners.is_empty());
        assert_eq!(report.average_rating, 0.0);
    }

    #[test]
    fn test_report_serializes_to_json() {
        let snapshot = scenario_marketplace();
        let analytics = Analytics::new(&snapshot).unwrap();
        let report = AnalyticsReport::build(&analytics).unwrap();

        let json = report.to_json().unwrap();
        let value: serde_json::Value = serde_json::from_str(&json).unwrap();
        assert_eq!(value["city_highest_rated"]["name"], "NYC");
        assert_eq!(value["rating_histogram"]["5"], 2);
    }
}
