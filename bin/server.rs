// Stay Analytics - Web Server
// JSON API over the analytics engine with Axum

use std::path::Path as FsPath;
use std::sync::{Arc, Mutex};

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    response::{IntoResponse, Json, Response},
    routing::get,
    Router,
};
use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;
use tracing::{error, info};

use stay_analytics::analytics::load as load_snapshot;
use stay_analytics::telemetry::init_tracing;
use stay_analytics::{
    Analytics, AnalyticsError, AnalyticsReport, AppConfig, EntityId, Listing,
    Snapshot, SqliteStore,
};

/// Shared application state
#[derive(Clone)]
struct AppState {
    store: Arc<Mutex<SqliteStore>>,
}

/// API Response wrapper
#[derive(Serialize)]
struct ApiResponse<T> {
    success: bool,
    data: Option<T>,
    #[serde(skip_serializing_if = "Option::is_none")]
    error: Option<String>,
}

impl<T> ApiResponse<T> {
    fn ok(data: T) -> Self {
        Self {
            success: true,
            data: Some(data),
            error: None,
        }
    }

    fn err(message: String) -> Self {
        Self {
            success: false,
            data: None,
            error: Some(message),
        }
    }
}

/// Engine failures mapped onto HTTP statuses
struct ApiError(StatusCode, String);

impl From<AnalyticsError> for ApiError {
    fn from(err: AnalyticsError) -> Self {
        let status = if err.is_not_found() {
            StatusCode::NOT_FOUND
        } else {
            StatusCode::INTERNAL_SERVER_ERROR
        };
        ApiError(status, err.to_string())
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        if self.0.is_server_error() {
            error!(status = %self.0, "{}", self.1);
        }
        (self.0, Json(ApiResponse::<()>::err(self.1))).into_response()
    }
}

type ApiResult<T> = Result<Json<ApiResponse<T>>, ApiError>;

#[derive(Deserialize)]
struct RangeQuery {
    from: NaiveDate,
    to: NaiveDate,
}

#[derive(Serialize)]
struct ListingSummary {
    id: EntityId,
    title: String,
    price: Decimal,
    neighborhood_id: EntityId,
}

impl From<&Listing> for ListingSummary {
    fn from(listing: &Listing) -> Self {
        Self {
            id: listing.id,
            title: listing.title.clone(),
            price: listing.price,
            neighborhood_id: listing.neighborhood_id,
        }
    }
}

#[derive(Serialize)]
struct EarningsResponse {
    listing_id: EntityId,
    title: String,
    bookings: usize,
    total_earnings: Decimal,
}

fn load(state: &AppState) -> Result<Snapshot, ApiError> {
    let store = state.store.lock().map_err(|_| {
        ApiError(
            StatusCode::INTERNAL_SERVER_ERROR,
            "store lock poisoned".to_string(),
        )
    })?;
    Ok(load_snapshot(&*store)?)
}

// ============================================================================
// API Handlers
// ============================================================================

/// GET /api/health - Health check
async fn health_check() -> impl IntoResponse {
    Json(ApiResponse::ok("OK"))
}

/// GET /api/report - Every marketplace-wide aggregation
async fn get_report(State(state): State<AppState>) -> ApiResult<AnalyticsReport> {
    let snapshot = load(&state)?;
    let analytics = Analytics::new(&snapshot)?;
    Ok(Json(ApiResponse::ok(AnalyticsReport::build(&analytics)?)))
}

/// GET /api/listings/available?from=&to= - Listings free in [from, to)
async fn get_available(
    State(state): State<AppState>,
    Query(range): Query<RangeQuery>,
) -> ApiResult<Vec<ListingSummary>> {
    let snapshot = load(&state)?;
    let analytics = Analytics::new(&snapshot)?;
    let listings = analytics
        .available_between(range.from, range.to)
        .into_iter()
        .map(ListingSummary::from)
        .collect();
    Ok(Json(ApiResponse::ok(listings)))
}

/// GET /api/listings/:id/earnings - Total earnings of one listing
async fn get_listing_earnings(
    State(state): State<AppState>,
    Path(listing_id): Path<EntityId>,
) -> ApiResult<EarningsResponse> {
    let snapshot = load(&state)?;
    let analytics = Analytics::new(&snapshot)?;
    let listing = snapshot.get::<Listing>(listing_id)?;

    Ok(Json(ApiResponse::ok(EarningsResponse {
        listing_id,
        title: listing.title.clone(),
        bookings: analytics.booking_count(listing_id)?,
        total_earnings: analytics.listing_total_earnings(listing_id)?,
    })))
}

// ============================================================================
// Main Server
// ============================================================================

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let config = AppConfig::from_env()?;
    init_tracing(&config.log_filter)?;

    println!("🌐 Stay Analytics - Web Server");
    println!("━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━");

    let store = if config.is_in_memory() {
        SqliteStore::open_in_memory()?
    } else {
        let db_path = FsPath::new(&config.database_path);
        if !db_path.exists() {
            eprintln!("❌ Database not found at {:?}", db_path);
            eprintln!("   Run: stay-analytics seed");
            eprintln!("   to write the demo marketplace first.");
            std::process::exit(1);
        }
        SqliteStore::open(db_path)?
    };
    println!("✓ Database opened: {}", config.database_path);

    // Create shared state
    let state = AppState {
        store: Arc::new(Mutex::new(store)),
    };

    // Build API routes
    let api_routes = Router::new()
        .route("/health", get(health_check))
        .route("/report", get(get_report))
        .route("/listings/available", get(get_available))
        .route("/listings/:id/earnings", get(get_listing_earnings))
        .with_state(state);

    let app = Router::new()
        .nest("/api", api_routes)
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive());

    let listener = tokio::net::TcpListener::bind(&config.server_addr).await?;
    info!(addr = %config.server_addr, "listening");

    println!("\n🚀 Server running on http://{}", config.server_addr);
    println!("   API: http://{}/api/report", config.server_addr);
    println!("\n   Press Ctrl+C to stop\n");

    axum::serve(listener, app).await?;
    Ok(())
}
