//! HTTP API over the boundary checker.
//!
//! Complaint intake calls `/v1/boundary/check` before accepting a location;
//! the map client fetches the boundary itself from `/v1/boundary`.

use std::path::PathBuf;
use std::sync::Arc;

use anyhow::Result;
use axum::{
    extract::{Query, State},
    http::{header, StatusCode},
    response::Json,
    routing::get,
    Router,
};
use clap::Parser;
use serde::{Deserialize, Serialize};
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;
use tracing::{info, Level};

use jurisdiction::boundary::{
    BoundaryChecker, BoundarySource, Containment, CoordinateRepairer, RepairStrategy,
};
use jurisdiction::{telemetry, BoundingBox, Config};

#[derive(Parser, Debug)]
#[command(name = "serve")]
#[command(about = "Boundary validation server")]
struct Args {
    /// TOML config file
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Listen address (overrides the config file)
    #[arg(short, long)]
    listen: Option<String>,

    /// Boundary GeoJSON (overrides the config file)
    #[arg(long)]
    boundary: Option<PathBuf>,
}

/// Application state shared across handlers
struct AppState {
    repairer: CoordinateRepairer,
}

impl AppState {
    fn new(source: Arc<BoundarySource>, config: &Config) -> Self {
        let checker = BoundaryChecker::new(source, config.boundary.fallback());
        Self {
            repairer: CoordinateRepairer::new(checker),
        }
    }

    fn checker(&self) -> &BoundaryChecker {
        self.repairer.checker()
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    telemetry::init(Level::INFO)?;

    let args = Args::parse();
    let mut config = Config::load_or_default(args.config.as_deref())?;
    if let Some(path) = args.boundary {
        config.boundary.path = path;
    }
    if let Some(listen) = args.listen {
        config.server.listen = listen;
    }

    info!("Jurisdiction Boundary Server");

    // Load eagerly so a missing file is reported at startup
    let source = Arc::new(BoundarySource::from_path(&config.boundary.path));
    info!("Boundary: {}", source.load().kind());

    let state = Arc::new(AppState::new(source, &config));
    let app = router(state);

    info!("Starting server on {}", config.server.listen);

    let listener = tokio::net::TcpListener::bind(&config.server.listen).await?;
    axum::serve(listener, app).await?;

    Ok(())
}

fn router(state: Arc<AppState>) -> Router {
    Router::new()
        .route("/health", get(health_handler))
        .route("/v1/boundary", get(boundary_handler))
        .route("/v1/boundary/bounds", get(bounds_handler))
        .route("/v1/boundary/check", get(check_handler))
        .route("/v1/boundary/repair", get(repair_handler))
        .layer(CorsLayer::permissive())
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

#[derive(Serialize)]
struct HealthResponse {
    status: &'static str,
    boundary: &'static str,
}

/// Health check endpoint
async fn health_handler(State(state): State<Arc<AppState>>) -> Json<HealthResponse> {
    let boundary = state.checker().source().load().kind();
    Json(HealthResponse {
        status: if boundary == "absent" { "degraded" } else { "ok" },
        boundary,
    })
}

#[derive(Debug, Serialize)]
struct ErrorResponse {
    error: &'static str,
}

/// Raw boundary GeoJSON for map clients
async fn boundary_handler(
    State(state): State<Arc<AppState>>,
) -> Result<([(header::HeaderName, &'static str); 1], String), (StatusCode, Json<ErrorResponse>)> {
    match state.checker().source().raw() {
        Some(raw) => Ok(([(header::CONTENT_TYPE, "application/json")], raw.to_string())),
        None => Err((
            StatusCode::INTERNAL_SERVER_ERROR,
            Json(ErrorResponse {
                error: "Failed to load boundary data",
            }),
        )),
    }
}

async fn bounds_handler(
    State(state): State<Arc<AppState>>,
) -> Result<Json<BoundingBox>, StatusCode> {
    state
        .checker()
        .source()
        .bounding_box()
        .map(Json)
        .ok_or(StatusCode::NOT_FOUND)
}

#[derive(Deserialize)]
struct PointParams {
    lat: f64,
    lng: f64,
}

#[derive(Serialize)]
struct CheckResponse {
    inside: bool,
    reason: Containment,
}

async fn check_handler(
    State(state): State<Arc<AppState>>,
    Query(params): Query<PointParams>,
) -> Json<CheckResponse> {
    let reason = state.checker().classify(params.lat, params.lng);
    Json(CheckResponse {
        inside: reason.is_inside(),
        reason,
    })
}

#[derive(Serialize)]
struct RepairResponse {
    latitude: f64,
    longitude: f64,
    strategy: RepairStrategy,
    inside: bool,
}

async fn repair_handler(
    State(state): State<Arc<AppState>>,
    Query(params): Query<PointParams>,
) -> Json<RepairResponse> {
    let repair = state.repairer.repair_with_strategy(params.lat, params.lng);
    Json(RepairResponse {
        latitude: repair.coordinate.latitude,
        longitude: repair.coordinate.longitude,
        strategy: repair.strategy,
        inside: state.checker().contains(repair.coordinate),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use jurisdiction::Boundary;

    const SQUARE: &str = r#"{"type": "Feature", "geometry": {"type": "Polygon", "coordinates": [[[0, 0], [0, 10], [10, 10], [10, 0]]]}}"#;

    fn state(source: BoundarySource) -> Arc<AppState> {
        Arc::new(AppState::new(Arc::new(source), &Config::default()))
    }

    #[tokio::test]
    async fn test_health_reports_boundary_kind() {
        let Json(health) = health_handler(State(state(BoundarySource::from_geojson_str(SQUARE)))).await;
        assert_eq!(health.status, "ok");
        assert_eq!(health.boundary, "polygon");

        let Json(health) = health_handler(State(state(BoundarySource::from_boundary(Boundary::Absent)))).await;
        assert_eq!(health.status, "degraded");
    }

    #[tokio::test]
    async fn test_boundary_served_verbatim() {
        let (_, body) = boundary_handler(State(state(BoundarySource::from_geojson_str(SQUARE))))
            .await
            .unwrap();
        assert_eq!(body, SQUARE);

        let err = boundary_handler(State(state(BoundarySource::from_boundary(Boundary::Absent))))
            .await
            .unwrap_err();
        assert_eq!(err.0, StatusCode::INTERNAL_SERVER_ERROR);
    }

    #[tokio::test]
    async fn test_bounds() {
        let Json(bbox) = bounds_handler(State(state(BoundarySource::from_geojson_str(SQUARE))))
            .await
            .unwrap();
        assert_eq!(bbox, BoundingBox::new(0.0, 10.0, 0.0, 10.0));

        let status = bounds_handler(State(state(BoundarySource::from_boundary(Boundary::Absent))))
            .await
            .unwrap_err();
        assert_eq!(status, StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn test_check_and_repair() {
        let state = state(BoundarySource::from_geojson_str(SQUARE));

        let Json(check) = check_handler(
            State(Arc::clone(&state)),
            Query(PointParams { lat: 5.0, lng: 5.0 }),
        )
        .await;
        assert!(check.inside);
        assert_eq!(check.reason, Containment::Polygon);

        let Json(check) = check_handler(
            State(Arc::clone(&state)),
            Query(PointParams { lat: 91.0, lng: 5.0 }),
        )
        .await;
        assert!(!check.inside);
        assert_eq!(check.reason, Containment::InvalidInput);

        let Json(repair) = repair_handler(
            State(state),
            Query(PointParams {
                lat: 50.0,
                lng: 50.0,
            }),
        )
        .await;
        assert_eq!((repair.latitude, repair.longitude), (10.0, 10.0));
        assert_eq!(repair.strategy, RepairStrategy::Clamped);
        assert!(repair.inside);
    }
}
