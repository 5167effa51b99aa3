use crate::infra::{
    rank_position, resolve_options, AppState, RankPosition, RankedLocation, RankingFilter,
};
use axum::extract::{Path, Query};
use axum::http::{header, StatusCode};
use axum::response::IntoResponse;
use axum::routing::get;
use axum::{Extension, Json, Router};
use serde::{Deserialize, Serialize};
use serde_json::json;
use std::sync::Arc;
use trucker_advisor::error::AppError;
use trucker_advisor::optimizer::{optimize_location, rank_locations, OptimizationResult};
use trucker_advisor::reference::{Location, LocationId, SnapshotInfo};

#[derive(Debug, Default, Deserialize)]
pub(crate) struct TrailerQuery {
    pub(crate) max: Option<u32>,
    pub(crate) balance: Option<i32>,
    pub(crate) diminishing: Option<i32>,
}

#[derive(Debug, Default, Deserialize)]
pub(crate) struct RankingQuery {
    pub(crate) max: Option<u32>,
    pub(crate) balance: Option<i32>,
    pub(crate) diminishing: Option<i32>,
    /// Comma separated country names.
    pub(crate) country: Option<String>,
    pub(crate) search: Option<String>,
    pub(crate) limit: Option<usize>,
}

impl RankingQuery {
    fn filter(&self) -> RankingFilter {
        RankingFilter {
            countries: self
                .country
                .as_deref()
                .map(|raw| {
                    raw.split(',')
                        .map(str::trim)
                        .filter(|name| !name.is_empty())
                        .map(str::to_string)
                        .collect()
                })
                .unwrap_or_default(),
            search: self.search.clone(),
            limit: self.limit,
        }
    }
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct CityTrailersResponse {
    pub(crate) city: Location,
    /// Position among ranked locations; `null` for locations without jobs.
    pub(crate) rank: Option<RankPosition>,
    pub(crate) trailer_types: usize,
    #[serde(flatten)]
    pub(crate) result: OptimizationResult,
}

pub(crate) fn router() -> Router {
    Router::new()
        .route("/health", get(healthcheck))
        .route("/ready", get(readiness_endpoint))
        .route("/metrics", get(metrics_endpoint))
        .route("/api/dataset", get(dataset_endpoint))
        .route("/api/cities", get(cities_endpoint))
        .route("/api/cities/:id/trailers", get(city_trailers_endpoint))
        .route("/api/rankings", get(rankings_endpoint))
}

pub(crate) async fn healthcheck() -> Json<serde_json::Value> {
    Json(json!({ "status": "ok" }))
}

pub(crate) async fn readiness_endpoint(Extension(state): Extension<AppState>) -> impl IntoResponse {
    let ready = state.readiness.load(std::sync::atomic::Ordering::Relaxed);
    let status = if ready {
        StatusCode::OK
    } else {
        StatusCode::SERVICE_UNAVAILABLE
    };

    let payload = if ready {
        json!({ "status": "ready" })
    } else {
        json!({ "status": "initializing" })
    };

    (status, Json(payload))
}

pub(crate) async fn metrics_endpoint(Extension(state): Extension<AppState>) -> impl IntoResponse {
    (
        StatusCode::OK,
        [(header::CONTENT_TYPE, "text/plain; version=0.0.4")],
        state.metrics.render(),
    )
}

pub(crate) async fn dataset_endpoint(Extension(state): Extension<AppState>) -> Json<SnapshotInfo> {
    Json(state.snapshot.as_ref().clone())
}

pub(crate) async fn cities_endpoint(Extension(state): Extension<AppState>) -> Json<Vec<Location>> {
    let mut cities = state.index.locations().to_vec();
    cities.sort_by(|a, b| a.name.cmp(&b.name));
    Json(cities)
}

pub(crate) async fn city_trailers_endpoint(
    Extension(state): Extension<AppState>,
    Path(id): Path<u32>,
    Query(query): Query<TrailerQuery>,
) -> Result<Json<CityTrailersResponse>, AppError> {
    let id = LocationId(id);
    let city = state
        .index
        .location(id)
        .cloned()
        .ok_or(AppError::LocationNotFound(id))?;
    let options = resolve_options(state.defaults, query.max, query.balance, query.diminishing)?;

    let index = Arc::clone(&state.index);
    let (result, rank) = tokio::task::spawn_blocking(move || {
        (
            optimize_location(&index, id, &options),
            rank_position(&index, id, &options),
        )
    })
    .await
    .map_err(|err| AppError::Server(axum::Error::new(err)))?;

    Ok(Json(CityTrailersResponse {
        city,
        rank,
        trailer_types: result.trailer_types(),
        result,
    }))
}

pub(crate) async fn rankings_endpoint(
    Extension(state): Extension<AppState>,
    Query(query): Query<RankingQuery>,
) -> Result<Json<Vec<RankedLocation>>, AppError> {
    let options = resolve_options(state.defaults, query.max, query.balance, query.diminishing)?;

    let index = Arc::clone(&state.index);
    let rankings = tokio::task::spawn_blocking(move || rank_locations(&index, &options))
        .await
        .map_err(|err| AppError::Server(axum::Error::new(err)))?;

    Ok(Json(query.filter().apply(rankings)))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::infra::load_snapshot;
    use axum::body::{to_bytes, Body};
    use axum::http::Request;
    use metrics_exporter_prometheus::PrometheusBuilder;
    use serde_json::Value;
    use std::path::Path as FsPath;
    use std::sync::atomic::AtomicBool;
    use tower::ServiceExt;
    use trucker_advisor::optimizer::OptimizationOptions;

    const EUROPE: &str = concat!(
        env!("CARGO_MANIFEST_DIR"),
        "/../../crates/trucker-advisor/tests/fixtures/europe"
    );

    fn build_router(ready: bool) -> Router {
        let (index, snapshot) = load_snapshot(FsPath::new(EUROPE)).expect("fixture loads");
        let state = AppState {
            readiness: Arc::new(AtomicBool::new(ready)),
            metrics: Arc::new(PrometheusBuilder::new().build_recorder().handle()),
            index,
            snapshot: Arc::new(snapshot),
            defaults: OptimizationOptions::default(),
        };
        router().layer(Extension(state))
    }

    async fn get_json(router: Router, uri: &str) -> (StatusCode, Value) {
        let response = router
            .oneshot(
                Request::builder()
                    .method("GET")
                    .uri(uri)
                    .body(Body::empty())
                    .expect("request"),
            )
            .await
            .expect("router dispatch");

        let status = response.status();
        let body = to_bytes(response.into_body(), 1024 * 1024)
            .await
            .expect("body");
        let payload = serde_json::from_slice(&body).expect("json");
        (status, payload)
    }

    #[tokio::test]
    async fn health_and_readiness() {
        let (status, body) = get_json(build_router(true), "/health").await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["status"], "ok");

        let (status, body) = get_json(build_router(false), "/ready").await;
        assert_eq!(status, StatusCode::SERVICE_UNAVAILABLE);
        assert_eq!(body["status"], "initializing");

        let (status, _) = get_json(build_router(true), "/ready").await;
        assert_eq!(status, StatusCode::OK);
    }

    #[tokio::test]
    async fn cities_are_sorted_by_name() {
        let (status, body) = get_json(build_router(true), "/api/cities").await;
        assert_eq!(status, StatusCode::OK);

        let names: Vec<_> = body
            .as_array()
            .expect("array")
            .iter()
            .map(|city| city["name"].as_str().expect("name").to_string())
            .collect();
        assert_eq!(names, vec!["Aberdeen", "Berlin", "Empty City", "Paris"]);
    }

    #[tokio::test]
    async fn city_trailers_returns_recommendations() {
        let (status, body) =
            get_json(build_router(true), "/api/cities/1/trailers?max=20&diminishing=50").await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["city"]["name"], "Berlin");
        assert_eq!(body["locationId"], 1);
        assert_eq!(body["totalCargoInstances"], 13);
        assert_eq!(body["options"]["maxTrailers"], 20);
        assert_eq!(body["rank"], json!({ "rank": 1, "total": 2 }));
        assert_eq!(body["trailerTypes"], 3);

        let counts: Vec<_> = body["recommendations"]
            .as_array()
            .expect("recommendations")
            .iter()
            .map(|rec| rec["count"].as_u64().expect("count"))
            .collect();
        assert_eq!(counts, vec![9, 8, 3]);
    }

    #[tokio::test]
    async fn city_trailers_rejects_unknown_city_and_empty_garage() {
        let (status, body) = get_json(build_router(true), "/api/cities/999/trailers").await;
        assert_eq!(status, StatusCode::NOT_FOUND);
        assert!(body["error"].as_str().expect("message").contains("999"));

        let (status, _) = get_json(build_router(true), "/api/cities/1/trailers?max=0").await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn empty_city_yields_zero_result() {
        let (status, body) = get_json(build_router(true), "/api/cities/3/trailers").await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["totalDepots"], 0);
        assert_eq!(body["recommendations"], json!([]));
        assert_eq!(body["rank"], Value::Null);
        assert_eq!(body["trailerTypes"], 0);
    }

    #[tokio::test]
    async fn rankings_filter_after_ranking() {
        let (status, body) = get_json(build_router(true), "/api/rankings").await;
        assert_eq!(status, StatusCode::OK);
        let entries = body.as_array().expect("array");
        assert_eq!(entries.len(), 2);
        assert_eq!(entries[0]["name"], "Berlin");
        assert_eq!(entries[0]["rank"], 1);
        assert_eq!(entries[0]["score"], 23.1);
        assert_eq!(entries[0]["avgValuePerJob"], 3.16);

        let (_, body) = get_json(build_router(true), "/api/rankings?country=France").await;
        let entries = body.as_array().expect("array");
        assert_eq!(entries.len(), 1);
        assert_eq!(entries[0]["name"], "Paris");
        assert_eq!(entries[0]["rank"], 2);

        let (_, body) = get_json(build_router(true), "/api/rankings?search=ber&limit=5").await;
        assert_eq!(body.as_array().expect("array").len(), 1);
    }

    #[tokio::test]
    async fn dataset_reports_snapshot_counts() {
        let (status, body) = get_json(build_router(true), "/api/dataset").await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["locations"], 4);
        assert_eq!(body["trailers"], 4);
    }
}
