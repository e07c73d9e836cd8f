mod admin;
mod driver;
mod user;

use axum::routing::get;
use axum::{Json, Router};
use bus_tracker_api_types::HealthResponse;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;

use crate::state::AppState;

pub fn create_router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(health))
        .nest("/driver", driver::router())
        .nest("/user", user::router())
        .nest("/admin", admin::router())
        .layer(TraceLayer::new_for_http())
        .layer(
            CorsLayer::new()
                .allow_origin(Any)
                .allow_methods(Any)
                .allow_headers(Any),
        )
        .with_state(state)
}

async fn health() -> Json<HealthResponse> {
    Json(HealthResponse { ok: true })
}

#[cfg(test)]
pub(crate) mod test_support {
    use std::sync::Arc;

    use axum::Router;
    use axum::body::{Body, to_bytes};
    use axum::http::{Request, StatusCode, header};
    use bus_tracker_transit::BusTracker;
    use serde_json::Value;
    use tower::ServiceExt;

    use crate::seed;
    use crate::state::AppState;

    /// Router over the built-in network with empty live state.
    pub fn app() -> Router {
        let topology = seed::load(None).expect("built-in seed loads");
        super::create_router(AppState::new(BusTracker::new(Arc::new(topology))))
    }

    pub async fn get(app: &Router, uri: &str) -> (StatusCode, Value) {
        let request = Request::get(uri).body(Body::empty()).unwrap();
        send(app, request).await
    }

    pub async fn post(app: &Router, uri: &str, body: Value) -> (StatusCode, Value) {
        let request = Request::post(uri)
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from(body.to_string()))
            .unwrap();
        send(app, request).await
    }

    pub async fn post_raw(app: &Router, uri: &str, body: &'static str) -> (StatusCode, Value) {
        let request = Request::post(uri)
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from(body))
            .unwrap();
        send(app, request).await
    }

    async fn send(app: &Router, request: Request<Body>) -> (StatusCode, Value) {
        let response = app.clone().oneshot(request).await.unwrap();
        let status = response.status();
        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        let body = if bytes.is_empty() {
            Value::Null
        } else {
            serde_json::from_slice(&bytes).unwrap()
        };
        (status, body)
    }
}

#[cfg(test)]
mod tests {
    use axum::http::StatusCode;
    use serde_json::json;

    use super::test_support::*;

    #[tokio::test]
    async fn test_health() {
        let app = app();
        let (status, body) = get(&app, "/health").await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(body, json!({"ok": true}));
    }

    #[tokio::test]
    async fn test_unknown_path() {
        let app = app();
        let (status, _) = get(&app, "/user/buses").await;
        assert_eq!(status, StatusCode::NOT_FOUND);
    }
}
