use axum::response::IntoResponse;
use axum::Json;

pub(crate) async fn health() -> impl IntoResponse {
    Json(serde_json::json!({
        "status": "ok",
        "message": "FeatureBoard API is running",
    }))
}
