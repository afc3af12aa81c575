use axum::{Json, extract::State};
use serde_json::{Value, json};

use crate::startup::AppState;

pub async fn health_check(State(app): State<AppState>) -> Json<Value> {
    let stats = app.store.pool().stats();
    Json(json!({
        "status": "ok",
        "pool": { "capacity": stats.capacity, "available": stats.available, "in_use": stats.in_use },
    }))
}
