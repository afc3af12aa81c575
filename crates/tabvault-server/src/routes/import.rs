use axum::{
    Json,
    extract::{Multipart, State},
};
use http::StatusCode;
use serde_json::{Value, json};
use tabvault_common::NewTab;
use tracing::{debug, instrument};

use crate::{into_http::HttpError, startup::AppState};

/// Multipart upload: `title`, `artist`, `type`, `tuning`, `capo`,
/// `difficulty` and the raw text in `tabfile`.
#[instrument(name = "tabs.import_form", skip_all)]
pub async fn import_tab(
    State(app): State<AppState>,
    mut multipart: Multipart,
) -> Result<(StatusCode, Json<Value>), HttpError> {
    let mut tab = NewTab::default();

    while let Some(field) = multipart.next_field().await? {
        let Some(name) = field.name().map(str::to_owned) else {
            continue;
        };
        let bytes = field.bytes().await?;
        debug!(field = %name, bytes = bytes.len());

        tab.set_field(&name, String::from_utf8_lossy(&bytes).into_owned());
    }

    store_tab(&app, tab).await
}

/// JSON variant of [`import_tab`]; the raw text goes in `content`.
#[instrument(name = "tabs.import_json", skip_all)]
pub async fn add_tab(
    State(app): State<AppState>,
    Json(tab): Json<NewTab>,
) -> Result<(StatusCode, Json<Value>), HttpError> {
    store_tab(&app, tab).await
}

async fn store_tab(app: &AppState, tab: NewTab) -> Result<(StatusCode, Json<Value>), HttpError> {
    let missing = tab.missing_fields();
    if !missing.is_empty() {
        return Err(HttpError::missing_fields(missing));
    }

    let conn = app.store.acquire().await?;
    let id = tabvault_sqlite::import_tab(&conn, tab)?;

    Ok((
        StatusCode::CREATED,
        Json(json!({ "id": id, "message": "Tab imported" })),
    ))
}
