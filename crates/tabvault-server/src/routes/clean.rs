use axum::{Json, extract::State};
use serde::Deserialize;
use tabvault_sqlite::CleanReport;
use tracing::instrument;

use crate::{extractors::QueryParams, into_http::HttpError, startup::AppState};

#[derive(Deserialize, Debug, Default)]
pub struct CleanParams {
    #[serde(default)]
    pub dry_run: bool,
}

/// Re-cleans every stored tab in place.
#[instrument(name = "tabs.clean", skip(app))]
pub async fn clean_tabs(
    QueryParams(params): QueryParams<CleanParams>,
    State(app): State<AppState>,
) -> Result<Json<CleanReport>, HttpError> {
    let mut conn = app.store.acquire().await?;
    let report = tabvault_sqlite::reclean_all(&mut conn, params.dry_run)?;

    Ok(Json(report))
}
