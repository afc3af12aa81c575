use axum::{
    Json,
    extract::{Path, State},
};
use serde::Deserialize;
use tabvault_common::{Tab, TabSummary};
use tracing::{Instrument, debug, info_span, instrument};

use crate::{extractors::QueryParams, into_http::HttpError, startup::AppState};

#[derive(Deserialize, Debug, Default)]
pub struct SearchParams {
    pub q: Option<String>,
}

#[instrument(name = "tabs.search", skip(app))]
pub async fn tabs(
    QueryParams(params): QueryParams<SearchParams>,
    State(app): State<AppState>,
) -> Result<Json<Vec<TabSummary>>, HttpError> {
    let conn = app
        .store
        .acquire()
        .instrument(info_span!("conn.acquiring"))
        .await?;

    let tabs = tabvault_sqlite::search_tabs(&conn, params.q.as_deref())?;
    debug!(results = tabs.len());

    Ok(Json(tabs))
}

#[instrument(name = "tabs.fetch", skip(app))]
pub async fn tab(Path(id): Path<i64>, State(app): State<AppState>) -> Result<Json<Tab>, HttpError> {
    let conn = app.store.acquire().await?;

    tabvault_sqlite::get_tab(&conn, id)?
        .map(Json)
        .ok_or_else(HttpError::not_found)
}
