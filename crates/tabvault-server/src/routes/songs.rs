use axum::{
    Json,
    extract::{Path, State},
};
use http::StatusCode;
use serde_json::{Value, json};
use tabvault_common::{NewSong, Song, SongSummary};
use tracing::instrument;

use crate::{into_http::HttpError, startup::AppState};

pub async fn songs(State(app): State<AppState>) -> Result<Json<Vec<SongSummary>>, HttpError> {
    let conn = app.store.acquire().await?;
    Ok(Json(tabvault_sqlite::list_songs(&conn)?))
}

pub async fn song(Path(id): Path<i64>, State(app): State<AppState>) -> Result<Json<Song>, HttpError> {
    let conn = app.store.acquire().await?;

    tabvault_sqlite::get_song(&conn, id)?
        .map(Json)
        .ok_or_else(HttpError::not_found)
}

#[instrument(name = "songs.add", skip(app, song), fields(title = %song.title))]
pub async fn add_song(
    State(app): State<AppState>,
    Json(song): Json<NewSong>,
) -> Result<(StatusCode, Json<Value>), HttpError> {
    let missing = song.missing_fields();
    if !missing.is_empty() {
        return Err(HttpError::missing_fields(missing));
    }

    let conn = app.store.acquire().await?;
    let id = tabvault_sqlite::insert_song(&conn, &song)?;

    Ok((StatusCode::CREATED, Json(json!({ "id": id }))))
}
