use axum::{
    Json,
    extract::multipart::MultipartError,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use chrono::Local;
use color_eyre::Report;
use serde_json::json;
use std::{fmt, io::Write};
use tabvault_sqlite::StoreError;
use termcolor::{ColorChoice, StandardStream};
use tracing::error;

#[derive(Debug)]
pub enum HttpError {
    NotFound { msg: String },
    MissingFields { msg: String, missing: Vec<String> },
    BadRequest { msg: String },
    Internal { err: String },
}

impl HttpError {
    pub fn from_report(err: Report) -> Self {
        error!("HTTP handler error: {}", err.root_cause());

        if let Some(bt) = err
            .handler()
            .downcast_ref::<color_eyre::Handler>()
            .and_then(|h| h.backtrace())
        {
            let mut stream = StandardStream::stderr(ColorChoice::Auto);
            let _ = writeln!(&mut stream, "{bt:?}");
        }

        HttpError::Internal {
            err: err.to_string(),
        }
    }

    pub fn not_found() -> Self {
        HttpError::NotFound {
            msg: "Not found".to_owned(),
        }
    }

    pub fn missing_fields(missing: Vec<&str>) -> Self {
        HttpError::MissingFields {
            msg: format!("Missing required fields: {}", missing.join(", ")),
            missing: missing.into_iter().map(str::to_owned).collect(),
        }
    }

    pub fn bad_request(msg: impl Into<String>) -> Self {
        HttpError::BadRequest { msg: msg.into() }
    }
}

macro_rules! impl_from {
    ($from:ty) => {
        impl From<$from> for HttpError {
            fn from(err: $from) -> Self {
                let report = color_eyre::Report::from(err);
                Self::from_report(report)
            }
        }
    };
}

impl_from!(std::io::Error);
impl_from!(serde_json::Error);
impl_from!(rusqlite::Error);
impl_from!(StoreError);

impl From<serde_urlencoded::de::Error> for HttpError {
    fn from(err: serde_urlencoded::de::Error) -> Self {
        HttpError::bad_request(format!("Invalid query string: {err}"))
    }
}

impl From<MultipartError> for HttpError {
    fn from(err: MultipartError) -> Self {
        HttpError::bad_request(format!("Invalid multipart body: {}", err.body_text()))
    }
}

impl IntoResponse for HttpError {
    fn into_response(self) -> Response {
        let date = Local::now().to_rfc3339();
        match self {
            HttpError::NotFound { msg } => (
                StatusCode::NOT_FOUND,
                Json(json!({ "error": msg, "date": date })),
            )
                .into_response(),
            HttpError::MissingFields { msg, missing } => (
                StatusCode::BAD_REQUEST,
                Json(json!({
                    "error": msg,
                    "type": "missing_fields",
                    "missing_fields": missing,
                    "date": date
                })),
            )
                .into_response(),
            HttpError::BadRequest { msg } => (
                StatusCode::BAD_REQUEST,
                Json(json!({ "error": msg, "type": "bad_request", "date": date })),
            )
                .into_response(),
            HttpError::Internal { err } => (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(json!({ "error": err, "date": date })),
            )
                .into_response(),
        }
    }
}

impl std::error::Error for HttpError {}

impl fmt::Display for HttpError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let msg = match self {
            HttpError::NotFound { msg }
            | HttpError::MissingFields { msg, .. }
            | HttpError::BadRequest { msg } => msg,
            HttpError::Internal { err } => err,
        };
        write!(f, "HttpError: {msg}")
    }
}
