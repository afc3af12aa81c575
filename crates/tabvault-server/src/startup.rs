use color_eyre::owo_colors::OwoColorize;
use eyre::Result;
use http::Method;
use std::io;
use std::net::IpAddr;
use std::time::Instant;
use tabvault_sqlite::Store;
use tower_http::cors::Any;
use tower_http::{compression::CompressionLayer, cors::CorsLayer};

use axum::{
    Router,
    body::Body,
    http::Request,
    routing::{get, post},
    serve::Serve,
};
use tokio::{net::TcpListener, signal};
use tower::ServiceBuilder;
use tower_http::trace::{DefaultOnResponse, TraceLayer};
use tower_request_id::{RequestId, RequestIdLayer};
use tracing::{Level, error, error_span, info, warn};

use crate::ApplicationSettings;
use crate::routes::{
    add_song, add_tab, clean_tabs, health_check, import_tab, song, songs, tab, tabs,
};

#[derive(Debug, Clone)]
pub struct AppState {
    pub store: Store,
}

#[derive(Debug)]
pub struct Application {
    pub port: u16,
    pub host: IpAddr,
    pub server: Serve<Router, Router>,
}

impl Application {
    /// Binds the configured address, or any free port on the same host if
    /// that one is taken.
    ///
    /// # Errors
    /// Fails when no port can be bound or the bound address cannot be read.
    pub async fn build(configuration: &ApplicationSettings, store: Store) -> Result<Self> {
        let address = format!("{}:{}", configuration.host, configuration.port);

        let listener = match TcpListener::bind(&address).await {
            Ok(listener) => listener,
            Err(err) => {
                warn!("{err}. Trying another port...");
                match TcpListener::bind(format!("{}:0", configuration.host)).await {
                    Ok(listener) => listener,
                    Err(err) => {
                        error!("No ports available, shutting down...");
                        return Err(err.into());
                    }
                }
            }
        };

        let port = listener.local_addr()?.port();
        let host = configuration.host;

        let server = build_server(listener, AppState { store });

        Ok(Self { port, host, server })
    }

    pub fn port(&self) -> u16 {
        self.port
    }

    pub fn host(&self) -> String {
        self.host.to_string()
    }

    /// Serves until Ctrl+C or SIGTERM.
    pub async fn run_until_stopped(self) -> io::Result<()> {
        self.server
            // https://github.com/tokio-rs/axum/blob/main/examples/graceful-shutdown/src/main.rs
            .with_graceful_shutdown(shutdown_signal())
            .await
    }
}

async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(err) = signal::ctrl_c().await {
            error!("Failed to install the Ctrl+C handler: {err}");
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match signal::unix::signal(signal::unix::SignalKind::terminate()) {
            Ok(mut stream) => {
                stream.recv().await;
            }
            Err(err) => {
                error!("Failed to install the SIGTERM handler: {err}");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        () = ctrl_c => info!("ctrl+c received, shutting down."),
        () = terminate => info!("SIGTERM received, shutting down."),
    }
}

/// API routes with state attached and no middleware.
pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/api/health", get(health_check))
        .route("/api/tabs", get(tabs).post(add_tab))
        .route("/api/tab/:id", get(tab))
        .route("/api/import_tab", post(import_tab))
        .route("/api/tabs/clean", post(clean_tabs))
        .route("/api/songs", get(songs).post(add_song))
        .route("/api/song/:id", get(song))
        .with_state(state)
}

pub fn build_server(listener: TcpListener, state: AppState) -> Serve<Router, Router> {
    let mut server = router(state);

    if cfg!(debug_assertions) {
        let cors = CorsLayer::new()
            .allow_origin(Any)
            .allow_methods([Method::GET, Method::POST])
            .allow_headers(Any);

        server = server.layer(cors);
    }

    let server = server
        .layer(
            ServiceBuilder::new()
                .layer(RequestIdLayer)
                .layer(
                    TraceLayer::new_for_http()
                        .make_span_with(|request: &Request<Body>| {
                            let request_id = request
                                .extensions()
                                .get::<RequestId>()
                                .map_or_else(|| "unknown".into(), ToString::to_string);

                            error_span!(
                                "request",
                                id = %request_id,
                                method = %request.method().blue().bold(),
                                uri = %request.uri()
                            )
                        })
                        .on_response(
                            DefaultOnResponse::new()
                                .include_headers(true)
                                .level(Level::INFO),
                        ),
                ),
        )
        .layer(CompressionLayer::new());

    axum::serve(listener, server)
}

pub async fn run_server(
    configuration: ApplicationSettings,
    store: Store,
    start: Instant,
) -> Result<()> {
    let app = match Application::build(&configuration, store).await {
        Ok(app) => app,
        Err(e) => {
            error!("Failed to start the server: {:?}", e);
            return Err(e);
        }
    };

    let url = format!("http://{}:{}", app.host(), app.port());

    println!(
        "\n\n  {} {} ready in {} ms\n",
        configuration.name.to_uppercase().bold().bright_green(),
        format!("v{}", configuration.version).green(),
        start.elapsed().as_millis().bold().bright_white(),
    );

    println!(
        "  {}  {}:  {}\n\n",
        "➜".bold().bright_green(),
        "Local".bold().bright_white(),
        url.bright_cyan().underline()
    );

    if let Err(e) = app.run_until_stopped().await {
        error!("Error while running the HTTP server: {:?}", e);
        return Err(e.into());
    }

    Ok(())
}
