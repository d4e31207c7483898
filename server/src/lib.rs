//! HTTP front end for the todo service.
//!
//! # Design
//! The router is the dispatcher: it picks a handler by method and path,
//! pulls the `{id}` segment out as a raw string and hands everything else to
//! `TodoService`, which validates and answers with a `Reply`. Handlers hold
//! no logic of their own. Ids and bodies are passed through unparsed so the
//! service decides, in order, what counts as a bad request.

pub mod config;
pub mod error;
pub mod sqlite;

use std::io;
use std::time::Duration;

use axum::{
    body::Bytes,
    extract::{Path, State},
    http::StatusCode,
    response::{Html, IntoResponse, Response},
    routing::{get, put},
    Json, Router,
};
use serde::Serialize;
use tokio::{net::TcpListener, task::JoinError};
use tokio_util::sync::CancellationToken;
use todo_core::{Reply, TodoService, TodoStore};
use tower_http::{timeout::TimeoutLayer, trace::TraceLayer};
use tracing::{error, info, warn};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

pub use config::{Config, StoreKind};
pub use error::ServerError;
pub use sqlite::SqliteStore;

const HOME_PAGE: &str = include_str!("../static/home.html");

/// A `Reply` rendered as a JSON response with its status code.
#[derive(Debug)]
pub struct ApiReply(pub Reply);

impl IntoResponse for ApiReply {
    fn into_response(self) -> Response {
        let status =
            StatusCode::from_u16(self.0.status()).unwrap_or(StatusCode::INTERNAL_SERVER_ERROR);
        (status, Json(self.0)).into_response()
    }
}

#[derive(Serialize)]
pub struct HealthResponse {
    pub status: &'static str,
}

pub fn app<S: TodoStore>(service: TodoService<S>) -> Router {
    Router::new()
        .route("/", get(home))
        .route("/health", get(health))
        .route("/todo", get(list_todos::<S>).post(create_todo::<S>))
        .route("/todo/", get(list_todos::<S>).post(create_todo::<S>))
        .route(
            "/todo/{id}",
            put(update_todo::<S>).delete(delete_todo::<S>),
        )
        .with_state(service)
}

/// How long the server waits on requests.
#[derive(Debug, Clone, Copy)]
pub struct Timeouts {
    /// Upper bound on a single request; slower ones get `408 Request Timeout`.
    pub request: Duration,
    /// Time in-flight requests get to finish after shutdown is requested.
    pub shutdown_grace: Duration,
}

/// `app` wrapped in request tracing and the per-request timeout.
pub fn router<S: TodoStore>(service: TodoService<S>, request_timeout: Duration) -> Router {
    app(service)
        .layer(TimeoutLayer::with_status_code(
            StatusCode::REQUEST_TIMEOUT,
            request_timeout,
        ))
        .layer(TraceLayer::new_for_http())
}

/// Initialize the tracing subscriber, honouring `RUST_LOG`.
pub fn init_tracing() {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "todo_server=info,todo_core=info,tower_http=info".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();
}

/// Bind the configured address and serve until SIGINT or SIGTERM.
pub async fn run<S: TodoStore>(config: &Config, store: S) -> Result<(), ServerError> {
    let service = TodoService::with_options(store, config.service_options());
    let listener = TcpListener::bind(config.addr()).await?;
    info!("listening on http://{}", listener.local_addr()?);

    let shutdown = CancellationToken::new();
    cancel_on_signal(shutdown.clone());
    serve(listener, service, shutdown, config.timeouts()).await
}

/// Serve on `listener` until `shutdown` is cancelled.
///
/// Once cancelled the listener stops accepting, in-flight requests get up to
/// `timeouts.shutdown_grace` to finish, and the store is closed.
pub async fn serve<S: TodoStore>(
    listener: TcpListener,
    service: TodoService<S>,
    shutdown: CancellationToken,
    timeouts: Timeouts,
) -> Result<(), ServerError> {
    let routes = router(service.clone(), timeouts.request);
    let grace = timeouts.shutdown_grace;
    let signal = shutdown.clone();
    let mut server = tokio::spawn(async move {
        axum::serve(listener, routes)
            .with_graceful_shutdown(async move { signal.cancelled().await })
            .await
    });

    let outcome = tokio::select! {
        joined = &mut server => flatten(joined),
        () = shutdown.cancelled() => {
            info!("shutting down server");
            match tokio::time::timeout(grace, &mut server).await {
                Ok(joined) => flatten(joined),
                Err(_) => {
                    warn!(grace_secs = grace.as_secs(), "in-flight requests still running, dropping them");
                    server.abort();
                    Ok(())
                }
            }
        }
    };

    service.store().close().await;
    outcome?;
    info!("server gracefully stopped");
    Ok(())
}

fn flatten(joined: Result<io::Result<()>, JoinError>) -> Result<(), ServerError> {
    Ok(joined??)
}

fn cancel_on_signal(token: CancellationToken) {
    tokio::spawn(async move {
        termination_signal().await;
        info!("received termination signal");
        token.cancel();
    });
}

async fn termination_signal() {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            error!(error = %e, "failed to listen for ctrl-c");
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut stream) => {
                stream.recv().await;
            }
            Err(e) => {
                error!(error = %e, "failed to listen for SIGTERM");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        () = ctrl_c => {}
        () = terminate => {}
    }
}

async fn home() -> Html<&'static str> {
    Html(HOME_PAGE)
}

async fn health() -> Json<HealthResponse> {
    Json(HealthResponse { status: "ok" })
}

async fn list_todos<S: TodoStore>(State(service): State<TodoService<S>>) -> ApiReply {
    ApiReply(service.list().await)
}

async fn create_todo<S: TodoStore>(
    State(service): State<TodoService<S>>,
    body: Bytes,
) -> ApiReply {
    ApiReply(service.create(&body).await)
}

async fn update_todo<S: TodoStore>(
    State(service): State<TodoService<S>>,
    Path(id): Path<String>,
    body: Bytes,
) -> ApiReply {
    ApiReply(service.update(&id, &body).await)
}

async fn delete_todo<S: TodoStore>(
    State(service): State<TodoService<S>>,
    Path(id): Path<String>,
) -> ApiReply {
    ApiReply(service.delete(&id).await)
}
